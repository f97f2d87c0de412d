//! Decoded-image cache.
//!
//! Images are converted from straight RGBA to premultiplied pixmaps once and
//! kept by image id. Unbounded by default; with `LIMITED_IMAGE_CACHE` the
//! cache holds at most [`LIMITED_CACHE_BYTES`] of pixels and evicts the
//! oldest entries first. Whether an image came from the cache never changes
//! the painted pixels.

use indexmap::IndexMap;
use std::sync::Arc;
use tiny_skia::{ColorU8, Pixmap};

use crate::error::{Error, Result};
use crate::page::ImageObject;

/// Byte budget of a limited cache.
pub const LIMITED_CACHE_BYTES: usize = 4 * 1024 * 1024;

/// Cache of decoded images keyed by image id, in insertion order.
#[derive(Debug, Default)]
pub struct ImageCache {
    entries: IndexMap<u64, Arc<Pixmap>>,
    bytes: usize,
    limit: Option<usize>,
    hits: usize,
    misses: usize,
}

impl ImageCache {
    /// An unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache holding at most `limit` bytes of decoded pixels.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Change the byte limit, evicting as needed.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
        self.evict_for(0);
    }

    /// Return the decoded pixmap for `image`, decoding it on a miss.
    pub fn get_or_decode(&mut self, image: &ImageObject) -> Result<Arc<Pixmap>> {
        if let Some(pixmap) = self.entries.get(&image.id) {
            self.hits += 1;
            return Ok(Arc::clone(pixmap));
        }
        self.misses += 1;

        let pixmap = Arc::new(decode(image)?);
        let size = image.byte_len();
        if self.limit.map_or(true, |limit| size <= limit) {
            self.evict_for(size);
            self.entries.insert(image.id, Arc::clone(&pixmap));
            self.bytes += size;
        } else {
            log::trace!("image {} ({} bytes) exceeds cache limit, not cached", image.id, size);
        }
        Ok(pixmap)
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decoded bytes currently held.
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    /// Whether an image id is cached.
    pub fn contains(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.bytes = 0;
    }

    fn evict_for(&mut self, incoming: usize) {
        let limit = match self.limit {
            Some(limit) => limit,
            None => return,
        };
        while self.bytes + incoming > limit {
            match self.entries.shift_remove_index(0) {
                Some((id, pixmap)) => {
                    let freed = pixmap.data().len();
                    self.bytes = self.bytes.saturating_sub(freed);
                    log::trace!("evicted image {} ({} bytes)", id, freed);
                },
                None => break,
            }
        }
    }
}

/// Convert straight RGBA8 pixels into a premultiplied pixmap.
fn decode(image: &ImageObject) -> Result<Pixmap> {
    if image.pixels.len() != image.byte_len() {
        return Err(Error::backend(format!(
            "image {} is {}x{} but carries {} bytes, expected {}",
            image.id,
            image.width,
            image.height,
            image.pixels.len(),
            image.byte_len()
        )));
    }
    let mut pixmap = Pixmap::new(image.width, image.height).ok_or_else(|| {
        Error::backend(format!(
            "cannot allocate {}x{} image {}",
            image.width, image.height, image.id
        ))
    })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels.chunks_exact(4)) {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Ok(pixmap)
}
