//! Pause controllers.
//!
//! A render session asks its controller "should I pause now?" at every
//! batch boundary. The controller only decides; it never touches session
//! state.

/// Caller-side predicate polled between batches.
pub trait PauseController {
    /// Return true to make the session yield with `ToBeContinued`.
    fn need_to_pause_now(&mut self) -> bool;
}

impl<F> PauseController for F
where
    F: FnMut() -> bool,
{
    fn need_to_pause_now(&mut self) -> bool {
        self()
    }
}

/// Never pauses; the session runs to completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverPause;

impl PauseController for NeverPause {
    fn need_to_pause_now(&mut self) -> bool {
        false
    }
}

/// Pauses at every batch boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysPause;

impl PauseController for AlwaysPause {
    fn need_to_pause_now(&mut self) -> bool {
        true
    }
}

/// Pauses on every `interval`-th poll.
#[derive(Debug, Clone, Copy)]
pub struct PauseEvery {
    interval: usize,
    polls: usize,
}

impl PauseEvery {
    /// Pause every `interval` polls. Zero behaves like one.
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            polls: 0,
        }
    }

    /// Number of times the controller has been polled.
    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl PauseController for PauseEvery {
    fn need_to_pause_now(&mut self) -> bool {
        self.polls += 1;
        self.polls % self.interval == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_controllers() {
        assert!(!NeverPause.need_to_pause_now());
        assert!(AlwaysPause.need_to_pause_now());
    }

    #[test]
    fn test_closure_controller() {
        let mut calls = 0;
        let mut pause = || {
            calls += 1;
            calls > 2
        };
        assert!(!pause.need_to_pause_now());
        assert!(!pause.need_to_pause_now());
        assert!(pause.need_to_pause_now());
    }

    #[test]
    fn test_pause_every() {
        let mut pause = PauseEvery::new(3);
        let answers: Vec<bool> = (0..6).map(|_| pause.need_to_pause_now()).collect();
        assert_eq!(answers, vec![false, false, true, false, false, true]);
        assert_eq!(pause.polls(), 6);
        assert!(PauseEvery::new(0).need_to_pause_now());
    }
}
