//! One-shot reveal-on-intersection.
//!
//! Every top-level fragment a pipeline commits is registered here. Visibility
//! reports arrive as `(index, ratio)` pairs; the first report at or above the
//! threshold reveals the fragment, and nothing after that changes it back.

/// Class applied to a fragment once it has been seen.
pub const VISIBLE_CLASS: &str = "in-view";

/// Default fraction of a fragment that must be on screen.
pub const DEFAULT_THRESHOLD: f64 = 0.12;

#[derive(Debug, Clone, PartialEq)]
pub struct RevealObserver {
    threshold: f64,
    revealed: Vec<bool>,
}

impl RevealObserver {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            revealed: Vec::new(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Start observing `count` fresh fragments, forgetting any previous ones.
    pub fn observe(&mut self, count: usize) {
        self.revealed = vec![false; count];
    }

    /// Report that fragment `index` is `ratio` visible. Returns `true` only on
    /// the transition to revealed.
    pub fn notify(&mut self, index: usize, ratio: f64) -> bool {
        let Some(seen) = self.revealed.get_mut(index) else {
            return false;
        };
        if *seen || ratio < self.threshold {
            return false;
        }
        *seen = true;
        true
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn observed(&self) -> usize {
        self.revealed.len()
    }
}

impl Default for RevealObserver {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_once_at_threshold() {
        let mut obs = RevealObserver::default();
        obs.observe(2);
        assert!(!obs.notify(0, 0.05));
        assert!(obs.notify(0, 0.12));
        assert!(!obs.notify(0, 0.9));
        assert!(obs.is_revealed(0));
        assert!(!obs.is_revealed(1));
    }

    #[test]
    fn hiding_again_does_not_unreveal() {
        let mut obs = RevealObserver::new(0.3);
        obs.observe(1);
        assert!(obs.notify(0, 0.5));
        assert!(!obs.notify(0, 0.0));
        assert!(obs.is_revealed(0));
    }

    #[test]
    fn unknown_index_is_ignored() {
        let mut obs = RevealObserver::default();
        obs.observe(1);
        assert!(!obs.notify(5, 1.0));
    }

    #[test]
    fn observe_resets_state() {
        let mut obs = RevealObserver::default();
        obs.observe(1);
        obs.notify(0, 1.0);
        obs.observe(3);
        assert_eq!(obs.observed(), 3);
        assert!(!obs.is_revealed(0));
    }

    #[test]
    fn threshold_is_clamped() {
        assert_eq!(RevealObserver::new(4.0).threshold(), 1.0);
        assert_eq!(RevealObserver::new(-1.0).threshold(), 0.0);
    }
}
