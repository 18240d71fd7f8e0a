/// Token-keyed deferral for "scroll first, then act" callbacks

use std::cell::Cell;

/// Identifies one scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealToken(u64);

/// Tracks the latest pending reveal; scheduling a new one supersedes the rest
///
/// The timer itself lives with the caller. When it fires, the caller asks
/// `take` whether its token is still current and only then runs the callback.
#[derive(Debug, Default)]
pub struct DeferredReveal {
    latest: Cell<u64>,
    pending: Cell<bool>,
}

impl DeferredReveal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&self) -> RevealToken {
        let next = self.latest.get().wrapping_add(1);
        self.latest.set(next);
        self.pending.set(true);
        RevealToken(next)
    }

    /// Drop whatever is pending
    pub fn cancel(&self) {
        self.pending.set(false);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Claim the callback for `token`; false if it was superseded or cancelled
    pub fn take(&self, token: RevealToken) -> bool {
        if self.pending.get() && self.latest.get() == token.0 {
            self.pending.set(false);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_reveal_fires_once() {
        let reveal = DeferredReveal::new();
        let token = reveal.schedule();

        assert!(reveal.is_pending());
        assert!(reveal.take(token));
        assert!(!reveal.take(token));
        assert!(!reveal.is_pending());
    }

    #[test]
    fn test_newer_request_supersedes() {
        let reveal = DeferredReveal::new();
        let first = reveal.schedule();
        let second = reveal.schedule();

        assert!(!reveal.take(first));
        assert!(reveal.take(second));
    }

    #[test]
    fn test_cancel() {
        let reveal = DeferredReveal::new();
        let token = reveal.schedule();

        reveal.cancel();

        assert!(!reveal.take(token));
    }
}
