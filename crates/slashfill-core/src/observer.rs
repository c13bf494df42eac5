//! Input observer: tracks which text input is currently observed.
//!
//! The host reports focus moving onto and off its inputs; the observer owns
//! the single "observed input" slot. Change events are only acted upon for
//! the observed input, so a blurred input can never produce suggestions.
//! After [`InputObserver::teardown`] every focus event is ignored.

/// What a focus event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange<I> {
    /// Input that stopped being observed, if any.
    pub detached: Option<I>,
    /// Input that started being observed, if any.
    pub attached: Option<I>,
}

impl<I> FocusChange<I> {
    fn none() -> Self {
        Self {
            detached: None,
            attached: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputObserver<I> {
    observed: Option<I>,
    torn_down: bool,
}

impl<I> Default for InputObserver<I> {
    fn default() -> Self {
        Self {
            observed: None,
            torn_down: false,
        }
    }
}

impl<I: Copy + Eq + std::fmt::Debug> InputObserver<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Focus moved onto `input`. Any other observed input is detached first.
    pub fn focus_in(&mut self, input: I) -> FocusChange<I> {
        if self.torn_down || self.observed == Some(input) {
            return FocusChange::none();
        }
        let detached = self.observed.replace(input);
        if let Some(old) = detached {
            tracing::debug!(input = ?old, "observer: detached (missed blur)");
        }
        tracing::debug!(input = ?input, "observer: attached");
        FocusChange {
            detached,
            attached: Some(input),
        }
    }

    /// Focus moved off `input`. A no-op unless it is the observed input.
    pub fn focus_out(&mut self, input: I) -> FocusChange<I> {
        if self.observed != Some(input) {
            return FocusChange::none();
        }
        self.observed = None;
        tracing::debug!(input = ?input, "observer: detached");
        FocusChange {
            detached: Some(input),
            attached: None,
        }
    }

    /// Stop observing for good. Returns the input that was observed.
    pub fn teardown(&mut self) -> Option<I> {
        self.torn_down = true;
        let detached = self.observed.take();
        tracing::debug!(input = ?detached, "observer: torn down");
        detached
    }

    pub fn observed(&self) -> Option<I> {
        self.observed
    }

    pub fn observes(&self, input: I) -> bool {
        self.observed == Some(input)
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
