//! Navigation interception for guarded exam sessions.
//!
//! While an exam sitting is in progress the session holds an armed guard.
//! An attempted navigation away flips it to `Pending`; the learner then
//! either confirms (forced submission, guard released, navigation proceeds)
//! or declines (guard re-arms, session resumes). The guard is released on
//! every exit path so no stale interception outlives its session.

/// Lifecycle of the navigation guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationGuard {
    /// Not guarding; navigation flows freely. Practice sessions and
    /// completed sessions are always here.
    #[default]
    Inactive,
    /// Guarding: the next navigation attempt will be held.
    Armed,
    /// A navigation attempt is held, waiting for confirm or decline.
    Pending,
}

impl NavigationGuard {
    #[must_use]
    pub fn armed() -> Self {
        Self::Armed
    }

    /// A navigation attempt arrives. Returns true if the guard held it.
    pub fn intercept(&mut self) -> bool {
        if *self == Self::Armed {
            *self = Self::Pending;
            true
        } else {
            false
        }
    }

    /// The learner declined the prompt: cancel the held navigation and guard
    /// again.
    pub fn reset(&mut self) {
        if *self == Self::Pending {
            *self = Self::Armed;
        }
    }

    /// Stop guarding. Called on submission, confirmed leave, and teardown.
    pub fn release(&mut self) {
        *self = Self::Inactive;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        *self == Self::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armed_guard_holds_one_navigation() {
        let mut guard = NavigationGuard::armed();
        assert!(guard.intercept());
        assert!(guard.is_pending());
        // A second attempt while pending is not intercepted again.
        assert!(!guard.intercept());
    }

    #[test]
    fn reset_re_arms_after_decline() {
        let mut guard = NavigationGuard::armed();
        guard.intercept();
        guard.reset();
        assert_eq!(guard, NavigationGuard::Armed);
        assert!(guard.intercept());
    }

    #[test]
    fn released_guard_never_intercepts() {
        let mut guard = NavigationGuard::armed();
        guard.release();
        assert!(!guard.intercept());
        assert_eq!(guard, NavigationGuard::Inactive);
    }

    #[test]
    fn inactive_guard_ignores_reset() {
        let mut guard = NavigationGuard::default();
        guard.reset();
        assert_eq!(guard, NavigationGuard::Inactive);
    }
}
