//! Milestone notification collaborator.

/// Every this many cumulative ticks a milestone is reached.
pub const MILESTONE_INTERVAL: usize = 5;

/// Returns true when `count` ticks is a milestone.
pub fn is_milestone(count: usize) -> bool {
    count > 0 && count % MILESTONE_INTERVAL == 0
}

/// Receives milestone events from the route set manager.
///
/// Fire-and-forget: implementations must return quickly and never fail the
/// caller. Anything slow belongs on a channel or a spawned task.
pub trait MilestoneNotifier: Send + Sync {
    fn notify_milestone(&self, count: usize);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_milestone() {
        assert!(!is_milestone(0));
        assert!(!is_milestone(4));
        assert!(is_milestone(5));
        assert!(!is_milestone(6));
        assert!(is_milestone(10));
    }
}
