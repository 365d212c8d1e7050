//! Switch policies consulted by the authority before changing tools

use crate::registry::ToolDescriptor;

/// Decides whether a validated switch request may proceed.
///
/// Only called for registered tools; unknown ids are rejected before
/// the policy is consulted.
pub trait SwitchPolicy: Send + Sync {
    fn permits(&self, current: &ToolDescriptor, requested: &ToolDescriptor) -> bool;
}

/// Permits every switch between registered tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl SwitchPolicy for AllowAll {
    fn permits(&self, _current: &ToolDescriptor, _requested: &ToolDescriptor) -> bool {
        true
    }
}

/// Rejects every switch, pinning the active tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockedPolicy;

impl SwitchPolicy for LockedPolicy {
    fn permits(&self, current: &ToolDescriptor, requested: &ToolDescriptor) -> bool {
        tracing::debug!(current = %current.id, requested = %requested.id, "Tool selection is locked");
        false
    }
}

impl<F> SwitchPolicy for F
where
    F: Fn(&ToolDescriptor, &ToolDescriptor) -> bool + Send + Sync,
{
    fn permits(&self, current: &ToolDescriptor, requested: &ToolDescriptor) -> bool {
        self(current, requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_policies() {
        let a = ToolDescriptor::new("a", "A", "a");
        let b = ToolDescriptor::new("b", "B", "b");
        assert!(AllowAll.permits(&a, &b));
        assert!(!LockedPolicy.permits(&a, &b));
    }

    #[test]
    fn test_closure_policy() {
        let no_plugins = |_: &ToolDescriptor, to: &ToolDescriptor| !to.supports_plugins;
        let plain = ToolDescriptor::new("a", "A", "a");
        let plugged = ToolDescriptor::new("b", "B", "b").with_plugins(true);
        assert!(no_plugins.permits(&plugged, &plain));
        assert!(!no_plugins.permits(&plain, &plugged));
    }
}
