//! Overrun policy: the rule applied when a release instant arrives while
//! the previous instance of the same job is still running.

/// Per-task overrun policy, or a tag deferring to [`crate::GlobalConfig::default_policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverrunPolicy {
    /// Defer to the registry's global default policy.
    #[default]
    UseGlobal,
    /// Drop the new release; the running instance keeps running.
    Skip,
    /// Forcibly terminate the running instance and start the new one.
    Kill,
    /// Declare the running instance failed and start the new one without
    /// terminating it.
    CatchUp,
}

impl OverrunPolicy {
    /// Resolve `UseGlobal` against the registry's default. A task whose own
    /// policy is already concrete is returned unchanged.
    pub const fn resolve(self, global_default: OverrunPolicy) -> OverrunPolicy {
        match self {
            OverrunPolicy::UseGlobal => global_default,
            concrete => concrete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn use_global_defers() {
        assert_eq!(OverrunPolicy::UseGlobal.resolve(OverrunPolicy::Kill), OverrunPolicy::Kill);
    }

    #[test]
    fn concrete_policy_wins() {
        assert_eq!(OverrunPolicy::Skip.resolve(OverrunPolicy::Kill), OverrunPolicy::Skip);
        assert_eq!(OverrunPolicy::CatchUp.resolve(OverrunPolicy::Skip), OverrunPolicy::CatchUp);
    }
}
