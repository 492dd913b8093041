//! Domain logic: turn a repository snapshot into a deterministic list of issues.
//!
//! This crate owns *what* is wrong and which action would correct it. It does not own *how*
//! actions are ordered or executed; that's the `versionfix-remediate` crate.

mod engine;
mod ignore;
mod rules;
mod state;
mod version;

pub use engine::{ErasedRule, Rule, RuleEngine, RuleMeta};
pub use ignore::IgnoreSet;
pub use rules::{builtin_rule_metas, builtin_rules};
pub use state::{BuiltState, StateBuilder};
pub use version::{PatchScope, effective_ref, highest_patch_for, highest_patch_in};
