use anyhow::Context;
use tracing::debug;
use versionfix_types::config::ValidatorConfig;
use versionfix_types::issue::{IssueType, ValidationIssue};
use versionfix_types::state::RepositoryState;

/// Static description of a rule, used for ordering, `list-rules` and `explain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMeta {
    pub id: &'static str,
    pub issue_type: IssueType,
    /// Evaluation order; lower first.
    pub priority: u32,
    pub title: &'static str,
    pub description: &'static str,
}

/// A validation rule.
///
/// `condition` selects candidates, `check` decides whether a candidate is valid and
/// `create_issue` materializes an issue for an invalid one. None of them may mutate state.
pub trait Rule {
    type Item;

    fn meta(&self) -> RuleMeta;

    fn id(&self) -> &'static str {
        self.meta().id
    }

    fn priority(&self) -> u32 {
        self.meta().priority
    }

    fn issue_type(&self) -> IssueType {
        self.meta().issue_type
    }

    fn condition(
        &self,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<Vec<Self::Item>>;

    fn check(
        &self,
        item: &Self::Item,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<bool>;

    fn create_issue(
        &self,
        item: &Self::Item,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<ValidationIssue>;
}

/// Object-safe view of a [`Rule`], so rules with different item types share one registry.
pub trait ErasedRule {
    fn meta(&self) -> RuleMeta;

    fn evaluate(
        &self,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<Vec<ValidationIssue>>;
}

impl<R: Rule> ErasedRule for R {
    fn meta(&self) -> RuleMeta {
        Rule::meta(self)
    }

    fn evaluate(
        &self,
        state: &RepositoryState,
        config: &ValidatorConfig,
    ) -> anyhow::Result<Vec<ValidationIssue>> {
        let items = self.condition(state, config)?;
        let mut issues = Vec::new();
        for item in &items {
            if self.check(item, state, config)? {
                continue;
            }
            issues.push(self.create_issue(item, state, config)?);
        }
        debug!(
            rule = self.id(),
            candidates = items.len(),
            issues = issues.len(),
            "rule evaluated"
        );
        Ok(issues)
    }
}

pub struct RuleEngine {
    rules: Vec<Box<dyn ErasedRule>>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::with_rules(crate::rules::builtin_rules())
    }

    pub fn with_rules(mut rules: Vec<Box<dyn ErasedRule>>) -> Self {
        // Stable: equal priorities keep registration order.
        rules.sort_by_key(|r| r.meta().priority);
        Self { rules }
    }

    pub fn metas(&self) -> Vec<RuleMeta> {
        self.rules.iter().map(|r| r.meta()).collect()
    }

    /// Evaluate every rule against the state's own config.
    ///
    /// Issues come back in rule order then candidate order. The first rule error aborts
    /// evaluation, since partial issue lists would skew every downstream count.
    pub fn evaluate(&self, state: &RepositoryState) -> anyhow::Result<Vec<ValidationIssue>> {
        let mut issues = Vec::new();
        for rule in &self.rules {
            let meta = rule.meta();
            let mut found = rule
                .evaluate(state, &state.config)
                .with_context(|| format!("rule {}", meta.id))?;
            issues.append(&mut found);
        }
        Ok(issues)
    }
}
