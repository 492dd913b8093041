use glob::Pattern;
use versionfix_types::refs::VersionSpec;

/// Versions excluded from validation, from the `ignore-versions` option.
///
/// Entries are glob patterns (`v0.*`, `v1.?.0`). An entry that is not a valid glob is
/// rejected as a pattern but still matches its exact text.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<Pattern>,
    literals: Vec<String>,
    rejected: Vec<String>,
}

impl IgnoreSet {
    pub fn new<S: AsRef<str>>(entries: &[S]) -> Self {
        let mut set = IgnoreSet::default();
        for entry in entries {
            let entry = entry.as_ref().trim();
            if entry.is_empty() {
                continue;
            }
            match Pattern::new(entry) {
                Ok(p) => set.patterns.push(p),
                Err(_) => {
                    set.rejected.push(entry.to_string());
                    set.literals.push(entry.to_string());
                }
            }
        }
        set
    }

    pub fn is_ignored(&self, version: &str) -> bool {
        self.literals.iter().any(|l| l == version) || self.patterns.iter().any(|p| p.matches(version))
    }

    /// Match a ref under its own spelling or its canonical one (`V1.2.0` as `v1.2.0`).
    pub fn is_ref_ignored(&self, name: &str, spec: &VersionSpec) -> bool {
        self.is_ignored(name) || self.is_ignored(&spec.to_string())
    }

    /// Entries that failed to parse as globs.
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }
}
