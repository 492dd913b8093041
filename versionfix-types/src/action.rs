use crate::refs::RefKind;
use serde::{Deserialize, Serialize};

/// Corrective unit attached to an issue.
///
/// Lower [`priority`](RemediationAction::priority) runs first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RemediationAction {
    CreateRef {
        kind: RefKind,
        name: String,
        sha: String,
    },
    UpdateRef {
        kind: RefKind,
        name: String,
        sha: String,
        #[serde(default)]
        force: bool,
    },
    DeleteRef {
        kind: RefKind,
        name: String,
    },
    /// Executed as create-target then delete-source.
    ConvertRefKind {
        name: String,
        sha: String,
        from: RefKind,
        to: RefKind,
    },
    /// Executed as create-draft then (optionally) publish.
    CreateRelease {
        tag: String,
        #[serde(default = "default_true")]
        draft: bool,
        #[serde(default)]
        publish: bool,
    },
    PublishRelease {
        tag: String,
        release_id: u64,
    },
    RepublishRelease {
        tag: String,
        release_id: u64,
    },
    DeleteRelease {
        tag: String,
        release_id: u64,
    },
}

fn default_true() -> bool {
    true
}

impl RemediationAction {
    pub fn priority(&self) -> u32 {
        match self {
            RemediationAction::DeleteRef { .. } => 10,
            RemediationAction::ConvertRefKind { .. } => 20,
            RemediationAction::CreateRelease { .. } => 30,
            RemediationAction::PublishRelease { .. } => 40,
            RemediationAction::RepublishRelease { .. } => 45,
            RemediationAction::CreateRef { .. } => 50,
            RemediationAction::UpdateRef { .. } => 60,
            RemediationAction::DeleteRelease { .. } => 70,
        }
    }

    pub fn kind_tag(&self) -> &'static str {
        match self {
            RemediationAction::CreateRef { .. } => "create_ref",
            RemediationAction::UpdateRef { .. } => "update_ref",
            RemediationAction::DeleteRef { .. } => "delete_ref",
            RemediationAction::ConvertRefKind { .. } => "convert_ref_kind",
            RemediationAction::CreateRelease { .. } => "create_release",
            RemediationAction::PublishRelease { .. } => "publish_release",
            RemediationAction::RepublishRelease { .. } => "republish_release",
            RemediationAction::DeleteRelease { .. } => "delete_release",
        }
    }

    /// Deletes lose data when repeated against a changed remote, so they are never retried.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            RemediationAction::DeleteRef { .. } | RemediationAction::DeleteRelease { .. }
        )
    }

    /// Two-step actions whose second step only runs after the first succeeded.
    pub fn is_composite(&self) -> bool {
        match self {
            RemediationAction::ConvertRefKind { .. } => true,
            RemediationAction::CreateRelease { publish, .. } => *publish,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_deletes_run_before_conversions_and_updates() {
        let delete = RemediationAction::DeleteRef {
            kind: RefKind::Branch,
            name: "v1".into(),
        };
        let convert = RemediationAction::ConvertRefKind {
            name: "v1.0.0".into(),
            sha: "a".into(),
            from: RefKind::Branch,
            to: RefKind::Tag,
        };
        let update = RemediationAction::UpdateRef {
            kind: RefKind::Tag,
            name: "v1".into(),
            sha: "a".into(),
            force: true,
        };
        assert!(delete.priority() < convert.priority());
        assert!(convert.priority() < update.priority());
    }

    #[test]
    fn serializes_with_type_tag() {
        let action = RemediationAction::PublishRelease {
            tag: "v1.0.0".into(),
            release_id: 7,
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "publish_release");
        assert_eq!(json["release_id"], 7);
        assert_eq!(action.kind_tag(), "publish_release");
    }

    #[test]
    fn only_deletes_are_destructive() {
        let create = RemediationAction::CreateRelease {
            tag: "v1.0.0".into(),
            draft: true,
            publish: true,
        };
        assert!(!create.is_destructive());
        assert!(create.is_composite());
        assert!(
            RemediationAction::DeleteRelease {
                tag: "v1".into(),
                release_id: 1
            }
            .is_destructive()
        );
    }
}
