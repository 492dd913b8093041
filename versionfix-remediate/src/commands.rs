use versionfix_types::action::RemediationAction;
use versionfix_types::refs::RefKind;

fn ref_path(kind: RefKind, name: &str) -> String {
    match kind {
        RefKind::Tag => format!("refs/tags/{name}"),
        RefKind::Branch => format!("refs/heads/{name}"),
    }
}

fn push_ref(kind: RefKind, name: &str, sha: &str) -> String {
    format!("git push origin {sha}:{}", ref_path(kind, name))
}

fn delete_ref(kind: RefKind, name: &str) -> String {
    format!("git push origin :{}", ref_path(kind, name))
}

fn publish(tag: &str) -> String {
    format!("gh release edit {tag} --draft=false")
}

/// Shell commands that perform `action` by hand.
pub fn manual_commands(action: &RemediationAction) -> Vec<String> {
    match action {
        RemediationAction::CreateRef { kind, name, sha } => vec![push_ref(*kind, name, sha)],
        RemediationAction::UpdateRef {
            kind,
            name,
            sha,
            force,
        } => {
            let mut cmd = push_ref(*kind, name, sha);
            if *force {
                cmd.push_str(" --force");
            }
            vec![cmd]
        }
        RemediationAction::DeleteRef { kind, name } => vec![delete_ref(*kind, name)],
        RemediationAction::ConvertRefKind {
            name,
            sha,
            from,
            to,
        } => vec![push_ref(*to, name, sha), delete_ref(*from, name)],
        RemediationAction::CreateRelease {
            tag,
            draft,
            publish: and_publish,
        } => {
            let draft_flag = if *draft { " --draft" } else { "" };
            let mut cmds = vec![format!(
                "gh release create {tag}{draft_flag} --verify-tag --title {tag} --notes \"\""
            )];
            if *draft && *and_publish {
                cmds.push(publish(tag));
            }
            cmds
        }
        RemediationAction::PublishRelease { tag, .. } => vec![publish(tag)],
        RemediationAction::RepublishRelease { tag, .. } => vec![
            format!("gh release edit {tag} --draft=true"),
            publish(tag),
        ],
        RemediationAction::DeleteRelease { tag, .. } => {
            vec![format!("gh release delete {tag} --yes")]
        }
    }
}
