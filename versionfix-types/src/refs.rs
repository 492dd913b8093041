use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two pointer mechanisms a version can be published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    Tag,
    Branch,
}

impl RefKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RefKind::Tag => "tag",
            RefKind::Branch => "branch",
        }
    }

    /// The `refs/<namespace>` segment used in git ref paths.
    pub fn namespace(self) -> &'static str {
        match self {
            RefKind::Tag => "tags",
            RefKind::Branch => "heads",
        }
    }

    pub fn other(self) -> RefKind {
        match self {
            RefKind::Tag => RefKind::Branch,
            RefKind::Branch => RefKind::Tag,
        }
    }

    pub fn ref_path(self, name: &str) -> String {
        format!("refs/{}/{}", self.namespace(), name)
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed version name.
///
/// The variant encodes which of major/minor/patch the name denotes, so a version
/// can never be more than one of them. `latest` is none of the three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VersionSpec {
    Major { major: u64 },
    Minor { major: u64, minor: u64 },
    Patch { major: u64, minor: u64, patch: u64 },
    Latest,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a version name: '{0}'")]
pub struct VersionParseError(pub String);

impl VersionSpec {
    pub const LATEST: &'static str = "latest";

    pub fn parse(name: &str) -> Option<VersionSpec> {
        if name == Self::LATEST {
            return Some(VersionSpec::Latest);
        }

        let rest = name.strip_prefix(['v', 'V'])?;
        let mut nums = Vec::with_capacity(3);
        for part in rest.split('.') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            nums.push(part.parse::<u64>().ok()?);
        }

        match nums.as_slice() {
            [major] => Some(VersionSpec::Major { major: *major }),
            [major, minor] => Some(VersionSpec::Minor {
                major: *major,
                minor: *minor,
            }),
            [major, minor, patch] => Some(VersionSpec::Patch {
                major: *major,
                minor: *minor,
                patch: *patch,
            }),
            _ => None,
        }
    }

    pub fn major(major: u64) -> Self {
        VersionSpec::Major { major }
    }

    pub fn minor(major: u64, minor: u64) -> Self {
        VersionSpec::Minor { major, minor }
    }

    pub fn patch(major: u64, minor: u64, patch: u64) -> Self {
        VersionSpec::Patch {
            major,
            minor,
            patch,
        }
    }

    pub fn is_major(&self) -> bool {
        matches!(self, VersionSpec::Major { .. })
    }

    pub fn is_minor(&self) -> bool {
        matches!(self, VersionSpec::Minor { .. })
    }

    pub fn is_patch(&self) -> bool {
        matches!(self, VersionSpec::Patch { .. })
    }

    pub fn is_latest(&self) -> bool {
        matches!(self, VersionSpec::Latest)
    }

    /// Floating versions are the aliases expected to move: `vN`, `vN.M` and `latest`.
    pub fn is_floating(&self) -> bool {
        !self.is_patch()
    }

    /// `(major, minor, patch)` for exact versions.
    pub fn triple(&self) -> Option<(u64, u64, u64)> {
        match *self {
            VersionSpec::Patch {
                major,
                minor,
                patch,
            } => Some((major, minor, patch)),
            _ => None,
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Major { major } => write!(f, "v{major}"),
            VersionSpec::Minor { major, minor } => write!(f, "v{major}.{minor}"),
            VersionSpec::Patch {
                major,
                minor,
                patch,
            } => write!(f, "v{major}.{minor}.{patch}"),
            VersionSpec::Latest => f.write_str(Self::LATEST),
        }
    }
}

impl FromStr for VersionSpec {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionSpec::parse(s).ok_or_else(|| VersionParseError(s.to_string()))
    }
}

impl TryFrom<String> for VersionSpec {
    type Error = VersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VersionSpec> for String {
    fn from(value: VersionSpec) -> Self {
        value.to_string()
    }
}

/// A tag or branch naming a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRef {
    /// The ref name as found in the repository, e.g. `v1.2`.
    pub version: String,
    pub ref_path: String,
    pub sha: String,
    pub kind: RefKind,
    pub spec: VersionSpec,

    #[serde(default)]
    pub is_ignored: bool,
}

impl VersionRef {
    /// Build a ref from its name. Returns `None` for names that are not versions.
    pub fn new(name: &str, sha: impl Into<String>, kind: RefKind) -> Option<Self> {
        let spec = VersionSpec::parse(name)?;
        Some(Self {
            version: name.to_string(),
            ref_path: kind.ref_path(name),
            sha: sha.into(),
            kind,
            spec,
            is_ignored: false,
        })
    }

    pub fn is_major(&self) -> bool {
        self.spec.is_major()
    }

    pub fn is_minor(&self) -> bool {
        self.spec.is_minor()
    }

    pub fn is_patch(&self) -> bool {
        self.spec.is_patch()
    }
}
