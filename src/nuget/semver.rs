//! Version precedence for NuGet version strings
//!
//! Registry versions are not guaranteed to be strict SemVer: NuGet allows
//! four numeric segments (`1.2.3.4`) and legacy packages publish partial
//! versions (`1.0`). Comparison therefore works segment by segment instead
//! of going through `semver::Version`, and only the pre-release tag is
//! delegated to `semver::Prerelease`. Tags that strict SemVer rejects, such
//! as `beta.01`, are compared identifier by identifier with the same rules.

use std::cmp::Ordering;

use semver::Prerelease;

/// Pre-release tag, strict when `semver` accepts it
#[derive(Debug, Clone, PartialEq, Eq)]
enum PreTag {
    Strict(Prerelease),
    Lenient(String),
}

impl PreTag {
    fn new(tag: &str) -> Self {
        match Prerelease::new(tag) {
            Ok(pre) => Self::Strict(pre),
            Err(_) => Self::Lenient(tag.to_string()),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Strict(pre) => pre.as_str(),
            Self::Lenient(tag) => tag,
        }
    }

    fn cmp_precedence(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Strict(a), Self::Strict(b)) => a.cmp(b),
            _ => cmp_identifiers(self.as_str(), other.as_str()),
        }
    }
}

/// SemVer identifier precedence, tolerating leading zeros and any characters:
/// numeric identifiers compare by value and rank below alphanumeric ones, and
/// a shorter tag ranks below a longer tag it prefixes.
fn cmp_identifiers(a: &str, b: &str) -> Ordering {
    let numeric = |id: &str| {
        if id.bytes().all(|c| c.is_ascii_digit()) {
            id.parse::<u64>().ok()
        } else {
            None
        }
    };

    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        let ord = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match (numeric(x), numeric(y)) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => x.cmp(y),
            },
        };
        if ord.is_ne() {
            return ord;
        }
    }
}

/// A version string split into its comparable parts
#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedVersion {
    release: Vec<u64>,
    pre: Option<PreTag>,
}

impl ParsedVersion {
    fn parse(version: &str) -> Option<Self> {
        let version = strip_v_prefix(version.trim());
        let without_build = version.split_once('+').map_or(version, |(v, _)| v);
        let (release, pre) = match without_build.split_once('-') {
            Some((release, pre)) => (release, Some(pre)),
            None => (without_build, None),
        };

        let release = release
            .split('.')
            .map(|segment| segment.parse::<u64>().ok())
            .collect::<Option<Vec<_>>>()?;

        let pre = match pre {
            Some("") => return None,
            Some(tag) => Some(PreTag::new(tag)),
            None => None,
        };

        Some(Self { release, pre })
    }

    fn cmp_precedence(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        let segment = |parts: &[u64], i: usize| parts.get(i).copied().unwrap_or(0);

        (0..len)
            .map(|i| segment(&self.release, i).cmp(&segment(&other.release, i)))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp_precedence(b),
            })
    }
}

fn strip_v_prefix(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

/// Compare two version strings by precedence.
///
/// Release segments compare numerically with missing segments treated as 0,
/// a pre-release sorts below its release, and build metadata is ignored.
/// A version is malformed when a release segment is not numeric or its
/// pre-release tag is empty. Malformed versions compare lexically among
/// themselves and always rank below well-formed ones, which keeps the
/// ordering total.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (ParsedVersion::parse(a), ParsedVersion::parse(b)) {
        (Some(a), Some(b)) => a.cmp_precedence(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}

/// Sort versions newest first
pub fn sort_descending(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(b, a));
}

/// Parse the major version number (first dot-delimited segment).
///
/// Returns `None` when the leading segment is not numeric.
pub fn major_of(version: &str) -> Option<u64> {
    strip_v_prefix(version.trim())
        .split(['.', '-', '+'])
        .next()?
        .parse()
        .ok()
}

/// Whether the version carries a pre-release tag
pub fn is_prerelease(version: &str) -> bool {
    let without_build = version.split_once('+').map_or(version, |(v, _)| v);
    without_build.contains('-')
}
