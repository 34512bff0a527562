//! Version curation: a short, ranked list of versions worth offering
//!
//! Full version histories run into the hundreds. Users updating a dependency
//! mostly want the newest few releases of the current major line, plus the
//! newest release of each of the previous few major lines.

use std::collections::BTreeMap;

use tracing::debug;

use crate::nuget::dedup::dedup_strings;
use crate::nuget::error::RegistryError;
use crate::nuget::index::PackageIndex;
use crate::nuget::semver::{is_prerelease, major_of, sort_descending};

/// Number of versions taken from the newest major line
pub const PRIMARY_VERSION_COUNT: usize = 3;

/// Number of older major lines represented by their newest version
pub const OLDER_MAJOR_COUNT: usize = 3;

/// Versions grouped by major number, each group keeping input order
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MajorBuckets {
    buckets: BTreeMap<u64, Vec<String>>,
}

impl MajorBuckets {
    /// Partition versions by major number.
    ///
    /// Versions without a numeric major cannot be placed in a line and are skipped.
    pub fn from_versions(versions: &[String]) -> Self {
        let mut buckets: BTreeMap<u64, Vec<String>> = BTreeMap::new();
        for version in versions {
            match major_of(version) {
                Some(major) => buckets.entry(major).or_default().push(version.clone()),
                None => debug!("Skipping version without numeric major: {}", version),
            }
        }
        Self { buckets }
    }

    /// Distinct majors, highest first
    pub fn majors_descending(&self) -> impl Iterator<Item = u64> + '_ {
        self.buckets.keys().rev().copied()
    }

    /// Versions sharing the given major
    pub fn get(&self, major: u64) -> &[String] {
        self.buckets.get(&major).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Sort newest first, then drop duplicates
pub fn prepare_version_list(raw: Vec<String>) -> Vec<String> {
    let mut versions = raw;
    sort_descending(&mut versions);
    dedup_strings(versions)
}

/// Select the curated subset of a prepared (descending, deduplicated) version list.
///
/// Returns the first [`PRIMARY_VERSION_COUNT`] versions of the highest major,
/// followed by the newest version of each of the next [`OLDER_MAJOR_COUNT`] majors.
pub fn curate_versions(versions: &[String]) -> Vec<String> {
    let buckets = MajorBuckets::from_versions(versions);
    let mut majors = buckets.majors_descending();

    let Some(top_major) = majors.next() else {
        return Vec::new();
    };

    let mut result: Vec<String> = buckets
        .get(top_major)
        .iter()
        .take(PRIMARY_VERSION_COUNT)
        .cloned()
        .collect();

    result.extend(
        majors
            .take(OLDER_MAJOR_COUNT)
            .filter_map(|major| buckets.get(major).first().cloned()),
    );

    result
}

/// Fetch every version of `id` and return the curated shortlist
pub async fn curated_versions(
    index: &dyn PackageIndex,
    id: &str,
    include_prerelease: bool,
) -> Result<Vec<String>, RegistryError> {
    let mut raw = index.search_exact(id, include_prerelease).await?;
    let raw_count = raw.len();
    // Some sources list prerelease versions regardless of the flag
    if !include_prerelease {
        raw.retain(|version| !is_prerelease(version));
    }
    let curated = curate_versions(&prepare_version_list(raw));
    debug!(
        "Curated {} of {} versions for {}",
        curated.len(),
        raw_count,
        id
    );
    Ok(curated)
}
