//! Order-preserving deduplication

use std::collections::HashSet;
use std::hash::Hash;

/// Keep only the first occurrence of each key, preserving relative order.
pub fn dedup_by_key<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// Remove duplicate strings, keeping first-seen order
pub fn dedup_strings(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nuget::types::PackageCandidate;
    use rstest::rstest;

    #[rstest]
    #[case(vec![], vec![])]
    #[case(vec!["2.0.0", "2.0.0", "1.0.0"], vec!["2.0.0", "1.0.0"])]
    #[case(vec!["b", "a", "b", "c", "a"], vec!["b", "a", "c"])]
    #[case(vec!["1.0.0", "1.0.1"], vec!["1.0.0", "1.0.1"])]
    fn dedup_strings_keeps_first_occurrence(
        #[case] input: Vec<&str>,
        #[case] expected: Vec<&str>,
    ) {
        let input: Vec<String> = input.into_iter().map(String::from).collect();
        assert_eq!(dedup_strings(input), expected);
    }

    #[test]
    fn dedup_by_key_keeps_first_candidate_per_id() {
        let candidates = vec![
            PackageCandidate::new("Serilog", "4.0.0"),
            PackageCandidate::new("Serilog.Sinks.Console", "6.0.0"),
            PackageCandidate::new("Serilog", "3.1.1"),
        ];

        let result = dedup_by_key(candidates, |c| c.id.clone());

        assert_eq!(
            result,
            vec![
                PackageCandidate::new("Serilog", "4.0.0"),
                PackageCandidate::new("Serilog.Sinks.Console", "6.0.0"),
            ]
        );
    }
}
