//! Name matching policy, isolated behind a trait so the reconciliation
//! engine never has to know how fuzzy the join is.
//!
//! The default [`TwoPhaseMatcher`] reproduces the historical behavior of
//! the dataset join: exact match on normalized form first, then a
//! hard-coded equivalence table, then substring containment in either
//! direction with first-match-wins. The substring fallback is
//! order-dependent and can in principle mis-join two districts sharing a
//! common substring; [`ExactMatcher`] is the strict drop-in for callers
//! that prefer missing data over a wrong join.

/// Decides which candidate key a target name matches, if any.
///
/// Both the target and the candidates are already normalized
/// ([`crate::normalize::normalize`]).
pub trait NameMatcher {
    /// Returns the index of the first matching candidate.
    fn find(&self, target: &str, candidates: &[String]) -> Option<usize>;
}

/// Districts known under two different official names across datasets,
/// normalized form on both sides.
const EQUIVALENT_NAMES: &[(&str, &str)] = &[
    ("bandung timur", "bandung wetan"),
    ("bandung barat", "bandung kulon"),
    ("ujungberung", "ujung berung"),
];

/// Exact match, then the equivalence table, then substring containment
/// in either direction. First match wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoPhaseMatcher;

impl NameMatcher for TwoPhaseMatcher {
    fn find(&self, target: &str, candidates: &[String]) -> Option<usize> {
        if target.is_empty() {
            return None;
        }

        if let Some(idx) = candidates.iter().position(|c| c == target) {
            return Some(idx);
        }

        for (a, b) in EQUIVALENT_NAMES {
            let other = if target == *a {
                b
            } else if target == *b {
                a
            } else {
                continue;
            };
            if let Some(idx) = candidates.iter().position(|c| c == other) {
                return Some(idx);
            }
        }

        candidates
            .iter()
            .position(|c| !c.is_empty() && (c.contains(target) || target.contains(c.as_str())))
    }
}

/// Exact match only. Swap in where a silent mis-join would be worse than
/// a gray "no data" district.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl NameMatcher for ExactMatcher {
    fn find(&self, target: &str, candidates: &[String]) -> Option<usize> {
        if target.is_empty() {
            return None;
        }
        candidates.iter().position(|c| c == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn exact_match_wins_over_substring() {
        let candidates = keys(&["sukajadi raya", "sukajadi"]);
        let matcher = TwoPhaseMatcher;
        assert_eq!(matcher.find("sukajadi", &candidates), Some(1));
    }

    #[test]
    fn substring_fallback_matches_either_direction() {
        let matcher = TwoPhaseMatcher;
        assert_eq!(matcher.find("sukajadi", &keys(&["kec. sukajadi"])), Some(0));
        assert_eq!(matcher.find("kec. sukajadi", &keys(&["sukajadi"])), Some(0));
    }

    #[test]
    fn substring_fallback_is_first_match_wins() {
        // "sukasari" and "sukajadi" both contain "suka"; the first
        // candidate in input order is taken.
        let matcher = TwoPhaseMatcher;
        assert_eq!(matcher.find("suka", &keys(&["sukasari", "sukajadi"])), Some(0));
    }

    #[test]
    fn equivalence_table_bridges_renamed_districts() {
        let matcher = TwoPhaseMatcher;
        assert_eq!(
            matcher.find("bandung timur", &keys(&["cibiru", "bandung wetan"])),
            Some(1)
        );
    }

    #[test]
    fn empty_target_never_matches() {
        let matcher = TwoPhaseMatcher;
        assert_eq!(matcher.find("", &keys(&["", "cibiru"])), None);
    }

    #[test]
    fn exact_matcher_skips_fuzzy() {
        let matcher = ExactMatcher;
        assert_eq!(matcher.find("sukajadi", &keys(&["kec. sukajadi"])), None);
        assert_eq!(matcher.find("sukajadi", &keys(&["sukajadi"])), Some(0));
    }
}
