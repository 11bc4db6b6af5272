//! Condition filter
//!
//! Matching is ASCII case-insensitive: a filter of `"Pre-Owned"` accepts
//! listings labelled `"pre-owned"` or `"PRE-OWNED"`.

use crate::listing::ItemRecord;

/// Returns true if `record` passes the optional condition filter
///
/// With no filter every record matches. The result depends only on the
/// record's condition and the filter value.
pub fn matches(record: &ItemRecord, condition_filter: Option<&str>) -> bool {
    match condition_filter {
        None => true,
        Some(wanted) => record.condition.trim().eq_ignore_ascii_case(wanted.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(condition: &str) -> ItemRecord {
        ItemRecord::new("Item", condition, "1.00", "https://www.ebay.com/itm/1").unwrap()
    }

    #[test]
    fn test_no_filter_matches_everything() {
        assert!(matches(&record("New"), None));
        assert!(matches(&record("Unknown"), None));
        assert!(matches(&record(""), None));
    }

    #[test]
    fn test_exact_match() {
        assert!(matches(&record("New"), Some("New")));
        assert!(!matches(&record("Pre-Owned"), Some("New")));
        assert!(!matches(&record("Used"), Some("Pre-Owned")));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(matches(&record("pre-owned"), Some("Pre-Owned")));
        assert!(matches(&record("NEW"), Some("New")));
        assert!(matches(&record(" Used "), Some("used")));
    }

    #[test]
    fn test_no_partial_match() {
        assert!(!matches(&record("New (Other)"), Some("New")));
        assert!(!matches(&record("Brand New"), Some("New")));
    }

    #[test]
    fn test_independent_of_call_order() {
        let new = record("New");
        let used = record("Used");

        let first: Vec<bool> = vec![
            matches(&new, Some("New")),
            matches(&used, Some("New")),
            matches(&new, None),
        ];
        let second: Vec<bool> = vec![
            matches(&new, None),
            matches(&used, Some("New")),
            matches(&new, Some("New")),
        ];

        assert_eq!(first, vec![true, false, true]);
        assert_eq!(second, vec![true, false, true]);
    }
}
