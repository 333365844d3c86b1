// Exclusion Matcher
// Flags combinations matched by exclude rules; never removes them

use crate::models::{ResultRow, RuleEntry};

/// Match a row against the exclude rules in declaration order.
///
/// The first rule whose every field is structurally equal to the row's
/// field of the same name wins: the row records that rule's index and the
/// named fields are flagged excluded. Later matching rules are ignored.
/// A rule field absent from the row never matches.
///
/// The row itself stays in the result set either way; callers that want
/// excluded combinations gone filter on `ResultRow::is_excluded`.
pub(crate) fn apply_first_match(row: &mut ResultRow, excludes: &[RuleEntry]) {
    let Some(index) = first_match(row, excludes) else {
        return;
    };

    let rule = &excludes[index];
    for entry in &mut row.entries {
        if rule.contains_key(&entry.key) {
            entry.excluded = true;
        }
    }
    row.exclusion_index = Some(index);
}

fn first_match(row: &ResultRow, excludes: &[RuleEntry]) -> Option<usize> {
    excludes.iter().position(|rule| {
        rule.iter()
            .all(|(key, value)| row.value_of(key) == Some(value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContextfulValue;
    use serde_json::json;

    fn fruit_animal_row(fruit: &str, animal: &str) -> ResultRow {
        ResultRow::new(vec![
            ContextfulValue::dimension("fruit", json!(fruit), 0),
            ContextfulValue::dimension("animal", json!(animal), 0),
        ])
    }

    #[test]
    fn test_matching_rule_flags_named_fields() {
        let mut row = fruit_animal_row("apple", "dog");
        let excludes: Vec<RuleEntry> = vec![[("fruit", json!("apple")), ("animal", json!("dog"))]
            .into_iter()
            .collect()];

        apply_first_match(&mut row, &excludes);

        assert_eq!(row.exclusion_index, Some(0));
        assert!(row.entries.iter().all(|e| e.excluded));
    }

    #[test]
    fn test_partial_rule_flags_only_named_fields() {
        let mut row = fruit_animal_row("apple", "dog");
        let excludes: Vec<RuleEntry> = vec![[("animal", json!("dog"))].into_iter().collect()];

        apply_first_match(&mut row, &excludes);

        assert_eq!(row.exclusion_index, Some(0));
        assert!(!row.get("fruit").unwrap().excluded);
        assert!(row.get("animal").unwrap().excluded);
    }

    #[test]
    fn test_no_match_leaves_row_untouched() {
        let mut row = fruit_animal_row("pear", "cat");
        let excludes: Vec<RuleEntry> = vec![[("fruit", json!("apple")), ("animal", json!("dog"))]
            .into_iter()
            .collect()];

        apply_first_match(&mut row, &excludes);

        assert_eq!(row.exclusion_index, None);
        assert!(row.entries.iter().all(|e| !e.excluded));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let mut row = fruit_animal_row("apple", "dog");
        let excludes: Vec<RuleEntry> = vec![
            [("fruit", json!("pear"))].into_iter().collect(),
            [("animal", json!("dog"))].into_iter().collect(),
            [("fruit", json!("apple"))].into_iter().collect(),
        ];

        apply_first_match(&mut row, &excludes);

        // Rules 1 and 2 both match; the lower index is recorded and only
        // rule 1's fields are flagged
        assert_eq!(row.exclusion_index, Some(1));
        assert!(row.get("animal").unwrap().excluded);
        assert!(!row.get("fruit").unwrap().excluded);
    }

    #[test]
    fn test_field_absent_from_row_never_matches() {
        let mut row = fruit_animal_row("apple", "dog");
        let excludes: Vec<RuleEntry> = vec![[("fruit", json!("apple")), ("season", json!("winter"))]
            .into_iter()
            .collect()];

        apply_first_match(&mut row, &excludes);

        assert_eq!(row.exclusion_index, None);
    }

    #[test]
    fn test_mismatched_value_kind_degrades_to_non_match() {
        let mut row = fruit_animal_row("apple", "dog");
        let excludes: Vec<RuleEntry> = vec![[("fruit", json!(42))].into_iter().collect()];

        apply_first_match(&mut row, &excludes);

        assert_eq!(row.exclusion_index, None);
    }
}
