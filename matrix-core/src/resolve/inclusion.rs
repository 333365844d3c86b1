// Inclusion Resolver
// Classifies each include rule and merges it into the accumulated rows

use crate::models::{ContextfulValue, MatrixDefinition, ResultRow, RuleEntry};

/// The merge strategy an include rule resolves to, computed once per rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IncludeAction {
    /// The rule names a value no dimension declares (or the definition is
    /// empty): it becomes a standalone new row.
    NewRow,
    /// The rule pins at least one declared dimension value: it extends only
    /// the rows whose dimension fields all match the rule.
    Extend,
    /// The rule shares no key with the definition: it extends every row.
    ExtendAll,
}

/// Classify an include rule against the matrix definition.
///
/// `NewRow` takes priority: a rule that both introduces an undeclared value
/// and pins a declared one still becomes a standalone row.
pub(crate) fn classify(rule: &RuleEntry, definition: &MatrixDefinition) -> IncludeAction {
    let introduces_new_value = definition.is_empty()
        || rule.iter().any(|(key, value)| {
            definition.contains_key(key) && !definition.declares_value(key, value)
        });
    if introduces_new_value {
        return IncludeAction::NewRow;
    }

    let extends_existing_value = rule
        .iter()
        .any(|(key, value)| definition.declares_value(key, value));
    if extends_existing_value {
        IncludeAction::Extend
    } else {
        IncludeAction::ExtendAll
    }
}

/// Process the include rules in declaration order against the accumulated
/// dimension rows.
///
/// Standalone new rows are buffered and appended only after every rule has
/// run, so a later rule's extension never touches a row an earlier rule
/// created; new rows are final as emitted.
pub(crate) fn apply(
    rows: &mut Vec<ResultRow>,
    includes: &[RuleEntry],
    definition: &MatrixDefinition,
) {
    let mut appended = Vec::new();

    for (rule_index, rule) in includes.iter().enumerate() {
        let action = classify(rule, definition);
        tracing::debug!(rule_index, ?action, "handle include rule");

        match action {
            IncludeAction::NewRow => appended.push(standalone_row(rule, rule_index)),
            IncludeAction::Extend => {
                for row in rows.iter_mut() {
                    if qualifies(row, rule, definition) {
                        extend_row(row, rule, rule_index, definition);
                    }
                }
            }
            IncludeAction::ExtendAll => {
                for row in rows.iter_mut() {
                    extend_row(row, rule, rule_index, definition);
                }
            }
        }
    }

    rows.append(&mut appended);
}

/// A row qualifies for targeted extension when every rule field that names
/// a declared dimension matches the row's value for it. Fields outside the
/// definition impose no constraint.
fn qualifies(row: &ResultRow, rule: &RuleEntry, definition: &MatrixDefinition) -> bool {
    rule.iter().all(|(key, value)| {
        !definition.contains_key(key) || row.value_of(key) == Some(value)
    })
}

/// Attach the rule's non-dimension fields to a row. Dimension fields named
/// by the rule are not re-added; the row already carries the matching value.
fn extend_row(row: &mut ResultRow, rule: &RuleEntry, rule_index: usize, definition: &MatrixDefinition) {
    for (key, value) in rule.iter() {
        if !definition.contains_key(key) {
            row.entries
                .push(ContextfulValue::include(key, value.clone(), rule_index));
        }
    }
}

fn standalone_row(rule: &RuleEntry, rule_index: usize) -> ResultRow {
    ResultRow::new(
        rule.iter()
            .map(|(key, value)| ContextfulValue::include(key, value.clone(), rule_index))
            .collect(),
    )
}
