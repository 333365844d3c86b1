// Cartesian Generator
// Expands the declared dimensions into every combination, odometer order

use crate::models::{ContextfulValue, MatrixDefinition, ResultRow};

/// Produce the full cartesian product of the declared dimensions.
///
/// Rows come out in odometer order: the last-declared dimension varies
/// fastest, the first-declared slowest, exactly as if generated by nested
/// loops with the first dimension outermost. Every row carries one
/// provenance-tagged field per dimension.
///
/// Zero dimensions produce the empty product: a single row with no fields.
pub(crate) fn cartesian_rows(definition: &MatrixDefinition) -> Vec<ResultRow> {
    let total = definition.combination_count();
    let mut indexes = vec![0usize; definition.len()];
    let mut rows = Vec::with_capacity(total);

    for _ in 0..total {
        let entries = definition
            .iter()
            .zip(indexes.iter())
            .map(|((key, values), &index)| {
                ContextfulValue::dimension(key, values[index].clone(), index)
            })
            .collect();
        rows.push(ResultRow::new(entries));
        advance(&mut indexes, definition);
    }

    rows
}

/// Increment the odometer: bump the last index, carry leftward on wrap.
fn advance(indexes: &mut [usize], definition: &MatrixDefinition) {
    for (slot, (_, values)) in indexes.iter_mut().zip(definition.iter()).rev() {
        *slot += 1;
        if *slot < values.len() {
            break;
        }
        *slot = 0;
    }
}
