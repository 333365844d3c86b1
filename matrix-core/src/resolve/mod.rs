// Matrix Resolution Engine
// Expands a matrix declaration into concrete job configurations

mod exclusion;
mod generator;
mod inclusion;

use crate::models::{MatrixDeclaration, ResultRow};

/// Resolve a matrix declaration into the full set of job configurations it
/// denotes.
///
/// Dimension-derived rows come first, in generation order (last-declared
/// dimension varies fastest), already annotated with any matching exclude
/// rule and extended by matching include rules. Standalone rows produced by
/// include rules follow, in rule declaration order.
///
/// Excluded combinations are flagged, not removed: a row matched by an
/// exclude rule keeps its place and records the rule's index in
/// `exclusion_index`. Callers that want GitHub-Actions-style removal filter
/// on `ResultRow::is_excluded`.
///
/// An empty definition contributes no dimension rows, so a declaration with
/// only include rules resolves to exactly those rows and a fully empty
/// declaration resolves to an empty output.
///
/// Pure function of its input: no state is held across calls, and resolving
/// the same declaration twice yields structurally identical output.
pub fn resolve(declaration: &MatrixDeclaration) -> Vec<ResultRow> {
    let mut rows = if declaration.definition.is_empty() {
        Vec::new()
    } else {
        generator::cartesian_rows(&declaration.definition)
    };
    tracing::debug!(count = rows.len(), "generated dimension rows");

    for row in &mut rows {
        exclusion::apply_first_match(row, &declaration.exclude);
    }

    inclusion::apply(&mut rows, &declaration.include, &declaration.definition);
    tracing::debug!(count = rows.len(), "resolved matrix");

    rows
}
