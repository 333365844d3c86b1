// Matrix Declaration Data Models
// Typed representation of a build-matrix declaration and its resolved rows

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

// =============================================================================
// Matrix Definition
// =============================================================================

/// The declared dimensions of a matrix: an ordered map from dimension name
/// to that dimension's ordered list of values.
///
/// Declaration order is significant on both levels: key order fixes the
/// generation order of the cartesian product, and value order within a key
/// is the value's provenance index. Backed by a vector of pairs so that
/// order survives deserialization and iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixDefinition {
    dimensions: Vec<(String, Vec<Value>)>,
}

impl MatrixDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: add (or replace) a dimension, keeping its original
    /// position when replacing.
    pub fn with_dimension(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = Value>,
    ) -> Self {
        self.insert(name.into(), values.into_iter().collect());
        self
    }

    /// Insert a dimension. A duplicate name replaces the value list in place
    /// without changing the dimension's position.
    pub fn insert(&mut self, name: String, values: Vec<Value>) {
        match self.dimensions.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = values,
            None => self.dimensions.push((name, values)),
        }
    }

    /// Number of declared dimensions.
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.dimensions.iter().any(|(k, _)| k == name)
    }

    /// The declared values for a dimension, if it exists.
    pub fn values(&self, name: &str) -> Option<&[Value]> {
        self.dimensions
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Whether `value` is structurally equal to one of the values declared
    /// for dimension `name`. False if the dimension does not exist.
    pub fn declares_value(&self, name: &str, value: &Value) -> bool {
        self.values(name)
            .is_some_and(|values| values.iter().any(|v| v == value))
    }

    /// Iterate dimensions in declaration order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &[Value])> + ExactSizeIterator {
        self.dimensions
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Total number of combinations the dimensions denote. The empty
    /// product is 1 (the single zero-field combination).
    pub fn combination_count(&self) -> usize {
        self.dimensions.iter().map(|(_, v)| v.len()).product()
    }
}

impl Serialize for MatrixDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.dimensions.len()))?;
        for (name, values) in &self.dimensions {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

/// Order-preserving map deserializer: a plain `HashMap` would scramble the
/// declaration order that generation depends on.
impl<'de> Deserialize<'de> for MatrixDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DefinitionVisitor;

        impl<'de> Visitor<'de> for DefinitionVisitor {
            type Value = MatrixDefinition;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of dimension names to value lists")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
                let mut definition = MatrixDefinition::new();
                while let Some((name, values)) = map.next_entry::<String, Vec<Value>>()? {
                    definition.insert(name, values);
                }
                Ok(definition)
            }
        }

        deserializer.deserialize_map(DefinitionVisitor)
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<Value>)> for MatrixDefinition {
    fn from_iter<I: IntoIterator<Item = (K, Vec<Value>)>>(iter: I) -> Self {
        let mut definition = MatrixDefinition::new();
        for (name, values) in iter {
            definition.insert(name.into(), values);
        }
        definition
    }
}

// =============================================================================
// Rule Entry
// =============================================================================

/// One include or exclude rule: an ordered map from field name to a single
/// value. Field names need not name declared dimensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleEntry {
    fields: Vec<(String, Value)>,
}

impl RuleEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: add (or replace) a field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name.into(), value.into());
        self
    }

    /// Insert a field. A duplicate name replaces the value in place.
    pub fn insert(&mut self, name: String, value: Value) {
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for RuleEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RuleEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RuleVisitor;

        impl<'de> Visitor<'de> for RuleVisitor {
            type Value = RuleEntry;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of field names to values")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
                let mut rule = RuleEntry::new();
                while let Some((name, value)) = map.next_entry::<String, Value>()? {
                    rule.insert(name, value);
                }
                Ok(rule)
            }
        }

        deserializer.deserialize_map(RuleVisitor)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RuleEntry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut rule = RuleEntry::new();
        for (name, value) in iter {
            rule.insert(name.into(), value.into());
        }
        rule
    }
}

// =============================================================================
// Matrix Declaration
// =============================================================================

/// A full matrix declaration: the declared dimensions plus optional
/// include/exclude rule lists, both in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixDeclaration {
    /// Declared dimensions
    #[serde(default)]
    pub definition: MatrixDefinition,

    /// Include rules, processed in order after exclusion
    #[serde(default)]
    pub include: Vec<RuleEntry>,

    /// Exclude rules, matched first-wins in order
    #[serde(default)]
    pub exclude: Vec<RuleEntry>,
}

impl MatrixDeclaration {
    pub fn new(definition: MatrixDefinition) -> Self {
        Self {
            definition,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    pub fn with_include(mut self, rule: RuleEntry) -> Self {
        self.include.push(rule);
        self
    }

    pub fn with_exclude(mut self, rule: RuleEntry) -> Self {
        self.exclude.push(rule);
        self
    }
}

// =============================================================================
// Resolved rows
// =============================================================================

/// Where a resolved field came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueOrigin {
    /// Produced by cartesian expansion of a declared dimension
    Dimension,
    /// Attached by an include rule
    Include,
}

/// One resolved field of a result row, carrying its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextfulValue {
    /// Field name (dimension name or include-rule field name)
    pub key: String,
    /// Resolved value
    pub value: Value,
    /// Whether the value came from a dimension or an include rule
    pub origin: ValueOrigin,
    /// Position within the source: the value's index in its dimension's
    /// list, or the include rule's index in the include list
    pub origin_index: usize,
    /// Set when an exclude rule naming this field matched the row
    pub excluded: bool,
}

impl ContextfulValue {
    pub fn dimension(key: impl Into<String>, value: Value, origin_index: usize) -> Self {
        Self {
            key: key.into(),
            value,
            origin: ValueOrigin::Dimension,
            origin_index,
            excluded: false,
        }
    }

    pub fn include(key: impl Into<String>, value: Value, origin_index: usize) -> Self {
        Self {
            key: key.into(),
            value,
            origin: ValueOrigin::Include,
            origin_index,
            excluded: false,
        }
    }
}

/// One fully resolved job configuration.
///
/// Entries are in attachment order: dimension fields first (definition key
/// order), then any include-attached fields. An excluded combination stays
/// in the output; `exclusion_index` names the exclude rule that matched it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultRow {
    pub entries: Vec<ContextfulValue>,

    /// Index of the first matching exclude rule, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion_index: Option<usize>,
}

impl ResultRow {
    pub fn new(entries: Vec<ContextfulValue>) -> Self {
        Self {
            entries,
            exclusion_index: None,
        }
    }

    /// The first entry with the given key.
    pub fn get(&self, key: &str) -> Option<&ContextfulValue> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// The first value attached under the given key.
    pub fn value_of(&self, key: &str) -> Option<&Value> {
        self.get(key).map(|e| &e.value)
    }

    /// Whether any exclude rule matched this row.
    pub fn is_excluded(&self) -> bool {
        self.exclusion_index.is_some()
    }

    /// Flatten the row to plain key/value pairs, dropping provenance.
    /// Pairs keep attachment order; a later duplicate key wins.
    pub fn variables(&self) -> Vec<(String, Value)> {
        let mut variables: Vec<(String, Value)> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            match variables.iter_mut().find(|(k, _)| *k == entry.key) {
                Some((_, existing)) => *existing = entry.value.clone(),
                None => variables.push((entry.key.clone(), entry.value.clone())),
            }
        }
        variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_definition_preserves_declaration_order() {
        let definition: MatrixDefinition = [
            ("zeta", vec![json!(1)]),
            ("alpha", vec![json!(2)]),
            ("mid", vec![json!(3)]),
        ]
        .into_iter()
        .collect();

        let keys: Vec<_> = definition.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_definition_insert_replaces_in_place() {
        let mut definition = MatrixDefinition::new()
            .with_dimension("os", [json!("linux")])
            .with_dimension("arch", [json!("x86_64")]);
        definition.insert("os".to_string(), vec![json!("macos")]);

        let keys: Vec<_> = definition.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["os", "arch"]);
        assert_eq!(definition.values("os"), Some(&[json!("macos")][..]));
    }

    #[test]
    fn test_declares_value_uses_structural_equality() {
        let definition = MatrixDefinition::new()
            .with_dimension("config", [json!({"opt": true, "lto": "thin"})]);

        // Key order in the probe differs; equality is structural
        assert!(definition.declares_value("config", &json!({"lto": "thin", "opt": true})));
        assert!(!definition.declares_value("config", &json!({"opt": false, "lto": "thin"})));
        assert!(!definition.declares_value("missing", &json!(true)));
    }

    #[test]
    fn test_combination_count() {
        let definition = MatrixDefinition::new()
            .with_dimension("a", [json!(1), json!(2), json!(3)])
            .with_dimension("b", [json!("x"), json!("y")]);
        assert_eq!(definition.combination_count(), 6);
        assert_eq!(MatrixDefinition::new().combination_count(), 1);
    }

    #[test]
    fn test_rule_entry_order_and_lookup() {
        let rule: RuleEntry = [("os", json!("windows-latest")), ("npm", json!(6))]
            .into_iter()
            .collect();

        let keys: Vec<_> = rule.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["os", "npm"]);
        assert_eq!(rule.get("npm"), Some(&json!(6)));
        assert_eq!(rule.get("node"), None);
    }

    #[test]
    fn test_declaration_deserializes_from_json() {
        let declaration: MatrixDeclaration = serde_json::from_value(json!({
            "definition": { "version": [10, 12], "os": ["ubuntu-latest"] },
            "exclude": [{ "version": 10 }]
        }))
        .unwrap();

        let keys: Vec<_> = declaration.definition.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["version", "os"]);
        assert!(declaration.include.is_empty());
        assert_eq!(declaration.exclude.len(), 1);
        assert_eq!(declaration.exclude[0].get("version"), Some(&json!(10)));
    }

    #[test]
    fn test_row_variables_last_write_wins() {
        let mut row = ResultRow::new(vec![
            ContextfulValue::dimension("os", json!("linux"), 0),
            ContextfulValue::dimension("node", json!(14), 1),
        ]);
        row.entries
            .push(ContextfulValue::include("node", json!(16), 0));

        assert_eq!(
            row.variables(),
            vec![
                ("os".to_string(), json!("linux")),
                ("node".to_string(), json!(16)),
            ]
        );
    }
}
