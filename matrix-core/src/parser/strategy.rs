// Strategy Document Parser
// Translates a YAML `strategy.matrix` block into a typed MatrixDeclaration

use crate::models::{MatrixDeclaration, RuleEntry};
use crate::parser::error::{ParseError, ParseResult};

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;

/// Envelope of a strategy document:
///
/// ```yaml
/// strategy:
///   matrix:
///     version: [10, 12, 14]
///     os: [ubuntu-latest, windows-latest]
///     include:
///       - os: windows-latest
///         npm: 6
///     exclude:
///       - version: 10
/// ```
#[derive(Debug, Deserialize)]
struct StrategyDoc {
    strategy: StrategySection,
}

#[derive(Debug, Deserialize)]
struct StrategySection {
    matrix: MatrixSection,
}

/// The `matrix` mapping. `include` and `exclude` are reserved keys holding
/// rule lists; every other key declares a dimension. Dimension order in the
/// document is the generation order, so deserialization walks the mapping
/// in order instead of going through a hash map.
#[derive(Debug)]
struct MatrixSection(MatrixDeclaration);

impl<'de> Deserialize<'de> for MatrixSection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MatrixVisitor;

        impl<'de> Visitor<'de> for MatrixVisitor {
            type Value = MatrixSection;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a matrix mapping of dimensions plus optional include/exclude")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
                let mut declaration = MatrixDeclaration::default();
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "include" => declaration.include = map.next_value::<Vec<RuleEntry>>()?,
                        "exclude" => declaration.exclude = map.next_value::<Vec<RuleEntry>>()?,
                        _ => {
                            let values = map.next_value::<Vec<Value>>()?;
                            declaration.definition.insert(key, values);
                        }
                    }
                }
                Ok(MatrixSection(declaration))
            }
        }

        deserializer.deserialize_map(MatrixVisitor)
    }
}

/// Strategy document parser
pub struct StrategyParser;

impl StrategyParser {
    /// Parse a strategy document from a YAML string and validate it.
    pub fn parse(content: &str) -> ParseResult<MatrixDeclaration> {
        let doc: StrategyDoc = serde_yaml::from_str(content)?;
        let declaration = doc.strategy.matrix.0;
        StrategyValidator::validate(&declaration)?;
        Ok(declaration)
    }

    /// Parse a strategy document from a file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> ParseResult<MatrixDeclaration> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

/// Schema checks the resolution engine's precondition assumes. The engine
/// itself accepts any well-typed declaration; these run once at the
/// boundary.
pub struct StrategyValidator;

impl StrategyValidator {
    pub fn validate(declaration: &MatrixDeclaration) -> ParseResult<()> {
        for (name, values) in declaration.definition.iter() {
            if values.is_empty() {
                return Err(ParseError::EmptyDimension {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }
}
