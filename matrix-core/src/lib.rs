// Matrix Core Library
// Resolves build-matrix declarations into concrete job configurations

pub mod models;
pub mod parser;
pub mod resolve;

// Re-export commonly used types
pub use models::{
    ContextfulValue, MatrixDeclaration, MatrixDefinition, ResultRow, RuleEntry, ValueOrigin,
};
pub use parser::{ParseError, ParseResult, StrategyParser, StrategyValidator};
pub use resolve::resolve;
