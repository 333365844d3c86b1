// Parser module for strategy documents
// YAML translation and schema validation in front of the resolution engine

pub mod error;
pub mod strategy;

pub use error::{ParseError, ParseResult};
pub use strategy::{StrategyParser, StrategyValidator};
