// Validate command
// Parses and schema-checks a strategy file without resolving it

use crate::output;

use std::path::PathBuf;

use clap::Args;
use color_eyre::Result;
use matrix_core::StrategyParser;

/// Parse and schema-check a strategy YAML file
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the strategy YAML file
    pub strategy: PathBuf,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    let strategy_path = &args.strategy;

    if !strategy_path.exists() {
        color_eyre::eyre::bail!("Strategy file not found: {}", strategy_path.display());
    }

    output::status("Validating", &strategy_path.display().to_string());

    let declaration = match StrategyParser::parse_file(strategy_path) {
        Ok(declaration) => declaration,
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    };

    output::check("strategy document valid");
    output::check(&format!(
        "Shape: {} dimension(s), {} include rule(s), {} exclude rule(s)",
        declaration.definition.len(),
        declaration.include.len(),
        declaration.exclude.len()
    ));

    let combinations = if declaration.definition.is_empty() {
        0
    } else {
        declaration.definition.combination_count()
    };
    output::check(&format!("{} dimension combination(s)", combinations));

    Ok(())
}
