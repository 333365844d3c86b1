// Resolve command
// Parses a strategy file and prints the resolved job configurations

use crate::output;

use std::path::PathBuf;

use clap::Args;
use color_eyre::Result;
use matrix_core::{resolve, ContextfulValue, ResultRow, StrategyParser, ValueOrigin};
use serde_json::Value;

/// Resolve a strategy YAML file into its job configurations
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Path to the strategy YAML file
    pub strategy: PathBuf,

    /// Emit JSON instead of the annotated listing
    #[arg(long)]
    pub json: bool,

    /// Drop rows matched by an exclude rule (GitHub Actions semantics)
    #[arg(long)]
    pub skip_excluded: bool,

    /// Flatten rows to plain key/value pairs, dropping provenance
    #[arg(long)]
    pub flat: bool,
}

pub fn execute(args: ResolveArgs) -> Result<()> {
    let declaration = match StrategyParser::parse_file(&args.strategy) {
        Ok(declaration) => declaration,
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    };

    let mut rows = resolve(&declaration);
    if args.skip_excluded {
        rows.retain(|row| !row.is_excluded());
    }

    if args.json {
        let rendered = if args.flat {
            let flat: Vec<Value> = rows.iter().map(flat_object).collect();
            serde_json::to_string_pretty(&flat)?
        } else {
            serde_json::to_string_pretty(&rows)?
        };
        println!("{}", rendered);
        return Ok(());
    }

    output::header(&format!("{} job configuration(s)", rows.len()));
    for (index, row) in rows.iter().enumerate() {
        print_row(index, row, args.flat);
    }

    Ok(())
}

fn flat_object(row: &ResultRow) -> Value {
    let mut object = serde_json::Map::new();
    for (key, value) in row.variables() {
        object.insert(key, value);
    }
    Value::Object(object)
}

fn print_row(index: usize, row: &ResultRow, flat: bool) {
    let fields = if flat {
        row.variables()
            .iter()
            .map(|(key, value)| format!("{}={}", key, render(value)))
            .collect::<Vec<_>>()
            .join("  ")
    } else {
        row.entries
            .iter()
            .map(describe_entry)
            .collect::<Vec<_>>()
            .join("  ")
    };

    match row.exclusion_index {
        Some(rule) => {
            output::dim_failure(&format!("  #{index}  {fields}  [excluded by rule {rule}]"))
        }
        None => println!("  #{index}  {fields}"),
    }
}

/// "key=value <source>" with the source naming the dimension value index or
/// the include rule that attached the field
fn describe_entry(entry: &ContextfulValue) -> String {
    let source = match entry.origin {
        ValueOrigin::Dimension => format!("{}[{}]", entry.key, entry.origin_index),
        ValueOrigin::Include => format!("include[{}]", entry.origin_index),
    };
    let marker = if entry.excluded { "!" } else { "" };
    format!("{}={} <{}{}>", entry.key, render(&entry.value), source, marker)
}

/// Strings print bare; everything else as compact JSON
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
