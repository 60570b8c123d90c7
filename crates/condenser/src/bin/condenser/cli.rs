//! condenser cli interface

use clap::{Parser, ValueEnum};
use std::fmt::Formatter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Publish a NAME=VALUE pair into the evaluation context
    ///
    /// Can be specified multiple times. A bare NAME sets the value to NAME.
    /// The value is everything after the first `=`.
    #[clap(short = 'p', long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw.split_once('=').unwrap_or((raw, raw));

    if name.is_empty() {
        return Err("parameter name must not be empty".to_string());
    }

    Ok((name.to_string(), value.to_string()))
}
