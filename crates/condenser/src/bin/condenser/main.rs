mod cli;
mod sample;

use condenser::condenser::Condenser;
use condenser::context::Context;
use std::io::Write;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("CONDENSER_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let context = Context::with_params(cli.params);
    if let Err(e) = render(
        &sample::template(),
        context,
        &cli.output.format,
        std::io::stdout(),
    ) {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

/// Evaluate `condenser` and write the document to `out`
///
/// Nothing is written when any entry failed.
pub fn render(
    condenser: &Condenser,
    context: Context,
    format: &cli::OutputFormat,
    mut out: impl Write,
) -> anyhow::Result<()> {
    for (name, value) in context.params() {
        tracing::info!(%name, %value, "parameter");
    }

    let template = condenser.evaluate(context).into_result()?;

    match format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(&mut out, &template)?,
        cli::OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &template)?;
            writeln!(out)?;
        }
    };

    Ok(())
}
