mod config;
mod logging;

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use templar_generate::{GenerationError, LocaleKey, MockEngine, PlaceholderRegistry};
use thiserror::Error;

use logging::{LogFormat, init_logging};

#[derive(Debug, Error)]
enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("template error: {0}")]
    Template(#[from] templar_core::Error),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "templar", version, about = "Rule-driven mock data from JSON templates")]
struct Cli {
    /// Log output format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Human, global = true)]
    log_format: LogFormat,
    /// Also append JSON logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate data from a JSON template.
    Generate(GenerateArgs),
    /// List built-in placeholders with their accepted argument counts.
    Placeholders,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Template file, or `-` to read stdin.
    #[arg(value_name = "TEMPLATE")]
    template: String,
    /// Number of independent generations; more than one yields a JSON array.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    count: u64,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Locale for words and names (en_US, pt_BR, zh_CN).
    #[arg(long)]
    locale: Option<LocaleKey>,
    /// TOML file with `seed` and `locale`; flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Indent the output.
    #[arg(long, default_value_t = false)]
    pretty: bool,
    /// Write output to a file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_file.as_deref())?;

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Placeholders => run_placeholders(),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let options = config::resolve_options(args.config.as_deref(), args.seed, args.locale)?;
    let text = read_template(&args.template)?;
    let template = templar_core::parse(&text)?;

    tracing::info!(
        event = "generation_started",
        template = %args.template,
        count = args.count,
        seed = ?options.seed,
        locale = %options.locale
    );
    let timer = Instant::now();

    let engine = MockEngine::from_options(&options);
    let output = if args.count == 1 {
        engine.generate(&template)
    } else {
        Value::Array((0..args.count).map(|_| engine.generate(&template)).collect())
    };

    let rendered = if args.pretty {
        templar_core::stringify_pretty(&output)?
    } else {
        templar_core::stringify(&output)?
    };

    match &args.out {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))?;
            tracing::info!(event = "output_written", path = %path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{rendered}")?;
        }
    }

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(event = "generation_finished", status = "success", duration_ms = duration_ms);
    Ok(())
}

fn run_placeholders() -> Result<(), CliError> {
    let registry = PlaceholderRegistry::new();
    let mut stdout = io::stdout().lock();
    for (name, arities) in registry.catalogue() {
        let arities: Vec<String> = arities.iter().map(ToString::to_string).collect();
        writeln!(stdout, "{name}/{}", arities.join(","))?;
    }
    Ok(())
}

fn read_template(source: &str) -> Result<String, CliError> {
    if source == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(std::fs::read_to_string(source)?)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use templar_generate::LocaleKey;

    use super::{Cli, Command};
    use crate::logging::LogFormat;

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "templar", "generate", "-", "--count", "3", "--seed", "7", "--locale", "pt-BR",
            "--pretty", "--log-format", "json",
        ])
        .expect("valid arguments");
        assert_eq!(cli.log_format, LogFormat::Json);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.template, "-");
        assert_eq!(args.count, 3);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.locale, Some(LocaleKey::PtBr));
        assert!(args.pretty);
    }

    #[test]
    fn rejects_zero_count_and_unknown_locale() {
        assert!(Cli::try_parse_from(["templar", "generate", "t.json", "--count", "0"]).is_err());
        assert!(Cli::try_parse_from(["templar", "generate", "t.json", "--locale", "xx"]).is_err());
    }
}
