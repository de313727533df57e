//! Command-line interface for rwn
//! This binary parses workout notation and prints its canonical name, estimate, diagnostics or
//! one of the structural formats.
//!
//! Usage:
//!   rwn `<notation>` [--format `<format>`]          - Parse notation given on the command line
//!   rwn --file `<path>` [--format `<format>`]       - Parse notation read from a file
//!   rwn `<notation>` --split bike=1:45 --reference 2k=1:40
//!                                                - Override estimate paces
//!   rwn --list-formats                           - List all available output formats
//!
//! Exit status is 1 when the notation produced an error diagnostic, 2 for usage and
//! configuration problems. Set `RWN_LOG=debug` to trace the pipeline on stderr.

use clap::{Arg, ArgAction, ArgMatches, Command};
use rwn::rwn::ast::{format_clock, Chain, Diagnostic, SyntaxError};
use rwn::rwn::estimate::Estimate;
use rwn::rwn::formats::{FormatError, FormatRegistry, Formatter};
use rwn::rwn::lexing::tokenize;
use rwn::{Engine, ParseOutcome};
use rwn_config::Loader;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const EXIT_DIAGNOSTICS: i32 = 1;
const EXIT_USAGE: i32 = 2;

/// Formats handled here rather than through the registry, with descriptions
const BUILTIN_FORMATS: [(&str, &str); 3] = [
    ("summary", "Canonical name, estimate and diagnostics (default)"),
    ("diagnostics", "Diagnostics only, one per line"),
    ("tokens", "Token stream with byte spans"),
];

/// AST as pretty printed JSON
struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn description(&self) -> &'static str {
        "AST as JSON"
    }

    fn render(&self, chain: &Chain) -> Result<String, FormatError> {
        serde_json::to_string_pretty(chain)
            .map(|json| json + "\n")
            .map_err(|e| FormatError::render(self.name(), e))
    }
}

/// AST as YAML
struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn description(&self) -> &'static str {
        "AST as YAML"
    }

    fn render(&self, chain: &Chain) -> Result<String, FormatError> {
        serde_yaml::to_string(chain).map_err(|e| FormatError::render(self.name(), e))
    }
}

fn build_registry() -> FormatRegistry {
    let mut registry = FormatRegistry::with_defaults();
    registry.register(JsonFormatter);
    registry.register(YamlFormatter);
    registry
}

fn main() {
    let matches = Command::new("rwn")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse, validate, name and estimate Rowing Workout Notation")
        .arg_required_else_help(true)
        .arg(
            Arg::new("notation")
                .help("Workout notation, e.g. '4x500m/1:00r'")
                .required_unless_present_any(["file", "list-formats"])
                .conflicts_with("file")
                .index(1),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .help("Read the notation from a file"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (see --list-formats)")
                .default_value("summary"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("split")
                .long("split")
                .help("Split per 500m for a modality, e.g. 'bike=1:45'")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("reference")
                .long("reference")
                .help("Personal pace per 500m for a reference distance, e.g. '2k=1:40'")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging();
    let registry = build_registry();

    if matches.get_flag("list-formats") {
        handle_list_formats_command(&registry);
        return;
    }

    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("summary");
    let is_builtin = BUILTIN_FORMATS.iter().any(|(name, _)| *name == format);
    if !is_builtin && !registry.contains(format) {
        eprintln!("Unknown format '{}'", format);
        eprintln!("Run 'rwn --list-formats' to see the available formats");
        process::exit(EXIT_USAGE);
    }

    let engine = build_engine(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        process::exit(EXIT_USAGE);
    });
    let text = read_notation(&matches).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(EXIT_USAGE);
    });

    let status = match format {
        "tokens" => handle_tokens_command(&engine, &text),
        _ => {
            let outcome = engine.parse_workout(&text);
            handle_outcome(&outcome, format, &registry)
        }
    };
    process::exit(status);
}

/// Install a stderr subscriber filtered by `RWN_LOG`; silent when unset
fn init_logging() {
    let filter = EnvFilter::try_from_env("RWN_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Split a `key=value` option into its parts
fn key_value<'a>(option: &str, raw: &'a str) -> Result<(&'a str, &'a str), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() && !value.trim().is_empty() => {
            Ok((key.trim(), value.trim()))
        }
        _ => Err(format!(
            "--{} expects KEY=VALUE (e.g. '{}'), found '{}'",
            option,
            if option == "split" { "bike=1:45" } else { "2k=1:40" },
            raw
        )),
    }
}

fn build_engine(matches: &ArgMatches) -> Result<Engine, String> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }

    let overrides = [
        ("split", "estimate.splits"),
        ("reference", "estimate.reference_paces"),
    ];
    for (option, section) in overrides {
        for raw in matches.get_many::<String>(option).into_iter().flatten() {
            let (key, value) = key_value(option, raw)?;
            let key = format!("{}.{}", section, key.to_ascii_lowercase());
            debug!(%key, value, "config override");
            loader = loader
                .set_override(&key, value)
                .map_err(|e| e.to_string())?;
        }
    }

    let config = loader.build().map_err(|e| e.to_string())?;
    config.engine().map_err(|e| e.to_string())
}

fn read_notation(matches: &ArgMatches) -> Result<String, String> {
    if let Some(path) = matches.get_one::<String>("file") {
        return std::fs::read_to_string(path)
            .map(|content| content.trim_end().to_string())
            .map_err(|e| format!("Cannot read '{}': {}", path, e));
    }
    matches
        .get_one::<String>("notation")
        .cloned()
        .ok_or_else(|| "No notation given; pass it as an argument or with --file".to_string())
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic);
    }
}

fn exit_status(outcome: &ParseOutcome) -> i32 {
    if outcome.has_errors() {
        EXIT_DIAGNOSTICS
    } else {
        0
    }
}

fn format_estimate(estimate: &Estimate) -> String {
    let seconds = match estimate.total_seconds {
        Some(seconds) => format_clock(seconds.round()),
        None => "unknown".to_string(),
    };
    let meters = match estimate.total_meters {
        Some(meters) => format!("{}m", meters.round()),
        None => "unknown".to_string(),
    };
    let calories = match estimate.total_calories {
        Some(calories) => format!("{}cal", calories.round()),
        None => "unknown".to_string(),
    };
    format!("time: {}\ndistance: {}\ncalories: {}", seconds, meters, calories)
}

/// Print the outcome in the requested format and return the exit status
fn handle_outcome(outcome: &ParseOutcome, format: &str, registry: &FormatRegistry) -> i32 {
    match format {
        "summary" => {
            if let Some(name) = &outcome.canonical_name {
                println!("{}", name);
            }
            if let Some(estimate) = &outcome.estimate {
                println!("{}", format_estimate(estimate));
            }
            print_diagnostics(&outcome.diagnostics);
        }
        "diagnostics" => {
            for diagnostic in &outcome.diagnostics {
                println!("{}", diagnostic);
            }
        }
        _ => {
            print_diagnostics(&outcome.diagnostics);
            if let Some(chain) = &outcome.ast {
                match registry.render(chain, format) {
                    Ok(output) => print!("{}", output),
                    Err(e) => {
                        eprintln!("{}", e);
                        return EXIT_USAGE;
                    }
                }
            }
        }
    }
    exit_status(outcome)
}

/// Print the token stream; length and lexing errors are reported like any other diagnostic
fn handle_tokens_command(engine: &Engine, text: &str) -> i32 {
    if let Err(diagnostic) = engine.check_length(text) {
        eprintln!("{}", diagnostic);
        return EXIT_DIAGNOSTICS;
    }
    match tokenize(text) {
        Ok(tokens) => {
            for (token, span) in tokens {
                println!("{:>4}..{:<4} {:<16} {}", span.start, span.end, token.kind_name(), token);
            }
            0
        }
        Err(error) => {
            eprintln!("{}", SyntaxError::from(error).to_diagnostic());
            EXIT_DIAGNOSTICS
        }
    }
}

/// Handle the list-formats command
fn handle_list_formats_command(registry: &FormatRegistry) {
    println!("Available formats:\n");
    for (name, description) in BUILTIN_FORMATS {
        println!("  {:<12} {}", name, description);
    }
    for (name, description) in registry.entries() {
        println!("  {:<12} {}", name, description);
    }
}
