mod logging;
mod settings;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fabula_core::{Error as CoreError, LocaleStore, build_reference_graph_report, validate_locale};
use fabula_generate::{Faker, GenerationError, LocaleKey};
use serde_json::json;
use thiserror::Error;

use logging::init_logging;
use settings::{Overrides, Settings, SettingsError, load_settings};

#[derive(Debug, Error)]
enum CliError {
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("locale error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Generate(#[from] GenerationError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "fabula", version, about = "Locale-aware fake text generator")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Settings file (defaults to fabula.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Active locale, e.g. `en` or `nb_no`.
    #[arg(long, global = true)]
    locale: Option<String>,
    /// Seed for reproducible output.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Extra locale file (JSON or TOML) layered over the active locale.
    #[arg(long = "locale-file", global = true, value_name = "PATH")]
    locale_files: Vec<PathBuf>,
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Emit logs as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a dotted locale path, e.g. `address.city`.
    Fetch(FetchArgs),
    /// Generate a string matching a restricted regular expression.
    Regexify(PatternArgs),
    /// Replace `#` with digits.
    Numerify(TextArgs),
    /// Replace `?` with uppercase letters.
    Letterify(TextArgs),
    /// Replace both `#` and `?`.
    Bothify(TextArgs),
    /// Random alphanumeric string.
    Alnum {
        len: usize,
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// List bundled locales.
    Locales,
    /// Check the active locale for empty lists, dangling references and cycles.
    Validate,
}

#[derive(Args, Debug)]
struct FetchArgs {
    path: String,
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,
    /// Also fill `#` and `?` placeholders in the result.
    #[arg(long, default_value_t = false)]
    bothify: bool,
}

#[derive(Args, Debug)]
struct PatternArgs {
    pattern: String,
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,
}

#[derive(Args, Debug)]
struct TextArgs {
    text: String,
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let GlobalArgs {
        config,
        locale,
        seed,
        locale_files,
        log_level,
        log_json,
    } = cli.global;

    let mut settings = load_settings(config.as_deref())?;
    settings.apply_overrides(Overrides {
        locale,
        seed,
        locale_files,
        log_level,
    });
    init_logging(&settings.log_level, log_json)?;
    tracing::debug!(event = "settings_loaded", locale = %settings.locale, seed = ?settings.seed);

    match cli.command {
        Command::Locales => {
            for key in LocaleKey::ALL {
                let marker = if *key == LocaleKey::FALLBACK { " (fallback)" } else { "" };
                println!("{key}{marker}");
            }
            Ok(())
        }
        Command::Validate => run_validate(&settings),
        command => {
            let faker = build_faker(&settings)?;
            run_generate(&faker, command)
        }
    }
}

fn run_generate(faker: &Faker, command: Command) -> Result<(), CliError> {
    match command {
        Command::Fetch(args) => repeat(args.count, || {
            if args.bothify {
                faker.fetch_bothified(&args.path)
            } else {
                faker.fetch(&args.path)
            }
        }),
        Command::Regexify(args) => repeat(args.count, || faker.regexify(&args.pattern)),
        Command::Numerify(args) => repeat(args.count, || faker.numerify(&args.text)),
        Command::Letterify(args) => repeat(args.count, || faker.letterify(&args.text)),
        Command::Bothify(args) => repeat(args.count, || faker.numerify_and_letterify(&args.text)),
        Command::Alnum { len, count } => repeat(count, || Ok(faker.random_alphanumeric(len))),
        Command::Locales | Command::Validate => Ok(()),
    }
}

fn repeat<F>(count: usize, mut produce: F) -> Result<(), CliError>
where
    F: FnMut() -> Result<String, GenerationError>,
{
    for _ in 0..count {
        println!("{}", produce()?);
    }
    Ok(())
}

fn run_validate(settings: &Settings) -> Result<(), CliError> {
    let (active, fallback) = load_stores(settings)?;
    let report = validate_locale(&active, Some(&fallback))?;
    let graph = build_reference_graph_report(&active)?;
    tracing::info!(
        event = "locale_validated",
        locale = %active.name,
        errors = report.errors.len(),
        warnings = report.warnings.len()
    );

    let ok = report.is_ok() && graph.cycle.is_none();
    let output = json!({
        "locale": active.name,
        "validation": report,
        "reference_graph": graph,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    if !ok {
        return Err(CliError::InvalidConfig(format!(
            "locale '{}' failed validation",
            active.name
        )));
    }
    Ok(())
}

fn build_faker(settings: &Settings) -> Result<Faker, CliError> {
    let (active, fallback) = load_stores(settings)?;
    let faker = Faker::with_locale(active, fallback).with_max_depth(settings.max_reference_depth);
    Ok(match settings.seed {
        Some(seed) => faker.seeded(seed),
        None => faker,
    })
}

/// Active locale with any extra files layered over it, plus the fallback.
fn load_stores(settings: &Settings) -> Result<(LocaleStore, LocaleStore), CliError> {
    let key = LocaleKey::parse(&settings.locale).ok_or_else(|| {
        CliError::InvalidConfig(format!("unknown locale '{}'", settings.locale))
    })?;
    let fallback = LocaleKey::FALLBACK.load()?;
    let mut active = key.load()?;
    for path in &settings.locale_files {
        tracing::info!(event = "locale_overlay", path = %path.display());
        active = LocaleStore::from_path(path)?.merged_over(active);
    }
    active.name = key.to_string();
    Ok((active, fallback))
}
