//! Command-line interface for the siteconf binary.
//!
//! The CLI loads a YAML document of named deployment profiles and either
//! resolves them into canonical site configurations or reports validation
//! diagnostics without resolving.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
    process,
};

use clap::{ArgAction, Args, Parser, Subcommand};
use siteconf::{
    ConfigResolver, Diagnostic, Error, ProfilesDocument, ResolvedSiteConfig, Validation, Validator,
    load_profiles,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "siteconf=info";

/// Command line interface for resolving multi-profile site configurations.
#[derive(Debug, Parser,)]
#[command(name = "siteconf", version, about = "Resolve deployment profiles into site configurations")]
struct Cli
{
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Resolve profiles and print the resulting configuration as JSON.
    Resolve(ResolveArgs,),
    /// Validate profiles and report every diagnostic.
    Validate(ValidateArgs,),
}

#[derive(Debug, Args,)]
/// Arguments accepted by the `resolve` subcommand.
struct ResolveArgs
{
    /// Path to the YAML document describing deployment profiles.
    #[arg(long = "config", value_name = "PATH")]
    config: PathBuf,

    /// Resolve only the named profile instead of every profile.
    #[arg(long = "profile", value_name = "NAME")]
    profile: Option<String,>,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(Debug, Args,)]
/// Arguments accepted by the `validate` subcommand.
struct ValidateArgs
{
    /// Path to the YAML document describing deployment profiles.
    #[arg(long = "config", value_name = "PATH")]
    config: PathBuf,
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main()
{
    init_tracing();

    if let Err(error,) = run() {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

fn init_tracing()
{
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER,),);
    tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).init();
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates errors originating from profile loading, validation and
/// resolution.
fn run() -> Result<(), Error,>
{
    let cli = Cli::parse();

    match cli.command {
        Command::Resolve(args,) => run_resolve(&args,),
        Command::Validate(args,) => run_validate(&args.config,),
    }
}

fn run_resolve(args: &ResolveArgs,) -> Result<(), Error,>
{
    let document = load_profiles(&args.config,)?;
    let resolver = ConfigResolver::default();
    let resolved = resolve_document(&resolver, &document, args.profile.as_deref(),)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_resolved(&mut handle, &resolved, args.pretty,)
}

/// Resolves either the selected profile or every profile of `document`.
///
/// # Errors
///
/// Returns the resolution error directly when a single profile is selected.
/// When every profile is resolved, failures are logged individually and
/// summarized in one [`Error::Validation`].
fn resolve_document(
    resolver: &ConfigResolver,
    document: &ProfilesDocument,
    selected: Option<&str,>,
) -> Result<BTreeMap<String, ResolvedSiteConfig,>, Error,>
{
    if let Some(name,) = selected {
        let profile = document
            .profiles
            .get(name,)
            .ok_or_else(|| Error::validation(format!("profile '{name}' was not found",),),)?;
        let resolved = resolver.resolve(profile,)?;
        return Ok(BTreeMap::from([(name.to_owned(), resolved,)],),);
    }

    let mut resolved = BTreeMap::new();
    let mut failed = Vec::new();
    for (name, outcome,) in resolver.resolve_all(&document.profiles,) {
        match outcome {
            Ok(config,) => {
                resolved.insert(name, config,);
            }
            Err(source,) => {
                error!("Profile '{name}' failed to resolve: {source}");
                failed.push(name,);
            }
        }
    }

    if failed.is_empty() {
        info!("Resolved {} profiles", resolved.len());
        Ok(resolved,)
    } else {
        Err(Error::validation(format!("profiles failed to resolve: {}", failed.join(", ")),),)
    }
}

fn write_resolved<W: io::Write,>(
    writer: &mut W,
    resolved: &BTreeMap<String, ResolvedSiteConfig,>,
    pretty: bool,
) -> Result<(), Error,>
{
    if pretty {
        serde_json::to_writer_pretty(writer, resolved,)?;
    } else {
        serde_json::to_writer(writer, resolved,)?;
    }

    Ok((),)
}

fn run_validate(path: &Path,) -> Result<(), Error,>
{
    let document = load_profiles(path,)?;
    let resolver = ConfigResolver::default();
    let invalid = collect_diagnostics(&resolver, &document,);

    if invalid.is_empty() {
        info!("All {} profiles are valid", document.profiles.len());
        return Ok((),);
    }

    eprint!("{}", render_diagnostics(&invalid,));
    let names: Vec<&str,> = invalid.keys().map(String::as_str,).collect();
    Err(Error::validation(format!("invalid profiles: {}", names.join(", ")),),)
}

/// Validates every profile and returns the diagnostics of the invalid ones,
/// keyed by profile name.
fn collect_diagnostics(
    resolver: &ConfigResolver,
    document: &ProfilesDocument,
) -> BTreeMap<String, Vec<Diagnostic,>,>
{
    let validator = Validator::new(resolver.registry(),);
    document
        .profiles
        .iter()
        .filter_map(|(name, profile,)| match validator.validate(profile,) {
            Validation::Ok => None,
            Validation::Invalid(diagnostics,) => Some((name.clone(), diagnostics,),),
        },)
        .collect()
}

/// Formats one `profile: fieldPath: reason` line per diagnostic.
fn render_diagnostics(invalid: &BTreeMap<String, Vec<Diagnostic,>,>,) -> String
{
    invalid
        .iter()
        .flat_map(|(name, diagnostics,)| {
            diagnostics.iter().map(move |diagnostic| format!("{name}: {diagnostic}\n"),)
        },)
        .collect()
}
