use clap::{Args, Parser, Subcommand};
use schemagen::{
    GenerateError, GenerateOptions, Generator, ManifestSource, full_scan_required,
    build::ProcessCompiler,
    config::{CONFIG_FILE_NAME, Config},
    core::discovery::discovery,
};
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

///
/// Cli
///

#[derive(Debug, Parser)]
#[command(name = "schemagen", version, about = "Generate schema with stable component ids")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one generation pass.
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Config file; defaults to ./schemagen.toml when present.
    #[arg(long, env = "SCHEMAGEN_CONFIG")]
    config: Option<PathBuf>,

    /// JSON type manifest exported by the host reflector.
    #[arg(long)]
    types: PathBuf,

    /// Start from an empty schema database.
    #[arg(long)]
    reset: bool,

    /// Extra arguments for the schema compiler.
    #[arg(long, allow_hyphen_values = true)]
    additional_schema_compiler_args: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Generate(args) => generate(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn generate(args: GenerateArgs) -> Result<(), GenerateError> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(extra) = args.additional_schema_compiler_args {
        config.compiler.additional_args = Some(extra);
    }
    if full_scan_required(&config) && !args.reset {
        info!("no previous generation found, running a full scan");
    }

    let source = ManifestSource::load(&args.types)?;

    // cooked paths arrive the same way host callbacks would deliver them
    let (listener, queue) = discovery();
    for path in source.cooked() {
        listener.on_candidate_created(path.clone());
    }

    let report = Generator::new(config, source, ProcessCompiler)
        .with_discovery(queue)
        .run(GenerateOptions { reset: args.reset })?;

    if !report.collisions.is_empty() {
        warn!(
            groups = report.collisions.len(),
            "some schema names were suffixed to avoid collisions"
        );
    }
    info!(
        classes = report.classes,
        skipped = report.skipped,
        levels = report.level_components,
        distances = report.distance_components,
        new_ids = report.new_ids,
        watermark = %report.next_component_id,
        "schema generated"
    );

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config, GenerateError> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None => {
            let local = Path::new(CONFIG_FILE_NAME);
            if local.is_file() {
                Ok(Config::load(local)?)
            } else {
                info!("no {CONFIG_FILE_NAME} found, using defaults");
                Ok(Config::defaults_at(Path::new(".")))
            }
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_accepts_hyphenated_passthrough() {
        let cli = Cli::try_parse_from([
            "schemagen",
            "generate",
            "--types",
            "types.json",
            "--reset",
            "--additional-schema-compiler-args",
            "--ast_json_out=ast",
        ])
        .expect("parse");

        let Command::Generate(args) = cli.command;
        assert!(args.reset);
        assert_eq!(args.types, PathBuf::from("types.json"));
        assert_eq!(
            args.additional_schema_compiler_args.as_deref(),
            Some("--ast_json_out=ast")
        );
    }

    #[test]
    fn types_is_required() {
        assert!(Cli::try_parse_from(["schemagen", "generate"]).is_err());
    }
}
