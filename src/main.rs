//! Binario `pipeflow`: ejecuta pipelines, steps nativos sueltos y gestiona
//! alias de artifacts.
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use flow_adapters::{BasicCleaningStep, DownloadStep};
use flow_core::Params;
use flow_persistence::{init_dotenv, StoreConfig};
use pipeflow::commands::{format_version, list_versions, promote};
use pipeflow::{apply_overrides, go, load_config, run_local_step, AppError, GoOptions, Override, RunnerKind,
               DEFAULT_CONFIG_FILE};

#[derive(Parser)]
#[command(name = "pipeflow")]
#[command(about = "Config-driven runner for data/ML pipeline steps", long_about = None)]
struct Cli {
    /// Store root (artifacts, runs, pipeline logs) [default: $PIPEFLOW_HOME or .pipeflow]
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the active steps of a pipeline configuration
    Run {
        /// Pipeline configuration (YAML)
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// How each step is executed
        #[arg(long, value_enum, default_value_t = RunnerKind::Mlflow)]
        runner: RunnerKind,

        /// Sample directory for the local download step
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,

        /// Configuration overrides, e.g. main.steps=download,basic_cleaning
        #[arg(value_name = "KEY=VALUE")]
        overrides: Vec<Override>,
    },

    /// Run a single native step outside a pipeline
    #[command(subcommand)]
    Step(StepCommand),

    /// Inspect and promote artifact versions
    #[command(subcommand)]
    Artifact(ArtifactCommand),
}

#[derive(Subcommand)]
enum StepCommand {
    /// Deduplicate, drop missing values and filter a CSV artifact
    BasicCleaning(BasicCleaningArgs),
    /// Register a local sample file as an artifact
    Download(DownloadArgs),
}

#[derive(Args)]
struct BasicCleaningArgs {
    /// Input artifact to clean
    #[arg(long = "input_artifact")]
    input_artifact: String,
    /// Column to filter on
    #[arg(long = "filter_column")]
    filter_column: String,
    /// Minimum value kept in the filter column
    #[arg(long = "filter_value", allow_hyphen_values = true)]
    filter_value: f64,
    /// Name of the output artifact
    #[arg(long = "output_artifact")]
    output_artifact: String,
    /// Type of the output artifact
    #[arg(long = "output_type")]
    output_type: String,
    /// Description of the output artifact
    #[arg(long = "output_description")]
    output_description: String,
}

#[derive(Args)]
struct DownloadArgs {
    /// Sample file name inside the data directory
    #[arg(long)]
    sample: String,
    #[arg(long = "artifact_name")]
    artifact_name: String,
    #[arg(long = "artifact_type")]
    artifact_type: String,
    #[arg(long = "artifact_description")]
    artifact_description: String,
    /// Directory holding the sample files
    #[arg(long, value_name = "DIR")]
    data_dir: PathBuf,
}

#[derive(Subcommand)]
enum ArtifactCommand {
    /// List the versions of an artifact
    List {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Move an alias (e.g. prod) to a version
    Promote {
        #[arg(value_name = "NAME:VERSION")]
        reference: String,
        #[arg(value_name = "ALIAS")]
        alias: String,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr))
                                  .with(filter)
                                  .init();
}

fn store_config(home: Option<PathBuf>) -> StoreConfig {
    match home {
        Some(dir) => StoreConfig::new(dir),
        None => StoreConfig::from_env(),
    }
}

fn params<const N: usize>(pairs: [(&str, serde_json::Value); N]) -> Params {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn execute(cli: Cli) -> Result<(), AppError> {
    let store = store_config(cli.home);
    match cli.command {
        Commands::Run { config,
                        runner,
                        data_dir,
                        overrides, } => {
            let mut tree = load_config(&config)?;
            apply_overrides(&mut tree, &overrides)?;
            let pipeline_id = go(&tree, &GoOptions { runner, store, data_dir })?;
            println!("{pipeline_id}");
        }
        Commands::Step(StepCommand::BasicCleaning(a)) => {
            let p = params([("input_artifact", json!(a.input_artifact)),
                            ("filter_column", json!(a.filter_column)),
                            ("filter_value", json!(a.filter_value)),
                            ("output_artifact", json!(a.output_artifact)),
                            ("output_type", json!(a.output_type)),
                            ("output_description", json!(a.output_description))]);
            let run_id = run_local_step(&BasicCleaningStep, &p, &store)?;
            println!("{}", run_id.unwrap_or_default());
        }
        Commands::Step(StepCommand::Download(a)) => {
            let p = params([("sample", json!(a.sample)),
                            ("artifact_name", json!(a.artifact_name)),
                            ("artifact_type", json!(a.artifact_type)),
                            ("artifact_description", json!(a.artifact_description))]);
            let run_id = run_local_step(&DownloadStep::new(a.data_dir), &p, &store)?;
            println!("{}", run_id.unwrap_or_default());
        }
        Commands::Artifact(ArtifactCommand::List { name }) => {
            for v in list_versions(&store, &name)? {
                println!("{}", format_version(&v));
            }
        }
        Commands::Artifact(ArtifactCommand::Promote { reference, alias }) => {
            let v = promote(&store, &reference, &alias)?;
            println!("{}", format_version(&v));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_dotenv();
    init_logging();
    let cli = Cli::parse();
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
