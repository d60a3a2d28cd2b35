//! selector-dataset command line
//!
//! Runs the dataset pipeline stages and the interactive selector capture.

use anyhow::Context;
use clap::{Parser, Subcommand};
use selector_dataset::tools::{
    AnnotateParams, CaptureParams, DedupParams, ExportCsvParams, GenerateParams, ValidateParams,
};
use selector_dataset::{DatasetError, DatasetPaths, ToolContext, ToolRegistry, ToolResult};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "selector-dataset")]
#[command(version)]
#[command(about = "Build (HTML fragment, CSS selector) datasets", long_about = None)]
struct Cli {
    /// Directory holding the dataset files
    #[arg(long, global = true, value_name = "DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Seed for sampling and generation (default: random)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print the full tool result as JSON instead of the report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Remove invalid and duplicate records from the raw dataset
    Dedup {
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Pair every top-level element of each record with a selector
    Annotate {
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Count lines, report malformed JSON and print sample records
    Validate {
        /// Dataset to check
        path: Option<PathBuf>,
    },
    /// Convert the final dataset to CSV
    ExportCsv {
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Append synthetic markup records to the raw dataset
    Generate {
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Number of new records
        #[arg(long, short = 'n')]
        count: Option<usize>,
    },
    /// Open a page and print the selector of the next clicked element
    Capture {
        url: String,
        /// Append the captured pair to this JSONL file
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Give up after this many seconds without a click
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Launch browser without a window
        #[arg(long)]
        headless: bool,
        /// How long the clicked element stays outlined, in milliseconds
        #[arg(long, default_value = "2000")]
        highlight_ms: u64,
        /// WebSocket endpoint of a running browser
        #[arg(long, value_name = "URL")]
        ws_endpoint: Option<String>,
    },
    /// List the available tools with their parameter schemas
    Tools,
}

impl Command {
    /// Registry name and JSON parameters for a pipeline command
    fn invocation(self) -> serde_json::Result<Option<(&'static str, serde_json::Value)>> {
        fn params<P: Serialize>(name: &'static str, p: P) -> serde_json::Result<Option<(&'static str, serde_json::Value)>> {
            Ok(Some((name, serde_json::to_value(p)?)))
        }

        match self {
            Command::Dedup { input, output } => params("dedup", DedupParams { input, output }),
            Command::Annotate { input, output } => params("annotate", AnnotateParams { input, output }),
            Command::Validate { path } => params("validate", ValidateParams { path }),
            Command::ExportCsv { input, output } => params("export_csv", ExportCsvParams { input, output }),
            Command::Generate { output, count } => params("generate", GenerateParams { output, count }),
            Command::Capture {
                url,
                output,
                timeout,
                headless,
                highlight_ms,
                ws_endpoint,
            } => params(
                "capture",
                CaptureParams {
                    url,
                    output,
                    timeout_secs: timeout,
                    headless,
                    highlight_ms,
                    ws_url: ws_endpoint,
                },
            ),
            Command::Tools => Ok(None),
        }
    }
}

fn list_tools(registry: &ToolRegistry) -> anyhow::Result<()> {
    for name in registry.names() {
        let schema = registry.schema(name).unwrap_or_default();
        println!("{}", name);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        println!();
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let registry = ToolRegistry::with_defaults();
    let paths = DatasetPaths::in_dir(&cli.data_dir);
    let json = cli.json;
    let mut context = match cli.seed {
        Some(seed) => ToolContext::with_seed(paths, seed),
        None => ToolContext::new(paths),
    };

    let Some((name, params)) = cli.command.invocation()? else {
        list_tools(&registry)?;
        return Ok(ExitCode::SUCCESS);
    };

    match registry.execute(name, params, &mut context) {
        Ok(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if let Some(report) = result.report {
                println!("{}", report);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if json => {
            println!("{}", serde_json::to_string_pretty(&ToolResult::failure(e.to_string()))?);
            Ok(ExitCode::FAILURE)
        }
        Err(DatasetError::DatasetNotFound { tried }) => {
            log::debug!("tried {:?}", tried);
            eprintln!("Dataset file not found.");
            eprintln!("Usage: selector-dataset validate [path_to_dataset]");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e).with_context(|| format!("{} failed", name)),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
