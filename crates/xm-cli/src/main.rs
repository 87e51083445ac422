//! xlmerge CLI
//!
//! Command-line tool for merging many spreadsheet submissions into one master
//! workbook according to a mapping file.

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use xm_core::{run_merge, validate_mapping, Error, MergeJob};

/// Exit code for a mapping that fails `check`
const EXIT_CHECK_FAILED: i32 = 5;

#[derive(Parser)]
#[command(name = "xlmerge")]
#[command(about = "Merge spreadsheet submissions into a master workbook", long_about = None)]
#[command(version)]
struct Cli {
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge every source workbook in a directory into one output workbook
    Merge {
        /// Directory containing the source spreadsheets
        #[arg(short, long = "input-directory")]
        input_dir: Option<PathBuf>,

        /// Output workbook (.xlsx)
        #[arg(short, long = "output-file")]
        output_file: Option<PathBuf>,

        /// Mapping file
        #[arg(short, long = "map-file")]
        map_file: Option<PathBuf>,

        /// Run with the values given, without prompting
        #[arg(short, long = "batch-mode")]
        batch_mode: bool,

        /// Job file (JSON) providing default paths
        #[arg(long)]
        job: Option<PathBuf>,

        /// Write a JSON report of the run
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Report mapping lines that match no command
    Check {
        /// Mapping file
        #[arg(short, long = "map-file", default_value = xm_core::job::DEFAULT_MAP_FILE)]
        map_file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a job file template
    CreateJob {
        /// Output path for the job file
        #[arg(short, long)]
        output: PathBuf,

        /// Directory containing the source spreadsheets
        #[arg(long, default_value = xm_core::job::DEFAULT_INPUT_DIR)]
        input_dir: PathBuf,

        /// Output workbook
        #[arg(long, default_value = xm_core::job::DEFAULT_OUTPUT_FILE)]
        output_file: PathBuf,

        /// Mapping file
        #[arg(long, default_value = xm_core::job::DEFAULT_MAP_FILE)]
        map_file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Abnormal Exit.");
            std::process::exit(e.exit_code());
        }
    }
}

fn init_logging(quiet: bool) {
    let default_filter = if quiet {
        "xlmerge=warn,xm_core=warn"
    } else {
        "xlmerge=info,xm_core=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn run(cli: Cli) -> xm_core::Result<i32> {
    match cli.command {
        Commands::Merge {
            input_dir,
            output_file,
            map_file,
            batch_mode,
            job,
            report,
        } => {
            let mut resolved = match job {
                Some(path) => MergeJob::load(path)?,
                None => MergeJob::default(),
            };
            if let Some(dir) = input_dir {
                resolved.input_dir = dir;
            }
            if let Some(file) = output_file {
                resolved.output_file = file;
            }
            if let Some(file) = map_file {
                resolved.map_file = file;
            }
            if !batch_mode {
                prompt_overrides(&mut resolved, &mut io::stdin().lock())?;
            }
            cmd_merge(&resolved, report.as_deref())
        }
        Commands::Check { map_file, json } => cmd_check(&map_file, json),
        Commands::CreateJob {
            output,
            input_dir,
            output_file,
            map_file,
        } => cmd_create_job(
            &output,
            MergeJob {
                input_dir,
                output_file,
                map_file,
            },
        ),
    }
}

fn cmd_merge(job: &MergeJob, report_path: Option<&Path>) -> xm_core::Result<i32> {
    println!("xlmerge v{}", env!("CARGO_PKG_VERSION"));
    println!("Input directory: {}", job.input_dir.display());
    println!("Output file: {}", job.output_file.display());
    println!("Mapping file: {}", job.map_file.display());
    println!();

    let report = run_merge(job)?;

    println!();
    println!("Merge complete:");
    println!("  {} source file(s) processed", report.sources.len());
    println!("  {} cell(s) written", report.total_cells_written());
    println!("  last row: {}", report.final_row);

    if let Some(path) = report_path {
        report.save(path)?;
        println!("  report written to {}", path.display());
    }

    println!("Successful exit.");
    Ok(0)
}

fn cmd_check(map_file: &Path, json: bool) -> xm_core::Result<i32> {
    let text = fs::read_to_string(map_file).map_err(|e| Error::ConfigOpen {
        path: map_file.to_path_buf(),
        source: e,
    })?;
    let report = validate_mapping(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Mapping: {}", map_file.display());
        println!("Lines: {}", report.total_lines);
        for (kind, count) in &report.commands {
            println!("  {}: {}", kind, count);
        }

        if report.is_clean() {
            println!("\nAll lines recognized.");
        } else {
            println!("\nUnrecognized lines ({}):", report.unmatched.len());
            for line in &report.unmatched {
                println!("  {}: {}", line.line, line.text);
            }
        }
    }

    Ok(if report.is_clean() { 0 } else { EXIT_CHECK_FAILED })
}

fn cmd_create_job(output: &Path, job: MergeJob) -> xm_core::Result<i32> {
    job.save(output)?;
    println!("Created job file: {}", output.display());
    println!();
    println!("Edit the file to configure your merge, then run:");
    println!("  xlmerge merge --batch-mode --job {}", output.display());

    Ok(0)
}

/// Offer each path for confirmation; an empty answer keeps the current value
fn prompt_overrides<R: BufRead>(job: &mut MergeJob, input: &mut R) -> io::Result<()> {
    prompt_path(input, "Input directory", &mut job.input_dir)?;
    prompt_path(input, "Output file", &mut job.output_file)?;
    prompt_path(input, "Mapping file", &mut job.map_file)?;
    Ok(())
}

fn prompt_path<R: BufRead>(input: &mut R, label: &str, value: &mut PathBuf) -> io::Result<()> {
    print!("{}? default=[{}] :", label, value.display());
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    if !answer.is_empty() {
        *value = PathBuf::from(answer);
    }
    Ok(())
}
