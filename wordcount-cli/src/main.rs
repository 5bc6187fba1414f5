//! wordcount
//! ---
//! Counts the words in a set of text files and writes `(word,count)` records to
//! an output directory.
//!
//! ```text
//! wordcount <INPUT> <OUTPUT> [OPTIONS]
//! ```

#[macro_use]
extern crate log;

use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};

use wordcount_core::analyzer::TokenMode;
use wordcount_core::job::DEFAULT_CHUNK_SIZE;
use wordcount_core::sink::OutputFormat;
use wordcount_core::{run, JobConfig};

/// Exit status for bad arguments and failed jobs
const EXIT_FAILURE: i32 = 1;

/// Count word frequencies across text files
#[derive(Parser, Debug)]
#[command(name = "wordcount", version, about, long_about = None)]
struct Args {
    /// Input file, directory or glob; separate several with commas
    input: String,

    /// Output directory; must not already exist
    output: PathBuf,

    /// Number of output files [default: one per input chunk]
    #[arg(short, long)]
    partitions: Option<usize>,

    /// Input split size in bytes
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: u64,

    /// Record format: text or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Treat any Unicode letter as part of a word, not just a-z
    #[arg(long)]
    unicode: bool,

    /// Worker threads [default: one per core]
    #[arg(short, long)]
    threads: Option<usize>,

    /// Print the run summary as JSON instead of the banner
    #[arg(long)]
    json_report: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn to_config(&self) -> JobConfig {
        let mode = if self.unicode {
            TokenMode::Unicode
        } else {
            TokenMode::Ascii
        };
        let mut config = JobConfig::new(self.input.clone(), self.output.clone())
            .with_chunk_size(self.chunk_size)
            .with_format(self.format)
            .with_mode(mode);
        config.partitions = self.partitions;
        config.threads = self.threads;
        config
    }

    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Exit status for an argument error.  Help and version requests succeed.
fn arg_error_status(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => EXIT_FAILURE,
    }
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Usage goes to stderr for errors, stdout for --help.  A failed
            // print leaves nothing else to report, the exit status still does.
            e.print().ok();
            process::exit(arg_error_status(e.kind()));
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level())).init();

    let config = args.to_config();
    debug!("Job configuration: {:?}", config);

    match run(&config) {
        Ok(report) => {
            if args.json_report {
                match report.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        process::exit(EXIT_FAILURE);
                    }
                }
            } else {
                println!("{}", report);
            }
        }
        Err(e) => {
            error!("Job failed for input {}: {:?}", config.input, e);
            eprintln!("Error: {}", e);
            process::exit(EXIT_FAILURE);
        }
    }
}
