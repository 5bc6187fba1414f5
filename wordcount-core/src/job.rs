//! Job configuration and the end-to-end driver.
//!
//! A job resolves its input, plans chunks, counts every chunk in parallel,
//! merges the counts, partitions them by key and writes them out.

use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde_derive::{Deserialize, Serialize};

use crate::aggregate::{count_chunk, partition_by_key, Tally};
use crate::analyzer::{Analyzer, TokenMode};
use crate::error::{Result, WordCountError};
use crate::input::{plan_chunks, resolve_inputs, Chunk};
use crate::sink::{write_output, OutputFormat};

/// Default split size for input files: 32 MiB
pub const DEFAULT_CHUNK_SIZE: u64 = 32 * 1024 * 1024;

/// Settings for a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Input specification: files, directories or globs, comma separated
    pub input: String,
    /// Output directory
    pub output: PathBuf,
    /// Number of output partitions, defaults to the number of input chunks
    pub partitions: Option<usize>,
    /// Input split size in bytes
    pub chunk_size: u64,
    /// Record format
    pub format: OutputFormat,
    /// Token character class
    pub mode: TokenMode,
    /// Worker threads, defaults to one per core
    pub threads: Option<usize>,
}

impl JobConfig {
    /// Creates a configuration with default settings
    pub fn new<I: Into<String>, O: Into<PathBuf>>(input: I, output: O) -> Self {
        JobConfig {
            input: input.into(),
            output: output.into(),
            partitions: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            format: OutputFormat::default(),
            mode: TokenMode::default(),
            threads: None,
        }
    }

    /// Sets the number of output partitions
    pub fn with_partitions(mut self, partitions: usize) -> Self {
        self.partitions = Some(partitions);
        self
    }

    /// Sets the input split size
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the token mode
    pub fn with_mode(mut self, mode: TokenMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the number of worker threads
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Checks the settings for values that can't run
    pub fn validate(&self) -> Result<()> {
        if self.input.trim().is_empty() {
            return Err(WordCountError::InvalidConfig("input path is empty".into()));
        }
        if self.output.as_os_str().is_empty() {
            return Err(WordCountError::InvalidConfig("output path is empty".into()));
        }
        if self.chunk_size == 0 {
            return Err(WordCountError::InvalidConfig("chunk size must be positive".into()));
        }
        if self.partitions == Some(0) {
            return Err(WordCountError::InvalidConfig("partitions must be positive".into()));
        }
        if self.threads == Some(0) {
            return Err(WordCountError::InvalidConfig("threads must be positive".into()));
        }
        Ok(())
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobReport {
    /// Input specification as given
    pub input: String,
    /// Output directory
    pub output: PathBuf,
    /// Input files read
    pub files: usize,
    /// Chunks counted
    pub chunks: usize,
    /// Output partitions written
    pub partitions: usize,
    /// Lines read
    pub lines: u64,
    /// Tokens counted, equal to the sum of all output counts
    pub tokens: u64,
    /// Distinct words, equal to the number of output records
    pub distinct_words: u64,
    /// Wall clock time of the run in milliseconds
    pub elapsed_ms: u128,
}

impl JobReport {
    /// Serializes the report as a JSON object
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for JobReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(40);
        writeln!(f, "{}", rule)?;
        writeln!(f, "Job completed for input: {}", self.input)?;
        writeln!(f, "Total execution time: {} ms", self.elapsed_ms)?;
        write!(f, "{}", rule)
    }
}

fn with_pool<T: Send, F: FnOnce() -> T + Send>(threads: Option<usize>, f: F) -> Result<T> {
    match threads {
        Some(n) => {
            let pool = ThreadPoolBuilder::new().num_threads(n).build()?;
            Ok(pool.install(f))
        }
        None => Ok(f()),
    }
}

/// Counts every chunk in parallel and merges the results
pub fn count_chunks(chunks: &[Chunk], analyzer: &Analyzer) -> Result<Tally> {
    chunks
        .par_iter()
        .map(|chunk| count_chunk(chunk, analyzer))
        .try_reduce(Tally::new, |a, b| Ok(a.merge(b)))
}

/// Counts the words of `config.input` without writing anything.
pub fn count(config: &JobConfig) -> Result<Tally> {
    config.validate()?;
    let files = resolve_inputs(&config.input)?;
    let chunks = plan_chunks(&files, config.chunk_size)?;
    let analyzer = Analyzer::new(config.mode);
    with_pool(config.threads, || count_chunks(&chunks, &analyzer))?
}

/// Runs the full pipeline: read, split, normalize, count, write.
/// ```rust
///   use std::fs;
///   use wordcount_core::job::{run, JobConfig};
///
///   let dir = tempfile::tempdir().unwrap();
///   let input = dir.path().join("in.txt");
///   fs::write(&input, "It was the best of times, it was the worst of times").unwrap();
///
///   let config = JobConfig::new(input.to_str().unwrap(), dir.path().join("out"));
///   let report = run(&config).unwrap();
///   assert_eq!(report.tokens, 12);
///   assert_eq!(report.distinct_words, 7);
/// ```
pub fn run(config: &JobConfig) -> Result<JobReport> {
    let start = Instant::now();
    config.validate()?;
    info!("Starting word count: {} -> {:?}", config.input, config.output);

    if config.output.exists() {
        return Err(WordCountError::OutputExists(config.output.clone()));
    }

    let files = resolve_inputs(&config.input)?;
    let chunks = plan_chunks(&files, config.chunk_size)?;
    let n_partitions = config.partitions.unwrap_or_else(|| chunks.len().max(1));
    let analyzer = Analyzer::new(config.mode);

    let (totals, summary) = with_pool(config.threads, || -> Result<_> {
        let tally = count_chunks(&chunks, &analyzer)?;
        let tokens = tally.total_tokens();
        debug!(
            "Counted {} tokens, {} distinct words from {} lines",
            tokens,
            tally.counts.len(),
            tally.lines
        );

        let partitions = partition_by_key(tally.counts, n_partitions);
        let summary = write_output(&config.output, &partitions, config.format)?;
        Ok(((tally.lines, tokens), summary))
    })??;

    let (lines, tokens) = totals;
    let report = JobReport {
        input: config.input.clone(),
        output: config.output.clone(),
        files: files.len(),
        chunks: chunks.len(),
        partitions: summary.files.len(),
        lines,
        tokens,
        distinct_words: summary.records,
        elapsed_ms: start.elapsed().as_millis(),
    };
    info!(
        "Finished in {} ms: {} files, {} chunks, {} tokens",
        report.elapsed_ms, report.files, report.chunks, report.tokens
    );
    Ok(report)
}
