//! Output Writer
//! ---
//! Persists the final partitions into an output directory, one `part-NNNNN`
//! file per partition.  Files are first written to
//! `<output>/_temporary/<job id>/` and moved into place once every partition
//! is written, after which an empty `_SUCCESS` marker is created.  Readers can
//! therefore treat the presence of `_SUCCESS` as "the output is complete".

use std::fmt;
use std::fs::{self, File};
use std::io::prelude::*;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rayon::prelude::*;
use serde_derive::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::Partition;
use crate::error::{IoContext, Result, WordCountError};

/// Name of the completion marker
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Name of the staging directory inside the output
pub const TEMPORARY_DIR: &str = "_temporary";

/// How records are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `(word,count)` per line
    #[default]
    Text,

    /// `{"word":"...","count":N}` per line
    Json,
}

impl FromStr for OutputFormat {
    type Err = WordCountError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(WordCountError::InvalidConfig(format!(
                "unknown output format '{}', expected text or json",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize)]
struct Record<'a> {
    word: &'a str,
    count: u64,
}

/// Renders a single record, without a trailing newline
/// ```rust
///   use wordcount_core::sink::{format_record, OutputFormat};
///
///   assert_eq!(format_record("the", 3, OutputFormat::Text).unwrap(), "(the,3)");
///   assert_eq!(format_record("the", 3, OutputFormat::Json).unwrap(),
///              r#"{"word":"the","count":3}"#);
/// ```
pub fn format_record(word: &str, count: u64, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format!("({},{})", word, count)),
        OutputFormat::Json => Ok(serde_json::to_string(&Record { word, count })?),
    }
}

/// File name of the partition at `idx`
pub fn part_name(idx: usize) -> String {
    format!("part-{:05}", idx)
}

/// What was written by [`write_output`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSummary {
    /// Final partition files, in partition order
    pub files: Vec<PathBuf>,
    /// Number of records across all files
    pub records: u64,
}

fn write_part(path: &Path, part: &Partition, format: OutputFormat) -> Result<u64> {
    let file = File::create(path).with_path(path)?;
    let mut bw = BufWriter::new(file);
    for (word, count) in part {
        let line = format_record(word, *count, format)?;
        bw.write_all(line.as_bytes()).with_path(path)?;
        bw.write_all(b"\n").with_path(path)?;
    }
    bw.flush().with_path(path)?;
    Ok(part.len() as u64)
}

fn stage_parts(staging: &Path, partitions: &[Partition], format: OutputFormat) -> Result<u64> {
    fs::create_dir_all(staging).with_path(staging)?;
    let written = partitions
        .par_iter()
        .enumerate()
        .map(|(idx, part)| write_part(&staging.join(part_name(idx)), part, format))
        .collect::<Result<Vec<u64>>>()?;
    Ok(written.into_iter().sum())
}

/// Writes `partitions` into the directory `path`, which must not exist yet.
pub fn write_output(path: &Path, partitions: &[Partition], format: OutputFormat) -> Result<OutputSummary> {
    if path.exists() {
        return Err(WordCountError::OutputExists(path.to_path_buf()));
    }
    fs::create_dir_all(path).with_path(path)?;

    let staging = path.join(TEMPORARY_DIR).join(Uuid::new_v4().to_string());
    commit_output(path, &staging, partitions, format)
}

// Stages every partition under `staging`, then moves them into `path`.  On a
// staging failure the whole `_temporary` directory is removed.
fn commit_output(
    path: &Path,
    staging: &Path,
    partitions: &[Partition],
    format: OutputFormat,
) -> Result<OutputSummary> {
    let temporary = path.join(TEMPORARY_DIR);
    debug!("Staging {} partitions in {:?}", partitions.len(), staging);

    let records = match stage_parts(staging, partitions, format) {
        Ok(records) => records,
        Err(e) => {
            if let Err(cleanup) = fs::remove_dir_all(&temporary) {
                warn!("Unable to remove staging directory {:?}: {}", temporary, cleanup);
            }
            return Err(e);
        }
    };

    let mut files = Vec::with_capacity(partitions.len());
    for idx in 0..partitions.len() {
        let name = part_name(idx);
        let dest = path.join(&name);
        fs::rename(staging.join(&name), &dest).with_path(&dest)?;
        files.push(dest);
    }
    fs::remove_dir_all(&temporary).with_path(&temporary)?;

    let marker = path.join(SUCCESS_MARKER);
    File::create(&marker).with_path(&marker)?;
    info!("Wrote {} records to {} files in {:?}", records, files.len(), path);

    Ok(OutputSummary { files, records })
}
