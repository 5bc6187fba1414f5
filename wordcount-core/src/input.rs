//! Input Reader
//! ---
//! Resolves an input path into files and streams their lines in byte-range
//! chunks, so that large files can be counted in parallel.
//!
//! A chunk owns every line whose first byte falls inside `[start, end)`.  A
//! chunk that doesn't begin at offset zero skips its first (likely partial)
//! line, which the previous chunk reads past its own end to finish.

use std::fs::{self, File};
use std::io::prelude::*;
use std::io::{BufReader, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{IoContext, Result, WordCountError};

/// A byte range of a single input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// File to read
    pub path: PathBuf,
    /// First byte offset
    pub start: u64,
    /// Exclusive upper bound on the offsets of lines owned by this chunk
    pub end: u64,
}

fn is_glob(entry: &str) -> bool {
    entry.contains(|c: char| c == '*' || c == '?' || c == '[')
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('_') || n.starts_with('.'))
        .unwrap_or(false)
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_path(dir)? {
        let entry = entry.with_path(dir)?;
        let path = entry.path();
        if is_hidden(&path) {
            trace!("Skipping hidden entry {:?}", path);
            continue;
        }
        if entry.file_type().with_path(&path)?.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|source| WordCountError::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            WordCountError::io(path, e.into_error())
        })?;
        if path.is_dir() {
            files.extend(list_dir(&path)?);
        } else if !is_hidden(&path) {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(WordCountError::NoInputFiles(pattern.to_owned()));
    }
    Ok(files)
}

/// Resolves an input specification to the files it names.
///
/// The specification is a comma-separated list where each entry is a file, a
/// directory (its files, non-recursively, ignoring names starting with `_` or
/// `.`) or a glob pattern.
pub fn resolve_inputs(spec: &str) -> Result<Vec<PathBuf>> {
    let entries: Vec<&str> = spec.split(',').map(str::trim).filter(|e| !e.is_empty()).collect();
    if entries.is_empty() {
        return Err(WordCountError::InvalidConfig("input path is empty".into()));
    }

    let mut files = Vec::new();
    for entry in entries {
        if is_glob(entry) {
            files.extend(expand_glob(entry)?);
            continue;
        }

        let path = Path::new(entry);
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(ref e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(WordCountError::InputNotFound(path.to_path_buf()))
            }
            Err(e) => return Err(WordCountError::io(path, e)),
        };

        if meta.is_dir() {
            files.extend(list_dir(path)?);
        } else {
            files.push(path.to_path_buf());
        }
    }

    debug!("Resolved {} input files from {}", files.len(), spec);
    Ok(files)
}

/// Splits every file into chunks of at most `chunk_size` bytes.  Empty files
/// contribute no chunks.
pub fn plan_chunks(files: &[PathBuf], chunk_size: u64) -> Result<Vec<Chunk>> {
    if chunk_size == 0 {
        return Err(WordCountError::InvalidConfig("chunk size must be positive".into()));
    }

    let mut chunks = Vec::new();
    for path in files {
        let file_size = fs::metadata(path).with_path(path)?.len();
        let mut cur_offset = 0u64;
        while cur_offset < file_size {
            chunks.push(Chunk {
                path: path.clone(),
                start: cur_offset,
                end: cur_offset.saturating_add(chunk_size),
            });
            cur_offset = cur_offset.saturating_add(chunk_size);
        }
        trace!("File: {:?}, size: {}", path, file_size);
    }
    debug!("Planned {} chunks over {} files", chunks.len(), files.len());
    Ok(chunks)
}

fn strip_newline(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}

/// Calls `f` with every line owned by `chunk`, without its line terminator.
/// Returns the number of lines read.
pub fn read_chunk<F: FnMut(&str)>(chunk: &Chunk, mut f: F) -> Result<u64> {
    let file = File::open(&chunk.path).with_path(&chunk.path)?;
    let mut reader = BufReader::new(file);

    let mut buf = Vec::new();
    let mut pos = chunk.start;
    if chunk.start > 0 {
        // Skip first line, which is likely a partial line.  We back up a byte
        // so a chunk starting exactly on a line boundary only skips the
        // terminator of the previous line.
        reader.seek(SeekFrom::Start(chunk.start - 1)).with_path(&chunk.path)?;
        let size = reader.read_until(b'\n', &mut buf).with_path(&chunk.path)?;
        pos = chunk.start - 1 + size as u64;
        buf.clear();
    }

    let mut lines = 0u64;
    while pos < chunk.end {
        let size = reader.read_until(b'\n', &mut buf).with_path(&chunk.path)?;
        if size == 0 {
            break;
        }
        pos += size as u64;
        strip_newline(&mut buf);
        f(&String::from_utf8_lossy(&buf));
        buf.clear();
        lines += 1;
    }
    Ok(lines)
}

#[cfg(test)]
mod test_input {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    fn read_all(files: &[PathBuf], chunk_size: u64) -> Vec<String> {
        let mut lines = Vec::new();
        for chunk in plan_chunks(files, chunk_size).unwrap() {
            read_chunk(&chunk, |l| lines.push(l.to_owned())).unwrap();
        }
        lines
    }

    #[test]
    fn test_every_line_read_once_for_any_chunk_size() {
        let dir = TempDir::new().unwrap();
        let body = "alpha beta\ngamma\n\ndelta epsilon zeta\neta\r\ntheta";
        let path = write(dir.path(), "a.txt", body);
        let expected: Vec<String> = vec!["alpha beta", "gamma", "", "delta epsilon zeta", "eta", "theta"]
            .into_iter()
            .map(String::from)
            .collect();

        for size in 1..(body.len() as u64 + 3) {
            assert_eq!(read_all(&[path.clone()], size), expected, "chunk size {}", size);
        }
    }

    #[test]
    fn test_empty_file_has_no_chunks() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "empty.txt", "");
        assert!(plan_chunks(&[path], 16).unwrap().is_empty());
    }

    #[test]
    fn test_zero_chunk_size() {
        assert!(matches!(plan_chunks(&[], 0), Err(WordCountError::InvalidConfig(_))));
    }

    #[test]
    fn test_chunk_offsets() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "a.txt", "0123456789");
        let chunks = plan_chunks(&[path.clone()], 4).unwrap();
        let ranges: Vec<_> = chunks.iter().map(|c| (c.start, c.end)).collect();
        assert_eq!(ranges, vec![(0, 4), (4, 8), (8, 12)]);
    }

    #[test]
    fn test_resolve_directory_skips_hidden() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.txt", "b");
        write(dir.path(), "a.txt", "a");
        write(dir.path(), "_SUCCESS", "");
        write(dir.path(), ".crc", "");
        fs::create_dir(dir.path().join("nested")).unwrap();

        let files = resolve_inputs(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(files, vec![dir.path().join("a.txt"), dir.path().join("b.txt")]);
    }

    #[test]
    fn test_resolve_glob_and_list() {
        let dir = TempDir::new().unwrap();
        let a = write(dir.path(), "a.log", "a");
        let b = write(dir.path(), "b.txt", "b");
        write(dir.path(), "c.txt", "c");

        let spec = format!("{}/*.log,{}", dir.path().display(), b.display());
        assert_eq!(resolve_inputs(&spec).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_resolve_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.txt");
        match resolve_inputs(missing.to_str().unwrap()) {
            Err(WordCountError::InputNotFound(p)) => assert_eq!(p, missing),
            other => panic!("unexpected: {:?}", other),
        }

        let pattern = format!("{}/*.md", dir.path().display());
        assert!(matches!(resolve_inputs(&pattern), Err(WordCountError::NoInputFiles(_))));
    }
}
