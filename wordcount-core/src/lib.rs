//! wordcount-core
//! ---
//! `wordcount-core` counts word frequencies across a set of text files.
//!
//! What is it?
//! ---
//!
//! It is the engine behind the `wordcount` command: a five stage pipeline that
//! reads lines, splits them into tokens, lowercases the tokens, counts them and
//! writes the counts out.  Input files are split into byte-range chunks which
//! are counted independently across a local thread pool and then merged.
//!
//! * Tokens are maximal runs of alphabetic characters; everything else separates them.
//! * Case is irrelevant: "The" and "the" are the same word.
//! * The sum of all counts equals the number of tokens in the input.
//!
//! How to Use It?
//! ---
//!
//! The modules map onto the stages of the pipeline:
//!
//! 1. `input` - resolves paths and reads lines chunk by chunk
//! 2. `analyzer` - tokenizes and normalizes lines
//! 3. `aggregate` - counts, merges and partitions words
//! 4. `sink` - writes the partitions to an output directory
//!
//! `job` ties them together.
//!
//! Example - Word Count
//! ---
//! ```rust
//! use std::fs;
//! use wordcount_core::job::{count, JobConfig};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("words.txt");
//! fs::write(&path, "Hello, hello world!\n").unwrap();
//!
//! let config = JobConfig::new(path.to_str().unwrap(), dir.path().join("out"));
//! let tally = count(&config).unwrap();
//! assert_eq!(tally.counts["hello"], 2);
//! assert_eq!(tally.counts["world"], 1);
//! ```

#![warn(missing_docs)]

#[macro_use]
extern crate log;

/// Error type and Result alias
pub mod error;

/// Tokenizer and normalizer
pub mod analyzer;

/// Resolving and reading inputs
pub mod input;

/// Counting, merging and partitioning words
pub mod aggregate;

/// Writing results
pub mod sink;

/// Configuration and the end-to-end driver
pub mod job;

pub use error::{Result, WordCountError};
pub use job::{run, JobConfig, JobReport};
