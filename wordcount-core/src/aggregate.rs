//! Aggregator
//! ---
//! Counts words within a block of lines, merges the per-block counts and
//! re-partitions the final mapping by key.

use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::analyzer::Analyzer;
use crate::error::Result;
use crate::input::{read_chunk, Chunk};

/// Occurrence count per normalized word
pub type WordCounts = HashMap<String, u64>;

/// A slice of the key space, sorted by word
pub type Partition = Vec<(String, u64)>;

/// Word counts together with the number of lines they were drawn from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    /// Per-word counts
    pub counts: WordCounts,
    /// Lines consumed
    pub lines: u64,
}

impl Tally {
    /// Creates an empty tally
    pub fn new() -> Self {
        Tally::default()
    }

    /// Records one line, counting every word the analyzer finds in it
    pub fn add_line(&mut self, line: &str, analyzer: &Analyzer) {
        let counts = &mut self.counts;
        analyzer.analyze(line, |word| add_word(counts, word));
        self.lines += 1;
    }

    /// Combines two tallies
    pub fn merge(self, other: Tally) -> Tally {
        Tally {
            counts: merge_counts(self.counts, other.counts),
            lines: self.lines + other.lines,
        }
    }

    /// Total number of tokens counted
    pub fn total_tokens(&self) -> u64 {
        total_tokens(&self.counts)
    }
}

/// Increments the count for `word`, only allocating when it is new
#[inline]
pub fn add_word(counts: &mut WordCounts, word: Cow<'_, str>) {
    if let Some(c) = counts.get_mut(word.as_ref()) {
        *c += 1;
    } else {
        counts.insert(word.into_owned(), 1);
    }
}

/// Counts the words of a block of lines
/// ```rust
///   use wordcount_core::aggregate::count_lines;
///   use wordcount_core::analyzer::Analyzer;
///
///   let counts = count_lines(vec!["The cat", "the hat"], &Analyzer::default());
///   assert_eq!(counts["the"], 2);
///   assert_eq!(counts["hat"], 1);
/// ```
pub fn count_lines<'a, I: IntoIterator<Item = &'a str>>(lines: I, analyzer: &Analyzer) -> WordCounts {
    let mut tally = Tally::new();
    for line in lines {
        tally.add_line(line, analyzer);
    }
    tally.counts
}

/// Reads and counts a single chunk
pub fn count_chunk(chunk: &Chunk, analyzer: &Analyzer) -> Result<Tally> {
    let mut tally = Tally::new();
    read_chunk(chunk, |line| tally.add_line(line, analyzer))?;
    trace!(
        "Chunk {:?}@{} counted {} lines, {} distinct words",
        chunk.path,
        chunk.start,
        tally.lines,
        tally.counts.len()
    );
    Ok(tally)
}

/// Sums two mappings key-wise.  The smaller map is folded into the larger.
pub fn merge_counts(left: WordCounts, right: WordCounts) -> WordCounts {
    let (mut big, small) = if left.len() >= right.len() {
        (left, right)
    } else {
        (right, left)
    };
    for (k, v) in small {
        *big.entry(k).or_insert(0) += v;
    }
    big
}

/// Sum of every count in the mapping
pub fn total_tokens(counts: &WordCounts) -> u64 {
    counts.values().sum()
}

/// Partition index for `word` among `n_partitions`.  Uses a fixed-key hasher
/// so a word maps to the same partition on every run.
pub fn partition_for(word: &str, n_partitions: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    word.hash(&mut hasher);
    (hasher.finish() % n_partitions.max(1) as u64) as usize
}

/// Splits the mapping into `n_partitions` partitions by key hash, each sorted
/// by word.  Always returns at least one partition.
pub fn partition_by_key(counts: WordCounts, n_partitions: usize) -> Vec<Partition> {
    let n = n_partitions.max(1);
    let mut parts: Vec<Partition> = vec![Vec::new(); n];
    for (word, count) in counts {
        let p = partition_for(&word, n);
        parts[p].push((word, count));
    }
    for part in parts.iter_mut() {
        part.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    }
    parts
}
