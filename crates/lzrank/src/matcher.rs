//! # Overview
//!
//! Longest-match search over the trailing window. For input position `i` the
//! candidates are every earlier start `j` with `0 < i - j < window`; the run at
//! `j` is compared with the run at `i` up to the end of the input, so a match
//! may overlap the bytes it produces.
//!
//! # Selection rule
//!
//! The longest run wins. Candidates are visited nearest first and only a
//! strictly longer run replaces the incumbent, so ties go to the smallest
//! distance. Runs shorter than [`MIN_MATCH`] are reported as no match. The
//! compressed stream depends on which match is chosen, so every
//! [`MatchFinder`] must apply exactly this rule.
//!
//! # Strategies
//!
//! - [`ExhaustiveFinder`] compares against every candidate in the window.
//! - [`HashChainFinder`] threads earlier positions onto chains keyed by their
//!   first three bytes and walks only the chain of the current position. Any
//!   run of at least three bytes starts with the same three bytes, so walking
//!   the whole in-window chain nearest first visits every candidate that could
//!   win, in the same order.

use core::fmt;
use core::str::FromStr;

use rustc_hash::FxHashMap;

/// Shortest run worth encoding as a back-reference.
pub const MIN_MATCH: usize = 3;

/// A back-reference candidate.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Match {
    /// Bytes between the current position and the start of the earlier run.
    pub distance: usize,
    /// Number of matching bytes.
    pub length: usize,
}

/// Searches for the longest earlier run matching the input at a position.
pub trait MatchFinder {
    /// Returns the longest match for `data[position..]`, if it reaches [`MIN_MATCH`].
    ///
    /// Callers visit positions of one input in increasing order.
    fn longest_match(&mut self, data: &[u8], position: usize) -> Option<Match>;
}

/// Length of the common prefix of `data[candidate..]` and `data[position..]`,
/// bounded by the end of the input.
#[inline]
fn run_length(data: &[u8], candidate: usize, position: usize) -> usize {
    let limit = data.len() - position;
    let mut length = 0;
    while length < limit && data[candidate + length] == data[position + length] {
        length += 1;
    }
    length
}

/// Lowest candidate start for `position`, keeping every distance below `window_size`.
#[inline]
fn window_start(position: usize, window_size: usize) -> usize {
    (position + 1).saturating_sub(window_size)
}

/// Exhaustive search of the window around `position`.
///
/// Returns `None` when no run of at least [`MIN_MATCH`] bytes exists.
#[must_use]
pub fn find_longest_match(data: &[u8], position: usize, window_size: usize) -> Option<Match> {
    let limit = data.len().saturating_sub(position);
    if limit < MIN_MATCH {
        return None;
    }
    let mut best = Match {
        distance: 0,
        length: 0,
    };
    for candidate in (window_start(position, window_size)..position).rev() {
        let length = run_length(data, candidate, position);
        if length > best.length {
            best = Match {
                distance: position - candidate,
                length,
            };
            if length == limit {
                break;
            }
        }
    }
    (best.length >= MIN_MATCH).then_some(best)
}

/// Reference finder that scans every candidate in the window.
#[derive(Clone, Debug)]
pub struct ExhaustiveFinder {
    window_size: usize,
}

impl ExhaustiveFinder {
    /// Creates a finder for the given window size.
    #[must_use]
    pub const fn new(window_size: usize) -> Self {
        Self { window_size }
    }
}

impl MatchFinder for ExhaustiveFinder {
    fn longest_match(&mut self, data: &[u8], position: usize) -> Option<Match> {
        find_longest_match(data, position, self.window_size)
    }
}

const NO_POSITION: usize = usize::MAX;

/// Finder that walks chains of earlier positions sharing a three-byte prefix.
#[derive(Clone, Debug)]
pub struct HashChainFinder {
    window_size: usize,
    /// Prefix -> most recent position starting with it.
    heads: FxHashMap<u32, usize>,
    /// Position modulo the window -> previous position with the same prefix.
    ///
    /// Grows to at most `window_size` links; the slot of a position is reused
    /// once that position has left the window.
    chain: Vec<usize>,
    /// Positions below this have been threaded onto chains.
    inserted: usize,
}

impl HashChainFinder {
    /// Creates a finder for the given window size.
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size: window_size.max(1),
            heads: FxHashMap::default(),
            chain: Vec::new(),
            inserted: 0,
        }
    }

    #[inline]
    fn prefix(data: &[u8], position: usize) -> u32 {
        u32::from(data[position])
            | (u32::from(data[position + 1]) << 8)
            | (u32::from(data[position + 2]) << 16)
    }

    fn insert_up_to(&mut self, data: &[u8], position: usize) {
        let end = position.min(data.len().saturating_sub(MIN_MATCH - 1));
        while self.inserted < end {
            let at = self.inserted;
            let previous = self
                .heads
                .insert(Self::prefix(data, at), at)
                .unwrap_or(NO_POSITION);
            if self.chain.len() < self.window_size {
                self.chain.push(previous);
            } else {
                self.chain[at % self.window_size] = previous;
            }
            self.inserted += 1;
        }
    }
}

impl MatchFinder for HashChainFinder {
    fn longest_match(&mut self, data: &[u8], position: usize) -> Option<Match> {
        let limit = data.len().saturating_sub(position);
        if limit < MIN_MATCH {
            return None;
        }
        self.insert_up_to(data, position);

        let lowest = window_start(position, self.window_size);
        let mut best: Option<Match> = None;
        let mut candidate = self
            .heads
            .get(&Self::prefix(data, position))
            .copied()
            .unwrap_or(NO_POSITION);
        while candidate != NO_POSITION && candidate >= lowest {
            let length = run_length(data, candidate, position);
            if best.is_none_or(|incumbent| length > incumbent.length) {
                best = Some(Match {
                    distance: position - candidate,
                    length,
                });
                if length == limit {
                    break;
                }
            }
            // in-window links have not been overwritten yet
            candidate = self.chain[candidate % self.window_size];
        }
        best
    }
}

/// Match-finding algorithms available to the compressor.
///
/// Every strategy produces byte-identical streams; they differ only in speed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum MatchStrategy {
    /// Compare against every position in the window.
    Exhaustive,
    /// Compare only against positions sharing the current three-byte prefix.
    #[default]
    HashChain,
}

impl MatchStrategy {
    /// Returns the canonical name used in diagnostics and configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Exhaustive => "exhaustive",
            Self::HashChain => "hash-chain",
        }
    }

    /// Returns every strategy compiled into this build.
    #[must_use]
    pub const fn available() -> &'static [Self] {
        &[Self::Exhaustive, Self::HashChain]
    }

    /// Builds a fresh finder for one input stream.
    #[must_use]
    pub fn finder(self, window_size: usize) -> Box<dyn MatchFinder> {
        match self {
            Self::Exhaustive => Box::new(ExhaustiveFinder::new(window_size)),
            Self::HashChain => Box::new(HashChainFinder::new(window_size)),
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown match strategy name.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unsupported match strategy: {input}")]
pub struct MatchStrategyParseError {
    input: String,
}

impl MatchStrategyParseError {
    /// Creates a parse error capturing the original input.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Returns the invalid input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl FromStr for MatchStrategy {
    type Err = MatchStrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exhaustive" | "naive" => Ok(Self::Exhaustive),
            "hash-chain" | "hashchain" | "chain" => Ok(Self::HashChain),
            other => Err(MatchStrategyParseError::new(other)),
        }
    }
}
