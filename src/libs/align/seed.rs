//! Exact word hits used to narrow a full DP to a window.

use crate::libs::seq::SymbolSequence;
use fxhash::FxHashMap;
use std::ops::Range;

/// All `(target_pos, query_pos)` pairs where a word of `word_len` symbols
/// occurs in both sequences, sorted by target then query position.
///
/// ```
/// use seqmol::libs::align::seed::find_matches;
/// use seqmol::libs::seq::{Alphabet, SymbolSequence};
///
/// let alphabet = Alphabet::nucleotide();
/// let query = SymbolSequence::from_text(b"GATT", &alphabet).unwrap();
/// let target = SymbolSequence::from_text(b"CCGATTCC", &alphabet).unwrap();
/// assert_eq!(find_matches(&query, &target, 3), vec![(2, 0), (3, 1)]);
/// ```
pub fn find_matches(
    query: &SymbolSequence,
    target: &SymbolSequence,
    word_len: usize,
) -> Vec<(usize, usize)> {
    if word_len == 0 || query.len() < word_len || target.len() < word_len {
        return vec![];
    }

    let mut index: FxHashMap<&[u8], Vec<usize>> = FxHashMap::default();
    for (pos, word) in query.codes().windows(word_len).enumerate() {
        index.entry(word).or_default().push(pos);
    }

    let mut hits = vec![];
    for (t_pos, word) in target.codes().windows(word_len).enumerate() {
        if let Some(q_positions) = index.get(word) {
            hits.extend(q_positions.iter().map(|&q_pos| (t_pos, q_pos)));
        }
    }
    hits
}

/// Target range covering the query placed on the hit's diagonal, widened by
/// `margin` on both sides and clipped to the target.
///
/// ```
/// use seqmol::libs::align::seed::window_around;
/// assert_eq!(window_around((100, 10), 50, 1000, 20), 70..160);
/// assert_eq!(window_around((5, 10), 50, 60, 20), 0..60);
/// ```
pub fn window_around(
    hit: (usize, usize),
    query_len: usize,
    target_len: usize,
    margin: usize,
) -> Range<usize> {
    let (t_pos, q_pos) = hit;
    let origin = t_pos.saturating_sub(q_pos);
    let start = origin.saturating_sub(margin);
    let end = (origin + query_len + margin).min(target_len);
    start..end.max(start)
}

/// Offset between target and query position; hits on one diagonal share it.
pub fn diagonal(hit: (usize, usize)) -> isize {
    hit.0 as isize - hit.1 as isize
}

/// One hit per cluster of diagonals no more than `band` apart. A window of
/// margin `band` around the kept hit also covers the rest of its cluster.
///
/// ```
/// use seqmol::libs::align::seed::representative_hits;
/// let hits = vec![(10, 0), (11, 1), (12, 0), (40, 0)];
/// assert_eq!(representative_hits(&hits, 5), vec![(10, 0), (40, 0)]);
/// ```
pub fn representative_hits(hits: &[(usize, usize)], band: usize) -> Vec<(usize, usize)> {
    let mut sorted = hits.to_vec();
    sorted.sort_by_key(|&hit| (diagonal(hit), hit.0));

    let mut kept: Vec<(usize, usize)> = vec![];
    for hit in sorted {
        match kept.last() {
            Some(&last) if diagonal(hit) - diagonal(last) <= band as isize => {}
            _ => kept.push(hit),
        }
    }
    kept
}
