//! Aho–Corasick multi-pattern automaton.
//!
//! The automaton is a byte trie over every pattern with failure links and
//! merged output sets. Output sets are merged along failure chains at build
//! time, so a scan emits the full set of patterns ending at a position by
//! reading a single state's list.

use std::collections::VecDeque;

use super::{Occurrence, PatternMatcher};

type StateId = u32;
const ROOT: StateId = 0;

#[derive(Debug, Clone, Default)]
struct State {
    /// Goto edges, sorted by byte
    trans: Vec<(u8, StateId)>,
    /// Longest proper suffix of this state's string that is also a trie prefix
    fail: StateId,
    /// Patterns ending here: own patterns first, then the failure target's set
    out: Vec<usize>,
}
impl State {
    #[inline]
    fn goto(&self, byte: u8) -> Option<StateId> {
        self.trans
            .binary_search_by_key(&byte, |&(b, _)| b)
            .ok()
            .map(|i| self.trans[i].1)
    }
}

/// An immutable Aho–Corasick automaton.
///
/// Built once from a pattern list; scanning never mutates it, so one
/// automaton may be shared by any number of concurrent scans.
///
/// # Examples
///
/// ```
/// use bcdemux::{AhoCorasick, Occurrence};
///
/// let ac = AhoCorasick::new(&[b"AGCT".as_slice(), b"GGTT".as_slice()]);
/// let hits: Vec<Occurrence> = ac.scan(b"AGCTGGTTAGCT").collect();
/// assert_eq!(
///     hits,
///     vec![Occurrence::new(0, 3), Occurrence::new(1, 7), Occurrence::new(0, 11)]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct AhoCorasick {
    states: Vec<State>,
    num_patterns: usize,
}
impl AhoCorasick {
    /// Builds the automaton over `patterns`.
    ///
    /// Pattern indices in the scan output are positions in `patterns`.
    /// Zero-length patterns are accepted but never reported.
    pub fn new<P: AsRef<[u8]>>(patterns: &[P]) -> Self {
        let mut ac = Self {
            states: vec![State::default()],
            num_patterns: patterns.len(),
        };
        for (idx, pattern) in patterns.iter().enumerate() {
            ac.insert(idx, pattern.as_ref());
        }
        ac.link();
        ac
    }

    fn insert(&mut self, idx: usize, pattern: &[u8]) {
        if pattern.is_empty() {
            return;
        }
        let mut sid = ROOT;
        for &byte in pattern {
            let state = &self.states[sid as usize];
            sid = match state.trans.binary_search_by_key(&byte, |&(b, _)| b) {
                Ok(pos) => state.trans[pos].1,
                Err(pos) => {
                    let next = self.states.len() as StateId;
                    self.states[sid as usize].trans.insert(pos, (byte, next));
                    self.states.push(State::default());
                    next
                }
            };
        }
        self.states[sid as usize].out.push(idx);
    }

    /// Computes failure links breadth-first and merges output sets.
    fn link(&mut self) {
        let mut queue = VecDeque::new();
        for &(_, child) in &self.states[ROOT as usize].trans {
            // depth-1 states already fail to the root
            queue.push_back(child);
        }

        while let Some(sid) = queue.pop_front() {
            let edges = self.states[sid as usize].trans.clone();
            for (byte, child) in edges {
                let mut f = self.states[sid as usize].fail;
                let fail = loop {
                    if let Some(next) = self.states[f as usize].goto(byte) {
                        break next;
                    }
                    if f == ROOT {
                        break ROOT;
                    }
                    f = self.states[f as usize].fail;
                };

                let inherited = self.states[fail as usize].out.clone();
                let state = &mut self.states[child as usize];
                state.fail = fail;
                state.out.extend(inherited);
                queue.push_back(child);
            }
        }
    }

    /// Follows goto edges from `sid`, falling back along failure links.
    #[inline]
    fn next_state(&self, mut sid: StateId, byte: u8) -> StateId {
        loop {
            let state = &self.states[sid as usize];
            if let Some(next) = state.goto(byte) {
                return next;
            }
            if sid == ROOT {
                return ROOT;
            }
            sid = state.fail;
        }
    }

    /// Number of trie states, including the root.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_patterns(&self) -> usize {
        self.num_patterns
    }

    /// Starts a fresh scan of `text` from the root state.
    pub fn scan<'a>(&'a self, text: &'a [u8]) -> Scan<'a> {
        Scan {
            ac: self,
            text,
            pos: 0,
            state: ROOT,
            end: 0,
            emitted: 0,
        }
    }
}
impl PatternMatcher for AhoCorasick {
    fn num_patterns(&self) -> usize {
        self.num_patterns
    }
    fn for_each_match(&self, text: &[u8], f: &mut dyn FnMut(Occurrence)) {
        self.scan(text).for_each(f);
    }
}

/// Lazy stream of occurrences over one text.
///
/// Yields every pattern index of the current state's output set after each
/// consumed byte. Single pass; start a new scan for a new text.
#[derive(Debug, Clone)]
pub struct Scan<'a> {
    ac: &'a AhoCorasick,
    text: &'a [u8],
    /// Next byte to consume
    pos: usize,
    state: StateId,
    /// Position of the last consumed byte
    end: usize,
    /// Outputs of the current state already yielded
    emitted: usize,
}
impl Iterator for Scan<'_> {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let out = &self.ac.states[self.state as usize].out;
            if self.emitted < out.len() {
                let pattern = out[self.emitted];
                self.emitted += 1;
                return Some(Occurrence::new(pattern, self.end));
            }
            let &byte = self.text.get(self.pos)?;
            self.state = self.ac.next_state(self.state, byte);
            self.end = self.pos;
            self.pos += 1;
            self.emitted = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revcomp;

    fn ends_of(ac: &AhoCorasick, text: &[u8], pattern: usize) -> Vec<usize> {
        ac.scan(text)
            .filter(|o| o.pattern == pattern)
            .map(|o| o.end)
            .collect()
    }

    #[test]
    fn test_completeness() {
        let ac = AhoCorasick::new(&[b"AGCT".to_vec(), b"GGTT".to_vec()]);
        let text = b"AGCTGGTTAGCT";
        assert_eq!(ends_of(&ac, text, 0), vec![3, 11]);
        assert_eq!(ends_of(&ac, text, 1), vec![7]);
    }

    #[test]
    fn test_failure_links_collect_suffix_patterns() {
        // classic he/she/his/hers example
        let patterns: [&[u8]; 4] = [b"he", b"she", b"his", b"hers"];
        let ac = AhoCorasick::new(&patterns);
        let hits: Vec<Occurrence> = ac.scan(b"ushers").collect();
        assert_eq!(
            hits,
            vec![
                Occurrence::new(1, 3),
                Occurrence::new(0, 3),
                Occurrence::new(3, 5)
            ]
        );
    }

    #[test]
    fn test_state_count() {
        let patterns: [&[u8]; 3] = [b"ACG", b"ACT", b"AC"];
        let ac = AhoCorasick::new(&patterns);
        // root, A, AC, ACG, ACT
        assert_eq!(ac.num_states(), 5);
        assert_eq!(ac.num_patterns(), 3);
    }

    #[test]
    fn test_overlapping_self_matches() {
        let ac = AhoCorasick::new(&[b"AAA".to_vec()]);
        assert_eq!(ends_of(&ac, b"AAAAA", 0), vec![2, 3, 4]);
    }

    #[test]
    fn test_forward_and_revcomp_entries() {
        let barcodes = [b"AACG".to_vec()];
        let mut patterns = barcodes.to_vec();
        patterns.extend(barcodes.iter().map(|b| revcomp(b)));
        let ac = AhoCorasick::new(&patterns);

        // CGTT is the reverse complement of AACG
        let hits: Vec<Occurrence> = ac.scan(b"TTAACGTTT").collect();
        assert_eq!(hits, vec![Occurrence::new(0, 5), Occurrence::new(1, 7)]);
    }

    #[test]
    fn test_palindrome_reported_under_both_entries() {
        let ac = AhoCorasick::new(&[b"AGCT".to_vec(), revcomp(b"AGCT")]);
        let hits: Vec<Occurrence> = ac.scan(b"GAGCTG").collect();
        assert_eq!(hits, vec![Occurrence::new(0, 4), Occurrence::new(1, 4)]);
    }

    #[test]
    fn test_no_patterns() {
        let ac = AhoCorasick::new::<Vec<u8>>(&[]);
        assert_eq!(ac.num_states(), 1);
        assert_eq!(ac.scan(b"ACGTACGT").count(), 0);
    }

    #[test]
    fn test_non_dna_bytes() {
        let ac = AhoCorasick::new(&[vec![0u8, 255, b'N']]);
        assert_eq!(ends_of(&ac, &[1, 0, 255, b'N', 0], 0), vec![3]);
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let patterns = [b"ACGT".to_vec(), b"CGTA".to_vec(), b"GTAC".to_vec()];
        let text = b"ACGTACGTACGTNNACGT";
        let first: Vec<Occurrence> = AhoCorasick::new(&patterns).scan(text).collect();
        let second: Vec<Occurrence> = AhoCorasick::new(&patterns).scan(text).collect();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_fresh_scan_restarts_at_root() {
        let ac = AhoCorasick::new(&[b"ACGT".to_vec()]);
        // a scan over "AC" must not leave state behind for "GT"
        assert_eq!(ac.scan(b"AC").count(), 0);
        assert_eq!(ac.scan(b"GT").count(), 0);
        assert_eq!(ac.scan(b"ACGT").count(), 1);
    }
}
