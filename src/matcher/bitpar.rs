//! Word-parallel fixed-window matching.
//!
//! Every length-`P` window of the text is compared against the pattern eight
//! bytes at a time as `u64` equality, with a zero-padded final chunk when `P`
//! is not a multiple of eight. Window offsets are arbitrary, so every word is
//! read with an unaligned load.

use super::{sort_stream, Occurrence, PatternMatcher};

const WORD: usize = std::mem::size_of::<u64>();

/// Loads exactly eight bytes from an arbitrarily aligned slice.
#[inline]
fn load_word(bytes: &[u8]) -> u64 {
    bytemuck::pod_read_unaligned(bytes)
}

/// Loads up to eight bytes, zero-padding the high end.
#[inline]
fn load_tail(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; WORD];
    buf[..bytes.len()].copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}

/// A pattern pre-split into words.
#[derive(Debug, Clone)]
struct WordPattern {
    words: Vec<u64>,
    tail: u64,
    len: usize,
}
impl WordPattern {
    fn new(pattern: &[u8]) -> Self {
        let chunks = pattern.chunks_exact(WORD);
        let tail = load_tail(chunks.remainder());
        let words = chunks.map(load_word).collect();
        Self {
            words,
            tail,
            len: pattern.len(),
        }
    }

    #[inline]
    fn matches_at(&self, text: &[u8], start: usize) -> bool {
        let window = &text[start..start + self.len];
        let mut good = true;
        let mut chunks = window.chunks_exact(WORD);
        for (word, chunk) in self.words.iter().zip(&mut chunks) {
            good &= *word == load_word(chunk);
        }
        let rem = chunks.remainder();
        if !rem.is_empty() {
            good &= self.tail == load_tail(rem);
        }
        good
    }

    fn scan<F: FnMut(usize)>(&self, text: &[u8], mut on_match: F) {
        if self.len == 0 || self.len > text.len() {
            return;
        }
        for start in 0..=text.len() - self.len {
            if self.matches_at(text, start) {
                on_match(start + self.len - 1);
            }
        }
    }
}

/// Returns the end positions of every occurrence of `pattern` in `text`.
///
/// # Examples
///
/// ```
/// use bcdemux::bit_parallel_find;
/// assert_eq!(bit_parallel_find(b"ACGTACGTAC", b"xACGTACGTACGTACx"), vec![10, 14]);
/// ```
pub fn bit_parallel_find(pattern: &[u8], text: &[u8]) -> Vec<usize> {
    let mut ends = Vec::new();
    WordPattern::new(pattern).scan(text, |end| ends.push(end));
    ends
}

/// Counts the occurrences of `pattern` in `text`.
pub fn bit_parallel_count(pattern: &[u8], text: &[u8]) -> usize {
    let mut count = 0;
    WordPattern::new(pattern).scan(text, |_| count += 1);
    count
}

/// Multi-pattern matcher running one window scan per pattern.
#[derive(Debug, Clone)]
pub struct BitParallelMatcher {
    patterns: Vec<WordPattern>,
    lens: Vec<usize>,
}
impl BitParallelMatcher {
    pub fn new<P: AsRef<[u8]>>(patterns: &[P]) -> Self {
        let patterns: Vec<WordPattern> = patterns
            .iter()
            .map(|p| WordPattern::new(p.as_ref()))
            .collect();
        let lens = patterns.iter().map(|p| p.len).collect();
        Self { patterns, lens }
    }
}
impl PatternMatcher for BitParallelMatcher {
    fn num_patterns(&self) -> usize {
        self.patterns.len()
    }
    fn for_each_match(&self, text: &[u8], f: &mut dyn FnMut(Occurrence)) {
        let mut occurrences = Vec::new();
        for (idx, pattern) in self.patterns.iter().enumerate() {
            pattern.scan(text, |end| occurrences.push(Occurrence::new(idx, end)));
        }
        sort_stream(&mut occurrences, &self.lens);
        occurrences.into_iter().for_each(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{border_array, kmp_find};

    #[test]
    fn test_word_multiple_lengths() {
        let pattern = b"ACGTACGTTGCATGCA";
        let text = b"TTACGTACGTTGCATGCAACGTACGTTGCATGCA";
        assert_eq!(bit_parallel_find(pattern, text), vec![17, 33]);
    }

    #[test]
    fn test_partial_word_lengths() {
        // every length from 1 to 19 crosses the chunk boundary differently
        let text = b"GGATTACAGATTACAGATTACAGG";
        let source = b"GATTACAGATTACAGATTA";
        for len in 1..=source.len() {
            let pattern = &source[..len];
            let border = border_array(pattern);
            assert_eq!(
                bit_parallel_find(pattern, text),
                kmp_find(pattern, &border, text),
                "length {len}"
            );
        }
    }

    #[test]
    fn test_unaligned_windows() {
        // the window start walks through every offset within a word
        let mut owned = vec![b'N'; 64];
        for offset in 0..WORD {
            owned.fill(b'N');
            owned[offset + 3..offset + 13].copy_from_slice(b"ACGTTGCAAC");
            let text = &owned[offset..];
            assert_eq!(bit_parallel_find(b"ACGTTGCAAC", text), vec![12]);
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(bit_parallel_find(b"", b"ACGT").is_empty());
        assert!(bit_parallel_find(b"ACGTA", b"ACGT").is_empty());
        assert_eq!(bit_parallel_count(b"A", b"AAAA"), 4);
        assert_eq!(bit_parallel_count(b"ACGT", b"ACGT"), 1);
    }

    #[test]
    fn test_tail_does_not_match_padding() {
        // a zero byte in the text must not be confused with tail padding
        let pattern = b"ACGTACGTA";
        let mut text = b"ACGTACGTA".to_vec();
        text.push(0);
        assert_eq!(bit_parallel_find(pattern, &text), vec![8]);
        assert!(bit_parallel_find(&[b'A', 0], b"A").is_empty());
    }
}
