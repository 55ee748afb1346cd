//! Border-array (Knuth–Morris–Pratt) exact matching.
//!
//! Kept as the correctness reference for the other strategies.

use super::{sort_stream, Occurrence, PatternMatcher};

/// Builds the border array of `pattern`.
///
/// `B[L]` is the length of the longest proper border of the length-`L`
/// prefix; the array has `pattern.len() + 1` entries and `B[0] = B[1] = 0`.
///
/// # Examples
///
/// ```
/// use bcdemux::border_array;
/// assert_eq!(border_array(b"ABAAB"), vec![0, 0, 0, 1, 1, 2]);
/// ```
pub fn border_array(pattern: &[u8]) -> Vec<usize> {
    let mut border = vec![0; pattern.len() + 1];
    for len in 2..=pattern.len() {
        let c = pattern[len - 1];
        let mut k = border[len - 1];
        while k > 0 && pattern[k] != c {
            k = border[k];
        }
        if pattern[k] == c {
            k += 1;
        }
        border[len] = k;
    }
    border
}

/// Runs the scan and hands each end position to `on_match`.
fn kmp_scan<F: FnMut(usize)>(pattern: &[u8], border: &[usize], text: &[u8], mut on_match: F) {
    let plen = pattern.len();
    if plen == 0 {
        return;
    }
    debug_assert_eq!(border.len(), plen + 1);

    let mut matched = 0;
    for (i, &c) in text.iter().enumerate() {
        while matched > 0 && (matched == plen || pattern[matched] != c) {
            matched = border[matched];
        }
        if pattern[matched] == c {
            matched += 1;
        }
        if matched == plen {
            on_match(i);
        }
    }
}

/// Returns the end positions of every (possibly overlapping) occurrence of
/// `pattern` in `text`, in increasing order.
///
/// `border` must be `border_array(pattern)`.
///
/// # Examples
///
/// ```
/// use bcdemux::{border_array, kmp_find};
/// let border = border_array(b"AA");
/// assert_eq!(kmp_find(b"AA", &border, b"AAAA"), vec![1, 2, 3]);
/// ```
pub fn kmp_find(pattern: &[u8], border: &[usize], text: &[u8]) -> Vec<usize> {
    let mut ends = Vec::new();
    kmp_scan(pattern, border, text, |end| ends.push(end));
    ends
}

/// Counts the (possibly overlapping) occurrences of `pattern` in `text`.
pub fn kmp_count(pattern: &[u8], border: &[usize], text: &[u8]) -> usize {
    let mut count = 0;
    kmp_scan(pattern, border, text, |_| count += 1);
    count
}

/// Multi-pattern matcher running one KMP scan per pattern.
#[derive(Debug, Clone)]
pub struct KmpMatcher {
    patterns: Vec<Vec<u8>>,
    borders: Vec<Vec<usize>>,
    lens: Vec<usize>,
}
impl KmpMatcher {
    pub fn new<P: AsRef<[u8]>>(patterns: &[P]) -> Self {
        let patterns: Vec<Vec<u8>> = patterns.iter().map(|p| p.as_ref().to_vec()).collect();
        let borders = patterns.iter().map(|p| border_array(p)).collect();
        let lens = patterns.iter().map(Vec::len).collect();
        Self {
            patterns,
            borders,
            lens,
        }
    }
}
impl PatternMatcher for KmpMatcher {
    fn num_patterns(&self) -> usize {
        self.patterns.len()
    }
    fn for_each_match(&self, text: &[u8], f: &mut dyn FnMut(Occurrence)) {
        let mut occurrences = Vec::new();
        for (idx, (pattern, border)) in self.patterns.iter().zip(&self.borders).enumerate() {
            kmp_scan(pattern, border, text, |end| {
                occurrences.push(Occurrence::new(idx, end))
            });
        }
        sort_stream(&mut occurrences, &self.lens);
        occurrences.into_iter().for_each(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_find(pattern: &[u8], text: &[u8]) -> Vec<usize> {
        if pattern.is_empty() || pattern.len() > text.len() {
            return Vec::new();
        }
        text.windows(pattern.len())
            .enumerate()
            .filter(|(_, w)| *w == pattern)
            .map(|(i, _)| i + pattern.len() - 1)
            .collect()
    }

    #[test]
    fn test_border_array_edges() {
        assert_eq!(border_array(b""), vec![0]);
        assert_eq!(border_array(b"A"), vec![0, 0]);
        assert_eq!(border_array(b"AAAA"), vec![0, 0, 1, 2, 3]);
        assert_eq!(border_array(b"ACGT"), vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_border_array_textbook() {
        // prefix "AACAA" has border "AA"; "AACAAA" falls back to "AA" then extends
        assert_eq!(border_array(b"AACAAA"), vec![0, 0, 1, 0, 1, 2, 2]);
        assert_eq!(border_array(b"ABABAC"), vec![0, 0, 0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_kmp_overlapping_matches() {
        let p = b"ABA";
        let b = border_array(p);
        assert_eq!(kmp_find(p, &b, b"ABABABA"), vec![2, 4, 6]);
        assert_eq!(kmp_count(p, &b, b"ABABABA"), 3);
    }

    #[test]
    fn test_kmp_no_match_and_short_text() {
        let p = b"GATTACA";
        let b = border_array(p);
        assert!(kmp_find(p, &b, b"GATTAC").is_empty());
        assert!(kmp_find(p, &b, b"").is_empty());
        assert_eq!(kmp_count(b"", &[0], b"ACGT"), 0);
    }

    #[test]
    fn test_kmp_matches_naive() {
        let text = b"AACAAACAACAAAACAAAAACAACA";
        let patterns: [&[u8]; 5] = [b"AACA", b"A", b"CAA", b"AAAA", b"AACAAACAACAAAACAAAAACAACA"];
        for pattern in patterns {
            let b = border_array(pattern);
            assert_eq!(kmp_find(pattern, &b, text), naive_find(pattern, text));
        }
    }

    #[test]
    fn test_matcher_sorts_across_patterns() {
        let m = KmpMatcher::new(&[b"CC".to_vec(), b"AC".to_vec()]);
        assert_eq!(m.num_patterns(), 2);
        assert_eq!(
            m.find_all(b"ACCAC"),
            vec![
                Occurrence::new(1, 1),
                Occurrence::new(0, 2),
                Occurrence::new(1, 4)
            ]
        );
    }
}
