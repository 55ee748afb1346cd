//! Reverse complementation over arbitrary bytes.
//!
//! `A↔T` and `C↔G` are swapped with case preserved; every other byte value
//! (including `N`, gaps and control bytes) maps to itself, so the mapping is
//! total over `u8` and complementation never fails.

/// Complement lookup for every byte value.
pub static COMPLEMENT: [u8; 256] = build_complement_table();

const fn build_complement_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = i as u8;
        i += 1;
    }
    table[b'A' as usize] = b'T';
    table[b'T' as usize] = b'A';
    table[b'C' as usize] = b'G';
    table[b'G' as usize] = b'C';
    table[b'a' as usize] = b't';
    table[b't' as usize] = b'a';
    table[b'c' as usize] = b'g';
    table[b'g' as usize] = b'c';
    table
}

/// Complement of a single byte.
#[inline]
pub fn complement(b: u8) -> u8 {
    COMPLEMENT[b as usize]
}

/// Returns the reverse complement of `seq` as a new buffer.
///
/// # Examples
///
/// ```
/// use bcdemux::revcomp;
/// assert_eq!(revcomp(b"AAAC"), b"GTTT");
/// assert_eq!(revcomp(b"Acgt"), b"acgT");
/// assert_eq!(revcomp(b"AN-C"), b"G-NT");
/// ```
pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}

/// Reverse complements `seq` in place.
pub fn revcomp_in_place(seq: &mut [u8]) {
    seq.reverse();
    seq.iter_mut().for_each(|b| *b = complement(*b));
}
