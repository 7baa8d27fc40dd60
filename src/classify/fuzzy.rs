//! Fuzzy substring similarity used for phrase and place-name matching.
//!
//! OCR output is noisy (dropped letters, Latin/Cyrillic look-alikes), so lines
//! are matched by similarity rather than equality.

/// Returns the best similarity (0.0-100.0) between the shorter string and any
/// window of the longer one.
///
/// Windows are every needle-length slice of the longer string plus the
/// shorter prefixes and suffixes at its ends, so a line that starts or ends
/// in the middle of the phrase still matches. Each window is scored with the
/// Indel similarity `2 * LCS / (len_a + len_b)`.
///
/// Both strings are compared as-is; callers lowercase them first.
/// Empty input scores 0.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() || b_chars.is_empty() {
        return 0.0;
    }

    let (needle, haystack) = if a_chars.len() <= b_chars.len() {
        (&a_chars[..], &b_chars[..])
    } else {
        (&b_chars[..], &a_chars[..])
    };

    let n = needle.len();
    let h = haystack.len();
    let edges = (1..n).flat_map(move |i| [&haystack[..i], &haystack[h - i..]]);

    let mut best = 0.0f64;
    for candidate in haystack.windows(n).chain(edges) {
        let score = indel_similarity(needle, candidate);
        if score > best {
            best = score;
            if best >= 1.0 {
                break;
            }
        }
    }

    best * 100.0
}

/// Normalized Indel similarity: `2 * LCS / (len_a + len_b)`.
fn indel_similarity(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    2.0 * longest_common_subsequence(a, b) as f64 / total as f64
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}
