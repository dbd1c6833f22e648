//! Partial-ratio fuzzy similarity.
//!
//! Scores how well the shorter of two strings fits somewhere inside the
//! longer one, on a 0-100 scale:
//!
//! ```text
//! partial_ratio("chicken", "Chicken Curry") == 100
//! partial_ratio("chiken",  "Chicken Curry") ==  67
//! ```
//!
//! The shorter string is slid across every window of the same length in the
//! longer string. Each window is scored by normalized Levenshtein similarity
//! and the best window wins. Matching works on `char`s and is case-insensitive,
//! so multi-byte text (kana, kanji) is compared character by character.

use strsim::levenshtein;

/// Maximum similarity score
pub const MAX_SCORE: u8 = 100;

/// Partial-ratio similarity between two strings, 0 to 100.
///
/// Returns 0 when either side is empty. An exact (case-insensitive) substring
/// always scores 100.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if shorter.is_empty() {
        return 0;
    }

    let needle: String = shorter.iter().collect();
    let width = shorter.len();
    let mut best = 0.0_f64;

    for window in longer.windows(width) {
        let candidate: String = window.iter().collect();
        let distance = levenshtein(&needle, &candidate);
        let similarity = 1.0 - distance as f64 / width as f64;
        if similarity > best {
            best = similarity;
            if distance == 0 {
                break;
            }
        }
    }

    (best * f64::from(MAX_SCORE)).round() as u8
}
