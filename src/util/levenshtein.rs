//! Bounded edit distance for fuzzy term matching.
//!
//! Distances count insertions, deletions, substitutions, and transpositions of
//! adjacent characters (optimal string alignment), which is how fuzzy
//! matching treats swapped letters as a single typo.

use std::cmp::min;

/// Calculate the edit distance between two strings, giving up once it is
/// certain to exceed `threshold`.
///
/// Returns `None` when the distance is larger than `threshold`.
#[allow(clippy::needless_range_loop)]
pub fn bounded_edit_distance(s1: &str, s2: &str, threshold: usize) -> Option<usize> {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    // Early termination if length difference exceeds threshold
    if len1.abs_diff(len2) > threshold {
        return None;
    }
    if len1 == 0 || len2 == 0 {
        let distance = len1.max(len2);
        return (distance <= threshold).then_some(distance);
    }

    // Three rows: the transposition check looks two rows back
    let mut before_prev_row = vec![0; len2 + 1];
    let mut prev_row: Vec<usize> = (0..=len2).collect();
    let mut curr_row = vec![0; len2 + 1];

    for i in 1..=len1 {
        curr_row[0] = i;
        let mut min_in_row = i;

        for j in 1..=len2 {
            let cost = usize::from(s1_chars[i - 1] != s2_chars[j - 1]);

            curr_row[j] = min(
                min(
                    prev_row[j] + 1,     // deletion
                    curr_row[j - 1] + 1, // insertion
                ),
                prev_row[j - 1] + cost, // substitution
            );

            if i > 1
                && j > 1
                && s1_chars[i - 1] == s2_chars[j - 2]
                && s1_chars[i - 2] == s2_chars[j - 1]
            {
                curr_row[j] = min(curr_row[j], before_prev_row[j - 2] + 1);
            }

            min_in_row = min(min_in_row, curr_row[j]);
        }

        // Early termination if minimum in row exceeds threshold
        if min_in_row > threshold {
            return None;
        }

        std::mem::swap(&mut before_prev_row, &mut prev_row);
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    let distance = prev_row[len2];
    (distance <= threshold).then_some(distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings() {
        assert_eq!(bounded_edit_distance("robot", "robot", 0), Some(0));
        assert_eq!(bounded_edit_distance("", "", 0), Some(0));
    }

    #[test]
    fn test_basic_edits() {
        assert_eq!(bounded_edit_distance("robot", "robots", 2), Some(1)); // insertion
        assert_eq!(bounded_edit_distance("robot", "robt", 2), Some(1)); // deletion
        assert_eq!(bounded_edit_distance("robot", "rabot", 2), Some(1)); // substitution
        assert_eq!(bounded_edit_distance("kitten", "sitting", 3), Some(3));
    }

    #[test]
    fn test_transposition_is_one_edit() {
        assert_eq!(bounded_edit_distance("pyhton", "python", 2), Some(1));
        assert_eq!(bounded_edit_distance("ab", "ba", 1), Some(1));
    }

    #[test]
    fn test_threshold_cuts_off() {
        assert_eq!(bounded_edit_distance("kitten", "sitting", 2), None);
        assert_eq!(bounded_edit_distance("art", "science", 2), None);
        assert_eq!(bounded_edit_distance("", "abc", 2), None);
        assert_eq!(bounded_edit_distance("", "ab", 2), Some(2));
    }

    #[test]
    fn test_unicode_counts_characters() {
        assert_eq!(bounded_edit_distance("café", "cafe", 1), Some(1));
        assert_eq!(bounded_edit_distance("résumé", "resume", 2), Some(2));
    }
}
