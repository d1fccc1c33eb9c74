//! Edit distance for fuzzy term expansion

/// Calculate Levenshtein distance between two strings
///
/// Uses dynamic programming with O(m*n) time and O(min(m,n)) space.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    // Use smaller string for columns to minimize space
    let (shorter, longer, short_len, long_len) = if len1 <= len2 {
        (&s1_chars, &s2_chars, len1, len2)
    } else {
        (&s2_chars, &s1_chars, len2, len1)
    };

    let mut prev_row: Vec<usize> = (0..=short_len).collect();
    let mut curr_row = vec![0; short_len + 1];

    for i in 1..=long_len {
        curr_row[0] = i;

        for j in 1..=short_len {
            let cost = if longer[i - 1] == shorter[j - 1] { 0 } else { 1 };

            curr_row[j] = std::cmp::min(
                std::cmp::min(
                    prev_row[j] + 1,     // deletion
                    curr_row[j - 1] + 1, // insertion
                ),
                prev_row[j - 1] + cost, // substitution
            );
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[short_len]
}

/// Distance between `query` and `candidate` if it is within `max_distance`
///
/// Candidates whose length differs by more than `max_distance` are rejected
/// without running the full computation.
pub fn within_distance(query: &str, candidate: &str, max_distance: u32) -> Option<u32> {
    let max = max_distance as usize;
    let (ql, cl) = (query.chars().count(), candidate.chars().count());
    if ql.abs_diff(cl) > max {
        return None;
    }
    let distance = levenshtein_distance(query, candidate);
    (distance <= max).then_some(distance as u32)
}
