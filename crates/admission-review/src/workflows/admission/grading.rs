//! Grade normalisation across the supported grading scales.
//!
//! Three systems share one 0–20 range so grades from different transcripts
//! compare directly: letters `A`–`F`, the word scale `MVG`/`VG`/`G`/`IG`, and
//! numerals `5`–`0`.

/// Value assigned to any token outside the known scales.
pub const FAILING_VALUE: f64 = 0.0;

const GRADE_TABLE: &[(&str, f64)] = &[
    ("A", 20.0),
    ("B", 17.5),
    ("C", 15.0),
    ("D", 12.5),
    ("E", 10.0),
    ("F", 0.0),
    ("MVG", 20.0),
    ("VG", 15.0),
    ("G", 10.0),
    ("IG", 0.0),
    ("5", 20.0),
    ("4", 17.5),
    ("3", 15.0),
    ("2", 12.5),
    ("1", 10.0),
    ("0", 0.0),
];

fn lookup(token: &str) -> Option<f64> {
    let folded = token.trim().to_uppercase();
    GRADE_TABLE
        .iter()
        .find(|(grade, _)| *grade == folded)
        .map(|(_, value)| *value)
}

/// Numeric value of a grade token. Unknown or empty tokens count as failing.
pub fn grade_value(token: &str) -> f64 {
    lookup(token).unwrap_or(FAILING_VALUE)
}

/// Whether the token belongs to one of the supported scales.
pub fn is_recognized(token: &str) -> bool {
    lookup(token).is_some()
}
