//! Level classification engine.
//!
//! Normalizes the free-form "level" text a user types for a monster into a
//! canonical grade. The same function backs both the creation path and the
//! info-edit path, so a given input always produces the same grade.

use serde::Serialize;

/// Grade for levels in `[100, 1000)`.
pub const GRADE_S: &str = "S";

/// Grade for levels in `[1000, 1e8)`.
pub const GRADE_SS: &str = "SS";

/// Grade for levels in `[1e8, 1e20)`.
pub const GRADE_LEGEND: &str = "LEGEND";

/// Grade for levels at or above `1e20`, and for any text that is neither
/// numeric nor an infinity token.
pub const GRADE_COSMIC: &str = "COSMIC";

/// Grade for inputs containing an infinity token.
pub const GRADE_INFINITY: &str = "INFINITY";

/// Substrings (matched case-insensitively) that short-circuit to
/// [`GRADE_INFINITY`], even when the input also looks numeric.
const INFINITY_TOKENS: &[&str] = &["무한", "무한대", "infinity", "∞", "inf", "무∞"];

/// Result of classifying a raw level string.
///
/// `numeric` is `Some` exactly for the numeric grades (`Lv.{n}`, `S`, `SS`,
/// `LEGEND` and numeric-overflow `COSMIC`); infinity and non-numeric inputs
/// carry no backing number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelClassification {
    /// The trimmed input, persisted verbatim alongside the grade.
    pub input: String,
    /// Canonical grade label.
    pub grade: String,
    /// The parsed number backing the grade, when there is one.
    pub numeric: Option<f64>,
}

/// Classify a raw level string into `{input, grade, numeric}`.
///
/// Pure and deterministic. The ladder boundaries are strict `<`:
///
/// ```
/// use mondex_core::level::classify;
///
/// assert_eq!(classify("42").grade, "Lv.42");
/// assert_eq!(classify("100").grade, "S");
/// assert_eq!(classify("1000").grade, "SS");
/// assert_eq!(classify("무한").grade, "INFINITY");
/// assert_eq!(classify("dragon").grade, "COSMIC");
/// ```
pub fn classify(raw: &str) -> LevelClassification {
    let input = raw.trim().to_string();

    let lower = input.to_lowercase();
    if INFINITY_TOKENS.iter().any(|token| lower.contains(token)) {
        return LevelClassification {
            input,
            grade: GRADE_INFINITY.to_string(),
            numeric: None,
        };
    }

    // Empty strings and NaN parses are "not a number".
    let value = match input.parse::<f64>() {
        Ok(v) if !v.is_nan() => v,
        _ => {
            return LevelClassification {
                input,
                grade: GRADE_COSMIC.to_string(),
                numeric: None,
            }
        }
    };

    let grade = if value < 100.0 {
        // The value's own display form, not a rounded or padded rendering.
        format!("Lv.{value}")
    } else if value < 1_000.0 {
        GRADE_S.to_string()
    } else if value < 100_000_000.0 {
        GRADE_SS.to_string()
    } else if value < 1e20 {
        GRADE_LEGEND.to_string()
    } else {
        GRADE_COSMIC.to_string()
    };

    LevelClassification {
        input,
        grade,
        numeric: Some(value),
    }
}
