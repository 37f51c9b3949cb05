//! Change detection between the existing and the newly rendered annotation.
//!
//! Both sides are compared as text: the table section (from the
//! `# Table name:` line through the comment lines that follow it) is cut out
//! of each, the column-shaped lines are collected and sorted, and the two
//! sets are compared. Lines above the table section, such as the schema
//! version, never take part, so a version bump alone does not force a
//! rewrite.

use std::sync::LazyLock;

use regex::Regex;

/// The table section: the table-name line and the comment lines after it.
static TABLE_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^# Table name:.*\r?\n(?:#.*\r?\n)*").expect("table section pattern is valid")
});

/// A column description: marker, whitespace, name-like token, whitespace,
/// rest of the line. The table-name line matches this shape as well.
static COLUMN_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#[\t ]+[\w*.`]+[\t ]+.+$").expect("column line pattern is valid")
});

/// Sorted column lines of the old and the new annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationDiff {
    /// Column lines found in the existing annotation.
    pub old_columns: Vec<String>,
    /// Column lines found in the newly rendered annotation.
    pub new_columns: Vec<String>,
}

impl AnnotationDiff {
    /// Compares the annotation currently in a file with a freshly rendered
    /// one. `old` is usually the located region and may be empty when the
    /// file has no annotation yet.
    #[must_use]
    pub fn compute(old: &str, new: &str) -> Self {
        Self {
            old_columns: column_lines(old),
            new_columns: column_lines(new),
        }
    }

    /// Returns `true` if the column sets differ.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.old_columns != self.new_columns
    }

    /// Column lines present only in the new annotation.
    #[must_use]
    pub fn added(&self) -> Vec<&str> {
        self.new_columns
            .iter()
            .filter(|line| self.old_columns.binary_search(*line).is_err())
            .map(String::as_str)
            .collect()
    }

    /// Column lines present only in the old annotation.
    #[must_use]
    pub fn removed(&self) -> Vec<&str> {
        self.old_columns
            .iter()
            .filter(|line| self.new_columns.binary_search(*line).is_err())
            .map(String::as_str)
            .collect()
    }
}

/// Extracts the sorted column lines from the table section of `text`.
#[must_use]
pub fn column_lines(text: &str) -> Vec<String> {
    let Some(section) = TABLE_SECTION.find(text) else {
        return Vec::new();
    };

    let mut lines: Vec<String> = COLUMN_LINE
        .find_iter(section.as_str())
        .map(|m| m.as_str().trim_end_matches('\r').to_string())
        .collect();
    lines.sort();
    lines
}
