//! Locating a previously inserted annotation inside a file.
//!
//! The region pattern is compiled once per batch from the configuration. It
//! accepts the current header, the legacy `Schema Info` spellings (plain and
//! Markdown), and, when a wrapper is configured, an optional wrapper-open
//! line in front of the header. Files written with or without the wrapper,
//! or by older versions, are therefore all recognized after the user toggles
//! options between runs. Both LF and CRLF line endings are accepted.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::{AnnotateOptions, PLAIN_HEADER};
use crate::error::Result;

/// Legacy header prefix, plain flavor.
pub const COMPAT_PREFIX: &str = "== Schema Info";

/// Legacy header prefix, Markdown flavor.
pub const COMPAT_PREFIX_MD: &str = "## Schema Info";

/// Splits a matched region into its leading whitespace, its body and the
/// whitespace after the last annotation line.
static SURROUNDING_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A(?P<start>\s*).*?\n(?P<end>\s*)\z")
        .expect("whitespace pattern is valid")
});

/// A located annotation block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationRegion<'a> {
    /// Byte offset of the match in the searched text.
    pub start: usize,
    /// Byte offset one past the end of the match.
    pub end: usize,
    /// The full matched text.
    pub text: &'a str,
    /// Whitespace at the start of the match (the optional blank line).
    pub leading_ws: &'a str,
    /// Whitespace after the last annotation line.
    pub trailing_ws: &'a str,
}

/// Compiled matcher for annotation regions.
#[derive(Debug, Clone)]
pub struct AnnotationPattern {
    regex: Regex,
}

impl AnnotationPattern {
    /// Builds the pattern for `header`, optionally accepting a
    /// `# <wrapper_open>` line in front of it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::AnnotateError::InvalidPattern`] if the pattern
    /// does not compile.
    pub fn new(header: &str, wrapper_open: Option<&str>) -> Result<Self> {
        let headers = [header, COMPAT_PREFIX, COMPAT_PREFIX_MD]
            .iter()
            .map(|h| regex::escape(h))
            .collect::<Vec<_>>()
            .join("|");

        let mut pattern = String::from(r"(?m)^(?:\r?\n)?");
        if let Some(open) = wrapper_open {
            pattern.push_str(&format!(r"(?:# {}.*\r?\n)?", regex::escape(open)));
        }
        pattern.push_str(&format!(
            r"# (?:{headers}).*\r?\n(?:#.*\r?\n)*(?:\r?\n)*"
        ));

        Ok(Self {
            regex: Regex::new(&pattern)?,
        })
    }

    /// Builds the pattern for the wrapper in `options`. Both header
    /// spellings match through the legacy prefixes.
    ///
    /// # Errors
    ///
    /// See [`AnnotationPattern::new`].
    pub fn from_options(options: &AnnotateOptions) -> Result<Self> {
        Self::new(PLAIN_HEADER, options.wrapper_open.as_deref())
    }

    /// Returns `true` if `content` contains an annotation region.
    #[must_use]
    pub fn is_match(&self, content: &str) -> bool {
        self.regex.is_match(content)
    }

    /// Counts the annotation regions in `content`.
    #[must_use]
    pub fn count(&self, content: &str) -> usize {
        self.regex.find_iter(content).count()
    }

    /// Finds the first annotation region in `content`.
    ///
    /// A match whose surrounding whitespace cannot be determined is reported
    /// as no region at all, so callers fall back to regenerating the file.
    #[must_use]
    pub fn locate<'a>(&self, content: &'a str) -> Option<AnnotationRegion<'a>> {
        let found = self.regex.find(content)?;
        let text = found.as_str();
        let caps = SURROUNDING_WHITESPACE.captures(text)?;
        let leading_ws = caps.name("start")?.as_str();
        let trailing_ws = caps.name("end")?.as_str();

        Some(AnnotationRegion {
            start: found.start(),
            end: found.end(),
            text,
            leading_ws,
            trailing_ws,
        })
    }
}
