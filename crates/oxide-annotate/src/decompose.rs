//! Splitting a source file into magic comments, annotation and body.

use crate::diff::AnnotationDiff;
use crate::magic::extract_magic_comments;
use crate::pattern::{AnnotationPattern, AnnotationRegion};

/// A file containing this marker is never annotated or deannotated.
pub const SKIP_MARKER: &str = "# -*- SkipSchemaAnnotations";

/// A source file taken apart for re-annotation.
///
/// Built fresh for every attempt and dropped once the new text exists.
#[derive(Debug, Clone)]
pub struct DecomposedFile<'a> {
    raw: &'a str,
    magic_comments: &'a str,
    region: Option<AnnotationRegion<'a>>,
    region_count: usize,
    pure_body: String,
    diff: AnnotationDiff,
    skip: bool,
}

impl<'a> DecomposedFile<'a> {
    /// Decomposes `raw` and diffs its annotation against `new_block`.
    #[must_use]
    pub fn new(raw: &'a str, new_block: &str, pattern: &AnnotationPattern) -> Self {
        let magic_comments = extract_magic_comments(raw);
        let rest = &raw[magic_comments.len()..];
        let region_count = pattern.count(rest);
        let region = pattern.locate(rest);

        let pure_body = match &region {
            Some(region) => {
                let mut body = String::with_capacity(rest.len() - region.text.len());
                body.push_str(&rest[..region.start]);
                body.push_str(&rest[region.end..]);
                body
            }
            None => rest.to_string(),
        };

        let old = region.map_or("", |r| r.text);
        let diff = AnnotationDiff::compute(old, new_block);

        Self {
            raw,
            magic_comments,
            region,
            region_count,
            pure_body,
            diff,
            skip: raw.contains(SKIP_MARKER),
        }
    }

    /// The original file text.
    #[must_use]
    pub const fn raw(&self) -> &'a str {
        self.raw
    }

    /// Leading magic comment lines, verbatim.
    #[must_use]
    pub const fn magic_comments(&self) -> &'a str {
        self.magic_comments
    }

    /// File content without magic comments and without the annotation.
    #[must_use]
    pub fn pure_body(&self) -> &str {
        &self.pure_body
    }

    /// Returns `true` if the file already carries an annotation.
    #[must_use]
    pub const fn has_region(&self) -> bool {
        self.region.is_some()
    }

    /// Byte range of the annotation within [`DecomposedFile::raw`].
    #[must_use]
    pub fn region_span(&self) -> Option<(usize, usize)> {
        let offset = self.magic_comments.len();
        self.region.map(|r| (offset + r.start, offset + r.end))
    }

    /// Number of annotation-shaped blocks in the file.
    #[must_use]
    pub const fn region_count(&self) -> usize {
        self.region_count
    }

    /// Returns `true` if the columns differ from the new annotation.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.diff.is_changed()
    }

    /// The column comparison behind [`DecomposedFile::is_changed`].
    #[must_use]
    pub const fn diff(&self) -> &AnnotationDiff {
        &self.diff
    }

    /// Whitespace before the existing annotation, empty without one.
    #[must_use]
    pub fn leading_ws(&self) -> &'a str {
        self.region.map_or("", |r| r.leading_ws)
    }

    /// Whitespace after the existing annotation, empty without one.
    #[must_use]
    pub fn trailing_ws(&self) -> &'a str {
        self.region.map_or("", |r| r.trailing_ws)
    }

    /// Returns `true` if the file opted out with [`SKIP_MARKER`].
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        self.skip
    }
}
