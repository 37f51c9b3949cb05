//! Deciding whether and where the new annotation is written.
//!
//! Per file the engine resolves one of these states:
//!
//! - `Skip` - the file carries the skip marker.
//! - `Unchanged` - an annotation exists and its columns match.
//! - `Regenerate` - no annotation yet, or `force`: the file is rebuilt as
//!   magic comments, annotation and body at the configured position.
//! - `Substitute` - an outdated annotation is replaced where it stands,
//!   keeping its surrounding whitespace, so a bottom annotation stays at
//!   the bottom until `force` moves it.
//! - `FrozenAbort` - a write is needed but frozen mode forbids it.

use crate::config::{AnnotateOptions, Position, WrapperMarkers};
use crate::decompose::DecomposedFile;

/// The two ways of producing new file text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Rebuild the file around the annotation.
    Regenerate,
    /// Replace the existing annotation in place.
    Substitute,
}

/// Outcome of placing an annotation into one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The file opted out of annotations.
    Skip,
    /// Nothing to write.
    Unchanged,
    /// A write is required but frozen mode is on.
    FrozenAbort,
    /// The file must be rewritten with `content`.
    Write {
        /// How the content was produced.
        action: Action,
        /// Full new file text.
        content: String,
    },
}

/// Line terminator used when splicing text into a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// Detects the convention of `content` from its first line break.
    /// Files without any line break are LF.
    #[must_use]
    pub fn detect(content: &str) -> Self {
        match content.find('\n') {
            Some(idx) if content[..idx].ends_with('\r') => Self::CrLf,
            _ => Self::Lf,
        }
    }

    /// The terminator itself.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }

    /// Rewrites every line break in `text` to this convention.
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Lf => text.to_string(),
            Self::CrLf => text.replace("\r\n", "\n").replace('\n', "\r\n"),
        }
    }
}

/// Places rendered annotations into decomposed files.
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    wrapper: WrapperMarkers,
    force: bool,
    frozen: bool,
}

impl PlacementEngine {
    /// Creates an engine for the given options.
    #[must_use]
    pub fn new(options: &AnnotateOptions) -> Self {
        Self {
            wrapper: options.wrapper(),
            force: options.force,
            frozen: options.frozen,
        }
    }

    /// Brackets `block` with the configured wrapper markers.
    #[must_use]
    pub fn wrap(&self, block: &str) -> String {
        self.wrapper.wrap(block)
    }

    /// Chooses between regenerating, substituting and leaving the file
    /// alone. Returns `None` when nothing should be written.
    #[must_use]
    pub fn decide(&self, file: &DecomposedFile<'_>) -> Option<Action> {
        if file.is_skipped() {
            return None;
        }
        if !file.has_region() || self.force {
            Some(Action::Regenerate)
        } else if file.is_changed() {
            Some(Action::Substitute)
        } else {
            None
        }
    }

    /// Resolves the placement of `block` into `file`.
    ///
    /// A rewrite that would reproduce the file byte for byte is reported as
    /// [`Placement::Unchanged`] and never trips frozen mode.
    #[must_use]
    pub fn place(&self, file: &DecomposedFile<'_>, block: &str, position: Position) -> Placement {
        if file.is_skipped() {
            return Placement::Skip;
        }
        let Some(action) = self.decide(file) else {
            return Placement::Unchanged;
        };

        let ending = LineEnding::detect(file.raw());
        let wrapped = ending.apply(&self.wrap(block));
        let content = match action {
            Action::Regenerate => regenerate(file, &wrapped, position, ending),
            Action::Substitute => substitute(file, &wrapped),
        };

        if content == file.raw() {
            Placement::Unchanged
        } else if self.frozen {
            Placement::FrozenAbort
        } else {
            Placement::Write { action, content }
        }
    }
}

/// Rebuilds the file as magic comments, annotation and body.
///
/// The body is trimmed at the splice point so repeated runs do not pile up
/// blank lines; exactly one blank line separates magic comments from a
/// leading annotation. A body that starts with a comment is kept one blank
/// line away from a leading annotation, otherwise the next run would read
/// that comment as part of the annotation.
#[must_use]
pub fn regenerate(
    file: &DecomposedFile<'_>,
    wrapped: &str,
    position: Position,
    ending: LineEnding,
) -> String {
    let magic = file.magic_comments();
    let body = file.pure_body();
    let nl = ending.as_str();

    if position.is_bottom() {
        return format!("{magic}{}{nl}{nl}{wrapped}", body.trim_end());
    }

    let body = body.trim_start();
    let gap = if body.starts_with('#') { nl } else { "" };
    if magic.is_empty() {
        format!("{wrapped}{gap}{body}")
    } else {
        format!("{magic}{nl}{wrapped}{gap}{body}")
    }
}

/// Replaces the existing annotation in place, keeping its surrounding
/// whitespace. Without a region the file text is returned unchanged.
#[must_use]
pub fn substitute(file: &DecomposedFile<'_>, wrapped: &str) -> String {
    let raw = file.raw();
    let Some((start, end)) = file.region_span() else {
        return raw.to_string();
    };

    let mut content = String::with_capacity(raw.len() + wrapped.len());
    content.push_str(&raw[..start]);
    content.push_str(file.leading_ws());
    content.push_str(wrapped);
    content.push_str(file.trailing_ws());
    content.push_str(&raw[end..]);
    content
}
