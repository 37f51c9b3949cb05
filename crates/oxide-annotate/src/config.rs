//! Annotation configuration.
//!
//! [`AnnotateOptions`] is built once at the start of a batch and passed by
//! reference to every component afterwards. Nothing in the crate keeps
//! settings in process-wide state.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{AnnotateError, Result};

/// Header line written by the renderer in plain mode.
pub const PLAIN_HEADER: &str = "== Schema Information";

/// Header line written by the renderer in Markdown mode.
pub const MARKDOWN_HEADER: &str = "## Schema Information";

/// Where an annotation is placed when a file is (re)generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Position {
    /// Right before the declaration, after any magic comments.
    /// Also spelled `top`.
    #[default]
    Before,
    /// At the very end of the file, after a blank line.
    /// Also spelled `bottom`.
    After,
}

impl Position {
    /// Returns `true` for the end-of-file placement.
    #[must_use]
    pub const fn is_bottom(self) -> bool {
        matches!(self, Self::After)
    }
}

impl FromStr for Position {
    type Err = AnnotateError;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let name = trimmed.strip_prefix(':').unwrap_or(trimmed);
        match name.to_ascii_lowercase().as_str() {
            "before" | "top" => Ok(Self::Before),
            "after" | "bottom" => Ok(Self::After),
            _ => Err(AnnotateError::InvalidPosition(value.to_string())),
        }
    }
}

impl TryFrom<String> for Position {
    type Error = AnnotateError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
        }
    }
}

/// The kinds of files that receive annotations, each with its own
/// position setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum FileKind {
    /// The model class itself.
    #[default]
    Class,
    /// Unit or model test.
    Test,
    /// Fixture file.
    Fixture,
    /// Factory definition.
    Factory,
    /// Serializer class.
    Serializer,
    /// Controller.
    Controller,
    /// View helper.
    Helper,
    /// Routes file.
    Routes,
    /// Admin registration.
    Admin,
    /// Any file matched by user-defined additional patterns.
    Additional,
}

impl FileKind {
    /// The configuration key that holds this kind's position.
    #[must_use]
    pub const fn position_key(self) -> &'static str {
        match self {
            Self::Class => "position_in_class",
            Self::Test => "position_in_test",
            Self::Fixture => "position_in_fixture",
            Self::Factory => "position_in_factory",
            Self::Serializer => "position_in_serializer",
            Self::Controller => "position_in_controller",
            Self::Helper => "position_in_helper",
            Self::Routes => "position_in_routes",
            Self::Admin => "position_in_admin",
            Self::Additional => "position_in_additional_file_patterns",
        }
    }
}

/// Optional open/close marker lines bracketing the annotation.
///
/// Markers are stored without the comment prefix; `"START"` is written as
/// `# START`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrapperMarkers {
    /// Line written before the annotation.
    pub open: Option<String>,
    /// Line written after the annotation.
    pub close: Option<String>,
}

impl WrapperMarkers {
    /// Brackets `block` with the configured markers.
    #[must_use]
    pub fn wrap(&self, block: &str) -> String {
        let mut wrapped = String::with_capacity(block.len() + 64);
        if let Some(open) = &self.open {
            wrapped.push_str("# ");
            wrapped.push_str(open);
            wrapped.push('\n');
        }
        wrapped.push_str(block);
        if let Some(close) = &self.close {
            wrapped.push_str("# ");
            wrapped.push_str(close);
            wrapped.push('\n');
        }
        wrapped
    }
}

/// Options controlling annotation placement and rewriting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnnotateOptions {
    /// Fallback position for every file kind.
    pub position: Position,
    /// Position in model class files.
    pub position_in_class: Option<Position>,
    /// Position in test files.
    pub position_in_test: Option<Position>,
    /// Position in fixture files.
    pub position_in_fixture: Option<Position>,
    /// Position in factory files.
    pub position_in_factory: Option<Position>,
    /// Position in serializer files.
    pub position_in_serializer: Option<Position>,
    /// Position in controller files.
    pub position_in_controller: Option<Position>,
    /// Position in helper files.
    pub position_in_helper: Option<Position>,
    /// Position in routes files.
    pub position_in_routes: Option<Position>,
    /// Position in admin files.
    pub position_in_admin: Option<Position>,
    /// Position in files matched by additional patterns.
    pub position_in_additional_file_patterns: Option<Position>,
    /// Regenerate the annotation even when columns are unchanged, moving it
    /// to the configured position.
    pub force: bool,
    /// Fail instead of writing when a file needs an update.
    pub frozen: bool,
    /// Marker line written before the annotation.
    pub wrapper_open: Option<String>,
    /// Marker line written after the annotation.
    pub wrapper_close: Option<String>,
}

impl AnnotateOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads options from a JSON file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotateError::Io`] if the file cannot be read and
    /// [`AnnotateError::Config`] if it is not valid configuration.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AnnotateError::io(path, e))?;
        Self::from_json_str(&content).map_err(|source| AnnotateError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses options from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `json` is not valid configuration.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the fallback position.
    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Sets the position for one file kind.
    #[must_use]
    pub fn with_position_for(mut self, kind: FileKind, position: Position) -> Self {
        *self.position_slot(kind) = Some(position);
        self
    }

    /// Enables forced regeneration.
    #[must_use]
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Enables frozen mode.
    #[must_use]
    pub const fn with_frozen(mut self, frozen: bool) -> Self {
        self.frozen = frozen;
        self
    }

    /// Sets both wrapper markers.
    #[must_use]
    pub fn with_wrapper(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.wrapper_open = Some(open.into());
        self.wrapper_close = Some(close.into());
        self
    }

    /// Resolves the position for a file kind, falling back to `position`.
    #[must_use]
    pub fn position_for(&self, kind: FileKind) -> Position {
        let specific = match kind {
            FileKind::Class => self.position_in_class,
            FileKind::Test => self.position_in_test,
            FileKind::Fixture => self.position_in_fixture,
            FileKind::Factory => self.position_in_factory,
            FileKind::Serializer => self.position_in_serializer,
            FileKind::Controller => self.position_in_controller,
            FileKind::Helper => self.position_in_helper,
            FileKind::Routes => self.position_in_routes,
            FileKind::Admin => self.position_in_admin,
            FileKind::Additional => self.position_in_additional_file_patterns,
        };
        specific.unwrap_or(self.position)
    }

    fn position_slot(&mut self, kind: FileKind) -> &mut Option<Position> {
        match kind {
            FileKind::Class => &mut self.position_in_class,
            FileKind::Test => &mut self.position_in_test,
            FileKind::Fixture => &mut self.position_in_fixture,
            FileKind::Factory => &mut self.position_in_factory,
            FileKind::Serializer => &mut self.position_in_serializer,
            FileKind::Controller => &mut self.position_in_controller,
            FileKind::Helper => &mut self.position_in_helper,
            FileKind::Routes => &mut self.position_in_routes,
            FileKind::Admin => &mut self.position_in_admin,
            FileKind::Additional => &mut self.position_in_additional_file_patterns,
        }
    }

    /// The wrapper markers configured for this run.
    #[must_use]
    pub fn wrapper(&self) -> WrapperMarkers {
        WrapperMarkers {
            open: self.wrapper_open.clone(),
            close: self.wrapper_close.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_spellings() {
        for spelling in ["before", "top", ":before", ":top", "BEFORE", " Top "] {
            assert_eq!(spelling.parse::<Position>().unwrap(), Position::Before);
        }
        for spelling in ["after", "bottom", ":after", ":bottom", "Bottom"] {
            assert_eq!(spelling.parse::<Position>().unwrap(), Position::After);
        }
        assert!(matches!(
            "middle".parse::<Position>(),
            Err(AnnotateError::InvalidPosition(v)) if v == "middle"
        ));
    }

    #[test]
    fn test_position_for_falls_back() {
        let options = AnnotateOptions::new()
            .with_position(Position::After)
            .with_position_for(FileKind::Fixture, Position::Before);
        assert_eq!(options.position_for(FileKind::Class), Position::After);
        assert_eq!(options.position_for(FileKind::Fixture), Position::Before);
    }

    #[test]
    fn test_from_json_str() {
        let options = AnnotateOptions::from_json_str(
            r#"{
                "position": ":bottom",
                "position_in_test": "top",
                "force": true,
                "wrapper_open": "START",
                "wrapper_close": "END"
            }"#,
        )
        .unwrap();
        assert_eq!(options.position, Position::After);
        assert_eq!(options.position_for(FileKind::Test), Position::Before);
        assert_eq!(options.position_for(FileKind::Factory), Position::After);
        assert!(options.force);
        assert!(!options.frozen);
        assert_eq!(options.wrapper_open.as_deref(), Some("START"));
    }

    #[test]
    fn test_from_json_str_rejects_bad_position() {
        assert!(AnnotateOptions::from_json_str(r#"{"position": "sideways"}"#).is_err());
    }

    #[test]
    fn test_wrap() {
        let markers = WrapperMarkers {
            open: Some("START".into()),
            close: Some("END".into()),
        };
        assert_eq!(markers.wrap("# body\n"), "# START\n# body\n# END\n");
        assert_eq!(WrapperMarkers::default().wrap("# body\n"), "# body\n");
    }

    #[test]
    fn test_position_key_names_the_config_field() {
        assert_eq!(FileKind::Class.position_key(), "position_in_class");
        assert_eq!(
            FileKind::Additional.position_key(),
            "position_in_additional_file_patterns"
        );
        let options = AnnotateOptions::from_json_str(r#"{"position_in_test": "top"}"#)
            .unwrap();
        assert_eq!(
            options.position_for(FileKind::Test),
            Position::Before,
            "{}",
            FileKind::Test.position_key()
        );
    }
}
