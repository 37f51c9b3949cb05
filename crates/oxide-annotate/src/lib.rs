//! Schema annotations for ORM model files.
//!
//! `oxide-annotate` keeps an auto-generated comment block describing a
//! table's schema (columns, indexes, foreign keys, check constraints) near
//! the declarations that map that table: model classes, fixtures, tests,
//! factories, serializers and so on. The block is rendered elsewhere; this
//! crate decides whether a file needs it, where it goes and how it replaces
//! an older copy while leaving the rest of the file alone.
//!
//! # Architecture
//!
//! - **Magic comments** - leading interpreter directives are split off and
//!   written back verbatim
//! - **Pattern** - locates an existing annotation, current or legacy
//!   header, with or without wrapper markers
//! - **Diff** - compares the column lines of the old and new annotation,
//!   so unchanged tables cause no rewrite
//! - **Decompose** - separates magic comments, annotation and body
//! - **Placement** - picks regenerate, substitute or no-op and builds the
//!   new text
//! - **Annotator** - runs files through the pipeline and writes them
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//!
//! use oxide_annotate::prelude::*;
//!
//! let block = "# == Schema Information\n#\n# Table name: users\n#\n#  id  :bigint  not null, primary key\n#\n";
//! let annotator = Annotator::new(AnnotateOptions::new()).unwrap();
//!
//! let updated = annotator
//!     .annotate_text(Path::new("user.rb"), "class User\nend\n", block, FileKind::Class)
//!     .unwrap()
//!     .unwrap();
//! assert!(updated.starts_with("# == Schema Information"));
//!
//! // Running again with the same block changes nothing.
//! let again = annotator
//!     .annotate_text(Path::new("user.rb"), &updated, block, FileKind::Class)
//!     .unwrap();
//! assert!(again.is_none());
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Annotate a model and its factory with a rendered block
//! oxide-annotate annotate --block users.schema app/models/user.rb
//! oxide-annotate annotate --block users.schema --kind factory spec/factories/users.rb
//!
//! # Fail instead of writing (for CI)
//! oxide-annotate annotate --frozen --block users.schema app/models/user.rb
//!
//! # Remove annotations
//! oxide-annotate remove app/models/user.rb
//! ```

pub mod annotator;
pub mod config;
pub mod decompose;
pub mod diff;
pub mod error;
pub mod magic;
pub mod pattern;
pub mod placement;
pub mod store;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::annotator::{
        AnnotationTarget, Annotator, BatchReport, FileFailure, Operation,
    };
    pub use crate::config::{AnnotateOptions, FileKind, Position, WrapperMarkers};
    pub use crate::decompose::{DecomposedFile, SKIP_MARKER};
    pub use crate::diff::AnnotationDiff;
    pub use crate::error::{AnnotateError, Result};
    pub use crate::magic::extract_magic_comments;
    pub use crate::pattern::{AnnotationPattern, AnnotationRegion};
    pub use crate::placement::{Action, LineEnding, Placement, PlacementEngine};
    pub use crate::store::{FsStore, SourceStore};
}
