//! Per-file and batch annotation driver.
//!
//! Each file runs through locate, decompose, diff, place and write on its
//! own; there is no state shared between files. Recoverable failures are
//! logged and collected so the batch continues with the next file, while a
//! frozen violation stops the whole batch.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{AnnotateOptions, FileKind};
use crate::decompose::DecomposedFile;
use crate::error::{AnnotateError, Result};
use crate::pattern::AnnotationPattern;
use crate::placement::{Placement, PlacementEngine};
use crate::store::{FsStore, SourceStore};

/// One file to annotate, with the block rendered for its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationTarget {
    /// File to annotate.
    pub path: PathBuf,
    /// Kind of file, selecting its position setting.
    pub kind: FileKind,
    /// Rendered annotation block.
    pub block: String,
}

impl AnnotationTarget {
    /// Creates a target.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: FileKind, block: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            block: block.into(),
        }
    }
}

/// Which batch operation produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Annotations were added or updated.
    Annotate,
    /// Annotations were removed.
    Remove,
}

/// A file the batch could not process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// The file.
    pub path: PathBuf,
    /// Rendered error message.
    pub message: String,
}

/// Summary of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// The operation that was run.
    pub operation: Operation,
    /// Files that were rewritten, in processing order.
    pub modified: Vec<PathBuf>,
    /// Files that failed with a recoverable error.
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    const fn new(operation: Operation) -> Self {
        Self {
            operation,
            modified: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Returns `true` if no file failed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// One-line summary for the user.
    #[must_use]
    pub fn summary(&self) -> String {
        let names = self
            .modified
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");

        match (self.operation, self.modified.is_empty()) {
            (Operation::Annotate, true) => "Model files unchanged.".to_string(),
            (Operation::Annotate, false) => {
                format!("Annotated ({}): {names}", self.modified.len())
            }
            (Operation::Remove, true) => "No annotations removed.".to_string(),
            (Operation::Remove, false) => format!("Removed annotations from: {names}"),
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Annotates and deannotates files with one fixed configuration.
#[derive(Debug)]
pub struct Annotator<S = FsStore> {
    options: AnnotateOptions,
    pattern: AnnotationPattern,
    engine: PlacementEngine,
    store: S,
}

impl Annotator<FsStore> {
    /// Creates an annotator working on the local file system.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotateError::InvalidPattern`] if the region pattern
    /// cannot be built from `options`.
    pub fn new(options: AnnotateOptions) -> Result<Self> {
        Self::with_store(options, FsStore::new())
    }
}

impl<S: SourceStore> Annotator<S> {
    /// Creates an annotator on top of a custom store.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotateError::InvalidPattern`] if the region pattern
    /// cannot be built from `options`.
    pub fn with_store(options: AnnotateOptions, store: S) -> Result<Self> {
        let pattern = AnnotationPattern::from_options(&options)?;
        let engine = PlacementEngine::new(&options);
        Ok(Self {
            options,
            pattern,
            engine,
            store,
        })
    }

    /// The configuration in use.
    #[must_use]
    pub const fn options(&self) -> &AnnotateOptions {
        &self.options
    }

    /// Computes the new text of `content` with `block` placed according to
    /// the position configured for `kind`. Returns `None` when the file must
    /// not be written. `path` is only used for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotateError::Frozen`] if a write is needed in frozen mode
    /// and [`AnnotateError::MultipleRegions`] if the file holds more than
    /// one annotation.
    pub fn annotate_text(
        &self,
        path: &Path,
        content: &str,
        block: &str,
        kind: FileKind,
    ) -> Result<Option<String>> {
        let wrapped = self.engine.wrap(block);
        let file = DecomposedFile::new(content, &wrapped, &self.pattern);
        if !file.is_skipped() {
            check_single_region(path, file.region_count())?;
        }

        let position = self.options.position_for(kind);
        debug!(
            "{}: region={} changed={} added={} removed={} {}={position}",
            path.display(),
            file.has_region(),
            file.is_changed(),
            file.diff().added().len(),
            file.diff().removed().len(),
            kind.position_key()
        );

        match self.engine.place(&file, block, position) {
            Placement::Skip => {
                debug!("{}: skip marker present", path.display());
                Ok(None)
            }
            Placement::Unchanged => Ok(None),
            Placement::FrozenAbort => Err(AnnotateError::Frozen {
                path: path.to_path_buf(),
            }),
            Placement::Write { action, content } => {
                debug!("{}: {action:?}", path.display());
                Ok(Some(content))
            }
        }
    }

    /// Annotates one file on disk. Returns `true` if it was rewritten.
    ///
    /// # Errors
    ///
    /// Everything [`Annotator::annotate_text`] returns, plus
    /// [`AnnotateError::Io`] on read or write failures.
    pub fn annotate_file(&self, path: &Path, block: &str, kind: FileKind) -> Result<bool> {
        let content = self.store.read(path)?;
        let Some(updated) = self.annotate_text(path, &content, block, kind)? else {
            return Ok(false);
        };
        self.store.write(path, &updated)?;
        info!("annotated {}", path.display());
        Ok(true)
    }

    /// Computes the text of `content` with its annotation removed. Returns
    /// `None` when there is nothing to remove or the file opted out.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotateError::MultipleRegions`] if the file holds more
    /// than one annotation.
    pub fn remove_text(&self, path: &Path, content: &str) -> Result<Option<String>> {
        if content.contains(crate::decompose::SKIP_MARKER) {
            debug!("{}: skip marker present", path.display());
            return Ok(None);
        }
        check_single_region(path, self.pattern.count(content))?;

        let Some(region) = self.pattern.locate(content) else {
            return Ok(None);
        };
        let mut stripped = String::with_capacity(content.len() - region.text.len());
        stripped.push_str(&content[..region.start]);
        stripped.push_str(&content[region.end..]);
        Ok(Some(stripped))
    }

    /// Removes the annotation from one file on disk. Returns `true` if it
    /// was rewritten.
    ///
    /// # Errors
    ///
    /// Everything [`Annotator::remove_text`] returns, plus
    /// [`AnnotateError::Io`] on read or write failures.
    pub fn remove_file(&self, path: &Path) -> Result<bool> {
        let content = self.store.read(path)?;
        let Some(updated) = self.remove_text(path, &content)? else {
            return Ok(false);
        };
        self.store.write(path, &updated)?;
        info!("deannotated {}", path.display());
        Ok(true)
    }

    /// Annotates every target in order.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error ([`AnnotateError::Frozen`]); files
    /// after it are not processed. Other failures end up in the report.
    pub fn annotate_all(&self, targets: &[AnnotationTarget]) -> Result<BatchReport> {
        let mut report = BatchReport::new(Operation::Annotate);
        for target in targets {
            let result = self.annotate_file(&target.path, &target.block, target.kind);
            record(&mut report, &target.path, result, "annotate")?;
        }
        Ok(report)
    }

    /// Removes annotations from every file in order.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error. Other failures end up in the report.
    pub fn remove_all<P: AsRef<Path>>(&self, paths: &[P]) -> Result<BatchReport> {
        let mut report = BatchReport::new(Operation::Remove);
        for path in paths {
            let path = path.as_ref();
            let result = self.remove_file(path);
            record(&mut report, path, result, "deannotate")?;
        }
        Ok(report)
    }
}

fn check_single_region(path: &Path, count: usize) -> Result<()> {
    if count > 1 {
        return Err(AnnotateError::MultipleRegions {
            path: path.to_path_buf(),
            count,
        });
    }
    Ok(())
}

fn record(
    report: &mut BatchReport,
    path: &Path,
    result: Result<bool>,
    verb: &str,
) -> Result<()> {
    match result {
        Ok(true) => report.modified.push(path.to_path_buf()),
        Ok(false) => {}
        Err(err) if err.is_fatal() => return Err(err),
        Err(err) => {
            warn!("unable to {verb} {err}");
            report.failures.push(FileFailure {
                path: path.to_path_buf(),
                message: err.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = "# == Schema Information\n#\n# Table name: users\n#\n#  id  :bigint  not null, primary key\n#\n";

    fn annotator(options: AnnotateOptions) -> Annotator {
        Annotator::new(options).unwrap()
    }

    #[test]
    fn test_annotate_text_inserts_block() {
        let updated = annotator(AnnotateOptions::new())
            .annotate_text(Path::new("user.rb"), "class User\nend\n", BLOCK, FileKind::Class)
            .unwrap();
        assert_eq!(updated, Some(format!("{BLOCK}class User\nend\n")));
    }

    #[test]
    fn test_annotate_text_uses_kind_position() {
        let options = AnnotateOptions::new().with_position_for(
            FileKind::Factory,
            crate::config::Position::After,
        );
        let updated = annotator(options)
            .annotate_text(
                Path::new("users.rb"),
                "FactoryBot.define do\nend\n",
                BLOCK,
                FileKind::Factory,
            )
            .unwrap();
        assert_eq!(
            updated,
            Some(format!("FactoryBot.define do\nend\n\n{BLOCK}"))
        );
    }

    #[test]
    fn test_annotate_text_frozen() {
        let err = annotator(AnnotateOptions::new().with_frozen(true))
            .annotate_text(Path::new("user.rb"), "class User\nend\n", BLOCK, FileKind::Class)
            .unwrap_err();
        assert!(matches!(err, AnnotateError::Frozen { ref path } if path == Path::new("user.rb")));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_multiple_regions_rejected() {
        let content = format!("{BLOCK}class User\nend\n\n{BLOCK}");
        let annotator = annotator(AnnotateOptions::new());

        let err = annotator
            .annotate_text(Path::new("user.rb"), &content, BLOCK, FileKind::Class)
            .unwrap_err();
        assert!(matches!(err, AnnotateError::MultipleRegions { count: 2, .. }));

        let err = annotator.remove_text(Path::new("user.rb"), &content).unwrap_err();
        assert!(matches!(err, AnnotateError::MultipleRegions { .. }));
    }

    #[test]
    fn test_remove_text() {
        let annotator = annotator(AnnotateOptions::new());
        let removed = annotator
            .remove_text(Path::new("user.rb"), &format!("{BLOCK}class User\nend\n"))
            .unwrap();
        assert_eq!(removed.as_deref(), Some("class User\nend\n"));

        let removed = annotator
            .remove_text(Path::new("user.rb"), &format!("class User\nend\n\n{BLOCK}"))
            .unwrap();
        assert_eq!(removed.as_deref(), Some("class User\nend\n"));

        assert_eq!(
            annotator
                .remove_text(Path::new("user.rb"), "class User\nend\n")
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_remove_text_with_wrapper() {
        let annotator = annotator(AnnotateOptions::new().with_wrapper("START", "END"));
        let content = format!("# START\n{BLOCK}# END\nclass User\nend\n");
        assert_eq!(
            annotator
                .remove_text(Path::new("user.rb"), &content)
                .unwrap()
                .as_deref(),
            Some("class User\nend\n")
        );
    }

    #[test]
    fn test_summary() {
        let mut report = BatchReport::new(Operation::Annotate);
        assert_eq!(report.summary(), "Model files unchanged.");

        report.modified.push(PathBuf::from("app/models/user.rb"));
        report.modified.push(PathBuf::from("spec/factories/users.rb"));
        assert_eq!(
            report.to_string(),
            "Annotated (2): app/models/user.rb, spec/factories/users.rb"
        );

        let mut removed = BatchReport::new(Operation::Remove);
        removed.modified.push(PathBuf::from("app/models/user.rb"));
        assert_eq!(
            removed.summary(),
            "Removed annotations from: app/models/user.rb"
        );
    }
}
