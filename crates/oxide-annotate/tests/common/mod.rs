#![allow(dead_code)]

use std::path::{Path, PathBuf};

use oxide_annotate::prelude::*;
use tempfile::TempDir;

pub const USERS_BLOCK: &str = "\
# == Schema Information
#
# Table name: users
#
#  id                     :bigint           not null, primary key
#  name                   :string
#
";

/// Same table as [`USERS_BLOCK`] with the columns listed in another order.
pub const USERS_BLOCK_REORDERED: &str = "\
# == Schema Information
#
# Table name: users
#
#  name                   :string
#  id                     :bigint           not null, primary key
#
";

pub const USERS_BLOCK_WITH_AGE: &str = "\
# == Schema Information
#
# Table name: users
#
#  id                     :bigint           not null, primary key
#  name                   :string
#  age                    :integer
#
";

pub const MODEL: &str = "class User < ApplicationRecord\nend\n";

pub fn annotator(options: AnnotateOptions) -> Annotator {
    Annotator::new(options).unwrap_or_else(|e| panic!("Failed to build annotator: {e}"))
}

/// Annotates `content` as a model class and returns the new text, or the
/// input itself when nothing would be written.
pub fn annotate(options: &AnnotateOptions, content: &str, block: &str) -> String {
    annotator(options.clone())
        .annotate_text(Path::new("app/models/user.rb"), content, block, FileKind::Class)
        .unwrap_or_else(|e| panic!("Failed to annotate:\n{content}\nError: {e}"))
        .unwrap_or_else(|| content.to_string())
}

/// A scratch directory holding source files.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap_or_else(|e| panic!("Failed to create tempdir: {e}")),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, path: &Path) -> String {
        std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
    }
}
