//! Magic comment extraction.
//!
//! Interpreter and tooling directives (`# encoding: utf-8`,
//! `# frozen_string_literal: true`, `# typed: strict`, ...) must stay on the
//! first lines of a file, so they are split off before the annotation is
//! placed and written back verbatim in front of it.

use std::sync::LazyLock;

use regex::Regex;

/// Matches one directive line, without its line terminator.
static MAGIC_COMMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"#\s*encoding:.*",
        r"|# coding:.*",
        r"|# -\*- coding:.*",
        r"|# -\*- encoding\s?:.*",
        r"|#\s*frozen_string_literal:.+",
        r"|# -\*- frozen_string_literal\s*:.+-\*-",
        r"|#\s*typed:.*",
        r")$",
    ))
    .expect("magic comment pattern is valid")
});

/// Returns `true` if `line` (without terminator) is a magic comment.
#[must_use]
pub fn is_magic_comment(line: &str) -> bool {
    MAGIC_COMMENT_LINE.is_match(line)
}

/// Returns the run of magic comment lines at the start of `content`,
/// including their line terminators.
///
/// Scanning stops at the first line that is not a directive, so directives
/// further down the file are left alone. Returns an empty string when the
/// file does not start with one.
#[must_use]
pub fn extract_magic_comments(content: &str) -> &str {
    let mut end = 0;
    for line in content.split_inclusive('\n') {
        let Some(body) = line.strip_suffix('\n') else {
            break;
        };
        let body = body.strip_suffix('\r').unwrap_or(body);
        if !is_magic_comment(body) {
            break;
        }
        end += line.len();
    }
    &content[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_spellings() {
        for line in [
            "# encoding: UTF-8",
            "#encoding: utf-8",
            "# coding: UTF-8",
            "# -*- coding: UTF-8 -*-",
            "# -*- encoding: UTF-8 -*-",
            "# -*- encoding : UTF-8 -*-",
            "# frozen_string_literal: true",
            "#frozen_string_literal: false",
            "# -*- frozen_string_literal : true -*-",
            "# typed: strong",
            "# typed: false",
        ] {
            assert!(is_magic_comment(line), "{line}");
        }
    }

    #[test]
    fn test_rejects_ordinary_comments() {
        for line in [
            "# A user of the system",
            "# Encoding: UTF-8",
            "# == Schema Information",
            "class User < ApplicationRecord",
            "# frozen_string_literal:",
            "",
        ] {
            assert!(!is_magic_comment(line), "{line}");
        }
    }

    #[test]
    fn test_extract_leading_run() {
        let content = "# frozen_string_literal: true\n# encoding: utf-8\nclass User\nend\n";
        assert_eq!(
            extract_magic_comments(content),
            "# frozen_string_literal: true\n# encoding: utf-8\n"
        );
    }

    #[test]
    fn test_extract_stops_at_blank_line() {
        let content = "# typed: strong\n\n# frozen_string_literal: true\nclass User\nend\n";
        assert_eq!(extract_magic_comments(content), "# typed: strong\n");
    }

    #[test]
    fn test_extract_none() {
        assert_eq!(extract_magic_comments("class User\nend\n"), "");
        assert_eq!(extract_magic_comments(""), "");
    }

    #[test]
    fn test_extract_crlf() {
        let content = "# encoding: utf-8\r\nclass User\r\nend\r\n";
        assert_eq!(extract_magic_comments(content), "# encoding: utf-8\r\n");
    }

    #[test]
    fn test_unterminated_directive_is_not_extracted() {
        assert_eq!(extract_magic_comments("# encoding: utf-8"), "");
    }
}
