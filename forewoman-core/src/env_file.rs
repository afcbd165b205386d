//! `.env` file loading.
//!
//! All files are read to completion before any instance is planned. An
//! unreadable file is logged and contributes nothing.

use std::path::{Path, PathBuf};

use crate::error::EnvFileError;
use crate::types::Environment;

/// Result of reading a list of environment files.
#[derive(Debug, Default)]
pub struct EnvFiles {
    /// Concatenated raw content of every readable file, in list order.
    pub content: String,
    /// Files that could not be read.
    pub errors: Vec<EnvFileError>,
}

impl EnvFiles {
    /// `KEY=VALUE` pairs parsed from [`EnvFiles::content`].
    pub fn variables(&self) -> Environment {
        parse(&self.content)
    }
}

/// Read every file in `paths`. Failures are collected, not returned.
pub fn read_all(paths: &[PathBuf]) -> EnvFiles {
    let mut files = EnvFiles::default();
    for path in paths {
        match read_one(path) {
            Ok(data) => {
                files.content.push_str(&data);
                if !data.is_empty() && !data.ends_with('\n') {
                    files.content.push('\n');
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "error reading environment file");
                files.errors.push(err);
            }
        }
    }
    files
}

fn read_one(path: &Path) -> Result<String, EnvFileError> {
    std::fs::read_to_string(path).map_err(|source| EnvFileError {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse `KEY=VALUE` lines.
///
/// Blank lines and `#` comments are skipped, an `export ` prefix is allowed,
/// and one pair of matching surrounding quotes is stripped from the value.
pub fn parse(content: &str) -> Environment {
    let mut vars = Environment::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            continue;
        }
        vars.insert(key.to_string(), unquote(value.trim()).to_string());
    }
    vars
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_comments_and_quotes() {
        let vars = parse(
            "# comment\n\nDATABASE_URL=postgres://localhost/dev\nexport SECRET='s3 cr3t'\nGREETING=\"hi there\"\nbroken line\n=novalue\nEMPTY=\n",
        );
        assert_eq!(vars["DATABASE_URL"], "postgres://localhost/dev");
        assert_eq!(vars["SECRET"], "s3 cr3t");
        assert_eq!(vars["GREETING"], "hi there");
        assert_eq!(vars["EMPTY"], "");
        assert_eq!(vars.len(), 4);
    }

    #[test]
    fn value_may_contain_equals() {
        let vars = parse("OPTS=a=b");
        assert_eq!(vars["OPTS"], "a=b");
    }

    #[test]
    fn later_files_override_earlier_ones() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let first = dir.path().join(".env");
        let second = dir.path().join(".env.local");
        std::fs::write(&first, "A=1\nB=1").expect("write");
        std::fs::write(&second, "B=2\n").expect("write");

        let files = read_all(&[first, second]);
        assert!(files.errors.is_empty());
        let vars = files.variables();
        assert_eq!(vars["A"], "1");
        assert_eq!(vars["B"], "2");
    }

    #[test]
    fn unreadable_file_contributes_nothing() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let good = dir.path().join(".env");
        std::fs::write(&good, "A=1\n").expect("write");
        let missing = dir.path().join("missing.env");

        let files = read_all(&[missing.clone(), good]);
        assert_eq!(files.errors.len(), 1);
        assert_eq!(files.errors[0].path, missing);
        assert_eq!(files.content, "A=1\n");
    }
}
