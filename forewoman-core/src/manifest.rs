//! Procfile parsing.
//!
//! Each line of the form `name: command` declares a process type. Leading
//! whitespace is allowed. `name` is one or more ASCII word characters, a
//! single whitespace character after the colon is optional, and everything
//! else up to the line terminator is the command. Any other line is ignored.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ManifestError;
use crate::types::{Manifest, ProcessName};

/// Line terminators recognised when splitting the manifest: CR, LF and the
/// Unicode line and paragraph separators.
const LINE_TERMINATORS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

fn declaration() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z0-9_]+):\s?(.+)$").expect("valid declaration regex")
    })
}

/// Parse manifest text into an ordered set of process types.
///
/// A name declared twice keeps its first position but takes the last command.
pub fn parse(text: &str) -> Manifest {
    let re = declaration();
    let mut manifest = Manifest::new();
    for line in text.split(LINE_TERMINATORS) {
        if let Some(caps) = re.captures(line) {
            manifest.insert(ProcessName::from(&caps[1]), caps[2].to_string());
        }
    }
    manifest
}

/// Read and parse the manifest at `path`.
pub fn load(path: &Path) -> Result<Manifest, ManifestError> {
    let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest = parse(&text);
    tracing::info!(path = %path.display(), processes = manifest.len(), "Procfile loaded");
    Ok(manifest)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
