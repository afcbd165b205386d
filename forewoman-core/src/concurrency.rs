//! Concurrency spec parsing (`web=2,worker=3`).

use std::collections::HashMap;

/// Desired instance counts per process type.
///
/// Holds every segment whose count parsed as an integer, including zero and
/// negative values; [`ConcurrencyMap::count_for`] folds those back to the
/// default of one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConcurrencyMap {
    counts: HashMap<String, i64>,
}

impl ConcurrencyMap {
    /// Parse a comma separated list of `name=count` segments.
    ///
    /// Segments that do not split into exactly two parts on `=`, or whose
    /// count does not start with an integer, are dropped. Trailing text after
    /// the leading integer is ignored, so `3x` reads as 3 and `2.5` as 2. A later segment for the same
    /// name replaces an earlier one.
    pub fn parse(spec: Option<&str>) -> Self {
        let mut counts = HashMap::new();
        for segment in spec.unwrap_or_default().split(',') {
            let parts: Vec<&str> = segment.split('=').collect();
            let [name, count] = parts.as_slice() else {
                continue;
            };
            if let Some(count) = leading_integer(count) {
                counts.insert((*name).to_string(), count);
            }
        }
        Self { counts }
    }

    /// The raw parsed value for `name`, if any.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.counts.get(name).copied()
    }

    /// Number of instances to run for `name`; 1 unless a positive count was given.
    pub fn count_for(&self, name: &str) -> usize {
        match self.get(name) {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(1),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// The optionally signed digit run at the start of `text`, after leading
/// whitespace.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let unsigned = text.trim_start_matches(['+', '-']);
    let sign_len = text.len() - unsigned.len();
    if sign_len > 1 {
        return None;
    }
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return None;
    }
    text[..sign_len + digits].parse().ok()
}
