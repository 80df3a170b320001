//! Operator environment overlay (`.env`-style `KEY=VALUE` source)
//!
//! The overlay is parsed once per compilation and then shared read-only by
//! every descriptor build. Loading never fails: a missing or unreadable
//! source is an empty overlay.

use std::collections::BTreeMap;
use std::path::Path;

/// Immutable mapping of overlay variable names to values.
///
/// Keys are non-empty and trimmed; values have one matching pair of
/// surrounding quotes removed, so `KEY=""` holds an empty value. When a key
/// repeats, the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverlay {
    vars: BTreeMap<String, String>,
}

/// Why a line contributed nothing to the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    Blank,
    Comment,
    Malformed,
}

impl EnvOverlay {
    /// Empty overlay.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse overlay text.
    ///
    /// Lines are split at the first `=` only, so values may contain `=`.
    /// Blank lines and `#` comments are skipped silently; lines without a
    /// key or a value are skipped with a warning. No variable expansion is
    /// performed.
    pub fn parse(content: &str) -> Self {
        let mut vars = BTreeMap::new();

        for (index, line) in content.lines().enumerate() {
            match parse_line(line) {
                Ok((key, value)) => {
                    vars.insert(key, value);
                }
                Err(Skip::Malformed) => {
                    // Never log the line itself; it may hold a secret.
                    tracing::warn!(line = index + 1, "Ignoring malformed overlay line");
                }
                Err(Skip::Blank | Skip::Comment) => {}
            }
        }

        Self { vars }
    }

    /// Load the overlay from `path`, degrading to empty.
    ///
    /// `None` and a missing file are both valid and produce an empty overlay.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::empty();
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No overlay file, using empty overlay");
            return Self::empty();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => {
                let overlay = Self::parse(&content);
                tracing::debug!(
                    path = %path.display(),
                    vars = overlay.len(),
                    "Loaded overlay"
                );
                overlay
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Overlay unreadable, using empty overlay"
                );
                Self::empty()
            }
        }
    }

    /// Value for `key`, if present. May be empty for an explicit `KEY=""`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvOverlay {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let vars = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| !k.trim().is_empty())
            .collect();
        Self { vars }
    }
}

fn parse_line(line: &str) -> Result<(String, String), Skip> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(Skip::Blank);
    }
    if trimmed.starts_with('#') {
        return Err(Skip::Comment);
    }

    let (key, value) = trimmed.split_once('=').ok_or(Skip::Malformed)?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return Err(Skip::Malformed);
    }
    let value = strip_quotes(value);

    Ok((key.to_string(), value.to_string()))
}

/// Remove one pair of matching `'` or `"` around `value`.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
