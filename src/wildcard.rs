//! Wildcard (glob) expansion for command-line tokens.
//!
//! A token containing `*` is split into a directory to enumerate, a prefix
//! and a suffix; directory entries matching both ends replace the token.
//! Only the first `*` acts as a wildcard; everything after it, further `*`
//! or `/` included, is literal suffix text.

use std::fmt;
use std::fs;
use std::io;

/// A wildcard token split at its first `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern {
    directory: String,
    prefix: String,
    suffix: String,
}

impl GlobPattern {
    /// Split `token` into its glob components, or `None` when it carries no
    /// wildcard at all.
    ///
    /// The directory is the text before the last `/` preceding the `*`:
    /// `"."` when the token has no such slash, `"/"` when the slash is the
    /// leading character.
    pub fn split(token: &str) -> Option<GlobPattern> {
        let star = token.find('*')?;
        let (directory, prefix) = match token[..star].rfind('/') {
            Some(0) => ("/".to_string(), token[1..star].to_string()),
            Some(slash) => (token[..slash].to_string(), token[slash + 1..star].to_string()),
            None => (".".to_string(), token[..star].to_string()),
        };
        Some(GlobPattern {
            directory,
            prefix,
            suffix: token[star + 1..].to_string(),
        })
    }

    /// Whether a directory entry name qualifies.
    ///
    /// Patterns with a leading wildcard never match dotfiles, so `*.txt`
    /// skips `.hidden.txt` while `.h*` still finds it.
    fn matches(&self, name: &str) -> bool {
        if self.prefix.is_empty() && name.starts_with('.') {
            return false;
        }
        name.starts_with(&self.prefix) && name.ends_with(&self.suffix)
    }

    /// Rebuild the path of a matching entry. Entries from `.` are emitted as
    /// bare names, the way the original token was written.
    fn join(&self, name: &str) -> String {
        match self.directory.as_str() {
            "." => name.to_string(),
            "/" => format!("/{name}"),
            dir => format!("{dir}/{name}"),
        }
    }
}

/// The directory a wildcard token pointed at could not be enumerated.
///
/// This is recoverable: the caller is expected to warn and let the token
/// contribute no expansions, never to abort the session over it.
#[derive(Debug)]
pub struct DirectoryUnreadable {
    directory: String,
    source: io::Error,
}

impl fmt::Display for DirectoryUnreadable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot read directory `{}`: {}",
            self.directory, self.source
        )
    }
}

impl std::error::Error for DirectoryUnreadable {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Expand one token.
///
/// Tokens without `*` pass through as a single-element vector. Matches are
/// returned in directory enumeration order, unsorted. A wildcard that
/// matches nothing falls back to the literal token, so the invoked program
/// sees the pattern verbatim.
pub fn expand(token: &str) -> Result<Vec<String>, DirectoryUnreadable> {
    let Some(pattern) = GlobPattern::split(token) else {
        return Ok(vec![token.to_string()]);
    };

    let entries = fs::read_dir(&pattern.directory).map_err(|source| DirectoryUnreadable {
        directory: pattern.directory.clone(),
        source,
    })?;

    let mut matches = Vec::new();
    for entry in entries {
        let Ok(entry) = entry else { continue };
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if pattern.matches(name) {
            matches.push(pattern.join(name));
        }
    }

    if matches.is_empty() {
        matches.push(token.to_string());
    }
    Ok(matches)
}
