//! Executable lookup for bare command names.

use std::fs;
use std::path::{Path, PathBuf};

/// Directories probed, in order, when a command name carries no path
/// separator.
pub const SEARCH_DIRS: [&str; 3] = ["/usr/local/bin", "/usr/bin", "/bin"];

/// Resolve a command name to the program path to execute.
///
/// Names containing a `/` are taken as paths and returned unchanged without
/// an existence check; a bad path is discovered at spawn time, which is the
/// signal callers already handle. Bare names probe [`SEARCH_DIRS`] and the
/// first candidate the current user may execute wins. `None` means the
/// command was not found anywhere; callers treat it as a command-not-found
/// error, never a crash.
pub fn resolve(command: &str) -> Option<PathBuf> {
    if command.contains('/') {
        return Some(PathBuf::from(command));
    }
    SEARCH_DIRS
        .iter()
        .map(|dir| Path::new(dir).join(command))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn bare_name_is_found_in_a_search_dir() {
        let found = resolve("sh").expect("every Unix has an sh");
        assert!(found.ends_with("sh"), "unexpected resolution {found:?}");
        assert!(
            SEARCH_DIRS
                .iter()
                .any(|dir| found.starts_with(dir)),
            "resolved outside the probe list: {found:?}"
        );
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(resolve("definitely_not_a_command_xyz"), None);
    }

    #[test]
    fn path_with_separator_passes_through_unchecked() {
        assert_eq!(
            resolve("./does/not/exist"),
            Some(PathBuf::from("./does/not/exist"))
        );
        assert_eq!(
            resolve("/no/such/binary"),
            Some(PathBuf::from("/no/such/binary"))
        );
    }

    #[test]
    #[cfg(unix)]
    fn non_executable_files_do_not_qualify() {
        use std::fs::File;
        use std::os::unix::fs::PermissionsExt;

        let mut path = std::env::temp_dir();
        path.push(format!("resolver_plain_{}", std::process::id()));
        File::create(&path).expect("touch plain file");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        assert!(!is_executable(&path));
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(is_executable(&path));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_name_is_none() {
        assert_eq!(resolve(""), None);
    }
}
