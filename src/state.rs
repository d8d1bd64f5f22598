//! Process-wide shell state threaded through the command loop.

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// State carried from one command line to the next.
///
/// The working directory is deliberately *not* mirrored here: it belongs to
/// the OS and only the `cd` built-in mutates it. Everything the conditional
/// gate needs is the status of whatever ran last.
#[derive(Debug, Clone)]
pub struct ShellState {
    /// Exit status of the most recently executed command or built-in.
    pub last_status: ExitCode,
}

impl ShellState {
    /// A fresh state, as if the previous command had succeeded.
    pub fn new() -> Self {
        Self { last_status: 0 }
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}
