//! Built-in commands interpreted by the shell itself.
//!
//! Built-ins run in-process, dispatched by name on the residual argument
//! vector before pipeline detection, and set the last exit status like any
//! external command. Arguments are parsed with [`argh`] (`FromArgs`), so
//! each built-in validates its arguments and answers `--help` for free.

use crate::resolver;
use crate::state::ExitCode;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::io::Write;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd" or "pwd".
    fn name() -> &'static str;

    /// Executes the command.
    ///
    /// Return value follows shell conventions: 0 for success, non-zero for
    /// error.
    fn execute(self, stdout: &mut dyn Write) -> Result<ExitCode>;
}

/// Try each built-in in turn; `None` means the name belongs to an external
/// program.
pub fn dispatch(name: &str, args: &[&str], stdout: &mut dyn Write) -> Option<ExitCode> {
    run_builtin::<Cd>(name, args, stdout)
        .or_else(|| run_builtin::<Pwd>(name, args, stdout))
        .or_else(|| run_builtin::<Which>(name, args, stdout))
        .or_else(|| run_builtin::<Exit>(name, args, stdout))
}

fn run_builtin<T: BuiltinCommand>(
    name: &str,
    args: &[&str],
    stdout: &mut dyn Write,
) -> Option<ExitCode> {
    if name != T::name() {
        return None;
    }
    let status = match T::from_args(&[name], args) {
        Ok(command) => match command.execute(stdout) {
            Ok(status) => status,
            Err(error) => {
                eprintln!("mysh: {name}: {error:#}");
                1
            }
        },
        // --help lands here too, with a success status.
        Err(EarlyExit { output, status }) => {
            let failed = status.is_err();
            if failed {
                eprintln!("{output}");
            } else {
                let _ = writeln!(stdout, "{output}");
            }
            if failed { 1 } else { 0 }
        }
    };
    Some(status)
}

#[derive(FromArgs)]
/// Change the current working directory.
/// With no target, changes to the directory named by HOME.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _stdout: &mut dyn Write) -> Result<ExitCode> {
        let target = match &self.target {
            Some(target) if !target.is_empty() => PathBuf::from(target),
            _ => match std::env::var_os("HOME") {
                Some(home) => PathBuf::from(home),
                None => return Err(anyhow::anyhow!("no target and HOME not set")),
            },
        };
        std::env::set_current_dir(&target)
            .with_context(|| format!("can't chdir to {}", target.display()))?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Print the current working directory to standard output.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn execute(self, stdout: &mut dyn Write) -> Result<ExitCode> {
        let cwd = std::env::current_dir().context("cannot determine current directory")?;
        writeln!(stdout, "{}", cwd.display())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Print the full path the shell would execute for a command name.
pub struct Which {
    #[argh(positional)]
    /// command name to look up in the search directories.
    pub command: String,
}

impl BuiltinCommand for Which {
    fn name() -> &'static str {
        "which"
    }

    fn execute(self, stdout: &mut dyn Write) -> Result<ExitCode> {
        match resolver::resolve(&self.command) {
            Some(path) => {
                writeln!(stdout, "{}", path.display())?;
                Ok(0)
            }
            None => {
                writeln!(stdout, "{} not found", self.command)?;
                Ok(1)
            }
        }
    }
}

#[derive(FromArgs)]
/// Terminate the shell immediately with status 0.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored; exit always succeeds.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write) -> Result<ExitCode> {
        std::process::exit(0)
    }
}
