//! Process orchestration: realizing a parsed command line as one or two
//! child processes with correctly wired standard streams.
//!
//! All fallible preparation (program resolution, redirection file opens)
//! happens before the first spawn, so a doomed invocation never creates a
//! child. Every spawned child is waited on before control returns to the
//! command loop, and the parent retains no pipe ends while waiting.

use crate::parser::{Pipeline, Redirections};
use crate::resolver;
use crate::state::ExitCode;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

/// Failure to turn a command line into running children.
///
/// Each variant aborts only the current command line; the shell session
/// continues with the next one.
#[derive(Debug)]
pub enum ExecError {
    /// The command name resolved to nothing in the search directories.
    CommandNotFound(String),
    /// The OS refused to start the child. Fork, pipe-creation and exec
    /// errors all surface here, as the spawn's `io::Error`.
    Spawn { command: String, source: io::Error },
    /// The input redirection file exists but is not readable.
    InputDenied(String),
    /// The input redirection file could not be opened.
    InputOpen { path: String, source: io::Error },
    /// The output redirection file could not be created or truncated.
    OutputOpen { path: String, source: io::Error },
}

impl ExecError {
    /// The exit status the failed invocation contributes to the shell state:
    /// 127 for an unknown command, 126 when a resolved child could not be
    /// started, 1 for redirection failures.
    pub fn status(&self) -> ExitCode {
        match self {
            ExecError::CommandNotFound(_) => 127,
            ExecError::Spawn { .. } => 126,
            ExecError::InputDenied(_)
            | ExecError::InputOpen { .. }
            | ExecError::OutputOpen { .. } => 1,
        }
    }
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::CommandNotFound(command) => write!(f, "command not found: {command}"),
            ExecError::Spawn { command, source } => {
                write!(f, "cannot execute {command}: {source}")
            }
            ExecError::InputDenied(path) => write!(f, "cannot read {path}: permission denied"),
            ExecError::InputOpen { path, source } => write!(f, "cannot open {path}: {source}"),
            ExecError::OutputOpen { path, source } => write!(f, "cannot open {path}: {source}"),
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecError::Spawn { source, .. }
            | ExecError::InputOpen { source, .. }
            | ExecError::OutputOpen { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Execute a parsed command line and report the exit status of its final
/// command.
pub fn run(pipeline: &Pipeline, redirections: &Redirections) -> Result<ExitCode, ExecError> {
    match pipeline {
        Pipeline::Single(argv) => run_single(argv, redirections),
        Pipeline::Piped(producer, consumer) => run_piped(producer, consumer, redirections),
    }
}

fn run_single(argv: &[String], redirections: &Redirections) -> Result<ExitCode, ExecError> {
    let Some(name) = argv.first() else {
        return Ok(0);
    };
    let program = resolve_program(name)?;
    let input = open_redirections_input(redirections)?;
    let output = open_redirections_output(redirections)?;

    let mut command = Command::new(&program);
    command.args(&argv[1..]);
    if let Some(file) = input {
        command.stdin(Stdio::from(file));
    }
    if let Some(file) = output {
        command.stdout(Stdio::from(file));
    }

    let mut child = spawn(&mut command, name)?;
    Ok(wait_status(&mut child))
}

fn run_piped(
    producer_argv: &[String],
    consumer_argv: &[String],
    redirections: &Redirections,
) -> Result<ExitCode, ExecError> {
    let (Some(producer_name), Some(consumer_name)) =
        (producer_argv.first(), consumer_argv.first())
    else {
        return Ok(0);
    };
    let producer_program = resolve_program(producer_name)?;
    let consumer_program = resolve_program(consumer_name)?;
    let input = open_redirections_input(redirections)?;
    let output = open_redirections_output(redirections)?;

    let mut producer = Command::new(&producer_program);
    producer.args(&producer_argv[1..]).stdout(Stdio::piped());
    if let Some(file) = input {
        producer.stdin(Stdio::from(file));
    }
    let mut first = spawn(&mut producer, producer_name)?;

    let mut consumer = Command::new(&consumer_program);
    consumer.args(&consumer_argv[1..]);
    if let Some(read_end) = first.stdout.take() {
        // Moves the pipe's read end into the consumer; the parent keeps no
        // copy of either end once the consumer has spawned.
        consumer.stdin(Stdio::from(read_end));
    }
    if let Some(file) = output {
        consumer.stdout(Stdio::from(file));
    }

    match spawn(&mut consumer, consumer_name) {
        Ok(mut second) => {
            wait_status(&mut first);
            Ok(wait_status(&mut second))
        }
        Err(error) => {
            // The consumer never started, so nobody will drain the pipe;
            // take the producer down and reap it before reporting.
            drop(consumer);
            let _ = first.kill();
            wait_status(&mut first);
            Err(error)
        }
    }
}

fn resolve_program(name: &str) -> Result<PathBuf, ExecError> {
    resolver::resolve(name).ok_or_else(|| ExecError::CommandNotFound(name.to_string()))
}

fn spawn(command: &mut Command, name: &str) -> Result<Child, ExecError> {
    command.spawn().map_err(|source| ExecError::Spawn {
        command: name.to_string(),
        source,
    })
}

/// Block until the child terminates. Abnormal termination (a signal rather
/// than a normal exit) is reported as −1.
fn wait_status(child: &mut Child) -> ExitCode {
    match child.wait() {
        Ok(status) => status.code().unwrap_or(-1),
        Err(_) => -1,
    }
}

fn open_redirections_input(redirections: &Redirections) -> Result<Option<File>, ExecError> {
    redirections.input.as_deref().map(open_input).transpose()
}

fn open_redirections_output(redirections: &Redirections) -> Result<Option<File>, ExecError> {
    redirections.output.as_deref().map(open_output).transpose()
}

fn open_input(path: &str) -> Result<File, ExecError> {
    File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::PermissionDenied => ExecError::InputDenied(path.to_string()),
        _ => ExecError::InputOpen {
            path: path.to_string(),
            source,
        },
    })
}

/// Create or truncate the redirection target with permission bits 0640.
#[cfg(unix)]
fn open_output(path: &str) -> Result<File, ExecError> {
    use std::fs::OpenOptions;
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o640)
        .open(path)
        .map_err(|source| ExecError::OutputOpen {
            path: path.to_string(),
            source,
        })
}

#[cfg(not(unix))]
fn open_output(path: &str) -> Result<File, ExecError> {
    use std::fs::OpenOptions;
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|source| ExecError::OutputOpen {
            path: path.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn argv(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn temp_path(tag: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("executor_{}_{}", tag, std::process::id()));
        path
    }

    fn redirect_out(path: &PathBuf) -> Redirections {
        Redirections {
            input: None,
            output: Some(path.to_string_lossy().to_string()),
        }
    }

    #[test]
    #[cfg(unix)]
    fn single_command_reports_its_exit_status() {
        let ok = run(&Pipeline::Single(argv(&["true"])), &Redirections::default()).unwrap();
        assert_eq!(ok, 0);

        let fail = run(&Pipeline::Single(argv(&["false"])), &Redirections::default()).unwrap();
        assert_ne!(fail, 0);
    }

    #[test]
    fn unknown_command_is_reported_without_spawning() {
        let err = run(
            &Pipeline::Single(argv(&["no_such_program_zz"])),
            &Redirections::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ExecError::CommandNotFound(_)));
        assert_eq!(err.status(), 127);
    }

    #[test]
    #[cfg(unix)]
    fn output_redirection_creates_and_truncates() {
        let out = temp_path("truncate");
        let redirections = redirect_out(&out);

        let status = run(&Pipeline::Single(argv(&["echo", "first run"])), &redirections).unwrap();
        assert_eq!(status, 0);
        assert_eq!(fs::read_to_string(&out).unwrap(), "first run\n");

        let status = run(&Pipeline::Single(argv(&["echo", "second"])), &redirections).unwrap();
        assert_eq!(status, 0);
        assert_eq!(fs::read_to_string(&out).unwrap(), "second\n");

        let _ = fs::remove_file(out);
    }

    #[test]
    fn missing_input_file_fails_before_any_spawn() {
        let redirections = Redirections {
            input: Some("/no/such/input/file".to_string()),
            output: None,
        };
        // `cat` with an open stdin would block forever; the early open
        // failure means it is never started at all.
        let err = run(&Pipeline::Single(argv(&["cat"])), &redirections).unwrap_err();
        assert!(matches!(err, ExecError::InputOpen { .. }));
        assert_eq!(err.status(), 1);
    }

    #[test]
    #[cfg(unix)]
    fn pipeline_connects_producer_to_consumer() {
        let out = temp_path("pipe_wc");
        let status = run(
            &Pipeline::Piped(argv(&["echo", "one line"]), argv(&["wc", "-l"])),
            &redirect_out(&out),
        )
        .unwrap();
        assert_eq!(status, 0);
        assert_eq!(fs::read_to_string(&out).unwrap().trim(), "1");

        let _ = fs::remove_file(out);
    }

    #[test]
    #[cfg(unix)]
    fn pipeline_input_redirection_feeds_the_producer() {
        let input = temp_path("pipe_in");
        fs::write(&input, "banana\napple\n").unwrap();
        let out = temp_path("pipe_sorted");

        let redirections = Redirections {
            input: Some(input.to_string_lossy().to_string()),
            output: Some(out.to_string_lossy().to_string()),
        };
        let status = run(
            &Pipeline::Piped(argv(&["cat"]), argv(&["sort"])),
            &redirections,
        )
        .unwrap();
        assert_eq!(status, 0);
        assert_eq!(fs::read_to_string(&out).unwrap(), "apple\nbanana\n");

        let _ = fs::remove_file(input);
        let _ = fs::remove_file(out);
    }

    #[test]
    #[cfg(unix)]
    fn pipeline_reports_the_consumer_status() {
        let status = run(
            &Pipeline::Piped(argv(&["echo", "ignored"]), argv(&["false"])),
            &Redirections::default(),
        )
        .unwrap();
        assert_ne!(status, 0);
    }

    #[test]
    fn pipeline_with_unknown_consumer_spawns_nothing() {
        let err = run(
            &Pipeline::Piped(argv(&["echo", "hi"]), argv(&["no_such_program_zz"])),
            &Redirections::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ExecError::CommandNotFound(_)));
    }

    #[test]
    fn empty_argument_vector_is_a_no_op() {
        assert_eq!(
            run(&Pipeline::Single(Vec::new()), &Redirections::default()).unwrap(),
            0
        );
    }
}
