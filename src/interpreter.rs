//! The per-line driver: conditional gating, expansion, parsing, dispatch.
//!
//! Interactive and batch mode feed every line through the same
//! [`Interpreter::execute_line`], so the two modes cannot drift apart in how
//! they parse or execute anything.

use crate::builtin;
use crate::executor;
use crate::lexer;
use crate::parser;
use crate::state::{ExitCode, ShellState};
use crate::wildcard;
use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const PROMPT: &str = "mysh> ";

/// Decide whether a line gated by `then `/`else ` should run, and strip the
/// prefix when it should.
///
/// The prefixes are literal five-byte matches against the raw line, with no
/// trimming, so `  then ls` and plain `then` are ordinary commands. The
/// gate is single-step: it looks at the immediately preceding status only.
pub(crate) fn admit(line: &str, last_status: ExitCode) -> Option<&str> {
    if let Some(rest) = line.strip_prefix("then ") {
        if last_status == 0 { Some(rest) } else { None }
    } else if let Some(rest) = line.strip_prefix("else ") {
        if last_status != 0 { Some(rest) } else { None }
    } else {
        Some(line)
    }
}

/// A shell session: the state carried between lines plus the drivers that
/// feed lines in.
pub struct Interpreter {
    state: ShellState,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            state: ShellState::new(),
        }
    }

    /// Exit status of the most recently executed command.
    pub fn last_status(&self) -> ExitCode {
        self.state.last_status
    }

    /// Run one raw command line through the whole pipeline: gate, tokenize,
    /// expand, parse, dispatch, record the status.
    ///
    /// Suppressed, empty, and operator-only lines leave the status
    /// untouched. Failures are reported on stderr and recorded in the
    /// status; none of them end the session.
    pub fn execute_line(&mut self, line: &str) {
        let Some(line) = admit(line, self.state.last_status) else {
            return;
        };

        let tokens = lexer::split_into_tokens(line);
        if tokens.is_empty() {
            return;
        }

        let expanded = expand_tokens(&tokens);
        let (redirections, residual) = parser::split_redirections(&expanded);
        let Some(name) = residual.first() else {
            return;
        };

        let args: Vec<&str> = residual[1..].iter().map(String::as_str).collect();
        if let Some(status) = builtin::dispatch(name, &args, &mut std::io::stdout()) {
            self.state.last_status = status;
            return;
        }

        let pipeline = match parser::detect_pipeline(residual) {
            Ok(pipeline) => pipeline,
            Err(error) => {
                eprintln!("mysh: {error}");
                self.state.last_status = 2;
                return;
            }
        };

        self.state.last_status = match executor::run(&pipeline, &redirections) {
            Ok(status) => status,
            Err(error) => {
                eprintln!("mysh: {error}");
                error.status()
            }
        };
    }

    /// Interactive mode: prompt, read, execute, repeat.
    ///
    /// `Ctrl-C` abandons the current line and prompts again; end-of-input
    /// ends the session.
    pub fn repl(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new()?;
        println!("Welcome to my shell!");
        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    editor.add_history_entry(line.as_str())?;
                    self.execute_line(&line);
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => {
                    println!("Exit");
                    return Ok(());
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    /// Batch mode: execute a script file line by line, skipping blank lines.
    pub fn run_script(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)
            .with_context(|| format!("cannot open script {}", path.display()))?;
        for line in BufReader::new(file).lines() {
            let line = line.with_context(|| format!("cannot read script {}", path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            self.execute_line(&line);
        }
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Wildcard-expand the command words of a token vector.
///
/// Redirection operators and the filename token immediately following each
/// of them pass through verbatim; only ordinary words are expanded. An
/// unreadable directory costs the token its expansions and earns a warning,
/// never the session.
fn expand_tokens(tokens: &[String]) -> Vec<String> {
    let mut expanded = Vec::new();
    let mut filename_next = false;
    for token in tokens {
        if token == "<" || token == ">" {
            filename_next = true;
            expanded.push(token.clone());
        } else if filename_next {
            filename_next = false;
            expanded.push(token.clone());
        } else {
            match wildcard::expand(token) {
                Ok(mut names) => expanded.append(&mut names),
                Err(error) => eprintln!("mysh: {error}"),
            }
        }
    }
    expanded
}
