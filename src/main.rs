use anyhow::Result;
use argh::FromArgs;
use mysh::Interpreter;
use std::path::PathBuf;

#[derive(FromArgs)]
/// A small command shell with pipelines, redirection and wildcard expansion.
struct Options {
    #[argh(positional)]
    /// script to run in batch mode; interactive when omitted.
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    let options: Options = argh::from_env();
    let mut shell = Interpreter::new();
    match options.script {
        Some(path) => shell.run_script(&path),
        None => shell.repl(),
    }
}
