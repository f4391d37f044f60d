use std::io::Write;
use std::path::Path;
use std::process::Command;

use crate::commands::{Flow, execute_builtin};
use crate::error::{ShellError, ShellResult};
use crate::redirection::{ParsedCommand, Streams, parse_command};
use crate::resolve::{Resolved, resolve};
use crate::tokenize::tokenize;

/// Runs one line of input through the whole pipeline.
///
/// Errors returned here happened before the command ran and belong on the
/// shell's own stderr. Errors from the command itself have already been
/// written to its (possibly redirected) error stream.
pub fn run_line(line: &str) -> ShellResult<Flow> {
    let tokens = tokenize(line);
    if tokens.is_empty() {
        return Ok(Flow::Continue);
    }
    let parsed = parse_command(tokens)?;
    execute(&parsed)
}

/// Opens the redirections, runs the command, and closes them again.
pub fn execute(parsed: &ParsedCommand) -> ShellResult<Flow> {
    let mut streams = parsed.open_streams()?;
    let Some(name) = parsed.args.first() else {
        return Ok(Flow::Continue);
    };

    let flow = match resolve(name) {
        Resolved::Builtin(builtin) => {
            log::debug!("running builtin {}", builtin);
            let Streams { out, err } = &mut streams;
            execute_builtin(builtin, &parsed.args, out, err)?
        }
        Resolved::External(path) => {
            if let Err(e) = run_external(name, &path, &parsed.args[1..], &streams) {
                writeln!(streams.err, "{}", e)?;
            }
            Flow::Continue
        }
        Resolved::NotFound => {
            writeln!(streams.err, "{}", ShellError::CommandNotFound(name.clone()))?;
            Flow::Continue
        }
    };

    streams.out.flush()?;
    streams.err.flush()?;
    Ok(flow)
}

/// Spawns an external program and blocks until it exits or is killed.
fn run_external(name: &str, path: &Path, args: &[String], streams: &Streams) -> ShellResult<()> {
    let mut command = Command::new(path);
    command
        .args(args)
        .stdout(streams.out.stdio()?)
        .stderr(streams.err.stdio()?);
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.arg0(name);
    }

    let status = command.status().map_err(|source| ShellError::Spawn {
        name: name.to_string(),
        source,
    })?;
    match status.code() {
        Some(code) => log::debug!("{} exited with status {}", name, code),
        None => log::debug!("{} terminated by {}", name, status),
    }
    Ok(())
}
