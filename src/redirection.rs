use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::process::Stdio;

use crate::error::{ShellError, ShellResult};

/// Represents a redirection target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub file: String,
    pub append: bool,
}

/// A parsed command with arguments and redirections.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    pub args: Vec<String>,
    pub redirect_stdout: Option<Redirection>,
    pub redirect_stderr: Option<Redirection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Maps a redirection operator to the stream it targets and whether it appends.
fn operator(token: &str) -> Option<(Stream, bool)> {
    match token {
        ">" | "1>" => Some((Stream::Stdout, false)),
        ">>" | "1>>" => Some((Stream::Stdout, true)),
        "2>" => Some((Stream::Stderr, false)),
        "2>>" => Some((Stream::Stderr, true)),
        _ => None,
    }
}

/// Parses tokens into a ParsedCommand, extracting redirection operators.
///
/// Every operator must be followed by a filename that is not itself an
/// operator. The first redirection of a stream wins; later ones for the same
/// stream are removed from the arguments and otherwise ignored.
pub fn parse_command(tokens: Vec<String>) -> ShellResult<ParsedCommand> {
    let mut parsed = ParsedCommand::default();
    let mut tokens = tokens.into_iter();

    while let Some(token) = tokens.next() {
        let Some((stream, append)) = operator(&token) else {
            parsed.args.push(token);
            continue;
        };

        let file = match tokens.next() {
            Some(file) if operator(&file).is_none() => file,
            _ => return Err(ShellError::MissingRedirectTarget(token)),
        };

        let slot = match stream {
            Stream::Stdout => &mut parsed.redirect_stdout,
            Stream::Stderr => &mut parsed.redirect_stderr,
        };
        if slot.is_none() {
            *slot = Some(Redirection { file, append });
        } else {
            log::debug!("ignoring repeated {:?} redirection to {}", stream, file);
        }
    }

    log::debug!(
        "parsed command {:?}, stdout: {:?}, stderr: {:?}",
        parsed.args,
        parsed.redirect_stdout,
        parsed.redirect_stderr
    );
    Ok(parsed)
}

impl Redirection {
    /// Opens the target, creating it with mode 0644 if missing.
    pub fn open(&self) -> ShellResult<File> {
        let mut options = OpenOptions::new();
        options.write(true).create(true);
        if self.append {
            options.append(true);
        } else {
            options.truncate(true);
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        options.open(&self.file).map_err(|source| ShellError::OpenRedirect {
            path: self.file.clone(),
            source,
        })
    }
}

/// Where one of a command's output streams goes.
#[derive(Debug)]
pub enum OutputStream {
    Stdout,
    Stderr,
    File(File),
}

impl OutputStream {
    /// Builds the descriptor a child process should get for this stream.
    pub fn stdio(&self) -> io::Result<Stdio> {
        match self {
            OutputStream::Stdout | OutputStream::Stderr => Ok(Stdio::inherit()),
            OutputStream::File(file) => Ok(Stdio::from(file.try_clone()?)),
        }
    }
}

impl Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputStream::Stdout => io::stdout().write(buf),
            OutputStream::Stderr => io::stderr().write(buf),
            OutputStream::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputStream::Stdout => io::stdout().flush(),
            OutputStream::Stderr => io::stderr().flush(),
            OutputStream::File(file) => file.flush(),
        }
    }
}

/// The output and error streams of one command.
///
/// Opened files are closed when this is dropped, which puts the shell back on
/// its own streams.
#[derive(Debug)]
pub struct Streams {
    pub out: OutputStream,
    pub err: OutputStream,
}

impl ParsedCommand {
    /// Opens every redirection target. Fails without running anything if one
    /// of them cannot be opened.
    pub fn open_streams(&self) -> ShellResult<Streams> {
        let out = match &self.redirect_stdout {
            Some(redirection) => OutputStream::File(redirection.open()?),
            None => OutputStream::Stdout,
        };
        let err = match &self.redirect_stderr {
            Some(redirection) => OutputStream::File(redirection.open()?),
            None => OutputStream::Stderr,
        };
        Ok(Streams { out, err })
    }
}
