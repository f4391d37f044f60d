use std::env;
use std::io::{self, Write};

use crate::error::{ShellError, ShellResult};
use crate::resolve::{Builtin, Resolved, resolve};

/// What the REPL should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(i32),
}

/// Executes a builtin command, writing its output and errors to the given streams.
pub fn execute_builtin(
    builtin: Builtin,
    args: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<Flow> {
    let result = match builtin {
        Builtin::Exit => return Ok(Flow::Exit(exit_status(args.get(1).map(String::as_str)))),
        Builtin::Pwd => env::current_dir()
            .map(|p| format!("{}\n", p.display()))
            .map_err(ShellError::from),
        Builtin::Cd => execute_cd(args),
        Builtin::Type => Ok(execute_type(args)),
        Builtin::Echo => Ok(args[1..].join(" ") + "\n"),
    };

    match result {
        Ok(output) => out.write_all(output.as_bytes())?,
        Err(e) => writeln!(err, "{}", e)?,
    }
    Ok(Flow::Continue)
}

/// Parses the operand of `exit` the way `atoi` does: optional leading
/// whitespace and sign, then as many digits as there are. Anything else is 0.
pub fn exit_status(arg: Option<&str>) -> i32 {
    let Some(arg) = arg else {
        return 0;
    };
    let arg = arg.trim_start();
    let (negative, digits) = match arg.as_bytes().first() {
        Some(b'-') => (true, &arg[1..]),
        Some(b'+') => (false, &arg[1..]),
        _ => (false, arg),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i32, |acc, d| acc.wrapping_mul(10).wrapping_add(i32::from(d - b'0')));
    if negative { value.wrapping_neg() } else { value }
}

fn home() -> ShellResult<String> {
    env::var("HOME").map_err(|_| ShellError::HomeNotSet)
}

fn execute_cd(args: &[String]) -> ShellResult<String> {
    let (shown, target) = match args.get(1) {
        None => {
            let home = home()?;
            (home.clone(), home)
        }
        Some(arg) if arg == "~" => (arg.clone(), home()?),
        Some(arg) => match arg.strip_prefix("~/") {
            Some(rest) => (arg.clone(), format!("{}/{}", home()?, rest)),
            None => (arg.clone(), arg.clone()),
        },
    };

    env::set_current_dir(&target)
        .map(|_| String::new())
        .map_err(|e| {
            log::debug!("cd to {} failed: {}", target, e);
            ShellError::NoSuchDirectory(shown)
        })
}

fn execute_type(args: &[String]) -> String {
    if args.len() < 2 {
        return "type: missing argument\n".to_string();
    }

    args[1..]
        .iter()
        .map(|arg| match resolve(arg) {
            Resolved::Builtin(_) => format!("{} is a shell builtin\n", arg),
            Resolved::External(path) => format!("{} is {}\n", arg, path.display()),
            Resolved::NotFound => format!("{}: not found\n", arg),
        })
        .collect()
}
