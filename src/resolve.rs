use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Shell builtin commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Echo,
    Exit,
    Type,
    Pwd,
    Cd,
}

/// List of builtin commands
pub const BUILTINS: &[Builtin] = &[Builtin::Echo, Builtin::Exit, Builtin::Type, Builtin::Pwd, Builtin::Cd];

impl Builtin {
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Echo => "echo",
            Builtin::Exit => "exit",
            Builtin::Type => "type",
            Builtin::Pwd => "pwd",
            Builtin::Cd => "cd",
        }
    }
}

impl TryFrom<&str> for Builtin {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        BUILTINS.iter().copied().find(|b| b.name() == value).ok_or(())
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a command name refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Builtin(Builtin),
    External(PathBuf),
    NotFound,
}

/// Classifies a command name. Builtins take priority over the search path.
pub fn resolve(command: &str) -> Resolved {
    let resolved = match Builtin::try_from(command) {
        Ok(builtin) => Resolved::Builtin(builtin),
        Err(()) => full_path(command).map_or(Resolved::NotFound, Resolved::External),
    };
    log::debug!("resolved {:?} to {:?}", command, resolved);
    resolved
}

/// Finds the full path of a command by searching PATH.
///
/// PATH is read on every call so changes made while the shell runs are seen.
/// A name containing `/` is checked as given instead of searched.
pub fn full_path(command: &str) -> Option<PathBuf> {
    if command.contains('/') {
        let path = Path::new(command);
        return is_executable(path).then(|| path.to_path_buf());
    }
    find_in(&env::var_os("PATH")?, command)
}

/// Searches the directories of a PATH-style list in order.
pub fn find_in(paths: &OsStr, command: &str) -> Option<PathBuf> {
    if command.is_empty() {
        return None;
    }
    env::split_paths(paths)
        .map(|dir| dir.join(command))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path).is_ok_and(|m| {
        m.is_file() && {
            #[cfg(unix)]
            {
                m.permissions().mode() & 0o111 != 0
            }
            #[cfg(not(unix))]
            {
                true
            }
        }
    })
}
