use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mini-shell-it-{}-{}", std::process::id(), name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Runs the shell in `dir` with `script` on stdin.
fn run_shell(dir: &Path, script: impl AsRef<[u8]>) -> Output {
    run_shell_with_path(dir, script, None)
}

/// Like `run_shell`, optionally replacing PATH.
fn run_shell_with_path(dir: &Path, script: impl AsRef<[u8]>, path: Option<&Path>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_mini-shell"));
    if let Some(path) = path {
        command.env("PATH", path);
    }
    let mut child = command
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(script.as_ref()).unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_prompt_and_eof() {
    let dir = scratch_dir("eof");
    let output = run_shell(&dir, "echo hello\n");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "$ hello\n$ ");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_exit_codes() {
    let dir = scratch_dir("exit");
    assert_eq!(run_shell(&dir, "exit 3\necho unreachable\n").status.code(), Some(3));
    assert_eq!(run_shell(&dir, "exit\n").status.code(), Some(0));
    assert_eq!(run_shell(&dir, "exit abc\n").status.code(), Some(0));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_blank_lines_reprompt() {
    let dir = scratch_dir("blank");
    let output = run_shell(&dir, "\n   \nexit\n");
    assert_eq!(stdout(&output), "$ $ $ ");
    assert!(stderr(&output).is_empty());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_quoting() {
    let dir = scratch_dir("quoting");
    let output = run_shell(&dir, "echo 'a  b' foo'bar'baz \"x\\\"y\"\nexit\n");
    assert_eq!(stdout(&output), "$ a  b foobarbaz x\"y\n$ ");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_redirection_round_trip() {
    let dir = scratch_dir("redirect");
    let output = run_shell(&dir, "echo hi 1> out.txt\necho there >> out.txt\nexit\n");
    assert_eq!(stdout(&output), "$ $ $ ");
    assert_eq!(fs::read_to_string(dir.join("out.txt")).unwrap(), "hi\nthere\n");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_missing_redirection_target() {
    let dir = scratch_dir("missing-target");
    let output = run_shell(&dir, "echo hi >\nexit\n");
    assert_eq!(stdout(&output), "$ $ ");
    assert_eq!(stderr(&output), ">: missing redirection target\n");
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_cd_and_pwd() {
    let dir = scratch_dir("cd");
    fs::create_dir_all(dir.join("sub")).unwrap();
    let expected = fs::canonicalize(dir.join("sub")).unwrap();

    let output = run_shell(&dir, "cd nowhere\ncd sub\npwd\nexit\n");
    assert_eq!(stderr(&output), "cd: nowhere: No such file or directory\n");
    assert_eq!(stdout(&output), format!("$ $ $ {}\n$ ", expected.display()));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_cd_home() {
    let dir = scratch_dir("home");
    let home = fs::canonicalize(&dir).unwrap();
    fs::create_dir_all(home.join("docs")).unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_mini-shell"))
        .current_dir("/")
        .env("HOME", &home)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"cd ~\npwd\ncd ~/docs\npwd\nexit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert_eq!(
        stdout(&output),
        format!("$ $ {}\n$ $ {}\n$ ", home.display(), home.join("docs").display())
    );
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_type_and_not_found() {
    let dir = scratch_dir("type");
    let output = run_shell(&dir, "type echo\ntype nope-xyz\nnope-xyz --flag\nexit\n");
    assert_eq!(stdout(&output), "$ echo is a shell builtin\n$ nope-xyz: not found\n$ $ ");
    assert_eq!(stderr(&output), "nope-xyz: command not found\n");
    let _ = fs::remove_dir_all(&dir);
}

#[cfg(unix)]
#[test]
fn test_external_command() {
    let dir = scratch_dir("external");
    let output = run_shell(&dir, "sh -c 'echo from child' > child.txt\nsh -c 'exit 9'\necho after\nexit\n");
    assert_eq!(fs::read_to_string(dir.join("child.txt")).unwrap(), "from child\n");
    assert_eq!(stdout(&output), "$ $ $ after\n$ ");
    assert_eq!(output.status.code(), Some(0));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_invalid_utf8_line_keeps_shell_running() {
    let dir = scratch_dir("utf8");
    let output = run_shell(&dir, b"echo \xff\necho after\nexit 5\n");
    assert_eq!(output.status.code(), Some(5));
    assert_eq!(stdout(&output), "$ \u{fffd}\n$ after\n$ ");
    assert!(stderr(&output).is_empty());
    let _ = fs::remove_dir_all(&dir);
}

#[cfg(unix)]
#[test]
fn test_builtin_shadows_executable_on_path() {
    use std::os::unix::fs::PermissionsExt;

    let dir = scratch_dir("shadow");
    let bin = dir.join("bin");
    fs::create_dir_all(&bin).unwrap();
    let fake_echo = bin.join("echo");
    fs::write(&fake_echo, "#!/bin/sh\nprintf 'external echo\\n'\n").unwrap();
    fs::set_permissions(&fake_echo, fs::Permissions::from_mode(0o755)).unwrap();

    let output = run_shell_with_path(&dir, "type echo\necho hi\ntype pwd\nexit\n", Some(&bin));
    assert_eq!(
        stdout(&output),
        "$ echo is a shell builtin\n$ hi\n$ pwd is a shell builtin\n$ "
    );
    assert!(stderr(&output).is_empty());
    let _ = fs::remove_dir_all(&dir);
}

#[cfg(unix)]
#[test]
fn test_type_reports_path_entry() {
    use std::os::unix::fs::PermissionsExt;

    let dir = scratch_dir("type-path");
    let bin = dir.join("bin");
    fs::create_dir_all(&bin).unwrap();
    let tool = bin.join("my-tool");
    fs::write(&tool, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

    let output = run_shell_with_path(&dir, "type my-tool\nexit\n", Some(&bin));
    assert_eq!(
        stdout(&output),
        format!("$ my-tool is {}\n$ ", tool.display())
    );
    let _ = fs::remove_dir_all(&dir);
}
