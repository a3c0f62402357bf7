//! External process invocation for the systemd command-line tools
//!
//! Executables are located on `PATH` once per process and cached; every call
//! spawns a fresh process and captures its output.

use std::{
    env,
    path::{Path, PathBuf},
    process::Command,
    sync::OnceLock,
};

use tracing::debug;

use crate::errors::DiscoveryError;

static SYSTEMCTL_PATH: OnceLock<Option<PathBuf>> = OnceLock::new();
static JOURNALCTL_PATH: OnceLock<Option<PathBuf>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Systemctl,
    Journalctl,
}

impl Tool {
    pub fn program(self) -> &'static str {
        match self {
            Self::Systemctl => "systemctl",
            Self::Journalctl => "journalctl",
        }
    }

    /// Cached `PATH` lookup; `None` when the tool is not installed.
    pub fn location(self) -> Option<&'static Path> {
        let cell = match self {
            Self::Systemctl => &SYSTEMCTL_PATH,
            Self::Journalctl => &JOURNALCTL_PATH,
        };

        cell.get_or_init(|| find_executable(self.program()))
            .as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Seam between the discovery engine and the operating system.
pub trait CommandRunner: Send + Sync {
    fn run(
        &self,
        tool: Tool,
        args: &[&str],
        allow_non_zero_exit: bool,
    ) -> Result<CommandOutput, DiscoveryError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(
        &self,
        tool: Tool,
        args: &[&str],
        allow_non_zero_exit: bool,
    ) -> Result<CommandOutput, DiscoveryError> {
        let executable = tool
            .location()
            .ok_or(DiscoveryError::ExecutableUnavailable {
                program: tool.program(),
            })?;

        run_executable(executable, tool.program(), args, allow_non_zero_exit)
    }
}

pub fn run_executable(
    executable: &Path,
    program: &'static str,
    args: &[&str],
    allow_non_zero_exit: bool,
) -> Result<CommandOutput, DiscoveryError> {
    debug!(program, args = ?args, "running external command");

    let output = Command::new(executable)
        .args(args)
        .output()
        .map_err(|source| DiscoveryError::Spawn { program, source })?;

    let captured = CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code().unwrap_or(-1),
    };

    if output.status.success() || allow_non_zero_exit {
        return Ok(captured);
    }

    Err(DiscoveryError::CommandFailed {
        exit_code: captured.exit_code,
        message: failure_message(program, &captured),
    })
}

fn failure_message(program: &str, output: &CommandOutput) -> String {
    [output.stderr.trim(), output.stdout.trim()]
        .into_iter()
        .find(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{program} exited with status {}", output.exit_code))
}

fn find_executable(program: &str) -> Option<PathBuf> {
    let search_path = env::var_os("PATH")?;
    env::split_paths(&search_path)
        .map(|directory| directory.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use std::path::Path;

    use super::{failure_message, run_executable, CommandOutput};
    use crate::errors::DiscoveryError;

    const SH: &str = "/bin/sh";

    #[test]
    fn captures_stdout_and_exit_code() {
        let output = run_executable(Path::new(SH), "sh", &["-c", "printf hello"], false)
            .expect("command should succeed");

        assert_eq!(output.stdout, "hello");
        assert_eq!(output.exit_code, 0);
    }

    #[test]
    fn non_zero_exit_reports_stderr_first() {
        let err = run_executable(
            Path::new(SH),
            "sh",
            &["-c", "echo out; echo boom >&2; exit 3"],
            false,
        )
        .expect_err("non-zero exit must fail");

        match err {
            DiscoveryError::CommandFailed { exit_code, message } => {
                assert_eq!(exit_code, 3);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_zero_exit_is_returned_when_allowed() {
        let output = run_executable(Path::new(SH), "sh", &["-c", "echo inactive; exit 3"], true)
            .expect("non-zero exit is allowed");

        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stdout.trim(), "inactive");
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let err = run_executable(
            Path::new("/nonexistent/definitely-not-systemctl"),
            "systemctl",
            &[],
            false,
        )
        .expect_err("spawn must fail");

        assert!(matches!(err, DiscoveryError::Spawn { program: "systemctl", .. }));
    }

    #[test]
    fn failure_message_falls_back_to_stdout_then_generic() {
        let stdout_only = CommandOutput {
            stdout: "  from stdout \n".to_string(),
            stderr: "   ".to_string(),
            exit_code: 1,
        };
        assert_eq!(failure_message("systemctl", &stdout_only), "from stdout");

        let silent = CommandOutput {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 4,
        };
        assert_eq!(
            failure_message("journalctl", &silent),
            "journalctl exited with status 4"
        );
    }
}
