//! Service discovery and status aggregation over the systemd command-line tools
//!
//! Every operation runs fresh `systemctl`/`journalctl` processes; nothing is
//! cached between calls apart from the executable locations.

pub mod classify;
pub mod journal;
pub mod process;
pub mod status;
pub mod units;

pub use classify::is_standard_service;
pub use journal::{JournalEntry, MAX_JOURNAL_ENTRIES};
pub use process::{CommandOutput, CommandRunner, SystemCommandRunner, Tool};
pub use status::{ProbeDetails, ProbeStatus, SystemctlSummary, UnitStatusResult};
pub use units::UnitRecord;

#[derive(Debug, Clone, Default)]
pub struct Discovery<R = SystemCommandRunner> {
    pub(crate) runner: R,
}

impl<R: CommandRunner> Discovery<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{collections::VecDeque, sync::Mutex};

    use super::{CommandOutput, CommandRunner, Tool};
    use crate::errors::DiscoveryError;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedCall {
        pub tool: Tool,
        pub args: Vec<String>,
        pub allow_non_zero_exit: bool,
    }

    /// Replays queued outcomes in order and records every invocation.
    #[derive(Debug, Default)]
    pub struct ScriptedRunner {
        outcomes: Mutex<VecDeque<Result<CommandOutput, DiscoveryError>>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, stdout: &str, exit_code: i32) -> Self {
            self.push(Ok(CommandOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
                exit_code,
            }))
        }

        pub fn fail(self, err: DiscoveryError) -> Self {
            self.push(Err(err))
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().expect("calls lock").clone()
        }

        fn push(self, outcome: Result<CommandOutput, DiscoveryError>) -> Self {
            self.outcomes
                .lock()
                .expect("outcomes lock")
                .push_back(outcome);
            self
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(
            &self,
            tool: Tool,
            args: &[&str],
            allow_non_zero_exit: bool,
        ) -> Result<CommandOutput, DiscoveryError> {
            self.calls.lock().expect("calls lock").push(RecordedCall {
                tool,
                args: args.iter().map(|arg| arg.to_string()).collect(),
                allow_non_zero_exit,
            });

            self.outcomes
                .lock()
                .expect("outcomes lock")
                .pop_front()
                .unwrap_or_else(|| panic!("no scripted outcome for {}", tool.program()))
        }
    }
}
