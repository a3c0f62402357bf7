//! Per-unit `systemctl status` probing

use serde::Serialize;
use tracing::warn;

use super::process::{CommandOutput, CommandRunner, Tool};
use super::Discovery;

const ACTIVE_PREFIX: &str = "active: active";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SystemctlSummary {
    pub loaded: String,
    pub active: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ProbeDetails {
    Probed {
        output: String,
        returncode: i32,
        systemctl: SystemctlSummary,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UnitStatusResult {
    pub unit: String,
    pub status: ProbeStatus,
    pub details: ProbeDetails,
}

impl<R: CommandRunner> Discovery<R> {
    /// Probes each non-blank unit name in turn. A failing probe is recorded in
    /// that unit's result and never stops the batch.
    pub fn status_for_units<S: AsRef<str>>(&self, units: &[S]) -> Vec<UnitStatusResult> {
        units
            .iter()
            .map(|unit| unit.as_ref().trim())
            .filter(|unit| !unit.is_empty())
            .fold(Vec::new(), |mut results, unit| {
                results.push(self.probe_unit(unit));
                results
            })
    }

    fn probe_unit(&self, unit: &str) -> UnitStatusResult {
        match self
            .runner
            .run(Tool::Systemctl, &["status", "--no-pager", "--", unit], true)
        {
            Ok(output) => summarize_status(unit, output),
            Err(err) => {
                warn!(unit, error = %err, "unit status probe failed");
                UnitStatusResult {
                    unit: unit.to_string(),
                    status: ProbeStatus::Error,
                    details: ProbeDetails::Failed {
                        error: err.to_string(),
                    },
                }
            }
        }
    }
}

pub fn summarize_status(unit: &str, output: CommandOutput) -> UnitStatusResult {
    let loaded = first_line_containing(&output.stdout, "Loaded:");
    let active = first_line_containing(&output.stdout, "Active:");
    let status = classify_active_line(&active);

    let mut combined = output.stdout;
    if !output.stderr.trim().is_empty() {
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&output.stderr);
    }

    UnitStatusResult {
        unit: unit.to_string(),
        status,
        details: ProbeDetails::Probed {
            output: combined,
            returncode: output.exit_code,
            systemctl: SystemctlSummary { loaded, active },
        },
    }
}

pub fn classify_active_line(active_line: &str) -> ProbeStatus {
    if active_line.to_lowercase().starts_with(ACTIVE_PREFIX) {
        ProbeStatus::Ok
    } else {
        ProbeStatus::Error
    }
}

fn first_line_containing(text: &str, marker: &str) -> String {
    text.lines()
        .find(|line| line.contains(marker))
        .map(|line| line.trim().to_string())
        .unwrap_or_default()
}
