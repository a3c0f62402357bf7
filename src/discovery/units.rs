//! `systemctl list-units` parsing
//!
//! The JSON output mode is preferred; older systemctl releases ignore
//! `--output=json` for `list-units` and print the plain table instead, which is
//! handled by the fixed-column fallback.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classify::is_standard_service;
use super::process::{CommandRunner, Tool};
use super::Discovery;
use crate::errors::DiscoveryError;

const LIST_UNITS_ARGS: [&str; 7] = [
    "list-units",
    "--type=service",
    "--all",
    "--no-legend",
    "--no-pager",
    "--plain",
    "--output=json",
];

const PLAIN_COLUMNS: usize = 5;
const UNKNOWN_STATE: &str = "unknown";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UnitRecord {
    pub name: String,
    pub description: String,
    #[serde(rename = "load")]
    pub load_state: String,
    #[serde(rename = "active")]
    pub active_state: String,
    #[serde(rename = "sub")]
    pub sub_state: String,
    pub following: Option<String>,
    pub is_standard_service: bool,
}

impl UnitRecord {
    fn new(
        name: String,
        description: String,
        load_state: String,
        active_state: String,
        sub_state: String,
        following: Option<String>,
    ) -> Self {
        let is_standard_service = is_standard_service(&name, &description);
        Self {
            name,
            description,
            load_state,
            active_state,
            sub_state,
            following,
            is_standard_service,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListedUnit {
    name: Option<String>,
    unit: Option<String>,
    description: Option<String>,
    load: Option<String>,
    active: Option<String>,
    active_state: Option<String>,
    sub: Option<String>,
    sub_state: Option<String>,
    following: Option<String>,
}

impl ListedUnit {
    fn into_record(self) -> Option<UnitRecord> {
        let name = non_empty(self.name).or_else(|| non_empty(self.unit))?;

        Some(UnitRecord::new(
            name,
            self.description.unwrap_or_default(),
            self.load.unwrap_or_else(|| UNKNOWN_STATE.to_string()),
            self.active
                .or(self.active_state)
                .unwrap_or_else(|| UNKNOWN_STATE.to_string()),
            self.sub
                .or(self.sub_state)
                .unwrap_or_else(|| UNKNOWN_STATE.to_string()),
            non_empty(self.following),
        ))
    }
}

impl<R: CommandRunner> Discovery<R> {
    pub fn list_units(&self) -> Result<Vec<UnitRecord>, DiscoveryError> {
        let output = self.runner.run(Tool::Systemctl, &LIST_UNITS_ARGS, false)?;
        Ok(parse_unit_listing(&output.stdout))
    }
}

/// Structured parse first; the plain table is only tried when the payload
/// does not deserialize as a JSON array of unit objects.
pub fn parse_unit_listing(payload: &str) -> Vec<UnitRecord> {
    match parse_json_units(payload) {
        Ok(units) => units,
        Err(err) => {
            debug!(error = %err, "unit listing is not JSON, parsing plain table");
            parse_plain_units(payload)
        }
    }
}

pub fn parse_json_units(payload: &str) -> Result<Vec<UnitRecord>, serde_json::Error> {
    let listed: Vec<ListedUnit> = serde_json::from_str(payload)?;
    Ok(listed
        .into_iter()
        .filter_map(ListedUnit::into_record)
        .collect())
}

pub fn parse_plain_units(payload: &str) -> Vec<UnitRecord> {
    payload
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let columns = split_columns(line, PLAIN_COLUMNS);
            let [name, load, active, sub, description] = columns.as_slice() else {
                return None;
            };

            Some(UnitRecord::new(
                name.to_string(),
                description.to_string(),
                load.to_string(),
                active.to_string(),
                sub.to_string(),
                None,
            ))
        })
        .collect()
}

/// Splits on whitespace runs into at most `count` fields; the last field keeps
/// its inner whitespace.
fn split_columns(line: &str, count: usize) -> Vec<&str> {
    let mut columns = Vec::with_capacity(count);
    let mut rest = line.trim();

    while !rest.is_empty() {
        if columns.len() + 1 == count {
            columns.push(rest);
            break;
        }

        match rest.find(char::is_whitespace) {
            Some(end) => {
                columns.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                columns.push(rest);
                break;
            }
        }
    }

    columns
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
