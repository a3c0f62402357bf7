//! Request parameter normalization and listing filters shared by the handlers

use crate::{discovery::UnitRecord, errors::AppError};

pub const DEFAULT_JOURNAL_LIMIT: i64 = 200;
pub const VALID_ACTIVE_STATES: [&str; 8] = [
    "active",
    "inactive",
    "failed",
    "activating",
    "deactivating",
    "reloading",
    "maintenance",
    "refreshing",
];

pub fn normalize_active_state(state: Option<String>) -> Result<Option<String>, AppError> {
    let Some(value) = state else {
        return Ok(None);
    };

    let normalized = value.trim().to_ascii_lowercase();
    if !VALID_ACTIVE_STATES.contains(&normalized.as_str()) {
        return Err(AppError::bad_request(
            "invalid_state",
            format!("state must be one of: {}", VALID_ACTIVE_STATES.join(", ")),
        ));
    }

    Ok(Some(normalized))
}

/// Splits a comma-separated `units` parameter. Blank entries are left in
/// place; the status prober skips them.
pub fn split_unit_names(units: Option<&str>) -> Result<Vec<String>, AppError> {
    let names: Vec<String> = units
        .unwrap_or_default()
        .split(',')
        .map(str::to_string)
        .collect();

    if names.iter().all(|name| name.trim().is_empty()) {
        return Err(AppError::bad_request(
            "missing_units",
            "units must name at least one systemd unit",
        ));
    }

    Ok(names)
}

pub fn filter_units_by_state(units: Vec<UnitRecord>, state: Option<&str>) -> Vec<UnitRecord> {
    let Some(state) = state else {
        return units;
    };

    units
        .into_iter()
        .filter(|unit| unit.active_state.eq_ignore_ascii_case(state))
        .collect()
}

pub fn filter_standard_units(units: Vec<UnitRecord>, include_standard: bool) -> Vec<UnitRecord> {
    if include_standard {
        return units;
    }

    units
        .into_iter()
        .filter(|unit| !unit.is_standard_service)
        .collect()
}
