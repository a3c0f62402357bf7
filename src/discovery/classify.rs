//! Heuristic separating core host infrastructure units from application units

pub const STANDARD_PREFIXES: [&str; 13] = [
    "systemd-",
    "sys-",
    "dbus",
    "user@",
    "session-",
    "serial-getty@",
    "getty@",
    "-.",
    "basic.",
    "multi-user.",
    "graphical.",
    "rescue.",
    "emergency.",
];

pub const STANDARD_FRAGMENTS: [&str; 12] = [
    "network",
    "ssh",
    "chrony",
    "cron",
    "avahi",
    "systemd",
    "cups",
    "docker",
    "containerd",
    "polkit",
    "rsyslog",
    "wpa_supplicant",
];

/// Advisory only; used for dashboard filtering.
pub fn is_standard_service(name: &str, description: &str) -> bool {
    let name = name.to_lowercase();
    let description = description.to_lowercase();

    STANDARD_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
        || STANDARD_FRAGMENTS
            .iter()
            .any(|fragment| name.contains(fragment) || description.contains(fragment))
}
