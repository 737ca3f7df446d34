/// Helper utilities shared by the CLI and the dashboard

use chrono::{DateTime, Local};

use crate::core::docker::ContainerSummary;
use crate::utils::SHORT_ID_LEN;

/// Format bytes to human-readable size
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Display prefix of an engine identifier
pub fn short_id(id: &str) -> &str {
    // Image ids carry a digest algorithm prefix
    let id = id.strip_prefix("sha256:").unwrap_or(id);
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Format an RFC 3339 timestamp in local time, keeping the raw text if it does not parse
pub fn format_rfc3339(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => {
            let local: DateTime<Local> = dt.with_timezone(&Local);
            local.format("%Y-%m-%d %H:%M:%S").to_string()
        }
        Err(_) => timestamp.to_string(),
    }
}

/// Apply the `list` filters: running-only and a case-insensitive substring over image and names
pub fn filter_containers(
    containers: Vec<ContainerSummary>,
    running_only: bool,
    name_filter: &str,
) -> Vec<ContainerSummary> {
    let needle = name_filter.trim().to_lowercase();
    if !running_only && needle.is_empty() {
        return containers;
    }

    containers
        .into_iter()
        .filter(|c| !running_only || c.is_running())
        .filter(|c| {
            if needle.is_empty() {
                return true;
            }
            let haystack = format!("{} {}", c.image, c.names.join(" ")).to_lowercase();
            haystack.contains(&needle)
        })
        .collect()
}

/// Simplified container state parsed from the engine's status text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Stopped,
    Paused,
    Restarting,
    Dead,
    Created,
    Unknown,
}

impl From<&str> for ContainerState {
    fn from(status: &str) -> Self {
        let status_lower = status.trim().to_lowercase();
        // "Up 3 minutes (Paused)" is still up as far as the engine is concerned
        if status_lower.contains("(paused)") {
            ContainerState::Paused
        } else if status_lower.starts_with("up") {
            ContainerState::Running
        } else if status_lower.starts_with("restarting") {
            ContainerState::Restarting
        } else if status_lower.starts_with("dead") || status_lower.starts_with("removal") {
            ContainerState::Dead
        } else if status_lower.starts_with("exited") {
            ContainerState::Stopped
        } else if status_lower.starts_with("created") {
            ContainerState::Created
        } else {
            ContainerState::Unknown
        }
    }
}

impl ContainerState {
    pub fn is_running(&self) -> bool {
        matches!(self, ContainerState::Running | ContainerState::Paused)
    }

    /// Color name for terminal display
    pub fn color(&self) -> &'static str {
        match self {
            ContainerState::Running => "green",
            ContainerState::Stopped => "gray",
            ContainerState::Paused => "yellow",
            ContainerState::Restarting => "cyan",
            ContainerState::Dead => "red",
            ContainerState::Created => "blue",
            ContainerState::Unknown => "white",
        }
    }

    /// Color name understood by `colored`, which has no plain gray
    pub fn cli_color(&self) -> &'static str {
        match self {
            ContainerState::Stopped => "bright black",
            other => other.color(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(id: &str, image: &str, status: &str, names: &[&str]) -> ContainerSummary {
        ContainerSummary {
            id: id.to_string(),
            image: image.to_string(),
            status: status.to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1048576), "1.00 MB");
        assert_eq!(format_bytes(1073741824), "1.00 GB");
    }

    #[test]
    fn test_format_bytes_caps_at_gigabytes() {
        assert_eq!(format_bytes(2 * 1024 * 1024 * 1024 * 1024), "2048.00 GB");
    }

    #[test]
    fn test_format_bytes_picks_largest_unit_at_least_one() {
        for bytes in [1u64, 1000, 1024, 5_000_000, 3 << 20, 1 << 30] {
            let formatted = format_bytes(bytes);
            let value: f64 = formatted.split(' ').next().unwrap().parse().unwrap();
            assert!(value >= 1.0, "{} -> {}", bytes, formatted);
            assert!(value < 1024.0 || formatted.ends_with("GB"), "{} -> {}", bytes, formatted);
        }
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("abc123456789def0"), "abc123456789");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("sha256:0123456789abcdef"), "0123456789ab");
    }

    #[test]
    fn test_format_rfc3339_falls_back_to_raw() {
        assert_eq!(format_rfc3339("not a date"), "not a date");
        assert_eq!(format_rfc3339("2024-05-01T10:00:00Z").len(), 19);
    }

    #[test]
    fn test_filter_running_only() {
        let containers = vec![
            container("a", "nginx:latest", "Up 2 minutes", &["web"]),
            container("b", "redis:7", "Exited (0) 2 hours ago", &["cache"]),
            container("c", "postgres:16", "up 1 second", &["db"]),
        ];

        let ids: Vec<String> = filter_containers(containers, true, "")
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_filter_by_name_or_image_case_insensitive() {
        let containers = vec![
            container("a", "nginx:latest", "Up 2 minutes", &["web"]),
            container("b", "redis:7", "Exited (0) 2 hours ago", &["Cache", "sessions"]),
        ];

        let by_name = filter_containers(containers.clone(), false, "SESS");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "b");

        let by_image = filter_containers(containers.clone(), false, "NGINX");
        assert_eq!(by_image[0].id, "a");

        assert!(filter_containers(containers.clone(), true, "redis").is_empty());
        assert_eq!(filter_containers(containers.clone(), false, "  "), containers);
    }

    #[test]
    fn test_container_state() {
        assert_eq!(ContainerState::from("Up 2 hours"), ContainerState::Running);
        assert_eq!(ContainerState::from("Exited (0) 3 days ago"), ContainerState::Stopped);
        assert_eq!(ContainerState::from("Up 5 minutes (Paused)"), ContainerState::Paused);
        assert_eq!(ContainerState::from("Created"), ContainerState::Created);
        assert_eq!(ContainerState::from("Restarting (1) 4 seconds ago"), ContainerState::Restarting);
        assert!(ContainerState::Running.is_running());
        assert!(!ContainerState::Stopped.is_running());
    }

    #[test]
    fn test_cli_color_has_no_gray() {
        assert_eq!(ContainerState::Stopped.cli_color(), "bright black");
        assert_eq!(ContainerState::Running.cli_color(), "green");
        assert_eq!(
            colored::Color::from(ContainerState::Stopped.cli_color()),
            colored::Color::BrightBlack
        );
    }
}
