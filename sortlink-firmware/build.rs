//! Build script for sortlink-firmware
//!
//! Validates node.toml at compile time so a broken configuration never
//! reaches a board (the runtime parser would silently fall back to defaults).

use std::fs;
use std::path::Path;

/// Keys allowed per section, with the integer range each must fall in
const LINK_INTS: &[(&str, i64, i64)] = &[
    ("service_uuid", 0, 0xFFFF),
    ("property_uuid", 0, 0xFFFF),
    ("announce_handle", 0, 0xFF),
    ("announce_interval", 0x20, 0xFFFF),
    ("mtu", 23, 0xFFFF),
    ("connect_retry_ms", 1, 600_000),
    ("rescan_delay_ms", 1, 600_000),
    ("first_push_delay_ms", 0, 600_000),
];

const PUSH_INTS: &[(&str, i64, i64)] = &[("interval_ms", 1, 600_000)];

const BRIDGE_INTS: &[(&str, i64, i64)] = &[
    ("udp_port", 1, 0xFFFF),
    ("uart_baud", 1200, 4_000_000),
    ("poll_interval_ms", 1, 1000),
    ("display_refresh_ms", 1, 60_000),
];

fn main() {
    validate_config();
}

/// Validate node.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=node.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("node.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read node.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in node.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_section(&config, "push", PUSH_INTS, &mut errors);
    validate_section(&config, "bridge", BRIDGE_INTS, &mut errors);
    validate_section(&config, "link", LINK_INTS, &mut errors);
    validate_link_extras(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in node.toml                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=node.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check integer keys of one section; absent sections and keys are fine
fn validate_section(
    config: &toml::Value,
    section: &str,
    ints: &[(&str, i64, i64)],
    errors: &mut Vec<String>,
) {
    let table = match config.get(section) {
        None => return,
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push(format!("[{}] must be a table", section));
            return;
        }
    };

    for (key, value) in table {
        let Some(&(_, min, max)) = ints.iter().find(|(name, _, _)| *name == key.as_str()) else {
            if section != "link" {
                errors.push(format!("[{}] unknown key '{}'", section, key));
            }
            continue;
        };
        match value {
            toml::Value::Integer(n) if (min..=max).contains(n) => {}
            toml::Value::Integer(_) => {
                errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            }
            _ => errors.push(format!("[{}] {} must be an integer", section, key)),
        }
    }
}

/// Link keys that are not plain integers
fn validate_link_extras(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(toml::Value::Table(link)) = config.get("link") else {
        return;
    };

    for key in ["server_addr", "client_addr"] {
        if let Some(value) = link.get(key) {
            let valid = matches!(value, toml::Value::Array(bytes)
                if bytes.len() == 6
                    && bytes.iter().all(|b| matches!(b, toml::Value::Integer(n) if (0..=255).contains(n))));
            if !valid {
                errors.push(format!("[link] {} must be 6 bytes", key));
            }
        }
    }

    if let Some(value) = link.get("device_name") {
        match value {
            toml::Value::String(name) if !name.is_empty() && name.len() <= 32 => {}
            _ => errors.push("[link] device_name must be 1-32 characters".to_string()),
        }
    }

    let known = LINK_INTS
        .iter()
        .map(|(name, _, _)| *name)
        .chain(["server_addr", "client_addr", "device_name"]);
    let known: Vec<&str> = known.collect();
    for key in link.keys() {
        if !known.contains(&key.as_str()) {
            errors.push(format!("[link] unknown key '{}'", key));
        }
    }

    if let (Some(service), Some(property)) = (link.get("service_uuid"), link.get("property_uuid")) {
        if service == property {
            errors.push("[link] service_uuid and property_uuid must differ".to_string());
        }
    }
}
