//! Setting value validation.

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "CONNECTIVITY_PROBE_ADDR" => validate_host_port(value)?,
        "CONNECTIVITY_PROBE_INTERVAL_SECS" => validate_int_range(value, 1, 3600)?,
        "CONNECTIVITY_PROBE_TIMEOUT_MS" => validate_int_range(value, 100, 30_000)?,
        "EVENT_BUS_CAPACITY" => validate_int_range(value, 16, 65_536)?,
        "CONNECTIVITY_INDETERMINATE_POLICY" => {
            if value != "usable" && value != "unusable" {
                return Err("must be 'usable' or 'unusable'".into());
            }
        }
        "OVERLAY_BACKEND" => {
            if value != "events" && value != "none" {
                return Err("must be 'events' or 'none'".into());
            }
        }
        "NOTIFICATION_PLATFORM" => {
            if value != "unrestricted" {
                return Err("must be 'unrestricted'".into());
            }
        }
        // Boolean settings
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn validate_host_port(value: &str) -> Result<(), String> {
    let (host, port) = value
        .rsplit_once(':')
        .ok_or("must be in host:port form")?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err("host must not be empty".into());
    }
    match port.parse::<u16>() {
        Ok(0) | Err(_) => Err("port must be between 1 and 65535".into()),
        Ok(_) => Ok(()),
    }
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(
        key,
        "CONNECTIVITY_PROBE_REACHABILITY" | "OVERLAY_PERMISSION_GRANTED"
    )
}
