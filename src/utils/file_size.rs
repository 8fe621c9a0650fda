const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Label shown next to the attached file name.
pub fn human_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    match unit {
        0 => format!("{} {}", bytes, UNITS[0]),
        _ => format!("{:.1} {}", value, UNITS[unit]),
    }
}
