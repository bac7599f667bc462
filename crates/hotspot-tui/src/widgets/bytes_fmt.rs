//! Cell formatting for the clients table.

const KIB: f64 = 1024.0;

/// Byte counts in 1024 steps: `512 B`, `1.5 KB`, `20.0 MB`, `1.25 GB`.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let kb = bytes as f64 / KIB;
    if kb < KIB {
        return format!("{kb:.1} KB");
    }
    let mb = kb / KIB;
    if mb < KIB {
        return format!("{mb:.1} MB");
    }
    format!("{:.2} GB", mb / KIB)
}

/// Connected time: `42s`, `5m 3s`, `2h 15m`.
pub fn fmt_duration(secs: u64) -> String {
    if secs < 60 {
        return format!("{secs}s");
    }
    let minutes = secs / 60;
    if minutes < 60 {
        return format!("{minutes}m {}s", secs % 60);
    }
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// `↓rx ↑tx`. A missing side reads `0 B` when the other is known; with
/// neither known the cell is empty.
pub fn fmt_traffic(rx: Option<u64>, tx: Option<u64>) -> String {
    if rx.is_none() && tx.is_none() {
        return String::new();
    }
    let side = |v: Option<u64>| fmt_bytes(v.unwrap_or(0));
    format!("↓{} ↑{}", side(rx), side(tx))
}

/// `-52 dBm`. Zero means the driver did not report a level.
pub fn fmt_signal(dbm: Option<i32>) -> String {
    match dbm {
        Some(n) if n != 0 => format!("{n} dBm"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn bytes_step_by_1024() {
        assert_eq!(fmt_bytes(0), "0 B");
        assert_eq!(fmt_bytes(1023), "1023 B");
        assert_eq!(fmt_bytes(1536), "1.5 KB");
        assert_eq!(fmt_bytes(20 * 1024 * 1024), "20.0 MB");
        assert_eq!(fmt_bytes(1_342_177_280), "1.25 GB");
    }

    #[test]
    fn durations() {
        assert_eq!(fmt_duration(0), "0s");
        assert_eq!(fmt_duration(59), "59s");
        assert_eq!(fmt_duration(303), "5m 3s");
        assert_eq!(fmt_duration(3600), "1h 0m");
        assert_eq!(fmt_duration(8100), "2h 15m");
    }

    #[test]
    fn traffic_fills_missing_side() {
        assert_eq!(fmt_traffic(None, None), "");
        assert_eq!(fmt_traffic(Some(2048), None), "↓2.0 KB ↑0 B");
        assert_eq!(fmt_traffic(None, Some(10)), "↓0 B ↑10 B");
    }

    #[test]
    fn signal() {
        assert_eq!(fmt_signal(Some(-52)), "-52 dBm");
        assert_eq!(fmt_signal(Some(0)), "");
        assert_eq!(fmt_signal(None), "");
    }
}
