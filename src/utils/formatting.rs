use std::time::Duration;

/// Human-readable elapsed time: `850ms`, `12.4s`, `3m 7s`, `1h 12m`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    match ms {
        0..=999 => format!("{}ms", ms),
        1_000..=59_999 => format!("{:.1}s", elapsed.as_secs_f64()),
        60_000..=3_599_999 => format!("{}m {}s", ms / 60_000, (ms % 60_000) / 1000),
        _ => format!("{}h {}m", ms / 3_600_000, (ms % 3_600_000) / 60_000),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(850)), "850ms");
        assert_eq!(format_elapsed(Duration::from_millis(12_400)), "12.4s");
        assert_eq!(format_elapsed(Duration::from_secs(187)), "3m 7s");
        assert_eq!(format_elapsed(Duration::from_secs(4_320)), "1h 12m");
    }
}
