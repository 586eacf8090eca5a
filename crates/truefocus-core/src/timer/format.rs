//! Clock display formatting.

/// Format seconds as zero-padded `HH:MM:SS`.
///
/// Fractional seconds are floored; negative values render by magnitude.
pub fn format_hms(secs: f64) -> String {
    let total = secs.abs().floor() as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// `H:MM:SS` without padding the hour, used in stats tables.
pub fn format_hms_compact(secs: f64) -> String {
    let total = secs.abs().floor() as u64;
    format!(
        "{}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Signed `+H:MM:SS` / `-H:MM:SS`, for overrun display.
pub fn format_signed_hms(secs: f64) -> String {
    let sign = if secs < 0.0 { "-" } else { "+" };
    format!("{sign}{}", format_hms_compact(secs))
}
