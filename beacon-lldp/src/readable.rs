//! Human readable link speeds for the Port Description TLV

const UNITS: [&str; 9] = ["b", "K", "M", "G", "T", "P", "E", "Z", "Y"];

/// Format a bit rate with decimal prefixes and four significant digits
///
/// `1_000_000_000` becomes `"1G"`, `866_700_000` becomes `"866.7M"`.
pub fn readable_size(bits_per_second: u64) -> String {
    let mut size = bits_per_second as f64;
    let mut unit = 0;

    while size >= 1000.0 && unit < UNITS.len() - 1 {
        size /= 1000.0;
        unit += 1;
    }

    format!("{}{}", significant(size, 4), UNITS[unit])
}

/// Round to `digits` significant digits, dropping trailing zeros
fn significant(value: f64, digits: i32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    let formatted = format!("{:.*}", decimals, value);

    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}
