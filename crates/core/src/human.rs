/// Formats a value with thousands separators, keeping up to two decimals.
pub fn human_value(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    let int = rounded.trunc().abs() as u128;
    let mut digits = int.to_string();
    let mut i = digits.len();
    while i > 3 {
        i -= 3;
        digits.insert(i, ',');
    }
    let frac = (rounded.fract().abs() * 100.0).round() as u32;
    let sign = if rounded < 0.0 { "-" } else { "" };
    if frac == 0 {
        format!("{sign}{digits}")
    } else {
        format!("{sign}{digits}.{}", format!("{frac:02}").trim_end_matches('0'))
    }
}

/// Short form for tight spaces: `760.51M`.
pub fn compact_value(v: f64) -> String {
    let mut n = v;
    let units = ["", "K", "M", "B", "T"]; let mut u = 0;
    while n.abs() >= 1000.0 && u < units.len() - 1 { n /= 1000.0; u += 1; }
    if u == 0 { human_value(n) } else { format!("{:.2}{}", n, units[u]) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_thousands() {
        assert_eq!(human_value(760505847.0), "760,505,847");
        assert_eq!(human_value(999.0), "999");
        assert_eq!(human_value(1234.5), "1,234.5");
        assert_eq!(human_value(0.0), "0");
    }

    #[test]
    fn compacts_large_values() {
        assert_eq!(compact_value(760505847.0), "760.51M");
        assert_eq!(compact_value(20.0), "20");
        assert_eq!(compact_value(1500.0), "1.50K");
    }
}
