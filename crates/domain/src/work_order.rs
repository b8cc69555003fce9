//! Work order numbers: `WO-<year>-<sequence>`, sequence zero-padded to four digits

pub const WORK_ORDER_PREFIX: &str = "WO";

pub fn format_work_order(year: i32, sequence: u32) -> String {
    format!("{}-{}-{:04}", WORK_ORDER_PREFIX, year, sequence)
}

/// Split a work order number into `(year, sequence)`
pub fn parse_work_order(value: &str) -> Option<(i32, u32)> {
    let mut parts = value.splitn(3, '-');
    if parts.next()? != WORK_ORDER_PREFIX {
        return None;
    }
    let year = parts.next()?.parse().ok()?;
    let sequence = parts.next()?;
    if sequence.len() < 4 || !sequence.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((year, sequence.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_sequence() {
        assert_eq!(format_work_order(2025, 1), "WO-2025-0001");
        assert_eq!(format_work_order(2025, 42), "WO-2025-0042");
        assert_eq!(format_work_order(2025, 12345), "WO-2025-12345");
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse_work_order("WO-2025-0007"), Some((2025, 7)));
        assert_eq!(parse_work_order("WO-2025-12345"), Some((2025, 12345)));
        assert_eq!(parse_work_order("WO-2025-7"), None);
        assert_eq!(parse_work_order("XX-2025-0007"), None);
        assert_eq!(parse_work_order("WO-2025"), None);
    }
}
