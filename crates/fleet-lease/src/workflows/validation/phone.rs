/// Reformat raw keystrokes into the canonical `(NNN) NNN-NNNN` shape.
///
/// Non-digits are discarded. Up to three digits are returned untouched, up to six become
/// `(ddd) ddd`, and anything longer becomes `(ddd) ddd-dddd` with extra digits dropped. The
/// output of this function always formats to itself.
pub fn format_phone_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).take(10).collect();

    match digits.len() {
        0..=3 => digits,
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_by_digit_count() {
        assert_eq!(format_phone_number(""), "");
        assert_eq!(format_phone_number("555"), "555");
        assert_eq!(format_phone_number("5551"), "(555) 1");
        assert_eq!(format_phone_number("555123"), "(555) 123");
        assert_eq!(format_phone_number("5551234"), "(555) 123-4");
        assert_eq!(format_phone_number("5551234567"), "(555) 123-4567");
    }

    #[test]
    fn strips_punctuation_and_truncates_to_ten_digits() {
        assert_eq!(format_phone_number("555.123.4567 ext 89"), "(555) 123-4567");
        assert_eq!(format_phone_number("+1 (555) 123"), "(155) 512-3");
        assert_eq!(format_phone_number("abc"), "");
    }

    #[test]
    fn formatting_is_idempotent_for_every_prefix() {
        let digits = "5551234567";
        for len in 0..=digits.len() {
            let once = format_phone_number(&digits[..len]);
            let twice = format_phone_number(&once);
            assert_eq!(once, twice, "prefix of length {len} is not stable");
        }
    }

    #[test]
    fn simulates_keystroke_entry() {
        let mut stored = String::new();
        for key in "5551234567".chars() {
            stored.push(key);
            stored = format_phone_number(&stored);
        }
        assert_eq!(stored, "(555) 123-4567");
    }
}
