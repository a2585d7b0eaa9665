// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
// firmador-rut — RUT validation and formatting.
//
// A RUT is a run of decimal digits (the body) followed by a single check
// digit, which is `0`-`9` or `k`. The check digit is computed with the
// standard weighted modulo-11 scheme. All functions here are pure: the
// caller re-derives a fresh value from raw input text on every call, so an
// in-progress partial entry (single character, non-digit body) passes
// through unformatted instead of erroring.

/// Strip every character that is not a decimal digit or the letter `k`,
/// lower-casing the result.
pub fn clean(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'k' || *c == 'K')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Compute the check digit for a digit-only body.
///
/// Digits are weighted right to left with weights cycling 2,3,4,5,6,7 and
/// summed; `11 - (sum % 11)` maps to `'0'` for 11, `'k'` for 10, and the
/// decimal digit otherwise.
pub fn compute_dv(body: &str) -> char {
    let mut sum: u32 = 0;
    let mut weight: u32 = 2;
    for d in body.chars().rev() {
        sum += d.to_digit(10).unwrap_or(0) * weight;
        weight = if weight == 7 { 2 } else { weight + 1 };
    }
    match 11 - (sum % 11) {
        11 => '0',
        10 => 'k',
        r => char::from_digit(r, 10).unwrap_or('0'),
    }
}

/// Format a raw RUT for display: thousands dots in the body, a dash before
/// the check digit (e.g. `12.345.678-5`).
///
/// Inputs too short to split into body and check digit, or whose body is not
/// purely numeric, are returned cleaned but otherwise untouched — the user
/// is still typing. Re-applying `format` to its own output is a no-op.
pub fn format(raw: &str) -> String {
    let cleaned = clean(raw);
    if cleaned.len() < 2 {
        return cleaned;
    }
    let (body, dv) = cleaned.split_at(cleaned.len() - 1);
    if !body.chars().all(|c| c.is_ascii_digit()) {
        return cleaned;
    }
    let mut formatted = String::with_capacity(body.len() + body.len() / 3 + 2);
    let offset = body.len() % 3;
    for (i, c) in body.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(c);
    }
    formatted.push('-');
    formatted.push_str(dv);
    formatted
}

/// Check a raw RUT against its check digit.
///
/// Validity is a predicate, not a failure mode: too-short input and
/// non-numeric bodies simply return `false`.
pub fn validate(raw: &str) -> bool {
    let cleaned = clean(raw);
    if cleaned.len() < 2 {
        return false;
    }
    let (body, dv) = cleaned.split_at(cleaned.len() - 1);
    if !body.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    compute_dv(body) == dv.chars().next().unwrap_or('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_punctuation_and_lowercases() {
        assert_eq!(clean("12.345.678-K"), "12345678k");
        assert_eq!(clean(" 7.654.321-0 "), "76543210");
        assert_eq!(clean("abc"), "");
    }

    #[test]
    fn known_vector_12345678() {
        assert_eq!(compute_dv("12345678"), '5');
        assert_eq!(format("123456785"), "12.345.678-5");
        assert!(validate("12345678-5"));
        assert!(!validate("12345678-4"));
    }

    #[test]
    fn dv_ten_maps_to_k() {
        // Smallest body producing remainder 10: 2*1=2, sum%11 ... use a
        // brute-force pick verified by hand: body "1" -> 11-2=9; body "6"
        // gives 2*6=12, 11-1=10 -> 'k'.
        assert_eq!(compute_dv("6"), 'k');
        assert!(validate("6k"));
    }

    #[test]
    fn dv_eleven_maps_to_zero() {
        // body "45": 5*2 + 4*3 = 22, 22 % 11 = 0, 11 - 0 = 11 -> '0'.
        assert_eq!(compute_dv("45"), '0');
        assert!(validate("45-0"));
    }

    #[test]
    fn format_boundaries() {
        assert_eq!(format(""), "");
        assert_eq!(format("1"), "1");
        // Body with a stray 'k' in the middle stays unformatted.
        assert_eq!(format("1k2"), "1k2");
    }

    #[test]
    fn format_groups_of_three() {
        assert_eq!(format("15"), "1-5");
        assert_eq!(format("1234"), "123-4");
        assert_eq!(format("12345"), "1.234-5");
        assert_eq!(format("9876543k"), "9.876.543-k");
    }

    #[test]
    fn format_is_idempotent_on_known_values() {
        for raw in ["12.345.678-5", "123456785", "1", "", "76.543.210-k"] {
            assert_eq!(format(&format(raw)), format(raw));
        }
    }

    #[test]
    fn validate_too_short_is_false() {
        assert!(!validate("5"));
        assert!(!validate(""));
        assert!(!validate("k"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The check digit is always a single character in {0-9, k}.
        #[test]
        fn dv_alphabet(body in "[0-9]{1,9}") {
            let dv = compute_dv(&body);
            prop_assert!(dv == 'k' || dv.is_ascii_digit());
        }

        /// A body joined with its own check digit always validates; any
        /// other check digit never does.
        #[test]
        fn validate_iff_dv_matches(body in "[0-9]{1,9}", candidate in "[0-9k]") {
            let dv = compute_dv(&body);
            let cand = candidate.chars().next().unwrap();
            let raw = std::format!("{body}{cand}");
            prop_assert_eq!(validate(&raw), cand == dv);
        }

        /// Formatting is idempotent for arbitrary raw input.
        #[test]
        fn format_idempotent(raw in "[0-9kK .-]{0,14}") {
            let once = format(&raw);
            prop_assert_eq!(format(&once), once);
        }

        /// Formatting never gains or loses significant characters.
        #[test]
        fn clean_round_trips_through_format(body in "[0-9]{1,9}") {
            let raw = std::format!("{}{}", body, compute_dv(&body));
            prop_assert_eq!(clean(&format(&raw)), clean(&raw));
        }
    }
}
