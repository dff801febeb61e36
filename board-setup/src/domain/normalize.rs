//! Canonical forms for raw form input.

/// Normalize a home station code: trim surrounding whitespace, uppercase.
///
/// ```
/// use board_setup::domain::normalize_station;
///
/// assert_eq!(normalize_station(" wat "), "WAT");
/// ```
pub fn normalize_station(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Normalize the optional comma-separated destination field.
///
/// Present and non-blank input has all whitespace removed and is
/// uppercased. Absent or blank input becomes the empty string.
///
/// ```
/// use board_setup::domain::normalize_destinations;
///
/// assert_eq!(normalize_destinations(Some("chk, vic ")), "CHK,VIC");
/// assert_eq!(normalize_destinations(None), "");
/// ```
pub fn normalize_destinations(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase(),
        _ => String::new(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Padding and case never survive station normalization
        #[test]
        fn station_is_trimmed_uppercase(
            code in "[a-zA-Z]{3}",
            left in "[ \t]{0,3}",
            right in "[ \t]{0,3}",
        ) {
            let raw = format!("{left}{code}{right}");
            prop_assert_eq!(normalize_station(&raw), code.to_uppercase());
        }

        /// Normalizing twice is the same as normalizing once
        #[test]
        fn destinations_idempotent(raw in "[a-zA-Z, ]{0,20}") {
            let once = normalize_destinations(Some(&raw));
            let twice = normalize_destinations(Some(&once));
            prop_assert_eq!(once, twice);
        }

        /// No whitespace or lowercase letters remain in destinations
        #[test]
        fn destinations_have_no_whitespace(raw in "[a-z, \t]{0,20}") {
            let out = normalize_destinations(Some(&raw));
            prop_assert!(!out.chars().any(|c| c.is_whitespace() || c.is_ascii_lowercase()));
        }
    }
}
