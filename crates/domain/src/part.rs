//! Relay part catalogue — channel counts per supported part number.

/// Supported relay parts and their channel counts.
const PARTS: &[(&str, u8)] = &[("RELAYMINI", 6), ("RELAY", 8)];

/// Number of relay channels for a known part number, case-insensitive.
///
/// Returns `None` for parts not in the catalogue; pin-range validation is
/// skipped for those.
#[must_use]
pub fn channel_count(part_number: &str) -> Option<u8> {
    let upper = part_number.to_uppercase();
    PARTS
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, count)| *count)
}

/// Pin labels (`PIN1` … `PINn`) offered to the configuration front end.
#[must_use]
pub fn pin_labels(part_number: &str) -> Vec<String> {
    channel_count(part_number)
        .map(|count| (1..=count).map(|pin| format!("PIN{pin}")).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_know_relaymini_has_six_channels() {
        assert_eq!(channel_count("RELAYMINI"), Some(6));
    }

    #[test]
    fn should_match_part_number_case_insensitively() {
        assert_eq!(channel_count("relay"), Some(8));
    }

    #[test]
    fn should_return_none_for_unknown_part() {
        assert_eq!(channel_count("DIMMER"), None);
    }

    #[test]
    fn should_list_pin_labels_in_order() {
        let pins = pin_labels("RELAYMINI");
        assert_eq!(pins.len(), 6);
        assert_eq!(pins[0], "PIN1");
        assert_eq!(pins[5], "PIN6");
    }

    #[test]
    fn should_list_no_pins_for_unknown_part() {
        assert!(pin_labels("DIMMER").is_empty());
    }
}
