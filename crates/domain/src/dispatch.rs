//! Dispatch encoder — turns a resolved record and an action into an
//! outbound control message.

use serde::{Deserialize, Serialize};

use crate::command::Action;
use crate::config::RelayConfig;
use crate::time::Timestamp;

/// Fixed destination topic shared by all devices. Addressing happens via the
/// `mac` inside the payload, not via the topic.
pub const CONTROL_TOPIC: &str = "modular";

/// Protocol tag carried by every control message.
pub const PROTOCOL_TYPE: &str = "Modular";

/// Operation tag: the only operation this system dispatches.
pub const FUNCTION_WRITE: &str = "write";

/// Pin/level pair written to the target unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinValue {
    pub pin: u8,
    pub data: u8,
}

/// Outbound relay control message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMessage {
    /// Link-layer identifier of the target unit — the addressing key.
    pub mac: String,
    pub protocol_type: String,
    /// Part number of the target unit.
    pub device: String,
    pub function: String,
    pub value: PinValue,
    pub address: u16,
    pub device_bus: u8,
    #[serde(rename = "Timestamp")]
    pub timestamp: Timestamp,
}

/// Encode a control message for `record` performing `action` at `at`.
///
/// Pure — publishing is the caller's concern, as is treating a publish
/// failure as a dispatch failure. No pin-range validation happens here;
/// that is enforced when the record is created.
#[must_use]
pub fn encode(record: &RelayConfig, action: Action, at: Timestamp) -> ControlMessage {
    ControlMessage {
        mac: record.mac.clone(),
        protocol_type: PROTOCOL_TYPE.to_string(),
        device: record.part_number.clone(),
        function: FUNCTION_WRITE.to_string(),
        value: PinValue {
            pin: record.pin,
            data: action.level(),
        },
        address: record.address,
        device_bus: record.device_bus,
        timestamp: at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    fn meeting_room_record() -> RelayConfig {
        RelayConfig::builder()
            .object_name("lampu utama ruangan meeting")
            .mac("70:f7:54:cb:7a:93")
            .part_number("RELAYMINI")
            .pin(1)
            .address(37)
            .device_bus(0)
            .build()
            .unwrap()
    }

    #[test]
    fn should_encode_on_as_level_one() {
        let message = encode(&meeting_room_record(), Action::On, now());
        assert_eq!(message.mac, "70:f7:54:cb:7a:93");
        assert_eq!(message.protocol_type, "Modular");
        assert_eq!(message.device, "RELAYMINI");
        assert_eq!(message.function, "write");
        assert_eq!(message.value, PinValue { pin: 1, data: 1 });
        assert_eq!(message.address, 37);
        assert_eq!(message.device_bus, 0);
    }

    #[test]
    fn should_encode_off_as_level_zero() {
        let message = encode(&meeting_room_record(), Action::Off, now());
        assert_eq!(message.value.data, 0);
    }

    #[test]
    fn should_encode_toggle_as_level_one() {
        let message = encode(&meeting_room_record(), Action::Toggle, now());
        assert_eq!(message.value.data, 1);
    }

    #[test]
    fn should_serialize_with_capitalised_timestamp_key() {
        let message = encode(&meeting_room_record(), Action::On, now());
        let json = serde_json::to_value(&message).unwrap();
        assert!(json.get("Timestamp").is_some());
        assert_eq!(json["value"]["pin"], 1);
        assert_eq!(json["value"]["data"], 1);
    }
}
