//! JSON store error types.

use voicerelay_domain::error::VoiceRelayError;

/// Errors specific to the JSON file store.
#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    /// Reading or writing the backing file failed.
    #[error("config file I/O failed")]
    Io(#[from] std::io::Error),

    /// The backing file is not valid JSON in a known layout.
    #[error("config file is malformed")]
    Malformed(#[from] serde_json::Error),
}

impl From<JsonStoreError> for VoiceRelayError {
    fn from(err: JsonStoreError) -> Self {
        Self::Storage(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_into_storage_error() {
        let err = JsonStoreError::Io(std::io::Error::other("boom"));
        let top: VoiceRelayError = err.into();
        assert!(matches!(top, VoiceRelayError::Storage(_)));
    }

    #[test]
    fn should_display_malformed_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let err = JsonStoreError::Malformed(json_err);
        assert_eq!(err.to_string(), "config file is malformed");
    }
}
