//! Command interpreter — turns free-form text into an action and an object
//! phrase.
//!
//! The interpreter is a deliberate two-pass, differently-ordered scan over
//! one vocabulary table:
//!
//! 1. **Action detection** walks the table in *declaration order* and takes
//!    the action of the first phrase that occurs anywhere in the text.
//! 2. **Object extraction** re-scans the phrases sorted by *length,
//!    descending* (stable, so declaration order breaks length ties), strips
//!    exactly one occurrence of the first phrase found, and returns the
//!    whitespace-collapsed remainder.
//!
//! The two passes must not be unified: when several phrases co-occur, the
//! first pass decides the verb's *meaning* by declaration order while the
//! second decides which characters get *removed* by specificity. Collapsing
//! them into one loop silently changes that tie-break.

use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// Relay action requested by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    On,
    Off,
    Toggle,
}

impl Action {
    /// Binary level written to the relay pin.
    ///
    /// `Toggle` dispatches 1: the encoder never inspects current pin state,
    /// so toggle is currently an alias for on.
    #[must_use]
    pub fn level(self) -> u8 {
        match self {
            Self::On | Self::Toggle => 1,
            Self::Off => 0,
        }
    }
}

/// Phrase table in declaration order. Ordering is part of the observable
/// contract: when two phrases both occur in a text, the earlier entry wins
/// the action scan regardless of length.
const VOCABULARY: &[(&str, Action)] = &[
    // Indonesian
    ("nyalakan", Action::On),
    ("hidupkan", Action::On),
    ("aktifkan", Action::On),
    ("on", Action::On),
    ("mati", Action::Off),
    ("matikan", Action::Off),
    ("padamkan", Action::Off),
    ("off", Action::Off),
    ("toggle", Action::Toggle),
    ("ubah", Action::Toggle),
    ("ganti", Action::Toggle),
    // English
    ("turn on", Action::On),
    ("turn off", Action::Off),
    ("switch on", Action::On),
    ("switch off", Action::Off),
    ("power on", Action::On),
    ("power off", Action::Off),
];

/// A successfully interpreted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// The detected action.
    pub action: Action,
    /// What remains of the text once the extraction phrase is removed —
    /// fed to the resolver as the lookup key.
    pub object_phrase: String,
}

/// Interpret raw command text.
///
/// Lower-cases internally; callers need not normalise.
///
/// # Errors
///
/// Returns [`CommandError::NoAction`] when no vocabulary phrase occurs in
/// the text, and [`CommandError::NoObject`] when stripping the extraction
/// phrase leaves nothing behind.
pub fn interpret(text: &str) -> Result<Command, CommandError> {
    let lowered = text.to_lowercase();

    // Pass 1: action by declaration order.
    let action = VOCABULARY
        .iter()
        .find(|(phrase, _)| lowered.contains(phrase))
        .map(|(_, action)| *action)
        .ok_or(CommandError::NoAction)?;

    // Pass 2: extraction by phrase length, longest first. The sort is
    // stable, so equal-length phrases keep their declaration order.
    let mut by_length: Vec<&str> = VOCABULARY.iter().map(|(phrase, _)| *phrase).collect();
    by_length.sort_by_key(|phrase| std::cmp::Reverse(phrase.len()));

    let stripped = by_length
        .iter()
        .find(|phrase| lowered.contains(*phrase))
        .map(|phrase| lowered.replacen(phrase, "", 1))
        .ok_or(CommandError::NoObject)?;

    let object_phrase = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if object_phrase.is_empty() {
        return Err(CommandError::NoObject);
    }

    Ok(Command {
        action,
        object_phrase,
    })
}
