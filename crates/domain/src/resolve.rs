//! Configuration resolver — ambiguous partial-match lookup of records.
//!
//! Two distinct lookup modes, chosen explicitly by the caller:
//!
//! - [`resolve`] — the dispatch pipeline's primary mode, matching only
//!   `object_name`.
//! - [`resolve_any_name`] — device-management mode, matching `device_name`,
//!   `object_name`, or `description`.
//!
//! Both are two-tier: exact equality wins outright, otherwise the first
//! record (store order) containing the phrase as a substring. There is no
//! fuzzy matching.

use crate::config::RelayConfig;

/// Resolve an object phrase against `object_name` only.
///
/// Case-insensitive and whitespace-trimmed. Exact matches beat substring
/// matches; ties go to the first record in store order.
#[must_use]
pub fn resolve<'a>(phrase: &str, records: &'a [RelayConfig]) -> Option<&'a RelayConfig> {
    let needle = phrase.trim().to_lowercase();

    records
        .iter()
        .find(|record| record.object_name.to_lowercase() == needle)
        .or_else(|| {
            records
                .iter()
                .find(|record| record.object_name.to_lowercase().contains(&needle))
        })
}

/// Resolve a name against `device_name`, `object_name`, or `description`.
///
/// The exact tier compares `device_name` and `object_name`; the substring
/// tier additionally searches `description`. Same ordering rule as
/// [`resolve`]. This is a separate operation for device-management flows,
/// not a fallback of the primary mode.
#[must_use]
pub fn resolve_any_name<'a>(name: &str, records: &'a [RelayConfig]) -> Option<&'a RelayConfig> {
    let needle = name.trim().to_lowercase();

    records
        .iter()
        .find(|record| {
            record.device_name.to_lowercase() == needle
                || record.object_name.to_lowercase() == needle
        })
        .or_else(|| {
            records.iter().find(|record| {
                record.device_name.to_lowercase().contains(&needle)
                    || record.object_name.to_lowercase().contains(&needle)
                    || record.description.to_lowercase().contains(&needle)
            })
        })
}
