//! World tags: named, optionally expiring flags that gate event weights.
//!
//! Tags are keyed case-insensitively (trimmed, lowercased). A remaining
//! duration of [`PERMANENT`] keeps the tag until it is removed explicitly.

use std::collections::BTreeMap;

use electorate_types::WorldTagRecord;

/// Remaining-turns marker for a tag that never expires.
pub const PERMANENT: i32 = -1;

/// Active world tags and their remaining durations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldTagManager {
    tags: BTreeMap<String, i32>,
}

impl WorldTagManager {
    /// No tags.
    pub const fn new() -> Self {
        Self { tags: BTreeMap::new() }
    }

    /// Set `tag` for `duration_turns` turns; a non-positive duration makes
    /// it permanent. An already-permanent tag is left alone, otherwise the
    /// longer of the two durations wins.
    pub fn set_tag(&mut self, tag: &str, duration_turns: i32) {
        let Some(key) = normalize_tag(tag) else {
            return;
        };
        let duration = if duration_turns <= 0 { PERMANENT } else { duration_turns };
        match self.tags.get_mut(&key) {
            Some(existing) if *existing == PERMANENT => {}
            Some(existing) => {
                *existing = if duration == PERMANENT {
                    PERMANENT
                } else {
                    (*existing).max(duration)
                };
            }
            None => {
                self.tags.insert(key, duration);
            }
        }
    }

    /// Remove `tag` if present.
    pub fn remove_tag(&mut self, tag: &str) {
        if let Some(key) = normalize_tag(tag) {
            self.tags.remove(&key);
        }
    }

    /// Whether `tag` is active.
    pub fn has_tag(&self, tag: &str) -> bool {
        normalize_tag(tag).is_some_and(|key| self.tags.contains_key(&key))
    }

    /// Remaining turns of `tag`: [`PERMANENT`] for permanent tags, 0 when
    /// absent.
    pub fn remaining_turns(&self, tag: &str) -> i32 {
        normalize_tag(tag)
            .and_then(|key| self.tags.get(&key).copied())
            .unwrap_or(0)
    }

    /// Decrement every finite tag and drop the ones that expire.
    pub fn advance_turn(&mut self) {
        self.tags.retain(|_, remaining| {
            if *remaining == PERMANENT {
                return true;
            }
            *remaining = remaining.saturating_sub(1);
            *remaining > 0
        });
    }

    /// Remove every tag.
    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Active tags in sorted order.
    pub fn active_tags(&self) -> impl Iterator<Item = (&str, i32)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of active tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether no tag is active.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Persistent form, in sorted order.
    pub fn export(&self) -> Vec<WorldTagRecord> {
        self.active_tags()
            .map(|(tag, remaining_turns)| WorldTagRecord {
                tag: tag.to_owned(),
                remaining_turns,
            })
            .collect()
    }

    /// Replace every tag from records, skipping blank names.
    pub fn import(&mut self, records: &[WorldTagRecord]) {
        self.tags.clear();
        for record in records {
            if let Some(key) = normalize_tag(&record.tag) {
                let remaining = if record.remaining_turns <= 0 {
                    PERMANENT
                } else {
                    record.remaining_turns
                };
                self.tags.insert(key, remaining);
            }
        }
    }
}

/// Trimmed lowercase key, or `None` for a blank tag.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Tag mirrored while a policy is active: `policy_{name}_active` with the
/// name lowercased and spaces replaced by underscores.
pub fn policy_active_tag(policy_name: &str) -> String {
    let trimmed = policy_name.trim();
    if trimmed.is_empty() {
        return String::from("policy_unknown_active");
    }
    format!("policy_{}_active", trimmed.to_lowercase().replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_case_insensitive() {
        let mut tags = WorldTagManager::new();
        tags.set_tag("  Market_Panic ", 2);
        assert!(tags.has_tag("market_panic"));
        assert!(tags.has_tag("MARKET_PANIC"));
        assert_eq!(tags.remaining_turns("Market_Panic"), 2);
        tags.set_tag("   ", 4);
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn non_positive_duration_is_permanent_and_sticky() {
        let mut tags = WorldTagManager::new();
        tags.set_tag("curfew", 0);
        assert_eq!(tags.remaining_turns("curfew"), PERMANENT);
        tags.set_tag("curfew", 5);
        assert_eq!(tags.remaining_turns("curfew"), PERMANENT);
        for _ in 0..10 {
            tags.advance_turn();
        }
        assert!(tags.has_tag("curfew"));
    }

    #[test]
    fn longer_duration_wins() {
        let mut tags = WorldTagManager::new();
        tags.set_tag("boom", 3);
        tags.set_tag("boom", 1);
        assert_eq!(tags.remaining_turns("boom"), 3);
        tags.set_tag("boom", 6);
        assert_eq!(tags.remaining_turns("boom"), 6);
    }

    #[test]
    fn finite_tags_expire() {
        let mut tags = WorldTagManager::new();
        tags.set_tag("scandal", 2);
        tags.advance_turn();
        assert_eq!(tags.remaining_turns("scandal"), 1);
        tags.advance_turn();
        assert!(!tags.has_tag("scandal"));
        assert_eq!(tags.remaining_turns("scandal"), 0);
    }

    #[test]
    fn import_replaces_and_skips_blank() {
        let mut tags = WorldTagManager::new();
        tags.set_tag("old", 3);
        tags.import(&[
            WorldTagRecord {
                tag: String::from("Border_Alert"),
                remaining_turns: 4,
            },
            WorldTagRecord {
                tag: String::from(" "),
                remaining_turns: 4,
            },
        ]);
        assert!(!tags.has_tag("old"));
        assert_eq!(tags.export().len(), 1);
        assert_eq!(tags.remaining_turns("border_alert"), 4);
    }

    #[test]
    fn policy_tag_names() {
        assert_eq!(policy_active_tag(" Open Borders "), "policy_open_borders_active");
        assert_eq!(policy_active_tag(""), "policy_unknown_active");
    }
}
