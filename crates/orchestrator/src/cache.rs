//! Canned replies keyed by trigger phrases.

use chrono::{Local, Timelike};
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::knowledge::SalesResponses;

/// Token replaced with a time-of-day greeting.
pub const GREETING_PLACEHOLDER: &str = "DYNAMIC_GREETING";

/// Greeting for a local hour (0-23).
pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        5..=11 => "בוקר טוב",
        12..=16 => "צהריים טובים",
        17..=20 => "ערב טוב",
        _ => "לילה טוב",
    }
}

/// Trigger phrase to reply template, in first-registration order.
///
/// Built once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    patterns: IndexMap<String, String>,
}

impl ResponseCache {
    /// Build from `sales_responses` categories.
    ///
    /// Each `pattern` is split on `|` into lowercase triggers. A trigger seen
    /// again keeps its position but takes the later template.
    pub fn build(responses: &SalesResponses) -> Self {
        let mut patterns = IndexMap::new();

        for entries in responses.values() {
            for entry in entries {
                let (Some(pattern), Some(response)) = (&entry.pattern, &entry.response) else {
                    continue;
                };

                for trigger in pattern.split('|') {
                    let trigger = trigger.trim().to_lowercase();
                    if trigger.is_empty() {
                        continue;
                    }
                    patterns.insert(trigger, response.clone());
                }
            }
        }

        info!("Response cache loaded with {} triggers", patterns.len());
        Self { patterns }
    }

    /// Look up a reply using the current local hour.
    pub fn lookup(&self, message: &str) -> Option<String> {
        self.lookup_at(message, Local::now().hour())
    }

    /// Look up a reply for an explicit hour.
    pub fn lookup_at(&self, message: &str, hour: u32) -> Option<String> {
        let message = message.to_lowercase();

        let (trigger, template) = self
            .patterns
            .iter()
            .find(|(trigger, _)| message.contains(trigger.as_str()))?;

        debug!("Cache hit on trigger '{}'", trigger);
        Some(template.replace(GREETING_PLACEHOLDER, greeting_for_hour(hour)))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Registered triggers in lookup order.
    pub fn triggers(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::SalesResponseEntry;

    fn responses(categories: &[(&str, Vec<SalesResponseEntry>)]) -> SalesResponses {
        categories
            .iter()
            .map(|(name, entries)| (name.to_string(), entries.clone()))
            .collect()
    }

    #[test]
    fn test_build_splits_and_lowercases() {
        let cache = ResponseCache::build(&responses(&[(
            "greetings",
            vec![SalesResponseEntry::new("Hello|שלום| Hi ", "DYNAMIC_GREETING, how can I help?")],
        )]));

        let triggers: Vec<&str> = cache.triggers().collect();
        assert_eq!(triggers, vec!["hello", "שלום", "hi"]);
    }

    #[test]
    fn test_every_trigger_matches_any_case() {
        let cache = ResponseCache::build(&responses(&[(
            "greetings",
            vec![SalesResponseEntry::new("good day|מה נשמע", "DYNAMIC_GREETING!")],
        )]));

        for hour in 0..24 {
            for message in ["Well GOOD DAY to you", "היי, מה נשמע?"] {
                let reply = cache.lookup_at(message, hour).unwrap();
                assert_eq!(reply, format!("{}!", greeting_for_hour(hour)));
            }
        }
    }

    #[test]
    fn test_greeting_bands() {
        assert_eq!(greeting_for_hour(4), "לילה טוב");
        assert_eq!(greeting_for_hour(5), "בוקר טוב");
        assert_eq!(greeting_for_hour(11), "בוקר טוב");
        assert_eq!(greeting_for_hour(12), "צהריים טובים");
        assert_eq!(greeting_for_hour(16), "צהריים טובים");
        assert_eq!(greeting_for_hour(17), "ערב טוב");
        assert_eq!(greeting_for_hour(20), "ערב טוב");
        assert_eq!(greeting_for_hour(21), "לילה טוב");
        assert_eq!(greeting_for_hour(0), "לילה טוב");
    }

    #[test]
    fn test_collision_last_write_wins_first_position() {
        let cache = ResponseCache::build(&responses(&[
            ("a", vec![SalesResponseEntry::new("price|meeting", "first")]),
            ("b", vec![SalesResponseEntry::new("fee", "fee reply")]),
            ("c", vec![SalesResponseEntry::new("price", "second")]),
        ]));

        let triggers: Vec<&str> = cache.triggers().collect();
        assert_eq!(triggers, vec!["price", "meeting", "fee"]);
        assert_eq!(cache.lookup_at("price?", 10).as_deref(), Some("second"));
        // "price" is still tested before "fee".
        assert_eq!(cache.lookup_at("fee and price", 10).as_deref(), Some("second"));
    }

    #[test]
    fn test_incomplete_and_empty_entries_skipped() {
        let cache = ResponseCache::build(&responses(&[(
            "misc",
            vec![
                SalesResponseEntry {
                    pattern: Some("orphan".to_string()),
                    response: None,
                },
                SalesResponseEntry::new("||", "matches everything"),
            ],
        )]));

        assert!(cache.is_empty());
        assert_eq!(cache.lookup_at("anything at all", 9), None);
    }

    #[test]
    fn test_miss_returns_none() {
        let cache = ResponseCache::build(&responses(&[(
            "x",
            vec![SalesResponseEntry::new("meeting", "let's meet")],
        )]));
        assert_eq!(cache.lookup("what is the weather"), None);
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let cache = ResponseCache::build(&responses(&[(
            "x",
            vec![SalesResponseEntry::new("hello", "DYNAMIC_GREETING, welcome")],
        )]));
        let first = cache.lookup("hello there");
        let second = cache.lookup("hello there");
        assert!(first.is_some());
        assert_eq!(first, second);
    }
}
