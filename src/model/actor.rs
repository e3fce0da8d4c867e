//! Actors and identity resolution
//!
//! Evidence names the same person many ways ("John Smith", "J. Smith",
//! an email address). The registry folds those spellings onto one key.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Lowercase, trim and collapse inner whitespace
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn phone_digits(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// A uniquely identified speaker in the evidence corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Normalized name, the identity of the actor
    pub key: String,
    pub display_name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub phones: Vec<String>,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        let display_name: String = name.into();
        Self {
            key: normalize_name(&display_name),
            display_name: display_name.trim().to_string(),
            aliases: Vec::new(),
            emails: Vec::new(),
            phones: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.emails.push(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phones.push(phone.into());
        self
    }

    fn normalized_aliases(&self) -> impl Iterator<Item = String> + '_ {
        self.aliases.iter().map(|a| normalize_name(a)).filter(|a| !a.is_empty())
    }

    fn first_name(&self) -> Option<&str> {
        self.key.split(' ').next().filter(|f| f.chars().count() > 2)
    }

    /// Exact identity match on key, alias, email or phone
    pub fn matches_exactly(&self, normalized: &str) -> bool {
        if self.key == normalized || self.normalized_aliases().any(|a| a == normalized) {
            return true;
        }
        if self.emails.iter().any(|e| normalize_name(e) == normalized) {
            return true;
        }
        let digits = phone_digits(normalized);
        digits.len() >= 7 && self.phones.iter().any(|p| phone_digits(p) == digits)
    }

    /// The name contains one of this actor's registered aliases as whole words
    pub fn contains_alias(&self, normalized: &str) -> bool {
        let padded = format!(" {} ", normalized);
        self.normalized_aliases()
            .filter(|a| a.chars().count() > 2)
            .any(|a| padded.contains(&format!(" {} ", a)))
    }

    fn absorb(&mut self, other: &Actor) {
        for alias in other.aliases.iter().chain(std::iter::once(&other.display_name)) {
            if normalize_name(alias) != self.key && !self.aliases.iter().any(|a| normalize_name(a) == normalize_name(alias)) {
                self.aliases.push(alias.clone());
            }
        }
        for email in &other.emails {
            if !self.emails.contains(email) {
                self.emails.push(email.clone());
            }
        }
        for phone in &other.phones {
            if !self.phones.contains(phone) {
                self.phones.push(phone.clone());
            }
        }
    }
}

/// Resolves raw actor names to actor keys for one analysis run
#[derive(Debug, Clone, Default)]
pub struct ActorRegistry {
    /// Actors registered up front, with their identity hints
    registered: BTreeMap<String, Actor>,
    /// Actors first seen in statements
    discovered: BTreeMap<String, Actor>,
    /// Every raw spelling observed per key
    spellings: BTreeMap<String, BTreeSet<String>>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an actor with identity hints. An actor that already matches
    /// a registered one is merged into it.
    pub fn register(&mut self, actor: Actor) -> String {
        if actor.key.is_empty() {
            return String::new();
        }

        let existing = self
            .registered
            .values()
            .find(|a| a.matches_exactly(&actor.key) || actor.normalized_aliases().any(|alias| a.matches_exactly(&alias)))
            .map(|a| a.key.clone());

        match existing {
            Some(key) => {
                if let Some(target) = self.registered.get_mut(&key) {
                    target.absorb(&actor);
                }
                debug!("Merged actor '{}' into '{}'", actor.display_name, key);
                key
            }
            None => {
                let key = actor.key.clone();
                self.registered.insert(key.clone(), actor);
                key
            }
        }
    }

    /// Resolve a raw name to an actor key, creating a new actor when nothing
    /// registered matches. Only registered actors take part in alias and
    /// first-name matching, so resolution does not depend on input order.
    pub fn resolve(&mut self, raw_name: &str) -> String {
        let normalized = normalize_name(raw_name);
        let key = self.match_registered(&normalized).unwrap_or_else(|| normalized.clone());

        if !self.registered.contains_key(&key) {
            let display = raw_name.trim().to_string();
            let entry = self.discovered.entry(key.clone()).or_insert_with(|| Actor::new(display.clone()));
            // Keep the display name independent of which spelling arrived first
            if display < entry.display_name {
                entry.display_name = display;
            }
        }

        self.spellings.entry(key.clone()).or_default().insert(raw_name.trim().to_string());
        key
    }

    fn match_registered(&self, normalized: &str) -> Option<String> {
        if let Some(actor) = self.registered.values().find(|a| a.matches_exactly(normalized)) {
            return Some(actor.key.clone());
        }

        if let Some(actor) = self.registered.values().find(|a| a.contains_alias(normalized)) {
            return Some(actor.key.clone());
        }

        // A bare first name only resolves when exactly one registered actor carries it
        if !normalized.contains(' ') && normalized.chars().count() > 2 {
            let candidates: Vec<&Actor> = self
                .registered
                .values()
                .filter(|a| a.first_name() == Some(normalized))
                .collect();
            if candidates.len() == 1 {
                return Some(candidates[0].key.clone());
            }
        }

        None
    }

    pub fn get(&self, key: &str) -> Option<&Actor> {
        self.registered.get(key).or_else(|| self.discovered.get(key))
    }

    pub fn display_name(&self, key: &str) -> String {
        self.get(key).map(|a| a.display_name.clone()).unwrap_or_else(|| key.to_string())
    }

    /// Raw spellings that resolved to `key`, sorted
    pub fn spellings(&self, key: &str) -> Vec<String> {
        self.spellings.get(key).map(|s| s.iter().cloned().collect()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.registered.len() + self.discovered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.registered.clear();
        self.discovered.clear();
        self.spellings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  John   SMITH "), "john smith");
    }

    #[test]
    fn test_alias_resolution() {
        let mut registry = ActorRegistry::new();
        registry.register(Actor::new("John Smith").with_alias("J. Smith"));

        assert_eq!(registry.resolve("John Smith"), "john smith");
        assert_eq!(registry.resolve("j. smith"), "john smith");
        assert_eq!(registry.resolve("J. Smith (CEO)"), "john smith");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_email_and_phone_resolution() {
        let mut registry = ActorRegistry::new();
        registry.register(
            Actor::new("Jane Doe")
                .with_email("jane@example.com")
                .with_phone("+1 (555) 123-4567"),
        );

        assert_eq!(registry.resolve("JANE@example.com"), "jane doe");
        assert_eq!(registry.resolve("15551234567"), "jane doe");
    }

    #[test]
    fn test_first_name_requires_unique_match() {
        let mut registry = ActorRegistry::new();
        registry.register(Actor::new("Maria Lopez"));
        assert_eq!(registry.resolve("Maria"), "maria lopez");

        registry.register(Actor::new("Maria Chen"));
        assert_eq!(registry.resolve("Maria"), "maria");
    }

    #[test]
    fn test_short_first_name_does_not_match() {
        let mut registry = ActorRegistry::new();
        registry.register(Actor::new("Al Jones"));
        assert_eq!(registry.resolve("Al"), "al");
    }

    #[test]
    fn test_register_merges_overlapping_actors() {
        let mut registry = ActorRegistry::new();
        registry.register(Actor::new("John Smith").with_alias("J. Smith"));
        let key = registry.register(Actor::new("J. Smith").with_email("js@example.com"));
        assert_eq!(key, "john smith");
        assert_eq!(registry.resolve("js@example.com"), "john smith");
    }

    #[test]
    fn test_discovered_display_name_is_order_independent() {
        let mut a = ActorRegistry::new();
        a.resolve("bob");
        a.resolve("Bob");
        let mut b = ActorRegistry::new();
        b.resolve("Bob");
        b.resolve("bob");
        assert_eq!(a.display_name("bob"), b.display_name("bob"));
    }
}
