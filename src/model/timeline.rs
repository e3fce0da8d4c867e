//! Timeline events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::statement::SourceType;
use crate::utils::text::{has_phrase, normalize_phrases};

/// What kind of thing happened at a point on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Payment,
    Request,
    Promise,
    Agreement,
    Denial,
    Admission,
    Threat,
    Communication,
}

const EVENT_CUES: &[(EventType, &[&str])] = &[
    (EventType::Payment, &["paid", "payment", "transferred", "deposited", "refunded", "sent the money", "wired"]),
    (EventType::Request, &["please", "can you", "could you", "i need", "requested", "request", "asked", "demand", "demanded"]),
    (EventType::Agreement, &["agreed", "agreement", "deal", "contract", "signed", "accepted"]),
    (EventType::Promise, &["i promise", "i will", "i'll", "promised"]),
    (EventType::Denial, &["i never", "i did not", "i didn't", "deny", "denied", "not true"]),
    (EventType::Admission, &["i admit", "my fault", "i was wrong", "i confess"]),
    (EventType::Threat, &["or else", "you'll regret", "i'll sue", "i will sue"]),
    (EventType::Communication, &["called", "emailed", "texted", "messaged", "replied", "wrote", "told", "said", "meeting", "spoke"]),
];

impl EventType {
    /// First matching cue family wins; plain messages are communications
    pub fn classify(text: &str) -> Self {
        let norm = normalize_phrases(text);
        EVENT_CUES
            .iter()
            .find(|(_, cues)| cues.iter().any(|c| has_phrase(&norm, c)))
            .map(|(kind, _)| *kind)
            .unwrap_or(EventType::Communication)
    }
}

/// A dated event on the reconstructed timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub event_type: EventType,
    pub actors: Vec<String>,
    pub statement_ids: Vec<String>,
    pub document_id: String,
    pub source_type: SourceType,
}

impl TimelineEvent {
    pub fn involves(&self, actor: &str) -> bool {
        self.actors.iter().any(|a| a == actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_classification() {
        assert_eq!(EventType::classify("I paid the deposit"), EventType::Payment);
        assert_eq!(EventType::classify("Could you send the keys?"), EventType::Request);
        assert_eq!(EventType::classify("We signed the lease"), EventType::Agreement);
        assert_eq!(EventType::classify("hello"), EventType::Communication);
    }
}
