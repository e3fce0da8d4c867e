//! Statement types
//!
//! `RawStatement` is what the ingestion layer hands over; `Statement` is the
//! validated, enriched form the engine indexes and reports.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::utils::text::{count_phrase, normalize_phrases};

/// Kind of evidence a statement was extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Document,
    Email,
    Chat,
    Transcript,
    Audio,
    Video,
    Image,
    #[default]
    Other,
}

impl SourceType {
    pub const ALL: [SourceType; 8] = [
        SourceType::Document,
        SourceType::Email,
        SourceType::Chat,
        SourceType::Transcript,
        SourceType::Audio,
        SourceType::Video,
        SourceType::Image,
        SourceType::Other,
    ];

    /// Number of source types the engine knows about
    pub fn known_count() -> usize {
        Self::ALL.len()
    }
}

/// Legal reading of a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalCategory {
    Admission,
    Denial,
    Promise,
    Threat,
    Financial,
    Factual,
    General,
}

const DENIAL_CUES: &[&str] = &[
    "i never", "i did not", "i didn't", "i have not", "i haven't", "i was not", "i wasn't",
    "i deny", "i denied", "that's not true", "that is not true", "not true", "never happened",
    "i had nothing to do", "it wasn't me", "wasn't me", "i don't know anything",
];

const ADMISSION_CUES: &[&str] = &[
    "i admit", "i admitted", "i confess", "my fault", "i was wrong", "i'm sorry", "i am sorry",
    "i apologize", "i did it", "i signed", "i agreed", "i received", "i took", "i sent", "i paid",
    "i borrowed", "i owe", "i made a mistake", "i accept",
];

const PROMISE_CUES: &[&str] = &[
    "i promise", "i will", "i'll", "i guarantee", "you have my word", "i commit", "i'm going to",
    "i am going to", "i swear i will",
];

const THREAT_CUES: &[&str] = &[
    "or else", "you'll regret", "you will regret", "i'll sue", "i will sue", "i'll make sure",
    "watch yourself", "i'll ruin", "i will ruin", "i'll expose",
];

const FINANCIAL_CUES: &[&str] = &[
    "paid", "pay", "payment", "invoice", "loan", "owe", "owed", "debt", "transfer", "deposit",
    "refund", "money", "cash", "salary", "fee", "price", "dollars", "euros", "pounds", "rand",
];

const FACTUAL_CUES: &[&str] = &[
    "on monday", "on tuesday", "on wednesday", "on thursday", "on friday", "on saturday",
    "on sunday", "at the meeting", "according to", "the record shows", "the contract states",
    "the document shows", "was signed on", "took place",
];

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "happy", "glad", "thanks", "thank", "appreciate", "love", "agree", "agreed",
    "fine", "excellent", "pleased", "wonderful", "honest", "fair", "trust", "sure", "helpful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "angry", "upset", "hate", "terrible", "awful", "liar", "lie", "lied", "cheat",
    "cheated", "stole", "steal", "fraud", "sorry", "wrong", "unfair", "threat", "sue", "never",
    "refuse", "refused", "disgusting", "ruin", "regret",
];

const CERTAINTY_MARKERS: &[&str] = &[
    "definitely", "absolutely", "certainly", "always", "never", "clearly", "without doubt",
    "i know", "for sure", "100", "guarantee", "i swear",
];

const HEDGE_MARKERS: &[&str] = &[
    "maybe", "perhaps", "possibly", "probably", "i think", "i guess", "i believe", "might",
    "not sure", "i suppose", "kind of", "sort of", "roughly", "about", "around",
];

fn count_cues(normalized: &str, cues: &[&str]) -> usize {
    cues.iter().map(|c| count_phrase(normalized, c)).sum()
}

impl LegalCategory {
    /// Classify from cue phrases. Denial wins over admission so that
    /// "I never signed" is not read as an admission of signing.
    pub fn classify(text: &str) -> Self {
        let norm = normalize_phrases(text);
        if count_cues(&norm, DENIAL_CUES) > 0 {
            LegalCategory::Denial
        } else if count_cues(&norm, THREAT_CUES) > 0 {
            LegalCategory::Threat
        } else if count_cues(&norm, ADMISSION_CUES) > 0 {
            LegalCategory::Admission
        } else if count_cues(&norm, PROMISE_CUES) > 0 {
            LegalCategory::Promise
        } else if count_cues(&norm, FINANCIAL_CUES) > 0 || text.contains(['$', '€', '£']) {
            LegalCategory::Financial
        } else if count_cues(&norm, FACTUAL_CUES) > 0 {
            LegalCategory::Factual
        } else {
            LegalCategory::General
        }
    }

    /// Categories that carry legal weight when contradicted
    pub fn is_legally_significant(&self) -> bool {
        matches!(self, LegalCategory::Admission | LegalCategory::Denial | LegalCategory::Financial)
    }
}

/// Lexicon sentiment in -1..=1
pub fn derive_sentiment(text: &str) -> f32 {
    let norm = normalize_phrases(text);
    let pos = count_cues(&norm, POSITIVE_WORDS) as f32;
    let neg = count_cues(&norm, NEGATIVE_WORDS) as f32;
    if pos + neg == 0.0 {
        return 0.0;
    }
    ((pos - neg) / (pos + neg)).clamp(-1.0, 1.0)
}

/// Lexicon certainty in 0..=1, 0.5 for neutral text
pub fn derive_certainty(text: &str) -> f32 {
    let norm = normalize_phrases(text);
    let sure = count_cues(&norm, CERTAINTY_MARKERS) as f32;
    let hedge = count_cues(&norm, HEDGE_MARKERS) as f32;
    (0.5 + 0.1 * sure - 0.1 * hedge).clamp(0.0, 1.0)
}

/// Parse the timestamp formats evidence exports commonly carry. Naive
/// values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%d/%m/%Y, %H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    for fmt in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
        }
    }

    None
}

/// A statement as delivered by the evidence-ingestion layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStatement {
    pub actor: String,
    pub text: String,
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certainty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<LegalCategory>,
}

impl RawStatement {
    pub fn new(actor: impl Into<String>, text: impl Into<String>, document_id: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            text: text.into(),
            document_id: document_id.into(),
            source_type: SourceType::Other,
            timestamp: None,
            sentiment: None,
            certainty: None,
            category: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn with_source(mut self, source_type: SourceType) -> Self {
        self.source_type = source_type;
        self
    }

    pub fn with_category(mut self, category: LegalCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_sentiment(mut self, sentiment: f32) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn with_certainty(mut self, certainty: f32) -> Self {
        self.certainty = Some(certainty);
        self
    }

    /// Reasons this entry cannot be indexed, empty when valid
    pub fn problems(&self) -> Vec<&'static str> {
        let mut problems = Vec::new();
        if self.actor.trim().is_empty() {
            problems.push("missing actor");
        }
        if self.text.trim().is_empty() {
            problems.push("missing text");
        }
        problems
    }
}

/// Lightweight snapshot of a statement, carried by contradictions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRef {
    pub id: String,
    pub actor: String,
    pub text: String,
    pub document_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A validated statement attributed to a resolved actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    /// Content-derived identifier
    pub id: String,
    /// Resolved actor key
    pub actor: String,
    /// Name as it appeared in the evidence
    pub actor_name: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Original timestamp string, kept even when it could not be parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_raw: Option<String>,
    pub document_id: String,
    pub source_type: SourceType,
    /// -1.0 ..= 1.0
    pub sentiment: f32,
    /// 0.0 ..= 1.0
    pub certainty: f32,
    pub category: LegalCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl PartialEq for Statement {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Statement {}

impl Statement {
    /// Build from a raw entry, deriving any signal the ingestion layer left out.
    /// `ordinal` disambiguates byte-identical duplicates.
    pub fn from_raw(raw: RawStatement, actor_key: &str, ordinal: usize) -> Self {
        let timestamp_raw = raw.timestamp.filter(|t| !t.trim().is_empty());
        let timestamp = timestamp_raw.as_deref().and_then(parse_timestamp);
        let text = raw.text.trim().to_string();
        let document_id = raw.document_id.trim().to_string();

        let id = Self::content_id(actor_key, &text, &document_id, timestamp_raw.as_deref(), ordinal);

        Self {
            id,
            actor: actor_key.to_string(),
            actor_name: raw.actor.trim().to_string(),
            sentiment: raw.sentiment.unwrap_or_else(|| derive_sentiment(&text)).clamp(-1.0, 1.0),
            certainty: raw.certainty.unwrap_or_else(|| derive_certainty(&text)).clamp(0.0, 1.0),
            category: raw.category.unwrap_or_else(|| LegalCategory::classify(&text)),
            text,
            timestamp,
            timestamp_raw,
            document_id,
            source_type: raw.source_type,
            embedding: None,
        }
    }

    /// SHA-256 over the identifying fields, rendered as a UUID
    pub fn content_id(actor_key: &str, text: &str, document_id: &str, timestamp: Option<&str>, ordinal: usize) -> String {
        let mut hasher = Sha256::new();
        hasher.update(actor_key.as_bytes());
        hasher.update([0u8]);
        hasher.update(text.as_bytes());
        hasher.update([0u8]);
        hasher.update(document_id.as_bytes());
        hasher.update([0u8]);
        hasher.update(timestamp.unwrap_or("").as_bytes());
        hasher.update([0u8]);
        hasher.update(ordinal.to_le_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        Uuid::from_bytes(bytes).to_string()
    }

    /// Set the embedding once; later calls are ignored
    pub fn assign_embedding(&mut self, embedding: Vec<f32>) -> bool {
        if self.embedding.is_some() {
            return false;
        }
        self.embedding = Some(embedding);
        true
    }

    pub fn to_ref(&self) -> StatementRef {
        StatementRef {
            id: self.id.clone(),
            actor: self.actor.clone(),
            text: self.text.clone(),
            document_id: self.document_id.clone(),
            timestamp: self.timestamp,
        }
    }

    /// Absolute distance in seconds, when both sides carry a timestamp
    pub fn seconds_apart(&self, other: &Statement) -> Option<i64> {
        match (self.timestamp, other.timestamp) {
            (Some(a), Some(b)) => Some((a - b).num_seconds().abs()),
            _ => None,
        }
    }
}
