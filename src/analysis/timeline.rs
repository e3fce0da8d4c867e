//! Timeline Builder
//!
//! One event per dated statement, ordered by time. Statements without a
//! usable timestamp stay off the timeline.

use tracing::{debug, info};

use crate::index::StatementIndex;
use crate::model::{EventType, TimelineEvent};

#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineBuilder;

impl TimelineBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, index: &StatementIndex) -> Vec<TimelineEvent> {
        let mut events: Vec<TimelineEvent> = index
            .statements()
            .iter()
            .filter_map(|s| {
                let timestamp = s.timestamp?;
                Some(TimelineEvent {
                    id: format!("evt-{}", s.id),
                    timestamp,
                    description: s.text.clone(),
                    event_type: EventType::classify(&s.text),
                    actors: vec![s.actor.clone()],
                    statement_ids: vec![s.id.clone()],
                    document_id: s.document_id.clone(),
                    source_type: s.source_type,
                })
            })
            .collect();

        events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));

        let undated = index.len() - events.len();
        if undated > 0 {
            debug!("{} statements carry no usable timestamp and stay off the timeline", undated);
        }
        info!("Timeline built with {} events", events.len());
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawStatement, Statement};

    #[test]
    fn test_events_are_time_sorted_and_undated_dropped() {
        let mut index = StatementIndex::new();
        for (text, ts) in [
            ("We signed the lease", Some("2023-03-01")),
            ("I paid the deposit", Some("2023-01-15")),
            ("No idea when this was", None),
        ] {
            let mut raw = RawStatement::new("alice", text, "doc");
            if let Some(ts) = ts {
                raw = raw.with_timestamp(ts);
            }
            index.add(Statement::from_raw(raw, "alice", 0)).unwrap();
        }

        let events = TimelineBuilder::new().build(&index);
        assert_eq!(events.len(), 2);
        assert!(events[0].timestamp < events[1].timestamp);
        assert_eq!(events[0].event_type, EventType::Payment);
        assert_eq!(events[1].event_type, EventType::Agreement);
        assert!(events[0].id.starts_with("evt-"));
        assert!(events[0].involves("alice"));
    }

    #[test]
    fn test_empty_index_empty_timeline() {
        assert!(TimelineBuilder::new().build(&StatementIndex::new()).is_empty());
    }
}
