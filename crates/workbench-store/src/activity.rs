use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use workbench_core::{ActivityLogEntry, Actor, Market};

/// Append-only activity log, newest entry first
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: VecDeque<ActivityLogEntry>,
}

impl ActivityLog {
    /// Log holding `entries` as given (newest first)
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = ActivityLogEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn prepend(&mut self, entry: ActivityLogEntry) {
        self.entries.push_front(entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityLogEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&ActivityLogEntry> {
        self.entries.front()
    }

    /// Entries matching `filter`, newest first
    pub fn filtered<'a>(
        &'a self,
        filter: &'a ActivityFilter,
    ) -> impl Iterator<Item = &'a ActivityLogEntry> + 'a {
        self.entries.iter().filter(move |e| filter.matches(e))
    }

    /// `Agent` followed by each distinct human username, in log order
    #[must_use]
    pub fn actors(&self) -> Vec<String> {
        let mut actors = vec![Actor::Agent.to_string()];
        for name in self
            .entries
            .iter()
            .filter(|e| e.actor == Actor::Human)
            .filter_map(|e| e.username.as_deref())
        {
            if !actors.iter().any(|a| a == name) {
                actors.push(name.to_string());
            }
        }
        actors
    }
}

/// Which actors an activity query selects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActorFilter {
    #[default]
    All,
    Agent,
    /// Any human, named or not
    Human,
    /// A human by username
    User(String),
}

impl FromStr for ActorFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "" | "all" => ActorFilter::All,
            "Agent" | "agent" => ActorFilter::Agent,
            "Human" | "human" => ActorFilter::Human,
            name => ActorFilter::User(name.to_string()),
        })
    }
}

impl fmt::Display for ActorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorFilter::All => f.write_str("all"),
            ActorFilter::Agent => f.write_str("Agent"),
            ActorFilter::Human => f.write_str("Human"),
            ActorFilter::User(name) => f.write_str(name),
        }
    }
}

/// Activity log query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    /// `None` selects every market
    pub market: Option<Market>,
    pub actor: ActorFilter,
}

impl ActivityFilter {
    #[must_use]
    pub fn matches(&self, entry: &ActivityLogEntry) -> bool {
        let market_ok = self.market.map_or(true, |m| m == entry.market);
        let actor_ok = match &self.actor {
            ActorFilter::All => true,
            ActorFilter::Agent => entry.actor == Actor::Agent,
            ActorFilter::Human => entry.actor == Actor::Human,
            ActorFilter::User(name) => {
                entry.actor == Actor::Human && entry.username.as_deref() == Some(name.as_str())
            }
        };
        market_ok && actor_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use workbench_core::{LogEntryId, NewActivity};

    fn entry(id: &str, activity: NewActivity) -> ActivityLogEntry {
        activity.into_entry(
            LogEntryId::from(id),
            Utc.with_ymd_and_hms(2026, 1, 20, 9, 0, 0).unwrap(),
        )
    }

    fn sample() -> ActivityLog {
        ActivityLog::from_entries([
            entry("log-1", NewActivity::agent("Generated", Market::UK)),
            entry("log-2", NewActivity::human("Uploaded", Market::CZ).by("David Dunbar")),
            entry("log-3", NewActivity::human("Reviewed", Market::UK).by("Stefan Butler")),
            entry("log-4", NewActivity::human("Downloaded", Market::UK).by("David Dunbar")),
        ])
    }

    #[test]
    fn prepend_puts_newest_first() {
        let mut log = sample();
        log.prepend(entry("log-5", NewActivity::agent("Reprocessed", Market::FR)));
        assert_eq!(log.len(), 5);
        assert_eq!(log.latest().unwrap().id.as_str(), "log-5");
        assert_eq!(log.iter().nth(1).unwrap().id.as_str(), "log-1");
    }

    #[test]
    fn actors_are_distinct_and_ordered() {
        assert_eq!(sample().actors(), vec!["Agent", "David Dunbar", "Stefan Butler"]);
    }

    #[test]
    fn unnamed_humans_match_the_human_filter() {
        let mut log = sample();
        log.prepend(entry("log-5", NewActivity::human("Uploaded", Market::PL)));
        assert_eq!(log.latest().unwrap().actor_label(), "Human");

        let filter = ActivityFilter {
            market: Some(Market::PL),
            actor: "human".parse().unwrap(),
        };
        let ids: Vec<_> = log.filtered(&filter).map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["log-5"]);
        assert_eq!(ActorFilter::Human.to_string(), "Human");
    }

    #[test]
    fn filter_by_market_and_actor() {
        let log = sample();
        let filter = ActivityFilter {
            market: Some(Market::UK),
            actor: "David Dunbar".parse().unwrap(),
        };
        let ids: Vec<_> = log.filtered(&filter).map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["log-4"]);

        let agents = ActivityFilter {
            market: None,
            actor: ActorFilter::Agent,
        };
        assert_eq!(log.filtered(&agents).count(), 1);

        let humans = ActivityFilter {
            market: None,
            actor: "Human".parse().unwrap(),
        };
        assert_eq!(log.filtered(&humans).count(), 3);
        assert_eq!(log.filtered(&ActivityFilter::default()).count(), 4);
    }
}
