//! Pure filtering and ordering over demand collections.

use crate::error::{DemandError, Result};
use crate::model::{Demand, Priority, Status};
use chrono::{DateTime, Utc};
use std::str::FromStr;

/// Values that mean "no constraint" in a filter field.
pub const MATCH_ALL_SENTINELS: [&str; 2] = ["Todos", "All"];

/// True for an empty value or one of the match-all sentinels.
#[must_use]
pub fn is_match_all(value: &str) -> bool {
    let value = value.trim();
    value.is_empty()
        || MATCH_ALL_SENTINELS
            .iter()
            .any(|s| s.eq_ignore_ascii_case(value))
}

/// Constraint on a free-text field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TextMatch {
    #[default]
    Any,
    /// Exact, case-sensitive equality.
    Exact(String),
    /// Case-insensitive substring.
    Contains(String),
}

impl TextMatch {
    /// Build an exact or substring constraint; sentinels become [`TextMatch::Any`].
    #[must_use]
    pub fn parse(value: &str, exact: bool) -> Self {
        if is_match_all(value) {
            Self::Any
        } else if exact {
            Self::Exact(value.to_string())
        } else {
            Self::Contains(value.to_string())
        }
    }

    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(want) => candidate == want,
            Self::Contains(needle) => candidate.to_lowercase().contains(&needle.to_lowercase()),
        }
    }

    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

/// Parse an enum filter value, treating sentinels as "no constraint".
///
/// # Errors
///
/// Returns a validation error if the value is neither a sentinel nor a
/// recognized label.
pub fn parse_choice<T>(value: &str) -> Result<Option<T>>
where
    T: FromStr<Err = DemandError>,
{
    if is_match_all(value) {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

/// Conjunction of optional predicates over demand fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DemandFilter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub team_member: TextMatch,
    pub client: TextMatch,
    pub description: TextMatch,
}

impl DemandFilter {
    /// A filter that keeps everything.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.team_member.is_any()
            && self.client.is_any()
            && self.description.is_any()
    }

    #[must_use]
    pub fn matches(&self, demand: &Demand) -> bool {
        self.status.is_none_or(|s| demand.status == s)
            && self.priority.is_none_or(|p| demand.priority == p)
            && self.team_member.matches(&demand.team_member)
            && self.client.matches(&demand.client)
            && self.description.matches(&demand.description)
    }
}

/// Keep the demands matching every predicate, in input order.
#[must_use]
pub fn filter(records: &[Demand], predicates: &DemandFilter) -> Vec<Demand> {
    records
        .iter()
        .filter(|d| predicates.matches(d))
        .cloned()
        .collect()
}

/// Stable sort, High before Medium before Low.
pub fn sort_by_priority(records: &mut [Demand]) {
    records.sort_by_key(|d| d.priority.rank());
}

/// Stable sort, newest first; demands without a timestamp go last.
pub fn sort_by_newest(records: &mut [Demand]) {
    records.sort_by_key(|d| std::cmp::Reverse(d.created_at.unwrap_or(DateTime::<Utc>::MIN_UTC)));
}

/// Ordering applied to listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Store order.
    #[default]
    Insertion,
    Priority,
    Newest,
}

impl SortKey {
    pub fn apply(self, records: &mut [Demand]) {
        match self {
            Self::Insertion => {}
            Self::Priority => sort_by_priority(records),
            Self::Newest => sort_by_newest(records),
        }
    }
}

impl FromStr for SortKey {
    type Err = DemandError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "insertion" | "none" => Ok(Self::Insertion),
            "priority" => Ok(Self::Priority),
            "newest" | "created" => Ok(Self::Newest),
            other => Err(DemandError::validation(
                "sort",
                format!("unknown sort '{other}' (expected insertion, priority or newest)"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn demand(id: i64, member: &str, client: &str, priority: Priority, status: Status) -> Demand {
        Demand {
            id,
            team_member: member.to_string(),
            client: client.to_string(),
            description: format!("demand {id}"),
            priority,
            status,
            created_at: None,
        }
    }

    fn ids(records: &[Demand]) -> Vec<i64> {
        records.iter().map(|d| d.id).collect()
    }

    fn sample() -> Vec<Demand> {
        vec![
            demand(1, "Ana", "Acme Corp", Priority::Medium, Status::NotStarted),
            demand(2, "Bruno", "Globex", Priority::High, Status::InProgress),
            demand(3, "Ana", "acme labs", Priority::Medium, Status::Completed),
            demand(4, "Carla", "Initech", Priority::Low, Status::InProgress),
        ]
    }

    #[test]
    fn sentinels_are_match_all() {
        assert!(is_match_all("Todos"));
        assert!(is_match_all("all"));
        assert!(is_match_all("  "));
        assert!(!is_match_all("Ana"));
        assert_eq!(parse_choice::<Status>("Todos").unwrap(), None);
        assert_eq!(
            parse_choice::<Status>("Completed").unwrap(),
            Some(Status::Completed)
        );
        assert!(parse_choice::<Priority>("Urgent").is_err());
    }

    #[test]
    fn empty_filter_is_identity() {
        let records = sample();
        assert!(DemandFilter::all().is_unconstrained());
        assert_eq!(filter(&records, &DemandFilter::all()), records);
    }

    #[test]
    fn predicates_compose_with_and() {
        let predicates = DemandFilter {
            status: Some(Status::InProgress),
            priority: Some(Priority::Low),
            ..DemandFilter::default()
        };
        assert_eq!(ids(&filter(&sample(), &predicates)), vec![4]);
    }

    #[test]
    fn substring_match_ignores_case() {
        let predicates = DemandFilter {
            client: TextMatch::parse("ACME", false),
            ..DemandFilter::default()
        };
        assert_eq!(ids(&filter(&sample(), &predicates)), vec![1, 3]);
    }

    #[test]
    fn exact_match_is_case_sensitive() {
        let predicates = DemandFilter {
            client: TextMatch::parse("acme labs", true),
            ..DemandFilter::default()
        };
        assert_eq!(ids(&filter(&sample(), &predicates)), vec![3]);

        let predicates = DemandFilter {
            team_member: TextMatch::parse("ana", true),
            ..DemandFilter::default()
        };
        assert!(filter(&sample(), &predicates).is_empty());
    }

    #[test]
    fn sort_by_priority_is_stable() {
        let mut records = vec![
            demand(1, "A", "x", Priority::Medium, Status::NotStarted),
            demand(2, "B", "x", Priority::High, Status::NotStarted),
            demand(3, "C", "x", Priority::Medium, Status::NotStarted),
        ];
        sort_by_priority(&mut records);
        assert_eq!(ids(&records), vec![2, 1, 3]);
    }

    #[test]
    fn sort_by_newest_puts_undated_last() {
        let mut records = sample();
        records[0].created_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        records[2].created_at = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        sort_by_newest(&mut records);
        assert_eq!(ids(&records), vec![3, 1, 2, 4]);
    }

    #[test]
    fn sort_key_parses() {
        assert_eq!("priority".parse::<SortKey>().unwrap(), SortKey::Priority);
        assert_eq!("NEWEST".parse::<SortKey>().unwrap(), SortKey::Newest);
        assert!("alphabetical".parse::<SortKey>().is_err());
    }
}
