//! Alert list search and favorites filtering.

use crate::model::Alert;

/// Normalized free-text search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Parse user input; surrounding whitespace is ignored
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self(text.trim().to_lowercase())
    }

    /// Whether the query matches everything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Normalized query text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring match against number, summary and service name
    #[must_use]
    pub fn matches(&self, alert: &Alert) -> bool {
        if self.is_empty() {
            return true;
        }
        alert.number.to_string().contains(&self.0)
            || alert.summary.to_lowercase().contains(&self.0)
            || alert.service.name.to_lowercase().contains(&self.0)
    }
}

/// Result of filtering the alert list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome<'a> {
    /// Matching alerts, newest first; never empty
    Results(Vec<&'a Alert>),
    /// Explicit empty state ("No results")
    NoResults,
}

impl<'a> FilterOutcome<'a> {
    /// Matching alerts (empty for `NoResults`)
    #[must_use]
    pub fn alerts(&self) -> &[&'a Alert] {
        match self {
            Self::Results(alerts) => alerts,
            Self::NoResults => &[],
        }
    }

    /// Number of matches
    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts().len()
    }

    /// Whether the empty state is shown
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoResults)
    }
}

/// Filter state of the alerts list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertFilter {
    /// Free-text search
    pub query: SearchQuery,
    /// Only alerts of favorited services
    pub favorites_only: bool,
    /// Include closed alerts
    pub include_closed: bool,
}

impl AlertFilter {
    /// Filter with the given search text and defaults otherwise
    #[must_use]
    pub fn with_search(text: &str) -> Self {
        Self {
            query: SearchQuery::parse(text),
            ..Self::default()
        }
    }

    /// Whether a single alert passes the filter
    #[must_use]
    pub fn admits(&self, alert: &Alert) -> bool {
        (self.include_closed || !alert.status.is_closed())
            && (!self.favorites_only || alert.service.favorite)
            && self.query.matches(alert)
    }

    /// Apply the filter to a collection
    #[must_use]
    pub fn apply<'a>(&self, alerts: &'a [Alert]) -> FilterOutcome<'a> {
        let mut hits: Vec<&Alert> = alerts.iter().filter(|a| self.admits(a)).collect();
        if hits.is_empty() {
            return FilterOutcome::NoResults;
        }
        hits.sort_by(|a, b| b.number.cmp(&a.number));
        FilterOutcome::Results(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AlertNumber, AlertStatus, Service, ServiceId};
    use proptest::prelude::*;

    fn alert(number: u64, summary: &str, service: &str, favorite: bool) -> Alert {
        Alert {
            number: AlertNumber(number),
            summary: summary.to_string(),
            details: String::new(),
            service: Service {
                id: ServiceId(format!("svc-{service}")),
                name: service.to_string(),
                favorite,
                escalation_policy: None,
            },
            status: AlertStatus::Unacknowledged,
            created_by: "E2E User".to_string(),
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn test_matches_number_summary_and_service() {
            let a = alert(812, "Disk Full", "Storage", false);
            assert!(SearchQuery::parse("812").matches(&a));
            assert!(SearchQuery::parse("disk full").matches(&a));
            assert!(SearchQuery::parse("STORAGE").matches(&a));
            assert!(!SearchQuery::parse("network").matches(&a));
        }

        #[test]
        fn test_empty_query_matches_everything() {
            let a = alert(1, "x", "y", false);
            assert!(SearchQuery::parse("   ").matches(&a));
            assert!(SearchQuery::parse("").is_empty());
        }
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn test_singleton_result() {
            let alerts = vec![
                alert(1, "cpu hot", "Compute", false),
                alert(2, "disk full", "Storage", false),
            ];
            let outcome = AlertFilter::with_search("storage").apply(&alerts);
            assert_eq!(outcome.len(), 1);
            assert_eq!(outcome.alerts()[0].number, AlertNumber(2));
        }

        #[test]
        fn test_favorites_only_without_favorites_is_no_results() {
            let alerts = vec![alert(1, "a", "A", false), alert(2, "b", "B", false)];
            let filter = AlertFilter {
                favorites_only: true,
                ..AlertFilter::default()
            };
            assert_eq!(filter.apply(&alerts), FilterOutcome::NoResults);

            let unfiltered = AlertFilter::default().apply(&alerts);
            assert_eq!(unfiltered.len(), 2);
        }

        #[test]
        fn test_closed_hidden_by_default() {
            let mut closed = alert(3, "old", "A", false);
            closed.status = AlertStatus::Closed;
            let alerts = vec![closed];
            assert!(AlertFilter::default().apply(&alerts).is_empty());

            let all = AlertFilter {
                include_closed: true,
                ..AlertFilter::default()
            };
            assert_eq!(all.apply(&alerts).len(), 1);
        }

        #[test]
        fn test_results_newest_first() {
            let alerts = vec![alert(1, "a", "S", false), alert(5, "b", "S", false)];
            let outcome = AlertFilter::with_search("s").apply(&alerts);
            let numbers: Vec<u64> = outcome.alerts().iter().map(|a| a.number.0).collect();
            assert_eq!(numbers, vec![5, 1]);
        }
    }

    proptest! {
        #[test]
        fn prop_summary_substring_always_matches(
            summary in "[a-zA-Z ]{1,30}",
            start in 0usize..30,
            len in 1usize..10,
        ) {
            let a = alert(9, &summary, "svc", false);
            let chars: Vec<char> = summary.chars().collect();
            let start = start.min(chars.len() - 1);
            let end = (start + len).min(chars.len());
            let needle: String = chars[start..end].iter().collect();
            prop_assert!(SearchQuery::parse(&needle.to_uppercase()).matches(&a));
        }

        #[test]
        fn prop_filter_never_returns_empty_results(
            favorites in proptest::collection::vec(any::<bool>(), 0..8),
            favorites_only in any::<bool>(),
        ) {
            let alerts: Vec<Alert> = favorites
                .iter()
                .enumerate()
                .map(|(i, f)| alert(i as u64 + 1, "s", "svc", *f))
                .collect();
            let filter = AlertFilter { favorites_only, ..AlertFilter::default() };
            match filter.apply(&alerts) {
                FilterOutcome::Results(hits) => prop_assert!(!hits.is_empty()),
                FilterOutcome::NoResults => {
                    prop_assert!(alerts.iter().all(|a| !filter.admits(a)));
                }
            }
        }
    }
}
