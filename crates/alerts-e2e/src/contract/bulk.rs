//! Bulk status transitions over a selection.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::lifecycle::AlertAction;
use crate::model::{Alert, AlertNumber, AlertStatus};

/// Counts reported after a bulk action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
    /// Alerts whose status actually changed
    pub changed: usize,
    /// Alerts that were selected
    pub selected: usize,
}

impl BulkOutcome {
    /// User-facing message, e.g. `2 of 3 alerts updated`
    #[must_use]
    pub fn message(&self) -> String {
        format!("{} of {} alerts updated", self.changed, self.selected)
    }
}

impl fmt::Display for BulkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Transitions a bulk action would make, computed before applying
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkPlan {
    /// Action being applied
    pub action: AlertAction,
    /// `(alert, new status)` for every alert that changes
    pub transitions: Vec<(AlertNumber, AlertStatus)>,
    /// Size of the selection
    pub selected: usize,
}

impl BulkPlan {
    /// Plan `action` over the selected alerts
    #[must_use]
    pub fn new<'a>(action: AlertAction, selected: impl IntoIterator<Item = &'a Alert>) -> Self {
        let mut count = 0;
        let transitions = selected
            .into_iter()
            .inspect(|_| count += 1)
            .filter_map(|a| a.status.apply(action).map(|next| (a.number, next)))
            .collect();
        Self {
            action,
            transitions,
            selected: count,
        }
    }

    /// Outcome reported once the plan is applied
    #[must_use]
    pub fn outcome(&self) -> BulkOutcome {
        BulkOutcome {
            changed: self.transitions.len(),
            selected: self.selected,
        }
    }
}

/// Apply `action` to every selected alert in place
pub fn apply_bulk<'a>(
    action: AlertAction,
    selected: impl IntoIterator<Item = &'a mut Alert>,
) -> BulkOutcome {
    let mut outcome = BulkOutcome {
        changed: 0,
        selected: 0,
    };
    for alert in selected {
        outcome.selected += 1;
        if let Some(next) = alert.status.apply(action) {
            alert.status = next;
            outcome.changed += 1;
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Service, ServiceId};
    use proptest::prelude::*;

    fn alert(number: u64, status: AlertStatus) -> Alert {
        Alert {
            number: AlertNumber(number),
            summary: format!("alert {number}"),
            details: String::new(),
            service: Service {
                id: ServiceId("svc".into()),
                name: "svc".into(),
                favorite: false,
                escalation_policy: None,
            },
            status,
            created_by: String::new(),
        }
    }

    #[test]
    fn test_message_format() {
        let outcome = BulkOutcome {
            changed: 2,
            selected: 3,
        };
        assert_eq!(outcome.message(), "2 of 3 alerts updated");
        assert_eq!(outcome.to_string(), "2 of 3 alerts updated");
    }

    #[test]
    fn test_acknowledge_sequence() {
        let mut alerts = vec![
            alert(1, AlertStatus::Acknowledged),
            alert(2, AlertStatus::Unacknowledged),
            alert(3, AlertStatus::Unacknowledged),
        ];
        assert_eq!(
            apply_bulk(AlertAction::Acknowledge, alerts.iter_mut()).message(),
            "2 of 3 alerts updated"
        );
        assert_eq!(
            apply_bulk(AlertAction::Acknowledge, alerts[..2].iter_mut()).message(),
            "0 of 2 alerts updated"
        );
        assert!(alerts
            .iter()
            .all(|a| a.status == AlertStatus::Acknowledged));
    }

    #[test]
    fn test_plan_matches_apply() {
        let alerts = vec![
            alert(1, AlertStatus::Closed),
            alert(2, AlertStatus::Acknowledged),
        ];
        let plan = BulkPlan::new(AlertAction::Escalate, alerts.iter());
        assert_eq!(
            plan.transitions,
            vec![(AlertNumber(2), AlertStatus::Unacknowledged)]
        );

        let mut applied = alerts.clone();
        assert_eq!(
            apply_bulk(AlertAction::Escalate, applied.iter_mut()),
            plan.outcome()
        );
    }

    #[test]
    fn test_close_everything_open() {
        let mut alerts = vec![
            alert(1, AlertStatus::Unacknowledged),
            alert(2, AlertStatus::Acknowledged),
            alert(3, AlertStatus::Closed),
        ];
        let outcome = apply_bulk(AlertAction::Close, alerts.iter_mut());
        assert_eq!(outcome.changed, 2);
        assert_eq!(outcome.selected, 3);
        assert!(alerts.iter().all(|a| a.status.is_closed()));
    }

    fn status_strategy() -> impl Strategy<Value = AlertStatus> {
        prop_oneof![
            Just(AlertStatus::Unacknowledged),
            Just(AlertStatus::Acknowledged),
            Just(AlertStatus::Closed),
        ]
    }

    fn action_strategy() -> impl Strategy<Value = AlertAction> {
        prop_oneof![
            Just(AlertAction::Acknowledge),
            Just(AlertAction::Escalate),
            Just(AlertAction::Close),
        ]
    }

    proptest! {
        #[test]
        fn prop_changed_never_exceeds_selected(
            statuses in proptest::collection::vec(status_strategy(), 0..12),
            action in action_strategy(),
        ) {
            let mut alerts: Vec<Alert> = statuses
                .iter()
                .enumerate()
                .map(|(i, s)| alert(i as u64, *s))
                .collect();
            let outcome = apply_bulk(action, alerts.iter_mut());
            prop_assert!(outcome.changed <= outcome.selected);
            prop_assert_eq!(outcome.selected, statuses.len());
        }

        #[test]
        fn prop_repeating_acknowledge_is_noop(
            statuses in proptest::collection::vec(status_strategy(), 0..12),
        ) {
            let mut alerts: Vec<Alert> = statuses
                .iter()
                .enumerate()
                .map(|(i, s)| alert(i as u64, *s))
                .collect();
            let _ = apply_bulk(AlertAction::Acknowledge, alerts.iter_mut());
            let second = apply_bulk(AlertAction::Acknowledge, alerts.iter_mut());
            prop_assert_eq!(second.changed, 0);
        }
    }
}
