//! In-memory deployment state: services, alerts and their event logs.

use std::collections::HashMap;

use crate::contract::{apply_bulk, created_attribution, AlertAction, BulkOutcome, BulkPlan};
use crate::model::{
    Alert, AlertLogEntry, AlertLogEvent, AlertLogs, AlertNumber, AlertStatus, EscalationPolicy,
    EscalationPolicyId, Service, ServiceId,
};
use crate::result::{ContractError, E2eError, E2eResult};
use crate::seed::{unique_name, AlertLogsOptions, AlertOptions, ServiceOptions};

/// Seeded history cycles through these
const SEEDED_EVENTS: [AlertLogEvent; 3] = [
    AlertLogEvent::Notified,
    AlertLogEvent::Escalated,
    AlertLogEvent::Engine,
];

/// In-memory state of the reference application
#[derive(Debug)]
pub struct Backend {
    user: String,
    services: Vec<Service>,
    alerts: Vec<Alert>,
    logs: HashMap<AlertNumber, Vec<AlertLogEntry>>,
    next_alert: u64,
    next_id: u64,
}

impl Backend {
    /// Empty backend acting as `user`
    #[must_use]
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            services: Vec::new(),
            alerts: Vec::new(),
            logs: HashMap::new(),
            next_alert: 1,
            next_id: 1,
        }
    }

    /// Display name of the current user
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// All services in creation order
    #[must_use]
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// All alerts in creation order
    #[must_use]
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Look up an alert
    pub fn alert(&self, number: AlertNumber) -> Result<&Alert, ContractError> {
        self.alerts
            .iter()
            .find(|a| a.number == number)
            .ok_or(ContractError::UnknownAlert(number))
    }

    /// Log of an alert, newest first
    #[must_use]
    pub fn logs_newest_first(&self, number: AlertNumber) -> Vec<AlertLogEntry> {
        self.logs
            .get(&number)
            .map(|logs| logs.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn log(&mut self, number: AlertNumber, event: AlertLogEvent, message: String) -> AlertLogEntry {
        let entry = AlertLogEntry {
            id: self.next_id(),
            event,
            message,
        };
        self.logs.entry(number).or_default().push(entry.clone());
        entry
    }

    /// Create a service
    pub fn create_service(&mut self, options: ServiceOptions) -> Service {
        let id = ServiceId(format!("svc-{}", self.next_id()));
        let escalation_policy = options.escalation_policy.map(|ep| EscalationPolicy {
            id: EscalationPolicyId(format!("ep-{}", self.next_id())),
            name: unique_name("Policy"),
            step_count: ep.step_count,
        });
        let service = Service {
            id,
            name: options.name.unwrap_or_else(|| unique_name("Service")),
            favorite: options.favorite,
            escalation_policy,
        };
        self.services.push(service.clone());
        service
    }

    /// Create an alert; the engine logs its creation and first notification
    pub fn create_alert(&mut self, options: AlertOptions) -> E2eResult<Alert> {
        let service = match options.service_id {
            Some(id) => self
                .services
                .iter()
                .find(|s| s.id == id)
                .cloned()
                .ok_or_else(|| E2eError::seed(format!("unknown service {id}")))?,
            None => self.create_service(options.service.unwrap_or_default()),
        };

        let number = AlertNumber(self.next_alert);
        self.next_alert += 1;
        let alert = Alert {
            number,
            summary: options.summary.unwrap_or_else(|| unique_name("Alert")),
            details: options.details.unwrap_or_else(|| unique_name("Details")),
            service,
            status: AlertStatus::Unacknowledged,
            created_by: self.user.clone(),
        };
        self.alerts.push(alert.clone());

        let created = created_attribution(&self.user);
        let _ = self.log(number, AlertLogEvent::Created, created);
        let _ = self.log(
            number,
            AlertLogEvent::Notified,
            format!("Notification sent to {}", self.user),
        );
        Ok(alert)
    }

    /// Create an alert with `count` extra history entries
    pub fn create_alert_logs(&mut self, options: AlertLogsOptions) -> E2eResult<AlertLogs> {
        let alert = self.create_alert(options.alert.unwrap_or_default())?;
        let mut logs = Vec::with_capacity(options.count);
        for i in 0..options.count {
            let event = SEEDED_EVENTS[i % SEEDED_EVENTS.len()];
            let message = match event {
                AlertLogEvent::Escalated => format!("Escalated to step #{}", i % 3 + 1),
                AlertLogEvent::Notified => format!("Notification sent to {}", self.user),
                _ => format!("Engine event {}", i + 1),
            };
            logs.push(self.log(alert.number, event, message));
        }
        Ok(AlertLogs { alert, logs })
    }

    /// Apply a lifecycle action to one alert
    pub fn apply_action(
        &mut self,
        number: AlertNumber,
        action: AlertAction,
    ) -> Result<AlertStatus, ContractError> {
        let user = self.user.clone();
        let alert = self
            .alerts
            .iter_mut()
            .find(|a| a.number == number)
            .ok_or(ContractError::UnknownAlert(number))?;
        let next = alert
            .status
            .apply(action)
            .ok_or(ContractError::ActionNotOffered {
                action: action.label(),
                status: alert.status,
            })?;
        alert.status = next;
        let _ = self.log(number, event_of(action), action.attribution(&user));
        Ok(next)
    }

    /// Apply a bulk action to the given alerts
    pub fn apply_bulk(&mut self, action: AlertAction, numbers: &[AlertNumber]) -> BulkOutcome {
        let selected = |a: &Alert| numbers.contains(&a.number);
        let plan = BulkPlan::new(action, self.alerts.iter().filter(|a| selected(a)));
        let outcome = apply_bulk(action, self.alerts.iter_mut().filter(|a| selected(a)));

        let message = action.attribution(&self.user);
        for (number, _) in &plan.transitions {
            let _ = self.log(*number, event_of(action), message.clone());
        }
        tracing::debug!(%action, %outcome, "bulk update");
        outcome
    }
}

const fn event_of(action: AlertAction) -> AlertLogEvent {
    match action {
        AlertAction::Acknowledge => AlertLogEvent::Acknowledged,
        AlertAction::Escalate => AlertLogEvent::Escalated,
        AlertAction::Close => AlertLogEvent::Closed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_are_sequential_and_stable() {
        let mut backend = Backend::new("E2E User");
        let a = backend.create_alert(AlertOptions::new()).unwrap();
        let b = backend.create_alert(AlertOptions::new()).unwrap();
        assert_eq!(a.number, AlertNumber(1));
        assert_eq!(b.number, AlertNumber(2));
        assert_ne!(a.service.id, b.service.id);
        assert_eq!(backend.alert(AlertNumber(1)).unwrap().summary, a.summary);
    }

    #[test]
    fn test_alert_on_unknown_service_fails() {
        let mut backend = Backend::new("u");
        let err = backend
            .create_alert(AlertOptions::for_service(ServiceId("nope".into())))
            .unwrap_err();
        assert!(matches!(err, E2eError::Seed { .. }));
    }

    #[test]
    fn test_seeded_logs_are_supplemented() {
        let mut backend = Backend::new("u");
        let seeded = backend.create_alert_logs(AlertLogsOptions::new(200)).unwrap();
        assert_eq!(seeded.logs.len(), 200);
        let all = backend.logs_newest_first(seeded.alert.number);
        assert_eq!(all.len(), 202);
        assert_eq!(all.last().unwrap().event, AlertLogEvent::Created);
        assert!(all.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[test]
    fn test_action_attribution_logged() {
        let mut backend = Backend::new("Night Shift");
        let alert = backend.create_alert(AlertOptions::new()).unwrap();
        assert_eq!(
            backend.apply_action(alert.number, AlertAction::Acknowledge),
            Ok(AlertStatus::Acknowledged)
        );
        assert_eq!(
            backend.apply_action(alert.number, AlertAction::Acknowledge),
            Err(ContractError::ActionNotOffered {
                action: "Acknowledge",
                status: AlertStatus::Acknowledged
            })
        );
        let newest = &backend.logs_newest_first(alert.number)[0];
        assert_eq!(newest.message, "Acknowledged by Night Shift");
    }

    #[test]
    fn test_bulk_only_touches_selection() {
        let mut backend = Backend::new("u");
        let svc = backend.create_service(ServiceOptions::new());
        let numbers: Vec<AlertNumber> = (0..3)
            .map(|_| {
                backend
                    .create_alert(AlertOptions::for_service(svc.id.clone()))
                    .unwrap()
                    .number
            })
            .collect();
        let outcome = backend.apply_bulk(AlertAction::Acknowledge, &numbers[..1]);
        assert_eq!(outcome.message(), "1 of 1 alerts updated");
        let outcome = backend.apply_bulk(AlertAction::Acknowledge, &numbers);
        assert_eq!(outcome.message(), "2 of 3 alerts updated");
        assert_eq!(backend.logs_newest_first(numbers[0]).len(), 3);
    }
}
