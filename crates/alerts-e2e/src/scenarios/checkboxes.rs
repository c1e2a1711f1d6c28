use futures::future::{BoxFuture, FutureExt};

use super::{Scenario, Session};
use crate::contract::{AlertAction, BulkOutcome};
use crate::model::AlertNumber;
use crate::result::E2eResult;
use crate::seed::{AlertOptions, ServiceOptions};
use crate::ui::{Checkbox, MenuTarget, Route};

const GROUP: &str = "Alerts checkboxes";
const UNACKNOWLEDGED: &str = "UNACKNOWLEDGED";

pub(super) const SCENARIOS: [Scenario; 6] = [
    Scenario {
        group: GROUP,
        name: "should select and deselect all alerts from the header checkbox",
        run: header_checkbox_toggles_all,
    },
    Scenario {
        group: GROUP,
        name: "should select some alerts and deselect all from the header checkbox",
        run: header_checkbox_clears_partial,
    },
    Scenario {
        group: GROUP,
        name: "should select and deselect all alerts from the header checkbox menu",
        run: header_menu_all_none,
    },
    Scenario {
        group: GROUP,
        name: "should acknowledge, escalate, and close multiple alerts",
        run: bulk_lifecycle,
    },
    Scenario {
        group: GROUP,
        name: "should update some alerts",
        run: update_some,
    },
    Scenario {
        group: GROUP,
        name: "should NOT acknowledge acknowledged alerts",
        run: no_reacknowledge,
    },
];

/// Three alerts on one service; the list is filtered down to them
async fn setup(s: &mut Session) -> E2eResult<[AlertNumber; 3]> {
    let svc = s
        .seed
        .create_service(ServiceOptions::new().with_escalation_steps(1))
        .await?;
    let mut numbers = [AlertNumber(0); 3];
    for number in &mut numbers {
        *number = s
            .seed
            .create_alert(AlertOptions::for_service(svc.id.clone()))
            .await?
            .number;
    }

    s.ui
        .visit(&Route::alerts().all_services().with_search(svc.name))
        .await?;
    s.expect().row_count(3).await?;
    Ok(numbers)
}

async fn all_checked(s: &Session, numbers: &[AlertNumber], checked: bool) -> E2eResult<()> {
    let e = s.expect();
    for n in numbers {
        e.checked(Checkbox::Alert(*n), checked).await?;
    }
    Ok(())
}

fn updated(changed: usize, selected: usize) -> String {
    BulkOutcome { changed, selected }.message()
}

fn header_checkbox_toggles_all(s: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let alerts = setup(s).await?;
        s.ui.set_checked(Checkbox::SelectAll, true).await?;
        all_checked(s, &alerts, true).await?;

        s.ui.set_checked(Checkbox::SelectAll, false).await?;
        all_checked(s, &alerts, false).await
    }
    .boxed()
}

fn header_checkbox_clears_partial(s: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let alerts = setup(s).await?;
        s.ui.set_checked(Checkbox::Alert(alerts[0]), true).await?;
        s.ui.set_checked(Checkbox::Alert(alerts[1]), true).await?;

        s.ui.click_checkbox(Checkbox::SelectAll).await?;
        all_checked(s, &alerts, false).await
    }
    .boxed()
}

fn header_menu_all_none(s: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let alerts = setup(s).await?;
        s.ui.menu(MenuTarget::Checkboxes, "All").await?;
        all_checked(s, &alerts, true).await?;

        s.ui.menu(MenuTarget::Checkboxes, "None").await?;
        all_checked(s, &alerts, false).await
    }
    .boxed()
}

fn bulk_lifecycle(s: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let _ = setup(s).await?;

        s.expect().checked(Checkbox::SelectAll, false).await?;
        s.ui.click_checkbox(Checkbox::SelectAll).await?;
        s.ui.bulk_action(AlertAction::Acknowledge).await?;
        s.expect().list_not_contains(UNACKNOWLEDGED).await?;

        s.expect().checked(Checkbox::SelectAll, false).await?;
        s.ui.click_checkbox(Checkbox::SelectAll).await?;
        s.ui.bulk_action(AlertAction::Escalate).await?;
        s.expect().list_contains(UNACKNOWLEDGED).await?;

        s.expect().checked(Checkbox::SelectAll, false).await?;
        s.ui.click_checkbox(Checkbox::SelectAll).await?;
        s.ui.bulk_action(AlertAction::Close).await?;
        s.expect().list_contains("No results").await
    }
    .boxed()
}

fn update_some(s: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let [a1, a2, a3] = setup(s).await?;

        s.ui.set_checked(Checkbox::Alert(a1), true).await?;
        s.ui.bulk_action(AlertAction::Acknowledge).await?;
        s.expect()
            .bulk_action_visible(AlertAction::Acknowledge, false)
            .await?;

        let e = s.expect();
        e.row_not_contains(a1, UNACKNOWLEDGED).await?;
        e.row_contains(a2, UNACKNOWLEDGED).await?;
        e.row_contains(a3, UNACKNOWLEDGED).await?;

        s.ui.set_checked(Checkbox::SelectAll, true).await?;
        s.ui.bulk_action(AlertAction::Acknowledge).await?;

        let e = s.expect();
        e.update_message_contains(&updated(2, 3)).await?;
        for n in [a1, a2, a3] {
            e.row_not_contains(n, UNACKNOWLEDGED).await?;
        }
        Ok(())
    }
    .boxed()
}

fn no_reacknowledge(s: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let [a1, a2, a3] = setup(s).await?;

        s.ui.set_checked(Checkbox::Alert(a1), true).await?;
        s.ui.set_checked(Checkbox::Alert(a2), true).await?;
        s.ui.bulk_action(AlertAction::Acknowledge).await?;

        let e = s.expect();
        e.row_not_contains(a1, UNACKNOWLEDGED).await?;
        e.row_not_contains(a2, UNACKNOWLEDGED).await?;
        e.row_contains(a3, UNACKNOWLEDGED).await?;

        // same two again: nothing changes
        s.ui.set_checked(Checkbox::Alert(a1), true).await?;
        s.ui.set_checked(Checkbox::Alert(a2), true).await?;
        s.ui.bulk_action(AlertAction::Acknowledge).await?;
        s.expect().update_message_contains(&updated(0, 2)).await?;

        for n in [a1, a2, a3] {
            s.ui.set_checked(Checkbox::Alert(n), true).await?;
        }
        s.ui.bulk_action(AlertAction::Acknowledge).await?;
        s.expect().update_message_contains(&updated(1, 3)).await
    }
    .boxed()
}
