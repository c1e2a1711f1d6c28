use futures::future::{BoxFuture, FutureExt};

use super::{Scenario, Session};
use crate::contract::{created_attribution, AlertAction};
use crate::model::Alert;
use crate::result::{E2eError, E2eResult};
use crate::seed::{AlertOptions, ServiceOptions};
use crate::ui::Route;

const GROUP: &str = "Alert Details";

pub(super) const SCENARIOS: [Scenario; 2] = [
    Scenario {
        group: GROUP,
        name: "should have proper links and data",
        run: links_and_data,
    },
    Scenario {
        group: GROUP,
        name: "should allow the user to take action",
        run: take_action,
    },
];

/// Alert on a service with a one-step escalation policy, details page open
async fn setup(s: &mut Session) -> E2eResult<Alert> {
    let alert = s
        .seed
        .create_alert(AlertOptions::new().with_service(ServiceOptions::new().with_escalation_steps(1)))
        .await?;
    s.ui.visit(&Route::details(alert.number)).await?;
    Ok(alert)
}

fn links_and_data(s: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let alert = setup(s).await?;
        let e = s.expect();

        // the policy link is dropped from narrow layouts
        if s.screen().is_mobile() {
            e.no_link("Escalation Policy").await?;
        } else {
            let ep = alert
                .service
                .escalation_policy
                .as_ref()
                .ok_or_else(|| E2eError::seed("service was created without an escalation policy"))?;
            e.link_href("Escalation Policy", &format!("/escalation-policies/{}", ep.id))
                .await?;
        }

        e.link_href(&alert.service.name, &format!("/services/{}", alert.service.id))
            .await?;
        e.body_contains(&alert.details).await?;
        e.body_contains(&alert.summary).await?;
        e.body_contains(&created_attribution(s.user())).await?;
        e.body_contains("UNACKNOWLEDGED").await
    }
    .boxed()
}

fn take_action(s: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let _ = setup(s).await?;
        let user = s.user().to_string();

        s.ui.page_action(AlertAction::Acknowledge.label()).await?;
        let e = s.expect();
        e.body_contains("ACKNOWLEDGED").await?;
        e.body_not_contains("UNACKNOWLEDGED").await?;
        e.body_contains(&AlertAction::Acknowledge.attribution(&user))
            .await?;

        s.ui.page_action(AlertAction::Escalate.label()).await?;
        s.expect()
            .body_contains(&AlertAction::Escalate.attribution(&user))
            .await?;

        s.ui.page_action(AlertAction::Close.label()).await?;
        let e = s.expect();
        e.body_contains(&AlertAction::Close.attribution(&user)).await?;
        e.body_contains("CLOSED").await
    }
    .boxed()
}
