use futures::future::{BoxFuture, FutureExt};

use super::{Scenario, Session};
use crate::result::E2eResult;
use crate::seed::{unique_name, ServiceOptions};
use crate::ui::{DialogField, Route};

const GROUP: &str = "Alert Creation";

pub(super) const SCENARIOS: [Scenario; 1] = [Scenario {
    group: GROUP,
    name: "should create an alert for two services",
    run: create_for_two_services,
}];

fn create_for_two_services(s: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        s.ui.visit(&Route::alerts().all_services()).await?;
        let svc1 = s.seed.create_service(ServiceOptions::new()).await?;
        let svc2 = s.seed.create_service(ServiceOptions::new()).await?;
        let summary = unique_name("Disk pressure on");
        let details = unique_name("details");

        s.ui.page_fab().await?;

        // Alert Info
        s.expect()
            .dialog("Cancel is visible", |d| d.is_button_visible("Cancel"))
            .await?;
        s.ui.dialog_fill(DialogField::Summary, &summary).await?;
        s.ui.dialog_fill(DialogField::Details, &details).await?;
        s.ui.dialog_button("Next").await?;

        // Service Selection
        s.expect()
            .dialog("service selection is shown", |d| d.button("Next").is_some())
            .await?;
        s.ui.dialog_fill(DialogField::ServiceSearch, &svc1.name).await?;
        s.ui.dialog_pick_service(&svc1.name).await?;
        s.ui.dialog_clear(DialogField::ServiceSearch).await?;
        s.expect()
            .dialog("first chip is shown", |d| d.has_chip(&svc1.name))
            .await?;

        s.ui.dialog_fill(DialogField::ServiceSearch, &svc2.name).await?;
        s.ui.dialog_pick_service(&svc2.name).await?;
        s.expect()
            .dialog("both chips are shown", |d| {
                d.has_chip(&svc1.name) && d.has_chip(&svc2.name)
            })
            .await?;
        s.expect()
            .dialog("two services are counted", |d| {
                d.selected_label
                    .as_deref()
                    .is_some_and(|l| l.contains("Selected Services (2)"))
            })
            .await?;
        s.ui.dialog_button("Next").await?;

        // Confirm
        s.expect()
            .dialog("both services are confirmed", |d| {
                d.contains(&svc1.name)
                    && d.contains(&svc2.name)
                    && d.has_chip(&svc1.name)
                    && d.has_chip(&svc2.name)
            })
            .await?;
        s.ui.dialog_button("Submit").await?;

        // Review
        s.expect()
            .dialog("review lists one alert per service", |d| {
                !d.is_button_visible("Back") && d.is_button_visible("Done") && d.list_items == 2
            })
            .await?;
        s.ui.dialog_button("Done").await?;
        s.expect().dialog_closed().await
    }
    .boxed()
}
