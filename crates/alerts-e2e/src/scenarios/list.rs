use futures::future::{BoxFuture, FutureExt};

use super::{Scenario, Session};
use crate::model::Alert;
use crate::result::E2eResult;
use crate::seed::AlertOptions;
use crate::ui::Route;

const GROUP: &str = "Alerts List";

pub(super) const SCENARIOS: [Scenario; 5] = [
    Scenario {
        group: GROUP,
        name: "should handle searching by number",
        run: search_by_number,
    },
    Scenario {
        group: GROUP,
        name: "should handle searching by summary",
        run: search_by_summary,
    },
    Scenario {
        group: GROUP,
        name: "should handle searching by service name",
        run: search_by_service,
    },
    Scenario {
        group: GROUP,
        name: "should handle toggling show by favorites filter",
        run: favorites_filter,
    },
    Scenario {
        group: GROUP,
        name: "Item should link to the details page",
        run: item_links_to_details,
    },
];

/// One fresh alert, list open on all services
async fn setup(s: &mut Session) -> E2eResult<Alert> {
    let alert = s.seed.create_alert(AlertOptions::new()).await?;
    s.ui.visit(&Route::alerts().all_services()).await?;
    Ok(alert)
}

async fn search_finds_only(s: &mut Session, query: fn(&Alert) -> String) -> E2eResult<()> {
    let alert = setup(s).await?;
    s.ui.page_search(&query(&alert)).await?;

    let e = s.expect();
    e.body_contains(&alert.summary).await?;
    e.body_contains(&alert.number.to_string()).await?;
    e.body_contains(&alert.service.name).await?;
    e.only_row(alert.number).await
}

fn search_by_number(s: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    search_finds_only(s, |a| a.number.to_string()).boxed()
}

fn search_by_summary(s: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    search_finds_only(s, |a| a.summary.clone()).boxed()
}

fn search_by_service(s: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    search_finds_only(s, |a| a.service.name.clone()).boxed()
}

fn favorites_filter(s: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let _ = setup(s).await?;
        // fresh services are never favorites
        s.ui.visit(&Route::alerts()).await?;
        s.expect().body_contains("No results").await?;

        s.ui.toggle_favorites_filter().await?;
        s.expect().body_not_contains("No results").await
    }
    .boxed()
}

fn item_links_to_details(s: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let alert = setup(s).await?;
        s.ui.page_search(&alert.number.to_string()).await?;
        s.expect().only_row(alert.number).await?;

        s.ui.open_alert(alert.number).await?;
        s.expect()
            .location_path(&Route::details(alert.number).pathname())
            .await
    }
    .boxed()
}
