use futures::future::{BoxFuture, FutureExt};

use super::{Scenario, Session};
use crate::assertion::RetryConfig;
use crate::result::{E2eError, E2eResult};
use crate::seed::AlertLogsOptions;
use crate::ui::Route;

const GROUP: &str = "Alert Details Logs";
const SEEDED: usize = 200;
const LOAD_MORE: &str = "Load More";

pub(super) const SCENARIOS: [Scenario; 1] = [Scenario {
    group: GROUP,
    name: "should see load more, click, and no longer see load more",
    run: load_more_until_exhausted,
}];

fn load_more_until_exhausted(s: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
    async move {
        let logs = s.seed.create_alert_logs(AlertLogsOptions::new(SEEDED)).await?;
        s.ui.visit(&Route::details(logs.alert.number)).await?;
        let page = s.config.log_page_size;

        // the first page of a 200 entry log can take a while to render
        s.expect()
            .with_retry(RetryConfig::slow())
            .log_count_gt(page.displayed_after(0, SEEDED) - 1)
            .await?;

        // engine events (creation, notification) come on top of the seeded
        // ones, so the total is only known to exceed SEEDED
        for loads in 0..=SEEDED {
            let e = s.expect();
            e.log_count_gt(page.displayed_after(loads, SEEDED) - 1).await?;

            if !s.ui.body_text().await?.contains(LOAD_MORE) {
                e.log_count_gt(SEEDED).await?;
                return e.body_not_contains(LOAD_MORE).await;
            }

            // more to load means every page so far was full
            e.log_count_eq(page.displayed_after(loads, usize::MAX)).await?;
            s.ui.load_more_logs().await?;
        }

        Err(E2eError::assertion(format!(
            "{LOAD_MORE} still offered after {} loads",
            SEEDED + 1
        )))
    }
    .boxed()
}
