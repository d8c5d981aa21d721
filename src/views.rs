use crate::dashboard::Dashboard;
use crate::loader::ScriptHost;
use crate::models::{ChartsResponse, MountView, mounts};
use crate::page::HostPage;
use crate::render::SnapshotRenderer;
use chrono::{DateTime, Local};

pub fn build_charts_response<S: ScriptHost>(
    board: &Dashboard<HostPage, SnapshotRenderer, S>,
) -> ChartsResponse {
    build_charts_response_at(Local::now(), board)
}

pub fn build_charts_response_at<S: ScriptHost>(
    now: DateTime<Local>,
    board: &Dashboard<HostPage, SnapshotRenderer, S>,
) -> ChartsResponse {
    let mounts = mounts::ALL
        .iter()
        .map(|mount| MountView {
            mount: mount.to_string(),
            chart: board
                .renderer()
                .chart_at(mount)
                .map(|live| live.view.clone()),
            state: board.page().mount(mount).cloned().unwrap_or_default(),
        })
        .collect();

    ChartsResponse {
        generated_at: now.to_rfc3339(),
        state: board.state(),
        sources: board.sources().clone(),
        plugins: board.renderer().plugins().collect(),
        mounts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Timings;
    use crate::models::{LoadState, fields};
    use crate::testing::FakeScripts;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn board() -> Dashboard<HostPage, SnapshotRenderer, FakeScripts> {
        let mut page = HostPage::new(BTreeMap::new(), mounts::ALL);
        for id in fields::ALL {
            page.set_field(id, "");
        }
        Dashboard::new(
            page,
            SnapshotRenderer::new(mounts::ALL),
            FakeScripts::new(),
            Timings::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn response_lists_every_mount_with_its_chart() {
        let mut board = board();
        board.start().await;

        let response = build_charts_response(&board);
        assert_eq!(response.state, LoadState::Ready);
        assert_eq!(response.mounts.len(), 4);
        assert!(response.mounts.iter().all(|m| m.chart.is_some() && m.state.errors.is_empty()));
        assert_eq!(response.plugins.len(), 1);

        let plan = &response.mounts[1];
        assert_eq!(plan.mount, mounts::PLAN_DISTRIBUTION);
        let chart = plan.chart.as_ref().unwrap();
        assert_eq!(chart.config["type"], "doughnut");
        assert_eq!(chart.annotations.value_labels[0], vec![Some("100%".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_load_reports_error_blocks() {
        let mut board = board();
        board.scripts_mut().set_offline(true);
        board.start().await;

        let response = build_charts_response(&board);
        assert_eq!(response.state, LoadState::NotLoaded);
        assert!(response.mounts.iter().all(|m| m.chart.is_none() && m.state.hidden));
        assert_eq!(response.sources.library, None);
    }

    #[test]
    fn generated_at_uses_the_given_time() {
        let now = Local.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        let response = build_charts_response_at(now, &board());
        assert!(response.generated_at.starts_with("2026-03-14T09:30:00"));
        assert_eq!(response.state, LoadState::NotLoaded);
        assert!(response.mounts.iter().all(|m| m.chart.is_none()));
    }
}
