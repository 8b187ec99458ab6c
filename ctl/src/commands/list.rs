use std::{num::NonZeroU64, sync::Arc};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use sentinel_client::{
    ApiClient, ClientConfig, ConsoleFailureSink, DashboardList, Endpoint, ListSyncController,
    SyncOutcome, lists,
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::info;

use crate::output::JsonLinesView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    StatusSummaries,
    CommunityMembers,
    Interactions,
    HealthReports,
}

impl From<ListKind> for DashboardList {
    fn from(kind: ListKind) -> Self {
        match kind {
            ListKind::StatusSummaries => DashboardList::StatusSummaries,
            ListKind::CommunityMembers => DashboardList::CommunityMembers,
            ListKind::Interactions => DashboardList::Interactions,
            ListKind::HealthReports => DashboardList::HealthReports,
        }
    }
}

#[derive(Clone, Parser)]
pub struct ListParams {
    #[clap(value_enum)]
    pub list: ListKind,

    /// Only show members whose email starts with this
    #[clap(short, long)]
    pub filter: Option<String>,

    /// Member whose history to list (interactions and health-reports)
    #[clap(short, long)]
    pub subject: Option<String>,

    /// Number of pages to fetch before stopping
    #[clap(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,
}

#[derive(Clone, Parser)]
pub struct ExportParams {
    #[clap(value_enum)]
    pub list: ListKind,

    /// Only export members whose email starts with this
    #[clap(short, long)]
    pub filter: Option<String>,

    /// Member whose history to export (interactions and health-reports)
    #[clap(short, long)]
    pub subject: Option<String>,
}

enum Mode {
    Pages { filter: Option<String>, pages: u32 },
    All { filter: Option<String> },
}

pub async fn list(config: &ClientConfig, params: ListParams) -> anyhow::Result<()> {
    let mode = Mode::Pages {
        filter: params.filter,
        pages: params.pages,
    };
    dispatch(config, params.list.into(), params.subject.as_deref(), mode).await
}

pub async fn export(config: &ClientConfig, params: ExportParams) -> anyhow::Result<()> {
    let mode = Mode::All {
        filter: params.filter,
    };
    dispatch(config, params.list.into(), params.subject.as_deref(), mode).await
}

async fn dispatch(
    config: &ClientConfig,
    list: DashboardList,
    subject: Option<&str>,
    mode: Mode,
) -> anyhow::Result<()> {
    let client = ApiClient::from_config(config).context("Failed to create API client")?;
    let limit = list.limit(&config.limits);

    match list {
        DashboardList::StatusSummaries => {
            run(list, lists::status_summaries(client), limit, config, mode).await
        }
        DashboardList::CommunityMembers => {
            run(list, lists::community_members(client), limit, config, mode).await
        }
        DashboardList::Interactions => {
            let endpoint = lists::interactions(client, required_subject(list, subject)?);
            run(list, endpoint, limit, config, mode).await
        }
        DashboardList::HealthReports => {
            let endpoint = lists::health_reports(client, required_subject(list, subject)?);
            run(list, endpoint, limit, config, mode).await
        }
    }
}

fn required_subject(list: DashboardList, subject: Option<&str>) -> anyhow::Result<&str> {
    subject.with_context(|| format!("--subject is required for {list}"))
}

async fn run<T>(
    list: DashboardList,
    endpoint: Endpoint<T>,
    limit: NonZeroU64,
    config: &ClientConfig,
    mode: Mode,
) -> anyhow::Result<()>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    let controller = ListSyncController::new(
        list.to_string(),
        endpoint,
        limit,
        Arc::new(ConsoleFailureSink::new()),
    )
    .with_view(JsonLinesView::stdout())
    .with_timeout(config.request_timeout())
    .with_load_all_limit(config.load_all_limit);

    match mode {
        Mode::Pages { filter, pages } => {
            controller
                .load_initial(filter)
                .await
                .with_context(|| format!("Failed to load {list}"))?;

            for _ in 1..pages {
                let outcome = controller
                    .load_more()
                    .await
                    .with_context(|| format!("Failed to load more {list}"))?;
                if outcome == SyncOutcome::Disarmed {
                    break;
                }
            }

            if controller.load_more_armed().await {
                info!("more rows available, raise --pages to fetch them");
            }
        }
        Mode::All { filter } => {
            controller
                .load_all(filter)
                .await
                .with_context(|| format!("Failed to export {list}"))?;
        }
    }

    let rows = controller.len().await;
    info!(rows, "{list} done");

    Ok(())
}
