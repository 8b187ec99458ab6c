//! The dashboard's paginated lists and how to reach them.

use std::{fmt, num::NonZeroU64};

use sentinel_common::views::{CommunityMember, DatedHealthReport, Interaction, StatusSummary};
use serde::de::DeserializeOwned;

use crate::{client::ApiClient, config::ListLimits, source::Endpoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardList {
    /// Today's health and location status of every member, filterable by
    /// email prefix.
    StatusSummaries,

    /// Members and their access state, filterable by email prefix.
    CommunityMembers,

    /// Contact history of one member.
    Interactions,

    /// Report history of one member.
    HealthReports,
}

impl DashboardList {
    pub fn path(&self) -> &'static str {
        match self {
            Self::StatusSummaries => "/api/paginate-user-summary-items",
            Self::CommunityMembers => "/user/paginate-users",
            Self::Interactions => "/api/paginate-user-interactions",
            Self::HealthReports => "/api/paginate-user-reports",
        }
    }

    pub fn items_field(&self) -> &'static str {
        match self {
            Self::StatusSummaries => "statuses",
            Self::CommunityMembers | Self::Interactions => "users",
            Self::HealthReports => "health_reports",
        }
    }

    pub fn filter_field(&self) -> Option<&'static str> {
        match self {
            Self::StatusSummaries | Self::CommunityMembers => Some("email"),
            Self::Interactions | Self::HealthReports => None,
        }
    }

    /// Whether the list belongs to a single member, identified by email.
    pub fn needs_subject(&self) -> bool {
        matches!(self, Self::Interactions | Self::HealthReports)
    }

    pub fn limit(&self, limits: &ListLimits) -> NonZeroU64 {
        match self {
            Self::StatusSummaries => limits.status_summaries,
            Self::CommunityMembers => limits.community_members,
            Self::Interactions => limits.interactions,
            Self::HealthReports => limits.health_reports,
        }
    }

    /// An endpoint for this list. Per-member lists send `subject` as the
    /// `email` body field.
    pub fn endpoint<T: DeserializeOwned>(
        &self,
        client: ApiClient,
        subject: Option<&str>,
    ) -> Endpoint<T> {
        let mut endpoint = Endpoint::new(client, self.path(), self.items_field());

        if let Some(field) = self.filter_field() {
            endpoint = endpoint.with_filter_field(field);
        }

        if let Some(subject) = subject {
            endpoint = endpoint.with_fixed("email", subject);
        }

        endpoint
    }
}

impl fmt::Display for DashboardList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StatusSummaries => "status-summaries",
            Self::CommunityMembers => "community-members",
            Self::Interactions => "interactions",
            Self::HealthReports => "health-reports",
        })
    }
}

pub fn status_summaries(client: ApiClient) -> Endpoint<StatusSummary> {
    DashboardList::StatusSummaries.endpoint(client, None)
}

pub fn community_members(client: ApiClient) -> Endpoint<CommunityMember> {
    DashboardList::CommunityMembers.endpoint(client, None)
}

pub fn interactions(client: ApiClient, subject: &str) -> Endpoint<Interaction> {
    DashboardList::Interactions.endpoint(client, Some(subject))
}

pub fn health_reports(client: ApiClient, subject: &str) -> Endpoint<DatedHealthReport> {
    DashboardList::HealthReports.endpoint(client, Some(subject))
}
