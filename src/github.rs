use anyhow::{Context, Result};
use async_trait::async_trait;
use octocrab::{Octocrab, models::IssueState};
use serde::Serialize;
use tracing::debug;

use crate::types::{Notification, NotificationDto, NotificationPage, PullRequest};

/// The remote operations the sweep consumes.
///
/// Implemented against the GitHub REST API by [`GitHub`]; tests
/// provide in-memory implementations.
#[async_trait]
pub trait Forge {
    /// Lists one page of unread notifications.
    async fn list_notifications(&self, page: u32, per_page: u8) -> Result<NotificationPage>;

    async fn get_pull_request(&self, owner: &str, repo: &str, number: u64) -> Result<PullRequest>;

    async fn mark_thread_read(&self, thread_id: &str) -> Result<()>;

    async fn mark_thread_done(&self, thread_id: u64) -> Result<()>;
}

pub fn get_github_token() -> Result<String> {
    match std::env::var("GITHUB_TOKEN") {
        Ok(token) if !token.trim().is_empty() => Ok(token),
        _ => anyhow::bail!("Please set the GITHUB_TOKEN environment variable."),
    }
}

/// Creates an authenticated GitHub client from `GITHUB_TOKEN`.
pub fn setup_github_client() -> Result<Octocrab> {
    let token = get_github_token().context("Failed to obtain GitHub authentication token")?;
    Octocrab::builder()
        .personal_token(token)
        .build()
        .context("Failed to create GitHub client")
}

#[derive(Debug, Serialize)]
struct ListNotificationsParams {
    all: bool,
    per_page: u8,
    page: u32,
}

/// [`Forge`] backed by the GitHub REST API.
#[derive(Clone)]
pub struct GitHub {
    client: Octocrab,
}

impl GitHub {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Forge for GitHub {
    async fn list_notifications(&self, page: u32, per_page: u8) -> Result<NotificationPage> {
        let params = ListNotificationsParams {
            all: false,
            per_page,
            page,
        };
        let response: octocrab::Page<NotificationDto> = self
            .client
            .get("/notifications", Some(&params))
            .await
            .with_context(|| format!("Failed to list notifications (page {page})"))?;

        debug!(page, count = response.items.len(), "Fetched notification page");

        Ok(NotificationPage {
            has_next: response.next.is_some(),
            items: response.items.into_iter().map(Notification::from).collect(),
        })
    }

    async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequest> {
        let pr = self
            .client
            .pulls(owner, repo)
            .get(number)
            .await
            .with_context(|| format!("Failed to fetch PR {owner}/{repo}#{number}"))?;

        Ok(PullRequest {
            title: pr.title.unwrap_or_default(),
            merged: pr.merged.unwrap_or(false) || pr.merged_at.is_some(),
            closed: pr.state == Some(IssueState::Closed),
        })
    }

    async fn mark_thread_read(&self, thread_id: &str) -> Result<()> {
        let route = format!("/notifications/threads/{thread_id}");
        let response = self
            .client
            ._patch(route.as_str(), None::<&()>)
            .await
            .with_context(|| format!("Failed to mark thread {thread_id} as read"))?;
        octocrab::map_github_error(response)
            .await
            .with_context(|| format!("Failed to mark thread {thread_id} as read"))?;
        Ok(())
    }

    async fn mark_thread_done(&self, thread_id: u64) -> Result<()> {
        let route = format!("/notifications/threads/{thread_id}");
        let response = self
            .client
            ._delete(route.as_str(), None::<&()>)
            .await
            .with_context(|| format!("Failed to mark thread {thread_id} as done"))?;
        octocrab::map_github_error(response)
            .await
            .with_context(|| format!("Failed to mark thread {thread_id} as done"))?;
        Ok(())
    }
}
