use anyhow::{Context, Result};

use crate::{
    github::Forge,
    types::{Notification, PullRequest, SubjectRef},
};

/// A notification's pull request together with the reference it was
/// resolved from.
#[derive(Debug, Clone)]
pub struct ResolvedPr {
    pub subject: SubjectRef,
    pub pr: PullRequest,
}

/// Fetches the current state of the pull request a notification is about.
///
/// The subject URL supplies the PR number (and the owner/repo used for
/// display and thread matching); the fetch itself is keyed on the
/// notification's repository full name. A PR without a title borrows the
/// notification's subject title.
pub async fn resolve_pull_request<F>(forge: &F, notification: &Notification) -> Result<ResolvedPr>
where
    F: Forge + Sync + ?Sized,
{
    let subject = SubjectRef::parse(&notification.subject_url)?;
    let (owner, repo) = notification.repo_owner_and_name()?;

    let mut pr = forge
        .get_pull_request(owner, repo, subject.number)
        .await
        .with_context(|| format!("Error fetching PR {}", notification.subject_url))?;

    if pr.title.is_empty() {
        pr.title = notification.subject_title.clone();
    }

    Ok(ResolvedPr { subject, pr })
}
