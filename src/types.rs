use anyhow::{Context, Result};
use serde::Deserialize;

/// Subject type GitHub reports for notifications about pull requests.
pub const PULL_REQUEST_SUBJECT: &str = "PullRequest";

/// An unread (or read) notification thread as fetched from GitHub.
///
/// Only the fields the sweep needs are kept. The collection is
/// fetched once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Opaque thread identifier used by the mark endpoints.
    pub thread_id: String,
    pub subject_type: String,
    pub subject_title: String,
    /// Canonical API URL of the subject, e.g.
    /// `https://api.github.com/repos/owner/repo/pulls/5`.
    pub subject_url: String,
    /// Owning repository as `owner/repo`.
    pub repo_full_name: String,
    pub unread: bool,
}

impl Notification {
    pub fn is_pull_request(&self) -> bool {
        self.subject_type == PULL_REQUEST_SUBJECT
    }

    /// Returns the `(owner, repo)` pair from the repository full name.
    ///
    /// This pair, not the one embedded in the subject URL, is what the
    /// pull request fetch is keyed on.
    pub fn repo_owner_and_name(&self) -> Result<(&str, &str)> {
        let full_name = self
            .repo_full_name
            .strip_prefix("repos/")
            .unwrap_or(&self.repo_full_name);

        match full_name.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok((owner, repo))
            }
            _ => anyhow::bail!(
                "Repository must be in format 'owner/repo', got: '{}'",
                self.repo_full_name
            ),
        }
    }
}

/// Structured reference to a pull request, parsed from a subject API URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    /// Number segment exactly as it appears in the URL.
    pub number_segment: String,
}

impl SubjectRef {
    /// Parses `https://api.github.com/repos/{owner}/{repo}/pulls/{number}`.
    ///
    /// Any other shape is rejected instead of yielding garbage segments.
    pub fn parse(api_url: &str) -> Result<Self> {
        let url = url::Url::parse(api_url)
            .with_context(|| format!("Failed to parse subject URL: '{}'", api_url))?;

        let segments: Vec<&str> = url
            .path_segments()
            .context("Cannot parse subject URL path")?
            .collect();

        // ["repos", "owner", "repo", "pulls", "123"]
        if segments.len() != 5
            || segments[0] != "repos"
            || segments[3] != "pulls"
            || segments[1].is_empty()
            || segments[2].is_empty()
        {
            anyhow::bail!(
                "Subject URL must be in format https://api.github.com/repos/owner/repo/pulls/123, got: '{}'",
                api_url
            );
        }

        let number: u64 = segments[4]
            .parse()
            .with_context(|| format!("Invalid PR number in subject URL: '{}'", api_url))?;

        Ok(Self {
            owner: segments[1].to_string(),
            repo: segments[2].to_string(),
            number,
            number_segment: segments[4].to_string(),
        })
    }

    /// Path fragment used to match this pull request against subject URLs.
    ///
    /// Built from the raw number segment, so `pulls/05` still matches the
    /// URL it was parsed from.
    pub fn path_fragment(&self) -> String {
        format!(
            "/repos/{}/{}/pulls/{}",
            self.owner, self.repo, self.number_segment
        )
    }
}

impl std::fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// The slice of pull request state the decider cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub title: String,
    pub merged: bool,
    pub closed: bool,
}

impl PullRequest {
    pub fn is_finished(&self) -> bool {
        self.merged || self.closed
    }
}

/// What to do with one pull request notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Already read and the PR is merged or closed: nothing to do.
    Skip,
    /// The PR is still open.
    ReportPending,
    /// The PR is merged or closed and the notification is unread.
    ProposeMark,
}

/// How a finished notification thread gets marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkAction {
    #[default]
    Read,
    Done,
}

impl MarkAction {
    pub fn from_mark_done(mark_done: bool) -> Self {
        if mark_done {
            MarkAction::Done
        } else {
            MarkAction::Read
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkAction::Read => "read",
            MarkAction::Done => "done",
        }
    }
}

impl std::fmt::Display for MarkAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of the notification listing.
#[derive(Debug, Clone, Default)]
pub struct NotificationPage {
    pub items: Vec<Notification>,
    pub has_next: bool,
}

#[derive(Debug, Deserialize)]
pub struct NotificationDto {
    pub id: String,
    pub unread: bool,
    pub subject: SubjectDto,
    pub repository: RepositoryDto,
}

#[derive(Debug, Deserialize)]
pub struct SubjectDto {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    // Null for some subject types (e.g. discussions).
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryDto {
    pub full_name: String,
}

impl From<NotificationDto> for Notification {
    fn from(dto: NotificationDto) -> Self {
        Notification {
            thread_id: dto.id,
            subject_type: dto.subject.kind,
            subject_title: dto.subject.title,
            subject_url: dto.subject.url.unwrap_or_default(),
            repo_full_name: dto.repository.full_name,
            unread: dto.unread,
        }
    }
}
