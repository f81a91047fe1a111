//! Notifsweep: clears out GitHub notifications for finished pull requests.
//!
//! Fetches the unread notification inbox, keeps the pull request
//! notifications from the repositories of interest, and resolves each to
//! its current PR state. Threads for merged or closed PRs are marked as
//! read (or done) after an optional confirmation; open PRs are reported
//! as waiting for review.

pub mod cli;
pub mod decide;
pub mod display;
pub mod fetch;
pub mod filter;
pub mod github;
pub mod mark;
pub mod prompt;
pub mod resolve;
pub mod sweep;
pub mod types;

pub use cli::{SweepConfig, parse_args};
pub use decide::{api_to_web_url, decide, find_thread_id};
pub use fetch::{PAGE_SIZE, fetch_unread_notifications};
pub use filter::{RepoFilter, parse_repo_list};
pub use github::{Forge, GitHub, setup_github_client};
pub use mark::mark_thread;
pub use prompt::{ConfirmationGate, StdTerminal, Terminal, parse_answer};
pub use resolve::{ResolvedPr, resolve_pull_request};
pub use sweep::{Disposition, SweepSummary, Sweeper, sweep};
pub use types::{
    MarkAction, Notification, NotificationDto, NotificationPage, Outcome, PULL_REQUEST_SUBJECT,
    PullRequest, SubjectRef,
};
