//! Every human-readable line the sweep prints.

use crate::types::{MarkAction, PullRequest};

const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

pub const CONFIRM_QUESTION: &str = "Continue: ? (y/n): ";
pub const INVALID_ANSWER: &str =
    "Invalid input, please enter 'y' or 'n', or just press Enter for yes.";

pub fn format_fetch_start() -> &'static str {
    "Fetching all GitHub notifications"
}

/// Progress line; starts with `\r` so successive pages overwrite it.
pub fn format_fetch_progress(page: u32, total: usize) -> String {
    format!("\r📦 Page {page} - Total fetched: {total} notifications")
}

pub fn format_fetch_done(total: usize) -> String {
    format!("✅ Done! Fetched {total} notifications in total.")
}

pub fn format_pending(web_url: &str, pr: &PullRequest) -> String {
    format!(
        "PR: {web_url}, Title: \"{}\", is unmerged and waiting for your review!",
        pr.title
    )
}

pub fn format_propose_mark(web_url: &str, pr: &PullRequest, action: MarkAction) -> String {
    format!(
        "🟡 PR: {web_url}, Title: \"{}\", is merged or closed and notification will be marked as {action}",
        pr.title
    )
}

pub fn format_about_to_mark(thread_id: &str, action: MarkAction, color: bool) -> String {
    let text = format!(
        "About to mark related GH Notification with threadID: \"{thread_id}\" as *{}*",
        action.as_str().to_uppercase()
    );
    if color {
        format!("  🟡 {YELLOW}{text}{RESET}")
    } else {
        format!("  🟡 {text}")
    }
}

pub fn format_marked(action: MarkAction) -> String {
    format!("    🟢 Successfully marked thread as {action}")
}

pub fn format_mark_failed(thread_id: &str, action: MarkAction) -> String {
    format!("    ❌ Failed to mark thread {thread_id} as {action}")
}
