use crate::types::{Notification, Outcome, PullRequest, SubjectRef};

/// Decides what to do with a pull request notification.
pub fn decide(pr: &PullRequest, notification_unread: bool) -> Outcome {
    match (pr.is_finished(), notification_unread) {
        (true, false) => Outcome::Skip,
        (true, true) => Outcome::ProposeMark,
        (false, _) => Outcome::ReportPending,
    }
}

/// Finds the thread ID of the first notification whose subject URL points
/// at the given pull request.
///
/// Scans the full, unfiltered notification set in fetched order.
pub fn find_thread_id<'a>(notifications: &'a [Notification], subject: &SubjectRef) -> Option<&'a str> {
    let fragment = subject.path_fragment();
    notifications
        .iter()
        .find(|n| n.subject_url.contains(&fragment))
        .map(|n| n.thread_id.as_str())
        .filter(|id| !id.is_empty())
}

/// Converts a pull request API URL into the browser URL.
pub fn api_to_web_url(api_url: &str) -> String {
    api_url
        .replacen("https://api.github.com/repos/", "https://github.com/", 1)
        .replacen("/pulls/", "/pull/", 1)
}
