use std::collections::HashSet;

use crate::types::Notification;

/// Allow/deny lists of `owner/repo` names.
///
/// An empty allow list admits every repository. The deny list is
/// checked after the allow list and always wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoFilter {
    allow: HashSet<String>,
    deny: HashSet<String>,
}

/// Splits a comma-separated repository list, trimming each entry and
/// dropping empty ones.
pub fn parse_repo_list(list: &str) -> HashSet<String> {
    list.split(',')
        .map(str::trim)
        .filter(|repo| !repo.is_empty())
        .map(str::to_string)
        .collect()
}

impl RepoFilter {
    pub fn new(allow: HashSet<String>, deny: HashSet<String>) -> Self {
        Self { allow, deny }
    }

    /// Builds a filter from the raw comma-separated option values.
    pub fn from_lists(only_repos: Option<&str>, exclude_repos: Option<&str>) -> Self {
        Self::new(
            only_repos.map(parse_repo_list).unwrap_or_default(),
            exclude_repos.map(parse_repo_list).unwrap_or_default(),
        )
    }

    pub fn allows_repo(&self, repo: &str) -> bool {
        if !self.allow.is_empty() && !self.allow.contains(repo) {
            return false;
        }
        !self.deny.contains(repo)
    }

    /// Pull request notifications from an admitted repository.
    pub fn matches(&self, notification: &Notification) -> bool {
        notification.is_pull_request() && self.allows_repo(&notification.repo_full_name)
    }

    /// Returns the matching notifications in their original order.
    pub fn apply(&self, notifications: &[Notification]) -> Vec<Notification> {
        notifications
            .iter()
            .filter(|n| self.matches(n))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PULL_REQUEST_SUBJECT;

    fn notification(id: &str, subject_type: &str, repo: &str) -> Notification {
        Notification {
            thread_id: id.to_string(),
            subject_type: subject_type.to_string(),
            subject_title: format!("subject {id}"),
            subject_url: format!("https://api.github.com/repos/{repo}/pulls/{id}"),
            repo_full_name: repo.to_string(),
            unread: true,
        }
    }

    fn ids(notifications: &[Notification]) -> Vec<&str> {
        notifications.iter().map(|n| n.thread_id.as_str()).collect()
    }

    #[test]
    fn parse_repo_list_trims_and_drops_empty_entries() {
        let repos = parse_repo_list(" a/b ,c/d,, ,e/f ");
        assert_eq!(repos.len(), 3);
        assert!(repos.contains("a/b"));
        assert!(repos.contains("c/d"));
        assert!(repos.contains("e/f"));
        assert!(parse_repo_list("").is_empty());
    }

    #[test]
    fn non_pull_requests_are_always_excluded() {
        let all = vec![
            notification("1", "Issue", "a/b"),
            notification("2", "Release", "a/b"),
            notification("3", PULL_REQUEST_SUBJECT, "a/b"),
        ];

        for filter in [
            RepoFilter::default(),
            RepoFilter::from_lists(Some("a/b"), None),
            RepoFilter::from_lists(None, Some("x/y")),
        ] {
            assert_eq!(ids(&filter.apply(&all)), vec!["3"]);
        }
    }

    #[test]
    fn allow_list_is_strict() {
        let all = vec![
            notification("1", PULL_REQUEST_SUBJECT, "a/b"),
            notification("2", PULL_REQUEST_SUBJECT, "c/d"),
        ];
        let filter = RepoFilter::from_lists(Some("a/b"), Some("x/y"));
        assert_eq!(ids(&filter.apply(&all)), vec!["1"]);
    }

    #[test]
    fn deny_list_wins_over_allow_list() {
        let all = vec![
            notification("1", PULL_REQUEST_SUBJECT, "a/b"),
            notification("2", PULL_REQUEST_SUBJECT, "c/d"),
        ];
        let filter = RepoFilter::from_lists(Some("a/b, c/d"), Some("a/b"));
        assert_eq!(ids(&filter.apply(&all)), vec!["2"]);
    }

    #[test]
    fn no_lists_keeps_every_pull_request_in_order() {
        let all = vec![
            notification("3", PULL_REQUEST_SUBJECT, "c/d"),
            notification("1", PULL_REQUEST_SUBJECT, "a/b"),
            notification("2", PULL_REQUEST_SUBJECT, "e/f"),
        ];
        assert_eq!(ids(&RepoFilter::default().apply(&all)), vec!["3", "1", "2"]);
    }
}
