use std::{num::NonZeroUsize, sync::Arc};

use anyhow::{Context, Result};
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, error};

use crate::{
    decide::{api_to_web_url, decide, find_thread_id},
    display,
    github::Forge,
    mark::mark_thread,
    prompt::{ConfirmationGate, Terminal},
    resolve::resolve_pull_request,
    types::{MarkAction, Notification, Outcome},
};

/// How the pipeline ended for one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Already read and finished.
    Skipped,
    /// The PR is still open.
    Pending,
    Marked,
    /// The operator answered no (or input ended).
    Declined,
    /// No thread in the fetched set matched the PR.
    Unmatched,
    Failed,
}

/// Tally of dispositions over one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub skipped: usize,
    pub pending: usize,
    pub marked: usize,
    pub declined: usize,
    pub unmatched: usize,
    pub failed: usize,
}

impl SweepSummary {
    pub fn record(&mut self, disposition: Disposition) {
        let counter = match disposition {
            Disposition::Skipped => &mut self.skipped,
            Disposition::Pending => &mut self.pending,
            Disposition::Marked => &mut self.marked,
            Disposition::Declined => &mut self.declined,
            Disposition::Unmatched => &mut self.unmatched,
            Disposition::Failed => &mut self.failed,
        };
        *counter += 1;
    }

    pub fn total(&self) -> usize {
        self.skipped + self.pending + self.marked + self.declined + self.unmatched + self.failed
    }
}

impl std::fmt::Display for SweepSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Processed {} pull request notifications: {} marked, {} pending review, {} declined, {} already read, {} without thread, {} failed",
            self.total(),
            self.marked,
            self.pending,
            self.declined,
            self.skipped,
            self.unmatched,
            self.failed
        )
    }
}

/// Everything a worker needs, shared read-only across all workers.
pub struct Sweeper<F, T>
where
    F: ?Sized,
    T: ?Sized,
{
    forge: Arc<F>,
    terminal: Arc<T>,
    gate: ConfirmationGate,
    action: MarkAction,
    // Full, unfiltered fetch used for thread ID lookup.
    all: Arc<[Notification]>,
}

impl<F, T> Sweeper<F, T>
where
    F: Forge + Send + Sync + ?Sized + 'static,
    T: Terminal + ?Sized + 'static,
{
    pub fn new(
        forge: Arc<F>,
        terminal: Arc<T>,
        gate: ConfirmationGate,
        action: MarkAction,
        all: Arc<[Notification]>,
    ) -> Self {
        Self {
            forge,
            terminal,
            gate,
            action,
            all,
        }
    }

    /// Runs resolve, decide, confirm and mark for one notification.
    ///
    /// Errors are logged and end only this notification's pipeline.
    pub async fn process(&self, notification: &Notification) -> Disposition {
        let resolved = match resolve_pull_request(self.forge.as_ref(), notification).await {
            Ok(resolved) => resolved,
            Err(e) => {
                error!(
                    thread_id = %notification.thread_id,
                    url = %notification.subject_url,
                    title = %notification.subject_title,
                    "{e:#}"
                );
                return Disposition::Failed;
            }
        };

        let web_url = api_to_web_url(&notification.subject_url);
        let outcome = decide(&resolved.pr, notification.unread);
        debug!(subject = %resolved.subject, ?outcome, "Decided");

        match outcome {
            Outcome::Skip => Disposition::Skipped,
            Outcome::ReportPending => {
                self.terminal
                    .say(&display::format_pending(&web_url, &resolved.pr));
                Disposition::Pending
            }
            Outcome::ProposeMark => {
                self.terminal.say(&display::format_propose_mark(
                    &web_url,
                    &resolved.pr,
                    self.action,
                ));

                let Some(thread_id) = find_thread_id(&self.all, &resolved.subject) else {
                    debug!(subject = %resolved.subject, "No matching notification thread");
                    return Disposition::Unmatched;
                };

                self.terminal.say(&display::format_about_to_mark(
                    thread_id,
                    self.action,
                    self.terminal.supports_color(),
                ));

                if !self.gate.proceed(self.terminal.as_ref()).await {
                    return Disposition::Declined;
                }

                match mark_thread(self.forge.as_ref(), thread_id, self.action).await {
                    Ok(()) => {
                        self.terminal.say(&display::format_marked(self.action));
                        Disposition::Marked
                    }
                    Err(e) => {
                        self.terminal
                            .say(&display::format_mark_failed(thread_id, self.action));
                        error!(thread_id, action = %self.action, "{e:#}");
                        Disposition::Failed
                    }
                }
            }
        }
    }
}

/// Processes every notification with at most `concurrency` pipelines in
/// flight, returning once all of them have finished.
///
/// A permit is taken before each worker is spawned and released when it
/// ends, so no more than `concurrency` workers exist at any time. Limits
/// above [`Semaphore::MAX_PERMITS`] are clamped to it.
pub async fn sweep<F, T>(
    sweeper: Arc<Sweeper<F, T>>,
    notifications: Vec<Notification>,
    concurrency: NonZeroUsize,
) -> Result<SweepSummary>
where
    F: Forge + Send + Sync + ?Sized + 'static,
    T: Terminal + ?Sized + 'static,
{
    let permits = concurrency.get().min(Semaphore::MAX_PERMITS);
    let admission = Arc::new(Semaphore::new(permits));
    let mut handles = Vec::with_capacity(notifications.len());

    for notification in notifications {
        let permit = admission
            .clone()
            .acquire_owned()
            .await
            .context("Admission gate closed")?;
        debug!(
            thread_id = %notification.thread_id,
            available = admission.available_permits(),
            "Admitted notification"
        );

        let sweeper = Arc::clone(&sweeper);
        handles.push(tokio::spawn(async move {
            let disposition = sweeper.process(&notification).await;
            drop(permit);
            disposition
        }));
    }

    let mut summary = SweepSummary::default();
    for result in join_all(handles).await {
        match result {
            Ok(disposition) => summary.record(disposition),
            Err(e) => {
                error!(error = %e, "Notification worker did not complete");
                summary.record(Disposition::Failed);
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_each_disposition() {
        let mut summary = SweepSummary::default();
        for d in [
            Disposition::Marked,
            Disposition::Marked,
            Disposition::Pending,
            Disposition::Failed,
            Disposition::Skipped,
        ] {
            summary.record(d);
        }
        assert_eq!(summary.marked, 2);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total(), 5);
        assert!(summary.to_string().starts_with("Processed 5 pull request notifications"));
    }
}
