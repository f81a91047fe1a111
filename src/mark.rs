use anyhow::{Context, Result};

use crate::{github::Forge, types::MarkAction};

/// Marks a notification thread as read or done.
///
/// Read uses the thread ID as an opaque path segment. Done needs the
/// numeric ID, so a non-numeric ID fails here without calling GitHub.
pub async fn mark_thread<F>(forge: &F, thread_id: &str, action: MarkAction) -> Result<()>
where
    F: Forge + Sync + ?Sized,
{
    match action {
        MarkAction::Read => forge.mark_thread_read(thread_id).await,
        MarkAction::Done => {
            let id: u64 = thread_id
                .parse()
                .with_context(|| format!("Invalid thread ID '{thread_id}': not a number"))?;
            forge.mark_thread_done(id).await
        }
    }
}
