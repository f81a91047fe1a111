use std::io::Write;

use anyhow::{Context, Result};
use tracing::debug;

use crate::{display, github::Forge, types::Notification};

/// Notifications requested per page.
pub const PAGE_SIZE: u8 = 50;

/// Pages through the unread notification listing until it is exhausted.
///
/// Results keep the order GitHub returned them in. Any failed page
/// aborts the whole fetch: the sweep needs a complete snapshot to match
/// thread IDs against. Progress is written to `progress` and overwritten
/// in place after every page.
pub async fn fetch_unread_notifications<F, W>(forge: &F, progress: &mut W) -> Result<Vec<Notification>>
where
    F: Forge + Sync + ?Sized,
    W: Write + Send,
{
    let mut notifications = Vec::new();
    let mut page: u32 = 1;

    writeln!(progress, "{}", display::format_fetch_start())?;

    loop {
        let response = forge
            .list_notifications(page, PAGE_SIZE)
            .await
            .with_context(|| format!("Error fetching GH notifications (page {page})"))?;

        notifications.extend(response.items);

        write!(progress, "{}", display::format_fetch_progress(page, notifications.len()))?;
        progress.flush()?;

        if !response.has_next {
            break;
        }
        debug!(page, total = notifications.len(), "More notification pages to fetch");
        page += 1;
    }

    writeln!(progress)?;
    writeln!(progress, "{}", display::format_fetch_done(notifications.len()))?;

    Ok(notifications)
}
