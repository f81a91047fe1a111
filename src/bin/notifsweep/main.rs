use std::sync::Arc;

use notifsweep::{
    ConfirmationGate, GitHub, StdTerminal, Sweeper, fetch_unread_notifications, parse_args,
    setup_github_client, sweep,
};
use tracing::{info, warn};

fn handle_clap_help_version(clap_err: &clap::Error) -> ! {
    use clap::error::ErrorKind;
    match clap_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{clap_err}");
            std::process::exit(0);
        }
        _ => {
            eprint!("{clap_err}");
            std::process::exit(2);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = match parse_args(std::env::args()) {
        Ok(config) => config,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                handle_clap_help_version(clap_err);
            } else {
                return Err(err);
            }
        }
    };

    if config.prompts_concurrently() {
        warn!(
            concurrency = config.concurrency.get(),
            "Confirmation prompts are answered one at a time; consider --no-prompt"
        );
    }

    let forge = Arc::new(GitHub::new(setup_github_client()?));

    let all = fetch_unread_notifications(forge.as_ref(), &mut std::io::stdout()).await?;
    let targets = config.filter.apply(&all);
    info!(
        fetched = all.len(),
        pull_requests = targets.len(),
        "Filtered notifications"
    );

    let sweeper = Arc::new(Sweeper::new(
        forge,
        Arc::new(StdTerminal::new()),
        ConfirmationGate::new(config.no_prompt),
        config.action,
        all.into(),
    ));

    let summary = sweep(sweeper, targets, config.concurrency).await?;
    println!("{summary}");

    Ok(())
}
