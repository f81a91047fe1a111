use std::num::NonZeroUsize;

use anyhow::Result;
use clap::Parser;

use crate::{filter::RepoFilter, types::MarkAction};

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

/// Long options that may also be spelled with a single dash.
const LONG_OPTIONS: &[&str] = &[
    "no-prompt",
    "mark-done",
    "only-repos",
    "exclude-repos",
    "concurrency",
];

#[derive(Parser, Debug)]
#[command(
    about = "Mark GitHub notifications for merged or closed pull requests as read (or done), and list the ones still waiting for review"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
struct CliArgs {
    /// Skip confirmation prompts
    #[arg(long = "no-prompt")]
    pub no_prompt: bool,

    /// Mark notifications as done instead of read
    #[arg(long = "mark-done")]
    pub mark_done: bool,

    /// Only process these repositories (comma-separated owner/repo)
    #[arg(long = "only-repos", value_name = "OWNER/REPO,...")]
    pub only_repos: Option<String>,

    /// Never process these repositories (comma-separated owner/repo)
    #[arg(long = "exclude-repos", value_name = "OWNER/REPO,...")]
    pub exclude_repos: Option<String>,

    /// Maximum number of notifications processed at once
    #[arg(long, default_value = "1", value_name = "NUM")]
    pub concurrency: NonZeroUsize,
}

/// Settings for one sweep, built from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    pub no_prompt: bool,
    pub action: MarkAction,
    pub filter: RepoFilter,
    pub concurrency: NonZeroUsize,
}

impl SweepConfig {
    /// Prompting while several workers run is serialised but still
    /// awkward for the operator.
    pub fn prompts_concurrently(&self) -> bool {
        !self.no_prompt && self.concurrency.get() > 1
    }
}

fn transform_single_dash_options(args: Vec<String>) -> Vec<String> {
    args.into_iter()
        .map(|arg| {
            let Some(rest) = arg.strip_prefix('-') else {
                return arg;
            };
            if rest.starts_with('-') {
                return arg;
            }
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if LONG_OPTIONS.contains(&name) {
                format!("-{arg}")
            } else {
                arg
            }
        })
        .collect()
}

fn build_config_from_cli(cli: CliArgs) -> SweepConfig {
    SweepConfig {
        no_prompt: cli.no_prompt,
        action: MarkAction::from_mark_done(cli.mark_done),
        filter: RepoFilter::from_lists(cli.only_repos.as_deref(), cli.exclude_repos.as_deref()),
        concurrency: cli.concurrency,
    }
}

/// Parses command-line arguments into a sweep configuration.
///
/// Go-style single-dash long options (`-no-prompt`, `-concurrency=4`)
/// are accepted alongside the usual `--` spelling.
pub fn parse_args<I, T>(args: I) -> Result<SweepConfig>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let args_vec: Vec<String> = args
        .into_iter()
        .map(|arg| arg.into().to_string_lossy().into_owned())
        .collect();
    let transformed_args = transform_single_dash_options(args_vec);

    let cli = CliArgs::try_parse_from(transformed_args)?;
    Ok(build_config_from_cli(cli))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<SweepConfig> {
        parse_args(std::iter::once("notifsweep").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert!(!config.no_prompt);
        assert_eq!(config.action, MarkAction::Read);
        assert_eq!(config.filter, RepoFilter::default());
        assert_eq!(config.concurrency.get(), 1);
        assert!(!config.prompts_concurrently());
    }

    #[test]
    fn single_dash_long_options_are_accepted() {
        let config = parse(&[
            "-no-prompt",
            "-mark-done",
            "-concurrency=4",
            "-only-repos",
            "a/b, c/d",
            "-exclude-repos=c/d",
        ])
        .unwrap();
        assert!(config.no_prompt);
        assert_eq!(config.action, MarkAction::Done);
        assert_eq!(config.concurrency.get(), 4);
        assert!(config.filter.allows_repo("a/b"));
        assert!(!config.filter.allows_repo("c/d"));
        assert!(!config.filter.allows_repo("e/f"));
    }

    #[test]
    fn double_dash_options_are_accepted() {
        let config = parse(&["--concurrency", "3", "--mark-done"]).unwrap();
        assert_eq!(config.concurrency.get(), 3);
        assert_eq!(config.action, MarkAction::Done);
        assert!(config.prompts_concurrently());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        assert!(parse(&["-concurrency=0"]).is_err());
        assert!(parse(&["--concurrency", "-2"]).is_err());
    }

    #[test]
    fn unknown_options_are_rejected() {
        assert!(parse(&["-bogus"]).is_err());
        assert!(parse(&["--repo", "a/b"]).is_err());
    }

    #[test]
    fn transform_leaves_other_arguments_alone() {
        let args = vec![
            "notifsweep".to_string(),
            "--no-prompt".to_string(),
            "-h".to_string(),
            "-concurrency".to_string(),
        ];
        assert_eq!(
            transform_single_dash_options(args),
            vec!["notifsweep", "--no-prompt", "-h", "--concurrency"]
        );
    }
}
