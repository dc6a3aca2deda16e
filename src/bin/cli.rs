//! notepress CLI
//!
//! Polls an Obsidian vault and publishes notes tagged `#blog` to a Hugo site.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use notepress::{
    error::{Result, error_chain},
    models::Config,
    pipeline::{self, CycleReport, Syncer},
    storage::SyncState,
    utils::{
        git::{GitPublisher, NoopPublisher, Publisher},
        http::Notifier,
    },
};

/// notepress - Obsidian to Hugo publisher
#[derive(Parser, Debug)]
#[command(
    name = "notepress",
    version,
    about = "Publishes tagged Obsidian notes as Hugo page bundles"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "notepress.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    watch: DefaultWatch,
}

/// Vault and site locations.
#[derive(Args, Debug)]
struct Roots {
    /// Root of the Obsidian vault
    #[arg(short = 'n', long = "notes")]
    notes: PathBuf,

    /// Root of the Hugo site (a git checkout)
    #[arg(short = 's', long = "site")]
    site: PathBuf,
}

impl Roots {
    /// Absolute paths, so sync state keys don't depend on the working directory.
    fn resolve(&self) -> Result<(PathBuf, PathBuf)> {
        Ok((
            std::fs::canonicalize(&self.notes)?,
            std::fs::canonicalize(&self.site)?,
        ))
    }
}

#[derive(Args, Debug)]
struct WatchArgs {
    #[command(flatten)]
    roots: Roots,

    /// Seconds between cycles
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,

    /// Push endpoint notified when a cycle fails
    #[arg(short = 'b', long)]
    notify_url: Option<String>,
}

/// `watch` flags given without a subcommand.
#[derive(Args, Debug, Default)]
struct DefaultWatch {
    /// Root of the Obsidian vault (runs `watch`)
    #[arg(short = 'n', long = "notes")]
    notes: Option<PathBuf>,

    /// Root of the Hugo site (runs `watch`)
    #[arg(short = 's', long = "site")]
    site: Option<PathBuf>,

    /// Seconds between cycles (runs `watch`)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,

    /// Push endpoint notified when a cycle fails
    #[arg(short = 'b', long)]
    notify_url: Option<String>,
}

impl DefaultWatch {
    fn into_watch(self) -> std::result::Result<WatchArgs, clap::Error> {
        match (self.notes, self.site, self.interval) {
            (Some(notes), Some(site), Some(interval)) => Ok(WatchArgs {
                roots: Roots { notes, site },
                interval,
                notify_url: self.notify_url,
            }),
            _ => Err(Cli::command().error(
                ErrorKind::MissingRequiredArgument,
                "--notes, --site and --interval are required unless a subcommand is given",
            )),
        }
    }
}

/// The subcommand to run; bare flags mean `watch`.
fn command_or_watch(
    command: Option<Command>,
    watch: DefaultWatch,
) -> std::result::Result<Command, clap::Error> {
    match command {
        Some(command) => Ok(command),
        None => watch.into_watch().map(Command::Watch),
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert changed notes every interval until stopped (default)
    Watch(WatchArgs),

    /// Run a single cycle and exit
    Once {
        #[command(flatten)]
        roots: Roots,
    },

    /// Validate the configuration file
    Validate,

    /// Show sync state info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn publisher(config: &Config, site: &Path) -> Box<dyn Publisher> {
    if config.publish.enabled {
        Box::new(GitPublisher::new(site, config.publish.commit_message.clone()))
    } else {
        Box::new(NoopPublisher)
    }
}

fn report_cycle(report: &CycleReport) {
    if !report.has_changes() {
        log::debug!(
            "No changes ({} notes, {} unchanged)",
            report.scanned,
            report.unchanged
        );
        return;
    }

    notepress::utils::log::summary(
        "Cycle complete",
        &[
            ("Notes scanned", report.scanned.to_string()),
            ("Not tagged", report.ineligible.to_string()),
            ("Unchanged", report.unchanged.to_string()),
            ("Converted", report.change_count().to_string()),
            ("Media copied", report.media.to_string()),
        ],
    );
}

/// Run cycles forever; failures are reported and the next cycle still runs.
async fn watch(config: &Config, args: WatchArgs) -> Result<()> {
    let interval = Duration::from_secs(args.interval);
    let (notes, site) = args.roots.resolve()?;
    let syncer = Syncer::new(config, &notes, &site)?;
    let publisher = publisher(config, &site);
    let notifier = Notifier::new(&config.notify, args.notify_url)?;
    let state_path = PathBuf::from(&config.sync.state_file);
    SyncState::bootstrap(&state_path)?;

    notepress::utils::log::header("notepress watching");
    notepress::utils::log::sub_item(&format!("Notes: {}", notes.display()));
    notepress::utils::log::sub_item(&format!("Articles: {}", syncer.store().content_dir().display()));
    notepress::utils::log::sub_item(&format!("Interval: {}s", interval.as_secs()));

    loop {
        match pipeline::run_once(&syncer, &state_path, publisher.as_ref()) {
            Ok(report) => report_cycle(&report),
            Err(e) => {
                log::error!("Cycle failed: {}", e);
                let message = format!("Exception\n{}", error_chain(&e));
                if let Err(e) = notifier.notify(&message).await {
                    log::error!("Failed to send notification: {}", e);
                }
            }
        }

        tokio::time::sleep(interval).await;
    }
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = command_or_watch(cli.command, cli.watch).unwrap_or_else(|e| e.exit());
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    log::debug!("Loaded configuration from {}", cli.config.display());

    match command {
        Command::Watch(args) => {
            config.validate()?;
            watch(&config, args).await?;
        }

        Command::Once { roots } => {
            config.validate()?;
            let (notes, site) = roots.resolve()?;
            let syncer = Syncer::new(&config, &notes, &site)?;
            let state_path = PathBuf::from(&config.sync.state_file);
            SyncState::bootstrap(&state_path)?;

            let report = pipeline::run_once(&syncer, &state_path, publisher(&config, &site).as_ref())?;
            report_cycle(&report);
            log::info!("Done! {} note(s) converted", report.change_count());
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }

        Command::Info => {
            let state_path = PathBuf::from(&config.sync.state_file);
            log::info!("State file: {}", state_path.display());

            if state_path.exists() {
                let state = SyncState::load(&state_path)?;
                log::info!("Tracked notes: {}", state.len());
                for key in state.keys() {
                    log::debug!("  {}", key);
                }
            } else {
                log::info!("No sync state yet.");
            }

            log::info!("Sentinel tag: #{}", config.sync.sentinel_tag);
            log::info!("Content dir: {}", config.sync.content_dir);
            log::info!(
                "Publishing: {}",
                if config.publish.enabled { "git" } else { "disabled" }
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Command, clap::Error> {
        let cli = Cli::try_parse_from(args)?;
        command_or_watch(cli.command, cli.watch)
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_flags_run_watch() {
        let command = parse(&[
            "notepress", "--notes", "vault", "--site", "blog", "--interval", "60",
        ])
        .unwrap();

        let Command::Watch(args) = command else {
            panic!("expected watch, got {command:?}");
        };
        assert_eq!(args.roots.notes, PathBuf::from("vault"));
        assert_eq!(args.roots.site, PathBuf::from("blog"));
        assert_eq!(args.interval, 60);
        assert_eq!(args.notify_url, None);
    }

    #[test]
    fn test_short_flags_with_endpoint() {
        let command = parse(&[
            "notepress", "-n", "vault", "-s", "blog", "-i", "5", "-b", "https://push.example/key",
        ])
        .unwrap();

        let Command::Watch(args) = command else {
            panic!("expected watch, got {command:?}");
        };
        assert_eq!(args.interval, 5);
        assert_eq!(args.notify_url.as_deref(), Some("https://push.example/key"));
    }

    #[test]
    fn test_bare_flags_need_interval() {
        let err = parse(&["notepress", "--notes", "vault", "--site", "blog"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = parse(&["notepress"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let err = parse(&["notepress", "-n", "vault", "-s", "blog", "-i", "0"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_explicit_subcommands() {
        let command = parse(&["notepress", "watch", "-n", "vault", "-s", "blog", "-i", "30"]).unwrap();
        assert!(matches!(command, Command::Watch(WatchArgs { interval: 30, .. })));

        let command = parse(&["notepress", "-c", "site.toml", "once", "-n", "vault", "-s", "blog"]).unwrap();
        assert!(matches!(command, Command::Once { .. }));

        assert!(matches!(parse(&["notepress", "validate"]).unwrap(), Command::Validate));
        assert!(matches!(parse(&["notepress", "info", "-v"]).unwrap(), Command::Info));
    }
}
