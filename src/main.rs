use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use gem_monitor::config::{DEFAULT_CONFIG_FILE, DEFAULT_LOCKFILE, MonitorConfig};
use gem_monitor::installed::InstalledPackages;
use gem_monitor::monitor;
use gem_monitor::version::registries::RubyGemsRegistry;

#[derive(Parser)]
#[command(name = "gem-monitor")]
#[command(version, about = "Reports installed gems that have fallen behind their latest release")]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Bundler lockfile listing the installed gems
    #[arg(long, default_value = DEFAULT_LOCKFILE)]
    lockfile: PathBuf,

    /// Cache file, overriding both the config and the per-project default
    #[arg(long)]
    cache_file: Option<PathBuf>,

    /// Write JSON logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Check monitored gems and report the stale ones (default)
    Check,
    /// Print the cache file used for this project
    CachePath,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_log(cli.log_file.as_deref())?;

    let config = MonitorConfig::load(&cli.config)
        .with_context(|| format!("failed to load config {:?}", cli.config))?;
    let project_root = std::env::current_dir().context("failed to resolve project root")?;
    let cache_path = cli
        .cache_file
        .clone()
        .unwrap_or_else(|| config.cache_file_path(&project_root));

    match cli.command.unwrap_or(Command::Check) {
        Command::CachePath => {
            println!("{}", cache_path.display());
            Ok(())
        }
        Command::Check => {
            let lockfile = std::fs::read_to_string(&cli.lockfile)
                .with_context(|| format!("failed to read lockfile {:?}", cli.lockfile))?;
            let installed = InstalledPackages::parse_lockfile(&lockfile);
            let registry = RubyGemsRegistry::new(&config.registry_url);

            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?
                .block_on(monitor::run(
                    &config,
                    &installed,
                    &registry,
                    &cache_path,
                    &mut std::io::stdout().lock(),
                ))?;
            Ok(())
        }
    }
}

fn init_log(log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("error initializing logging")?;
        return Ok(None);
    };

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("invalid log file {:?}", path))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("failed to create log directory {:?}", directory))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer),
        )
        .try_init()
        .context("error initializing logging")?;

    Ok(Some(guard))
}
