use mapsync::{
    CommandSender, ConfigError, DryRunCommandSender, ProcessCommandSender, SyncConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub(crate) struct AppWiring {
    pub(crate) config: SyncConfig,
    pub(crate) sender: Box<dyn CommandSender>,
}

pub(crate) fn build_app() -> Result<AppWiring, ConfigError> {
    init_tracing();
    let config = SyncConfig::from_env()?;
    info!(
        dispatcher = %config.dispatcher,
        settle_ms = config.settle_delay.as_millis() as u64,
        marker_y = config.reconcile.marker_y,
        dry_run = config.dry_run,
        "mapsync_startup"
    );

    let sender = command_sender(&config);
    Ok(AppWiring { config, sender })
}

pub(crate) fn command_sender(config: &SyncConfig) -> Box<dyn CommandSender> {
    if config.dry_run {
        Box::new(DryRunCommandSender)
    } else {
        Box::new(ProcessCommandSender::new(config.dispatcher.clone()))
    }
}

// Standard output stays unused; every diagnostic goes to stderr.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
