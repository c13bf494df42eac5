use std::sync::Arc;

use clap::Parser;
use slashfill::cli::{self, Cli};
use slashfill_core::{config::Config, EntryStore, JsonFileStore};
use slashfill_tui::RunOptions;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/slashfill-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("slashfill debug log started, tail -f /tmp/slashfill-debug.log");
    }

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config unreadable, using defaults");
        Config::defaults()
    });
    let path = cli
        .store
        .clone()
        .unwrap_or_else(|| config.storage.resolved_path());
    tracing::debug!(store = %path.display(), "opening store");
    let store: Arc<dyn EntryStore> = Arc::new(JsonFileStore::new(&path));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let fields = cli.field_labels();
    match cli.command {
        Some(command) => {
            let mut stdout = std::io::stdout().lock();
            runtime.block_on(cli::execute(command, store.as_ref(), &mut stdout))
        }
        None => {
            let outcome = slashfill_tui::run(RunOptions {
                fields,
                config,
                store,
                runtime: runtime.handle().clone(),
                store_label: path.display().to_string(),
            })?;
            if outcome.submitted {
                for (label, value) in outcome.fields {
                    println!("{label}={value}");
                }
            }
            Ok(())
        }
    }
}
