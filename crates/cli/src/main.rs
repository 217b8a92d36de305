use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;

use stockflow_cli::Shell;
use stockflow_infra::{
    Config, InMemoryDocumentStore, JsonFileDocumentStore, Ledger, LiveDocumentStore, StoreBackend,
};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;

    if config.json_logs {
        stockflow_observability::init();
    } else {
        stockflow_observability::init_pretty();
    }

    let store: Arc<dyn LiveDocumentStore> = match config.store {
        StoreBackend::Memory => Arc::new(InMemoryDocumentStore::new()),
        StoreBackend::File => Arc::new(
            JsonFileDocumentStore::open(config.data_file.clone()).with_context(|| {
                format!("failed to open data file {}", config.data_file.display())
            })?,
        ),
    };

    tracing::info!(
        store = ?config.store,
        data_file = %config.data_file.display(),
        full_transfer = ?config.full_transfer,
        "stockflow starting"
    );

    let ledger = Ledger::open_live(store, config.ledger_settings())
        .context("failed to load inventory")?;
    let mut shell = Shell::new(ledger);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", shell.view())?;
    write!(out, "> ")?;
    out.flush()?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read input")?;
        let reply = shell.handle_line(&line);
        write!(out, "{}", reply.output)?;
        if reply.quit {
            break;
        }
        write!(out, "> ")?;
        out.flush()?;
    }

    tracing::info!("stockflow stopped");
    Ok(())
}
