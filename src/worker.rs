use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::cli::Config;
use crate::data::derive::derive_dataset;
use crate::data::fetch::{load_cad_file, CadClient};
use crate::data::model::NeoDataset;

// ---------------------------------------------------------------------------
// Fetch + derive, blocking
// ---------------------------------------------------------------------------

/// Run the acquisition half of the pipeline: one request (or file read),
/// then derivation.
pub fn load_dataset(config: &Config) -> Result<NeoDataset> {
    let fetched = match &config.from_file {
        Some(path) => load_cad_file(path)?,
        None => {
            let client = CadClient::new(config.api_url.clone(), config.timeout)?;
            client
                .fetch(&config.query)
                .with_context(|| format!("fetching close approaches from {}", client.endpoint()))?
        }
    };

    let rows = fetched.table.len();
    let dataset = derive_dataset(fetched.table, fetched.source, Utc::now())
        .context("deriving close-approach metrics")?;
    log::info!("Derived {rows} close approaches");
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Background fetch for the UI
// ---------------------------------------------------------------------------

/// A fetch running on its own thread. Poll it once per frame.
pub struct FetchJob {
    rx: Receiver<Result<NeoDataset>>,
}

impl FetchJob {
    /// Spawn the fetch; `on_done` is called from the worker thread once the
    /// result is sent (the UI uses it to request a repaint).
    pub fn spawn(config: Config, on_done: impl FnOnce() + Send + 'static) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = load_dataset(&config);
            // The receiver is gone if the app closed mid-fetch.
            let _ = tx.send(result);
            on_done();
        });
        FetchJob { rx }
    }

    /// `None` while the fetch is still running.
    pub fn poll(&self) -> Option<Result<NeoDataset>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(anyhow::anyhow!("fetch thread exited without a result")))
            }
        }
    }
}
