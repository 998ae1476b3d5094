use std::sync::Arc;

use crate::cli::Config;
use crate::color::ColorScale;
use crate::data::cache::{CacheKey, FetchCache};
use crate::data::filter::{partition, FilterBounds, Partition};
use crate::data::model::NeoDataset;
use crate::data::summary::Summary;
use crate::lunar::LunarPage;
use crate::worker::FetchJob;

// ---------------------------------------------------------------------------
// Pages and loading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Lunar,
    Neo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
    Failed(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Page shown in the central area.
    pub page: Page,

    /// Current dataset (None until the first fetch completes).
    pub dataset: Option<Arc<NeoDataset>>,

    /// Current filter widget values (None while no data).
    pub bounds: Option<FilterBounds>,

    /// Kept / excluded indices for `bounds` (cached).
    pub partition: Partition,

    pub summary: Option<Summary>,

    /// Uncertainty colour scale over the kept rows.
    pub color_scale: Option<ColorScale>,

    pub show_excluded: bool,
    pub show_raw: bool,

    pub load_state: LoadState,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    pub lunar: LunarPage,

    cache: FetchCache,
    job: Option<FetchJob>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let lunar = LunarPage::load(&config.app_id_var, &config.app_secret_var);
        let cache = FetchCache::new(config.cache_ttl);
        Self {
            config,
            page: Page::Neo,
            dataset: None,
            bounds: None,
            partition: Partition::default(),
            summary: None,
            color_scale: None,
            show_excluded: false,
            show_raw: false,
            load_state: LoadState::NotLoaded,
            status_message: None,
            lunar,
            cache,
            job: None,
        }
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.config.source_label(), self.config.query)
    }

    pub fn is_loading(&self) -> bool {
        self.job.is_some()
    }

    /// Serve the dataset from cache, or start a background fetch.
    /// `on_done` runs on the worker thread when the fetch finishes.
    pub fn request_data(&mut self, on_done: impl FnOnce() + Send + 'static) {
        if self.job.is_some() {
            return;
        }
        let key = self.cache_key();
        if let Some(dataset) = self.cache.get(&key) {
            log::debug!("Cache hit for {key:?}");
            self.set_dataset(dataset);
            return;
        }
        log::info!("Fetching close approaches from {}", key.source);
        self.load_state = LoadState::Loading;
        self.status_message = None;
        self.job = Some(FetchJob::spawn(self.config.clone(), on_done));
    }

    /// Drop the cached entry and fetch again.
    pub fn reload(&mut self, on_done: impl FnOnce() + Send + 'static) {
        let key = self.cache_key();
        self.cache.invalidate(&key);
        self.request_data(on_done);
    }

    /// Collect a finished background fetch, if any.
    pub fn poll_fetch(&mut self) {
        let Some(result) = self.job.as_ref().and_then(|job| job.poll()) else {
            return;
        };
        self.job = None;

        match result {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} close approaches with columns {:?}",
                    dataset.len(),
                    dataset.fields
                );
                let dataset = Arc::new(dataset);
                self.cache.insert(self.cache_key(), Arc::clone(&dataset));
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load close approaches: {e:#}");
                self.load_state = LoadState::Failed(format!("{e:#}"));
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a dataset and reset the filters to their defaults.
    pub fn set_dataset(&mut self, dataset: Arc<NeoDataset>) {
        self.bounds = FilterBounds::initial(&dataset);
        self.dataset = Some(dataset);
        self.load_state = LoadState::Loaded;
        self.status_message = None;
        self.refilter();
    }

    pub fn set_bounds(&mut self, bounds: FilterBounds) {
        if self.bounds != Some(bounds) {
            self.bounds = Some(bounds);
            self.refilter();
        }
    }

    /// Recompute partition, summary and colour scale after a bounds change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.partition = match &self.bounds {
            Some(bounds) => partition(ds, bounds),
            None => Partition::all(ds),
        };
        self.summary = Some(Summary::of(ds, &self.partition));
        self.color_scale = ds
            .delta_range(&self.partition.kept)
            .map(|(lo, hi)| ColorScale::new(lo, hi, ColorScale::DEFAULT_BANDS));
    }
}
