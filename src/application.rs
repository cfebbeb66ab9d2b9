//! Application layer - wires the checkers, fetcher and stores into services
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::checker::{CheckerRegistry, WhatlangDetector};
use crate::config::ScannerConfig;
use crate::extractor::ScraperHtmlParser;
use crate::service::{HttpFetcher, ScanService, Stores, WebPageService};

/// Production wiring: the standard checker set, the HTTP fetcher and SQLite stores.
pub struct Application {
    pub scans: ScanService,
    pub web_pages: WebPageService,
}

impl Application {
    pub fn new(config: &ScannerConfig, pool: SqlitePool) -> anyhow::Result<Self> {
        let registry = CheckerRegistry::standard(Arc::new(WhatlangDetector));
        log::debug!("[CHECK] Registered checkers: {:?}", registry.checker_names());

        let stores = Stores::sqlite(pool);
        let fetcher = HttpFetcher::from_config(config)?;
        Ok(Self {
            scans: ScanService::new(
                Arc::new(registry),
                Arc::new(ScraperHtmlParser),
                Arc::new(fetcher),
                stores.clone(),
            ),
            web_pages: WebPageService::new(stores),
        })
    }
}
