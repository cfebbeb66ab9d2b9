pub mod fetcher;
pub mod http;
pub mod scan_service;
pub mod web_page_service;

pub use fetcher::{HtmlFetcher, HttpFetcher};
pub use scan_service::{ScanService, ScanState};
pub use web_page_service::WebPageService;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::repository::sqlite::{IssueRepository, LinkRepository, ScanRepository, WebPageRepository};
use crate::repository::{IssueStore, LinkStore, ScanStore, WebPageStore};

/// The four persistence seams shared by the scan and web page services.
#[derive(Clone)]
pub struct Stores {
    pub web_pages: Arc<dyn WebPageStore>,
    pub scans: Arc<dyn ScanStore>,
    pub issues: Arc<dyn IssueStore>,
    pub links: Arc<dyn LinkStore>,
}

impl Stores {
    pub fn sqlite(pool: SqlitePool) -> Self {
        Self {
            web_pages: Arc::new(WebPageRepository::new(pool.clone())),
            scans: Arc::new(ScanRepository::new(pool.clone())),
            issues: Arc::new(IssueRepository::new(pool.clone())),
            links: Arc::new(LinkRepository::new(pool)),
        }
    }
}
