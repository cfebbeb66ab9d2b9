//! Scan orchestration: fetch a page, run every checker over it and persist the snapshot.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use super::fetcher::HtmlFetcher;
use super::Stores;
use crate::checker::CheckerRegistry;
use crate::domain::models::{Issue, Link, Scan, ScanReport, WebPage};
use crate::error::{AppError, Result};
use crate::extractor::{HtmlParser, LinkExtractor};

pub const SCAN_NOT_OWNED: &str = "Scan does not belong to current user";

/// Stages a single scan moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Fetching,
    Parsing,
    Checking,
    Persisting,
    LinkExtracting,
    Complete,
    Failed,
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanState::Idle => "idle",
            ScanState::Fetching => "fetching",
            ScanState::Parsing => "parsing",
            ScanState::Checking => "checking",
            ScanState::Persisting => "persisting",
            ScanState::LinkExtracting => "link-extracting",
            ScanState::Complete => "complete",
            ScanState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks and logs the stage of one scan.
struct Progress<'a> {
    url: &'a str,
    state: ScanState,
}

impl<'a> Progress<'a> {
    fn new(url: &'a str) -> Self {
        Self {
            url,
            state: ScanState::Idle,
        }
    }

    fn advance(&mut self, next: ScanState) {
        log::debug!("[SCAN] {}: {} -> {}", self.url, self.state, next);
        self.state = next;
    }

    fn fail(&mut self, err: &AppError) {
        log::warn!("[SCAN] {} failed while {}: {}", self.url, self.state, err);
        self.state = ScanState::Failed;
    }
}

pub struct ScanService {
    registry: Arc<CheckerRegistry>,
    parser: Arc<dyn HtmlParser>,
    fetcher: Arc<dyn HtmlFetcher>,
    stores: Stores,
}

impl ScanService {
    pub fn new(
        registry: Arc<CheckerRegistry>,
        parser: Arc<dyn HtmlParser>,
        fetcher: Arc<dyn HtmlFetcher>,
        stores: Stores,
    ) -> Self {
        Self {
            registry,
            parser,
            fetcher,
            stores,
        }
    }

    /// Fetches `url`, checks it and records a new scan for `account_id`.
    ///
    /// Nothing is written when the fetch fails. The web page is looked up or created
    /// only after a successful fetch; the lookup and create are not atomic.
    #[tracing::instrument(skip(self), fields(checkers = self.registry.len()))]
    pub async fn scan_from(&self, url: &str, account_id: i64) -> Result<ScanReport> {
        let mut progress = Progress::new(url);
        let result = self.run(url, account_id, &mut progress).await;
        if let Err(err) = &result {
            progress.fail(err);
        }
        result
    }

    /// Same as `scan_from`, abandoned with `AppError::Cancelled` as soon as `token` fires.
    pub async fn scan_from_cancellable(
        &self,
        url: &str,
        account_id: i64,
        token: CancellationToken,
    ) -> Result<ScanReport> {
        if token.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        tokio::select! {
            report = self.scan_from(url, account_id) => report,
            _ = token.cancelled() => {
                log::warn!("[SCAN] {} cancelled", url);
                Err(AppError::Cancelled)
            }
        }
    }

    async fn run(&self, url: &str, account_id: i64, progress: &mut Progress<'_>) -> Result<ScanReport> {
        progress.advance(ScanState::Fetching);
        let html = self.fetcher.fetch(url).await?;

        let web_page = self.resolve_web_page(account_id, url).await?;

        progress.advance(ScanState::Parsing);
        // The parsed document is not Send; it must be gone before the next await.
        let (found, hrefs) = {
            let document = self.parser.parse(&html);
            progress.advance(ScanState::Checking);
            let found = self.registry.check_all(&document)?;
            let hrefs = LinkExtractor::extract_links(&document);
            (found, hrefs)
        };
        log::info!(
            "[SCAN] {} produced {} issue(s) and {} link(s)",
            url,
            found.len(),
            hrefs.len()
        );

        progress.advance(ScanState::Persisting);
        let time_scanned = Utc::now();
        let scan_id = self
            .stores
            .scans
            .create(web_page.id, time_scanned, &html)
            .await
            .map_err(AppError::persistence)?;

        let mut issues = Vec::with_capacity(found.len());
        for issue in found {
            let issue = issue.with_scan_id(scan_id);
            let id = self
                .stores
                .issues
                .create(scan_id, issue.issue_type, &issue.html_snippet)
                .await
                .map_err(AppError::persistence)?;
            issues.push(issue.with_id(id));
        }

        progress.advance(ScanState::LinkExtracting);
        let mut links = Vec::with_capacity(hrefs.len());
        for link in hrefs {
            let id = self
                .stores
                .links
                .create(scan_id, &link)
                .await
                .map_err(AppError::persistence)?;
            links.push(Link { id, scan_id, link });
        }

        progress.advance(ScanState::Complete);
        Ok(ScanReport {
            scan: Scan {
                id: scan_id,
                web_page_id: web_page.id,
                time_scanned,
                html_content: html,
            },
            issues,
            links,
        })
    }

    async fn resolve_web_page(&self, account_id: i64, url: &str) -> Result<WebPage> {
        let existing = self
            .stores
            .web_pages
            .get(account_id, url)
            .await
            .map_err(AppError::persistence)?;
        if let Some(page) = existing {
            return Ok(page);
        }

        let id = self
            .stores
            .web_pages
            .create(account_id, url)
            .await
            .map_err(AppError::persistence)?;
        log::info!("[SCAN] Tracking new web page {} for account {}", url, account_id);
        Ok(WebPage {
            id,
            account_id,
            url: url.to_string(),
        })
    }

    /// Account that owns the scan, through its web page.
    pub async fn get_owner(&self, scan_id: i64) -> Result<i64> {
        self.stores
            .scans
            .get_owner_account_id(scan_id)
            .await
            .map_err(AppError::persistence)?
            .ok_or(AppError::ScanNotFound(scan_id))
    }

    pub async fn get_owner_web_page_id(&self, scan_id: i64) -> Result<i64> {
        self.stores
            .scans
            .get_owner_web_page_id(scan_id)
            .await
            .map_err(AppError::persistence)?
            .ok_or(AppError::ScanNotFound(scan_id))
    }

    async fn ensure_owned(&self, scan_id: i64, account_id: i64) -> Result<()> {
        if self.get_owner(scan_id).await? != account_id {
            return Err(AppError::unauthorized(SCAN_NOT_OWNED));
        }
        Ok(())
    }

    pub async fn issues_for(&self, scan_id: i64, account_id: i64) -> Result<Vec<Issue>> {
        self.ensure_owned(scan_id, account_id).await?;
        self.stores
            .issues
            .get_all(scan_id)
            .await
            .map_err(AppError::persistence)
    }

    pub async fn links_for(&self, scan_id: i64, account_id: i64) -> Result<Vec<Link>> {
        self.ensure_owned(scan_id, account_id).await?;
        self.stores
            .links
            .get_all(scan_id)
            .await
            .map_err(AppError::persistence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::Checker;
    use crate::domain::models::IssueType;
    use crate::extractor::{Document, ScraperHtmlParser};
    use crate::test_utils::{fixtures, mocks};

    struct NeverChecker;

    impl Checker for NeverChecker {
        fn name(&self) -> &'static str {
            "Never"
        }

        fn check(&self, _document: &Document) -> Vec<Issue> {
            Vec::new()
        }
    }

    async fn service_with(fetcher: Arc<dyn HtmlFetcher>, registry: CheckerRegistry) -> (ScanService, Stores) {
        let pool = fixtures::setup_test_db().await;
        let stores = Stores::sqlite(pool);
        let service = ScanService::new(
            Arc::new(registry),
            Arc::new(ScraperHtmlParser),
            fetcher,
            stores.clone(),
        );
        (service, stores)
    }

    #[tokio::test]
    async fn test_scan_stamps_issues_and_links() {
        let fetcher = Arc::new(mocks::StubFetcher::page(mocks::five_images_html()));
        let registry = CheckerRegistry::new(vec![Box::new(crate::checker::rules::AltTextChecker)]);
        let (service, _stores) = service_with(fetcher.clone(), registry).await;

        let report = service.scan_from("https://gallery.test", 5).await.unwrap();

        assert_eq!(fetcher.calls(), 1);
        assert_eq!(report.issues.len(), 3);
        for issue in &report.issues {
            assert!(issue.is_persisted());
            assert_eq!(issue.scan_id, report.scan.id);
            assert_eq!(issue.issue_type, IssueType::AltTextMissing);
        }
        assert_eq!(report.scan.html_content, mocks::five_images_html());
        assert!(report.links.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_page_writes_nothing() {
        let fetcher = Arc::new(mocks::StubFetcher::unreachable());
        let registry = CheckerRegistry::new(vec![Box::new(NeverChecker)]);
        let (service, stores) = service_with(fetcher, registry).await;

        let result = service.scan_from("https://down.test", 1).await;

        assert!(matches!(result, Err(AppError::FetchFailed(_))));
        assert!(stores.web_pages.get_all(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_token_aborts_scan() {
        let fetcher = Arc::new(mocks::StubFetcher::page("<p>x</p>"));
        let registry = CheckerRegistry::new(vec![Box::new(NeverChecker)]);
        let (service, stores) = service_with(fetcher.clone(), registry).await;
        let token = CancellationToken::new();
        token.cancel();

        let result = service
            .scan_from_cancellable("https://cancel.test", 1, token)
            .await;

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert_eq!(fetcher.calls(), 0);
        assert!(stores.web_pages.get_all(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_owner_of_missing_scan_is_not_found() {
        let fetcher = Arc::new(mocks::StubFetcher::page("<p>x</p>"));
        let registry = CheckerRegistry::new(vec![Box::new(NeverChecker)]);
        let (service, _stores) = service_with(fetcher, registry).await;

        assert!(matches!(service.get_owner(77).await, Err(AppError::ScanNotFound(77))));
        assert!(matches!(
            service.issues_for(77, 1).await,
            Err(AppError::ScanNotFound(77))
        ));
    }

    #[tokio::test]
    async fn test_foreign_account_cannot_read_scan() {
        let fetcher = Arc::new(mocks::StubFetcher::page(mocks::basic_html_page("T", "H")));
        let registry = CheckerRegistry::new(vec![Box::new(NeverChecker)]);
        let (service, _stores) = service_with(fetcher, registry).await;

        let report = service.scan_from("https://mine.test", 1).await.unwrap();
        let scan_id = report.scan.id;

        assert_eq!(service.get_owner(scan_id).await.unwrap(), 1);
        assert_eq!(
            service.get_owner_web_page_id(scan_id).await.unwrap(),
            report.scan.web_page_id
        );
        assert_eq!(service.links_for(scan_id, 1).await.unwrap(), report.links);
        match service.links_for(scan_id, 2).await {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, SCAN_NOT_OWNED),
            other => panic!("expected unauthorized, got {:?}", other),
        }
    }
}
