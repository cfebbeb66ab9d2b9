use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::models::*;

pub mod sqlite;

#[async_trait]
pub trait WebPageStore: Send + Sync {
    /// First page registered for this account and URL, if any.
    async fn get(&self, account_id: i64, url: &str) -> Result<Option<WebPage>>;
    async fn get_by_id(&self, id: i64) -> Result<Option<WebPage>>;
    async fn create(&self, account_id: i64, url: &str) -> Result<i64>;
    async fn get_all(&self, account_id: i64) -> Result<Vec<WebPage>>;
    /// Removes the page with its scans, issues and links. Returns false when nothing was deleted.
    async fn delete(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait ScanStore: Send + Sync {
    async fn create(&self, web_page_id: i64, time_scanned: DateTime<Utc>, html_content: &str)
        -> Result<i64>;
    async fn get_owner_web_page_id(&self, scan_id: i64) -> Result<Option<i64>>;
    async fn get_owner_account_id(&self, scan_id: i64) -> Result<Option<i64>>;
    async fn get_all(&self, web_page_id: i64) -> Result<Vec<Scan>>;
}

#[async_trait]
pub trait IssueStore: Send + Sync {
    async fn create(&self, scan_id: i64, issue_type: IssueType, html_snippet: &str) -> Result<i64>;
    async fn get_all(&self, scan_id: i64) -> Result<Vec<Issue>>;
}

#[async_trait]
pub trait LinkStore: Send + Sync {
    async fn create(&self, scan_id: i64, link: &str) -> Result<i64>;
    async fn get_all(&self, scan_id: i64) -> Result<Vec<Link>>;
}
