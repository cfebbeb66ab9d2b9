use super::Stores;
use crate::domain::models::{Scan, WebPage};
use crate::error::{AppError, Result};

pub const WEB_PAGE_NOT_OWNED: &str = "Web page does not belong to current user";

/// Account-scoped access to tracked web pages and their scan history.
pub struct WebPageService {
    stores: Stores,
}

impl WebPageService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn list(&self, account_id: i64) -> Result<Vec<WebPage>> {
        self.stores
            .web_pages
            .get_all(account_id)
            .await
            .map_err(AppError::persistence)
    }

    pub async fn get_owner(&self, web_page_id: i64) -> Result<i64> {
        self.stores
            .web_pages
            .get_by_id(web_page_id)
            .await
            .map_err(AppError::persistence)?
            .map(|page| page.account_id)
            .ok_or(AppError::WebPageNotFound(web_page_id))
    }

    async fn ensure_owned(&self, web_page_id: i64, account_id: i64) -> Result<()> {
        if self.get_owner(web_page_id).await? != account_id {
            return Err(AppError::unauthorized(WEB_PAGE_NOT_OWNED));
        }
        Ok(())
    }

    pub async fn scans_for(&self, web_page_id: i64, account_id: i64) -> Result<Vec<Scan>> {
        self.ensure_owned(web_page_id, account_id).await?;
        self.stores
            .scans
            .get_all(web_page_id)
            .await
            .map_err(AppError::persistence)
    }

    /// Deletes the page and, by cascade, every scan, issue and link under it.
    pub async fn delete(&self, web_page_id: i64, account_id: i64) -> Result<()> {
        self.ensure_owned(web_page_id, account_id).await?;
        let deleted = self
            .stores
            .web_pages
            .delete(web_page_id)
            .await
            .map_err(AppError::persistence)?;
        if !deleted {
            return Err(AppError::WebPageNotFound(web_page_id));
        }
        log::info!("[DB] Deleted web page {} for account {}", web_page_id, account_id);
        Ok(())
    }
}
