use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::domain::models::Link;
use crate::repository::LinkStore;

pub struct LinkRepository {
    pool: SqlitePool,
}

impl LinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkStore for LinkRepository {
    async fn create(&self, scan_id: i64, link: &str) -> Result<i64> {
        let id = sqlx::query("INSERT INTO link (scan_id, link) VALUES (?, ?)")
            .bind(scan_id)
            .bind(link)
            .execute(&self.pool)
            .await
            .context("Failed to create link")?
            .last_insert_rowid();

        Ok(id)
    }

    async fn get_all(&self, scan_id: i64) -> Result<Vec<Link>> {
        let rows = sqlx::query("SELECT id, scan_id, link FROM link WHERE scan_id = ? ORDER BY id")
            .bind(scan_id)
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch links for scan")?;

        Ok(rows.iter().map(row_to_link).collect())
    }
}

fn row_to_link(row: &sqlx::sqlite::SqliteRow) -> Link {
    Link {
        id: row.get("id"),
        scan_id: row.get("scan_id"),
        link: row.get("link"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::sqlite::{ScanRepository, WebPageRepository};
    use crate::repository::{ScanStore, WebPageStore};
    use crate::test_utils::fixtures;

    #[tokio::test]
    async fn test_links_kept_verbatim_with_duplicates() {
        let pool = fixtures::setup_test_db().await;
        let page_id = WebPageRepository::new(pool.clone())
            .create(1, "https://links.test")
            .await
            .unwrap();
        let scan_id = ScanRepository::new(pool.clone())
            .create(page_id, fixtures::scan_time(), "")
            .await
            .unwrap();
        let repo = LinkRepository::new(pool);

        for href in [" /padded ", "#top", "#top"] {
            repo.create(scan_id, href).await.unwrap();
        }

        let links: Vec<String> = repo
            .get_all(scan_id)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.link)
            .collect();
        assert_eq!(links, vec![" /padded ", "#top", "#top"]);
    }
}
