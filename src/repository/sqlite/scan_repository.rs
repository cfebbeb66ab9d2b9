use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::domain::models::Scan;
use crate::repository::ScanStore;

pub struct ScanRepository {
    pool: SqlitePool,
}

impl ScanRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScanStore for ScanRepository {
    async fn create(
        &self,
        web_page_id: i64,
        time_scanned: DateTime<Utc>,
        html_content: &str,
    ) -> Result<i64> {
        let id = sqlx::query(
            "INSERT INTO scan (web_page_id, time_scanned, html_content) VALUES (?, ?, ?)",
        )
        .bind(web_page_id)
        .bind(time_scanned)
        .bind(html_content)
        .execute(&self.pool)
        .await
        .context("Failed to create scan")?
        .last_insert_rowid();

        log::debug!("[DB] Created scan {} for web page {}", id, web_page_id);
        Ok(id)
    }

    async fn get_owner_web_page_id(&self, scan_id: i64) -> Result<Option<i64>> {
        let web_page_id = sqlx::query_scalar::<_, i64>("SELECT web_page_id FROM scan WHERE id = ?")
            .bind(scan_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch scan owner page")?;

        Ok(web_page_id)
    }

    async fn get_owner_account_id(&self, scan_id: i64) -> Result<Option<i64>> {
        let account_id = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT w.account_id
            FROM scan s
            JOIN web_page w ON w.id = s.web_page_id
            WHERE s.id = ?
            "#,
        )
        .bind(scan_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch scan owner account")?;

        Ok(account_id)
    }

    async fn get_all(&self, web_page_id: i64) -> Result<Vec<Scan>> {
        let rows = sqlx::query(
            r#"
            SELECT id, web_page_id, time_scanned, html_content
            FROM scan
            WHERE web_page_id = ?
            ORDER BY id
            "#,
        )
        .bind(web_page_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch scans for web page")?;

        rows.iter().map(row_to_scan).collect()
    }
}

fn row_to_scan(row: &sqlx::sqlite::SqliteRow) -> Result<Scan> {
    Ok(Scan {
        id: row.get("id"),
        web_page_id: row.get("web_page_id"),
        time_scanned: row
            .try_get("time_scanned")
            .context("Failed to decode scan timestamp")?,
        html_content: row.get("html_content"),
    })
}
