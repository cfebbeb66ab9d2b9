use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::domain::models::WebPage;
use crate::repository::WebPageStore;

pub struct WebPageRepository {
    pool: SqlitePool,
}

impl WebPageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WebPageStore for WebPageRepository {
    async fn get(&self, account_id: i64, url: &str) -> Result<Option<WebPage>> {
        let row = sqlx::query(
            r#"
            SELECT id, account_id, url
            FROM web_page
            WHERE account_id = ? AND url = ?
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(account_id)
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up web page")?;

        Ok(row.map(|row| row_to_web_page(&row)))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<WebPage>> {
        let row = sqlx::query("SELECT id, account_id, url FROM web_page WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch web page by id")?;

        Ok(row.map(|row| row_to_web_page(&row)))
    }

    async fn create(&self, account_id: i64, url: &str) -> Result<i64> {
        let id = sqlx::query("INSERT INTO web_page (account_id, url) VALUES (?, ?)")
            .bind(account_id)
            .bind(url)
            .execute(&self.pool)
            .await
            .context("Failed to create web page")?
            .last_insert_rowid();

        log::debug!("[DB] Created web page {} for account {}", id, account_id);
        Ok(id)
    }

    async fn get_all(&self, account_id: i64) -> Result<Vec<WebPage>> {
        let rows = sqlx::query(
            "SELECT id, account_id, url FROM web_page WHERE account_id = ? ORDER BY id",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch web pages for account")?;

        Ok(rows.iter().map(row_to_web_page).collect())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM web_page WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete web page")?
            .rows_affected();

        Ok(affected > 0)
    }
}

fn row_to_web_page(row: &sqlx::sqlite::SqliteRow) -> WebPage {
    WebPage {
        id: row.get("id"),
        account_id: row.get("account_id"),
        url: row.get("url"),
    }
}
