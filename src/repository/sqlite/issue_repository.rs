use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::domain::models::{Issue, IssueType};
use crate::repository::IssueStore;

pub struct IssueRepository {
    pool: SqlitePool,
}

impl IssueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IssueStore for IssueRepository {
    async fn create(&self, scan_id: i64, issue_type: IssueType, html_snippet: &str) -> Result<i64> {
        let id = sqlx::query(
            "INSERT INTO issue (scan_id, issue_type, html_snippet) VALUES (?, ?, ?)",
        )
        .bind(scan_id)
        .bind(issue_type.as_str())
        .bind(html_snippet)
        .execute(&self.pool)
        .await
        .context("Failed to create issue")?
        .last_insert_rowid();

        Ok(id)
    }

    /// Issues of a scan in insertion order, which is registry order.
    async fn get_all(&self, scan_id: i64) -> Result<Vec<Issue>> {
        let rows = sqlx::query(
            r#"
            SELECT id, scan_id, issue_type, html_snippet
            FROM issue
            WHERE scan_id = ?
            ORDER BY id
            "#,
        )
        .bind(scan_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch issues for scan")?;

        rows.iter().map(row_to_issue).collect()
    }
}

fn row_to_issue(row: &sqlx::sqlite::SqliteRow) -> Result<Issue> {
    let issue_type: IssueType = row.get::<String, _>("issue_type").parse()?;
    Ok(Issue {
        id: row.get("id"),
        scan_id: row.get("scan_id"),
        issue_type,
        html_snippet: row.get("html_snippet"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::sqlite::{ScanRepository, WebPageRepository};
    use crate::repository::{ScanStore, WebPageStore};
    use crate::test_utils::fixtures;

    async fn seed_scan(pool: &SqlitePool) -> i64 {
        let page_id = WebPageRepository::new(pool.clone())
            .create(1, "https://issues.test")
            .await
            .unwrap();
        ScanRepository::new(pool.clone())
            .create(page_id, fixtures::scan_time(), "<html></html>")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_issues_round_trip_in_order() {
        let pool = fixtures::setup_test_db().await;
        let scan_id = seed_scan(&pool).await;
        let repo = IssueRepository::new(pool);

        let first = repo
            .create(scan_id, IssueType::TimeLimits, "<meta/>")
            .await
            .unwrap();
        let second = repo
            .create(scan_id, IssueType::AltTextMissing, r#"<img src="a.png"/>"#)
            .await
            .unwrap();

        let issues = repo.get_all(scan_id).await.unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].id, first);
        assert_eq!(issues[0].issue_type, IssueType::TimeLimits);
        assert_eq!(issues[1].id, second);
        assert_eq!(issues[1].html_snippet, r#"<img src="a.png"/>"#);
        assert!(issues.iter().all(|i| i.scan_id == scan_id && i.is_persisted()));
    }

    #[tokio::test]
    async fn test_issue_type_stored_by_name() {
        let pool = fixtures::setup_test_db().await;
        let scan_id = seed_scan(&pool).await;
        let repo = IssueRepository::new(pool.clone());

        repo.create(scan_id, IssueType::SampleIssue, "x").await.unwrap();

        let stored: String = sqlx::query_scalar("SELECT issue_type FROM issue")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, "SAMPLE_ISSUE");
    }

    #[tokio::test]
    async fn test_unknown_stored_type_fails_to_load() {
        let pool = fixtures::setup_test_db().await;
        let scan_id = seed_scan(&pool).await;

        sqlx::query("INSERT INTO issue (scan_id, issue_type, html_snippet) VALUES (?, 'BOGUS', '')")
            .bind(scan_id)
            .execute(&pool)
            .await
            .unwrap();

        assert!(IssueRepository::new(pool).get_all(scan_id).await.is_err());
    }
}
