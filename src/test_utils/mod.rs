//! Shared test utilities and fixtures
//!
//! Fixtures build an in-memory database, mocks stand in for the network and the
//! language detector, and assertions keep checker tests short.

#[cfg(test)]
pub mod fixtures {
    use chrono::{DateTime, TimeZone, Utc};
    use sqlx::SqlitePool;

    /// Creates an in-memory SQLite database with migrations applied
    pub async fn setup_test_db() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        sqlx::migrate!().run(&pool).await.expect("Failed to run migrations");
        pool
    }

    /// A fixed instant so persisted scans compare equal across runs
    pub fn scan_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }
}

/// Helper assertions for tests
#[cfg(test)]
pub mod assertions {
    use crate::domain::models::{Issue, IssueType};

    /// Checks if issues contain a specific issue type
    pub fn has_issue(issues: &[Issue], issue_type: IssueType) -> bool {
        issues.iter().any(|i| i.issue_type == issue_type)
    }

    /// Counts issues of a specific type
    pub fn count_issues(issues: &[Issue], issue_type: IssueType) -> usize {
        issues.iter().filter(|i| i.issue_type == issue_type).count()
    }

    /// Asserts that a result contains the expected issue
    #[macro_export]
    macro_rules! assert_has_issue {
        ($issues:expr, $issue_type:expr) => {
            assert!(
                $crate::test_utils::assertions::has_issue($issues, $issue_type),
                "Expected to find issue '{}' but it was not present",
                $issue_type
            );
        };
    }

    /// Asserts that a result does NOT contain the specified issue
    #[macro_export]
    macro_rules! assert_no_issue {
        ($issues:expr, $issue_type:expr) => {
            assert!(
                !$crate::test_utils::assertions::has_issue($issues, $issue_type),
                "Expected NOT to find issue '{}' but it was present",
                $issue_type
            );
        };
    }
}

/// Stand-ins for the network and language detection
#[cfg(test)]
pub mod mocks {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::checker::LanguageDetector;
    use crate::error::{AppError, Result};
    use crate::service::fetcher::HtmlFetcher;

    /// Creates a standard HTML page for testing
    pub fn basic_html_page(title: &str, h1: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
    <head><title>{}</title></head>
    <body>
        <h1>{}</h1>
        <p>Some content here.</p>
        <a href="/about">About us</a>
    </body>
</html>"#,
            title, h1
        )
    }

    /// Heading, button and five images, two of them with alt text
    pub fn five_images_html() -> String {
        r#"<!DOCTYPE html>
<html lang="en">
<head><title>Images</title></head>
<body>
    <h1>Gallery</h1>
    <button>Next</button>
    <img src="img_1.jpg" alt="First image">
    <img src="img_2.jpg">
    <img src="img_3.jpg" alt="Third image">
    <img src="img_4.jpg">
    <img src="img_5.jpg">
</body>
</html>"#
            .to_string()
    }

    /// A page that trips most rules at least once
    pub fn kitchen_sink_html() -> String {
        include_str!("kitchen_sink.html").to_string()
    }

    /// Language detector with canned answers
    pub struct StubLanguageDetector {
        keyword: Option<(&'static str, &'static str)>,
        fallback: Option<&'static str>,
    }

    impl StubLanguageDetector {
        /// Always reports `code`
        pub fn fixed(code: &'static str) -> Self {
            Self {
                keyword: None,
                fallback: Some(code),
            }
        }

        /// Reports `code` when the text mentions `keyword`, otherwise `fallback`
        pub fn keyword(keyword: &'static str, code: &'static str, fallback: &'static str) -> Self {
            Self {
                keyword: Some((keyword, code)),
                fallback: Some(fallback),
            }
        }

        /// Never confident enough to answer
        pub fn unsure() -> Self {
            Self {
                keyword: None,
                fallback: None,
            }
        }
    }

    impl LanguageDetector for StubLanguageDetector {
        fn detect(&self, text: &str) -> Option<String> {
            if let Some((keyword, code)) = self.keyword {
                if text.to_lowercase().contains(keyword) {
                    return Some(code.to_string());
                }
            }
            self.fallback.map(str::to_string)
        }
    }

    enum StubResponse {
        Page(String),
        InvalidUrl,
        Unreachable,
    }

    /// Fetcher that never touches the network and counts how often it was asked
    pub struct StubFetcher {
        response: StubResponse,
        calls: AtomicUsize,
    }

    impl StubFetcher {
        pub fn page(html: impl Into<String>) -> Self {
            Self::with(StubResponse::Page(html.into()))
        }

        pub fn invalid_url() -> Self {
            Self::with(StubResponse::InvalidUrl)
        }

        pub fn unreachable() -> Self {
            Self::with(StubResponse::Unreachable)
        }

        fn with(response: StubResponse) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HtmlFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                StubResponse::Page(html) => Ok(html.clone()),
                StubResponse::InvalidUrl => Err(AppError::InvalidUrl(url.to_string())),
                StubResponse::Unreachable => Err(AppError::fetch(format!("{url} is unreachable"))),
            }
        }
    }
}
