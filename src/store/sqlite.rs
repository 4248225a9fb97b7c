//! SQLite-backed store (sqlx)

use super::{ComplaintStore, UserStore};
use crate::error::TriageError;
use crate::keywords::{normalize_word, KeywordConfig};
use crate::models::{
    ComplaintRecord, ComplaintSubmission, CustomerDetails, Metrics, Priority, Sentiment, Status,
    Urgency, User, DEFAULT_CATEGORY, TIMESTAMP_FORMAT,
};
use crate::Result;
use chrono::{DateTime, Local, NaiveDateTime};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::{info, warn};

const MAX_CONNECTIONS: u32 = 5;

const COMPLAINT_COLUMNS: &str = "id, complaint, category, sentiment, urgency, priority, action, \
status, date_logged, customer_name, account_number, email, phone";

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database and make sure the schema exists
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| TriageError::database("Invalid database URL", e))?
            .create_if_missing(true);

        // An in-memory database lives and dies with its single connection
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| TriageError::database("Failed to open database", e))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        info!("Complaint store backend: sqlite");
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS complaints (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              complaint TEXT NOT NULL,
              category TEXT NOT NULL,
              sentiment TEXT NOT NULL,
              urgency TEXT NOT NULL,
              priority TEXT NOT NULL,
              action TEXT NOT NULL,
              status TEXT NOT NULL DEFAULT 'Open',
              date_logged TEXT NOT NULL,
              customer_name TEXT,
              account_number TEXT,
              email TEXT,
              phone TEXT
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| TriageError::database("Failed to create complaints table", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS keywords (
              category TEXT NOT NULL,
              word TEXT NOT NULL,
              UNIQUE(category, word)
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| TriageError::database("Failed to create keywords table", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
              email TEXT PRIMARY KEY,
              password TEXT NOT NULL,
              full_name TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| TriageError::database("Failed to create users table", e))?;

        self.seed_keywords().await
    }

    /// Insert the built-in keywords into an empty keywords table
    async fn seed_keywords(&self) -> Result<()> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM keywords")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| TriageError::database("Failed to count keywords", e))?;

        if existing > 0 {
            return Ok(());
        }

        let defaults = KeywordConfig::builtin();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| TriageError::database("Failed to begin keyword seed", e))?;

        for (category, word) in defaults.pairs() {
            sqlx::query("INSERT OR IGNORE INTO keywords (category, word) VALUES (?, ?)")
                .bind(category)
                .bind(word)
                .execute(&mut *tx)
                .await
                .map_err(|e| TriageError::database("Failed to seed keyword", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| TriageError::database("Failed to commit keyword seed", e))?;

        info!(categories = defaults.len(), "Seeded default keywords");
        Ok(())
    }
}

fn parse_or<T: FromStr>(value: Option<String>, fallback: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(fallback)
}

fn record_from_row(row: &SqliteRow) -> ComplaintRecord {
    let id: i64 = row.try_get("id").unwrap_or_default();

    let date_logged = row
        .try_get::<String, _>("date_logged")
        .ok()
        .and_then(|raw| NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).ok())
        .unwrap_or_else(|| {
            warn!(id, "Unparseable date_logged, using the Unix epoch");
            DateTime::UNIX_EPOCH.naive_utc()
        });

    let optional = |column: &str| {
        row.try_get::<Option<String>, _>(column)
            .ok()
            .flatten()
            .filter(|v| !v.is_empty())
    };

    ComplaintRecord {
        id,
        complaint: row.try_get("complaint").unwrap_or_default(),
        category: row
            .try_get("category")
            .unwrap_or_else(|_| DEFAULT_CATEGORY.to_string()),
        sentiment: parse_or(row.try_get("sentiment").ok(), Sentiment::Neutral),
        urgency: parse_or(row.try_get("urgency").ok(), Urgency::Low),
        priority: parse_or(row.try_get("priority").ok(), Priority::P4),
        action: row.try_get("action").unwrap_or_default(),
        status: parse_or(row.try_get("status").ok(), Status::Open),
        date_logged,
        customer: CustomerDetails {
            customer_name: optional("customer_name"),
            account_number: optional("account_number"),
            email: optional("email"),
            phone: optional("phone"),
        },
    }
}

#[async_trait::async_trait]
impl ComplaintStore for SqliteStore {

    async fn append(&self, submissions: Vec<ComplaintSubmission>) -> Result<Vec<ComplaintRecord>> {
        let logged_at_text = Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string();
        let logged_at = NaiveDateTime::parse_from_str(&logged_at_text, TIMESTAMP_FORMAT)
            .unwrap_or_else(|_| Local::now().naive_local());

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| TriageError::database("Failed to begin complaint insert", e))?;

        let mut created = Vec::with_capacity(submissions.len());
        for submission in submissions {
            let result = sqlx::query(
                r#"
                INSERT INTO complaints
                  (complaint, category, sentiment, urgency, priority, action, status,
                   date_logged, customer_name, account_number, email, phone)
                VALUES
                  (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&submission.complaint)
            .bind(&submission.classification.category)
            .bind(submission.classification.sentiment.to_string())
            .bind(submission.classification.urgency.to_string())
            .bind(submission.classification.priority.label())
            .bind(&submission.classification.action)
            .bind(Status::Open.label())
            .bind(&logged_at_text)
            .bind(&submission.customer.customer_name)
            .bind(&submission.customer.account_number)
            .bind(&submission.customer.email)
            .bind(&submission.customer.phone)
            .execute(&mut *tx)
            .await
            .map_err(|e| TriageError::database("Failed to insert complaint", e))?;

            created.push(ComplaintRecord::from_submission(
                result.last_insert_rowid(),
                submission,
                logged_at,
            ));
        }

        tx.commit()
            .await
            .map_err(|e| TriageError::database("Failed to commit complaints", e))?;

        Ok(created)
    }

    async fn load_all(&self) -> Result<Vec<ComplaintRecord>> {
        let sql = format!("SELECT {} FROM complaints ORDER BY id ASC", COMPLAINT_COLUMNS);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TriageError::database("Failed to load complaints", e))?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<ComplaintRecord>> {
        let row = sqlx::query(&format!("SELECT {} FROM complaints WHERE id = ?", COMPLAINT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| TriageError::database("Failed to load complaint", e))?;

        Ok(row.as_ref().map(record_from_row))
    }

    async fn update_status(&self, id: i64, status: Status, action: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE complaints SET status = ?, action = ? WHERE id = ?")
            .bind(status.label())
            .bind(action)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| TriageError::database("Failed to update complaint", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn metrics(&self) -> Result<Metrics> {
        let row = sqlx::query(
            r#"
            SELECT
              COUNT(*) AS total,
              COALESCE(SUM(priority = ?), 0) AS critical,
              COALESCE(SUM(status = ?), 0) AS resolved
            FROM complaints
            "#,
        )
        .bind(Priority::P1.label())
        .bind(Status::Resolved.label())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TriageError::database("Failed to compute metrics", e))?;

        let count = |column: &str| row.try_get::<i64, _>(column).unwrap_or(0).max(0) as usize;

        Ok(Metrics {
            total: count("total"),
            critical: count("critical"),
            resolved: count("resolved"),
        })
    }

    async fn load_keywords(&self) -> Result<KeywordConfig> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT category, word FROM keywords ORDER BY rowid ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| TriageError::database("Failed to load keywords", e))?;

        Ok(KeywordConfig::from_pairs(rows))
    }

    async fn add_keyword(&self, category: &str, word: &str) -> Result<bool> {
        let category = category.trim();
        let word = normalize_word(word);
        if category.is_empty() || word.is_empty() {
            return Ok(false);
        }

        let result = sqlx::query("INSERT OR IGNORE INTO keywords (category, word) VALUES (?, ?)")
            .bind(category)
            .bind(&word)
            .execute(&self.pool)
            .await
            .map_err(|e| TriageError::database("Failed to add keyword", e))?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait::async_trait]
impl UserStore for SqliteStore {

    async fn create_user(&self, user: User) -> Result<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO users (email, password, full_name) VALUES (?, ?, ?)",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .execute(&self.pool)
        .await
        .map_err(|e| TriageError::database("Failed to create user", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_user(&self, email: &str) -> Result<Option<User>> {
        let row: Option<(String, String, String)> =
            sqlx::query_as("SELECT email, password, full_name FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| TriageError::database("Failed to load user", e))?;

        Ok(row.map(|(email, password_hash, full_name)| User {
            email,
            password_hash,
            full_name,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ComplaintClassifier;

    async fn memory_store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:").await.unwrap()
    }

    fn submission(text: &str, name: Option<&str>, account: Option<&str>) -> ComplaintSubmission {
        ComplaintSubmission {
            complaint: text.to_string(),
            classification: ComplaintClassifier::classify(text, &KeywordConfig::builtin()),
            customer: CustomerDetails {
                customer_name: name.map(str::to_string),
                account_number: account.map(str::to_string),
                email: None,
                phone: None,
            },
        }
    }

    #[tokio::test]
    async fn test_seeds_builtin_keywords_in_order() {
        let store = memory_store().await;
        let keywords = store.load_keywords().await.unwrap();
        assert_eq!(keywords, KeywordConfig::builtin());
    }

    #[tokio::test]
    async fn test_add_keyword_appends_and_rejects_duplicates() {
        let store = memory_store().await;
        assert!(store.add_keyword("Loan", "Mortgage").await.unwrap());
        assert!(!store.add_keyword("Loan", "mortgage").await.unwrap());
        assert!(store.add_keyword("Insurance", "policy").await.unwrap());

        let keywords = store.load_keywords().await.unwrap();
        assert_eq!(keywords.words("Loan").unwrap().last().unwrap(), "mortgage");
        assert_eq!(keywords.category_names().last(), Some("Insurance"));
    }

    #[tokio::test]
    async fn test_append_and_load_roundtrip() {
        let store = memory_store().await;
        let created = store
            .append(vec![
                submission("Unauthorized debit", Some("Rudresh Patil"), Some("1234567890")),
                submission("Where is my statement", None, None),
            ])
            .await
            .unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded[0].priority, Priority::P1);
        assert_eq!(loaded[1].customer.customer_name, None);
        assert_eq!(loaded[1].status, Status::Open);
    }

    #[tokio::test]
    async fn test_update_status_and_metrics() {
        let store = memory_store().await;
        store
            .append(vec![
                submission("Unauthorized debit", None, None),
                submission("loan emi query", None, None),
            ])
            .await
            .unwrap();

        assert!(store.update_status(2, Status::Resolved, "Explained EMI schedule").await.unwrap());
        assert!(!store.update_status(42, Status::Resolved, "n/a").await.unwrap());

        let record = store.get(2).await.unwrap().unwrap();
        assert_eq!(record.status, Status::Resolved);
        assert_eq!(record.action, "Explained EMI schedule");
        // classification is untouched by resolution
        assert_eq!(record.category, "Loan");

        let metrics = store.metrics().await.unwrap();
        assert_eq!(metrics, Metrics { total: 2, critical: 1, resolved: 1 });
    }

    #[tokio::test]
    async fn test_metrics_on_empty_table() {
        let store = memory_store().await;
        assert_eq!(store.metrics().await.unwrap(), Metrics::default());
    }

    #[tokio::test]
    async fn test_unparseable_date_is_stable_across_loads() {
        let store = memory_store().await;
        sqlx::query(
            "INSERT INTO complaints (complaint, category, sentiment, urgency, priority, action, date_logged)
             VALUES ('legacy row', 'General', 'Neutral', 'Low', 'P4 - Low', 'n/a', 'yesterday-ish')",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let first = store.get(1).await.unwrap().unwrap();
        let second = store.load_all().await.unwrap();
        assert_eq!(first.date_logged, DateTime::UNIX_EPOCH.naive_utc());
        assert_eq!(second[0].date_logged, first.date_logged);
        assert_eq!(first.status, Status::Open);
    }

    #[tokio::test]
    async fn test_users() {
        let store = memory_store().await;
        let user = User {
            email: "ops@bank.example".to_string(),
            password_hash: "$2b$04$hash".to_string(),
            full_name: "Ops Desk".to_string(),
        };
        assert!(store.create_user(user.clone()).await.unwrap());
        assert!(!store.create_user(user).await.unwrap());

        let found = store.find_user("ops@bank.example").await.unwrap().unwrap();
        assert_eq!(found.full_name, "Ops Desk");
    }
}
