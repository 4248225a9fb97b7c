//! Persistence layer
//!
//! Complaints, keyword configuration and operator accounts.
//! `InMemoryStore` for development and tests, `SqliteStore` for deployments.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use crate::keywords::KeywordConfig;
use crate::models::{ComplaintRecord, ComplaintSubmission, Metrics, Status, User};
use crate::Result;

/// Trait for complaint and keyword persistence
#[async_trait::async_trait]
pub trait ComplaintStore: Send + Sync {
    /// Persist a batch; ids are assigned here and every record starts Open
    async fn append(&self, submissions: Vec<ComplaintSubmission>) -> Result<Vec<ComplaintRecord>>;

    /// All records ordered by id
    async fn load_all(&self) -> Result<Vec<ComplaintRecord>>;

    async fn get(&self, id: i64) -> Result<Option<ComplaintRecord>>;

    /// Returns `false` when no complaint has this id
    async fn update_status(&self, id: i64, status: Status, action: &str) -> Result<bool>;

    async fn metrics(&self) -> Result<Metrics> {
        let records = self.load_all().await?;
        Ok(Metrics::from_records(&records))
    }

    /// Keyword configuration in insertion order
    async fn load_keywords(&self) -> Result<KeywordConfig>;

    /// Returns `false` when the word already exists for the category
    async fn add_keyword(&self, category: &str, word: &str) -> Result<bool>;
}

/// Trait for operator account persistence
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Returns `false` when the email is already registered
    async fn create_user(&self, user: User) -> Result<bool>;

    async fn find_user(&self, email: &str) -> Result<Option<User>>;
}

/// Everything the service needs from storage
pub trait Store: ComplaintStore + UserStore {}

impl<T: ComplaintStore + UserStore> Store for T {}
