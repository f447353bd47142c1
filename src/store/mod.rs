pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Case, Draft, Payment, Role, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("email already registered")]
    DuplicateEmail,

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateEmail,
            _ => StoreError::Database(err.to_string()),
        }
    }
}

/// Role-based visibility filter for case lists: lawyers see the cases
/// where they are the recorded lawyer, clients where they are the client.
#[derive(Debug, Clone, Copy)]
pub enum CaseScope {
    Lawyer(Uuid),
    Client(Uuid),
}

impl CaseScope {
    pub fn for_user(user: &User) -> Self {
        match user.role {
            Role::Lawyer => CaseScope::Lawyer(user.id),
            Role::Client => CaseScope::Client(user.id),
        }
    }
}

/// Persistence port for the identity and resource stores. Single-document
/// writes are atomic at this boundary; concurrent updates to the same
/// resource race with last-write-wins semantics.
#[async_trait]
pub trait Store: Send + Sync {
    // Identity store
    async fn create_user(&self, user: User) -> Result<User, StoreError>;
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn update_user(&self, user: User) -> Result<User, StoreError>;

    // Case store
    async fn create_case(&self, case: Case) -> Result<Case, StoreError>;
    async fn case_by_id(&self, id: Uuid) -> Result<Option<Case>, StoreError>;
    async fn cases_in_scope(&self, scope: CaseScope) -> Result<Vec<Case>, StoreError>;
    async fn update_case(&self, case: Case) -> Result<Case, StoreError>;

    // Draft store
    async fn create_draft(&self, draft: Draft) -> Result<Draft, StoreError>;
    async fn draft_by_id(&self, id: Uuid) -> Result<Option<Draft>, StoreError>;
    async fn update_draft(&self, draft: Draft) -> Result<Draft, StoreError>;

    // Payment store
    async fn create_payment(&self, payment: Payment) -> Result<Payment, StoreError>;
    async fn payment_by_id(&self, id: Uuid) -> Result<Option<Payment>, StoreError>;
    async fn payment_by_provider_order(
        &self,
        provider_order_id: &str,
    ) -> Result<Option<Payment>, StoreError>;
    async fn update_payment(&self, payment: Payment) -> Result<Payment, StoreError>;
}
