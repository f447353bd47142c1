//! Postgres-backed store. Queries are runtime-checked; nested documents
//! (attachments, subscription, draft content, AI metadata) live in JSONB
//! columns.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::config;
use crate::models::{
    Attachment, Case, CaseStatus, Country, Draft, DraftStatus, Payment, PaymentProvider,
    PaymentStatus, Role, Subscription, User,
};

use super::{CaseScope, Store, StoreError};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with exponential backoff on the initial handshake. This is
    /// the only automatic retry in the service; everything after startup
    /// fails fast.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let db = &config::config().database;
        let mut attempt: u32 = 0;
        loop {
            let result = PgPoolOptions::new()
                .max_connections(db.max_connections)
                .connect(database_url)
                .await;
            match result {
                Ok(pool) => return Ok(Self { pool }),
                Err(err) if attempt < db.connect_max_retries => {
                    attempt += 1;
                    let delay =
                        Duration::from_millis(db.connect_base_delay_ms * 2u64.pow(attempt));
                    tracing::warn!(
                        "database connection failed (attempt {}), retrying in {:?}: {}",
                        attempt,
                        delay,
                        err
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn json_column<T: serde::de::DeserializeOwned>(
    row: &PgRow,
    column: &str,
) -> Result<T, StoreError> {
    let value: serde_json::Value = row
        .try_get(column)
        .map_err(|e| StoreError::Database(e.to_string()))?;
    serde_json::from_value(value)
        .map_err(|e| StoreError::Database(format!("bad {} document: {}", column, e)))
}

fn enum_column<T>(
    row: &PgRow,
    column: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, StoreError> {
    let raw: String = row
        .try_get(column)
        .map_err(|e| StoreError::Database(e.to_string()))?;
    parse(&raw).ok_or_else(|| StoreError::Database(format!("bad {} value: {}", column, raw)))
}

fn user_from_row(row: &PgRow) -> Result<User, StoreError> {
    Ok(User {
        id: row.try_get("id").map_err(|e| StoreError::Database(e.to_string()))?,
        name: row.try_get("name").map_err(|e| StoreError::Database(e.to_string()))?,
        email: row.try_get("email").map_err(|e| StoreError::Database(e.to_string()))?,
        password_hash: row
            .try_get("password_hash")
            .map_err(|e| StoreError::Database(e.to_string()))?,
        role: enum_column(row, "role", Role::parse)?,
        country: enum_column(row, "country", Country::parse)?,
        bar_number: row
            .try_get("bar_number")
            .map_err(|e| StoreError::Database(e.to_string()))?,
        is_firm: row.try_get("is_firm").map_err(|e| StoreError::Database(e.to_string()))?,
        firm_name: row
            .try_get("firm_name")
            .map_err(|e| StoreError::Database(e.to_string()))?,
        firm_logo_url: row
            .try_get("firm_logo_url")
            .map_err(|e| StoreError::Database(e.to_string()))?,
        phone: row.try_get("phone").map_err(|e| StoreError::Database(e.to_string()))?,
        address: row.try_get("address").map_err(|e| StoreError::Database(e.to_string()))?,
        subscription: json_column::<Subscription>(row, "subscription")?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| StoreError::Database(e.to_string()))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| StoreError::Database(e.to_string()))?,
    })
}

fn case_from_row(row: &PgRow) -> Result<Case, StoreError> {
    Ok(Case {
        id: row.try_get("id").map_err(|e| StoreError::Database(e.to_string()))?,
        title: row.try_get("title").map_err(|e| StoreError::Database(e.to_string()))?,
        description: row
            .try_get("description")
            .map_err(|e| StoreError::Database(e.to_string()))?,
        status: enum_column(row, "status", CaseStatus::parse)?,
        jurisdiction: row
            .try_get("jurisdiction")
            .map_err(|e| StoreError::Database(e.to_string()))?,
        court_name: row
            .try_get("court_name")
            .map_err(|e| StoreError::Database(e.to_string()))?,
        lawyer: row.try_get("lawyer").map_err(|e| StoreError::Database(e.to_string()))?,
        client: row.try_get("client").map_err(|e| StoreError::Database(e.to_string()))?,
        attachments: json_column::<Vec<Attachment>>(row, "attachments")?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| StoreError::Database(e.to_string()))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| StoreError::Database(e.to_string()))?,
    })
}

fn draft_from_row(row: &PgRow) -> Result<Draft, StoreError> {
    let ai_metadata: Option<serde_json::Value> = row
        .try_get("ai_metadata")
        .map_err(|e| StoreError::Database(e.to_string()))?;
    Ok(Draft {
        id: row.try_get("id").map_err(|e| StoreError::Database(e.to_string()))?,
        case_id: row.try_get("case_id").map_err(|e| StoreError::Database(e.to_string()))?,
        lawyer_id: row
            .try_get("lawyer_id")
            .map_err(|e| StoreError::Database(e.to_string()))?,
        petition_type: row
            .try_get("petition_type")
            .map_err(|e| StoreError::Database(e.to_string()))?,
        content: row.try_get("content").map_err(|e| StoreError::Database(e.to_string()))?,
        status: enum_column(row, "status", DraftStatus::parse)?,
        ai_metadata: ai_metadata
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| StoreError::Database(format!("bad ai_metadata document: {}", e)))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| StoreError::Database(e.to_string()))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| StoreError::Database(e.to_string()))?,
    })
}

fn payment_from_row(row: &PgRow) -> Result<Payment, StoreError> {
    Ok(Payment {
        id: row.try_get("id").map_err(|e| StoreError::Database(e.to_string()))?,
        user_id: row.try_get("user_id").map_err(|e| StoreError::Database(e.to_string()))?,
        provider: enum_column(row, "provider", PaymentProvider::parse)?,
        amount: row
            .try_get::<Decimal, _>("amount")
            .map_err(|e| StoreError::Database(e.to_string()))?,
        currency: row
            .try_get("currency")
            .map_err(|e| StoreError::Database(e.to_string()))?,
        provider_order_id: row
            .try_get("provider_order_id")
            .map_err(|e| StoreError::Database(e.to_string()))?,
        provider_payment_id: row
            .try_get("provider_payment_id")
            .map_err(|e| StoreError::Database(e.to_string()))?,
        status: enum_column(row, "status", PaymentStatus::parse)?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| StoreError::Database(e.to_string()))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| StoreError::Database(e.to_string()))?,
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::Database(e.to_string()))
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, role, country, bar_number, \
             is_firm, firm_name, firm_logo_url, phone, address, subscription, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.country.as_str())
        .bind(&user.bar_number)
        .bind(user.is_firm)
        .bind(&user.firm_name)
        .bind(&user.firm_logo_url)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(to_json(&user.subscription)?)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(user)
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn update_user(&self, user: User) -> Result<User, StoreError> {
        let result = sqlx::query(
            "UPDATE users SET name = $2, password_hash = $3, bar_number = $4, is_firm = $5, \
             firm_name = $6, firm_logo_url = $7, phone = $8, address = $9, subscription = $10, \
             updated_at = $11 WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.bar_number)
        .bind(user.is_firm)
        .bind(&user.firm_name)
        .bind(&user.firm_logo_url)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(to_json(&user.subscription)?)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("user"));
        }
        Ok(user)
    }

    async fn create_case(&self, case: Case) -> Result<Case, StoreError> {
        sqlx::query(
            "INSERT INTO cases (id, title, description, status, jurisdiction, court_name, \
             lawyer, client, attachments, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(case.id)
        .bind(&case.title)
        .bind(&case.description)
        .bind(case.status.as_str())
        .bind(&case.jurisdiction)
        .bind(&case.court_name)
        .bind(case.lawyer)
        .bind(case.client)
        .bind(to_json(&case.attachments)?)
        .bind(case.created_at)
        .bind(case.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(case)
    }

    async fn case_by_id(&self, id: Uuid) -> Result<Option<Case>, StoreError> {
        let row = sqlx::query("SELECT * FROM cases WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(case_from_row).transpose()
    }

    async fn cases_in_scope(&self, scope: CaseScope) -> Result<Vec<Case>, StoreError> {
        let (column, id) = match scope {
            CaseScope::Lawyer(id) => ("lawyer", id),
            CaseScope::Client(id) => ("client", id),
        };
        let rows = sqlx::query(&format!(
            "SELECT * FROM cases WHERE {} = $1 ORDER BY created_at",
            column
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(case_from_row).collect()
    }

    async fn update_case(&self, case: Case) -> Result<Case, StoreError> {
        let result = sqlx::query(
            "UPDATE cases SET title = $2, description = $3, status = $4, jurisdiction = $5, \
             court_name = $6, attachments = $7, updated_at = $8 WHERE id = $1",
        )
        .bind(case.id)
        .bind(&case.title)
        .bind(&case.description)
        .bind(case.status.as_str())
        .bind(&case.jurisdiction)
        .bind(&case.court_name)
        .bind(to_json(&case.attachments)?)
        .bind(case.updated_at)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("case"));
        }
        Ok(case)
    }

    async fn create_draft(&self, draft: Draft) -> Result<Draft, StoreError> {
        sqlx::query(
            "INSERT INTO drafts (id, case_id, lawyer_id, petition_type, content, status, \
             ai_metadata, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(draft.id)
        .bind(draft.case_id)
        .bind(draft.lawyer_id)
        .bind(&draft.petition_type)
        .bind(&draft.content)
        .bind(draft.status.as_str())
        .bind(draft.ai_metadata.as_ref().map(to_json).transpose()?)
        .bind(draft.created_at)
        .bind(draft.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(draft)
    }

    async fn draft_by_id(&self, id: Uuid) -> Result<Option<Draft>, StoreError> {
        let row = sqlx::query("SELECT * FROM drafts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(draft_from_row).transpose()
    }

    async fn update_draft(&self, draft: Draft) -> Result<Draft, StoreError> {
        let result = sqlx::query(
            "UPDATE drafts SET petition_type = $2, content = $3, status = $4, updated_at = $5 \
             WHERE id = $1",
        )
        .bind(draft.id)
        .bind(&draft.petition_type)
        .bind(&draft.content)
        .bind(draft.status.as_str())
        .bind(draft.updated_at)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("draft"));
        }
        Ok(draft)
    }

    async fn create_payment(&self, payment: Payment) -> Result<Payment, StoreError> {
        sqlx::query(
            "INSERT INTO payments (id, user_id, provider, amount, currency, provider_order_id, \
             provider_payment_id, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(payment.id)
        .bind(payment.user_id)
        .bind(payment.provider.as_str())
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(&payment.provider_order_id)
        .bind(&payment.provider_payment_id)
        .bind(payment.status.as_str())
        .bind(payment.created_at)
        .bind(payment.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(payment)
    }

    async fn payment_by_id(&self, id: Uuid) -> Result<Option<Payment>, StoreError> {
        let row = sqlx::query("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(payment_from_row).transpose()
    }

    async fn payment_by_provider_order(
        &self,
        provider_order_id: &str,
    ) -> Result<Option<Payment>, StoreError> {
        let row = sqlx::query("SELECT * FROM payments WHERE provider_order_id = $1")
            .bind(provider_order_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(payment_from_row).transpose()
    }

    async fn update_payment(&self, payment: Payment) -> Result<Payment, StoreError> {
        let result = sqlx::query(
            "UPDATE payments SET provider_order_id = $2, provider_payment_id = $3, status = $4, \
             updated_at = $5 WHERE id = $1",
        )
        .bind(payment.id)
        .bind(&payment.provider_order_id)
        .bind(&payment.provider_payment_id)
        .bind(payment.status.as_str())
        .bind(payment.updated_at)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("payment"));
        }
        Ok(payment)
    }
}
