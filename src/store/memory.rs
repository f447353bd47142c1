//! In-process store used by the integration tests and local development
//! without a database. Mirrors the persistence semantics of the Postgres
//! store: atomic single-document writes, last-write-wins on races, case
//! lists ordered by creation time.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Case, Draft, Payment, User};

use super::{CaseScope, Store, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    cases: RwLock<HashMap<Uuid, Case>>,
    drafts: RwLock<HashMap<Uuid, Draft>>,
    payments: RwLock<HashMap<Uuid, Payment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let duplicate = users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email));
        if duplicate {
            return Err(StoreError::DuplicateEmail);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update_user(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(StoreError::NotFound("user"));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn create_case(&self, case: Case) -> Result<Case, StoreError> {
        self.cases.write().await.insert(case.id, case.clone());
        Ok(case)
    }

    async fn case_by_id(&self, id: Uuid) -> Result<Option<Case>, StoreError> {
        Ok(self.cases.read().await.get(&id).cloned())
    }

    async fn cases_in_scope(&self, scope: CaseScope) -> Result<Vec<Case>, StoreError> {
        let cases = self.cases.read().await;
        let mut matched: Vec<Case> = cases
            .values()
            .filter(|c| match scope {
                CaseScope::Lawyer(id) => c.lawyer == Some(id),
                CaseScope::Client(id) => c.client == Some(id),
            })
            .cloned()
            .collect();
        matched.sort_by_key(|c| c.created_at);
        Ok(matched)
    }

    async fn update_case(&self, case: Case) -> Result<Case, StoreError> {
        let mut cases = self.cases.write().await;
        if !cases.contains_key(&case.id) {
            return Err(StoreError::NotFound("case"));
        }
        cases.insert(case.id, case.clone());
        Ok(case)
    }

    async fn create_draft(&self, draft: Draft) -> Result<Draft, StoreError> {
        self.drafts.write().await.insert(draft.id, draft.clone());
        Ok(draft)
    }

    async fn draft_by_id(&self, id: Uuid) -> Result<Option<Draft>, StoreError> {
        Ok(self.drafts.read().await.get(&id).cloned())
    }

    async fn update_draft(&self, draft: Draft) -> Result<Draft, StoreError> {
        let mut drafts = self.drafts.write().await;
        if !drafts.contains_key(&draft.id) {
            return Err(StoreError::NotFound("draft"));
        }
        drafts.insert(draft.id, draft.clone());
        Ok(draft)
    }

    async fn create_payment(&self, payment: Payment) -> Result<Payment, StoreError> {
        self.payments
            .write()
            .await
            .insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn payment_by_id(&self, id: Uuid) -> Result<Option<Payment>, StoreError> {
        Ok(self.payments.read().await.get(&id).cloned())
    }

    async fn payment_by_provider_order(
        &self,
        provider_order_id: &str,
    ) -> Result<Option<Payment>, StoreError> {
        Ok(self
            .payments
            .read()
            .await
            .values()
            .find(|p| p.provider_order_id.as_deref() == Some(provider_order_id))
            .cloned())
    }

    async fn update_payment(&self, payment: Payment) -> Result<Payment, StoreError> {
        let mut payments = self.payments.write().await;
        if !payments.contains_key(&payment.id) {
            return Err(StoreError::NotFound("payment"));
        }
        payments.insert(payment.id, payment.clone());
        Ok(payment)
    }
}
