use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    Open,
    InProgress,
    Closed,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Open => "OPEN",
            CaseStatus::InProgress => "IN_PROGRESS",
            CaseStatus::Closed => "CLOSED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(CaseStatus::Open),
            "IN_PROGRESS" => Some(CaseStatus::InProgress),
            "CLOSED" => Some(CaseStatus::Closed),
            _ => None,
        }
    }
}

/// Uploaded file reference. Attachments are append-only: updates may add
/// new entries but never remove or replace existing ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    pub name: String,
    pub provider: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: CaseStatus,
    pub jurisdiction: Option<String>,
    pub court_name: Option<String>,
    pub lawyer: Option<Uuid>,
    pub client: Option<Uuid>,
    pub attachments: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCase {
    pub title: String,
    pub description: Option<String>,
    pub jurisdiction: Option<String>,
    pub court_name: Option<String>,
    pub lawyer: Option<Uuid>,
    pub client: Option<Uuid>,
}

/// Allow-listed case update. The lawyer/client references are immutable
/// through this path, so a patch cannot reassign ownership to bypass the
/// authorization check run against the stored document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CasePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<CaseStatus>,
    pub jurisdiction: Option<String>,
    pub court_name: Option<String>,
}

impl Case {
    /// Ownership predicate: the principal must be the recorded lawyer or
    /// client matching their role.
    pub fn is_party(&self, user: &User) -> bool {
        match user.role {
            Role::Lawyer => self.lawyer == Some(user.id),
            Role::Client => self.client == Some(user.id),
        }
    }

    /// Recipients for change notifications, computed from the ownership
    /// fields at the moment of the mutation.
    pub fn involved_users(&self) -> Vec<Uuid> {
        self.lawyer.into_iter().chain(self.client).collect()
    }

    pub fn apply_patch(&mut self, patch: &CasePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(jurisdiction) = &patch.jurisdiction {
            self.jurisdiction = Some(jurisdiction.clone());
        }
        if let Some(court_name) = &patch.court_name {
            self.court_name = Some(court_name.clone());
        }
        self.updated_at = Utc::now();
    }
}
