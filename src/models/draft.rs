use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftStatus {
    Draft,
    Submitted,
    Approved,
}

impl DraftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftStatus::Draft => "DRAFT",
            DraftStatus::Submitted => "SUBMITTED",
            DraftStatus::Approved => "APPROVED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(DraftStatus::Draft),
            "SUBMITTED" => Some(DraftStatus::Submitted),
            "APPROVED" => Some(DraftStatus::Approved),
            _ => None,
        }
    }
}

/// Provenance metadata on AI-generated drafts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiMetadata {
    pub model: String,
    pub vector_source: String,
    pub tokens_used: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub id: Uuid,
    pub case_id: Uuid,
    pub lawyer_id: Uuid,
    pub petition_type: String,
    pub content: Value,
    pub status: DraftStatus,
    pub ai_metadata: Option<AiMetadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewDraft {
    pub case_id: Uuid,
    pub petition_type: String,
    pub content: Value,
}

/// Allow-listed draft update. Status transitions carry no ordering guard;
/// any of the three states may be set from any other.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DraftPatch {
    pub petition_type: Option<String>,
    pub content: Option<Value>,
    pub status: Option<DraftStatus>,
}

impl Draft {
    /// Only the authoring lawyer may read or mutate a draft.
    pub fn is_author(&self, user: &User) -> bool {
        self.lawyer_id == user.id
    }

    pub fn apply_patch(&mut self, patch: &DraftPatch) {
        if let Some(petition_type) = &patch.petition_type {
            self.petition_type = petition_type.clone();
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_draft(lawyer_id: Uuid) -> Draft {
        Draft {
            id: Uuid::new_v4(),
            case_id: Uuid::new_v4(),
            lawyer_id,
            petition_type: "WRIT".into(),
            content: json!({ "body": "facts" }),
            status: DraftStatus::Draft,
            ai_metadata: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn status_patch_leaves_author_and_content_alone() {
        let lawyer_id = Uuid::new_v4();
        let mut draft = sample_draft(lawyer_id);
        draft.apply_patch(&DraftPatch {
            status: Some(DraftStatus::Submitted),
            ..Default::default()
        });
        assert_eq!(draft.status, DraftStatus::Submitted);
        assert_eq!(draft.lawyer_id, lawyer_id);
        assert_eq!(draft.content, json!({ "body": "facts" }));
    }

    #[test]
    fn patch_cannot_reassign_author() {
        let err = serde_json::from_value::<DraftPatch>(
            serde_json::json!({ "lawyerId": Uuid::new_v4().to_string() }),
        );
        assert!(err.is_err());
    }

    #[test]
    fn transitions_are_unguarded() {
        let mut draft = sample_draft(Uuid::new_v4());
        draft.apply_patch(&DraftPatch {
            status: Some(DraftStatus::Approved),
            ..Default::default()
        });
        // Reversing is allowed as well.
        draft.apply_patch(&DraftPatch {
            status: Some(DraftStatus::Draft),
            ..Default::default()
        });
        assert_eq!(draft.status, DraftStatus::Draft);
    }
}
