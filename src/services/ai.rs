//! AI draft generation. The retrieval pipeline behind this trait is not
//! built yet; the stub returns placeholder content with provenance
//! metadata so the surrounding draft flow is exercisable end to end.

use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::AiMetadata;

use super::UpstreamError;

#[derive(Debug, Clone)]
pub struct GeneratedDraft {
    pub content: Value,
    pub metadata: AiMetadata,
}

#[async_trait]
pub trait DraftGenerator: Send + Sync {
    async fn generate(
        &self,
        case_id: Uuid,
        lawyer_id: Uuid,
        petition_type: &str,
        facts: &str,
    ) -> Result<GeneratedDraft, UpstreamError>;
}

pub struct StubDraftGenerator;

#[async_trait]
impl DraftGenerator for StubDraftGenerator {
    async fn generate(
        &self,
        _case_id: Uuid,
        _lawyer_id: Uuid,
        petition_type: &str,
        facts: &str,
    ) -> Result<GeneratedDraft, UpstreamError> {
        let content = json!({
            "body": format!(
                "AI-generated draft for petition type {} with facts: {}",
                petition_type, facts
            )
        });

        Ok(GeneratedDraft {
            content,
            metadata: AiMetadata {
                model: "stub-model".to_string(),
                vector_source: "local".to_string(),
                tokens_used: 42,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_reports_its_provenance() {
        let draft = StubDraftGenerator
            .generate(Uuid::new_v4(), Uuid::new_v4(), "WRIT", "the facts")
            .await
            .unwrap();
        assert_eq!(draft.metadata.model, "stub-model");
        assert_eq!(draft.metadata.tokens_used, 42);
        assert!(draft.content["body"].as_str().unwrap().contains("WRIT"));
    }
}
