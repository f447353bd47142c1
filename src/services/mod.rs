//! Upstream collaborators: blob storage, payment gateways and the AI draft
//! generator. All are invoked synchronously and treated as opaque
//! request/response dependencies behind traits, injected through `AppState`.

pub mod ai;
pub mod payment;
pub mod upload;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{0} request failed: {1}")]
    Http(&'static str, String),

    #[error("{0} returned an unexpected response: {1}")]
    BadResponse(&'static str, String),
}

pub use ai::{DraftGenerator, GeneratedDraft, StubDraftGenerator};
pub use payment::{HttpPaymentGateway, PaymentGateway, RazorpayOrder, StripeIntent, StubPaymentGateway};
pub use upload::{BlobStore, HttpBlobStore, LocalBlobStore, UploadFile};
