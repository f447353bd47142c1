pub mod case;
pub mod draft;
pub mod payment;
pub mod user;

pub use case::{Attachment, Case, CasePatch, CaseStatus, NewCase};
pub use draft::{AiMetadata, Draft, DraftPatch, DraftStatus, NewDraft};
pub use payment::{NewPayment, Payment, PaymentProvider, PaymentStatus};
pub use user::{Country, NewUser, Role, Subscription, SubscriptionStatus, User, UserPatch};
