pub mod ai;
pub mod auth;
pub mod cases;
pub mod drafts;
pub mod payments;
pub mod users;
pub mod ws;
