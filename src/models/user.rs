use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role. Lawyers additionally carry a bar identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Lawyer,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Lawyer => "LAWYER",
            Role::Client => "CLIENT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LAWYER" => Some(Role::Lawyer),
            "CLIENT" => Some(Role::Client),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Country {
    India,
    Us,
}

impl Country {
    pub fn as_str(&self) -> &'static str {
        match self {
            Country::India => "INDIA",
            Country::Us => "US",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INDIA" => Some(Country::India),
            "US" => Some(Country::Us),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub plan: Option<String>,
    pub status: SubscriptionStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Default for Subscription {
    fn default() -> Self {
        Self {
            plan: None,
            status: SubscriptionStatus::Inactive,
            start_date: None,
            end_date: None,
        }
    }
}

/// Identity record. The password hash never serializes outward on any path.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub country: Country,
    pub bar_number: Option<String>,
    pub is_firm: bool,
    pub firm_name: Option<String>,
    pub firm_logo_url: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub subscription: Subscription,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub country: Country,
    pub bar_number: Option<String>,
    #[serde(default)]
    pub is_firm: bool,
    pub firm_name: Option<String>,
    pub firm_logo_url: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Allow-listed profile update. Unknown keys are rejected at the boundary;
/// role, email and subscription are not reachable through this path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    pub name: Option<String>,
    pub password: Option<String>,
    pub bar_number: Option<String>,
    pub is_firm: Option<bool>,
    pub firm_name: Option<String>,
    pub firm_logo_url: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl User {
    /// Apply a profile patch, touching only the named fields. Password
    /// rehashing happens in the handler, which replaces `password_hash`.
    pub fn apply_patch(&mut self, patch: &UserPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(bar_number) = &patch.bar_number {
            self.bar_number = Some(bar_number.clone());
        }
        if let Some(is_firm) = patch.is_firm {
            self.is_firm = is_firm;
        }
        if let Some(firm_name) = &patch.firm_name {
            self.firm_name = Some(firm_name.clone());
        }
        if let Some(firm_logo_url) = &patch.firm_logo_url {
            self.firm_logo_url = Some(firm_logo_url.clone());
        }
        if let Some(phone) = &patch.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(address) = &patch.address {
            self.address = Some(address.clone());
        }
        self.updated_at = Utc::now();
    }
}
