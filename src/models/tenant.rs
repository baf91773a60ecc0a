use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Rent payment standing of a tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Paid,
    #[default]
    Due,
    Late,
}

impl TenantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantStatus::Paid => "paid",
            TenantStatus::Due => "due",
            TenantStatus::Late => "late",
        }
    }
}

impl std::fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roster view selector; `All` passes every tenant through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Paid,
    Due,
    Late,
}

impl StatusFilter {
    pub fn matches(&self, status: TenantStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Paid => status == TenantStatus::Paid,
            StatusFilter::Due => status == TenantStatus::Due,
            StatusFilter::Late => status == TenantStatus::Late,
        }
    }
}

/// Tenant billing profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub rent_amount: f64,
    pub due_date: NaiveDate,
    pub status: TenantStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_payment: Option<NaiveDate>,
}

impl Tenant {
    /// Build a full record from a creation payload and an assigned id
    pub fn from_new(id: String, new: NewTenant) -> Self {
        Self {
            id,
            name: new.name,
            phone: new.phone,
            email: new.email,
            rent_amount: new.rent_amount,
            due_date: new.due_date,
            status: new.status,
            last_payment: new.last_payment,
        }
    }
}

/// NewTenant is a tenant payload without an id (also the POST body)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTenant {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub rent_amount: f64,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: TenantStatus,
    #[serde(default)]
    pub last_payment: Option<NaiveDate>,
}

pub type CreateTenantRequest = NewTenant;

/// UpdateStatusRequest for moving a tenant to another status
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: TenantStatus,
}

/// Query parameters for the tenant list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenantListQuery {
    #[serde(default)]
    pub status: StatusFilter,
}

/// Per-status tenant counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub paid: usize,
    pub due: usize,
    pub late: usize,
}

impl StatusCounts {
    pub fn sum(&self) -> usize {
        self.paid + self.due + self.late
    }
}

/// Dashboard counters: total roster size plus the per-status breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RosterSummary {
    pub total: usize,
    #[serde(flatten)]
    pub counts: StatusCounts,
}
