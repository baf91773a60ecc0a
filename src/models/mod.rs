mod tenant;

pub use tenant::*;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// ReminderDispatch acknowledges a queued reminder send
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDispatch {
    pub id: Uuid,
    pub tenant_id: String,
    pub queued_at: DateTime<Utc>,
    /// Another send for the same tenant was still pending when this one queued
    pub already_pending: bool,
}

/// Tenants with a reminder send still pending
#[derive(Debug, Clone, Serialize)]
pub struct RemindersInFlight {
    pub sending: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_tenant_serializes_camel_case() {
        let tenant = Tenant {
            id: "7".to_string(),
            name: "Ana Ruiz".to_string(),
            phone: "+1 (555) 000-1111".to_string(),
            email: "ana@example.com".to_string(),
            rent_amount: 1100.5,
            due_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            status: TenantStatus::Late,
            last_payment: None,
        };
        let value = serde_json::to_value(&tenant).unwrap();
        assert_eq!(value["rentAmount"], 1100.5);
        assert_eq!(value["dueDate"], "2025-02-01");
        assert_eq!(value["status"], "late");
        assert!(value.get("lastPayment").is_none());
    }

    #[test]
    fn test_new_tenant_defaults() {
        let new: NewTenant = serde_json::from_str(
            r#"{"name":"Ana Ruiz","rentAmount":900,"dueDate":"2025-03-01"}"#,
        )
        .unwrap();
        assert_eq!(new.status, TenantStatus::Due);
        assert_eq!(new.last_payment, None);
        assert_eq!(new.phone, "");
    }

    #[test]
    fn test_status_filter_matches() {
        assert!(StatusFilter::All.matches(TenantStatus::Paid));
        assert!(StatusFilter::Late.matches(TenantStatus::Late));
        assert!(!StatusFilter::Late.matches(TenantStatus::Due));
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(serde_json::from_str::<UpdateStatusRequest>(r#"{"status":"evicted"}"#).is_err());
    }

    #[test]
    fn test_summary_flattens_counts() {
        let summary = RosterSummary {
            total: 3,
            counts: StatusCounts { paid: 1, due: 1, late: 1 },
        };
        assert_eq!(
            serde_json::to_value(summary).unwrap(),
            serde_json::json!({"total": 3, "paid": 1, "due": 1, "late": 1})
        );
    }
}
