use chrono::NaiveDate;

use crate::models::{Tenant, TenantStatus};

fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

struct SampleTenant {
    id: &'static str,
    name: &'static str,
    phone: &'static str,
    email: &'static str,
    rent_amount: f64,
    due_date: (i32, u32, u32),
    status: TenantStatus,
    last_payment: Option<(i32, u32, u32)>,
}

const SAMPLE_TENANTS: &[SampleTenant] = &[
    SampleTenant {
        id: "1",
        name: "John Smith",
        phone: "+1 (555) 123-4567",
        email: "john.smith@email.com",
        rent_amount: 1200.0,
        due_date: (2025, 1, 1),
        status: TenantStatus::Paid,
        last_payment: Some((2024, 12, 28)),
    },
    SampleTenant {
        id: "2",
        name: "Sarah Johnson",
        phone: "+1 (555) 987-6543",
        email: "sarah.johnson@email.com",
        rent_amount: 950.0,
        due_date: (2025, 1, 5),
        status: TenantStatus::Due,
        last_payment: None,
    },
    SampleTenant {
        id: "3",
        name: "Mike Davis",
        phone: "+1 (555) 456-7890",
        email: "mike.davis@email.com",
        rent_amount: 1500.0,
        due_date: (2024, 12, 20),
        status: TenantStatus::Late,
        last_payment: None,
    },
];

/// The sample roster loaded at startup
pub fn sample_tenants() -> Vec<Tenant> {
    SAMPLE_TENANTS
        .iter()
        .filter_map(|s| {
            let (y, m, d) = s.due_date;
            Some(Tenant {
                id: s.id.to_string(),
                name: s.name.to_string(),
                phone: s.phone.to_string(),
                email: s.email.to_string(),
                rent_amount: s.rent_amount,
                due_date: date(y, m, d)?,
                status: s.status,
                last_payment: s.last_payment.and_then(|(y, m, d)| date(y, m, d)),
            })
        })
        .collect()
}
