pub mod seeds;

use chrono::{NaiveDate, Utc};

use crate::models::*;

/// Roster owns the authoritative, insertion-ordered list of tenants.
///
/// All mutation goes through [`Roster::add_tenant`] and
/// [`Roster::update_status`]; readers only ever get shared slices.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    tenants: Vec<Tenant>,
    last_issued_id: i64,
}

impl Roster {
    /// Create an empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a roster seeded with the given tenants, in order
    pub fn with_tenants(tenants: Vec<Tenant>) -> Self {
        Self {
            tenants,
            last_issued_id: 0,
        }
    }

    /// Create a roster holding the sample tenants
    pub fn seeded() -> Self {
        Self::with_tenants(seeds::sample_tenants())
    }

    pub fn tenants(&self) -> &[Tenant] {
        &self.tenants
    }

    pub fn get(&self, id: &str) -> Option<&Tenant> {
        self.tenants.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }

    /// Append a new tenant under a freshly generated id
    pub fn add_tenant(&mut self, new: NewTenant) -> &Tenant {
        let id = self.next_id(Utc::now().timestamp_millis());
        let index = self.tenants.len();
        self.tenants.push(Tenant::from_new(id, new));
        &self.tenants[index]
    }

    /// Set a tenant's status, stamping today's date as the last payment when
    /// the target is `paid`. Unknown ids leave the roster untouched.
    pub fn update_status(&mut self, id: &str, status: TenantStatus) -> Option<&Tenant> {
        self.update_status_on(id, status, Utc::now().date_naive())
    }

    /// Same as [`Roster::update_status`] with an explicit "today"
    pub fn update_status_on(
        &mut self,
        id: &str,
        status: TenantStatus,
        today: NaiveDate,
    ) -> Option<&Tenant> {
        let tenant = self.tenants.iter_mut().find(|t| t.id == id)?;
        tenant.status = status;
        if status == TenantStatus::Paid {
            tenant.last_payment = Some(today);
        }
        Some(&*tenant)
    }

    pub fn filter(&self, filter: StatusFilter) -> Vec<&Tenant> {
        filter_by_status(self.tenants(), filter)
    }

    pub fn counts(&self) -> StatusCounts {
        count_by_status(self.tenants())
    }

    pub fn summary(&self) -> RosterSummary {
        RosterSummary {
            total: self.len(),
            counts: self.counts(),
        }
    }

    /// Time-derived id, strictly increasing per roster and never equal to a
    /// held id.
    fn next_id(&mut self, now_millis: i64) -> String {
        let mut candidate = now_millis.max(self.last_issued_id + 1);
        while self.get(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        self.last_issued_id = candidate;
        candidate.to_string()
    }
}

/// Tenants whose status matches `filter`, in roster order
pub fn filter_by_status<'a, I>(tenants: I, filter: StatusFilter) -> Vec<&'a Tenant>
where
    I: IntoIterator<Item = &'a Tenant>,
{
    tenants
        .into_iter()
        .filter(|t| filter.matches(t.status))
        .collect()
}

/// Count tenants per status in a single pass
pub fn count_by_status<'a, I>(tenants: I) -> StatusCounts
where
    I: IntoIterator<Item = &'a Tenant>,
{
    tenants
        .into_iter()
        .fold(StatusCounts::default(), |mut counts, t| {
            match t.status {
                TenantStatus::Paid => counts.paid += 1,
                TenantStatus::Due => counts.due += 1,
                TenantStatus::Late => counts.late += 1,
            }
            counts
        })
}
