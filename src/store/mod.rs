use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::*;
use crate::roster::Roster;
use crate::ws::Hub;

/// Typed "resource not found" error; the API layer downcasts it to a 404.
#[derive(Debug)]
pub struct NotFoundError {
    pub resource: String,
    pub id: String,
}

impl NotFoundError {
    pub fn new(resource: &str, id: &str) -> Self {
        Self {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }
}

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} not found: {}", self.resource, self.id)
    }
}

impl std::error::Error for NotFoundError {}

/// Store is the shared handle to the roster. Every successful mutation is
/// followed by an event on the hub.
#[derive(Clone)]
pub struct Store {
    roster: Arc<RwLock<Roster>>,
    hub: Arc<Hub>,
}

impl Store {
    pub fn new(roster: Roster, hub: Arc<Hub>) -> Self {
        if roster.is_empty() {
            tracing::info!("Roster starts empty");
        } else {
            tracing::info!("Roster loaded with {} tenants", roster.len());
        }
        Self {
            roster: Arc::new(RwLock::new(roster)),
            hub,
        }
    }

    pub async fn list_tenants(&self, filter: StatusFilter) -> Vec<Tenant> {
        let roster = self.roster.read().await;
        roster.filter(filter).into_iter().cloned().collect()
    }

    pub async fn get_tenant(&self, id: &str) -> Option<Tenant> {
        self.roster.read().await.get(id).cloned()
    }

    /// Like [`Store::get_tenant`], with a [`NotFoundError`] for unknown ids
    pub async fn require_tenant(&self, id: &str) -> Result<Tenant> {
        self.get_tenant(id)
            .await
            .ok_or_else(|| NotFoundError::new("Tenant", id).into())
    }

    pub async fn create_tenant(&self, req: NewTenant) -> Tenant {
        let tenant = {
            let mut roster = self.roster.write().await;
            roster.add_tenant(req).clone()
        };
        tracing::info!("Added tenant {} ({})", tenant.id, tenant.name);
        self.hub.broadcast_tenant_added(&tenant).await;
        tenant
    }

    /// Move a tenant to `status`. Unknown ids leave the roster unchanged and
    /// come back as a [`NotFoundError`].
    pub async fn update_tenant_status(&self, id: &str, status: TenantStatus) -> Result<Tenant> {
        let (tenant, previous) = {
            let mut roster = self.roster.write().await;
            let previous = roster.get(id).map(|t| t.status);
            match (previous, roster.update_status(id, status)) {
                (Some(previous), Some(tenant)) => (tenant.clone(), previous),
                _ => return Err(NotFoundError::new("Tenant", id).into()),
            }
        };

        tracing::info!("Tenant {} status {} -> {}", tenant.id, previous, tenant.status);
        self.hub.broadcast_status_changed(&tenant, previous).await;
        Ok(tenant)
    }

    pub async fn summary(&self) -> RosterSummary {
        self.roster.read().await.summary()
    }
}
