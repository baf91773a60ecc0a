use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{sleep, Duration};
use uuid::Uuid;

use crate::models::{ReminderDispatch, Tenant};
use crate::ws::{EventType, Hub, ReminderPayload};

/// Delivers a rent reminder to a tenant
#[async_trait]
pub trait ReminderSender: Send + Sync {
    async fn send(&self, tenant: &Tenant) -> Result<()>;
}

/// Stand-in transport: every send succeeds and is only logged
pub struct SimulatedSender;

#[async_trait]
impl ReminderSender for SimulatedSender {
    async fn send(&self, tenant: &Tenant) -> Result<()> {
        tracing::info!("Reminder sent to {} ({})", tenant.name, tenant.email);
        Ok(())
    }
}

/// ReminderService runs reminder sends in the background after a fixed delay.
/// Pending sends are tracked per tenant; the roster never waits on them.
pub struct ReminderService {
    sender: Arc<dyn ReminderSender>,
    hub: Arc<Hub>,
    delay: Duration,
    pending: RwLock<HashMap<String, usize>>,
}

impl ReminderService {
    pub fn new(sender: Arc<dyn ReminderSender>, hub: Arc<Hub>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            sender,
            hub,
            delay,
            pending: RwLock::new(HashMap::new()),
        })
    }

    /// Queue a reminder for `tenant`. Returns as soon as the send is scheduled.
    pub async fn send_reminder(self: &Arc<Self>, tenant: Tenant) -> ReminderDispatch {
        let already_pending = {
            let mut pending = self.pending.write().await;
            let count = pending.entry(tenant.id.clone()).or_insert(0);
            *count += 1;
            *count > 1
        };
        let dispatch = ReminderDispatch {
            id: Uuid::new_v4(),
            tenant_id: tenant.id.clone(),
            queued_at: Utc::now(),
            already_pending,
        };

        tracing::info!(
            "Scheduling reminder {} for {} in {}ms",
            dispatch.id,
            tenant.name,
            self.delay.as_millis()
        );
        self.hub
            .broadcast_reminder(EventType::ReminderQueued, payload(dispatch.id, &tenant, None))
            .await;

        let svc = self.clone();
        let dispatch_id = dispatch.id;
        tokio::spawn(async move {
            sleep(svc.delay).await;
            svc.deliver(dispatch_id, tenant).await;
        });

        dispatch
    }

    async fn deliver(&self, dispatch_id: Uuid, tenant: Tenant) {
        let (event_type, message) = match self.sender.send(&tenant).await {
            Ok(()) => (
                EventType::ReminderSent,
                format!("Successfully sent a reminder to {}", tenant.name),
            ),
            Err(e) => {
                tracing::warn!("Failed to send reminder to {}: {}", tenant.name, e);
                (
                    EventType::ReminderFailed,
                    format!("Could not send reminder to {}", tenant.name),
                )
            }
        };

        self.finish(&tenant.id).await;
        self.hub
            .broadcast_reminder(event_type, payload(dispatch_id, &tenant, Some(message)))
            .await;
    }

    async fn finish(&self, tenant_id: &str) {
        let mut pending = self.pending.write().await;
        if let Some(count) = pending.get_mut(tenant_id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                pending.remove(tenant_id);
            }
        }
    }

    /// Whether a reminder for this tenant is still pending
    pub async fn is_sending(&self, tenant_id: &str) -> bool {
        self.pending.read().await.contains_key(tenant_id)
    }

    /// Tenant ids with a pending reminder, sorted
    pub async fn in_flight(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.pending.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}

fn payload(dispatch_id: Uuid, tenant: &Tenant, message: Option<String>) -> ReminderPayload {
    ReminderPayload {
        dispatch_id,
        tenant_id: tenant.id.clone(),
        tenant_name: tenant.name.clone(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::seeds::sample_tenants;
    use tokio::sync::broadcast;

    struct FailingSender;

    #[async_trait]
    impl ReminderSender for FailingSender {
        async fn send(&self, _tenant: &Tenant) -> Result<()> {
            anyhow::bail!("smtp unreachable")
        }
    }

    async fn next_event(rx: &mut broadcast::Receiver<String>) -> serde_json::Value {
        let msg = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        serde_json::from_str(&msg).unwrap()
    }

    #[tokio::test]
    async fn test_reminder_sent() {
        let hub = Arc::new(Hub::new());
        let mut rx = hub.subscribe();
        let svc = ReminderService::new(Arc::new(SimulatedSender), hub, Duration::from_millis(20));
        let tenant = sample_tenants().remove(1);

        let dispatch = svc.send_reminder(tenant.clone()).await;
        assert_eq!(dispatch.tenant_id, "2");
        assert!(!dispatch.already_pending);
        assert!(svc.is_sending("2").await);

        let queued = next_event(&mut rx).await;
        assert_eq!(queued["type"], "reminder_queued");
        assert_eq!(queued["payload"]["dispatchId"], dispatch.id.to_string());

        let sent = next_event(&mut rx).await;
        assert_eq!(sent["type"], "reminder_sent");
        assert_eq!(
            sent["payload"]["message"],
            "Successfully sent a reminder to Sarah Johnson"
        );
        assert!(!svc.is_sending("2").await);
    }

    #[tokio::test]
    async fn test_reminder_failure_reported() {
        let hub = Arc::new(Hub::new());
        let mut rx = hub.subscribe();
        let svc = ReminderService::new(Arc::new(FailingSender), hub, Duration::from_millis(5));

        svc.send_reminder(sample_tenants().remove(2)).await;

        assert_eq!(next_event(&mut rx).await["type"], "reminder_queued");
        let failed = next_event(&mut rx).await;
        assert_eq!(failed["type"], "reminder_failed");
        assert_eq!(failed["payload"]["message"], "Could not send reminder to Mike Davis");
        assert!(svc.in_flight().await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_overlapping_sends_report_pending() {
        let hub = Arc::new(Hub::new());
        let svc = ReminderService::new(Arc::new(SimulatedSender), hub, Duration::from_secs(60));
        let tenant = sample_tenants().remove(0);

        // both sends queue up behind the held lock and then race for it
        let guard = svc.pending.write().await;
        let first = tokio::spawn({
            let (svc, tenant) = (svc.clone(), tenant.clone());
            async move { svc.send_reminder(tenant).await }
        });
        let second = tokio::spawn({
            let (svc, tenant) = (svc.clone(), tenant.clone());
            async move { svc.send_reminder(tenant).await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(guard);

        let first = first.await.unwrap();
        let second = second.await.unwrap();
        let flags = [first.already_pending, second.already_pending];
        assert_eq!(flags.iter().filter(|p| **p).count(), 1, "flags: {:?}", flags);
        assert_eq!(svc.pending.read().await.get("1"), Some(&2));
    }

    #[tokio::test]
    async fn test_flags_are_per_tenant() {
        let hub = Arc::new(Hub::new());
        let mut rx = hub.subscribe();
        let svc = ReminderService::new(Arc::new(SimulatedSender), hub, Duration::from_millis(50));
        let tenants = sample_tenants();

        for tenant in &tenants {
            svc.send_reminder(tenant.clone()).await;
        }
        // a second send for a pending tenant is not blocked
        let again = svc.send_reminder(tenants[0].clone()).await;
        assert!(again.already_pending);
        assert_eq!(svc.in_flight().await, vec!["1", "2", "3"]);

        let mut sent = 0;
        while sent < 4 {
            if next_event(&mut rx).await["type"] == "reminder_sent" {
                sent += 1;
            }
        }
        assert!(svc.in_flight().await.is_empty());
    }
}
