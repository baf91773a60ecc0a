use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::models::{Tenant, TenantStatus};

/// Event types for WebSocket messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    TenantAdded,
    TenantStatusChanged,
    ReminderQueued,
    ReminderSent,
    ReminderFailed,
}

/// WebSocket event message
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub payload: serde_json::Value,
}

/// Payload for tenant status change events
#[derive(Debug, Clone, Serialize)]
pub struct StatusChangedPayload {
    pub tenant: Tenant,
    pub previous: TenantStatus,
}

/// Payload for reminder lifecycle events
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderPayload {
    pub dispatch_id: Uuid,
    pub tenant_id: String,
    pub tenant_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Hub fans roster and reminder events out to every subscriber
pub struct Hub {
    tx: broadcast::Sender<String>,
    client_count: Arc<RwLock<usize>>,
}

impl Hub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self {
            tx,
            client_count: Arc::new(RwLock::new(0)),
        }
    }

    /// Broadcast an event to all subscribers
    pub async fn broadcast_event(&self, event: Event) {
        let data = match serde_json::to_string(&event) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!("Error serializing WebSocket event: {}", e);
                return;
            }
        };

        let receivers = self.tx.receiver_count();
        if receivers == 0 {
            tracing::trace!("No subscribers for {:?}", event.event_type);
            return;
        }
        match self.tx.send(data) {
            Ok(n) => tracing::debug!("Broadcasting {:?} to {} subscribers", event.event_type, n),
            Err(e) => tracing::warn!("Error broadcasting WebSocket event: {}", e),
        }
    }

    async fn broadcast_payload<T: Serialize>(&self, event_type: EventType, payload: T) {
        let payload = match serde_json::to_value(payload) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Error serializing {:?} payload: {}", event_type, e);
                return;
            }
        };
        self.broadcast_event(Event { event_type, payload }).await;
    }

    /// Broadcast a tenant added event
    pub async fn broadcast_tenant_added(&self, tenant: &Tenant) {
        self.broadcast_payload(EventType::TenantAdded, tenant).await;
    }

    /// Broadcast a tenant status change
    pub async fn broadcast_status_changed(&self, tenant: &Tenant, previous: TenantStatus) {
        self.broadcast_payload(
            EventType::TenantStatusChanged,
            StatusChangedPayload {
                tenant: tenant.clone(),
                previous,
            },
        )
        .await;
    }

    /// Broadcast a reminder lifecycle event
    pub async fn broadcast_reminder(&self, event_type: EventType, payload: ReminderPayload) {
        self.broadcast_payload(event_type, payload).await;
    }

    /// Get the number of connected WebSocket clients
    pub async fn client_count(&self) -> usize {
        *self.client_count.read().await
    }

    /// Subscribe to serialized events
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    async fn increment_clients(&self) {
        let mut count = self.client_count.write().await;
        *count += 1;
        tracing::info!("WebSocket client connected. Total clients: {}", *count);
    }

    async fn decrement_clients(&self) {
        let mut count = self.client_count.write().await;
        *count = count.saturating_sub(1);
        tracing::info!("WebSocket client disconnected. Total clients: {}", *count);
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

/// WebSocket handler for axum
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(hub): State<Arc<Hub>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

async fn handle_socket(socket: WebSocket, hub: Arc<Hub>) {
    let (mut sender, mut receiver) = socket.split();

    hub.increment_clients().await;

    let mut rx = hub.subscribe();

    let send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(msg) => {
                    if sender.send(Message::Text(msg)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("WebSocket client lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Drain client frames only to notice disconnects
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            if msg.is_err() {
                break;
            }
        }
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    hub.decrement_clients().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Tenant {
        Tenant {
            id: "9".to_string(),
            name: "Ana Ruiz".to_string(),
            phone: String::new(),
            email: "ana@example.com".to_string(),
            rent_amount: 700.0,
            due_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            status: TenantStatus::Paid,
            last_payment: NaiveDate::from_ymd_opt(2025, 1, 2),
        }
    }

    #[tokio::test]
    async fn test_broadcast_reaches_subscriber() {
        let hub = Hub::new();
        let mut rx = hub.subscribe();

        hub.broadcast_status_changed(&sample(), TenantStatus::Late).await;

        let msg: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(msg["type"], "tenant_status_changed");
        assert_eq!(msg["payload"]["previous"], "late");
        assert_eq!(msg["payload"]["tenant"]["status"], "paid");
        assert_eq!(msg["payload"]["tenant"]["lastPayment"], "2025-01-02");
    }

    async fn wait_for_clients(hub: &Hub, expected: usize) -> bool {
        for _ in 0..200 {
            if hub.client_count().await == expected {
                return true;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_client_count_follows_connections() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let hub = Arc::new(Hub::new());
        let app = axum::Router::new()
            .route("/ws", axum::routing::get(ws_handler))
            .with_state(hub.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let handshake = format!(
            "GET /ws HTTP/1.1\r\n\
             Host: {}\r\n\
             Connection: Upgrade\r\n\
             Upgrade: websocket\r\n\
             Sec-WebSocket-Version: 13\r\n\
             Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\r\n",
            addr
        );
        stream.write_all(handshake.as_bytes()).await.unwrap();

        let mut buf = [0u8; 512];
        let n = stream.read(&mut buf).await.unwrap();
        let response = String::from_utf8_lossy(&buf[..n]);
        assert!(response.starts_with("HTTP/1.1 101"), "unexpected response: {}", response);

        assert!(wait_for_clients(&hub, 1).await, "client was not counted");

        drop(stream);
        assert!(wait_for_clients(&hub, 0).await, "client was not released");
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers() {
        let hub = Hub::new();
        hub.broadcast_tenant_added(&sample()).await;
        assert_eq!(hub.client_count().await, 0);
    }
}
