//! Drives the route set manager from authentication events.

use crate::route_set::RouteSetManager;
use crux_core::auth::AuthEvent;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Spawns a task that starts and ends sessions on `manager` as
/// `AuthEvent`s arrive.
///
/// Load failures are logged and the task keeps running. The task finishes
/// when every sender of `receiver` has been dropped.
pub fn spawn_auth_listener(
    manager: Arc<RouteSetManager>,
    mut receiver: broadcast::Receiver<AuthEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => handle_event(&manager, event).await,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[AuthListener] Missed {} auth events", skipped);
                }
                Err(RecvError::Closed) => {
                    tracing::debug!("[AuthListener] Auth channel closed, stopping");
                    break;
                }
            }
        }
    })
}

async fn handle_event(manager: &RouteSetManager, event: AuthEvent) {
    match event {
        AuthEvent::SignedIn { user_id } => {
            tracing::info!("[AuthListener] Signed in: {}", user_id);
            if let Err(e) = manager.on_session_start(user_id).await {
                tracing::warn!("[AuthListener] Session start finished with errors: {}", e);
            }
        }
        AuthEvent::SignedOut => {
            tracing::info!("[AuthListener] Signed out");
            manager.on_session_end();
        }
    }
}
