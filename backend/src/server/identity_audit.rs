//! Logs identity transitions reported by the gateway.

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use bandstand::domain::ports::{IdentityChange, IdentityChangeKind};

/// Drain `changes` until the gateway closes the channel.
pub(crate) fn spawn_identity_audit(
    mut changes: broadcast::Receiver<IdentityChange>,
) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut seen = 0;
        loop {
            match changes.recv().await {
                Ok(change) => {
                    seen += 1;
                    record(&change);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "identity audit lagged behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
        seen
    })
}

fn record(change: &IdentityChange) {
    match change.kind {
        IdentityChangeKind::SignedIn => info!(user_id = %change.user_id, "user signed in"),
        IdentityChangeKind::SignedOut => info!(user_id = %change.user_id, "user signed out"),
    }
}
