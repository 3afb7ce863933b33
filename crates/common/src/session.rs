use crate::Config;
use tower_sessions::{cookie::time::Duration, Expiry, MemoryStore, SessionManagerLayer};

/// In-memory session layer: a session, and the ledger it carries, ends after
/// `session_idle_minutes` without requests.
pub fn session_layer(config: &Config) -> SessionManagerLayer<MemoryStore> {
    let idle = Duration::minutes(config.session_idle_minutes.max(1));
    tracing::info!("Session idle timeout: {} minutes", idle.whole_minutes());

    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.secure_cookies)
        .with_expiry(Expiry::OnInactivity(idle))
}
