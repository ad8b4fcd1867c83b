use std::sync::Arc;

use crate::auth::AuthGuard;
use crate::config::Settings;
use crate::load::LoadGenerator;
use crate::session::SessionStore;

/// Application state shared across handlers. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub load: Arc<LoadGenerator>,
    pub auth: AuthGuard,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        let sessions = Arc::new(SessionStore::new());
        let load = Arc::new(LoadGenerator::new(settings.load));
        let auth = AuthGuard::new(settings.auth.require_bearer_prefix);
        Self {
            sessions,
            load,
            auth,
        }
    }
}
