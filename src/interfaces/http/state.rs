use crate::application::{AnalysisService, ChatSession, DatasetOverview};
use crate::domain::chart::Dashboard;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::AppConfig;
use crate::interfaces::http::LogEntry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

pub type SharedSession = Arc<AsyncMutex<ChatSession>>;

/// Open chat sessions. Each session sits behind its own async lock so turns
/// within one session run one at a time while other sessions proceed.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, SharedSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> Uuid {
        let session = ChatSession::new();
        let id = session.id();
        self.lock().insert(id, Arc::new(AsyncMutex::new(session)));
        id
    }

    pub fn get(&self, id: &Uuid) -> Result<SharedSession> {
        self.lock()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))
    }

    pub fn remove(&self, id: &Uuid) -> Result<()> {
        self.lock()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, SharedSession>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub service: Arc<AnalysisService>,
    pub dashboard: Dashboard,
    pub overview: DatasetOverview,
    pub sessions: SessionStore,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}
