use std::sync::Arc;

use anyhow::Result;
use minijinja::Environment;

use crate::documents::Documents;
use crate::llm_client::CompletionService;
use crate::session::SessionStore;
use crate::tailoring::page;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. `LlmClient` in production, a scripted fake in tests.
    pub llm: Arc<dyn CompletionService>,
    /// Base cover letter and resume, fixed for the life of the process.
    pub documents: Arc<Documents>,
    pub sessions: SessionStore,
    /// Compiled page templates.
    pub pages: Arc<Environment<'static>>,
}

impl AppState {
    pub fn new(llm: Arc<dyn CompletionService>, documents: Documents) -> Result<Self> {
        Ok(Self {
            llm,
            documents: Arc::new(documents),
            sessions: SessionStore::new(),
            pages: Arc::new(page::environment()?),
        })
    }
}
