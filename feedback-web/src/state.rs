//! Shared application state for the web server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use feedback::form::FeedbackForm;
use feedback::io::store::FeedbackStore;

use crate::pages::Pages;

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FeedbackStore>,
    pub pages: Arc<Pages>,
    /// How long the thank-you card shows before returning to the form.
    pub success_display: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn FeedbackStore>, success_display: Duration) -> Result<Self> {
        Ok(Self {
            store,
            pages: Arc::new(Pages::new()?),
            success_display,
        })
    }

    /// A fresh form instance for one request.
    pub fn new_form(&self) -> FeedbackForm<dyn FeedbackStore> {
        FeedbackForm::new(Arc::clone(&self.store), self.success_display)
    }
}
