//! Submission lifecycle controller for one feedback form instance.
//!
//! [`FeedbackForm`] holds the field values, the per-field errors and the
//! [`FormState`], and issues at most one store create per accepted submit.
//! Field validation errors stay inline; store outcomes are broadcast as
//! [`Notification`]s.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::core::lifecycle::{FormEvent, FormState, transition};
use crate::core::types::{FeedbackInput, FeedbackRecord, Field, FieldErrors};
use crate::core::validator::{validate, validate_field};
use crate::io::store::FeedbackStore;

/// Default length of the thank-you window.
pub const DEFAULT_SUCCESS_DISPLAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-visible toast emitted after a store call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn submitted() -> Self {
        Self {
            level: NoticeLevel::Success,
            title: "Thank you for your feedback!".to_string(),
            description: "Your response has been recorded.".to_string(),
        }
    }

    pub fn submit_failed() -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Failed to submit feedback".to_string(),
            description: "Please try again later.".to_string(),
        }
    }
}

/// Result of a single [`FeedbackForm::submit`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Exactly one record was created; the form is cleared.
    Created(FeedbackRecord),
    /// Validation failed; nothing was sent to the store.
    Invalid(FieldErrors),
    /// The store refused the create; field values are preserved.
    StoreFailed,
    /// A submission is already in flight (or the thank-you window is showing).
    Busy,
}

/// Point-in-time view of the form for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    pub state: FormState,
    pub values: FeedbackInput,
    pub errors: FieldErrors,
}

#[derive(Debug)]
struct FormInner {
    state: FormState,
    values: FeedbackInput,
    errors: FieldErrors,
    /// Bumped per success so a stale revert timer cannot touch a newer window.
    window: u64,
}

impl FormInner {
    fn advance(&mut self, event: FormEvent) {
        match transition(self.state, event) {
            Ok(next) => self.state = next,
            Err(err) => warn!(error = %err, "ignoring form event"),
        }
    }

    fn revalidate(&mut self, field: Field) {
        match validate_field(&self.values, field) {
            Some(message) => self.errors.insert(field, message),
            None => {
                self.errors.remove(field);
            }
        }
    }
}

/// One form instance bound to a store.
pub struct FeedbackForm<S: ?Sized> {
    store: Arc<S>,
    inner: Arc<Mutex<FormInner>>,
    notices: broadcast::Sender<Notification>,
    success_display: Duration,
    revert: Mutex<Option<JoinHandle<()>>>,
}

impl<S: FeedbackStore + ?Sized> FeedbackForm<S> {
    pub fn new(store: Arc<S>, success_display: Duration) -> Self {
        let (notices, _) = broadcast::channel(16);
        Self {
            store,
            inner: Arc::new(Mutex::new(FormInner {
                state: FormState::Idle,
                values: FeedbackInput::default(),
                errors: FieldErrors::default(),
                window: 0,
            })),
            notices,
            success_display,
            revert: Mutex::new(None),
        }
    }

    pub fn state(&self) -> FormState {
        lock(&self.inner).state
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let inner = lock(&self.inner);
        FormSnapshot {
            state: inner.state,
            values: inner.values.clone(),
            errors: inner.errors.clone(),
        }
    }

    /// Receive success/failure notifications for subsequent submits.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notices.subscribe()
    }

    /// Returns false when input is disabled (a submit is in flight).
    pub fn set_name(&self, value: impl Into<String>) -> bool {
        let value = value.into();
        self.update(Field::Name, move |values| values.name = value)
    }

    pub fn set_email(&self, value: impl Into<String>) -> bool {
        let value = value.into();
        self.update(Field::Email, move |values| values.email = value)
    }

    pub fn set_comments(&self, value: impl Into<String>) -> bool {
        let value = value.into();
        self.update(Field::Comments, move |values| values.comments = Some(value))
    }

    /// Replace every field at once (server-side form posts, CLI).
    pub fn fill(&self, input: FeedbackInput) -> bool {
        let mut inner = lock(&self.inner);
        if !inner.state.accepts_input() {
            return false;
        }
        inner.values = input;
        let flagged: Vec<Field> = inner.errors.iter().map(|(field, _)| field).collect();
        for field in flagged {
            inner.revalidate(field);
        }
        true
    }

    /// Rating control: set the value and validate it immediately.
    ///
    /// A previous rating error clears as soon as a valid rating is picked.
    pub fn select_rating(&self, rating: u8) -> bool {
        let mut inner = lock(&self.inner);
        if !inner.state.accepts_input() {
            return false;
        }
        inner.values.rating = Some(i64::from(rating));
        inner.revalidate(Field::Rating);
        true
    }

    /// Validate and, if valid, create exactly one record.
    ///
    /// The form lock is released while the store call is in flight; a
    /// concurrent submit in that window gets [`SubmitOutcome::Busy`].
    #[instrument(skip_all, fields(backend = self.store.backend_tag()))]
    pub async fn submit(&self) -> SubmitOutcome {
        let payload = {
            let mut inner = lock(&self.inner);
            if !inner.state.accepts_submit() {
                debug!(state = ?inner.state, "submit ignored");
                return SubmitOutcome::Busy;
            }
            match validate(&inner.values) {
                Ok(payload) => {
                    inner.errors.clear();
                    inner.advance(FormEvent::SubmitAccepted);
                    payload
                }
                Err(errors) => {
                    inner.advance(FormEvent::SubmitRejected);
                    inner.errors = errors.clone();
                    inner.advance(FormEvent::Settle);
                    debug!(invalid_fields = errors.len(), "submission rejected");
                    return SubmitOutcome::Invalid(errors);
                }
            }
        };

        let mut in_flight = InFlight {
            inner: &self.inner,
            armed: true,
        };
        let result = self.store.create(&payload).await;
        in_flight.armed = false;

        let mut inner = lock(&self.inner);
        match result {
            Ok(record) => {
                inner.advance(FormEvent::StoreSucceeded);
                inner.values = FeedbackInput::default();
                inner.errors.clear();
                inner.window += 1;
                let window = inner.window;
                drop(inner);

                info!(id = %record.id, rating = %record.rating, "feedback submitted");
                let _ = self.notices.send(Notification::submitted());
                self.schedule_revert(window);
                SubmitOutcome::Created(record)
            }
            Err(err) => {
                inner.advance(FormEvent::StoreFailed);
                inner.advance(FormEvent::Settle);
                drop(inner);

                warn!(error = %format!("{err:#}"), "feedback submission failed");
                let _ = self.notices.send(Notification::submit_failed());
                SubmitOutcome::StoreFailed
            }
        }
    }

    fn update(&self, field: Field, apply: impl FnOnce(&mut FeedbackInput)) -> bool {
        let mut inner = lock(&self.inner);
        if !inner.state.accepts_input() {
            return false;
        }
        apply(&mut inner.values);
        if inner.errors.contains(field) {
            inner.revalidate(field);
        }
        true
    }

    /// Return to idle after the thank-you window.
    ///
    /// The timer only holds a weak reference, and is aborted when the form is
    /// dropped, so a discarded form never gets updated.
    fn schedule_revert(&self, window: u64) {
        let inner = Arc::downgrade(&self.inner);
        let delay = self.success_display;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let mut inner = lock(&inner);
            if inner.window == window && inner.state == FormState::Succeeded {
                inner.advance(FormEvent::DisplayElapsed);
                debug!("success window elapsed");
            }
        });

        let mut slot = self.revert.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }
}

impl<S: ?Sized> Drop for FeedbackForm<S> {
    fn drop(&mut self) {
        let slot = self.revert.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

/// Settles the form quietly if a submit future is dropped mid-create.
struct InFlight<'a> {
    inner: &'a Mutex<FormInner>,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = lock(self.inner);
        if inner.state == FormState::Submitting {
            inner.advance(FormEvent::StoreFailed);
            inner.advance(FormEvent::Settle);
            debug!("in-flight submission abandoned");
        }
    }
}

fn lock(inner: &Mutex<FormInner>) -> MutexGuard<'_, FormInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}
