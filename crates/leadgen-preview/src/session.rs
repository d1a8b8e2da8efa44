//! One mounted preview: drives a [`PreviewMachine`] with acquisition results.
//!
//! Each user action holds the session's in-flight flag for the duration of
//! its remote call, so a second action fails fast with
//! [`SessionError::Busy`] instead of racing the first. Calls cannot be
//! cancelled. After [`PreviewSession::teardown`] their results are dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use leadgen_client::TemplateService;
use leadgen_core::{Business, BusinessId, Template, TemplateSet};

use crate::acquisition::AcquisitionController;
use crate::error::{AcquisitionError, SessionError};
use crate::guard::InFlightFlag;
use crate::sandbox::SandboxFrame;
use crate::state::{
    PreviewEvent, PreviewMachine, PreviewPhase, PreviewState, RegenerateFailurePolicy,
};

/// Where the preview was opened from. Both entries share acquisition and
/// rendering; they differ only in which actions they offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewEntry {
    /// Regenerate-capable modal on the business detail page.
    Detail,
    /// Lightweight modal on a list card.
    Card,
}

impl PreviewEntry {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PreviewEntry::Detail => "detail",
            PreviewEntry::Card => "card",
        }
    }

    /// Whether a regenerate control is shown for `state`.
    #[must_use]
    pub fn offers_regenerate(self, state: &PreviewState) -> bool {
        match (self, state) {
            (_, PreviewState::Error(_)) | (PreviewEntry::Detail, PreviewState::Ready(_)) => true,
            (PreviewEntry::Card, PreviewState::Ready(view)) => view.is_empty(),
            _ => false,
        }
    }

    #[must_use]
    pub fn offers_retry(self, state: &PreviewState) -> bool {
        matches!(state, PreviewState::Error(_))
    }
}

pub struct PreviewSession<S: ?Sized> {
    controller: AcquisitionController<S>,
    business_id: BusinessId,
    business_name: String,
    entry: PreviewEntry,
    desired_count: u32,
    machine: Mutex<PreviewMachine>,
    in_flight: InFlightFlag,
    mounted: AtomicBool,
}

impl<S> PreviewSession<S>
where
    S: TemplateService + ?Sized,
{
    /// Opens a preview for `business`, or returns `None` when it is not a
    /// qualified lead. No preview exists for unscored or high-scoring
    /// businesses.
    #[must_use]
    pub fn open(
        controller: AcquisitionController<S>,
        business: &Business,
        entry: PreviewEntry,
        desired_count: u32,
    ) -> Option<Self> {
        if !business.is_qualified_lead() {
            tracing::debug!(
                business_id = %business.id,
                score = ?business.score,
                "not a qualified lead, no preview"
            );
            return None;
        }
        Some(Self {
            controller,
            business_id: business.id,
            business_name: business.name.clone(),
            entry,
            desired_count,
            machine: Mutex::new(PreviewMachine::default()),
            in_flight: InFlightFlag::new(),
            mounted: AtomicBool::new(true),
        })
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RegenerateFailurePolicy) -> Self {
        self.machine = Mutex::new(PreviewMachine::new(policy));
        self
    }

    #[must_use]
    pub fn business_id(&self) -> BusinessId {
        self.business_id
    }

    #[must_use]
    pub fn business_name(&self) -> &str {
        &self.business_name
    }

    #[must_use]
    pub fn entry(&self) -> PreviewEntry {
        self.entry
    }

    /// Loads templates, generating them when none exist.
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`] while another call is outstanding,
    /// [`SessionError::Closed`] after teardown, and
    /// [`SessionError::Transition`] if the preview was already mounted.
    /// Remote failures are not errors here: they move the preview to `Error`.
    pub async fn mount(&self) -> Result<(), SessionError> {
        self.load(PreviewEvent::Mount).await
    }

    /// Re-runs the mount flow from `Error`.
    ///
    /// # Errors
    ///
    /// Same as [`mount`](Self::mount); `Transition` unless in `Error`.
    pub async fn retry(&self) -> Result<(), SessionError> {
        self.load(PreviewEvent::Retry).await
    }

    /// Replaces the current set with a freshly generated one.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAllowed`] when this entry does not offer regenerate
    /// in the current state, plus the errors listed on [`mount`](Self::mount).
    pub async fn regenerate(&self) -> Result<(), SessionError> {
        self.ensure_mounted()?;
        let _guard = self.in_flight.try_begin().ok_or(SessionError::Busy)?;
        {
            let mut machine = self.lock();
            if !self.entry.offers_regenerate(machine.state()) {
                return Err(SessionError::NotAllowed {
                    action: "regenerate",
                    entry: self.entry.label(),
                });
            }
            machine.apply(PreviewEvent::RegenerateRequested)?;
        }

        let result = self
            .controller
            .regenerate(self.business_id, self.desired_count)
            .await;
        self.settle(result)
    }

    /// Local only; never touches the network.
    ///
    /// # Errors
    ///
    /// [`SessionError::Transition`] outside `Ready` or for an index past the
    /// end of the set.
    pub fn select_variant(&self, index: usize) -> Result<(), SessionError> {
        self.ensure_mounted()?;
        self.lock().apply(PreviewEvent::SelectVariant(index))?;
        Ok(())
    }

    /// # Errors
    ///
    /// [`SessionError::Transition`] outside `Ready`.
    pub fn toggle_fullscreen(&self) -> Result<(), SessionError> {
        self.ensure_mounted()?;
        self.lock().apply(PreviewEvent::ToggleFullscreen)?;
        Ok(())
    }

    /// Closes the preview. Outstanding calls keep running; their results are
    /// ignored.
    pub fn teardown(&self) {
        if self.mounted.swap(false, Ordering::AcqRel) {
            tracing::debug!(
                business_id = %self.business_id,
                in_flight = self.in_flight.is_set(),
                "preview torn down"
            );
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_set()
    }

    #[must_use]
    pub fn snapshot(&self) -> PreviewState {
        self.lock().state().clone()
    }

    #[must_use]
    pub fn phase(&self) -> PreviewPhase {
        self.lock().phase()
    }

    #[must_use]
    pub fn status_line(&self) -> String {
        self.lock().state().status_line()
    }

    /// Whether the regenerate control is currently enabled.
    #[must_use]
    pub fn can_regenerate(&self) -> bool {
        !self.is_busy() && self.entry.offers_regenerate(self.lock().state())
    }

    #[must_use]
    pub fn can_retry(&self) -> bool {
        !self.is_busy() && self.entry.offers_retry(self.lock().state())
    }

    #[must_use]
    pub fn selected_template(&self) -> Option<Template> {
        self.lock()
            .state()
            .ready()
            .and_then(|view| view.selected().cloned())
    }

    /// The sandboxed surface for the selected variant, when one is showing.
    #[must_use]
    pub fn frame(&self) -> Option<SandboxFrame> {
        self.selected_template()
            .map(|template| SandboxFrame::new(&template, &self.business_name))
    }

    async fn load(&self, event: PreviewEvent) -> Result<(), SessionError> {
        self.ensure_mounted()?;
        let _guard = self.in_flight.try_begin().ok_or(SessionError::Busy)?;
        self.lock().apply(event)?;

        let result = self
            .controller
            .ensure_templates_with(self.business_id, self.desired_count, || {
                if self.is_mounted() {
                    if let Err(err) = self.lock().apply(PreviewEvent::GenerationStarted) {
                        tracing::debug!(error = %err, "generation started outside loading");
                    }
                }
            })
            .await;
        self.settle(result)
    }

    fn settle(&self, result: Result<TemplateSet, AcquisitionError>) -> Result<(), SessionError> {
        if !self.is_mounted() {
            tracing::debug!(
                business_id = %self.business_id,
                ok = result.is_ok(),
                "preview closed before the call finished, dropping result"
            );
            return Ok(());
        }
        let event = match result {
            Ok(set) => PreviewEvent::Loaded(set),
            Err(err) => PreviewEvent::Failed(err.message),
        };
        self.lock().apply(event)?;
        Ok(())
    }

    fn ensure_mounted(&self) -> Result<(), SessionError> {
        if self.is_mounted() {
            Ok(())
        } else {
            Err(SessionError::Closed)
        }
    }

    fn lock(&self) -> MutexGuard<'_, PreviewMachine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
