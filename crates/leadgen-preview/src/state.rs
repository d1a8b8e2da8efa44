//! Preview state machine.
//!
//! ```text
//! Idle ──Mount──▶ Loading ──GenerationStarted──▶ Generating
//!                    │                               │
//!                    ├──Loaded──▶ Ready ◀──Loaded────┤
//!                    └──Failed──▶ Error ◀──Failed────┘
//! Ready ──RegenerateRequested──▶ Generating
//! Ready ──SelectVariant / ToggleFullscreen──▶ Ready
//! Error ──Retry──▶ Loading,  Error ──RegenerateRequested──▶ Generating
//! ```
//!
//! Each state carries only the data valid in it. There is no terminal state.

use leadgen_core::{Template, TemplateSet};
use thiserror::Error;

/// What to show after a regeneration fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegenerateFailurePolicy {
    /// Show only the error.
    #[default]
    Discard,
    /// Keep the last good set next to the error banner.
    RetainLastGood,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    /// Listing came back empty and the first set is being generated.
    Initial,
    /// The user asked for a fresh set.
    Regenerate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadyView {
    templates: TemplateSet,
    selected_index: usize,
    fullscreen: bool,
}

impl ReadyView {
    fn new(templates: TemplateSet) -> Self {
        Self {
            templates,
            selected_index: 0,
            fullscreen: false,
        }
    }

    #[must_use]
    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    #[must_use]
    pub fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// `None` only for an empty set.
    #[must_use]
    pub fn selected(&self) -> Option<&Template> {
        self.templates.get(self.selected_index)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorView {
    message: String,
    last_good: Option<TemplateSet>,
}

impl ErrorView {
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Present only under [`RegenerateFailurePolicy::RetainLastGood`].
    #[must_use]
    pub fn last_good(&self) -> Option<&TemplateSet> {
        self.last_good.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewState {
    Idle,
    Loading,
    Generating {
        kind: GenerationKind,
        previous: Option<TemplateSet>,
    },
    Ready(ReadyView),
    Error(ErrorView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewPhase {
    Idle,
    Loading,
    Generating,
    Ready,
    Error,
}

impl std::fmt::Display for PreviewPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreviewPhase::Idle => write!(f, "idle"),
            PreviewPhase::Loading => write!(f, "loading"),
            PreviewPhase::Generating => write!(f, "generating"),
            PreviewPhase::Ready => write!(f, "ready"),
            PreviewPhase::Error => write!(f, "error"),
        }
    }
}

impl PreviewState {
    #[must_use]
    pub fn phase(&self) -> PreviewPhase {
        match self {
            PreviewState::Idle => PreviewPhase::Idle,
            PreviewState::Loading => PreviewPhase::Loading,
            PreviewState::Generating { .. } => PreviewPhase::Generating,
            PreviewState::Ready(_) => PreviewPhase::Ready,
            PreviewState::Error(_) => PreviewPhase::Error,
        }
    }

    #[must_use]
    pub fn ready(&self) -> Option<&ReadyView> {
        match self {
            PreviewState::Ready(view) => Some(view),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&ErrorView> {
        match self {
            PreviewState::Error(view) => Some(view),
            _ => None,
        }
    }

    /// User-facing copy for the current state.
    #[must_use]
    pub fn status_line(&self) -> String {
        match self {
            PreviewState::Idle => String::new(),
            PreviewState::Loading => "Loading templates…".to_string(),
            PreviewState::Generating { .. } => {
                "Generating templates with AI… this can take 10–30 seconds".to_string()
            }
            PreviewState::Ready(view) if view.is_empty() => {
                "No templates were generated. Regenerate to try again.".to_string()
            }
            PreviewState::Ready(view) => view.templates.availability_label(),
            PreviewState::Error(view) => view.message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewEvent {
    Mount,
    Retry,
    GenerationStarted,
    Loaded(TemplateSet),
    Failed(String),
    RegenerateRequested,
    SelectVariant(usize),
    ToggleFullscreen,
}

impl PreviewEvent {
    fn name(&self) -> &'static str {
        match self {
            PreviewEvent::Mount => "mount",
            PreviewEvent::Retry => "retry",
            PreviewEvent::GenerationStarted => "generation-started",
            PreviewEvent::Loaded(_) => "loaded",
            PreviewEvent::Failed(_) => "failed",
            PreviewEvent::RegenerateRequested => "regenerate",
            PreviewEvent::SelectVariant(_) => "select-variant",
            PreviewEvent::ToggleFullscreen => "toggle-fullscreen",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot apply {event} while {phase}")]
pub struct InvalidTransition {
    pub phase: PreviewPhase,
    pub event: &'static str,
}

/// The state plus the policy governing regenerate failures.
#[derive(Debug, Clone)]
pub struct PreviewMachine {
    state: PreviewState,
    policy: RegenerateFailurePolicy,
}

impl Default for PreviewMachine {
    fn default() -> Self {
        Self::new(RegenerateFailurePolicy::default())
    }
}

impl PreviewMachine {
    #[must_use]
    pub fn new(policy: RegenerateFailurePolicy) -> Self {
        Self {
            state: PreviewState::Idle,
            policy,
        }
    }

    #[must_use]
    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> PreviewPhase {
        self.state.phase()
    }

    #[must_use]
    pub fn policy(&self) -> RegenerateFailurePolicy {
        self.policy
    }

    /// Applies `event`. On an invalid event the state is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] when `event` is not accepted in the
    /// current state, or selects a variant outside the loaded set.
    pub fn apply(&mut self, event: PreviewEvent) -> Result<(), InvalidTransition> {
        let invalid = InvalidTransition {
            phase: self.state.phase(),
            event: event.name(),
        };
        let retain = self.policy == RegenerateFailurePolicy::RetainLastGood;

        let next = match (&mut self.state, event) {
            (PreviewState::Idle, PreviewEvent::Mount)
            | (PreviewState::Error(_), PreviewEvent::Retry) => PreviewState::Loading,

            (PreviewState::Loading, PreviewEvent::GenerationStarted) => PreviewState::Generating {
                kind: GenerationKind::Initial,
                previous: None,
            },

            (
                PreviewState::Loading | PreviewState::Generating { .. },
                PreviewEvent::Loaded(set),
            ) => PreviewState::Ready(ReadyView::new(set)),

            (PreviewState::Loading, PreviewEvent::Failed(message)) => {
                PreviewState::Error(ErrorView {
                    message,
                    last_good: None,
                })
            }

            (PreviewState::Generating { previous, .. }, PreviewEvent::Failed(message)) => {
                PreviewState::Error(ErrorView {
                    message,
                    last_good: previous.take(),
                })
            }

            (PreviewState::Ready(view), PreviewEvent::RegenerateRequested) => {
                PreviewState::Generating {
                    kind: GenerationKind::Regenerate,
                    previous: retain.then(|| view.templates.clone()),
                }
            }

            (PreviewState::Error(view), PreviewEvent::RegenerateRequested) => {
                PreviewState::Generating {
                    kind: GenerationKind::Regenerate,
                    previous: if retain { view.last_good.take() } else { None },
                }
            }

            (PreviewState::Ready(view), PreviewEvent::SelectVariant(index)) => {
                if index >= view.templates.len() {
                    return Err(invalid);
                }
                view.selected_index = index;
                return Ok(());
            }

            (PreviewState::Ready(view), PreviewEvent::ToggleFullscreen) => {
                view.fullscreen = !view.fullscreen;
                return Ok(());
            }

            _ => return Err(invalid),
        };

        tracing::debug!(from = %self.state.phase(), to = %next.phase(), "preview transition");
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
