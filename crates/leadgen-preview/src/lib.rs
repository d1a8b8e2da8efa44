//! Template acquisition and preview orchestration.
//!
//! - [`acquisition`] decides whether templates are listed, generated, or
//!   regenerated.
//! - [`state`] is the explicit preview state machine.
//! - [`session`] drives one mounted preview through the machine, with
//!   cooperative single-flight and teardown.
//! - [`sandbox`] and [`export`] turn a ready template into an isolated
//!   rendering surface and downloadable artifacts.
//! - [`card`] and [`detail`] are the two entry points that embed a preview,
//!   both gated by the shared score predicate.

pub mod acquisition;
pub mod card;
pub mod detail;
pub mod error;
pub mod export;
pub mod guard;
pub mod sandbox;
pub mod session;
pub mod state;

#[cfg(test)]
pub(crate) mod fake;

pub use acquisition::AcquisitionController;
pub use card::LeadCard;
pub use detail::{BusinessDetail, DetailView, EvaluationStatus};
pub use error::{AcquisitionError, AcquisitionStage, DetailError, ExportError, SessionError};
pub use export::{download_artifacts, standalone_blob, write_artifacts, ExportArtifact};
pub use guard::{InFlightFlag, InFlightGuard};
pub use sandbox::{escape_html, is_full_document, resolve_document, SandboxFrame};
pub use session::{PreviewEntry, PreviewSession};
pub use state::{
    ErrorView, GenerationKind, InvalidTransition, PreviewEvent, PreviewMachine, PreviewPhase,
    PreviewState, ReadyView, RegenerateFailurePolicy,
};
