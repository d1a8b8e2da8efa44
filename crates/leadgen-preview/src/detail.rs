//! Business detail page model.
//!
//! Only a missing business is fatal. The evaluation and template panels are
//! best effort: a failed read shows as "absent" and the rest of the page
//! stays usable. This is deliberately looser than the preview modal, which
//! surfaces the same template-list failure as an error.

use leadgen_client::TemplateService;
use leadgen_core::{Business, BusinessId, Evaluation, ScoreBand, TemplateSet};

use crate::acquisition::AcquisitionController;
use crate::error::DetailError;
use crate::guard::InFlightFlag;
use crate::session::{PreviewEntry, PreviewSession};

const EVALUATION_FALLBACK: &str = "Failed to evaluate website. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationStatus {
    Evaluated(Evaluation),
    /// No evaluation yet. A call to action, not an error.
    NotEvaluated,
}

#[derive(Debug, Clone)]
pub struct BusinessDetail {
    pub business: Business,
    pub evaluation: EvaluationStatus,
    /// `None` when there are none, the lead does not qualify, or listing failed.
    pub existing_templates: Option<TemplateSet>,
}

impl BusinessDetail {
    #[must_use]
    pub fn is_qualified_lead(&self) -> bool {
        self.business.is_qualified_lead()
    }

    #[must_use]
    pub fn score_band(&self) -> ScoreBand {
        self.business.score_band()
    }

    #[must_use]
    pub fn qualified_callout(&self) -> Option<&'static str> {
        self.is_qualified_lead().then_some(
            "Qualified lead: this website scored below 70. Preview an AI-improved version.",
        )
    }

    #[must_use]
    pub fn evaluation_prompt(&self) -> Option<&'static str> {
        matches!(self.evaluation, EvaluationStatus::NotEvaluated)
            .then_some("Not evaluated yet. Run an evaluation to score this website.")
    }

    #[must_use]
    pub fn template_count(&self) -> usize {
        self.existing_templates.as_ref().map_or(0, TemplateSet::len)
    }
}

pub struct DetailView<S: ?Sized> {
    controller: AcquisitionController<S>,
    business_id: BusinessId,
    evaluating: InFlightFlag,
}

impl<S> DetailView<S>
where
    S: TemplateService + ?Sized,
{
    pub fn new(controller: AcquisitionController<S>, business_id: BusinessId) -> Self {
        Self {
            controller,
            business_id,
            evaluating: InFlightFlag::new(),
        }
    }

    /// # Errors
    ///
    /// [`DetailError::NotFound`] when the business does not exist,
    /// [`DetailError::Unavailable`] when it could not be read.
    pub async fn load(&self) -> Result<BusinessDetail, DetailError> {
        let business_id = self.business_id;
        let service = self.controller.service();

        let business = service.get_business(business_id).await.map_err(|source| {
            if source.is_not_found() {
                DetailError::NotFound { business_id }
            } else {
                DetailError::Unavailable {
                    business_id,
                    source,
                }
            }
        })?;

        let evaluation = match service.get_evaluation(business_id).await {
            Ok(Some(evaluation)) => EvaluationStatus::Evaluated(evaluation),
            Ok(None) => EvaluationStatus::NotEvaluated,
            Err(err) => {
                tracing::warn!(
                    %business_id,
                    error = %err,
                    "could not read evaluation, showing none"
                );
                EvaluationStatus::NotEvaluated
            }
        };

        let existing_templates = if business.is_qualified_lead() {
            self.controller.existing_templates(business_id).await
        } else {
            None
        };

        Ok(BusinessDetail {
            business,
            evaluation,
            existing_templates,
        })
    }

    /// Runs an evaluation and reloads the page so the new score shows.
    ///
    /// # Errors
    ///
    /// [`DetailError::Busy`] while an evaluation is already running,
    /// [`DetailError::EvaluationFailed`] with the server's message, plus the
    /// errors of [`load`](Self::load).
    pub async fn evaluate(&self) -> Result<BusinessDetail, DetailError> {
        let _guard = self.evaluating.try_begin().ok_or(DetailError::Busy)?;
        let business_id = self.business_id;

        let evaluation = self
            .controller
            .service()
            .trigger_evaluation(business_id)
            .await
            .map_err(|source| DetailError::EvaluationFailed {
                message: source
                    .server_message()
                    .unwrap_or(EVALUATION_FALLBACK)
                    .to_string(),
                source,
            })?;
        tracing::info!(%business_id, score = evaluation.aggregate_score, "evaluation finished");

        self.load().await
    }

    #[must_use]
    pub fn is_evaluating(&self) -> bool {
        self.evaluating.is_set()
    }

    /// `None` for businesses that are not qualified leads.
    #[must_use]
    pub fn open_preview(
        &self,
        detail: &BusinessDetail,
        desired_count: u32,
    ) -> Option<PreviewSession<S>> {
        PreviewSession::open(
            self.controller.clone(),
            &detail.business,
            PreviewEntry::Detail,
            desired_count,
        )
    }
}
