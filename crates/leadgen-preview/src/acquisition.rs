//! Get-or-generate and regenerate policies for a business's templates.
//!
//! Existing templates are never silently regenerated: [`AcquisitionController::ensure_templates`]
//! only generates when the listed set is empty, so calling it repeatedly
//! without a regenerate in between never creates additional templates.
//!
//! The controller does not coalesce concurrent calls. Callers disable the
//! triggering control while a call is outstanding (see [`crate::guard`]).

use std::sync::Arc;

use leadgen_client::TemplateService;
use leadgen_core::{BusinessId, TemplateSet};

use crate::error::{AcquisitionError, AcquisitionStage};

pub struct AcquisitionController<S: ?Sized> {
    service: Arc<S>,
}

impl<S: ?Sized> Clone for AcquisitionController<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<S> AcquisitionController<S>
where
    S: TemplateService + ?Sized,
{
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    #[must_use]
    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    /// Returns the existing set, generating `desired_count` variants only
    /// when none exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError`] if listing or generation fails. A list
    /// failure is never treated as "no templates" here.
    pub async fn ensure_templates(
        &self,
        business_id: BusinessId,
        desired_count: u32,
    ) -> Result<TemplateSet, AcquisitionError> {
        self.ensure_templates_with(business_id, desired_count, || {})
            .await
    }

    /// Same as [`ensure_templates`](Self::ensure_templates), calling
    /// `on_generate` right before the generation request is issued so a
    /// caller can switch its copy from "loading" to "generating".
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError`] if listing or generation fails.
    pub async fn ensure_templates_with<F>(
        &self,
        business_id: BusinessId,
        desired_count: u32,
        on_generate: F,
    ) -> Result<TemplateSet, AcquisitionError>
    where
        F: FnOnce() + Send,
    {
        let existing = self
            .service
            .list_templates(business_id)
            .await
            .map_err(|e| AcquisitionError::new(AcquisitionStage::List, e))?;

        if !existing.is_empty() {
            tracing::debug!(%business_id, count = existing.len(), "using existing templates");
            return Ok(existing);
        }

        tracing::info!(%business_id, desired_count, "no templates yet, generating");
        on_generate();
        let generated = self
            .service
            .generate_templates(business_id, desired_count)
            .await
            .map_err(|e| {
                tracing::warn!(%business_id, error = %e, "template generation failed");
                AcquisitionError::new(AcquisitionStage::Generate, e)
            })?;
        if generated.is_empty() {
            tracing::warn!(%business_id, "generation succeeded but returned no templates");
        }
        Ok(generated)
    }

    /// Discards the current set in favour of a freshly generated one. The
    /// server decides what happens to the old templates; the caller simply
    /// replaces its view with the result.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError`] if regeneration fails.
    pub async fn regenerate(
        &self,
        business_id: BusinessId,
        desired_count: u32,
    ) -> Result<TemplateSet, AcquisitionError> {
        tracing::info!(%business_id, desired_count, "regenerating templates");
        self.service
            .regenerate_templates(business_id, desired_count)
            .await
            .map_err(|e| {
                tracing::warn!(%business_id, error = %e, "template regeneration failed");
                AcquisitionError::new(AcquisitionStage::Regenerate, e)
            })
    }

    /// Best-effort listing for the detail page: any failure reads as "none".
    pub async fn existing_templates(&self, business_id: BusinessId) -> Option<TemplateSet> {
        match self.service.list_templates(business_id).await {
            Ok(set) if set.is_empty() => None,
            Ok(set) => Some(set),
            Err(err) => {
                tracing::warn!(
                    %business_id,
                    error = %err,
                    "could not list templates, showing none"
                );
                None
            }
        }
    }
}
