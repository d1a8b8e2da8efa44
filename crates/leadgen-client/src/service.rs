//! The remote operations the preview orchestration depends on.

use async_trait::async_trait;
use leadgen_core::{Business, BusinessId, Evaluation, TemplateSet};

use crate::error::ClientError;

/// Remote template and business service.
///
/// Implementations are network-backed and may be slow (generation takes
/// 10–30 s) or fail. None of the operations coalesce concurrent calls.
#[async_trait]
pub trait TemplateService: Send + Sync {
    /// Fetches a business record. A missing business is [`ClientError::NotFound`].
    async fn get_business(&self, business_id: BusinessId) -> Result<Business, ClientError>;

    /// Fetches the latest evaluation. `Ok(None)` means "not evaluated yet".
    async fn get_evaluation(
        &self,
        business_id: BusinessId,
    ) -> Result<Option<Evaluation>, ClientError>;

    /// Runs an evaluation synchronously. May update the business score server-side.
    async fn trigger_evaluation(&self, business_id: BusinessId)
        -> Result<Evaluation, ClientError>;

    /// Lists the existing set, possibly empty. Never generates.
    async fn list_templates(&self, business_id: BusinessId) -> Result<TemplateSet, ClientError>;

    /// Generates a fresh set. `count` is a hint; the server may return fewer or more.
    async fn generate_templates(
        &self,
        business_id: BusinessId,
        count: u32,
    ) -> Result<TemplateSet, ClientError>;

    /// Replaces the existing set with a newly generated one.
    async fn regenerate_templates(
        &self,
        business_id: BusinessId,
        count: u32,
    ) -> Result<TemplateSet, ClientError>;
}
