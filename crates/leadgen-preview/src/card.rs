use leadgen_client::TemplateService;
use leadgen_core::{Business, ScoreBand};

use crate::acquisition::AcquisitionController;
use crate::session::{PreviewEntry, PreviewSession};

/// A business as shown in the list: name, score badge and whether the
/// preview button is rendered at all.
#[derive(Debug, Clone)]
pub struct LeadCard {
    pub business: Business,
    pub band: ScoreBand,
    pub preview_available: bool,
}

impl LeadCard {
    #[must_use]
    pub fn from_business(business: Business) -> Self {
        Self {
            band: business.score_band(),
            preview_available: business.is_qualified_lead(),
            business,
        }
    }

    #[must_use]
    pub fn score_label(&self) -> String {
        self.business.score_label()
    }

    /// `None` when the card shows no preview button.
    #[must_use]
    pub fn open_preview<S>(
        &self,
        controller: AcquisitionController<S>,
        desired_count: u32,
    ) -> Option<PreviewSession<S>>
    where
        S: TemplateService + ?Sized,
    {
        PreviewSession::open(controller, &self.business, PreviewEntry::Card, desired_count)
    }
}
