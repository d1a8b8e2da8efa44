//! In-memory `TemplateService` that behaves like the dashboard API and
//! records every call it receives.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use leadgen_client::{ClientError, TemplateService};
use leadgen_core::{Business, BusinessId, Evaluation, Impact, Improvement, Template, TemplateSet};
use tokio::sync::Notify;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Call {
    GetBusiness,
    GetEvaluation,
    TriggerEvaluation,
    List,
    Generate(u32),
    Regenerate(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    GetEvaluation,
    TriggerEvaluation,
    List,
    Generate,
    Regenerate,
}

/// A scripted failure: `404` maps to `NotFound`, anything else to `Api`.
#[derive(Debug, Clone)]
struct Failure {
    op: Op,
    status: u16,
    message: Option<String>,
}

impl Failure {
    fn into_error(self) -> ClientError {
        if self.status == 404 {
            ClientError::NotFound {
                context: format!("{:?}", self.op),
            }
        } else {
            ClientError::Api {
                status: self.status,
                context: format!("{:?}", self.op),
                message: self.message,
            }
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeService {
    business: Mutex<Option<Business>>,
    evaluation: Mutex<Option<Evaluation>>,
    stored: Mutex<TemplateSet>,
    failures: Mutex<VecDeque<Failure>>,
    calls: Mutex<Vec<Call>>,
    /// When set, generated sets have this many templates regardless of the request.
    generate_yields: Mutex<Option<u32>>,
    /// When set, generate and regenerate wait for a notification before answering.
    generation_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_business(business: Business) -> Self {
        let fake = Self::new();
        *fake.business.lock().unwrap() = Some(business);
        fake
    }

    pub(crate) fn with_stored(self, set: TemplateSet) -> Self {
        *self.stored.lock().unwrap() = set;
        self
    }

    pub(crate) fn with_evaluation(self, evaluation: Evaluation) -> Self {
        *self.evaluation.lock().unwrap() = Some(evaluation);
        self
    }

    pub(crate) fn fail_next(&self, op: Op, status: u16, message: Option<&str>) {
        self.failures.lock().unwrap().push_back(Failure {
            op,
            status,
            message: message.map(str::to_owned),
        });
    }

    pub(crate) fn yield_on_generate(&self, count: u32) {
        *self.generate_yields.lock().unwrap() = Some(count);
    }

    pub(crate) fn gate_generation(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.generation_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// The set the server currently holds, i.e. the last one it answered with.
    pub(crate) fn stored(&self) -> TemplateSet {
        self.stored.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, call: Call) -> usize {
        self.calls().into_iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn take_failure(&self, op: Op) -> Option<ClientError> {
        let mut failures = self.failures.lock().unwrap();
        let index = failures.iter().position(|f| f.op == op)?;
        failures.remove(index).map(Failure::into_error)
    }

    async fn wait_for_gate(&self) {
        let gate = self.generation_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn fresh_set(&self, business_id: BusinessId, requested: u32) -> TemplateSet {
        let count = self.generate_yields.lock().unwrap().unwrap_or(requested);
        let set = TemplateSet::new(
            (1..=count)
                .map(|variant| template_for(business_id, variant))
                .collect(),
        );
        *self.stored.lock().unwrap() = set.clone();
        set
    }
}

#[async_trait]
impl TemplateService for FakeService {
    async fn get_business(&self, business_id: BusinessId) -> Result<Business, ClientError> {
        self.record(Call::GetBusiness);
        self.business
            .lock()
            .unwrap()
            .clone()
            .filter(|b| b.id == business_id)
            .ok_or_else(|| ClientError::NotFound {
                context: format!("getBusiness(id={business_id})"),
            })
    }

    async fn get_evaluation(
        &self,
        _business_id: BusinessId,
    ) -> Result<Option<Evaluation>, ClientError> {
        self.record(Call::GetEvaluation);
        match self.take_failure(Op::GetEvaluation) {
            Some(ClientError::NotFound { .. }) => Ok(None),
            Some(err) => Err(err),
            None => Ok(self.evaluation.lock().unwrap().clone()),
        }
    }

    async fn trigger_evaluation(
        &self,
        business_id: BusinessId,
    ) -> Result<Evaluation, ClientError> {
        self.record(Call::TriggerEvaluation);
        if let Some(err) = self.take_failure(Op::TriggerEvaluation) {
            return Err(err);
        }
        let evaluation = evaluation_for(business_id, 52.0);
        if let Some(business) = self.business.lock().unwrap().as_mut() {
            business.score = Some(evaluation.aggregate_score);
            business.has_evaluation = true;
        }
        *self.evaluation.lock().unwrap() = Some(evaluation.clone());
        Ok(evaluation)
    }

    async fn list_templates(&self, _business_id: BusinessId) -> Result<TemplateSet, ClientError> {
        self.record(Call::List);
        if let Some(err) = self.take_failure(Op::List) {
            return Err(err);
        }
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn generate_templates(
        &self,
        business_id: BusinessId,
        count: u32,
    ) -> Result<TemplateSet, ClientError> {
        self.record(Call::Generate(count));
        self.wait_for_gate().await;
        if let Some(err) = self.take_failure(Op::Generate) {
            return Err(err);
        }
        if !self.stored.lock().unwrap().is_empty() {
            return Err(ClientError::Api {
                status: 400,
                context: "generate".to_string(),
                message: Some("Templates already exist for this business.".to_string()),
            });
        }
        Ok(self.fresh_set(business_id, count))
    }

    async fn regenerate_templates(
        &self,
        business_id: BusinessId,
        count: u32,
    ) -> Result<TemplateSet, ClientError> {
        self.record(Call::Regenerate(count));
        self.wait_for_gate().await;
        if let Some(err) = self.take_failure(Op::Regenerate) {
            return Err(err);
        }
        Ok(self.fresh_set(business_id, count))
    }
}

pub(crate) fn business(score: Option<f64>) -> Business {
    Business {
        id: Uuid::new_v4(),
        name: "Acme Plumbing Ltd".to_string(),
        category: Some("Plumbing".to_string()),
        location: Some("London".to_string()),
        address: None,
        email: None,
        phone: None,
        website_url: Some("https://acmeplumbing.co.uk/".to_string()),
        score,
        description: None,
        has_evaluation: score.is_some(),
        has_template: false,
        created_at: None,
        updated_at: None,
    }
}

pub(crate) fn template_for(business_id: BusinessId, variant: u32) -> Template {
    Template {
        id: Uuid::new_v4(),
        business_id,
        variant_number: variant,
        html_content: format!("<section class=\"hero\">Variant {variant}</section>"),
        css_content: Some(".hero { color: #123; }".to_string()),
        js_content: None,
        improvements_made: vec![Improvement {
            category: "performance".to_string(),
            description: "Inlined critical CSS".to_string(),
            impact: Some(Impact::High),
        }],
        generated_at: Utc::now(),
    }
}

pub(crate) fn template_set(business_id: BusinessId, count: u32) -> TemplateSet {
    TemplateSet::new(
        (1..=count)
            .map(|variant| template_for(business_id, variant))
            .collect(),
    )
}

pub(crate) fn evaluation_for(business_id: BusinessId, aggregate: f64) -> Evaluation {
    Evaluation {
        id: Some(Uuid::new_v4()),
        business_id,
        performance_score: Some(0.41),
        seo_score: Some(0.6),
        accessibility_score: None,
        aggregate_score: aggregate,
        evaluated_at: Utc::now(),
    }
}
