use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use tokio::sync::Notify;

use crate::workflows::intake::catalog::{ChoiceOption, QuestionCatalog, QuestionDefinition};
use crate::workflows::intake::classification::{ClassificationTier, SeverityLevel};
use crate::workflows::intake::contact::LeadForm;
use crate::workflows::intake::session::{
    InMemorySessionStore, SessionEntry, SessionId, SessionStore, StoreError,
};
use crate::workflows::intake::submission::{
    ContactPoints, DeliveryError, SubmissionGateway, SubmissionPayload,
};
use crate::workflows::intake::{intake_router, IntakeService};

/// Answers used to walk the standard catalog; they sum to 33 (Matig).
pub(super) const STANDARD_ANSWERS: [(&str, u32); 7] = [
    ("werk_huishouden", 7),
    ("slapen", 5),
    ("sport_recreatie", 8),
    ("autorijden", 3),
    ("verzorging", 2),
    ("concentratie", 4),
    ("sociaal", 4),
];

pub(super) fn lead_form() -> LeadForm {
    LeadForm {
        name: "Jan Jansen".to_string(),
        email: "jan@example.nl".to_string(),
        phone: Some("06-12345678".to_string()),
        consent: true,
    }
}

pub(super) fn single_slider_catalog() -> QuestionCatalog {
    QuestionCatalog::new(vec![QuestionDefinition::slider(
        "pijn_nu",
        "Hoeveel pijn heeft u nu?",
    )])
    .expect("valid catalog")
}

/// Two scored questions plus one unscored choice worth 100.
pub(super) fn mixed_catalog() -> QuestionCatalog {
    QuestionCatalog::new(vec![
        QuestionDefinition::slider("werk", "Werk"),
        QuestionDefinition::slider("slapen", "Slapen"),
        QuestionDefinition::choice(
            "duur",
            "Hoe lang heeft u al klachten?",
            vec![
                ChoiceOption::new("Korter dan een week", 0),
                ChoiceOption::new("Langer dan een jaar", 100),
            ],
        )
        .unscored(),
    ])
    .expect("valid catalog")
}

pub(super) fn choice_catalog() -> QuestionCatalog {
    QuestionCatalog::new(vec![QuestionDefinition::choice(
        "frequentie",
        "Hoe vaak heeft u last?",
        vec![
            ChoiceOption::new("Soms", 3),
            ChoiceOption::new("Altijd", 10),
        ],
    )])
    .expect("valid catalog")
}

pub(super) fn tier(level: SeverityLevel, min: u32, max: u32) -> ClassificationTier {
    ClassificationTier {
        level,
        min,
        max,
        description: "",
        urgency: "",
    }
}

pub(super) fn build_service(
    gateway: RecordingGateway,
) -> (
    IntakeService<InMemorySessionStore, RecordingGateway>,
    Arc<InMemorySessionStore>,
    Arc<RecordingGateway>,
) {
    let store = Arc::new(InMemorySessionStore::default());
    let gateway = Arc::new(gateway);
    let service = IntakeService::new(store.clone(), gateway.clone(), ContactPoints::default());
    (service, store, gateway)
}

/// Drive a fresh session through every question and the lead form.
pub(super) fn walk_to_results<S, G>(service: &IntakeService<S, G>) -> String
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    let session_id = service.create_session().session_id.to_string();
    service.start(&session_id).expect("start questionnaire");
    for (question, value) in STANDARD_ANSWERS {
        service
            .answer(&session_id, question, value)
            .expect("answer accepted");
        service.next(&session_id).expect("advance");
    }
    service
        .capture_lead(&session_id, lead_form())
        .expect("lead accepted");
    session_id
}

pub(super) fn intake_router_with_service(
    service: IntakeService<InMemorySessionStore, RecordingGateway>,
) -> axum::Router {
    intake_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Debug, Clone, Copy)]
pub(super) enum GatewayReply {
    Accept,
    Reject(u16),
    Unconfigured,
}

/// Gateway double that records every payload it is handed.
pub(super) struct RecordingGateway {
    reply: GatewayReply,
    payloads: Mutex<Vec<SubmissionPayload>>,
}

impl RecordingGateway {
    pub(super) fn new(reply: GatewayReply) -> Self {
        Self {
            reply,
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn accepting() -> Self {
        Self::new(GatewayReply::Accept)
    }

    pub(super) fn payloads(&self) -> Vec<SubmissionPayload> {
        self.payloads.lock().expect("payload mutex").clone()
    }
}

#[async_trait]
impl SubmissionGateway for RecordingGateway {
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), DeliveryError> {
        self.payloads
            .lock()
            .expect("payload mutex")
            .push(payload.clone());
        match self.reply {
            GatewayReply::Accept => Ok(()),
            GatewayReply::Reject(status) => Err(DeliveryError::Rejected { status }),
            GatewayReply::Unconfigured => Err(DeliveryError::NotConfigured),
        }
    }
}

/// Gateway double that holds every delivery until the test releases it.
pub(super) struct HeldGateway {
    entered: Notify,
    release: Notify,
}

impl HeldGateway {
    pub(super) fn new() -> Self {
        Self {
            entered: Notify::new(),
            release: Notify::new(),
        }
    }

    pub(super) async fn wait_until_entered(&self) {
        self.entered.notified().await;
    }

    pub(super) fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl SubmissionGateway for HeldGateway {
    async fn deliver(&self, _: &SubmissionPayload) -> Result<(), DeliveryError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(())
    }
}

/// Store whose backend is always down.
pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn read(&self, _: SessionId, _: SessionEntry) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("storage disabled".to_string()))
    }

    fn write(&self, _: SessionId, _: SessionEntry, _: String) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage disabled".to_string()))
    }
}
