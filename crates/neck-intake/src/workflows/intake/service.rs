use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::http::StatusCode;
use chrono::Utc;
use tracing::{debug, info};

use super::answers::AnswerError;
use super::catalog::QuestionCatalog;
use super::classification::{ClassificationTier, TierTable, TierTableError};
use super::contact::LeadForm;
use super::report::format_report;
use super::scoring::{compute_score, max_score, score_breakdown};
use super::session::{
    load_session, save_session, IntakeSession, IntakeStep, SessionCache, SessionId,
    SessionStore, TransitionError, DEFAULT_SESSION_CACHE_CAPACITY,
};
use super::submission::{
    resolve_outcome, ContactPoints, SubmissionGateway, SubmissionOutcome, SubmissionPayload,
};
use super::views::{QuestionProgress, QuestionnaireView, ResultView, SessionView};

/// Service composing the questionnaire, session store and submission gateway.
///
/// Live sessions are cached in memory up to a fixed capacity; the store is
/// read when a session is not cached and written after every successful
/// mutation.
pub struct IntakeService<S, G> {
    catalog: QuestionCatalog,
    tiers: TierTable,
    max_score: u32,
    store: Arc<S>,
    gateway: Arc<G>,
    contact_points: ContactPoints,
    sessions: Mutex<SessionCache>,
}

impl<S, G> IntakeService<S, G>
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    /// Service over the standard seven-question catalog.
    pub fn new(store: Arc<S>, gateway: Arc<G>, contact_points: ContactPoints) -> Self {
        let catalog = QuestionCatalog::standard();
        Self {
            max_score: max_score(&catalog),
            catalog,
            tiers: TierTable::standard(),
            store,
            gateway,
            contact_points,
            sessions: Mutex::new(SessionCache::new(DEFAULT_SESSION_CACHE_CAPACITY)),
        }
    }

    /// Service over a custom catalog. The tiers must partition the catalog's score range.
    pub fn with_questionnaire(
        catalog: QuestionCatalog,
        tiers: Vec<ClassificationTier>,
        store: Arc<S>,
        gateway: Arc<G>,
        contact_points: ContactPoints,
    ) -> Result<Self, TierTableError> {
        let max_score = max_score(&catalog);
        let tiers = TierTable::new(tiers, max_score)?;
        Ok(Self {
            catalog,
            tiers,
            max_score,
            store,
            gateway,
            contact_points,
            sessions: Mutex::new(SessionCache::new(DEFAULT_SESSION_CACHE_CAPACITY)),
        })
    }

    /// Bound the number of sessions held in memory. Evicted sessions reload from the store.
    pub fn with_session_cache_capacity(mut self, capacity: usize) -> Self {
        self.sessions = Mutex::new(SessionCache::new(capacity));
        self
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn questionnaire(&self) -> QuestionnaireView {
        QuestionnaireView {
            questions: self.catalog.clone(),
            max_score: self.max_score,
            tiers: self.tiers.clone(),
        }
    }

    pub fn create_session(&self) -> SessionView {
        let session = IntakeSession::new(SessionId::generate(), &self.catalog);
        save_session(self.store.as_ref(), &session);
        let view = self.session_view(&session);

        info!(session = %session.id(), "intake session created");
        self.lock_sessions().insert(session);
        view
    }

    pub fn session(&self, raw_id: &str) -> Result<SessionView, IntakeServiceError> {
        self.inspect(raw_id, |session| Ok(self.session_view(session)))
    }

    pub fn start(&self, raw_id: &str) -> Result<SessionView, IntakeServiceError> {
        self.mutate(raw_id, |session| {
            session.start()?;
            Ok(self.session_view(session))
        })
    }

    pub fn answer(
        &self,
        raw_id: &str,
        raw_question: &str,
        value: u32,
    ) -> Result<SessionView, IntakeServiceError> {
        self.mutate(raw_id, |session| {
            let question = session.answer(&self.catalog, raw_question, value)?;
            debug!(session = %session.id(), %question, value, "answer recorded");
            Ok(self.session_view(session))
        })
    }

    pub fn next(&self, raw_id: &str) -> Result<SessionView, IntakeServiceError> {
        self.mutate(raw_id, |session| {
            session.next(&self.catalog)?;
            Ok(self.session_view(session))
        })
    }

    pub fn previous(&self, raw_id: &str) -> Result<SessionView, IntakeServiceError> {
        self.mutate(raw_id, |session| {
            session.previous()?;
            Ok(self.session_view(session))
        })
    }

    pub fn capture_lead(
        &self,
        raw_id: &str,
        form: LeadForm,
    ) -> Result<SessionView, IntakeServiceError> {
        self.mutate(raw_id, |session| {
            session.capture_lead(form)?;
            info!(session = %session.id(), "lead captured");
            Ok(self.session_view(session))
        })
    }

    pub fn reset(&self, raw_id: &str) -> Result<SessionView, IntakeServiceError> {
        self.mutate(raw_id, |session| {
            session.reset(&self.catalog);
            Ok(self.session_view(session))
        })
    }

    pub fn result(&self, raw_id: &str) -> Result<ResultView, IntakeServiceError> {
        self.inspect(raw_id, |session| {
            session.expect_step("view results", IntakeStep::Results)?;
            Ok(self.result_view(session))
        })
    }

    /// Send the finished intake to staff, falling back to a `mailto:` link.
    ///
    /// Only one submission per session may be in flight; the slot is released
    /// whatever the delivery outcome.
    pub async fn submit(&self, raw_id: &str) -> Result<SubmissionOutcome, IntakeServiceError> {
        let (ticket, payload) = self.inspect(raw_id, |session| {
            let ticket = session.begin_submission()?;
            Ok((ticket, self.payload(session)))
        })?;

        let delivery = self.gateway.deliver(&payload).await;
        let outcome = resolve_outcome(delivery, &payload, &self.contact_points);

        self.inspect(raw_id, |session| {
            session.finish_submission(ticket, outcome.is_delivered());
            Ok(())
        })?;

        info!(
            classification = payload.classification.label(),
            delivered = outcome.is_delivered(),
            "intake submission finished"
        );
        Ok(outcome)
    }

    fn payload(&self, session: &IntakeSession) -> SubmissionPayload {
        let result = self.result_view(session);
        SubmissionPayload::new(
            session.contact(),
            result.level,
            result.score,
            session.answers().clone(),
            result.report,
            Utc::now(),
        )
    }

    fn result_view(&self, session: &IntakeSession) -> ResultView {
        let score = compute_score(session.answers(), &self.catalog);
        let tier = self.tiers.classify(score);
        let report = format_report(
            session.contact(),
            score,
            self.max_score,
            tier,
            session.answers(),
            &self.catalog,
        );

        ResultView {
            session_id: session.id(),
            score,
            max_score: self.max_score,
            level: tier.level,
            description: tier.description,
            urgency: tier.urgency,
            components: score_breakdown(session.answers(), &self.catalog),
            report,
            submitted: session.is_submitted(),
        }
    }

    fn session_view(&self, session: &IntakeSession) -> SessionView {
        let progress = session
            .current_question(&self.catalog)
            .map(|question| QuestionProgress {
                current: session.cursor() + 1,
                total: self.catalog.len(),
                question: question.clone(),
                value: session.answers().value_or_zero(question.id),
            });
        let contact = Some(session.contact().clone()).filter(|contact| contact.is_captured());

        SessionView {
            session_id: session.id(),
            step: session.step(),
            progress,
            answers: session.answers().clone(),
            contact,
            submitting: session.is_submitting(),
            submitted: session.is_submitted(),
        }
    }

    /// Run an action that changes persisted state, saving the session on success.
    fn mutate<T>(
        &self,
        raw_id: &str,
        action: impl FnOnce(&mut IntakeSession) -> Result<T, TransitionError>,
    ) -> Result<T, IntakeServiceError> {
        self.inspect(raw_id, |session| {
            let output = action(session)?;
            save_session(self.store.as_ref(), session);
            Ok(output)
        })
    }

    /// Run an action against the cached session, loading it from the store first if needed.
    fn inspect<T>(
        &self,
        raw_id: &str,
        action: impl FnOnce(&mut IntakeSession) -> Result<T, TransitionError>,
    ) -> Result<T, IntakeServiceError> {
        let id = SessionId::parse(raw_id)
            .ok_or_else(|| IntakeServiceError::SessionNotFound(raw_id.to_string()))?;

        let mut sessions = self.lock_sessions();
        let session = sessions
            .get_or_load(id, || load_session(self.store.as_ref(), id, &self.catalog))
            .ok_or_else(|| IntakeServiceError::SessionNotFound(raw_id.to_string()))?;

        Ok(action(session)?)
    }

    #[cfg(test)]
    pub(crate) fn cached_sessions(&self) -> usize {
        self.lock_sessions().len()
    }

    #[cfg(test)]
    pub(crate) fn is_cached(&self, raw_id: &str) -> bool {
        SessionId::parse(raw_id).is_some_and(|id| self.lock_sessions().contains(id))
    }

    fn lock_sessions(&self) -> MutexGuard<'_, SessionCache> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeServiceError {
    #[error("session '{0}' not found")]
    SessionNotFound(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl IntakeServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            IntakeServiceError::SessionNotFound(_)
            | IntakeServiceError::Transition(TransitionError::Answer(
                AnswerError::UnknownQuestion(_),
            )) => StatusCode::NOT_FOUND,
            IntakeServiceError::Transition(
                TransitionError::Answer(_) | TransitionError::Lead(_),
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            IntakeServiceError::Transition(
                TransitionError::WrongStep { .. }
                | TransitionError::SubmissionInFlight
                | TransitionError::AlreadySubmitted,
            ) => StatusCode::CONFLICT,
        }
    }
}
