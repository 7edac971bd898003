//! The training application service.

use crate::error::TrainingError;
use crate::view::{DialogHistory, DialogOverview, Exchange, StartedDialog, TurnView};
use medtrain_ai::{LlmError, TextGenerator, fallback_summary};
use medtrain_conversation::{
    DialogSession, DialogStore, ScenarioStore, ScenarioSummary, TurnRole, estimate_tokens,
};
use medtrain_core::{DialogId, Result, ScenarioId};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, instrument, warn};

/// Owner recorded when a dialog is started without a user id.
pub const ANONYMOUS_USER: &str = "anonymous";

fn default_summary_timeout_seconds() -> u64 {
    30
}

/// Tunables for the training service.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Upper bound on one summarization call before the placeholder is used.
    #[serde(default = "default_summary_timeout_seconds")]
    pub summary_timeout_seconds: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            summary_timeout_seconds: default_summary_timeout_seconds(),
        }
    }
}

/// Input for starting a dialog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartTraining {
    pub scenario_id: Option<String>,
    pub user_id: Option<String>,
}

/// Input for one message exchange.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendMessage {
    pub dialog_id: Option<String>,
    pub message: Option<String>,
}

/// Runs training dialogs against the configured stores and generator.
///
/// Exchanges on the same dialog are serialized within the process; stores
/// additionally reject stale saves, which covers other processes.
pub struct TrainingService {
    dialogs: Arc<dyn DialogStore>,
    scenarios: Arc<dyn ScenarioStore>,
    generator: Arc<dyn TextGenerator>,
    summary_timeout: Duration,
    locks: Mutex<HashMap<DialogId, Arc<AsyncMutex<()>>>>,
}

impl TrainingService {
    #[must_use]
    pub fn new(
        dialogs: Arc<dyn DialogStore>,
        scenarios: Arc<dyn ScenarioStore>,
        generator: Arc<dyn TextGenerator>,
        config: &TrainingConfig,
    ) -> Self {
        Self {
            dialogs,
            scenarios,
            generator,
            summary_timeout: Duration::from_secs(config.summary_timeout_seconds),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Lists every scenario, ordered by title.
    #[instrument(skip(self))]
    pub async fn list_scenarios(&self) -> Result<Vec<ScenarioSummary>, TrainingError> {
        let scenarios = self
            .scenarios
            .list_all()
            .await
            .map_err(TrainingError::from)?;
        Ok(scenarios.iter().map(|s| s.summary()).collect())
    }

    /// Starts a new, empty dialog on a scenario.
    #[instrument(skip(self, request))]
    pub async fn start_training(
        &self,
        request: StartTraining,
    ) -> Result<StartedDialog, TrainingError> {
        let raw_id = required_id(request.scenario_id.as_deref(), "scenario_id")?;
        let user_id = request
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(ANONYMOUS_USER);

        let not_found = || TrainingError::ScenarioNotFound {
            id: raw_id.to_string(),
        };
        let scenario_id: ScenarioId = raw_id.parse().map_err(|_| not_found())?;
        let scenario = self
            .scenarios
            .load(scenario_id)
            .await
            .map_err(TrainingError::from)?
            .ok_or_else(not_found)?;

        let mut session = DialogSession::start(scenario, user_id);
        self.dialogs
            .save(&mut session)
            .await
            .map_err(TrainingError::from)?;

        info!(dialog_id = %session.id(), scenario_id = %scenario_id, user_id, "training dialog started");

        Ok(StartedDialog {
            dialog_id: session.id(),
            scenario: session.scenario().summary(),
        })
    }

    /// Sends a trainee message and returns the simulated patient's reply.
    ///
    /// Compacts older turns first when the dialog is over budget. A failed
    /// or slow summarizer degrades to a placeholder summary; a failed reply
    /// aborts the exchange and nothing is saved.
    #[instrument(skip(self, request))]
    pub async fn send_message(&self, request: SendMessage) -> Result<Exchange, TrainingError> {
        let raw_id = required_id(request.dialog_id.as_deref(), "dialog_id")?;
        let message = request
            .message
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| TrainingError::invalid("message is required"))?;
        let dialog_id = parse_dialog_id(raw_id)?;

        let lock = self.dialog_lock(dialog_id);
        let _guard = lock.lock().await;

        let mut session = self.load_session(dialog_id, raw_id).await?;

        let tokens = estimate_tokens(&message);
        let user_turn = session
            .add_turn(TurnRole::User, message, tokens)
            .map_err(TrainingError::from)?;

        if session.needs_summarization() {
            self.compact(&mut session).await;
        }

        let context = session.context_for_generation();
        let generation = self
            .generator
            .generate(&context)
            .await
            .map_err(|e| {
                warn!(dialog_id = %dialog_id, error = %e, "reply generation failed");
                TrainingError::from(e)
            })?;

        let assistant_turn = session
            .add_turn(TurnRole::Assistant, generation.text, generation.tokens)
            .map_err(|e| {
                TrainingError::from(LlmError::BadResponse {
                    reason: e.to_string(),
                })
            })?;

        self.dialogs
            .save(&mut session)
            .await
            .map_err(TrainingError::from)?;

        info!(
            dialog_id = %dialog_id,
            total_tokens = session.total_tokens(),
            turns = session.turns().len(),
            "exchange completed"
        );

        Ok(Exchange {
            user_message: TurnView::from(&user_turn),
            assistant_response: TurnView::from(&assistant_turn),
        })
    }

    /// Returns the full transcript of a dialog.
    #[instrument(skip(self))]
    pub async fn dialog_history(
        &self,
        dialog_id: Option<&str>,
    ) -> Result<DialogHistory, TrainingError> {
        let raw_id = required_id(dialog_id, "dialog_id")?;
        let id = parse_dialog_id(raw_id)?;
        let session = self.load_session(id, raw_id).await?;
        Ok(DialogHistory::from(&session))
    }

    /// Lists a user's dialogs, newest first.
    #[instrument(skip(self))]
    pub async fn list_dialogs(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<DialogOverview>, TrainingError> {
        let user_id = required_id(user_id, "user_id")?;
        let sessions = self
            .dialogs
            .list_by_user(user_id)
            .await
            .map_err(TrainingError::from)?;
        Ok(sessions.iter().map(DialogOverview::from).collect())
    }

    async fn load_session(
        &self,
        id: DialogId,
        raw_id: &str,
    ) -> Result<DialogSession, TrainingError> {
        let session = self
            .dialogs
            .load(id)
            .await
            .map_err(TrainingError::from)?
            .ok_or_else(|| TrainingError::DialogNotFound {
                id: raw_id.to_string(),
            })?;
        Ok(session)
    }

    /// Replaces all but the recent turns with a summary.
    async fn compact(&self, session: &mut DialogSession) {
        let eligible = session.turns_eligible_for_summary().to_vec();
        if eligible.is_empty() {
            return;
        }

        let fallback = || fallback_summary(eligible.len());
        let summary = match tokio::time::timeout(
            self.summary_timeout,
            self.generator.summarize(&eligible),
        )
        .await
        {
            Ok(Ok(text)) if !text.trim().is_empty() => text,
            Ok(Ok(_)) => {
                warn!(dialog_id = %session.id(), "summarizer returned empty text, using placeholder");
                fallback()
            }
            Ok(Err(e)) => {
                warn!(dialog_id = %session.id(), error = %e, "summarization failed, using placeholder");
                fallback()
            }
            Err(_) => {
                warn!(dialog_id = %session.id(), "summarization timed out, using placeholder");
                fallback()
            }
        };

        session.collapse_to_summary(&summary);
        info!(
            dialog_id = %session.id(),
            summarized_turns = eligible.len(),
            total_tokens = session.total_tokens(),
            "dialog compacted"
        );
    }

    fn dialog_lock(&self, id: DialogId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        Arc::clone(locks.entry(id).or_default())
    }
}

fn required_id<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, TrainingError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| TrainingError::invalid(format!("{field} is required")))?;
    Ok(value)
}

fn parse_dialog_id(raw: &str) -> Result<DialogId, TrainingError> {
    let id = raw.parse().map_err(|_| TrainingError::DialogNotFound {
        id: raw.to_string(),
    })?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use medtrain_ai::{ContextEntry, Generation, LlmError};
    use medtrain_conversation::{
        InMemoryDialogStore, InMemoryScenarioStore, SUMMARY_PREFIX, Scenario, Turn,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum SummaryBehavior {
        Text(&'static str),
        Blank,
        Fail,
        Hang,
    }

    /// Replies with a fixed token count and records what it was asked.
    struct ScriptedGenerator {
        reply_tokens: u32,
        reply_error: Option<LlmError>,
        summary: SummaryBehavior,
        summarize_calls: AtomicUsize,
        contexts: Mutex<Vec<Vec<ContextEntry>>>,
    }

    impl ScriptedGenerator {
        fn new(reply_tokens: u32) -> Self {
            Self {
                reply_tokens,
                reply_error: None,
                summary: SummaryBehavior::Text("They discussed symptoms."),
                summarize_calls: AtomicUsize::new(0),
                contexts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, context: &[ContextEntry]) -> std::result::Result<Generation, LlmError> {
            self.contexts.lock().unwrap().push(context.to_vec());
            if let Some(err) = &self.reply_error {
                return Err(err.clone());
            }
            let last = context.last().map(|e| e.text.clone()).unwrap_or_default();
            Ok(Generation {
                text: format!("Reply to: {last}"),
                tokens: self.reply_tokens,
            })
        }

        async fn summarize(&self, _turns: &[Turn]) -> std::result::Result<String, LlmError> {
            self.summarize_calls.fetch_add(1, Ordering::SeqCst);
            match self.summary {
                SummaryBehavior::Text(text) => Ok(text.to_string()),
                SummaryBehavior::Blank => Ok("  ".to_string()),
                SummaryBehavior::Fail => Err(LlmError::BadResponse {
                    reason: "no alternatives".to_string(),
                }),
                SummaryBehavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok("too late".to_string())
                }
            }
        }
    }

    struct Fixture {
        service: TrainingService,
        generator: Arc<ScriptedGenerator>,
        scenario: Scenario,
    }

    fn scenario(title: &str, max_tokens: u32) -> Scenario {
        Scenario::new(
            ScenarioId::new(),
            title,
            "Patient has waited two hours",
            "You are an irritated patient.",
            max_tokens,
        )
        .unwrap()
    }

    fn fixture(generator: ScriptedGenerator) -> Fixture {
        let scenario = scenario("Angry patient", 1000);
        let generator = Arc::new(generator);
        let service = TrainingService::new(
            Arc::new(InMemoryDialogStore::new()),
            Arc::new(InMemoryScenarioStore::with_scenarios([scenario.clone()])),
            generator.clone(),
            &TrainingConfig {
                summary_timeout_seconds: 5,
            },
        );
        Fixture {
            service,
            generator,
            scenario,
        }
    }

    async fn start(f: &Fixture) -> String {
        f.service
            .start_training(StartTraining {
                scenario_id: Some(f.scenario.id().to_string()),
                user_id: Some("alice".to_string()),
            })
            .await
            .unwrap()
            .dialog_id
            .to_string()
    }

    async fn send(f: &Fixture, dialog_id: &str, message: &str) -> Result<Exchange, TrainingError> {
        f.service
            .send_message(SendMessage {
                dialog_id: Some(dialog_id.to_string()),
                message: Some(message.to_string()),
            })
            .await
    }

    #[tokio::test]
    async fn start_returns_scenario_summary() {
        let f = fixture(ScriptedGenerator::new(10));

        let started = f
            .service
            .start_training(StartTraining {
                scenario_id: Some(f.scenario.id().to_string()),
                user_id: None,
            })
            .await
            .unwrap();

        assert_eq!(started.scenario, f.scenario.summary());
        let dialogs = f.service.list_dialogs(Some(ANONYMOUS_USER)).await.unwrap();
        assert_eq!(dialogs.len(), 1);
        assert_eq!(dialogs[0].id, started.dialog_id);
        assert_eq!(dialogs[0].message_count, 0);
    }

    #[tokio::test]
    async fn start_requires_scenario_id() {
        let f = fixture(ScriptedGenerator::new(10));

        let err = f
            .service
            .start_training(StartTraining::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err.current_context(),
            TrainingError::InvalidArgument { .. }
        ));
    }

    #[tokio::test]
    async fn start_with_unknown_scenario_is_not_found() {
        let f = fixture(ScriptedGenerator::new(10));

        for id in [ScenarioId::new().to_string(), "not-an-id".to_string()] {
            let err = f
                .service
                .start_training(StartTraining {
                    scenario_id: Some(id.clone()),
                    user_id: None,
                })
                .await
                .unwrap_err();
            assert_eq!(
                err.current_context(),
                &TrainingError::ScenarioNotFound { id }
            );
        }
    }

    #[tokio::test]
    async fn exchange_appends_user_and_assistant_turns() {
        let f = fixture(ScriptedGenerator::new(12));
        let dialog_id = start(&f).await;

        let exchange = send(&f, &dialog_id, "Good afternoon, how can I help?")
            .await
            .unwrap();

        assert_eq!(exchange.user_message.role, TurnRole::User);
        assert_eq!(exchange.user_message.content, "Good afternoon, how can I help?");
        assert_eq!(exchange.assistant_response.role, TurnRole::Assistant);
        assert_eq!(
            exchange.assistant_response.content,
            "Reply to: Good afternoon, how can I help?"
        );

        let history = f.service.dialog_history(Some(&dialog_id)).await.unwrap();
        assert_eq!(history.messages.len(), 2);
        assert_eq!(
            history.total_tokens,
            u64::from(estimate_tokens("Good afternoon, how can I help?")) + 12
        );

        let contexts = f.generator.contexts.lock().unwrap();
        assert_eq!(contexts[0][0], ContextEntry::system("You are an irritated patient."));
        assert_eq!(contexts[0][1], ContextEntry::user("Good afternoon, how can I help?"));
    }

    #[tokio::test]
    async fn blank_message_is_rejected_and_nothing_saved() {
        let f = fixture(ScriptedGenerator::new(12));
        let dialog_id = start(&f).await;

        let err = send(&f, &dialog_id, "   ").await.unwrap_err();
        assert!(matches!(
            err.current_context(),
            TrainingError::InvalidArgument { .. }
        ));

        let err = f
            .service
            .send_message(SendMessage {
                dialog_id: Some(dialog_id.clone()),
                message: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.current_context(),
            TrainingError::InvalidArgument { .. }
        ));

        let history = f.service.dialog_history(Some(&dialog_id)).await.unwrap();
        assert!(history.messages.is_empty());
        assert!(f.generator.contexts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_message_is_invalid_even_for_unknown_dialog() {
        let f = fixture(ScriptedGenerator::new(12));
        let id = DialogId::new().to_string();

        for message in ["", "  ", "\n\t"] {
            let err = send(&f, &id, message).await.unwrap_err();
            assert!(matches!(
                err.current_context(),
                TrainingError::InvalidArgument { .. }
            ));
        }
    }

    #[tokio::test]
    async fn unknown_dialog_is_not_found() {
        let f = fixture(ScriptedGenerator::new(12));
        let id = DialogId::new().to_string();

        let err = send(&f, &id, "Hello").await.unwrap_err();

        assert_eq!(err.current_context(), &TrainingError::DialogNotFound { id });
    }

    #[tokio::test]
    async fn generation_timeout_aborts_exchange() {
        let mut generator = ScriptedGenerator::new(12);
        generator.reply_error = Some(LlmError::Timeout);
        let f = fixture(generator);
        let dialog_id = start(&f).await;

        let err = send(&f, &dialog_id, "Hello").await.unwrap_err();

        assert_eq!(
            err.current_context(),
            &TrainingError::Upstream(crate::UpstreamFailure::Timeout)
        );
        let history = f.service.dialog_history(Some(&dialog_id)).await.unwrap();
        assert!(history.messages.is_empty());
    }

    #[tokio::test]
    async fn blank_reply_is_bad_response() {
        struct Blank;

        #[async_trait]
        impl TextGenerator for Blank {
            async fn generate(
                &self,
                _context: &[ContextEntry],
            ) -> std::result::Result<Generation, LlmError> {
                Ok(Generation {
                    text: " ".to_string(),
                    tokens: 0,
                })
            }
        }

        let scenario = scenario("Angry patient", 1000);
        let service = TrainingService::new(
            Arc::new(InMemoryDialogStore::new()),
            Arc::new(InMemoryScenarioStore::with_scenarios([scenario.clone()])),
            Arc::new(Blank),
            &TrainingConfig::default(),
        );
        let started = service
            .start_training(StartTraining {
                scenario_id: Some(scenario.id().to_string()),
                user_id: None,
            })
            .await
            .unwrap();

        let err = service
            .send_message(SendMessage {
                dialog_id: Some(started.dialog_id.to_string()),
                message: Some("Hello".to_string()),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.current_context(),
            TrainingError::Upstream(crate::UpstreamFailure::BadResponse { .. })
        ));
    }

    #[tokio::test]
    async fn over_budget_dialog_is_compacted_before_reply() {
        // "Hello there" estimates to 2 tokens; each reply costs 300.
        let f = fixture(ScriptedGenerator::new(300));
        let dialog_id = start(&f).await;

        for _ in 0..3 {
            send(&f, &dialog_id, "Hello there").await.unwrap();
        }
        assert_eq!(f.generator.summarize_calls.load(Ordering::SeqCst), 0);

        // The fourth user turn pushes the total to 908, above 800.
        send(&f, &dialog_id, "Hello there").await.unwrap();
        assert_eq!(f.generator.summarize_calls.load(Ordering::SeqCst), 1);

        let history = f.service.dialog_history(Some(&dialog_id)).await.unwrap();
        assert_eq!(history.messages.len(), 7);
        assert_eq!(history.messages[0].role, TurnRole::System);
        assert_eq!(
            history.messages[0].content,
            format!("{SUMMARY_PREFIX}\nThey discussed symptoms.")
        );
        assert_eq!(
            history.total_tokens,
            u64::from(estimate_tokens("They discussed symptoms.")) + 2 + 300 + 2 + 300 + 2 + 300
        );

        // The reply was generated from the compacted context.
        let contexts = f.generator.contexts.lock().unwrap();
        let last = contexts.last().unwrap();
        assert_eq!(last.len(), 1 + 6);
        assert!(last[1].text.starts_with(SUMMARY_PREFIX));
    }

    #[tokio::test]
    async fn short_dialog_over_budget_is_not_compacted() {
        let f = fixture(ScriptedGenerator::new(900));
        let dialog_id = start(&f).await;

        send(&f, &dialog_id, "Hello there").await.unwrap();
        send(&f, &dialog_id, "Hello there").await.unwrap();

        assert_eq!(f.generator.summarize_calls.load(Ordering::SeqCst), 0);
        let history = f.service.dialog_history(Some(&dialog_id)).await.unwrap();
        assert_eq!(history.messages.len(), 4);
    }

    #[tokio::test]
    async fn failed_summary_falls_back_to_placeholder() {
        let mut generator = ScriptedGenerator::new(300);
        generator.summary = SummaryBehavior::Fail;
        let f = fixture(generator);
        let dialog_id = start(&f).await;

        for _ in 0..4 {
            send(&f, &dialog_id, "Hello there").await.unwrap();
        }

        let history = f.service.dialog_history(Some(&dialog_id)).await.unwrap();
        assert_eq!(
            history.messages[0].content,
            format!("{SUMMARY_PREFIX}\n[summary of 2 messages]")
        );
        assert_eq!(history.messages.len(), 7);
    }

    #[tokio::test]
    async fn blank_summary_falls_back_to_placeholder() {
        let mut generator = ScriptedGenerator::new(300);
        generator.summary = SummaryBehavior::Blank;
        let f = fixture(generator);
        let dialog_id = start(&f).await;

        for _ in 0..4 {
            send(&f, &dialog_id, "Hello there").await.unwrap();
        }

        assert_eq!(f.generator.summarize_calls.load(Ordering::SeqCst), 1);
        let history = f.service.dialog_history(Some(&dialog_id)).await.unwrap();
        assert_eq!(
            history.messages[0].content,
            format!("{SUMMARY_PREFIX}\n[summary of 2 messages]")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_summary_falls_back_to_placeholder() {
        let mut generator = ScriptedGenerator::new(300);
        generator.summary = SummaryBehavior::Hang;
        let f = fixture(generator);
        let dialog_id = start(&f).await;

        for _ in 0..4 {
            send(&f, &dialog_id, "Hello there").await.unwrap();
        }

        let history = f.service.dialog_history(Some(&dialog_id)).await.unwrap();
        assert!(history.messages[0].content.ends_with("[summary of 2 messages]"));
    }

    #[tokio::test]
    async fn concurrent_exchanges_on_one_dialog_are_serialized() {
        let f = fixture(ScriptedGenerator::new(10));
        let dialog_id = start(&f).await;

        let (a, b) = tokio::join!(
            send(&f, &dialog_id, "First question"),
            send(&f, &dialog_id, "Second question"),
        );
        a.unwrap();
        b.unwrap();

        let history = f.service.dialog_history(Some(&dialog_id)).await.unwrap();
        assert_eq!(history.messages.len(), 4);
        let roles: Vec<_> = history.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            [
                TurnRole::User,
                TurnRole::Assistant,
                TurnRole::User,
                TurnRole::Assistant
            ]
        );
        assert_eq!(
            history.total_tokens,
            u64::from(estimate_tokens("First question"))
                + u64::from(estimate_tokens("Second question"))
                + 20
        );
    }

    #[tokio::test]
    async fn history_requires_dialog_id() {
        let f = fixture(ScriptedGenerator::new(10));
        let err = f.service.dialog_history(None).await.unwrap_err();
        assert!(matches!(
            err.current_context(),
            TrainingError::InvalidArgument { .. }
        ));
    }

    #[tokio::test]
    async fn list_dialogs_puts_recently_active_first() {
        let f = fixture(ScriptedGenerator::new(10));
        let first = start(&f).await;
        let second = start(&f).await;

        send(&f, &first, "Are you still there?").await.unwrap();

        let ids: Vec<String> = f
            .service
            .list_dialogs(Some("alice"))
            .await
            .unwrap()
            .iter()
            .map(|d| d.id.to_string())
            .collect();
        assert_eq!(ids, [first, second]);
    }

    #[tokio::test]
    async fn list_dialogs_requires_user_id() {
        let f = fixture(ScriptedGenerator::new(10));
        let err = f.service.list_dialogs(Some("  ")).await.unwrap_err();
        assert!(matches!(
            err.current_context(),
            TrainingError::InvalidArgument { .. }
        ));
    }

    #[tokio::test]
    async fn scenarios_are_listed_by_title() {
        let store = InMemoryScenarioStore::new();
        store.insert(scenario("Worried parent", 2000));
        store.insert(scenario("Angry patient", 2000));
        let service = TrainingService::new(
            Arc::new(InMemoryDialogStore::new()),
            Arc::new(store),
            Arc::new(ScriptedGenerator::new(1)),
            &TrainingConfig::default(),
        );

        let titles: Vec<_> = service
            .list_scenarios()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();

        assert_eq!(titles, ["Angry patient", "Worried parent"]);
    }
}
