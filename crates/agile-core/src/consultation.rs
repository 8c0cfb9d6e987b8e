//! One consultation session: a context store, a transcript and the
//! operations a front end drives.

use crate::classifier::{follow_up_suggestions, QueryContext, Resolution, Resolver};
use crate::config::ConsultConfig;
use crate::context::{questions, Answer, ProjectContext, Question};
use crate::error::{ConsultError, Result};
use crate::knowledge::{knowledge_base, KnowledgeBase};
use crate::recommend::{compose, RecommendationBundle};
use crate::transcript::{Message, Transcript, TranscriptExport, TranscriptSink};
use crate::types::QuestionId;
use chrono::Utc;
use std::collections::BTreeMap;

const ONBOARDING_GREETING: &str = "Welcome to your Agile Project Consultant! I'll help you implement or improve agile practices. \
     To get started, run the assessment to share your team's context, or ask a specific question \
     about agile methodologies, practices, or challenges.";

pub struct Consultation {
    session_id: String,
    config: ConsultConfig,
    kb: &'static KnowledgeBase,
    resolver: Resolver,
    context: ProjectContext,
    transcript: Transcript,
}

impl Consultation {
    pub fn new(config: ConsultConfig) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            config,
            kb: knowledge_base(),
            resolver: Resolver::default(),
            context: ProjectContext::new(),
            transcript: Transcript::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn context(&self) -> &ProjectContext {
        &self.context
    }

    /// Reset the transcript, install `prior` (or an empty context) and
    /// record a greeting.
    pub fn start(&mut self, prior: Option<ProjectContext>) -> String {
        self.transcript.clear();
        self.context = prior.unwrap_or_default();

        let greeting = if self.context.is_empty() {
            ONBOARDING_GREETING.to_string()
        } else {
            format!(
                "Welcome back! I'm here to help {} optimize {}. \
                 Based on your context, I can suggest specific practices or answer questions. \
                 Try asking about a challenge or practice, or run a new assessment for fresh recommendations.",
                self.context
                    .single(QuestionId::TeamSize)
                    .unwrap_or("your team"),
                self.context
                    .single(QuestionId::CurrentMethodology)
                    .unwrap_or("agile practices"),
            )
        };

        tracing::info!(session = %self.session_id, returning = !self.context.is_empty(), "consultation started");
        self.transcript.push_agent(greeting.clone());
        greeting
    }

    pub fn list_questions(&self) -> &'static [Question] {
        questions()
    }

    /// Validate and store one answer. A rejected answer leaves the context
    /// untouched.
    pub fn submit_answer(&mut self, question_id: &str, answer: Answer) -> Result<()> {
        let id: QuestionId = question_id.parse()?;
        let answer = answer.validate_for(id)?;
        self.transcript.push_user(format!("{id}: {answer}"));
        self.context.set(id, answer);
        Ok(())
    }

    /// Validate a full assessment, then replace the context wholesale.
    pub fn submit_assessment(&mut self, answers: BTreeMap<String, Answer>) -> Result<()> {
        let validated = validate_assessment(answers)?;
        self.record_answers(&validated);
        self.context = ProjectContext::from_answers(validated);
        Ok(())
    }

    /// [`start`](Self::start) a returning session from a full assessment.
    /// Nothing changes when an answer is rejected; otherwise the answers are
    /// recorded after the greeting.
    pub fn resume(&mut self, answers: BTreeMap<String, Answer>) -> Result<String> {
        let validated = validate_assessment(answers)?;
        let greeting = self.start(Some(ProjectContext::from_answers(validated.clone())));
        self.record_answers(&validated);
        Ok(greeting)
    }

    fn record_answers(&mut self, answers: &BTreeMap<QuestionId, Answer>) {
        for (id, answer) in answers {
            self.transcript.push_user(format!("{id}: {answer}"));
        }
    }

    /// Compose recommendations for the current context and record a summary.
    pub fn recommend(&mut self) -> RecommendationBundle {
        let bundle = compose(&self.context, self.kb, &self.config);
        self.transcript
            .push_agent(bundle.summary(self.context.team_size_label()));
        bundle
    }

    /// Resolve a free-text question, recording both sides.
    pub fn ask(&mut self, text: &str) -> Resolution {
        self.transcript.push_user(text);
        let ctx = QueryContext::new(text, &self.context, self.kb, &self.config);
        let resolution = self.resolver.resolve(&ctx);
        self.transcript.push_agent(resolution.response.clone());
        resolution
    }

    pub fn query(&mut self, text: &str) -> String {
        self.ask(text).response
    }

    pub fn suggestions(&self) -> Vec<&'static str> {
        follow_up_suggestions(&self.context)
    }

    pub fn history(&self) -> &[Message] {
        self.transcript.messages()
    }

    /// Hand the transcript to `sink`. Success and failure are both noted in
    /// the transcript; failures also surface as [`ConsultError::Export`].
    pub fn export(&mut self, sink: &dyn TranscriptSink) -> Result<()> {
        let destination = sink.destination();
        let export = TranscriptExport {
            session_id: &self.session_id,
            exported_at: Utc::now(),
            context: &self.context,
            messages: self.transcript.messages(),
        };
        match sink.write(&export) {
            Ok(()) => {
                tracing::info!(session = %self.session_id, %destination, "conversation exported");
                self.transcript
                    .push_agent(format!("Conversation saved to {destination}."));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(session = %self.session_id, %destination, error = %e, "export failed");
                self.transcript
                    .push_agent(format!("Failed to save conversation: {e}."));
                Err(ConsultError::Export {
                    destination,
                    message: e.to_string(),
                })
            }
        }
    }

    pub fn context_summary(&self) -> String {
        let challenges = self.context.challenge_answers();
        let goals = self.context.goal_answers();
        format!(
            "Team: {}\nMethodology: {}\nChallenges: {}\nGoals: {}",
            self.context
                .single(QuestionId::TeamSize)
                .unwrap_or("unknown"),
            self.context
                .single(QuestionId::CurrentMethodology)
                .unwrap_or("unknown"),
            if challenges.is_empty() {
                "none".to_string()
            } else {
                challenges.join(", ")
            },
            if goals.is_empty() {
                "none".to_string()
            } else {
                goals.join(", ")
            },
        )
    }
}

fn validate_assessment(answers: BTreeMap<String, Answer>) -> Result<BTreeMap<QuestionId, Answer>> {
    if answers.is_empty() {
        return Err(ConsultError::validation(
            "assessment",
            "no answers were provided",
        ));
    }
    let mut validated = BTreeMap::new();
    for (key, answer) in answers {
        let id: QuestionId = key.parse()?;
        validated.insert(id, answer.validate_for(id)?);
    }
    Ok(validated)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{JsonFileSink, Role};
    use crate::types::Methodology;
    use tempfile::TempDir;

    struct FailingSink;

    impl TranscriptSink for FailingSink {
        fn destination(&self) -> String {
            "/nowhere/session.json".to_string()
        }

        fn write(&self, _export: &TranscriptExport<'_>) -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    fn kanban_answers() -> BTreeMap<String, Answer> {
        BTreeMap::from([
            ("team_size".to_string(), Answer::single("1-5 members")),
            ("challenges".to_string(), Answer::multi(["Poor communication"])),
            ("goals".to_string(), Answer::multi(["Faster delivery"])),
            ("current_methodology".to_string(), Answer::single("None/Traditional")),
            ("experience_level".to_string(), Answer::single("Beginner")),
            ("project_complexity".to_string(), Answer::single("Simple")),
        ])
    }

    #[test]
    fn start_without_context_onboards() {
        let mut c = Consultation::new(ConsultConfig::default());
        let greeting = c.start(None);
        assert!(greeting.starts_with("Welcome to your Agile Project Consultant!"));
        assert_eq!(c.history().len(), 1);
        assert_eq!(c.history()[0].role, Role::Agent);
    }

    #[test]
    fn start_with_context_welcomes_back_and_clears_transcript() {
        let mut c = Consultation::new(ConsultConfig::default());
        c.start(None);
        c.query("hello");
        let mut prior = ProjectContext::new();
        prior.set(QuestionId::TeamSize, Answer::single("13+ members"));
        prior.set(QuestionId::CurrentMethodology, Answer::single("Scrum"));
        let greeting = c.start(Some(prior));
        assert!(greeting.starts_with("Welcome back! I'm here to help 13+ members optimize Scrum."));
        assert_eq!(c.history().len(), 1);
    }

    #[test]
    fn submit_answer_records_user_entry() {
        let mut c = Consultation::new(ConsultConfig::default());
        c.submit_answer("team_size", Answer::single("1-5 members")).unwrap();
        c.submit_answer("challenges", Answer::multi(["Scope creep", "Quality issues"]))
            .unwrap();
        let last = c.history().last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.content, "challenges: Scope creep, Quality issues");
    }

    #[test]
    fn invalid_answers_leave_context_untouched() {
        let mut c = Consultation::new(ConsultConfig::default());
        c.submit_answer("industry", Answer::single("Finance")).unwrap();
        let before = c.context().clone();

        let err = c.submit_answer("industry", Answer::single("  ")).unwrap_err();
        assert!(matches!(err, ConsultError::Validation { ref field, .. } if field == "industry"));
        let err = c.submit_answer("favourite_color", Answer::single("blue")).unwrap_err();
        assert!(matches!(err, ConsultError::UnknownQuestion(_)));
        assert_eq!(c.context(), &before);
    }

    #[test]
    fn empty_multi_select_is_not_an_error() {
        let mut c = Consultation::new(ConsultConfig::default());
        c.submit_answer("goals", Answer::Multi(vec![])).unwrap();
        assert_eq!(c.history().last().unwrap().content, "goals: Not specified");
        assert!(c.context().goals().is_empty());
    }

    #[test]
    fn assessment_is_all_or_nothing() {
        let mut c = Consultation::new(ConsultConfig::default());
        c.submit_assessment(kanban_answers()).unwrap();
        let before = c.context().clone();

        let mut bad = kanban_answers();
        bad.insert("industry".to_string(), Answer::single(""));
        assert!(c.submit_assessment(bad).is_err());
        assert_eq!(c.context(), &before);
        assert_eq!(c.context().current_methodology(), None);
    }

    #[test]
    fn resume_greets_then_records_answers() {
        let mut c = Consultation::new(ConsultConfig::default());
        c.start(None);
        c.query("hello");

        let greeting = c.resume(kanban_answers()).unwrap();
        assert!(greeting.starts_with("Welcome back! I'm here to help 1-5 members optimize None/Traditional."));
        assert_eq!(c.history().len(), 1 + kanban_answers().len());
        assert_eq!(c.history()[0].role, Role::Agent);
        assert!(c
            .history()
            .iter()
            .any(|m| m.role == Role::User && m.content == "team_size: 1-5 members"));
        assert_eq!(c.context().team_size_label(), "1-5 members");
    }

    #[test]
    fn resume_with_bad_answers_changes_nothing() {
        let mut c = Consultation::new(ConsultConfig::default());
        c.start(None);
        let mut bad = kanban_answers();
        bad.insert("favourite_color".to_string(), Answer::single("blue"));

        assert!(matches!(c.resume(bad), Err(ConsultError::UnknownQuestion(_))));
        assert_eq!(c.history().len(), 1);
        assert!(c.context().is_empty());
    }

    #[test]
    fn kanban_scenario_end_to_end() {
        let mut c = Consultation::new(ConsultConfig::default());
        c.start(None);
        c.submit_assessment(kanban_answers()).unwrap();

        let bundle = c.recommend();
        assert_eq!(bundle.methodology.methodology, Methodology::Kanban);
        assert!(bundle.team_practices.len() >= 3);
        assert!(bundle.metrics.len() >= 3);
        assert_eq!(bundle.tools.len(), 3);
        assert!(c
            .history()
            .last()
            .unwrap()
            .content
            .starts_with("For your 1-5 members team, I recommend Kanban"));

        let answer = c.query("How do I set up a Kanban board?");
        assert!(answer.contains("5. Review and update the board daily in standups."));
        assert!(answer.contains("information radiator"));
    }

    #[test]
    fn query_records_both_sides_and_is_repeatable() {
        let mut c = Consultation::new(ConsultConfig::default());
        let first = c.query("asdkjasd");
        let second = c.query("asdkjasd");
        assert_eq!(first, second);
        assert!(first.contains("asdkjasd"));
        assert_eq!(c.history().len(), 4);
        assert_eq!(c.history()[0].role, Role::User);
        assert_eq!(c.history()[1].role, Role::Agent);
    }

    #[test]
    fn export_success_is_noted() {
        let dir = TempDir::new().unwrap();
        let mut c = Consultation::new(ConsultConfig::default());
        c.start(None);
        let sink = JsonFileSink::new(dir.path().join("advice"));
        c.export(&sink).unwrap();

        let saved = std::fs::read_to_string(dir.path().join("advice.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
        assert_eq!(value["session_id"], c.session_id());
        assert_eq!(value["messages"].as_array().unwrap().len(), 1);

        let note = &c.history().last().unwrap().content;
        assert!(note.starts_with("Conversation saved to "));
        assert!(note.ends_with("advice.json."));
    }

    #[test]
    fn export_failure_is_noted_and_returned() {
        let mut c = Consultation::new(ConsultConfig::default());
        c.start(None);
        let err = c.export(&FailingSink).unwrap_err();
        assert!(matches!(err, ConsultError::Export { ref destination, .. } if destination == "/nowhere/session.json"));
        let note = &c.history().last().unwrap().content;
        assert_eq!(note, "Failed to save conversation: read-only.");
        assert_eq!(c.history().len(), 2);
    }

    #[test]
    fn context_summary_lists_answers() {
        let mut c = Consultation::new(ConsultConfig::default());
        assert_eq!(
            c.context_summary(),
            "Team: unknown\nMethodology: unknown\nChallenges: none\nGoals: none"
        );
        c.submit_assessment(kanban_answers()).unwrap();
        assert_eq!(
            c.context_summary(),
            "Team: 1-5 members\nMethodology: None/Traditional\nChallenges: Poor communication\nGoals: Faster delivery"
        );
    }

    #[test]
    fn sessions_are_independent() {
        let mut a = Consultation::new(ConsultConfig::default());
        let b = Consultation::new(ConsultConfig::default());
        a.submit_answer("industry", Answer::single("Healthcare")).unwrap();
        assert!(b.context().is_empty());
        assert_ne!(a.session_id(), b.session_id());
    }
}
