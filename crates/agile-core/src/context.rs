use crate::error::{ConsultError, Result};
use crate::types::{
    ChallengeKind, Complexity, ExperienceLevel, Goal, Methodology, QuestionId, TeamSize,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stored in place of an empty multi-select answer.
pub const NOT_SPECIFIED: &str = "Not specified";

pub const DEFAULT_INDUSTRY: &str = "unknown";
pub const DEFAULT_METHODOLOGY: &str = "None/Traditional";

// ---------------------------------------------------------------------------
// Answer
// ---------------------------------------------------------------------------

/// A single value for text/select questions, a list for multi-select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multi(Vec<String>),
}

impl Answer {
    pub fn single(value: impl Into<String>) -> Self {
        Answer::Single(value.into())
    }

    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answer::Multi(values.into_iter().map(Into::into).collect())
    }

    /// Check the answer against the shape `id` expects and normalize it.
    ///
    /// Blank single answers are rejected. Empty multi-select answers become
    /// [`NOT_SPECIFIED`]; a lone string for a multi-select question is
    /// wrapped into a one-element list.
    pub fn validate_for(self, id: QuestionId) -> Result<Answer> {
        if id.is_multi() {
            let items: Vec<String> = match self {
                Answer::Single(s) => vec![s],
                Answer::Multi(items) => items,
            };
            let items: Vec<String> = items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if items.is_empty() {
                return Ok(Answer::single(NOT_SPECIFIED));
            }
            return Ok(Answer::Multi(items));
        }

        match self {
            Answer::Single(s) if s.trim().is_empty() => Err(ConsultError::validation(
                id.as_str(),
                "answer cannot be empty",
            )),
            Answer::Single(s) => Ok(Answer::Single(s.trim().to_string())),
            Answer::Multi(_) => Err(ConsultError::validation(
                id.as_str(),
                "expected a single value, got a list",
            )),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Single(s) => f.write_str(s),
            Answer::Multi(items) => f.write_str(&items.join(", ")),
        }
    }
}

// ---------------------------------------------------------------------------
// UnknownReference
// ---------------------------------------------------------------------------

/// An answer value the knowledge base does not recognise. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownReference {
    pub field: QuestionId,
    pub value: String,
}

impl fmt::Display for UnknownReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised {} value '{}'", self.field, self.value)
    }
}

// ---------------------------------------------------------------------------
// ProjectContext
// ---------------------------------------------------------------------------

/// Answered facts for one consultation. Missing answers read as fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectContext {
    answers: BTreeMap<QuestionId, Answer>,
}

impl ProjectContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from already validated answers.
    pub fn from_answers(answers: BTreeMap<QuestionId, Answer>) -> Self {
        Self { answers }
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn get(&self, id: QuestionId) -> Option<&Answer> {
        self.answers.get(&id)
    }

    pub fn set(&mut self, id: QuestionId, answer: Answer) {
        self.answers.insert(id, answer);
    }

    /// A meaningful single value, ignoring blanks and [`NOT_SPECIFIED`].
    pub fn single(&self, id: QuestionId) -> Option<&str> {
        match self.get(id)? {
            Answer::Single(s) => {
                let s = s.trim();
                (!s.is_empty() && s != NOT_SPECIFIED).then_some(s)
            }
            Answer::Multi(_) => None,
        }
    }

    /// Raw list values, ignoring blanks and [`NOT_SPECIFIED`].
    pub fn list(&self, id: QuestionId) -> Vec<&str> {
        let values: Vec<&str> = match self.get(id) {
            None => Vec::new(),
            Some(Answer::Single(s)) => vec![s.as_str()],
            Some(Answer::Multi(items)) => items.iter().map(String::as_str).collect(),
        };
        values
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != NOT_SPECIFIED)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Typed accessors with fallbacks
    // -----------------------------------------------------------------------

    /// The team size as answered, for interpolation into responses.
    pub fn team_size_label(&self) -> &str {
        self.single(QuestionId::TeamSize)
            .unwrap_or(TeamSize::Medium.label())
    }

    pub fn team_size(&self) -> TeamSize {
        let label = self.team_size_label();
        TeamSize::from_answer(label).unwrap_or_else(|| {
            tracing::warn!(team_size = label, "unrecognised team size, assuming medium");
            TeamSize::Medium
        })
    }

    pub fn industry(&self) -> &str {
        self.single(QuestionId::Industry).unwrap_or(DEFAULT_INDUSTRY)
    }

    pub fn current_methodology_label(&self) -> &str {
        self.single(QuestionId::CurrentMethodology)
            .unwrap_or(DEFAULT_METHODOLOGY)
    }

    /// `None` when the team follows no recognised methodology.
    pub fn current_methodology(&self) -> Option<Methodology> {
        self.current_methodology_label().parse().ok()
    }

    pub fn experience_level(&self) -> ExperienceLevel {
        self.single(QuestionId::ExperienceLevel)
            .and_then(ExperienceLevel::from_answer)
            .unwrap_or_default()
    }

    pub fn complexity(&self) -> Complexity {
        self.single(QuestionId::ProjectComplexity)
            .and_then(Complexity::from_answer)
            .unwrap_or_default()
    }

    /// Selected challenges as answered, recognised or not.
    pub fn challenge_answers(&self) -> Vec<&str> {
        self.list(QuestionId::Challenges)
    }

    /// Recognised challenges in selection order.
    pub fn challenges(&self) -> Vec<ChallengeKind> {
        self.challenge_answers()
            .into_iter()
            .filter_map(ChallengeKind::from_answer)
            .collect()
    }

    pub fn has_challenge(&self, kind: ChallengeKind) -> bool {
        self.challenges().contains(&kind)
    }

    pub fn goal_answers(&self) -> Vec<&str> {
        self.list(QuestionId::Goals)
    }

    /// Recognised goals in selection order.
    pub fn goals(&self) -> Vec<Goal> {
        self.goal_answers()
            .into_iter()
            .filter_map(Goal::from_answer)
            .collect()
    }

    pub fn has_goal(&self, goal: Goal) -> bool {
        self.goals().contains(&goal)
    }

    /// Challenge, goal and methodology answers the knowledge base cannot
    /// resolve. Each is logged once per call.
    pub fn unknown_references(&self) -> Vec<UnknownReference> {
        let mut unknown = Vec::new();
        for value in self.challenge_answers() {
            if ChallengeKind::from_answer(value).is_none() {
                unknown.push(UnknownReference {
                    field: QuestionId::Challenges,
                    value: value.to_string(),
                });
            }
        }
        for value in self.goal_answers() {
            if Goal::from_answer(value).is_none() {
                unknown.push(UnknownReference {
                    field: QuestionId::Goals,
                    value: value.to_string(),
                });
            }
        }
        if let Some(value) = self.single(QuestionId::CurrentMethodology) {
            let is_listed_option = question(QuestionId::CurrentMethodology)
                .options
                .iter()
                .any(|o| o.eq_ignore_ascii_case(value));
            if !is_listed_option && value.parse::<Methodology>().is_err() {
                unknown.push(UnknownReference {
                    field: QuestionId::CurrentMethodology,
                    value: value.to_string(),
                });
            }
        }
        for reference in &unknown {
            tracing::warn!(field = %reference.field, value = %reference.value, "unknown reference");
        }
        unknown
    }
}

// ---------------------------------------------------------------------------
// Questionnaire
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    Text,
    Select,
    MultiSelect,
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: &'static str,
    pub kind: QuestionKind,
    #[serde(skip_serializing_if = "has_no_options")]
    pub options: &'static [&'static str],
}

fn has_no_options(options: &&[&str]) -> bool {
    options.is_empty()
}

static QUESTIONS: [Question; 7] = [
    Question {
        id: QuestionId::TeamSize,
        prompt: "How large is your team?",
        kind: QuestionKind::Select,
        options: &["1-5 members", "6-12 members", "13+ members"],
    },
    Question {
        id: QuestionId::Industry,
        prompt: "What industry are you in? (e.g., IT, Finance, Healthcare)",
        kind: QuestionKind::Text,
        options: &[],
    },
    Question {
        id: QuestionId::CurrentMethodology,
        prompt: "Which agile methodology are you currently using?",
        kind: QuestionKind::Select,
        options: &[
            "None/Traditional",
            "Scrum",
            "Kanban",
            "XP",
            "Lean",
            "Hybrid",
            "Other",
        ],
    },
    Question {
        id: QuestionId::ExperienceLevel,
        prompt: "What is your team's experience level with agile practices?",
        kind: QuestionKind::Select,
        options: &["Beginner", "Intermediate", "Advanced"],
    },
    Question {
        id: QuestionId::Challenges,
        prompt: "What challenges are you facing? (Select all that apply)",
        kind: QuestionKind::MultiSelect,
        options: &[
            "Resistance to change",
            "Inconsistent estimation",
            "Scope creep",
            "Poor communication",
            "Lack of engagement",
            "Meeting deadlines",
            "Quality issues",
            "Stakeholder management",
        ],
    },
    Question {
        id: QuestionId::Goals,
        prompt: "What are your primary goals for improving your process? (Select all that apply)",
        kind: QuestionKind::MultiSelect,
        options: &[
            "Faster delivery",
            "Higher quality",
            "Better predictability",
            "Team satisfaction",
            "Reduced costs",
            "Better customer collaboration",
            "More innovation",
        ],
    },
    Question {
        id: QuestionId::ProjectComplexity,
        prompt: "How complex is your project? (e.g., simple, moderate, complex)",
        kind: QuestionKind::Select,
        options: &["Simple", "Moderate", "Complex"],
    },
];

/// The assessment questionnaire, in presentation order.
pub fn questions() -> &'static [Question] {
    &QUESTIONS
}

pub fn question(id: QuestionId) -> &'static Question {
    &QUESTIONS[id as usize]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
