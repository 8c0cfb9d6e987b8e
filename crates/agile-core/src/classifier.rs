use crate::config::ConsultConfig;
use crate::context::ProjectContext;
use crate::knowledge::KnowledgeBase;
use crate::recommend::select_practices;
use crate::rules::default_rules;
use crate::types::{ChallengeKind, Methodology};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// QueryContext
// ---------------------------------------------------------------------------

/// Everything a rule may read. Keyword matches are computed once up front.
pub struct QueryContext<'a> {
    pub query: &'a str,
    pub lower: String,
    pub context: &'a ProjectContext,
    pub kb: &'a KnowledgeBase,
    pub config: &'a ConsultConfig,
    /// First challenge whose phrase or synonym occurs in the query.
    pub challenge: Option<ChallengeKind>,
    /// First methodology named as a whole word in the query.
    pub methodology: Option<Methodology>,
}

impl<'a> QueryContext<'a> {
    pub fn new(
        query: &'a str,
        context: &'a ProjectContext,
        kb: &'a KnowledgeBase,
        config: &'a ConsultConfig,
    ) -> Self {
        let lower = query.trim().to_lowercase();
        let challenge = find_challenge(&lower, kb);
        let methodology = find_methodology(&lower);
        Self {
            query,
            lower,
            context,
            kb,
            config,
            challenge,
            methodology,
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lower.contains(needle)
    }

    pub fn team_size(&self) -> &str {
        self.context.team_size_label()
    }

    pub fn industry(&self) -> &str {
        self.context.industry()
    }
}

fn find_challenge(lower: &str, kb: &KnowledgeBase) -> Option<ChallengeKind> {
    kb.challenges()
        .iter()
        .find(|entry| {
            lower.contains(&entry.kind.phrase()) || entry.synonyms.iter().any(|s| lower.contains(s))
        })
        .map(|entry| entry.kind)
}

fn methodology_patterns() -> &'static [(Methodology, Regex)] {
    static PATTERNS: OnceLock<Vec<(Methodology, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        Methodology::all()
            .iter()
            .filter_map(|&m| {
                Regex::new(&format!(r"\b{}\b", m.as_str()))
                    .ok()
                    .map(|re| (m, re))
            })
            .collect()
    })
}

// Whole words only: "experience" must not read as XP, so "scrumban" or
// "kanbans" match no methodology either.
fn find_methodology(lower: &str) -> Option<Methodology> {
    methodology_patterns()
        .iter()
        .find(|(_, re)| re.is_match(lower))
        .map(|(m, _)| *m)
}

// ---------------------------------------------------------------------------
// Resolution (output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    BoardSetup,
    Practice,
    Challenge,
    Metric,
    MethodologyOverview,
    General,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// Id of the rule that produced the response.
    pub rule: &'static str,
    pub intent: QueryIntent,
    pub response: String,
}

// ---------------------------------------------------------------------------
// QueryRule
// ---------------------------------------------------------------------------

/// A fn-pointer rule. `matches` decides, `respond` renders.
pub struct QueryRule {
    pub id: &'static str,
    pub intent: QueryIntent,
    pub matches: fn(&QueryContext) -> bool,
    pub respond: fn(&QueryContext) -> String,
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

pub struct Resolver {
    rules: Vec<QueryRule>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl Resolver {
    pub fn new(rules: Vec<QueryRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[QueryRule] {
        &self.rules
    }

    /// First matching rule wins; unmatched queries get practice suggestions.
    /// Never fails and never mutates the context.
    pub fn resolve(&self, ctx: &QueryContext) -> Resolution {
        for rule in &self.rules {
            if (rule.matches)(ctx) {
                tracing::debug!(rule = rule.id, "query rule matched");
                return Resolution {
                    rule: rule.id,
                    intent: rule.intent,
                    response: (rule.respond)(ctx),
                };
            }
        }

        tracing::debug!("no query rule matched, using fallback");
        Resolution {
            rule: "fallback",
            intent: QueryIntent::Fallback,
            response: fallback_response(ctx),
        }
    }
}

/// Comma-joined first two values, or `default` when there are none.
pub(crate) fn first_two_or(values: &[&str], default: &str) -> String {
    if values.is_empty() {
        return default.to_string();
    }
    values.iter().take(2).copied().collect::<Vec<_>>().join(", ")
}

fn fallback_response(ctx: &QueryContext) -> String {
    let challenges = ctx.context.challenge_answers();
    let suggestions: String = select_practices(ctx.context)
        .iter()
        .take(2)
        .map(|p| format!("- {}: {}\n", p.practice, p.description))
        .collect();
    format!(
        "Your question about '{}' is noted, but I need more specificity to provide tailored advice \
         for your {} team in {}. Based on your context, consider these practices to address {}:\n\
         {suggestions}\
         Try asking about a specific practice (e.g., Kanban board), challenge (e.g., poor communication), \
         or metric (e.g., Cycle Time) for detailed guidance.",
        ctx.query.trim(),
        ctx.team_size(),
        ctx.industry(),
        first_two_or(&challenges, "your needs"),
    )
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

/// Offered when the caller submits an empty query.
pub fn starter_suggestions() -> &'static [&'static str] {
    &[
        "How do I set up a Kanban board for my team?",
        "How can I improve team engagement?",
        "What metrics should I track for Kanban?",
    ]
}

/// Follow-up questions tailored to the context; may be empty.
pub fn follow_up_suggestions(context: &ProjectContext) -> Vec<&'static str> {
    let mut suggestions = Vec::new();
    if context.has_challenge(ChallengeKind::ResistanceToChange) {
        suggestions.push("How can I reduce resistance to Kanban practices?");
    }
    if context.has_challenge(ChallengeKind::LackOfEngagement) {
        suggestions.push("How can I improve team engagement with daily standups?");
    }
    if context.current_methodology() == Some(Methodology::Kanban) {
        suggestions.push("How do I set up a Kanban board?");
        suggestions.push("What are best practices for WIP limits?");
    }
    suggestions
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
