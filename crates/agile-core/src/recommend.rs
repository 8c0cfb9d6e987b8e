//! Recommendation composer.
//!
//! Aggregates the scorer with practice, tool, metric and challenge-advice
//! selection. The selectors key off the team's *current* methodology, while
//! the methodology recommendation comes from the scorer.

use crate::config::ConsultConfig;
use crate::context::{ProjectContext, UnknownReference};
use crate::knowledge::KnowledgeBase;
use crate::scorer::{recommend_methodology, MethodologyRecommendation};
use crate::types::{ChallengeKind, Goal, Methodology, MetricKind, TeamSize};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Practice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Practice {
    TestDrivenDevelopment,
    PairProgramming,
    InformationRadiators,
    BacklogRefinement,
    RegularRetrospectives,
    DefinitionOfDone,
    DailyStandups,
}

impl Practice {
    pub fn name(self) -> &'static str {
        match self {
            Practice::TestDrivenDevelopment => "Test-Driven Development",
            Practice::PairProgramming => "Pair Programming",
            Practice::InformationRadiators => "Information Radiators",
            Practice::BacklogRefinement => "Backlog Refinement",
            Practice::RegularRetrospectives => "Regular Retrospectives",
            Practice::DefinitionOfDone => "Definition of Done",
            Practice::DailyStandups => "Daily Standups",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Practice::TestDrivenDevelopment => {
                "Write tests before code to ensure quality and reduce defects."
            }
            Practice::PairProgramming => {
                "Two developers work together to improve code and collaboration."
            }
            Practice::InformationRadiators => "Visual boards to enhance transparency.",
            Practice::BacklogRefinement => "Regularly prioritize and refine the backlog.",
            Practice::RegularRetrospectives => "Reflect on processes to drive improvement.",
            Practice::DefinitionOfDone => "Criteria for task completion to ensure quality.",
            Practice::DailyStandups => "Short daily syncs to surface blockers early.",
        }
    }

    pub fn tips(self, team_size: &str) -> Vec<String> {
        let tips: [String; 3] = match self {
            Practice::TestDrivenDevelopment => [
                format!("For {team_size}, start TDD on a critical module."),
                "Use a testing framework suited to your stack.".into(),
                "Train team in a 2-hour workshop.".into(),
            ],
            Practice::PairProgramming => [
                format!("Rotate pairs weekly for {team_size} to share knowledge."),
                "Use tools like VS Code Live Share.".into(),
                "Set clear pairing guidelines.".into(),
            ],
            Practice::InformationRadiators => [
                format!("Create a digital board for {team_size} using Trello."),
                "Update daily in standups.".into(),
                "Include WIP limits.".into(),
            ],
            Practice::BacklogRefinement => [
                format!("For {team_size}, hold 1-hour sessions biweekly."),
                "Involve stakeholders for alignment.".into(),
                "Use story points for sizing.".into(),
            ],
            Practice::RegularRetrospectives => [
                format!("Hold biweekly for {team_size}."),
                "Use formats like Start-Stop-Continue.".into(),
                "Track action items.".into(),
            ],
            Practice::DefinitionOfDone => [
                format!("Define collaboratively with {team_size}."),
                "Post visibly in your workspace.".into(),
                "Review monthly.".into(),
            ],
            Practice::DailyStandups => [
                format!("Keep to 15 minutes for {team_size}."),
                "Focus on blockers rather than status reports.".into(),
                "Rotate the facilitator.".into(),
            ],
        };
        tips.into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PracticeRecommendation {
    pub id: Practice,
    pub practice: &'static str,
    pub description: &'static str,
    pub implementation_tips: Vec<String>,
}

impl PracticeRecommendation {
    fn new(practice: Practice, team_size: &str) -> Self {
        Self {
            id: practice,
            practice: practice.name(),
            description: practice.description(),
            implementation_tips: practice.tips(team_size),
        }
    }
}

const DEFAULT_PRACTICES: [Practice; 3] = [
    Practice::RegularRetrospectives,
    Practice::DefinitionOfDone,
    Practice::DailyStandups,
];

/// Methodology-specific practices first, then the defaults until there are
/// at least three.
pub fn select_practices(context: &ProjectContext) -> Vec<PracticeRecommendation> {
    let mut picked = Vec::new();

    match context.current_methodology() {
        Some(Methodology::Xp) => {
            if context.has_challenge(ChallengeKind::QualityIssues)
                || context.has_goal(Goal::HigherQuality)
            {
                picked.push(Practice::TestDrivenDevelopment);
            }
            if context.has_challenge(ChallengeKind::LackOfEngagement)
                || context.has_goal(Goal::TeamSatisfaction)
            {
                picked.push(Practice::PairProgramming);
            }
        }
        Some(Methodology::Kanban) => {
            if context.has_challenge(ChallengeKind::PoorCommunication) {
                picked.push(Practice::InformationRadiators);
            }
        }
        Some(Methodology::Scrum) => {
            if context.has_challenge(ChallengeKind::ScopeCreep) {
                picked.push(Practice::BacklogRefinement);
            }
        }
        Some(Methodology::Lean) | None => {}
    }

    for default in DEFAULT_PRACTICES {
        if picked.len() < 3 && !picked.contains(&default) {
            picked.push(default);
        }
    }

    let team_size = context.team_size_label();
    picked
        .into_iter()
        .map(|p| PracticeRecommendation::new(p, team_size))
        .collect()
}

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ToolRecommendation {
    pub category: &'static str,
    pub recommendation: &'static str,
    pub description: String,
}

/// Exactly one tool per category.
pub fn select_tools(context: &ProjectContext, kb: &KnowledgeBase) -> Vec<ToolRecommendation> {
    let current = context.current_methodology();
    let team_size = context.team_size_label();
    kb.tool_categories()
        .iter()
        .filter_map(|category| {
            let option = category
                .options
                .iter()
                .find(|o| o.audience.includes(current))
                .or_else(|| category.options.first())?;
            Some(ToolRecommendation {
                category: category.name,
                recommendation: option.name,
                description: format!("{} for {team_size}.", option.summary),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

pub const MIN_METRICS: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct MetricRecommendation {
    pub id: MetricKind,
    pub metric: &'static str,
    pub description: &'static str,
    pub how_to_measure: &'static str,
    pub tips: &'static [&'static str],
}

fn goal_metric_match(goal: Goal, metric: MetricKind) -> bool {
    matches!(
        (goal, metric),
        (Goal::FasterDelivery, MetricKind::CycleTime | MetricKind::LeadTime)
            | (Goal::HigherQuality, MetricKind::DefectRate)
            | (Goal::TeamSatisfaction, MetricKind::TeamHappiness)
            | (Goal::BetterPredictability, MetricKind::Velocity)
    )
}

pub fn select_metrics(context: &ProjectContext, kb: &KnowledgeBase) -> Vec<MetricRecommendation> {
    let current = context.current_methodology();
    let goals = context.goals();
    let quality_issues = context.has_challenge(ChallengeKind::QualityIssues);

    let mut picked: Vec<MetricKind> = kb
        .metrics()
        .iter()
        .filter(|entry| {
            entry.audience.includes(current)
                || goals.iter().any(|g| goal_metric_match(*g, entry.kind))
                || (quality_issues && entry.kind == MetricKind::DefectRate)
        })
        .map(|entry| entry.kind)
        .collect();

    for &kind in MetricKind::all() {
        if picked.len() >= MIN_METRICS {
            break;
        }
        if !picked.contains(&kind) {
            picked.push(kind);
        }
    }

    picked
        .into_iter()
        .map(|kind| {
            let entry = kb.metric(kind);
            MetricRecommendation {
                id: kind,
                metric: kind.display_name(),
                description: entry.description,
                how_to_measure: entry.how_to_measure,
                tips: entry.tips,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Challenge advice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ChallengeAdvice {
    /// The challenge as the user selected it.
    pub challenge: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ChallengeKind>,
    pub recommendations: Vec<String>,
}

/// Strategies plus the current methodology's overrides; generic advice for
/// challenges the knowledge base does not know.
pub fn challenge_advice(
    challenge: &str,
    current: Option<Methodology>,
    kb: &KnowledgeBase,
) -> ChallengeAdvice {
    let kind = ChallengeKind::from_answer(challenge);
    let recommendations = match kind {
        Some(kind) => {
            let entry = kb.challenge(kind);
            let overrides = current.and_then(|m| entry.override_for(m)).unwrap_or(&[]);
            entry
                .strategies
                .iter()
                .chain(overrides)
                .map(|s| s.to_string())
                .collect()
        }
        None => kb.fallback_advice().iter().map(|s| s.to_string()).collect(),
    };
    ChallengeAdvice {
        challenge: challenge.to_string(),
        kind,
        recommendations,
    }
}

pub fn select_challenge_advice(context: &ProjectContext, kb: &KnowledgeBase) -> Vec<ChallengeAdvice> {
    let current = context.current_methodology();
    context
        .challenge_answers()
        .into_iter()
        .map(|c| challenge_advice(c, current, kb))
        .collect()
}

// ---------------------------------------------------------------------------
// Team-size guidance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TeamGuidance {
    pub size: TeamSize,
    pub range: &'static str,
    pub recommendations: &'static [&'static str],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub xp_tips: Vec<&'static str>,
}

pub fn team_guidance(size: TeamSize, recommended: Methodology, kb: &KnowledgeBase) -> TeamGuidance {
    let entry = kb.team_size(size);
    TeamGuidance {
        size,
        range: entry.range,
        recommendations: entry.recommendations,
        xp_tips: if recommended == Methodology::Xp {
            entry.xp_tips.to_vec()
        } else {
            Vec::new()
        },
    }
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationBundle {
    pub methodology: MethodologyRecommendation,
    pub team_practices: Vec<PracticeRecommendation>,
    pub challenges: Vec<ChallengeAdvice>,
    pub tools: Vec<ToolRecommendation>,
    pub metrics: Vec<MetricRecommendation>,
    pub team_size: TeamGuidance,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<UnknownReference>,
}

impl RecommendationBundle {
    /// One-paragraph summary recorded in the transcript.
    pub fn summary(&self, team_size: &str) -> String {
        let practices: Vec<&str> = self
            .team_practices
            .iter()
            .take(2)
            .map(|p| p.practice)
            .collect();
        let metrics: Vec<&str> = self.metrics.iter().take(2).map(|m| m.metric).collect();
        format!(
            "For your {team_size} team, I recommend {} to address your challenges and goals. \
             Focus on practices like {}. Track metrics like {} to measure progress.",
            self.methodology.name,
            practices.join(", "),
            metrics.join(", ")
        )
    }
}

pub fn compose(
    context: &ProjectContext,
    kb: &KnowledgeBase,
    config: &ConsultConfig,
) -> RecommendationBundle {
    let warnings = context.unknown_references();
    let methodology = recommend_methodology(context, kb, config);
    let team_size = team_guidance(context.team_size(), methodology.methodology, kb);
    RecommendationBundle {
        team_practices: select_practices(context),
        challenges: select_challenge_advice(context, kb),
        tools: select_tools(context, kb),
        metrics: select_metrics(context, kb),
        team_size,
        methodology,
        warnings,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Answer;
    use crate::knowledge::knowledge_base;
    use crate::types::QuestionId;

    fn with(pairs: &[(QuestionId, Answer)]) -> ProjectContext {
        let mut c = ProjectContext::new();
        for (id, a) in pairs {
            c.set(*id, a.clone());
        }
        c
    }

    fn names(practices: &[PracticeRecommendation]) -> Vec<&'static str> {
        practices.iter().map(|p| p.practice).collect()
    }

    #[test]
    fn sparse_context_still_fills_every_section() {
        let bundle = compose(&ProjectContext::new(), knowledge_base(), &ConsultConfig::default());
        assert_eq!(
            names(&bundle.team_practices),
            vec!["Regular Retrospectives", "Definition of Done", "Daily Standups"]
        );
        assert!(bundle.metrics.len() >= 3);
        assert_eq!(bundle.tools.len(), 3);
        assert!(bundle.challenges.is_empty());
        assert!(bundle.warnings.is_empty());
    }

    #[test]
    fn xp_quality_team_gets_tdd_and_pairing() {
        let c = with(&[
            (QuestionId::CurrentMethodology, Answer::single("XP")),
            (QuestionId::Challenges, Answer::multi(["Quality issues", "Lack of engagement"])),
        ]);
        let practices = select_practices(&c);
        assert_eq!(
            names(&practices),
            vec!["Test-Driven Development", "Pair Programming", "Regular Retrospectives"]
        );
    }

    #[test]
    fn defaults_pad_to_three_without_duplicates() {
        let c = with(&[
            (QuestionId::CurrentMethodology, Answer::single("Scrum")),
            (QuestionId::Challenges, Answer::multi(["Scope creep"])),
        ]);
        assert_eq!(
            names(&select_practices(&c)),
            vec!["Backlog Refinement", "Regular Retrospectives", "Definition of Done"]
        );
    }

    #[test]
    fn practice_tips_mention_team_size() {
        let c = with(&[(QuestionId::TeamSize, Answer::single("1-5 members"))]);
        let practices = select_practices(&c);
        assert_eq!(practices[0].implementation_tips[0], "Hold biweekly for 1-5 members.");
    }

    #[test]
    fn tools_follow_current_methodology() {
        let c = with(&[(QuestionId::CurrentMethodology, Answer::single("Kanban"))]);
        let tools = select_tools(&c, knowledge_base());
        let picks: Vec<_> = tools.iter().map(|t| t.recommendation).collect();
        assert_eq!(picks, vec!["Jira", "Slack", "Jenkins"]);
        assert_eq!(tools[0].description, "Manages tasks and metrics for 6-12 members.");

        let c = with(&[(QuestionId::CurrentMethodology, Answer::single("Scrum"))]);
        let picks: Vec<_> = select_tools(&c, knowledge_base())
            .iter()
            .map(|t| t.recommendation)
            .collect();
        assert_eq!(picks, vec!["Jira", "Slack", "GitHub Actions"]);
    }

    #[test]
    fn metrics_pad_in_enumeration_order() {
        let metrics = select_metrics(&ProjectContext::new(), knowledge_base());
        let ids: Vec<_> = metrics.iter().map(|m| m.id).collect();
        assert_eq!(
            ids,
            vec![MetricKind::TeamHappiness, MetricKind::Velocity, MetricKind::CycleTime]
        );
    }

    #[test]
    fn metrics_follow_goals_and_quality_challenge() {
        let c = with(&[
            (QuestionId::CurrentMethodology, Answer::single("Kanban")),
            (QuestionId::Goals, Answer::multi(["Better predictability"])),
            (QuestionId::Challenges, Answer::multi(["Quality issues"])),
        ]);
        let ids: Vec<_> = select_metrics(&c, knowledge_base()).iter().map(|m| m.id).collect();
        assert_eq!(ids, MetricKind::all().to_vec());
    }

    #[test]
    fn challenge_advice_adds_overrides_and_handles_unknown() {
        let advice = challenge_advice("Resistance to change", Some(Methodology::Xp), knowledge_base());
        assert_eq!(advice.recommendations.len(), 6);
        assert_eq!(
            advice.recommendations[4],
            "Use Pair Programming to build trust and reduce resistance."
        );

        let advice = challenge_advice("Resistance to change", Some(Methodology::Lean), knowledge_base());
        assert_eq!(advice.recommendations.len(), 4);

        let advice = challenge_advice("Budget cuts", None, knowledge_base());
        assert!(advice.kind.is_none());
        assert_eq!(advice.recommendations.len(), 3);
        assert!(advice.recommendations[0].contains("retrospective"));
    }

    #[test]
    fn unknown_references_surface_as_warnings() {
        let c = with(&[(QuestionId::Challenges, Answer::multi(["Budget cuts"]))]);
        let bundle = compose(&c, knowledge_base(), &ConsultConfig::default());
        assert_eq!(bundle.warnings.len(), 1);
        assert_eq!(bundle.challenges.len(), 1);
    }

    #[test]
    fn xp_tips_only_when_xp_recommended() {
        let g = team_guidance(TeamSize::Small, Methodology::Xp, knowledge_base());
        assert_eq!(g.xp_tips.len(), 2);
        let g = team_guidance(TeamSize::Small, Methodology::Kanban, knowledge_base());
        assert!(g.xp_tips.is_empty());
        assert_eq!(g.range, "1-5 members");
    }

    #[test]
    fn summary_names_methodology_practices_and_metrics() {
        let c = ProjectContext::new();
        let bundle = compose(&c, knowledge_base(), &ConsultConfig::default());
        assert_eq!(
            bundle.summary(c.team_size_label()),
            "For your 6-12 members team, I recommend Scrum to address your challenges and goals. \
             Focus on practices like Regular Retrospectives, Definition of Done. \
             Track metrics like Team Happiness, Velocity to measure progress."
        );
    }
}
