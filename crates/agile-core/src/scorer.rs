use crate::config::{ChallengeTipMode, ConsultConfig, ScoringWeights};
use crate::context::ProjectContext;
use crate::knowledge::{KnowledgeBase, MethodologyProfile};
use crate::types::{ChallengeKind, Goal, Methodology, MethodologyTable, TeamSize};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImplementationStep {
    pub step: String,
    pub description: String,
}

impl ImplementationStep {
    fn new(step: &str, description: impl Into<String>) -> Self {
        Self {
            step: step.to_string(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodologyRecommendation {
    pub methodology: Methodology,
    pub name: &'static str,
    pub description: &'static str,
    /// Individual rationale sentences; may be empty.
    pub reasons: Vec<String>,
    pub why_recommended: String,
    pub scores: MethodologyTable,
    pub implementation_steps: Vec<ImplementationStep>,
    pub details: MethodologyProfile,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Additive score per methodology. Pure: the same context always yields the
/// same table.
pub fn score(
    context: &ProjectContext,
    kb: &KnowledgeBase,
    weights: &ScoringWeights,
) -> MethodologyTable {
    let mut scores = MethodologyTable::default();

    scores.add_all(weights.team_size(context.team_size()));

    for challenge in context.challenges() {
        for profile in kb.methodologies() {
            if profile.addresses(challenge) {
                scores.add(profile.methodology, weights.challenge_match);
            }
        }
    }

    for goal in context.goals() {
        scores.add_all(&weights.goal(goal));
    }

    scores.add_all(weights.experience(context.experience_level()));
    scores.add_all(weights.complexity(context.complexity()));

    tracing::debug!(
        scrum = scores.scrum,
        kanban = scores.kanban,
        xp = scores.xp,
        lean = scores.lean,
        "methodology scores"
    );
    scores
}

pub fn recommend_methodology(
    context: &ProjectContext,
    kb: &KnowledgeBase,
    config: &ConsultConfig,
) -> MethodologyRecommendation {
    let scores = score(context, kb, &config.scoring);
    let winner = scores.best();
    let profile = kb.methodology(winner);
    let reasons = rationale(winner, profile, context, &config.scoring);

    let why_recommended = if reasons.is_empty() {
        format!(
            "Recommended {} based on the overall fit of your team context.",
            winner.display_name()
        )
    } else {
        format!(
            "Recommended {} because: {}",
            winner.display_name(),
            reasons.join(" ")
        )
    };

    MethodologyRecommendation {
        methodology: winner,
        name: winner.display_name(),
        description: profile.description,
        reasons,
        why_recommended,
        scores,
        implementation_steps: generate_steps(
            winner,
            context.current_methodology(),
            context,
            kb,
            config,
        ),
        details: profile.clone(),
    }
}

/// First two selected challenges, resolved when the knowledge base knows them.
fn leading_challenges(context: &ProjectContext) -> Vec<(&str, ChallengeKind)> {
    context
        .challenge_answers()
        .into_iter()
        .take(2)
        .filter_map(|raw| ChallengeKind::from_answer(raw).map(|kind| (raw, kind)))
        .collect()
}

fn rationale(
    winner: Methodology,
    profile: &MethodologyProfile,
    context: &ProjectContext,
    weights: &ScoringWeights,
) -> Vec<String> {
    let mut reasons = Vec::new();

    let bracket = context.team_size().label();
    if profile.best_for.contains(&bracket) {
        reasons.push(format!(
            "Your {bracket} team aligns with {}'s ideal team size.",
            winner.display_name()
        ));
    }

    for (_, challenge) in leading_challenges(context) {
        if profile.addresses(challenge) {
            reasons.push(format!(
                "It addresses your challenge of {} effectively.",
                challenge.phrase()
            ));
        }
    }

    for goal in context
        .goal_answers()
        .into_iter()
        .take(2)
        .filter_map(Goal::from_answer)
    {
        if weights.goal(goal).mentions(winner) {
            reasons.push(format!(
                "It supports your goal of {}.",
                goal.label().to_lowercase()
            ));
        }
    }

    reasons
}

// ---------------------------------------------------------------------------
// Implementation steps
// ---------------------------------------------------------------------------

/// Ordered rollout plan. Improvement steps when the team already runs the
/// recommended methodology, adoption steps otherwise.
pub fn generate_steps(
    methodology: Methodology,
    current: Option<Methodology>,
    context: &ProjectContext,
    kb: &KnowledgeBase,
    config: &ConsultConfig,
) -> Vec<ImplementationStep> {
    let name = methodology.display_name();

    let mut steps = if current == Some(methodology) {
        vec![
            ImplementationStep::new(
                "Assess current practices",
                format!("Conduct a retrospective to identify strengths and gaps in your {name} implementation."),
            ),
            ImplementationStep::new(
                "Prioritize improvements",
                "Select 2-3 practices to enhance based on team feedback and challenges.",
            ),
            ImplementationStep::new(
                "Experiment and measure",
                "Run experiments for 1-2 iterations, tracking metrics like Cycle Time or Team Happiness.",
            ),
            ImplementationStep::new(
                "Refine processes",
                "Adjust practices based on experiment outcomes, focusing on your goals.",
            ),
        ]
    } else {
        let mut steps = vec![
            ImplementationStep::new(
                "Train the team",
                format!("Provide a workshop on {name} principles and practices."),
            ),
            ImplementationStep::new(
                "Pilot a project",
                format!("Apply {name} to a small project to test its fit."),
            ),
            ImplementationStep::new(
                "Set up tools",
                format!("Configure tools like Jira or Trello for {name} artifacts."),
            ),
            ImplementationStep::new(
                "Define roles",
                "Assign roles based on team size and expertise.",
            ),
            ImplementationStep::new(
                "Monitor and adapt",
                "Review progress biweekly to refine the process.",
            ),
        ];
        match methodology {
            Methodology::Scrum => {
                let weeks = if context.team_size() == TeamSize::Small { 2 } else { 3 };
                steps.insert(
                    2,
                    ImplementationStep::new(
                        "Set sprint length",
                        format!(
                            "Choose a {weeks}-week sprint for {} teams.",
                            context.team_size_label()
                        ),
                    ),
                );
            }
            Methodology::Kanban => steps.insert(
                2,
                ImplementationStep::new(
                    "Design Kanban board",
                    "Create a board with columns like 'To Do,' 'In Progress,' 'Done' tailored to your workflow.",
                ),
            ),
            Methodology::Xp => {
                steps.insert(
                    2,
                    ImplementationStep::new(
                        "Start TDD",
                        "Begin Test-Driven Development on a single module to build confidence.",
                    ),
                );
                steps.insert(
                    3,
                    ImplementationStep::new(
                        "Implement Pair Programming",
                        "Pair developers to enhance collaboration and code quality.",
                    ),
                );
            }
            Methodology::Lean => steps.insert(
                2,
                ImplementationStep::new(
                    "Map value stream",
                    "Identify and eliminate waste in your current process.",
                ),
            ),
        }
        steps
    };

    let suffix: String = leading_challenges(context)
        .into_iter()
        .filter_map(|(raw, kind)| {
            let first = kb.challenge(kind).strategies.first()?;
            Some(format!(
                " For {}, {}",
                raw.to_lowercase(),
                first.to_lowercase()
            ))
        })
        .collect();

    if !suffix.is_empty() {
        let tipped = match config.steps.challenge_tips {
            ChallengeTipMode::EveryStep => steps.len(),
            ChallengeTipMode::FirstStep => 1,
        };
        for step in steps.iter_mut().take(tipped) {
            step.description.push_str(&suffix);
        }
    }

    steps
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

    fn kanban_scenario() -> ProjectContext {
        let mut c = ProjectContext::new();
        c.set(QuestionId::TeamSize, Answer::single("1-5 members"));
        c.set(QuestionId::Challenges, Answer::multi(["Poor communication"]));
        c.set(QuestionId::Goals, Answer::multi(["Faster delivery"]));
        c.set(QuestionId::CurrentMethodology, Answer::single("None/Traditional"));
        c.set(QuestionId::ExperienceLevel, Answer::single("Beginner"));
        c.set(QuestionId::ProjectComplexity, Answer::single("Simple"));
        c
    }

    #[test]
    fn small_beginner_simple_team_gets_kanban() {
        let cfg = ConsultConfig::default();
        let scores = score(&kanban_scenario(), knowledge_base(), &cfg.scoring);
        // 30 bracket + 15 communication + 15 delivery + 10 beginner + 10 simple
        assert_eq!(scores.kanban, 80);
        assert_eq!(scores.best(), Methodology::Kanban);

        let rec = recommend_methodology(&kanban_scenario(), knowledge_base(), &cfg);
        assert_eq!(rec.methodology, Methodology::Kanban);
        assert_eq!(rec.reasons.len(), 3);
        assert!(rec.why_recommended.starts_with("Recommended Kanban because: Your 1-5 members team"));
    }

    #[test]
    fn scoring_is_deterministic() {
        let cfg = ConsultConfig::default();
        let c = kanban_scenario();
        let first = score(&c, knowledge_base(), &cfg.scoring);
        for _ in 0..5 {
            assert_eq!(score(&c, knowledge_base(), &cfg.scoring), first);
        }
    }

    #[test]
    fn ties_go_to_earlier_methodology() {
        // Equal bracket weights and nothing else selected.
        let mut cfg = ConsultConfig::default();
        cfg.scoring.team_size.medium = MethodologyTable::new(25, 25, 0, 0);
        let scores = score(&ProjectContext::new(), knowledge_base(), &cfg.scoring);
        assert_eq!(scores.scrum, scores.kanban);
        assert_eq!(scores.best(), Methodology::Scrum);
    }

    #[test]
    fn adding_an_addressed_challenge_adds_the_bonus() {
        let cfg = ConsultConfig::default();
        let base = score(&ProjectContext::new(), knowledge_base(), &cfg.scoring);
        let mut c = ProjectContext::new();
        c.set(QuestionId::Challenges, Answer::multi(["Quality issues"]));
        let with = score(&c, knowledge_base(), &cfg.scoring);
        assert_eq!(with.xp - base.xp, 15);
        assert_eq!(with.scrum, base.scrum);
        assert_eq!(with.lean, base.lean);
    }

    #[test]
    fn empty_context_defaults_to_medium_scrum() {
        let rec = recommend_methodology(
            &ProjectContext::new(),
            knowledge_base(),
            &ConsultConfig::default(),
        );
        assert_eq!(rec.methodology, Methodology::Scrum);
        assert_eq!(rec.scores, MethodologyTable::new(30, 10, 20, 0));
        assert_eq!(
            rec.reasons,
            vec!["Your 6-12 members team aligns with Scrum's ideal team size.".to_string()]
        );
        let names: Vec<_> = rec.implementation_steps.iter().map(|s| s.step.as_str()).collect();
        assert_eq!(names[2], "Set sprint length");
        assert!(rec.implementation_steps[2].description.contains("3-week sprint"));
    }

    #[test]
    fn no_reasons_yields_fallback_rationale() {
        let mut cfg = ConsultConfig::default();
        cfg.scoring.team_size.medium = MethodologyTable::new(0, 0, 0, 50);
        let rec = recommend_methodology(&ProjectContext::new(), knowledge_base(), &cfg);
        assert_eq!(rec.methodology, Methodology::Lean);
        assert!(rec.reasons.is_empty());
        assert_eq!(
            rec.why_recommended,
            "Recommended Lean based on the overall fit of your team context."
        );
    }

    #[test]
    fn improvement_steps_when_already_using_recommendation() {
        let mut c = ProjectContext::new();
        c.set(QuestionId::CurrentMethodology, Answer::single("Scrum"));
        let steps = generate_steps(
            Methodology::Scrum,
            c.current_methodology(),
            &c,
            knowledge_base(),
            &ConsultConfig::default(),
        );
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].step, "Assess current practices");
    }

    #[test]
    fn xp_splices_two_steps() {
        let c = ProjectContext::new();
        let steps = generate_steps(Methodology::Xp, None, &c, knowledge_base(), &ConsultConfig::default());
        let names: Vec<_> = steps.iter().map(|s| s.step.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Train the team",
                "Pilot a project",
                "Start TDD",
                "Implement Pair Programming",
                "Set up tools",
                "Define roles",
                "Monitor and adapt",
            ]
        );
    }

    #[test]
    fn challenge_tip_is_appended_to_every_step_by_default() {
        let c = kanban_scenario();
        let steps = generate_steps(Methodology::Kanban, None, &c, knowledge_base(), &ConsultConfig::default());
        let tip = " For poor communication, establish clear team agreements on communication channels.";
        assert!(steps.iter().all(|s| s.description.ends_with(tip)));
    }

    #[test]
    fn first_step_mode_appends_tip_once() {
        let c = kanban_scenario();
        let mut cfg = ConsultConfig::default();
        cfg.steps.challenge_tips = ChallengeTipMode::FirstStep;
        let steps = generate_steps(Methodology::Kanban, None, &c, knowledge_base(), &cfg);
        assert!(steps[0].description.contains("For poor communication"));
        assert!(steps[1..].iter().all(|s| !s.description.contains("For poor communication")));
    }

    fn step_names(steps: &[ImplementationStep]) -> Vec<&str> {
        steps.iter().map(|s| s.step.as_str()).collect()
    }

    #[test]
    fn small_team_scrum_gets_two_week_sprints() {
        let mut c = ProjectContext::new();
        c.set(QuestionId::TeamSize, Answer::single("1-5 members"));
        let steps = generate_steps(Methodology::Scrum, None, &c, knowledge_base(), &ConsultConfig::default());
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[2].step, "Set sprint length");
        assert!(steps[2].description.contains("2-week sprint for 1-5 members"));
    }

    #[test]
    fn lean_splices_value_stream_mapping() {
        let c = ProjectContext::new();
        let steps = generate_steps(Methodology::Lean, None, &c, knowledge_base(), &ConsultConfig::default());
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[2].step, "Map value stream");
        assert_eq!(steps[3].step, "Set up tools");
    }

    #[test]
    fn kanban_splices_board_design() {
        let c = kanban_scenario();
        let steps = generate_steps(Methodology::Kanban, None, &c, knowledge_base(), &ConsultConfig::default());
        assert_eq!(
            step_names(&steps),
            vec![
                "Train the team",
                "Pilot a project",
                "Design Kanban board",
                "Set up tools",
                "Define roles",
                "Monitor and adapt",
            ]
        );
    }

    #[test]
    fn unknown_leading_challenge_adds_no_tip() {
        let mut c = ProjectContext::new();
        c.set(QuestionId::Challenges, Answer::multi(["Budget cuts", "Scope creep"]));
        let steps = generate_steps(Methodology::Kanban, None, &c, knowledge_base(), &ConsultConfig::default());
        let tip = " For scope creep, prioritize backlog items with stakeholders regularly.";
        for step in &steps {
            assert!(step.description.ends_with(tip), "{}", step.description);
            assert!(!step.description.contains("budget cuts"));
            assert_eq!(step.description.matches(" For ").count(), 1);
        }
    }
}
