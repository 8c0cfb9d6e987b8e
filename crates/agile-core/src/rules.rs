use crate::classifier::{first_two_or, QueryContext, QueryIntent, QueryRule};
use crate::scorer::score;
use crate::types::{ChallengeKind, Goal, MetricKind};
use std::fmt::Write as _;

// ---------------------------------------------------------------------------
// Helper macro for concise rule definitions
// ---------------------------------------------------------------------------

macro_rules! rule {
    (
        id: $id:expr,
        intent: $intent:expr,
        matches: $matches:expr,
        respond: $respond:expr
    ) => {
        QueryRule {
            id: $id,
            intent: $intent,
            matches: $matches,
            respond: $respond,
        }
    };
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn has_challenge(ctx: &QueryContext, kind: ChallengeKind) -> bool {
    ctx.context.has_challenge(kind)
}

fn has_goal(ctx: &QueryContext, goal: Goal) -> bool {
    ctx.context.has_goal(goal)
}

fn bullets(out: &mut String, lines: &[&str]) {
    for line in lines {
        let _ = writeln!(out, "- {line}");
    }
}

/// "A framework for..." reads as "Scrum is a framework for...".
fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Responders
// ---------------------------------------------------------------------------

fn kanban_board(ctx: &QueryContext) -> String {
    let team = ctx.team_size();
    let mut out = format!(
        "To set up a Kanban board for your {team} team in {}, follow these steps:\n\
         1. Identify your workflow stages (e.g., To Do, In Progress, Review, Done).\n\
         2. Create a digital board using Trello or Jira with 3-5 columns reflecting these stages.\n\
         3. Add tasks as cards, including descriptions and due dates.\n\
         4. Set Work-in-Progress (WIP) limits (e.g., 2-3 tasks per column) to prevent overloading.\n\
         5. Review and update the board daily in standups.\n\
         Implementation tips for {team}:\n\
         - Keep columns simple to match your team's capacity.\n\
         - Use visual cues (e.g., color labels) for task types.\n\
         - Adjust WIP limits weekly based on flow.\n",
        ctx.industry()
    );
    if has_challenge(ctx, ChallengeKind::PoorCommunication) {
        out.push_str("To address poor communication, use the board as an information radiator, ensuring all team members stay aligned.\n");
    }
    if has_challenge(ctx, ChallengeKind::LackOfEngagement) {
        out.push_str("To improve engagement, involve the team in designing the board to foster ownership.\n");
    }
    if has_goal(ctx, Goal::FasterDelivery) {
        out.push_str("Since faster delivery is a goal, optimize flow to reduce Cycle Time.\n");
    }
    out
}

fn test_driven_development(ctx: &QueryContext) -> String {
    let team = ctx.team_size();
    let mut out = format!(
        "To implement Test-Driven Development (TDD) for your {team} team in {}, follow these steps:\n\
         1. Write a failing unit test for a small feature using your testing framework.\n\
         2. Run the test to confirm it fails (red phase).\n\
         3. Write minimal code to pass the test (green phase).\n\
         4. Refactor to improve code quality, ensuring tests still pass.\n\
         5. Repeat for each feature or bug fix.\n\
         Implementation tips for {team}:\n\
         - Start with a critical module to show value.\n\
         - Train developers in a 2-hour TDD workshop.\n\
         - Use pair programming to reinforce TDD.\n",
        ctx.industry()
    );
    if has_challenge(ctx, ChallengeKind::ResistanceToChange) {
        out.push_str("To address resistance to change, demonstrate TDD's defect reduction with a pilot, showing tangible results.\n");
    }
    if has_challenge(ctx, ChallengeKind::LackOfEngagement) {
        out.push_str("To boost engagement, let developers see immediate test feedback, making work more rewarding.\n");
    }
    if has_goal(ctx, Goal::HigherQuality) {
        out.push_str("Since quality is a goal, TDD will help ensure robust code with fewer bugs.\n");
    }
    out
}

fn pair_programming(ctx: &QueryContext) -> String {
    let team = ctx.team_size();
    let mut out = format!(
        "Pair Programming is an XP practice where two developers work together at one workstation to write code. \
         For your {team} team in {}, here's how to use it:\n\
         1. Pair developers with complementary skills (e.g., senior/junior).\n\
         2. Set up a shared coding environment (e.g., VS Code Live Share).\n\
         3. Rotate pairs weekly to spread knowledge and avoid fatigue.\n\
         4. Define roles: one writes code (driver), the other reviews and suggests (navigator).\n\
         5. Schedule 2-4 hour pairing sessions with breaks.\n\
         Implementation tips for {team}:\n\
         - Use pairing for complex tasks to improve quality.\n\
         - Monitor team feedback to adjust pair frequency.\n\
         - Celebrate successful pair outcomes to build buy-in.\n",
        ctx.industry()
    );
    if has_challenge(ctx, ChallengeKind::LackOfEngagement) {
        out.push_str("To improve engagement, rotate pairs to foster collaboration and make work interactive.\n");
    }
    if has_challenge(ctx, ChallengeKind::ResistanceToChange) {
        out.push_str("To reduce resistance, start pairing on small tasks and highlight improved code quality.\n");
    }
    if has_goal(ctx, Goal::TeamSatisfaction) {
        out.push_str("Since team satisfaction is a goal, pairing can build stronger team bonds and shared ownership.\n");
    }
    out
}

fn challenge(ctx: &QueryContext) -> String {
    // Only reached when `matches` found a challenge.
    let Some(kind) = ctx.challenge else {
        return String::new();
    };
    let entry = ctx.kb.challenge(kind);
    let mut out = format!(
        "To address {} for your {} team in {}, try these strategies:\n",
        kind.phrase(),
        ctx.team_size(),
        ctx.industry()
    );
    bullets(&mut out, entry.strategies);

    if let Some(current) = ctx.context.current_methodology() {
        if let Some(specific) = entry.override_for(current) {
            let _ = writeln!(out, "In {}, specifically:", current.display_name());
            bullets(&mut out, specific);
        }
    }
    if kind == ChallengeKind::LackOfEngagement && has_goal(ctx, Goal::TeamSatisfaction) {
        out.push_str("Since team satisfaction is a goal, use retrospectives to act on engagement feedback.\n");
    }
    if kind == ChallengeKind::MeetingDeadlines && has_goal(ctx, Goal::FasterDelivery) {
        out.push_str("Since faster delivery is a goal, optimize flow with smaller tasks and frequent reviews.\n");
    }
    out
}

fn defect_rate(ctx: &QueryContext) -> String {
    let team = ctx.team_size();
    let mut out = format!(
        "Defect Rate measures bugs found after release, critical for quality in XP. \
         For your {team} team in {}:\n\
         1. Track bugs in a tool like Jira post-release.\n\
         2. Calculate as bugs per feature, sprint, or 1,000 lines of code.\n\
         3. Use TDD to catch defects early, reducing the rate.\n\
         4. Review weekly in retrospectives to identify trends.\n\
         Implementation tips for {team}:\n",
        ctx.industry()
    );
    bullets(&mut out, ctx.kb.metric(MetricKind::DefectRate).tips);
    if has_goal(ctx, Goal::HigherQuality) {
        out.push_str("Since quality is a goal, aim for a Defect Rate below 1 bug per feature.\n");
    }
    if has_challenge(ctx, ChallengeKind::QualityIssues) {
        out.push_str("To address quality issues, combine TDD with automated testing to lower defects.\n");
    }
    out
}

fn team_happiness(ctx: &QueryContext) -> String {
    let team = ctx.team_size();
    let mut out = format!(
        "Team Happiness measures satisfaction and engagement. For your {team} team in {}:\n\
         1. Conduct biweekly surveys with a 1-5 scale.\n\
         2. Ask questions like 'Do you feel valued?' or 'Are you satisfied with our process?'\n\
         3. Discuss results in retrospectives to plan improvements.\n\
         4. Track trends over 2-3 months to assess impact.\n\
         Implementation tips for {team}:\n",
        ctx.industry()
    );
    bullets(&mut out, ctx.kb.metric(MetricKind::TeamHappiness).tips);
    if has_challenge(ctx, ChallengeKind::LackOfEngagement) {
        out.push_str("To address low engagement, act on survey feedback with visible changes.\n");
    }
    if has_goal(ctx, Goal::TeamSatisfaction) {
        out.push_str("Since team satisfaction is a goal, prioritize actions that boost morale, like celebrating wins.\n");
    }
    out
}

fn methodology(ctx: &QueryContext) -> String {
    let Some(m) = ctx.methodology else {
        return String::new();
    };
    let profile = ctx.kb.methodology(m);
    let mut out = format!(
        "{} is {} It's best for {}.\n\
         Key practices include: {}.\n\
         Implementation tips for your {} team in {}:\n",
        m.display_name(),
        lower_first(profile.description),
        profile.best_for.join(", "),
        profile.display_practices.join(", "),
        ctx.team_size(),
        ctx.industry()
    );
    bullets(&mut out, profile.implementation_tips);
    if ctx.context.current_methodology() == Some(m) {
        let challenges = ctx.context.challenge_answers();
        let _ = writeln!(
            out,
            "Since you're using {}, focus on these practices to address {}.",
            m.display_name(),
            first_two_or(&challenges, "your challenges")
        );
    }
    out
}

fn general(ctx: &QueryContext) -> String {
    let m = ctx
        .context
        .current_methodology()
        .unwrap_or_else(|| score(ctx.context, ctx.kb, &ctx.config.scoring).best());
    let challenges = ctx.context.challenge_answers();
    let goals = ctx.context.goal_answers();
    format!(
        "For your {} team in {}, {} is recommended based on your context. \
         It addresses {} and supports {}.\n\
         Key practices: {}.\n\
         Ask about specific practices or challenges for detailed guidance.",
        ctx.team_size(),
        ctx.industry(),
        m.display_name(),
        first_two_or(&challenges, "your needs"),
        first_two_or(&goals, "your goals"),
        ctx.kb.methodology(m).display_practices.join(", ")
    )
}

// ---------------------------------------------------------------------------
// Default rule table (order matters: first match wins)
// ---------------------------------------------------------------------------

pub fn default_rules() -> Vec<QueryRule> {
    vec![
        rule! {
            id: "kanban_board",
            intent: QueryIntent::BoardSetup,
            matches: |ctx| ctx.contains("kanban board"),
            respond: kanban_board
        },
        rule! {
            id: "test_driven_development",
            intent: QueryIntent::Practice,
            matches: |ctx| ctx.contains("test-driven") || ctx.contains("tdd"),
            respond: test_driven_development
        },
        rule! {
            id: "pair_programming",
            intent: QueryIntent::Practice,
            matches: |ctx| ctx.contains("pair programming"),
            respond: pair_programming
        },
        rule! {
            id: "challenge",
            intent: QueryIntent::Challenge,
            matches: |ctx| ctx.challenge.is_some(),
            respond: challenge
        },
        rule! {
            id: "defect_rate",
            intent: QueryIntent::Metric,
            matches: |ctx| ctx.contains("defect rate"),
            respond: defect_rate
        },
        rule! {
            id: "team_happiness",
            intent: QueryIntent::Metric,
            matches: |ctx| ctx.contains("team happiness"),
            respond: team_happiness
        },
        rule! {
            id: "methodology",
            intent: QueryIntent::MethodologyOverview,
            matches: |ctx| ctx.methodology.is_some(),
            respond: methodology
        },
        rule! {
            id: "general",
            intent: QueryIntent::General,
            matches: |ctx| ctx.contains("agile") || ctx.contains("methodology"),
            respond: general
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
