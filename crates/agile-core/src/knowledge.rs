//! Static agile knowledge base.
//!
//! Built once per process and shared read-only by every consultation. All
//! cross references (challenge overrides, metric audiences, tool audiences)
//! are typed enum values, so a dangling methodology or challenge id cannot be
//! expressed.

use crate::types::{ChallengeKind, Methodology, MetricKind, TeamSize};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

type Strs = &'static [&'static str];

// ---------------------------------------------------------------------------
// Audience
// ---------------------------------------------------------------------------

/// Which methodologies a metric or tool is suited for.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    All,
    Only(&'static [Methodology]),
}

impl Audience {
    /// `None` (no recognised methodology) only matches `All`.
    pub fn includes(&self, methodology: Option<Methodology>) -> bool {
        match self {
            Audience::All => true,
            Audience::Only(list) => methodology.is_some_and(|m| list.contains(&m)),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MethodologyProfile {
    pub methodology: Methodology,
    pub description: &'static str,
    pub best_for: Strs,
    #[serde(skip_serializing_if = "is_empty")]
    pub ceremonies: Strs,
    #[serde(skip_serializing_if = "is_empty")]
    pub principles: Strs,
    #[serde(skip_serializing_if = "is_empty")]
    pub practices: Strs,
    #[serde(skip_serializing_if = "is_empty")]
    pub roles: Strs,
    #[serde(skip_serializing_if = "is_empty")]
    pub artifacts: Strs,
    /// Practices if defined, else ceremonies, else principles.
    pub display_practices: Strs,
    pub challenges_addressed: &'static [ChallengeKind],
    pub implementation_tips: Strs,
}

impl MethodologyProfile {
    pub fn addresses(&self, challenge: ChallengeKind) -> bool {
        self.challenges_addressed.contains(&challenge)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChallengeEntry {
    pub kind: ChallengeKind,
    pub strategies: Strs,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<Methodology, Strs>,
    /// Free-text keywords that also identify this challenge.
    pub synonyms: Strs,
}

impl ChallengeEntry {
    pub fn override_for(&self, methodology: Methodology) -> Option<Strs> {
        self.overrides.get(&methodology).copied()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricEntry {
    pub kind: MetricKind,
    pub description: &'static str,
    pub how_to_measure: &'static str,
    pub audience: Audience,
    pub tips: Strs,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamSizeGuidance {
    pub size: TeamSize,
    pub range: &'static str,
    pub recommendations: Strs,
    pub xp_tips: Strs,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolOption {
    pub name: &'static str,
    pub audience: Audience,
    /// Rendered as "{summary} for {team size}."
    pub summary: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolCategory {
    pub name: &'static str,
    pub options: &'static [ToolOption],
}

// ---------------------------------------------------------------------------
// KnowledgeBase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeBase {
    methodologies: [MethodologyProfile; 4],
    challenges: [ChallengeEntry; 8],
    metrics: [MetricEntry; 5],
    team_sizes: [TeamSizeGuidance; 3],
    tools: &'static [ToolCategory],
    fallback_advice: Strs,
}

/// The process-wide knowledge base.
pub fn knowledge_base() -> &'static KnowledgeBase {
    static KB: OnceLock<KnowledgeBase> = OnceLock::new();
    KB.get_or_init(KnowledgeBase::builtin)
}

impl KnowledgeBase {
    pub fn methodology(&self, m: Methodology) -> &MethodologyProfile {
        &self.methodologies[m.index()]
    }

    pub fn methodologies(&self) -> &[MethodologyProfile] {
        &self.methodologies
    }

    pub fn challenge(&self, kind: ChallengeKind) -> &ChallengeEntry {
        &self.challenges[kind.index()]
    }

    pub fn challenges(&self) -> &[ChallengeEntry] {
        &self.challenges
    }

    pub fn metric(&self, kind: MetricKind) -> &MetricEntry {
        &self.metrics[kind.index()]
    }

    pub fn metrics(&self) -> &[MetricEntry] {
        &self.metrics
    }

    pub fn team_size(&self, size: TeamSize) -> &TeamSizeGuidance {
        &self.team_sizes[size.index()]
    }

    pub fn tool_categories(&self) -> &[ToolCategory] {
        self.tools
    }

    /// Advice for challenges the knowledge base does not know.
    pub fn fallback_advice(&self) -> Strs {
        self.fallback_advice
    }

    fn builtin() -> Self {
        Self {
            methodologies: [
                profile(
                    Methodology::Scrum,
                    "A framework for iterative development with fixed sprints and defined roles.",
                    &["6-12 members", "complex products", "dynamic requirements"],
                    Lists {
                        ceremonies: &[
                            "Sprint Planning",
                            "Daily Standup",
                            "Sprint Review",
                            "Sprint Retrospective",
                        ],
                        roles: &["Product Owner", "Scrum Master", "Development Team"],
                        artifacts: &["Product Backlog", "Sprint Backlog", "Increment"],
                        ..Lists::default()
                    },
                    &[
                        ChallengeKind::ScopeCreep,
                        ChallengeKind::MeetingDeadlines,
                        ChallengeKind::PoorCommunication,
                    ],
                    &[
                        "Start with 2-week sprints for balance.",
                        "Train the Scrum Master to facilitate effectively.",
                        "Use a digital tool like Jira for backlog management.",
                    ],
                ),
                profile(
                    Methodology::Kanban,
                    "A visual workflow method emphasizing continuous delivery and flow.",
                    &["1-5 members", "support/operations", "unpredictable workflows"],
                    Lists {
                        principles: &[
                            "Visualize workflow",
                            "Limit work in progress",
                            "Manage flow",
                            "Explicit policies",
                        ],
                        practices: &[
                            "Kanban board",
                            "WIP limits",
                            "Continuous delivery",
                            "Feedback loops",
                        ],
                        ..Lists::default()
                    },
                    &[
                        ChallengeKind::PoorCommunication,
                        ChallengeKind::LackOfEngagement,
                        ChallengeKind::InconsistentEstimation,
                    ],
                    &[
                        "Design a Kanban board with 3-5 columns reflecting your workflow.",
                        "Set WIP limits to 2-3 tasks per column initially.",
                        "Review flow weekly to optimize throughput.",
                    ],
                ),
                profile(
                    Methodology::Xp,
                    "A methodology focused on engineering practices for high-quality software.",
                    &["6-12 members", "complex code bases", "quality-driven projects"],
                    Lists {
                        practices: &[
                            "Pair Programming",
                            "Test-Driven Development",
                            "Continuous Integration",
                            "Simple Design",
                            "Refactoring",
                        ],
                        ..Lists::default()
                    },
                    &[
                        ChallengeKind::QualityIssues,
                        ChallengeKind::ResistanceToChange,
                        ChallengeKind::LackOfEngagement,
                    ],
                    &[
                        "Start TDD with a single module to demonstrate value.",
                        "Rotate pairs weekly to spread knowledge.",
                        "Automate CI pipelines with tools like Jenkins.",
                    ],
                ),
                profile(
                    Methodology::Lean,
                    "A method to maximize value by minimizing waste and optimizing processes.",
                    &[
                        "13+ members",
                        "efficiency-focused organizations",
                        "process improvement",
                    ],
                    Lists {
                        principles: &[
                            "Eliminate waste",
                            "Build quality in",
                            "Create knowledge",
                            "Defer commitment",
                            "Deliver fast",
                        ],
                        ..Lists::default()
                    },
                    &[
                        ChallengeKind::InconsistentEstimation,
                        ChallengeKind::StakeholderManagement,
                    ],
                    &[
                        "Map your value stream to identify waste.",
                        "Implement pull systems to avoid overproduction.",
                        "Use A/B testing for process experiments.",
                    ],
                ),
            ],
            challenges: [
                ChallengeEntry {
                    kind: ChallengeKind::ResistanceToChange,
                    strategies: &[
                        "Demonstrate small wins with pilot projects.",
                        "Educate on benefits with real-world examples.",
                        "Involve team in process design for ownership.",
                        "Address concerns in retrospectives with action plans.",
                    ],
                    overrides: BTreeMap::from([
                        (
                            Methodology::Xp,
                            &[
                                "Use Pair Programming to build trust and reduce resistance.",
                                "Show TDD's impact on reducing defects early.",
                            ] as Strs,
                        ),
                        (
                            Methodology::Kanban,
                            &[
                                "Use a Kanban board to visualize progress, easing transition concerns.",
                                "Start with low WIP limits to show quick wins.",
                            ] as Strs,
                        ),
                    ]),
                    synonyms: &["resistance", "opposition", "change reluctance"],
                },
                ChallengeEntry {
                    kind: ChallengeKind::LackOfEngagement,
                    strategies: &[
                        "Connect tasks to the product vision for purpose.",
                        "Rotate roles to maintain interest.",
                        "Celebrate milestones with team recognition.",
                        "Encourage innovation through hackathons or experiments.",
                    ],
                    overrides: BTreeMap::from([
                        (
                            Methodology::Xp,
                            &[
                                "Rotate pairs in Pair Programming to foster collaboration.",
                                "Use TDD to give developers immediate feedback, boosting engagement.",
                            ] as Strs,
                        ),
                        (
                            Methodology::Kanban,
                            &[
                                "Involve the team in designing the Kanban board for ownership.",
                                "Use daily standups to encourage participation.",
                            ] as Strs,
                        ),
                    ]),
                    synonyms: &["engagement", "low participation", "disengagement", "motivation"],
                },
                ChallengeEntry {
                    kind: ChallengeKind::PoorCommunication,
                    strategies: &[
                        "Establish clear team agreements on communication channels.",
                        "Use visual tools like Kanban boards or burndown charts.",
                        "Timebox ceremonies to keep discussions focused.",
                        "Implement daily check-ins for alignment.",
                    ],
                    overrides: BTreeMap::from([
                        (
                            Methodology::Xp,
                            &[
                                "Leverage Pair Programming for real-time communication.",
                                "Use Continuous Integration feedback to align on code quality.",
                            ] as Strs,
                        ),
                        (
                            Methodology::Kanban,
                            &[
                                "Use the Kanban board as an information radiator for transparency.",
                                "Review board updates in daily standups to align the team.",
                            ] as Strs,
                        ),
                    ]),
                    synonyms: &["communication", "misalignment", "clarity"],
                },
                ChallengeEntry {
                    kind: ChallengeKind::InconsistentEstimation,
                    strategies: &[
                        "Use story points and Planning Poker for consensus.",
                        "Maintain a reference backlog for sizing consistency.",
                        "Review past estimates in retrospectives.",
                        "Break tasks into smaller, estimable units.",
                    ],
                    overrides: BTreeMap::from([(
                        Methodology::Xp,
                        &[
                            "Estimate tasks collaboratively during TDD planning.",
                            "Use Simple Design to keep tasks small and predictable.",
                        ] as Strs,
                    )]),
                    synonyms: &["estimation", "planning accuracy"],
                },
                ChallengeEntry {
                    kind: ChallengeKind::ScopeCreep,
                    strategies: &[
                        "Prioritize backlog items with stakeholders regularly.",
                        "Define strict 'Done' criteria for each task.",
                        "Implement a change request process.",
                        "Educate stakeholders on trade-offs of adding scope.",
                    ],
                    overrides: BTreeMap::from([(
                        Methodology::Xp,
                        &[
                            "Use TDD to ensure new features meet quality standards.",
                            "Refactor code to accommodate changes without technical debt.",
                        ] as Strs,
                    )]),
                    synonyms: &["scope", "feature creep"],
                },
                ChallengeEntry {
                    kind: ChallengeKind::QualityIssues,
                    strategies: &[
                        "Implement automated testing suites.",
                        "Conduct code reviews before merging.",
                        "Define quality metrics like defect rates.",
                        "Train team on best practices.",
                    ],
                    overrides: BTreeMap::from([(
                        Methodology::Xp,
                        &[
                            "Adopt TDD to catch defects early.",
                            "Use Continuous Integration to ensure code stability.",
                        ] as Strs,
                    )]),
                    synonyms: &["quality", "bugs", "defects"],
                },
                ChallengeEntry {
                    kind: ChallengeKind::MeetingDeadlines,
                    strategies: &[
                        "Break work into smaller iterations.",
                        "Track velocity to predict delivery.",
                        "Remove blockers promptly in daily standups.",
                        "Negotiate scope with stakeholders.",
                    ],
                    overrides: BTreeMap::from([
                        (
                            Methodology::Xp,
                            &[
                                "Use TDD to reduce rework, speeding up delivery.",
                                "Implement Continuous Integration for faster feedback.",
                            ] as Strs,
                        ),
                        (
                            Methodology::Kanban,
                            &[
                                "Optimize flow with WIP limits to meet deadlines.",
                                "Track Cycle Time to identify delays early.",
                            ] as Strs,
                        ),
                    ]),
                    synonyms: &["deadlines", "delivery", "timeliness"],
                },
                ChallengeEntry {
                    kind: ChallengeKind::StakeholderManagement,
                    strategies: &[
                        "Schedule regular stakeholder reviews.",
                        "Use demos to align on expectations.",
                        "Create transparent progress dashboards.",
                        "Train team on stakeholder communication.",
                    ],
                    overrides: BTreeMap::from([(
                        Methodology::Xp,
                        &[
                            "Show TDD test results to stakeholders for quality assurance.",
                            "Use Simple Design to explain technical decisions clearly.",
                        ] as Strs,
                    )]),
                    synonyms: &["stakeholder", "client management"],
                },
            ],
            metrics: [
                MetricEntry {
                    kind: MetricKind::Velocity,
                    description: "Measures work completed per iteration, useful for predicting capacity.",
                    how_to_measure: "Sum story points completed per sprint.",
                    audience: Audience::Only(&[Methodology::Scrum]),
                    tips: &[
                        "Track over 3-5 sprints for stability.",
                        "Adjust estimates if velocity fluctuates widely.",
                    ],
                },
                MetricEntry {
                    kind: MetricKind::CycleTime,
                    description: "Time from starting a task to its completion, indicating efficiency.",
                    how_to_measure: "Average time from 'In Progress' to 'Done' in days/hours.",
                    audience: Audience::Only(&[
                        Methodology::Kanban,
                        Methodology::Xp,
                        Methodology::Lean,
                    ]),
                    tips: &[
                        "Use tools like Jira for automatic tracking.",
                        "Aim for consistent Cycle Times (e.g., 1-3 days).",
                    ],
                },
                MetricEntry {
                    kind: MetricKind::LeadTime,
                    description: "Time from task request to delivery, showing responsiveness.",
                    how_to_measure: "Average time from backlog entry to completion.",
                    audience: Audience::Only(&[
                        Methodology::Kanban,
                        Methodology::Xp,
                        Methodology::Lean,
                    ]),
                    tips: &[
                        "Break tasks into smaller units to reduce Lead Time.",
                        "Review weekly to identify delays.",
                    ],
                },
                MetricEntry {
                    kind: MetricKind::DefectRate,
                    description: "Number of bugs found post-release, indicating quality.",
                    how_to_measure: "Bugs per feature or per sprint, tracked in a bug system.",
                    audience: Audience::Only(&[Methodology::Xp]),
                    tips: &[
                        "Use automated tests to catch defects early.",
                        "Target <1 bug per feature.",
                    ],
                },
                MetricEntry {
                    kind: MetricKind::TeamHappiness,
                    description: "Team satisfaction and engagement, critical for retention.",
                    how_to_measure: "Survey team (1-5 scale) biweekly or monthly.",
                    audience: Audience::All,
                    tips: &[
                        "Use anonymous surveys for honest feedback.",
                        "Act on results in retrospectives.",
                    ],
                },
            ],
            team_sizes: [
                TeamSizeGuidance {
                    size: TeamSize::Small,
                    range: "1-5 members",
                    recommendations: &[
                        "Use Kanban or simplified Scrum for flexibility.",
                        "Combine roles (e.g., Product Owner/Scrum Master).",
                        "Keep ceremonies short (10-15 minutes).",
                        "Encourage generalist skills.",
                    ],
                    xp_tips: &[
                        "Pair Programming can double as mentoring.",
                        "TDD suits small teams for quick quality checks.",
                    ],
                },
                TeamSizeGuidance {
                    size: TeamSize::Medium,
                    range: "6-12 members",
                    recommendations: &[
                        "Adopt Scrum or XP with dedicated roles.",
                        "Balance specialists and generalists.",
                        "Use regular ceremonies for alignment.",
                        "Track metrics like velocity or defect rate.",
                    ],
                    xp_tips: &[
                        "Rotate pairs to spread expertise.",
                        "Use CI tools to manage larger codebases.",
                    ],
                },
                TeamSizeGuidance {
                    size: TeamSize::Large,
                    range: "13+ members",
                    recommendations: &[
                        "Scale with Scrum of Scrums or SAFe.",
                        "Define clear inter-team dependencies.",
                        "Standardize processes across teams.",
                        "Foster communities of practice.",
                    ],
                    xp_tips: &[
                        "Apply TDD at the module level.",
                        "Use CI/CD for cross-team integration.",
                    ],
                },
            ],
            tools: TOOL_CATEGORIES,
            fallback_advice: &[
                "Discuss this challenge in a retrospective to identify root causes.",
                "Experiment with small changes to address it.",
                "Review outcomes after 1-2 iterations.",
            ],
        }
    }
}

const TOOL_CATEGORIES: &[ToolCategory] = &[
    ToolCategory {
        name: "Project Management",
        options: &[
            ToolOption {
                name: "Jira",
                audience: Audience::Only(&[Methodology::Scrum, Methodology::Kanban, Methodology::Xp]),
                summary: "Manages tasks and metrics",
            },
            ToolOption {
                name: "Trello",
                audience: Audience::Only(&[Methodology::Kanban]),
                summary: "Simple visual boards",
            },
            ToolOption {
                name: "Azure DevOps",
                audience: Audience::Only(&[Methodology::Scrum, Methodology::Xp]),
                summary: "Supports CI/CD",
            },
        ],
    },
    ToolCategory {
        name: "Collaboration",
        options: &[
            ToolOption {
                name: "Slack",
                audience: Audience::All,
                summary: "Real-time chat",
            },
            ToolOption {
                name: "Microsoft Teams",
                audience: Audience::All,
                summary: "Integrated collaboration",
            },
        ],
    },
    ToolCategory {
        name: "Testing/CI",
        options: &[
            ToolOption {
                name: "Jenkins",
                audience: Audience::Only(&[Methodology::Xp]),
                summary: "Automates CI",
            },
            ToolOption {
                name: "GitHub Actions",
                audience: Audience::Only(&[Methodology::Xp, Methodology::Scrum]),
                summary: "CI/CD workflows",
            },
        ],
    },
];

// ---------------------------------------------------------------------------
// Construction helpers
// ---------------------------------------------------------------------------

fn is_empty(list: &Strs) -> bool {
    list.is_empty()
}

#[derive(Default)]
struct Lists {
    ceremonies: Strs,
    principles: Strs,
    practices: Strs,
    roles: Strs,
    artifacts: Strs,
}

fn profile(
    methodology: Methodology,
    description: &'static str,
    best_for: Strs,
    lists: Lists,
    challenges_addressed: &'static [ChallengeKind],
    implementation_tips: Strs,
) -> MethodologyProfile {
    let display_practices = [lists.practices, lists.ceremonies, lists.principles]
        .into_iter()
        .find(|l| !l.is_empty())
        .unwrap_or(&[]);
    MethodologyProfile {
        methodology,
        description,
        best_for,
        ceremonies: lists.ceremonies,
        principles: lists.principles,
        practices: lists.practices,
        roles: lists.roles,
        artifacts: lists.artifacts,
        display_practices,
        challenges_addressed,
        implementation_tips,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_indexed_by_enum_order() {
        let kb = knowledge_base();
        for &m in Methodology::all() {
            assert_eq!(kb.methodology(m).methodology, m);
        }
        for &c in ChallengeKind::all() {
            assert_eq!(kb.challenge(c).kind, c);
        }
        for &k in MetricKind::all() {
            assert_eq!(kb.metric(k).kind, k);
        }
        for &t in TeamSize::all() {
            assert_eq!(kb.team_size(t).size, t);
            assert_eq!(kb.team_size(t).range, t.label());
        }
    }

    #[test]
    fn display_practices_prefer_practices_then_ceremonies_then_principles() {
        let kb = knowledge_base();
        assert_eq!(
            kb.methodology(Methodology::Kanban).display_practices[0],
            "Kanban board"
        );
        assert_eq!(
            kb.methodology(Methodology::Scrum).display_practices[0],
            "Sprint Planning"
        );
        assert_eq!(
            kb.methodology(Methodology::Lean).display_practices[0],
            "Eliminate waste"
        );
        for p in kb.methodologies() {
            assert!(!p.display_practices.is_empty());
        }
    }

    #[test]
    fn every_challenge_has_strategies_and_synonyms() {
        for entry in knowledge_base().challenges() {
            assert!(!entry.strategies.is_empty(), "{}", entry.kind);
            assert!(!entry.synonyms.is_empty(), "{}", entry.kind);
        }
    }

    #[test]
    fn overrides_are_partial() {
        let kb = knowledge_base();
        let scope = kb.challenge(ChallengeKind::ScopeCreep);
        assert!(scope.override_for(Methodology::Xp).is_some());
        assert!(scope.override_for(Methodology::Kanban).is_none());
        assert!(scope.override_for(Methodology::Scrum).is_none());
    }

    #[test]
    fn audience_matching() {
        assert!(Audience::All.includes(None));
        assert!(Audience::All.includes(Some(Methodology::Lean)));
        let only = Audience::Only(&[Methodology::Xp]);
        assert!(only.includes(Some(Methodology::Xp)));
        assert!(!only.includes(Some(Methodology::Scrum)));
        assert!(!only.includes(None));
    }

    #[test]
    fn three_tool_categories_each_with_options() {
        let cats = knowledge_base().tool_categories();
        assert_eq!(cats.len(), 3);
        assert!(cats.iter().all(|c| !c.options.is_empty()));
    }
}
