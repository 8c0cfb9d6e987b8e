use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Methodology
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Methodology {
    Scrum,
    Kanban,
    Xp,
    Lean,
}

impl Methodology {
    /// Fixed iteration order. Scoring ties resolve to the earliest entry.
    pub fn all() -> &'static [Methodology] {
        &[
            Methodology::Scrum,
            Methodology::Kanban,
            Methodology::Xp,
            Methodology::Lean,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Methodology::Scrum => "scrum",
            Methodology::Kanban => "kanban",
            Methodology::Xp => "xp",
            Methodology::Lean => "lean",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Methodology::Scrum => "Scrum",
            Methodology::Kanban => "Kanban",
            Methodology::Xp => "XP",
            Methodology::Lean => "Lean",
        }
    }

    /// Lenient parse for questionnaire answers ("Scrum", "XP", " kanban ").
    /// "None/Traditional", "Hybrid" and "Other" are not methodologies.
    pub fn from_answer(s: &str) -> Option<Methodology> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scrum" => Some(Methodology::Scrum),
            "kanban" => Some(Methodology::Kanban),
            "xp" | "extreme programming" => Some(Methodology::Xp),
            "lean" => Some(Methodology::Lean),
            _ => None,
        }
    }
}

impl fmt::Display for Methodology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Methodology {
    type Err = crate::error::ConsultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Methodology::from_answer(s)
            .ok_or_else(|| crate::error::ConsultError::InvalidMethodology(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ChallengeKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    ResistanceToChange,
    LackOfEngagement,
    PoorCommunication,
    InconsistentEstimation,
    ScopeCreep,
    QualityIssues,
    MeetingDeadlines,
    StakeholderManagement,
}

impl ChallengeKind {
    pub fn all() -> &'static [ChallengeKind] {
        &[
            ChallengeKind::ResistanceToChange,
            ChallengeKind::LackOfEngagement,
            ChallengeKind::PoorCommunication,
            ChallengeKind::InconsistentEstimation,
            ChallengeKind::ScopeCreep,
            ChallengeKind::QualityIssues,
            ChallengeKind::MeetingDeadlines,
            ChallengeKind::StakeholderManagement,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChallengeKind::ResistanceToChange => "resistance_to_change",
            ChallengeKind::LackOfEngagement => "lack_of_engagement",
            ChallengeKind::PoorCommunication => "poor_communication",
            ChallengeKind::InconsistentEstimation => "inconsistent_estimation",
            ChallengeKind::ScopeCreep => "scope_creep",
            ChallengeKind::QualityIssues => "quality_issues",
            ChallengeKind::MeetingDeadlines => "meeting_deadlines",
            ChallengeKind::StakeholderManagement => "stakeholder_management",
        }
    }

    /// Questionnaire option text.
    pub fn label(self) -> &'static str {
        match self {
            ChallengeKind::ResistanceToChange => "Resistance to change",
            ChallengeKind::LackOfEngagement => "Lack of engagement",
            ChallengeKind::PoorCommunication => "Poor communication",
            ChallengeKind::InconsistentEstimation => "Inconsistent estimation",
            ChallengeKind::ScopeCreep => "Scope creep",
            ChallengeKind::QualityIssues => "Quality issues",
            ChallengeKind::MeetingDeadlines => "Meeting deadlines",
            ChallengeKind::StakeholderManagement => "Stakeholder management",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// The id with underscores replaced by spaces, as matched in free text.
    pub fn phrase(self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Accepts the id or the label, case-insensitive.
    pub fn from_answer(s: &str) -> Option<ChallengeKind> {
        let normalized = s.trim().to_lowercase().replace('_', " ");
        ChallengeKind::all()
            .iter()
            .copied()
            .find(|c| c.phrase() == normalized)
    }
}

impl fmt::Display for ChallengeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Goal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    FasterDelivery,
    HigherQuality,
    BetterPredictability,
    TeamSatisfaction,
    ReducedCosts,
    BetterCustomerCollaboration,
    MoreInnovation,
}

impl Goal {
    pub fn all() -> &'static [Goal] {
        &[
            Goal::FasterDelivery,
            Goal::HigherQuality,
            Goal::BetterPredictability,
            Goal::TeamSatisfaction,
            Goal::ReducedCosts,
            Goal::BetterCustomerCollaboration,
            Goal::MoreInnovation,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Goal::FasterDelivery => "faster_delivery",
            Goal::HigherQuality => "higher_quality",
            Goal::BetterPredictability => "better_predictability",
            Goal::TeamSatisfaction => "team_satisfaction",
            Goal::ReducedCosts => "reduced_costs",
            Goal::BetterCustomerCollaboration => "better_customer_collaboration",
            Goal::MoreInnovation => "more_innovation",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Goal::FasterDelivery => "Faster delivery",
            Goal::HigherQuality => "Higher quality",
            Goal::BetterPredictability => "Better predictability",
            Goal::TeamSatisfaction => "Team satisfaction",
            Goal::ReducedCosts => "Reduced costs",
            Goal::BetterCustomerCollaboration => "Better customer collaboration",
            Goal::MoreInnovation => "More innovation",
        }
    }

    pub fn from_answer(s: &str) -> Option<Goal> {
        let normalized = s.trim().to_lowercase().replace('_', " ");
        Goal::all()
            .iter()
            .copied()
            .find(|g| g.label().to_lowercase() == normalized)
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MetricKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Velocity,
    CycleTime,
    LeadTime,
    DefectRate,
    TeamHappiness,
}

impl MetricKind {
    /// Knowledge-base enumeration order, also used when padding selections.
    pub fn all() -> &'static [MetricKind] {
        &[
            MetricKind::Velocity,
            MetricKind::CycleTime,
            MetricKind::LeadTime,
            MetricKind::DefectRate,
            MetricKind::TeamHappiness,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Velocity => "velocity",
            MetricKind::CycleTime => "cycle_time",
            MetricKind::LeadTime => "lead_time",
            MetricKind::DefectRate => "defect_rate",
            MetricKind::TeamHappiness => "team_happiness",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            MetricKind::Velocity => "Velocity",
            MetricKind::CycleTime => "Cycle Time",
            MetricKind::LeadTime => "Lead Time",
            MetricKind::DefectRate => "Defect Rate",
            MetricKind::TeamHappiness => "Team Happiness",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TeamSize
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl TeamSize {
    pub fn all() -> &'static [TeamSize] {
        &[TeamSize::Small, TeamSize::Medium, TeamSize::Large]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TeamSize::Small => "small",
            TeamSize::Medium => "medium",
            TeamSize::Large => "large",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            TeamSize::Small => "1-5 members",
            TeamSize::Medium => "6-12 members",
            TeamSize::Large => "13+ members",
        }
    }

    pub fn from_count(n: u32) -> TeamSize {
        match n {
            0..=5 => TeamSize::Small,
            6..=12 => TeamSize::Medium,
            _ => TeamSize::Large,
        }
    }

    /// Matches a bracket label exactly, then falls back to the leading
    /// integer of the answer ("8 people" is medium).
    pub fn from_answer(s: &str) -> Option<TeamSize> {
        let s = s.trim();
        if let Some(size) = TeamSize::all().iter().copied().find(|t| t.label() == s) {
            return Some(size);
        }
        let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse::<u32>().ok().map(TeamSize::from_count)
    }
}

impl fmt::Display for TeamSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ExperienceLevel / Complexity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::Intermediate => "Intermediate",
            ExperienceLevel::Advanced => "Advanced",
        }
    }

    pub fn from_answer(s: &str) -> Option<ExperienceLevel> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(ExperienceLevel::Beginner),
            "intermediate" => Some(ExperienceLevel::Intermediate),
            "advanced" => Some(ExperienceLevel::Advanced),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    #[default]
    Moderate,
    Complex,
}

impl Complexity {
    pub fn label(self) -> &'static str {
        match self {
            Complexity::Simple => "Simple",
            Complexity::Moderate => "Moderate",
            Complexity::Complex => "Complex",
        }
    }

    pub fn from_answer(s: &str) -> Option<Complexity> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Some(Complexity::Simple),
            "moderate" => Some(Complexity::Moderate),
            "complex" => Some(Complexity::Complex),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// QuestionId
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionId {
    TeamSize,
    Industry,
    CurrentMethodology,
    ExperienceLevel,
    Challenges,
    Goals,
    ProjectComplexity,
}

impl QuestionId {
    pub fn all() -> &'static [QuestionId] {
        &[
            QuestionId::TeamSize,
            QuestionId::Industry,
            QuestionId::CurrentMethodology,
            QuestionId::ExperienceLevel,
            QuestionId::Challenges,
            QuestionId::Goals,
            QuestionId::ProjectComplexity,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionId::TeamSize => "team_size",
            QuestionId::Industry => "industry",
            QuestionId::CurrentMethodology => "current_methodology",
            QuestionId::ExperienceLevel => "experience_level",
            QuestionId::Challenges => "challenges",
            QuestionId::Goals => "goals",
            QuestionId::ProjectComplexity => "project_complexity",
        }
    }

    pub fn is_multi(self) -> bool {
        matches!(self, QuestionId::Challenges | QuestionId::Goals)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuestionId {
    type Err = crate::error::ConsultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionId::all()
            .iter()
            .copied()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| crate::error::ConsultError::UnknownQuestion(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// MethodologyTable
// ---------------------------------------------------------------------------

/// One integer per methodology. Serves both as a weight row in the scoring
/// policy and as the running score table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodologyTable {
    pub scrum: i32,
    pub kanban: i32,
    pub xp: i32,
    pub lean: i32,
}

impl MethodologyTable {
    pub const fn new(scrum: i32, kanban: i32, xp: i32, lean: i32) -> Self {
        Self {
            scrum,
            kanban,
            xp,
            lean,
        }
    }

    pub fn get(&self, m: Methodology) -> i32 {
        match m {
            Methodology::Scrum => self.scrum,
            Methodology::Kanban => self.kanban,
            Methodology::Xp => self.xp,
            Methodology::Lean => self.lean,
        }
    }

    pub fn add(&mut self, m: Methodology, delta: i32) {
        match m {
            Methodology::Scrum => self.scrum += delta,
            Methodology::Kanban => self.kanban += delta,
            Methodology::Xp => self.xp += delta,
            Methodology::Lean => self.lean += delta,
        }
    }

    /// Add every row of `other` into this table.
    pub fn add_all(&mut self, other: &MethodologyTable) {
        for &m in Methodology::all() {
            self.add(m, other.get(m));
        }
    }

    pub fn mentions(&self, m: Methodology) -> bool {
        self.get(m) != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Methodology, i32)> + '_ {
        Methodology::all().iter().map(move |&m| (m, self.get(m)))
    }

    /// Highest value; exact ties go to the earliest methodology in
    /// [`Methodology::all`].
    pub fn best(&self) -> Methodology {
        let mut best = Methodology::Scrum;
        for (m, value) in self.iter() {
            if value > self.get(best) {
                best = m;
            }
        }
        best
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
