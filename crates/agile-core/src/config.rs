use crate::error::Result;
use crate::paths;
use crate::types::{Complexity, ExperienceLevel, Goal, Methodology, MethodologyTable, TeamSize};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ScoringWeights
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamSizeWeights {
    pub small: MethodologyTable,
    pub medium: MethodologyTable,
    pub large: MethodologyTable,
}

impl Default for TeamSizeWeights {
    fn default() -> Self {
        Self {
            small: MethodologyTable::new(10, 30, 20, 0),
            medium: MethodologyTable::new(30, 10, 20, 0),
            large: MethodologyTable::new(20, 0, 10, 20),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceWeights {
    pub beginner: MethodologyTable,
    pub intermediate: MethodologyTable,
    pub advanced: MethodologyTable,
}

impl Default for ExperienceWeights {
    fn default() -> Self {
        Self {
            beginner: MethodologyTable::new(0, 10, -5, 0),
            intermediate: MethodologyTable::default(),
            advanced: MethodologyTable::new(0, 0, 10, 5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityWeights {
    pub simple: MethodologyTable,
    pub moderate: MethodologyTable,
    pub complex: MethodologyTable,
}

impl Default for ComplexityWeights {
    fn default() -> Self {
        Self {
            simple: MethodologyTable::new(0, 10, 0, 5),
            moderate: MethodologyTable::default(),
            complex: MethodologyTable::new(10, 0, 10, 0),
        }
    }
}

/// The additive scoring policy. Every value can be overridden from
/// `.agile/config.yaml`; a `goals` map given there replaces the default map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default)]
    pub team_size: TeamSizeWeights,
    /// Added once per (selected challenge, methodology addressing it).
    #[serde(default = "default_challenge_match")]
    pub challenge_match: i32,
    #[serde(default = "default_goal_weights")]
    pub goals: BTreeMap<Goal, MethodologyTable>,
    #[serde(default)]
    pub experience: ExperienceWeights,
    #[serde(default)]
    pub complexity: ComplexityWeights,
}

fn default_challenge_match() -> i32 {
    15
}

fn default_goal_weights() -> BTreeMap<Goal, MethodologyTable> {
    BTreeMap::from([
        (Goal::FasterDelivery, MethodologyTable::new(0, 15, 10, 15)),
        (Goal::HigherQuality, MethodologyTable::new(0, 0, 20, 10)),
        (Goal::BetterPredictability, MethodologyTable::new(15, 10, 0, 0)),
        (Goal::TeamSatisfaction, MethodologyTable::new(0, 10, 15, 0)),
        (Goal::ReducedCosts, MethodologyTable::new(0, 0, 0, 20)),
        (
            Goal::BetterCustomerCollaboration,
            MethodologyTable::new(15, 0, 10, 0),
        ),
        (Goal::MoreInnovation, MethodologyTable::new(0, 0, 10, 15)),
    ])
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            team_size: TeamSizeWeights::default(),
            challenge_match: default_challenge_match(),
            goals: default_goal_weights(),
            experience: ExperienceWeights::default(),
            complexity: ComplexityWeights::default(),
        }
    }
}

impl ScoringWeights {
    pub fn team_size(&self, size: TeamSize) -> &MethodologyTable {
        match size {
            TeamSize::Small => &self.team_size.small,
            TeamSize::Medium => &self.team_size.medium,
            TeamSize::Large => &self.team_size.large,
        }
    }

    /// Zero row for goals missing from the table.
    pub fn goal(&self, goal: Goal) -> MethodologyTable {
        self.goals.get(&goal).copied().unwrap_or_default()
    }

    pub fn experience(&self, level: ExperienceLevel) -> &MethodologyTable {
        match level {
            ExperienceLevel::Beginner => &self.experience.beginner,
            ExperienceLevel::Intermediate => &self.experience.intermediate,
            ExperienceLevel::Advanced => &self.experience.advanced,
        }
    }

    pub fn complexity(&self, complexity: Complexity) -> &MethodologyTable {
        match complexity {
            Complexity::Simple => &self.complexity.simple,
            Complexity::Moderate => &self.complexity.moderate,
            Complexity::Complex => &self.complexity.complex,
        }
    }
}

// ---------------------------------------------------------------------------
// StepConfig
// ---------------------------------------------------------------------------

/// Where challenge strategy tips are appended in implementation steps.
///
/// `EveryStep` repeats the same suffix on each step, which reads as an
/// accident; `FirstStep` applies it once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeTipMode {
    #[default]
    EveryStep,
    FirstStep,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepConfig {
    #[serde(default)]
    pub challenge_tips: ChallengeTipMode,
}

// ---------------------------------------------------------------------------
// ConsultConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub scoring: ScoringWeights,
    #[serde(default)]
    pub steps: StepConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for ConsultConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            scoring: ScoringWeights::default(),
            steps: StepConfig::default(),
        }
    }
}

impl ConsultConfig {
    /// Load `.agile/config.yaml`, or the defaults when the file is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: ConsultConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.version != 1 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("unsupported config version {}", self.version),
            });
        }

        if self.scoring.challenge_match <= 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "scoring.challenge_match is {}; matched challenges will not favour a methodology",
                    self.scoring.challenge_match
                ),
            });
        }

        // Each bracket should keep favouring the methodologies suited to it.
        let preferred: [(TeamSize, &[Methodology]); 3] = [
            (TeamSize::Small, &[Methodology::Kanban]),
            (TeamSize::Medium, &[Methodology::Scrum]),
            (TeamSize::Large, &[Methodology::Scrum, Methodology::Lean]),
        ];
        for (size, expected) in preferred {
            let best = self.scoring.team_size(size).best();
            if !expected.contains(&best) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "scoring.team_size.{size} favours {best}; expected {}",
                        expected
                            .iter()
                            .map(|m| m.as_str())
                            .collect::<Vec<_>>()
                            .join(" or ")
                    ),
                });
            }
        }

        for goal in Goal::all() {
            if !self.scoring.goals.contains_key(goal) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("scoring.goals has no weights for '{goal}'"),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
