pub mod ask;
pub mod config;
pub mod consult;
pub mod init;
pub mod questions;
pub mod recommend;

use agile_core::config::ConsultConfig;
use agile_core::context::Answer;
use agile_core::Consultation;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::Path;

/// Read a map of question id to answer. JSON files parse as YAML too.
pub fn load_answers(path: &Path) -> anyhow::Result<BTreeMap<String, Answer>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let answers: BTreeMap<String, Answer> = serde_yaml::from_str(&data)
        .with_context(|| format!("failed to parse answers in {}", path.display()))?;
    Ok(answers)
}

/// A consultation using the project config, with `context` applied when given.
pub fn open_consultation(root: &Path, context: Option<&Path>) -> anyhow::Result<Consultation> {
    let config = ConsultConfig::load(root).context("failed to load config")?;
    let mut consultation = Consultation::new(config);
    if let Some(path) = context {
        let answers = load_answers(path)?;
        consultation
            .submit_assessment(answers)
            .with_context(|| format!("invalid answers in {}", path.display()))?;
    }
    Ok(consultation)
}
