use agile_core::{config::ConsultConfig, io, paths};
use anyhow::Context;
use std::path::Path;

/// Starter answers file written next to the config.
const CONTEXT_TEMPLATE_FILE: &str = ".agile/context.example.yaml";

const CONTEXT_TEMPLATE: &str = "\
# Assessment answers for `agile recommend --context` and `agile consult --context`.
# Run `agile questions` to see every question and its options.
team_size: 6-12 members
industry: Software
current_methodology: Scrum
challenges:
  - Poor communication
  - Scope creep
goals:
  - Faster delivery
  - Higher quality
experience_level: Intermediate
project_complexity: Moderate
";

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing agile consultant in: {}", root.display());

    for p in [paths::agile_dir(root), paths::exports_dir(root)] {
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    let config_path = paths::config_path(root);
    if !config_path.exists() {
        ConsultConfig::default()
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    let template = root.join(CONTEXT_TEMPLATE_FILE);
    if io::write_if_missing(&template, CONTEXT_TEMPLATE.as_bytes())? {
        println!("  created: {CONTEXT_TEMPLATE_FILE}");
    } else {
        println!("  exists:  {CONTEXT_TEMPLATE_FILE}");
    }

    println!("\nNext: agile consult --context {CONTEXT_TEMPLATE_FILE}");
    Ok(())
}
