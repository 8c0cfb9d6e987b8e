use super::open_consultation;
use crate::output::print_json;
use agile_core::classifier::starter_suggestions;
use std::path::Path;

pub fn run(root: &Path, query: &str, context: Option<&Path>, json: bool) -> anyhow::Result<()> {
    if query.trim().is_empty() {
        eprintln!("Try asking one of these:");
        for s in starter_suggestions() {
            eprintln!("  {s}");
        }
        anyhow::bail!("query cannot be empty");
    }

    let mut consultation = open_consultation(root, context)?;
    let resolution = consultation.ask(query);
    let suggestions = consultation.suggestions();

    if json {
        let value = serde_json::json!({
            "rule": resolution.rule,
            "intent": resolution.intent,
            "response": resolution.response,
            "suggestions": suggestions,
        });
        return print_json(&value);
    }

    println!("{}", resolution.response);
    if !suggestions.is_empty() {
        println!("\nYou might also ask:");
        for s in suggestions {
            println!("  {s}");
        }
    }
    Ok(())
}
