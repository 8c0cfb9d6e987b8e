use crate::output::{print_json, print_table};
use agile_core::context::{questions, QuestionKind};

pub fn run(json: bool) -> anyhow::Result<()> {
    let questions = questions();
    if json {
        return print_json(&questions);
    }

    let rows = questions
        .iter()
        .map(|q| {
            let kind = match q.kind {
                QuestionKind::Text => "text",
                QuestionKind::Select => "select",
                QuestionKind::MultiSelect => "multi-select",
            };
            vec![
                q.id.to_string(),
                kind.to_string(),
                q.prompt.to_string(),
                q.options.join(" | "),
            ]
        })
        .collect();
    print_table(&["ID", "KIND", "PROMPT", "OPTIONS"], rows);
    Ok(())
}
