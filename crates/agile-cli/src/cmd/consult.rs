use super::{load_answers, recommend::print_bundle};
use agile_core::classifier::starter_suggestions;
use agile_core::config::ConsultConfig;
use agile_core::context::{Answer, Question, QuestionKind};
use agile_core::transcript::JsonFileSink;
use agile_core::{paths, Consultation};
use anyhow::Context;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

const HELP: &str = "\
Commands:
  :history        show the conversation so far
  :context        show the team context
  :recommend      recommend a methodology for the current context
  :save [PATH]    export the conversation (default: .agile/exports/<session>.json)
  :help           show this list
  :quit           end the session
Anything else is answered as a question.";

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, context: Option<&Path>) -> anyhow::Result<()> {
    let config = ConsultConfig::load(root).context("failed to load config")?;
    let mut consultation = Consultation::new(config);

    let greeting = match context {
        Some(path) => {
            let answers = load_answers(path)?;
            consultation
                .resume(answers)
                .with_context(|| format!("invalid answers in {}", path.display()))?
        }
        None => consultation.start(None),
    };
    println!("{greeting}\n");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    if context.is_none() {
        if !assess(&mut consultation, &mut lines)? {
            return Ok(());
        }
        let bundle = consultation.recommend();
        println!();
        print_bundle(&bundle);
        if let Some(summary) = consultation.history().last() {
            println!("\n{}", summary.content);
        }
    }

    converse(root, &mut consultation, &mut lines)
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

/// Ask every question in turn. Returns `false` when input ends early.
fn assess<I>(consultation: &mut Consultation, lines: &mut I) -> anyhow::Result<bool>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    for q in consultation.list_questions() {
        loop {
            println!("{}", q.prompt);
            for (i, option) in q.options.iter().enumerate() {
                println!("  {}. {option}", i + 1);
            }
            let Some(line) = prompt(lines)? else {
                return Ok(false);
            };
            match consultation.submit_answer(q.id.as_str(), parse_answer(q, &line)) {
                Ok(()) => break,
                Err(e) => println!("{e}"),
            }
        }
    }
    Ok(true)
}

/// Numbers pick options; anything else is taken as typed. Multi-select
/// answers are comma separated.
fn parse_answer(q: &Question, input: &str) -> Answer {
    match q.kind {
        QuestionKind::Text => Answer::single(input.trim()),
        QuestionKind::Select => Answer::single(choice(q.options, input)),
        QuestionKind::MultiSelect => Answer::multi(
            input
                .split(',')
                .map(|part| choice(q.options, part))
                .filter(|s| !s.is_empty()),
        ),
    }
}

fn choice(options: &[&str], input: &str) -> String {
    let input = input.trim();
    match input.parse::<usize>() {
        Ok(n) if (1..=options.len()).contains(&n) => options[n - 1].to_string(),
        _ => input.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Conversation loop
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
enum Command {
    Empty,
    Help,
    History,
    Context,
    Recommend,
    Save(Option<PathBuf>),
    Quit,
    Unknown(String),
    Query(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Command::Query(line.to_string());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "help" => Command::Help,
        "history" => Command::History,
        "context" => Command::Context,
        "recommend" => Command::Recommend,
        "save" if arg.is_empty() => Command::Save(None),
        "save" => Command::Save(Some(PathBuf::from(arg))),
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

fn converse<I>(root: &Path, consultation: &mut Consultation, lines: &mut I) -> anyhow::Result<()>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    println!("\nAsk a question, or type :help for commands.");
    while let Some(line) = prompt(lines)? {
        match parse_command(&line) {
            Command::Empty => {
                println!("Try asking one of these:");
                for s in starter_suggestions() {
                    println!("  {s}");
                }
            }
            Command::Help => println!("{HELP}"),
            Command::History => {
                for m in consultation.history() {
                    println!("[{}] {}", m.role, m.content);
                }
            }
            Command::Context => println!("{}", consultation.context_summary()),
            Command::Recommend => {
                let bundle = consultation.recommend();
                print_bundle(&bundle);
            }
            Command::Save(path) => save(root, consultation, path),
            Command::Quit => break,
            Command::Unknown(name) => {
                println!("unknown command ':{name}'. Type :help for commands.")
            }
            Command::Query(text) => {
                println!("{}", consultation.query(&text));
                let suggestions = consultation.suggestions();
                if !suggestions.is_empty() {
                    println!("\nYou might also ask:");
                    for s in suggestions {
                        println!("  {s}");
                    }
                }
            }
        }
    }
    Ok(())
}

/// A failed export is reported and the session carries on. The sink creates
/// missing parent directories itself.
fn save(root: &Path, consultation: &mut Consultation, path: Option<PathBuf>) {
    let path =
        path.unwrap_or_else(|| paths::default_export_path(root, consultation.session_id()));
    if let Err(e) = consultation.export(&JsonFileSink::new(path)) {
        tracing::debug!(error = %e, "export reported to user");
    }
    if let Some(note) = consultation.history().last() {
        println!("{}", note.content);
    }
}

fn prompt<I>(lines: &mut I) -> anyhow::Result<Option<String>>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    print!("> ");
    std::io::stdout().flush().context("failed to flush stdout")?;
    match lines.next() {
        Some(line) => Ok(Some(line.context("failed to read input")?)),
        None => {
            println!();
            Ok(None)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use agile_core::context::question;
    use agile_core::types::QuestionId;

    #[test]
    fn numbers_pick_options() {
        let q = question(QuestionId::TeamSize);
        assert_eq!(parse_answer(q, "2"), Answer::single("6-12 members"));
        assert_eq!(parse_answer(q, "13+ members"), Answer::single("13+ members"));
        assert_eq!(parse_answer(q, "9"), Answer::single("9"));
    }

    #[test]
    fn multi_select_splits_on_commas() {
        let q = question(QuestionId::Challenges);
        assert_eq!(
            parse_answer(q, "3, Quality issues,,"),
            Answer::multi(["Scope creep", "Quality issues"])
        );
        assert_eq!(parse_answer(q, ""), Answer::Multi(vec![]));
    }

    #[test]
    fn parses_session_commands() {
        assert_eq!(parse_command("  "), Command::Empty);
        assert_eq!(parse_command(":history"), Command::History);
        assert_eq!(parse_command(":save"), Command::Save(None));
        assert_eq!(
            parse_command(":save  out/session"),
            Command::Save(Some(PathBuf::from("out/session")))
        );
        assert_eq!(parse_command(":exit"), Command::Quit);
        assert_eq!(parse_command(":bogus"), Command::Unknown("bogus".to_string()));
        assert_eq!(
            parse_command("What is Lean?"),
            Command::Query("What is Lean?".to_string())
        );
    }
}
