#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const KANBAN_CONTEXT: &str = "\
team_size: 1-5 members
industry: Software
current_methodology: None/Traditional
challenges:
  - Poor communication
goals:
  - Faster delivery
experience_level: Beginner
project_complexity: Simple
";

fn agile(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("agile").unwrap();
    cmd.current_dir(dir.path()).env("AGILE_ROOT", dir.path());
    cmd
}

fn write_context(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("context.yaml");
    std::fs::write(&path, body).unwrap();
    path
}

// ---------------------------------------------------------------------------
// agile init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_directory_tree() {
    let dir = TempDir::new().unwrap();
    agile(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .agile/config.yaml"));

    assert!(dir.path().join(".agile").is_dir());
    assert!(dir.path().join(".agile/exports").is_dir());
    assert!(dir.path().join(".agile/config.yaml").exists());
    assert!(dir.path().join(".agile/context.example.yaml").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    agile(&dir).arg("init").assert().success();
    agile(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:  .agile/config.yaml"));
}

#[test]
fn init_template_is_a_valid_context() {
    let dir = TempDir::new().unwrap();
    agile(&dir).arg("init").assert().success();
    agile(&dir)
        .args(["recommend", "--context", ".agile/context.example.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommended methodology:"));
}

// ---------------------------------------------------------------------------
// agile questions
// ---------------------------------------------------------------------------

#[test]
fn questions_json_lists_all_seven() {
    let dir = TempDir::new().unwrap();
    let output = agile(&dir).args(["questions", "--json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let questions = value.as_array().unwrap();
    assert_eq!(questions.len(), 7);
    assert_eq!(questions[0]["id"], "team_size");
    assert_eq!(questions[4]["kind"], "multi-select");
}

#[test]
fn questions_table_shows_prompts() {
    let dir = TempDir::new().unwrap();
    agile(&dir)
        .arg("questions")
        .assert()
        .success()
        .stdout(predicate::str::contains("How large is your team?"))
        .stdout(predicate::str::contains("1-5 members | 6-12 members | 13+ members"));
}

// ---------------------------------------------------------------------------
// agile recommend
// ---------------------------------------------------------------------------

#[test]
fn recommend_small_new_team_gets_kanban() {
    let dir = TempDir::new().unwrap();
    let ctx = write_context(&dir, KANBAN_CONTEXT);
    agile(&dir)
        .args(["recommend", "--context"])
        .arg(&ctx)
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommended methodology: Kanban"))
        .stdout(predicate::str::contains("Team practices:"))
        .stdout(predicate::str::contains("Poor communication"));
}

#[test]
fn recommend_json_has_every_section() {
    let dir = TempDir::new().unwrap();
    let ctx = write_context(&dir, KANBAN_CONTEXT);
    let output = agile(&dir)
        .args(["--json", "recommend", "--context"])
        .arg(&ctx)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["methodology"]["methodology"], "kanban");
    assert_eq!(value["methodology"]["scores"]["kanban"], 80);
    assert!(value["team_practices"].as_array().unwrap().len() >= 3);
    assert!(value["metrics"].as_array().unwrap().len() >= 3);
    assert_eq!(value["tools"].as_array().unwrap().len(), 3);
    assert!(value.get("warnings").is_none());
}

#[test]
fn recommend_accepts_json_context() {
    let dir = TempDir::new().unwrap();
    let ctx = write_context(
        &dir,
        r#"{"team_size": "13+ members", "challenges": ["Scope creep"], "goals": []}"#,
    );
    agile(&dir)
        .args(["recommend", "--context"])
        .arg(&ctx)
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommended methodology:"));
}

#[test]
fn recommend_warns_about_unrecognized_answers() {
    let dir = TempDir::new().unwrap();
    let ctx = write_context(
        &dir,
        "team_size: 6-12 members\nchallenges:\n  - Too many meetings\n",
    );
    agile(&dir)
        .args(["recommend", "--context"])
        .arg(&ctx)
        .assert()
        .success()
        .stderr(predicate::str::contains("Too many meetings"));
}

#[test]
fn recommend_rejects_unknown_question() {
    let dir = TempDir::new().unwrap();
    let ctx = write_context(&dir, "favourite_color: blue\n");
    agile(&dir)
        .args(["recommend", "--context"])
        .arg(&ctx)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown question 'favourite_color'"));
}

#[test]
fn recommend_rejects_blank_single_answer() {
    let dir = TempDir::new().unwrap();
    let ctx = write_context(&dir, "industry: \"  \"\n");
    agile(&dir)
        .args(["recommend", "--context"])
        .arg(&ctx)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid answer for 'industry'"));
}

#[test]
fn recommend_missing_context_file_fails() {
    let dir = TempDir::new().unwrap();
    agile(&dir)
        .args(["recommend", "--context", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

// ---------------------------------------------------------------------------
// agile ask
// ---------------------------------------------------------------------------

#[test]
fn ask_kanban_board_lists_setup_steps() {
    let dir = TempDir::new().unwrap();
    let ctx = write_context(&dir, KANBAN_CONTEXT);
    agile(&dir)
        .args(["ask", "How do I set up a Kanban board?", "--context"])
        .arg(&ctx)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "5. Review and update the board daily in standups.",
        ));
}

#[test]
fn ask_json_reports_rule_and_intent() {
    let dir = TempDir::new().unwrap();
    let output = agile(&dir)
        .args(["ask", "How do I set up a Kanban board?", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["rule"], "kanban_board");
    assert_eq!(value["intent"], "board_setup");
}

#[test]
fn ask_unmatched_query_falls_back() {
    let dir = TempDir::new().unwrap();
    let output = agile(&dir)
        .args(["ask", "asdkjasd", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["rule"], "fallback");
    assert!(value["response"].as_str().unwrap().contains("asdkjasd"));
}

#[test]
fn ask_blank_query_offers_suggestions() {
    let dir = TempDir::new().unwrap();
    agile(&dir)
        .args(["ask", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("How do I set up a Kanban board for my team?"))
        .stderr(predicate::str::contains("query cannot be empty"));
}

// ---------------------------------------------------------------------------
// agile consult
// ---------------------------------------------------------------------------

#[test]
fn consult_runs_assessment_then_recommends() {
    let dir = TempDir::new().unwrap();
    agile(&dir)
        .arg("consult")
        .write_stdin("1\n\nFinance\n1\n1\n4\n1\n1\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to your Agile Project Consultant!"))
        .stdout(predicate::str::contains("invalid answer for 'industry'"))
        .stdout(predicate::str::contains("Recommended methodology: Kanban"))
        .stdout(predicate::str::contains("For your 1-5 members team, I recommend Kanban"));
}

#[test]
fn consult_ends_quietly_when_input_runs_out() {
    let dir = TempDir::new().unwrap();
    agile(&dir)
        .arg("consult")
        .write_stdin("1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("What industry are you in?"));
}

#[test]
fn consult_with_context_answers_and_saves() {
    let dir = TempDir::new().unwrap();
    let ctx = write_context(&dir, KANBAN_CONTEXT);
    agile(&dir)
        .args(["consult", "--context"])
        .arg(&ctx)
        .write_stdin("How do I set up a Kanban board?\n:history\n:save notes/session\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome back! I'm here to help 1-5 members"))
        .stdout(predicate::str::contains("[user] How do I set up a Kanban board?"))
        .stdout(predicate::str::contains("Conversation saved to"));

    let saved = std::fs::read_to_string(dir.path().join("notes/session.json")).unwrap();
    assert!(saved.contains("How do I set up a Kanban board?"));
}

#[test]
fn consult_save_defaults_to_exports_dir() {
    let dir = TempDir::new().unwrap();
    let ctx = write_context(&dir, KANBAN_CONTEXT);
    agile(&dir)
        .args(["consult", "--context"])
        .arg(&ctx)
        .write_stdin(":context\n:save\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Team: 1-5 members"))
        .stdout(predicate::str::contains("Conversation saved to"));

    let exports: Vec<_> = std::fs::read_dir(dir.path().join(".agile/exports"))
        .unwrap()
        .collect();
    assert_eq!(exports.len(), 1);
    let path = exports[0].as_ref().unwrap().path();
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(saved["context"]["team_size"], "1-5 members");
}

#[test]
fn consult_save_failure_keeps_session_running() {
    let dir = TempDir::new().unwrap();
    let ctx = write_context(&dir, KANBAN_CONTEXT);
    std::fs::create_dir_all(dir.path().join(".agile")).unwrap();
    std::fs::write(dir.path().join(".agile/exports"), "not a directory").unwrap();

    agile(&dir)
        .args(["consult", "--context"])
        .arg(&ctx)
        .write_stdin(":save\nHow do I set up a Kanban board?\n:history\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed to save conversation"))
        .stdout(predicate::str::contains(
            "5. Review and update the board daily in standups.",
        ))
        .stdout(predicate::str::contains("[agent] Failed to save conversation"));
}

#[test]
fn consult_with_context_keeps_answers_in_history() {
    let dir = TempDir::new().unwrap();
    let ctx = write_context(&dir, KANBAN_CONTEXT);
    agile(&dir)
        .args(["consult", "--context"])
        .arg(&ctx)
        .write_stdin(":history\n:save session\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[user] team_size: 1-5 members"))
        .stdout(predicate::str::contains("[user] challenges: Poor communication"));

    let saved: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("session.json")).unwrap(),
    )
    .unwrap();
    let messages = saved["messages"].as_array().unwrap();
    assert_eq!(messages[0]["role"], "agent");
    assert!(messages
        .iter()
        .any(|m| m["role"] == "user" && m["content"] == "industry: Software"));
}

// ---------------------------------------------------------------------------
// agile config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_defaults_is_clean() {
    let dir = TempDir::new().unwrap();
    agile(&dir).arg("init").assert().success();
    agile(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid. No warnings."));
}

#[test]
fn config_validate_rejects_unknown_version() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".agile")).unwrap();
    std::fs::write(dir.path().join(".agile/config.yaml"), "version: 2\n").unwrap();
    agile(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] unsupported config version 2"))
        .stderr(predicate::str::contains("config validation found errors"));
}

#[test]
fn config_show_prints_weights() {
    let dir = TempDir::new().unwrap();
    agile(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("challenge_match: 15"));
}
