use super::open_consultation;
use crate::output::{print_json, print_table};
use agile_core::recommend::RecommendationBundle;
use std::path::Path;

pub fn run(root: &Path, context: &Path, json: bool) -> anyhow::Result<()> {
    let mut consultation = open_consultation(root, Some(context))?;
    let bundle = consultation.recommend();

    for w in &bundle.warnings {
        eprintln!("[warning] unrecognized {} answer: {}", w.field, w.value);
    }

    if json {
        return print_json(&bundle);
    }
    print_bundle(&bundle);
    Ok(())
}

/// Human-readable rendering shared with the interactive session.
pub fn print_bundle(bundle: &RecommendationBundle) {
    let m = &bundle.methodology;
    println!("Recommended methodology: {}", m.name);
    println!("  {}", m.description);
    println!("\nWhy: {}", m.why_recommended);

    println!("\nScores:");
    let rows = m
        .scores
        .iter()
        .map(|(methodology, score)| {
            vec![methodology.display_name().to_string(), score.to_string()]
        })
        .collect();
    print_table(&["METHODOLOGY", "SCORE"], rows);

    println!("\nImplementation steps:");
    for (i, step) in m.implementation_steps.iter().enumerate() {
        println!("  {}. {}: {}", i + 1, step.step, step.description);
    }

    println!("\nTeam practices:");
    for p in &bundle.team_practices {
        println!("  {}: {}", p.practice, p.description);
        for tip in &p.implementation_tips {
            println!("    - {tip}");
        }
    }

    if !bundle.challenges.is_empty() {
        println!("\nChallenges:");
        for c in &bundle.challenges {
            println!("  {}", c.challenge);
            for rec in &c.recommendations {
                println!("    - {rec}");
            }
        }
    }

    println!("\nTools:");
    let rows = bundle
        .tools
        .iter()
        .map(|t| {
            vec![
                t.category.to_string(),
                t.recommendation.to_string(),
                t.description.clone(),
            ]
        })
        .collect();
    print_table(&["CATEGORY", "TOOL", "WHY"], rows);

    println!("\nMetrics:");
    let rows = bundle
        .metrics
        .iter()
        .map(|metric| {
            vec![
                metric.metric.to_string(),
                metric.description.to_string(),
                metric.how_to_measure.to_string(),
            ]
        })
        .collect();
    print_table(&["METRIC", "DESCRIPTION", "HOW TO MEASURE"], rows);

    let team = &bundle.team_size;
    println!("\nTeam size ({}):", team.range);
    for rec in team.recommendations.iter().chain(team.xp_tips.iter()) {
        println!("  - {rec}");
    }
}
