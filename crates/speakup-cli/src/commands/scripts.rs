use anyhow::{Context, Result};
use serde_json::json;
use speakup_application::AppContext;
use speakup_core::content::Script;

use super::Output;

pub async fn scenario(context: &AppContext, out: &Output, id: &str) -> Result<()> {
    let detail = context
        .scenario_detail(id)
        .await
        .with_context(|| format!("Could not load scenario {id}"))?;
    let value = json!({ "scenario": detail.scenario, "scripts": detail.scripts });
    out.emit(&value, |_| {
        println!("{}", detail.scenario.title);
        if !detail.scenario.description.is_empty() {
            println!("{}", detail.scenario.description);
        }
        for script in &detail.scripts {
            println!();
            print_script(script);
        }
    })
}

pub async fn generate(context: &AppContext, out: &Output, situation: &str, tone: &str) -> Result<()> {
    let script = context
        .script_generator()
        .generate(situation, tone)
        .await
        .context("Could not generate a script")?;
    out.emit(&script, |script| {
        println!("{}", script.full_script);
        print_list("Quick reminders", &script.quick_reminders);
        print_list("Tips", &script.tips);
        print_list("Body language", &script.body_language_tips);
        print_list("Avoid", &script.do_not);
    })
}

pub async fn saved(context: &AppContext, out: &Output) -> Result<()> {
    let page = context.saved_scripts();
    page.load().await.context("Could not load saved scripts")?;
    let items = page.view().items();
    out.emit(&items, |items| {
        if items.is_empty() {
            println!("No saved scripts.");
        }
        for script in items {
            print_script(script);
            println!();
        }
    })
}

pub async fn save(context: &AppContext, id: &str) -> Result<()> {
    context
        .saved_scripts()
        .save(id)
        .await
        .with_context(|| format!("Could not save script {id}"))?;
    println!("Saved script {id}");
    Ok(())
}

pub async fn unsave(context: &AppContext, id: &str) -> Result<()> {
    let page = context.saved_scripts();
    page.load().await.context("Could not load saved scripts")?;
    page.unsave(id)
        .await
        .with_context(|| format!("Could not remove script {id}"))?;
    println!("Removed script {id}");
    Ok(())
}

pub async fn tools(context: &AppContext, out: &Output) -> Result<()> {
    let summary = context.tools().summary().await;
    out.emit(&summary, |summary| {
        println!("Phrases:      {}", summary.total_phrases);
        println!("Affirmations: {}", summary.total_affirmations);
        println!("Scripts:      {}", summary.total_scripts);
    })
}

fn print_script(script: &Script) {
    println!("[{}] {} ({})", script.id, script.display_title(), script.tone);
    for line in [&script.opening_line, &script.body_script, &script.closing_line] {
        if !line.is_empty() {
            println!("    {line}");
        }
    }
}

fn print_list(heading: &str, entries: &[String]) {
    if entries.is_empty() {
        return;
    }
    println!("\n{heading}:");
    for entry in entries {
        println!("  - {entry}");
    }
}
