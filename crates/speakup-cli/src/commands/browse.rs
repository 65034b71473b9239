use anyhow::{Context, Result};
use clap::Args;
use speakup_application::AppContext;
use speakup_application::pages::ContentBoard;
use speakup_core::content::{Entity, Filter, NewStory};

use super::Output;

#[derive(Args)]
pub struct ListArgs {
    /// Only this category ("all" for every category)
    #[arg(long)]
    pub category: Option<String>,
    /// Search term
    #[arg(long)]
    pub search: Option<String>,
}

impl ListArgs {
    fn filter(&self) -> Filter {
        Filter::all()
            .with_category(self.category.as_deref())
            .with_search(self.search.as_deref())
    }
}

#[derive(Args)]
pub struct ShareArgs {
    #[arg(long)]
    pub situation: String,
    /// What you said
    #[arg(long)]
    pub said: String,
    #[arg(long)]
    pub outcome: String,
    #[arg(long, default_value = "")]
    pub feeling: String,
    #[arg(long, default_value = "other")]
    pub category: String,
}

async fn fetch<T: Entity>(board: &ContentBoard<T>, args: &ListArgs) -> Result<Vec<T>> {
    board
        .view()
        .fetch(args.filter())
        .await
        .with_context(|| format!("Could not load {}", T::RESOURCE))?;
    Ok(board.view().items())
}

pub async fn scenarios(context: &AppContext, out: &Output, args: &ListArgs) -> Result<()> {
    let board = context.scenarios();
    let items = fetch(&board, args).await?;
    out.emit(&items, |items| {
        for scenario in items {
            println!("[{}] {} ({})", scenario.id, scenario.title, scenario.category);
            if !scenario.description.is_empty() {
                println!("    {}", scenario.description);
            }
        }
    })
}

pub async fn stories(context: &AppContext, out: &Output, args: &ListArgs) -> Result<()> {
    let page = context.stories();
    let (items, refreshed) = tokio::join!(fetch(page.board(), args), page.refresh_stats());
    let items = items?;
    if !refreshed {
        tracing::debug!("showing stories without fresh stats");
    }
    let stats = page.stats();

    out.emit(&items, |items| {
        println!(
            "{} stories, {} likes, {}% felt empowered",
            stats.total_stories, stats.total_likes, stats.empowered_percentage
        );
        for story in items {
            let heart = if story.has_liked { "♥" } else { "♡" };
            println!("[{}] {} {} {}", story.id, heart, story.likes, story.situation);
            println!("    I said: {}", story.what_i_said);
            println!("    Outcome: {}", story.outcome);
        }
    })
}

pub async fn like_story(context: &AppContext, out: &Output, id: &str) -> Result<()> {
    let page = context.stories();
    page.load().await.context("Could not load stories")?;
    let story = page.toggle_like(id).await.context("Like failed")?;
    out.emit(&story, |story| {
        let verb = if story.has_liked { "Liked" } else { "Unliked" };
        println!("{verb} story {} ({} likes)", story.id, story.likes);
    })
}

pub async fn share(context: &AppContext, out: &Output, args: ShareArgs) -> Result<()> {
    let page = context.stories();
    let draft = NewStory {
        situation: args.situation,
        what_i_said: args.said,
        outcome: args.outcome,
        feeling: args.feeling,
        category: args.category,
    };
    let story = page.share(&draft).await.context("Could not share story")?;
    out.emit(&story, |story| println!("Shared story {}", story.id))
}

pub async fn tips(context: &AppContext, out: &Output, args: &ListArgs) -> Result<()> {
    let board = context.tips();
    let items = fetch(&board, args).await?;
    out.emit(&items, |items| {
        for tip in items {
            println!("[{}] ({} likes) {}", tip.id, tip.likes, tip.content);
        }
    })
}

pub async fn like_tip(context: &AppContext, out: &Output, id: &str) -> Result<()> {
    let board = context.tips();
    board.load().await.context("Could not load tips")?;
    let (tip, _) = board.toggle_like(id).await.context("Like failed")?;
    out.emit(&tip, |tip| {
        let verb = if tip.has_liked { "Liked" } else { "Unliked" };
        println!("{verb} tip {} ({} likes)", tip.id, tip.likes);
    })
}
