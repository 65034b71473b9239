use anyhow::Result;
use clap::{Parser, Subcommand};
use speakup_application::AppContext;
use speakup_infrastructure::{ConfigService, SpeakupPaths};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "speakup")]
#[command(about = "SpeakUp CLI - rehearse assertive conversations from the terminal", long_about = None)]
struct Cli {
    /// Directory holding config.toml and session.toml
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Print raw JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in with it
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Browse practice scenarios
    Scenarios(commands::browse::ListArgs),
    /// One scenario with its scripts
    Scenario { id: String },
    /// Community stories
    Stories {
        #[command(subcommand)]
        action: StoriesAction,
    },
    /// Quick tips
    Tips {
        #[command(subcommand)]
        action: TipsAction,
    },
    /// Generate a script for a situation
    Generate {
        situation: String,
        /// calm, friendly or firm
        #[arg(long, default_value = "calm")]
        tone: String,
    },
    /// Saved scripts of the signed-in user
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
    /// Counts of the practice tools
    Tools,
    /// Show or change config.toml
    Config(commands::config::ConfigArgs),
}

#[derive(Subcommand)]
enum StoriesAction {
    /// List stories with community stats
    List(commands::browse::ListArgs),
    /// Toggle your like on a story
    Like { id: String },
    /// Share a story
    Share(commands::browse::ShareArgs),
}

#[derive(Subcommand)]
enum TipsAction {
    /// List tips
    List(commands::browse::ListArgs),
    /// Toggle your like on a tip
    Like { id: String },
}

#[derive(Subcommand)]
enum SavedAction {
    /// List saved scripts
    List,
    /// Save a script
    Add { id: String },
    /// Remove a saved script
    Remove { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = SpeakupPaths::new(cli.config_dir.clone());
    let config = ConfigService::new(&paths)?.get_config()?;
    init_tracing(&config.log_level);

    // Runs before the client is built so a bad api_url can still be fixed.
    if let Commands::Config(args) = &cli.command {
        return commands::config::run(&paths, args);
    }

    let context = AppContext::bootstrap(&paths)?;

    context.session().initialize().await;
    let out = commands::Output::new(cli.json);

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&context, &out, &email, &password).await?
        }
        Commands::Register {
            name,
            email,
            password,
        } => commands::auth::register(&context, &out, &name, &email, &password).await?,
        Commands::Logout => commands::auth::logout(&context).await,
        Commands::Whoami => commands::auth::whoami(&context, &out)?,
        Commands::Scenarios(args) => commands::browse::scenarios(&context, &out, &args).await?,
        Commands::Scenario { id } => commands::scripts::scenario(&context, &out, &id).await?,
        Commands::Stories { action } => match action {
            StoriesAction::List(args) => commands::browse::stories(&context, &out, &args).await?,
            StoriesAction::Like { id } => commands::browse::like_story(&context, &out, &id).await?,
            StoriesAction::Share(args) => commands::browse::share(&context, &out, args).await?,
        },
        Commands::Tips { action } => match action {
            TipsAction::List(args) => commands::browse::tips(&context, &out, &args).await?,
            TipsAction::Like { id } => commands::browse::like_tip(&context, &out, &id).await?,
        },
        Commands::Generate { situation, tone } => {
            commands::scripts::generate(&context, &out, &situation, &tone).await?
        }
        Commands::Saved { action } => match action {
            SavedAction::List => commands::scripts::saved(&context, &out).await?,
            SavedAction::Add { id } => commands::scripts::save(&context, &id).await?,
            SavedAction::Remove { id } => commands::scripts::unsave(&context, &id).await?,
        },
        Commands::Tools => commands::scripts::tools(&context, &out).await?,
        Commands::Config(_) => {}
    }

    Ok(())
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
