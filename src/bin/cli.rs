use clap::{Parser, Subcommand};
use std::path::PathBuf;

use recipe_search_engine::{EngineConfig, RecipeEngine, ScoringPolicy};

#[derive(Parser)]
#[command(name = "recipe-search-cli")]
#[command(about = "Recipe Search Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Recipes CSV path
    #[arg(short, long, default_value = "RAW_recipes.csv")]
    recipes: PathBuf,

    /// Interactions CSV path (ratings)
    #[arg(short, long)]
    interactions: Option<PathBuf>,

    /// Scoring policy: quality-gated or weighted-fuzzy
    #[arg(short, long, default_value = "quality-gated")]
    policy: ScoringPolicy,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for recipes
    Search {
        /// Search query
        query: String,

        /// Maximum results
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Show computed scores
        #[arg(long)]
        scores: bool,
    },

    /// Get catalog statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let limit = match &cli.command {
        Commands::Search { limit, .. } => *limit,
        Commands::Stats => EngineConfig::default().max_results,
    };
    let config = EngineConfig {
        recipes_path: cli.recipes,
        interactions_path: cli.interactions,
        policy: cli.policy,
        max_results: limit,
    };

    let engine = RecipeEngine::from_config(&config)?;

    match cli.command {
        Commands::Search { query, scores, .. } => {
            println!("🔍 Searching for: {} ({})", query, engine.policy_name());

            if scores {
                let ranked = engine.search_scored(&query);
                println!("\n✅ Found {} recipes", ranked.len());
                for (i, candidate) in ranked.iter().enumerate() {
                    println!(
                        "   {:>2}. [{:>8.2}] {} (#{})",
                        i + 1,
                        candidate.score,
                        candidate.recipe.display_name(),
                        candidate.recipe.id
                    );
                }
            } else {
                let response = engine.search(&query);
                println!("\n✅ Found {} recipes", response.count);
                for (i, recipe) in response.recipes.iter().enumerate() {
                    println!("   {:>2}. {} (#{}, {} min)", i + 1, recipe.display_name(), recipe.id, recipe.minutes);
                }
            }
        }

        Commands::Stats => {
            let stats = engine.stats();

            println!("📊 Catalog Statistics ({}):", engine.policy_name());
            println!("   Total recipes: {}", stats.total_recipes);
            println!("   Qualifying recipes: {}", stats.recipes_with_rating);
            println!("   Qualifying share: {:.1}%", stats.qualifying_ratio() * 100.0);
            println!("   Loaded at: {}", engine.catalog().loaded_at().format("%Y-%m-%d %H:%M:%S"));
        }
    }

    Ok(())
}
