mod collect;
mod normalize;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pazar_scraper::BrowserKind;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pazar")]
#[command(about = "Product catalog scraper for Turkish grocery marketplaces")]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape a category (and its whole subtree) from one marketplace
    Run {
        /// Category name as written in the category tree
        category: String,

        /// Marketplace id or alias from the selector profiles
        marketplace: String,

        /// Browser to drive through WebDriver
        #[arg(value_enum)]
        browser: BrowserArg,

        /// Optional subcategory path beneath the category
        subcategory: Vec<String>,
    },
    /// Derive quantity, unit and description sections for a scraped CSV
    Normalize {
        /// CSV written by `pazar run`
        input: PathBuf,

        /// Destination file (default: `<input>_updated.csv`)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Section keyword to split descriptions on; repeatable
        #[arg(long = "keyword", short = 'k')]
        keywords: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BrowserArg {
    Chrome,
    Firefox,
    Edge,
}

impl From<BrowserArg> for BrowserKind {
    fn from(arg: BrowserArg) -> Self {
        match arg {
            BrowserArg::Chrome => BrowserKind::Chrome,
            BrowserArg::Firefox => BrowserKind::Firefox,
            BrowserArg::Edge => BrowserKind::Edge,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = pazar_core::load_app_config()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Run {
            category,
            marketplace,
            browser,
            subcategory,
        } => {
            let request = collect::RunRequest {
                category: &category,
                marketplace: &marketplace,
                browser: browser.into(),
                subcategory: &subcategory,
            };
            collect::run_scrape(&config, &request).await?;
        }
        Commands::Normalize {
            input,
            output,
            keywords,
        } => normalize::run_normalize(&input, output.as_deref(), &keywords)?,
    }

    Ok(())
}
