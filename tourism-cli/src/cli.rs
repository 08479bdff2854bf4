use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, InquireError, Text};
use tourism_core::{Config, ProviderConfig, ProviderId, TourismAgent};

const GOODBYE: &str = "Thank you for using the Tourism System. Goodbye!";
const EXIT_WORDS: &[&str] = &["quit", "exit", "q"];

/// Queries run by `tourism demo`.
const DEMO_QUERIES: &[&str] = &[
    "I'm going to go to Bangalore, let's plan my trip.",
    "I'm going to go to Bangalore, what is the temperature there",
    "I'm going to go to Bangalore, what is the temperature there? And what are the places I can visit?",
];

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "tourism",
    version,
    about = "Ask about the weather and attractions of any place"
)]
pub struct Cli {
    /// Show pipeline diagnostics on stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer a single free-text query.
    Ask {
        /// The query, e.g. "I'm going to Bangalore, what's the temperature there?"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Interactive session; type `quit` to leave.
    Chat,

    /// Run the built-in example queries.
    Demo,

    /// Override the endpoint or timeout of a provider.
    Configure {
        /// Provider short name: "nominatim", "open-meteo" or "overpass".
        provider: Option<String>,

        /// Print the config file location and effective settings.
        #[arg(long)]
        show: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Ask { query } => {
                let query = query.join(" ");
                if query.trim().is_empty() {
                    println!("Please enter a query.");
                    return Ok(());
                }

                let agent = TourismAgent::from_config(&config)?;
                println!("{}", agent.process_request(&query).await);
            }
            Command::Chat => chat(&TourismAgent::from_config(&config)?).await?,
            Command::Demo => demo(&TourismAgent::from_config(&config)?).await,
            Command::Configure { provider: Some(provider), show: false } => {
                configure(config, ProviderId::try_from(provider.as_str())?)?;
            }
            Command::Configure { .. } => show_config(&config)?,
        }

        Ok(())
    }
}

async fn chat(agent: &TourismAgent) -> anyhow::Result<()> {
    println!("Enter a place you want to visit. Type 'quit' or 'exit' to stop.\n");

    loop {
        let input = match Text::new("You:").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                println!("\n{GOODBYE}");
                return Ok(());
            }
            Err(err) => return Err(err).context("Failed to read query"),
        };

        let input = input.trim();
        if EXIT_WORDS.contains(&input.to_lowercase().as_str()) {
            println!("\n{GOODBYE}");
            return Ok(());
        }

        if input.is_empty() {
            println!("Please enter a valid query.");
            continue;
        }

        println!("\nAgent: {}\n", agent.process_request(input).await);
    }
}

async fn demo(agent: &TourismAgent) {
    for (i, query) in DEMO_QUERIES.iter().enumerate() {
        println!("Example {}:", i + 1);
        println!("Input: {query}");
        println!("Output:\n{}", agent.process_request(query).await);
        println!("\n{}\n", "-".repeat(60));
    }
}

fn configure(mut config: Config, id: ProviderId) -> anyhow::Result<()> {
    let base_url = Text::new(&format!("{id} endpoint:"))
        .with_default(config.base_url(id))
        .prompt()
        .context("Failed to read endpoint")?;

    let timeout_secs = CustomType::<u64>::new(&format!("{id} timeout (seconds):"))
        .with_default(config.timeout(id).as_secs())
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Failed to read timeout")?;

    let provider = ProviderConfig {
        base_url: (base_url != id.default_base_url()).then_some(base_url),
        timeout_secs: (timeout_secs != id.default_timeout().as_secs()).then_some(timeout_secs),
    };
    config.upsert_provider(id, provider);
    config.save()?;

    println!("Saved {id} settings to {}", Config::config_file_path()?.display());
    Ok(())
}

fn show_config(config: &Config) -> anyhow::Result<()> {
    println!("Config file: {}", Config::config_file_path()?.display());
    println!("User agent: {}", config.user_agent());
    println!("Places per reply: {}", config.places_limit());

    for id in ProviderId::all() {
        println!(
            "{id}: {} (timeout {}s)",
            config.base_url(*id),
            config.timeout(*id).as_secs()
        );
    }

    Ok(())
}
