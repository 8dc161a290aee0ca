use clap::Parser;
use oracle_price_bot::cli::{Cli, Commands};
use oracle_price_bot::config::Config;
use oracle_price_bot::oracle::AddressBook;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).unwrap_or_default()
    });

    // Initialize telemetry
    oracle_price_bot::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting price bot");
            args.execute(&config).await?;
        }
        Commands::Fetch(args) => {
            args.execute(&config).await?;
        }
        Commands::Price(args) => {
            args.execute(&config).await?;
        }
        Commands::Status => {
            let network = config.chain.network();
            let addresses = AddressBook::for_network(network).with_overrides(&config.chain.addresses);
            println!("oracle-price-bot status");
            println!("  Network: {}", network);
            println!("  RPC: {}", config.chain.rpc_url());
            for (symbol, address) in addresses.entries() {
                println!("  {}: {}", symbol, address);
            }
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
