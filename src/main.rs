use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;

use meteorite_bot::application::errors::BotError;
use meteorite_bot::application::messaging::MessageDispatcher;
use meteorite_bot::application::services::MessageService;
use meteorite_bot::build_dispatcher;
use meteorite_bot::domain::traits::Bot;
use meteorite_bot::infrastructure::adapters::{ConsoleAdapter, TelegramAdapter};
use meteorite_bot::infrastructure::config::Config;
use meteorite_bot::runner;

#[derive(Parser)]
#[command(name = "meteorite-bot")]
#[command(about = "Telegram bot with Ozon seller prices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Path to the .env file
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Bot token (overrides config and TG_TOKEN)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Telegram bot (default)
    Run,
    /// Answer commands typed on stdin, without Telegram
    Console,
    /// Show version
    Version,
    /// Print the default config
    InitConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => match load_config(&cli.config, &cli.env_file, cli.token) {
            Ok(config) => run_bot(config).await,
            Err(e) => Err(e),
        },
        Commands::Console => match load_config(&cli.config, &cli.env_file, None) {
            Ok(config) => run_console(config).await,
            Err(e) => Err(e),
        },
        Commands::Version => {
            println!("meteorite-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Defaults, then config file, then `.env` / environment, then `--token`
fn load_config(path: &str, env_file: &str, token_override: Option<String>) -> Result<Config, BotError> {
    if let Err(e) = dotenvy::from_filename(env_file) {
        tracing::debug!("Could not load env file ({}): {}", env_file, e);
    }

    let mut config = if std::path::Path::new(path).exists() {
        tracing::info!("Loading config from {}", path);
        Config::load(path)?
    } else {
        Config::default()
    };
    config.apply_env()?;

    if let Some(token) = token_override {
        config.telegram.token = Some(token);
    }

    Ok(config)
}

async fn run_bot(config: Config) -> Result<(), BotError> {
    let token = config.require_token()?.to_string();

    tracing::info!("Starting {}", config.bot.name);

    let dispatcher = build_dispatcher(&config)?;

    let mut bot = TelegramAdapter::new(token, config.telegram.poll_timeout_secs)?;
    if let Some(url) = &config.telegram.api_url {
        bot = bot.with_api_base(url.as_str());
    }

    bot.start().await?;
    bot.fetch_bot_info().await?;

    // Register bot commands with Telegram
    if let Err(e) = bot.register_commands(&dispatcher.commands().menu()).await {
        tracing::warn!("Failed to register commands: {}", e);
    }

    let info = bot.bot_info();
    tracing::info!("Bot started: @{}", info.username);

    let dispatcher = dispatcher.with_bot_username(info.username);
    let service = Arc::new(MessageService::new(bot, dispatcher));

    runner::run_polling(service, config.telegram.poll_timeout_secs).await;
    Ok(())
}

async fn run_console(config: Config) -> Result<(), BotError> {
    let dispatcher: MessageDispatcher = build_dispatcher(&config)?;
    let service = MessageService::new(ConsoleAdapter::new(), dispatcher);

    service.bot().start().await?;
    println!("Type /start, /ping or /prices (Ctrl+D to exit)");

    while let Some(input) = service.bot().read_line().await? {
        if input.is_empty() {
            continue;
        }
        if let Err(e) = service.process("console", &input, None).await {
            tracing::error!("Failed to handle input: {}", e);
        }
    }

    Ok(())
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("# Save this to config.yaml and adjust as needed.");
    println!("# TG_TOKEN, OZON_CLIENT_ID, OZON_API_KEY and ADMIN_IDS in .env override it.");
    Ok(())
}
