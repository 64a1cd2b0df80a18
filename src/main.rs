use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use seep::config::{ClientConfig, RuntimeConfig, SessionConfig};
use seep::error::{ChatError, StorageError};
use seep::storage::{FileStorage, KEY_BOT_NAME, KEY_SHOPIFY_DOMAIN, KEY_SHOPIFY_TOKEN, SESSION_KEYS, SessionStorage};
use seep::transport::HttpTransport;
use seep::view::TerminalView;
use seep::widget::ChatWidget;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Level, info};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("stdin read failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "seep", about = "Terminal chat widget for the SEEP shop assistant")]
struct Cli {
    /// Server origin; overrides SEEP_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long, env = "SEEP_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive chat; one prompt per line, EOF exits.
    Chat(ChatArgs),
    /// Check that the server answers `GET /health`.
    Ping,
    Session(SessionCommand),
}

#[derive(Args, Debug, Default)]
struct RuntimeArgs {
    #[arg(long, env = "SEEP_BOT_NAME")]
    bot_name: Option<String>,

    #[arg(long, env = "SEEP_SHOP_DOMAIN")]
    shop_domain: Option<String>,

    /// JSON file with `bot_name` / `shopify_domain`; flags take precedence.
    #[arg(long)]
    config_json: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct ChatArgs {
    #[command(flatten)]
    runtime: RuntimeArgs,

    /// Print bot replies at once instead of revealing them.
    #[arg(long, default_value_t = false)]
    no_reveal: bool,
}

#[derive(Args, Debug)]
struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Subcommand, Debug)]
enum SessionSubcommand {
    /// Print the config a chat would resolve to.
    Show(RuntimeArgs),
    /// Store values in the session, as the setup form does.
    Set {
        #[arg(long)]
        bot_name: Option<String>,
        #[arg(long)]
        shop_domain: Option<String>,
        #[arg(long)]
        token: Option<String>,
    },
    /// Forget every stored value.
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let mut client = ClientConfig::from_env();
    if let Some(base_url) = &cli.base_url {
        client = client.with_base_url(base_url);
    }
    let session_path = cli.session_file.unwrap_or_else(seep::storage::default_session_path);

    match cli.command.unwrap_or_else(|| Command::Chat(ChatArgs::default())) {
        Command::Chat(args) => run_chat(&client, session_path, args).await,
        Command::Ping => run_ping(&client).await,
        Command::Session(session) => run_session(session_path, session.command),
    }
}

fn runtime_config(args: RuntimeArgs) -> Result<RuntimeConfig, CliError> {
    let base = match &args.config_json {
        Some(path) => RuntimeConfig::from_file(path)?,
        None => RuntimeConfig::default(),
    };
    Ok(base.merged_with(RuntimeConfig { bot_name: args.bot_name, shopify_domain: args.shop_domain }))
}

async fn run_chat(client: &ClientConfig, session_path: PathBuf, args: ChatArgs) -> Result<(), CliError> {
    let runtime = runtime_config(args.runtime)?;
    let mut storage = FileStorage::open_or_empty(session_path);
    let session = SessionConfig::resolve(&runtime, &mut storage);

    let transport = HttpTransport::new(client)?.with_token(session.auth_token.clone());
    info!(url = transport.chat_url(), bot_name = %session.bot_name, "chat: widget ready");

    let view = TerminalView::new(io::stdout());
    let mut widget = ChatWidget::new(session, view, transport).with_reveal_interval(client.reveal_interval);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        widget.view_mut().set_input(&line);
        widget.on_key("Enter").await;
        if args.no_reveal {
            widget.finish_reveals();
        } else {
            widget.run_reveals().await;
        }
        widget.view_mut().close_line();
    }

    widget.teardown();
    Ok(())
}

async fn run_ping(client: &ClientConfig) -> Result<(), CliError> {
    HttpTransport::new(client)?.ping().await?;
    println!("ok");
    Ok(())
}

fn run_session(session_path: PathBuf, command: SessionSubcommand) -> Result<(), CliError> {
    let mut storage = FileStorage::open(session_path)?;
    match command {
        SessionSubcommand::Show(args) => {
            let runtime = runtime_config(args)?;
            let session = SessionConfig::resolve(&runtime, &mut storage);
            println!("bot_name:       {}", session.bot_name);
            println!("shopify_domain: {}", session.shop_domain);
            println!("shopify_token:  {}", session.masked_token());
            println!("session_file:   {}", storage.path().display());
        }
        SessionSubcommand::Set { bot_name, shop_domain, token } => {
            if let Some(bot_name) = bot_name {
                storage.set(KEY_BOT_NAME, &bot_name);
            }
            if let Some(shop_domain) = shop_domain {
                storage.set(KEY_SHOPIFY_DOMAIN, &shop_domain);
            }
            if let Some(token) = token.filter(|t| !t.is_empty()) {
                storage.set(KEY_SHOPIFY_TOKEN, &token);
            }
        }
        SessionSubcommand::Reset => {
            for key in SESSION_KEYS {
                storage.remove(key);
            }
        }
    }
    Ok(())
}
