use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use footballgpt::{
    chat, ui, ApiClient, AssumeYes, ChatController, ClientConfig, Persona, RemoveOutcome,
    SendOutcome,
};

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Root URL of the FootballGPT server.
    #[arg(long, global = true, env = "FOOTBALLGPT_URL")]
    base_url: Option<String>,

    /// Session cookie (name=value) of a logged-in browser session.
    #[arg(long, global = true, env = "FOOTBALLGPT_SESSION", hide_env_values = true)]
    session_cookie: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start an interactive chat session.
    Chat {
        #[arg(long, value_enum, help = "Chatbot persona to start with.")]
        persona: Option<Persona>,
    },
    /// Send a single message and print the reply.
    Ask {
        message: String,
        #[arg(long, value_enum, help = "Chatbot persona for this message.")]
        persona: Option<Persona>,
        #[arg(long, help = "Continue a saved conversation (requires login).")]
        conversation: Option<String>,
    },
    /// Manage saved conversations.
    Conversations {
        #[command(subcommand)]
        action: ConversationCommands,
    },
    /// Show which account the session cookie belongs to.
    Whoami,
    /// End the server session.
    Logout,
}

#[derive(clap::Subcommand, Debug)]
enum ConversationCommands {
    /// List saved conversations.
    List,
    /// Print the messages of a saved conversation.
    Show { id: String },
    /// Delete a saved conversation.
    Delete {
        id: String,
        #[arg(long, short, help = "Do not ask for confirmation.")]
        yes: bool,
    },
}

fn client_config(cli: &Cli, persona: Option<Persona>) -> ClientConfig {
    let mut config = ClientConfig::default();
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    config.session_cookie = cli.session_cookie.clone();
    if let Some(persona) = persona {
        config.persona = persona;
    }
    config
}

/// Controller with the user looked up but no conversation list loaded.
async fn identified(config: &ClientConfig) -> Result<ChatController> {
    let api = ApiClient::new(config).context("Failed to set up the HTTP client")?;
    let controller = ChatController::new(api, config.persona);
    controller.identify().await;
    Ok(controller)
}

async fn require_login(config: &ClientConfig) -> Result<ChatController> {
    let controller = identified(config).await?;
    if !controller.is_authenticated() {
        bail!("Not logged in. Pass --session-cookie or set FOOTBALLGPT_SESSION.");
    }
    Ok(controller)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (server URL, session cookie)
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never mix with the transcript.
    // RUST_LOG overrides the default level (e.g., RUST_LOG=footballgpt=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("footballgpt starting with command: {:?}", cli.command);

    match &cli.command {
        Commands::Chat { persona } => {
            let config = client_config(&cli, *persona);
            let controller = ChatController::connect(&config)
                .await
                .context("Failed to set up the HTTP client")?;
            chat::run_chat(&controller).await?;
        }
        Commands::Ask {
            message,
            persona,
            conversation,
        } => {
            let config = client_config(&cli, *persona);
            let controller = identified(&config).await?;
            if let Some(id) = conversation {
                if !controller.is_authenticated() {
                    bail!("--conversation requires a logged-in session");
                }
                if !controller.open(id).await {
                    bail!("Could not load conversation {}", id);
                }
            }
            let outcome = controller.send(message).await;
            let snapshot = controller.snapshot();
            match outcome {
                SendOutcome::Ignored => bail!("Nothing to send"),
                SendOutcome::Replied | SendOutcome::Failed => {
                    if let Some(reply) = snapshot.messages().last() {
                        println!("{}", reply.content);
                    }
                }
            }
            if snapshot.guest_mode() {
                eprintln!("{}", ui::render_guest_banner());
            }
            if let Some(id) = snapshot.active_conversation() {
                eprintln!("conversation: {}", id);
            }
            if outcome == SendOutcome::Failed {
                bail!("The chat request failed");
            }
        }
        Commands::Conversations { action } => {
            let config = client_config(&cli, None);
            let controller = require_login(&config).await?;
            match action {
                ConversationCommands::List => {
                    if !controller.refresh().await {
                        bail!("Failed to load conversations");
                    }
                    print!("{}", ui::render_conversations(&controller.snapshot()));
                }
                ConversationCommands::Show { id } => {
                    if !controller.open(id).await {
                        bail!("Could not load conversation {}", id);
                    }
                    print!("{}", ui::render_transcript(&controller.snapshot()));
                }
                ConversationCommands::Delete { id, yes } => {
                    let outcome = if *yes {
                        controller.remove(id, &mut AssumeYes).await
                    } else {
                        controller.remove(id, &mut chat::TerminalInput::new()).await
                    };
                    match outcome {
                        RemoveOutcome::Removed => println!("Deleted conversation {}.", id),
                        RemoveOutcome::Declined => println!("Kept conversation {}.", id),
                        RemoveOutcome::Failed => bail!("Could not delete conversation {}", id),
                    }
                }
            }
        }
        Commands::Whoami => {
            let config = client_config(&cli, None);
            let controller = identified(&config).await?;
            println!("{}", ui::render_header(&controller.snapshot()));
        }
        Commands::Logout => {
            let config = client_config(&cli, None);
            let controller = identified(&config).await?;
            if !controller.logout().await {
                bail!("The server did not confirm the logout");
            }
            println!("Logged out.");
        }
    }

    Ok(())
}
