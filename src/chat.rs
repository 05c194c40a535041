// Interactive chat session on the terminal.
//
// Plain lines are sent as chat messages; lines starting with '/' are commands.
// A leading '//' sends the rest of the line, starting with a single '/'.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

use crate::confirm::{is_affirmative, Confirm};
use crate::controller::ChatController;
use crate::conversations::RemoveOutcome;
use crate::dispatcher::SendOutcome;
use crate::persona::Persona;
use crate::session::SessionState;
use crate::ui;

const HELP: &str = "\
Commands:
  /new              start a new chat
  /list             show your saved conversations
  /open <id|#n>     load a saved conversation
  /delete <id|#n>   delete a saved conversation
  /persona [tag]    show or change the chatbot persona
  /whoami           show who you are logged in as
  /logout           end the server session
  /help             show this help
  /quit             leave (Ctrl+D works too)
  //text            send a message that starts with /
Anything else is sent as a message.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    New,
    List,
    Open(String),
    Delete(String),
    Persona(Option<String>),
    WhoAmI,
    Logout,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if let Some(escaped) = line.strip_prefix("//") {
        return Command::Send(format!("/{}", escaped));
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Send(line.to_string());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let arg = (!arg.is_empty()).then(|| arg.to_string());

    match (name.to_ascii_lowercase().as_str(), arg) {
        ("new", None) => Command::New,
        ("list", None) => Command::List,
        ("open", Some(target)) => Command::Open(target),
        ("delete" | "rm", Some(target)) => Command::Delete(target),
        ("persona", arg) => Command::Persona(arg),
        ("whoami", None) => Command::WhoAmI,
        ("logout", None) => Command::Logout,
        ("help" | "?", None) => Command::Help,
        ("quit" | "exit" | "q", None) => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

/// Accepts either a conversation id or `#n`, the position in the last
/// listing.
pub fn resolve_conversation(state: &SessionState, target: &str) -> Option<String> {
    match target.strip_prefix('#') {
        Some(index) => {
            let index: usize = index.parse().ok()?;
            state
                .conversations()
                .get(index.checked_sub(1)?)
                .map(|conversation| conversation.id.clone())
        }
        None => Some(target.to_string()),
    }
}

/// Line reader over stdin. Also answers confirmation prompts, so commands
/// and confirmations come from the same stream.
pub struct TerminalInput {
    lines: Lines<BufReader<Stdin>>,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// `None` at end of input.
    pub async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        std::io::stdout().flush().context("Failed to flush stdout")?;
        self.lines.next_line().await.context("Failed to read from stdin")
    }
}

impl Default for TerminalInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Confirm for TerminalInput {
    async fn confirm(&mut self, prompt: &str) -> bool {
        match self.read_line(&format!("{} [y/N] ", prompt)).await {
            Ok(Some(answer)) => is_affirmative(&answer),
            _ => false,
        }
    }
}

fn print_messages_from(controller: &ChatController, from: usize) {
    let snapshot = controller.snapshot();
    for message in snapshot.messages().iter().skip(from) {
        print!("{}", ui::render_message(message));
    }
}

/// Runs the interactive session until `/quit` or end of input.
pub async fn run_chat(controller: &ChatController) -> Result<()> {
    let mut input = TerminalInput::new();

    let snapshot = controller.snapshot();
    println!("{}", ui::render_header(&snapshot));
    if !snapshot.is_authenticated() {
        println!("{}", ui::render_guest_banner());
    }
    println!("Persona: {}", snapshot.persona().label());
    print!("{}", ui::render_transcript(&snapshot));
    println!("Type /help for commands.");
    let mut guest_banner_shown = !snapshot.is_authenticated();

    while let Some(line) = input.read_line("> ").await? {
        match parse_command(&line) {
            Command::Send(text) => {
                if text.is_empty() {
                    continue;
                }
                let before = controller.snapshot().messages().len();
                controller.set_input(text);
                println!("...");
                match controller.submit().await {
                    // The user's own line is already on screen.
                    SendOutcome::Replied | SendOutcome::Failed => {
                        print_messages_from(controller, before + 1)
                    }
                    SendOutcome::Ignored => {}
                }
                if !guest_banner_shown && controller.snapshot().guest_mode() {
                    println!("{}", ui::render_guest_banner());
                    guest_banner_shown = true;
                }
            }
            Command::New => {
                controller.start_new();
                print!("{}", ui::render_transcript(&controller.snapshot()));
            }
            Command::List => {
                controller.refresh().await;
                print!("{}", ui::render_conversations(&controller.snapshot()));
            }
            Command::Open(target) => {
                let Some(id) = resolve_conversation(&controller.snapshot(), &target) else {
                    println!("No conversation {} in the last listing.", target);
                    continue;
                };
                if controller.open(&id).await {
                    print!("{}", ui::render_transcript(&controller.snapshot()));
                } else {
                    println!("Could not load conversation {}.", id);
                }
            }
            Command::Delete(target) => {
                let Some(id) = resolve_conversation(&controller.snapshot(), &target) else {
                    println!("No conversation {} in the last listing.", target);
                    continue;
                };
                match controller.remove(&id, &mut input).await {
                    RemoveOutcome::Removed => println!("Deleted conversation {}.", id),
                    RemoveOutcome::Declined => println!("Kept conversation {}.", id),
                    RemoveOutcome::Failed => println!("Could not delete conversation {}.", id),
                }
            }
            Command::Persona(None) => print!("{}", ui::render_personas(controller.persona())),
            Command::Persona(Some(tag)) => match tag.parse::<Persona>() {
                Ok(persona) => {
                    controller.select_persona(persona);
                    println!("Persona: {}", persona.label());
                }
                Err(e) => println!("{}", e),
            },
            Command::WhoAmI => println!("{}", ui::render_header(&controller.snapshot())),
            Command::Logout => {
                if !controller.logout().await {
                    println!("The server did not confirm the logout.");
                }
                println!("Logged out. Continuing as guest.");
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
            Command::Unknown(line) => println!("Unknown command: {} (try /help)", line),
        }
    }

    info!("Chat session ended");
    Ok(())
}
