use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use mindstack_core::TaskQueue;

mod auth;
mod board;
mod config;
mod llm;
mod pipeline;
mod resolver;
mod speech;
mod state;

#[derive(Parser, Debug)]
#[command(name = "mindstack", version, about = "Voice-commanded task stack")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Push a task (stack by default, --backlog for the holding area)
    Push {
        description: String,

        /// 0-10, higher is more urgent
        #[arg(long, default_value_t = 0)]
        priority: i32,

        #[arg(long)]
        backlog: bool,
    },

    /// Pop the topmost task (stack by default)
    Pop {
        #[arg(long)]
        backlog: bool,
    },

    /// Empty one tier
    Clear {
        #[arg(value_enum)]
        tier: Tier,
    },

    /// Print both tiers
    Show,

    /// Run a command phrase through the intent resolver, no microphone
    Say { transcript: String },

    /// Record (or reuse a WAV), transcribe, then resolve and execute
    Listen {
        /// Skip recording and transcribe this file instead
        #[arg(long)]
        wav: Option<PathBuf>,
    },

    /// Interactive full-screen board
    Board,

    /// Store intent-resolver credentials
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// Manage ~/.mindstack/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Tier {
    Stack,
    Backlog,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Prompt for an Anthropic token and store it
    PasteAnthropicToken,

    /// Prompt for an OpenAI API key and store it
    PasteOpenaiApiKey,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    match cli.command {
        Command::Push {
            description,
            priority,
            backlog,
        } => {
            let mut queue = state::load_queue(cfg.stack.capacity)?;
            if backlog {
                queue.push_backlog(&description, priority);
            } else {
                queue.push_active(&description, priority);
            }
            print_queue(&queue, cfg.stack.display_window);
        }

        Command::Pop { backlog } => {
            let mut queue = state::load_queue(cfg.stack.capacity)?;
            if backlog {
                queue.pop_backlog();
            } else {
                queue.pop_active();
            }
            print_queue(&queue, cfg.stack.display_window);
        }

        Command::Clear { tier } => {
            let mut queue = state::load_queue(cfg.stack.capacity)?;
            match tier {
                Tier::Stack => queue.clear_active(),
                Tier::Backlog => queue.clear_backlog(),
            }
            print_queue(&queue, cfg.stack.display_window);
        }

        Command::Show => {
            let queue = state::load_queue(cfg.stack.capacity)?;
            print_queue(&queue, cfg.stack.display_window);
        }

        Command::Say { transcript } => {
            let mut queue = state::load_queue(cfg.stack.capacity)?;
            run_pipeline(&mut queue, &cfg, &transcript)?;
            print_queue(&queue, cfg.stack.display_window);
        }

        Command::Listen { wav } => {
            let transcript = match wav {
                Some(path) => speech::transcribe_wav(&path, &cfg.speech.whisper_model)?,
                None => speech::capture_transcript(&cfg.speech)?,
            };
            println!("Heard: \u{201c}{transcript}\u{201d}");

            let mut queue = state::load_queue(cfg.stack.capacity)?;
            run_pipeline(&mut queue, &cfg, &transcript)?;
            print_queue(&queue, cfg.stack.display_window);
        }

        Command::Board => {
            let mut queue = state::load_queue(cfg.stack.capacity)?;
            board::run_board(&mut queue, &cfg)?;
        }

        Command::Auth { command } => match command {
            AuthCommand::PasteAnthropicToken => auth::anthropic_paste_token()?,
            AuthCommand::PasteOpenaiApiKey => auth::openai_paste_api_key()?,
        },

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
        },
    }

    Ok(())
}

fn run_pipeline(queue: &mut TaskQueue, cfg: &config::Config, transcript: &str) -> Result<()> {
    let Some(llm_cfg) = llm::resolve_config(cfg)? else {
        bail!(
            "no intent-resolver credentials; run: mindstack auth paste-anthropic-token \
(or paste-openai-api-key)"
        );
    };

    let outcome = pipeline::run_transcript(queue, &llm_cfg, transcript)?;
    if outcome.executed {
        println!("{}", outcome.acknowledgement);
    } else {
        println!("Didn't catch an action: {}", outcome.acknowledgement);
    }
    Ok(())
}

fn print_queue(queue: &TaskQueue, window: usize) {
    println!("Stack ({}/{}):", queue.active().len(), queue.capacity());
    if queue.active().is_empty() {
        println!("  (empty)");
    }
    for t in queue.active_window(window) {
        println!("  [{:>2}] {}", t.priority, t.description);
    }

    println!("Backlog ({}):", queue.backlog().len());
    if queue.backlog().is_empty() {
        println!("  (empty)");
    }
    for t in queue.backlog() {
        println!("  [{:>2}] {}", t.priority, t.description);
    }
}
