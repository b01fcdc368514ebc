//! Command-line front end (clap derive)
//!
//! ## Module Structure
//!
//! - `commands` - slash commands inside the chat
//! - `prompter` - interactive prompts and the chat loop
//! - `render` - styled terminal output

pub mod commands;
pub mod prompter;
pub mod render;

pub use commands::{ChatCommand, CommandParser};

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::warn;

use crate::api::{CareerApi, HttpCareerApi, UserUpdate};
use crate::config::AppConfig;
use crate::session::{ExpertiseLevel, RegistrationForm, SessionController, SessionStore};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

#[derive(Parser)]
#[command(name = "skillpath", about = "Career guidance from your terminal", version)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the service base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Keep the token and chat in memory only
    #[arg(long, global = true)]
    pub no_persist: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the service is up
    Health,
    /// Career paths, roadmap and courses for your skills
    Analyze {
        /// Comma-separated skills (defaults to your profile)
        #[arg(short, long)]
        skills: Option<String>,
        /// Beginner, Intermediate, Advanced or Expert
        #[arg(short, long)]
        expertise: Option<ExpertiseLevel>,
    },
    /// Generate a mock interview test
    MockTest {
        #[arg(short, long)]
        topic: Option<String>,
        #[arg(short, long)]
        skills: Option<String>,
        #[arg(short, long)]
        expertise: Option<ExpertiseLevel>,
        /// Print the answers too
        #[arg(long)]
        answers: bool,
    },
    /// Learning resources (videos and articles)
    Resources {
        #[arg(short, long)]
        limit: Option<u32>,
        #[arg(short, long)]
        topic: Option<String>,
        #[arg(short, long)]
        skills: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        skills: Option<String>,
        #[arg(long)]
        expertise: Option<ExpertiseLevel>,
    },
    /// Sign in
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Show the signed-in profile
    Whoami,
    /// Update the signed-in profile
    Profile {
        #[arg(long)]
        skills: Option<String>,
        #[arg(long)]
        expertise: Option<ExpertiseLevel>,
        #[arg(long)]
        full_name: Option<String>,
    },
    /// Sign out
    Logout,
    /// Sign out and forget the chat history
    ClearData {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Tell the assistant what you learned; skills update as you go
    Chat,
    /// Show the effective configuration
    Config,
}

/// Apply CLI overrides on top of the loaded configuration
pub fn apply_overrides(cli: &Cli, config: &mut AppConfig) {
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<ExitCode> {
    if let Commands::Config = cli.command {
        for line in config.summary() {
            println!("{}", line);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let api: Arc<dyn CareerApi> =
        Arc::new(HttpCareerApi::with_timeout(&config.api.base_url, config.timeout())?);
    let storage: Arc<dyn KeyValueStore> = if cli.no_persist {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileStore::open(config.storage_path())?)
    };
    let controller = SessionController::new(SessionStore::new(), api, storage);

    if needs_session(&cli.command) {
        if let Err(e) = controller.hydrate().await {
            warn!("could not restore session: {}", e);
            controller.store().dismiss_error();
        }
    }

    execute(cli.command, &controller, &config).await?;

    match controller.store().read(|s| s.last_error.clone()) {
        Some(message) => {
            render::print_error_banner(&message);
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::SUCCESS),
    }
}

fn needs_session(command: &Commands) -> bool {
    !matches!(
        command,
        Commands::Health | Commands::Logout | Commands::ClearData { .. } | Commands::Config
    )
}

async fn execute(command: Commands, controller: &SessionController, config: &AppConfig) -> anyhow::Result<()> {
    let store = controller.store();

    match command {
        Commands::Health => match controller.health().await {
            Ok(health) => render::print_health(&health),
            Err(e) => store.fail_request(e.to_string()),
        },
        Commands::Analyze { skills, expertise } => {
            let result = if skills.is_some() || expertise.is_some() {
                let (current_skills, current_level) =
                    store.read(|s| (s.skills.clone(), s.expertise_level));
                controller
                    .reanalyze(
                        skills.unwrap_or(current_skills),
                        expertise.unwrap_or(current_level),
                    )
                    .await
            } else {
                controller.analyze().await
            };
            if result.is_ok() {
                if let Some(analysis) = store.read(|s| s.analysis.clone()) {
                    render::print_analysis(&analysis);
                }
            }
        }
        Commands::MockTest {
            topic,
            skills,
            expertise,
            answers,
        } => {
            apply_inputs(controller, skills, expertise);
            if controller.generate_mock_test(topic).await.is_ok() {
                if let Some(test) = store.read(|s| s.mock_test.clone()) {
                    render::print_mock_test(&test, answers);
                }
            }
        }
        Commands::Resources {
            limit,
            topic,
            skills,
        } => {
            apply_inputs(controller, skills, None);
            let limit = limit.unwrap_or(config.resources.default_limit);
            if controller.fetch_resources(limit, topic).await.is_ok() {
                if let Some(resources) = store.read(|s| s.resources.clone()) {
                    render::print_resources(&resources);
                }
            }
        }
        Commands::Register {
            email,
            full_name,
            skills,
            expertise,
        } => {
            let form = RegistrationForm {
                email: or_prompt(email, "Email:")?,
                full_name: or_prompt(full_name, "Full name:")?,
                skills: or_prompt(skills, "Skills (comma-separated):")?,
                expertise: match expertise {
                    Some(level) => level,
                    None => prompter::prompt_expertise()?,
                },
                password: prompter::prompt_password(true)?,
            };
            if let Ok(user) = controller.register(form).await {
                render::print_notice(&format!("Welcome, {}!", user.full_name));
            }
        }
        Commands::Login { email } => {
            let email = or_prompt(email, "Email:")?;
            let password = prompter::prompt_password(false)?;
            if let Ok(user) = controller.login(&email, &password).await {
                render::print_notice(&format!("Signed in as {}", user.email));
            }
        }
        Commands::Whoami => match store.read(|s| s.current_user.clone()) {
            Some(user) => render::print_profile(&user),
            None => println!("Not signed in."),
        },
        Commands::Profile {
            skills,
            expertise,
            full_name,
        } => {
            let update = UserUpdate {
                full_name,
                skills,
                expertise,
            };
            if let Ok(user) = controller.update_profile(update).await {
                render::print_profile(&user);
            }
        }
        Commands::Logout => {
            controller.logout();
            render::print_notice("Signed out");
        }
        Commands::ClearData { yes } => {
            if yes || prompter::confirm("Remove your sign-in and chat history?")? {
                controller.clear_data();
                render::print_notice("All local data cleared");
            }
        }
        Commands::Chat => prompter::run_chat(controller, config).await?,
        Commands::Config => {}
    }

    Ok(())
}

/// Command-line values override whatever the profile supplied
fn apply_inputs(controller: &SessionController, skills: Option<String>, expertise: Option<ExpertiseLevel>) {
    if let Some(skills) = skills {
        controller.store().set_skills(skills);
    }
    if let Some(level) = expertise {
        controller.store().set_expertise(level);
    }
}

fn or_prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => prompter::prompt_text(label),
    }
}
