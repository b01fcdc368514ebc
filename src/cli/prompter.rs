//! Interactive prompts: credentials, expertise selection and the skill chat loop.

use inquire::{Confirm, InquireError, Password, Select, Text};

use super::commands::{ChatCommand, CommandParser};
use super::render;
use crate::chat::SkillAssistant;
use crate::config::AppConfig;
use crate::session::{ExpertiseLevel, SessionController};

const TRANSCRIPT_TAIL: usize = 10;

/// True for Esc / Ctrl-C, which end a prompt without being an error
fn is_cancel(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

pub fn prompt_password(confirm: bool) -> anyhow::Result<String> {
    let prompt = Password::new("Password:");
    let prompt = if confirm {
        prompt.with_custom_confirmation_message("Confirm password:")
    } else {
        prompt.without_confirmation()
    };
    Ok(prompt.prompt()?)
}

pub fn prompt_text(label: &str) -> anyhow::Result<String> {
    Ok(Text::new(label).prompt()?)
}

pub fn prompt_expertise() -> anyhow::Result<ExpertiseLevel> {
    Ok(Select::new("Expertise level:", ExpertiseLevel::all().to_vec()).prompt()?)
}

pub fn confirm(message: &str) -> anyhow::Result<bool> {
    match Confirm::new(message).with_default(false).prompt() {
        Ok(answer) => Ok(answer),
        Err(e) if is_cancel(&e) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Run the skill chat until the user quits
pub async fn run_chat(controller: &SessionController, config: &AppConfig) -> anyhow::Result<()> {
    let mut assistant = SkillAssistant::new(
        controller,
        config.chat.max_messages,
        config.chat.auto_reanalyze,
    )?;

    let tail: Vec<_> = assistant.transcript().messages().collect();
    for message in tail.iter().skip(tail.len().saturating_sub(TRANSCRIPT_TAIL)) {
        render::print_chat_message(message);
    }
    println!("Tell me what you've been learning. Type /help for commands.");

    loop {
        let line = match Text::new(">").prompt() {
            Ok(line) => line,
            Err(e) if is_cancel(&e) => break,
            Err(e) => return Err(e.into()),
        };
        if line.trim().is_empty() {
            continue;
        }

        if line.trim_start().starts_with('/') {
            match CommandParser::parse_command_line(&line) {
                Some((ChatCommand::Quit, _)) => break,
                Some((command, args)) => run_command(controller, &mut assistant, command, &args),
                None => {
                    for suggestion in CommandParser::get_suggestions(line.trim()) {
                        println!("  {}", suggestion);
                    }
                }
            }
            continue;
        }

        match assistant.send(&line).await {
            Ok(reply) => {
                if let Some(message) = assistant.transcript().last() {
                    render::print_chat_message(message);
                }
                if let Some(task) = reply.reanalysis {
                    println!("Updating your career analysis...");
                    match task.wait().await {
                        Ok(()) => {
                            if let Some(analysis) = controller.store().read(|s| s.analysis.clone()) {
                                render::print_notice(&format!(
                                    "Best match now: {}",
                                    analysis.selected_path.title
                                ));
                            }
                        }
                        Err(e) => render::print_error_banner(&e.to_string()),
                    }
                }
            }
            Err(e) => render::print_error_banner(&e.to_string()),
        }
    }

    Ok(())
}

fn run_command(
    controller: &SessionController,
    assistant: &mut SkillAssistant,
    command: ChatCommand,
    args: &[String],
) {
    match command {
        ChatCommand::Help => {
            for line in ChatCommand::get_command_menu() {
                println!("  {}", line);
            }
        }
        ChatCommand::History => {
            if args.is_empty() {
                for message in assistant.transcript().messages() {
                    render::print_chat_message(message);
                }
            } else {
                let pattern = args.join(" ");
                for message in assistant.transcript().search(&pattern).into_iter().rev() {
                    render::print_chat_message(message);
                }
            }
        }
        ChatCommand::Skills => render::print_skills(&controller.store().snapshot()),
        ChatCommand::Analysis => match controller.store().read(|s| s.analysis.clone()) {
            Some(analysis) => render::print_analysis(&analysis),
            None => println!("No analysis yet."),
        },
        ChatCommand::Clear => {
            assistant.clear_transcript();
            render::print_notice("Conversation cleared");
        }
        ChatCommand::Quit => {}
    }
}
