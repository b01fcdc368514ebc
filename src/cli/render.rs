//! Terminal rendering of session data.

use crossterm::style::Stylize;

use crate::api::HealthStatus;
use crate::chat::{ChatMessage, Sender};
use crate::session::{AnalysisResult, CareerPath, LearningResources, MockTest, SessionState, UserProfile};

const WRAP_WIDTH: usize = 88;

/// Wrap text on word boundaries to at most `max_width` characters per line
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let mut wrapped = Vec::new();
    for line in text.lines() {
        let mut current = String::new();
        for word in line.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_width && !current.is_empty() {
                wrapped.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        wrapped.push(current);
    }
    wrapped
}

fn print_wrapped(text: &str, indent: &str) {
    for line in wrap_text(text, WRAP_WIDTH.saturating_sub(indent.len())) {
        println!("{}{}", indent, line);
    }
}

fn career_path_lines(path: &CareerPath) -> Vec<String> {
    let mut lines = vec![
        format!("Salary: {}", path.salary_range),
        format!("Growth: {}", path.growth_prospect),
    ];
    if !path.required_skills.is_empty() {
        let skills: Vec<&str> = path.required_skills.iter().map(String::as_str).collect();
        lines.push(format!("Skills: {}", skills.join(", ")));
    }
    lines
}

pub fn print_analysis(analysis: &AnalysisResult) {
    let selected = &analysis.selected_path;
    println!("{}", "Recommended career path".bold().cyan());
    println!("  {}", selected.title.clone().bold());
    print_wrapped(&selected.description, "  ");
    for line in career_path_lines(selected) {
        println!("  {}", line);
    }

    let alternatives: Vec<&CareerPath> = analysis
        .all_paths
        .iter()
        .filter(|p| p.title != selected.title)
        .collect();
    if !alternatives.is_empty() {
        println!();
        println!("{}", "Other paths".bold().cyan());
        for path in alternatives {
            println!("  • {} ({})", path.title.clone().bold(), path.salary_range);
            print_wrapped(&path.description, "    ");
        }
    }

    if !analysis.roadmap_steps.is_empty() {
        println!();
        println!("{}", "Roadmap".bold().cyan());
        for step in &analysis.roadmap_steps {
            println!(
                "  {}. {} {}",
                step.step_number,
                step.title.clone().bold(),
                format!("[{}]", step.duration).dark_grey()
            );
            print_wrapped(&step.description, "     ");
            if !step.resources.is_empty() {
                println!("     Resources: {}", step.resources.join(", "));
            }
        }
    }

    if !analysis.courses.is_empty() {
        println!();
        println!("{}", "Courses".bold().cyan());
        for course in &analysis.courses {
            println!(
                "  • {} by {} ({}, {})",
                course.title.clone().bold(),
                course.provider,
                course.duration,
                course.difficulty
            );
            println!("    {}", course.url.clone().underlined());
        }
    }
}

pub fn print_mock_test(test: &MockTest, show_answers: bool) {
    println!(
        "{} {}",
        "Mock test".bold().cyan(),
        format!("{} · {}", test.test_id, test.created_at.format("%Y-%m-%d %H:%M")).dark_grey()
    );
    for (i, q) in test.questions.iter().enumerate() {
        println!();
        println!("  {}", format!("Q{}.", i + 1).bold());
        print_wrapped(&q.question, "     ");
        if show_answers {
            println!("     {}", "Answer:".green());
            print_wrapped(&q.answer, "     ");
        }
    }
}

pub fn print_resources(resources: &LearningResources) {
    println!("{}", "Video courses".bold().cyan());
    for link in &resources.youtube_courses {
        println!("  • {}", link.title);
        println!("    {}", link.url.clone().underlined());
    }
    println!();
    println!("{}", "Articles".bold().cyan());
    for link in &resources.articles {
        println!("  • {}", link.title);
        println!("    {}", link.url.clone().underlined());
    }
}

pub fn print_profile(user: &UserProfile) {
    println!("{}", user.full_name.clone().bold());
    println!("  Email: {}", user.email);
    println!("  Skills: {}", user.skills);
    println!("  Expertise: {}", user.expertise_level);
    if let Some(created) = user.created_at {
        println!("  Member since: {}", created.format("%Y-%m-%d"));
    }
}

pub fn print_skills(state: &SessionState) {
    let skills = if state.skills.trim().is_empty() {
        "(none yet)".to_string()
    } else {
        state.skills.clone()
    };
    println!("  Skills: {}", skills);
    println!("  Expertise: {}", state.expertise_level);
}

pub fn print_health(health: &HealthStatus) {
    let status = if health.is_healthy() {
        health.status.clone().green()
    } else {
        health.status.clone().yellow()
    };
    match &health.service {
        Some(service) => println!("{}: {}", service, status),
        None => println!("service: {}", status),
    }
}

pub fn print_chat_message(message: &ChatMessage) {
    match message.sender {
        Sender::User => println!("{} {}", "You:".bold(), message.text),
        Sender::Bot => {
            println!("{} {}", "Bot:".bold().magenta(), message.text);
            if !message.extracted_skills.is_empty() {
                println!(
                    "     {}",
                    format!("skills: {}", message.extracted_skills.join(", ")).dark_grey()
                );
            }
        }
    }
}

/// Persistent error banner shown until the next successful action
pub fn print_error_banner(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_notice(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
        assert_eq!(
            wrap_text("learn the basics of rust", 10),
            vec!["learn the", "basics of", "rust"]
        );
        // long words are kept whole
        assert_eq!(wrap_text("internationalization", 5), vec!["internationalization"]);
        // multibyte text never splits inside a character
        assert_eq!(wrap_text("größer kleiner", 6), vec!["größer", "kleiner"]);
    }

    #[test]
    fn test_career_path_lines() {
        let path = CareerPath {
            title: "Data Analyst".to_string(),
            description: "Analyze data".to_string(),
            required_skills: ["SQL".to_string(), "Excel".to_string()].into_iter().collect(),
            salary_range: "$50,000 - $90,000".to_string(),
            growth_prospect: "High".to_string(),
        };
        let lines = career_path_lines(&path);
        assert_eq!(lines[0], "Salary: $50,000 - $90,000");
        assert_eq!(lines[2], "Skills: Excel, SQL");
    }
}
