//! CLI command execution.
//!
//! Each command hydrates a session from disk, dispatches actions and waits
//! for every collaborator request it started before returning.

use anyhow::{bail, Result};
use chrono::Local;

use crate::config::Config;
use crate::models::ValidationStatus;
use crate::prompts::EXAMPLE_PROMPTS;
use crate::runtime::SessionDriver;
use crate::storage::SessionRepository;
use crate::store::{Action, Notification};

use super::args::{Cli, Commands, FollowUp, ThemeAction};

/// Width of the prompt column in `history` output.
const PROMPT_COLUMN: usize = 60;

pub async fn execute(cli: Cli) -> Result<()> {
    let config = Config::from_cli(&cli)?;
    tracing::debug!(?config, "configuration resolved");

    if matches!(cli.command, Commands::Examples) {
        list_examples();
        return Ok(());
    }

    let mut driver = SessionDriver::new(config.repository()?, config.services()?);

    match cli.command {
        Commands::Generate { prompt, follow_up } => {
            driver.dispatch(Action::SetPrompt(prompt.join(" ")));
            generate(&mut driver, follow_up).await
        }
        Commands::Example { number, follow_up } => {
            let Some(index) = number.checked_sub(1).filter(|i| *i < EXAMPLE_PROMPTS.len()) else {
                bail!(
                    "No example {number}; choose 1-{} (see `iecgen examples`)",
                    EXAMPLE_PROMPTS.len()
                );
            };
            driver.dispatch(Action::UseExample(index));
            eprintln!("Prompt: {}", driver.store().session().prompt);
            generate(&mut driver, follow_up).await
        }
        Commands::History => {
            list_history(&driver);
            Ok(())
        }
        Commands::Load { id, follow_up } => load(&mut driver, &id, follow_up).await,
        Commands::Theme { action } => {
            if matches!(action, ThemeAction::Toggle) {
                driver.dispatch(Action::ToggleTheme);
            }
            println!("{}", driver.store().session().theme);
            Ok(())
        }
        Commands::Clear => {
            let count = driver.store().history().len();
            driver.dispatch(Action::ClearHistory);
            println!("Cleared {count} generation(s)");
            Ok(())
        }
        Commands::Examples => Ok(()),
    }
}

async fn generate<R: SessionRepository>(
    driver: &mut SessionDriver<R>,
    follow_up: FollowUp,
) -> Result<()> {
    if driver.store().session().prompt.trim().is_empty() {
        bail!("Prompt is required for generate command");
    }

    driver.run(Action::RequestGeneration).await;

    let session = driver.store().session();
    println!("{}", session.generated_code);
    if let Some(reason) = &session.generation_error {
        bail!("Generation failed: {reason}");
    }

    if let Some(latest) = driver.store().history().latest() {
        eprintln!("Saved as {}", latest.id);
    }

    run_follow_up(driver, follow_up).await;
    Ok(())
}

async fn load<R: SessionRepository>(
    driver: &mut SessionDriver<R>,
    id: &str,
    follow_up: FollowUp,
) -> Result<()> {
    if driver.store().history().find(id).is_none() {
        bail!("No generation with id {id} (see `iecgen history`)");
    }

    driver.dispatch(Action::LoadFromHistory(id.to_string()));
    let session = driver.store().session();
    eprintln!("Prompt: {}", session.prompt);
    println!("{}", session.generated_code);

    run_follow_up(driver, follow_up).await;
    Ok(())
}

async fn run_follow_up<R: SessionRepository>(driver: &mut SessionDriver<R>, follow_up: FollowUp) {
    if follow_up.validate {
        driver.run(Action::RequestValidation).await;
        print_validation(driver);
    }

    if follow_up.simulate {
        driver.run(Action::RequestSimulation).await;
        for notification in driver.take_notifications() {
            match notification {
                Notification::SimulationPassed(message) => eprintln!("✓ {message}"),
                Notification::SimulationFailed(message) => eprintln!("✗ {message}"),
            }
        }
    }
}

fn print_validation<R: SessionRepository>(driver: &SessionDriver<R>) {
    let session = driver.store().session();
    match session.validation_status {
        ValidationStatus::Valid => eprintln!("Validation: valid"),
        ValidationStatus::Invalid => eprintln!("Validation: invalid"),
        ValidationStatus::Idle => eprintln!("Validation: not run"),
    }

    if let Some(report) = &session.validation_report {
        if let Some(errors) = &report.errors {
            eprintln!("Errors:\n{errors}");
        }
        if let Some(warnings) = &report.warnings {
            eprintln!("Warnings:\n{warnings}");
        }
    }
}

fn list_history<R: SessionRepository>(driver: &SessionDriver<R>) {
    let history = driver.store().history();
    if history.is_empty() {
        println!("No generations yet.");
        return;
    }

    println!("{:<36}  {:<19}  PROMPT", "ID", "CREATED");
    for generation in history {
        let created = generation.timestamp.with_timezone(&Local);
        println!(
            "{:<36}  {}  {}",
            generation.id,
            created.format("%Y-%m-%d %H:%M:%S"),
            truncate(&generation.prompt, PROMPT_COLUMN)
        );
    }
}

fn list_examples() {
    for (i, prompt) in EXAMPLE_PROMPTS.iter().enumerate() {
        println!("{:>2}. {prompt}", i + 1);
    }
}

/// Shorten `s` to at most `max` characters, marking the cut with `...`.
fn truncate(s: &str, max: usize) -> String {
    let single_line = s.replace('\n', " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let kept: String = single_line.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("line one\nline two", 40), "line one line two");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
