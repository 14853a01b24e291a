use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use eyre::{eyre, Context, Result};

/// The questions the interaction loop asks the user.
pub trait Prompt {
    /// Choose one of `items`, returning its index or [`None`] when the choice was dismissed.
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<Option<usize>>;
    /// Free text, which may be blank.
    fn input(&mut self, prompt: &str) -> Result<String>;
    /// A yes/no question, answered with `default` when the user just presses Enter.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
}

/// Prompts shown in the terminal.
pub struct Terminal;

impl Prompt for Terminal {
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<Option<usize>> {
        user_select(prompt, items)
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        user_input(prompt)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        user_confirm(prompt, default)
    }
}

pub fn user_select<S: ToString>(prompt: &str, items: &[S]) -> Result<Option<usize>> {
    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(0)
        .items(items)
        .interact_opt()
        .wrap_err_with(|| eyre!("User selection cancelled"))
}

pub fn user_input(prompt: &str) -> Result<String> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map(|s| s.trim().to_owned())
        .wrap_err_with(|| eyre!("User input cancelled"))
}

pub fn user_confirm(prompt: &str, default: bool) -> Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()
        .wrap_err_with(|| eyre!("User confirmation cancelled"))
}

#[cfg(test)]
pub use test::{Answer, Scripted};
