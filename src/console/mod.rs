//! Interactive console screens.
//!
//! Each management screen is a small command loop over stdin: render state,
//! read a command, perform at most one network call, repeat. All suspension
//! points are the awaited gateway calls; everything else is synchronous.

pub mod cascade;
pub mod dashboard;
pub mod form;
pub mod pager;
pub mod students;
pub mod teachers;

use anyhow::Result;
use std::io::{self, Write};

use crate::api::{ApiClient, ApiError};
use crate::config::Config;
use crate::session::Session;

/// Prompt for a line of input, falling back to `default` on empty input.
pub(crate) fn prompt(label: &str, default: &str) -> io::Result<String> {
    if default.is_empty() {
        print!("{}: ", label);
    } else {
        print!("{} [{}]: ", label, default);
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input.to_string())
    }
}

/// Yes/no question defaulting to no.
pub(crate) fn confirm(question: &str) -> io::Result<bool> {
    print!("{} [y/N]: ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let answer = input.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Read one command line for a screen prompt like `students> `.
pub(crate) fn read_command(prompt_text: &str) -> io::Result<String> {
    print!("{}", prompt_text);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Split a command line into the command word and its argument rest.
pub(crate) fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    }
}

/// Truncate a string to max length with ellipsis.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

/// Interactive sign-in. Bad credentials stay on the screen with an inline
/// message; only a transport-level failure aborts.
pub async fn login(client: &ApiClient, config: &Config) -> Result<()> {
    println!();
    println!("=== Sign in ===");
    println!();

    loop {
        let email = prompt("Email", "")?;
        let password = prompt("Password", "")?;

        match client.login(&email, &password).await {
            Ok(response) => {
                let session = Session {
                    token: response.user_token,
                    role: response.user_role,
                    display_name: response.user_name.unwrap_or(email),
                };
                session.save(&config.session.store_dir)?;
                println!();
                println!(
                    "[OK] Signed in as {} ({})",
                    session.display_name, session.role
                );
                return Ok(());
            }
            Err(ApiError::Unauthorized) | Err(ApiError::Server { .. }) => {
                println!();
                println!("[!!] Invalid email or password.");
                if !confirm("Try again?")? {
                    return Ok(());
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Tear down the stored session.
pub fn logout(config: &Config) -> Result<()> {
    if Session::clear(&config.session.store_dir)? {
        println!("Signed out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(truncate("exactly-ten", 11), "exactly-ten");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("a-very-long-department-name", 10), "a-very-...");
    }

    #[test]
    fn command_splitting_handles_arguments() {
        assert_eq!(split_command("delete CS-2024-001"), ("delete", "CS-2024-001"));
        assert_eq!(split_command("search"), ("search", ""));
        assert_eq!(split_command("dept  4"), ("dept", "4"));
        assert_eq!(split_command(""), ("", ""));
    }
}
