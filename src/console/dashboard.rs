//! Summary-statistics screen.

use anyhow::{Context, Result};

use crate::api::ApiClient;
use crate::session::Session;

/// Fetch and render the dashboard counters. Unlike the dependent dropdowns
/// there is nothing to degrade to here, so a failed fetch is a visible error.
pub async fn run(client: &ApiClient, session: &Session) -> Result<()> {
    let stats = client
        .dashboard_stats()
        .await
        .context("Failed to fetch dashboard statistics")?;

    println!();
    println!("=== University Dashboard ===");
    println!();
    println!("Welcome back, {}", session.display_name);
    println!();
    println!("  Students:     {}", stats.total_students);
    println!("  Teachers:     {}", stats.total_teachers);
    println!("  System users: {}", stats.total_users);
    println!();

    Ok(())
}
