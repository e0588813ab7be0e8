// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `trakind status`: subscriber counts straight from the local store.

use std::io::IsTerminal;

use serde::Serialize;

use trakind_config::TrakindConfig;
use trakind_core::catalog::location_by_code;
use trakind_core::{TrakindError, UserCounter};
use trakind_storage::SqliteStorage;
use trakind_tracker::{SubscriptionReport, collect_report};

#[derive(Debug, Serialize)]
pub struct LocationCount {
    pub code: &'static str,
    pub name: &'static str,
    pub subscriptions: usize,
}

/// Structured output for `--json`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub database: String,
    pub users: u64,
    pub total: usize,
    pub locations: Vec<LocationCount>,
    pub unavailable: Vec<&'static str>,
}

impl StatusResponse {
    pub fn new(database: String, users: u64, report: SubscriptionReport) -> Self {
        let total = report.total();
        let locations = report
            .per_location
            .into_iter()
            .map(|(code, subscriptions)| LocationCount {
                code,
                name: location_by_code(code).map_or(code, |l| l.name),
                subscriptions,
            })
            .collect();
        Self {
            database,
            users,
            total,
            locations,
            unavailable: report.unavailable,
        }
    }
}

pub async fn run_status(config: &TrakindConfig, json: bool, plain: bool) -> Result<(), TrakindError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;

    let users = storage.get().await?;
    let report = collect_report(&storage).await;
    let status = StatusResponse::new(config.storage.database_path.clone(), users, report);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&status).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_status(&status, use_color);
    }
    Ok(())
}

fn print_status(status: &StatusResponse, use_color: bool) {
    println!();
    println!("  trakind status");
    println!("  {}", "-".repeat(35));
    println!("    Database: {}", status.database);
    println!("    Users:    {}", status.users);
    println!();
    for location in &status.locations {
        if use_color && location.subscriptions > 0 {
            use colored::Colorize;
            println!(
                "    {:<6} {:<24} {}",
                location.code,
                location.name,
                location.subscriptions.to_string().green()
            );
        } else {
            println!(
                "    {:<6} {:<24} {}",
                location.code, location.name, location.subscriptions
            );
        }
    }
    for code in &status.unavailable {
        if use_color {
            use colored::Colorize;
            println!("    {:<6} {}", code, "unavailable".red());
        } else {
            println!("    {code:<6} [FAIL] unavailable");
        }
    }
    println!("  {}", "-".repeat(35));
    println!("    Total:    {}", status.total);
    println!();
}
