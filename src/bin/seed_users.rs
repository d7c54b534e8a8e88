// ABOUTME: Seeds the default administrator and regular user accounts
// ABOUTME: Passwords come from SEED_ADMIN_PASSWORD and SEED_USER_PASSWORD; existing accounts are kept
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Account Seeder
//!
//! ```bash
//! cargo run --bin keyturn-seed
//! cargo run --bin keyturn-seed -- --database-url sqlite:./data/dev.db
//! ```

use anyhow::Result;
use clap::Parser;
use keyturn::{
    config::environment::ServerConfig, errors::ErrorCode, logging, models::UserRole,
    resources::ServerResources,
};
use std::env;
use tracing::info;

#[derive(Parser)]
#[command(name = "keyturn-seed")]
#[command(about = "Create the default admin and user accounts")]
struct Args {
    /// Override `DATABASE_URL`
    #[arg(long)]
    database_url: Option<String>,
}

struct SeedAccount {
    email: &'static str,
    name: &'static str,
    role: UserRole,
    password_var: &'static str,
    default_password: &'static str,
}

const SEED_ACCOUNTS: [SeedAccount; 2] = [
    SeedAccount {
        email: "admin@example.com",
        name: "Admin User",
        role: UserRole::Admin,
        password_var: "SEED_ADMIN_PASSWORD",
        default_password: "admin123",
    },
    SeedAccount {
        email: "user@example.com",
        name: "Regular User",
        role: UserRole::User,
        password_var: "SEED_USER_PASSWORD",
        default_password: "user123",
    },
];

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(url) = args.database_url {
        config.database.url = url;
    }

    let resources = ServerResources::from_config(config).await?;

    for account in &SEED_ACCOUNTS {
        let password =
            env::var(account.password_var).unwrap_or_else(|_| account.default_password.to_owned());

        match resources
            .accounts
            .create_account(account.email, &password, Some(account.name), account.role)
            .await
        {
            Ok(user) => info!(user.id = %user.id, role = %user.role, "Created {}", account.email),
            Err(e) if e.code == ErrorCode::ResourceAlreadyExists => {
                info!("{} already exists, leaving it untouched", account.email);
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!("Seeding complete");
    Ok(())
}
