//! CLI administration tool for link-shortener.
//!
//! Manages API keys and inspects links directly against the database, without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a new API key (works even when keys already exist)
//! cargo run --bin admin -- key create
//!
//! # List stored keys
//! cargo run --bin admin -- key list
//!
//! # Run one rotation check now
//! cargo run --bin admin -- key rotate
//!
//! # List active links
//! cargo run --bin admin -- links
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! Reads the same `DATABASE_URL` / `DB_*` variables as the server.

use link_shortener::application::services::{ApiKeyService, IssuedKey};
use link_shortener::config::{self, Config, mask_connection_string};
use link_shortener::domain::repositories::LinkRepository;
use link_shortener::infrastructure::persistence::{PgApiKeyRepository, PgLinkRepository};
use link_shortener::server::connect_pool;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing link-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage API keys
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// List active links
    Links,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Create a new API key
    Create {
        /// Custom key value (min 16 characters, generated if omitted)
        #[arg(short, long)]
        key: Option<String>,

        /// Prompt for the key value instead of generating one
        #[arg(short, long, conflicts_with = "key")]
        interactive: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List stored keys (hashes only)
    List,

    /// Generate a replacement if the newest key is missing or expired
    Rotate,
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

type PgApiKeyService = ApiKeyService<PgApiKeyRepository>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Key { action } => handle_key_action(action, &pool).await?,
        Commands::Links => list_links(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &config).await?,
    }

    Ok(())
}

async fn handle_key_action(action: KeyAction, pool: &PgPool) -> Result<()> {
    let service = ApiKeyService::new(Arc::new(PgApiKeyRepository::new(Arc::new(
        pool.clone(),
    ))));

    match action {
        KeyAction::Create {
            key,
            interactive,
            yes,
        } => create_key(&service, key, interactive, yes).await,
        KeyAction::List => list_keys(&service).await,
        KeyAction::Rotate => rotate_key(&service).await,
    }
}

/// Creates a new API key.
///
/// Only the SHA-256 hash is stored; the raw key is printed once.
async fn create_key(
    service: &PgApiKeyService,
    key: Option<String>,
    interactive: bool,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔑 Create API Key".bright_blue().bold());
    println!();

    let key = if interactive {
        let value: String = Input::new()
            .with_prompt("Key value (min 16 characters)")
            .validate_with(|input: &String| {
                if input.len() >= 16 {
                    Ok(())
                } else {
                    Err("Key must be at least 16 characters")
                }
            })
            .interact_text()?;
        Some(value)
    } else {
        key
    };

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create a new API key valid for one week?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let issued = service
        .create(key)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create key: {}", e))?;

    print_issued(&issued);

    Ok(())
}

/// Lists stored keys, newest first.
///
/// ```text
/// 📋 API Keys
///
///   ID                                    Hash          Created           Expires           Status
///   ──────────────────────────────────────────────────────────────────────────────────────────────
///   7d3c...                               9f86d081...   2025-01-15 10:30  2025-01-22 10:30  ACTIVE
/// ```
async fn list_keys(service: &PgApiKeyService) -> Result<()> {
    println!("{}", "📋 API Keys".bright_blue().bold());
    println!();

    let keys = service
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list keys: {}", e))?;

    if keys.is_empty() {
        println!("{}", "  No keys found".yellow());
        println!();
        println!(
            "  Create one with: {} admin key create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<37} {:<13} {:<17} {:<17} {:<8}",
        "ID".bright_white().bold(),
        "Hash".bright_white().bold(),
        "Created".bright_white().bold(),
        "Expires".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(94).bright_black());

    let now = Utc::now();
    for key in &keys {
        let status = if key.is_expired_at(now) {
            "EXPIRED".red()
        } else {
            "ACTIVE".green()
        };

        let expires = key
            .expires_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<37} {:<13} {:<17} {:<17} {}",
            key.id.to_string().bright_black(),
            format!("{}...", &key.key_hash[..key.key_hash.len().min(8)]).cyan(),
            key.created_at.format("%Y-%m-%d %H:%M").to_string(),
            expires,
            status
        );
    }

    println!();
    println!("  Total: {}", keys.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Runs one rotation check immediately.
async fn rotate_key(service: &PgApiKeyService) -> Result<()> {
    println!("{}", "🔄 Rotate API Key".bright_blue().bold());
    println!();

    let rotated = service
        .rotate_if_needed()
        .await
        .map_err(|e| anyhow::anyhow!("Rotation failed: {}", e))?;

    match rotated {
        Some(issued) => print_issued(&issued),
        None => println!("{}", "✅ Current key is still valid, nothing to do".green()),
    }

    Ok(())
}

fn print_issued(issued: &IssuedKey) {
    println!();
    println!("{}", "✅ API key created successfully!".green().bold());
    println!();
    println!("  Key:     {}", issued.secret.bright_yellow().bold());
    if let Some(expires_at) = issued.key.expires_at {
        println!("  Expires: {}", expires_at.to_rfc3339().cyan());
    }
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this key now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -X POST http://localhost:3000/links -H 'Content-Type: application/json' \\\n    -d '{{\"api_key\": \"{}\", \"original_url\": \"example.com\"}}'",
        issued.secret
    );
    println!();
}

/// Prints every active link.
async fn list_links(pool: &PgPool) -> Result<()> {
    println!("{}", "🔗 Active Links".bright_blue().bold());
    println!();

    let repo = PgLinkRepository::new(Arc::new(pool.clone()));
    let mut links = repo
        .list_active()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No active links".yellow());
        return Ok(());
    }

    links.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    println!(
        "  {:<20} {:<17} {}",
        "Code".bright_white().bold(),
        "Created".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "─".repeat(80).bright_black());

    for link in &links {
        println!(
            "  {:<20} {:<17} {}",
            link.short_url.cyan(),
            link.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black(),
            link.original_url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let repo = PgLinkRepository::new(Arc::new(pool.clone()));
            repo.ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database check failed: {}", e))?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links")
                .fetch_one(pool)
                .await?;

            let active: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM short_links WHERE is_active = TRUE")
                    .fetch_one(pool)
                    .await?;

            let keys: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM api_keys")
                .fetch_one(pool)
                .await?;

            println!("  Connection:   {}", mask_connection_string(&config.database_url));
            println!("  PostgreSQL:   {}", version.bright_white());
            println!("  Links:        {} ({} active)", links, active.to_string().bright_green());
            println!("  API keys:     {}", keys);
            println!();
        }
    }

    Ok(())
}
