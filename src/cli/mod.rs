//! CLI for poking the platform backends
//!
//! Smoke-test harness around the client library: fetch pages, run
//! searches, exercise the auth flow, peek at tokens. Output is the
//! backend's JSON, pretty-printed.

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::SearchOptions;
use crate::infrastructure::auth::peek_claims;
use crate::Platform;

/// Platform API client - talk to the content platform backends
#[derive(Parser)]
#[command(name = "platform-client")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check that the content backend answers
    Ping,

    /// List a page of items
    Items {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
    },

    /// Fetch a single item with its full content
    Item { id: String },

    /// Run a search query
    Search {
        query: String,
        #[arg(long, value_enum, default_value_t = SearchScope::All)]
        scope: SearchScope,
        #[arg(short, default_value_t = 10)]
        k: u32,
    },

    /// Log in and print the issued token pair
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Decode a token's payload locally (no signature check - display only)
    Decode { token: String },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SearchScope {
    All,
    Items,
    Authors,
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run(cli: Cli, platform: Platform) -> anyhow::Result<()> {
    match cli.command {
        Command::Ping => {
            let page = platform.items.list(1, 1).await?;
            println!("ok: backend reachable, {} items total", page.total_items);
        }
        Command::Items { page, size } => {
            let items = platform.items.list(page, size).await?;
            print_json(&items)?;
        }
        Command::Item { id } => {
            let detail = platform.items.get(&id).await?;
            print_json(&detail)?;
        }
        Command::Search { query, scope, k } => {
            let options = SearchOptions::default().with_k(k);
            match scope {
                SearchScope::All => print_json(&platform.search.search_all(&query, &options).await?)?,
                SearchScope::Items => {
                    print_json(&platform.search.search_items(&query, &options).await?)?
                }
                SearchScope::Authors => {
                    print_json(&platform.search.search_authors(&query, &options).await?)?
                }
            }
        }
        Command::Login { email, password } => {
            let pair = platform.auth.login(&email, &password).await?;
            print_json(&pair)?;
        }
        Command::Decode { token } => {
            let claims = peek_claims(&token)?;
            print_json(&claims)?;
            if claims.is_expired() {
                println!("note: token is expired");
            }
        }
    }

    Ok(())
}
