//! LightBnB command-line client
//!
//! Runs one data-access operation per invocation and prints the result as
//! JSON on stdout. Logs go to stderr.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use lightbnb_config::AppConfig;
use lightbnb_db::{DbClient, NewProperty, NewUser, PropertyFilter};
use lightbnb_obs::LogSettings;
use serde::Serialize;
use tracing::info;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;

    lightbnb_obs::init(
        "lightbnb",
        &LogSettings {
            filter: config.log.filter.clone(),
            json: args.json_logs || config.log.json,
        },
    );

    let db = DbClient::from_config(&config.database)
        .await
        .context("Failed to connect to database")?;

    let result = run(&db, args.command).await;
    db.close().await;
    result
}

async fn run(db: &DbClient, command: Command) -> Result<()> {
    match command {
        Command::Ping => {
            db.ping().await.context("Database ping failed")?;
            info!("Database connection verified");
            print_json(&"ok")
        }
        Command::User { email, id } => {
            let user = match (email, id) {
                (Some(email), _) => db.get_user_with_email(&email).await?,
                (None, Some(id)) => db.get_user_with_id(id).await?,
                (None, None) => None,
            };
            print_json(&user)
        }
        Command::AddUser {
            name,
            email,
            password,
        } => {
            let id = db
                .add_user(&NewUser {
                    name,
                    email,
                    password,
                })
                .await?;
            print_json(&id)
        }
        Command::Reservations { guest_id, limit } => {
            print_json(&db.get_all_reservations(guest_id, limit).await?)
        }
        Command::Properties { filter, limit } => {
            let filter = PropertyFilter::from(filter);
            print_json(&db.get_all_properties(&filter, limit).await?)
        }
        Command::AddProperty { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {:?}", file))?;
            let property: NewProperty = serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse property JSON: {:?}", file))?;
            print_json(&db.add_property(&property).await?)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
