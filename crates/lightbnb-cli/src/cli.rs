//! Command-line definitions

use clap::{Parser, Subcommand};
use lightbnb_db::{PropertyFilter, DEFAULT_LIMIT};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lightbnb",
    version,
    about = "Query and update the LightBnB database, printing JSON"
)]
pub struct Cli {
    /// Log as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the database is reachable
    Ping,

    /// Look up a single user
    User {
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        email: Option<String>,

        #[arg(long)]
        id: Option<i32>,
    },

    /// Create a user and print its id
    AddUser {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Stored as given; hash it first
        #[arg(long)]
        password: String,
    },

    /// List a guest's reservations, earliest first
    Reservations {
        #[arg(long)]
        guest_id: i32,

        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },

    /// Search properties, cheapest first
    Properties {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },

    /// Create a property from a JSON file
    AddProperty {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct FilterArgs {
    /// Case-insensitive part of the city name
    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub owner_id: Option<i32>,

    /// Minimum nightly price, in cents
    #[arg(long)]
    pub min_price: Option<i32>,

    /// Maximum nightly price, in cents
    #[arg(long)]
    pub max_price: Option<i32>,

    /// Minimum average review rating
    #[arg(long)]
    pub min_rating: Option<f64>,
}

impl From<FilterArgs> for PropertyFilter {
    fn from(args: FilterArgs) -> Self {
        PropertyFilter {
            city: args.city,
            owner_id: args.owner_id,
            minimum_price_per_night: args.min_price,
            maximum_price_per_night: args.max_price,
            minimum_rating: args.min_rating,
        }
    }
}
