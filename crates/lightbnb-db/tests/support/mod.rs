//! Scratch PostgreSQL databases for integration tests
//!
//! Each test gets its own database named after it, created fresh from
//! `TEST_DATABASE_URL` (default: postgres://postgres@localhost/postgres).

#![allow(dead_code)]

use anyhow::{Context, Result};
use lightbnb_db::{DbClient, PoolSettings};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;

pub fn base_url() -> String {
    std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgres://postgres@localhost/postgres".to_string())
}

/// Test database manager
pub struct TestDb {
    client: DbClient,
    db_name: String,
}

impl TestDb {
    /// Create a fresh database with the LightBnB schema and fixture rows
    pub async fn seeded(test_name: &str) -> Result<Self> {
        let db = Self::new(&base_url(), test_name).await?;
        db.run_script(SCHEMA).await?;
        db.run_script(FIXTURES).await?;
        Ok(db)
    }

    /// Create an empty database
    pub async fn new(base_url: &str, test_name: &str) -> Result<Self> {
        let db_name = format!("lightbnb_test_{}", test_name.replace('-', "_"));

        let admin = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect(base_url)
            .await
            .context("Failed to connect to PostgreSQL")?;

        sqlx::query(&format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", db_name))
            .execute(&admin)
            .await
            .context("Failed to drop test database")?;

        sqlx::query(&format!("CREATE DATABASE {}", db_name))
            .execute(&admin)
            .await
            .context("Failed to create test database")?;

        admin.close().await;

        let opts = PgConnectOptions::from_str(base_url)?.database(&db_name);
        let settings = PoolSettings {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(10),
        };
        let client = DbClient::with_options(opts, &settings)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self { client, db_name })
    }

    pub fn client(&self) -> &DbClient {
        &self.client
    }

    pub fn name(&self) -> &str {
        &self.db_name
    }

    /// Execute a script one statement at a time
    pub async fn run_script(&self, script: &str) -> Result<()> {
        for statement in script.split(';') {
            let statement = statement.trim();
            if !statement.is_empty() {
                sqlx::query(statement)
                    .execute(self.client.pool())
                    .await
                    .with_context(|| format!("Failed to execute: {}", statement))?;
            }
        }

        Ok(())
    }

    /// Get row count for a table
    pub async fn count_rows(&self, table: &str) -> Result<i64> {
        let row = sqlx::query(&format!("SELECT COUNT(*) AS count FROM {}", table))
            .fetch_one(self.client.pool())
            .await?;

        Ok(row.get("count"))
    }
}

pub const SCHEMA: &str = r#"
CREATE TABLE users (
    id SERIAL PRIMARY KEY NOT NULL,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    password VARCHAR(255) NOT NULL
);

CREATE TABLE properties (
    id SERIAL PRIMARY KEY NOT NULL,
    owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title VARCHAR(255) NOT NULL,
    description TEXT,
    thumbnail_photo_url VARCHAR(255) NOT NULL,
    cover_photo_url VARCHAR(255) NOT NULL,
    cost_per_night INTEGER NOT NULL DEFAULT 0,
    parking_spaces INTEGER NOT NULL DEFAULT 0,
    number_of_bathrooms INTEGER NOT NULL DEFAULT 0,
    number_of_bedrooms INTEGER NOT NULL DEFAULT 0,
    country VARCHAR(255) NOT NULL,
    street VARCHAR(255) NOT NULL,
    city VARCHAR(255) NOT NULL,
    province VARCHAR(255) NOT NULL,
    post_code VARCHAR(255) NOT NULL
);

CREATE TABLE reservations (
    id SERIAL PRIMARY KEY NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
    guest_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
);

CREATE TABLE property_reviews (
    id SERIAL PRIMARY KEY NOT NULL,
    guest_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
    reservation_id INTEGER NOT NULL REFERENCES reservations(id) ON DELETE CASCADE,
    rating SMALLINT NOT NULL DEFAULT 0,
    message TEXT
);
"#;

// Prices are cents. Property 4 has no reviews.
pub const FIXTURES: &str = r#"
INSERT INTO users (name, email, password) VALUES
    ('Eva Stanley', 'sebastianguerra@ymail.com', '$2a$10$FB/BOAVhpuLvpOREQVmvmezD4ED/.JBIDRh70tGevYzYzQgFId2u.'),
    ('Louisa Meyer', 'jacksonrose@hotmail.com', '$2a$10$FB/BOAVhpuLvpOREQVmvmezD4ED/.JBIDRh70tGevYzYzQgFId2u.'),
    ('Dominic Parks', 'victoriablackwell@outlook.com', '$2a$10$FB/BOAVhpuLvpOREQVmvmezD4ED/.JBIDRh70tGevYzYzQgFId2u.');

INSERT INTO properties (owner_id, title, description, thumbnail_photo_url, cover_photo_url, cost_per_night, parking_spaces, number_of_bathrooms, number_of_bedrooms, country, street, city, province, post_code) VALUES
    (1, 'Speed lamp', 'description', 'https://images.example.com/1t.jpg', 'https://images.example.com/1c.jpg', 93061, 6, 4, 8, 'Canada', '536 Namsub Highway', 'Vancouver', 'British Columbia', '28142'),
    (1, 'Blank corner', 'description', 'https://images.example.com/2t.jpg', 'https://images.example.com/2c.jpg', 8500, 0, 5, 6, 'Canada', '651 Nami Road', 'North Vancouver', 'British Columbia', '83680'),
    (2, 'Habit mix', 'description', 'https://images.example.com/3t.jpg', 'https://images.example.com/3c.jpg', 23000, 0, 2, 3, 'Canada', '1650 Hejto Center', 'Calgary', 'Alberta', '23355'),
    (3, 'Headed know', NULL, 'https://images.example.com/4t.jpg', 'https://images.example.com/4c.jpg', 15000, 1, 1, 1, 'Canada', '513 Powov Grove', 'vancouver', 'British Columbia', '38051');

INSERT INTO reservations (start_date, end_date, property_id, guest_id) VALUES
    ('2018-09-11', '2018-09-26', 1, 3),
    ('2019-01-04', '2019-02-01', 2, 2),
    ('2017-06-01', '2017-06-09', 3, 3),
    ('2021-10-01', '2021-10-14', 4, 3),
    ('2015-03-12', '2015-03-19', 2, 3);

INSERT INTO property_reviews (guest_id, property_id, reservation_id, rating, message) VALUES
    (3, 1, 1, 3, 'messages'),
    (2, 2, 2, 4, 'messages'),
    (3, 3, 3, 5, 'messages'),
    (3, 2, 5, 5, 'messages');
"#;
