//! Row types for the LightBnB schema
//!
//! Field names follow the column names so `FromRow` and serde need no
//! renames. Money is integer cents, ids are `SERIAL` (i32).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

/// `users` row
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Stored as given; hashing belongs to the caller.
    pub password: String,
}

/// Insert payload for `users`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// `properties` row
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Property {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Nightly price in cents
    pub cost_per_night: i32,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
}

/// Insert payload for `properties`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProperty {
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Nightly price in cents
    pub cost_per_night: i32,
    #[serde(default)]
    pub parking_spaces: i32,
    #[serde(default)]
    pub number_of_bathrooms: i32,
    #[serde(default)]
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
}

/// A property together with the mean of its review ratings
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PropertyListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: Property,

    /// `None` when the property has no reviews
    pub average_rating: Option<f64>,
}

/// `reservations` row
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i32,
    pub guest_id: i32,
    pub property_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A guest's reservation with the reserved property and its rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestReservation {
    pub reservation: Reservation,
    pub property: Property,
    pub average_rating: Option<f64>,
}

// The statement selects only the reservation's `id`; the property id is
// read back through `reservations.property_id`.
impl<'r> FromRow<'r, PgRow> for GuestReservation {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let reservation = Reservation::from_row(row)?;

        let property = Property {
            id: reservation.property_id,
            owner_id: row.try_get("owner_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            thumbnail_photo_url: row.try_get("thumbnail_photo_url")?,
            cover_photo_url: row.try_get("cover_photo_url")?,
            cost_per_night: row.try_get("cost_per_night")?,
            parking_spaces: row.try_get("parking_spaces")?,
            number_of_bathrooms: row.try_get("number_of_bathrooms")?,
            number_of_bedrooms: row.try_get("number_of_bedrooms")?,
            country: row.try_get("country")?,
            street: row.try_get("street")?,
            city: row.try_get("city")?,
            province: row.try_get("province")?,
            post_code: row.try_get("post_code")?,
        };

        Ok(Self {
            reservation,
            property,
            average_rating: row.try_get("average_rating")?,
        })
    }
}

/// Table names
pub mod tables {
    pub const USERS: &str = "users";
    pub const PROPERTIES: &str = "properties";
    pub const RESERVATIONS: &str = "reservations";
    pub const PROPERTY_REVIEWS: &str = "property_reviews";
}
