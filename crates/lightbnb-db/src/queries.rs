//! Query operations for users, reservations and properties
//!
//! One statement per call. Absence of a row is `Ok(None)`; every failure is a
//! `DbError`.

use crate::filter::{PropertyFilter, PROPERTY_COLUMNS, PROPERTY_DETAIL_COLUMNS};
use crate::schema::{GuestReservation, NewProperty, NewUser, Property, PropertyListing, User};
use crate::{DbClient, DbResult};
use tracing::{debug, instrument};

/// Row cap used when the caller has no preference
pub const DEFAULT_LIMIT: u32 = 10;

/// `properties.id` stays out of the select list so `id` is unambiguously the
/// reservation's; the property id comes from `reservations.property_id`.
fn guest_reservations_sql() -> String {
    format!(
        r#"
        SELECT reservations.id, reservations.guest_id, reservations.property_id,
               reservations.start_date, reservations.end_date,
               {PROPERTY_DETAIL_COLUMNS},
               avg(property_reviews.rating)::float8 AS average_rating
        FROM reservations
        JOIN properties ON reservations.property_id = properties.id
        LEFT JOIN property_reviews ON properties.id = property_reviews.property_id
        WHERE reservations.guest_id = $1
        GROUP BY properties.id, reservations.id
        ORDER BY reservations.start_date, reservations.id
        LIMIT $2
        "#
    )
}

impl DbClient {
    /// Get a single user by email
    #[instrument(skip(self))]
    pub async fn get_user_with_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        debug!(found = user.is_some(), "Looked up user by email");
        Ok(user)
    }

    /// Get a single user by id
    #[instrument(skip(self))]
    pub async fn get_user_with_id(&self, id: i32) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        debug!(found = user.is_some(), "Looked up user by id");
        Ok(user)
    }

    /// Insert a user and return the new id
    #[instrument(skip(self, user))]
    pub async fn add_user(&self, user: &NewUser) -> DbResult<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(self.pool())
        .await?;

        debug!(user_id = id, "Inserted user");
        Ok(id)
    }

    /// Get a guest's reservations, earliest start date first
    #[instrument(skip(self))]
    pub async fn get_all_reservations(
        &self,
        guest_id: i32,
        limit: u32,
    ) -> DbResult<Vec<GuestReservation>> {
        let sql = guest_reservations_sql();

        let reservations = sqlx::query_as::<_, GuestReservation>(&sql)
            .bind(guest_id)
            .bind(i64::from(limit))
            .fetch_all(self.pool())
            .await?;

        debug!(
            "Retrieved {} reservations for guest {}",
            reservations.len(),
            guest_id
        );
        Ok(reservations)
    }

    /// Get properties matching `filter`, cheapest first
    #[instrument(skip(self))]
    pub async fn get_all_properties(
        &self,
        filter: &PropertyFilter,
        limit: u32,
    ) -> DbResult<Vec<PropertyListing>> {
        let mut builder = filter.listing_query(limit);

        let properties = builder
            .build_query_as::<PropertyListing>()
            .fetch_all(self.pool())
            .await?;

        debug!("Retrieved {} properties", properties.len());
        Ok(properties)
    }

    /// Insert a property and return the stored row
    #[instrument(skip(self, property), fields(owner_id = property.owner_id))]
    pub async fn add_property(&self, property: &NewProperty) -> DbResult<Property> {
        let sql = format!(
            r#"
            INSERT INTO properties (
                owner_id, title, description,
                thumbnail_photo_url, cover_photo_url,
                cost_per_night,
                street, city, province, post_code, country,
                parking_spaces, number_of_bathrooms, number_of_bedrooms
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {PROPERTY_COLUMNS}
            "#
        );

        let inserted = sqlx::query_as::<_, Property>(&sql)
            .bind(property.owner_id)
            .bind(&property.title)
            .bind(&property.description)
            .bind(&property.thumbnail_photo_url)
            .bind(&property.cover_photo_url)
            .bind(property.cost_per_night)
            .bind(&property.street)
            .bind(&property.city)
            .bind(&property.province)
            .bind(&property.post_code)
            .bind(&property.country)
            .bind(property.parking_spaces)
            .bind(property.number_of_bathrooms)
            .bind(property.number_of_bedrooms)
            .fetch_one(self.pool())
            .await?;

        debug!(property_id = inserted.id, "Inserted property");
        Ok(inserted)
    }
}
