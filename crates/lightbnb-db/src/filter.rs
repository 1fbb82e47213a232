//! Search filters for the property listing
//!
//! Each field is one optional condition. Absent fields add nothing to the
//! statement; present ones are always bound as parameters.

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

macro_rules! property_detail_columns {
    () => {
        "properties.owner_id, properties.title, properties.description, \
        properties.thumbnail_photo_url, properties.cover_photo_url, \
        properties.cost_per_night, properties.parking_spaces, \
        properties.number_of_bathrooms, properties.number_of_bedrooms, \
        properties.country, properties.street, properties.city, \
        properties.province, properties.post_code"
    };
}

/// Every `properties` column except `id`, for statements that already
/// select another table's `id`.
pub(crate) const PROPERTY_DETAIL_COLUMNS: &str = property_detail_columns!();

pub(crate) const PROPERTY_COLUMNS: &str = concat!("properties.id, ", property_detail_columns!());

const LISTING_FROM: &str = " FROM properties \
    LEFT JOIN property_reviews ON properties.id = property_reviews.property_id";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilter {
    /// Case-insensitive substring of the city name
    pub city: Option<String>,
    pub owner_id: Option<i32>,
    /// Inclusive lower bound on `cost_per_night`, in cents
    pub minimum_price_per_night: Option<i32>,
    /// Inclusive upper bound on `cost_per_night`, in cents
    pub maximum_price_per_night: Option<i32>,
    /// Lower bound on the average review rating
    pub minimum_rating: Option<f64>,
}

impl PropertyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn owner_id(mut self, owner_id: i32) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Restrict to `[minimum, maximum]` cents per night
    pub fn price_range(mut self, minimum: i32, maximum: i32) -> Self {
        self.minimum_price_per_night = Some(minimum);
        self.maximum_price_per_night = Some(maximum);
        self
    }

    pub fn minimum_rating(mut self, rating: f64) -> Self {
        self.minimum_rating = Some(rating);
        self
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.city_pattern().is_none()
            && self.owner_id.is_none()
            && self.minimum_price_per_night.is_none()
            && self.maximum_price_per_night.is_none()
            && self.minimum_rating.is_none()
    }

    /// `ILIKE` pattern for the city filter; an empty city matches everything
    /// and is skipped.
    fn city_pattern(&self) -> Option<String> {
        self.city
            .as_deref()
            .filter(|city| !city.is_empty())
            .map(|city| format!("%{}%", escape_like(city)))
    }

    /// Assemble the listing statement for this filter.
    pub(crate) fn listing_query<'a>(&self, limit: u32) -> QueryBuilder<'a, Postgres> {
        let mut builder = QueryBuilder::new("SELECT ");
        builder.push(PROPERTY_COLUMNS);
        builder.push(", avg(property_reviews.rating)::float8 AS average_rating");
        builder.push(LISTING_FROM);

        let mut first = true;

        if let Some(pattern) = self.city_pattern() {
            push_condition(&mut builder, &mut first, "properties.city ILIKE ");
            builder.push_bind(pattern);
        }

        if let Some(owner_id) = self.owner_id {
            push_condition(&mut builder, &mut first, "properties.owner_id = ");
            builder.push_bind(owner_id);
        }

        if let Some(minimum) = self.minimum_price_per_night {
            push_condition(&mut builder, &mut first, "properties.cost_per_night >= ");
            builder.push_bind(minimum);
        }

        if let Some(maximum) = self.maximum_price_per_night {
            push_condition(&mut builder, &mut first, "properties.cost_per_night <= ");
            builder.push_bind(maximum);
        }

        builder.push(" GROUP BY properties.id");

        if let Some(rating) = self.minimum_rating {
            builder.push(" HAVING avg(property_reviews.rating)::float8 >= ");
            builder.push_bind(rating);
        }

        builder.push(" ORDER BY properties.cost_per_night, properties.id LIMIT ");
        builder.push_bind(i64::from(limit));

        builder
    }
}

fn push_condition(builder: &mut QueryBuilder<'_, Postgres>, first: &mut bool, condition: &str) {
    builder.push(if std::mem::take(first) { " WHERE " } else { " AND " });
    builder.push(condition);
}

/// Escape `LIKE` metacharacters so user input matches literally.
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
