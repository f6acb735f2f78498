//! Data models for Sold Fetcher
//!
//! This module defines the records decoded from one page of the
//! sold-properties API and the strict decoder that validates a page body.
//!
//! Required wire fields are plain struct fields and optional ones are
//! `Option`s, so a page either decodes completely or is rejected as a whole.
//! Unknown fields are ignored.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::app::dates::deserialize_optional_date;
use crate::errors::ValidationResult;

/// Geographic point of a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Listing photo metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub image_url: String,
    pub medium_image_url: String,
    pub count: u32,
}

/// One historical sale of a property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Price as displayed by the provider (e.g. "£250,000")
    pub display_price: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date_sold: Option<NaiveDate>,
    #[serde(default)]
    pub tenure: Option<String>,
    pub new_build: bool,
}

/// A sold property with its sale history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub address: String,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub image_info: Option<ImageInfo>,
    pub has_floor_plan: bool,
    /// Sales, most recent first as returned by the API; may be empty
    pub transactions: Vec<Transaction>,
    pub location: Location,
    pub detail_url: String,
}

impl Property {
    /// Most recent sale date known for this property
    pub fn latest_sale(&self) -> Option<NaiveDate> {
        self.transactions.iter().filter_map(|t| t.date_sold).max()
    }
}

/// The area a query resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchLocation {
    pub display_name: String,
    pub search_name: String,
    pub location_type: String,
    pub location_id: i64,
}

/// Freshness window of the sale data for one location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclaimerDate {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub earliest_transaction: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub most_recent_transaction: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub last_load_date: Option<NaiveDate>,
}

/// Per-location disclaimer dates keyed by location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclaimerDates {
    pub disclaimer_dates_map: HashMap<String, DisclaimerDate>,
}

/// Descriptive summary of the result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blurb {
    pub text: Vec<String>,
    pub number_of_properties: u32,
    pub number_of_transactions: u32,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub earliest_transaction_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub latest_transaction_date: Option<NaiveDate>,
}

/// Cursor state for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current: u32,
    pub first: u32,
    pub last: u32,
    pub total: u32,
    #[serde(default)]
    pub sort_by: Option<String>,
}

impl Pagination {
    /// Whether another page follows this one
    pub fn has_next_page(&self) -> bool {
        self.current < self.last
    }
}

/// One page of the sold-properties API, fully decoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoldPropertiesResponse {
    pub count: u32,
    pub meta_tag_description: String,
    pub properties: Vec<Property>,
    pub search_location: SearchLocation,
    pub disclaimer_dates: DisclaimerDates,
    #[serde(default)]
    pub blurb: Option<Blurb>,
    pub pagination: Pagination,
    #[serde(default)]
    pub local_info: Option<serde_json::Map<String, serde_json::Value>>,
}

impl SoldPropertiesResponse {
    /// Decode and validate a raw page body
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Json` when a required field is missing, a
    /// field has the wrong type, or a date matches neither accepted format.
    pub fn parse(body: &str) -> ValidationResult<Self> {
        Ok(serde_json::from_str(body)?)
    }
}
