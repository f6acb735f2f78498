//! Query parameters for one location

use serde::{Deserialize, Serialize};

use crate::constants::{api, query};
use crate::errors::{ConfigError, ConfigResult};

/// Parameters of one sold-properties search, without the page number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Location identifier (e.g. a postcode)
    pub location: String,
    /// Months of sale history requested
    pub sold_in: u32,
    /// Search radius; only sent in multi-location mode
    pub radius: Option<f64>,
}

impl SearchQuery {
    /// Query for a single location, sent without a radius
    pub fn single(location: impl Into<String>, sold_in: u32) -> Self {
        Self {
            location: location.into(),
            sold_in,
            radius: None,
        }
    }

    /// Query for one location of a multi-location fetch
    pub fn with_radius(location: impl Into<String>, sold_in: u32, radius: f64) -> Self {
        Self {
            location: location.into(),
            sold_in,
            radius: Some(radius),
        }
    }

    /// Query string pairs for the given page
    pub fn to_params(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            (api::PARAM_LOCATION, self.location.clone()),
            (api::PARAM_SOLD_IN, self.sold_in.to_string()),
        ];
        if let Some(radius) = self.radius {
            params.push((api::PARAM_RADIUS, radius.to_string()));
        }
        params.push((api::PARAM_PAGE_NUMBER, page.to_string()));
        params
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::with_radius("", query::DEFAULT_SOLD_IN, query::DEFAULT_RADIUS)
    }
}

/// Search window applied when the caller does not give one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDefaults {
    pub sold_in: u32,
    pub radius: f64,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            sold_in: query::DEFAULT_SOLD_IN,
            radius: query::DEFAULT_RADIUS,
        }
    }
}

impl QueryDefaults {
    /// Validate the defaults
    pub fn validate(&self) -> ConfigResult<()> {
        if self.sold_in == 0 {
            return Err(ConfigError::invalid(
                "query.sold_in",
                self.sold_in,
                "Sold-in window must be at least one month",
            ));
        }

        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(ConfigError::invalid(
                "query.radius",
                self.radius,
                "Radius must be a finite, non-negative number",
            ));
        }

        Ok(())
    }
}
