use std::cmp::Ordering;

use serde_json::Value;

use crate::api::models::scalar_text;
use crate::api::{fetch_as, ApiBase, DataFetcher, FetchError};
use crate::domain::{Dimension, FilterControls};

/// Raw option values for the three controls. A dimension whose fetch failed
/// is empty and its control keeps only the placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionLists {
    pub countries: Vec<String>,
    pub years: Vec<String>,
    pub products: Vec<String>,
}

impl DimensionLists {
    pub fn get(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Country => &self.countries,
            Dimension::Year => &self.years,
            Dimension::Product => &self.products,
        }
    }

    /// Fills every control, resetting each to its placeholder.
    pub fn apply(&self, controls: &mut FilterControls) {
        for dimension in Dimension::ALL {
            controls
                .control_mut(dimension)
                .populate(self.get(dimension).iter().cloned());
        }
    }
}

/// Newest first. Values that are not numbers keep their order after the
/// numeric ones.
pub fn sort_years_descending(years: &mut [String]) {
    let numeric = |year: &str| year.trim().parse::<f64>().ok().filter(|y| y.is_finite());
    years.sort_by(|a, b| {
        match (numeric(a.as_str()), numeric(b.as_str())) {
            (Some(a), Some(b)) => b.total_cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

async fn fetch_values<F: DataFetcher>(
    fetcher: &F,
    url: &reqwest::Url,
) -> Result<Vec<String>, FetchError> {
    let values: Vec<Value> = fetch_as(fetcher, url).await?;
    Ok(values.iter().map(scalar_text).collect())
}

fn or_placeholder(dimension: Dimension, result: Result<Vec<String>, FetchError>) -> Vec<String> {
    result.unwrap_or_else(|error| {
        tracing::warn!(dimension = dimension.as_str(), %error, "could not load options");
        Vec::new()
    })
}

/// Fetches countries, years and products concurrently.
pub async fn fetch_dimension_lists<F: DataFetcher>(api: &ApiBase, fetcher: &F) -> DimensionLists {
    let countries_url = api.countries();
    let years_url = api.years();
    let products_url = api.products();
    let (countries, years, products) = tokio::join!(
        fetch_values(fetcher, &countries_url),
        fetch_values(fetcher, &years_url),
        fetch_values(fetcher, &products_url),
    );

    let mut years = or_placeholder(Dimension::Year, years);
    sort_years_descending(&mut years);

    let lists = DimensionLists {
        countries: or_placeholder(Dimension::Country, countries),
        years,
        products: or_placeholder(Dimension::Product, products),
    };

    tracing::debug!(
        countries = lists.countries.len(),
        years = lists.years.len(),
        products = lists.products.len(),
        "dimension lists loaded"
    );

    lists
}
