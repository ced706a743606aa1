use reqwest::Url;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://cmp419-unit2.onrender.com";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL {input:?}: {reason}")]
    InvalidBaseUrl { input: String, reason: String },
}

/// Builds request URLs for every endpoint the dashboard consumes.
///
/// Dynamic values are always encoded: path parameters as single path
/// segments (so `/` and spaces cannot change the route) and query values with
/// form encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    base: Url,
}

impl ApiBase {
    pub fn parse(input: &str) -> Result<Self, ApiError> {
        let base = Url::parse(input).map_err(|e| ApiError::InvalidBaseUrl {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl {
                input: input.to_string(),
                reason: "expected an http(s) URL".to_string(),
            });
        }

        Ok(Self { base })
    }

    pub const fn base(&self) -> &Url {
        &self.base
    }

    pub fn countries(&self) -> Url {
        self.path(&["api", "countries"])
    }

    pub fn years(&self) -> Url {
        self.path(&["api", "years"])
    }

    pub fn products(&self) -> Url {
        self.path(&["api", "products"])
    }

    pub fn trend(&self, country: &str, product: &str) -> Url {
        self.path(&["api", "trend", country, product])
    }

    pub fn map(&self, year: &str, product: &str) -> Url {
        self.path(&["api", "map", year, product])
    }

    /// All-products decade summary.
    pub fn decade_summary(&self) -> Url {
        self.path(&["api", "data", "decade"])
    }

    pub fn decade_for_product(&self, product: &str) -> Url {
        self.query(&["api", "data", "decade"], &[("product", product)])
    }

    pub fn yearly(&self) -> Url {
        self.path(&["api", "data", "yearly"])
    }

    /// Mean/std for every product.
    pub fn stats_summary(&self) -> Url {
        self.path(&["api", "stats"])
    }

    pub fn stats_for_product(&self, product: &str) -> Url {
        self.query(&["api", "data", "stats"], &[("product", product)])
    }

    pub fn country_trends(&self, country: &str) -> Url {
        self.path(&["api", "country-trends", country])
    }

    pub fn bubble(&self) -> Url {
        self.path(&["api", "data", "bubble"])
    }

    pub fn top_producers(&self, crop_type: &str) -> Url {
        self.query(&["api", "top_producers"], &[("crop_type", crop_type)])
    }

    pub fn compare(&self, country: &str, year: &str, product: &str) -> Url {
        self.path(&["api", "data", "compare", country, year, product])
    }

    fn path(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        // `parse` rejected cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn query(&self, segments: &[&str], pairs: &[(&str, &str)]) -> Url {
        let mut url = self.path(segments);
        url.query_pairs_mut().extend_pairs(pairs);
        url
    }
}
