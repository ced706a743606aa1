//! Response models, one per endpoint family.
//!
//! The API is loosely typed: numeric fields may be missing or null, years and
//! decades arrive as numbers or strings. Every numeric field is therefore an
//! `Option<f64>`, and label-like fields keep the raw JSON value.

use serde::Deserialize;
use serde_json::{Map, Value};

/// String form of a JSON scalar: strings verbatim, everything else in its
/// JSON representation.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Numeric reading of a JSON value. Numeric strings are accepted; anything
/// else is `None`.
pub fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Loose equality between a JSON scalar and a selected filter value, so that
/// `2020` and `"2020"` match.
pub fn scalar_matches(value: &Value, selected: &str) -> bool {
    match value {
        Value::String(text) => text == selected,
        Value::Number(_) => match (lenient_f64(value), selected.trim().parse::<f64>()) {
            (Some(left), Ok(right)) => (left - right).abs() < f64::EPSILON,
            _ => false,
        },
        _ => false,
    }
}

/// `{Year, production}` from `/api/trend/{country}/{product}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrendPoint {
    #[serde(rename = "Year", default)]
    pub year: Value,
    #[serde(default)]
    pub production: Option<f64>,
}

/// `{Entity, value}` from `/api/map/{year}/{product}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MapPoint {
    #[serde(rename = "Entity", default)]
    pub entity: String,
    #[serde(default)]
    pub value: Option<f64>,
}

/// A record whose keys are not known up front: yearly summaries, decade
/// summaries and per-country multi-product trends. Key order follows the
/// response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct DynamicRecord {
    pub fields: Map<String, Value>,
}

impl DynamicRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(lenient_f64)
    }

    /// The record's year, read from `Year` or `year`.
    pub fn year(&self) -> Option<&Value> {
        self.get("Year").or_else(|| self.get("year"))
    }

    /// Every field except the `Year` key, in response order.
    pub fn series_fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter().filter(|(key, _)| key.as_str() != "Year")
    }
}

/// Statistics for one product. `/api/stats` only fills `mean` and `std`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductStats {
    #[serde(default, deserialize_with = "lenient_option")]
    pub mean: Option<f64>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub std: Option<f64>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub max: Option<f64>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub lower_bound: Option<f64>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub upper_bound: Option<f64>,
}

/// `/api/stats`: product name to its mean/std, in response order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StatsSummary {
    pub products: Map<String, Value>,
}

impl StatsSummary {
    /// Per-product stats. Entries that are not objects read as all-`None`.
    pub fn entries(&self) -> Vec<(&str, ProductStats)> {
        self.products
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str(),
                    ProductStats::deserialize(value).unwrap_or_default(),
                )
            })
            .collect()
    }
}

/// One crop inside a bubble record.
#[derive(Debug, Clone, Deserialize)]
pub struct CropShare {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: Option<f64>,
}

/// Per-country aggregate from `/api/data/bubble`.
#[derive(Debug, Clone, Deserialize)]
pub struct BubbleRecord {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub total_production: Option<f64>,
    #[serde(default)]
    pub top_crops: Option<Vec<CropShare>>,
    #[serde(default)]
    pub area_harvested: Option<f64>,
    #[serde(rename = "yield", default)]
    pub crop_yield: Option<f64>,
}

/// Ranked region from `/api/top_producers`.
#[derive(Debug, Clone, Deserialize)]
pub struct TopProducer {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub production_value: Option<f64>,
}

/// A region with its absolute production, used in comparison responses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionProduction {
    pub region: String,
    pub production: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonDataset {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub data: Vec<Option<f64>>,
    #[serde(rename = "borderColor", default)]
    pub border_color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActualValues {
    pub max_production: f64,
    #[serde(default)]
    pub top_producers: Vec<RegionProduction>,
    pub selected_country: RegionProduction,
}

/// Successful `/api/data/compare/...` body. Values in `datasets` are
/// percentages of `actual_values.max_production`.
#[derive(Debug, Clone, Deserialize)]
pub struct Comparison {
    pub labels: Vec<String>,
    pub datasets: Vec<ComparisonDataset>,
    pub actual_values: ActualValues,
}

/// The compare endpoint answers either with data or with `{error}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ComparisonReply {
    Failed { error: String },
    Compared(Comparison),
}

fn lenient_option<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(lenient_f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_numbers_become_none() {
        let points: Vec<MapPoint> =
            serde_json::from_value(json!([{"Entity": "Chad"}, {"Entity": "Peru", "value": null}]))
                .unwrap();
        assert_eq!(points[0].entity, "Chad");
        assert!(points[0].value.is_none());
        assert!(points[1].value.is_none());
    }

    #[test]
    fn dynamic_records_keep_response_order() {
        let record: DynamicRecord = serde_json::from_value(json!({
            "Year": 1999,
            "Wheat_Production": 5.0,
            "Maize_Production": 7.5,
            "Apples_Production": null
        }))
        .unwrap();

        let keys: Vec<_> = record.series_fields().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, ["Wheat_Production", "Maize_Production", "Apples_Production"]);
        assert_eq!(record.number("Maize_Production"), Some(7.5));
        assert_eq!(record.year(), Some(&json!(1999)));
    }

    #[test]
    fn stats_accept_numeric_strings() {
        let summary: StatsSummary = serde_json::from_value(json!({
            "Maize_Production": {"mean": "12.5", "std": 3},
            "Rice_Production": "garbage"
        }))
        .unwrap();

        let entries = summary.entries();
        assert_eq!(entries[0].0, "Maize_Production");
        assert_eq!(entries[0].1.mean, Some(12.5));
        assert_eq!(entries[0].1.std, Some(3.0));
        assert!(entries[1].1.mean.is_none());
    }

    #[test]
    fn comparison_reply_distinguishes_errors() {
        let failed: ComparisonReply =
            serde_json::from_value(json!({"error": "Invalid product type"})).unwrap();
        assert!(matches!(
            failed,
            ComparisonReply::Failed { ref error } if error == "Invalid product type"
        ));

        let compared: ComparisonReply = serde_json::from_value(json!({
            "labels": ["China", "Kenya"],
            "datasets": [{"label": "Top Global Producers", "data": [100.0, 0], "borderColor": "rgb(75, 192, 192)"}],
            "actual_values": {
                "max_production": 200.0,
                "top_producers": [{"region": "China", "production": 200.0}],
                "selected_country": {"region": "Kenya", "production": 50.0}
            }
        }))
        .unwrap();
        let ComparisonReply::Compared(comparison) = compared else {
            panic!("expected comparison data");
        };
        assert_eq!(comparison.labels.len(), 2);
        assert_eq!(comparison.actual_values.selected_country.production, 50.0);
    }

    #[test]
    fn scalars_compare_loosely() {
        assert!(scalar_matches(&json!(2020), "2020"));
        assert!(scalar_matches(&json!("2020"), "2020"));
        assert!(!scalar_matches(&json!(2021), "2020"));
        assert!(!scalar_matches(&json!(null), ""));
        assert_eq!(scalar_text(&json!(1961)), "1961");
        assert_eq!(scalar_text(&json!("Chad")), "Chad");
    }
}
