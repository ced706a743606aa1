use serde::Serialize;

use crate::format::option_label;

/// One of the three independent filter axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Country,
    Year,
    Product,
}

impl Dimension {
    pub const ALL: [Self; 3] = [Self::Country, Self::Year, Self::Product];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Year => "year",
            Self::Product => "product",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Country),
            1 => Some(Self::Year),
            2 => Some(Self::Product),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Country => 0,
            Self::Year => 1,
            Self::Product => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Country => "Country",
            Self::Year => "Year",
            Self::Product => "Product",
        }
    }

    /// Text of the empty-valued option every control starts with.
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Country => "Select Country",
            Self::Year => "Select Year",
            Self::Product => "Select Product",
        }
    }
}

/// Snapshot of the selected filter values. Empty string means "not selected".
///
/// A new snapshot is built for every change event; nothing mutates one after
/// it has been handed to an orchestration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub country: String,
    pub year: String,
    pub product: String,
}

impl FilterState {
    pub fn new(
        country: impl Into<String>,
        year: impl Into<String>,
        product: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            year: year.into(),
            product: product.into(),
        }
    }

    pub fn get(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Country => &self.country,
            Dimension::Year => &self.year,
            Dimension::Product => &self.product,
        }
    }

    /// The value for `dimension`, or `None` when it is empty.
    pub fn selected(&self, dimension: Dimension) -> Option<&str> {
        let value = self.get(dimension);
        (!value.is_empty()).then_some(value)
    }

    pub fn has(&self, dimension: Dimension) -> bool {
        self.selected(dimension).is_some()
    }
}

/// One selectable value of a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionOption {
    /// Raw value, used verbatim in requests.
    pub value: String,
    /// Display text.
    pub label: String,
}

impl DimensionOption {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let label = option_label(&value);
        Self { value, label }
    }
}

/// A selection control: a placeholder entry followed by the fetched options.
///
/// Index 0 is always the placeholder, so `selected == 0` means the empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectControl {
    pub dimension: Dimension,
    pub options: Vec<DimensionOption>,
    pub selected: usize,
}

impl SelectControl {
    pub const fn empty(dimension: Dimension) -> Self {
        Self {
            dimension,
            options: Vec::new(),
            selected: 0,
        }
    }

    /// Replaces the options, resetting the selection to the placeholder.
    pub fn populate<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = values.into_iter().map(DimensionOption::new).collect();
        self.selected = 0;
    }

    /// Number of entries including the placeholder.
    pub fn len(&self) -> usize {
        self.options.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn value(&self) -> &str {
        self.selected
            .checked_sub(1)
            .and_then(|index| self.options.get(index))
            .map_or("", |option| option.value.as_str())
    }

    pub fn label(&self) -> &str {
        self.selected
            .checked_sub(1)
            .and_then(|index| self.options.get(index))
            .map_or(self.dimension.placeholder(), |option| option.label.as_str())
    }

    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.options.len());
    }

    /// Selects the option whose raw value equals `value`. An empty or unknown
    /// value selects the placeholder. Returns whether a real option matched.
    pub fn select_value(&mut self, value: &str) -> bool {
        match self.options.iter().position(|option| option.value == value) {
            Some(index) if !value.is_empty() => {
                self.selected = index + 1;
                true
            }
            _ => {
                self.selected = 0;
                false
            }
        }
    }
}

/// The three controls, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterControls {
    pub country: SelectControl,
    pub year: SelectControl,
    pub product: SelectControl,
}

impl Default for FilterControls {
    fn default() -> Self {
        Self {
            country: SelectControl::empty(Dimension::Country),
            year: SelectControl::empty(Dimension::Year),
            product: SelectControl::empty(Dimension::Product),
        }
    }
}

impl FilterControls {
    pub const fn control(&self, dimension: Dimension) -> &SelectControl {
        match dimension {
            Dimension::Country => &self.country,
            Dimension::Year => &self.year,
            Dimension::Product => &self.product,
        }
    }

    pub fn control_mut(&mut self, dimension: Dimension) -> &mut SelectControl {
        match dimension {
            Dimension::Country => &mut self.country,
            Dimension::Year => &mut self.year,
            Dimension::Product => &mut self.product,
        }
    }

    /// Builds a fresh snapshot from the controls' current values.
    pub fn filter_state(&self) -> FilterState {
        FilterState::new(
            self.country.value(),
            self.year.value(),
            self.product.value(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_selected_after_populate() {
        let mut control = SelectControl::empty(Dimension::Product);
        control.populate(["Maize_Production", "Wheat"]);

        assert_eq!(control.len(), 3);
        assert_eq!(control.value(), "");
        assert_eq!(control.label(), "Select Product");
    }

    #[test]
    fn option_values_stay_verbatim() {
        let mut control = SelectControl::empty(Dimension::Product);
        control.populate(["Maize_Production", "Wheat", "Rice Paddy"]);

        let values: Vec<_> = control.options.iter().map(|o| o.value.as_str()).collect();
        let labels: Vec<_> = control.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(values, ["Maize_Production", "Wheat", "Rice Paddy"]);
        assert_eq!(labels, ["Maize Production", "Wheat", "Rice Paddy"]);
    }

    #[test]
    fn select_value_falls_back_to_placeholder() {
        let mut control = SelectControl::empty(Dimension::Country);
        control.populate(["France", "Kenya"]);

        assert!(control.select_value("Kenya"));
        assert_eq!(control.value(), "Kenya");

        assert!(!control.select_value("Atlantis"));
        assert_eq!(control.value(), "");
    }

    #[test]
    fn snapshot_is_rebuilt_from_all_controls() {
        let mut controls = FilterControls::default();
        controls.country.populate(["France"]);
        controls.year.populate(["2020", "2019"]);
        controls.product.populate(["Wheat_Production"]);

        controls.year.select(2);
        assert_eq!(controls.filter_state(), FilterState::new("", "2019", ""));

        controls.country.select(1);
        controls.product.select(1);
        assert_eq!(
            controls.filter_state(),
            FilterState::new("France", "2019", "Wheat_Production")
        );
    }

    #[test]
    fn selected_treats_empty_as_missing() {
        let filters = FilterState::new("", "2020", "");
        assert_eq!(filters.selected(Dimension::Year), Some("2020"));
        assert!(!filters.has(Dimension::Country));
    }
}
