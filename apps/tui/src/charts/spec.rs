use serde::Serialize;

/// Smallest bubble diameter; every bubble grows from here by up to
/// [`BUBBLE_RANGE`] in proportion to its share of the largest value.
pub const BUBBLE_BASE: f64 = 10.0;
pub const SELECTED_BUBBLE_BASE: f64 = 25.0;
pub const BUBBLE_RANGE: f64 = 50.0;

/// A chart ready to hand to a drawing backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ChartSpec {
    Map(MapSpec),
    Bar(BarSpec),
    Lines(LineSpec),
    Treemap(TreemapSpec),
    Bubble(BubbleSpec),
    Indicator(IndicatorSpec),
    Radar(RadarSpec),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            Self::Map(spec) => &spec.title,
            Self::Bar(spec) => &spec.title,
            Self::Lines(spec) => &spec.title,
            Self::Treemap(spec) => &spec.title,
            Self::Bubble(spec) => &spec.title,
            Self::Indicator(spec) => &spec.title,
            Self::Radar(spec) => &spec.title,
        }
    }
}

/// `base + value / max * 50`, the marker diameter used by both bubble charts.
pub fn scaled_diameter(base: f64, value: Option<f64>, max: f64) -> Option<f64> {
    let value = value?;
    if max > 0.0 {
        Some(base + value / max * BUBBLE_RANGE)
    } else {
        Some(base)
    }
}

fn max_present(values: impl IntoIterator<Item = Option<f64>>) -> f64 {
    values
        .into_iter()
        .flatten()
        .filter(|value| value.is_finite())
        .fold(f64::NEG_INFINITY, f64::max)
}

// ---------------------------------------------------------------------------
// Maps

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    NaturalEarth,
    Mercator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MapStyle {
    Choropleth,
    Bubble,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapRegion {
    /// Country name as used for location matching.
    pub name: String,
    pub value: Option<f64>,
    /// Marker diameter, bubble maps only.
    pub marker_size: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSpec {
    pub title: String,
    pub style: MapStyle,
    pub projection: Projection,
    pub regions: Vec<MapRegion>,
    /// Index into `regions` of the highlighted country.
    pub selected: Option<usize>,
    pub max_value: Option<f64>,
}

impl MapSpec {
    /// Country-shaded map, one region per point.
    pub fn choropleth<I>(title: impl Into<String>, points: I, highlight: Option<&str>) -> Self
    where
        I: IntoIterator<Item = (String, Option<f64>)>,
    {
        Self::build(
            title.into(),
            MapStyle::Choropleth,
            Projection::NaturalEarth,
            points,
            highlight,
        )
    }

    /// Proportional-symbol map. The highlighted country's marker uses the
    /// larger selected base size.
    pub fn bubbles<I>(title: impl Into<String>, points: I, highlight: Option<&str>) -> Self
    where
        I: IntoIterator<Item = (String, Option<f64>)>,
    {
        let mut spec = Self::build(
            title.into(),
            MapStyle::Bubble,
            Projection::Mercator,
            points,
            highlight,
        );
        let max = spec.max_value.unwrap_or(0.0);
        for (index, region) in spec.regions.iter_mut().enumerate() {
            let base = if spec.selected == Some(index) {
                SELECTED_BUBBLE_BASE
            } else {
                BUBBLE_BASE
            };
            region.marker_size = scaled_diameter(base, region.value, max);
        }
        spec
    }

    fn build<I>(
        title: String,
        style: MapStyle,
        projection: Projection,
        points: I,
        highlight: Option<&str>,
    ) -> Self
    where
        I: IntoIterator<Item = (String, Option<f64>)>,
    {
        let regions: Vec<MapRegion> = points
            .into_iter()
            .map(|(name, value)| MapRegion {
                name,
                value,
                marker_size: None,
            })
            .collect();

        let selected = highlight
            .filter(|name| !name.is_empty())
            .and_then(|name| regions.iter().position(|region| region.name == name));
        let max = max_present(regions.iter().map(|region| region.value));

        Self {
            title,
            style,
            projection,
            regions,
            selected,
            max_value: max.is_finite().then_some(max),
        }
    }

    pub fn selected_region(&self) -> Option<&MapRegion> {
        self.selected.and_then(|index| self.regions.get(index))
    }
}

// ---------------------------------------------------------------------------
// Bars

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: Option<String>,
    pub color: String,
    /// One value per category.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub orientation: Orientation,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
}

impl BarSpec {
    pub fn new(title: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            title: title.into(),
            x_title: String::new(),
            y_title: String::new(),
            orientation: Orientation::Vertical,
            categories,
            series: Vec::new(),
        }
    }

    /// A chart with one unnamed series.
    pub fn single(
        title: impl Into<String>,
        categories: Vec<String>,
        values: Vec<Option<f64>>,
        color: &str,
    ) -> Self {
        Self::new(title, categories).series(None, color, values)
    }

    #[must_use]
    pub fn series(mut self, name: Option<String>, color: &str, values: Vec<Option<f64>>) -> Self {
        self.series.push(BarSeries {
            name,
            color: color.to_string(),
            values,
        });
        self
    }

    #[must_use]
    pub fn axes(mut self, x_title: impl Into<String>, y_title: impl Into<String>) -> Self {
        self.x_title = x_title.into();
        self.y_title = y_title.into();
        self
    }

    #[must_use]
    pub fn horizontal(mut self) -> Self {
        self.orientation = Orientation::Horizontal;
        self
    }

    pub fn max_value(&self) -> Option<f64> {
        let max = max_present(
            self.series
                .iter()
                .flat_map(|series| series.values.iter().copied()),
        );
        max.is_finite().then_some(max)
    }
}

// ---------------------------------------------------------------------------
// Multi-series lines

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub color: Option<String>,
    pub points: Vec<(f64, Option<f64>)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<LineSeries>,
}

impl LineSpec {
    pub fn new(
        title: impl Into<String>,
        x_title: impl Into<String>,
        y_title: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_title: x_title.into(),
            y_title: y_title.into(),
            series: Vec::new(),
        }
    }

    #[must_use]
    pub fn series(
        mut self,
        name: impl Into<String>,
        color: Option<&str>,
        points: Vec<(f64, Option<f64>)>,
    ) -> Self {
        self.series.push(LineSeries {
            name: name.into(),
            color: color.map(str::to_string),
            points,
        });
        self
    }

    fn bounds(&self, pick: impl Fn(&(f64, Option<f64>)) -> Option<f64>) -> Option<[f64; 2]> {
        let (min, max) = self
            .series
            .iter()
            .flat_map(|series| series.points.iter())
            .filter_map(pick)
            .filter(|value| value.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
                (lo.min(value), hi.max(value))
            });
        (min <= max).then_some([min, max])
    }

    pub fn x_bounds(&self) -> Option<[f64; 2]> {
        self.bounds(|point| Some(point.0))
    }

    pub fn y_bounds(&self) -> Option<[f64; 2]> {
        self.bounds(|point| point.1)
    }
}

// ---------------------------------------------------------------------------
// Treemap

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapTile {
    pub label: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapSpec {
    pub title: String,
    /// Parent label shared by every tile.
    pub root: String,
    pub tiles: Vec<TreemapTile>,
}

impl TreemapSpec {
    pub fn total(&self) -> f64 {
        self.tiles.iter().filter_map(|tile| tile.value).sum()
    }

    /// Share of the total for one tile, in `[0, 1]` when values are positive.
    pub fn share(&self, tile: &TreemapTile) -> Option<f64> {
        let total = self.total();
        tile.value.filter(|_| total > 0.0).map(|value| value / total)
    }
}

// ---------------------------------------------------------------------------
// Bubble scatter

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bubble {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub diameter: Option<f64>,
    pub color_index: usize,
    /// Tooltip lines.
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleSpec {
    pub title: String,
    pub bubbles: Vec<Bubble>,
}

impl BubbleSpec {
    /// Lays `entries` out on a sunflower spiral inside `[0, 100]²` so that
    /// positions are stable between runs. Entries are `(label, value, details)`.
    pub fn spiral<I>(title: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<f64>, Vec<String>)>,
    {
        const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

        let entries: Vec<_> = entries.into_iter().collect();
        let max = max_present(entries.iter().map(|entry| entry.1));
        let count = entries.len().max(1) as f64;

        let bubbles = entries
            .into_iter()
            .enumerate()
            .map(|(index, (label, value, details))| {
                let position = index as f64;
                let radius = 45.0 * ((position + 0.5) / count).sqrt();
                let angle = position * GOLDEN_ANGLE;
                Bubble {
                    label,
                    x: angle.cos().mul_add(radius, 50.0),
                    y: angle.sin().mul_add(radius, 50.0),
                    diameter: scaled_diameter(BUBBLE_BASE, value, max),
                    color_index: index * 10,
                    details,
                }
            })
            .collect();

        Self {
            title: title.into(),
            bubbles,
        }
    }
}

// ---------------------------------------------------------------------------
// Indicator

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSpec {
    pub title: String,
    pub subtitle: Option<String>,
    pub value: Option<f64>,
    /// Delta is shown relative to this value.
    pub reference: Option<f64>,
    /// Shaded gauge band.
    pub band: Option<(f64, f64)>,
    pub suffix: String,
}

impl IndicatorSpec {
    pub fn delta(&self) -> Option<f64> {
        Some(self.value? - self.reference?)
    }

    /// Position of `value` inside `band`, clamped to `[0, 1]`.
    pub fn band_ratio(&self) -> Option<f64> {
        let (low, high) = self.band?;
        let value = self.value?;
        if high > low {
            Some(((value - low) / (high - low)).clamp(0.0, 1.0))
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Radar

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarDataset {
    pub label: String,
    /// Percent of `RadarSpec::max_production`, one per axis label.
    pub values: Vec<Option<f64>>,
    pub border_color: Option<String>,
    pub fill_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarSpec {
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<RadarDataset>,
    pub max_production: f64,
}

impl RadarSpec {
    /// Converts a plotted percentage back to tonnes for tooltips.
    pub fn actual_value(&self, percent: f64) -> f64 {
        percent / 100.0 * self.max_production
    }
}

// ---------------------------------------------------------------------------
// Actual values table

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueRow {
    pub region: String,
    pub production: f64,
    pub percent_of_max: Option<f64>,
    pub highlight: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuesTable {
    pub title: String,
    pub max_production: f64,
    pub rows: Vec<ValueRow>,
}

/// `production / max * 100`, absent when `max` is not positive.
pub fn percent_of(production: f64, max: f64) -> Option<f64> {
    (max > 0.0).then(|| production / max * 100.0)
}

impl ValuesTable {
    /// Top producers in order, then the highlighted selected region.
    pub fn new<I>(max_production: f64, top: I, selected: (String, f64)) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let row = |(region, production): (String, f64), highlight| ValueRow {
            region,
            production,
            percent_of_max: percent_of(production, max_production),
            highlight,
        };

        let mut rows: Vec<ValueRow> = top.into_iter().map(|entry| row(entry, false)).collect();
        rows.push(row(selected, true));

        Self {
            title: "Actual Production Values".to_string(),
            max_production,
            rows,
        }
    }
}
