//! Typed chart specifications, one builder per chart family.

pub mod describe;
pub mod spec;

pub use describe::{describe_chart, describe_table};
pub use spec::{
    percent_of, scaled_diameter, BarSeries, BarSpec, Bubble, BubbleSpec, ChartSpec,
    IndicatorSpec, LineSeries, LineSpec, MapRegion, MapSpec, MapStyle, Orientation, Projection,
    RadarDataset, RadarSpec, TreemapSpec, TreemapTile, ValueRow, ValuesTable,
};
