pub mod query_spec;
pub mod report;
pub mod subquery_result;
pub mod widget;

pub use query_spec::QuerySpec;
pub use report::{Report, Section};
pub use subquery_result::SubQueryResult;
pub use widget::{
    AxisKind, AxisOptions, Card, Chart, ChartOptions, ChartPoint, ChartSeries, LegendOptions,
    LegendPosition, Table, Widget, WidgetKind,
};
