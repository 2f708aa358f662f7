use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::CHART_TOOLTIP_FORMAT;

/// Shape a sub-query renders into when it succeeds with data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Table,
    Chart,
    ScalarCard,
}

/// A key-value card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub value: String,
}

impl Card {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: NaiveDateTime,
    pub y: f64,
}

/// One labelled line of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<ChartPoint>,
    pub border_color: String,
    pub background_color: String,
    /// Transport-ready encoding of `points`.
    pub data_json: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Time,
    Linear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisOptions {
    pub kind: AxisKind,
    pub title: Option<String>,
    pub tooltip_format: Option<String>,
    pub begin_at_zero: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendOptions {
    pub display: bool,
    pub position: LegendPosition,
}

/// Axis and legend configuration of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub x_axis: AxisOptions,
    pub y_axis: AxisOptions,
    pub legend: LegendOptions,
}

impl ChartOptions {
    /// Time on x, values from zero on y, legend on top.
    pub fn time_series(y_title: Option<String>) -> Self {
        Self {
            x_axis: AxisOptions {
                kind: AxisKind::Time,
                title: None,
                tooltip_format: Some(CHART_TOOLTIP_FORMAT.to_string()),
                begin_at_zero: false,
            },
            y_axis: AxisOptions {
                kind: AxisKind::Linear,
                title: y_title,
                tooltip_format: None,
                begin_at_zero: true,
            },
            legend: LegendOptions {
                display: true,
                position: LegendPosition::Top,
            },
        }
    }
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self::time_series(None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub id: String,
    pub title: String,
    pub series: Vec<ChartSeries>,
    pub options: ChartOptions,
}

/// A renderable unit of a report section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Widget {
    Card(Card),
    Table(Table),
    Chart(Chart),
}

impl Widget {
    pub fn as_card(&self) -> Option<&Card> {
        match self {
            Widget::Card(card) => Some(card),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Widget::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_chart(&self) -> Option<&Chart> {
        match self {
            Widget::Chart(chart) => Some(chart),
            _ => None,
        }
    }
}
