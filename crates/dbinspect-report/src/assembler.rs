//! Report model assembly: module aggregate to widgets.
//!
//! Slots render in declared order. A failed slot becomes an error card, an
//! empty one a "no data found" card, anything else a table, cards or charts.
//! Assembly holds no state between calls: the same aggregate always yields
//! the same widgets.

use std::fmt::Display;
use std::sync::Arc;

use dbinspect_core::constants::{ERROR_CARD_PREFIX, NO_DATA_FOUND};
use dbinspect_core::errors::RenderError;
use dbinspect_core::models::{Card, Chart, ChartOptions, ChartPoint, ChartSeries, Table, Widget};
use dbinspect_observability::events;

use crate::aggregate::{ModuleAggregate, SlotResult};
use crate::palette;
use crate::subquery::{ChartLayout, Rows, SampleValue, SeriesSample};

/// Encodes the points of one series into their transport form.
pub trait SeriesEncoder: Send + Sync {
    fn encode(&self, label: &str, points: &[ChartPoint]) -> Result<String, RenderError>;
}

/// JSON array of `{x, y}` objects. Rejects non-finite values.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSeriesEncoder;

impl SeriesEncoder for JsonSeriesEncoder {
    fn encode(&self, label: &str, points: &[ChartPoint]) -> Result<String, RenderError> {
        if let Some(point) = points.iter().find(|p| !p.y.is_finite()) {
            return Err(RenderError::Serialization {
                series: label.to_string(),
                message: format!("non-finite value at {}", point.x),
            });
        }
        serde_json::to_string(points).map_err(|e| RenderError::Serialization {
            series: label.to_string(),
            message: e.to_string(),
        })
    }
}

/// Builds widgets from module aggregates.
#[derive(Clone)]
pub struct Assembler {
    encoder: Arc<dyn SeriesEncoder>,
}

impl Assembler {
    pub fn new() -> Self {
        Self::with_encoder(Arc::new(JsonSeriesEncoder))
    }

    pub fn with_encoder(encoder: Arc<dyn SeriesEncoder>) -> Self {
        Self { encoder }
    }

    /// Widgets of every slot, in declared slot order.
    pub fn assemble(&self, aggregate: &ModuleAggregate) -> Vec<Widget> {
        let mut widgets = Vec::new();
        for slot in &aggregate.slots {
            if let Some(err) = &slot.error {
                widgets.push(error_card(&slot.title, err));
                continue;
            }
            if slot.rows.is_empty() {
                widgets.push(no_data_card(&slot.title));
                continue;
            }
            match &slot.rows {
                Rows::Table { headers, rows } => widgets.push(Widget::Table(Table {
                    name: slot.title.clone(),
                    headers: headers.clone(),
                    rows: rows.clone(),
                })),
                Rows::Cards(cards) => widgets.extend(cards.iter().cloned().map(Widget::Card)),
                Rows::Series(samples) => {
                    widgets.extend(self.charts(&aggregate.module, slot, samples))
                }
            }
        }
        widgets
    }

    fn charts(&self, module: &str, slot: &SlotResult, samples: &[SeriesSample]) -> Vec<Widget> {
        let groups = group_series(samples);
        if groups.is_empty() {
            return vec![no_data_card(&slot.title)];
        }

        let options = ChartOptions::time_series(slot.unit.clone());
        let base_id = chart_id(&[module, &slot.name]);
        let mut charts = Vec::new();
        let mut combined = Vec::new();
        let mut failures = Vec::new();
        // Colors follow the index among series that rendered successfully.
        let mut rendered = 0usize;

        for (label, points) in groups {
            let id = match slot.layout {
                ChartLayout::Combined => base_id.clone(),
                ChartLayout::PerSeries => chart_id(&[module, &slot.name, &label]),
            };
            let data_json = match self.encoder.encode(&label, &points) {
                Ok(json) => json,
                Err(err) => {
                    events::series_dropped(&id, &label, &err.to_string());
                    failures.push(error_card(&format!("{} ({label})", slot.title), &err));
                    continue;
                }
            };

            let color = palette::color_for(rendered);
            rendered += 1;
            let series = ChartSeries {
                label: label.clone(),
                points,
                border_color: color.border.to_string(),
                background_color: color.background.to_string(),
                data_json,
            };
            match slot.layout {
                ChartLayout::Combined => combined.push(series),
                ChartLayout::PerSeries => charts.push(Widget::Chart(Chart {
                    id,
                    title: label,
                    series: vec![series],
                    options: options.clone(),
                })),
            }
        }

        if !combined.is_empty() {
            charts.push(Widget::Chart(Chart {
                id: base_id,
                title: slot.title.clone(),
                series: combined,
                options,
            }));
        }
        charts.extend(failures);
        charts
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

fn error_card(title: &str, err: &dyn Display) -> Widget {
    Widget::Card(Card::new(title, format!("{ERROR_CARD_PREFIX}: {err}")))
}

fn no_data_card(title: &str) -> Widget {
    Widget::Card(Card::new(title, NO_DATA_FOUND))
}

fn to_point(sample: &SeriesSample) -> Option<ChartPoint> {
    let x = sample.x?;
    let y = match &sample.y {
        SampleValue::Missing => return None,
        SampleValue::Number(v) => *v,
        SampleValue::Text(text) => text.trim().parse::<f64>().ok()?,
    };
    y.is_finite().then_some(ChartPoint { x, y })
}

/// Group samples by series key in first-appearance order, dropping invalid
/// points and series left without points.
fn group_series(samples: &[SeriesSample]) -> Vec<(String, Vec<ChartPoint>)> {
    let mut groups: Vec<(String, Vec<ChartPoint>)> = Vec::new();
    for sample in samples {
        let idx = match groups.iter().position(|(key, _)| *key == sample.series) {
            Some(idx) => idx,
            None => {
                groups.push((sample.series.clone(), Vec::new()));
                groups.len() - 1
            }
        };
        if let Some(point) = to_point(sample) {
            groups[idx].1.push(point);
        }
    }
    groups.retain(|(_, points)| !points.is_empty());
    groups
}

/// `chart-<part>-<part>...`, lower-case ASCII alphanumerics joined by dashes.
fn chart_id(parts: &[&str]) -> String {
    let mut id = String::from("chart");
    for part in parts {
        let mut pending_dash = true;
        for c in part.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_dash {
                    id.push('-');
                    pending_dash = false;
                }
                id.push(c.to_ascii_lowercase());
            } else {
                pending_dash = true;
            }
        }
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_id_slugs_every_part() {
        assert_eq!(
            chart_id(&["performance", "sysmetric", "Host CPU Utilization (%)"]),
            "chart-performance-sysmetric-host-cpu-utilization"
        );
    }

    #[test]
    fn text_values_parse_or_skip() {
        let base = SeriesSample {
            series: "s".to_string(),
            x: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)),
            y: SampleValue::Text(" 1.5 ".to_string()),
        };
        assert_eq!(to_point(&base).map(|p| p.y), Some(1.5));

        let junk = SeriesSample {
            y: SampleValue::Text("n/a".to_string()),
            ..base.clone()
        };
        assert!(to_point(&junk).is_none());

        let no_x = SeriesSample { x: None, ..base };
        assert!(to_point(&no_x).is_none());
    }
}
