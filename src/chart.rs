//! Chart configs in the charting library's JSON shape. Tooltip and label
//! callbacks are carried as data and evaluated here.

use crate::currency::format_cop;
use crate::sanitize::finite_or_zero;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Doughnut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    Solid(&'static str),
    PerPoint(Vec<&'static str>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub label: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ChartKind>,
    pub data: Vec<f64>,
    pub background_color: Paint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<[u8; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_offset: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u8>,
}

impl Series {
    pub fn new(label: impl Into<String>, data: Vec<f64>, background: Paint) -> Self {
        Self {
            label: label.into(),
            kind: None,
            data,
            background_color: background,
            border_color: None,
            border_width: None,
            border_dash: None,
            border_radius: None,
            tension: None,
            point_radius: None,
            fill: None,
            hover_offset: None,
            stack: None,
            order: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub display: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisScale {
    pub stacked: bool,
    pub begin_at_zero: bool,
    pub grid_lines: bool,
    pub currency_ticks: bool,
}

impl AxisScale {
    pub fn plain() -> Self {
        Self {
            stacked: false,
            begin_at_zero: false,
            grid_lines: false,
            currency_ticks: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub x: AxisScale,
    pub y: AxisScale,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_axis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutout: Option<&'static str>,
    pub legend: Legend,
    pub index_interaction: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            responsive: true,
            maintain_aspect_ratio: false,
            index_axis: None,
            cutout: None,
            legend: Legend {
                display: true,
                position: Some(Position::Top),
            },
            index_interaction: false,
            scales: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum TooltipRule {
    Currency,
    PlanShare { potential_income: Vec<f64> },
    Units { unit: &'static str },
    CurrencyWithTotal { totals: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValueLabelRule {
    /// Currency on the last `points` of each series, hidden below `min`.
    TrailingCurrency { points: usize, min: f64 },
    ShareOfTotal,
    Suffix { suffix: &'static str },
    /// Percentage of `totals[index]`, drawn only on `series`.
    ShareOfCategory { series: usize, totals: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
    pub tooltip: TooltipRule,
    pub value_labels: ValueLabelRule,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotations {
    pub tooltips: Vec<Vec<Vec<String>>>,
    pub footers: Vec<Option<String>>,
    pub value_labels: Vec<Vec<Option<String>>>,
}

impl ChartConfig {
    pub fn series(&self, index: usize) -> Option<&Series> {
        self.data.datasets.get(index)
    }

    pub fn category(&self, index: usize) -> &str {
        self.data.labels.get(index).map(String::as_str).unwrap_or("")
    }

    fn value(&self, series: usize, index: usize) -> f64 {
        self.series(series)
            .and_then(|s| s.data.get(index))
            .copied()
            .map(finite_or_zero)
            .unwrap_or(0.0)
    }

    pub fn tooltip_lines(&self, series: usize, index: usize) -> Vec<String> {
        let Some(dataset) = self.series(series) else {
            return Vec::new();
        };
        let value = self.value(series, index);
        match &self.tooltip {
            TooltipRule::Currency | TooltipRule::CurrencyWithTotal { .. } => {
                vec![format!("{}: {}", dataset.label, format_cop(value))]
            }
            TooltipRule::PlanShare { potential_income } => {
                let percent = share_percent(value, series_total(&dataset.data));
                let potential = potential_income.get(index).copied().unwrap_or(0.0);
                vec![
                    format!("{}: {} usuarios ({percent}%)", self.category(index), number(value)),
                    format!("Ingreso potencial: {}", format_cop(potential)),
                ]
            }
            TooltipRule::Units { unit } => {
                vec![format!("{}: {} {unit}", dataset.label, number(value))]
            }
        }
    }

    pub fn tooltip_footer(&self, index: usize) -> Option<String> {
        match &self.tooltip {
            TooltipRule::CurrencyWithTotal { totals } => {
                let total = totals.get(index).copied().unwrap_or(0.0);
                Some(format!("Total: {}", format_cop(total)))
            }
            _ => None,
        }
    }

    pub fn value_label(&self, series: usize, index: usize) -> Option<String> {
        let dataset = self.series(series)?;
        if index >= dataset.data.len() {
            return None;
        }
        let value = self.value(series, index);
        match &self.value_labels {
            ValueLabelRule::TrailingCurrency { points, min } => {
                let first_shown = dataset.data.len().saturating_sub(*points);
                if index < first_shown || value < *min {
                    return None;
                }
                Some(format_cop(value))
            }
            ValueLabelRule::ShareOfTotal => {
                Some(format!("{}%", share_percent(value, series_total(&dataset.data))))
            }
            ValueLabelRule::Suffix { suffix } => Some(format!("{}{suffix}", number(value))),
            ValueLabelRule::ShareOfCategory { series: shown, totals } => {
                let total = totals.get(index).copied().unwrap_or(0.0);
                if series != *shown || value == 0.0 || total == 0.0 {
                    return None;
                }
                Some(format!("{}%", share_percent(value, total)))
            }
        }
    }

    pub fn annotations(&self) -> Annotations {
        let points = self.data.labels.len();
        let series = 0..self.data.datasets.len();
        Annotations {
            tooltips: series
                .clone()
                .map(|s| (0..points).map(|i| self.tooltip_lines(s, i)).collect())
                .collect(),
            footers: (0..points).map(|i| self.tooltip_footer(i)).collect(),
            value_labels: series
                .map(|s| (0..points).map(|i| self.value_label(s, i)).collect())
                .collect(),
        }
    }
}

/// Rounded percentage of `total`; a zero total yields `0`.
pub fn share_percent(value: f64, total: f64) -> i64 {
    if total == 0.0 || !total.is_finite() {
        return 0;
    }
    (value / total * 100.0).round() as i64
}

fn series_total(data: &[f64]) -> f64 {
    data.iter().copied().map(finite_or_zero).sum()
}

fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
