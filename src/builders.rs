//! The four finance charts, built from sanitized datasets.

use crate::chart::{
    Axis, AxisScale, ChartConfig, ChartData, ChartKind, ChartOptions, Legend, Paint, Position,
    Scales, Series, TooltipRule, ValueLabelRule,
};
use crate::models::FinanceData;

/// Share of a product's revenue assumed to be cost. Not sourced from data.
pub const PRODUCT_COST_RATIO: f64 = 0.6;

pub mod palette {
    pub const MEMBERSHIP_BG: &str = "rgba(59, 130, 246, 0.6)";
    pub const MEMBERSHIP_BORDER: &str = "rgb(59, 130, 246)";
    pub const PRODUCT_BG: &str = "rgba(16, 185, 129, 0.6)";
    pub const PRODUCT_BORDER: &str = "rgb(16, 185, 129)";
    pub const MARGIN_BG: &str = "rgba(249, 115, 22, 0.2)";
    pub const MARGIN_BORDER: &str = "rgb(249, 115, 22)";
    pub const NET_BG: &str = "rgba(139, 92, 246, 0.6)";
    pub const NET_BORDER: &str = "rgb(139, 92, 246)";
    pub const COST_BG: &str = "#e5e7eb";
    pub const PLANS: [&str; 6] = [
        "rgba(59, 130, 246, 0.8)",
        "rgba(16, 185, 129, 0.8)",
        "rgba(249, 115, 22, 0.8)",
        "rgba(139, 92, 246, 0.8)",
        "rgba(236, 72, 153, 0.8)",
        "rgba(75, 85, 99, 0.8)",
    ];
}

/// Membership and product revenue bars with net revenue and margin lines.
pub fn revenue_trend(data: &FinanceData) -> ChartConfig {
    let periods = data.periods.len();

    let mut membership = Series::new(
        "Ingresos por Membresías",
        aligned(&data.membership_revenue, periods),
        Paint::Solid(palette::MEMBERSHIP_BG),
    );
    membership.border_color = Some(palette::MEMBERSHIP_BORDER);
    membership.border_width = Some(1);
    membership.order = Some(1);

    let mut products = Series::new(
        "Ingresos por Productos",
        aligned(&data.product_revenue, periods),
        Paint::Solid(palette::PRODUCT_BG),
    );
    products.border_color = Some(palette::PRODUCT_BORDER);
    products.border_width = Some(1);
    products.order = Some(1);

    let mut net = Series::new(
        "Ingresos Netos",
        aligned(&data.net_revenue, periods),
        Paint::Solid(palette::NET_BG),
    );
    net.kind = Some(ChartKind::Line);
    net.border_color = Some(palette::NET_BORDER);
    net.border_width = Some(2);
    net.tension = Some(0.4);
    net.point_radius = Some(4);
    net.fill = Some(false);
    net.order = Some(0);

    let mut margin = Series::new(
        "Margen de Ganancia",
        aligned(&data.margins, periods),
        Paint::Solid(palette::MARGIN_BG),
    );
    margin.kind = Some(ChartKind::Line);
    margin.border_color = Some(palette::MARGIN_BORDER);
    margin.border_width = Some(2);
    margin.border_dash = Some([5, 5]);
    margin.tension = Some(0.1);
    margin.point_radius = Some(3);
    margin.fill = Some(false);
    margin.order = Some(0);

    ChartConfig {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: data.periods.clone(),
            datasets: vec![membership, products, net, margin],
        },
        options: ChartOptions {
            index_interaction: true,
            scales: Some(Scales {
                x: AxisScale::plain(),
                y: AxisScale {
                    begin_at_zero: true,
                    grid_lines: true,
                    currency_ticks: true,
                    ..AxisScale::plain()
                },
            }),
            ..ChartOptions::default()
        },
        tooltip: TooltipRule::Currency,
        value_labels: ValueLabelRule::TrailingCurrency {
            points: 2,
            min: 1000.0,
        },
    }
}

/// Members per plan as a doughnut.
pub fn plan_distribution(data: &FinanceData) -> ChartConfig {
    let plans = data.plan_names.len();
    let mut members = Series::new(
        "Usuarios por plan",
        aligned(&data.plan_counts, plans),
        Paint::PerPoint(palette::PLANS.to_vec()),
    );
    members.border_color = Some("white");
    members.border_width = Some(2);
    members.hover_offset = Some(15);

    ChartConfig {
        kind: ChartKind::Doughnut,
        data: ChartData {
            labels: data.plan_names.clone(),
            datasets: vec![members],
        },
        options: ChartOptions {
            cutout: Some("50%"),
            legend: Legend {
                display: true,
                position: Some(Position::Right),
            },
            ..ChartOptions::default()
        },
        tooltip: TooltipRule::PlanShare {
            potential_income: data.plan_potential_income.clone(),
        },
        value_labels: ValueLabelRule::ShareOfTotal,
    }
}

/// Units sold per product as horizontal bars.
pub fn top_products(data: &FinanceData) -> ChartConfig {
    let products = data.product_names.len();
    let mut units = Series::new(
        "Unidades Vendidas",
        aligned(&data.product_quantities, products),
        Paint::Solid(palette::PRODUCT_BG),
    );
    units.border_color = Some(palette::PRODUCT_BORDER);
    units.border_width = Some(1);
    units.border_radius = Some(4);

    ChartConfig {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: data.product_names.clone(),
            datasets: vec![units],
        },
        options: ChartOptions {
            index_axis: Some(Axis::Y),
            legend: Legend {
                display: false,
                position: None,
            },
            scales: Some(Scales {
                x: AxisScale {
                    begin_at_zero: true,
                    ..AxisScale::plain()
                },
                y: AxisScale::plain(),
            }),
            ..ChartOptions::default()
        },
        tooltip: TooltipRule::Units { unit: "unidades" },
        value_labels: ValueLabelRule::Suffix { suffix: " uds." },
    }
}

/// Per-product revenue split into margin and an assumed cost.
pub fn product_breakdown(data: &FinanceData) -> ChartConfig {
    let products = data.product_names.len();
    let totals = aligned(&data.product_totals, products);
    let costs = totals.iter().map(|total| total * PRODUCT_COST_RATIO).collect();

    let mut margin = Series::new(
        "Margen",
        aligned(&data.product_margins, products),
        Paint::Solid(palette::MARGIN_BORDER),
    );
    margin.stack = Some("Stack 0");

    let mut cost = Series::new("Costo", costs, Paint::Solid(palette::COST_BG));
    cost.stack = Some("Stack 0");

    let stacked = AxisScale {
        stacked: true,
        ..AxisScale::plain()
    };

    ChartConfig {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: data.product_names.clone(),
            datasets: vec![margin, cost],
        },
        options: ChartOptions {
            index_axis: Some(Axis::Y),
            scales: Some(Scales {
                x: AxisScale {
                    begin_at_zero: true,
                    currency_ticks: true,
                    ..stacked.clone()
                },
                y: stacked,
            }),
            ..ChartOptions::default()
        },
        tooltip: TooltipRule::CurrencyWithTotal {
            totals: totals.clone(),
        },
        value_labels: ValueLabelRule::ShareOfCategory { series: 0, totals },
    }
}

/// Truncates or zero-pads a series to `len` points.
fn aligned(values: &[f64], len: usize) -> Vec<f64> {
    let mut out: Vec<f64> = values.iter().copied().take(len).collect();
    out.resize(len, 0.0);
    out
}
