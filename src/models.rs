use crate::chart::{Annotations, ChartConfig};
use crate::page::{HostPage, MountState, Page};
use crate::render::Plugin;
use crate::sanitize::{labels, numbers};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub mod fields {
    pub const PERIODS: &str = "datos-meses";
    pub const MEMBERSHIP_REVENUE: &str = "datos-ingresos-membresias";
    pub const PRODUCT_REVENUE: &str = "datos-ingresos-productos";
    pub const MARGINS: &str = "datos-margenes";
    pub const NET_REVENUE: &str = "datos-ingresos-netos";
    pub const PLAN_NAMES: &str = "datos-planes-nombres";
    pub const PLAN_COUNTS: &str = "datos-planes";
    pub const PLAN_POTENTIAL_INCOME: &str = "datos-ingresos-potenciales-plan";
    pub const PRODUCT_NAMES: &str = "datos-productos-nombres";
    pub const PRODUCT_QUANTITIES: &str = "datos-productos-cantidades";
    pub const PRODUCT_TOTALS: &str = "datos-productos-ingresos";
    pub const PRODUCT_MARGINS: &str = "datos-productos-margenes";

    pub const ALL: [&str; 12] = [
        PERIODS,
        MEMBERSHIP_REVENUE,
        PRODUCT_REVENUE,
        MARGINS,
        NET_REVENUE,
        PLAN_NAMES,
        PLAN_COUNTS,
        PLAN_POTENTIAL_INCOME,
        PRODUCT_NAMES,
        PRODUCT_QUANTITIES,
        PRODUCT_TOTALS,
        PRODUCT_MARGINS,
    ];
}

pub mod mounts {
    pub const REVENUE_TREND: &str = "graficoIngresos";
    pub const PLAN_DISTRIBUTION: &str = "graficoPlan";
    pub const TOP_PRODUCTS: &str = "graficoProductos";
    pub const PRODUCT_BREAKDOWN: &str = "graficoIngresosProductos";

    pub const ALL: [&str; 4] = [REVENUE_TREND, PLAN_DISTRIBUTION, TOP_PRODUCTS, PRODUCT_BREAKDOWN];
}

const DEFAULT_PERIODS: [&str; 6] = ["Ene", "Feb", "Mar", "Abr", "May", "Jun"];
const DEFAULT_SERIES: [f64; 6] = [0.0; 6];

/// Every dataset the finance charts draw from, sanitized.
#[derive(Debug, Clone, PartialEq)]
pub struct FinanceData {
    pub periods: Vec<String>,
    pub membership_revenue: Vec<f64>,
    pub product_revenue: Vec<f64>,
    pub margins: Vec<f64>,
    pub net_revenue: Vec<f64>,
    pub plan_names: Vec<String>,
    pub plan_counts: Vec<f64>,
    pub plan_potential_income: Vec<f64>,
    pub product_names: Vec<String>,
    pub product_quantities: Vec<f64>,
    pub product_totals: Vec<f64>,
    pub product_margins: Vec<f64>,
}

impl FinanceData {
    /// Reads and sanitizes every hidden field. Missing fields read as empty
    /// and fall back to their defaults.
    pub fn extract<P: Page>(page: &P) -> Self {
        let raw = |id: &str| page.field(id).unwrap_or_default();
        Self {
            periods: labels(&raw(fields::PERIODS), &DEFAULT_PERIODS),
            membership_revenue: numbers(&raw(fields::MEMBERSHIP_REVENUE), &DEFAULT_SERIES),
            product_revenue: numbers(&raw(fields::PRODUCT_REVENUE), &DEFAULT_SERIES),
            margins: numbers(&raw(fields::MARGINS), &DEFAULT_SERIES),
            net_revenue: numbers(&raw(fields::NET_REVENUE), &DEFAULT_SERIES),
            plan_names: labels(&raw(fields::PLAN_NAMES), &["Sin datos"]),
            plan_counts: numbers(&raw(fields::PLAN_COUNTS), &[1.0]),
            plan_potential_income: numbers(&raw(fields::PLAN_POTENTIAL_INCOME), &[0.0]),
            product_names: labels(&raw(fields::PRODUCT_NAMES), &["Sin ventas"]),
            product_quantities: numbers(&raw(fields::PRODUCT_QUANTITIES), &[0.0]),
            product_totals: numbers(&raw(fields::PRODUCT_TOTALS), &[0.0]),
            product_margins: numbers(&raw(fields::PRODUCT_MARGINS), &[0.0]),
        }
    }
}

/// On-disk snapshot of the host page's hidden fields.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PageSnapshot {
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl PageSnapshot {
    /// The served page always renders every hidden input; fields the
    /// snapshot lacks are rendered empty and sanitize to their defaults.
    pub fn into_page(self) -> HostPage {
        let mut fields = self.fields;
        for id in fields::ALL {
            fields.entry(id.to_string()).or_default();
        }
        HostPage::new(fields, mounts::ALL)
    }
}

#[derive(Debug, Deserialize)]
pub struct FieldsUpdate {
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    NotLoaded,
    Loading,
    Ready,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolvedSources {
    pub library: Option<String>,
    pub plugin: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub id: u64,
    pub config: Value,
    pub annotations: Annotations,
}

#[derive(Debug, Serialize)]
pub struct MountView {
    pub mount: String,
    pub chart: Option<ChartView>,
    #[serde(flatten)]
    pub state: MountState,
}

#[derive(Debug, Serialize)]
pub struct ChartsResponse {
    pub generated_at: String,
    pub state: LoadState,
    pub sources: ResolvedSources,
    pub plugins: Vec<Plugin>,
    pub mounts: Vec<MountView>,
}

impl ChartView {
    pub fn new(id: u64, config: &ChartConfig) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id,
            config: serde_json::to_value(config)?,
            annotations: config.annotations(),
        })
    }
}
