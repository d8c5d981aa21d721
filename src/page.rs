use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Danger,
}

/// A visible message appended next to a chart mount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBlock {
    pub severity: Severity,
    pub title: String,
    pub hints: Vec<String>,
    pub detail: Option<String>,
    /// Carries a control that re-runs the page-ready sequence.
    pub retry: bool,
}

impl ErrorBlock {
    /// Shown on every mount when the charting scripts could not be loaded.
    pub fn load_failure() -> Self {
        Self {
            severity: Severity::Warning,
            title: "No se pudieron cargar las gráficas.".to_string(),
            hints: vec![
                "Intente recargar la página (presione F5)".to_string(),
                "Verifique su conexión a internet".to_string(),
                "Si el problema persiste, notifique al administrador del sistema".to_string(),
            ],
            detail: Some(
                "Detalles técnicos: Error al cargar las bibliotecas de gráficos JavaScript."
                    .to_string(),
            ),
            retry: true,
        }
    }

    pub fn missing_anchors(missing: &[String]) -> Self {
        Self {
            severity: Severity::Warning,
            title: "No se encontraron los datos de las gráficas.".to_string(),
            hints: vec!["Intente recargar la página (presione F5)".to_string()],
            detail: Some(format!("Elementos ausentes: {}", missing.join(", "))),
            retry: true,
        }
    }

    pub fn render_failure(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Danger,
            title: "Error al crear gráfico:".to_string(),
            hints: Vec::new(),
            detail: Some(message.into()),
            retry: false,
        }
    }
}

/// The parts of the host document the chart pipeline reads and writes.
pub trait Page {
    /// Value of the hidden field `id`, if the field exists.
    fn field(&self, id: &str) -> Option<String>;

    fn has_field(&self, id: &str) -> bool {
        self.field(id).is_some()
    }

    fn has_mount(&self, id: &str) -> bool;

    fn set_mount_hidden(&mut self, id: &str, hidden: bool);

    fn append_error(&mut self, id: &str, block: ErrorBlock);

    fn clear_errors(&mut self, id: &str);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MountState {
    pub hidden: bool,
    pub errors: Vec<ErrorBlock>,
}

/// In-memory page: hidden field values plus the state of each mount.
#[derive(Debug, Clone, Default)]
pub struct HostPage {
    fields: BTreeMap<String, String>,
    mounts: BTreeMap<String, MountState>,
}

impl HostPage {
    pub fn new<I, S>(fields: BTreeMap<String, String>, mounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields,
            mounts: mounts
                .into_iter()
                .map(|id| (id.into(), MountState::default()))
                .collect(),
        }
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn set_field(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(id.into(), value.into());
    }

    pub fn remove_field(&mut self, id: &str) {
        self.fields.remove(id);
    }

    pub fn remove_mount(&mut self, id: &str) {
        self.mounts.remove(id);
    }

    pub fn mount(&self, id: &str) -> Option<&MountState> {
        self.mounts.get(id)
    }

    pub fn mounts(&self) -> &BTreeMap<String, MountState> {
        &self.mounts
    }
}

impl Page for HostPage {
    fn field(&self, id: &str) -> Option<String> {
        self.fields.get(id).cloned()
    }

    fn has_mount(&self, id: &str) -> bool {
        self.mounts.contains_key(id)
    }

    fn set_mount_hidden(&mut self, id: &str, hidden: bool) {
        if let Some(mount) = self.mounts.get_mut(id) {
            mount.hidden = hidden;
        }
    }

    fn append_error(&mut self, id: &str, block: ErrorBlock) {
        if let Some(mount) = self.mounts.get_mut(id) {
            mount.errors.push(block);
        }
    }

    fn clear_errors(&mut self, id: &str) {
        if let Some(mount) = self.mounts.get_mut(id) {
            mount.errors.clear();
        }
    }
}
