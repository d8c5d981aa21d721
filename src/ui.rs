use crate::dashboard::Dashboard;
use crate::loader::ScriptHost;
use crate::models::mounts;
use crate::page::{ErrorBlock, HostPage, MountState, Severity};
use crate::render::SnapshotRenderer;

const CARDS: [(&str, &str); 4] = [
    (mounts::REVENUE_TREND, "Ingresos y márgenes"),
    (mounts::PLAN_DISTRIBUTION, "Distribución por plan"),
    (mounts::TOP_PRODUCTS, "Productos más vendidos"),
    (mounts::PRODUCT_BREAKDOWN, "Ingresos por producto"),
];

pub fn render_index<S: ScriptHost>(board: &Dashboard<HostPage, SnapshotRenderer, S>) -> String {
    let page = board.page();

    let fields: String = page
        .fields()
        .iter()
        .map(|(id, value)| {
            format!(
                "  <input type=\"hidden\" id=\"{}\" value=\"{}\" />\n",
                escape_html(id),
                escape_html(value)
            )
        })
        .collect();

    let cards: String = CARDS
        .iter()
        .map(|(mount, title)| render_card(mount, title, page.mount(mount)))
        .collect();

    let sources = board.sources();
    let scripts: String = [&sources.library, &sources.plugin]
        .into_iter()
        .flatten()
        .map(|src| format!("  <script src=\"{}\"></script>\n", escape_html(src)))
        .collect();

    INDEX_HTML
        .replace("{{FIELDS}}", &fields)
        .replace("{{CARDS}}", &cards)
        .replace("{{SCRIPTS}}", &scripts)
}

fn render_card(mount: &str, title: &str, state: Option<&MountState>) -> String {
    let hidden = state.is_some_and(|s| s.hidden);
    let errors: String = state
        .map(|s| s.errors.iter().map(render_error).collect())
        .unwrap_or_default();
    format!(
        r#"      <article class="chart-card">
        <h2>{title}</h2>
        <div class="chart-box">
          <canvas id="{mount}"{style}></canvas>
        </div>
{errors}      </article>
"#,
        title = escape_html(title),
        mount = escape_html(mount),
        style = if hidden { " style=\"display:none\"" } else { "" },
    )
}

fn render_error(block: &ErrorBlock) -> String {
    let class = match block.severity {
        Severity::Warning => "alert alert-warning",
        Severity::Danger => "alert alert-danger",
    };
    let hints = if block.hints.is_empty() {
        String::new()
    } else {
        let items: String = block
            .hints
            .iter()
            .map(|hint| format!("<li>{}</li>", escape_html(hint)))
            .collect();
        format!("Posibles soluciones:<ul>{items}</ul>")
    };
    let detail = block
        .detail
        .as_deref()
        .map(|detail| format!("<small>{}</small>", escape_html(detail)))
        .unwrap_or_default();
    let retry = if block.retry {
        r#"<button type="button" class="btn-retry" data-action="retry">Reintentar</button>"#
    } else {
        ""
    };
    format!(
        "        <div class=\"{class}\"><strong>{}</strong><br />{hints}{detail}</div>{retry}\n",
        escape_html(&block.title)
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>GymTrack · Finanzas</title>
  <style>
    :root {
      --bg: #f4f6fb;
      --ink: #1f2937;
      --muted: #6b7280;
      --card: #ffffff;
      --accent: rgb(59, 130, 246);
      --shadow: 0 16px 40px rgba(31, 41, 55, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 32px 18px 48px;
    }

    header {
      max-width: 1100px;
      margin: 0 auto 24px;
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 16px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 3vw, 2.2rem);
    }

    .grid {
      max-width: 1100px;
      margin: 0 auto;
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 20px;
    }

    .chart-card {
      background: var(--card);
      border-radius: 18px;
      box-shadow: var(--shadow);
      padding: 20px;
    }

    .chart-card h2 {
      margin: 0 0 12px;
      font-size: 1.05rem;
      color: var(--muted);
    }

    .chart-box {
      position: relative;
      height: 300px;
    }

    button {
      appearance: none;
      border: 1px solid var(--accent);
      background: transparent;
      color: var(--accent);
      border-radius: 999px;
      padding: 8px 16px;
      font-weight: 600;
      cursor: pointer;
    }

    .alert {
      margin: 12px 0 8px;
      padding: 12px 14px;
      border-radius: 12px;
      font-size: 0.9rem;
    }

    .alert-warning {
      background: #fff7e6;
      color: #8a5a00;
    }

    .alert-danger {
      background: #fdecec;
      color: #9b1c1c;
    }

    .alert small {
      display: block;
      margin-top: 8px;
    }
  </style>
</head>
<body>
  <header>
    <h1>Finanzas</h1>
    <button type="button" id="reload-charts">Actualizar gráficas</button>
  </header>
{{FIELDS}}
  <main class="grid">
{{CARDS}}  </main>
{{SCRIPTS}}
  <script>
    const formatCOP = (value) =>
      new Intl.NumberFormat('es-CO', {
        style: 'currency',
        currency: 'COP',
        minimumFractionDigits: 0,
        maximumFractionDigits: 0
      }).format(value);

    const toScale = (scale) => ({
      stacked: scale.stacked,
      beginAtZero: scale.begin_at_zero,
      grid: { display: scale.grid_lines },
      ticks: scale.currency_ticks ? { callback: (value) => formatCOP(value) } : {}
    });

    const toLibraryConfig = (chart) => {
      const { type, data, options } = chart.config;
      const notes = chart.annotations;
      const scales = options.scales ? { x: toScale(options.scales.x), y: toScale(options.scales.y) } : undefined;
      return {
        type,
        data,
        options: {
          responsive: options.responsive,
          maintainAspectRatio: options.maintainAspectRatio,
          indexAxis: options.indexAxis,
          cutout: options.cutout,
          scales,
          interaction: options.indexInteraction ? { mode: 'index', intersect: false } : undefined,
          plugins: {
            legend: options.legend,
            tooltip: {
              mode: options.indexInteraction ? 'index' : 'nearest',
              intersect: !options.indexInteraction,
              callbacks: {
                label: (ctx) => notes.tooltips[ctx.datasetIndex][ctx.dataIndex],
                footer: (items) => (items.length ? notes.footers[items[0].dataIndex] || '' : '')
              }
            },
            datalabels: {
              display: (ctx) => Boolean(notes.value_labels[ctx.datasetIndex][ctx.dataIndex]),
              formatter: (_value, ctx) => notes.value_labels[ctx.datasetIndex][ctx.dataIndex] || '',
              font: { weight: 'bold', size: 10 }
            }
          }
        }
      };
    };

    const draw = (payload) => {
      if (typeof Chart === 'undefined') {
        return;
      }
      if (typeof ChartDataLabels !== 'undefined') {
        Chart.register(ChartDataLabels);
      }
      payload.mounts.forEach((mount) => {
        const canvas = document.getElementById(mount.mount);
        if (!canvas) {
          return;
        }
        const existing = Chart.getChart(canvas);
        if (existing) {
          existing.destroy();
        }
        if (mount.chart) {
          new Chart(canvas.getContext('2d'), toLibraryConfig(mount.chart));
        }
      });
    };

    const post = async (path) => {
      const res = await fetch(path, { method: 'POST' });
      if (!res.ok) {
        throw new Error(await res.text());
      }
      return res.json();
    };

    document.getElementById('reload-charts').addEventListener('click', () => {
      post('/api/charts/reload')
        .then((payload) => {
          if (payload.mounts.some((mount) => mount.errors.length)) {
            window.location.reload();
          } else {
            draw(payload);
          }
        })
        .catch((err) => console.error('reload failed', err));
    });

    document.querySelectorAll('[data-action="retry"]').forEach((button) => {
      button.addEventListener('click', () => {
        post('/api/charts/retry')
          .then(() => window.location.reload())
          .catch((err) => console.error('retry failed', err));
      });
    });

    fetch('/api/charts')
      .then((res) => res.json())
      .then(draw)
      .catch((err) => console.error('could not load charts', err));
  </script>
</body>
</html>
"##;
