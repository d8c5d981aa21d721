use crate::assets::read_static;
use crate::errors::{AppError, ScriptError};
use crate::models::{ChartsResponse, FieldsUpdate, fields};
use crate::state::AppState;
use crate::ui::render_index;
use crate::views::build_charts_response;
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse},
};
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let board = state.dashboard.lock().await;
    Html(render_index(&*board))
}

pub async fn get_charts(State(state): State<AppState>) -> Json<ChartsResponse> {
    let board = state.dashboard.lock().await;
    Json(build_charts_response(&*board))
}

pub async fn reload_charts(State(state): State<AppState>) -> Json<ChartsResponse> {
    let mut board = state.dashboard.lock().await;
    board.reload().await;
    Json(build_charts_response(&*board))
}

pub async fn retry_charts(State(state): State<AppState>) -> Json<ChartsResponse> {
    let mut board = state.dashboard.lock().await;
    board.retry().await;
    Json(build_charts_response(&*board))
}

pub async fn update_fields(
    State(state): State<AppState>,
    Json(payload): Json<FieldsUpdate>,
) -> Result<StatusCode, AppError> {
    if let Some(unknown) = payload.fields.keys().find(|id| !fields::ALL.contains(&id.as_str())) {
        return Err(AppError::bad_request(format!("unknown field '{unknown}'")));
    }

    let mut board = state.dashboard.lock().await;
    let page = board.page_mut();
    for (id, value) in payload.fields {
        page.set_field(id, value);
    }
    info!("hidden fields updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn static_asset(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let body = read_static(&state.static_dir, &path)
        .await
        .map_err(|err| match err {
            ScriptError::NotFound(missing) => AppError::not_found(format!("{missing} not found")),
            other => AppError::internal(other),
        })?;
    Ok(([(header::CONTENT_TYPE, content_type(&path))], body))
}

fn content_type(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}
