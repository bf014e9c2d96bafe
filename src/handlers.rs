use crate::calendar::month_grid;
use crate::errors::AppError;
use crate::models::{CalendarData, MonthGridResponse};
use crate::render::{container, render};
use crate::state::AppState;
use crate::tooltip::TooltipController;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use tracing::{info, warn};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut root = container();
    if let Some(data) = state.data.as_deref() {
        let mut controller = TooltipController::new();
        render(&mut root, data, &mut controller);
        info!("rendered calendar with {} tooltips", controller.len());
    } else {
        warn!("no calendar data loaded from {}, serving an empty calendar", state.source);
    }
    Html(render_index(&root.to_html()))
}

pub async fn get_dataset(State(state): State<AppState>) -> Result<Json<CalendarData>, AppError> {
    let data = state.data.as_deref().ok_or_else(AppError::unavailable)?;
    Ok(Json(data.clone()))
}

pub async fn get_month(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<MonthGridResponse>, AppError> {
    let data = state.data.as_deref().ok_or_else(AppError::unavailable)?;
    let grid = month_grid(data, year, month)
        .ok_or_else(|| AppError::bad_request("no such month"))?;
    Ok(Json(grid))
}
