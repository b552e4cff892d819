use crate::common::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;

pub async fn clear_data(State(state): State<AppState>) -> ApiResult<&'static str> {
    state.admin_service.clear_all().await?;
    Ok("Cleared Tables")
}

pub async fn devices(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.admin_service.list_devices().await?))
}
