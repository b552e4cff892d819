use crate::common::{ApiError, ApiResult};
use crate::models::{NewPing, PingQuery, PingTimes};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};

/// `POST /{device_id}/{epoch_time}`
pub async fn store(
    State(state): State<AppState>,
    Path((device_id, epoch_time)): Path<(String, String)>,
) -> ApiResult<&'static str> {
    let ping = NewPing::from_segments(&device_id, &epoch_time)?;
    state.ping_service.record(&ping).await?;
    Ok("Added Result")
}

/// `GET /{device_id}/{date}`, one calendar day.
pub async fn by_date(
    State(state): State<AppState>,
    Path((device_id, date)): Path<(String, String)>,
) -> ApiResult<Json<PingTimes>> {
    let query = PingQuery::by_date(&device_id, &date)?;
    Ok(Json(state.query_service.execute(query).await?))
}

/// `GET /{device_id}/{from}/{to}`, half-open range.
pub async fn by_range(
    State(state): State<AppState>,
    Path((device_id, from, to)): Path<(String, String, String)>,
) -> ApiResult<Json<PingTimes>> {
    let query = PingQuery::by_range(&device_id, &from, &to)?;
    Ok(Json(state.query_service.execute(query).await?))
}

pub async fn missing_epoch_time() -> ApiError {
    ApiError::MissingInput("epoch_time")
}

pub async fn missing_date() -> ApiError {
    ApiError::MissingInput("date")
}
