use axum::extract::State;

use super::state::AppState;
use super::types::{ApiError, Json, Query};
use crate::domain::dashboard::DashboardMetrics;
use crate::infrastructure::catalog::Dashboard;

/// GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(request): Query<Dashboard>,
) -> Result<Json<DashboardMetrics>, ApiError> {
    let metrics = state.mediator.send(request).await?;
    Ok(Json(metrics))
}
