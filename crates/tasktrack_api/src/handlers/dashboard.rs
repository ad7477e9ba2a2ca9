use crate::error::ApiResult;
use crate::state::AppState;
use axum::extract::State;
use axum::{Extension, Json};
use tasktrack_core::{Caller, DashboardService, DashboardStats};

pub(crate) async fn stats(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Json<DashboardStats>> {
    let stats = state
        .with_conn(move |conn| Ok(DashboardService::open(conn)?.stats(&caller)?))
        .await?;
    Ok(Json(stats))
}
