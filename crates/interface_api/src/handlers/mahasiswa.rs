//! Student area pages

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use core_kernel::Actor;
use domain_report::{ReportQuery, ReportStatus};

use crate::dto::{claim_views, report_views, BrowseQuery, HistoryView, ListingView};
use crate::error::ApiError;
use crate::AppState;

/// Listed reports, filtered by `jenis` and `q`
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<ListingView>, ApiError> {
    let reports = state
        .reports
        .find(
            ReportQuery::by_status(ReportStatus::OnProgress)
                .kind(query.kind())
                .search(query.q.clone()),
        )
        .await?;

    Ok(Json(ListingView {
        reports: report_views(&reports),
        jenis: query.kind(),
        q: query.q,
    }))
}

/// The caller's own reports and claims
pub async fn history(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<HistoryView>, ApiError> {
    Ok(Json(own_history(&state, &actor).await?))
}

pub(crate) async fn own_history(state: &AppState, actor: &Actor) -> Result<HistoryView, ApiError> {
    let reports = state
        .reports
        .find(ReportQuery::by_owner(actor.email.clone()))
        .await?;
    let claims = state.claims.list_by_claimant(&actor.email).await?;

    Ok(HistoryView {
        reports: report_views(&reports),
        claims: claim_views(&claims),
    })
}
