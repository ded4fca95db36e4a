//! User administration handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::db::UserRepository;
use crate::web::dto::{AccountResponse, ApiResponse, PageQuery, PaginatedData, PaginationMeta};
use crate::web::error::ApiError;

use super::AppState;

/// Maximum page size for listings.
const MAX_PAGE_SIZE: u32 = 100;

/// GET /api/v1/users - List accounts, newest first (admin only).
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<PaginatedData<AccountResponse>>>, ApiError> {
    let page = query.page.max(1);
    let limit = query.limit.clamp(1, MAX_PAGE_SIZE);

    let repo = UserRepository::new(state.db.pool());
    let total = repo.count().await?;
    let users = repo.list(page, limit).await?;

    let data = PaginatedData {
        items: users.iter().map(AccountResponse::from).collect(),
        pagination: PaginationMeta::new(page, limit, total),
    };

    Ok(Json(ApiResponse::new(data, "Users retrieved successfully")))
}
