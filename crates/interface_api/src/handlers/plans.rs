//! Plan catalog handlers

use axum::{
    extract::{Path, State},
    Json,
};

use core_kernel::OperationMetadata;
use domain_catalog::{PlanCatalogPort, PlanCatalogPortExt};

use crate::dto::plans::PlanResponse;
use crate::{error::ApiError, AppState};

/// Lists plans in catalog order
pub async fn list_plans(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlanResponse>>, ApiError> {
    let plans = state
        .catalog
        .list_plans(Some(OperationMetadata::default().with_context("route", "list_plans")))
        .await?;

    Ok(Json(plans.into_iter().map(PlanResponse::from).collect()))
}

/// Gets a plan by its catalog id
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlanResponse>, ApiError> {
    let plan = state.catalog.find_plan(&id, None).await?;
    Ok(Json(plan.into()))
}
