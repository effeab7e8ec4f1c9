use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;
use validator::Validate;

use crate::dtos::{AssociationView, GetAssociationParams};
use crate::middleware::MaybeIdentity;
use crate::services::visibility;
use crate::startup::AppState;

/// `GET /api/association/get/:slug`
///
/// Answers with the full record for association members and platform members,
/// and with the public projection for everyone else.
pub async fn get_association(
    State(state): State<AppState>,
    Path(params): Path<GetAssociationParams>,
    MaybeIdentity(identity): MaybeIdentity,
) -> Result<Json<AssociationView>, AppError> {
    params.validate()?;

    let association = state
        .associations
        .find_by_slug(&params.slug)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Association not found")))?;

    let (tier, view) =
        visibility::project(&association, identity.as_ref(), state.users.as_ref()).await;

    tracing::info!(
        association_id = %association.id,
        tier = ?tier,
        "Association served"
    );

    Ok(Json(view))
}
