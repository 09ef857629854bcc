use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    links,
    state::AppState,
    validation::{
        schemas::{CreateLinkBody, TripParams},
        ValidJson, ValidPath,
    },
};

pub fn router() -> Router<AppState> {
    Router::new().route("/trips/:tripId/links", get(trip_links).post(create_link))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateLinkResponse {
    link_id: Uuid,
}

async fn create_link(
    State(state): State<AppState>,
    ValidPath(trip_id): ValidPath<TripParams>,
    ValidJson(link): ValidJson<CreateLinkBody>,
) -> Result<Json<CreateLinkResponse>, AppError> {
    let link = links::create_link(&state, trip_id, link).await?;
    Ok(Json(CreateLinkResponse { link_id: link.id }))
}

#[derive(Serialize)]
struct LinkView {
    id: Uuid,
    title: String,
    url: String,
}

#[derive(Serialize)]
struct LinksResponse {
    links: Vec<LinkView>,
}

async fn trip_links(
    State(state): State<AppState>,
    ValidPath(trip_id): ValidPath<TripParams>,
) -> Result<Json<LinksResponse>, AppError> {
    let links = links::list_links(&state, trip_id).await?;
    Ok(Json(LinksResponse {
        links: links
            .into_iter()
            .map(|link| LinkView {
                id: link.id,
                title: link.title,
                url: link.url,
            })
            .collect(),
    }))
}
