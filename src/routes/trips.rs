use axum::{
    extract::State,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::trip::Trip,
    state::AppState,
    trips,
    validation::{
        schemas::{CreateTripBody, TripParams, UpdateTripBody},
        ValidJson, ValidPath,
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_trip))
        .route("/trips/:tripId", get(trip_details).put(update_trip))
        .route("/trips/:tripId/confirm", get(confirm_trip))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTripResponse {
    trip_id: Uuid,
    preview_url: Option<String>,
}

async fn create_trip(
    State(state): State<AppState>,
    ValidJson(new_trip): ValidJson<CreateTripBody>,
) -> Result<Json<CreateTripResponse>, AppError> {
    let created = trips::create_trip(&state, new_trip).await?;
    Ok(Json(CreateTripResponse {
        trip_id: created.trip.id,
        preview_url: created.preview_url,
    }))
}

#[derive(Serialize)]
struct TripView {
    id: Uuid,
    destination: String,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    is_confirmed: bool,
}

impl From<Trip> for TripView {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id,
            destination: trip.destination,
            starts_at: trip.starts_at,
            ends_at: trip.ends_at,
            is_confirmed: trip.is_confirmed,
        }
    }
}

#[derive(Serialize)]
struct TripDetailsResponse {
    trip: TripView,
}

async fn trip_details(
    State(state): State<AppState>,
    ValidPath(trip_id): ValidPath<TripParams>,
) -> Result<Json<TripDetailsResponse>, AppError> {
    let trip = trips::get_trip(&state, trip_id).await?;
    Ok(Json(TripDetailsResponse { trip: trip.into() }))
}

#[derive(Serialize)]
struct UpdateTripResponse {
    message: &'static str,
    trip: Trip,
}

async fn update_trip(
    State(state): State<AppState>,
    ValidPath(trip_id): ValidPath<TripParams>,
    ValidJson(details): ValidJson<UpdateTripBody>,
) -> Result<Json<UpdateTripResponse>, AppError> {
    let trip = trips::update_trip(&state, trip_id, details).await?;
    Ok(Json(UpdateTripResponse {
        message: "Trip updated",
        trip,
    }))
}

async fn confirm_trip(
    State(state): State<AppState>,
    ValidPath(trip_id): ValidPath<TripParams>,
) -> Result<Redirect, AppError> {
    let trip = trips::confirm_trip(&state, trip_id).await?;
    Ok(Redirect::to(
        &state.config.web_url(&format!("trips/{}", trip.id)),
    ))
}
