use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    activities,
    error::AppError,
    models::activity::ActivityDay,
    state::AppState,
    validation::{
        schemas::{CreateActivityBody, TripParams},
        ValidJson, ValidPath,
    },
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/trips/:tripId/activities",
        get(trip_activities).post(create_activity),
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateActivityResponse {
    activity_id: Uuid,
}

async fn create_activity(
    State(state): State<AppState>,
    ValidPath(trip_id): ValidPath<TripParams>,
    ValidJson(activity): ValidJson<CreateActivityBody>,
) -> Result<Json<CreateActivityResponse>, AppError> {
    let activity = activities::create_activity(&state, trip_id, activity).await?;
    Ok(Json(CreateActivityResponse {
        activity_id: activity.id,
    }))
}

#[derive(Serialize)]
struct ActivityView {
    id: Uuid,
    title: String,
    occurs_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct DayView {
    date: NaiveDate,
    activities: Vec<ActivityView>,
}

impl From<ActivityDay> for DayView {
    fn from(day: ActivityDay) -> Self {
        Self {
            date: day.date,
            activities: day
                .activities
                .into_iter()
                .map(|activity| ActivityView {
                    id: activity.id,
                    title: activity.title,
                    occurs_at: activity.occurs_at,
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct ActivitiesResponse {
    activities: Vec<DayView>,
}

async fn trip_activities(
    State(state): State<AppState>,
    ValidPath(trip_id): ValidPath<TripParams>,
) -> Result<Json<ActivitiesResponse>, AppError> {
    let days = activities::list_activities(&state, trip_id).await?;
    Ok(Json(ActivitiesResponse {
        activities: days.into_iter().map(Into::into).collect(),
    }))
}
