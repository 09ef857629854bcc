use axum::{
    extract::State,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::participant::Participant,
    participants,
    state::AppState,
    validation::{
        schemas::{CreateInviteBody, ParticipantParams, TripParams},
        ValidJson, ValidPath,
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips/:tripId/invites", post(create_invite))
        .route("/trips/:tripId/participants", get(trip_participants))
        .route("/participants/:participantId", get(participant_details))
        .route("/participants/:participantId/confirm", get(confirm_participant))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateInviteResponse {
    participant_id: Uuid,
    preview_url: Option<String>,
}

async fn create_invite(
    State(state): State<AppState>,
    ValidPath(trip_id): ValidPath<TripParams>,
    ValidJson(email): ValidJson<CreateInviteBody>,
) -> Result<Json<CreateInviteResponse>, AppError> {
    let invite = participants::create_invite(&state, trip_id, email).await?;
    Ok(Json(CreateInviteResponse {
        participant_id: invite.participant.id,
        preview_url: invite.preview_url,
    }))
}

#[derive(Serialize)]
struct ParticipantView {
    id: Uuid,
    name: Option<String>,
    email: String,
    is_confirmed: bool,
    is_owner: bool,
}

impl From<Participant> for ParticipantView {
    fn from(participant: Participant) -> Self {
        Self {
            id: participant.id,
            name: participant.name,
            email: participant.email,
            is_confirmed: participant.is_confirmed,
            is_owner: participant.is_owner,
        }
    }
}

#[derive(Serialize)]
struct ParticipantsResponse {
    participants: Vec<ParticipantView>,
}

async fn trip_participants(
    State(state): State<AppState>,
    ValidPath(trip_id): ValidPath<TripParams>,
) -> Result<Json<ParticipantsResponse>, AppError> {
    let participants = participants::list_participants(&state, trip_id).await?;
    Ok(Json(ParticipantsResponse {
        participants: participants.into_iter().map(Into::into).collect(),
    }))
}

#[derive(Serialize)]
struct ParticipantResponse {
    participant: ParticipantView,
}

async fn participant_details(
    State(state): State<AppState>,
    ValidPath(participant_id): ValidPath<ParticipantParams>,
) -> Result<Json<ParticipantResponse>, AppError> {
    let participant = participants::get_participant(&state, participant_id).await?;
    Ok(Json(ParticipantResponse {
        participant: participant.into(),
    }))
}

async fn confirm_participant(
    State(state): State<AppState>,
    ValidPath(participant_id): ValidPath<ParticipantParams>,
) -> Result<Redirect, AppError> {
    let participant = participants::confirm_participant(&state, participant_id).await?;
    Ok(Redirect::to(
        &state
            .config
            .web_url(&format!("trips/{}", participant.trip_id)),
    ))
}
