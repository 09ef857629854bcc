//! Invites and participant confirmation.

use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::participant::{NewParticipant, Participant},
    state::AppState,
    trips::get_trip,
};

#[derive(Debug, Clone)]
pub struct CreatedInvite {
    pub participant: Participant,
    pub preview_url: Option<String>,
}

/// Adds an unconfirmed participant to a confirmed trip and mails them a
/// confirmation link.
pub async fn create_invite(
    state: &AppState,
    trip_id: Uuid,
    email: String,
) -> Result<CreatedInvite, AppError> {
    let trip = get_trip(state, trip_id).await?;
    if !trip.is_confirmed {
        return Err(AppError::bad_request("Trip owner has not confirmed the trip"));
    }

    let participant = state
        .store
        .create_participant(trip_id, &NewParticipant::invitee(email))
        .await?;
    info!(trip_id = %trip_id, participant_id = %participant.id, "participant invited");

    let delivery = state
        .notifier
        .send_invite(&trip, &participant)
        .await
        .inspect_err(|err| {
            error!(participant_id = %participant.id, "invite mail failed: {err}")
        })?;

    Ok(CreatedInvite {
        participant,
        preview_url: delivery.preview_url,
    })
}

pub async fn get_participant(
    state: &AppState,
    participant_id: Uuid,
) -> Result<Participant, AppError> {
    state
        .store
        .find_participant(participant_id)
        .await?
        .ok_or_else(|| AppError::not_found("Participant not found"))
}

pub async fn list_participants(
    state: &AppState,
    trip_id: Uuid,
) -> Result<Vec<Participant>, AppError> {
    get_trip(state, trip_id).await?;
    state.store.list_participants(trip_id).await
}

/// Flips the participant's confirmation flag. Confirming twice is a no-op.
pub async fn confirm_participant(
    state: &AppState,
    participant_id: Uuid,
) -> Result<Participant, AppError> {
    let mut participant = get_participant(state, participant_id).await?;
    if participant.is_confirmed {
        return Ok(participant);
    }

    let flipped = state.store.confirm_participant(participant_id).await?;
    participant.is_confirmed = true;
    if !flipped {
        return Ok(participant);
    }
    info!(participant_id = %participant_id, trip_id = %participant.trip_id, "participant confirmed");
    Ok(participant)
}
