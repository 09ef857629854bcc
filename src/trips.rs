//! Trip lifecycle: creation, update, owner confirmation.

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        participant::NewParticipant,
        trip::{validate_trip_window, NewTrip, Trip, TripDetails},
    },
    state::AppState,
};

#[derive(Debug, Clone)]
pub struct CreatedTrip {
    pub trip: Trip,
    pub preview_url: Option<String>,
}

/// Creates the trip with its owner (pre-confirmed) and one unconfirmed
/// participant per invited address, then mails the owner a confirmation link.
///
/// The records stay committed when the mail fails; the error is returned.
pub async fn create_trip(state: &AppState, new_trip: NewTrip) -> Result<CreatedTrip, AppError> {
    let NewTrip {
        details,
        owner,
        emails_to_invite,
    } = new_trip;
    validate_trip_window(details.starts_at, details.ends_at, Utc::now())?;

    let participants = std::iter::once(NewParticipant::owner(&owner.name, &owner.email))
        .chain(emails_to_invite.into_iter().map(NewParticipant::invitee))
        .collect::<Vec<_>>();
    let trip = state.store.create_trip(&details, &participants).await?;
    info!(trip_id = %trip.id, participants = participants.len(), "trip created");

    let delivery = state
        .notifier
        .send_trip_confirmation(&trip, &owner)
        .await
        .inspect_err(|err| error!(trip_id = %trip.id, "owner confirmation mail failed: {err}"))?;

    Ok(CreatedTrip {
        trip,
        preview_url: delivery.preview_url,
    })
}

pub async fn get_trip(state: &AppState, trip_id: Uuid) -> Result<Trip, AppError> {
    state
        .store
        .find_trip(trip_id)
        .await?
        .ok_or_else(|| AppError::not_found("Trip not found"))
}

/// Changes destination and dates of a trip its owner has already confirmed.
pub async fn update_trip(
    state: &AppState,
    trip_id: Uuid,
    details: TripDetails,
) -> Result<Trip, AppError> {
    let trip = get_trip(state, trip_id).await?;
    if !trip.is_confirmed {
        return Err(AppError::bad_request("Trip owner has not confirmed the trip"));
    }
    validate_trip_window(details.starts_at, details.ends_at, Utc::now())?;

    let updated = state
        .store
        .update_trip(trip_id, &details)
        .await?
        .ok_or_else(|| AppError::not_found("Trip not found"))?;
    info!(trip_id = %trip_id, "trip updated");
    Ok(updated)
}

/// Marks the trip confirmed and invites every participant besides the owner.
/// A trip that is already confirmed is returned untouched and no mail goes out.
pub async fn confirm_trip(state: &AppState, trip_id: Uuid) -> Result<Trip, AppError> {
    let mut trip = get_trip(state, trip_id).await?;
    if trip.is_confirmed {
        return Ok(trip);
    }

    // a concurrent confirmation may have flipped the flag since the read
    let flipped = state.store.confirm_trip(trip_id).await?;
    trip.is_confirmed = true;
    if !flipped {
        return Ok(trip);
    }
    info!(trip_id = %trip_id, "trip confirmed");

    let participants = state.store.list_participants(trip_id).await?;
    for participant in participants.iter().filter(|p| !p.is_owner) {
        state
            .notifier
            .send_invite(&trip, participant)
            .await
            .inspect_err(|err| {
                error!(
                    trip_id = %trip_id,
                    participant_id = %participant.id,
                    "invite mail failed: {err}"
                )
            })?;
    }

    Ok(trip)
}
