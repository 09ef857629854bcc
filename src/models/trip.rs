use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

/// Owner of a trip being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripOwner {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrip {
    pub details: TripDetails,
    pub owner: TripOwner,
    pub emails_to_invite: Vec<String>,
}

/// Editable fields of a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripDetails {
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Longest trip accepted; also bounds the per-day activity listing.
pub const MAX_TRIP_DAYS: i64 = 365;

/// Date ordering shared by creation and update: the trip must start strictly
/// after `now`, end strictly after it starts, and last at most
/// [`MAX_TRIP_DAYS`].
pub fn validate_trip_window(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if starts_at <= now {
        return Err(AppError::bad_request("Start date must be in the future"));
    }
    if ends_at <= starts_at {
        return Err(AppError::bad_request("End date must be after start date"));
    }
    if ends_at - starts_at > Duration::days(MAX_TRIP_DAYS) {
        return Err(AppError::bad_request(format!(
            "Trip cannot last longer than {MAX_TRIP_DAYS} days"
        )));
    }
    Ok(())
}
