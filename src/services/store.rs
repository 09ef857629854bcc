use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        activity::{Activity, NewActivity},
        link::{Link, NewLink},
        participant::{NewParticipant, Participant},
        trip::{Trip, TripDetails},
    },
};

/// Every read and write the handlers perform against persisted trips.
///
/// Lookups return `Ok(None)` for missing rows; deciding whether that is an
/// error belongs to the caller.
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Inserts the trip and all of its participants in one transaction.
    async fn create_trip(
        &self,
        details: &TripDetails,
        participants: &[NewParticipant],
    ) -> Result<Trip, AppError>;
    async fn find_trip(&self, trip_id: Uuid) -> Result<Option<Trip>, AppError>;
    async fn update_trip(
        &self,
        trip_id: Uuid,
        details: &TripDetails,
    ) -> Result<Option<Trip>, AppError>;
    /// Flips the trip's confirmation flag. Returns `true` only for the call
    /// that actually flipped it.
    async fn confirm_trip(&self, trip_id: Uuid) -> Result<bool, AppError>;

    async fn create_participant(
        &self,
        trip_id: Uuid,
        participant: &NewParticipant,
    ) -> Result<Participant, AppError>;
    async fn find_participant(&self, participant_id: Uuid)
        -> Result<Option<Participant>, AppError>;
    async fn list_participants(&self, trip_id: Uuid) -> Result<Vec<Participant>, AppError>;
    async fn confirm_participant(&self, participant_id: Uuid) -> Result<bool, AppError>;

    async fn create_activity(
        &self,
        trip_id: Uuid,
        activity: &NewActivity,
    ) -> Result<Activity, AppError>;
    async fn list_activities(&self, trip_id: Uuid) -> Result<Vec<Activity>, AppError>;

    async fn create_link(&self, trip_id: Uuid, link: &NewLink) -> Result<Link, AppError>;
    async fn list_links(&self, trip_id: Uuid) -> Result<Vec<Link>, AppError>;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

const TRIP_COLUMNS: &str = "id, destination, starts_at, ends_at, is_confirmed, created_at";
const PARTICIPANT_COLUMNS: &str = "id, name, email, is_owner, is_confirmed, trip_id";

#[async_trait]
impl TripStore for SqliteStore {
    async fn create_trip(
        &self,
        details: &TripDetails,
        participants: &[NewParticipant],
    ) -> Result<Trip, AppError> {
        let trip = Trip {
            id: Uuid::new_v4(),
            destination: details.destination.clone(),
            starts_at: details.starts_at,
            ends_at: details.ends_at,
            is_confirmed: false,
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO trips (id, destination, starts_at, ends_at, is_confirmed, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(trip.id)
        .bind(&trip.destination)
        .bind(trip.starts_at)
        .bind(trip.ends_at)
        .bind(trip.is_confirmed)
        .bind(trip.created_at)
        .execute(&mut *tx)
        .await?;

        for participant in participants {
            sqlx::query(
                "INSERT INTO participants (id, name, email, is_owner, is_confirmed, trip_id) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(Uuid::new_v4())
            .bind(&participant.name)
            .bind(&participant.email)
            .bind(participant.is_owner)
            .bind(participant.is_confirmed)
            .bind(trip.id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(trip)
    }

    async fn find_trip(&self, trip_id: Uuid) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?1"
        ))
        .bind(trip_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(trip)
    }

    async fn update_trip(
        &self,
        trip_id: Uuid,
        details: &TripDetails,
    ) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>(&format!(
            "UPDATE trips SET destination = ?1, starts_at = ?2, ends_at = ?3 \
             WHERE id = ?4 RETURNING {TRIP_COLUMNS}"
        ))
        .bind(&details.destination)
        .bind(details.starts_at)
        .bind(details.ends_at)
        .bind(trip_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(trip)
    }

    async fn confirm_trip(&self, trip_id: Uuid) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE trips SET is_confirmed = TRUE WHERE id = ?1 AND is_confirmed = FALSE")
                .bind(trip_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn create_participant(
        &self,
        trip_id: Uuid,
        participant: &NewParticipant,
    ) -> Result<Participant, AppError> {
        let participant = Participant {
            id: Uuid::new_v4(),
            name: participant.name.clone(),
            email: participant.email.clone(),
            is_owner: participant.is_owner,
            is_confirmed: participant.is_confirmed,
            trip_id,
        };
        sqlx::query(
            "INSERT INTO participants (id, name, email, is_owner, is_confirmed, trip_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(participant.id)
        .bind(&participant.name)
        .bind(&participant.email)
        .bind(participant.is_owner)
        .bind(participant.is_confirmed)
        .bind(participant.trip_id)
        .execute(&self.pool)
        .await?;
        Ok(participant)
    }

    async fn find_participant(
        &self,
        participant_id: Uuid,
    ) -> Result<Option<Participant>, AppError> {
        let participant = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = ?1"
        ))
        .bind(participant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(participant)
    }

    async fn list_participants(&self, trip_id: Uuid) -> Result<Vec<Participant>, AppError> {
        let participants = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE trip_id = ?1 \
             ORDER BY is_owner DESC, rowid ASC"
        ))
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(participants)
    }

    async fn confirm_participant(&self, participant_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE participants SET is_confirmed = TRUE WHERE id = ?1 AND is_confirmed = FALSE",
        )
        .bind(participant_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn create_activity(
        &self,
        trip_id: Uuid,
        activity: &NewActivity,
    ) -> Result<Activity, AppError> {
        let activity = Activity {
            id: Uuid::new_v4(),
            title: activity.title.clone(),
            occurs_at: activity.occurs_at,
            trip_id,
        };
        sqlx::query("INSERT INTO activities (id, title, occurs_at, trip_id) VALUES (?1, ?2, ?3, ?4)")
            .bind(activity.id)
            .bind(&activity.title)
            .bind(activity.occurs_at)
            .bind(activity.trip_id)
            .execute(&self.pool)
            .await?;
        Ok(activity)
    }

    async fn list_activities(&self, trip_id: Uuid) -> Result<Vec<Activity>, AppError> {
        let activities = sqlx::query_as::<_, Activity>(
            "SELECT id, title, occurs_at, trip_id FROM activities WHERE trip_id = ?1 \
             ORDER BY occurs_at ASC",
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(activities)
    }

    async fn create_link(&self, trip_id: Uuid, link: &NewLink) -> Result<Link, AppError> {
        let link = Link {
            id: Uuid::new_v4(),
            title: link.title.clone(),
            url: link.url.clone(),
            trip_id,
        };
        sqlx::query("INSERT INTO links (id, title, url, trip_id) VALUES (?1, ?2, ?3, ?4)")
            .bind(link.id)
            .bind(&link.title)
            .bind(&link.url)
            .bind(link.trip_id)
            .execute(&self.pool)
            .await?;
        Ok(link)
    }

    async fn list_links(&self, trip_id: Uuid) -> Result<Vec<Link>, AppError> {
        let links = sqlx::query_as::<_, Link>(
            "SELECT id, title, url, trip_id FROM links WHERE trip_id = ?1 ORDER BY rowid ASC",
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(links)
    }
}
