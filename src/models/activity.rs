use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub title: String,
    pub occurs_at: DateTime<Utc>,
    pub trip_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub title: String,
    pub occurs_at: DateTime<Utc>,
}

/// All activities falling on one calendar day of a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub activities: Vec<Activity>,
}
