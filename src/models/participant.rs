use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Participant {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub is_owner: bool,
    pub is_confirmed: bool,
    pub trip_id: Uuid,
}

/// Participant row to insert; ids are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
    pub name: Option<String>,
    pub email: String,
    pub is_owner: bool,
    pub is_confirmed: bool,
}

impl NewParticipant {
    pub fn owner(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
            is_owner: true,
            is_confirmed: true,
        }
    }

    pub fn invitee(email: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
            is_owner: false,
            is_confirmed: false,
        }
    }
}
