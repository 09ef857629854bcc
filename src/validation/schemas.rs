//! Per-route request schemas.

use serde::Deserialize;
use uuid::Uuid;

use super::{Checker, Rule, Validate, ValidationErrors};
use crate::models::{
    activity::NewActivity,
    link::NewLink,
    trip::{NewTrip, TripDetails, TripOwner},
};

#[derive(Debug, Deserialize)]
pub struct TripParams {
    #[serde(rename = "tripId")]
    pub trip_id: String,
}

impl Validate for TripParams {
    type Output = Uuid;

    fn validate(self) -> Result<Uuid, ValidationErrors> {
        let mut checker = Checker::new();
        let id = checker.uuid("tripId", &self.trip_id);
        checker.finish()?;
        Ok(id)
    }
}

#[derive(Debug, Deserialize)]
pub struct ParticipantParams {
    #[serde(rename = "participantId")]
    pub participant_id: String,
}

impl Validate for ParticipantParams {
    type Output = Uuid;

    fn validate(self) -> Result<Uuid, ValidationErrors> {
        let mut checker = Checker::new();
        let id = checker.uuid("participantId", &self.participant_id);
        checker.finish()?;
        Ok(id)
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageParams {
    #[serde(rename = "messageId")]
    pub message_id: String,
}

impl Validate for MessageParams {
    type Output = Uuid;

    fn validate(self) -> Result<Uuid, ValidationErrors> {
        let mut checker = Checker::new();
        let id = checker.uuid("messageId", &self.message_id);
        checker.finish()?;
        Ok(id)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateTripBody {
    pub destination: Option<String>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub owner_name: Option<String>,
    pub owner_email: Option<String>,
    pub emails_to_invite: Option<Vec<String>>,
}

impl Validate for CreateTripBody {
    type Output = NewTrip;

    fn validate(self) -> Result<NewTrip, ValidationErrors> {
        let mut checker = Checker::new();
        let destination = checker.text("destination", self.destination, &[Rule::MinLen(4)]);
        let starts_at = checker.timestamp("starts_at", self.starts_at);
        let ends_at = checker.timestamp("ends_at", self.ends_at);
        let owner_name = checker.text("owner_name", self.owner_name, &[Rule::NonEmpty]);
        let owner_email = checker.text("owner_email", self.owner_email, &[Rule::Email]);
        let emails_to_invite =
            checker.list("emails_to_invite", self.emails_to_invite, &[Rule::Email]);
        checker.finish()?;

        Ok(NewTrip {
            details: TripDetails {
                destination,
                starts_at,
                ends_at,
            },
            owner: TripOwner {
                name: owner_name,
                email: owner_email,
            },
            emails_to_invite,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateTripBody {
    pub destination: Option<String>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
}

impl Validate for UpdateTripBody {
    type Output = TripDetails;

    fn validate(self) -> Result<TripDetails, ValidationErrors> {
        let mut checker = Checker::new();
        let destination = checker.text("destination", self.destination, &[Rule::MinLen(4)]);
        let starts_at = checker.timestamp("starts_at", self.starts_at);
        let ends_at = checker.timestamp("ends_at", self.ends_at);
        checker.finish()?;

        Ok(TripDetails {
            destination,
            starts_at,
            ends_at,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateInviteBody {
    pub email: Option<String>,
}

impl Validate for CreateInviteBody {
    type Output = String;

    fn validate(self) -> Result<String, ValidationErrors> {
        let mut checker = Checker::new();
        let email = checker.text("email", self.email, &[Rule::Email]);
        checker.finish()?;
        Ok(email)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateActivityBody {
    pub title: Option<String>,
    pub occurs_at: Option<String>,
}

impl Validate for CreateActivityBody {
    type Output = NewActivity;

    fn validate(self) -> Result<NewActivity, ValidationErrors> {
        let mut checker = Checker::new();
        let title = checker.text("title", self.title, &[Rule::MinLen(4)]);
        let occurs_at = checker.timestamp("occurs_at", self.occurs_at);
        checker.finish()?;
        Ok(NewActivity { title, occurs_at })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateLinkBody {
    pub title: Option<String>,
    pub url: Option<String>,
}

impl Validate for CreateLinkBody {
    type Output = NewLink;

    fn validate(self) -> Result<NewLink, ValidationErrors> {
        let mut checker = Checker::new();
        let title = checker.text("title", self.title, &[Rule::MinLen(4)]);
        let url = checker.text("url", self.url, &[Rule::HttpUrl]);
        checker.finish()?;
        Ok(NewLink { title, url })
    }
}
