use std::{fmt, sync::Arc};

use askama::Template;
use chrono::{DateTime, FixedOffset, Local, Locale, TimeZone, Utc};
use url::Url;
use uuid::Uuid;

use crate::{
    config::join_url,
    error::AppError,
    models::{
        participant::Participant,
        trip::{Trip, TripOwner},
    },
    services::mail::{Address, Delivery, MailTransport, OutgoingMail},
};

/// Long Brazilian date (`20 de outubro de 2026`) in the zone `ts` carries.
pub fn format_long_date<Tz>(ts: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    ts.format_localized("%-d de %B de %Y", Locale::pt_BR)
        .to_string()
}

#[derive(Template)]
#[template(path = "mail/trip_confirmation.html")]
struct TripConfirmationMail<'a> {
    destination: &'a str,
    starts_on: &'a str,
    ends_on: &'a str,
    confirmation_link: &'a str,
}

#[derive(Template)]
#[template(path = "mail/participant_invite.html")]
struct ParticipantInviteMail<'a> {
    destination: &'a str,
    starts_on: &'a str,
    ends_on: &'a str,
    confirmation_link: &'a str,
}

/// Renders the transactional mails and hands them to the configured transport.
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn MailTransport>,
    sender: Address,
    api_base_url: Url,
    /// Zone dates are written in; the server's local zone when unset.
    utc_offset: Option<FixedOffset>,
}

impl Notifier {
    pub fn new(transport: Arc<dyn MailTransport>, sender: Address, api_base_url: Url) -> Self {
        Self {
            transport,
            sender,
            api_base_url,
            utc_offset: None,
        }
    }

    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = Some(offset);
        self
    }

    fn long_date(&self, ts: DateTime<Utc>) -> String {
        match self.utc_offset {
            Some(offset) => format_long_date(&ts.with_timezone(&offset)),
            None => format_long_date(&ts.with_timezone(&Local)),
        }
    }

    pub fn transport(&self) -> &dyn MailTransport {
        self.transport.as_ref()
    }

    pub fn trip_confirmation_link(&self, trip_id: Uuid) -> String {
        join_url(&self.api_base_url, &format!("trips/{trip_id}/confirm"))
    }

    pub fn participant_confirmation_link(&self, participant_id: Uuid) -> String {
        join_url(
            &self.api_base_url,
            &format!("participants/{participant_id}/confirm"),
        )
    }

    /// Asks the owner to confirm the trip they just created.
    pub async fn send_trip_confirmation(
        &self,
        trip: &Trip,
        owner: &TripOwner,
    ) -> Result<Delivery, AppError> {
        let starts_on = self.long_date(trip.starts_at);
        let ends_on = self.long_date(trip.ends_at);
        let confirmation_link = self.trip_confirmation_link(trip.id);
        let html = TripConfirmationMail {
            destination: &trip.destination,
            starts_on: &starts_on,
            ends_on: &ends_on,
            confirmation_link: &confirmation_link,
        }
        .render()?;

        self.transport
            .send(&OutgoingMail {
                from: self.sender.clone(),
                to: Address::new(Some(owner.name.clone()), &owner.email),
                subject: subject(trip, &starts_on),
                html,
            })
            .await
    }

    /// Invites a participant to confirm their presence on a trip.
    pub async fn send_invite(
        &self,
        trip: &Trip,
        participant: &Participant,
    ) -> Result<Delivery, AppError> {
        let starts_on = self.long_date(trip.starts_at);
        let ends_on = self.long_date(trip.ends_at);
        let confirmation_link = self.participant_confirmation_link(participant.id);
        let html = ParticipantInviteMail {
            destination: &trip.destination,
            starts_on: &starts_on,
            ends_on: &ends_on,
            confirmation_link: &confirmation_link,
        }
        .render()?;

        self.transport
            .send(&OutgoingMail {
                from: self.sender.clone(),
                to: Address::new(participant.name.clone(), &participant.email),
                subject: subject(trip, &starts_on),
                html,
            })
            .await
    }
}

fn subject(trip: &Trip, starts_on: &str) -> String {
    format!(
        "Confirme sua viagem para {} em {starts_on}",
        trip.destination
    )
}
