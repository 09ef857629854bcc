//! Reference links attached to a trip.

use tracing::info;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::link::{Link, NewLink},
    state::AppState,
    trips::get_trip,
};

pub async fn create_link(state: &AppState, trip_id: Uuid, link: NewLink) -> Result<Link, AppError> {
    get_trip(state, trip_id).await?;
    let link = state.store.create_link(trip_id, &link).await?;
    info!(trip_id = %trip_id, link_id = %link.id, "link created");
    Ok(link)
}

pub async fn list_links(state: &AppState, trip_id: Uuid) -> Result<Vec<Link>, AppError> {
    get_trip(state, trip_id).await?;
    state.store.list_links(trip_id).await
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::{
        models::{participant::NewParticipant, trip::TripDetails},
        test_support::test_app,
    };

    #[tokio::test]
    async fn links_are_listed_in_creation_order() {
        let app = test_app().await;
        let starts_at = Utc::now() + Duration::days(1);
        let trip = app
            .state
            .store
            .create_trip(
                &TripDetails {
                    destination: "Bonito".into(),
                    starts_at,
                    ends_at: starts_at + Duration::days(4),
                },
                &[NewParticipant::owner("Ana", "ana@x.com")],
            )
            .await
            .unwrap();

        for (title, url) in [
            ("Reserva do hotel", "https://hotel.example.com/r/1"),
            ("Passagens", "https://air.example.com/b/2"),
        ] {
            create_link(
                &app.state,
                trip.id,
                NewLink {
                    title: title.into(),
                    url: url.into(),
                },
            )
            .await
            .unwrap();
        }

        let titles = list_links(&app.state, trip.id)
            .await
            .unwrap()
            .into_iter()
            .map(|link| link.title)
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["Reserva do hotel", "Passagens"]);
    }

    #[tokio::test]
    async fn link_on_missing_trip_is_not_found() {
        let app = test_app().await;
        let err = create_link(
            &app.state,
            Uuid::new_v4(),
            NewLink {
                title: "Mapa".into(),
                url: "https://maps.example.com".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
