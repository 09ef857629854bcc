//! Activities scheduled inside a trip's date range.

use chrono::Duration;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        activity::{Activity, ActivityDay, NewActivity},
        trip::Trip,
    },
    state::AppState,
    trips::get_trip,
};

pub async fn create_activity(
    state: &AppState,
    trip_id: Uuid,
    activity: NewActivity,
) -> Result<Activity, AppError> {
    let trip = get_trip(state, trip_id).await?;
    if activity.occurs_at < trip.starts_at || activity.occurs_at > trip.ends_at {
        return Err(AppError::bad_request("Invalid activity date"));
    }

    let activity = state.store.create_activity(trip_id, &activity).await?;
    info!(trip_id = %trip_id, activity_id = %activity.id, "activity created");
    Ok(activity)
}

/// The trip's activities bucketed per UTC calendar day, one bucket for every
/// day from the start day through the end day, even when empty.
pub async fn list_activities(
    state: &AppState,
    trip_id: Uuid,
) -> Result<Vec<ActivityDay>, AppError> {
    let trip = get_trip(state, trip_id).await?;
    let activities = state.store.list_activities(trip_id).await?;
    Ok(group_by_day(&trip, activities))
}

pub fn group_by_day(trip: &Trip, mut activities: Vec<Activity>) -> Vec<ActivityDay> {
    activities.sort_by_key(|activity| activity.occurs_at);

    let first_day = trip.starts_at.date_naive();
    let last_day = trip.ends_at.date_naive();
    let span = (last_day - first_day).num_days().max(0);

    (0..=span)
        .map(|offset| {
            let date = first_day + Duration::days(offset);
            ActivityDay {
                date,
                activities: activities
                    .iter()
                    .filter(|activity| activity.occurs_at.date_naive() == date)
                    .cloned()
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::{models::participant::NewParticipant, models::trip::TripDetails, test_support::test_app};

    fn activity(trip: &Trip, title: &str, occurs_at: chrono::DateTime<Utc>) -> Activity {
        Activity {
            id: Uuid::new_v4(),
            title: title.into(),
            occurs_at,
            trip_id: trip.id,
        }
    }

    #[test]
    fn every_trip_day_gets_a_bucket() {
        let trip = Trip {
            id: Uuid::new_v4(),
            destination: "Natal".into(),
            starts_at: Utc.with_ymd_and_hms(2030, 1, 10, 15, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2030, 1, 12, 9, 0, 0).unwrap(),
            is_confirmed: true,
            created_at: Utc::now(),
        };
        let activities = vec![
            activity(&trip, "Praia", Utc.with_ymd_and_hms(2030, 1, 12, 8, 0, 0).unwrap()),
            activity(&trip, "Jantar", Utc.with_ymd_and_hms(2030, 1, 10, 20, 0, 0).unwrap()),
            activity(&trip, "Check-in", Utc.with_ymd_and_hms(2030, 1, 10, 16, 0, 0).unwrap()),
        ];

        let days = group_by_day(&trip, activities);
        assert_eq!(
            days.iter().map(|day| day.date).collect::<Vec<_>>(),
            vec![
                NaiveDate::from_ymd_opt(2030, 1, 10).unwrap(),
                NaiveDate::from_ymd_opt(2030, 1, 11).unwrap(),
                NaiveDate::from_ymd_opt(2030, 1, 12).unwrap(),
            ]
        );
        let titles = |index: usize| {
            days[index]
                .activities
                .iter()
                .map(|a| a.title.as_str())
                .collect::<Vec<_>>()
        };
        assert_eq!(titles(0), vec!["Check-in", "Jantar"]);
        assert!(titles(1).is_empty());
        assert_eq!(titles(2), vec!["Praia"]);
    }

    #[tokio::test]
    async fn activity_must_fall_inside_the_trip() {
        let app = test_app().await;
        let starts_at = Utc::now() + Duration::days(3);
        let trip = app
            .state
            .store
            .create_trip(
                &TripDetails {
                    destination: "Natal".into(),
                    starts_at,
                    ends_at: starts_at + Duration::days(2),
                },
                &[NewParticipant::owner("Ana", "ana@x.com")],
            )
            .await
            .unwrap();

        let before = NewActivity {
            title: "Aeroporto".into(),
            occurs_at: starts_at - Duration::hours(2),
        };
        let err = create_activity(&app.state, trip.id, before).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid activity date");

        let inside = NewActivity {
            title: "Passeio de buggy".into(),
            occurs_at: starts_at + Duration::hours(5),
        };
        let created = create_activity(&app.state, trip.id, inside).await.unwrap();

        let days = list_activities(&app.state, trip.id).await.unwrap();
        let listed = days
            .iter()
            .flat_map(|day| day.activities.iter())
            .collect::<Vec<_>>();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
    }

    #[tokio::test]
    async fn activities_of_missing_trip_are_not_found() {
        let app = test_app().await;
        assert!(matches!(
            list_activities(&app.state, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
