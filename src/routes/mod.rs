pub mod activities;
pub mod links;
pub mod mail;
pub mod participants;
pub mod trips;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(trips::router())
        .merge(participants::router())
        .merge(activities::router())
        .merge(links::router())
        .merge(mail::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::test_support::{test_app, TestApp};

    async fn call(app: &TestApp, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        create_router(app.state.clone())
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    fn trip_body(invitees: &[&str]) -> Value {
        let starts_at = Utc::now() + Duration::days(1);
        json!({
            "destination": "Paris",
            "starts_at": starts_at.to_rfc3339(),
            "ends_at": (starts_at + Duration::days(3)).to_rfc3339(),
            "owner_name": "Ana",
            "owner_email": "ana@x.com",
            "emails_to_invite": invitees,
        })
    }

    async fn created_trip(app: &TestApp, invitees: &[&str]) -> String {
        let response = call(app, Method::POST, "/create", Some(trip_body(invitees))).await;
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await["tripId"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn create_returns_trip_id_and_preview_url() {
        let app = test_app().await;
        let response = call(
            &app,
            Method::POST,
            "/create",
            Some(trip_body(&["bob@x.com"])),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let trip_id = body["tripId"].as_str().unwrap();
        assert!(Uuid::parse_str(trip_id).is_ok());
        assert!(body["previewUrl"]
            .as_str()
            .unwrap()
            .starts_with("http://api.test/mail/"));

        let response = call(
            &app,
            Method::GET,
            &format!("/trips/{trip_id}/participants"),
            None,
        )
        .await;
        let body = json_body(response).await;
        let participants = body["participants"].as_array().unwrap();
        assert_eq!(participants.len(), 2);
        assert_eq!(participants[0]["is_owner"], json!(true));
        assert_eq!(participants[0]["is_confirmed"], json!(true));
        assert_eq!(participants[1]["email"], json!("bob@x.com"));
        assert_eq!(participants[1]["is_confirmed"], json!(false));
    }

    #[tokio::test]
    async fn invalid_body_is_rejected_with_field_errors() {
        let app = test_app().await;
        let mut body = trip_body(&["not-an-email"]);
        body["destination"] = json!("Rio");

        let response = call(&app, Method::POST, "/create", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["message"], json!("Invalid input"));
        assert!(body["errors"]["destination"].is_array());
        assert!(body["errors"]["emails_to_invite[0]"].is_array());
        assert_eq!(app.count("trips").await, 0);
    }

    #[tokio::test]
    async fn malformed_json_is_a_client_error() {
        let app = test_app().await;
        let response = Request::builder()
            .method(Method::POST)
            .uri("/create")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let response = create_router(app.state.clone())
            .oneshot(response)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["errors"]["body"].is_array());
    }

    #[tokio::test]
    async fn past_start_is_rejected() {
        let app = test_app().await;
        let mut body = trip_body(&[]);
        body["starts_at"] = json!((Utc::now() - Duration::days(1)).to_rfc3339());

        let response = call(&app, Method::POST, "/create", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["message"],
            json!("Start date must be in the future")
        );
        assert_eq!(app.count("participants").await, 0);
    }

    #[tokio::test]
    async fn non_uuid_path_is_rejected() {
        let app = test_app().await;
        let response = call(&app, Method::GET, "/trips/12345", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["errors"]["tripId"].is_array());
    }

    #[tokio::test]
    async fn updating_missing_trip_is_not_found() {
        let app = test_app().await;
        let starts_at = Utc::now() + Duration::days(1);
        let response = call(
            &app,
            Method::PUT,
            &format!("/trips/{}", Uuid::new_v4()),
            Some(json!({
                "destination": "Roma",
                "starts_at": starts_at.to_rfc3339(),
                "ends_at": (starts_at + Duration::days(1)).to_rfc3339(),
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["message"], json!("Trip not found"));
    }

    #[tokio::test]
    async fn confirmation_links_redirect_to_the_web_app() {
        let app = test_app().await;
        let trip_id = created_trip(&app, &["bob@x.com"]).await;

        let response = call(&app, Method::GET, &format!("/trips/{trip_id}/confirm"), None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), format!("http://web.test/app/trips/{trip_id}"));

        let invite = app.mailer.sent_to("bob@x.com").await;
        assert_eq!(invite.len(), 1);
        let participant_id = app
            .state
            .store
            .list_participants(trip_id.parse().unwrap())
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.email == "bob@x.com")
            .unwrap()
            .id;

        let response = call(
            &app,
            Method::GET,
            &format!("/participants/{participant_id}/confirm"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), format!("http://web.test/app/trips/{trip_id}"));

        let response = call(&app, Method::GET, &format!("/participants/{participant_id}"), None).await;
        assert_eq!(
            json_body(response).await["participant"]["is_confirmed"],
            json!(true)
        );
    }

    #[tokio::test]
    async fn invite_flow_over_http() {
        let app = test_app().await;
        let trip_id = created_trip(&app, &[]).await;
        let invite_uri = format!("/trips/{trip_id}/invites");

        let response = call(
            &app,
            Method::POST,
            &invite_uri,
            Some(json!({ "email": "carla@x.com" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["message"],
            json!("Trip owner has not confirmed the trip")
        );

        call(&app, Method::GET, &format!("/trips/{trip_id}/confirm"), None).await;
        let response = call(
            &app,
            Method::POST,
            &invite_uri,
            Some(json!({ "email": "carla@x.com" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(Uuid::parse_str(body["participantId"].as_str().unwrap()).is_ok());

        let preview = body["previewUrl"].as_str().unwrap();
        let path = preview.strip_prefix("http://api.test").unwrap();
        let response = call(&app, Method::GET, path, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&html).contains("Confirmar presença"));
    }

    #[tokio::test]
    async fn activities_and_links_over_http() {
        let app = test_app().await;
        let trip_id = created_trip(&app, &[]).await;
        let trip = app
            .state
            .store
            .find_trip(trip_id.parse().unwrap())
            .await
            .unwrap()
            .unwrap();

        let response = call(
            &app,
            Method::POST,
            &format!("/trips/{trip_id}/activities"),
            Some(json!({
                "title": "Torre Eiffel",
                "occurs_at": (trip.starts_at + Duration::hours(3)).to_rfc3339(),
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(json_body(response).await["activityId"].is_string());

        let response = call(&app, Method::GET, &format!("/trips/{trip_id}/activities"), None).await;
        let body = json_body(response).await;
        let days = body["activities"].as_array().unwrap();
        assert!(days.len() >= 4);
        let total: usize = days
            .iter()
            .map(|day| day["activities"].as_array().unwrap().len())
            .sum();
        assert_eq!(total, 1);

        let response = call(
            &app,
            Method::POST,
            &format!("/trips/{trip_id}/links"),
            Some(json!({ "title": "Hotel", "url": "https://hotel.example.com" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = call(&app, Method::GET, &format!("/trips/{trip_id}/links"), None).await;
        let body = json_body(response).await;
        assert_eq!(body["links"][0]["url"], json!("https://hotel.example.com"));
    }

    #[tokio::test]
    async fn unknown_preview_is_not_found() {
        let app = test_app().await;
        let response = call(&app, Method::GET, &format!("/mail/{}", Uuid::new_v4()), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
