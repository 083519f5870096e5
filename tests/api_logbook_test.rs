mod common;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::Utc;
use config::Map;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use common::TestDatabase;
use flightbook::auth::JwtService;
use flightbook::seed;
use flightbook::settings::Settings;
use flightbook::web::{AppState, PgPool, build_router};

struct Client {
    app: Router,
    jwt: JwtService,
}

impl Client {
    fn new(pool: PgPool) -> Self {
        let dir = TempDir::new().unwrap();
        let mut env = Map::new();
        env.insert(
            "FLIGHTBOOK_DATABASE__URL".to_string(),
            "postgres://unused/flightbook".to_string(),
        );
        env.insert(
            "FLIGHTBOOK_TOKEN__SIGNING_KEY".to_string(),
            "api-logbook-test-key".to_string(),
        );
        let settings = Settings::load_with_env(dir.path(), "test", Some(env)).unwrap();

        Self {
            app: build_router(AppState::new(pool, &settings), &settings.cors),
            jwt: JwtService::new(&settings.token),
        }
    }

    async fn send(&self, user: &str, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let token = self.jwt.generate_token(user).unwrap();
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-proto", "https")
            .header(header::AUTHORIZATION, format!("Bearer {}", token));

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, user: &str, uri: &str) -> (StatusCode, Value) {
        self.send(user, Method::GET, uri, None).await
    }

    async fn post(&self, user: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(user, Method::POST, uri, Some(body)).await
    }
}

const ALICE: &str = "alice";
const BOB: &str = "bob";

fn aircraft_body(identifier: &str) -> Value {
    json!({
        "aircraft_identifier": identifier,
        "aircraft_type": "C172",
        "aircraft_year": 1976,
        "aircraft_category": "Airplane",
        "aircraft_class": "Single-Engine Land",
        "gear_type": "FT"
    })
}

async fn create_logbook(client: &Client, user: &str, title: &str) -> i64 {
    let (status, body) = client
        .post(user, "/api/v1/logbooks", json!({ "title": title }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_logbooks_are_scoped_to_their_owner() {
    let Some(test_db) = TestDatabase::new().await.expect("test database") else {
        return;
    };
    let client = Client::new(test_db.pool());

    let logbook_id = create_logbook(&client, ALICE, "Alice's logbook").await;
    let uri = format!("/api/v1/logbooks/{}", logbook_id);

    let (status, body) = client.get(ALICE, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Alice's logbook");
    assert_eq!(body["user_id"], ALICE);

    let (status, _) = client.get(BOB, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = client.get(BOB, "/api/v1/logbooks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = client.send(BOB, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = client.send(ALICE, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = client.get(ALICE, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_payload_is_bad_request() {
    let Some(test_db) = TestDatabase::new().await.expect("test database") else {
        return;
    };
    let client = Client::new(test_db.pool());

    let (status, body) = client
        .post(ALICE, "/api/v1/logbooks", json!({ "title": "  " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "title is required");

    let logbook_id = create_logbook(&client, ALICE, "Main").await;
    let (status, _) = client
        .post(
            ALICE,
            &format!("/api/v1/logbooks/{}/aircraft", logbook_id),
            aircraft_body("N12345678901"),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_second_pilot_is_a_conflict() {
    let Some(test_db) = TestDatabase::new().await.expect("test database") else {
        return;
    };
    let client = Client::new(test_db.pool());

    let logbook_id = create_logbook(&client, ALICE, "Main").await;
    let uri = format!("/api/v1/logbooks/{}/pilot", logbook_id);

    let (status, _) = client.get(ALICE, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = client
        .post(ALICE, &uri, json!({ "first_name": "Alice", "last_name": "Liddell" }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (status, _) = client.post(ALICE, &uri, json!({ "first_name": "Again" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = client.get(ALICE, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Alice");
}

#[tokio::test]
async fn test_flight_must_use_aircraft_from_same_logbook() {
    let Some(test_db) = TestDatabase::new().await.expect("test database") else {
        return;
    };
    let client = Client::new(test_db.pool());

    let main = create_logbook(&client, ALICE, "Main").await;
    let other = create_logbook(&client, ALICE, "Other").await;

    let (status, aircraft) = client
        .post(
            ALICE,
            &format!("/api/v1/logbooks/{}/aircraft", other),
            aircraft_body("N734EV"),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let flight = json!({
        "aircraft_id": aircraft["id"],
        "flight_date": "2026-09-01",
        "departure_code": "KPAO",
        "destination_code": "KSQL",
        "flight_time_total": "1.0"
    });

    let (status, _) = client
        .post(ALICE, &format!("/api/v1/logbooks/{}/flights", main), flight.clone())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = client
        .post(ALICE, &format!("/api/v1/logbooks/{}/flights", other), flight)
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let flight_id = body["id"].as_i64().unwrap();
    let (status, _) = client
        .post(
            ALICE,
            &format!("/api/v1/logbooks/{}/flights/{}/approaches", other, flight_id),
            json!({ "airport_code": "KSQL", "approach_type": "RNAV (GPS)", "runway": "30" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Approaches are only reachable through the flight's own logbook
    let (status, _) = client
        .get(
            ALICE,
            &format!("/api/v1/logbooks/{}/flights/{}/approaches", main, flight_id),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_passenger_currency_from_recent_landings() {
    let Some(test_db) = TestDatabase::new().await.expect("test database") else {
        return;
    };
    let pool = test_db.pool();
    seed::ensure_seed_data(&pool).await.unwrap();
    let client = Client::new(pool);

    let logbook_id = create_logbook(&client, ALICE, "Main").await;
    let (_, aircraft) = client
        .post(
            ALICE,
            &format!("/api/v1/logbooks/{}/aircraft", logbook_id),
            aircraft_body("N734EV"),
        )
        .await;

    let today = Utc::now().date_naive();
    let (status, _) = client
        .post(
            ALICE,
            &format!("/api/v1/logbooks/{}/flights", logbook_id),
            json!({
                "aircraft_id": aircraft["id"],
                "flight_date": today.to_string(),
                "departure_code": "KPAO",
                "destination_code": "KPAO",
                "flight_time_total": "1.2",
                "number_of_landings_day": 3
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, types) = client.get(ALICE, "/api/v1/reference/currency-types").await;
    assert_eq!(status, StatusCode::OK);
    let asel = types
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["label"] == "Passenger Carrying (Airplane Single-Engine Land)")
        .expect("seeded passenger currency type");

    let currencies_uri = format!("/api/v1/logbooks/{}/currencies", logbook_id);
    let (status, _) = client
        .post(ALICE, &currencies_uri, json!({ "currency_type_id": 999_999 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = client
        .post(ALICE, &currencies_uri, json!({ "currency_type_id": asel["id"] }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["is_current"], true);
    assert_eq!(created["days_remaining"], 90);

    let (status, listed) = client.get(ALICE, &currencies_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["currency_type"]["id"], asel["id"]);
    assert_eq!(listed[0]["is_current"], true);

    // Night currency needs night landings
    let (status, night) = client
        .post(
            ALICE,
            &currencies_uri,
            json!({ "currency_type_id": asel["id"], "is_night_currency": true }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(night["is_current"], false);
    assert_eq!(night["days_remaining"], 0);

    let (status, _) = client
        .send(
            ALICE,
            Method::DELETE,
            &format!("{}/{}", currencies_uri, night["id"]),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
