use chrono::TimeZone as _;
use model::{
    route::RouteState,
    user::{Credential, Login, User},
    vehicle::Vehicle,
    waypoint::{Coordinate, Waypoint},
};
use serde_json::json;
use tracker::{ApiError, Tracker, TrackerClient, TrackerConfig};
use utility::id::Id;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PREFIX: &str = "/services-1.0.0";

fn client(server: &MockServer) -> TrackerClient {
    TrackerClient::new(&TrackerConfig::new(server.uri(), PREFIX)).unwrap()
}

#[tokio::test]
async fn authenticate_returns_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services-1.0.0/auth"))
        .and(body_json(json!({ "username": "alice", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t0k3n" })))
        .expect(1)
        .mount(&server)
        .await;

    let credential = client(&server)
        .authenticate(&Login::new("alice", "hunter2"))
        .await
        .unwrap();

    assert_eq!(credential.token, "t0k3n");
}

#[tokio::test]
async fn rejected_authentication_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services-1.0.0/auth"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
        )
        .mount(&server)
        .await;

    let error = client(&server)
        .authenticate(&Login::new("alice", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        ApiError::Rejected { status_code, .. } if status_code.as_u16() == 401
    ));
    assert_eq!(error.message(), Some("Bad credentials"));
}

#[tokio::test]
async fn authenticated_requests_carry_the_bearer_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services-1.0.0/vehicle"))
        .and(header("Authorization", "Sleepy token=abc"))
        .and(body_json(json!({
            "make": "Hansen Ltd",
            "model": "Quia",
            "vintage": "1998",
            "vin": "4006381333931"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 31,
            "make": "Hansen Ltd",
            "model": "Quia",
            "vintage": 1998,
            "vin": "4006381333931"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let vehicle = client(&server)
        .create_vehicle(
            &Credential::new("abc"),
            &Vehicle {
                make: "Hansen Ltd".to_owned(),
                model: "Quia".to_owned(),
                vintage: 1998,
                vin: "4006381333931".to_owned(),
            },
        )
        .await
        .unwrap();

    assert_eq!(vehicle.id.raw(), "31");
    assert_eq!(vehicle.content.vintage, 1998);
}

#[tokio::test]
async fn user_creation_uses_admin_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services-1.0.0/user"))
        .and(header("Authorization", "Sleepy token=admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4,
            "username": "fuzzy_otter_17",
            "givenname": "Ada",
            "surname": "McTestface"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client(&server)
        .create_user(
            &Credential::new("admin"),
            &User {
                username: "fuzzy_otter_17".to_owned(),
                givenname: Some("Ada".to_owned()),
                surname: Some("McTestface".to_owned()),
                password: Some("hunter2".to_owned()),
            },
        )
        .await
        .unwrap();

    assert_eq!(user.username, "fuzzy_otter_17");
}

#[tokio::test]
async fn route_lifecycle_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services-1.0.0/route"))
        .and(body_json(json!({ "vehicleid": "31", "routeState": "CREATED" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9,
            "vehicleid": 31,
            "routeState": "CREATED"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/services-1.0.0/route/9"))
        .and(body_json(json!({ "routeState": "ACTIVE" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9,
            "vehicleid": 31,
            "routeState": "ACTIVE"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let credential = Credential::new("abc");
    let route = client
        .create_route(&credential, &Id::new("31".to_owned()), RouteState::Created)
        .await
        .unwrap();
    assert_eq!(route.id.raw(), "9");
    assert_eq!(route.content.route_state, RouteState::Created);

    let changed = client
        .set_route_state(&credential, &route.id, RouteState::Active)
        .await
        .unwrap();
    assert_eq!(changed["routeState"], "ACTIVE");
}

#[tokio::test]
async fn waypoint_submission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services-1.0.0/route/9/waypoint"))
        .and(body_json(json!({
            "latitude": 57.0,
            "longitude": 9.9,
            "timestamp": 1462060800123i64
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "w1",
            "latitude": 57.0,
            "longitude": 9.9,
            "timestamp": 1462060800123i64
        })))
        .expect(1)
        .mount(&server)
        .await;

    let waypoint = Waypoint::new(
        Coordinate::new(57.0, 9.9),
        chrono::Utc.timestamp_millis_opt(1462060800123).unwrap(),
    );
    let created = client(&server)
        .submit_waypoint(&Credential::new("abc"), &Id::new("9".to_owned()), &waypoint)
        .await
        .unwrap();

    assert_eq!(created["id"], "w1");
    assert_eq!(created["timestamp"], 1462060800123i64);
}

#[tokio::test]
async fn logged_answers_only_need_to_be_json() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/services-1.0.0/route/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 5 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/services-1.0.0/route/9/waypoint"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 5 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/services-1.0.0/route/10"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let credential = Credential::new("abc");
    let route_id = Id::new("9".to_owned());

    let changed = client
        .set_route_state(&credential, &route_id, RouteState::Complete)
        .await
        .unwrap();
    assert_eq!(changed, json!({ "id": 5 }));

    let waypoint = Waypoint::now(Coordinate::new(57.0, 9.9));
    let created = client
        .submit_waypoint(&credential, &route_id, &waypoint)
        .await
        .unwrap();
    assert_eq!(created, json!({ "id": 5 }));

    let empty = client
        .set_route_state(&credential, &Id::new("10".to_owned()), RouteState::Complete)
        .await
        .unwrap();
    assert!(empty.is_null());
}

#[tokio::test]
async fn rejected_without_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services-1.0.0/route/9/waypoint"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let waypoint = Waypoint::now(Coordinate::new(57.0, 9.9));
    let error = client(&server)
        .submit_waypoint(&Credential::new("abc"), &Id::new("9".to_owned()), &waypoint)
        .await
        .unwrap_err();

    assert_eq!(error.message(), Some("Internal Server Error"));
}
