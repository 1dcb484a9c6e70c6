//! Integration tests for workout and water logging

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_cardio_burn_uses_profile_weight() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user();

    app.put_auth("/api/user/profile", &json!({"weight": 80.0}), &user.token)
        .await;

    let request = json!({
        "date": "2024-03-10",
        "type": "cardio",
        "exercise_name": "Rowing",
        "duration": 30,
        "met": 6.0
    });
    let (status, body) = app.post_auth("/api/workouts/log", &request, &user.token).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(common::json(&body)["calories_burned"], 240);

    let (status, body) = app.get_auth("/api/workouts/log/2024-03-10", &user.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::json(&body)["total_burned"], 240);

    app.cleanup_user(&user).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_strength_sets_are_stored() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user();

    let request = json!({
        "date": "2024-03-10",
        "type": "strength",
        "exercise_name": "Bench Press",
        "reps": 8,
        "sets_data": [
            {"weight": 60, "reps": 8},
            {"weight": "70", "reps": 6},
            {"weight": "", "reps": 5}
        ]
    });
    let (status, body) = app.post_auth("/api/workouts/log", &request, &user.token).await;

    assert_eq!(status, StatusCode::CREATED);
    let workout = common::json(&body);
    assert_eq!(workout["sets"], 3);
    assert_eq!(workout["sets_data"].as_array().unwrap().len(), 3);
    assert!(workout["calories_burned"].as_i64().unwrap() > 0);

    app.cleanup_user(&user).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_water_totals_and_delete() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user();

    for amount in [250, 500] {
        let (status, _) = app
            .post_auth(
                "/api/water/log",
                &json!({"date": "2024-03-10", "amount": amount}),
                &user.token,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = app.get_auth("/api/water/log/2024-03-10", &user.token).await;
    let log = common::json(&body);
    assert_eq!(log["total"], 750);

    let id = log["entries"][0]["id"].as_str().unwrap().to_string();
    let (status, _) = app
        .delete_auth(&format!("/api/water/log/{id}"), &user.token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.get_auth("/api/water/log/2024-03-10", &user.token).await;
    assert_eq!(common::json(&body)["entries"].as_array().unwrap().len(), 1);

    app.cleanup_user(&user).await;
}
