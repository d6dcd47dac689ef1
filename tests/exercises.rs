#![cfg(feature = "db-tests")]

mod common;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::common::{
    Action, Flow, admin_session, category_action, setup_server, setup_test_db,
};

fn module_action() -> Action {
    Action::new("create_module", "POST", "/api/v1/modules/")
        .with_dyn_body(|ctx| {
            json!({
                "category_id": ctx.id("category"),
                "title": "Cafe talk",
                "difficulty": "easy",
            })
        })
        .with_expect(StatusCode::CREATED)
        .with_save_as("module")
}

#[tokio::test]
async fn route_exercise_editor_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;
    let (_, token) = admin_session(&pool).await;

    Flow::new(Some(token))
        .step(category_action("Food").with_save_as("category"))
        .step(module_action())
        .step(
            Action::new("create_choice", "POST", "/api/v1/exercises/")
                .with_dyn_body(|ctx| {
                    json!({
                        "module_id": ctx.id("module"),
                        "title": "Order a coffee",
                        "exercise_type": "multiple_choice",
                        "content": {
                            "question": " Which one is coffee? ",
                            "options": ["café", " thé "],
                            "correct_index": 0,
                        },
                    })
                })
                .with_expect(StatusCode::CREATED)
                .with_save_as("exercise")
                .assert_body(|body| {
                    assert_eq!(body["exercise_type"], "multiple_choice");
                    assert_eq!(body["content"]["question"], "Which one is coffee?");
                    assert_eq!(body["content"]["options"][1], "thé");
                    assert_eq!(body["points"], 10);
                }),
        )
        .step(
            Action::new("editor_state", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/exercises/{}/form", ctx.id("exercise")))
                .assert_body(|body| {
                    let editor = &body["editor"];
                    assert_eq!(editor["exercise_type"], "multiple_choice");
                    assert_eq!(editor["multiple_choice"]["correct_index"], 0);
                    assert_eq!(editor["matching"]["pairs"], json!([]));
                    assert_eq!(editor["listening"]["audio_url"], "");
                }),
        )
        .step(
            Action::new("switch_to_matching", "PUT", "")
                .with_dyn_path(|ctx| format!("/api/v1/exercises/{}", ctx.id("exercise")))
                .with_dyn_body(|ctx| {
                    json!({
                        "module_id": ctx.id("module"),
                        "title": "Pair the drinks",
                        "exercise_type": "matching",
                        "content": {
                            "pairs": [
                                { "left": "café", "right": "coffee" },
                                { "left": "", "right": "" },
                                { "left": "thé", "right": "tea" },
                            ],
                        },
                        "points": "25",
                    })
                })
                .assert_body(|body| {
                    assert_eq!(body["exercise_type"], "matching");
                    assert_eq!(body["content"]["pairs"].as_array().unwrap().len(), 2);
                    assert!(body["content"].get("question").is_none());
                }),
        )
        .step(
            Action::new("preview", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/exercises/{}/preview", ctx.id("exercise")))
                .assert_body(|body| {
                    assert_eq!(body["type_label"], "Matching");
                    assert_eq!(body["summary"], "2 pairs");
                    assert_eq!(body["points_label"], "25 XP");
                    assert!(body["prompt"].is_null());
                }),
        )
        .step(
            Action::new("list_of_module", "GET", "/api/v1/exercises/")
                .with_dyn_param("module_id", |ctx| ctx.id("module"))
                .assert_body(|body| assert_eq!(body["total"], 1)),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_exercise_validation_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;
    let (_, token) = admin_session(&pool).await;

    Flow::new(Some(token))
        .step(category_action("Travel").with_save_as("category"))
        .step(module_action())
        .step(
            Action::new("unknown_type", "POST", "/api/v1/exercises/")
                .with_dyn_body(|ctx| {
                    json!({
                        "module_id": ctx.id("module"),
                        "title": "Essay",
                        "exercise_type": "essay",
                        "content": {},
                    })
                })
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert_eq!(body["errors"][0]["field"], "exercise_type")),
        )
        .step(
            Action::new("bad_choice", "POST", "/api/v1/exercises/")
                .with_dyn_body(|ctx| {
                    json!({
                        "module_id": ctx.id("module"),
                        "title": "Tickets",
                        "exercise_type": "multiple_choice",
                        "content": { "question": "", "options": ["one"], "correct_index": 3 },
                    })
                })
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| {
                    let fields: Vec<_> = body["errors"]
                        .as_array()
                        .unwrap()
                        .iter()
                        .map(|e| e["field"].as_str().unwrap().to_string())
                        .collect();
                    assert_eq!(
                        fields,
                        ["content.question", "content.options", "content.correct_index"]
                    );
                }),
        )
        .step(
            Action::new("listening_without_audio", "POST", "/api/v1/exercises/")
                .with_dyn_body(|ctx| {
                    json!({
                        "module_id": ctx.id("module"),
                        "title": "At the station",
                        "exercise_type": "listening",
                        "content": { "transcript": "Le train part." },
                    })
                })
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert_eq!(body["errors"][0]["field"], "content.audio_url")),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_exercise_stored_legacy_type_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;
    let (_, token) = admin_session(&pool).await;

    let category = Uuid::new_v4();
    let module = Uuid::new_v4();
    let exercise = Uuid::new_v4();
    sqlx::query("INSERT INTO learning_categories (id, name) VALUES ($1, 'Legacy')")
        .bind(category)
        .execute(pool.pool())
        .await
        .unwrap();
    sqlx::query("INSERT INTO learning_modules (id, category_id, title) VALUES ($1, $2, 'Old')")
        .bind(module)
        .bind(category)
        .execute(pool.pool())
        .await
        .unwrap();
    sqlx::query(
        r#"INSERT INTO exercises (id, module_id, title, exercise_type, content) VALUES ($1, $2, 'Old', 'fill_blank', '"broken"')"#,
    )
    .bind(exercise)
    .bind(module)
    .execute(pool.pool())
    .await
    .unwrap();
    Flow::new(Some(token))
        .step(
            Action::new("editor_falls_back", "GET", &format!("/api/v1/exercises/{exercise}/form"))
                .assert_body(|body| {
                    assert_eq!(body["editor"]["exercise_type"], "multiple_choice");
                    assert_eq!(body["editor"]["multiple_choice"]["question"], "");
                }),
        )
        .step(
            Action::new("preview_of_broken_content", "GET", &format!("/api/v1/exercises/{exercise}/preview"))
                .assert_body(|body| assert_eq!(body["summary"], "0 options")),
        )
        .run(&mut server, pool)
        .await;
}
