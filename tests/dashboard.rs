#![cfg(feature = "db-tests")]

mod common;
use axum::http::StatusCode;
use serde_json::json;

use crate::common::{
    Action, Flow, admin_session, category_action, language_action, setup_server, setup_test_db,
};

#[tokio::test]
async fn route_dashboard_cards_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;
    let (_, token) = admin_session(&pool).await;

    Flow::new(Some(token))
        .step(language_action("pt", "Portuguese"))
        .step(category_action("Grammar").with_save_as("grammar"))
        .step(category_action("Empty"))
        .step(
            Action::new("create_module", "POST", "/api/v1/modules/")
                .with_dyn_body(|ctx| {
                    json!({
                        "category_id": ctx.id("grammar"),
                        "title": "Verbs",
                        "difficulty": "Hard",
                        "estimated_minutes": 15,
                    })
                })
                .with_expect(StatusCode::CREATED)
                .with_save_as("module"),
        )
        .step(
            Action::new("create_exercise", "POST", "/api/v1/exercises/")
                .with_dyn_body(|ctx| {
                    json!({
                        "module_id": ctx.id("module"),
                        "title": "Ser or estar",
                        "exercise_type": "multiple_choice",
                        "content": { "question": "Eu ___ feliz", "options": ["sou", "estou"], "correct_index": 1 },
                        "points": 15,
                    })
                })
                .with_expect(StatusCode::CREATED),
        )
        .step(
            Action::new("overview", "GET", "/api/v1/dashboard/overview").assert_body(|body| {
                assert_eq!(body["languages"], 1);
                assert_eq!(body["categories"], 2);
                assert_eq!(body["modules"], 1);
                assert_eq!(body["exercises"], 1);
                assert_eq!(body["users"], 1);
            }),
        )
        .step(
            Action::new("category_cards", "GET", "/api/v1/dashboard/categories").assert_body(
                |body| {
                    let grammar = body
                        .as_array()
                        .unwrap()
                        .iter()
                        .find(|c| c["name"] == "Grammar")
                        .unwrap();
                    assert_eq!(grammar["module_count"], 1);
                    assert_eq!(grammar["modules_label"], "1 module");
                },
            ),
        )
        .step(
            Action::new("module_cards", "GET", "/api/v1/dashboard/modules")
                .with_dyn_param("category_id", |ctx| ctx.id("grammar"))
                .assert_body(|body| {
                    assert_eq!(body[0]["difficulty"], "hard");
                    assert_eq!(body[0]["duration_label"], "15 min");
                    assert_eq!(body[0]["exercise_count"], 1);
                    assert_eq!(body[0]["exercise_points"], 15);
                }),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_richtext_format_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;
    let (_, token) = admin_session(&pool).await;

    Flow::new(Some(token))
        .step(
            Action::new("bold", "POST", "/api/v1/richtext/format")
                .with_body(json!({
                    "text": "say hello now",
                    "selection": { "start": 4, "end": 9 },
                    "markup": { "style": "bold" },
                }))
                .assert_body(|body| {
                    assert_eq!(body["text"], "say <b>hello</b> now");
                    assert_eq!(body["selection"], json!({ "start": 7, "end": 12 }));
                }),
        )
        .step(
            Action::new("nothing_focused", "POST", "/api/v1/richtext/format")
                .with_body(json!({ "text": "abc", "markup": { "style": "italic" } }))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("custom_tags", "POST", "/api/v1/richtext/format")
                .with_body(json!({
                    "text": "abc",
                    "selection": { "start": 1, "end": 1 },
                    "markup": { "style": "custom", "open": "<s>", "close": "</s>" },
                }))
                .assert_body(|body| assert_eq!(body["text"], "a<s></s>bc")),
        )
        .run(&mut server, pool)
        .await;
}
