#![cfg(feature = "db-tests")]

mod common;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::common::{
    Action, Flow, admin_session, category_action, create_action, language_action, setup_server,
    setup_test_db, token_for,
};

#[tokio::test]
async fn route_auth_required_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;
    let learner = pool.create_user("learner@example.com", "user").await;
    let learner_token = token_for(learner).await;

    Flow::new(None)
        .step(
            Action::new("no_token", "GET", "/api/v1/languages/")
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .step(
            Action::new("garbage_token", "GET", "/api/v1/languages/")
                .with_bearer("not-a-jwt")
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("not_admin", "GET", "/api/v1/languages/")
                .with_bearer(learner_token.clone())
                .with_expect(StatusCode::FORBIDDEN)
                .assert_body(|body| assert_eq!(body["status_code"], "403")),
        )
        // a non-admin still has a session
        .step(
            Action::new("session", "GET", "/api/v1/session")
                .with_session_cookie(learner_token)
                .assert_body(|body| assert_eq!(body["role"], "user")),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_language_course_lesson_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;
    let (_, token) = admin_session(&pool).await;

    Flow::new(Some(token))
        .step(
            language_action(" ES ", "Spanish")
                .with_save_as("language")
                .assert_body(|body| {
                    assert_eq!(body["code"], "es");
                    assert_eq!(body["is_active"], true);
                }),
        )
        .step(language_action("es", "Spanish again").with_expect(StatusCode::CONFLICT))
        .step(
            create_action("course_invalid", "courses", json!({ "title": "  " }))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| {
                    let fields: Vec<_> = body["errors"]
                        .as_array()
                        .unwrap()
                        .iter()
                        .map(|e| e["field"].as_str().unwrap().to_string())
                        .collect();
                    assert_eq!(fields, ["language_id", "title"]);
                }),
        )
        .step(
            create_action("course_missing_language", "courses", json!({
                "language_id": uuid::Uuid::new_v4(),
                "title": "Basics",
            }))
            .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("create_course", "POST", "/api/v1/courses/")
                .with_dyn_body(|ctx| {
                    json!({
                        "language_id": ctx.id("language"),
                        "title": "Basics 1",
                        "is_published": true,
                        "order_index": "2",
                    })
                })
                .with_expect(StatusCode::CREATED)
                .with_save_as("course")
                .assert_body(|body| {
                    assert_eq!(body["level"], "beginner");
                    assert_eq!(body["order_index"], 2);
                }),
        )
        .step(
            Action::new("create_lesson", "POST", "/api/v1/lessons/")
                .with_dyn_body(|ctx| {
                    json!({
                        "course_id": ctx.id("course"),
                        "title": "Greetings",
                        "content": "<b>Hola</b>",
                        "duration_minutes": "0",
                    })
                })
                .with_expect(StatusCode::CREATED)
                .with_save_as("lesson")
                .assert_body(|body| assert_eq!(body["duration_minutes"], 1)),
        )
        .step(
            Action::new("list_lessons_of_course", "GET", "/api/v1/lessons/")
                .with_dyn_param("course_id", |ctx| ctx.id("course"))
                .with_param("limit", "1000")
                .assert_body(|body| {
                    assert_eq!(body["total"], 1);
                    assert_eq!(body["limit"], 100);
                    assert_eq!(body["items"][0]["title"], "Greetings");
                }),
        )
        .step(
            Action::new("update_course", "PUT", "")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}", ctx.id("course")))
                .with_dyn_body(|ctx| {
                    json!({
                        "language_id": ctx.id("language"),
                        "title": "Basics I",
                        "level": "Intermediate",
                    })
                })
                .assert_body(|body| {
                    assert_eq!(body["title"], "Basics I");
                    assert_eq!(body["level"], "intermediate");
                }),
        )
        .step(
            Action::new("language_impact", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/languages/{}/impact", ctx.id("language")))
                .assert_body(|body| {
                    assert_eq!(body["dependents"][0]["resource"], "course");
                    assert_eq!(body["dependents"][0]["count"], 1);
                    assert!(body["message"].as_str().unwrap().contains("1 course"));
                }),
        )
        .step(
            Action::new("delete_lesson", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}", ctx.id("lesson")))
                .with_save_as("deleted_lesson"),
        )
        .step(
            Action::new("lesson_gone", "GET", "")
                .with_dyn_path(|ctx| {
                    let redirect = ctx.get("deleted_lesson")["redirect_to"].as_str().unwrap().to_string();
                    assert_eq!(redirect, format!("/api/v1/lessons/?course_id={}", ctx.id("course")));
                    format!("/api/v1/lessons/{}", ctx.id("lesson"))
                })
                .with_expect(StatusCode::NOT_FOUND),
        )
        .step(
            Action::new("delete_language", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/languages/{}", ctx.id("language")))
                .assert_body(|body| assert_eq!(body["redirect_to"], "/api/v1/languages/")),
        )
        .step(
            Action::new("course_cascaded", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}", ctx.id("course")))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_words_sentences_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;
    let (_, token) = admin_session(&pool).await;

    Flow::new(Some(token))
        .step(language_action("fr", "French").with_save_as("language"))
        .step(
            Action::new("create_word", "POST", "/api/v1/words/")
                .with_dyn_body(|ctx| {
                    json!({
                        "language_id": ctx.id("language"),
                        "word": "chat",
                        "translation": "cat",
                        "pronunciation": "",
                    })
                })
                .with_expect(StatusCode::CREATED)
                .with_save_as("word")
                .assert_body(|body| {
                    assert!(body["pronunciation"].is_null());
                    assert_eq!(body["difficulty_level"], 1);
                }),
        )
        .step(
            Action::new("create_sentence", "POST", "/api/v1/sentences/")
                .with_dyn_body(|ctx| json!({ "word_id": ctx.id("word"), "sentence": "Le chat dort." }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("sentence"),
        )
        .step(
            Action::new("word_impact", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/words/{}/impact", ctx.id("word")))
                .assert_body(|body| assert_eq!(body["dependents"][0]["count"], 1)),
        )
        .step(
            Action::new("delete_sentence", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/sentences/{}", ctx.id("sentence")))
                .assert_body(|body| {
                    assert!(body["redirect_to"].as_str().unwrap().starts_with("/api/v1/sentences/?word_id="));
                }),
        )
        .step(
            Action::new("delete_missing_sentence", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/sentences/{}", ctx.id("sentence")))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_category_module_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;
    let (_, token) = admin_session(&pool).await;

    Flow::new(Some(token))
        .step(category_action("Travel").with_save_as("category"))
        .step(
            Action::new("rename_category", "PUT", "")
                .with_dyn_path(|ctx| format!("/api/v1/categories/{}", ctx.id("category")))
                .with_body(json!({ "name": " Travel phrases ", "color": " " }))
                .assert_body(|body| {
                    assert_eq!(body["name"], "Travel phrases");
                    assert!(body["color"].is_null());
                }),
        )
        .step(
            Action::new("blank_category_name", "PUT", "")
                .with_dyn_path(|ctx| format!("/api/v1/categories/{}", ctx.id("category")))
                .with_body(json!({ "name": "" }))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("create_module", "POST", "/api/v1/modules/")
                .with_dyn_body(|ctx| json!({ "category_id": ctx.id("category"), "title": "At the airport" }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("module"),
        )
        .step(
            Action::new("update_module", "PUT", "")
                .with_dyn_path(|ctx| format!("/api/v1/modules/{}", ctx.id("module")))
                .with_dyn_body(|ctx| {
                    json!({
                        "category_id": ctx.id("category"),
                        "title": "At the airport",
                        "difficulty": "Medium",
                        "estimated_minutes": "12.5",
                    })
                })
                .assert_body(|body| {
                    assert_eq!(body["difficulty"], "medium");
                    assert_eq!(body["estimated_minutes"], 12);
                }),
        )
        .step(
            Action::new("create_exercise", "POST", "/api/v1/exercises/")
                .with_dyn_body(|ctx| {
                    json!({
                        "module_id": ctx.id("module"),
                        "title": "Gate numbers",
                        "exercise_type": "multiple_choice",
                        "content": { "question": "Gate?", "options": ["A1", "B2"], "correct_index": 1 },
                    })
                })
                .with_expect(StatusCode::CREATED),
        )
        .step(
            Action::new("module_impact", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/modules/{}/impact", ctx.id("module")))
                .assert_body(|body| {
                    assert_eq!(body["dependents"][0]["resource"], "exercise");
                    assert_eq!(body["dependents"][0]["count"], 1);
                }),
        )
        .step(
            Action::new("category_impact", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/categories/{}/impact", ctx.id("category")))
                .assert_body(|body| {
                    assert_eq!(body["dependents"][0]["resource"], "module");
                    assert_eq!(
                        body["message"],
                        "Delete this category? It is referenced by 1 module. This action cannot be undone."
                    );
                }),
        )
        .step(
            Action::new("delete_module", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/modules/{}", ctx.id("module")))
                .assert_body(|body| {
                    let redirect = body["redirect_to"].as_str().unwrap();
                    assert!(redirect.starts_with("/api/v1/modules/?category_id="));
                }),
        )
        .step(
            Action::new("category_impact_after_delete", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/categories/{}/impact", ctx.id("category")))
                .assert_body(|body| {
                    assert_eq!(body["dependents"][0]["count"], 0);
                    assert_eq!(body["message"], "Delete this category? This action cannot be undone.");
                }),
        )
        .step(
            Action::new("delete_category", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/categories/{}", ctx.id("category")))
                .assert_body(|body| assert_eq!(body["redirect_to"], "/api/v1/categories/")),
        )
        .step(
            Action::new("category_gone", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/categories/{}", ctx.id("category")))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_achievement_plan_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;
    let (_, token) = admin_session(&pool).await;
    let learner = pool.create_user("lee@example.com", "user").await;

    Flow::new(Some(token))
        .step(
            create_action("achievement_without_requirement", "achievements", json!({
                "title": "Globetrotter",
            }))
            .with_expect(StatusCode::BAD_REQUEST)
            .assert_body(|body| assert_eq!(body["errors"][0]["field"], "requirement_type")),
        )
        .step(
            create_action("create_achievement", "achievements", json!({
                "title": "Globetrotter",
                "requirement_type": "lessons_completed",
            }))
            .with_save_as("achievement")
            .assert_body(|body| assert_eq!(body["requirement_count"], 1)),
        )
        .step(
            Action::new("update_achievement", "PUT", "")
                .with_dyn_path(|ctx| format!("/api/v1/achievements/{}", ctx.id("achievement")))
                .with_body(json!({
                    "title": "Globetrotter",
                    "requirement_type": "Streak_Days",
                    "requirement_count": "7",
                    "points": "2.9",
                }))
                .assert_body(|body| {
                    assert_eq!(body["requirement_type"], "streak_days");
                    assert_eq!(body["requirement_count"], 7);
                    assert_eq!(body["points"], 2);
                }),
        )
        .step(
            Action::new("grant", "POST", &format!("/api/v1/users/{learner}/achievements"))
                .with_dyn_body(|ctx| json!({ "achievement_id": ctx.id("achievement") }))
                .with_expect(StatusCode::CREATED),
        )
        .step(
            Action::new("achievement_impact", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/achievements/{}/impact", ctx.id("achievement")))
                .assert_body(|body| {
                    assert_eq!(body["dependents"][0]["resource"], "user_achievement");
                    assert!(body["message"].as_str().unwrap().contains("1 earned achievement"));
                }),
        )
        .step(
            Action::new("delete_achievement", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/achievements/{}", ctx.id("achievement")))
                .assert_body(|body| assert_eq!(body["redirect_to"], "/api/v1/achievements/")),
        )
        .step(
            Action::new("earned_cascaded", "GET", &format!("/api/v1/users/{learner}/achievements"))
                .assert_body(|body| assert!(body.as_array().unwrap().is_empty())),
        )
        .step(create_action("create_plan", "plans", json!({ "name": "Plus" })).with_save_as("plan"))
        .step(
            Action::new("update_plan", "PUT", "")
                .with_dyn_path(|ctx| format!("/api/v1/plans/{}", ctx.id("plan")))
                .with_body(json!({ "name": "Plus", "duration_days": 365, "is_active": false }))
                .assert_body(|body| {
                    assert_eq!(body["duration_days"], 365);
                    assert_eq!(body["is_active"], false);
                }),
        )
        .step(
            Action::new("plan_impact", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/plans/{}/impact", ctx.id("plan")))
                .assert_body(|body| {
                    assert_eq!(body["dependents"][0]["count"], 0);
                    assert_eq!(body["message"], "Delete this membership plan? This action cannot be undone.");
                }),
        )
        .step(
            Action::new("delete_plan", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/plans/{}", ctx.id("plan")))
                .assert_body(|body| assert_eq!(body["redirect_to"], "/api/v1/plans/")),
        )
        .step(
            Action::new("plan_gone", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/plans/{}", ctx.id("plan")))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_delete_still_referenced_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;
    let (_, token) = admin_session(&pool).await;

    let category = Uuid::new_v4();
    let module = Uuid::new_v4();
    sqlx::query("INSERT INTO learning_categories (id, name) VALUES ($1, 'Travel')")
        .bind(category)
        .execute(pool.pool())
        .await
        .unwrap();
    sqlx::query("INSERT INTO learning_modules (id, category_id, title) VALUES ($1, $2, 'Airport')")
        .bind(module)
        .bind(category)
        .execute(pool.pool())
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE module_reviews (module_id UUID NOT NULL REFERENCES learning_modules(id) ON DELETE RESTRICT)",
    )
    .execute(pool.pool())
    .await
    .unwrap();
    sqlx::query("INSERT INTO module_reviews (module_id) VALUES ($1)")
        .bind(module)
        .execute(pool.pool())
        .await
        .unwrap();

    Flow::new(Some(token))
        .step(
            Action::new("delete_referenced_module", "DELETE", &format!("/api/v1/modules/{module}"))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| {
                    assert_eq!(body["status_code"], "400");
                    assert!(body["message"].as_str().unwrap().contains("still referenced"));
                }),
        )
        .step(Action::new("module_kept", "GET", &format!("/api/v1/modules/{module}")))
        .run(&mut server, pool)
        .await;
}
