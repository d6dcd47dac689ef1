#![cfg(feature = "db-tests")]

mod common;
use axum::http::StatusCode;
use serde_json::json;

use crate::common::{
    Action, Flow, admin_session, create_action, language_action, setup_server, setup_test_db,
};

#[tokio::test]
async fn route_user_profile_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;
    let (admin, token) = admin_session(&pool).await;
    let learner = pool.create_user("ana@example.com", "user").await;

    Flow::new(Some(token))
        .step(
            Action::new("list_users", "GET", "/api/v1/users/")
                .assert_body(|body| assert_eq!(body["total"], 2)),
        )
        .step(
            Action::new("rename_learner", "PUT", &format!("/api/v1/users/{learner}"))
                .with_body(json!({ "display_name": " Ana M. ", "avatar_url": "" }))
                .assert_body(|body| {
                    assert_eq!(body["display_name"], "Ana M.");
                    assert_eq!(body["email"], "ana@example.com");
                    assert_eq!(body["role"], "user");
                    assert!(body["avatar_url"].is_null());
                }),
        )
        .step(
            Action::new("blank_name", "PUT", &format!("/api/v1/users/{learner}"))
                .with_body(json!({ "display_name": "" }))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert_eq!(body["errors"][0]["field"], "display_name")),
        )
        .step(
            Action::new("default_preferences", "GET", &format!("/api/v1/users/{learner}/preferences"))
                .assert_body(|body| {
                    assert_eq!(body["daily_goal_minutes"], 10);
                    assert!(body["target_language_id"].is_null());
                    assert_eq!(body["notifications_enabled"], true);
                }),
        )
        .step(language_action("es", "Spanish").with_save_as("language"))
        .step(
            Action::new("save_preferences", "PUT", &format!("/api/v1/users/{learner}/preferences"))
                .with_dyn_body(|ctx| {
                    json!({
                        "daily_goal_minutes": "0",
                        "target_language_id": ctx.id("language"),
                        "notifications_enabled": false,
                    })
                })
                .assert_body(|body| {
                    assert_eq!(body["daily_goal_minutes"], 1);
                    assert_eq!(body["notifications_enabled"], false);
                }),
        )
        .step(
            Action::new("missing_target_language", "PUT", &format!("/api/v1/users/{learner}/preferences"))
                .with_body(json!({ "target_language_id": uuid::Uuid::new_v4() }))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("empty_streak", "GET", &format!("/api/v1/users/{learner}/streak"))
                .assert_body(|body| {
                    assert_eq!(body["current_streak"], 0);
                    assert!(body["last_activity_date"].is_null());
                }),
        )
        .step(
            Action::new("set_streak", "PUT", &format!("/api/v1/users/{learner}/streak"))
                .with_body(json!({
                    "current_streak": 6,
                    "longest_streak": "2",
                    "last_activity_date": "2025-03-01",
                }))
                .assert_body(|body| {
                    assert_eq!(body["current_streak"], 6);
                    assert_eq!(body["longest_streak"], 6);
                }),
        )
        .step(
            Action::new("reset_streak", "DELETE", &format!("/api/v1/users/{learner}/streak"))
                .assert_body(|body| assert_eq!(body["longest_streak"], 0)),
        )
        .step(
            Action::new("cannot_delete_self", "DELETE", &format!("/api/v1/users/{admin}"))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("learner_impact", "GET", &format!("/api/v1/users/{learner}/impact"))
                .assert_body(|body| assert_eq!(body["resource"], "user")),
        )
        .step(
            Action::new("delete_learner", "DELETE", &format!("/api/v1/users/{learner}"))
                .assert_body(|body| assert_eq!(body["redirect_to"], "/api/v1/users/")),
        )
        .step(
            Action::new("learner_gone", "GET", &format!("/api/v1/users/{learner}/preferences"))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_user_achievements_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;
    let (_, token) = admin_session(&pool).await;
    let learner = pool.create_user("li@example.com", "user").await;

    Flow::new(Some(token))
        .step(
            create_action("create_achievement", "achievements", json!({
                "title": "First steps",
                "requirement_type": "lessons_completed",
                "requirement_count": 5,
                "points": "20",
            }))
            .with_save_as("achievement"),
        )
        .step(
            Action::new("grant", "POST", &format!("/api/v1/users/{learner}/achievements"))
                .with_dyn_body(|ctx| json!({ "achievement_id": ctx.id("achievement") }))
                .with_expect(StatusCode::CREATED),
        )
        .step(
            Action::new("grant_twice", "POST", &format!("/api/v1/users/{learner}/achievements"))
                .with_dyn_body(|ctx| json!({ "achievement_id": ctx.id("achievement") }))
                .with_expect(StatusCode::CONFLICT),
        )
        .step(
            Action::new("earned", "GET", &format!("/api/v1/users/{learner}/achievements"))
                .assert_body(|body| {
                    let earned = body.as_array().unwrap();
                    assert_eq!(earned.len(), 1);
                    assert_eq!(earned[0]["title"], "First steps");
                }),
        )
        .step(
            Action::new("achievement_cards", "GET", "/api/v1/dashboard/achievements").assert_body(
                |body| {
                    assert_eq!(body[0]["requirement"], "Complete 5 lessons");
                    assert_eq!(body[0]["points_label"], "20 XP");
                    assert_eq!(body[0]["earned_by"], 1);
                },
            ),
        )
        .step(
            Action::new("progress", "GET", &format!("/api/v1/users/{learner}/progress"))
                .assert_body(|body| {
                    assert_eq!(body["achievements_earned"], 1);
                    assert_eq!(body["points_label"], "20 XP");
                    assert_eq!(body["streak_label"], "0-day streak");
                    assert!(body["plan_name"].is_null());
                }),
        )
        .step(
            Action::new("revoke", "DELETE", "")
                .with_dyn_path(move |ctx| {
                    format!("/api/v1/users/{learner}/achievements/{}", ctx.id("achievement"))
                }),
        )
        .step(
            Action::new("revoke_again", "DELETE", "")
                .with_dyn_path(move |ctx| {
                    format!("/api/v1/users/{learner}/achievements/{}", ctx.id("achievement"))
                })
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_user_membership_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;
    let (_, token) = admin_session(&pool).await;
    let learner = pool.create_user("kim@example.com", "user").await;

    Flow::new(Some(token))
        .step(
            create_action("create_plan", "plans", json!({
                "name": "Plus",
                "price_cents": 999,
                "features": ["Offline mode", " "],
            }))
            .with_save_as("plus")
            .assert_body(|body| {
                assert_eq!(body["duration_days"], 30);
                assert_eq!(body["features"], json!(["Offline mode"]));
            }),
        )
        .step(
            create_action("duplicate_plan", "plans", json!({ "name": "Plus" }))
                .with_expect(StatusCode::CONFLICT),
        )
        .step(
            create_action("create_retired_plan", "plans", json!({
                "name": "Legacy",
                "is_active": false,
            }))
            .with_save_as("legacy"),
        )
        .step(
            Action::new("start_first", "POST", &format!("/api/v1/users/{learner}/memberships"))
                .with_dyn_body(|ctx| json!({ "plan_id": ctx.id("plus") }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("first")
                .assert_body(|body| assert_eq!(body["status"], "active")),
        )
        .step(
            Action::new("start_second", "POST", &format!("/api/v1/users/{learner}/memberships"))
                .with_dyn_body(|ctx| json!({ "plan_id": ctx.id("plus") }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("second"),
        )
        .step(
            Action::new("first_cancelled", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/memberships/{}", ctx.id("first")))
                .assert_body(|body| assert_eq!(body["status"], "cancelled")),
        )
        .step(
            Action::new("inactive_plan", "POST", &format!("/api/v1/users/{learner}/memberships"))
                .with_dyn_body(|ctx| json!({ "plan_id": ctx.id("legacy") }))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            create_action("create_endless_plan", "plans", json!({
                "name": "Endless",
                "duration_days": "99999999999",
            }))
            .with_save_as("endless")
            .assert_body(|body| assert_eq!(body["duration_days"], i32::MAX)),
        )
        .step(
            Action::new("endless_plan_rejected", "POST", &format!("/api/v1/users/{learner}/memberships"))
                .with_dyn_body(|ctx| json!({ "plan_id": ctx.id("endless") }))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("memberships_of_user", "GET", &format!("/api/v1/users/{learner}/memberships"))
                .assert_body(|body| assert_eq!(body["total"], 2)),
        )
        .step(
            Action::new("progress_shows_plan", "GET", &format!("/api/v1/users/{learner}/progress"))
                .assert_body(|body| assert_eq!(body["plan_name"], "Plus")),
        )
        .step(
            Action::new("bad_status", "PUT", "")
                .with_dyn_path(|ctx| format!("/api/v1/memberships/{}", ctx.id("second")))
                .with_body(json!({ "status": "paused" }))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("reactivate_first", "PUT", "")
                .with_dyn_path(|ctx| format!("/api/v1/memberships/{}", ctx.id("first")))
                .with_body(json!({ "status": "active" }))
                .assert_body(|body| assert_eq!(body["status"], "active")),
        )
        .step(
            Action::new("second_cancelled_on_reactivation", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/memberships/{}", ctx.id("second")))
                .assert_body(|body| assert_eq!(body["status"], "cancelled")),
        )
        .step(
            Action::new("expire", "PUT", "")
                .with_dyn_path(|ctx| format!("/api/v1/memberships/{}", ctx.id("second")))
                .with_body(json!({ "status": "Expired" }))
                .assert_body(|body| assert_eq!(body["status"], "expired")),
        )
        .step(
            Action::new("delete_membership", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/memberships/{}", ctx.id("first")))
                .assert_body(move |body| {
                    assert_eq!(
                        body["redirect_to"],
                        format!("/api/v1/users/{learner}/memberships")
                    );
                }),
        )
        .step(
            Action::new("plan_impact", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/plans/{}/impact", ctx.id("plus")))
                .assert_body(|body| assert_eq!(body["dependents"][0]["count"], 1)),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_user_recommendations_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;
    let (_, token) = admin_session(&pool).await;
    let learner = pool.create_user("sam@example.com", "user").await;

    let mut flow = Flow::new(Some(token))
        .step(language_action("de", "German").with_save_as("german"))
        .step(language_action("it", "Italian").with_save_as("italian"));

    for (title, language) in [
        ("German 1", "german"),
        ("German 2", "german"),
        ("German 3", "german"),
        ("German 4", "german"),
        ("Italian 1", "italian"),
    ] {
        flow = flow.step(
            Action::new("create_course", "POST", "/api/v1/courses/")
                .with_dyn_body(move |ctx| {
                    json!({
                        "language_id": ctx.id(language),
                        "title": title,
                        "is_published": true,
                    })
                })
                .with_expect(StatusCode::CREATED),
        );
    }

    flow.step(
        Action::new("draft_course", "POST", "/api/v1/courses/")
            .with_dyn_body(|ctx| json!({ "language_id": ctx.id("italian"), "title": "Draft" }))
            .with_expect(StatusCode::CREATED),
    )
    .step(
        Action::new("any_language", "GET", &format!("/api/v1/users/{learner}/recommendations"))
            .assert_body(|body| {
                let cards = body.as_array().unwrap();
                assert_eq!(cards.len(), 3);
                assert!(cards.iter().all(|c| c["title"] != "Draft"));
                assert_eq!(cards[0]["reason"], "Popular beginner course");
            }),
    )
    .step(
        Action::new("target_italian", "PUT", &format!("/api/v1/users/{learner}/preferences"))
            .with_dyn_body(|ctx| json!({ "target_language_id": ctx.id("italian") })),
    )
    .step(
        Action::new("targeted", "GET", &format!("/api/v1/users/{learner}/recommendations"))
            .assert_body(|body| {
                let cards = body.as_array().unwrap();
                assert_eq!(cards.len(), 1);
                assert_eq!(cards[0]["title"], "Italian 1");
                assert_eq!(cards[0]["reason"], "You are learning Italian");
                assert_eq!(cards[0]["lessons_label"], "0 lessons");
            }),
    )
    .run(&mut server, pool)
    .await;
}
