use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub struct SessionAuthModifier;

impl Modify for SessionAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "SID",
                    "Session token issued by the auth provider",
                ))),
            );
            schema.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::achievements::achievements_list_handler,
        crate::web::routes::achievements::achievements_get_handler,
        crate::web::routes::achievements::achievements_create_handler,
        crate::web::routes::achievements::achievements_update_handler,
        crate::web::routes::achievements::achievements_impact_handler,
        crate::web::routes::achievements::achievements_delete_handler,
        crate::web::routes::categories::categories_list_handler,
        crate::web::routes::categories::categories_get_handler,
        crate::web::routes::categories::categories_create_handler,
        crate::web::routes::categories::categories_update_handler,
        crate::web::routes::categories::categories_impact_handler,
        crate::web::routes::categories::categories_delete_handler,
        crate::web::routes::courses::courses_list_handler,
        crate::web::routes::courses::courses_get_handler,
        crate::web::routes::courses::courses_create_handler,
        crate::web::routes::courses::courses_update_handler,
        crate::web::routes::courses::courses_impact_handler,
        crate::web::routes::courses::courses_delete_handler,
        crate::web::routes::dashboard::dashboard_overview_handler,
        crate::web::routes::dashboard::dashboard_achievements_handler,
        crate::web::routes::dashboard::dashboard_categories_handler,
        crate::web::routes::dashboard::dashboard_modules_handler,
        crate::web::routes::exercises::exercises_list_handler,
        crate::web::routes::exercises::exercises_get_handler,
        crate::web::routes::exercises::exercises_create_handler,
        crate::web::routes::exercises::exercises_update_handler,
        crate::web::routes::exercises::exercises_impact_handler,
        crate::web::routes::exercises::exercises_delete_handler,
        crate::web::routes::exercises::exercises_form_handler,
        crate::web::routes::exercises::exercises_preview_handler,
        crate::web::routes::languages::languages_list_handler,
        crate::web::routes::languages::languages_get_handler,
        crate::web::routes::languages::languages_create_handler,
        crate::web::routes::languages::languages_update_handler,
        crate::web::routes::languages::languages_impact_handler,
        crate::web::routes::languages::languages_delete_handler,
        crate::web::routes::lessons::lessons_list_handler,
        crate::web::routes::lessons::lessons_get_handler,
        crate::web::routes::lessons::lessons_create_handler,
        crate::web::routes::lessons::lessons_update_handler,
        crate::web::routes::lessons::lessons_impact_handler,
        crate::web::routes::lessons::lessons_delete_handler,
        crate::web::routes::memberships::memberships_get_handler,
        crate::web::routes::memberships::memberships_update_handler,
        crate::web::routes::memberships::memberships_delete_handler,
        crate::web::routes::modules::modules_list_handler,
        crate::web::routes::modules::modules_get_handler,
        crate::web::routes::modules::modules_create_handler,
        crate::web::routes::modules::modules_update_handler,
        crate::web::routes::modules::modules_impact_handler,
        crate::web::routes::modules::modules_delete_handler,
        crate::web::routes::plans::plans_list_handler,
        crate::web::routes::plans::plans_get_handler,
        crate::web::routes::plans::plans_create_handler,
        crate::web::routes::plans::plans_update_handler,
        crate::web::routes::plans::plans_impact_handler,
        crate::web::routes::plans::plans_delete_handler,
        crate::web::routes::richtext::richtext_format_handler,
        crate::web::routes::sentences::sentences_list_handler,
        crate::web::routes::sentences::sentences_get_handler,
        crate::web::routes::sentences::sentences_create_handler,
        crate::web::routes::sentences::sentences_update_handler,
        crate::web::routes::sentences::sentences_impact_handler,
        crate::web::routes::sentences::sentences_delete_handler,
        crate::web::routes::session::session_handler,
        crate::web::routes::users::users_list_handler,
        crate::web::routes::users::users_get_handler,
        crate::web::routes::users::users_update_handler,
        crate::web::routes::users::users_impact_handler,
        crate::web::routes::users::users_delete_handler,
        crate::web::routes::users::users_preferences_get_handler,
        crate::web::routes::users::users_preferences_put_handler,
        crate::web::routes::users::users_streak_get_handler,
        crate::web::routes::users::users_streak_put_handler,
        crate::web::routes::users::users_streak_reset_handler,
        crate::web::routes::users::users_achievements_list_handler,
        crate::web::routes::users::users_achievements_grant_handler,
        crate::web::routes::users::users_achievements_revoke_handler,
        crate::web::routes::users::users_memberships_list_handler,
        crate::web::routes::users::users_memberships_start_handler,
        crate::web::routes::users::users_progress_handler,
        crate::web::routes::users::users_recommendations_handler,
        crate::web::routes::words::words_list_handler,
        crate::web::routes::words::words_get_handler,
        crate::web::routes::words::words_create_handler,
        crate::web::routes::words::words_update_handler,
        crate::web::routes::words::words_impact_handler,
        crate::web::routes::words::words_delete_handler,
    ),
    modifiers(&SessionAuthModifier),
    tags(
        (name = "languages", description = "Languages offered to learners"),
        (name = "courses", description = "Courses of a language"),
        (name = "lessons", description = "Lessons of a course"),
        (name = "categories", description = "Learning categories"),
        (name = "modules", description = "Learning modules of a category"),
        (name = "exercises", description = "Exercises of a module and their content editor"),
        (name = "words", description = "Vocabulary"),
        (name = "sentences", description = "Example sentences of a word"),
        (name = "achievements", description = "Achievements users can earn"),
        (name = "plans", description = "Membership plans"),
        (name = "users", description = "User profiles and everything attached to them"),
        (name = "memberships", description = "Single memberships"),
        (name = "dashboard", description = "Presentational cards"),
        (name = "richtext", description = "Lesson content formatting"),
        (name = "session", description = "Current session"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/languages/",
            "/api/v1/exercises/{id}/form",
            "/api/v1/users/{id}/achievements/{achievement_id}",
            "/api/v1/dashboard/overview",
            "/api/v1/richtext/format",
            "/api/v1/session",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("cookie"));
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
