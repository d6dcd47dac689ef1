//! Read-only views that format fetched rows for the dashboard widgets.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    forms::exercise::ExerciseEditor,
    model::entity::{
        AchievementCardRow, CategoryCardRow, CourseRecommendationRow, Exercise, ModuleCardRow,
        UserProgressRow,
    },
    web::dto::common::counted,
};

pub fn points_label(points: i64) -> String {
    format!("{points} XP")
}

pub fn minutes_label(minutes: i32) -> String {
    format!("{minutes} min")
}

/// Human text for an achievement requirement, e.g. "Complete 5 lessons".
pub fn requirement_text(kind: &str, n: i32) -> String {
    let n = i64::from(n);
    match kind {
        "lessons_completed" => format!("Complete {}", counted(n, "lesson")),
        "exercises_completed" => format!("Complete {}", counted(n, "exercise")),
        "modules_completed" => format!("Complete {}", counted(n, "module")),
        "words_learned" => format!("Learn {}", counted(n, "word")),
        "streak_days" => format!("Keep a {n}-day streak"),
        "points_earned" => format!("Earn {}", points_label(n)),
        other => format!("{}: {n}", other.replace('_', " ")),
    }
}

#[derive(Debug, Default, Serialize, utoipa::ToSchema)]
pub struct OverviewCard {
    pub languages: i64,
    pub courses: i64,
    pub lessons: i64,
    pub categories: i64,
    pub modules: i64,
    pub exercises: i64,
    pub words: i64,
    pub sentences: i64,
    pub achievements: i64,
    pub plans: i64,
    pub users: i64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AchievementCard {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub points_label: String,
    pub requirement: String,
    pub earned_by: i64,
}

impl From<AchievementCardRow> for AchievementCard {
    fn from(row: AchievementCardRow) -> Self {
        Self {
            id: row.id,
            requirement: requirement_text(&row.requirement_type, row.requirement_count),
            points_label: points_label(i64::from(row.points)),
            title: row.title,
            description: row.description,
            icon: row.icon,
            earned_by: row.earned_by,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CategoryCard {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub module_count: i64,
    pub modules_label: String,
}

impl From<CategoryCardRow> for CategoryCard {
    fn from(row: CategoryCardRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            icon: row.icon,
            color: row.color,
            modules_label: counted(row.module_count, "module"),
            module_count: row.module_count,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ModuleCard {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub duration_label: String,
    pub points_label: String,
    pub exercise_count: i64,
    pub exercise_points: i64,
}

impl From<ModuleCardRow> for ModuleCard {
    fn from(row: ModuleCardRow) -> Self {
        Self {
            id: row.id,
            category_id: row.category_id,
            title: row.title,
            description: row.description,
            difficulty: row.difficulty,
            duration_label: minutes_label(row.estimated_minutes),
            points_label: points_label(i64::from(row.points)),
            exercise_count: row.exercise_count,
            exercise_points: row.exercise_points,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ExercisePreview {
    pub id: Uuid,
    pub title: String,
    pub exercise_type: String,
    pub type_label: String,
    pub summary: String,
    pub prompt: Option<String>,
    pub points_label: String,
}

impl ExercisePreview {
    pub fn new(exercise: &Exercise, editor: &ExerciseEditor) -> Self {
        let content = editor.active();
        Self {
            id: exercise.id(),
            title: exercise.title().to_string(),
            exercise_type: editor.exercise_type.as_str().to_string(),
            type_label: editor.exercise_type.label().to_string(),
            summary: content.summary(),
            prompt: content.prompt().map(str::to_string),
            points_label: points_label(i64::from(exercise.points())),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProgressCard {
    pub user_id: Uuid,
    pub display_name: String,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub streak_label: String,
    pub last_activity_date: Option<NaiveDate>,
    pub achievements_earned: i64,
    pub achievement_points: i64,
    pub points_label: String,
    pub plan_name: Option<String>,
    pub membership_expires_at: Option<DateTime<Utc>>,
}

impl From<UserProgressRow> for ProgressCard {
    fn from(row: UserProgressRow) -> Self {
        Self {
            user_id: row.user_id,
            display_name: row.display_name,
            streak_label: format!("{}-day streak", row.current_streak),
            current_streak: row.current_streak,
            longest_streak: row.longest_streak,
            last_activity_date: row.last_activity_date,
            achievements_earned: row.achievements_earned,
            points_label: points_label(row.achievement_points),
            achievement_points: row.achievement_points,
            plan_name: row.plan_name,
            membership_expires_at: row.membership_expires_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RecommendationCard {
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub level: String,
    pub language_name: String,
    pub lesson_count: i64,
    pub lessons_label: String,
    pub reason: String,
}

impl RecommendationCard {
    pub fn new(row: CourseRecommendationRow, targeted: bool) -> Self {
        let reason = if targeted {
            format!("You are learning {}", row.language_name)
        } else {
            format!("Popular {} course", row.level)
        };
        Self {
            course_id: row.id,
            title: row.title,
            description: row.description,
            level: row.level,
            language_name: row.language_name,
            lessons_label: counted(row.lesson_count, "lesson"),
            lesson_count: row.lesson_count,
            reason,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn requirement_texts() {
        assert_eq!(requirement_text("lessons_completed", 5), "Complete 5 lessons");
        assert_eq!(requirement_text("lessons_completed", 1), "Complete 1 lesson");
        assert_eq!(requirement_text("streak_days", 7), "Keep a 7-day streak");
        assert_eq!(requirement_text("points_earned", 100), "Earn 100 XP");
        assert_eq!(requirement_text("perfect_quizzes", 3), "perfect quizzes: 3");
    }

    #[test]
    fn achievement_card_labels() {
        let card = AchievementCard::from(AchievementCardRow {
            id: Uuid::new_v4(),
            title: "First steps".into(),
            description: None,
            icon: Some("star".into()),
            points: 10,
            requirement_type: "lessons_completed".into(),
            requirement_count: 5,
            earned_by: 2,
        });
        assert_eq!(card.points_label, "10 XP");
        assert_eq!(card.requirement, "Complete 5 lessons");
    }

    #[test]
    fn module_card_labels() {
        let card = ModuleCard::from(ModuleCardRow {
            id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            title: "Food".into(),
            description: None,
            difficulty: "easy".into(),
            estimated_minutes: 15,
            points: 20,
            exercise_count: 3,
            exercise_points: 30,
        });
        assert_eq!(card.duration_label, "15 min");
        assert_eq!(card.points_label, "20 XP");
    }

    #[test]
    fn exercise_preview_survives_broken_content() {
        let exercise: Exercise = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "module_id": Uuid::new_v4(),
            "title": "Match the animals",
            "exercise_type": "matching",
            "content": { "pairs": "broken" },
            "points": 10,
            "order_index": 0,
            "created_at": "2025-01-01T00:00:00Z",
        }))
        .unwrap();
        let preview = ExercisePreview::new(&exercise, &exercise.editor());
        assert_eq!(preview.type_label, "Matching");
        assert_eq!(preview.summary, "0 pairs");
        assert_eq!(preview.prompt, None);
    }

    #[test]
    fn recommendation_reason() {
        let row = || CourseRecommendationRow {
            id: Uuid::new_v4(),
            title: "Spanish 1".into(),
            description: None,
            level: "beginner".into(),
            language_id: Uuid::new_v4(),
            language_name: "Spanish".into(),
            lesson_count: 1,
        };
        assert_eq!(RecommendationCard::new(row(), true).reason, "You are learning Spanish");
        let card = RecommendationCard::new(row(), false);
        assert_eq!(card.reason, "Popular beginner course");
        assert_eq!(card.lessons_label, "1 lesson");
    }
}
