mod user;
pub use user::{UserEntity, UserEntityCreateUpdate, UserProgressRow};

mod language;
pub use language::{Language, LanguageCreate};

mod course;
pub use course::{COURSE_LEVELS, Course, CourseCreate, CourseRecommendationRow};

mod lesson;
pub use lesson::{Lesson, LessonCreate};

mod category;
pub use category::{Category, CategoryCardRow, CategoryCreate};

mod learning_module;
pub use learning_module::{LearningModule, LearningModuleCreate, MODULE_DIFFICULTIES, ModuleCardRow};

mod exercise;
pub use exercise::{Exercise, ExerciseCreate};

mod word;
pub use word::{Word, WordCreate};

mod sentence;
pub use sentence::{Sentence, SentenceCreate};

mod achievement;
pub use achievement::{Achievement, AchievementCardRow, AchievementCreate};

mod user_achievement;
pub use user_achievement::{EarnedAchievementRow, UserAchievement, UserAchievementCreate};

mod membership_plan;
pub use membership_plan::{MembershipPlan, MembershipPlanCreate};

mod user_membership;
pub use user_membership::{MEMBERSHIP_STATUSES, Membership, MembershipCreate};

mod user_preference;
pub use user_preference::{DEFAULT_DAILY_GOAL_MINUTES, UserPreference, UserPreferenceUpdate};

mod user_streak;
pub use user_streak::{UserStreak, UserStreakUpdate};
