use serde::{Deserialize, Serialize};

use crate::{
    model::{ModelManager, error::DatabaseResult},
    web::AuthenticatedUser,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    User,
    Language,
    Course,
    Lesson,
    Category,
    Module,
    Exercise,
    Word,
    Sentence,
    Achievement,
    UserAchievement,
    MembershipPlan,
    Membership,
    UserPreference,
    UserStreak,
    RichText,
}

impl ResourceType {
    /// Collection segment under `/api/v1/`.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Language => "languages",
            Self::Course => "courses",
            Self::Lesson => "lessons",
            Self::Category => "categories",
            Self::Module => "modules",
            Self::Exercise => "exercises",
            Self::Word => "words",
            Self::Sentence => "sentences",
            Self::Achievement => "achievements",
            Self::UserAchievement => "user_achievements",
            Self::MembershipPlan => "plans",
            Self::Membership => "memberships",
            Self::UserPreference => "preferences",
            Self::UserStreak => "streaks",
            Self::RichText => "richtext",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Language => "language",
            Self::Course => "course",
            Self::Lesson => "lesson",
            Self::Category => "category",
            Self::Module => "module",
            Self::Exercise => "exercise",
            Self::Word => "word",
            Self::Sentence => "sentence",
            Self::Achievement => "achievement",
            Self::UserAchievement => "earned achievement",
            Self::MembershipPlan => "membership plan",
            Self::Membership => "membership",
            Self::UserPreference => "preference",
            Self::UserStreak => "streak",
            Self::RichText => "rich text",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

pub trait ResourceTyped {
    fn get_resource_type() -> ResourceType;
}

/// Row-level access for a table. `scope` narrows `list`/`count` to the rows
/// under one parent (e.g. the lessons of a course); tables without a parent
/// ignore it.
#[async_trait::async_trait]
pub trait CrudRepository<T, CreateUpdate, V>
where
    T: ResourceTyped,
    V: Clone + Copy,
{
    async fn create(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: CreateUpdate,
    ) -> DatabaseResult<T>;
    async fn update(
        self,
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: CreateUpdate,
    ) -> DatabaseResult<T>
    where
        Self: Sized;

    async fn delete(self, mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<()>
    where
        Self: Sized;

    async fn find_by_id(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        id: V,
    ) -> DatabaseResult<Option<T>>;
    async fn list(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        scope: Option<V>,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<T>>;
    async fn count(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        scope: Option<V>,
    ) -> DatabaseResult<i64>;
}

#[async_trait::async_trait]
pub trait PaginatableRepository<T, CreateUpdate, V>
where
    T: ResourceTyped + CrudRepository<T, CreateUpdate, V>,
    V: Clone + Copy,
{
    async fn page(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        scope: Option<V>,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Page<T>>;
}

#[macro_export]
macro_rules! impl_paginatable_for {
    ($ent:ident, $ent_create:ident, $ent_id:ident) => {
        #[async_trait::async_trait]
        impl $crate::model::PaginatableRepository<$ent, $ent_create, $ent_id> for $ent {
            async fn page(
                mm: &$crate::model::ModelManager,
                actor: &$crate::web::AuthenticatedUser,
                scope: Option<$ent_id>,
                limit: i64,
                offset: i64,
            ) -> $crate::model::DatabaseResult<$crate::model::Page<$ent>> {
                let (items, count) = tokio::try_join!(
                    <$ent as $crate::model::CrudRepository<$ent, $ent_create, $ent_id>>::list(
                        mm, actor, scope, limit, offset
                    ),
                    <$ent as $crate::model::CrudRepository<$ent, $ent_create, $ent_id>>::count(
                        mm, actor, scope
                    ),
                )?;
                Ok($crate::model::Page::new(items, count, limit, offset))
            }
        }
    };
}
