use serde::Serialize;
use uuid::Uuid;

use crate::model::{Dependent, ResourceType};

/// Sent after a delete; the dashboard navigates to `redirect_to`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DeletedResponse {
    pub id: Uuid,
    pub redirect_to: String,
}

impl DeletedResponse {
    pub fn new(id: Uuid, redirect_to: String) -> Self {
        Self { id, redirect_to }
    }

    /// Back to the unscoped collection.
    pub fn to_collection(resource: ResourceType, id: Uuid) -> Self {
        Self::new(id, collection_path(resource, None))
    }

    /// Back to the collection filtered by the parent the record belonged to.
    pub fn to_parent(resource: ResourceType, id: Uuid, parent_key: &str, parent: Uuid) -> Self {
        Self::new(id, collection_path(resource, Some((parent_key, parent))))
    }
}

pub fn collection_path(resource: ResourceType, parent: Option<(&str, Uuid)>) -> String {
    match parent {
        Some((key, id)) => format!("/api/v1/{}/?{key}={id}", resource.collection()),
        None => format!("/api/v1/{}/", resource.collection()),
    }
}

/// Delete confirmation: what else is affected when the record goes away.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ImpactResponse {
    pub resource: ResourceType,
    pub id: Uuid,
    pub dependents: Vec<Dependent>,
    pub message: String,
}

impl ImpactResponse {
    pub fn new(resource: ResourceType, id: Uuid, dependents: Vec<Dependent>) -> Self {
        let message = impact_message(resource, &dependents);
        Self {
            resource,
            id,
            dependents,
            message,
        }
    }
}

fn impact_message(resource: ResourceType, dependents: &[Dependent]) -> String {
    let parts: Vec<String> = dependents
        .iter()
        .filter(|d| d.count > 0)
        .map(|d| counted(d.count, d.resource.label()))
        .collect();

    if parts.is_empty() {
        return format!(
            "Delete this {}? This action cannot be undone.",
            resource.label()
        );
    }

    format!(
        "Delete this {}? It is referenced by {}. This action cannot be undone.",
        resource.label(),
        join_list(&parts)
    )
}

/// `1 course`, `3 categories`.
pub fn counted(n: i64, noun: &str) -> String {
    if n == 1 {
        return format!("1 {noun}");
    }
    match noun.strip_suffix('y') {
        Some(stem) => format!("{n} {stem}ies"),
        None => format!("{n} {noun}s"),
    }
}

fn join_list(parts: &[String]) -> String {
    match parts {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn redirect_points_at_parent_list() {
        let course = Uuid::new_v4();
        let lesson = Uuid::new_v4();
        let deleted = DeletedResponse::to_parent(ResourceType::Lesson, lesson, "course_id", course);
        assert_eq!(deleted.redirect_to, format!("/api/v1/lessons/?course_id={course}"));

        let deleted = DeletedResponse::to_collection(ResourceType::Category, lesson);
        assert_eq!(deleted.redirect_to, "/api/v1/categories/");
    }

    #[test]
    fn impact_message_lists_non_empty_dependents() {
        let impact = ImpactResponse::new(
            ResourceType::Language,
            Uuid::new_v4(),
            vec![
                Dependent::new(ResourceType::Course, 2),
                Dependent::new(ResourceType::Word, 0),
                Dependent::new(ResourceType::UserPreference, 1),
            ],
        );
        assert_eq!(
            impact.message,
            "Delete this language? It is referenced by 2 courses and 1 preference. This action cannot be undone."
        );
        assert_eq!(impact.dependents.len(), 3);
    }

    #[test]
    fn impact_message_without_dependents() {
        let impact = ImpactResponse::new(ResourceType::Sentence, Uuid::new_v4(), vec![]);
        assert_eq!(impact.message, "Delete this sentence? This action cannot be undone.");
    }

    #[test]
    fn plural_labels() {
        assert_eq!(counted(3, "category"), "3 categories");
        assert_eq!(counted(1, "category"), "1 category");
        assert_eq!(counted(0, "lesson"), "0 lessons");
        assert_eq!(join_list(&["a".into(), "b".into(), "c".into()]), "a, b and c");
    }
}
