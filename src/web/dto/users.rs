use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    forms::{
        FieldError, FormErrors, FormNumber,
        validate::{count, non_negative, one_of, optional},
    },
    model::entity::{
        DEFAULT_DAILY_GOAL_MINUTES, MEMBERSHIP_STATUSES, UserEntity, UserEntityCreateUpdate,
        UserPreferenceUpdate, UserStreakUpdate,
    },
    web::UserRole,
};

/// Profile fields the dashboard may change. The e-mail is owned by the
/// auth provider.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UserForm {
    #[serde(default)]
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub role: Option<UserRole>,
}

impl UserForm {
    pub fn validate(self, current: &UserEntity) -> Result<UserEntityCreateUpdate, Vec<FieldError>> {
        let mut errors = FormErrors::new();
        let display_name = errors.required("display_name", &self.display_name);
        errors.finish()?;

        Ok(UserEntityCreateUpdate {
            id: Some(current.id()),
            email: current.email().to_string(),
            display_name,
            avatar_url: optional(self.avatar_url),
            role: self.role.unwrap_or(current.role()),
        })
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PreferencesForm {
    #[schema(value_type = Option<i64>)]
    pub daily_goal_minutes: Option<FormNumber>,
    pub target_language_id: Option<Uuid>,
    pub notifications_enabled: Option<bool>,
}

impl From<PreferencesForm> for UserPreferenceUpdate {
    fn from(form: PreferencesForm) -> Self {
        Self {
            daily_goal_minutes: count(form.daily_goal_minutes.as_ref(), DEFAULT_DAILY_GOAL_MINUTES),
            target_language_id: form.target_language_id,
            notifications_enabled: form.notifications_enabled.unwrap_or(true),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct StreakForm {
    #[schema(value_type = Option<i64>)]
    pub current_streak: Option<FormNumber>,
    #[schema(value_type = Option<i64>)]
    pub longest_streak: Option<FormNumber>,
    pub last_activity_date: Option<NaiveDate>,
}

impl From<StreakForm> for UserStreakUpdate {
    fn from(form: StreakForm) -> Self {
        Self {
            current_streak: non_negative(form.current_streak.as_ref()),
            longest_streak: non_negative(form.longest_streak.as_ref()),
            last_activity_date: form.last_activity_date,
        }
        .normalized()
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct GrantAchievementBody {
    pub achievement_id: Uuid,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct StartMembershipBody {
    pub plan_id: Uuid,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct MembershipStatusForm {
    /// `active`, `cancelled` or `expired`
    #[serde(default)]
    pub status: String,
}

impl MembershipStatusForm {
    pub fn validate(self) -> Result<String, Vec<FieldError>> {
        let mut errors = FormErrors::new();
        let status = errors.required("status", &self.status);
        let status = if status.is_empty() {
            status
        } else {
            one_of(&mut errors, "status", Some(&status), &MEMBERSHIP_STATUSES)
        };
        errors.finish()?;
        Ok(status)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn streak_longest_raised_to_current() {
        let form: StreakForm = serde_json::from_value(json!({
            "current_streak": "7",
            "longest_streak": 2,
            "last_activity_date": "2025-03-01",
        }))
        .unwrap();
        let update = UserStreakUpdate::from(form);
        assert_eq!(update.current_streak, 7);
        assert_eq!(update.longest_streak, 7);
        assert_eq!(update.last_activity_date, NaiveDate::from_ymd_opt(2025, 3, 1));
    }

    #[test]
    fn preferences_defaults() {
        let form: PreferencesForm = serde_json::from_value(json!({})).unwrap();
        let update = UserPreferenceUpdate::from(form);
        assert_eq!(update.daily_goal_minutes, DEFAULT_DAILY_GOAL_MINUTES);
        assert_eq!(update.target_language_id, None);
        assert!(update.notifications_enabled);
    }

    #[test]
    fn membership_status_checked() {
        let ok = MembershipStatusForm {
            status: " Cancelled ".into(),
        };
        assert_eq!(ok.validate().unwrap(), "cancelled");

        let missing = MembershipStatusForm { status: "".into() };
        assert_eq!(missing.validate().unwrap_err()[0].message, "status is required");

        let wrong = MembershipStatusForm {
            status: "paused".into(),
        };
        assert_eq!(wrong.validate().unwrap_err()[0].field, "status");
    }
}
