use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn toggled(self) -> TaskStatus {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Work,
    Personal,
    Shopping,
    Health,
    Finance,
    #[default]
    Other,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 6] = [
        TaskCategory::Work,
        TaskCategory::Personal,
        TaskCategory::Shopping,
        TaskCategory::Health,
        TaskCategory::Finance,
        TaskCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskCategory::Work => "Work",
            TaskCategory::Personal => "Personal",
            TaskCategory::Shopping => "Shopping",
            TaskCategory::Health => "Health",
            TaskCategory::Finance => "Finance",
            TaskCategory::Other => "Other",
        }
    }

    pub fn parse(input: &str) -> Option<TaskCategory> {
        match input.to_lowercase().as_str() {
            "work" => Some(TaskCategory::Work),
            "personal" => Some(TaskCategory::Personal),
            "shopping" => Some(TaskCategory::Shopping),
            "health" => Some(TaskCategory::Health),
            "finance" => Some(TaskCategory::Finance),
            "other" => Some(TaskCategory::Other),
            _ => None,
        }
    }

    pub fn next(self) -> TaskCategory {
        let i = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> TaskCategory {
        let i = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A task row as the store returns it. `id`, `user_id` and the timestamps
/// are server-assigned; rows arrive ordered by `created_at` descending.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub category: TaskCategory,
    pub due_date: Option<NaiveDate>,
    pub created_at: String,
    pub updated_at: String,
}

/// Insert payload. The category is always written so a row created without
/// one lands as `other`; absent optional fields are sent as null.
#[derive(Debug, Serialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub category: TaskCategory,
    pub due_date: Option<NaiveDate>,
    pub user_id: String,
}

/// Partial update payload. Fields left at `None` are omitted from the PATCH
/// body; the double options distinguish "leave unchanged" from "clear".
#[derive(Debug, Default, Serialize)]
pub struct UpdateTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TaskCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: AuthUser,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_task_row_deserializes() {
        let row = r#"{
            "id": "3e9b0c1a",
            "user_id": "u-1",
            "title": "Buy milk",
            "description": null,
            "status": "pending",
            "category": "shopping",
            "due_date": "2026-08-07",
            "created_at": "2026-08-01T09:30:00+00:00",
            "updated_at": "2026-08-01T09:30:00+00:00"
        }"#;
        let task: Task = serde_json::from_str(row).unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.category, TaskCategory::Shopping);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 8, 7));
        assert_eq!(task.description, None);
    }

    #[test]
    fn test_missing_category_defaults_to_other() {
        let row = r#"{
            "id": "a",
            "user_id": "u-1",
            "title": "Untagged",
            "description": null,
            "status": "completed",
            "due_date": null,
            "created_at": "2026-08-01T09:30:00+00:00",
            "updated_at": "2026-08-02T10:00:00+00:00"
        }"#;
        let task: Task = serde_json::from_str(row).unwrap();
        assert_eq!(task.category, TaskCategory::Other);
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn test_create_payload_defaults_category_to_other() {
        let body = CreateTask {
            title: "Buy milk".to_string(),
            description: None,
            category: TaskCategory::default(),
            due_date: None,
            user_id: "u-1".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["category"], "other");
        assert_eq!(json["description"], serde_json::Value::Null);
    }

    #[test]
    fn test_update_payload_omits_untouched_fields() {
        let changes = UpdateTask {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let json = serde_json::to_value(&changes).unwrap();
        assert_eq!(json["status"], "completed");
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 1);
    }

    #[test]
    fn test_update_payload_clears_due_date_with_null() {
        let changes = UpdateTask {
            due_date: Some(None),
            ..Default::default()
        };
        let json = serde_json::to_value(&changes).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.contains_key("due_date"));
        assert_eq!(json["due_date"], serde_json::Value::Null);
    }

    #[test]
    fn test_status_toggles_both_directions() {
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Completed.toggled(), TaskStatus::Pending);
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!(TaskCategory::parse("Work"), Some(TaskCategory::Work));
        assert_eq!(TaskCategory::parse("FINANCE"), Some(TaskCategory::Finance));
        assert_eq!(TaskCategory::parse("groceries"), None);
    }
}
