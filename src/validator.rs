use regex::Regex;

/// Normalized task form data: trimmed title, description collapsed to
/// `None` when empty.
#[derive(Debug, PartialEq)]
pub struct TaskFields {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, PartialEq)]
pub struct TaskFormErrors {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct SignUpFields {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, PartialEq)]
pub struct SignInFields {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, PartialEq)]
pub struct AuthFormErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

fn is_email(input: &str) -> bool {
    let email_re = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    email_re.is_match(input)
}

fn check_title(raw: &str) -> Result<String, String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err("Title is required".to_string());
    }
    if title.chars().count() > 100 {
        return Err("Title must be less than 100 characters".to_string());
    }
    Ok(title.to_string())
}

fn check_description(raw: &str) -> Result<Option<String>, String> {
    let description = raw.trim();
    if description.chars().count() > 500 {
        return Err("Description must be less than 500 characters".to_string());
    }
    if description.is_empty() {
        Ok(None)
    } else {
        Ok(Some(description.to_string()))
    }
}

pub fn check_name(raw: &str) -> Result<String, String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err("Name is required".to_string());
    }
    if name.chars().count() > 50 {
        return Err("Name must be less than 50 characters".to_string());
    }
    Ok(name.to_string())
}

fn check_email(raw: &str) -> Result<String, String> {
    let email = raw.trim();
    if !is_email(email) {
        return Err("Invalid email address".to_string());
    }
    if email.chars().count() > 100 {
        return Err("Email must be less than 100 characters".to_string());
    }
    Ok(email.to_string())
}

fn check_new_password(raw: &str) -> Result<String, String> {
    if raw.chars().count() < 6 {
        return Err("Password must be at least 6 characters".to_string());
    }
    if raw.chars().count() > 100 {
        return Err("Password must be less than 100 characters".to_string());
    }
    Ok(raw.to_string())
}

/// Validates the add/edit task form. Total over all inputs: every failure
/// is reported per field, never panicked on.
pub fn validate_task(title: &str, description: &str) -> Result<TaskFields, TaskFormErrors> {
    let mut errors = TaskFormErrors::default();
    let title = match check_title(title) {
        Ok(title) => Some(title),
        Err(message) => {
            errors.title = Some(message);
            None
        }
    };
    let description = match check_description(description) {
        Ok(description) => Some(description),
        Err(message) => {
            errors.description = Some(message);
            None
        }
    };
    match (title, description) {
        (Some(title), Some(description)) => Ok(TaskFields { title, description }),
        _ => Err(errors),
    }
}

pub fn validate_sign_up(
    name: &str,
    email: &str,
    password: &str,
) -> Result<SignUpFields, AuthFormErrors> {
    let mut errors = AuthFormErrors::default();
    let name = match check_name(name) {
        Ok(name) => Some(name),
        Err(message) => {
            errors.name = Some(message);
            None
        }
    };
    let email = match check_email(email) {
        Ok(email) => Some(email),
        Err(message) => {
            errors.email = Some(message);
            None
        }
    };
    let password = match check_new_password(password) {
        Ok(password) => Some(password),
        Err(message) => {
            errors.password = Some(message);
            None
        }
    };
    match (name, email, password) {
        (Some(name), Some(email), Some(password)) => Ok(SignUpFields {
            name,
            email,
            password,
        }),
        _ => Err(errors),
    }
}

pub fn validate_sign_in(email: &str, password: &str) -> Result<SignInFields, AuthFormErrors> {
    let mut errors = AuthFormErrors::default();
    let email = match check_email(email) {
        Ok(email) => Some(email),
        Err(message) => {
            errors.email = Some(message);
            None
        }
    };
    let password = if password.is_empty() {
        errors.password = Some("Password is required".to_string());
        None
    } else {
        Some(password.to_string())
    };
    match (email, password) {
        (Some(email), Some(password)) => Ok(SignInFields { email, password }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_title_is_required() {
        let errors = validate_task("", "").unwrap_err();
        assert_eq!(errors.title.as_deref(), Some("Title is required"));
        assert_eq!(errors.description, None);
    }

    #[test]
    fn test_whitespace_title_is_required() {
        let errors = validate_task("   ", "").unwrap_err();
        assert_eq!(errors.title.as_deref(), Some("Title is required"));
    }

    #[test]
    fn test_title_of_exactly_100_chars_is_accepted() {
        let title = "a".repeat(100);
        let fields = validate_task(&title, "").unwrap();
        assert_eq!(fields.title, title);
    }

    #[test]
    fn test_title_of_101_chars_is_rejected() {
        let title = "a".repeat(101);
        let errors = validate_task(&title, "").unwrap_err();
        assert_eq!(
            errors.title.as_deref(),
            Some("Title must be less than 100 characters")
        );
    }

    #[test]
    fn test_title_is_trimmed_before_length_check() {
        let padded = format!("  {}  ", "a".repeat(100));
        let fields = validate_task(&padded, "").unwrap();
        assert_eq!(fields.title.chars().count(), 100);
    }

    #[test]
    fn test_empty_description_normalizes_to_none() {
        let fields = validate_task("Buy milk", "   ").unwrap();
        assert_eq!(fields.description, None);
    }

    #[test]
    fn test_description_of_501_chars_is_rejected() {
        let description = "d".repeat(501);
        let errors = validate_task("Buy milk", &description).unwrap_err();
        assert_eq!(
            errors.description.as_deref(),
            Some("Description must be less than 500 characters")
        );
        assert_eq!(errors.title, None);
    }

    #[test]
    fn test_description_of_exactly_500_chars_is_accepted() {
        let description = "d".repeat(500);
        let fields = validate_task("Buy milk", &description).unwrap();
        assert_eq!(fields.description.unwrap().chars().count(), 500);
    }

    #[test]
    fn test_both_task_fields_reported_together() {
        let errors = validate_task("", &"d".repeat(501)).unwrap_err();
        assert!(errors.title.is_some());
        assert!(errors.description.is_some());
    }

    #[test]
    fn test_sign_up_rejects_invalid_email() {
        let errors = validate_sign_up("Ada", "not-an-email", "secret1").unwrap_err();
        assert_eq!(errors.email.as_deref(), Some("Invalid email address"));
    }

    #[test]
    fn test_sign_up_rejects_email_over_100_chars() {
        let email = format!("{}@example.com", "a".repeat(95));
        let errors = validate_sign_up("Ada", &email, "secret1").unwrap_err();
        assert_eq!(
            errors.email.as_deref(),
            Some("Email must be less than 100 characters")
        );
    }

    #[test]
    fn test_sign_up_rejects_short_password() {
        let errors = validate_sign_up("Ada", "ada@example.com", "12345").unwrap_err();
        assert_eq!(
            errors.password.as_deref(),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn test_sign_up_rejects_name_over_50_chars() {
        let errors =
            validate_sign_up(&"n".repeat(51), "ada@example.com", "secret1").unwrap_err();
        assert_eq!(
            errors.name.as_deref(),
            Some("Name must be less than 50 characters")
        );
    }

    #[test]
    fn test_sign_up_accepts_valid_fields_and_trims() {
        let fields = validate_sign_up("  Ada  ", " ada@example.com ", "secret1").unwrap();
        assert_eq!(fields.name, "Ada");
        assert_eq!(fields.email, "ada@example.com");
        assert_eq!(fields.password, "secret1");
    }

    #[test]
    fn test_sign_in_requires_password() {
        let errors = validate_sign_in("ada@example.com", "").unwrap_err();
        assert_eq!(errors.password.as_deref(), Some("Password is required"));
    }

    #[test]
    fn test_sign_in_accepts_any_non_empty_password() {
        let fields = validate_sign_in("ada@example.com", "x").unwrap();
        assert_eq!(fields.password, "x");
    }

    #[test]
    fn test_empty_email_is_invalid_not_a_panic() {
        let errors = validate_sign_in("", "secret").unwrap_err();
        assert_eq!(errors.email.as_deref(), Some("Invalid email address"));
    }
}
