use chrono::NaiveDate;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;

use crate::config::Config;
use crate::models::{CreateTask, Profile, Session, Task, TaskCategory, UpdateTask};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not signed in")]
    Auth,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Remote(String),
}

fn bearer(cfg: &Config, session: Option<&Session>) -> String {
    let token = session
        .map(|s| s.access_token.as_str())
        .unwrap_or(cfg.anon_key.as_str());
    format!("Bearer {}", token)
}

async fn remote_error(res: reqwest::Response, fallback: &str) -> ApiError {
    let error_text = res.text().await.unwrap_or_default();
    if error_text.trim().is_empty() {
        ApiError::Remote(fallback.to_string())
    } else {
        ApiError::Remote(error_text)
    }
}

pub async fn sign_in(cfg: &Config, email: &str, password: &str) -> Result<Session, ApiError> {
    let client = Client::new();
    let url = format!("{}/auth/v1/token?grant_type=password", cfg.supabase_url);

    let res = client
        .post(&url)
        .header("apikey", &cfg.anon_key)
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;

    if res.status().is_success() {
        Ok(res.json::<Session>().await?)
    } else {
        Err(remote_error(res, "Sign in failed").await)
    }
}

/// Registers the account with the display name in the user metadata, then
/// runs the password grant. The signup response alone carries no usable
/// session when email confirmation is enabled.
pub async fn sign_up(
    cfg: &Config,
    name: &str,
    email: &str,
    password: &str,
) -> Result<Session, ApiError> {
    let client = Client::new();
    let url = format!("{}/auth/v1/signup", cfg.supabase_url);

    let res = client
        .post(&url)
        .header("apikey", &cfg.anon_key)
        .json(&json!({
            "email": email,
            "password": password,
            "data": { "name": name }
        }))
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(remote_error(res, "Sign up failed").await);
    }

    sign_in(cfg, email, password).await
}

/// Lists the caller's tasks, newest first. Without a session the request
/// goes out under the anon key and returns whatever the store's access
/// policy allows, typically an empty set.
pub async fn fetch_tasks(cfg: &Config, session: Option<&Session>) -> Result<Vec<Task>, ApiError> {
    let client = Client::new();
    let url = format!(
        "{}/rest/v1/tasks?select=*&order=created_at.desc",
        cfg.supabase_url
    );

    let res = client
        .get(&url)
        .header("apikey", &cfg.anon_key)
        .header("Authorization", bearer(cfg, session))
        .send()
        .await?;

    if res.status().is_success() {
        Ok(res.json::<Vec<Task>>().await?)
    } else {
        Err(remote_error(res, "Failed to fetch tasks").await)
    }
}

pub async fn create_task(
    cfg: &Config,
    session: Option<&Session>,
    title: &str,
    description: Option<&str>,
    category: Option<TaskCategory>,
    due_date: Option<NaiveDate>,
) -> Result<Task, ApiError> {
    let session = session.ok_or(ApiError::Auth)?;

    let body = CreateTask {
        title: title.to_string(),
        description: description.map(str::to_string),
        category: category.unwrap_or_default(),
        due_date,
        user_id: session.user.id.clone(),
    };

    let client = Client::new();
    let url = format!("{}/rest/v1/tasks", cfg.supabase_url);

    let res = client
        .post(&url)
        .header("apikey", &cfg.anon_key)
        .header("Authorization", bearer(cfg, Some(session)))
        .header("Prefer", "return=representation")
        .json(&body)
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(remote_error(res, "Failed to create task").await);
    }

    let mut rows = res.json::<Vec<Task>>().await?;
    rows.pop()
        .ok_or_else(|| ApiError::Remote("Failed to create task".to_string()))
}

/// Patches a task by id. A row the caller may not modify comes back as an
/// empty representation; the store does not say whether it was missing or
/// merely off-limits.
pub async fn update_task(
    cfg: &Config,
    session: &Session,
    id: &str,
    changes: &UpdateTask,
) -> Result<Task, ApiError> {
    let client = Client::new();
    let url = format!("{}/rest/v1/tasks?id=eq.{}", cfg.supabase_url, id);

    let res = client
        .patch(&url)
        .header("apikey", &cfg.anon_key)
        .header("Authorization", bearer(cfg, Some(session)))
        .header("Prefer", "return=representation")
        .json(changes)
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(remote_error(res, "Failed to update task").await);
    }

    let mut rows = res.json::<Vec<Task>>().await?;
    rows.pop()
        .ok_or_else(|| ApiError::Remote("Failed to update task".to_string()))
}

pub async fn delete_task(cfg: &Config, session: &Session, id: &str) -> Result<(), ApiError> {
    let client = Client::new();
    let url = format!("{}/rest/v1/tasks?id=eq.{}", cfg.supabase_url, id);

    let res = client
        .delete(&url)
        .header("apikey", &cfg.anon_key)
        .header("Authorization", bearer(cfg, Some(session)))
        .send()
        .await?;

    if res.status().is_success() {
        Ok(())
    } else {
        Err(remote_error(res, "Failed to delete task").await)
    }
}

/// The profile row is created by the backend on signup; a missing row is
/// not an error here.
pub async fn fetch_profile(cfg: &Config, session: &Session) -> Result<Option<Profile>, ApiError> {
    let client = Client::new();
    let url = format!(
        "{}/rest/v1/profiles?id=eq.{}&select=*",
        cfg.supabase_url, session.user.id
    );

    let res = client
        .get(&url)
        .header("apikey", &cfg.anon_key)
        .header("Authorization", bearer(cfg, Some(session)))
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(remote_error(res, "Failed to fetch profile").await);
    }

    let mut rows = res.json::<Vec<Profile>>().await?;
    Ok(rows.pop())
}

pub async fn update_profile(
    cfg: &Config,
    session: &Session,
    name: &str,
) -> Result<Profile, ApiError> {
    let client = Client::new();
    let url = format!(
        "{}/rest/v1/profiles?id=eq.{}",
        cfg.supabase_url, session.user.id
    );

    let res = client
        .patch(&url)
        .header("apikey", &cfg.anon_key)
        .header("Authorization", bearer(cfg, Some(session)))
        .header("Prefer", "return=representation")
        .json(&json!({ "name": name }))
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(remote_error(res, "Failed to update profile").await);
    }

    let mut rows = res.json::<Vec<Profile>>().await?;
    rows.pop()
        .ok_or_else(|| ApiError::Remote("Failed to update profile".to_string()))
}
