use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Completion state, keyed by `YYYY-MM-DD` date string, then habit id.
/// An absent entry means "not completed".
pub type CompletionMap = BTreeMap<String, BTreeMap<String, bool>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    pub created_at: String,
}

pub fn default_color() -> String {
    "primary".to_string()
}

/// The `{habits, completions}` object mirrored to local storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub habits: Vec<Habit>,
    pub completions: CompletionMap,
}

#[derive(Debug, Serialize)]
pub struct NewHabit<'a> {
    pub name: &'a str,
    pub color: &'a str,
}

#[derive(Debug, Default, Serialize)]
pub struct HabitPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ToggleRequest<'a> {
    pub habit_id: &'a str,
    pub date: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub date: String,
    pub habit_id: String,
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
}

/// One calendar day in a monthly aggregation: how many habits were
/// completed that day out of the current habit count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCompletion {
    pub date: String,
    pub completions: usize,
    pub total: usize,
}
