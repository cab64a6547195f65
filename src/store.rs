use crate::api::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::models::{CompletionMap, DayCompletion, Habit, Snapshot};
use crate::stats;
use crate::storage;
use chrono::{NaiveDate, Utc};
use std::path::PathBuf;
use tracing::warn;

/// Single source of truth for habits and completions during a session.
///
/// Mutations are optimistic local-first: when online they are offered to
/// the backend first, but a backend failure is logged and the local state
/// updates regardless, so no user action ever blocks on the network.
/// After every mutation the full state is mirrored to the local snapshot
/// (fire-and-forget, last write wins).
pub struct HabitStore {
    api: ApiClient,
    data_path: PathBuf,
    habits: Vec<Habit>,
    completions: CompletionMap,
    is_online: bool,
    is_loading: bool,
}

impl HabitStore {
    pub fn new(api: ApiClient, data_path: PathBuf) -> Self {
        Self {
            api,
            data_path,
            habits: Vec::new(),
            completions: CompletionMap::new(),
            is_online: false,
            is_loading: true,
        }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn is_online(&self) -> bool {
        self.is_online
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            habits: self.habits.clone(),
            completions: self.completions.clone(),
        }
    }

    /// Probes the backend and populates state from it, or falls back to
    /// the last local snapshot when the backend is unreachable. Never
    /// fails; the fallback path is read-only.
    pub async fn load(&mut self) {
        self.is_loading = true;
        match self.load_online().await {
            Ok(()) => self.is_online = true,
            Err(err) => {
                warn!("backend unavailable, using local snapshot: {err}");
                self.is_online = false;
                let snapshot = storage::load_snapshot(&self.data_path).await;
                self.habits = snapshot.habits;
                self.completions = snapshot.completions;
            }
        }
        self.is_loading = false;
    }

    async fn load_online(&mut self) -> AppResult<()> {
        self.api.health_check().await?;

        let habits = self.api.get_habits().await?;
        let mut completions = CompletionMap::new();
        for habit in &habits {
            for record in self.api.get_completions(&habit.id).await? {
                if record.completed {
                    completions
                        .entry(record.date)
                        .or_default()
                        .insert(record.habit_id, true);
                }
            }
        }

        self.habits = habits;
        self.completions = completions;
        self.mirror().await;
        Ok(())
    }

    /// Appends a habit. Online, the backend-created habit (with its
    /// authoritative id) is preferred; on backend failure or offline the
    /// locally built candidate is kept instead.
    pub async fn add_habit(&mut self, name: &str, color: &str) -> AppResult<Habit> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::EmptyName);
        }

        let habit = if self.is_online {
            match self.api.create_habit(name, color).await {
                Ok(created) => created,
                Err(err) => {
                    warn!("failed to create habit on backend, keeping local copy: {err}");
                    self.local_habit(name, color)
                }
            }
        } else {
            self.local_habit(name, color)
        };

        self.habits.push(habit.clone());
        self.mirror().await;
        Ok(habit)
    }

    /// Removes the habit and every completion entry recorded for it, on
    /// any date. Backend failure does not stop the local removal.
    pub async fn delete_habit(&mut self, habit_id: &str) {
        if self.is_online {
            if let Err(err) = self.api.delete_habit(habit_id).await {
                warn!("failed to delete habit on backend: {err}");
            }
        }

        self.habits.retain(|habit| habit.id != habit_id);
        for day in self.completions.values_mut() {
            day.remove(habit_id);
        }
        self.completions.retain(|_, day| !day.is_empty());
        self.mirror().await;
    }

    /// Flips the completion flag for `(date, habit_id)`. An absent entry
    /// counts as `false`, so the first toggle always yields `true`.
    pub async fn toggle_completion(&mut self, habit_id: &str, date: NaiveDate) {
        let key = stats::date_key(date);
        if self.is_online {
            if let Err(err) = self.api.toggle_completion(habit_id, &key).await {
                warn!("failed to toggle completion on backend: {err}");
            }
        }

        let flag = self
            .completions
            .entry(key)
            .or_default()
            .entry(habit_id.to_string())
            .or_insert(false);
        *flag = !*flag;
        self.mirror().await;
    }

    pub fn is_habit_completed(&self, habit_id: &str, date: NaiveDate) -> bool {
        stats::is_completed(&self.completions, habit_id, date)
    }

    pub fn streak(&self, habit_id: &str) -> u32 {
        stats::streak_at(stats::today(), &self.completions, habit_id)
    }

    pub fn completion_rate(&self, habit_id: &str, window_days: u32) -> u32 {
        stats::completion_rate_at(stats::today(), &self.completions, habit_id, window_days)
    }

    pub fn today_completions(&self) -> usize {
        stats::today_completions_at(stats::today(), &self.habits, &self.completions)
    }

    pub fn monthly_completions(&self, reference: NaiveDate) -> Vec<DayCompletion> {
        stats::monthly_completions_at(reference, &self.habits, &self.completions)
    }

    /// Candidate habit used offline or when backend creation fails: a
    /// timestamp-based id, bumped past any collision in the current list.
    fn local_habit(&self, name: &str, color: &str) -> Habit {
        let mut candidate = Utc::now().timestamp_millis();
        while self.habits.iter().any(|habit| habit.id == candidate.to_string()) {
            candidate += 1;
        }
        Habit {
            id: candidate.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    async fn mirror(&self) {
        if let Err(err) = storage::persist_snapshot(&self.data_path, &self.snapshot()).await {
            warn!("failed to mirror state to local storage: {err}");
        }
    }
}
