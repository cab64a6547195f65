use crate::errors::AppResult;
use crate::models::Snapshot;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_data_path() -> PathBuf {
    match env::var("HABIT_DATA_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => PathBuf::from("data/habits.json"),
    }
}

pub fn resolve_token_path() -> PathBuf {
    match env::var("HABIT_TOKEN_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => PathBuf::from("data/token"),
    }
}

pub async fn load_snapshot(path: &Path) -> Snapshot {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!("failed to parse snapshot file: {err}");
                Snapshot::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Snapshot::default(),
        Err(err) => {
            error!("failed to read snapshot file: {err}");
            Snapshot::default()
        }
    }
}

pub async fn persist_snapshot(path: &Path, snapshot: &Snapshot) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let payload = serde_json::to_vec_pretty(snapshot)?;
    fs::write(path, payload).await?;
    Ok(())
}

pub async fn load_token(path: &Path) -> Option<String> {
    match fs::read_to_string(path).await {
        Ok(token) => {
            let token = token.trim().to_string();
            (!token.is_empty()).then_some(token)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            error!("failed to read token file: {err}");
            None
        }
    }
}

pub async fn persist_token(path: &Path, token: &str) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, token).await?;
    Ok(())
}

pub async fn clear_token(path: &Path) -> AppResult<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}
