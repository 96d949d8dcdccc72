use crate::error::AppError;
use crate::model::{ChatId, TaskList};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const STORE_FILE_NAME: &str = "tasks.json";
pub const STORE_ENV_VAR: &str = "TASKBOT_STORE_PATH";

/// Every chat's task list, keyed by chat id. Serialized as a JSON object with
/// string-encoded chat ids.
pub type Store = BTreeMap<ChatId, TaskList>;

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::storage("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("taskbot").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::storage("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("taskbot")
            .join(STORE_FILE_NAME))
    }
}

/// Loads the whole store. A missing file is an empty store.
pub fn load_store(path: &Path) -> Result<Store, AppError> {
    Ok(load_existing(path)?.unwrap_or_default())
}

/// Like [`load_store`] but tells a missing file apart from an empty one.
pub fn load_existing(path: &Path) -> Result<Option<Store>, AppError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(AppError::storage(format!("{}: {}", path.display(), err))),
    };

    let mut store: Store = serde_json::from_str(&content).map_err(|err| {
        AppError::storage(format!("invalid JSON in {}: {}", path.display(), err))
    })?;

    for list in store.values_mut() {
        list.normalize();
    }
    store.retain(|_, list| !list.is_empty());

    Ok(Some(store))
}

pub fn save_store(path: &Path, store: &Store) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| AppError::storage(err.to_string()))?;
    }

    let content =
        serde_json::to_string_pretty(store).map_err(|err| AppError::storage(err.to_string()))?;
    std::fs::write(path, content).map_err(|err| AppError::storage(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)
            .map_err(|err| AppError::storage(err.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Store, load_existing, load_store, save_store};
    use crate::model::TaskList;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("taskbot-{nanos}-{file_name}"))
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = temp_path("round-trip.json");
        let mut store = Store::new();
        store.insert(1, ["Buy milk", "Call Bob"].into_iter().collect());
        store.insert(
            -100_200,
            ["Ünïcode ✓", "  padded in file  "].into_iter().collect(),
        );

        save_store(&path, &store).unwrap();
        let loaded = load_store(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, store);
    }

    #[test]
    fn missing_file_is_empty_store() {
        let path = temp_path("missing.json");

        assert!(load_store(&path).unwrap().is_empty());
        assert!(load_existing(&path).unwrap().is_none());
    }

    #[test]
    fn writes_chat_ids_as_string_keys() {
        let path = temp_path("layout.json");
        let mut store = Store::new();
        store.insert(42, ["demo"].into_iter().collect());

        save_store(&path, &store).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(
            raw,
            serde_json::json!({ "42": [{ "text": "demo", "position": 1 }] })
        );
    }

    #[test]
    fn load_renumbers_hand_edited_positions() {
        let path = temp_path("gaps.json");
        let content = r#"{"7": [{"text": "a", "position": 3}, {"text": "b", "position": 9}]}"#;
        fs::write(&path, content).unwrap();

        let loaded = load_store(&path).unwrap();
        fs::remove_file(&path).ok();

        let positions: Vec<i64> = loaded[&7].tasks().iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![1, 2]);
    }

    #[test]
    fn load_drops_empty_lists() {
        let path = temp_path("empty-list.json");
        fs::write(&path, r#"{"7": []}"#).unwrap();

        let loaded = load_store(&path).unwrap();
        fs::remove_file(&path).ok();

        assert!(!loaded.contains_key(&7));
        assert_eq!(loaded.get(&7).map(TaskList::len), None);
    }

    #[test]
    fn rejects_invalid_json() {
        let path = temp_path("invalid.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_store(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "storage_error");
    }

    #[test]
    fn rejects_non_numeric_chat_keys() {
        let path = temp_path("bad-key.json");
        fs::write(&path, r#"{"abc": []}"#).unwrap();

        let err = load_store(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "storage_error");
    }
}
