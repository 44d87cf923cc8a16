use crate::errors::StorageError;
use crate::models::User;
use serde_json::{Map, Value};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Key the session is stored under inside the session file.
pub const SESSION_KEY: &str = "wellmind_user";

/// Reads the saved session. A missing file or key means nobody is logged in;
/// content that does not parse is an error.
pub async fn load_session(path: &Path) -> Result<Option<User>, StorageError> {
    let mut store = match read_store(path).await? {
        Some(store) => store,
        None => return Ok(None),
    };

    match store.remove(SESSION_KEY) {
        Some(Value::Null) | None => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

/// Writes the session, or removes it when `user` is `None`. Other keys in the
/// file are left alone.
pub async fn persist_session(path: &Path, user: Option<&User>) -> Result<(), StorageError> {
    let mut store = read_store(path).await?.unwrap_or_default();
    match user {
        Some(user) => {
            store.insert(SESSION_KEY.to_string(), serde_json::to_value(user)?);
        }
        None => {
            store.remove(SESSION_KEY);
        }
    }

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let payload = serde_json::to_vec_pretty(&Value::Object(store))?;
    let staging = staging_path(path);
    fs::write(&staging, payload).await?;
    fs::rename(&staging, path).await?;
    Ok(())
}

/// Sibling file the new content is written to before it replaces `path`.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

async fn read_store(path: &Path) -> Result<Option<Map<String, Value>>, StorageError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}
