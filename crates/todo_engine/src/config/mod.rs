use crate::error::AppError;
use std::path::PathBuf;

const STORE_FILE_NAME: &str = "todos.json";
const STORE_ENV_VAR: &str = "TODO_STORE_PATH";

/// Resolve the per-user task file location. The env var override exists so
/// tests and scripts can point the CLI at a scratch file.
pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("todo").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("todo")
            .join(STORE_FILE_NAME))
    }
}
