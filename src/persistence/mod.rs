use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    warn,
};

use crate::core::{
    utils,
    VerbDeckError,
};

const APP_NAME: &str = "verbdeck";

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join(APP_NAME)
    } else {
        PathBuf::from(".")
    }
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

pub fn save_json<T: Serialize>(data: &T, path: &Path) -> Result<(), VerbDeckError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    utils::write_json(path, data)?;
    debug!("Data saved to: {}", path.display());
    Ok(())
}

/// Missing files load as `T::default()`.
pub fn load_json<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> Result<T, VerbDeckError> {
    if !path.exists() {
        return Ok(T::default());
    }

    let json = fs::read_to_string(path)?;
    let data: T = serde_json::from_str(&json)?;
    debug!("Data loaded from: {}", path.display());
    Ok(data)
}

pub fn load_json_or_default<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> T {
    match load_json::<T>(path) {
        Ok(data) => data,
        Err(e) => {
            warn!("Failed to load {}: {}. Using defaults.", path.display(), e);
            T::default()
        }
    }
}
