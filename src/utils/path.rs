use std::path::PathBuf;

/// Get the home directory, with fallback to "/"
pub fn get_home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

/// Get the config directory path (always ~/.config/gitdeck, regardless of OS)
pub fn get_config_dir() -> PathBuf {
    get_home_dir().join(".config").join("gitdeck")
}

/// Get the config file path (~/.config/gitdeck/config.toml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Get the data directory where cloned repositories live by default
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| get_home_dir().join(".local").join("share"))
        .join("gitdeck")
}

/// Get the directory log files are written to
pub fn get_log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(get_home_dir)
        .join("gitdeck")
}
