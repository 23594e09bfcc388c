use std::path::PathBuf;

const APP_DIR_NAME: &str = "photo_geolocate";
const CONFIG_FILE_NAME: &str = "photo_geolocate.toml";

/// Returns the cross-platform directory for configuration files
pub fn get_config_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        let home_dir = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let mut path = PathBuf::from(home_dir);
        path.push("Library");
        path.push("Application Support");
        path.push(APP_DIR_NAME);
        path
    } else if cfg!(target_os = "windows") {
        match std::env::var("APPDATA") {
            Ok(appdata) => PathBuf::from(appdata).join(APP_DIR_NAME),
            Err(_) => PathBuf::from(".").join(APP_DIR_NAME),
        }
    } else {
        // Linux and other Unix-like systems
        match std::env::var("XDG_CONFIG_HOME") {
            Ok(xdg_config_home) if !xdg_config_home.is_empty() => {
                PathBuf::from(xdg_config_home).join(APP_DIR_NAME)
            }
            _ => {
                let home_dir = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                let mut path = PathBuf::from(home_dir);
                path.push(".config");
                path.push(APP_DIR_NAME);
                path
            }
        }
    }
}

/// Returns the path to the default configuration file
pub fn get_config_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_ends_with_file_name() {
        let path = get_config_path();
        assert!(path.ends_with(format!("{}/{}", APP_DIR_NAME, CONFIG_FILE_NAME)));
    }
}
