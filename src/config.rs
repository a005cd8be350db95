use std::path::{Path, PathBuf};

const DEFAULT_DB_NAME: &str = "interviews.db";
const APP_DIR: &str = "interview-tracker";
const DEFAULT_PS1: &str = "interview";

pub const DB_ENV: &str = "INTERVIEW_DB";
pub const PS1_ENV: &str = "INTERVIEW_PS1";

/// Runtime settings resolved from flags and the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub ps1: String,
    pub color: bool,
}

impl Settings {
    pub fn resolve(db_flag: Option<PathBuf>) -> Self {
        let db_path = resolve_db_path(
            db_flag,
            std::env::var(DB_ENV).ok(),
            dirs::config_dir().as_deref(),
        );
        let ps1 = std::env::var(PS1_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PS1.to_string());
        let color = std::env::var_os("NO_COLOR").is_none();

        Self {
            db_path,
            ps1,
            color,
        }
    }

    pub fn apply_color(&self) {
        if !self.color {
            colored::control::set_override(false);
        }
    }
}

/// `--db` wins over `INTERVIEW_DB`, which wins over the per-user config dir.
pub fn resolve_db_path(
    flag: Option<PathBuf>,
    env: Option<String>,
    config_dir: Option<&Path>,
) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    if let Some(path) = env.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }

    let dir = config_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR);

    std::fs::create_dir_all(&dir).ok();
    dir.join(DEFAULT_DB_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod db_path_tests {
        use super::*;
        use std::env;

        #[test]
        fn flag_takes_precedence() {
            let path = resolve_db_path(
                Some(PathBuf::from("/tmp/flag.db")),
                Some("/tmp/env.db".to_string()),
                None,
            );
            assert_eq!(path, PathBuf::from("/tmp/flag.db"));
        }

        #[test]
        fn env_used_without_flag() {
            let path = resolve_db_path(None, Some("/tmp/env.db".to_string()), None);
            assert_eq!(path, PathBuf::from("/tmp/env.db"));
        }

        #[test]
        fn empty_env_falls_through() {
            let dir = env::temp_dir();
            let path = resolve_db_path(None, Some(String::new()), Some(&dir));
            assert_eq!(path, dir.join(APP_DIR).join(DEFAULT_DB_NAME));
        }

        #[test]
        fn default_lives_in_app_dir() {
            let dir = env::temp_dir();
            let path = resolve_db_path(None, None, Some(&dir));
            let path_str = path.to_str().unwrap();

            assert!(path_str.ends_with("interviews.db"));
            assert!(path_str.contains("interview-tracker"));
            assert!(dir.join(APP_DIR).is_dir());
        }

        #[test]
        fn resolve_reads_env_var() {
            let test_path = "/tmp/test_interviews.db";
            env::set_var(DB_ENV, test_path);

            let settings = Settings::resolve(None);
            assert_eq!(settings.db_path.to_str().unwrap(), test_path);

            env::remove_var(DB_ENV);
        }
    }
}
