use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Format used for stored completion dates (`ended_on`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used for stored creation timestamps (`created_at`)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(self) -> &'static str {
        match self {
            Profile::Dev => "biblioteca-dev",
            Profile::Prod => "biblioteca",
        }
    }
}

/// Get the configuration directory path for Biblioteca
/// If profile is Dev, uses "biblioteca-dev" instead of "biblioteca"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "biblioteca", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path for Biblioteca
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "biblioteca", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<chrono::NaiveDate, chrono::ParseError> {
    chrono::NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT)
}

/// Today's date (UTC)
pub fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Current timestamp truncated to whole seconds, matching the stored precision
pub fn now_timestamp() -> chrono::NaiveDateTime {
    use chrono::Timelike;
    let now = chrono::Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Treat blank strings as absent
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_and_trims() {
        let date = parse_date(" 2024-03-09 ").unwrap();
        assert_eq!(date, chrono::NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert!(parse_date("09/03/2024").is_err());
    }

    #[test]
    fn non_blank_drops_whitespace_only() {
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(Some(" x ".to_string())), Some("x".to_string()));
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn expand_path_leaves_absolute_paths_alone() {
        assert_eq!(expand_path("/tmp/app.db"), PathBuf::from("/tmp/app.db"));
    }

    #[test]
    fn now_timestamp_has_no_subsecond_part() {
        use chrono::Timelike;
        assert_eq!(now_timestamp().nanosecond(), 0);
    }
}
