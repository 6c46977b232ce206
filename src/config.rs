//! Application-level configuration loading: seeding defaults and statistics tunables.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "GOLF_BRAIN_CONFIG_PATH";
/// Par used for holes whose par is unknown or unusual.
const DEFAULT_PAR: u8 = 4;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    default_par: u8,
    stats: StatsConfig,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        default_par = app_config.default_par,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Par assumed for seeding when a hole carries none.
    pub fn default_par(&self) -> u8 {
        self.default_par
    }

    /// Thresholds used by the dashboard and history statistics.
    pub fn stats(&self) -> &StatsConfig {
        &self.stats
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_par: DEFAULT_PAR,
            stats: StatsConfig::default(),
        }
    }
}

/// Windows and thresholds of the statistics views.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Prior rounds averaged into the dashboard baseline.
    pub prior_rounds: usize,
    /// Points a round or stroke type must move before it is trending.
    pub trend_deadband: i32,
    /// Completed rounds compared by the summary.
    pub summary_rounds: usize,
    /// Points the summary focus must move before it is improving or declining.
    pub summary_deadband: i32,
    /// First hole of the late-round window.
    pub late_first_hole: u32,
    /// Last hole of the late-round window.
    pub late_last_hole: u32,
    /// Late-window focus this many points below the round average is a slip.
    pub late_slip_points: i32,
    /// Last hole of the early window compared by the history highlights.
    pub early_last_hole: u32,
    /// Points a stroke type must beat or trail the round focus by to earn a history note.
    pub highlight_margin: i32,
    /// Strokes of a type required before it can earn a history note.
    pub highlight_min_type_strokes: u32,
    /// Counted strokes required in both the early and late windows for the dip note.
    pub highlight_min_window_strokes: u32,
    /// Late-window focus this many points below the early window earns the history dip note.
    pub highlight_dip_points: i32,
    /// Completed rounds listed by history.
    pub history_limit: usize,
}

impl StatsConfig {
    /// True when `hole_number` falls inside the late-round window.
    pub fn in_late_window(&self, hole_number: u32) -> bool {
        (self.late_first_hole..=self.late_last_hole).contains(&hole_number)
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            prior_rounds: 5,
            trend_deadband: 3,
            summary_rounds: 5,
            summary_deadband: 2,
            late_first_hole: 13,
            late_last_hole: 16,
            late_slip_points: 10,
            early_last_hole: 6,
            highlight_margin: 8,
            highlight_min_type_strokes: 3,
            highlight_min_window_strokes: 6,
            highlight_dip_points: 10,
            history_limit: 250,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    default_par: Option<u8>,
    #[serde(default)]
    stats: StatsConfig,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let default_par = value
            .default_par
            .filter(|par| (3..=6).contains(par))
            .unwrap_or(DEFAULT_PAR);
        Self {
            default_par,
            stats: value.stats,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"stats": {"trend_deadband": 5}}"#).unwrap();
        let config = AppConfig::from(raw);

        assert_eq!(config.default_par(), 4);
        assert_eq!(config.stats().trend_deadband, 5);
        assert_eq!(config.stats().summary_deadband, 2);
        assert!(config.stats().in_late_window(13));
        assert!(!config.stats().in_late_window(17));
    }

    #[test]
    fn out_of_range_default_par_is_ignored() {
        let raw: RawConfig = serde_json::from_str(r#"{"default_par": 9}"#).unwrap();
        assert_eq!(AppConfig::from(raw).default_par(), 4);
    }
}
