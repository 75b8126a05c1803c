//! Tunable constants for a session. Every field has a default so JS may pass a
//! partial JSON object to `start_app_with_config`.

use serde::Deserialize;

use crate::error::FlowError;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Relocations the No button must survive before it accepts a click.
    pub required_moves: u32,
    /// Gap kept between the relocated button and the container's far edges.
    pub edge_margin_px: f64,
    /// Spread grows by one unit per `spread_divisor` moves...
    pub spread_divisor: f64,
    /// ...up to this cap.
    pub max_spread: f64,
    pub settle_delay_ms: u32,
    /// Show a discouragement message on every n-th move.
    pub message_every: u32,
    pub message_duration_ms: u32,
    /// Delay between the Yes celebration and showing step 2.
    pub celebration_delay_ms: u32,
    pub storage_key: String,
    /// Local date-time the countdown ticks toward (parsed by `Date`).
    pub countdown_target: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            required_moves: 35,
            edge_margin_px: 40.0,
            spread_divisor: 10.0,
            max_spread: 3.0,
            settle_delay_ms: 500,
            message_every: 5,
            message_duration_ms: 2000,
            celebration_delay_ms: 2000,
            storage_key: "valentineSelections".to_string(),
            countdown_target: "2026-02-14T00:00:00".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, FlowError> {
        serde_json::from_str(json).map_err(FlowError::InvalidConfig)
    }

    /// Parsed `log_level`; unknown names fall back to `Info`.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json(r#"{"required_moves": 10, "log_level": "debug"}"#).unwrap();
        assert_eq!(cfg.required_moves, 10);
        assert_eq!(cfg.settle_delay_ms, 500);
        assert_eq!(cfg.storage_key, "valentineSelections");
        assert_eq!(cfg.level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn bad_json_is_rejected() {
        assert!(matches!(
            Config::from_json("{\"required_moves\": \"many\"}"),
            Err(FlowError::InvalidConfig(_))
        ));
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let cfg = Config {
            log_level: "chatty".into(),
            ..Config::default()
        };
        assert_eq!(cfg.level_filter(), log::LevelFilter::Info);
    }
}
