//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use battle_content::ContentFactory;

/// Where battle content comes from and how fast the battle is presented.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub catalog_path: PathBuf,
    pub session_path: PathBuf,
    pub config_path: PathBuf,
    /// Overrides the runtime's countdown when set.
    pub countdown: Option<Duration>,
    /// Overrides the runtime's reveal delay when set.
    pub reveal_delay: Option<Duration>,
}

impl ClientConfig {
    /// Bundled content shipped next to this crate.
    pub fn bundled_data_dir() -> PathBuf {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SKIRMISH_CATALOG` - Weapon catalog RON file (default: bundled `weapons.ron`)
    /// - `SKIRMISH_SESSION` - Battle session RON file (default: bundled `session.ron`)
    /// - `SKIRMISH_CONFIG` - Battle rules TOML file (default: bundled `battle.toml`)
    /// - `SKIRMISH_COUNTDOWN_MS` - Countdown before the first turn
    /// - `SKIRMISH_REVEAL_MS` - Pause between reveal and resolution
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = Self::bundled_data_dir();
        let path = |key: &str, file: &str| {
            lookup(key)
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join(file))
        };
        let millis = |key: &str| {
            lookup(key)?
                .parse::<u64>()
                .ok()
                .map(Duration::from_millis)
        };

        Self {
            catalog_path: path("SKIRMISH_CATALOG", ContentFactory::CATALOG_FILE),
            session_path: path("SKIRMISH_SESSION", ContentFactory::SESSION_FILE),
            config_path: path("SKIRMISH_CONFIG", ContentFactory::CONFIG_FILE),
            countdown: millis("SKIRMISH_COUNTDOWN_MS"),
            reveal_delay: millis("SKIRMISH_REVEAL_MS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_bundled_content() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        let data_dir = ClientConfig::bundled_data_dir();

        assert_eq!(config.catalog_path, data_dir.join("weapons.ron"));
        assert_eq!(config.session_path, data_dir.join("session.ron"));
        assert_eq!(config.config_path, data_dir.join("battle.toml"));
        assert!(config.countdown.is_none());
        assert!(config.reveal_delay.is_none());
    }

    #[test]
    fn overrides_are_applied_and_garbage_is_ignored() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("SKIRMISH_SESSION", "/tmp/arena.ron"),
            ("SKIRMISH_COUNTDOWN_MS", "0"),
            ("SKIRMISH_REVEAL_MS", "soon"),
        ]));

        assert_eq!(config.session_path, PathBuf::from("/tmp/arena.ron"));
        assert_eq!(config.countdown, Some(Duration::ZERO));
        assert!(config.reveal_delay.is_none());
    }
}
