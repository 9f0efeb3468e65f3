use std::path::PathBuf;
use std::time::Duration;

pub const SCREEN_WIDTH: f32 = 1000.;
pub const SCREEN_HEIGHT: f32 = 650.;
pub const SCREEN_TITLE: &str = "Arcade Platformer";

/// Size of a level tile in pixels
pub const TILE_SIZE: f32 = 32.;

/// Player hitbox, slightly narrower than a tile so it fits through gaps
pub const PLAYER_SIZE: (f32, f32) = (24., 30.);

/// Enemy hitbox
pub const ENEMY_SIZE: (f32, f32) = (28., 28.);

/// Pixels per second
pub const PLAYER_MOVE_SPEED: f32 = 220.;

/// Pixels per second
pub const PLAYER_CLIMB_SPEED: f32 = 160.;

/// Initial upward velocity of a jump in pixels per second
pub const PLAYER_JUMP_SPEED: f32 = 560.;

/// Downward acceleration in pixels per second squared
pub const GRAVITY: f32 = 1500.;

/// Terminal falling velocity
pub const MAX_FALL_SPEED: f32 = 900.;

/// How far below the map the player may fall before it counts as a death
pub const FALL_LIMIT: f32 = 300.;

pub const TOTAL_LIFE_COUNT: u32 = 3;

/// Pause after a death or a cleared level before play resumes
pub const FREEZE_DURATION: Duration = Duration::from_secs(1);

/// Camera scroll margins, measured from each edge of the screen
pub const LEFT_VIEWPORT_MARGIN: f32 = 200.;
pub const RIGHT_VIEWPORT_MARGIN: f32 = 300.;
pub const TOP_VIEWPORT_MARGIN: f32 = 150.;
pub const BOTTOM_VIEWPORT_MARGIN: f32 = 150.;

/// Height of the score banner drawn over the level
pub const HUD_HEIGHT: f32 = 50.;

/// How long instructions stay hidden when a static screen opens
pub const BLINK_DELAY: Duration = Duration::from_secs(2);

/// Toggle interval of blinking instructions afterwards
pub const BLINK_INTERVAL: Duration = Duration::from_secs(1);

/// Maximum amount of voice tokens waiting for a view to take them
pub const VOICE_QUEUE_CAPACITY: usize = 8;

/// Player names longer than this are not accepted
pub const MAX_NAME_LEN: usize = 20;

pub const DEFAULT_RECOGNIZER_CMD: &str = "speech-recognizer";
pub const DEFAULT_LEADERBOARD_PATH: &str = "./leaderboard.json";

pub const ENV_SPEECH_API_KEY: &str = "SPEECH_API_KEY";
pub const ENV_SPEECH_REGION: &str = "SPEECH_REGION";
pub const ENV_RECOGNIZER_CMD: &str = "SPEECH_RECOGNIZER_CMD";
pub const ENV_LEADERBOARD_PATH: &str = "LEADERBOARD_PATH";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "You need to set the speech key and speech region. \
         Export SPEECH_API_KEY and SPEECH_REGION before starting the game."
    )]
    MissingCredentials,
}

/// Credentials and command of the external speech recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechConfig {
    pub api_key: Option<String>,
    pub region: Option<String>,
    pub command: String,
}

/// Runtime configuration gathered from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub speech: SpeechConfig,
    pub leaderboard_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    ///
    /// Empty values count as unset. Startup only fails when neither speech
    /// variable is present.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = var(ENV_SPEECH_API_KEY);
        let region = var(ENV_SPEECH_REGION);

        if api_key.is_none() && region.is_none() {
            return Err(ConfigError::MissingCredentials);
        }

        Ok(Self {
            speech: SpeechConfig {
                api_key,
                region,
                command: var(ENV_RECOGNIZER_CMD)
                    .unwrap_or_else(|| DEFAULT_RECOGNIZER_CMD.to_string()),
            },
            leaderboard_path: var(ENV_LEADERBOARD_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LEADERBOARD_PATH)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_credentials_is_fatal() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials));
        assert!(err.to_string().contains(ENV_SPEECH_API_KEY));
    }

    #[test]
    fn blank_credentials_count_as_missing() {
        let res = Config::from_lookup(lookup(&[
            (ENV_SPEECH_API_KEY, "  "),
            (ENV_SPEECH_REGION, ""),
        ]));
        assert!(res.is_err());
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[(ENV_SPEECH_API_KEY, "key")])).unwrap();
        assert_eq!(config.speech.api_key.as_deref(), Some("key"));
        assert_eq!(config.speech.region, None);
        assert_eq!(config.speech.command, DEFAULT_RECOGNIZER_CMD);
        assert_eq!(
            config.leaderboard_path,
            PathBuf::from(DEFAULT_LEADERBOARD_PATH)
        );
    }

    #[test]
    fn overrides_apply() {
        let config = Config::from_lookup(lookup(&[
            (ENV_SPEECH_REGION, "westeurope"),
            (ENV_RECOGNIZER_CMD, "/usr/bin/listen"),
            (ENV_LEADERBOARD_PATH, "/tmp/board.json"),
        ]))
        .unwrap();
        assert_eq!(config.speech.region.as_deref(), Some("westeurope"));
        assert_eq!(config.speech.command, "/usr/bin/listen");
        assert_eq!(config.leaderboard_path, PathBuf::from("/tmp/board.json"));
    }
}
