use ggez::conf::{WindowMode, WindowSetup};
use ggez::event::{self};
use platformer::audio::SoundBank;
use platformer::config::{Config, SCREEN_HEIGHT, SCREEN_TITLE, SCREEN_WIDTH, VOICE_QUEUE_CAPACITY};
use platformer::game::Game;
use platformer::level;
use platformer::player::Player;
use platformer::session::Session;
use platformer::voice::{self, recognizer::Recognizer};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    tracing::info!("Game started");

    let config = Config::from_env()?;

    let (sender, receiver) = voice::channel(VOICE_QUEUE_CAPACITY);

    // The game stays playable by keyboard without a recognizer
    let recognizer = match Recognizer::spawn(&config.speech, sender) {
        Ok(recognizer) => Some(recognizer),
        Err(e) => {
            tracing::warn!("Voice commands disabled: {e}");
            None
        }
    };

    let levels = level::builtin()?;
    let session = Session::new(
        Player::default(),
        receiver,
        config.leaderboard_path.clone(),
        levels,
    )?;

    let resources = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources");

    let (mut ctx, event_loop) = ggez::ContextBuilder::new("platformer", "platformer")
        .window_setup(WindowSetup::default().title(SCREEN_TITLE))
        .window_mode(WindowMode::default().dimensions(SCREEN_WIDTH, SCREEN_HEIGHT))
        .add_resource_path(resources)
        .build()?;

    let sounds = match SoundBank::new(&mut ctx) {
        Ok(sounds) => Some(sounds),
        Err(e) => {
            tracing::warn!("Could not load sounds, running muted: {e}");
            None
        }
    };

    let game = Game::new(session, sounds, recognizer);
    event::run(ctx, event_loop, game);
}
