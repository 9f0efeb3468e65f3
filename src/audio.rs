use ggez::audio::{SoundSource, Source};
use ggez::{Context, GameResult};
use macros::SoundBank;

/// Sounds requested by the views, played by the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    IntroStart,
    IntroStop,
    BackgroundStart,
    BackgroundStop,
    Ready,
    Go,
    Coin,
    Jump,
    LevelVictory,
    Death,
    GameOver,
    Victory,
}

#[derive(SoundBank)]
pub struct SoundBank {
    #[sound(path = "sounds/intro.wav", volume = 0.3, repeat = true)]
    intro: Source,
    #[sound(path = "sounds/background.wav", volume = 0.3, repeat = true)]
    background: Source,
    #[sound(path = "sounds/ready.wav")]
    ready: Source,
    #[sound(path = "sounds/go.wav")]
    go: Source,
    #[sound(path = "sounds/coin.wav")]
    coin: Source,
    #[sound(path = "sounds/jump.wav")]
    jump: Source,
    #[sound(path = "sounds/level_victory.wav")]
    level_victory: Source,
    #[sound(path = "sounds/death.wav")]
    death: Source,
    #[sound(path = "sounds/game_over.wav", volume = 0.3)]
    game_over: Source,
    #[sound(path = "sounds/victory.wav", volume = 0.3)]
    victory: Source,
}

impl SoundBank {
    pub fn play(&mut self, ctx: &Context, cue: SoundCue) -> GameResult {
        match cue {
            SoundCue::IntroStart => self.intro.play(ctx),
            SoundCue::IntroStop => self.intro.stop(ctx),
            SoundCue::BackgroundStart => self.background.play(ctx),
            SoundCue::BackgroundStop => self.background.stop(ctx),
            SoundCue::Ready => self.ready.play_detached(ctx),
            SoundCue::Go => self.go.play_detached(ctx),
            SoundCue::Coin => self.coin.play_detached(ctx),
            SoundCue::Jump => self.jump.play_detached(ctx),
            SoundCue::LevelVictory => self.level_victory.play_detached(ctx),
            SoundCue::Death => self.death.play_detached(ctx),
            SoundCue::GameOver => self.game_over.play_detached(ctx),
            SoundCue::Victory => self.victory.play_detached(ctx),
        }
    }
}

impl std::fmt::Debug for SoundBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundBank").finish_non_exhaustive()
    }
}
