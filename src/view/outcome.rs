use super::{
    draw_centered, draw_title, Blink, LeaderboardVariant, LeaderboardView, PlayerNameView,
    Transition, View, ViewKind,
};
use crate::audio::SoundCue;
use crate::config::SCREEN_HEIGHT;
use crate::input::FrameInput;
use crate::session::Session;
use crate::voice::VoiceToken;
use ggez::graphics::{Canvas, Color};
use ggez::input::keyboard::KeyCode;
use ggez::{Context, GameResult};
use std::time::Duration;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    GameOver,
    Winner,
}

impl Outcome {
    fn title(&self) -> &'static str {
        match self {
            Outcome::GameOver => "Game Over",
            Outcome::Winner => "You Win!",
        }
    }

    fn color(&self) -> Color {
        match self {
            Outcome::GameOver => Color::RED,
            Outcome::Winner => Color::from_rgb(255, 215, 0),
        }
    }

    fn leaderboard(&self) -> LeaderboardVariant {
        match self {
            Outcome::GameOver => LeaderboardVariant::GameOver,
            Outcome::Winner => LeaderboardVariant::Winning,
        }
    }
}

/// The screen shown once a run is over
#[derive(Debug)]
pub struct OutcomeView {
    pub outcome: Outcome,
    blink: Blink,
}

impl OutcomeView {
    pub fn new(session: &mut Session, outcome: Outcome) -> Self {
        session.cue(match outcome {
            Outcome::GameOver => SoundCue::GameOver,
            Outcome::Winner => SoundCue::Victory,
        });

        Self {
            outcome,
            blink: Blink::new(),
        }
    }

    pub fn kind(&self) -> ViewKind {
        match self.outcome {
            Outcome::GameOver => ViewKind::GameOver,
            Outcome::Winner => ViewKind::Winner,
        }
    }

    pub fn update(
        &mut self,
        session: &mut Session,
        input: &FrameInput,
        delta: Duration,
    ) -> Transition {
        self.blink.tick(delta);

        match session.voice.try_take() {
            Some(VoiceToken::Leaderboard) => return self.show_leaderboard(session),
            Some(VoiceToken::Start) => {
                return Transition::To(View::PlayerName(PlayerNameView::new(session)))
            }
            _ => {}
        }

        if input.confirm() || input.just_pressed(KeyCode::L) {
            return self.show_leaderboard(session);
        }

        Transition::Stay
    }

    fn show_leaderboard(&self, session: &mut Session) -> Transition {
        Transition::To(View::Leaderboard(LeaderboardView::new(
            session,
            self.outcome.leaderboard(),
        )))
    }

    pub fn draw(&self, ctx: &mut Context, canvas: &mut Canvas, session: &Session) -> GameResult {
        draw_title(ctx, canvas, self.outcome.title(), self.outcome.color());

        let player = &session.player;
        draw_centered(
            ctx,
            canvas,
            &format!("{}, your score: {}", player.display_name(), player.score),
            SCREEN_HEIGHT * 0.45,
            32.,
            Color::WHITE,
        );

        if self.blink.visible() {
            draw_centered(
                ctx,
                canvas,
                "Press Enter or say \"leaderboard\" to see the leaderboard",
                SCREEN_HEIGHT * 0.75,
                24.,
                self.outcome.color(),
            );
        }

        Ok(())
    }
}
