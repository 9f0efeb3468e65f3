use super::{
    draw_centered, draw_title, Blink, PlayerNameView, Transition, View, ViewKind, WelcomeView,
};
use crate::audio::SoundCue;
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::input::FrameInput;
use crate::leaderboard::Leaderboard;
use crate::session::Session;
use crate::voice::VoiceToken;
use ggez::graphics::{self, Canvas, Color, DrawParam, PxScale};
use ggez::input::keyboard::KeyCode;
use ggez::mint::Point2;
use ggez::{Context, GameResult};
use std::time::Duration;

const PANEL_SIZE: (f32, f32) = (420., 360.);

const INSTRUCTION_COLOR: Color = Color {
    r: 0.29,
    g: 0.,
    b: 0.51,
    a: 1.,
};

/// Which way the leaderboard was reached. The variant decides whether the
/// player's score gets recorded and what plays on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardVariant {
    /// Opened from the welcome screen, only shows the ranking
    Browse,
    Winning,
    GameOver,
}

impl LeaderboardVariant {
    fn cue(&self) -> Option<SoundCue> {
        match self {
            LeaderboardVariant::Browse => None,
            LeaderboardVariant::Winning => Some(SoundCue::Victory),
            LeaderboardVariant::GameOver => Some(SoundCue::GameOver),
        }
    }

    #[inline]
    fn records_score(&self) -> bool {
        !matches!(self, LeaderboardVariant::Browse)
    }

    fn kind(&self) -> ViewKind {
        match self {
            LeaderboardVariant::Browse => ViewKind::Leaderboard,
            LeaderboardVariant::Winning => ViewKind::WinningLeaderboard,
            LeaderboardVariant::GameOver => ViewKind::GameOverLeaderboard,
        }
    }
}

#[derive(Debug)]
pub struct LeaderboardView {
    pub variant: LeaderboardVariant,

    /// Ranking as rendered on screen
    pub text: String,

    blink: Blink,
}

impl LeaderboardView {
    pub fn new(session: &mut Session, variant: LeaderboardVariant) -> Self {
        let path = session.leaderboard_path();

        let mut board = Leaderboard::load(path).unwrap_or_else(|e| {
            tracing::warn!("Could not load leaderboard: {e}");
            Leaderboard::new(path)
        });

        if variant.records_score() {
            let player = &session.player;
            board.add_score(player.name.clone(), player.score);
            if let Err(e) = board.save() {
                tracing::warn!("Could not save leaderboard: {e}");
            }
        }

        if let Some(cue) = variant.cue() {
            session.cue(cue);
        }

        Self {
            variant,
            text: board.render_text(),
            blink: Blink::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> ViewKind {
        self.variant.kind()
    }

    pub fn update(
        &mut self,
        session: &mut Session,
        input: &FrameInput,
        delta: Duration,
    ) -> Transition {
        self.blink.tick(delta);

        match session.voice.try_take() {
            Some(VoiceToken::Start) => {
                return Transition::To(View::PlayerName(PlayerNameView::new(session)))
            }
            Some(VoiceToken::Menu) => {
                return Transition::To(View::Welcome(WelcomeView::new(session)))
            }
            _ => {}
        }

        if input.confirm() {
            return Transition::To(View::PlayerName(PlayerNameView::new(session)));
        }

        if input.just_pressed(KeyCode::Back) {
            return Transition::To(View::Welcome(WelcomeView::new(session)));
        }

        Transition::Stay
    }

    pub fn draw(&self, ctx: &mut Context, canvas: &mut Canvas) -> GameResult {
        draw_title(ctx, canvas, "Leaderboard", Color::from_rgb(255, 186, 0));

        let rect = graphics::Rect::new(
            SCREEN_WIDTH * 0.5 - PANEL_SIZE.0 * 0.5,
            SCREEN_HEIGHT * 0.3,
            PANEL_SIZE.0,
            PANEL_SIZE.1,
        );

        let panel = graphics::Mesh::new_rounded_rectangle(
            ctx,
            graphics::DrawMode::fill(),
            rect,
            8.,
            Color::from_rgb(200, 200, 200),
        )?;
        canvas.draw(&panel, DrawParam::default());

        let body = if self.text.is_empty() {
            "No scores yet"
        } else {
            self.text.as_str()
        };

        let mut text = graphics::Text::new(body);
        text.set_scale(PxScale::from(16.));

        canvas.draw(
            &text,
            DrawParam::default()
                .dest(Point2 {
                    x: rect.x + 20.,
                    y: rect.y + 16.,
                })
                .color(Color::BLACK),
        );

        if self.blink.visible() {
            draw_centered(
                ctx,
                canvas,
                "Press Enter to start again, Backspace for the menu",
                SCREEN_HEIGHT * 0.88,
                22.,
                INSTRUCTION_COLOR,
            );
        }

        Ok(())
    }
}
