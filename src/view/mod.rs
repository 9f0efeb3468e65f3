//! The screens of the game. Exactly one [View] is active at a time; a view's
//! update may hand back the next one, which replaces it.

use crate::config::{BLINK_DELAY, BLINK_INTERVAL, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::input::FrameInput;
use crate::session::Session;
use ggez::graphics::{Canvas, Color, DrawParam, Drawable, PxScale, Text};
use ggez::mint::Point2;
use ggez::{Context, GameResult};
use std::time::Duration;

pub use leaderboard::{LeaderboardVariant, LeaderboardView};
pub use outcome::{Outcome, OutcomeView};
pub use platform::{Action, PlatformView};
pub use player_name::PlayerNameView;
pub use welcome::WelcomeView;

mod leaderboard;
mod outcome;
mod platform;
mod player_name;
mod welcome;

/// What the game loop should do after a view's tick
#[derive(Debug)]
pub enum Transition {
    Stay,
    To(View),
    Quit,
}

/// Discriminant of [View], for logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Welcome,
    PlayerName,
    Platform,
    GameOver,
    Winner,
    Leaderboard,
    WinningLeaderboard,
    GameOverLeaderboard,
}

#[derive(Debug)]
pub enum View {
    Welcome(WelcomeView),
    PlayerName(PlayerNameView),
    Platform(Box<PlatformView>),
    Outcome(OutcomeView),
    Leaderboard(LeaderboardView),
}

impl View {
    pub fn kind(&self) -> ViewKind {
        match self {
            View::Welcome(_) => ViewKind::Welcome,
            View::PlayerName(_) => ViewKind::PlayerName,
            View::Platform(_) => ViewKind::Platform,
            View::Outcome(view) => view.kind(),
            View::Leaderboard(view) => view.kind(),
        }
    }

    pub fn update(
        &mut self,
        session: &mut Session,
        input: &FrameInput,
        delta: Duration,
    ) -> Transition {
        match self {
            View::Welcome(view) => view.update(session, input, delta),
            View::PlayerName(view) => view.update(session, input),
            View::Platform(view) => view.update(session, input, delta),
            View::Outcome(view) => view.update(session, input, delta),
            View::Leaderboard(view) => view.update(session, input, delta),
        }
    }

    pub fn draw(&self, ctx: &mut Context, canvas: &mut Canvas, session: &Session) -> GameResult {
        match self {
            View::Welcome(view) => view.draw(ctx, canvas),
            View::PlayerName(view) => view.draw(ctx, canvas),
            View::Platform(view) => view.draw(ctx, canvas, session),
            View::Outcome(view) => view.draw(ctx, canvas, session),
            View::Leaderboard(view) => view.draw(ctx, canvas),
        }
    }

    /// Colour to clear the frame with
    pub fn background(&self) -> Color {
        match self {
            View::Platform(view) => view.background(),
            View::PlayerName(_) => Color::from_rgb(83, 104, 120),
            _ => Color::BLACK,
        }
    }
}

/// Instructions that stay hidden for a moment, then flash on and off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blink {
    remaining: Duration,
    visible: bool,
}

impl Blink {
    pub fn new() -> Self {
        Self {
            remaining: BLINK_DELAY,
            visible: false,
        }
    }

    pub fn tick(&mut self, delta: Duration) {
        self.remaining = self.remaining.saturating_sub(delta);
        if self.remaining.is_zero() {
            self.visible = !self.visible;
            self.remaining = BLINK_INTERVAL;
        }
    }

    #[inline]
    pub fn visible(&self) -> bool {
        self.visible
    }
}

impl Default for Blink {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw `text` horizontally centered on the screen with its top at `y`
pub(crate) fn draw_centered(
    ctx: &Context,
    canvas: &mut Canvas,
    text: &str,
    y: f32,
    size: f32,
    color: Color,
) {
    let mut text = Text::new(text);
    text.set_scale(PxScale::from(size));
    let width = text.dimensions(ctx).map(|r| r.w).unwrap_or_default();

    canvas.draw(
        &text,
        DrawParam::default()
            .dest(Point2 {
                x: SCREEN_WIDTH * 0.5 - width * 0.5,
                y,
            })
            .color(color),
    );
}

/// Draw a large title in the upper third of the screen
pub(crate) fn draw_title(ctx: &Context, canvas: &mut Canvas, title: &str, color: Color) {
    draw_centered(ctx, canvas, title, SCREEN_HEIGHT * 0.2, 56., color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blink_waits_then_toggles() {
        let mut blink = Blink::new();
        let frame = Duration::from_millis(500);

        for _ in 0..3 {
            blink.tick(frame);
            assert!(!blink.visible());
        }

        blink.tick(frame);
        assert!(blink.visible());

        blink.tick(frame);
        assert!(blink.visible());
        blink.tick(frame);
        assert!(!blink.visible());
    }
}
