use super::{
    draw_centered, draw_title, Blink, LeaderboardVariant, LeaderboardView, PlayerNameView,
    Transition, View,
};
use crate::audio::SoundCue;
use crate::config::{SCREEN_HEIGHT, SCREEN_TITLE, SCREEN_WIDTH};
use crate::input::FrameInput;
use crate::session::Session;
use crate::voice::VoiceToken;
use ggez::graphics::{self, Canvas, Color, DrawParam, Drawable, PxScale};
use ggez::input::keyboard::KeyCode;
use ggez::mint::Point2;
use ggez::{Context, GameResult};
use std::time::Duration;

const ITEM_SIZE: (f32, f32) = (260., 56.);
const ITEM_GAP: f32 = 20.;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WelcomeItem {
    Play,
    Leaderboard,
}

impl WelcomeItem {
    fn label(&self) -> &'static str {
        match self {
            WelcomeItem::Play => "Play",
            WelcomeItem::Leaderboard => "Leaderboard",
        }
    }
}

/// Title screen with a small menu
#[derive(Debug)]
pub struct WelcomeView {
    pub items: [WelcomeItem; 2],
    pub selected: usize,
    blink: Blink,
}

impl WelcomeView {
    pub fn new(session: &mut Session) -> Self {
        session.cue(SoundCue::IntroStart);
        Self {
            items: [WelcomeItem::Play, WelcomeItem::Leaderboard],
            selected: 0,
            blink: Blink::new(),
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
            Some(VoiceToken::Start) => return self.activate(session, WelcomeItem::Play),
            Some(VoiceToken::Leaderboard) => {
                return self.activate(session, WelcomeItem::Leaderboard)
            }
            _ => {}
        }

        if input.just_pressed(KeyCode::Escape) {
            session.cue(SoundCue::IntroStop);
            return Transition::Quit;
        }

        if input.just_pressed(KeyCode::L) {
            return self.activate(session, WelcomeItem::Leaderboard);
        }

        if input.confirm() {
            return self.activate(session, self.items[self.selected]);
        }

        // Handle up/down navigation

        if input.any_pressed(&[KeyCode::Up, KeyCode::W]) {
            if self.selected == 0 {
                self.selected = self.items.len() - 1;
            } else {
                self.selected -= 1;
            }
        }

        if input.any_pressed(&[KeyCode::Down, KeyCode::S]) {
            self.selected = (self.selected + 1) % self.items.len();
        }

        Transition::Stay
    }

    fn activate(&self, session: &mut Session, item: WelcomeItem) -> Transition {
        session.cue(SoundCue::IntroStop);
        match item {
            WelcomeItem::Play => Transition::To(View::PlayerName(PlayerNameView::new(session))),
            WelcomeItem::Leaderboard => Transition::To(View::Leaderboard(LeaderboardView::new(
                session,
                LeaderboardVariant::Browse,
            ))),
        }
    }

    pub fn draw(&self, ctx: &mut Context, canvas: &mut Canvas) -> GameResult {
        draw_title(ctx, canvas, SCREEN_TITLE, Color::from_rgb(255, 186, 0));

        let center = Point2 {
            x: SCREEN_WIDTH * 0.5,
            y: SCREEN_HEIGHT * 0.5,
        };

        for (i, item) in self.items.iter().enumerate() {
            let rect = graphics::Rect::new(
                center.x - ITEM_SIZE.0 * 0.5,
                center.y - ITEM_SIZE.1 * 0.5 + i as f32 * (ITEM_SIZE.1 + ITEM_GAP),
                ITEM_SIZE.0,
                ITEM_SIZE.1,
            );

            let mut text = graphics::Text::new(item.label());
            text.set_scale(PxScale::from(24.));
            let (text_w, text_h) = text
                .dimensions(ctx)
                .map(|r| (r.w, r.h))
                .unwrap_or((0., 0.));

            canvas.draw(
                &text,
                DrawParam::default().dest(Point2 {
                    x: rect.x + ITEM_SIZE.0 * 0.5 - text_w * 0.5,
                    y: rect.y + ITEM_SIZE.1 * 0.5 - text_h * 0.5,
                }),
            );

            let stroke = if i == self.selected { 4. } else { 1. };
            let mesh = graphics::Mesh::new_rectangle(
                ctx,
                graphics::DrawMode::stroke(stroke),
                rect,
                Color::WHITE,
            )?;

            canvas.draw(&mesh, DrawParam::default());
        }

        if self.blink.visible() {
            draw_centered(
                ctx,
                canvas,
                "Press Enter or say \"start\" to play",
                SCREEN_HEIGHT * 0.8,
                30.,
                Color::from_rgb(255, 186, 0),
            );
        }

        Ok(())
    }
}
