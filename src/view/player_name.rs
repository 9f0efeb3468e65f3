use super::{draw_centered, PlatformView, Transition, View, WelcomeView};
use crate::config::{MAX_NAME_LEN, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::input::FrameInput;
use crate::session::Session;
use crate::voice::VoiceToken;
use ggez::graphics::{self, Canvas, Color, DrawParam, Drawable, PxScale};
use ggez::input::keyboard::KeyCode;
use ggez::mint::Point2;
use ggez::{Context, GameResult};

const LABEL_COLOR: Color = Color {
    r: 0.55,
    g: 0.,
    b: 0.,
    a: 1.,
};

/// Text entry for the player's name
#[derive(Debug)]
pub struct PlayerNameView {
    /// Current text buffer
    pub buf: String,
}

impl PlayerNameView {
    pub fn new(session: &mut Session) -> Self {
        Self {
            buf: session.player.name.clone(),
        }
    }

    pub fn update(&mut self, session: &mut Session, input: &FrameInput) -> Transition {
        match session.voice.try_take() {
            Some(VoiceToken::SetName(name)) => {
                self.buf = name.chars().take(MAX_NAME_LEN).collect();
            }
            Some(VoiceToken::Start) => return self.launch(session),
            Some(VoiceToken::Menu) => {
                return Transition::To(View::Welcome(WelcomeView::new(session)))
            }
            _ => {}
        }

        if input.just_pressed(KeyCode::Escape) {
            return Transition::To(View::Welcome(WelcomeView::new(session)));
        }

        if input.confirm() {
            return self.launch(session);
        }

        if input.just_pressed(KeyCode::Back) {
            self.buf.pop();
        }

        for ch in input.text.chars().filter(|c| !c.is_control()) {
            if self.buf.chars().count() >= MAX_NAME_LEN {
                break;
            }
            self.buf.push(ch);
        }

        Transition::Stay
    }

    fn launch(&self, session: &mut Session) -> Transition {
        session.player.name = self.buf.trim().to_string();
        tracing::info!(name = session.player.display_name(), "player named");
        Transition::To(View::Platform(Box::new(PlatformView::new_run(session))))
    }

    pub fn draw(&self, ctx: &mut Context, canvas: &mut Canvas) -> GameResult {
        let center = Point2 {
            x: SCREEN_WIDTH * 0.5,
            y: SCREEN_HEIGHT * 0.5,
        };

        let size = (360., 50.);

        let rect = graphics::Rect::new(
            center.x - size.0 * 0.5,
            center.y - size.1 * 0.5,
            size.0,
            size.1,
        );

        let mesh = graphics::Mesh::new_rectangle(
            ctx,
            graphics::DrawMode::fill(),
            rect,
            Color::from_rgb(200, 200, 200),
        )?;

        let mut name = graphics::Text::new(format!("{}_", self.buf));
        name.set_scale(PxScale::from(24.));

        let mut banner = graphics::Text::new("Enter Player Name");
        banner.set_scale(PxScale::from(24.));

        let (text_w, text_h) = name.dimensions(ctx).map(|r| (r.w, r.h)).unwrap_or((0., 0.));
        let (banner_w, banner_h) = banner
            .dimensions(ctx)
            .map(|r| (r.w, r.h))
            .unwrap_or((0., 0.));

        canvas.draw(
            &banner,
            DrawParam::default()
                .dest(Point2 {
                    x: center.x - banner_w * 0.5,
                    y: rect.y - banner_h - 12.,
                })
                .color(LABEL_COLOR),
        );

        canvas.draw(&mesh, DrawParam::default());

        canvas.draw(
            &name,
            DrawParam::default()
                .dest(Point2 {
                    x: rect.x + size.0 * 0.5 - text_w * 0.5,
                    y: rect.y + size.1 * 0.5 - text_h * 0.5,
                })
                .color(LABEL_COLOR),
        );

        draw_centered(
            ctx,
            canvas,
            "Then hit <ENTER> or say \"start\" to start the game",
            rect.y + size.1 + 24.,
            18.,
            LABEL_COLOR,
        );
        draw_centered(
            ctx,
            canvas,
            "Say \"set name: <your name>\" to type hands-free",
            rect.y + size.1 + 54.,
            18.,
            LABEL_COLOR,
        );

        Ok(())
    }
}
