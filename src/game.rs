use crate::audio::SoundBank;
use crate::input::FrameInput;
use crate::session::Session;
use crate::view::{Transition, View, WelcomeView};
use crate::voice::recognizer::Recognizer;
use ggez::event::{self};
use ggez::graphics::{self};
use ggez::{Context, GameError, GameResult};

/// Top level event handler driving the active view
#[derive(Debug)]
pub struct Game {
    session: Session,

    view: View,

    /// `None` when the sound files could not be loaded
    sounds: Option<SoundBank>,

    /// Characters typed since the last update
    typed: String,

    recognizer: Option<Recognizer>,
}

impl Game {
    pub fn new(
        mut session: Session,
        sounds: Option<SoundBank>,
        recognizer: Option<Recognizer>,
    ) -> Self {
        let view = View::Welcome(WelcomeView::new(&mut session));
        Self {
            session,
            view,
            sounds,
            typed: String::new(),
            recognizer,
        }
    }

    /// Play everything the views asked for during the last tick
    fn play_cues(&mut self, ctx: &Context) {
        let cues = self.session.take_cues();
        let Some(sounds) = self.sounds.as_mut() else {
            return;
        };

        for cue in cues {
            if let Err(e) = sounds.play(ctx, cue) {
                tracing::warn!(?cue, "Could not play sound: {e}");
            }
        }
    }

    fn shutdown(&mut self) {
        if let Some(mut recognizer) = self.recognizer.take() {
            recognizer.shutdown();
        }
    }
}

impl event::EventHandler for Game {
    fn update(&mut self, ctx: &mut Context) -> GameResult {
        let input = FrameInput::from_ctx(ctx, std::mem::take(&mut self.typed));
        let delta = ctx.time.delta();

        match self.view.update(&mut self.session, &input, delta) {
            Transition::Stay => {}
            Transition::To(next) => {
                tracing::info!(from = ?self.view.kind(), to = ?next.kind(), "Switching view");
                self.view = next;
            }
            Transition::Quit => {
                tracing::info!("Quit requested");
                ctx.request_quit();
            }
        }

        self.play_cues(ctx);

        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        let mut canvas = graphics::Canvas::from_frame(ctx, Some(self.view.background()));

        self.view.draw(ctx, &mut canvas, &self.session)?;

        canvas.finish(ctx)?;

        Ok(())
    }

    fn text_input_event(&mut self, _ctx: &mut Context, character: char) -> Result<(), GameError> {
        self.typed.push(character);
        Ok(())
    }

    fn quit_event(&mut self, _ctx: &mut Context) -> Result<bool, GameError> {
        self.shutdown();
        tracing::info!("Game closed");
        Ok(false)
    }
}
