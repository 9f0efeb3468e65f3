use super::{Outcome, OutcomeView, Transition, View};
use crate::audio::SoundCue;
use crate::config::{
    BOTTOM_VIEWPORT_MARGIN, FALL_LIMIT, FREEZE_DURATION, HUD_HEIGHT, LEFT_VIEWPORT_MARGIN,
    RIGHT_VIEWPORT_MARGIN, SCREEN_HEIGHT, SCREEN_WIDTH, TOP_VIEWPORT_MARGIN,
};
use crate::geometry::{random_pos, Aabb};
use crate::input::FrameInput;
use crate::level::{Level, Tile};
use crate::physics::{self, Body, Climb, Enemy};
use crate::session::Session;
use crate::voice::VoiceToken;
use ggez::graphics::{self, Canvas, Color, DrawMode, DrawParam, MeshBuilder, PxScale, Rect};
use ggez::input::keyboard::KeyCode;
use ggez::mint::{Point2, Vector2};
use ggez::{Context, GameResult};
use std::time::Duration;

/// Keys moving the player, checked for presses and releases every tick
const MOVE_KEYS: [KeyCode; 9] = [
    KeyCode::Left,
    KeyCode::A,
    KeyCode::Right,
    KeyCode::D,
    KeyCode::Up,
    KeyCode::W,
    KeyCode::Down,
    KeyCode::S,
    KeyCode::Space,
];

const GROUND_COLOR: Color = Color {
    r: 0.45,
    g: 0.3,
    b: 0.15,
    a: 1.,
};

const LADDER_COLOR: Color = Color {
    r: 0.8,
    g: 0.6,
    b: 0.3,
    a: 1.,
};

const TRAP_COLOR: Color = Color {
    r: 0.85,
    g: 0.1,
    b: 0.1,
    a: 1.,
};

const GOAL_COLOR: Color = Color {
    r: 1.,
    g: 0.84,
    b: 0.,
    a: 1.,
};

const ENEMY_COLOR: Color = Color {
    r: 0.5,
    g: 0.1,
    b: 0.6,
    a: 1.,
};

const PLAYER_COLOR: Color = Color {
    r: 0.1,
    g: 0.4,
    b: 0.9,
    a: 1.,
};

/// One cloud per this many tiles of map width
const TILES_PER_CLOUD: usize = 8;

/// What a key or a voice command asks the player to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Jump,
    StopHorizontal,
    StopVertical,

    /// Stop moving sideways, and vertically on a ladder
    Stop,
}

impl Action {
    pub fn from_voice(token: &VoiceToken) -> Option<Self> {
        match token {
            VoiceToken::Jump => Some(Action::Jump),
            VoiceToken::Left => Some(Action::MoveLeft),
            VoiceToken::Right => Some(Action::MoveRight),
            VoiceToken::Up => Some(Action::MoveUp),
            VoiceToken::Down => Some(Action::MoveDown),
            VoiceToken::Stop => Some(Action::Stop),
            _ => None,
        }
    }

    pub fn from_press(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Left | KeyCode::A => Some(Action::MoveLeft),
            KeyCode::Right | KeyCode::D => Some(Action::MoveRight),
            KeyCode::Up | KeyCode::W => Some(Action::MoveUp),
            KeyCode::Down | KeyCode::S => Some(Action::MoveDown),
            KeyCode::Space => Some(Action::Jump),
            _ => None,
        }
    }

    pub fn from_release(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Left | KeyCode::A | KeyCode::Right | KeyCode::D => {
                Some(Action::StopHorizontal)
            }
            KeyCode::Up | KeyCode::W | KeyCode::Down | KeyCode::S => Some(Action::StopVertical),
            _ => None,
        }
    }
}

/// Time bonus awarded when a level ends.
///
/// `elapsed_secs` are whole seconds since the run started and count as at
/// least one. Halves round to even.
pub fn time_bonus(level: usize, elapsed_secs: u64, lives: u32) -> u64 {
    let per_life = (1000. * level as f64 / elapsed_secs.max(1) as f64).round_ties_even() as u64;
    per_life * (lives as u64 + 1)
}

/// Top left corner of the visible part of the level
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Camera {
    left: f32,
    top: f32,
}

impl Camera {
    /// Camera at the left edge with the bottom of the map at the bottom of the screen
    fn at_start(level: &Level) -> Self {
        Self {
            left: 0.,
            top: Self::max_top(level),
        }
    }

    #[inline]
    fn max_top(level: &Level) -> f32 {
        level.pixel_height() - SCREEN_HEIGHT
    }

    /// Scroll so `target` stays within the viewport margins
    fn follow(&mut self, target: Aabb, level: &Level) {
        let left_boundary = self.left + LEFT_VIEWPORT_MARGIN;
        if target.x < left_boundary {
            self.left -= left_boundary - target.x;
        }

        let right_boundary = self.left + SCREEN_WIDTH - RIGHT_VIEWPORT_MARGIN;
        if target.right() > right_boundary {
            self.left += target.right() - right_boundary;
        }

        self.left = self
            .left
            .clamp(0., (level.pixel_width() - SCREEN_WIDTH).max(0.));

        let top_boundary = self.top + HUD_HEIGHT + TOP_VIEWPORT_MARGIN;
        if target.y < top_boundary {
            self.top -= top_boundary - target.y;
        }

        let bottom_boundary = self.top + SCREEN_HEIGHT - BOTTOM_VIEWPORT_MARGIN;
        if target.bottom() > bottom_boundary {
            self.top += target.bottom() - bottom_boundary;
        }

        // Never scroll below the map
        self.top = self.top.min(Self::max_top(level));

        // Whole pixels only so tiles line up
        self.left = self.left.round();
        self.top = self.top.round();
    }

    #[inline]
    fn to_screen(self, bounds: Aabb) -> Rect {
        let mut rect = Rect::from(bounds);
        rect.translate(Vector2 {
            x: -self.left,
            y: -self.top,
        });
        rect
    }
}

/// The running game: one level at a time until the last one is cleared or
/// the player runs out of lives.
#[derive(Debug)]
pub struct PlatformView {
    /// Working copy of the current level, collected coins are removed from it
    level: Level,

    body: Body,

    enemies: Vec<Enemy>,

    /// Coins collected in the current level
    pub level_score: u64,

    /// Time since the run started
    pub run_time: Duration,

    camera: Camera,

    /// While non zero the world stands still
    freeze: Duration,

    /// Set once the run has ended, no further scoring happens afterwards
    finished: bool,

    clouds: Vec<Point2<f32>>,
}

impl PlatformView {
    /// Start a fresh run on the first level
    pub fn new_run(session: &mut Session) -> Self {
        session.player.start_run();
        session.cue(SoundCue::Ready);
        session.cue(SoundCue::Go);
        session.cue(SoundCue::BackgroundStart);

        tracing::info!(player = session.player.display_name(), "new run");

        let level = session.level(1);
        let mut view = Self {
            body: Body::new(level.player_start),
            enemies: vec![],
            level_score: 0,
            run_time: Duration::ZERO,
            camera: Camera::at_start(level),
            freeze: FREEZE_DURATION,
            finished: false,
            clouds: vec![],
            level: level.clone(),
        };
        view.setup(level.clone());
        view
    }

    /// Put the player at the start of `level` with its coins and enemies restored
    fn setup(&mut self, level: Level) {
        tracing::debug!(level = level.number, "setting up level");

        self.level_score = 0;
        self.body = Body::new(level.player_start);
        self.enemies = level.enemy_spawns.iter().copied().map(Enemy::new).collect();
        self.camera = Camera::at_start(&level);
        self.clouds = (0..(level.width / TILES_PER_CLOUD).max(1))
            .map(|_| {
                random_pos(
                    (0., level.pixel_width()),
                    (-SCREEN_HEIGHT * 0.2, level.pixel_height() * 0.4),
                )
            })
            .collect();
        self.level = level;
    }

    #[inline]
    pub fn level_number(&self) -> usize {
        self.level.number
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        !self.freeze.is_zero()
    }

    #[inline]
    pub fn background(&self) -> Color {
        self.level.background
    }

    pub fn update(
        &mut self,
        session: &mut Session,
        input: &FrameInput,
        delta: Duration,
    ) -> Transition {
        self.run_time += delta;

        if self.finished {
            return Transition::Stay;
        }

        if self.is_frozen() {
            self.freeze = self.freeze.saturating_sub(delta);
            return Transition::Stay;
        }

        let dt = delta.as_secs_f32();

        if let Some(token) = session.voice.try_take() {
            tracing::debug!(%token, "voice command");
            if let Some(action) = Action::from_voice(&token) {
                self.apply(session, action);
            }
        }

        for key in MOVE_KEYS {
            if input.just_pressed(key) {
                if let Some(action) = Action::from_press(key) {
                    self.apply(session, action);
                }
            }
            if input.just_released(key) {
                if let Some(action) = Action::from_release(key) {
                    self.apply(session, action);
                }
            }
        }

        physics::step(&mut self.body, &self.level, dt);

        if self.body.bounds.x < 0. {
            self.body.bounds.x = 0.;
        }

        self.collect_coins(session);

        let hit_enemy = self
            .enemies
            .iter()
            .any(|enemy| enemy.bounds.overlaps(&self.body.bounds));
        let fell = self.body.bounds.y > self.level.pixel_height() + FALL_LIMIT;

        if hit_enemy || fell || self.level.touches(self.body.bounds, Tile::Trap) {
            return self.die(session);
        }

        if self.level.touches(self.body.bounds, Tile::Goal) {
            return self.reach_goal(session);
        }

        for enemy in self.enemies.iter_mut() {
            enemy.walk(&self.level, dt);
        }

        self.camera.follow(self.body.bounds, &self.level);

        Transition::Stay
    }

    fn apply(&mut self, session: &mut Session, action: Action) {
        match action {
            Action::MoveLeft => self.body.move_left(),
            Action::MoveRight => self.body.move_right(),
            Action::MoveUp if self.body.on_ladder => self.body.climb = Climb::Up,
            Action::MoveDown if self.body.on_ladder => self.body.climb = Climb::Down,
            Action::MoveUp | Action::MoveDown => {}
            Action::Jump => {
                if self.body.jump() {
                    session.cue(SoundCue::Jump);
                }
            }
            Action::StopHorizontal => self.body.stop_horizontal(),
            Action::StopVertical => self.body.stop_vertical(),
            Action::Stop => {
                self.body.stop_horizontal();
                self.body.stop_vertical();
            }
        }
    }

    fn collect_coins(&mut self, session: &mut Session) {
        let player = self.body.bounds;
        let mut collected = 0;

        self.level.coins.retain(|coin| {
            if coin.bounds.overlaps(&player) {
                collected += coin.value;
                session.cue(SoundCue::Coin);
                false
            } else {
                true
            }
        });

        self.level_score += collected;
    }

    fn die(&mut self, session: &mut Session) -> Transition {
        session.cue(SoundCue::Death);
        session.player.lives = session.player.lives.saturating_sub(1);

        tracing::info!(
            level = self.level.number,
            lives = session.player.lives,
            "player died"
        );

        if session.player.lives == 0 {
            self.finish(session);
            return Transition::To(View::Outcome(OutcomeView::new(
                session,
                Outcome::GameOver,
            )));
        }

        self.setup(session.level(self.level.number).clone());
        self.freeze = FREEZE_DURATION;
        Transition::Stay
    }

    fn reach_goal(&mut self, session: &mut Session) -> Transition {
        let number = self.level.number;

        if number >= session.level_count() {
            self.finish(session);
            return Transition::To(View::Outcome(OutcomeView::new(session, Outcome::Winner)));
        }

        self.credit_score(session);
        session.cue(SoundCue::LevelVictory);
        tracing::info!(level = number, score = session.player.score, "level cleared");

        self.setup(session.level(number + 1).clone());
        self.freeze = FREEZE_DURATION;
        Transition::Stay
    }

    /// End the run, crediting the final level exactly once
    fn finish(&mut self, session: &mut Session) {
        self.credit_score(session);
        self.finished = true;
        session.cue(SoundCue::BackgroundStop);
        tracing::info!(score = session.player.score, "run finished");
    }

    fn credit_score(&mut self, session: &mut Session) {
        let bonus = time_bonus(
            self.level.number,
            self.run_time.as_secs(),
            session.player.lives,
        );
        session.player.score += self.level_score + bonus;
        self.level_score = 0;
    }
}

/// Drawing logic impls
impl PlatformView {
    pub fn draw(&self, ctx: &mut Context, canvas: &mut Canvas, session: &Session) -> GameResult {
        let camera = self.camera;
        let mut mb = MeshBuilder::new();

        // Clouds scroll at half speed
        for cloud in self.clouds.iter() {
            let center = Point2 {
                x: cloud.x - camera.left * 0.5,
                y: cloud.y - camera.top,
            };
            mb.circle(DrawMode::fill(), center, 24., 0.5, Color::WHITE)?;
            mb.circle(
                DrawMode::fill(),
                Point2 {
                    x: center.x + 26.,
                    y: center.y + 6.,
                },
                18.,
                0.5,
                Color::WHITE,
            )?;
        }

        for (tile, bounds) in self.level.tiles() {
            let rect = camera.to_screen(bounds);
            match tile {
                Tile::Ground => {
                    mb.rectangle(DrawMode::fill(), rect, GROUND_COLOR)?;
                }
                Tile::Ladder => {
                    let rail = rect.w * 0.15;
                    mb.rectangle(
                        DrawMode::fill(),
                        Rect::new(rect.x + rail, rect.y, rail, rect.h),
                        LADDER_COLOR,
                    )?;
                    mb.rectangle(
                        DrawMode::fill(),
                        Rect::new(rect.right() - 2. * rail, rect.y, rail, rect.h),
                        LADDER_COLOR,
                    )?;
                    mb.rectangle(
                        DrawMode::fill(),
                        Rect::new(rect.x + rail, rect.y + rect.h * 0.5, rect.w - 2. * rail, rail),
                        LADDER_COLOR,
                    )?;
                }
                Tile::Trap => {
                    mb.polygon(
                        DrawMode::fill(),
                        &[
                            Point2 {
                                x: rect.x,
                                y: rect.bottom(),
                            },
                            Point2 {
                                x: rect.x + rect.w * 0.5,
                                y: rect.y + rect.h * 0.3,
                            },
                            Point2 {
                                x: rect.right(),
                                y: rect.bottom(),
                            },
                        ],
                        TRAP_COLOR,
                    )?;
                }
                Tile::Goal => {
                    mb.rectangle(DrawMode::fill(), rect, GOAL_COLOR)?;
                }
                Tile::Empty => {}
            }
        }

        for coin in self.level.coins.iter() {
            let center = coin.bounds.center();
            mb.circle(
                DrawMode::fill(),
                Point2 {
                    x: center.x - camera.left,
                    y: center.y - camera.top,
                },
                coin.bounds.w * 0.5,
                0.2,
                GOAL_COLOR,
            )?;
        }

        for enemy in self.enemies.iter() {
            mb.rectangle(DrawMode::fill(), camera.to_screen(enemy.bounds), ENEMY_COLOR)?;
        }

        mb.rectangle(DrawMode::fill(), camera.to_screen(self.body.bounds), PLAYER_COLOR)?;

        let world = graphics::Mesh::from_data(ctx, mb.build());
        canvas.draw(&world, DrawParam::default());

        self.draw_hud(ctx, canvas, session)
    }

    /// Banner with the timer, scores and remaining lives
    fn draw_hud(&self, ctx: &mut Context, canvas: &mut Canvas, session: &Session) -> GameResult {
        let banner = graphics::Mesh::new_rectangle(
            ctx,
            DrawMode::fill(),
            Rect::new(0., 0., SCREEN_WIDTH, HUD_HEIGHT),
            Color::BLACK,
        )?;
        canvas.draw(&banner, DrawParam::default());

        let player = &session.player;
        let y = HUD_HEIGHT * 0.5 - 10.;

        let items = [
            (
                30.,
                format!(
                    "{} - Level: {} - Time: {}",
                    player.display_name(),
                    self.level.number,
                    self.run_time.as_secs()
                ),
            ),
            (600., format!("Score: {}", self.level_score)),
            (750., format!("Total: {}", player.score)),
            (905., format!("Lives: {}", player.lives)),
        ];

        for (x, text) in items {
            let mut text = graphics::Text::new(text);
            text.set_scale(PxScale::from(18.));

            // Red shadow under white text
            canvas.draw(
                &text,
                DrawParam::default()
                    .dest(Point2 { x, y })
                    .color(Color::RED),
            );
            canvas.draw(
                &text,
                DrawParam::default()
                    .dest(Point2 { x: x + 2., y })
                    .color(Color::WHITE),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::COIN_VALUE;
    use crate::player::Player;
    use crate::view::ViewKind;
    use crate::voice::{self, VoiceSender};

    const FRAME: Duration = Duration::from_millis(16);

    const RUNWAY: &str = "\
..........
..........
P.o.....G.
##########";

    const PIT: &str = "\
P.G
^##";

    fn session(levels: &[&str]) -> (Session, VoiceSender) {
        let (tx, rx) = voice::channel(8);
        let levels = levels
            .iter()
            .enumerate()
            .map(|(i, src)| Level::parse(i + 1, src).unwrap())
            .collect();
        let session = Session::new(Player::new("Ada"), rx, "unused.json", levels).unwrap();
        (session, tx)
    }

    fn wait_out_freeze(view: &mut PlatformView, session: &mut Session) {
        while view.is_frozen() {
            assert!(matches!(
                view.update(session, &FrameInput::default(), FRAME),
                Transition::Stay
            ));
        }
        for _ in 0..5 {
            view.update(session, &FrameInput::default(), FRAME);
        }
    }

    #[test]
    fn bonus_formula() {
        assert_eq!(time_bonus(1, 10, 2), 300);
        assert_eq!(time_bonus(1, 0, 0), 1000);
        assert_eq!(time_bonus(3, 7, 0), 429);
        assert_eq!(time_bonus(5, 1000, 3), 20);
    }

    #[test]
    fn bonus_rounds_halves_to_even() {
        assert_eq!(time_bonus(1, 16, 0), 62);
        assert_eq!(time_bonus(3, 16, 1), 376);
    }

    #[test]
    fn new_run_resets_player_and_cues_intro_sounds() {
        let (mut session, _tx) = session(&[RUNWAY]);
        session.player.score = 99;
        session.player.lives = 1;

        let view = PlatformView::new_run(&mut session);

        assert_eq!(session.player.score, 0);
        assert_eq!(session.player.lives, 3);
        assert_eq!(view.level_number(), 1);
        assert!(view.is_frozen());
        assert_eq!(
            session.take_cues(),
            vec![SoundCue::Ready, SoundCue::Go, SoundCue::BackgroundStart]
        );
    }

    #[test]
    fn voice_jump_equals_space() {
        let (mut by_voice, tx) = session(&[RUNWAY]);
        let (mut by_key, _tx) = session(&[RUNWAY]);

        let mut voice_view = PlatformView::new_run(&mut by_voice);
        let mut key_view = PlatformView::new_run(&mut by_key);
        wait_out_freeze(&mut voice_view, &mut by_voice);
        wait_out_freeze(&mut key_view, &mut by_key);
        by_voice.take_cues();
        by_key.take_cues();

        assert!(voice_view.body().on_ground);

        tx.push(VoiceToken::Jump);
        voice_view.update(&mut by_voice, &FrameInput::default(), FRAME);
        key_view.update(&mut by_key, &FrameInput::default().press(KeyCode::Space), FRAME);

        assert_eq!(voice_view.body(), key_view.body());
        assert!(voice_view.body().velocity.y < 0.);
        assert_eq!(by_voice.take_cues(), vec![SoundCue::Jump]);
        assert_eq!(by_key.take_cues(), vec![SoundCue::Jump]);
    }

    #[test]
    fn voice_stop_halts_horizontal_movement() {
        let (mut session, tx) = session(&[RUNWAY]);
        let mut view = PlatformView::new_run(&mut session);
        wait_out_freeze(&mut view, &mut session);

        tx.push(VoiceToken::Right);
        view.update(&mut session, &FrameInput::default(), FRAME);
        assert!(view.body().velocity.x > 0.);

        tx.push(VoiceToken::Stop);
        view.update(&mut session, &FrameInput::default(), FRAME);
        assert_eq!(view.body().velocity.x, 0.);
    }

    #[test]
    fn clearing_a_level_moves_to_the_next_one() {
        let (mut session, _tx) = session(&[RUNWAY, RUNWAY]);
        let mut view = PlatformView::new_run(&mut session);
        wait_out_freeze(&mut view, &mut session);
        session.take_cues();

        view.update(&mut session, &FrameInput::default().press(KeyCode::Right), FRAME);
        for _ in 0..300 {
            view.update(&mut session, &FrameInput::default(), FRAME);
            if view.level_number() == 2 {
                break;
            }
        }

        assert_eq!(view.level_number(), 2);
        assert!(view.is_frozen());
        assert_eq!(view.level_score, 0);
        assert!(session.player.score > COIN_VALUE);

        let cues = session.take_cues();
        assert!(cues.contains(&SoundCue::Coin));
        assert!(cues.contains(&SoundCue::LevelVictory));
    }

    #[test]
    fn clearing_the_last_level_wins() {
        let (mut session, _tx) = session(&[RUNWAY]);
        let mut view = PlatformView::new_run(&mut session);
        wait_out_freeze(&mut view, &mut session);

        view.update(&mut session, &FrameInput::default().press(KeyCode::Right), FRAME);

        let mut outcome = None;
        for _ in 0..300 {
            if let Transition::To(next) = view.update(&mut session, &FrameInput::default(), FRAME)
            {
                outcome = Some(next.kind());
                break;
            }
        }

        assert_eq!(outcome, Some(ViewKind::Winner));
        assert_eq!(
            session.player.score,
            COIN_VALUE + time_bonus(1, view.run_time.as_secs(), 3)
        );
        assert!(session.take_cues().contains(&SoundCue::BackgroundStop));
    }

    #[test]
    fn game_over_happens_exactly_once() {
        let (mut session, _tx) = session(&[PIT]);
        let mut view = PlatformView::new_run(&mut session);

        let mut game_overs = 0;
        for _ in 0..1000 {
            if let Transition::To(next) = view.update(&mut session, &FrameInput::default(), FRAME)
            {
                assert_eq!(next.kind(), ViewKind::GameOver);
                game_overs += 1;
            }
        }

        assert_eq!(game_overs, 1);
        assert_eq!(session.player.lives, 0);
        assert_eq!(
            session
                .take_cues()
                .iter()
                .filter(|c| **c == SoundCue::Death)
                .count(),
            3
        );
    }

    #[test]
    fn camera_follows_to_the_right() {
        let src = format!(
            "{}G\nP{}\n{}",
            ".".repeat(99),
            ".".repeat(99),
            "#".repeat(100)
        );
        let level = Level::parse(1, &src).unwrap();
        let mut camera = Camera::at_start(&level);

        let mut target = level.player_start;
        camera.follow(target, &level);
        assert_eq!(camera.left, 0.);

        target.x = 2000.;
        camera.follow(target, &level);
        let right_boundary = SCREEN_WIDTH - RIGHT_VIEWPORT_MARGIN;
        assert_eq!(camera.left, (target.right() - right_boundary).round());

        target.x = 10_000.;
        camera.follow(target, &level);
        assert_eq!(camera.left, level.pixel_width() - SCREEN_WIDTH);
    }
}
