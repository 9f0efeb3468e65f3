use ggez::input::keyboard::KeyCode;
use ggez::Context;
use std::collections::HashSet;

/// Keys the views react to
const TRACKED_KEYS: [KeyCode; 14] = [
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::A,
    KeyCode::D,
    KeyCode::W,
    KeyCode::S,
    KeyCode::Space,
    KeyCode::Return,
    KeyCode::NumpadEnter,
    KeyCode::Back,
    KeyCode::L,
    KeyCode::Escape,
];

/// Keyboard state of a single frame, decoupled from the ggez context so views
/// can be driven without a window.
#[derive(Debug, Default, Clone)]
pub struct FrameInput {
    pressed: HashSet<KeyCode>,
    released: HashSet<KeyCode>,

    /// Characters typed since the last frame
    pub text: String,
}

impl FrameInput {
    pub fn from_ctx(ctx: &Context, text: String) -> Self {
        let keyboard = &ctx.keyboard;
        Self {
            pressed: TRACKED_KEYS
                .into_iter()
                .filter(|k| keyboard.is_key_just_pressed(*k))
                .collect(),
            released: TRACKED_KEYS
                .into_iter()
                .filter(|k| keyboard.is_key_just_released(*k))
                .collect(),
            text,
        }
    }

    pub fn press(mut self, key: KeyCode) -> Self {
        self.pressed.insert(key);
        self
    }

    pub fn release(mut self, key: KeyCode) -> Self {
        self.released.insert(key);
        self
    }

    pub fn typed(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }

    #[inline]
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    #[inline]
    pub fn just_released(&self, key: KeyCode) -> bool {
        self.released.contains(&key)
    }

    /// Either enter key
    #[inline]
    pub fn confirm(&self) -> bool {
        self.just_pressed(KeyCode::Return) || self.just_pressed(KeyCode::NumpadEnter)
    }

    #[inline]
    pub fn any_pressed(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.just_pressed(*k))
    }
}
