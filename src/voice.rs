//! Voice commands: the token vocabulary, recognizer phrase parsing and the
//! bounded queue between the recognizer and the active view.

use ringbuf::traits::{Consumer, Observer, RingBuffer};
use ringbuf::HeapRb;
use std::fmt::{Debug, Display};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub mod recognizer;

const SET_NAME: &str = "set name";

/// A normalized command spoken by the player
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VoiceToken {
    Jump,
    Up,
    Down,
    Left,
    Right,
    Stop,
    Start,
    Menu,
    Leaderboard,
    SetName(String),
}

impl VoiceToken {
    /// Match a single recognized word against the vocabulary
    pub fn from_word(word: &str) -> Option<Self> {
        let token = match word {
            "jump" => Self::Jump,
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            "stop" => Self::Stop,
            "start" => Self::Start,
            "menu" => Self::Menu,
            "leaderboard" => Self::Leaderboard,
            _ => return None,
        };
        Some(token)
    }
}

impl Display for VoiceToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jump => write!(f, "jump"),
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Stop => write!(f, "stop"),
            Self::Start => write!(f, "start"),
            Self::Menu => write!(f, "menu"),
            Self::Leaderboard => write!(f, "leaderboard"),
            Self::SetName(name) => write!(f, "{SET_NAME}: {name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown voice token '{0}'")]
pub struct TokenParseError(pub String);

impl FromStr for VoiceToken {
    type Err = TokenParseError;

    /// Parses the wire form produced by [Display]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(name) = s.strip_prefix(SET_NAME).and_then(|r| r.strip_prefix(':')) {
            return Ok(Self::SetName(name.trim().to_string()));
        }
        Self::from_word(s).ok_or_else(|| TokenParseError(s.to_string()))
    }
}

/// Turn a recognized phrase into tokens.
///
/// `set name <X>` (optionally with a colon) yields a single `SetName` with the
/// rest of the phrase in its original casing. Otherwise every whole word of the
/// vocabulary yields a token, in phrase order.
pub fn parse_phrase(text: &str) -> Vec<VoiceToken> {
    // ASCII lowering keeps byte offsets valid for slicing `text`
    let lower = text.to_ascii_lowercase();
    let words = words(&lower);

    if let Some(idx) = words
        .windows(2)
        .position(|pair| pair[0].1 == "set" && pair[1].1 == "name")
    {
        let (start, word) = words[idx + 1];
        let name = text[start + word.len()..]
            .trim_start_matches(|c: char| c == ':' || c.is_whitespace())
            .trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());
        if !name.is_empty() {
            return vec![VoiceToken::SetName(name.to_string())];
        }
    }

    words
        .into_iter()
        .filter_map(|(_, word)| VoiceToken::from_word(word))
        .collect()
}

/// Alphanumeric runs of `text` with their byte offsets
fn words(text: &str) -> Vec<(usize, &str)> {
    let mut words = vec![];
    let mut start = None;

    for (i, c) in text.char_indices() {
        match (c.is_alphanumeric(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                words.push((s, &text[s..i]));
                start = None;
            }
            _ => {}
        }
    }

    if let Some(s) = start {
        words.push((s, &text[s..]));
    }

    words
}

type Queue = Arc<Mutex<HeapRb<VoiceToken>>>;

#[inline]
fn lock(queue: &Queue) -> MutexGuard<'_, HeapRb<VoiceToken>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Create a bounded voice queue.
///
/// When full, pushing discards the oldest waiting token so the views always
/// see the most recent commands.
pub fn channel(capacity: usize) -> (VoiceSender, VoiceReceiver) {
    let queue = Arc::new(Mutex::new(HeapRb::new(capacity.max(1))));
    (
        VoiceSender {
            queue: queue.clone(),
        },
        VoiceReceiver { queue },
    )
}

/// Producer half, held by the recognizer reader
#[derive(Clone)]
pub struct VoiceSender {
    queue: Queue,
}

impl Debug for VoiceSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceSender").finish_non_exhaustive()
    }
}

impl VoiceSender {
    /// Never blocks. Returns the token that was evicted to make room, if any.
    pub fn push(&self, token: VoiceToken) -> Option<VoiceToken> {
        let evicted = lock(&self.queue).push_overwrite(token);
        if let Some(ref old) = evicted {
            tracing::warn!(token = %old, "voice queue full, dropped oldest token");
        }
        evicted
    }
}

/// Consumer half, polled by the active view
pub struct VoiceReceiver {
    queue: Queue,
}

impl Debug for VoiceReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceReceiver")
            .field("waiting", &self.len())
            .finish()
    }
}

impl VoiceReceiver {
    /// Take the oldest waiting token without blocking
    pub fn try_take(&mut self) -> Option<VoiceToken> {
        let token = lock(&self.queue).try_pop();
        if let Some(ref token) = token {
            tracing::debug!(%token, "voice token taken");
        }
        token
    }

    pub fn len(&self) -> usize {
        lock(&self.queue).occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
