//! A small voice controlled platformer.
//!
//! The game moves through a fixed set of [view::View]s. Keyboard input and
//! phrases from an external speech recognizer drive the same actions, and
//! finished runs land on a persisted top ten [leaderboard].

pub mod audio;
pub mod config;
pub mod game;
pub mod geometry;
pub mod input;
pub mod leaderboard;
pub mod level;
pub mod physics;
pub mod player;
pub mod session;
pub mod view;
pub mod voice;
