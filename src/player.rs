use crate::config::TOTAL_LIFE_COUNT;
use crate::leaderboard::display_name;

/// The person playing, kept for the whole session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub score: u64,
    pub lives: u32,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
            lives: TOTAL_LIFE_COUNT,
        }
    }

    /// Reset the score and lives for a fresh run, keeping the name
    pub fn start_run(&mut self) {
        self.score = 0;
        self.lives = TOTAL_LIFE_COUNT;
    }

    /// The name as shown on screen
    pub fn display_name(&self) -> &str {
        display_name(&self.name)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_run_keeps_name() {
        let mut player = Player::new("Ada");
        player.score = 420;
        player.lives = 0;

        player.start_run();

        assert_eq!(player, Player::new("Ada"));
    }

    #[test]
    fn unnamed_player_is_anonymous() {
        assert_eq!(Player::default().display_name(), "Anonymous");
    }
}
