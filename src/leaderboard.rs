use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::fs;
use std::io;
use std::path::PathBuf;

/// How many entries are kept on the board
pub const LEADERBOARD_SIZE: usize = 10;

/// Rendered in place of blank player names
pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("failed to access leaderboard file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("leaderboard file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
}

/// Persisted top scores, always sorted descending by score.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    path: PathBuf,
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// An empty board that will be saved to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    /// Read the board stored at `path`. A missing file is an empty board.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, LeaderboardError> {
        let path = path.into();

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no leaderboard yet");
                return Ok(Self::new(path));
            }
            Err(source) => return Err(LeaderboardError::Io { path, source }),
        };

        let entries: Vec<LeaderboardEntry> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(source) => return Err(LeaderboardError::Corrupt { path, source }),
        };

        let mut board = Self { path, entries };
        board.rank();
        Ok(board)
    }

    /// Insert a score, keeping only the best [LEADERBOARD_SIZE] entries.
    ///
    /// Equal scores keep their insertion order, so an older entry outranks a
    /// newer one with the same score.
    pub fn add_score(&mut self, name: impl Into<String>, score: u64) {
        self.entries.push(LeaderboardEntry {
            name: name.into(),
            score,
        });
        self.rank();
    }

    /// Overwrite the persisted file with the current ranking
    pub fn save(&self) -> Result<(), LeaderboardError> {
        let io_err = |source| LeaderboardError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            LeaderboardError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        fs::write(&self.path, json).map_err(io_err)?;

        tracing::info!(
            path = %self.path.display(),
            entries = self.entries.len(),
            "leaderboard saved"
        );

        Ok(())
    }

    /// The ranked listing shown on the leaderboard screens
    pub fn render_text(&self) -> String {
        let mut text = String::new();

        for (i, entry) in self.entries.iter().enumerate() {
            let _ = write!(
                text,
                "{:>2}....{}....{}\n\n",
                i + 1,
                entry.score,
                display_name(&entry.name)
            );
        }

        text
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn rank(&mut self) {
        // Stable, so ties keep insertion order
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(LEADERBOARD_SIZE);
    }
}

/// Trimmed name, or [ANONYMOUS] if nothing is left
pub fn display_name(name: &str) -> &str {
    let name = name.trim();
    if name.is_empty() {
        ANONYMOUS
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty_board() {
        let tmp = TempDir::new().unwrap();
        let board = Leaderboard::load(tmp.path().join("nope.json")).unwrap();
        assert!(board.is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("board.json");
        fs::write(&path, "not json").unwrap();

        let err = Leaderboard::load(&path).unwrap_err();
        assert!(matches!(err, LeaderboardError::Corrupt { .. }));
    }

    #[test]
    fn keeps_best_ten_descending() {
        let mut board = Leaderboard::new("unused.json");
        for score in [5, 80, 12, 3, 99, 41, 41, 7, 60, 1, 33, 18] {
            board.add_score(format!("p{score}"), score);
        }

        let scores: Vec<u64> = board.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![99, 80, 60, 41, 41, 33, 18, 12, 7, 5]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut board = Leaderboard::new("unused.json");
        board.add_score("first", 100);
        board.add_score("second", 100);
        board.add_score("third", 200);

        let names: Vec<&str> = board.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["third", "first", "second"]);
    }

    #[test]
    fn low_score_on_full_board_is_dropped() {
        let mut board = Leaderboard::new("unused.json");
        for i in 0..LEADERBOARD_SIZE as u64 {
            board.add_score("regular", 100 + i);
        }
        board.add_score("latecomer", 1);

        assert_eq!(board.entries().len(), LEADERBOARD_SIZE);
        assert!(board.entries().iter().all(|e| e.name != "latecomer"));
    }

    #[test]
    fn blank_names_render_anonymous() {
        let mut board = Leaderboard::new("unused.json");
        board.add_score("   ", 300);
        board.add_score(" Ada ", 200);

        assert_eq!(
            board.render_text(),
            " 1....300....Anonymous\n\n 2....200....Ada\n\n"
        );
    }

    #[test]
    fn save_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("board.json");

        let mut board = Leaderboard::new(&path);
        board.add_score("Ada", 10);
        board.save().unwrap();

        let loaded = Leaderboard::load(&path).unwrap();
        assert_eq!(loaded.entries(), board.entries());
    }

    #[test]
    fn load_reranks_unsorted_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("board.json");
        fs::write(
            &path,
            r#"[{"name":"low","score":1},{"name":"high","score":9}]"#,
        )
        .unwrap();

        let board = Leaderboard::load(&path).unwrap();
        assert_eq!(board.entries()[0].name, "high");
    }
}

#[cfg(test)]
mod leaderboard_proptests {
    use super::{Leaderboard, LEADERBOARD_SIZE};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ranking_is_sorted_and_bounded(
            scores in proptest::collection::vec((".{0,8}", 0u64..10_000), 0..40)
        ) {
            let mut board = Leaderboard::new("unused.json");
            for (name, score) in scores {
                board.add_score(name, score);
                let entries = board.entries();
                prop_assert!(entries.len() <= LEADERBOARD_SIZE);
                prop_assert!(entries.windows(2).all(|w| w[0].score >= w[1].score));
            }
        }
    }
}
