use mineboard_core::GameStatus;
use std::time::Duration;
use web_time::Instant;

/// Elapsed-time counter driven by game status.
///
/// Reads zero while pending, runs while in progress and freezes once the game is decided.
#[derive(Debug, Default)]
pub struct Stopwatch {
    started_at: Option<Instant>,
    frozen: Option<Duration>,
}

impl Stopwatch {
    pub fn sync(&mut self, status: GameStatus) {
        self.sync_at(status, Instant::now());
    }

    fn sync_at(&mut self, status: GameStatus, now: Instant) {
        match status {
            GameStatus::Pending => {
                self.started_at = None;
                self.frozen = None;
            }
            GameStatus::InProgress => {
                self.started_at.get_or_insert(now);
            }
            GameStatus::Dead | GameStatus::Success => {
                if self.frozen.is_none() {
                    let started_at = *self.started_at.get_or_insert(now);
                    self.frozen = Some(now.duration_since(started_at));
                }
            }
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_at(Instant::now()).as_secs()
    }

    fn elapsed_at(&self, now: Instant) -> Duration {
        match (self.frozen, self.started_at) {
            (Some(frozen), _) => frozen,
            (None, Some(started_at)) => now.duration_since(started_at),
            (None, None) => Duration::ZERO,
        }
    }
}
