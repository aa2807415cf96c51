use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Pending -> InProgress
/// - Pending -> Success (first reveal clears the board)
/// - InProgress -> Dead
/// - InProgress -> Success
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Nothing revealed yet
    #[default]
    Pending,
    InProgress,
    /// A mine went off
    Dead,
    /// Every safe cell is revealed
    Success,
}

impl GameStatus {
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Dead | Self::Success)
    }

    /// Whether a host's elapsed-time counter should be ticking.
    pub const fn is_timer_running(self) -> bool {
        matches!(self, Self::InProgress)
    }
}

/// One game from first click to win or loss, owned by the host between gestures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    config: BoardConfig,
    level: Option<GameLevel>,
    board: Board,
    status: GameStatus,
    flag_count: CellCount,
    seed: u64,
}

impl Game {
    pub fn new(config: BoardConfig, seed: u64) -> Result<Self> {
        let board = Board::create(config, None, seed)?;
        Ok(Self {
            config,
            level: None,
            board,
            status: GameStatus::Pending,
            flag_count: 0,
            seed,
        })
    }

    pub fn from_level(level: GameLevel, seed: u64) -> Result<Self> {
        let mut game = Self::new(level.config(), seed)?;
        game.level = Some(level);
        Ok(game)
    }

    /// Starts a game on a prepared board, e.g. a fixed puzzle.
    ///
    /// A board with cells already revealed resumes as in progress, so its
    /// layout is never regenerated. `seed` is only used if the first reveal
    /// of an untouched board forces a regeneration.
    pub fn from_board(board: Board, seed: u64) -> Result<Self> {
        let (rows, columns) = board.size();
        let config = BoardConfig::new(columns, rows, board.mine_count())?;
        let flag_count = board.count_flags();
        let status = if board.iter().any(Cell::is_revealed) {
            GameStatus::InProgress
        } else {
            GameStatus::Pending
        };
        Ok(Self {
            config,
            level: None,
            board,
            status,
            flag_count,
            seed,
        })
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn level(&self) -> Option<GameLevel> {
        self.level
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines()
    }

    /// Mines minus placed flags; negative once the player over-flags.
    pub fn mines_left(&self) -> isize {
        (self.config.mines() as isize) - (self.flag_count as isize)
    }

    /// Primary click.
    ///
    /// The first reveal of a game never detonates: a mine under it is moved
    /// by regenerating the board with that cell kept clear, and the cell is
    /// then revealed. Later reveals of a mine lose the game.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        self.check_not_finished()?;

        let Some(&cell) = self.board.get(coords) else {
            return Ok(RevealOutcome::NoChange);
        };
        if cell.is_flagged() || cell.is_revealed() {
            return Ok(RevealOutcome::NoChange);
        }

        if cell.is_mine() {
            if self.status.is_pending() {
                self.regenerate_around(coords)?;
            } else {
                log::debug!("Detonated mine at {:?}", coords);
                self.board.mark_exploded(coords);
                self.board.reveal_all();
                self.end_game(false);
                return Ok(RevealOutcome::HitMine);
            }
        }

        let outcome = self.board.reveal_cell(coords);
        Ok(self.settle(outcome))
    }

    /// Chorded reveal around a revealed number; a misplaced flag loses the game.
    pub fn chord(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        self.check_not_finished()?;
        if self.status.is_pending() {
            return Ok(RevealOutcome::NoChange);
        }

        match self.board.reveal_neighborhood(coords) {
            RevealOutcome::HitMine => {
                self.end_game(false);
                Ok(RevealOutcome::HitMine)
            }
            outcome => Ok(self.settle(outcome)),
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.check_not_finished()?;

        let outcome = self.board.toggle_flag(coords);
        if outcome.has_update() {
            if self.board[coords].is_flagged() {
                self.flag_count += 1;
            } else {
                self.flag_count -= 1;
            }
        }
        Ok(outcome)
    }

    /// Discards the board and starts over with the same configuration.
    pub fn reset(&mut self) -> Result<()> {
        self.seed = next_seed(self.seed);
        self.board = Board::create(self.config, None, self.seed)?;
        self.status = GameStatus::Pending;
        self.flag_count = 0;
        log::debug!("Reset {:?} game with seed {}", self.level, self.seed);
        Ok(())
    }

    pub fn set_level(&mut self, level: GameLevel) -> Result<()> {
        self.config = level.config();
        self.level = Some(level);
        self.reset()
    }

    /// Rebuilds the board with `coords` kept mine-free, carrying placed flags over.
    fn regenerate_around(&mut self, coords: Coord2) -> Result<()> {
        self.seed = next_seed(self.seed);
        log::debug!(
            "First reveal at {:?} was a mine, regenerating with seed {}",
            coords,
            self.seed
        );

        let mut board = Board::create(self.config, Some(coords), self.seed)?;
        for flagged in self.board.iter().filter(|cell| cell.is_flagged()) {
            board.toggle_flag(flagged.coords());
        }
        self.board = board;
        Ok(())
    }

    /// Win rule: once only the mines are still hidden, reveal everything and finish.
    ///
    /// Runs after every reveal; hosts that load a prepared board can call it directly.
    pub fn check_win(&mut self) -> bool {
        if self.status.is_finished() {
            return matches!(self.status, GameStatus::Success);
        }

        if self.board.count_hidden() == self.board.mine_count() {
            self.board.reveal_all();
            self.end_game(true);
            true
        } else {
            false
        }
    }

    fn settle(&mut self, outcome: RevealOutcome) -> RevealOutcome {
        if !outcome.has_update() {
            return outcome;
        }

        if self.check_win() {
            RevealOutcome::Won
        } else {
            self.mark_started();
            outcome
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.status, GameStatus::Pending) {
            log::debug!("Game started");
            self.status = GameStatus::InProgress;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.status.is_finished() {
            return;
        }

        self.status = if won {
            GameStatus::Success
        } else {
            GameStatus::Dead
        };
        log::debug!("Game ended: {:?}", self.status);
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.status.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

/// Draws the seed for the next layout from the current one.
fn next_seed(seed: u64) -> u64 {
    use rand::prelude::*;

    SmallRng::seed_from_u64(seed).random()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(size: Coord2, mines: &[Coord2]) -> Game {
        let layout = MineLayout::from_mine_coords(size, mines).unwrap();
        Game::from_board(Board::from_layout(&layout), 42).unwrap()
    }

    #[test]
    fn first_reveal_on_mine_is_made_safe() {
        let mines = [
            (4, 4),
            (0, 0),
            (0, 8),
            (8, 0),
            (8, 8),
            (2, 6),
            (6, 2),
            (1, 3),
            (7, 5),
            (3, 7),
        ];
        let mut game = game((9, 9), &mines);
        assert!(game.board()[(4, 4)].is_mine());

        let outcome = game.reveal((4, 4)).unwrap();

        assert!(outcome.has_update());
        assert_ne!(outcome, RevealOutcome::HitMine);
        assert!(!game.board()[(4, 4)].is_mine());
        assert!(game.board()[(4, 4)].is_revealed());
        assert_eq!(game.board().layout().mine_count(), 10);
        assert!(matches!(
            game.status(),
            GameStatus::InProgress | GameStatus::Success
        ));
    }

    #[test]
    fn resumed_board_keeps_layout_on_mine_reveal() {
        let layout = MineLayout::from_mine_coords((4, 4), &[(0, 0), (3, 3)]).unwrap();
        let mut board = Board::from_layout(&layout);
        board.reveal_cell((1, 1));

        let mut game = Game::from_board(board, 42).unwrap();
        assert_eq!(game.status(), GameStatus::InProgress);

        assert_eq!(game.reveal((3, 3)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(game.status(), GameStatus::Dead);
        assert!(game.board()[(0, 0)].is_mine());
        assert!(game.board()[(3, 3)].is_exploded());
        assert_eq!(game.board().layout(), layout);
    }

    #[test]
    fn flags_survive_first_move_regeneration() {
        let mut game = game((4, 4), &[(0, 0), (3, 3)]);
        game.toggle_flag((0, 3)).unwrap();

        game.reveal((0, 0)).unwrap();

        assert!(game.board()[(0, 3)].is_flagged());
        assert!(game.board()[(0, 0)].is_revealed());
        assert_eq!(game.mines_left(), 1);
    }

    #[test]
    fn later_mine_reveal_loses() {
        let mut game = game((3, 3), &[(0, 0), (2, 2)]);
        assert_eq!(game.reveal((0, 2)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(game.status(), GameStatus::InProgress);

        assert_eq!(game.reveal((0, 0)).unwrap(), RevealOutcome::HitMine);

        assert_eq!(game.status(), GameStatus::Dead);
        assert!(game.board()[(0, 0)].is_exploded());
        assert!(!game.board()[(2, 2)].is_exploded());
        assert_eq!(game.board().count_hidden(), 0);
        assert_eq!(game.reveal((1, 1)), Err(GameError::AlreadyEnded));
        assert_eq!(game.toggle_flag((1, 1)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn last_safe_reveal_wins() {
        let mut game = game((2, 2), &[(0, 0)]);
        game.reveal((0, 1)).unwrap();
        game.reveal((1, 0)).unwrap();
        assert_eq!(game.board().count_hidden(), 2);

        assert_eq!(game.reveal((1, 1)).unwrap(), RevealOutcome::Won);

        assert_eq!(game.status(), GameStatus::Success);
        assert_eq!(game.board().count_hidden(), 0);
        assert!(!game.board()[(0, 0)].is_exploded());
    }

    #[test]
    fn opening_flood_can_win_immediately() {
        let mut game = game((3, 3), &[(2, 2)]);

        assert_eq!(game.reveal((0, 0)).unwrap(), RevealOutcome::Won);
        assert_eq!(game.status(), GameStatus::Success);
    }

    #[test]
    fn flag_blocks_reveal_until_removed() {
        let mut game = game((3, 3), &[(0, 0)]);

        assert_eq!(game.toggle_flag((1, 1)).unwrap(), MarkOutcome::Changed);
        assert_eq!(game.reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert!(!game.board()[(1, 1)].is_revealed());
        assert_eq!(game.status(), GameStatus::Pending);

        assert_eq!(game.toggle_flag((1, 1)).unwrap(), MarkOutcome::Changed);
        assert_eq!(game.reveal((1, 1)).unwrap(), RevealOutcome::Revealed);
        assert!(game.board()[(1, 1)].is_revealed());
    }

    #[test]
    fn chord_with_wrong_flag_loses() {
        let mut game = game((3, 3), &[(0, 0)]);
        game.reveal((1, 1)).unwrap();
        game.toggle_flag((0, 1)).unwrap();

        assert_eq!(game.chord((1, 1)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(game.status(), GameStatus::Dead);
    }

    #[test]
    fn chord_can_win() {
        let mut game = game((3, 3), &[(0, 1), (2, 1)]);
        game.reveal((1, 1)).unwrap();
        game.toggle_flag((0, 1)).unwrap();
        game.toggle_flag((2, 1)).unwrap();

        assert_eq!(game.chord((1, 1)).unwrap(), RevealOutcome::Won);
        assert_eq!(game.status(), GameStatus::Success);
    }

    #[test]
    fn chord_before_first_reveal_does_nothing() {
        let mut game = game((3, 3), &[(0, 0)]);

        assert_eq!(game.chord((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(game.status(), GameStatus::Pending);
    }

    #[test]
    fn out_of_bounds_reveal_is_ignored() {
        let mut game = game((3, 3), &[(0, 0)]);

        assert_eq!(game.reveal((3, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(game.chord((0, 9)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(game.toggle_flag((9, 9)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(game.status(), GameStatus::Pending);
    }

    #[test]
    fn mines_left_tracks_flags() {
        let mut game = Game::from_level(GameLevel::Easy, 5).unwrap();
        assert_eq!(game.mines_left(), 10);

        for column in 0..9 {
            game.toggle_flag((0, column)).unwrap();
            game.toggle_flag((1, column)).unwrap();
        }
        assert_eq!(game.mines_left(), -8);

        game.toggle_flag((0, 0)).unwrap();
        assert_eq!(game.mines_left(), -7);
    }

    #[test]
    fn reset_and_level_change_start_over() {
        let mut game = Game::from_level(GameLevel::Easy, 1).unwrap();
        game.reveal((4, 4)).unwrap();
        game.toggle_flag((0, 0)).ok();

        game.set_level(GameLevel::Hard).unwrap();

        assert_eq!(game.status(), GameStatus::Pending);
        assert_eq!(game.level(), Some(GameLevel::Hard));
        assert_eq!(game.board().size(), (30, 16));
        assert_eq!(game.board().count_hidden(), 480);
        assert_eq!(game.mines_left(), 99);

        game.reset().unwrap();
        assert_eq!(game.board().mine_count(), 99);
        assert_eq!(game.status(), GameStatus::Pending);
    }

    #[test]
    fn status_helpers() {
        assert!(!GameStatus::Pending.is_timer_running());
        assert!(GameStatus::InProgress.is_timer_running());
        assert!(GameStatus::Dead.is_finished());
        assert!(GameStatus::Success.is_finished());
        assert!(!GameStatus::InProgress.is_finished());
    }

    #[test]
    fn regeneration_seeds_differ() {
        assert_ne!(next_seed(0), next_seed(1));
        assert_ne!(next_seed(next_seed(7)), next_seed(7));
        assert_eq!(next_seed(7), next_seed(7));
    }
}
