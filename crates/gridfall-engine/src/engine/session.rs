use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    PieceCollisionError,
    core::{
        board::Board,
        piece::Piece,
    },
};

use super::{
    piece_source::{PieceSeed, PieceSource, Tint},
    stats::GameStats,
};

/// Lifecycle state of a session.
///
/// `Paused` suspends only the tick-driven automatic drop. `GameOver` is
/// terminal until [`GameSession::reset`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// Observable side effects of session commands.
///
/// The session queues events as they occur; collaborators drain them after
/// each call with [`GameSession::drain_events`] and react (redraw, re-arm
/// the drop timer, show the game-over screen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum GameEvent {
    /// The active piece was merged into the board.
    Locked,
    /// A lock cleared this many lines.
    LinesCleared(usize),
    /// The score crossed a level boundary. The scheduler should re-arm its
    /// drop timer with the new interval.
    LevelUp {
        level: usize,
        drop_interval: Duration,
    },
    /// A new cosmetic display tint was selected (fires with every level up).
    TintChanged(Tint),
    /// A freshly spawned piece did not fit; the session is now inert until
    /// reset.
    GameOver { final_score: usize },
}

/// The game-state machine.
///
/// Owns the board, the active and next pieces, the piece source, and the
/// statistics, and orchestrates spawn → move/rotate → lock → clear →
/// respawn. All state mutation happens through the command methods below;
/// everything else is a read-only view.
///
/// The session is single-threaded and cooperative: an external scheduler
/// calls [`tick`](Self::tick) at the cadence reported by
/// [`drop_interval`](Self::drop_interval), and input collaborators call the
/// movement commands between ticks. Rejected moves and rotations leave the
/// state untouched and signal nothing; a blocked *downward* step is the one
/// exception and locks the piece.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    current: Piece,
    next: Piece,
    source: PieceSource,
    stats: GameStats,
    tint: Tint,
    state: SessionState,
    events: Vec<GameEvent>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates a session with a random piece sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(PieceSource::new())
    }

    /// Creates a deterministic session for the given seed.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_source(PieceSource::with_seed(seed))
    }

    fn with_source(mut source: PieceSource) -> Self {
        let current = source.next_piece();
        let next = source.next_piece();
        Self {
            board: Board::EMPTY,
            current,
            next,
            source,
            stats: GameStats::new(),
            tint: Tint::INITIAL,
            state: SessionState::Playing,
            events: Vec::new(),
        }
    }

    /// The settled playfield, for drawing.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The active falling piece.
    #[must_use]
    pub fn current_piece(&self) -> &Piece {
        &self.current
    }

    /// The upcoming piece, for the preview box.
    #[must_use]
    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    /// Cadence the external scheduler should drive [`tick`](Self::tick) at.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        self.stats.drop_interval()
    }

    /// Current cosmetic display tint.
    #[must_use]
    pub fn tint(&self) -> Tint {
        self.tint
    }

    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Drains the queued events, oldest first.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Shifts the active piece one column left; silently rejected when
    /// blocked.
    pub fn move_left(&mut self) {
        if self.state.is_game_over() {
            return;
        }
        let _ = self.try_set_current(self.current.translated(0, -1));
    }

    /// Shifts the active piece one column right; silently rejected when
    /// blocked.
    pub fn move_right(&mut self) {
        if self.state.is_game_over() {
            return;
        }
        let _ = self.try_set_current(self.current.translated(0, 1));
    }

    /// Drops the active piece one row. A blocked downward step is not a
    /// no-op: it locks the piece, clears lines, and spawns the next piece.
    pub fn soft_drop(&mut self) {
        if self.state.is_game_over() {
            return;
        }
        self.drop_step();
    }

    /// Rotates the active piece 90° clockwise in place; silently rejected
    /// if the rotated mask does not fit (no wall kick).
    pub fn rotate_cw(&mut self) {
        if self.state.is_game_over() {
            return;
        }
        let _ = self.try_set_current(self.current.rotated_cw());
    }

    /// Rotates the active piece 90° counter-clockwise in place; silently
    /// rejected if the rotated mask does not fit.
    pub fn rotate_ccw(&mut self) {
        if self.state.is_game_over() {
            return;
        }
        let _ = self.try_set_current(self.current.rotated_ccw());
    }

    /// Suspends or resumes the automatic drop. Has no effect once the
    /// session is over.
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    /// One step of the autonomous drop. Suspended while paused and after
    /// game over.
    pub fn tick(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        self.drop_step();
    }

    /// Returns the session to a freshly-initialized playing state: empty
    /// board, zeroed statistics, initial tint, and a newly drawn
    /// current/next pair. Safe to call from any state.
    ///
    /// The piece source keeps its stream position, so a seeded session stays
    /// one reproducible sequence across resets.
    pub fn reset(&mut self) {
        self.board = Board::EMPTY;
        self.stats = GameStats::new();
        self.tint = Tint::INITIAL;
        self.state = SessionState::Playing;
        self.events.clear();
        self.current = self.source.next_piece();
        self.next = self.source.next_piece();
    }

    fn try_set_current(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if !self.board.fits_piece(&piece) {
            return Err(PieceCollisionError);
        }
        self.current = piece;
        Ok(())
    }

    fn drop_step(&mut self) {
        if self.try_set_current(self.current.translated(1, 0)).is_err() {
            self.lock_current();
        }
    }

    fn lock_current(&mut self) {
        self.board.fill_piece(&self.current);
        self.events.push(GameEvent::Locked);

        let cleared = self.board.clear_full_rows();
        let level_before = self.stats.level();
        self.stats.complete_piece_drop(cleared);

        if cleared > 0 {
            self.events.push(GameEvent::LinesCleared(cleared));
            let level = self.stats.level();
            if level > level_before {
                self.tint = self.source.next_tint();
                self.events.push(GameEvent::LevelUp {
                    level,
                    drop_interval: self.stats.drop_interval(),
                });
                self.events.push(GameEvent::TintChanged(self.tint));
            }
        }

        self.spawn_next();
    }

    fn spawn_next(&mut self) {
        self.current = std::mem::replace(&mut self.next, self.source.next_piece());
        if !self.board.fits_piece(&self.current) {
            self.state = SessionState::GameOver;
            self.events.push(GameEvent::GameOver {
                final_score: self.stats.score(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{COLS, ROWS, board::Cell, piece::PieceKind};

    fn session() -> GameSession {
        GameSession::with_seed(PieceSeed(1234))
    }

    fn fill_row_except(session: &mut GameSession, row: usize, gap: Option<usize>) {
        for col in 0..COLS {
            if gap != Some(col) {
                session.board.fill_cell(row, col, Cell::Piece(PieceKind::O));
            }
        }
    }

    /// A vertical I piece whose column of four cells sits at `col`.
    fn upright_i_at(col: i16) -> Piece {
        let piece = Piece::spawn(PieceKind::I).rotated_cw();
        piece.translated(0, col - piece.col())
    }

    fn drop_until_lock(session: &mut GameSession) {
        let before = session.stats().completed_pieces();
        while session.stats().completed_pieces() == before {
            session.soft_drop();
            assert!(!session.is_game_over() || session.stats().completed_pieces() > before);
        }
    }

    #[test]
    fn fresh_session_initial_state() {
        let mut s = session();
        assert_eq!(s.score(), 0);
        assert_eq!(s.level(), 1);
        assert_eq!(s.drop_interval(), Duration::from_millis(500));
        assert_eq!(s.tint(), Tint::INITIAL);
        assert!(s.session_state().is_playing());
        assert_eq!(s.board().occupied_cells(), 0);
        assert_eq!(s.current_piece().row(), 0);
        assert_eq!(s.drain_events().count(), 0);
    }

    #[test]
    fn same_seed_spawns_the_same_pieces() {
        let a = GameSession::with_seed(PieceSeed(99));
        let b = GameSession::with_seed(PieceSeed(99));
        assert_eq!(a.current_piece().kind(), b.current_piece().kind());
        assert_eq!(a.next_piece().kind(), b.next_piece().kind());
    }

    #[test]
    fn horizontal_block_is_rejected_without_locking() {
        let mut s = session();
        s.current = Piece::spawn(PieceKind::O).translated(0, -4); // against the left wall
        let before = s.current;

        s.move_left();

        assert_eq!(s.current, before, "piece stays in place");
        assert_eq!(s.board().occupied_cells(), 0, "no lock happened");
        assert_eq!(s.drain_events().count(), 0);
    }

    #[test]
    fn blocked_downward_step_locks_the_piece() {
        let mut s = session();
        s.current = Piece::spawn(PieceKind::O);

        // Fall freely to the floor, then one more step to lock.
        for _ in 0..18 {
            s.soft_drop();
        }
        assert_eq!(s.board().occupied_cells(), 0);
        s.soft_drop();

        assert_eq!(s.board().occupied_cells(), 4);
        assert_eq!(s.stats().completed_pieces(), 1);
        let events: Vec<_> = s.drain_events().collect();
        assert_eq!(events, vec![GameEvent::Locked]);
    }

    #[test]
    fn tick_advances_the_piece_like_a_soft_drop() {
        let mut s = session();
        let row = s.current_piece().row();
        s.tick();
        assert_eq!(s.current_piece().row(), row + 1);
    }

    #[test]
    fn rotation_commits_in_place_and_rejects_on_collision() {
        let mut s = session();
        s.current = upright_i_at(0);

        // At the left wall the horizontal mask would stick out; rotating in
        // place anchors at the same column, which fits on an empty board.
        let anchor = (s.current.row(), s.current.col());
        s.rotate_cw();
        assert_eq!((s.current.row(), s.current.col()), anchor);
        assert_eq!(s.current.shape().height(), 1);

        // Against a settled column the rotation collides and is rejected.
        let mut s = session();
        s.current = upright_i_at(1).translated(8, 0);
        for row in 0..ROWS {
            s.board.fill_cell(row, 2, Cell::Piece(PieceKind::T));
        }
        let before = s.current;
        s.rotate_cw();
        assert_eq!(s.current, before, "no wall kick, rejected outright");
    }

    #[test]
    fn filling_the_gap_clears_a_single_line() {
        let mut s = session();
        fill_row_except(&mut s, ROWS - 1, Some(6));
        s.current = upright_i_at(6);

        drop_until_lock(&mut s);

        assert_eq!(s.score(), 100);
        assert_eq!(s.level(), 1);
        // The cleared filler is gone; the I's three surviving cells shifted
        // down one row into the bottom of column 6.
        assert_eq!(s.board().occupied_cells(), 3);
        assert_eq!(s.board().cell(ROWS - 1, 6), Cell::Piece(PieceKind::I));
        assert_eq!(s.board().cell(ROWS - 3, 6), Cell::Piece(PieceKind::I));
        assert!(s.board().cell(ROWS - 1, 0).is_empty());
        assert!(s.board().rows().next().unwrap().iter().all(|c| c.is_empty()));

        let events: Vec<_> = s.drain_events().collect();
        assert_eq!(events, vec![GameEvent::Locked, GameEvent::LinesCleared(1)]);
    }

    #[test]
    fn four_line_clear_awards_the_tetris_bonus() {
        let mut s = session();
        for row in ROWS - 4..ROWS {
            fill_row_except(&mut s, row, Some(0));
        }
        s.current = upright_i_at(0);

        drop_until_lock(&mut s);

        assert_eq!(s.score(), 500, "flat 500, not 400");
        assert_eq!(s.board().occupied_cells(), 0);
        let events: Vec<_> = s.drain_events().collect();
        assert_eq!(events, vec![GameEvent::Locked, GameEvent::LinesCleared(4)]);
    }

    #[test]
    fn crossing_a_level_boundary_fires_level_up_and_tint_change_once() {
        let mut s = session();

        // First lock: nine prefilled full rows clear at once for 900 points.
        for row in ROWS - 9..ROWS {
            fill_row_except(&mut s, row, None);
        }
        drop_until_lock(&mut s);
        assert_eq!(s.score(), 900);
        assert_eq!(s.level(), 1);
        let events: Vec<_> = s.drain_events().collect();
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelUp { .. })));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::TintChanged(_))));

        // Second lock: a double pushes 900 -> 1100, crossing 1000 without
        // landing on it.
        for row in ROWS - 2..ROWS {
            fill_row_except(&mut s, row, None);
        }
        let tint_before = s.tint();
        drop_until_lock(&mut s);

        assert_eq!(s.score(), 1100);
        assert_eq!(s.level(), 2);
        assert_eq!(s.drop_interval(), Duration::from_millis(434));

        let events: Vec<_> = s.drain_events().collect();
        assert!(events.contains(&GameEvent::LevelUp {
            level: 2,
            drop_interval: Duration::from_millis(434),
        }));
        let tints: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::TintChanged(_)))
            .collect();
        assert_eq!(tints.len(), 1, "exactly one tint change per crossing");
        assert_eq!(tints[0], &GameEvent::TintChanged(s.tint()));
        // Sampled from the seeded stream; almost surely differs from red.
        assert_ne!(s.tint(), tint_before);
    }

    #[test]
    fn blocked_spawn_ends_the_session() {
        let mut s = session();
        // Occupy the spawn rows (bar one cell, so nothing clears).
        fill_row_except(&mut s, 0, Some(9));
        fill_row_except(&mut s, 1, Some(9));
        s.current = Piece::spawn(PieceKind::O);

        s.soft_drop(); // blocked immediately -> lock -> doomed respawn

        assert!(s.is_game_over());
        let events: Vec<_> = s.drain_events().collect();
        assert_eq!(
            events,
            vec![GameEvent::Locked, GameEvent::GameOver { final_score: 0 }]
        );
    }

    #[test]
    fn commands_are_no_ops_after_game_over() {
        let mut s = session();
        fill_row_except(&mut s, 0, Some(9));
        fill_row_except(&mut s, 1, Some(9));
        s.current = Piece::spawn(PieceKind::O);
        s.soft_drop();
        assert!(s.is_game_over());
        s.drain_events();

        let piece = s.current;
        let board = s.board.clone();
        s.move_left();
        s.move_right();
        s.soft_drop();
        s.rotate_cw();
        s.rotate_ccw();
        s.tick();
        s.toggle_pause();

        assert!(s.is_game_over(), "pause cannot leave game over");
        assert_eq!(s.current, piece);
        assert_eq!(s.board, board);
        assert_eq!(s.drain_events().count(), 0);
    }

    #[test]
    fn pause_suspends_only_the_automatic_drop() {
        let mut s = session();
        s.toggle_pause();
        assert!(s.is_paused());

        let row = s.current_piece().row();
        s.tick();
        assert_eq!(s.current_piece().row(), row, "tick is suspended");

        s.toggle_pause();
        assert!(!s.is_paused());
        s.tick();
        assert_eq!(s.current_piece().row(), row + 1);
    }

    #[test]
    fn reset_restores_a_fresh_session_from_any_state() {
        // From game over.
        let mut s = session();
        fill_row_except(&mut s, 0, Some(9));
        fill_row_except(&mut s, 1, Some(9));
        s.current = Piece::spawn(PieceKind::O);
        s.soft_drop();
        assert!(s.is_game_over());

        s.reset();
        assert!(s.session_state().is_playing());
        assert_eq!(s.score(), 0);
        assert_eq!(s.level(), 1);
        assert_eq!(s.drop_interval(), Duration::from_millis(500));
        assert_eq!(s.tint(), Tint::INITIAL);
        assert_eq!(s.board().occupied_cells(), 0);
        assert_eq!(s.current_piece().row(), 0);
        assert_eq!(s.drain_events().count(), 0);

        // From mid-game, including paused.
        let mut s = session();
        s.soft_drop();
        s.move_left();
        s.toggle_pause();
        s.reset();
        assert!(s.session_state().is_playing());
        assert_eq!(s.current_piece().row(), 0);
    }

    #[test]
    fn locking_adds_exactly_the_piece_cell_count() {
        let mut s = session();
        s.current = Piece::spawn(PieceKind::T);
        let before = s.board().occupied_cells();

        drop_until_lock(&mut s);

        // Nothing cleared, so the board grew by the piece's four cells.
        assert_eq!(s.board().occupied_cells(), before + 4);
    }

    #[test]
    fn events_drain_once() {
        let mut s = session();
        s.current = Piece::spawn(PieceKind::O).translated(17, 0);
        s.soft_drop();
        s.soft_drop();
        assert!(s.drain_events().count() > 0);
        assert_eq!(s.drain_events().count(), 0);
    }

    #[test]
    fn game_event_serde_round_trip() {
        let event = GameEvent::LevelUp {
            level: 3,
            drop_interval: Duration::from_millis(378),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
