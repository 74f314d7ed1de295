use std::time::Duration;

/// Points per line for a 1-3 line clear.
const POINTS_PER_LINE: usize = 100;
/// Flat award for clearing 4 lines at once, replacing the per-line points.
const TETRIS_BONUS: usize = 500;
/// Score needed per level step.
const LEVEL_STEP: usize = 1000;

/// Drop interval at level 1, in milliseconds.
const INITIAL_DROP_MILLIS: f64 = 500.0;
/// Hard floor for the drop interval, in milliseconds.
const MIN_DROP_MILLIS: u64 = 100;
/// Per-level speed-up factor.
const SPEEDUP_PER_LEVEL: f64 = 1.15;

/// Game statistics: score, level, speed, and line-clear counters.
///
/// All derived values are deterministic functions of the clears recorded so
/// far:
///
/// - **Score**: 100/200/300 for singles/doubles/triples, flat 500 for a
///   4-line clear (the tetris bonus)
/// - **Level**: `score / 1000 + 1`
/// - **Drop interval**: `max(100 ms, trunc(500 ms / 1.15^(level-1)))`,
///   an exponential speed-up with a hard floor
///
/// # Example
///
/// ```
/// use gridfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 500);
/// assert_eq!(stats.level(), 1);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    /// Current score.
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Current level, starting at 1 and stepping up every 1000 points.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.score / LEVEL_STEP + 1
    }

    /// Total number of pieces locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Total lines cleared across the session.
    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Histogram of clears by size: `[0]` counts locks that cleared nothing,
    /// `[1]`..`[4]` count singles through tetrises.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Interval between automatic downward ticks at the current level.
    ///
    /// The quotient is truncated toward zero before the floor applies, so
    /// level 2 yields 434 ms rather than 435.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let millis = (INITIAL_DROP_MILLIS / SPEEDUP_PER_LEVEL.powi(self.level() as i32 - 1)) as u64;
        Duration::from_millis(millis.max(MIN_DROP_MILLIS))
    }

    /// Records a locked piece and the lines it cleared.
    ///
    /// A 4-line clear awards the flat tetris bonus; any other count awards
    /// 100 points per line. Counts above 4 can only arise from externally
    /// prepared boards and score per line.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        if cleared_lines < self.line_cleared_counter.len() {
            self.line_cleared_counter[cleared_lines] += 1;
        }
        self.score += if cleared_lines == 4 {
            TETRIS_BONUS
        } else {
            cleared_lines * POINTS_PER_LINE
        };
    }
}
