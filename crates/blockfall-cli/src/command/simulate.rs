use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use blockfall_engine::{
    CellView, Game, GameConfig, GameEvent, GameStats, PieceKind, PieceSeed, StatusMessage,
};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::util::{self, Output};

const FPS_RANGE: std::ops::RangeInclusive<f64> = 0.01..=1000.0;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Piece seed as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Board width in cells, overriding the config file
    #[arg(long)]
    cols: Option<usize>,
    /// Visible board height in cells, overriding the config file
    #[arg(long)]
    rows: Option<usize>,
    /// Number of pieces to drop
    #[arg(long, default_value_t = 100)]
    pieces: usize,
    /// How each piece reaches the stack
    #[arg(long, value_enum, default_value = "slam")]
    drop: DropMode,
    /// Simulated frames per second for gravity drops
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
    /// Game config JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print the final board to stderr
    #[arg(long)]
    show_board: bool,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
enum DropMode {
    /// Hard drop every piece with `slam_down`
    #[default]
    Slam,
    /// Let gravity bring every piece down on a simulated clock
    Gravity,
}

#[derive(Debug, Clone, Serialize)]
struct SimulationSummary {
    seed: PieceSeed,
    drop: DropMode,
    config: GameConfig,
    pieces_requested: usize,
    game_over: bool,
    lock_rejections: usize,
    simulated_secs: f64,
    last_message: Option<&'static str>,
    stats: GameStats,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let config = load_config(arg)?;
    anyhow::ensure!(
        FPS_RANGE.contains(&arg.fps),
        "--fps must be between {} and {}, got {}",
        FPS_RANGE.start(),
        FPS_RANGE.end(),
        arg.fps
    );
    if arg.drop == DropMode::Gravity {
        anyhow::ensure!(
            config.fall_speed > 0.0,
            "gravity drops need a positive fall speed"
        );
    }

    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    eprintln!("Simulating {} pieces with seed {seed}", arg.pieces);

    let mut game = Game::with_seed(config.clone(), seed).context("Failed to start game")?;
    let mut input_rng = Pcg32::seed_from_u64(fold_seed(seed));
    let mut clock = SimClock::new(arg.fps, &config);
    let mut lock_rejections = 0;

    for _ in 0..arg.pieces {
        if game.is_game_over() {
            break;
        }
        place_randomly(&mut game, &mut input_rng)?;
        match arg.drop {
            DropMode::Slam => game.slam_down(),
            DropMode::Gravity => clock.drop_by_gravity(&mut game)?,
        }
        for event in game.take_events() {
            match event {
                GameEvent::LockRejected { kind, validity } => {
                    eprintln!("Lock rejected for {kind:?} piece ({validity:?}); piece discarded");
                    lock_rejections += 1;
                }
                GameEvent::GameOver => {
                    eprintln!(
                        "Game over after {} locked pieces",
                        game.stats().locked_pieces()
                    );
                }
                GameEvent::PieceLocked { .. } | GameEvent::Reset => {}
            }
        }
    }

    if arg.show_board {
        print_board(&game);
    }

    let summary = SimulationSummary {
        seed,
        drop: arg.drop,
        config,
        pieces_requested: arg.pieces,
        game_over: game.is_game_over(),
        lock_rejections,
        simulated_secs: game.now().as_secs_f64(),
        last_message: game.message().map(StatusMessage::text),
        stats: game.stats().clone(),
    };
    Output::save_json(&summary, arg.output.as_deref())?;
    Ok(())
}

fn load_config(arg: &SimulateArg) -> anyhow::Result<GameConfig> {
    let mut config = match &arg.config {
        Some(path) => util::read_json_file("game config", path)?,
        None => GameConfig::default(),
    };
    if let Some(cols) = arg.cols {
        config.cols = cols;
    }
    if let Some(rows) = arg.rows {
        config.visible_rows = rows;
    }
    config.validate().context("Invalid game config")?;
    Ok(config)
}

/// Derives the input stream from the piece seed so a run replays exactly.
#[expect(clippy::cast_possible_truncation)]
fn fold_seed(seed: PieceSeed) -> u64 {
    let value = u128::from_le_bytes(seed.to_bytes());
    (value as u64) ^ ((value >> 64) as u64).rotate_left(32)
}

/// Rotates the fresh piece a random number of times and slides it toward a
/// random column. Blocked input is ignored, as a player's would be.
fn place_randomly<R>(game: &mut Game, rng: &mut R) -> anyhow::Result<()>
where
    R: Rng,
{
    let rotations = rng.random_range(0..4);
    for _ in 0..rotations {
        game.rotate_cw();
    }

    let half = i32::try_from(game.board().cols() / 2).context("Board too wide")?;
    let shift = rng.random_range(-half..=half);
    for _ in 0..shift.unsigned_abs() {
        let moved = if shift < 0 {
            game.move_left()
        } else {
            game.move_right()
        };
        if !moved {
            break;
        }
    }
    Ok(())
}

/// Fixed-step clock for gravity drops.
#[derive(Debug, Clone)]
struct SimClock {
    now: Duration,
    frame: Duration,
    max_frames_per_piece: u64,
}

impl SimClock {
    fn new(fps: f64, config: &GameConfig) -> Self {
        Self {
            now: Duration::ZERO,
            frame: Duration::from_secs_f64(fps.recip()),
            max_frames_per_piece: max_frames_per_piece(fps, config),
        }
    }

    /// Ticks the game one frame at a time until the active piece locks.
    fn drop_by_gravity(&mut self, game: &mut Game) -> anyhow::Result<()> {
        let locked = game.stats().locked_pieces();
        for _ in 0..self.max_frames_per_piece {
            if game.stats().locked_pieces() > locked || game.is_game_over() {
                return Ok(());
            }
            self.now += self.frame;
            game.tick(self.now);
        }
        anyhow::ensure!(
            game.stats().locked_pieces() > locked || game.is_game_over(),
            "piece did not lock within {} frames",
            self.max_frames_per_piece
        );
        Ok(())
    }
}

/// A piece falls at most the full board height, then fails a few drops
/// before locking. Twice that is a generous bound.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn max_frames_per_piece(fps: f64, config: &GameConfig) -> u64 {
    let steps = (config.visible_rows + config.hidden_rows) as f64
        + f64::from(config.lock_delay_attempts)
        + 1.0;
    let secs = steps / config.fall_speed.max(f64::MIN_POSITIVE);
    ((secs * fps * 2.0).ceil() as u64).saturating_add(1)
}

fn print_board(game: &Game) {
    let cols = game.board().cols();
    let mut line = String::with_capacity(cols + 2);
    for row in 0..game.board().visible_rows() {
        line.clear();
        line.push('|');
        line.extend((0..cols).map(|col| game.cell_view(col, row).map_or(' ', cell_char)));
        line.push('|');
        eprintln!("{line}");
    }
    eprintln!("+{}+", "-".repeat(cols));
}

fn cell_char(view: CellView) -> char {
    if view.filled {
        PieceKind::ALL
            .into_iter()
            .find(|kind| kind.color() == view.color)
            .map_or('#', PieceKind::as_char)
    } else if view.active {
        '@'
    } else {
        '.'
    }
}
