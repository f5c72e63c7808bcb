use std::io::{stdout, BufWriter, Stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};

use ascii_raycaster::config::{EngineConfig, WeaponModel};
use ascii_raycaster::display::TerminalPresenter;
use ascii_raycaster::driver::{MonotonicClock, TickDriver};
use ascii_raycaster::input::InputSource;
use ascii_raycaster::logging;
use ascii_raycaster::map::{Level, DEFAULT_LEVEL};
use ascii_raycaster::world::GameWorld;

// ── Command line ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WeaponArg {
    Hitscan,
    Projectile,
}

impl From<WeaponArg> for WeaponModel {
    fn from(arg: WeaponArg) -> Self {
        match arg {
            WeaponArg::Hitscan => WeaponModel::Hitscan,
            WeaponArg::Projectile => WeaponModel::Projectile,
        }
    }
}

/// First-person raycaster in the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Map file to load instead of the bundled level.
    #[arg(long, env = "RAYCASTER_MAP")]
    map: Option<PathBuf>,

    /// View width in columns.
    #[arg(long, env = "RAYCASTER_WIDTH", default_value_t = 100)]
    width: usize,

    /// View height in rows.
    #[arg(long, env = "RAYCASTER_HEIGHT", default_value_t = 30)]
    height: usize,

    /// Horizontal field of view in degrees.
    #[arg(long, env = "RAYCASTER_FOV", default_value_t = 66.0)]
    fov: f64,

    /// Tick rate cap.
    #[arg(long, env = "RAYCASTER_FPS", default_value_t = 20)]
    fps: u32,

    /// Weapon model for the whole session.
    #[arg(long, env = "RAYCASTER_WEAPON", value_enum, default_value_t = WeaponArg::Projectile)]
    weapon: WeaponArg,

    /// Directory for the log file.
    #[arg(long, env = "RAYCASTER_LOG_DIR", default_value = "logs")]
    log_dir: PathBuf,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default();
        config.screen.width = self.width;
        config.screen.height = self.height;
        config.camera.fov_degrees = self.fov;
        config.pacing.ticks_per_second = self.fps;
        config.weapon.model = self.weapon.into();
        config.validated()
    }
}

// ── Input ────────────────────────────────────────────────────────────────────

/// Keys forwarded from the blocking reader thread.
struct ChannelInput {
    rx: mpsc::Receiver<Event>,
}

impl InputSource for ChannelInput {
    /// Drain events until one key press turns up; leave the rest queued.
    fn poll_key(&mut self) -> Option<char> {
        while let Ok(ev) = self.rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            if kind == KeyEventKind::Release {
                continue;
            }
            let key = match code {
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => 'x',
                KeyCode::Char(c) => c,
                KeyCode::Enter => '\n',
                KeyCode::Esc => '\x1b',
                _ => continue,
            };
            return Some(key);
        }
        None
    }
}

// ── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init(&args.log_dir)?;

    let source = match &args.map {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading map {}", path.display()))?,
        None => DEFAULT_LEVEL.to_string(),
    };
    let level = Level::parse(&source).context("parsing map")?;
    let config = args.engine_config();
    tracing::info!(?config, "starting");

    let mut world = GameWorld::new(level, config);

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("enabling raw mode")?;
    let result = run_session(&mut out, &mut world);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result?;
    println!("Game over! Your score: {}", world.player.score);
    Ok(())
}

/// Everything between raw mode on and off: screen setup, the input thread
/// and the tick loop.
fn run_session(out: &mut BufWriter<Stdout>, world: &mut GameWorld) -> Result<u64> {
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(terminal::Clear(terminal::ClearType::All))?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the tick loop never blocks on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let mut input = ChannelInput { rx };
    let mut presenter = TerminalPresenter::new(out);
    let interval = world.config.pacing.tick_interval();
    let mut driver = TickDriver::new(MonotonicClock::new(), interval);
    let ticks = driver
        .run(world, &mut input, &mut presenter, None)
        .context("presenting frame")?;
    Ok(ticks)
}
