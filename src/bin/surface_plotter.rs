//! surface-plotter: random 3D surface plot viewer
//!
//! Samples 1000 points on a disc of radius 6, plots `z = sin(sqrt(x² + y²))`
//! as a triangulated surface and shows it full-screen in the terminal until
//! `q`, `Esc` or `Enter` is pressed.
//!
//! Run: `surface-plotter --seed 0 -o surface.png`

use std::io::{stdout, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{ExecutableCommand, QueueableCommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use surface_plotter::output::{PreviewStyle, TerminalPreview};
use surface_plotter::plots::TriSurface;
use surface_plotter::sample::generate_samples;
use surface_plotter::{configure_logging, Figure};

/// surface-plotter: random 3D surface plot viewer
#[derive(Parser, Debug)]
#[command(name = "surface-plotter")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Plot a random 3D surface and display it in the terminal", long_about = None)]
struct Cli {
    /// Seed for a reproducible figure (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Also save the figure as PNG
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Figure width in pixels
    #[arg(long, default_value = "640")]
    width: u32,

    /// Figure height in pixels
    #[arg(long, default_value = "480")]
    height: u32,

    /// Render (and save) without opening the display
    #[arg(long)]
    no_display: bool,

    /// Use plain ASCII instead of 24-bit color blocks
    #[arg(long)]
    ascii: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    configure_logging();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let samples = generate_samples(&mut rng);
    info!(points = samples.len(), seed = ?cli.seed, "generated surface samples");

    let surface = TriSurface::new()
        .samples(&samples)
        .dimensions(cli.width, cli.height)
        .build()
        .context("failed to build surface")?;
    let figure = Figure::render(&surface).context("failed to render surface")?;
    info!(triangles = figure.triangle_count(), "rendered figure");

    if let Some(path) = &cli.output {
        figure
            .save_png(path)
            .with_context(|| format!("failed to save {}", path.display()))?;
    }

    if cli.no_display {
        return Ok(());
    }

    let style = if cli.ascii { PreviewStyle::Ascii } else { PreviewStyle::HalfBlock };
    if stdout().is_terminal() {
        show(&figure, style)
    } else {
        let preview = TerminalPreview::new().style(style);
        print!("{}", figure.to_terminal(&preview));
        Ok(())
    }
}

/// Show the figure on the alternate screen until a close key is pressed.
fn show(figure: &Figure, style: PreviewStyle) -> Result<()> {
    let _terminal = TerminalGuard::enter(stdout())?;
    draw_and_wait(figure, style)
}

/// Raw mode and alternate screen, restored on drop.
///
/// Restoration also runs when entering fails halfway, so an error after
/// `enable_raw_mode` never leaves the shell in raw mode.
struct TerminalGuard<W: Write> {
    out: W,
    raw: bool,
}

impl<W: Write> TerminalGuard<W> {
    fn enter(out: W) -> Result<Self> {
        let mut guard = Self { out, raw: false };
        enable_raw_mode()?;
        guard.raw = true;
        guard.out.execute(EnterAlternateScreen)?.execute(Hide)?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        // Errors here have nowhere to go.
        let _ = self.out.execute(Show).and_then(|out| out.execute(LeaveAlternateScreen));
        if self.raw {
            let _ = disable_raw_mode();
        }
    }
}

fn draw_and_wait(figure: &Figure, style: PreviewStyle) -> Result<()> {
    let mut redraw = true;
    loop {
        if redraw {
            draw(figure, style)?;
            redraw = false;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter) {
                    return Ok(());
                }
            }
            Event::Resize(..) => redraw = true,
            _ => {}
        }
    }
}

fn draw(figure: &Figure, style: PreviewStyle) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let preview = TerminalPreview::new().style(style).columns(fit_columns(
        figure,
        u32::from(cols),
        u32::from(rows.saturating_sub(1)),
    ));

    let mut out = stdout();
    out.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;
    for line in figure.to_terminal(&preview).lines() {
        // Raw mode does not translate \n.
        write!(out, "{line}\r\n")?;
    }
    write!(out, "q / Esc / Enter to close")?;
    out.flush()?;
    Ok(())
}

/// Widest preview whose height fits in `rows` lines.
fn fit_columns(figure: &Figure, cols: u32, rows: u32) -> u32 {
    let aspect = figure.height() as f32 / figure.width() as f32;
    let by_height = (rows.max(1) as f32 * 2.0 / aspect).floor() as u32;
    cols.min(by_height).max(1)
}
