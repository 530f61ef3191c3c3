// What you SEE:
// • A 600×480 white canvas. Hold Left Mouse and drag to draw.
// • 1-9 pick a palette color. N starts a new canvas.
// • Ctrl+C / Ctrl+V copy and paste the image, Ctrl+S / Ctrl+O save and open.
// • D downloads image.png, H shares paint.png. ESC quits.
// • The title bar counts strokes since the last save/clear.

use clap::Parser;
use log::{error, info, warn};
use paint::config::PaintConfig;
use paint::draw::{Command, Drawer, PointerInput};
use paint::{Canvas, CANVAS_HEIGHT, CANVAS_WIDTH, ImageSource, PaintSession, Result, SurfaceHandle};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "paint", version, about = "Draw on a 600x480 pixel canvas")]
struct Args {
    /// Image to open on launch (overlaid at the top-left corner)
    file: Option<PathBuf>,

    /// Config file (default: <config dir>/paint/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run_command(
    cmd: Command,
    session: &mut PaintSession<SurfaceHandle<Canvas>>,
    config: &PaintConfig,
) -> Result<()> {
    match cmd {
        Command::NewCanvas => session.new_canvas(),
        Command::Copy => session.copy(),
        Command::Paste => session.paste().map(|_| ()),
        Command::Save => session.save(&config.save_path()),
        Command::Open => session.open(&config.save_path()).map(|_| ()),
        Command::Download => session.download(&config.download_dir()).map(|_| ()),
        Command::Share => session.share(&std::env::temp_dir()).map(|_| ()),
        Command::Palette(n) => match config.palette_color(n) {
            Some(color) => session.set_color(color),
            None => Ok(()),
        },
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(PaintConfig::default_path);
    let config = PaintConfig::load(&config_path).unwrap_or_else(|e| {
        warn!("ignoring config {}: {e}", config_path.display());
        PaintConfig::default()
    });
    info!("Configuration loaded");

    /* --- Canvas + window setup ---
       Visual: window opens showing a white canvas. */
    let canvas = SurfaceHandle::new(Canvas::new());
    let mut session = PaintSession::new(canvas.clone(), config.brush_size)?;
    session.set_color(&config.initial_color)?;
    let mut drawer = Drawer::new(&config.title, CANVAS_WIDTH as usize, CANVAS_HEIGHT as usize)?;
    let mut input = PointerInput::default();

    // Launched with a file: load it straight onto the canvas.
    if let Some(path) = args.file {
        match session.import(ImageSource::File(path.clone())) {
            Ok((w, h)) => info!("opened {} ({w}x{h})", path.display()),
            Err(e) => error!("could not open {}: {e}", path.display()),
        }
    }

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        // 1) Pointer → strokes. Events are applied strictly in arrival order.
        let capturing = session.tracker().is_capturing();
        for event in input.poll(drawer.sample(), capturing) {
            if let Err(e) = session.pointer(event) {
                error!("{event:?}: {e}");
            }
        }

        // 2) Keyboard commands. Failures are reported, the session carries on.
        for cmd in drawer.commands() {
            if let Err(e) = run_command(cmd, &mut session, &config) {
                error!("{cmd:?} failed: {e}");
            }
        }

        // 3) Badge (title bar) follows the change counter.
        session.counter_mut().report(&mut drawer);

        /* 4) Present to the window (this is when the on-screen image updates). */
        let ctx = canvas.context()?;
        drawer.present(ctx.frame())?;
    }

    Ok(())
}
