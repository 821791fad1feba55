use clap::{Parser, Subcommand};
use wedge::geometry::Point;
use wedge::ipc::{self, Request, SOCKET_PATH};
use wedge::pointer::{Button, PointerEvent};
use wedge::wm;

#[derive(Parser, Debug)]
#[command(name = "wedge", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug, Clone)]
struct Position {
    /// Horizontal position on the focused monitor (defaults to the cursor)
    #[arg(requires = "y", allow_negative_numbers = true)]
    x: Option<f64>,
    /// Vertical position on the focused monitor (defaults to the cursor)
    #[arg(requires = "x", allow_negative_numbers = true)]
    y: Option<f64>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Report a button press. Bind this to the button's press in the compositor.
    Press {
        /// Button name or number (left, middle, right, 1, 2, 3, ...)
        #[arg(short, long, default_value_t = Button::RIGHT)]
        button: Button,
        #[command(flatten)]
        position: Position,
    },
    /// Report a button release.
    Release {
        #[arg(short, long, default_value_t = Button::RIGHT)]
        button: Button,
        #[command(flatten)]
        position: Position,
    },
    /// Report pointer motion.
    Move {
        #[command(flatten)]
        position: Position,
    },
    /// Close the menu without running anything.
    Dismiss,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let request = match cli.command {
        Commands::Press { button, position } => Request::Pointer(PointerEvent::Press {
            position: resolve_position(&position)?,
            button,
        }),
        Commands::Release { button, position } => Request::Pointer(PointerEvent::Release {
            position: resolve_position(&position)?,
            button,
        }),
        Commands::Move { position } => Request::Pointer(PointerEvent::Move {
            position: resolve_position(&position)?,
        }),
        Commands::Dismiss => Request::Dismiss,
    };

    log::debug!("Sending '{}'", request);
    ipc::send(&request).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to wheel daemon at {}: {}. Is wheel running?",
            SOCKET_PATH,
            e
        )
    })
}

fn resolve_position(position: &Position) -> anyhow::Result<Point> {
    if let (Some(x), Some(y)) = (position.x, position.y) {
        return Ok(Point::new(x, y));
    }
    wm::get_cursor_pos_on_active_monitor()
        .ok_or_else(|| anyhow::anyhow!("No coordinates given and the cursor position is unknown"))
}
