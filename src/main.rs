use clap::{Parser, Subcommand};
use previewfit::config::{self, CONFIG_FILENAME};
use previewfit::device::{DeviceProfile, ProfileHost};
use previewfit::geometry::{self, SelectionPolicy};
use previewfit::session::PreviewSession;
use previewfit::state::SavedState;
use previewfit::types::{Facing, Rotation, Size};
use previewfit::{logging, output};
use std::path::PathBuf;

fn version_string() -> &'static str {
    if env!("ON_RELEASE_TAG") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    match env!("GIT_HASH") {
        "" => "dev@unknown",
        // Leaked once at startup
        hash => Box::leak(format!("dev@{hash}").into_boxed_str()),
    }
}

#[derive(Parser)]
#[command(name = "previewfit")]
#[command(about = "Pick, rotate and place a camera preview")]
#[command(long_about = "\
Pick, rotate and place a camera preview

Given the sizes a camera can stream, previewfit decides which one to capture,
how far to rotate the stream so it shows upright on screen, and where the
frame sits inside the viewport so it is centered and undistorted.

Pure calculations:

  previewfit select --supported 1920x1080,1280x720,640x480 --target 1280x720
  previewfit orient --display 0 --sensor 90 --facing front
  previewfit layout --viewport 800x600 --preview 1920x1080

Full session against a device profile:

  previewfit plan --profile phone.toml --viewport 1080x1920

  phone.toml:
    display_rotation = 0
    [[camera]]
    facing = \"back\"
    orientation = 90
    sizes = [\"1920x1080\", \"1280x720\", \"640x480\"]

The chosen camera and target survive between plan runs in the state file.
Run 'previewfit gen-config' to generate a documented previewfit.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Print diagnostics to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the canonical resolution menu
    Catalog {
        /// Mark this size as the current one
        #[arg(long)]
        current: Option<Size>,
    },
    /// Choose a capture size from the sizes a camera supports
    Select {
        /// Supported sizes, in the order the camera reports them
        #[arg(long, required = true, value_delimiter = ',')]
        supported: Vec<Size>,
        /// Requested size
        #[arg(long)]
        target: Size,
        /// Selection policy (defaults to the config's)
        #[arg(long, value_enum)]
        policy: Option<SelectionPolicy>,
        /// Aspect tolerance for the optimal policy (defaults to the config's)
        #[arg(long)]
        tolerance: Option<f64>,
        /// List candidates ranked by closeness to the target (whatever the policy)
        #[arg(long)]
        ranked: bool,
    },
    /// Compute the rotation that shows a camera's stream upright
    Orient {
        /// Screen rotation in degrees (0, 90, 180, 270)
        #[arg(long, allow_hyphen_values = true)]
        display: i32,
        /// Sensor mounting angle in degrees (0, 90, 180, 270)
        #[arg(long, allow_hyphen_values = true)]
        sensor: i32,
        #[arg(long, value_enum, default_value = "back")]
        facing: Facing,
    },
    /// Center a preview inside a viewport
    Layout {
        #[arg(long)]
        viewport: Size,
        /// Capture size as the camera delivers it
        #[arg(long)]
        preview: Size,
        /// The stream is rotated by a quarter turn
        #[arg(long)]
        rotated: bool,
    },
    /// Run a preview session against a device profile
    Plan {
        /// Device profile (TOML)
        #[arg(long)]
        profile: PathBuf,
        /// Size of the rendering surface
        #[arg(long)]
        viewport: Size,
        /// Request an explicit capture size
        #[arg(long)]
        target: Option<Size>,
        /// Switch to the next camera after starting
        #[arg(long)]
        switch: bool,
        /// Neither read nor write the state file
        #[arg(long)]
        no_state: bool,
    },
    /// Print a stock previewfit.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_stderr_logger(cli.verbose);

    match cli.command {
        Command::Catalog { current } => output::print_catalog(current),
        Command::Select {
            supported,
            target,
            policy,
            tolerance,
            ranked,
        } => {
            let config = config::load_config(&cli.config)?;
            let policy = policy.unwrap_or(config.selection.policy);
            let tolerance = tolerance.unwrap_or(config.selection.aspect_tolerance);
            config::validate_tolerance(tolerance)?;
            let chosen = policy.select(&supported, target, tolerance)?;
            let candidates = if ranked {
                geometry::rank_by_closeness(&supported, target)
            } else {
                supported
            };
            output::print_selection(target, policy, &candidates, chosen, ranked);
        }
        Command::Orient {
            display,
            sensor,
            facing,
        } => {
            let rotation = geometry::display_orientation_degrees(display, sensor, facing)?;
            let display = Rotation::from_degrees(display)?;
            let sensor = Rotation::from_degrees(sensor)?;
            output::print_orientation(display, sensor, facing, rotation);
        }
        Command::Layout {
            viewport,
            preview,
            rotated,
        } => {
            let rect = geometry::layout_preview(viewport, preview, rotated);
            output::print_layout(viewport, preview, rotated, rect);
        }
        Command::Plan {
            profile,
            viewport,
            target,
            switch,
            no_state,
        } => {
            let config = config::load_config(&cli.config)?;
            let profile = DeviceProfile::load(&profile)?;
            let display = profile
                .display_rotation
                .unwrap_or(config.display.rotation);
            let state_file = &config.session.state_file;

            let mut session =
                PreviewSession::new(ProfileHost::new(profile), display, config.selection);
            if !no_state {
                session.restore(&SavedState::load(state_file));
            }
            session.resume()?;
            session.surface_changed(viewport)?;
            if switch && !session.switch_camera()? {
                log::info!("Only one camera, not switching.");
            }
            if let Some(target) = target {
                session.set_target_size(target)?;
            }

            output::print_session(session.state(), session.target());

            if !no_state {
                session.saved_state().save(state_file)?;
            }
            session.pause();
        }
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}
