use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracker_status_core::{
    post_message, report, Control, FrameInfo, LivePanel, MessageBuffer, ModuleInfo, PlayerMode,
    StatusConfig, StatusError,
};

/// Frame length of a 125 BPM module, in milliseconds.
const FRAME_MS: u32 = 20;
const FRAMES_PER_ROW: u32 = 6;
const ROWS_PER_PATTERN: u32 = 64;

fn main() -> tracker_status_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Info { module, mode } => run_info(&mut out, &module, mode),
        Commands::Instruments { module, samples } => {
            let module = load_module(&module)?;
            if samples {
                report::report_instruments_samples(&mut out, &module)
            } else {
                report::report_instruments(&mut out, &module)
            }
        }
        Commands::Samples { module } => report::report_samples(&mut out, &load_module(&module)?),
        Commands::Comment { module } => report::report_comment(&mut out, &load_module(&module)?),
        Commands::Keys => report::report_help(&mut out),
        Commands::Play {
            module,
            step,
            interval,
            pause_at,
            force,
        } => {
            let module = load_module(&module)?;
            let mut player = Playback::new(&config, step, pause_at, force);
            player.run(&mut out, &module, Duration::from_millis(interval))
        }
    }
}

fn run_info<W: Write>(out: &mut W, path: &Path, mode: PlayerMode) -> tracker_status_core::Result<()> {
    let module = load_module(path)?;
    tracing::info!(name = %module.display_name(), %mode, "module loaded");

    report::report_module(out, &module, mode)?;
    writeln!(out)?;
    report::report_instruments_samples(out, &module)?;
    writeln!(out)?;
    report::report_samples(out, &module)?;
    writeln!(out)?;
    report::report_comment(out, &module)
}

/// Drives the live panel over synthesized frames, standing in for a real
/// playback engine.
struct Playback {
    panel: LivePanel,
    messages: MessageBuffer,
    control: Control,
    step: u32,
    pause_at: Vec<u32>,
    force: bool,
}

impl Playback {
    fn new(config: &StatusConfig, step: u32, mut pause_at: Vec<u32>, force: bool) -> Self {
        pause_at.sort_unstable();
        Self {
            panel: LivePanel::new(config.panel.clone()),
            messages: MessageBuffer::new(&config.message),
            control: Control::default(),
            step,
            pause_at,
            force,
        }
    }

    fn run<W: Write>(
        &mut self,
        out: &mut W,
        module: &ModuleInfo,
        interval: Duration,
    ) -> tracker_status_core::Result<()> {
        let duration = module.duration();
        if duration == 0 {
            return Err(StatusError::ZeroDuration { elapsed: 0 });
        }

        tracing::info!(name = %module.display_name(), duration, "starting playback");
        self.panel.reset();
        // Room for the lines the first redraw clears.
        out.write_all(b"\n\n\n\n")?;

        let mut time = 0;
        let mut redraws = 0u32;
        while time <= duration {
            self.update_pause(time);

            let frame = synthesize_frame(time);
            if self
                .panel
                .render(out, module, &frame, &self.control, self.force)?
            {
                redraws += 1;
            }

            self.messages.count_down(self.step);
            if !interval.is_zero() {
                thread::sleep(interval);
            }
            match time.checked_add(self.step) {
                Some(next) => time = next,
                None => break,
            }
        }
        writeln!(out)?;

        tracing::info!(
            redraws,
            max_channels = self.panel.max_channels(),
            "playback finished"
        );
        Ok(())
    }

    fn update_pause(&mut self, time: u32) {
        let toggles = self.pause_at.iter().take_while(|&&at| at <= time).count();
        let paused = toggles % 2 == 1;
        if paused == self.control.pause {
            return;
        }

        self.control.pause = paused;
        post_message!(
            self.messages,
            "{} at {}",
            if paused { "Paused" } else { "Resumed" },
            report::report_duration(time)
        );
        tracing::info!(notice = self.messages.text(), "control changed");
    }
}

fn synthesize_frame(time: u32) -> FrameInfo {
    let tick = time / FRAME_MS;
    let row = (tick / FRAMES_PER_ROW) % ROWS_PER_PATTERN;
    FrameInfo {
        row,
        num_rows: ROWS_PER_PATTERN,
        frame: tick % FRAMES_PER_ROW,
        time,
        virt_used: 4 + row % 5,
    }
}

fn load_module(path: &Path) -> tracker_status_core::Result<ModuleInfo> {
    tracing::debug!(?path, "reading module description");
    let text = std::fs::read_to_string(path)?;
    ModuleInfo::from_json(&text)
        .map_err(|err| StatusError::msg(format!("{}: {err}", path.display())))
}

fn load_config(path: Option<&Path>) -> tracker_status_core::Result<StatusConfig> {
    match path {
        Some(path) => {
            tracing::debug!(?path, "reading configuration");
            StatusConfig::from_json(&std::fs::read_to_string(path)?)
        }
        None => Ok(StatusConfig::default()),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Tracker module status panel and reports", long_about = None)]
struct Cli {
    /// Optional JSON file overriding panel glyphs and message settings.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print duration, instruments, samples and comment of a module.
    Info {
        /// JSON description of the module.
        module: PathBuf,
        /// Player mode the module is played as.
        #[arg(short, long, default_value = "auto")]
        mode: PlayerMode,
    },
    /// Print the instrument table.
    Instruments {
        module: PathBuf,
        /// List the samples each instrument plays instead of its envelopes.
        #[arg(short, long)]
        samples: bool,
    },
    /// Print every sample slot.
    Samples { module: PathBuf },
    /// Print the module comment.
    Comment { module: PathBuf },
    /// Print the interactive key bindings.
    Keys,
    /// Animate the live panel from the start to the end of the module.
    Play {
        module: PathBuf,
        /// Simulated milliseconds between refreshes.
        #[arg(long, default_value_t = FRAME_MS, value_parser = clap::value_parser!(u32).range(1..))]
        step: u32,
        /// Real milliseconds to sleep between refreshes.
        #[arg(long, default_value_t = FRAME_MS as u64)]
        interval: u64,
        /// Playback times (ms) at which pause is toggled.
        #[arg(long, value_delimiter = ',')]
        pause_at: Vec<u32>,
        /// Redraw on every refresh instead of once per row.
        #[arg(long)]
        force: bool,
    },
}
