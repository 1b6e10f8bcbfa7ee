use anyhow::Context;
use chevron::engine::{GateState, Intent};
use chevron::remote::SOCKET_PATH;
use chevron::{Action, Engine, PresetName, Symbol};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::time::Duration;

const SIMULATION_LIMIT: Duration = Duration::from_secs(120);

#[derive(Parser, Debug)]
#[command(name = "chevron", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Start dialing the entered address
    Dial,
    /// Close the gate, aborting any dialing in progress
    Close,
    /// Remove the last entered glyph
    Back,
    /// Clear the entered address
    Clear,
    /// Enter a glyph by label (S01-S39)
    Glyph { label: Symbol },
    /// Load a known address by name
    Preset { name: String },
    /// Dial an address headlessly and print every status line
    Simulate {
        /// Known address to dial
        #[arg(short, long, conflicts_with = "glyphs")]
        preset: Option<String>,

        /// Glyph labels to dial instead of a preset
        #[arg(short, long, num_args = 1..)]
        glyphs: Vec<Symbol>,

        /// Simulated frames per second
        #[arg(long, default_value_t = 60)]
        fps: u32,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Dial => send_command(&Action::Dial),
        Commands::Close => send_command(&Action::Close),
        Commands::Back => send_command(&Action::Back),
        Commands::Clear => send_command(&Action::Clear),
        Commands::Glyph { label } => send_command(&Action::Glyph(label)),
        Commands::Preset { name } => send_command(&Action::Preset(PresetName::new(name))),
        Commands::Simulate {
            preset,
            glyphs,
            fps,
        } => simulate(preset, glyphs, fps),
    }
}

fn send_command(action: &Action) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to dhd at {}: {}. Is dhd running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", action)?;
    Ok(())
}

fn simulate(preset: Option<String>, glyphs: Vec<Symbol>, fps: u32) -> anyhow::Result<()> {
    if fps == 0 {
        anyhow::bail!("--fps must be positive");
    }
    let mut engine = Engine::default();

    match preset {
        Some(name) => engine
            .load_preset(&name)
            .with_context(|| format!("cannot load preset '{name}'"))?,
        None => {
            for symbol in glyphs {
                engine
                    .append(symbol.index())
                    .with_context(|| format!("cannot enter {symbol}"))?;
            }
        }
    }
    engine.start().context("cannot start dialing")?;

    let frame = Duration::from_secs(1) / fps;
    print_intents(&mut engine);
    while engine.state() != GateState::Connected {
        if engine.now() > SIMULATION_LIMIT {
            anyhow::bail!("no connection after {:?}", SIMULATION_LIMIT);
        }
        engine.advance(frame);
        print_intents(&mut engine);
    }
    Ok(())
}

fn print_intents(engine: &mut Engine) {
    let now = engine.now().as_secs_f64();
    for intent in engine.drain_intents() {
        match intent {
            Intent::Status(status) => println!("[{now:7.3}s] {status}"),
            Intent::Cue(cue) => log::debug!("[{now:7.3}s] cue {cue}"),
        }
    }
}
