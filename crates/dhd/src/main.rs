use chevron::PresetBook;
use clap::Parser;
use dhd::config;
use dhd::gui::app::AppModel;
use dhd::gui::gate::Session;
use dhd::sys::runtime;
use relm4::prelude::*;

#[derive(Parser, Debug)]
#[command(version, about = "Stargate dialing computer and DHD simulator", long_about = None)]
struct Args {
    /// Write a commented default config file, print its path and exit
    #[arg(long)]
    write_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.write_config {
        let path = config::write_default_config()?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = config::load_or_default();
    let presets = config.preset_book().unwrap_or_else(|e| {
        log::error!("{}; using built-in presets", e);
        PresetBook::builtin()
    });
    let session = Session::new(presets, config.mute);

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    if let Err(e) = runtime::start_background_services(tx) {
        log::error!("Failed to start background services: {}", e);
    }

    // GTK would try to parse our flags
    let app = RelmApp::new("org.sgc.dhd").with_args(Vec::new());

    app.run::<AppModel>((session, rx));
    Ok(())
}
