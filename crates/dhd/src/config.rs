use chevron::address::AddressError;
use chevron::{Preset, PresetBook, Symbol};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use thiserror::Error;

#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PresetConfig {
    pub name: String,
    #[serde_as(as = "Vec<DisplayFromStr>")]
    pub glyphs: Vec<Symbol>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub presets: Vec<PresetConfig>,
    /// Suppresses the display bell on rejected input.
    #[serde(default)]
    pub mute: bool,
}

impl Config {
    pub fn preset_book(&self) -> Result<PresetBook, ConfigError> {
        let presets = self
            .presets
            .iter()
            .map(|p| {
                Preset::new(p.name.clone(), p.glyphs.clone()).map_err(|source| {
                    ConfigError::Preset {
                        name: p.name.clone(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PresetBook::with_extra(presets))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Preset '{name}': {source}")]
    Preset { name: String, source: AddressError },
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "sgc", "dhd").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("DHD"))
        .build()?;

    let config: Config = s.try_deserialize()?;
    // surface bad presets here rather than on first use
    config.preset_book()?;
    Ok(config)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::{Receiver, Sender};
use notify::Event;
use std::path::Path;

/// Whether `event` touched the config file itself. Editors that save through a temporary file
/// show up as a create or rename of `config.toml`, so paths are matched by file name.
fn touches_config_file(event: &Event, config_path: &Path) -> bool {
    let relevant = matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    );
    relevant
        && event
            .paths
            .iter()
            .any(|p| p.file_name().is_some() && p.file_name() == config_path.file_name())
}

type WatchEvents = Receiver<notify::Result<Event>>;

fn watch_config_dir(config_dir: &Path) -> Result<(RecommendedWatcher, WatchEvents), ConfigError> {
    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(config_dir, RecursiveMode::NonRecursive)?;
    Ok((watcher, bridge_rx))
}

/// Sends [`AppEvent::ConfigReload`] whenever the presets file changes on disk.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Preset hot reload disabled: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent().map(Path::to_path_buf) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Preset hot reload disabled: {}", e);
        return;
    }

    // the watcher stops when dropped, so it lives as long as this task
    let (_watcher, events) = match watch_config_dir(&config_dir) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Preset hot reload disabled: {}", e);
            return;
        }
    };
    log::info!("Watching {} for preset changes", config_path.display());

    while let Ok(res) = events.recv().await {
        match res {
            Ok(event) if touches_config_file(&event, &config_path) => {
                log::debug!("{:?} on {}", event.kind, config_path.display());
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::warn!("Config watch error: {}", ConfigError::from(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_deserialization() {
        let json = r#"{
            "presets": [
                { "name": "Tollana", "glyphs": ["S04", "s12", "S33", "S08", "S19", "S27", "S01"] }
            ]
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(!config.mute);
        assert_eq!(config.presets[0].glyphs[0], Symbol::new(3).unwrap());

        let book = config.preset_book().unwrap();
        assert_eq!(book.len(), 5);
        assert_eq!(book.get("tollana").unwrap().address.len(), 7);
    }

    #[test]
    fn test_bad_glyph_label_is_rejected() {
        let json = r#"{ "presets": [ { "name": "Bad", "glyphs": ["S99"] } ] }"#;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }

    #[test]
    fn test_short_preset_is_rejected() {
        let json = r#"{ "presets": [ { "name": "Short", "glyphs": ["S01", "S02"] } ] }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        match config.preset_book() {
            Err(ConfigError::Preset { name, source }) => {
                assert_eq!(name, "Short");
                assert_eq!(source, AddressError::Length(2));
            }
            other => panic!("expected preset error, got {other:?}"),
        }
    }

    #[test]
    fn test_only_config_file_events_trigger_reload() {
        use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};
        use std::path::PathBuf;

        let config_path = PathBuf::from("/home/sg1/.config/dhd/config.toml");
        let event = |kind: EventKind, path: &str| Event::new(kind).add_path(PathBuf::from(path));

        let modify = || EventKind::Modify(ModifyKind::Any);
        assert!(touches_config_file(
            &event(modify(), "/home/sg1/.config/dhd/config.toml"),
            &config_path
        ));
        assert!(touches_config_file(
            &event(
                EventKind::Create(CreateKind::File),
                "/home/sg1/.config/dhd/config.toml"
            ),
            &config_path
        ));
        assert!(touches_config_file(
            &event(
                EventKind::Remove(RemoveKind::File),
                "/home/sg1/.config/dhd/config.toml"
            ),
            &config_path
        ));

        assert!(!touches_config_file(
            &event(modify(), "/home/sg1/.config/dhd/notes.txt"),
            &config_path
        ));
        assert!(!touches_config_file(
            &event(
                EventKind::Access(AccessKind::Any),
                "/home/sg1/.config/dhd/config.toml"
            ),
            &config_path
        ));
        assert!(!touches_config_file(&Event::new(modify()), &config_path));
    }

    #[test]
    fn test_empty_config_has_builtins() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.preset_book().unwrap(), PresetBook::builtin());
    }
}
