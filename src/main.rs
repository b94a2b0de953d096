//! hotbind - interactive binding editor demo
//!
//! Four demo actions log to an on-screen pane; click a row of the editor to rebind it.

use anyhow::Result;
use clap::{value_parser, Arg, Command};
use hotbind::app::runtime::pump;
use hotbind::editor::{EditorClick, EditorView, TerminalEditor};
use hotbind::input::TerminalSource;
use hotbind::{ActionDefinition, Hotkeys, HotkeysConfig};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Entries kept in the on-screen action log.
const LOG_CAPACITY: usize = 20;

#[derive(Clone)]
struct ActionLog {
    started: Instant,
    entries: Arc<Mutex<Vec<String>>>,
}

impl ActionLog {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            entries: Arc::new(Mutex::new(vec!["start of action log".to_string()])),
        }
    }

    fn push(&self, message: impl AsRef<str>) {
        let mut entries = self.entries.lock();
        entries.push(format!(
            "{:>7.1}s - {}",
            self.started.elapsed().as_secs_f64(),
            message.as_ref()
        ));
        if entries.len() > LOG_CAPACITY {
            entries.remove(0);
        }
    }

    fn snapshot(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

fn demo_actions(log: &ActionLog) -> Vec<ActionDefinition> {
    let (click, momentary, steps, range) = (log.clone(), log.clone(), log.clone(), log.clone());
    vec![
        ActionDefinition::click("Action 1", move || click.push("Action 1 (click)")),
        ActionDefinition::momentary("Action 2", move |on| {
            momentary.push(format!(
                "Action 2 (momentary): {}",
                if on { "on" } else { "off" }
            ))
        }),
        ActionDefinition::steps("Action 3", 1.0, move |v| {
            steps.push(format!("Action 3 (steps): {v}"))
        }),
        ActionDefinition::range("Action 4", (-100.0, 100.0), 5.0, move |v| {
            range.push(format!("Action 4 (range): {v}"))
        }),
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging for development
    env_logger::init();

    // Parse command-line arguments
    let matches = Command::new("hotbind")
        .version(hotbind::VERSION)
        .about("Interactive keyboard and gamepad binding editor demo")
        .long_about(
            "hotbind shows four demo actions (click, momentary, steps, range) and lets you \
             rebind them by clicking a row and pressing a key, gamepad button or moving an axis.",
        )
        .arg(
            Arg::new("tick-rate")
                .long("tick-rate")
                .value_name("HZ")
                .help("Ticks per second for velocity-driven range actions")
                .value_parser(value_parser!(u32).range(1..=1000)),
        )
        .arg(
            Arg::new("bindings")
                .long("bindings")
                .value_name("FILE")
                .help("Load bindings from FILE and save them there on OK (feature `config`)")
                .value_parser(value_parser!(PathBuf)),
        )
        .get_matches();

    let mut config = load_config()?;
    if let Some(rate) = matches.get_one::<u32>("tick-rate") {
        config.tick_rate_hz = *rate;
    }
    let bindings_path = matches.get_one::<PathBuf>("bindings").cloned();

    let log = ActionLog::new();
    let mut hotkeys = Hotkeys::new(demo_actions(&log), &config)?;
    restore_bindings(&mut hotkeys, bindings_path.as_deref())?;

    let runtime = tokio::runtime::Handle::current();
    tokio::task::spawn_blocking(move || {
        run_demo(hotkeys, &config, &log, bindings_path.as_deref(), &runtime)
    })
    .await??;

    Ok(())
}

fn run_demo(
    mut hotkeys: Hotkeys,
    config: &HotkeysConfig,
    log: &ActionLog,
    bindings_path: Option<&std::path::Path>,
    runtime: &tokio::runtime::Handle,
) -> Result<()> {
    let mut screen = TerminalEditor::new();
    screen.initialize()?;
    let mut keys = TerminalSource::new();
    if !keys.enable_release_events()? {
        log.push("terminal does not report key releases; momentary keys release immediately");
    }

    let mut pads = open_gamepads(&mut hotkeys, log);

    while !keys.quit_requested() {
        pump(&mut hotkeys, &mut keys, config.poll_interval())?;
        pump_gamepads(&mut hotkeys, &mut pads)?;

        for (column, row) in keys.drain_clicks() {
            match screen.hit(column, row) {
                Some(EditorClick::Entry(index)) => {
                    hotkeys.select_entry(index);
                }
                Some(EditorClick::Confirm) => {
                    hotkeys.confirm_binding_editor();
                    save_bindings(&hotkeys, bindings_path)?;
                }
                Some(EditorClick::OpenEditor) => {
                    let editor = hotkeys.open_binding_editor();
                    let log = log.clone();
                    runtime.spawn(async move {
                        editor.closed().await;
                        log.push("binding editor closed");
                    });
                }
                None if hotkeys.is_editor_open() => hotkeys.close_binding_editor(),
                None => {}
            }
        }

        let entries = hotkeys.editor_entries();
        let lines = log.snapshot();
        screen.draw(&EditorView {
            entries: &entries,
            log: &lines,
            editor_open: hotkeys.is_editor_open(),
        })?;
    }

    hotkeys.destroy();
    keys.disable_release_events()?;
    screen.cleanup()?;
    Ok(())
}

#[cfg(feature = "gamepad")]
type Gamepads = Option<hotbind::input::GamepadSource>;

#[cfg(not(feature = "gamepad"))]
type Gamepads = ();

#[cfg(feature = "gamepad")]
fn open_gamepads(hotkeys: &mut Hotkeys, log: &ActionLog) -> Gamepads {
    match hotbind::input::GamepadSource::new() {
        Ok(pads) => {
            for event in pads.connected() {
                hotkeys.process_event(&event);
            }
            Some(pads)
        }
        Err(err) => {
            log.push(format!("gamepads unavailable: {err}"));
            None
        }
    }
}

#[cfg(not(feature = "gamepad"))]
fn open_gamepads(_hotkeys: &mut Hotkeys, _log: &ActionLog) -> Gamepads {}

#[cfg(feature = "gamepad")]
fn pump_gamepads(hotkeys: &mut Hotkeys, pads: &mut Gamepads) -> Result<()> {
    if let Some(pads) = pads.as_mut() {
        pump(hotkeys, pads, std::time::Duration::ZERO)?;
    }
    Ok(())
}

#[cfg(not(feature = "gamepad"))]
fn pump_gamepads(_hotkeys: &mut Hotkeys, _pads: &mut Gamepads) -> Result<()> {
    Ok(())
}

#[cfg(feature = "config")]
fn load_config() -> Result<HotkeysConfig> {
    Ok(HotkeysConfig::load_or_default()?)
}

#[cfg(not(feature = "config"))]
fn load_config() -> Result<HotkeysConfig> {
    Ok(HotkeysConfig::default())
}

#[cfg(feature = "config")]
fn restore_bindings(hotkeys: &mut Hotkeys, path: Option<&std::path::Path>) -> Result<()> {
    if let Some(path) = path.filter(|path| path.exists()) {
        hotkeys.load_bindings(hotbind::config::load_bindings(path)?);
    }
    Ok(())
}

#[cfg(not(feature = "config"))]
fn restore_bindings(_hotkeys: &mut Hotkeys, path: Option<&std::path::Path>) -> Result<()> {
    if path.is_some() {
        log::warn!("--bindings needs the `config` feature; ignoring");
    }
    Ok(())
}

#[cfg(feature = "config")]
fn save_bindings(hotkeys: &Hotkeys, path: Option<&std::path::Path>) -> Result<()> {
    if let Some(path) = path {
        hotbind::config::save_bindings(path, &hotkeys.bindings())?;
    }
    Ok(())
}

#[cfg(not(feature = "config"))]
fn save_bindings(_hotkeys: &Hotkeys, _path: Option<&std::path::Path>) -> Result<()> {
    Ok(())
}
