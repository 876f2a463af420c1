use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use forge_core::{update, AppState, Msg};
use forge_engine::{EngineHandle, FileHistoryStorage, GeminiClient, HistoryStorage, HistoryStore};
use forge_logging::{forge_info, forge_warn};

use super::cli::Args;
use super::clipboard::Osc52Clipboard;
use super::effects::{now_ms, EffectRunner};
use super::logging::{self, LOG_FILE};
use super::settings::{api_key_from_env, Settings};
use super::ui::input::{AppEvent, InputParser, HELP};
use super::ui::render;

const TICK_INTERVAL: Duration = Duration::from_millis(250);
const POLL_INTERVAL: Duration = Duration::from_millis(25);

pub fn run_app() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut settings = Settings::load(&args.config);
    settings.apply_args(&args);
    logging::initialize(settings.log_destination, Path::new(LOG_FILE));

    if args.init_config {
        settings
            .save(&args.config)
            .with_context(|| format!("writing settings to {}", args.config.display()))?;
        println!("Settings written to {}", args.config.display());
        return Ok(());
    }

    let api_key = api_key_from_env();
    if api_key.is_none() {
        forge_warn!("No API key found in GEMINI_API_KEY or API_KEY");
    }
    forge_info!(
        "Starting with model={} google_search={} history={:?}",
        settings.model,
        settings.google_search,
        settings.history_file
    );

    let client = GeminiClient::new(settings.generation_settings(api_key));
    let engine = EngineHandle::new(Arc::new(client)).context("starting the generation engine")?;
    let history = HistoryStore::load(FileHistoryStorage::new(settings.history_file.clone()));
    let restored = history.items().to_vec();

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(
        engine,
        history,
        Box::new(Osc52Clipboard::stdout()),
        msg_tx.clone(),
    );

    thread::spawn(move || {
        while msg_tx.send(Msg::Tick { now_ms: now_ms() }).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });

    let line_rx = spawn_stdin_reader();

    let mut app = App::new(runner);
    app.dispatch(Msg::HistoryRestored(restored));
    app.redraw();
    app.run(&msg_rx, &line_rx);
    forge_info!("Exiting");
    Ok(())
}

/// `None` marks end of input.
fn spawn_stdin_reader() -> mpsc::Receiver<Option<String>> {
    let (line_tx, line_rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(Some(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    forge_warn!("Failed to read stdin: {}", err);
                    break;
                }
            }
        }
        let _ = line_tx.send(None);
    });
    line_rx
}

struct App<S: HistoryStorage> {
    state: AppState,
    runner: EffectRunner<S>,
    parser: InputParser,
    needs_render: bool,
}

impl<S: HistoryStorage> App<S> {
    fn new(runner: EffectRunner<S>) -> Self {
        Self {
            state: AppState::default(),
            runner,
            parser: InputParser::new(),
            needs_render: false,
        }
    }

    fn run(&mut self, msg_rx: &mpsc::Receiver<Msg>, line_rx: &mpsc::Receiver<Option<String>>) {
        loop {
            while let Ok(line) = line_rx.try_recv() {
                let Some(line) = line else {
                    return;
                };
                if !self.handle_line(&line) {
                    return;
                }
            }

            match msg_rx.recv_timeout(POLL_INTERVAL) {
                Ok(msg) => self.dispatch(msg),
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => return,
            }

            // Do not scroll away a multi-line field being typed.
            if self.needs_render && !self.parser.is_collecting() {
                self.redraw();
            }
        }
    }

    /// Returns `false` when the user asked to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        let Some(event) = self.parser.feed(line) else {
            if self.parser.is_collecting() {
                prompt("... ");
            } else {
                prompt("> ");
            }
            return true;
        };

        match event {
            AppEvent::Msg(msg) => self.dispatch(msg),
            AppEvent::UseHistory(position) => {
                let view = self.state.view();
                match view.history.get(position - 1) {
                    Some(row) => self.dispatch(Msg::HistorySelected(row.id.clone())),
                    None => notice(&format!("No history entry {position}")),
                }
            }
            AppEvent::Help => notice(HELP),
            AppEvent::Redraw => self.needs_render = true,
            AppEvent::Unknown(text) => {
                notice(&format!("Unknown command: {text} (type help)"));
            }
            AppEvent::Quit => return false,
        }
        if !self.needs_render {
            prompt("> ");
        }
        true
    }

    /// Runs `msg` and every follow-up message through `update`.
    fn dispatch(&mut self, msg: Msg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            if state.consume_dirty() {
                self.needs_render = true;
            }
            self.state = state;
            queue.extend(self.runner.run(effects));
        }
    }

    fn redraw(&mut self) {
        self.needs_render = false;
        let view = self.state.view();
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "\x1b[2J\x1b[H{}> ", render::render(&view));
        let _ = stdout.flush();
    }
}

fn notice(text: &str) {
    println!("{text}");
}

fn prompt(text: &str) {
    let mut stdout = io::stdout().lock();
    let _ = write!(stdout, "{text}");
    let _ = stdout.flush();
}
