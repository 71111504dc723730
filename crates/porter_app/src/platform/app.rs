use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use porter_core::{AppState, JobKind, JobStatus, Msg};
use porter_engine::EngineEvent;
use porter_logging::{porter_info, porter_warn};

use super::config::ClientConfig;
use super::effects::EffectRunner;
use super::logging;
use super::ui::commands::{self, ShellCommand};
use super::ui::render;
use crate::cli::{Cli, Command};

/// Everything the session loop reacts to, funnelled through one channel.
#[derive(Debug)]
pub enum AppEvent {
    Engine(EngineEvent),
    Line(String),
    InputClosed,
}

pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = ClientConfig::resolve(&cli.global)?;
    logging::initialize(config.log);
    porter_info!(
        "porter starting: base_url={} output_dir={:?}",
        config.base_url,
        config.output_dir
    );

    let (event_tx, event_rx) = mpsc::channel();
    let runner = EffectRunner::new(&config, event_tx.clone())?;
    let mut session = Session::new(runner, event_rx, io::stdout());

    match cli.command {
        Command::Run {
            kind,
            url,
            download,
        } => {
            let ok = session.run_once(kind, url, download)?;
            Ok(if ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Shell => {
            spawn_stdin_reader(event_tx);
            session.run_shell()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn spawn_stdin_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(AppEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    porter_warn!("stdin read failed: {}", err);
                    break;
                }
            }
        }
        let _ = tx.send(AppEvent::InputClosed);
    });
}

pub struct Session<W: Write> {
    state: AppState,
    runner: EffectRunner,
    events: mpsc::Receiver<AppEvent>,
    active: JobKind,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(runner: EffectRunner, events: mpsc::Receiver<AppEvent>, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            events,
            active: JobKind::Convert,
            out,
        }
    }

    /// Submits one URL and waits for the outcome. Returns whether everything succeeded.
    pub fn run_once(&mut self, kind: JobKind, url: String, download: bool) -> anyhow::Result<bool> {
        self.dispatch(kind, Msg::InputChanged(url))?;
        self.dispatch(kind, Msg::SubmitClicked)?;
        while self.state.job(kind).is_submitting() {
            self.pump_engine()?;
        }
        if self.state.job(kind).status() != &JobStatus::Succeeded {
            return Ok(false);
        }
        if !download {
            return Ok(true);
        }

        self.dispatch(kind, Msg::DownloadClicked)?;
        while self.state.job(kind).download_in_flight() {
            self.pump_engine()?;
        }
        Ok(self.state.job(kind).error().is_none())
    }

    pub fn run_shell(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "{}", commands::HELP)?;
        self.show_status()?;
        loop {
            let event = self.events.recv().context("event channel closed")?;
            match event {
                AppEvent::Engine(event) => self.apply_engine_event(event)?,
                AppEvent::Line(line) => match commands::parse(&line) {
                    Ok(ShellCommand::Quit) => break,
                    Ok(command) => self.execute(command)?,
                    Err(message) => writeln!(self.out, "{message}")?,
                },
                AppEvent::InputClosed => break,
            }
        }
        Ok(())
    }

    fn execute(&mut self, command: ShellCommand) -> anyhow::Result<()> {
        let kind = self.active;
        match command {
            ShellCommand::Use(next) => {
                self.active = next;
                self.print_job(next)?;
            }
            ShellCommand::Url(text) => self.dispatch(kind, Msg::InputChanged(text))?,
            ShellCommand::Submit => self.dispatch(kind, Msg::SubmitClicked)?,
            ShellCommand::Reset => self.dispatch(kind, Msg::ResetClicked)?,
            ShellCommand::Download => {
                if !self.state.job(kind).download_ready() {
                    writeln!(self.out, "nothing to download yet for {kind}")?;
                }
                self.dispatch(kind, Msg::DownloadClicked)?;
            }
            ShellCommand::Status => self.show_status()?,
            ShellCommand::Help => writeln!(self.out, "{}", commands::HELP)?,
            ShellCommand::Nothing | ShellCommand::Quit => {}
        }
        Ok(())
    }

    fn pump_engine(&mut self) -> anyhow::Result<()> {
        match self.events.recv().context("engine stopped unexpectedly")? {
            AppEvent::Engine(event) => self.apply_engine_event(event),
            AppEvent::Line(_) | AppEvent::InputClosed => Ok(()),
        }
    }

    fn apply_engine_event(&mut self, event: EngineEvent) -> anyhow::Result<()> {
        match self.runner.translate(event) {
            Some((kind, msg)) => self.dispatch(kind, msg),
            None => Ok(()),
        }
    }

    fn dispatch(&mut self, kind: JobKind, msg: Msg) -> anyhow::Result<()> {
        let effects = self.state.dispatch(kind, msg);
        self.runner.run(kind, effects);
        if self.state.job_mut(kind).consume_dirty() {
            self.print_job(kind)?;
        }
        Ok(())
    }

    fn show_status(&mut self) -> anyhow::Result<()> {
        for kind in JobKind::ALL {
            self.print_job(kind)?;
        }
        writeln!(self.out, "active: {}", self.active)?;
        Ok(())
    }

    fn print_job(&mut self, kind: JobKind) -> anyhow::Result<()> {
        let view = self.state.job(kind).view();
        for line in render::render(&view) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}
