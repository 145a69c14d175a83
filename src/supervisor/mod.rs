use std::io::{self, Write};
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use tokio::sync::mpsc;

use crate::catalog::{Station, StationCatalog};
use crate::command::{self, CommandIntent};
use crate::player::{Player, StreamFormat};
use crate::stream::Connector;

/// Playback intent resolved by the command loop.
#[derive(Clone, Debug)]
pub enum Event {
    /// Replace the active session with this station's stream.
    Tune(Station),
    /// Stop playback and terminate.
    Exit,
}

/// Session lifecycle of the supervisor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Idle,
    Connecting,
    Playing,
    Switching,
    Stopped,
}

/// One live connect-decode-play cycle.
#[derive(Clone, Debug)]
struct StreamSession {
    url: String,
    format: StreamFormat,
}

/// Owns the session state machine: opens stream connections, drives the
/// player, and serves command-loop events until exit.
///
/// At most one session is ever active; `switch` is the exclusive gate
/// for replacing it.
pub struct Supervisor<P, C> {
    player: P,
    connector: C,

    state: State,
    session: Option<StreamSession>,
}

impl<P: Player, C: Connector> Supervisor<P, C> {
    pub fn new(player: P, connector: C) -> Self {
        Self {
            player,
            connector,
            state: State::Idle,
            session: None,
        }
    }

    /// Plays the initial stream, then serves events until `Exit` or the
    /// command loop hangs up. Failure to play the initial stream is
    /// fatal: there is no session to fall back to.
    pub async fn run(
        mut self,
        initial_url: &str,
        mut events: mpsc::Receiver<Event>,
    ) -> anyhow::Result<()> {
        self.tune(initial_url)
            .with_context(|| format!("can't play initial stream {initial_url}"))?;

        while let Some(event) = events.recv().await {
            match event {
                Event::Tune(station) => self.switch(&station),
                Event::Exit => break,
            }
        }

        self.shutdown();

        Ok(())
    }

    fn switch(&mut self, station: &Station) {
        if self.session.is_some() {
            self.transition(State::Switching);
        }

        if let Err(err) = self.tune(&station.url) {
            log::error!("switch to {} failed: {err}", station.url);
            println!("Error fetching audio stream: {err}");

            // A failed switch never interrupts the session that was
            // playing: the new connection is attempted before the old
            // chain is torn down.
            let next = match &self.session {
                Some(session) => {
                    log::debug!("keeping session {}", session.url);
                    println!("Replaying the original stream.");
                    State::Playing
                }
                None => State::Idle,
            };

            self.transition(next);
        }
    }

    fn tune(&mut self, url: &str) -> anyhow::Result<()> {
        self.transition(State::Connecting);

        let source = self.connector.connect(url)?;
        let format = self.player.start(source)?;

        self.session = Some(StreamSession {
            url: url.to_string(),
            format,
        });
        self.transition(State::Playing);

        println!(
            "Now playing: {url} ({} Hz, {} channels)",
            format.sample_rate, format.channels
        );

        Ok(())
    }

    /// Safe to call any number of times.
    fn shutdown(&mut self) {
        if self.state == State::Stopped {
            return;
        }

        println!("Exiting the player...");

        self.player.stop();

        if let Some(session) = self.session.take() {
            log::debug!(
                "session {} ended ({} Hz, {} channels)",
                session.url,
                session.format.sample_rate,
                session.format.channels
            );
        }

        self.transition(State::Stopped);
    }

    fn transition(&mut self, next: State) {
        if self.state != next {
            log::debug!("supervisor state {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}

/// Spawns the blocking stdin reader.
///
/// Informational commands are served in place; playback intents go to
/// the supervisor over the events channel. The thread ends when the
/// user exits, stdin closes, or the supervisor goes away.
pub fn spawn_command_loop(
    catalog: Arc<StationCatalog>,
    events: mpsc::Sender<Event>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();

        loop {
            print!("Enter command: ");
            let _ = io::stdout().flush();

            let mut line = String::new();
            match stdin.read_line(&mut line) {
                Ok(0) | Err(_) => {
                    let _ = events.blocking_send(Event::Exit);
                    return;
                }
                Ok(_) => {}
            }

            if !serve_intent(CommandIntent::parse(&line), &catalog, &events) {
                return;
            }
        }
    })
}

/// Serves one intent. Returns `false` once the loop should end.
fn serve_intent(
    intent: CommandIntent,
    catalog: &StationCatalog,
    events: &mpsc::Sender<Event>,
) -> bool {
    match intent {
        CommandIntent::Help => command::print_help(),
        CommandIntent::Clear => command::clear_terminal(),
        CommandIntent::Stations => command::print_stations(catalog),
        CommandIntent::Play(name) => match catalog.lookup(&name) {
            Some(station) => {
                if events.blocking_send(Event::Tune(station.clone())).is_err() {
                    return false;
                }
            }
            None => println!("Station not found: {name}"),
        },
        CommandIntent::Exit => {
            let _ = events.blocking_send(Event::Exit);
            return false;
        }
        CommandIntent::Unknown => {}
    }

    true
}
