use std::process::Command;

use crate::catalog::StationCatalog;

/// One classified line of user input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CommandIntent {
    Help,
    Clear,
    Stations,
    Play(String),
    Exit,
    Unknown,
}

impl CommandIntent {
    /// Classifies one input line.
    ///
    /// The `play` command word must appear as typed; the rest of the
    /// line, with internal whitespace removed, is the requested station
    /// name. Anything unrecognized is `Unknown` and produces no output.
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "help" => Self::Help,
            "clear" => Self::Clear,
            "stations" => Self::Stations,
            "exit" | "quit" | "q" => Self::Exit,
            line => {
                let mut words = line.split_whitespace();

                match words.next() {
                    Some("play") => Self::Play(words.collect()),
                    _ => Self::Unknown,
                }
            }
        }
    }
}

pub fn print_help() {
    print!(
        "
Commands:
help:            Shows a list of all commands in the player
clear:           Wipes out the terminal
stations:        Displays a list of all stations available
play (station):  Stream from the radio station selected
exit:            Quit the application

"
    );
}

pub fn print_stations(catalog: &StationCatalog) {
    let separator = "-".repeat(150);

    println!();
    println!("The following radios are available at the moment:");

    for station in catalog.stations() {
        println!("{separator}");
        println!();
        println!(
            "Radio Name: {}, Data Type: {}, Genre: {}, Url: {}",
            station.name, station.media_type, station.genre, station.url
        );
        println!();
    }

    println!("{separator}");
}

pub fn clear_terminal() {
    let mut cmd = if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/c", "cls"]);
        cmd
    } else {
        Command::new("clear")
    };

    // Inherits stdout; a missing clear binary is not worth failing over.
    if let Err(err) = cmd.status() {
        log::debug!("can't clear terminal: {err}");
    }
}
