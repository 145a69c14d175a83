use anyhow::Context;
use futures::future::BoxFuture;
use reqwest::ClientBuilder;

use crate::catalog::{Station, SUPPORTED_MEDIA_TYPE};

use super::Directory;

const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const TITLE_CELL: &str = r#"<td id="stream-title0">"#;
const CONTENT_TYPE_CELL: &str = r#"<td id="content-type0">"#;
const GENRE_CELL: &str = r#"<td id="stream-genre0">"#;
const LINK_CELL: &str = r#"<td><a href=""#;
const CELL_END: &str = "</td>";

/// Scrapes station records from an icecast status page.
pub struct IcecastDirectory {
    url: String,
    client: reqwest::Client,
}

impl IcecastDirectory {
    pub fn new(url: &str) -> Self {
        let client = ClientBuilder::new()
            .user_agent(APP_USER_AGENT)
            .build()
            .expect("can't build client");

        Self {
            url: url.to_string(),
            client,
        }
    }
}

impl Directory for IcecastDirectory {
    fn fetch(&self) -> BoxFuture<anyhow::Result<Vec<Station>>> {
        let url = self.url.clone();
        let client = self.client.clone();

        Box::pin(async move {
            let body = client
                .get(&url)
                .send()
                .await
                .context("get directory page")?
                .error_for_status()
                .context("directory page status")?
                .text()
                .await
                .context("read directory page")?;

            let stations = parse_status_page(&body);
            log::debug!("parsed {} stations from {}", stations.len(), url);

            Ok(stations)
        })
    }
}

fn parse_status_page(body: &str) -> Vec<Station> {
    let mut builder = RecordBuilder::default();
    let mut stations = vec![];

    for line in body.lines() {
        if let Some(station) = builder.push_line(line.trim()) {
            stations.push(station);
        }
    }

    stations
}

/// Accumulates the fields of one station record while walking the page.
///
/// Each known table cell fills one field; once all four are present the
/// record is flushed and the accumulator resets for the next station.
/// Records declaring an unsupported media type are discarded on flush.
#[derive(Default)]
struct RecordBuilder {
    title: Option<String>,
    media_type: Option<String>,
    genre: Option<String>,
    url: Option<String>,
}

impl RecordBuilder {
    fn push_line(&mut self, line: &str) -> Option<Station> {
        if let Some(rest) = line.strip_prefix(TITLE_CELL) {
            self.title = Some(strip_cell(rest));
        } else if let Some(rest) = line.strip_prefix(CONTENT_TYPE_CELL) {
            self.media_type = Some(strip_cell(rest));
        } else if let Some(rest) = line.strip_prefix(GENRE_CELL) {
            self.genre = Some(strip_cell(rest));
        } else if let Some(rest) = line.strip_prefix(LINK_CELL) {
            self.url = rest.split_once("\">").map(|(url, _)| url.to_string());
        }

        self.flush()
    }

    fn flush(&mut self) -> Option<Station> {
        let complete = self.title.is_some()
            && self.media_type.is_some()
            && self.genre.is_some()
            && self.url.is_some();

        if !complete {
            return None;
        }

        let station = Station {
            name: self.title.take()?,
            media_type: self.media_type.take()?,
            genre: self.genre.take()?,
            url: self.url.take()?,
        };

        *self = Self::default();

        if station.media_type != SUPPORTED_MEDIA_TYPE {
            log::debug!("skipping station {} with media type {}", station.name, station.media_type);
            return None;
        }

        Some(station)
    }
}

fn strip_cell(rest: &str) -> String {
    rest.strip_suffix(CELL_END).unwrap_or(rest).to_string()
}
