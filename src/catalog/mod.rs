/// The only stream encoding the player can decode. Records advertising
/// anything else never enter the catalog.
pub const SUPPORTED_MEDIA_TYPE: &str = "audio/mpeg";

/// One advertised stream endpoint.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Station {
    pub name: String,
    pub media_type: String,
    pub genre: String,
    pub url: String,
}

impl Station {
    fn is_well_formed(&self) -> bool {
        !self.name.is_empty() && !self.url.is_empty() && self.media_type == SUPPORTED_MEDIA_TYPE
    }
}

/// Immutable station list in discovery order.
///
/// Built once at startup from scraped records; read-only afterwards.
pub struct StationCatalog {
    stations: Vec<Station>,
}

impl StationCatalog {
    /// Builds the catalog, dropping records that violate the `Station`
    /// invariants (empty name or url, unsupported media type).
    pub fn new<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Station>,
    {
        let stations = records
            .into_iter()
            .filter(|station| {
                if !station.is_well_formed() {
                    log::debug!("dropping malformed station record: {station:?}");
                }

                station.is_well_formed()
            })
            .collect();

        Self { stations }
    }

    /// Full ordered sequence, for display.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Finds a station by name, ignoring case and whitespace. The first
    /// match in catalog order wins.
    pub fn lookup(&self, name: &str) -> Option<&Station> {
        let target = normalize(name);

        self.stations
            .iter()
            .find(|station| normalize(&station.name) == target)
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{Station, StationCatalog};

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let catalog = StationCatalog::new(vec![new_station("Classic FM"), new_station("Smooth")]);

        let expected = catalog.lookup("Classic FM").cloned();
        assert!(expected.is_some());

        assert_eq!(catalog.lookup("classicfm").cloned(), expected);
        assert_eq!(catalog.lookup("CLASSIC FM").cloned(), expected);
        assert_eq!(catalog.lookup("  classic\tfm  ").cloned(), expected);
    }

    #[test]
    fn lookup_misses_unknown_name() {
        let catalog = StationCatalog::new(vec![new_station("Classic FM")]);

        assert!(catalog.lookup("unknownstation").is_none());
        assert!(catalog.lookup("").is_none());
    }

    #[test]
    fn lookup_prefers_first_match() {
        let mut first = new_station("Classic FM");
        first.url = "https://host/first".to_string();

        let mut second = new_station("classicfm");
        second.url = "https://host/second".to_string();

        let catalog = StationCatalog::new(vec![first.clone(), second]);

        assert_eq!(catalog.lookup("ClassicFM"), Some(&first));
    }

    #[test]
    fn rejects_malformed_records() {
        let mut nameless = new_station("");
        nameless.url = "https://host/nameless".to_string();

        let mut urlless = new_station("Urlless");
        urlless.url = String::new();

        let mut aac = new_station("Aac");
        aac.media_type = "audio/aac".to_string();

        let catalog = StationCatalog::new(vec![nameless, urlless, aac, new_station("Smooth")]);

        assert_eq!(catalog.stations().len(), 1);
        assert_eq!(catalog.stations()[0].name, "Smooth");
    }

    #[test]
    fn preserves_discovery_order() {
        let names = ["Classic FM", "Smooth", "Capital", "Heart"];
        let catalog = StationCatalog::new(names.iter().map(|name| new_station(name)));

        let listed: Vec<_> = catalog
            .stations()
            .iter()
            .map(|station| station.name.as_str())
            .collect();

        assert_eq!(listed, names);
    }

    fn new_station(name: &str) -> Station {
        Station {
            name: name.to_string(),
            media_type: "audio/mpeg".to_string(),
            genre: "Various".to_string(),
            url: format!("https://host/{}", name.replace(' ', "")),
        }
    }
}
