//! Fetches and parses every configured station, collecting the ones that succeed.

use std::collections::BTreeMap;

use futures::future::join_all;
use indicatif::ProgressBar;
use log::{info, warn};

use crate::{
    download::ReportSource,
    error::Result,
    reading::{parse_report, Field, StationRecord},
    window::ObservationWindow,
};

/// Station id to parsed record. Stations that failed are simply absent.
pub type Aggregate = BTreeMap<String, StationRecord>;

/// Runs fetch and parse for all `stations` concurrently and merges the results.
///
/// A failing station is logged and omitted; it never affects the others.
pub async fn collect_stations<S: ReportSource>(
    source: &S,
    stations: &[String],
    window: &ObservationWindow,
    progress_bar: &ProgressBar,
) -> Aggregate {
    let tasks = stations.iter().map(|station| async move {
        let result = process_station(source, station, window).await;
        progress_bar.inc(1);
        (station, result)
    });

    let mut aggregate = Aggregate::new();
    for (station, result) in join_all(tasks).await {
        match result {
            Ok(record) => {
                info!("{}", summarise(station, &record));
                aggregate.insert(station.clone(), record);
            }
            Err(e) => warn!(
                "Station {} at {}: {} failed: {}",
                station,
                window,
                e.stage(),
                e
            ),
        }
    }

    info!(
        "Collected {} of {} stations for {}",
        aggregate.len(),
        stations.len(),
        window
    );

    aggregate
}

/// One-line description of a parsed station for the run log.
fn summarise(station: &str, record: &StationRecord) -> String {
    let surface = match record.levels.surface() {
        Some(level) => match level.record.value(Field::Temperature) {
            Some(temp) => format!("surface {} hPa {:.1} C", level.pressure, temp),
            None => format!("surface {} hPa", level.pressure),
        },
        None => "no levels".to_string(),
    };

    format!(
        "Station {} {} ({}): {} levels, {} indices, {}",
        station,
        record.name,
        record.indices.get("TIME").unwrap_or("unknown time"),
        record.levels.len(),
        record.indices.len(),
        surface
    )
}

async fn process_station<S: ReportSource>(
    source: &S,
    station: &str,
    window: &ObservationWindow,
) -> Result<StationRecord> {
    let page = source.fetch(station, window).await?;
    parse_report(&page)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{error::SoundingError, reading::station::tests::REPORT};

    /// Serves canned pages; stations without a page fail as unreachable.
    pub(crate) struct StubSource {
        pub pages: HashMap<String, String>,
    }

    impl StubSource {
        pub(crate) fn new(pages: &[(&str, &str)]) -> Self {
            StubSource {
                pages: pages
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl ReportSource for StubSource {
        async fn fetch(&self, station: &str, _window: &ObservationWindow) -> Result<String> {
            self.pages
                .get(station)
                .cloned()
                .ok_or_else(|| SoundingError::HttpStatus {
                    url: format!("stub://{}", station),
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                })
        }
    }

    pub(crate) fn window() -> ObservationWindow {
        ObservationWindow {
            year: "2018".to_string(),
            month: "02".to_string(),
            day_hour: "1800".to_string(),
        }
    }

    fn stations(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn should_omit_station_whose_fetch_fails() {
        let source = StubSource::new(&[("47778", REPORT)]);
        let ids = stations(&["47401", "47778"]);
        let pb = ProgressBar::hidden();

        let aggregate = collect_stations(&source, &ids, &window(), &pb).await;

        assert_eq!(aggregate.len(), 1);
        assert!(!aggregate.contains_key("47401"));
        assert_eq!(aggregate["47778"], parse_report(REPORT).unwrap());
        assert_eq!(pb.position(), 2);
    }

    #[tokio::test]
    async fn should_omit_station_whose_page_lacks_blocks() {
        let broken = "<H2>47401 Wakkanai Wakkanai Observations</H2>\n<PRE>\n-\n-\n-\n-\n 1000.0 1 2 3 4 5 6\n</PRE>";
        let source = StubSource::new(&[("47778", REPORT), ("47401", broken)]);
        let ids = stations(&["47778", "47401"]);

        let aggregate = collect_stations(&source, &ids, &window(), &ProgressBar::hidden()).await;

        assert_eq!(aggregate.keys().collect::<Vec<_>>(), vec!["47778"]);

        let record = &aggregate["47778"];
        assert_eq!(record.name, "Shionomisaki");
        assert_eq!(record.indices.len(), 25);
        assert_eq!(record.levels.len(), 5);

        let upper = record.levels.get("100.0").unwrap();
        assert_eq!(upper.raw(Field::Height), Some("16580"));
        assert_eq!(upper.raw(Field::DewPoint), None);
        assert_eq!(upper.raw(Field::VirtualPotentialTemp), Some("386.1"));

        let surface = record.levels.get("1020.0").unwrap();
        assert_eq!(surface.raw(Field::DewPoint), Some("0.6"));
    }

    #[test]
    fn should_summarise_station() {
        let record = parse_report(REPORT).unwrap();

        assert_eq!(
            summarise("47778", &record),
            "Station 47778 Shionomisaki (180218/0000): 5 levels, 25 indices, surface 1020.0 hPa 11.6 C"
        );
    }

    #[test]
    fn should_summarise_station_without_levels() {
        let page = "<H2>47401 WKN Wakkanai</H2><PRE>\n</PRE><PRE>\n</PRE>";
        let record = parse_report(page).unwrap();

        assert_eq!(
            summarise("47401", &record),
            "Station 47401 Wakkanai (unknown time): 0 levels, 0 indices, no levels"
        );
    }

    #[tokio::test]
    async fn should_return_empty_aggregate_when_all_fail() {
        let source = StubSource::new(&[]);
        let ids = stations(&["47401", "47412"]);

        let aggregate = collect_stations(&source, &ids, &window(), &ProgressBar::hidden()).await;

        assert!(aggregate.is_empty());
    }
}
