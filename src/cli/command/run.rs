//! One full run: resolve the window, collect every station, publish once.

use anyhow::{Context, Result};
use log::{info, warn};

use crate::{
    aggregate::collect_stations,
    cli::{create_progress_bar, create_spinner, Cli},
    download::{HttpReportSource, ReportSource},
    publish::{publish, ObjectStore},
    window::ObservationWindow,
};

pub async fn run(cli: &Cli) -> Result<Vec<String>> {
    let window = ObservationWindow::latest(cli.lag_hours)?;
    let source = HttpReportSource::new(cli.fetch_config())?;
    let destination = cli.destination()?;
    info!("Fetching soundings for {}, publishing to {}", window, destination);

    run_with(&source, &destination, &cli.stations, &window).await
}

async fn run_with<S: ReportSource, O: ObjectStore>(
    source: &S,
    store: &O,
    stations: &[String],
    window: &ObservationWindow,
) -> Result<Vec<String>> {
    let bar = create_progress_bar(stations.len() as u64, "Fetching stations...".to_string());
    let aggregate = collect_stations(source, stations, window, &bar).await;
    bar.finish_with_message(format!("{} stations collected", aggregate.len()));

    if aggregate.is_empty() {
        warn!("No station reported for {}", window);
    }

    let spinner = create_spinner("Publishing...".to_string());
    let keys = publish(store, &aggregate, window)
        .await
        .with_context(|| format!("Failed to publish soundings for {}", window))?;
    spinner.finish_with_message("Published");

    Ok(keys)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::{fs, io::Read};

    use flate2::read::GzDecoder;
    use tempfile::TempDir;

    use super::*;
    use crate::{
        aggregate::tests::{window, StubSource},
        publish::{store::LocalStore, CURRENT_KEY},
        reading::station::tests::REPORT,
    };

    const NO_INDICES: &str = "<H2>47646 Tateno Tateno Observations at 00Z 18 Feb 2018</H2>
<PRE>
-----------------------------------------------------------------------------
   PRES   HGHT   TEMP   DWPT   RELH   MIXR   DRCT   SKNT   THTA   THTE   THTV
    hPa     m      C      C      %    g/kg    deg   knot     K      K      K
-----------------------------------------------------------------------------
 1019.0     31    3.0   -6.0     52   2.44    330      4  274.6  281.6  275.0
</PRE>";

    #[tokio::test]
    async fn should_publish_only_well_formed_station() {
        let tmp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(tmp_dir.path());
        let source = StubSource::new(&[("47778", REPORT), ("47646", NO_INDICES)]);
        let stations = vec!["47646".to_string(), "47778".to_string()];

        let keys = run_with(&source, &store, &stations, &window()).await.unwrap();

        assert_eq!(keys[0], "201802/sounding-2018021800.json.gz");

        let mut text = String::new();
        let bytes = fs::read(store.path_for(CURRENT_KEY)).unwrap();
        GzDecoder::new(&bytes[..]).read_to_string(&mut text).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();

        let stations = json.as_object().unwrap();
        assert_eq!(stations.len(), 1);
        let record = &stations["47778"];
        assert_eq!(record["name"], "Shionomisaki");
        assert_eq!(record["indices"].as_object().unwrap().len(), 25);

        let levels = record["levels"].as_object().unwrap();
        assert_eq!(levels.len(), 5);
        assert!(levels.values().all(|v| v.as_array().unwrap().len() == 10));
        assert_eq!(
            levels["70.0"],
            serde_json::json!(["18690", "-63.9", null, null, null, "260", "31", "424.6", null, "424.6"])
        );
    }

    #[tokio::test]
    async fn should_fail_run_when_publish_fails() {
        let tmp_dir = TempDir::new().unwrap();
        let file = tmp_dir.path().join("occupied");
        fs::write(&file, b"").unwrap();
        let store = LocalStore::new(&file);
        let source = StubSource::new(&[("47778", REPORT)]);

        let err = run_with(&source, &store, &["47778".to_string()], &window())
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Failed to publish soundings"));
    }
}
