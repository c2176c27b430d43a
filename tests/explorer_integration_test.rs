use anyhow::Result;
use httpmock::prelude::*;
use quake_explorer::core::{Renderer, Storage};
use quake_explorer::domain::model::Language;
use quake_explorer::domain::scene::TraceData;
use quake_explorer::{
    CascadeController, FdsnClient, Iasp91Model, ListStatus, LocalStorage,
    RegionChangePolicy, ServiceEndpoints, Session, TextRenderer,
};
use tempfile::TempDir;

const EVENTS: &str = "\
#EventID|Time|Latitude|Longitude|Depth/km|Author|Catalog|Contributor|ContributorID|MagType|Magnitude|MagAuthor|EventLocationName
smi:ch.ethz.sed/sc20ag/Event/2024cccc|2024-09-20T08:30:00.000Z|47.0|8.5|-0.5|SED|SED||1|MLhc|2.4|SED|Zug ZG
";

const CH_STATIONS: &str = "\
#Network|Station|Latitude|Longitude|Elevation|SiteName|StartTime|EndTime
CH|ZUR|47.369|8.580|700.0|Zurich, Degenried|2002-09-11T00:00:00|
CH|OLDST|46.0|7.0|500.0|Closed station|1999-01-01T00:00:00|2005-01-01T00:00:00
";

const S_STATIONS: &str = "\
#Network|Station|Latitude|Longitude|Elevation|SiteName|StartTime|EndTime
S|KSKNZ|47.318|8.582|435.0|KS Kuesnacht|2019-05-01T00:00:00|
S|GBIEL|47.140|7.250|440.0|Gymnasium Biel|2019-05-01T00:00:00|
";

fn mock_fdsn(server: &MockServer) -> (httpmock::Mock<'_>, httpmock::Mock<'_>) {
    server.mock(|when, then| {
        when.method(GET).path("/fdsnws/event/1/query");
        then.status(200).body(EVENTS);
    });
    let ch_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/fdsnws/station/1/query")
            .query_param("network", "CH");
        then.status(200).body(CH_STATIONS);
    });
    let s_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/fdsnws/station/1/query")
            .query_param("network", "S");
        then.status(200).body(S_STATIONS);
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/fdsnws/dataselect/1/query")
            .query_param("network", "S")
            .query_param("station", "KSKNZ");
        then.status(200).body(vec![7u8; 1024]);
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/fdsnws/dataselect/1/query")
            .query_param("station", "ZUR");
        then.status(204);
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/fdsnws/dataselect/1/query")
            .query_param("station", "GBIEL");
        then.status(204);
    });
    (ch_mock, s_mock)
}

#[tokio::test]
async fn test_catalog_outage_leaves_an_empty_list() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/fdsnws/event/1/query");
        then.status(500);
    });

    let client = FdsnClient::new(ServiceEndpoints::single(server.base_url()));
    let controller = CascadeController::new(client);
    let status = controller.subscribe();

    let state = controller.initial_state(Language::En, 2024).await?;

    assert_eq!(state.earthquakes.status, ListStatus::FetchFailed);
    assert!(state.earthquakes.is_empty());
    assert!(state.selected_earthquake().is_none());
    assert_eq!(*status.borrow(), ListStatus::FetchFailed);
    Ok(())
}

#[tokio::test]
async fn test_region_change_policy_controls_the_requery() -> Result<()> {
    let server = MockServer::start();
    let event_mock = server.mock(|when, then| {
        when.method(GET).path("/fdsnws/event/1/query");
        then.status(200).body(EVENTS);
    });
    let client = FdsnClient::new(ServiceEndpoints::single(server.base_url()));

    let reset_only =
        CascadeController::new(client.clone()).with_policy(RegionChangePolicy::ResetOnly);
    let state = reset_only.blank_state(Language::De, 2024);
    let state = reset_only.select_region(&state, "Schweiz").await?;
    assert_eq!(state.magnitude_choices, vec!["2.0", "2.5", "3.5", "4.0"]);
    assert_eq!(event_mock.hits(), 0);

    let requery = CascadeController::new(client);
    let state = requery.select_region(&state, "Schweiz").await?;
    assert_eq!(event_mock.hits(), 1);
    assert_eq!(state.earthquakes.status, ListStatus::Ready { count: 1 });
    assert_eq!(state.earthquakes.selected, Some(0));
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_session_against_mock_services() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let (ch_mock, s_mock) = mock_fdsn(&server);

    let client = FdsnClient::new(ServiceEndpoints::single(server.base_url()));
    let controller = CascadeController::new(client.clone());
    let session = Session::new(client.clone(), client, Iasp91Model::default());

    let state = controller.blank_state(Language::En, 2024);
    let state = controller.on_region_changed(&state, "Switzerland")?;
    let state = controller.on_station_selected(&state, "KSKNZ")?;
    let state = controller.on_magnitude_changed(&state, "2.0").await?;
    assert_eq!(state.earthquakes.lines.len(), 1);
    assert!(state.earthquakes.lines[0].starts_with("Magnitude 2.4"));

    // closed stations never reach the inventory
    let inventory = session.inventory().await?;
    assert_eq!(inventory.len(), 3);
    assert!(inventory.iter().all(|s| s.station != "OLDST"));

    let scene = session.map_scene(&state).await?;
    assert_eq!(scene.stations.len(), 2);
    assert!(scene.stations.iter().any(|m| m.code == "KSKNZ" && m.selected));

    let report = session.seismogram_report(&state).await?;
    assert_eq!(report.depth_km, 0.0);
    assert!(matches!(report.school.data, TraceData::Available { bytes: 1024, .. }));
    assert!(report.school.first_p.is_some());
    let reference = report.reference.as_ref().expect("KSKNZ is paired with ZUR");
    assert_eq!(reference.station, "ZUR");
    assert_eq!(reference.data, TraceData::NoData);

    let section = session.record_section(&state).await?;
    assert_eq!(section.traces.len(), 1);
    assert_eq!(section.traces[0].label, "S.KSKNZ");
    assert_eq!(section.stations_without_data, vec!["S.GBIEL".to_string()]);
    assert!(section.y_limit.is_some());

    // the inventory is fetched once per session
    ch_mock.assert_hits(1);
    s_mock.assert_hits(1);

    let renderer = TextRenderer::new();
    let storage = LocalStorage::new(output_path.clone());
    let artifact = renderer.render_section(&section)?;
    let written = storage
        .write_file(&artifact.file_name, artifact.content.as_bytes())
        .await?;

    let full_path = std::path::Path::new(&output_path).join("waveform_section.csv");
    assert_eq!(std::path::Path::new(&written), full_path.as_path());
    let csv_content = std::fs::read_to_string(&full_path)?;
    assert!(csv_content.contains("S.KSKNZ,S,"));

    let artifact = renderer.render_seismograms(&report)?;
    assert!(artifact
        .content
        .contains("No data available for station ZUR at Swiss network"));
    Ok(())
}
