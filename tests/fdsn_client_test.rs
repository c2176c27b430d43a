use anyhow::Result;
use httpmock::prelude::*;
use quake_explorer::core::{EventCatalogService, StationInventoryService, WaveformService};
use quake_explorer::domain::model::WaveformRequest;
use quake_explorer::{resolve_parameters, FdsnClient, FetchError, ServiceEndpoints};

const SWISS_EVENTS: &str = "\
#EventID|Time|Latitude|Longitude|Depth/km|Author|Catalog|Contributor|ContributorID|MagType|Magnitude|MagAuthor|EventLocationName
smi:ch.ethz.sed/sc20ag/Event/2024aaaa|2024-06-02T14:03:11.250Z|46.31|7.49|7.2|SED|SED||1|MLhc|3.8|SED|Leukerbad VS
smi:ch.ethz.sed/sc20ag/Event/2024bbbb|2024-02-17T03:44:50.000Z|47.45|9.21|4.0|SED|SED||2|MLhc|3.5|SED|Wil SG
";

#[tokio::test]
async fn test_swiss_event_query_parameters() -> Result<()> {
    let server = MockServer::start();
    let event_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/fdsnws/event/1/query")
            .query_param("starttime", "2024-01-01T00:00:00")
            .query_param("endtime", "2024-12-31T23:59:59")
            .query_param("minmagnitude", "3.5")
            .query_param("maxmagnitude", "10.0")
            .query_param("format", "text");
        then.status(200)
            .header("Content-Type", "text/plain")
            .body(SWISS_EVENTS);
    });

    let client = FdsnClient::new(ServiceEndpoints::single(server.base_url()));
    let query = resolve_parameters("switzerland", 2024, "3.5")?.event_query();
    let events = client.fetch_events(&query).await?;

    event_mock.assert();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].description, "Leukerbad VS");
    assert_eq!(events[1].magnitude, 3.5);
    Ok(())
}

#[tokio::test]
async fn test_europe_query_sends_bounding_box() -> Result<()> {
    let server = MockServer::start();
    let event_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/fdsnws/event/1/query")
            .query_param("minlatitude", "38")
            .query_param("maxlatitude", "70")
            .query_param("minlongitude", "-15")
            .query_param("maxlongitude", "30")
            .query_param("minmagnitude", "5.0");
        then.status(204);
    });

    let client = FdsnClient::new(ServiceEndpoints::single(server.base_url()));
    let query = resolve_parameters("Europa", 2023, "5.0")?.event_query();
    let events = client.fetch_events(&query).await?;

    event_mock.assert();
    assert!(events.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_reported_with_status() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/fdsnws/event/1/query");
        then.status(503).body("Service Unavailable");
    });

    let client = FdsnClient::new(ServiceEndpoints::single(server.base_url()));
    let query = resolve_parameters("worldwide", 2024, "6.0")?.event_query();

    match client.fetch_events(&query).await {
        Err(FetchError::Status { status, url }) => {
            assert_eq!(status, 503);
            assert!(url.ends_with("/fdsnws/event/1/query"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_station_query() -> Result<()> {
    let server = MockServer::start();
    let station_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/fdsnws/station/1/query")
            .query_param("network", "S")
            .query_param("channel", "EHZ")
            .query_param("level", "station");
        then.status(200).body(
            "#Network|Station|Latitude|Longitude|Elevation|SiteName|StartTime|EndTime\n\
             S|KSKNZ|47.318|8.582|435.0|KS Kuesnacht|2019-05-01T00:00:00|\n",
        );
    });

    let client = FdsnClient::new(ServiceEndpoints::single(server.base_url()));
    let stations = client.fetch_stations("S", "EHZ").await?;

    station_mock.assert();
    assert_eq!(stations.len(), 1);
    assert_eq!(stations[0].station, "KSKNZ");
    assert!(stations[0].end_time.is_none());
    Ok(())
}

#[tokio::test]
async fn test_waveform_download_and_no_data() -> Result<()> {
    let server = MockServer::start();
    let data_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/fdsnws/dataselect/1/query")
            .query_param("network", "S")
            .query_param("station", "COSAV");
        then.status(200)
            .header("Content-Type", "application/vnd.fdsn.mseed")
            .body(vec![0u8; 512]);
    });
    let empty_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/fdsnws/dataselect/1/query")
            .query_param("station", "SENIN");
        then.status(204);
    });

    let client = FdsnClient::new(ServiceEndpoints::single(server.base_url()));
    let start = chrono::DateTime::parse_from_rfc3339("2024-06-02T14:03:11Z")?.to_utc();
    let request = |network: &str, station: &str| WaveformRequest {
        network: network.to_string(),
        station: station.to_string(),
        location: "*".to_string(),
        channel: "EH*".to_string(),
        start_time: start,
        end_time: start + chrono::Duration::seconds(90),
    };

    let stream = client.fetch_waveform(&request("S", "COSAV")).await?;
    let stream = stream.expect("COSAV has data");
    assert_eq!(stream.payload.len(), 512);
    assert_eq!(stream.station, "COSAV");

    assert!(client.fetch_waveform(&request("CH", "SENIN")).await?.is_none());

    data_mock.assert();
    empty_mock.assert();
    Ok(())
}
