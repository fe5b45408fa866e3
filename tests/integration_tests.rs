use httpmock::prelude::*;
use passenger_etl::{
    CliConfig, EtlEngine, EtlError, LocalStorage, PassengerPipeline, RunId, RunState,
};
use tempfile::TempDir;

fn config_for(server: &MockServer, output_path: &str) -> CliConfig {
    CliConfig {
        base_url: server.url("/v1/passenger"),
        page_size: 10,
        output_path: output_path.to_string(),
        verbose: false,
        log_json: false,
    }
}

fn mock_page(server: &MockServer, page: u32, body: serde_json::Value) -> httpmock::Mock<'_> {
    server.mock(move |when, then| {
        when.method(GET)
            .path("/v1/passenger")
            .query_param("page", page.to_string())
            .query_param("size", "10");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(body);
    })
}

#[tokio::test]
async fn end_to_end_two_pages_to_csv() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("passengers.csv");
    let output_path = output_path.to_str().unwrap();

    let server = MockServer::start();
    let p0 = mock_page(
        &server,
        0,
        serde_json::json!({
            "totalPages": 2,
            "data": [
                {"_id": "1", "name": "Alice", "trips": 5, "airline": [{"id": 9}]},
                {"_id": "2", "name": "Bob", "trips": 0}
            ]
        }),
    );
    let p1 = mock_page(
        &server,
        1,
        serde_json::json!({
            "totalPages": 2,
            "data": [{"_id": "3", "name": "Cara", "trips": 12, "__v": 0}]
        }),
    );

    let config = config_for(&server, output_path);
    let pipeline = PassengerPipeline::new(LocalStorage::new(), config);
    let engine = EtlEngine::new(pipeline);

    let report = engine.run(RunId::new("it-run-1")).await.unwrap();

    p0.assert();
    p1.assert();
    assert_eq!(report.records_loaded, 3);
    assert_eq!(report.final_state, RunState::Done);
    assert_eq!(report.output_path, output_path);

    let written = std::fs::read_to_string(output_path).unwrap();
    assert_eq!(
        written,
        "_id,name,trips\n1,Alice,5\n2,Bob,0\n3,Cara,12\n"
    );
}

#[tokio::test]
async fn failed_middle_page_leaves_a_gap_not_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("passengers.csv");
    let output_path = output_path.to_str().unwrap();

    let server = MockServer::start();
    mock_page(
        &server,
        0,
        serde_json::json!({
            "totalPages": 3,
            "data": [{"_id": "1", "name": "Alice", "trips": 5}]
        }),
    );
    server.mock(|when, then| {
        when.method(GET)
            .path("/v1/passenger")
            .query_param("page", "1")
            .query_param("size", "10");
        then.status(500);
    });
    mock_page(
        &server,
        2,
        serde_json::json!({
            "totalPages": 3,
            "data": [{"_id": "3", "name": "Cara", "trips": 12}]
        }),
    );

    let config = config_for(&server, output_path);
    let engine = EtlEngine::new(PassengerPipeline::new(LocalStorage::new(), config));

    let report = engine.run(RunId::new("it-run-2")).await.unwrap();

    assert_eq!(report.records_loaded, 2);
    let written = std::fs::read_to_string(output_path).unwrap();
    assert_eq!(written, "_id,name,trips\n1,Alice,5\n3,Cara,12\n");
}

#[tokio::test]
async fn page_0_failure_degrades_to_an_empty_csv() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("passengers.csv");
    let output_path = output_path.to_str().unwrap();

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/v1/passenger");
        then.status(500);
    });

    let config = config_for(&server, output_path);
    let engine = EtlEngine::new(PassengerPipeline::new(LocalStorage::new(), config));

    let report = engine.run(RunId::new("it-run-3")).await.unwrap();

    // only page 0 is requested when the page count never arrives
    mock.assert_hits(1);
    assert_eq!(report.records_loaded, 0);
    let written = std::fs::read_to_string(output_path).unwrap();
    assert_eq!(written, "_id,name,trips\n");
}

#[tokio::test]
async fn malformed_record_aborts_the_run_before_any_write() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("passengers.csv");
    let output_path = output_path.to_str().unwrap();

    let server = MockServer::start();
    mock_page(
        &server,
        0,
        serde_json::json!({
            "totalPages": 1,
            "data": [{"_id": "1", "name": "Alice"}]
        }),
    );

    let config = config_for(&server, output_path);
    let engine = EtlEngine::new(PassengerPipeline::new(LocalStorage::new(), config));

    let err = engine.run(RunId::new("it-run-4")).await.unwrap_err();

    assert!(matches!(
        err,
        EtlError::MissingField {
            field: "trips",
            record: 0
        }
    ));
    assert!(!std::path::Path::new(output_path).exists());
}
