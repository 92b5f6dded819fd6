use std::fs;
use std::sync::Arc;

use inmaps_router::adapters::inbound::{handle_line, serve_json_lines, WireResponse};
use inmaps_router::adapters::outbound::{init_console_logger, FilesystemVenueSource};
use inmaps_router::application::{RouteStatus, RoutingService};
use inmaps_router::common::{ApplicationError, DomainError};
use inmaps_router::domains::routing::*;
use serde_json::Value;
use tempfile::tempdir;

const BOOTHS_JSON: &str = r#"[
  { "name": "Hall", "description": "whole floor",
    "area": { "start": { "x": 0, "y": 0 }, "end": { "x": 250, "y": 250 } } },
  { "name": "Booth A", "description": "Coffee", "type": "booth",
    "area": { "start": { "x": 150, "y": 100 }, "end": { "x": 250, "y": 150 } } },
  { "name": "Stage", "description": "", "type": "obstacle",
    "area": { "start": { "x": 50, "y": 50 }, "end": { "x": 150, "y": 100 } } }
]"#;

fn venue_dir() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("booths.json"), BOOTHS_JSON).unwrap();
    dir
}

fn service(dir: &tempfile::TempDir) -> RoutingService {
    let source = FilesystemVenueSource::new(Some(dir.path().to_path_buf()));
    let logger = init_console_logger();
    RoutingService::load(&source, "booths.json", 50, BlockingPolicy::default(), logger).unwrap()
}

#[test]
fn test_filesystem_source_loads_areas() {
    let dir = venue_dir();
    let source = FilesystemVenueSource::new(Some(dir.path().to_path_buf()));

    let areas = source.load_areas("booths.json").unwrap();
    assert_eq!(areas.len(), 3);
    assert_eq!(areas[0].kind, AreaKind::Booth);
    assert_eq!(areas[1].description, "Coffee");
    assert_eq!(areas[1].center(), Position2D { x: 200.0, y: 125.0 });
    assert_eq!(areas[2].kind, AreaKind::Obstacle);
}

#[test]
fn test_save_and_load_areas() {
    let dir = tempdir().unwrap();
    let mut base = dir.path().to_path_buf();
    base.push("nested");
    let source = FilesystemVenueSource::new(Some(base));

    let areas = vec![
        VenueArea::booth("Booth A", (0, 0), (100, 50)).with_description("Coffee"),
        VenueArea::obstacle("Pillar", (10, 10), (20, 20)),
    ];
    source.save_areas("venue.json", &areas).unwrap();
    assert_eq!(source.load_areas("venue.json").unwrap(), areas);
}

#[test]
fn test_missing_file_returns_infrastructure_error() {
    let dir = tempdir().unwrap();
    let source = FilesystemVenueSource::new(Some(dir.path().to_path_buf()));
    assert!(matches!(
        source.load_areas("does_not_exist.json"),
        Err(DomainError::InfrastructureError(_))
    ));
}

#[test]
fn test_malformed_file_returns_serialization_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bad.json"), r#"[{ "name": "Booth A" }]"#).unwrap();
    let source = FilesystemVenueSource::new(Some(dir.path().to_path_buf()));
    assert!(matches!(
        source.load_areas("bad.json"),
        Err(DomainError::SerializationError(_))
    ));
}

#[test]
fn test_service_load_rejects_invalid_cell_size() {
    let dir = venue_dir();
    let source = FilesystemVenueSource::new(Some(dir.path().to_path_buf()));
    let logger = init_console_logger();
    let result = RoutingService::load(&source, "booths.json", 0, BlockingPolicy::default(), logger);
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InvalidConfiguration { .. }))
    ));
}

#[test]
fn test_handle_line_path_request() {
    let dir = venue_dir();
    let service = service(&dir);

    let line = r#"{"op":"path","from":[0,0],"to":" booth a ","request_id":"r1"}"#;
    let response = handle_line(&service, line);
    match response {
        WireResponse::Route(route) => {
            assert_eq!(route.request_id, "r1");
            assert_eq!(route.status, RouteStatus::Ok);
            assert_eq!(route.path.first(), Some(&(0, 0)));
            assert_eq!(route.path.last(), Some(&(4, 2)));
        }
        other => panic!("Expected route response, got {:?}", other),
    }

    // the original client sent `from_`
    let legacy = handle_line(&service, r#"{"op":"path","from_":[0,0],"to":"Booth A"}"#);
    assert!(matches!(legacy, WireResponse::Route(ref r) if r.status == RouteStatus::Ok));
}

#[test]
fn test_handle_line_area_listing() {
    let dir = venue_dir();
    let service = service(&dir);

    match handle_line(&service, r#"{"op":"areas"}"#) {
        WireResponse::Areas { areas } => {
            assert_eq!(areas.len(), 3);
            assert_eq!(areas[1].id, 1);
            assert_eq!(areas[1].name, "Booth A");
            assert_eq!(areas[1].center, Position2D { x: 200.0, y: 125.0 });
        }
        other => panic!("Expected areas response, got {:?}", other),
    }

    assert!(matches!(
        handle_line(&service, r#"{"op":"area","id":2}"#),
        WireResponse::Area { ref area } if area.name == "Stage"
    ));
    assert!(matches!(
        handle_line(&service, r#"{"op":"area","id":9}"#),
        WireResponse::Error { status: RouteStatus::NotFound, .. }
    ));
}

#[test]
fn test_handle_line_rejects_malformed_input() {
    let dir = venue_dir();
    let service = service(&dir);
    for line in ["not json", r#"{"op":"teleport"}"#, r#"{"op":"path","to":"Booth A"}"#] {
        assert!(matches!(
            handle_line(&service, line),
            WireResponse::Error { status: RouteStatus::InvalidRequest, .. }
        ));
    }
}

#[tokio::test]
async fn test_serve_json_lines_answers_each_line() {
    let dir = venue_dir();
    let service = service(&dir);
    let input = concat!(
        r#"{"op":"path","from":[0,0],"to":"Booth A"}"#,
        "\n\n",
        r#"{"op":"path","from":[0,0],"to":"Nowhere"}"#,
        "\n",
        r#"{"op":"areas"}"#,
        "\n"
    );
    let mut output = Vec::new();

    let handled = serve_json_lines(&service, input.as_bytes(), &mut output).await.unwrap();
    assert_eq!(handled, 3);

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["status"], "ok");
    assert_eq!(lines[0]["path"][0], serde_json::json!([0, 0]));
    assert_eq!(lines[1]["status"], "not_found");
    assert_eq!(lines[1]["path"], serde_json::json!([]));
    assert!(lines[1]["error"].is_string());
    assert_eq!(lines[2]["areas"][2]["type"], "obstacle");
}

#[test]
fn test_shared_context_serves_multiple_services() {
    let dir = venue_dir();
    let first = service(&dir);
    let context = Arc::new(first.context().clone());
    let second = RoutingService::new(context, init_console_logger());
    assert_eq!(second.context().grid(), first.context().grid());
}

#[test]
fn test_data_dir_prefers_venue_data_dir_env() {
    let dir = venue_dir();
    std::env::set_var("VENUE_DATA_DIR", dir.path());
    let source = FilesystemVenueSource::new(None);
    std::env::remove_var("VENUE_DATA_DIR");

    assert_eq!(source.base(), dir.path());
    assert_eq!(source.load_areas("booths.json").unwrap().len(), 3);

    // without the variable the checkout's resources/venue is next in line
    let fallback = FilesystemVenueSource::new(None);
    assert_eq!(fallback.base(), std::path::Path::new("resources/venue"));
    assert!(!fallback.load_areas("booths.json").unwrap().is_empty());
}

#[test]
fn test_explicit_data_dir_is_used_as_is() {
    let dir = venue_dir();
    let source = FilesystemVenueSource::new(Some(dir.path().join("nested")));
    assert_eq!(source.base(), dir.path().join("nested"));
}
