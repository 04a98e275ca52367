//! Admin console against a mock server and against a live twin.

#![cfg(feature = "console")]

use httpmock::prelude::*;
use serde_json::json;

use grid_twin::console::{Console, FaultCommand, FaultSink, HttpClient, SendOutcome};
use grid_twin::sim::fault::FaultKind;

fn surge_command() -> FaultCommand {
    FaultCommand {
        asset_id: 1,
        fault_type: FaultKind::GridSurge,
        duration: 30,
        is_home: true,
    }
}

#[test]
fn posts_wire_payload_and_reads_message() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/trigger_fault")
            .json_body(json!({
                "asset_id": 1,
                "fault_type": "Grid Surge",
                "duration": 30,
                "is_home": true
            }));
        then.status(200).json_body(json!({
            "status": "Fault Injected",
            "target": "home_1",
            "message": "Command Sent."
        }));
    });

    let mut client = HttpClient::new(&server.base_url()).unwrap();
    let outcome = client.send(&surge_command()).unwrap();

    api_mock.assert();
    assert_eq!(
        outcome,
        SendOutcome::Injected {
            message: "Command Sent.".to_string()
        }
    );
}

#[test]
fn success_without_message_reads_ok() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/trigger_fault");
        then.status(200).body("done");
    });

    let mut client = HttpClient::new(&server.base_url()).unwrap();
    assert_eq!(
        client.send(&surge_command()).unwrap(),
        SendOutcome::Injected {
            message: "OK".to_string()
        }
    );
}

#[test]
fn non_200_is_reported_with_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/trigger_fault");
        then.status(404).body(r#"{"error":"unknown target home_1"}"#);
    });

    let mut client = HttpClient::new(&server.base_url()).unwrap();
    assert_eq!(
        client.send(&surge_command()).unwrap(),
        SendOutcome::Rejected {
            status: 404,
            body: r#"{"error":"unknown target home_1"}"#.to_string()
        }
    );
}

#[test]
fn unreachable_server_is_an_error() {
    // Port 9 (discard) is closed on test hosts.
    let mut client = HttpClient::new("http://127.0.0.1:9").unwrap();
    assert!(client.send(&surge_command()).is_err());
}

#[test]
fn menu_session_drives_mock_server() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/trigger_fault")
            .json_body(json!({
                "asset_id": 3,
                "fault_type": "Zero Voltage",
                "duration": 10,
                "is_home": false
            }));
        then.status(200).json_body(json!({"message": "Command Sent."}));
    });

    let client = HttpClient::new(&server.base_url()).unwrap();
    let mut out = Vec::new();
    Console::new("3\n3\n1\n\nq\n".as_bytes(), &mut out, client)
        .run()
        .unwrap();

    api_mock.assert();
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Sending command: Zero Voltage -> Grid Asset 3 (10s)..."));
    assert!(out.contains("[SUCCESS] FAULT INJECTED SUCCESSFULLY."));
}

#[cfg(feature = "api")]
#[test]
fn console_injects_into_live_twin() {
    use std::sync::Arc;

    use grid_twin::api::{AppState, router};
    use grid_twin::config::TwinConfig;
    use grid_twin::sim::engine::Engine;

    let state = Arc::new(AppState::new(Engine::from_config(&TwinConfig::bulawayo())));
    let (addr_tx, addr_rx) = std::sync::mpsc::channel();
    let server_state = Arc::clone(&state);
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            addr_tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, router(server_state)).await.unwrap();
        });
    });
    let addr = addr_rx.recv().unwrap();

    let mut client = HttpClient::new(&format!("http://{addr}")).unwrap();
    let outcome = client.send(&surge_command()).unwrap();
    assert_eq!(
        outcome,
        SendOutcome::Injected {
            message: "Command Sent.".to_string()
        }
    );

    let rejected = client
        .send(&FaultCommand {
            asset_id: 5,
            ..surge_command()
        })
        .unwrap();
    assert!(matches!(rejected, SendOutcome::Rejected { status: 404, .. }));

    let faults = state.engine.blocking_read().active_faults(state.now_s());
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].fault_type, FaultKind::GridSurge);
}
