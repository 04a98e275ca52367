//! API request and response bodies.

use serde::{Deserialize, Serialize};

use crate::assets::SensorKey;
use crate::sim::fault::{FaultKind, FaultSnapshot};

/// Body of `POST /api/trigger_fault`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TriggerFaultRequest {
    pub asset_id: u32,
    pub fault_type: FaultKind,
    /// Seconds; the configured default applies when absent.
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub is_home: bool,
}

impl TriggerFaultRequest {
    pub fn target(&self) -> SensorKey {
        SensorKey::new(self.asset_id, self.is_home)
    }
}

/// Success body of `POST /api/trigger_fault`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TriggerFaultResponse {
    pub status: String,
    pub target: SensorKey,
    pub message: String,
}

impl TriggerFaultResponse {
    pub fn injected(target: SensorKey) -> Self {
        Self {
            status: "Fault Injected".to_string(),
            target,
            message: "Command Sent.".to_string(),
        }
    }
}

/// Body of `GET /api/faults`.
#[derive(Debug, Serialize)]
pub struct FaultsResponse {
    /// Seconds since the server started.
    pub now_s: f64,
    pub faults: Vec<FaultSnapshot>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_duration_and_is_home() {
        let req: TriggerFaultRequest =
            serde_json::from_str(r#"{"asset_id": 2, "fault_type": "Voltage Dip"}"#).unwrap();
        assert_eq!(req.duration, None);
        assert!(!req.is_home);
        assert_eq!(req.target(), SensorKey::Grid(2));
    }

    #[test]
    fn request_targets_home_when_flagged() {
        let req: TriggerFaultRequest = serde_json::from_str(
            r#"{"asset_id": 1, "fault_type": "Grid Surge", "duration": 30, "is_home": true}"#,
        )
        .unwrap();
        assert_eq!(req.target(), SensorKey::Home(1));
        assert_eq!(req.fault_type, FaultKind::GridSurge);
        assert_eq!(req.duration, Some(30));
    }

    #[test]
    fn unknown_fault_type_is_rejected() {
        let res = serde_json::from_str::<TriggerFaultRequest>(
            r#"{"asset_id": 1, "fault_type": "Meteor Strike"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn response_uses_string_target() {
        let json = serde_json::to_value(TriggerFaultResponse::injected(SensorKey::Home(1))).unwrap();
        assert_eq!(json["status"], "Fault Injected");
        assert_eq!(json["target"], "home_1");
        assert_eq!(json["message"], "Command Sent.");
    }
}
