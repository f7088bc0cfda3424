//! Client Support Ticket Model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::complaint::{CaseStatus, Priority};

wire_enum! {
    /// Department a ticket can be routed to
    pub enum Department {
        TechnicalSupport => "technical_support",
        Sales => "sales",
        Management => "management",
    }
}

impl Department {
    pub const ALL: [Department; 3] = [
        Department::TechnicalSupport,
        Department::Sales,
        Department::Management,
    ];
}

/// Client support ticket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ticket {
    pub id: i64,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: Option<String>,
    pub client_company: Option<String>,
    pub department: Option<Department>,
    pub status: CaseStatus,
    pub priority: Priority,
    pub transfer_count: u32,
    pub issue: String,
    pub admin_response: Option<String>,
    pub resolution_notes: Option<String>,
    pub created_at: Option<String>,
}

/// One move of a ticket between departments, newest first in history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferRecord {
    pub id: i64,
    pub from_department: Option<Department>,
    pub to_department: Option<Department>,
    pub transfer_reason: String,
    pub transfer_notes: Option<String>,
    pub transferred_by_name: Option<String>,
    pub from_user_name: Option<String>,
    pub to_user_name: Option<String>,
    pub created_at: Option<String>,
}

/// Transfer request (`POST /api/client-support/transfer/{id}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub to_department: Department,
    #[serde(rename = "to_user", skip_serializing_if = "Option::is_none")]
    pub to_user_id: Option<i64>,
    pub transfer_reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_notes: Option<String>,
}

/// Assignment request (`POST /api/client-support/assign/{id}`)
/// Successful transfer response; the server may echo the updated ticket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferOutcome {
    pub message: Option<String>,
    pub ticket: Option<Ticket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignRequest {
    pub user_id: i64,
}

/// Status change (`POST /api/client-support/update-status/{id}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: CaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepartmentCount {
    pub count: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferCount {
    pub department: String,
    pub count: u32,
}

/// `GET /api/client-support/stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketStats {
    pub total: u32,
    pub open: u32,
    pub resolved: u32,
    pub by_department: BTreeMap<String, DepartmentCount>,
    pub by_status: BTreeMap<String, u32>,
    pub by_priority: BTreeMap<String, u32>,
    pub total_transfers: u32,
    pub transfers_from: Vec<TransferCount>,
    pub transfers_to: Vec<TransferCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_request_wire_names() {
        let req = TransferRequest {
            to_department: Department::Sales,
            to_user_id: Some(4),
            transfer_reason: "billing question".into(),
            transfer_notes: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["to_department"], "sales");
        assert_eq!(json["to_user"], 4);
        assert!(json.get("transfer_notes").is_none());
    }

    #[test]
    fn test_unknown_department_kept() {
        let record: TransferRecord =
            serde_json::from_str(r#"{"from_department":"legal","to_department":"sales"}"#).unwrap();
        assert_eq!(record.from_department, Some(Department::Other("legal".into())));
        assert_eq!(record.to_department, Some(Department::Sales));
    }
}
