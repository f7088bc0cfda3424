//! Complaint Model
//!
//! One record type covers the complaint log, the manager queue and the
//! employee task board; each endpoint fills a different subset of fields.

use serde::{Deserialize, Serialize};

wire_enum! {
    /// Case lifecycle across the complaint log, manager queue and tickets
    pub enum CaseStatus {
        New => "new",
        Assigned => "assigned",
        InProgress => "in_progress",
        Referred => "referred",
        WaitingResponse => "waiting_response",
        SentToManager => "sent_to_manager",
        ManagerResponded => "manager_responded",
        Transferred => "transferred",
        Resolved => "resolved",
        Closed => "closed",
    }
}

impl Default for CaseStatus {
    fn default() -> Self {
        CaseStatus::New
    }
}

wire_enum! {
    pub enum Priority {
        Urgent => "urgent",
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

wire_enum! {
    pub enum Category {
        Billing => "billing",
        Technical => "technical",
        Training => "training",
        General => "other",
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::General
    }
}

wire_enum! {
    /// How the employee reached the customer
    pub enum ContactMethod {
        Phone => "phone",
        WhatsApp => "whatsapp",
        Email => "email",
        Visit => "visit",
    }
}

/// Complaint / support case
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Complaint {
    pub id: i64,
    pub customer_phone: String,
    pub customer_name: Option<String>,
    pub issue_description: String,
    pub status: CaseStatus,
    pub priority: Priority,
    pub category: Category,
    pub referred_to_department: Option<String>,
    pub management_response: Option<String>,
    pub manager_solution: Option<String>,
    pub manager_instructions: Option<String>,
    pub manager_response_date: Option<String>,
    pub assigned_to: Option<i64>,
    pub employee_action: Option<String>,
    pub customer_contact_method: Option<ContactMethod>,
    pub customer_response: Option<String>,
    pub resolution_details: Option<String>,
    pub resolved_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Complaint {
    /// True once the assigned employee has recorded an action
    pub fn has_employee_action(&self) -> bool {
        self.employee_action
            .as_deref()
            .is_some_and(|a| !a.trim().is_empty())
    }
}

/// Counters shown above the manager queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueStatistics {
    pub sent_to_manager: u32,
    pub in_progress: u32,
    pub manager_responded: u32,
    pub resolved: u32,
}

/// `GET /api/support/manager/complaints`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerQueue {
    pub complaints: Vec<Complaint>,
    pub statistics: QueueStatistics,
}

/// `GET /api/support/employee/tasks`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeTasks {
    pub new: Vec<Complaint>,
    pub progress: Vec<Complaint>,
    pub completed: Vec<Complaint>,
}

/// Manager decision (`POST /api/support/manager/respond/{id}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerResponse {
    pub manager_solution: String,
    pub manager_instructions: String,
    pub assigned_to: Option<i64>,
    pub priority: Priority,
}

/// Work started on a case (`POST /api/support/employee/mark-progress/{id}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub employee_action: String,
    pub customer_contact_method: Option<ContactMethod>,
    pub customer_response: String,
}

/// Case closed by the employee (`POST /api/support/employee/resolve/{id}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub employee_action: String,
    pub customer_contact_method: ContactMethod,
    pub customer_response: String,
    pub resolution_details: String,
}

/// Notification to one user (`POST /api/notifications/send`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserNotification {
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub link: String,
}

/// Notification to the managers (`POST /api/notifications/send-to-manager`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerNotification {
    #[serde(rename = "type")]
    pub kind: String,
    pub complaint_id: i64,
    pub message: String,
}
