use chrono::Weekday;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slots::{BreakWindow, WorkWindow};

/// One employee's working hours for one weekday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeSchedule {
    pub employee_id: Uuid,
    pub weekday: Weekday,
    pub work: WorkWindow,
    pub brk: Option<BreakWindow>,
    pub is_active: bool,
}
