use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slots::AvailableSlot;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub employee_id: Uuid,
    pub service_id: Option<Uuid>,
    pub date: NaiveDate,
    pub duration_minutes: u32,
    pub slots: Vec<AvailableSlot>,
}
