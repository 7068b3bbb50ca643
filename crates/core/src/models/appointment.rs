use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::BookingError;
use crate::slots::{BusyInterval, TimeOfDay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Every status except `Cancelled` keeps the employee busy.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(BookingError::Validation(format!(
                "Unknown appointment status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub service_id: Uuid,
    pub customer_id: Uuid,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Wall-clock end of the appointment, or `None` if it would run into the
    /// next day.
    pub fn end_time(&self) -> Option<NaiveTime> {
        let (end, overflow) = self
            .start_time
            .as_naive()
            .overflowing_add_signed(TimeDelta::minutes(i64::from(self.duration_minutes)));
        (overflow == 0).then_some(end)
    }

    pub fn busy_interval(&self) -> BusyInterval {
        BusyInterval::new(self.start_time, self.duration_minutes)
    }
}

/// A booking request that passed validation. The customer is resolved by
/// email when the appointment is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub employee_id: Uuid,
    pub service_id: Uuid,
    pub customer: NewCustomer,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub duration_minutes: u32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub employee_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub customer: CustomerDetails,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub service_id: Uuid,
    pub status: AppointmentStatus,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_time: Option<NaiveTime>,
    pub display: String,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            end_time: appointment.end_time(),
            display: appointment.start_time.display(),
            id: appointment.id,
            employee_id: appointment.employee_id,
            service_id: appointment.service_id,
            status: appointment.status,
            date: appointment.date,
            start_time: appointment.start_time,
        }
    }
}
