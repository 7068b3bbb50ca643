use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use eyre::{eyre, Report, Result};
use serde::{Deserialize, Serialize};
use slotbook_core::{
    models::{
        appointment::{Appointment, AppointmentStatus, Customer},
        catalog::{Employee, Service},
        schedule::EmployeeSchedule,
    },
    slots::{BreakWindow, WorkWindow},
};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub price_cents: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEmployee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEmployeeSchedule {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCustomer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub service_id: Uuid,
    pub customer_id: Uuid,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Weekday index as stored in `employee_schedules.day_of_week` (0 = Sunday).
pub fn weekday_index(weekday: Weekday) -> i16 {
    weekday.num_days_from_sunday() as i16
}

pub fn weekday_from_index(index: i16) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

impl From<DbService> for Service {
    fn from(row: DbService) -> Self {
        Self {
            id: row.id,
            name: row.name,
            duration_minutes: row.duration_minutes,
            price_cents: row.price_cents,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

impl From<DbEmployee> for Employee {
    fn from(row: DbEmployee) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

impl From<DbCustomer> for Customer {
    fn from(row: DbCustomer) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

impl TryFrom<DbEmployeeSchedule> for EmployeeSchedule {
    type Error = Report;

    fn try_from(row: DbEmployeeSchedule) -> Result<Self> {
        let weekday = weekday_from_index(row.day_of_week)
            .ok_or_else(|| eyre!("Invalid day_of_week {} in schedule {}", row.day_of_week, row.id))?;

        // A break only counts when both ends are set.
        let brk = match (row.break_start, row.break_end) {
            (Some(start), Some(end)) => Some(BreakWindow::new(start.into(), end.into())),
            _ => None,
        };

        Ok(Self {
            employee_id: row.employee_id,
            weekday,
            work: WorkWindow::new(row.start_time.into(), row.end_time.into()),
            brk,
            is_active: row.is_active,
        })
    }
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = Report;

    fn try_from(row: DbAppointment) -> Result<Self> {
        let status = row
            .status
            .parse::<AppointmentStatus>()
            .map_err(|e| eyre!("Appointment {}: {}", row.id, e))?;
        let duration_minutes = u32::try_from(row.duration_minutes).map_err(|_| {
            eyre!(
                "Appointment {} has negative duration {}",
                row.id,
                row.duration_minutes
            )
        })?;

        Ok(Self {
            id: row.id,
            employee_id: row.employee_id,
            service_id: row.service_id,
            customer_id: row.customer_id,
            date: row.appointment_date,
            start_time: row.start_time.into(),
            duration_minutes,
            status,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}
