use std::sync::Arc;

use axum_test::TestServer;
use chrono::{NaiveDate, Utc, Weekday};
use slotbook_api::{build_router, config::UnknownServicePolicy, ApiState};
use slotbook_core::{
    models::{
        appointment::{Appointment, AppointmentStatus},
        catalog::{Employee, Service},
        schedule::EmployeeSchedule,
    },
    slots::{BreakWindow, SlotFinder, TimeOfDay, WorkWindow},
};
use slotbook_db::MockBookingStore;
use uuid::Uuid;

/// Holds the mock store until the test has set its expectations, then moves
/// it into the router.
pub struct TestContext {
    pub store: MockBookingStore,
    pub unknown_service_policy: UnknownServicePolicy,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            store: MockBookingStore::new(),
            unknown_service_policy: UnknownServicePolicy::default(),
        }
    }

    pub fn build_state(self) -> Arc<ApiState> {
        Arc::new(ApiState {
            store: Arc::new(self.store),
            slot_finder: SlotFinder::default(),
            unknown_service_policy: self.unknown_service_policy,
        })
    }

    pub fn build_server(self) -> TestServer {
        TestServer::new(build_router(self.build_state())).unwrap()
    }
}

pub fn time(hour: u32, minute: u32) -> TimeOfDay {
    TimeOfDay::from_hms(hour, minute, 0).unwrap()
}

/// A Monday.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
}

pub fn employee(is_active: bool) -> Employee {
    Employee {
        id: Uuid::new_v4(),
        name: "Maria Lopez".to_string(),
        email: "maria@salon.test".to_string(),
        phone: None,
        is_active,
        created_at: Utc::now(),
    }
}

pub fn service(duration_minutes: i32) -> Service {
    Service {
        id: Uuid::new_v4(),
        name: "Haircut".to_string(),
        duration_minutes,
        price_cents: 3500,
        is_active: true,
        created_at: Utc::now(),
    }
}

/// 09:00 to 17:00 with lunch from 12:00 to 13:00.
pub fn monday_schedule(employee_id: Uuid) -> EmployeeSchedule {
    EmployeeSchedule {
        employee_id,
        weekday: Weekday::Mon,
        work: WorkWindow::new(time(9, 0), time(17, 0)),
        brk: Some(BreakWindow::new(time(12, 0), time(13, 0))),
        is_active: true,
    }
}

pub fn appointment(employee_id: Uuid, service_id: Uuid, start: TimeOfDay) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        employee_id,
        service_id,
        customer_id: Uuid::new_v4(),
        date: monday(),
        start_time: start,
        duration_minutes: 60,
        status: AppointmentStatus::Pending,
        notes: None,
        created_at: Utc::now(),
    }
}
