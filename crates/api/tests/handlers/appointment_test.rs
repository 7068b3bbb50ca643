use axum::http::StatusCode;
use fake::{
    faker::{internet::en::SafeEmail, name::en::Name},
    Fake,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use slotbook_core::{
    errors::BookingError,
    models::appointment::{AppointmentResponse, AppointmentStatus, NewCustomer},
    slots::BusyInterval,
};
use uuid::Uuid;

use crate::test_utils::{
    appointment, employee, monday, monday_schedule, service, time, TestContext,
};

fn booking_payload(
    employee_id: Uuid,
    service_id: Uuid,
    start: &str,
    name: &str,
    email: &str,
) -> serde_json::Value {
    json!({
        "employee_id": employee_id,
        "service_id": service_id,
        "date": "2024-05-06",
        "start_time": start,
        "customer": { "name": name, "email": email, "phone": null },
        "notes": "First visit"
    })
}

/// Employee, service and Monday schedule lookups with one 10:00 booking.
fn expect_open_day(ctx: &mut TestContext, employee_id: Uuid, service_id: Uuid) {
    let employee = {
        let mut e = employee(true);
        e.id = employee_id;
        e
    };
    let service = {
        let mut s = service(60);
        s.id = service_id;
        s
    };

    ctx.store
        .expect_get_employee()
        .returning(move |_| Ok(Some(employee.clone())));
    ctx.store
        .expect_get_service()
        .returning(move |_| Ok(Some(service.clone())));
    ctx.store
        .expect_get_employee_schedule()
        .returning(|id, _| Ok(Some(monday_schedule(id))));
    ctx.store
        .expect_get_busy_intervals()
        .returning(|_, _| Ok(vec![BusyInterval::new(time(10, 0), 60)]));
}

#[test_log::test(tokio::test)]
async fn test_create_appointment_books_free_slot() {
    let mut ctx = TestContext::new();
    let (employee_id, service_id) = (Uuid::new_v4(), Uuid::new_v4());
    expect_open_day(&mut ctx, employee_id, service_id);

    let name: String = Name().fake();
    let email: String = SafeEmail().fake();
    let expected_customer = NewCustomer {
        name: name.clone(),
        email: email.to_lowercase(),
        phone: None,
    };

    ctx.store
        .expect_create_appointment()
        .withf(move |new| {
            new.customer == expected_customer
                && new.start_time == time(11, 0)
                && new.duration_minutes == 60
                && new.date == monday()
                && new.notes.as_deref() == Some("First visit")
        })
        .times(1)
        .returning(|new| {
            let mut booked = appointment(new.employee_id, new.service_id, new.start_time);
            booked.notes = new.notes;
            Ok(booked)
        });

    let server = ctx.build_server();
    let response = server
        .post("/api/appointments")
        .json(&booking_payload(employee_id, service_id, "11:00:00", &name, &email))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: AppointmentResponse = response.json();
    assert_eq!(body.employee_id, employee_id);
    assert_eq!(body.service_id, service_id);
    assert_eq!(body.status, AppointmentStatus::Pending);
    assert_eq!(body.display, "11:00");
    assert_eq!(body.end_time, Some(time(12, 0).as_naive()));
}

#[tokio::test]
async fn test_create_appointment_rejects_taken_slot() {
    let mut ctx = TestContext::new();
    let (employee_id, service_id) = (Uuid::new_v4(), Uuid::new_v4());
    expect_open_day(&mut ctx, employee_id, service_id);
    ctx.store.expect_create_appointment().never();

    let server = ctx.build_server();
    let response = server
        .post("/api/appointments")
        .json(&booking_payload(
            employee_id,
            service_id,
            "10:30:00",
            "Ada Lovelace",
            "ada@example.com",
        ))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_appointment_rejects_off_grid_time() {
    let mut ctx = TestContext::new();
    let (employee_id, service_id) = (Uuid::new_v4(), Uuid::new_v4());
    expect_open_day(&mut ctx, employee_id, service_id);
    ctx.store.expect_create_appointment().never();

    let server = ctx.build_server();
    let response = server
        .post("/api/appointments")
        .json(&booking_payload(
            employee_id,
            service_id,
            "09:15:00",
            "Ada Lovelace",
            "ada@example.com",
        ))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_appointment_lost_race_is_conflict() {
    let mut ctx = TestContext::new();
    let (employee_id, service_id) = (Uuid::new_v4(), Uuid::new_v4());
    expect_open_day(&mut ctx, employee_id, service_id);

    ctx.store.expect_create_appointment().returning(|_| {
        Err(BookingError::Conflict(
            "Employee already has an appointment at 11:00".to_string(),
        ))
    });

    let server = ctx.build_server();
    let response = server
        .post("/api/appointments")
        .json(&booking_payload(
            employee_id,
            service_id,
            "11:00:00",
            "Ada Lovelace",
            "ada@example.com",
        ))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "Conflict: Employee already has an appointment at 11:00"
    );
}

#[tokio::test]
async fn test_create_appointment_invalid_customer() {
    let ctx = TestContext::new();
    let server = ctx.build_server();

    let response = server
        .post("/api/appointments")
        .json(&booking_payload(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "11:00:00",
            "Ada Lovelace",
            "not-an-email",
        ))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_appointment_unknown_service() {
    let mut ctx = TestContext::new();
    let employee = employee(true);
    let employee_id = employee.id;

    ctx.store
        .expect_get_employee()
        .returning(move |_| Ok(Some(employee.clone())));
    ctx.store.expect_get_service().returning(|_| Ok(None));
    ctx.store.expect_create_appointment().never();

    let server = ctx.build_server();
    let response = server
        .post("/api/appointments")
        .json(&booking_payload(
            employee_id,
            Uuid::new_v4(),
            "11:00:00",
            "Ada Lovelace",
            "ada@example.com",
        ))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_appointment() {
    let mut ctx = TestContext::new();
    let booked = appointment(Uuid::new_v4(), Uuid::new_v4(), time(14, 30));
    let id = booked.id;

    ctx.store
        .expect_get_appointment()
        .returning(move |_| Ok(Some(booked.clone())));

    let server = ctx.build_server();
    let response = server.get(&format!("/api/appointments/{}", id)).await;

    response.assert_status_ok();
    let body: AppointmentResponse = response.json();
    assert_eq!(body.id, id);
    assert_eq!(body.display, "14:30");
}

#[tokio::test]
async fn test_get_appointment_not_found() {
    let mut ctx = TestContext::new();
    ctx.store.expect_get_appointment().returning(|_| Ok(None));

    let server = ctx.build_server();
    let response = server
        .get(&format!("/api/appointments/{}", Uuid::new_v4()))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_appointment() {
    let mut ctx = TestContext::new();
    let mut booked = appointment(Uuid::new_v4(), Uuid::new_v4(), time(9, 0));
    booked.status = AppointmentStatus::Cancelled;
    let id = booked.id;

    ctx.store
        .expect_cancel_appointment()
        .withf(move |requested| *requested == id)
        .times(1)
        .returning(move |_| Ok(Some(booked.clone())));

    let server = ctx.build_server();
    let response = server
        .put(&format!("/api/appointments/{}/cancel", id))
        .await;

    response.assert_status_ok();
    let body: AppointmentResponse = response.json();
    assert_eq!(body.status, AppointmentStatus::Cancelled);
}

#[tokio::test]
async fn test_cancel_unknown_appointment() {
    let mut ctx = TestContext::new();
    ctx.store.expect_cancel_appointment().returning(|_| Ok(None));

    let server = ctx.build_server();
    let response = server
        .put(&format!("/api/appointments/{}/cancel", Uuid::new_v4()))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}
