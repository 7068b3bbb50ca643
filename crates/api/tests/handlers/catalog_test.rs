use pretty_assertions::assert_eq;
use slotbook_core::models::catalog::{ListEmployeesResponse, ListServicesResponse};

use crate::test_utils::{employee, service, TestContext};

#[tokio::test]
async fn test_list_services() {
    let mut ctx = TestContext::new();
    let haircut = service(30);
    let colour = {
        let mut s = service(90);
        s.name = "Colour".to_string();
        s.price_cents = 8000;
        s
    };
    let expected = vec![colour.id, haircut.id];

    ctx.store
        .expect_list_services()
        .times(1)
        .returning(move || Ok(vec![colour.clone(), haircut.clone()]));

    let server = ctx.build_server();
    let response = server.get("/api/services").await;

    response.assert_status_ok();
    let body: ListServicesResponse = response.json();
    assert_eq!(
        body.services.iter().map(|s| s.id).collect::<Vec<_>>(),
        expected
    );
    assert_eq!(body.services[0].duration_minutes, 90);
    assert_eq!(body.services[0].price_cents, 8000);
}

#[tokio::test]
async fn test_list_employees_hides_contact_details() {
    let mut ctx = TestContext::new();
    let maria = employee(true);
    let id = maria.id;

    ctx.store
        .expect_list_employees()
        .returning(move || Ok(vec![maria.clone()]));

    let server = ctx.build_server();
    let response = server.get("/api/employees").await;

    response.assert_status_ok();
    let raw: serde_json::Value = response.json();
    assert!(raw["employees"][0].get("email").is_none());

    let body: ListEmployeesResponse = response.json();
    assert_eq!(body.employees.len(), 1);
    assert_eq!(body.employees[0].id, id);
    assert_eq!(body.employees[0].name, "Maria Lopez");
}

#[tokio::test]
async fn test_health_and_readiness() {
    let mut ctx = TestContext::new();
    ctx.store.expect_list_services().returning(|| Ok(Vec::new()));

    let server = ctx.build_server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&serde_json::json!({ "status": "ok" }));

    let response = server.get("/health/ready").await;
    response.assert_status_ok();
    response.assert_json(&serde_json::json!({ "status": "ready" }));
}
