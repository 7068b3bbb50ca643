use axum::http::StatusCode;
use rstest::rstest;
use slotbook_api::middleware::error_handling::{map_error, AppError};
use slotbook_core::errors::BookingError;

#[rstest]
#[case::not_found(BookingError::NotFound("Appointment".to_string()), StatusCode::NOT_FOUND)]
#[case::validation(BookingError::Validation("date is required".to_string()), StatusCode::BAD_REQUEST)]
#[case::conflict(BookingError::Conflict("slot taken".to_string()), StatusCode::CONFLICT)]
#[case::database(BookingError::Database(eyre::eyre!("pool timed out")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case::internal(BookingError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: BookingError, #[case] expected: StatusCode) {
    assert_eq!(map_error(error).status(), expected);
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let response = map_error(BookingError::Conflict("slot taken".to_string()));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body, serde_json::json!({ "error": "Conflict: slot taken" }));
}

#[test]
fn test_eyre_report_becomes_database_error() {
    let error = AppError::from(eyre::eyre!("relation does not exist"));

    assert!(matches!(error.0, BookingError::Database(_)));
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
