use axum::http::StatusCode;
use rstest::rstest;
use slotkeeper_api::middleware::error_handling::map_error;
use slotkeeper_core::errors::EngineError;

#[rstest]
#[case::not_found(EngineError::NotFound("Provider".into()), StatusCode::NOT_FOUND)]
#[case::validation(EngineError::Validation("Slot ends before it starts".into()), StatusCode::BAD_REQUEST)]
#[case::conflict(EngineError::Conflict("Overlapping occupancy".into()), StatusCode::CONFLICT)]
#[case::database(EngineError::Database(eyre::eyre!("Database error")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case::internal(EngineError::Internal("Corrupt row".into()), StatusCode::INTERNAL_SERVER_ERROR)]
fn errors_map_to_status_codes(#[case] error: EngineError, #[case] expected: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), expected);
}
