use super::*;

#[test]
fn session_conflicts_map_to_409() {
    let out_of_range = HttpApiError::from(ApiError::new(ErrorCode::SessionOutOfRange, "x", None));
    assert_eq!(out_of_range.status, StatusCode::CONFLICT);

    let conflict = HttpApiError::from(ApiError::new(ErrorCode::SessionStateConflict, "x", None));
    assert_eq!(conflict.status, StatusCode::CONFLICT);
}

#[test]
fn dataset_and_request_errors_map_to_400() {
    let dataset = HttpApiError::from(ApiError::new(ErrorCode::InvalidDataset, "x", None));
    assert_eq!(dataset.status, StatusCode::BAD_REQUEST);

    let request = HttpApiError::invalid_request("bad body", Some("eof".to_string()));
    assert_eq!(request.status, StatusCode::BAD_REQUEST);
    assert_eq!(request.error.error_code, ErrorCode::InvalidRequest);
    assert_eq!(request.error.details.as_deref(), Some("eof"));
}
