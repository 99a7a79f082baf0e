use super::*;
use serde_json::json;

// =============================================================================
// classify_response
// =============================================================================

#[test]
fn success_body_passes_through() {
    let value = classify_response(200, r#"{"success":true,"data":[]}"#, "fallback").unwrap();
    assert_eq!(value["data"], json!([]));
}

#[test]
fn created_status_is_success() {
    assert!(classify_response(201, r#"{"success":true,"data":{}}"#, "fallback").is_ok());
}

#[test]
fn success_false_is_validation_with_message() {
    let err = classify_response(200, r#"{"success":false,"message":"Slot taken"}"#, "fallback").unwrap_err();
    assert_eq!(err, GatewayError::Validation("Slot taken".into()));
}

#[test]
fn status_401_is_unauthorized() {
    let err = classify_response(401, r#"{"success":false,"message":"Not authorized"}"#, "fallback").unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "Not authorized");
}

#[test]
fn status_403_is_forbidden_not_stale() {
    let err = classify_response(403, r#"{"success":false,"message":"Not your booking"}"#, "fallback").unwrap_err();
    assert_eq!(err, GatewayError::Forbidden("Not your booking".into()));
    assert!(!err.is_unauthorized());
    assert_eq!(err.user_message(), "Not your booking");
}

#[test]
fn client_errors_are_validation() {
    for status in [400, 404, 409, 422] {
        let err = classify_response(status, r#"{"message":"bad"}"#, "fallback").unwrap_err();
        assert_eq!(err, GatewayError::Validation("bad".into()), "status {status}");
    }
}

#[test]
fn server_errors_keep_status() {
    let err = classify_response(503, "<html>down</html>", "Failed to fetch bookings").unwrap_err();
    assert_eq!(err, GatewayError::Server { status: 503, message: "Failed to fetch bookings".into() });
}

#[test]
fn blank_message_uses_fallback() {
    let err = classify_response(400, r#"{"message":"  "}"#, "Failed to register").unwrap_err();
    assert_eq!(err.user_message(), "Failed to register");
}

#[test]
fn network_error_has_generic_user_message() {
    let err = GatewayError::Network("connection refused".into());
    assert!(!err.is_unauthorized());
    assert_eq!(err.user_message(), "Error connecting to server. Please try again.");
}

// =============================================================================
// decode_data
// =============================================================================

#[test]
fn decode_data_reads_data_field() {
    let stats: Vec<ProviderStat> =
        decode_data(json!({"success":true,"data":[{"provider":"A","totalBookings":3}]})).unwrap();
    assert_eq!(stats, vec![ProviderStat { provider: "A".into(), total_bookings: 3 }]);
}

#[test]
fn decode_data_missing_field_is_decode_error() {
    let err = decode_data::<Vec<ProviderStat>>(json!({"success":true})).unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
}

#[test]
fn decode_data_wrong_shape_is_decode_error() {
    let err = decode_data::<Vec<ProviderStat>>(json!({"data":{"oops":1}})).unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
}

// =============================================================================
// Provider
// =============================================================================

#[test]
fn provider_prefers_virtual_id() {
    let p: Provider =
        serde_json::from_value(json!({"_id":"obj","id":"virt","name":"N","address":"A","tel":"T","__v":0})).unwrap();
    assert_eq!(p.id, "virt");
    assert_eq!(p.name, "N");
}

#[test]
fn provider_falls_back_to_object_id() {
    let p: Provider = serde_json::from_value(json!({"_id":"obj","name":"N"})).unwrap();
    assert_eq!(p.id, "obj");
    assert_eq!(p.address, "");
}

// =============================================================================
// BookingWire / booked_by
// =============================================================================

#[test]
fn booking_wire_maps_populated_provider() {
    let wire: BookingWire = serde_json::from_value(json!({
        "_id": "b1",
        "rentalDate": "2025-03-01T10:00:00.000Z",
        "provider": {"_id": "p1", "name": "Clinic", "tel": "02-111", "address": "1 Main St"},
        "user": {"name": "Alice", "email": "a@example.com"}
    }))
    .unwrap();
    let record = wire.into_record();
    assert_eq!(record.id, "b1");
    assert_eq!(record.holder_name, "Clinic");
    assert_eq!(record.phone, "02-111");
    assert_eq!(record.venue_address, "1 Main St");
    assert_eq!(record.scheduled_at, "2025-03-01T10:00:00.000Z");
    assert_eq!(record.booked_by.as_deref(), Some("Alice"));
    assert_eq!(record.provider_id.as_deref(), Some("p1"));
}

#[test]
fn booking_wire_with_bare_provider_id() {
    let wire: BookingWire =
        serde_json::from_value(json!({"_id":"b2","rentalDate":"x","provider":"p9","user":"u1"})).unwrap();
    let record = wire.into_record();
    assert_eq!(record.provider_id.as_deref(), Some("p9"));
    assert_eq!(record.holder_name, "");
    assert_eq!(record.booked_by.as_deref(), Some("u1"));
}

#[test]
fn booked_by_falls_back_through_name_email_raw() {
    assert_eq!(booked_by(&json!({"name":"Bob","email":"b@x"})), "Bob");
    assert_eq!(booked_by(&json!({"name":"","email":"b@x"})), "b@x");
    assert_eq!(booked_by(&json!({})), UNKNOWN_USER);
    assert_eq!(booked_by(&json!("64ab")), "64ab");
    assert_eq!(booked_by(&Value::Null), UNKNOWN_USER);
}

#[test]
fn fill_provider_only_fills_blanks() {
    let provider = Provider { id: "p1".into(), name: "Clinic".into(), address: "Addr".into(), tel: "Tel".into() };
    let mut record = BookingRecord { phone: "kept".into(), ..BookingRecord::new("b1") };
    fill_provider(&mut record, &provider);
    assert_eq!(record.holder_name, "Clinic");
    assert_eq!(record.phone, "kept");
    assert_eq!(record.venue_address, "Addr");
    assert_eq!(record.provider_id.as_deref(), Some("p1"));
}

// =============================================================================
// wire encodings
// =============================================================================

#[test]
fn new_booking_uses_backend_field_names() {
    let body = serde_json::to_value(NewBooking { rental_date: "2025-01-01T00:00:00Z", user: "u1" }).unwrap();
    assert_eq!(body, json!({"rentalDate":"2025-01-01T00:00:00Z","user":"u1"}));
}

#[test]
fn password_change_uses_backend_field_names() {
    let body = serde_json::to_value(PasswordChange { current_password: "a", new_password: "b" }).unwrap();
    assert_eq!(body, json!({"currentPassword":"a","newPassword":"b"}));
}

#[test]
fn login_wire_accepts_either_id_field() {
    let a: LoginWire = serde_json::from_value(json!({"_id":"u1","token":"t"})).unwrap();
    let b: LoginWire = serde_json::from_value(json!({"id":"u2","token":"t","role":"admin"})).unwrap();
    assert_eq!(a.user_id(), Some("u1"));
    assert_eq!(b.user_id(), Some("u2"));
    assert_eq!(b.role.as_deref(), Some("admin"));
}
