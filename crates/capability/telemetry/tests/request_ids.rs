use ems_telemetry::{init_tracing, new_request_ids};

#[test]
fn request_ids_are_distinct_uuids() {
    let ids = new_request_ids();
    assert_eq!(ids.request_id.len(), 36);
    assert_ne!(ids.request_id, ids.trace_id);
    assert_ne!(new_request_ids().request_id, ids.request_id);
}

#[test]
fn init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
