use api_contract::{
    ApiResponse, ChangePasswordRequest, CircuitMeasurementsDto, CircuitReadingDto,
    CreateCircuitReadingRequest, CreateSubstationRequest, DispatchOrderRequest,
};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

#[test]
fn success_envelope_has_message_data_and_timestamp() {
    let value =
        serde_json::to_value(ApiResponse::success(json!({"id": 1}), "创建成功")).expect("serialize");
    assert_eq!(value["success"], Value::Bool(true));
    assert_eq!(value["message"], "创建成功");
    assert_eq!(value["data"]["id"], 1);
    assert!(value["timestamp"].as_str().is_some_and(|ts| ts.contains('T')));
    assert!(value.get("error_code").is_none());
}

#[test]
fn error_envelope_carries_error_code_and_null_data() {
    let value = serde_json::to_value(ApiResponse::<()>::error("NOT_FOUND", "告警不存在"))
        .expect("serialize");
    assert_eq!(value["success"], Value::Bool(false));
    assert_eq!(value["error_code"], "NOT_FOUND");
    assert_eq!(value["data"], Value::Null);
}

#[test]
fn requests_accept_snake_and_camel_case() {
    let snake: DispatchOrderRequest =
        serde_json::from_str(r#"{"order_id":"O1","alarm_id":"A1","maintainer_id":"M1"}"#)
            .expect("parse");
    let camel: DispatchOrderRequest =
        serde_json::from_str(r#"{"orderId":"O1","alarmId":"A1","maintainerId":"M1"}"#)
            .expect("parse");
    assert_eq!(snake.order_id, camel.order_id);
    assert_eq!(snake.maintainer_id.as_deref(), Some("M1"));
    assert_eq!(camel.alarm_id.as_deref(), Some("A1"));

    let change: ChangePasswordRequest =
        serde_json::from_str(r#"{"oldPassword":"a","new_password":"b"}"#).expect("parse");
    assert_eq!(change.old_password.as_deref(), Some("a"));
    assert_eq!(change.new_password.as_deref(), Some("b"));
}

#[test]
fn missing_fields_deserialize_as_none() {
    let req: DispatchOrderRequest = serde_json::from_str("{}").expect("parse");
    assert!(req.order_id.is_none());
}

#[test]
fn substation_accepts_camel_case_commissioning_date() {
    let req: CreateSubstationRequest = serde_json::from_str(
        r#"{"substationId":"S1","plantAreaId":"P1","substationName":"一号配电房","commissioningDate":"2020-05-01"}"#,
    )
    .expect("parse");
    assert_eq!(req.plant_area_id.as_deref(), Some("P1"));
    assert_eq!(req.commissioning_date.as_deref(), Some("2020-05-01"));
}

#[test]
fn circuit_measurements_are_flattened() {
    let req: CreateCircuitReadingRequest = serde_json::from_str(
        r#"{"substation_id":"S1","circuit_id":"C1","collection_time":"2025-01-01T00:00:00Z","voltage":380,"powerFactor":0.95,"switch_status":"合闸"}"#,
    )
    .expect("parse");
    assert_eq!(req.measurements.voltage, Some(380.0));
    assert_eq!(req.measurements.power_factor, Some(0.95));
    assert_eq!(req.measurements.switch_status.as_deref(), Some("合闸"));

    let dto = CircuitReadingDto {
        circuit_data_id: 7,
        substation_id: "S1".to_string(),
        circuit_id: "C1".to_string(),
        collection_time: Utc
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .expect("time"),
        measurements: CircuitMeasurementsDto {
            voltage: Some(380.0),
            ..Default::default()
        },
    };
    let value = serde_json::to_value(dto).expect("serialize");
    assert_eq!(value["circuit_data_id"], 7);
    assert_eq!(value["voltage"], 380.0);
    assert!(value.get("measurements").is_none());
}
