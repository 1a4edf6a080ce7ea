mod common;

use axum::http::StatusCode;
use common::{TestApp, spawn_app};
use domain::Role;
use serde_json::json;

async fn seed_substation(app: &TestApp, token: &str) {
    let response = app
        .send(
            "POST",
            "/plant-areas",
            Some(token),
            Some(json!({ "plant_area_id": "P1", "plant_area_name": "一号厂区" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let response = app
        .send(
            "POST",
            "/substation/rooms",
            Some(token),
            Some(json!({
                "substation_id": "S1",
                "plant_area_id": "P1",
                "substation_name": "一号配电房",
                "transformer_count": 2,
                "commissioning_date": "2020-05-01"
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn plant_area_and_device_crud() {
    let app = spawn_app().await;
    let manager = app.user_with_roles("emma", &[Role::EnergyManager]).await;
    let viewer = app.user_with_roles("vic", &[Role::DataAnalyst]).await;

    let response = app
        .send(
            "POST",
            "/plant-areas",
            Some(&viewer),
            Some(json!({ "plant_area_id": "P1", "plant_area_name": "一号厂区" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .send(
            "POST",
            "/plant-areas",
            Some(&manager),
            Some(json!({ "plantAreaId": "P1", "plantAreaName": "一号厂区" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .send(
            "POST",
            "/plant-areas",
            Some(&manager),
            Some(json!({ "plant_area_id": "P1", "plant_area_name": "重复" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .send(
            "PUT",
            "/plant-areas/P1",
            Some(&manager),
            Some(json!({ "location_desc": "东区" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["location_desc"], "东区");
    assert_eq!(response.body["data"]["plant_area_name"], "一号厂区");

    let response = app
        .send(
            "POST",
            "/devices",
            Some(&manager),
            Some(json!({
                "device_id": "D1",
                "device_name": "电表",
                "device_type": "电表",
                "plant_area_id": "P404"
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "指定的厂区不存在");

    let response = app
        .send(
            "POST",
            "/devices",
            Some(&manager),
            Some(json!({
                "device_id": "D1",
                "device_name": "电表",
                "device_type": "电表",
                "plant_area_id": "P1"
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["status"], "正常");

    let response = app.send("GET", "/devices", Some(&viewer), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(1));

    let response = app.send("DELETE", "/devices/D1", Some(&manager), None).await;
    assert_eq!(response.status, StatusCode::OK);
    let response = app.send("GET", "/devices/D1", Some(&viewer), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn substation_requires_existing_plant_area_and_iso_date() {
    let app = spawn_app().await;
    let admin = app.user_with_roles("root", &[Role::Admin]).await;

    let response = app
        .send(
            "POST",
            "/substation/rooms",
            Some(&admin),
            Some(json!({ "substation_id": "S1", "plant_area_id": "P404", "substation_name": "x" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "指定的厂区不存在");

    seed_substation(&app, &admin).await;

    let response = app
        .send(
            "PUT",
            "/substation/rooms/S1",
            Some(&admin),
            Some(json!({ "commissioning_date": "01/05/2020" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "日期格式错误，请使用ISO格式");

    let response = app
        .send(
            "PUT",
            "/substation/rooms/S1",
            Some(&admin),
            Some(json!({ "voltageLevel": "10kV" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["voltage_level"], "10kV");
    assert_eq!(response.body["data"]["commissioning_date"], "2020-05-01");

    let response = app
        .send("GET", "/api/substation/rooms/plant_area/P1", Some(&admin), None)
        .await;
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(1));

    let response = app
        .send("GET", "/substation/rooms?plant_area_id=P2", Some(&admin), None)
        .await;
    assert_eq!(response.body["data"], json!([]));

    let response = app.send("GET", "/substation/rooms/S404", Some(&admin), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "配电房不存在");
}

#[tokio::test]
async fn circuit_readings_enforce_constraints_and_merge_updates() {
    let app = spawn_app().await;
    let admin = app.user_with_roles("root", &[Role::Admin]).await;
    seed_substation(&app, &admin).await;

    let reading = json!({
        "substation_id": "S1",
        "circuit_id": "C1",
        "collection_time": "2025-01-01T00:00:00Z",
        "voltage": 380.0,
        "power_factor": 0.95,
        "switch_status": "合闸"
    });
    let response = app
        .send("POST", "/substation/circuits", Some(&admin), Some(reading.clone()))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["data"]["circuit_data_id"]
        .as_i64()
        .expect("id");
    assert_eq!(response.body["data"]["voltage"], 380.0);

    let response = app
        .send("POST", "/substation/circuits", Some(&admin), Some(reading.clone()))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let mut invalid = reading.clone();
    invalid["collection_time"] = json!("2025-01-01T00:05:00Z");
    invalid["power_factor"] = json!(1.2);
    let response = app
        .send("POST", "/substation/circuits", Some(&admin), Some(invalid))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let mut orphan = reading.clone();
    orphan["substation_id"] = json!("S404");
    let response = app
        .send("POST", "/substation/circuits", Some(&admin), Some(orphan))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .send(
            "PUT",
            &format!("/substation/circuits/{id}"),
            Some(&admin),
            Some(json!({ "current": 12.5 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["current"], 12.5);
    assert_eq!(response.body["data"]["voltage"], 380.0);

    let response = app
        .send(
            "PUT",
            &format!("/substation/circuits/{id}"),
            Some(&admin),
            Some(json!({ "switch_status": "半闸" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .send("DELETE", &format!("/substation/circuits/{id}"), Some(&admin), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let response = app
        .send("GET", &format!("/substation/circuits/{id}"), Some(&admin), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "回路监测数据不存在");
}

#[tokio::test]
async fn transformer_readings_enforce_constraints() {
    let app = spawn_app().await;
    let admin = app.user_with_roles("root", &[Role::Admin]).await;
    let analyst = app.user_with_roles("ada", &[Role::DataAnalyst]).await;
    seed_substation(&app, &admin).await;

    let response = app
        .send(
            "POST",
            "/substation/transformers",
            Some(&admin),
            Some(json!({
                "substation_id": "S1",
                "transformer_id": "T1",
                "collection_time": "2025-01-01 00:00:00",
                "load_rate": -1.0
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .send(
            "POST",
            "/substation/transformers",
            Some(&admin),
            Some(json!({
                "substation_id": "S1",
                "transformer_id": "T1",
                "collection_time": "2025-01-01 00:00:00",
                "load_rate": 0.75,
                "running_status": "正常"
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .send(
            "POST",
            "/substation/transformers",
            Some(&analyst),
            Some(json!({ "substation_id": "S1", "transformer_id": "T2" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .send(
            "GET",
            "/substation/transformers?substation_id=S1",
            Some(&analyst),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"][0]["running_status"], "正常");
    assert_eq!(response.body["data"][0]["load_rate"], 0.75);
}
