mod common;

use axum::http::StatusCode;
use common::{TestApp, spawn_app};
use domain::Role;
use serde_json::{Value, json};

fn inverter(device_id: &str) -> Value {
    json!({
        "device_id": device_id,
        "device_type": "逆变器",
        "location": "一号屋顶",
        "capacity": 50.0,
        "operation_date": "2023-04-01",
        "calibration_cycle": 12,
        "protocol": "RS485"
    })
}

async fn seed_device(app: &TestApp, token: &str, device_id: &str) {
    let response = app
        .send("POST", "/pv/devices", Some(token), Some(inverter(device_id)))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
}

async fn seed_generation(app: &TestApp, token: &str, data_id: &str, hour: u32, efficiency: f64) {
    let response = app
        .send(
            "POST",
            "/pv/generation",
            Some(token),
            Some(json!({
                "data_id": data_id,
                "device_id": "INV01",
                "grid_point_id": "GP1",
                "collect_time": format!("2025-06-01T{hour:02}:00:00Z"),
                "generation": 12.5,
                "feed_in": 8.0,
                "self_use": 4.5,
                "inverter_efficiency": efficiency
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
}

#[tokio::test]
async fn pv_device_crud_enforces_roles_and_checks() {
    let app = spawn_app().await;
    let admin = app.user_with_roles("admin", &[Role::Admin]).await;
    let manager = app.user_with_roles("emma", &[Role::EnergyManager]).await;
    let analyst = app.user_with_roles("vic", &[Role::DataAnalyst]).await;
    let maintainer = app.user_with_roles("mona", &[Role::Maintenance]).await;

    let response = app
        .send("POST", "/pv/devices", Some(&analyst), Some(inverter("INV01")))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let mut body = inverter("INV01");
    body["protocol"] = json!("Zigbee");
    let response = app
        .send("POST", "/pv/devices", Some(&manager), Some(body))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error_code"], "VALIDATION_ERROR");

    let mut body = inverter("INV01");
    body.as_object_mut().expect("object").remove("location");
    let response = app
        .send("POST", "/pv/devices", Some(&manager), Some(body))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "缺少必要字段: location");

    let response = app
        .send("POST", "/pv/devices", Some(&manager), Some(inverter("INV01")))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "设备创建成功");
    assert_eq!(response.body["data"]["status"], "正常");

    let response = app
        .send("POST", "/pv/devices", Some(&manager), Some(inverter("INV01")))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let mut body = inverter("INV02");
    body["status"] = json!("离线");
    let response = app
        .send("POST", "/pv/devices", Some(&manager), Some(body))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .send(
            "PUT",
            "/pv/devices/INV01",
            Some(&maintainer),
            Some(json!({ "status": "故障" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "设备更新成功");
    assert_eq!(response.body["data"]["status"], "故障");

    let response = app
        .send(
            "PUT",
            "/pv/devices/INV01",
            Some(&maintainer),
            Some(json!({ "capacity": -1.0 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .send("GET", "/pv/devices?status=%E7%A6%BB%E7%BA%BF", Some(&maintainer), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(1));

    let response = app
        .send("GET", "/pv/devices/stats/status", Some(&maintainer), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .send("GET", "/pv/devices/stats/status", Some(&analyst), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let stats = &response.body["data"];
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["normal"], 0);
    assert_eq!(stats["fault"], 1);
    assert_eq!(stats["offline"], 1);
    assert_eq!(stats["fault_rate"], 50.0);

    let response = app
        .send("DELETE", "/pv/devices/INV01", Some(&manager), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .send("DELETE", "/pv/devices/INV01", Some(&admin), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "设备删除成功");

    let response = app
        .send("GET", "/pv/devices/INV01", Some(&analyst), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "设备不存在");
}

#[tokio::test]
async fn generation_is_paginated_and_filtered() {
    let app = spawn_app().await;
    let admin = app.user_with_roles("admin", &[Role::Admin]).await;
    let manager = app.user_with_roles("emma", &[Role::EnergyManager]).await;
    let director = app.user_with_roles("mark", &[Role::Manager]).await;
    seed_device(&app, &manager, "INV01").await;

    seed_generation(&app, &manager, "G1", 8, 97.0).await;
    seed_generation(&app, &manager, "G2", 9, 80.0).await;
    seed_generation(&app, &manager, "G3", 10, 90.0).await;

    let response = app
        .send(
            "POST",
            "/pv/generation",
            Some(&manager),
            Some(json!({
                "data_id": "G9",
                "device_id": "NOPE",
                "grid_point_id": "GP1",
                "collect_time": "2025-06-01T11:00:00Z",
                "generation": 1.0,
                "feed_in": 0.5,
                "self_use": 0.5
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "指定的光伏设备不存在");

    let response = app
        .send(
            "POST",
            "/pv/generation",
            Some(&manager),
            Some(json!({
                "data_id": "G9",
                "device_id": "INV01",
                "grid_point_id": "GP1",
                "collect_time": "2025-06-01T11:00:00Z",
                "generation": 1.0,
                "feed_in": 0.5,
                "self_use": 0.5,
                "inverter_efficiency": 120.0
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .send("GET", "/pv/generation?per_page=2&page=1", Some(&director), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let page = &response.body["data"];
    assert_eq!(page["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(page["data"][0]["data_id"], "G3");
    assert_eq!(page["pagination"]["total"], 3);
    assert_eq!(page["pagination"]["total_pages"], 2);

    let response = app
        .send("GET", "/pv/generation?abnormal=true", Some(&director), None)
        .await;
    let page = &response.body["data"];
    assert_eq!(page["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(page["data"][0]["data_id"], "G2");

    let response = app
        .send(
            "GET",
            "/pv/generation?device_id=INV01&start_time=2025-06-01T09:00:00Z&end_time=2025-06-01T10:00:00Z",
            Some(&director),
            None,
        )
        .await;
    assert_eq!(response.body["data"]["pagination"]["total"], 2);

    let response = app
        .send("GET", "/pv/generation?start_time=yesterday", Some(&director), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    // 详情只向分析角色开放
    let response = app
        .send("GET", "/pv/generation/G1", Some(&director), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .send(
            "GET",
            "/pv/devices/INV01?include_generation=true",
            Some(&manager),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["data"]["generation_data"]
            .as_array()
            .map(Vec::len),
        Some(3)
    );
    assert!(response.body["data"].get("forecast_data").is_none());

    let response = app
        .send("DELETE", "/pv/devices/INV01", Some(&admin), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let response = app
        .send("GET", "/pv/generation/G1", Some(&manager), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "发电数据不存在");
}

#[tokio::test]
async fn forecast_deviation_is_recomputed() {
    let app = spawn_app().await;
    let manager = app.user_with_roles("emma", &[Role::EnergyManager]).await;
    let analyst = app.user_with_roles("vic", &[Role::DataAnalyst]).await;
    seed_device(&app, &manager, "INV01").await;

    for (forecast_id, forecast_generation) in [("F1", 100.0), ("F2", 0.0)] {
        let response = app
            .send(
                "POST",
                "/pv/forecasts",
                Some(&analyst),
                Some(json!({
                    "forecast_id": forecast_id,
                    "device_id": "INV01",
                    "grid_point_id": "GP1",
                    "forecast_date": "2025-06-01",
                    "time_slot": "10:00-11:00",
                    "forecast_generation": forecast_generation,
                    "model_version": "v1.2"
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.body["message"], "预测数据创建成功");
    }

    let response = app
        .send(
            "PUT",
            "/pv/forecasts/F1/deviation",
            Some(&analyst),
            Some(json!({})),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "缺少实际发电量数据");

    let response = app
        .send(
            "PUT",
            "/pv/forecasts/F1/deviation",
            Some(&analyst),
            Some(json!({ "actual_generation": 80.0 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "偏差率更新成功");
    assert_eq!(response.body["data"]["actual_generation"], 80.0);
    assert_eq!(response.body["data"]["deviation_rate"], 20.0);

    // 预测发电量为 0 时无法计算
    for forecast_id in ["F2", "NOPE"] {
        let response = app
            .send(
                "PUT",
                &format!("/pv/forecasts/{forecast_id}/deviation"),
                Some(&analyst),
                Some(json!({ "actual_generation": 10.0 })),
            )
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body["message"], "预测数据不存在或无法计算偏差率");
    }

    let response = app
        .send("GET", "/pv/forecasts?high_deviation=true", Some(&analyst), None)
        .await;
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(response.body["data"][0]["forecast_id"], "F1");

    let response = app
        .send("GET", "/pv/forecasts?date=2025-06-01", Some(&analyst), None)
        .await;
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(2));
}
