mod common;

use axum::http::StatusCode;
use chrono::{Duration, SecondsFormat, Utc};
use common::{TestApp, spawn_app};
use domain::Role;
use serde_json::{Value, json};

fn config(display_module: &str, refresh_frequency: i32) -> Value {
    json!({
        "display_module": display_module,
        "refresh_frequency": refresh_frequency,
        "display_fields": "total_electricity,pv_total_generation",
        "sorting_rule": "按时间降序",
        "permission_level": "能源管理员"
    })
}

fn hours_ago(hours: i64) -> String {
    (Utc::now() - Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

async fn post_summary(app: &TestApp, token: &str, body: Value) -> StatusCode {
    app.send("POST", "/dashboard/summary", Some(token), Some(body))
        .await
        .status
}

fn column_sum(rows: &Value, column: &str) -> i64 {
    rows.as_array()
        .map(|rows| rows.iter().filter_map(|row| row[column].as_i64()).sum())
        .unwrap_or_default()
}

#[tokio::test]
async fn dashboard_config_crud() {
    let app = spawn_app().await;
    let admin = app.user_with_roles("admin", &[Role::Admin]).await;
    let director = app.user_with_roles("mark", &[Role::Manager]).await;
    let maintainer = app.user_with_roles("mona", &[Role::Maintenance]).await;
    let viewer = app.user_with_roles("ursula", &[Role::User]).await;

    let response = app
        .send(
            "POST",
            "/dashboard/configs",
            Some(&maintainer),
            Some(config("能源总览", 30)),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    for body in [config("未知模块", 30), config("能源总览", 0)] {
        let response = app
            .send("POST", "/dashboard/configs", Some(&director), Some(body))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error_code"], "VALIDATION_ERROR");
    }

    let response = app
        .send(
            "POST",
            "/dashboard/configs",
            Some(&director),
            Some(config("能源总览", 30)),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "配置创建成功");
    assert_eq!(response.body["data"]["config_id"], 1);

    let response = app
        .send("GET", "/dashboard/configs", Some(&viewer), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(1));

    let response = app
        .send(
            "GET",
            "/dashboard/configs?module=%E5%85%89%E4%BC%8F%E6%80%BB%E8%A7%88",
            Some(&viewer),
            None,
        )
        .await;
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(0));

    let response = app
        .send(
            "PUT",
            "/dashboard/configs/1",
            Some(&director),
            Some(json!({ "refresh_frequency": 60 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "配置更新成功");
    assert_eq!(response.body["data"]["refresh_frequency"], 60);
    assert_eq!(response.body["data"]["display_module"], "能源总览");

    let response = app
        .send(
            "PUT",
            "/dashboard/configs/99",
            Some(&director),
            Some(json!({ "refresh_frequency": 60 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "配置不存在");

    let response = app
        .send("DELETE", "/dashboard/configs/1", Some(&director), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .send("DELETE", "/dashboard/configs/1", Some(&admin), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "配置删除成功");

    let response = app
        .send("GET", "/dashboard/configs/1", Some(&viewer), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn summaries_feed_latest_and_alarm_statistics() {
    let app = spawn_app().await;
    let manager = app.user_with_roles("emma", &[Role::EnergyManager]).await;
    let viewer = app.user_with_roles("ursula", &[Role::User]).await;

    let response = app
        .send("GET", "/dashboard/summary/latest", Some(&viewer), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "暂无数据");
    assert_eq!(response.body["data"], json!({}));

    let earlier = hours_ago(2);
    let summary = json!({
        "statistics_time": earlier,
        "total_electricity": 1200.5,
        "total_alarms": 3,
        "high_level_alarms": 1,
        "medium_level_alarms": 1,
        "low_level_alarms": 1
    });
    assert_eq!(
        post_summary(&app, &viewer, summary.clone()).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        post_summary(&app, &manager, summary.clone()).await,
        StatusCode::CREATED
    );
    assert_eq!(
        post_summary(&app, &manager, summary).await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        post_summary(
            &app,
            &manager,
            json!({ "statistics_time": hours_ago(1), "total_alarms": 2, "high_level_alarms": 2 }),
        )
        .await,
        StatusCode::CREATED
    );
    assert_eq!(
        post_summary(
            &app,
            &manager,
            json!({ "statistics_time": hours_ago(24 * 30), "total_alarms": 9 }),
        )
        .await,
        StatusCode::CREATED
    );
    assert_eq!(
        post_summary(
            &app,
            &manager,
            json!({ "statistics_time": hours_ago(3), "total_gas": -1.0 }),
        )
        .await,
        StatusCode::BAD_REQUEST
    );

    let response = app
        .send("GET", "/dashboard/summary/latest", Some(&viewer), None)
        .await;
    assert_eq!(response.body["data"]["total_alarms"], 2);
    assert_eq!(response.body["data"]["high_level_alarms"], 2);

    let response = app
        .send(
            "GET",
            "/dashboard/summary/alarm-statistics",
            Some(&viewer),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let rows = &response.body["data"];
    assert_eq!(column_sum(rows, "total_alarms"), 5);
    assert_eq!(column_sum(rows, "high_alarms"), 3);
    assert_eq!(column_sum(rows, "low_alarms"), 1);

    let response = app
        .send(
            "GET",
            "/dashboard/summary/alarm-statistics?days=0",
            Some(&viewer),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn energy_trends_filter_by_type_and_cycle() {
    let app = spawn_app().await;
    let manager = app.user_with_roles("emma", &[Role::EnergyManager]).await;
    let viewer = app.user_with_roles("ursula", &[Role::User]).await;

    let response = app
        .send(
            "POST",
            "/dashboard/trends",
            Some(&manager),
            Some(json!({
                "energy_type": "煤",
                "statistical_cycle": "日",
                "statistical_date": "2025-06-01",
                "energy_value": 10.0
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    for (energy_type, cycle, date) in [
        ("电", "日", "2025-06-01"),
        ("电", "月", "2025-06-01"),
        ("电", "日", "2025-06-02"),
        ("水", "日", "2025-06-01"),
    ] {
        let response = app
            .send(
                "POST",
                "/dashboard/trends",
                Some(&manager),
                Some(json!({
                    "energy_type": energy_type,
                    "statistical_cycle": cycle,
                    "statistical_date": date,
                    "energy_value": 100.0,
                    "yoy_growth_rate": 3.5
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let response = app
        .send("GET", "/dashboard/trends/energy", Some(&viewer), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "缺少必要字段: type");

    let response = app
        .send(
            "GET",
            "/dashboard/trends/energy?type=%E7%94%B5",
            Some(&viewer),
            None,
        )
        .await;
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(3));

    let response = app
        .send(
            "GET",
            "/dashboard/trends/energy?type=%E7%94%B5&cycle=%E6%97%A5",
            Some(&viewer),
            None,
        )
        .await;
    let rows = &response.body["data"];
    assert_eq!(rows.as_array().map(Vec::len), Some(2));
    assert_eq!(rows[0]["statistical_date"], "2025-06-02");
}
