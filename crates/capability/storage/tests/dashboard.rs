use chrono::{NaiveDate, TimeZone, Utc};
use ems_storage::{
    DashboardConfigCreate, DashboardConfigFilter, DashboardConfigUpdate, DashboardStore,
    HistoricalTrendCreate, InMemoryDashboardStore, RealtimeSummaryCreate, SummaryFigures,
};

fn config(module: &str, level: &str) -> DashboardConfigCreate {
    DashboardConfigCreate {
        display_module: module.to_string(),
        refresh_frequency: 30,
        display_fields: "total_electricity,total_water".to_string(),
        sorting_rule: Some("按时间降序".to_string()),
        permission_level: level.to_string(),
    }
}

fn trend(energy_type: &str, cycle: &str, day: u32) -> HistoricalTrendCreate {
    HistoricalTrendCreate {
        energy_type: energy_type.to_string(),
        statistical_cycle: cycle.to_string(),
        statistical_date: NaiveDate::from_ymd_opt(2025, 5, day).expect("date"),
        energy_value: 1200.0 + f64::from(day),
        yoy_growth_rate: Some(3.5),
        mom_growth_rate: None,
        industry_average: None,
    }
}

#[tokio::test]
async fn configs_get_sequential_ids_and_checked_values() {
    let store = InMemoryDashboardStore::new();
    let first = store
        .create_dashboard_config(config("能源总览", "管理员"))
        .await
        .expect("first");
    let second = store
        .create_dashboard_config(config("告警统计", "运维人员"))
        .await
        .expect("second");
    assert_eq!((first.config_id, second.config_id), (1, 2));

    assert!(store
        .create_dashboard_config(config("天气", "管理员"))
        .await
        .is_err());
    let mut zero = config("能源总览", "管理员");
    zero.refresh_frequency = 0;
    assert!(store.create_dashboard_config(zero).await.is_err());

    let filtered = store
        .list_dashboard_configs(DashboardConfigFilter {
            permission_level: Some("运维人员".to_string()),
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].display_module, "告警统计");

    assert!(store
        .update_dashboard_config(
            1,
            DashboardConfigUpdate {
                sorting_rule: Some("随机".to_string()),
                ..Default::default()
            },
        )
        .await
        .is_err());
    let updated = store
        .update_dashboard_config(
            1,
            DashboardConfigUpdate {
                refresh_frequency: Some(60),
                ..Default::default()
            },
        )
        .await
        .expect("update")
        .expect("exists");
    assert_eq!(updated.refresh_frequency, 60);

    assert!(store.delete_dashboard_config(1).await.expect("delete"));
    assert!(store.find_dashboard_config(1).await.expect("find").is_none());
}

#[tokio::test]
async fn latest_summary_follows_statistics_time() {
    let store = InMemoryDashboardStore::new();
    assert!(store.latest_summary().await.expect("latest").is_none());

    for (hour, alarms) in [(10, 3), (8, 1), (9, 2)] {
        store
            .insert_summary(RealtimeSummaryCreate {
                statistics_time: Utc
                    .with_ymd_and_hms(2025, 6, 1, hour, 0, 0)
                    .single()
                    .expect("time"),
                figures: SummaryFigures {
                    total_alarms: Some(alarms),
                    ..Default::default()
                },
            })
            .await
            .expect("insert");
    }
    let latest = store
        .latest_summary()
        .await
        .expect("latest")
        .expect("exists");
    assert_eq!(latest.figures.total_alarms, Some(3));

    let duplicate = RealtimeSummaryCreate {
        statistics_time: latest.statistics_time,
        figures: SummaryFigures::default(),
    };
    assert!(store.insert_summary(duplicate).await.is_err());

    let from = Utc
        .with_ymd_and_hms(2025, 6, 1, 8, 30, 0)
        .single()
        .expect("time");
    let window = store
        .list_summaries(from, latest.statistics_time)
        .await
        .expect("window");
    let alarms: Vec<Option<i32>> = window.iter().map(|item| item.figures.total_alarms).collect();
    assert_eq!(alarms, [Some(2), Some(3)]);
}

#[tokio::test]
async fn trends_filter_by_type_and_cycle() {
    let store = InMemoryDashboardStore::new();
    store.insert_trend(trend("电", "日", 1)).await.expect("t1");
    store.insert_trend(trend("电", "日", 3)).await.expect("t2");
    store.insert_trend(trend("电", "月", 1)).await.expect("t3");
    store.insert_trend(trend("水", "日", 2)).await.expect("t4");
    assert!(store.insert_trend(trend("煤", "日", 2)).await.is_err());
    assert!(store.insert_trend(trend("电", "年", 2)).await.is_err());

    let daily = store.list_trends("电", Some("日")).await.expect("daily");
    let days: Vec<String> = daily
        .iter()
        .map(|item| item.statistical_date.to_string())
        .collect();
    assert_eq!(days, ["2025-05-03", "2025-05-01"]);
    assert_eq!(store.list_trends("电", None).await.expect("all").len(), 3);
}
