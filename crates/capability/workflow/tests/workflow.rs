use chrono::{DateTime, TimeZone, Utc};
use domain::AlarmStatus;
use ems_storage::{
    AlarmStore, DeviceRecord, DeviceStore, InMemoryAlarmStore, InMemoryDeviceStore,
    InMemoryPlantAreaStore, NewMaintenanceOrder,
};
use ems_workflow::{AlarmDraft, AlarmWorkflow, WorkflowError, purge_cutoff};
use std::sync::Arc;

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid time")
}

async fn setup() -> (AlarmWorkflow, Arc<InMemoryAlarmStore>) {
    let areas = Arc::new(InMemoryPlantAreaStore::new());
    let devices = Arc::new(InMemoryDeviceStore::new(areas));
    devices
        .create_device(DeviceRecord {
            device_id: "D1".to_string(),
            device_name: "1号变压器".to_string(),
            device_type: "变压器".to_string(),
            plant_area_id: None,
            manufacturer: None,
            model: None,
            status: "正常".to_string(),
        })
        .await
        .expect("device");
    let store = Arc::new(InMemoryAlarmStore::new(devices));
    (AlarmWorkflow::new(store.clone()), store)
}

fn draft(alarm_id: &str, occur_time: DateTime<Utc>) -> AlarmDraft {
    AlarmDraft {
        alarm_id: Some(alarm_id.to_string()),
        device_id: Some("D1".to_string()),
        alarm_type: Some("越限告警".to_string()),
        occur_time: Some(occur_time),
        alarm_level: Some(3),
        alarm_content: Some("绕组温度过高".to_string()),
        threshold_value: Some(95.5),
    }
}

fn order(order_id: &str, alarm_id: &str) -> NewMaintenanceOrder {
    NewMaintenanceOrder {
        order_id: order_id.to_string(),
        alarm_id: alarm_id.to_string(),
        maintainer_id: "M1".to_string(),
    }
}

#[tokio::test]
async fn recorded_alarm_is_always_unhandled() {
    let (workflow, _) = setup().await;
    let record = workflow
        .record_alarm(draft("A1", at(2025, 1, 1)))
        .await
        .expect("record");
    assert_eq!(record.status, AlarmStatus::Unhandled);
}

#[tokio::test]
async fn record_rejects_missing_fields() {
    let (workflow, store) = setup().await;
    let mut missing_level = draft("A1", at(2025, 1, 1));
    missing_level.alarm_level = None;
    assert!(matches!(
        workflow.record_alarm(missing_level).await,
        Err(WorkflowError::Validation(_))
    ));

    let mut blank_content = draft("A2", at(2025, 1, 1));
    blank_content.alarm_content = Some("   ".to_string());
    assert!(matches!(
        workflow.record_alarm(blank_content).await,
        Err(WorkflowError::Validation(_))
    ));

    let mut missing_threshold = draft("A3", at(2025, 1, 1));
    missing_threshold.threshold_value = None;
    assert!(matches!(
        workflow.record_alarm(missing_threshold).await,
        Err(WorkflowError::Validation(_))
    ));
    assert!(store.list_alarm_details().await.expect("list").is_empty());
}

#[tokio::test]
async fn dispatch_then_complete_walks_the_state_machine() {
    let (workflow, store) = setup().await;
    workflow
        .record_alarm(draft("A1", at(2025, 1, 1)))
        .await
        .expect("record");

    let dispatched = workflow
        .dispatch_order(order("O1", "A1"))
        .await
        .expect("dispatch");
    assert!(dispatched.finish_time.is_none());
    let alarm = store.find_alarm("A1").await.expect("find").expect("alarm");
    assert_eq!(alarm.status, AlarmStatus::InProgress);

    let completed = workflow
        .complete_order("O1", Some("已更换散热风扇".to_string()), None)
        .await
        .expect("complete");
    assert!(completed.finish_time.is_some());
    assert_eq!(completed.result.as_deref(), Some("已更换散热风扇"));
    let alarm = store.find_alarm("A1").await.expect("find").expect("alarm");
    assert_eq!(alarm.status, AlarmStatus::Closed);
}

#[tokio::test]
async fn dispatch_for_missing_alarm_is_transaction_failure() {
    let (workflow, store) = setup().await;
    let result = workflow.dispatch_order(order("O1", "NOPE")).await;
    assert!(matches!(result, Err(WorkflowError::TransactionFailed(_))));
    assert!(store.find_order("O1").await.expect("find").is_none());
}

#[tokio::test]
async fn dispatch_is_permitted_from_any_status() {
    let (workflow, store) = setup().await;
    workflow
        .record_alarm(draft("A1", at(2025, 1, 1)))
        .await
        .expect("record");
    workflow.handle_alarm("A1").await.expect("handle");
    workflow
        .dispatch_order(order("O1", "A1"))
        .await
        .expect("dispatch");
    workflow
        .dispatch_order(order("O2", "A1"))
        .await
        .expect("second dispatch");
    let alarm = store.find_alarm("A1").await.expect("find").expect("alarm");
    assert_eq!(alarm.status, AlarmStatus::InProgress);
}

#[tokio::test]
async fn complete_missing_order_is_not_found() {
    let (workflow, _) = setup().await;
    let result = workflow
        .complete_order("NOPE", Some("done".to_string()), None)
        .await;
    assert!(matches!(result, Err(WorkflowError::NotFound(_))));
}

#[tokio::test]
async fn complete_requires_result() {
    let (workflow, _) = setup().await;
    let result = workflow.complete_order("O1", None, None).await;
    assert!(matches!(result, Err(WorkflowError::Validation(_))));
}

#[tokio::test]
async fn handle_sets_handled_or_not_found() {
    let (workflow, store) = setup().await;
    workflow
        .record_alarm(draft("A1", at(2025, 1, 1)))
        .await
        .expect("record");
    workflow.handle_alarm("A1").await.expect("handle");
    let alarm = store.find_alarm("A1").await.expect("find").expect("alarm");
    assert_eq!(alarm.status, AlarmStatus::Handled);

    assert!(matches!(
        workflow.handle_alarm("NOPE").await,
        Err(WorkflowError::NotFound(_))
    ));
}

#[test]
fn cutoff_is_one_calendar_year_back() {
    assert_eq!(purge_cutoff(at(2025, 6, 15)), at(2024, 6, 15));
    assert_eq!(purge_cutoff(at(2024, 2, 29)), at(2023, 2, 28));
}

#[tokio::test]
async fn purge_removes_only_closed_alarms_older_than_a_year() {
    let (workflow, store) = setup().await;
    let now = at(2025, 6, 15);

    for (alarm_id, occur_time) in [
        ("OLD", at(2024, 6, 14)),
        ("EXACT", at(2024, 6, 15)),
        ("RECENT", at(2025, 1, 1)),
        ("OLD_OPEN", at(2023, 1, 1)),
    ] {
        workflow
            .record_alarm(draft(alarm_id, occur_time))
            .await
            .expect("record");
    }
    for alarm_id in ["OLD", "EXACT", "RECENT"] {
        store
            .set_alarm_status(alarm_id, AlarmStatus::Closed)
            .await
            .expect("status");
    }

    let removed = workflow.purge_closed_alarms_at(now).await.expect("purge");
    assert_eq!(removed, 1);
    assert!(store.find_alarm("OLD").await.expect("find").is_none());
    assert!(store.find_alarm("EXACT").await.expect("find").is_some());
    assert!(store.find_alarm("RECENT").await.expect("find").is_some());
    assert!(store.find_alarm("OLD_OPEN").await.expect("find").is_some());
}
