use chrono::{TimeZone, Utc};
use domain::AlarmStatus;
use ems_storage::{
    AlarmStore, CircuitMeasurements, CircuitReadingCreate, CircuitReadingStore, DeviceRecord,
    DeviceStore, DeviceUpdate, InMemoryAlarmStore, InMemoryCircuitReadingStore,
    InMemoryDeviceStore, InMemoryPlantAreaStore, InMemorySubstationStore, NewAlarm,
    PlantAreaRecord, PlantAreaStore, SubstationRecord, SubstationStore,
};
use std::sync::Arc;

fn area(plant_area_id: &str) -> PlantAreaRecord {
    PlantAreaRecord {
        plant_area_id: plant_area_id.to_string(),
        plant_area_name: format!("厂区{plant_area_id}"),
        location_desc: None,
        manager_id: None,
        contact_phone: None,
    }
}

fn device(device_id: &str, plant_area_id: Option<&str>) -> DeviceRecord {
    DeviceRecord {
        device_id: device_id.to_string(),
        device_name: format!("设备{device_id}"),
        device_type: "变压器".to_string(),
        plant_area_id: plant_area_id.map(str::to_string),
        manufacturer: None,
        model: None,
        status: "正常".to_string(),
    }
}

async fn areas() -> Arc<InMemoryPlantAreaStore> {
    let areas = Arc::new(InMemoryPlantAreaStore::new());
    for id in ["PA01", "PA02"] {
        areas.create_plant_area(area(id)).await.expect("area");
    }
    areas
}

#[tokio::test]
async fn plant_area_with_devices_cannot_be_deleted() {
    let areas = areas().await;
    let devices = InMemoryDeviceStore::new(areas.clone());
    devices
        .create_device(device("D1", Some("PA01")))
        .await
        .expect("device");

    let err = areas
        .delete_plant_area("PA01")
        .await
        .expect_err("area still referenced");
    assert!(err.is_foreign_key_violation());
    assert!(areas.find_plant_area("PA01").await.expect("find").is_some());

    // 改挂到另一个厂区后原厂区可删，新厂区被占用
    devices
        .update_device(
            "D1",
            DeviceUpdate {
                plant_area_id: Some("PA02".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("update");
    assert!(areas.delete_plant_area("PA01").await.expect("delete"));
    assert!(areas.delete_plant_area("PA02").await.is_err());

    assert!(devices.delete_device("D1").await.expect("delete device"));
    assert!(areas.delete_plant_area("PA02").await.expect("delete"));
    assert!(!areas.delete_plant_area("PA02").await.expect("missing"));
}

#[tokio::test]
async fn failed_device_insert_does_not_pin_plant_area() {
    let areas = areas().await;
    let devices = InMemoryDeviceStore::new(areas.clone());
    devices
        .create_device(device("D1", Some("PA01")))
        .await
        .expect("device");
    assert!(devices.create_device(device("D1", Some("PA02"))).await.is_err());
    assert!(devices.create_device(device("D2", Some("NOPE"))).await.is_err());

    assert!(areas.delete_plant_area("PA02").await.expect("delete"));
}

#[tokio::test]
async fn device_with_alarms_cannot_be_deleted_until_purged() {
    let devices = Arc::new(InMemoryDeviceStore::new(areas().await));
    devices
        .create_device(device("D1", None))
        .await
        .expect("device");
    let alarms = InMemoryAlarmStore::new(devices.clone());
    let occur_time = Utc
        .with_ymd_and_hms(2025, 1, 1, 8, 0, 0)
        .single()
        .expect("time");
    alarms
        .insert_alarm(NewAlarm {
            alarm_id: "A1".to_string(),
            device_id: "D1".to_string(),
            alarm_type: "越限告警".to_string(),
            occur_time,
            alarm_level: 3,
            alarm_content: "温度过高".to_string(),
            threshold_value: 80.0,
        })
        .await
        .expect("alarm");

    let err = devices
        .delete_device("D1")
        .await
        .expect_err("device still referenced");
    assert!(err.is_foreign_key_violation());
    assert_eq!(alarms.list_alarm_details().await.expect("details").len(), 1);

    alarms
        .set_alarm_status("A1", AlarmStatus::Closed)
        .await
        .expect("close");
    let cutoff = Utc
        .with_ymd_and_hms(2025, 6, 1, 0, 0, 0)
        .single()
        .expect("time");
    assert_eq!(alarms.purge_closed_alarms(cutoff).await.expect("purge"), 1);
    assert!(devices.delete_device("D1").await.expect("delete"));
}

#[tokio::test]
async fn substation_with_readings_cannot_be_deleted() {
    let areas = areas().await;
    let substations = Arc::new(InMemorySubstationStore::new(areas.clone()));
    substations
        .create_substation(SubstationRecord {
            substation_id: "S1".to_string(),
            plant_area_id: "PA01".to_string(),
            substation_name: "主变电站".to_string(),
            substation_location_desc: None,
            voltage_level: None,
            transformer_count: 1,
            commissioning_date: None,
            responsible_user_id: None,
            contact_phone: None,
        })
        .await
        .expect("substation");
    assert!(areas.delete_plant_area("PA01").await.is_err());

    let readings = InMemoryCircuitReadingStore::new(substations.clone());
    let reading = readings
        .create_circuit_reading(CircuitReadingCreate {
            substation_id: "S1".to_string(),
            circuit_id: "C1".to_string(),
            collection_time: Utc
                .with_ymd_and_hms(2025, 3, 1, 10, 0, 0)
                .single()
                .expect("time"),
            measurements: CircuitMeasurements {
                switch_status: Some("合闸".to_string()),
                ..Default::default()
            },
        })
        .await
        .expect("reading");

    let err = substations
        .delete_substation("S1")
        .await
        .expect_err("substation still referenced");
    assert!(err.is_foreign_key_violation());

    assert!(readings
        .delete_circuit_reading(reading.circuit_data_id)
        .await
        .expect("delete reading"));
    assert!(substations.delete_substation("S1").await.expect("delete"));
    assert!(areas.delete_plant_area("PA01").await.expect("delete area"));
}
