use chrono::{NaiveDate, TimeZone, Utc};
use ems_storage::{
    CircuitMeasurements, CircuitReadingCreate, CircuitReadingStore, InMemoryCircuitReadingStore,
    InMemoryPlantAreaStore, InMemorySubstationStore, InMemoryTransformerReadingStore,
    PlantAreaRecord, PlantAreaStore, SubstationRecord, SubstationStore, SubstationUpdate,
    TransformerMeasurements, TransformerReadingCreate, TransformerReadingStore,
};
use std::sync::Arc;

async fn substations() -> Arc<InMemorySubstationStore> {
    let areas = Arc::new(InMemoryPlantAreaStore::new());
    areas
        .create_plant_area(PlantAreaRecord {
            plant_area_id: "PA01".to_string(),
            plant_area_name: "一号厂区".to_string(),
            location_desc: None,
            manager_id: None,
            contact_phone: None,
        })
        .await
        .expect("area");
    let store = Arc::new(InMemorySubstationStore::new(areas));
    store
        .create_substation(substation("S1", "PA01"))
        .await
        .expect("substation");
    store
}

fn substation(substation_id: &str, plant_area_id: &str) -> SubstationRecord {
    SubstationRecord {
        substation_id: substation_id.to_string(),
        plant_area_id: plant_area_id.to_string(),
        substation_name: "主变电站".to_string(),
        substation_location_desc: None,
        voltage_level: Some("10kV".to_string()),
        transformer_count: 2,
        commissioning_date: NaiveDate::from_ymd_opt(2020, 5, 1),
        responsible_user_id: None,
        contact_phone: None,
    }
}

fn circuit(switch_status: &str, power_factor: f64) -> CircuitReadingCreate {
    CircuitReadingCreate {
        substation_id: "S1".to_string(),
        circuit_id: "C1".to_string(),
        collection_time: Utc
            .with_ymd_and_hms(2025, 3, 1, 10, 0, 0)
            .single()
            .expect("time"),
        measurements: CircuitMeasurements {
            voltage: Some(10.2),
            power_factor: Some(power_factor),
            switch_status: Some(switch_status.to_string()),
            ..Default::default()
        },
    }
}

#[tokio::test]
async fn substation_requires_existing_area_and_filters_by_area() {
    let store = substations().await;
    assert!(store
        .create_substation(substation("S2", "MISSING"))
        .await
        .is_err());
    assert_eq!(
        store
            .list_substations(Some("PA01"))
            .await
            .expect("list")
            .len(),
        1
    );
    assert!(store
        .list_substations(Some("PA02"))
        .await
        .expect("list")
        .is_empty());

    let updated = store
        .update_substation(
            "S1",
            SubstationUpdate {
                transformer_count: Some(3),
                ..Default::default()
            },
        )
        .await
        .expect("update")
        .expect("substation");
    assert_eq!(updated.transformer_count, 3);
    assert_eq!(updated.voltage_level.as_deref(), Some("10kV"));
}

#[tokio::test]
async fn circuit_reading_enforces_constraints() {
    let store = InMemoryCircuitReadingStore::new(substations().await);
    let created = store
        .create_circuit_reading(circuit("合闸", 0.95))
        .await
        .expect("create");
    assert_eq!(created.circuit_data_id, 1);

    // 唯一键 (substation_id, circuit_id, collection_time)
    assert!(store
        .create_circuit_reading(circuit("合闸", 0.9))
        .await
        .is_err());

    let mut bad_switch = circuit("断开", 0.9);
    bad_switch.circuit_id = "C2".to_string();
    assert!(store.create_circuit_reading(bad_switch).await.is_err());

    let mut bad_factor = circuit("分闸", 1.0);
    bad_factor.circuit_id = "C3".to_string();
    assert!(store.create_circuit_reading(bad_factor).await.is_err());

    let mut unknown_substation = circuit("分闸", 0.5);
    unknown_substation.substation_id = "S9".to_string();
    assert!(store.create_circuit_reading(unknown_substation).await.is_err());
}

#[tokio::test]
async fn circuit_update_merges_measurements() {
    let store = InMemoryCircuitReadingStore::new(substations().await);
    let created = store
        .create_circuit_reading(circuit("合闸", 0.95))
        .await
        .expect("create");
    let updated = store
        .update_circuit_reading(
            created.circuit_data_id,
            CircuitMeasurements {
                switch_status: Some("分闸".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("update")
        .expect("reading");
    assert_eq!(updated.measurements.switch_status.as_deref(), Some("分闸"));
    assert_eq!(updated.measurements.voltage, Some(10.2));

    assert!(store
        .delete_circuit_reading(created.circuit_data_id)
        .await
        .expect("delete"));
    assert!(store
        .find_circuit_reading(created.circuit_data_id)
        .await
        .expect("find")
        .is_none());
}

#[tokio::test]
async fn transformer_reading_enforces_constraints() {
    let store = InMemoryTransformerReadingStore::new(substations().await);
    let reading = |load_rate: f64, status: &str| TransformerReadingCreate {
        substation_id: "S1".to_string(),
        transformer_id: "T1".to_string(),
        collection_time: Utc
            .with_ymd_and_hms(2025, 3, 1, 10, 0, 0)
            .single()
            .expect("time"),
        measurements: TransformerMeasurements {
            load_rate: Some(load_rate),
            running_status: Some(status.to_string()),
            ..Default::default()
        },
    };

    assert!(store
        .create_transformer_reading(reading(-0.1, "正常"))
        .await
        .is_err());
    assert!(store
        .create_transformer_reading(reading(0.6, "停机"))
        .await
        .is_err());
    store
        .create_transformer_reading(reading(0.6, "正常"))
        .await
        .expect("create");
    assert!(store
        .create_transformer_reading(reading(0.7, "异常"))
        .await
        .is_err());

    let list = store
        .list_transformer_readings(Some("S1"))
        .await
        .expect("list");
    assert_eq!(list.len(), 1);
}
