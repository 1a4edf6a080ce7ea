//! 回路 / 变压器监测数据内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 与数据库表保持相同约束：
//! - 所属变电站外键（删除时释放对变电站的引用）
//! - (substation_id, circuit_id|transformer_id, collection_time) 唯一
//! - 检查约束见 [`crate::validation`]

use crate::error::StorageError;
use crate::in_memory::InMemorySubstationStore;
use crate::models::{
    CircuitMeasurements, CircuitReadingCreate, CircuitReadingRecord, TransformerMeasurements,
    TransformerReadingCreate, TransformerReadingRecord,
};
use crate::traits::{CircuitReadingStore, TransformerReadingStore};
use crate::validation::{ensure_circuit_measurements, ensure_transformer_measurements};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

/// 回路监测内存存储
pub struct InMemoryCircuitReadingStore {
    table: RwLock<Table<CircuitReadingRecord>>,
    substations: Arc<InMemorySubstationStore>,
}

impl InMemoryCircuitReadingStore {
    pub fn new(substations: Arc<InMemorySubstationStore>) -> Self {
        Self {
            table: RwLock::new(Table::default()),
            substations,
        }
    }
}

#[async_trait::async_trait]
impl CircuitReadingStore for InMemoryCircuitReadingStore {
    async fn list_circuit_readings(
        &self,
        substation_id: Option<&str>,
    ) -> Result<Vec<CircuitReadingRecord>, StorageError> {
        let mut items: Vec<CircuitReadingRecord> = self
            .table
            .read()
            .map(|table| {
                table
                    .rows
                    .values()
                    .filter(|item| substation_id.is_none_or(|id| item.substation_id == id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        items.sort_by(|a, b| b.collection_time.cmp(&a.collection_time));
        Ok(items)
    }

    async fn find_circuit_reading(
        &self,
        circuit_data_id: i64,
    ) -> Result<Option<CircuitReadingRecord>, StorageError> {
        Ok(self
            .table
            .read()
            .ok()
            .and_then(|table| table.rows.get(&circuit_data_id).cloned()))
    }

    async fn create_circuit_reading(
        &self,
        record: CircuitReadingCreate,
    ) -> Result<CircuitReadingRecord, StorageError> {
        ensure_circuit_measurements(&record.measurements)?;
        self.substations.attach(&record.substation_id)?;
        let mut table = match self.table.write() {
            Ok(table) => table,
            Err(_) => {
                self.substations.references.release(&record.substation_id);
                return Err(StorageError::new("lock failed"));
            }
        };
        let duplicate = table.rows.values().any(|item| {
            item.substation_id == record.substation_id
                && item.circuit_id == record.circuit_id
                && item.collection_time == record.collection_time
        });
        if duplicate {
            self.substations.references.release(&record.substation_id);
            return Err(StorageError::new(
                "unique violation: substation_id, circuit_id, collection_time",
            ));
        }
        let circuit_data_id = table.next_id;
        table.next_id += 1;
        let created = CircuitReadingRecord {
            circuit_data_id,
            substation_id: record.substation_id,
            circuit_id: record.circuit_id,
            collection_time: record.collection_time,
            measurements: record.measurements,
        };
        table.rows.insert(circuit_data_id, created.clone());
        Ok(created)
    }

    async fn update_circuit_reading(
        &self,
        circuit_data_id: i64,
        update: CircuitMeasurements,
    ) -> Result<Option<CircuitReadingRecord>, StorageError> {
        ensure_circuit_measurements(&update)?;
        let mut table = self
            .table
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let item = match table.rows.get_mut(&circuit_data_id) {
            Some(item) => item,
            None => return Ok(None),
        };
        item.measurements.merge(update);
        Ok(Some(item.clone()))
    }

    async fn delete_circuit_reading(&self, circuit_data_id: i64) -> Result<bool, StorageError> {
        let mut table = self
            .table
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let removed = table.rows.remove(&circuit_data_id);
        if let Some(item) = &removed {
            self.substations.references.release(&item.substation_id);
        }
        Ok(removed.is_some())
    }
}

/// 变压器监测内存存储
pub struct InMemoryTransformerReadingStore {
    table: RwLock<Table<TransformerReadingRecord>>,
    substations: Arc<InMemorySubstationStore>,
}

impl InMemoryTransformerReadingStore {
    pub fn new(substations: Arc<InMemorySubstationStore>) -> Self {
        Self {
            table: RwLock::new(Table::default()),
            substations,
        }
    }
}

#[async_trait::async_trait]
impl TransformerReadingStore for InMemoryTransformerReadingStore {
    async fn list_transformer_readings(
        &self,
        substation_id: Option<&str>,
    ) -> Result<Vec<TransformerReadingRecord>, StorageError> {
        let mut items: Vec<TransformerReadingRecord> = self
            .table
            .read()
            .map(|table| {
                table
                    .rows
                    .values()
                    .filter(|item| substation_id.is_none_or(|id| item.substation_id == id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        items.sort_by(|a, b| b.collection_time.cmp(&a.collection_time));
        Ok(items)
    }

    async fn find_transformer_reading(
        &self,
        transformer_data_id: i64,
    ) -> Result<Option<TransformerReadingRecord>, StorageError> {
        Ok(self
            .table
            .read()
            .ok()
            .and_then(|table| table.rows.get(&transformer_data_id).cloned()))
    }

    async fn create_transformer_reading(
        &self,
        record: TransformerReadingCreate,
    ) -> Result<TransformerReadingRecord, StorageError> {
        ensure_transformer_measurements(&record.measurements)?;
        self.substations.attach(&record.substation_id)?;
        let mut table = match self.table.write() {
            Ok(table) => table,
            Err(_) => {
                self.substations.references.release(&record.substation_id);
                return Err(StorageError::new("lock failed"));
            }
        };
        let duplicate = table.rows.values().any(|item| {
            item.substation_id == record.substation_id
                && item.transformer_id == record.transformer_id
                && item.collection_time == record.collection_time
        });
        if duplicate {
            self.substations.references.release(&record.substation_id);
            return Err(StorageError::new(
                "unique violation: substation_id, transformer_id, collection_time",
            ));
        }
        let transformer_data_id = table.next_id;
        table.next_id += 1;
        let created = TransformerReadingRecord {
            transformer_data_id,
            substation_id: record.substation_id,
            transformer_id: record.transformer_id,
            collection_time: record.collection_time,
            measurements: record.measurements,
        };
        table.rows.insert(transformer_data_id, created.clone());
        Ok(created)
    }

    async fn update_transformer_reading(
        &self,
        transformer_data_id: i64,
        update: TransformerMeasurements,
    ) -> Result<Option<TransformerReadingRecord>, StorageError> {
        ensure_transformer_measurements(&update)?;
        let mut table = self
            .table
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let item = match table.rows.get_mut(&transformer_data_id) {
            Some(item) => item,
            None => return Ok(None),
        };
        item.measurements.merge(update);
        Ok(Some(item.clone()))
    }

    async fn delete_transformer_reading(
        &self,
        transformer_data_id: i64,
    ) -> Result<bool, StorageError> {
        let mut table = self
            .table
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let removed = table.rows.remove(&transformer_data_id);
        if let Some(item) = &removed {
            self.substations.references.release(&item.substation_id);
        }
        Ok(removed.is_some())
    }
}
