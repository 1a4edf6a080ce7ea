//! 大屏内存存储实现
//!
//! 仅用于本地演示和测试。编号自增，与 bigserial 列一致。

use crate::error::StorageError;
use crate::models::{
    DashboardConfigCreate, DashboardConfigFilter, DashboardConfigRecord, DashboardConfigUpdate,
    HistoricalTrendCreate, HistoricalTrendRecord, RealtimeSummaryCreate, RealtimeSummaryRecord,
};
use crate::traits::DashboardStore;
use crate::validation::{ensure_dashboard_config, ensure_historical_trend};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::RwLock;

struct Sequence<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Clone> Sequence<T> {
    fn push(&mut self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }
}

/// 大屏内存存储
#[derive(Default)]
pub struct InMemoryDashboardStore {
    configs: RwLock<Sequence<DashboardConfigRecord>>,
    summaries: RwLock<Sequence<RealtimeSummaryRecord>>,
    trends: RwLock<Sequence<HistoricalTrendRecord>>,
}

impl InMemoryDashboardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DashboardStore for InMemoryDashboardStore {
    async fn list_dashboard_configs(
        &self,
        filter: DashboardConfigFilter,
    ) -> Result<Vec<DashboardConfigRecord>, StorageError> {
        Ok(self
            .configs
            .read()
            .map(|table| {
                table
                    .rows
                    .values()
                    .filter(|item| {
                        filter
                            .display_module
                            .as_deref()
                            .is_none_or(|module| item.display_module == module)
                            && filter
                                .permission_level
                                .as_deref()
                                .is_none_or(|level| item.permission_level == level)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_dashboard_config(
        &self,
        config_id: i64,
    ) -> Result<Option<DashboardConfigRecord>, StorageError> {
        Ok(self
            .configs
            .read()
            .ok()
            .and_then(|table| table.rows.get(&config_id).cloned()))
    }

    async fn create_dashboard_config(
        &self,
        record: DashboardConfigCreate,
    ) -> Result<DashboardConfigRecord, StorageError> {
        ensure_dashboard_config(&DashboardConfigUpdate::from(&record))?;
        let mut table = self
            .configs
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(table.push(|config_id| DashboardConfigRecord {
            config_id,
            display_module: record.display_module,
            refresh_frequency: record.refresh_frequency,
            display_fields: record.display_fields,
            sorting_rule: record.sorting_rule,
            permission_level: record.permission_level,
        }))
    }

    async fn update_dashboard_config(
        &self,
        config_id: i64,
        update: DashboardConfigUpdate,
    ) -> Result<Option<DashboardConfigRecord>, StorageError> {
        ensure_dashboard_config(&update)?;
        let mut table = self
            .configs
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let item = match table.rows.get_mut(&config_id) {
            Some(item) => item,
            None => return Ok(None),
        };
        if let Some(module) = update.display_module {
            item.display_module = module;
        }
        if let Some(frequency) = update.refresh_frequency {
            item.refresh_frequency = frequency;
        }
        if let Some(fields) = update.display_fields {
            item.display_fields = fields;
        }
        if let Some(rule) = update.sorting_rule {
            item.sorting_rule = Some(rule);
        }
        if let Some(level) = update.permission_level {
            item.permission_level = level;
        }
        Ok(Some(item.clone()))
    }

    async fn delete_dashboard_config(&self, config_id: i64) -> Result<bool, StorageError> {
        let mut table = self
            .configs
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(table.rows.remove(&config_id).is_some())
    }

    async fn insert_summary(
        &self,
        record: RealtimeSummaryCreate,
    ) -> Result<RealtimeSummaryRecord, StorageError> {
        let mut table = self
            .summaries
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if table
            .rows
            .values()
            .any(|item| item.statistics_time == record.statistics_time)
        {
            return Err(StorageError::new("unique violation: statistics_time"));
        }
        Ok(table.push(|summary_id| RealtimeSummaryRecord {
            summary_id,
            statistics_time: record.statistics_time,
            figures: record.figures,
        }))
    }

    async fn latest_summary(&self) -> Result<Option<RealtimeSummaryRecord>, StorageError> {
        Ok(self.summaries.read().ok().and_then(|table| {
            table
                .rows
                .values()
                .max_by_key(|item| item.statistics_time)
                .cloned()
        }))
    }

    async fn list_summaries(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<RealtimeSummaryRecord>, StorageError> {
        let mut items: Vec<RealtimeSummaryRecord> = self
            .summaries
            .read()
            .map(|table| {
                table
                    .rows
                    .values()
                    .filter(|item| item.statistics_time >= from && item.statistics_time <= to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        items.sort_by_key(|item| item.statistics_time);
        Ok(items)
    }

    async fn insert_trend(
        &self,
        record: HistoricalTrendCreate,
    ) -> Result<HistoricalTrendRecord, StorageError> {
        ensure_historical_trend(&record)?;
        let mut table = self
            .trends
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(table.push(|trend_id| HistoricalTrendRecord {
            trend_id,
            energy_type: record.energy_type,
            statistical_cycle: record.statistical_cycle,
            statistical_date: record.statistical_date,
            energy_value: record.energy_value,
            yoy_growth_rate: record.yoy_growth_rate,
            mom_growth_rate: record.mom_growth_rate,
            industry_average: record.industry_average,
        }))
    }

    async fn list_trends(
        &self,
        energy_type: &str,
        statistical_cycle: Option<&str>,
    ) -> Result<Vec<HistoricalTrendRecord>, StorageError> {
        let mut items: Vec<HistoricalTrendRecord> = self
            .trends
            .read()
            .map(|table| {
                table
                    .rows
                    .values()
                    .filter(|item| {
                        item.energy_type == energy_type
                            && statistical_cycle.is_none_or(|cycle| item.statistical_cycle == cycle)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        items.sort_by(|a, b| b.statistical_date.cmp(&a.statistical_date));
        Ok(items)
    }
}
