//! Postgres 大屏存储实现

use crate::error::StorageError;
use crate::models::{
    DashboardConfigCreate, DashboardConfigFilter, DashboardConfigRecord, DashboardConfigUpdate,
    HistoricalTrendCreate, HistoricalTrendRecord, RealtimeSummaryCreate, RealtimeSummaryRecord,
    SummaryFigures,
};
use crate::traits::DashboardStore;
use crate::validation::{ensure_dashboard_config, ensure_historical_trend};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const CONFIG_COLUMNS: &str =
    "config_id, display_module, refresh_frequency, display_fields, sorting_rule, permission_level";

const SUMMARY_COLUMNS: &str = "summary_id, statistics_time, total_electricity, total_water, \
     total_steam, total_gas, pv_total_generation, pv_self_use, total_alarms, high_level_alarms, \
     medium_level_alarms, low_level_alarms";

const TREND_COLUMNS: &str = "trend_id, energy_type, statistical_cycle, statistical_date, \
     energy_value, yoy_growth_rate, mom_growth_rate, industry_average";

pub struct PgDashboardStore {
    pub pool: PgPool,
}

impl PgDashboardStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn config_from_row(row: &PgRow) -> Result<DashboardConfigRecord, StorageError> {
    Ok(DashboardConfigRecord {
        config_id: row.try_get("config_id")?,
        display_module: row.try_get("display_module")?,
        refresh_frequency: row.try_get("refresh_frequency")?,
        display_fields: row.try_get("display_fields")?,
        sorting_rule: row.try_get("sorting_rule")?,
        permission_level: row.try_get("permission_level")?,
    })
}

fn summary_from_row(row: &PgRow) -> Result<RealtimeSummaryRecord, StorageError> {
    Ok(RealtimeSummaryRecord {
        summary_id: row.try_get("summary_id")?,
        statistics_time: row.try_get("statistics_time")?,
        figures: SummaryFigures {
            total_electricity: row.try_get("total_electricity")?,
            total_water: row.try_get("total_water")?,
            total_steam: row.try_get("total_steam")?,
            total_gas: row.try_get("total_gas")?,
            pv_total_generation: row.try_get("pv_total_generation")?,
            pv_self_use: row.try_get("pv_self_use")?,
            total_alarms: row.try_get("total_alarms")?,
            high_level_alarms: row.try_get("high_level_alarms")?,
            medium_level_alarms: row.try_get("medium_level_alarms")?,
            low_level_alarms: row.try_get("low_level_alarms")?,
        },
    })
}

fn trend_from_row(row: &PgRow) -> Result<HistoricalTrendRecord, StorageError> {
    Ok(HistoricalTrendRecord {
        trend_id: row.try_get("trend_id")?,
        energy_type: row.try_get("energy_type")?,
        statistical_cycle: row.try_get("statistical_cycle")?,
        statistical_date: row.try_get("statistical_date")?,
        energy_value: row.try_get("energy_value")?,
        yoy_growth_rate: row.try_get("yoy_growth_rate")?,
        mom_growth_rate: row.try_get("mom_growth_rate")?,
        industry_average: row.try_get("industry_average")?,
    })
}

#[async_trait::async_trait]
impl DashboardStore for PgDashboardStore {
    async fn list_dashboard_configs(
        &self,
        filter: DashboardConfigFilter,
    ) -> Result<Vec<DashboardConfigRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {CONFIG_COLUMNS} from dashboard_config \
             where ($1::varchar is null or display_module = $1) \
             and ($2::varchar is null or permission_level = $2) \
             order by config_id asc"
        ))
        .bind(filter.display_module)
        .bind(filter.permission_level)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(config_from_row).collect()
    }

    async fn find_dashboard_config(
        &self,
        config_id: i64,
    ) -> Result<Option<DashboardConfigRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {CONFIG_COLUMNS} from dashboard_config where config_id = $1"
        ))
        .bind(config_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(config_from_row).transpose()
    }

    async fn create_dashboard_config(
        &self,
        record: DashboardConfigCreate,
    ) -> Result<DashboardConfigRecord, StorageError> {
        ensure_dashboard_config(&DashboardConfigUpdate::from(&record))?;
        let row = sqlx::query(&format!(
            "insert into dashboard_config (display_module, refresh_frequency, display_fields, \
             sorting_rule, permission_level) values ($1,$2,$3,$4,$5) returning {CONFIG_COLUMNS}"
        ))
        .bind(&record.display_module)
        .bind(record.refresh_frequency)
        .bind(&record.display_fields)
        .bind(&record.sorting_rule)
        .bind(&record.permission_level)
        .fetch_one(&self.pool)
        .await?;
        config_from_row(&row)
    }

    async fn update_dashboard_config(
        &self,
        config_id: i64,
        update: DashboardConfigUpdate,
    ) -> Result<Option<DashboardConfigRecord>, StorageError> {
        ensure_dashboard_config(&update)?;
        let row = sqlx::query(&format!(
            "update dashboard_config set display_module = coalesce($2, display_module), \
             refresh_frequency = coalesce($3, refresh_frequency), \
             display_fields = coalesce($4, display_fields), \
             sorting_rule = coalesce($5, sorting_rule), \
             permission_level = coalesce($6, permission_level) \
             where config_id = $1 returning {CONFIG_COLUMNS}"
        ))
        .bind(config_id)
        .bind(update.display_module)
        .bind(update.refresh_frequency)
        .bind(update.display_fields)
        .bind(update.sorting_rule)
        .bind(update.permission_level)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(config_from_row).transpose()
    }

    async fn delete_dashboard_config(&self, config_id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from dashboard_config where config_id = $1")
            .bind(config_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_summary(
        &self,
        record: RealtimeSummaryCreate,
    ) -> Result<RealtimeSummaryRecord, StorageError> {
        let figures = record.figures;
        let row = sqlx::query(&format!(
            "insert into realtime_summary_data (statistics_time, total_electricity, total_water, \
             total_steam, total_gas, pv_total_generation, pv_self_use, total_alarms, \
             high_level_alarms, medium_level_alarms, low_level_alarms) \
             values ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11) returning {SUMMARY_COLUMNS}"
        ))
        .bind(record.statistics_time)
        .bind(figures.total_electricity)
        .bind(figures.total_water)
        .bind(figures.total_steam)
        .bind(figures.total_gas)
        .bind(figures.pv_total_generation)
        .bind(figures.pv_self_use)
        .bind(figures.total_alarms)
        .bind(figures.high_level_alarms)
        .bind(figures.medium_level_alarms)
        .bind(figures.low_level_alarms)
        .fetch_one(&self.pool)
        .await?;
        summary_from_row(&row)
    }

    async fn latest_summary(&self) -> Result<Option<RealtimeSummaryRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {SUMMARY_COLUMNS} from realtime_summary_data \
             order by statistics_time desc limit 1"
        ))
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(summary_from_row).transpose()
    }

    async fn list_summaries(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<RealtimeSummaryRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {SUMMARY_COLUMNS} from realtime_summary_data \
             where statistics_time >= $1 and statistics_time <= $2 \
             order by statistics_time asc"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(summary_from_row).collect()
    }

    async fn insert_trend(
        &self,
        record: HistoricalTrendCreate,
    ) -> Result<HistoricalTrendRecord, StorageError> {
        ensure_historical_trend(&record)?;
        let row = sqlx::query(&format!(
            "insert into historical_trend_data (energy_type, statistical_cycle, statistical_date, \
             energy_value, yoy_growth_rate, mom_growth_rate, industry_average) \
             values ($1,$2,$3,$4,$5,$6,$7) returning {TREND_COLUMNS}"
        ))
        .bind(&record.energy_type)
        .bind(&record.statistical_cycle)
        .bind(record.statistical_date)
        .bind(record.energy_value)
        .bind(record.yoy_growth_rate)
        .bind(record.mom_growth_rate)
        .bind(record.industry_average)
        .fetch_one(&self.pool)
        .await?;
        trend_from_row(&row)
    }

    async fn list_trends(
        &self,
        energy_type: &str,
        statistical_cycle: Option<&str>,
    ) -> Result<Vec<HistoricalTrendRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {TREND_COLUMNS} from historical_trend_data \
             where energy_type = $1 and ($2::varchar is null or statistical_cycle = $2) \
             order by statistical_date desc"
        ))
        .bind(energy_type)
        .bind(statistical_cycle)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(trend_from_row).collect()
    }
}
