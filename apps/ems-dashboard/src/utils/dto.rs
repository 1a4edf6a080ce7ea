//! Record ↔ DTO 转换
//!
//! 存储层记录不直接序列化；口令哈希等内部字段在此处丢弃。

use api_contract::{
    AlarmDetailDto, AlarmDto, CircuitMeasurementsDto, CircuitReadingDto, DashboardConfigDto,
    DeviceDto, HistoricalTrendDto, MaintainerOrderDto, MaintenanceOrderDto, PlantAreaDto,
    PvDeviceDto, PvForecastDto, PvGenerationDto, RealtimeSummaryDto, SubstationDto,
    SummaryFiguresDto, TransformerMeasurementsDto, TransformerReadingDto, UserDto,
};
use ems_storage::{
    AlarmDetail, AlarmRecord, CircuitMeasurements, CircuitReadingRecord, DashboardConfigRecord,
    DeviceRecord, HistoricalTrendRecord, MaintainerOrderView, MaintenanceOrderRecord,
    PlantAreaRecord, PvDeviceRecord, PvForecastRecord, PvGenerationRecord,
    RealtimeSummaryRecord, SubstationRecord, SummaryFigures, TransformerMeasurements,
    TransformerReadingRecord, UserRecord,
};

pub fn user_to_dto(record: UserRecord) -> UserDto {
    UserDto {
        user_id: record.user_id,
        username: record.username,
        email: record.email,
        phone: record.phone,
        full_name: record.full_name,
        roles: record.roles,
    }
}

pub fn alarm_to_dto(record: AlarmRecord) -> AlarmDto {
    AlarmDto {
        alarm_id: record.alarm_id,
        device_id: record.device_id,
        alarm_type: record.alarm_type,
        occur_time: record.occur_time,
        alarm_level: record.alarm_level,
        alarm_content: record.alarm_content,
        status: record.status.as_str().to_string(),
        threshold_value: record.threshold_value,
    }
}

pub fn alarm_detail_to_dto(record: AlarmDetail) -> AlarmDetailDto {
    AlarmDetailDto {
        alarm_id: record.alarm_id,
        occur_time: record.occur_time,
        alarm_level: record.alarm_level,
        alarm_content: record.alarm_content,
        status: record.status.as_str().to_string(),
        device_name: record.device_name,
        device_type: record.device_type,
        area_name: record.area_name,
    }
}

pub fn order_to_dto(record: MaintenanceOrderRecord) -> MaintenanceOrderDto {
    MaintenanceOrderDto {
        order_id: record.order_id,
        alarm_id: record.alarm_id,
        maintainer_id: record.maintainer_id,
        dispatch_time: record.dispatch_time,
        finish_time: record.finish_time,
        result: record.result,
        attachment_path: record.attachment_path,
    }
}

pub fn maintainer_order_to_dto(record: MaintainerOrderView) -> MaintainerOrderDto {
    MaintainerOrderDto {
        order_id: record.order_id,
        dispatch_time: record.dispatch_time,
        finish_time: record.finish_time,
        result: record.result,
        alarm_content: record.alarm_content,
    }
}

pub fn plant_area_to_dto(record: PlantAreaRecord) -> PlantAreaDto {
    PlantAreaDto {
        plant_area_id: record.plant_area_id,
        plant_area_name: record.plant_area_name,
        location_desc: record.location_desc,
        manager_id: record.manager_id,
        contact_phone: record.contact_phone,
    }
}

pub fn device_to_dto(record: DeviceRecord) -> DeviceDto {
    DeviceDto {
        device_id: record.device_id,
        device_name: record.device_name,
        device_type: record.device_type,
        plant_area_id: record.plant_area_id,
        manufacturer: record.manufacturer,
        model: record.model,
        status: record.status,
    }
}

pub fn substation_to_dto(record: SubstationRecord) -> SubstationDto {
    SubstationDto {
        substation_id: record.substation_id,
        plant_area_id: record.plant_area_id,
        substation_name: record.substation_name,
        substation_location_desc: record.substation_location_desc,
        voltage_level: record.voltage_level,
        transformer_count: record.transformer_count,
        commissioning_date: record.commissioning_date,
        responsible_user_id: record.responsible_user_id,
        contact_phone: record.contact_phone,
    }
}

pub fn circuit_measurements_from_dto(dto: CircuitMeasurementsDto) -> CircuitMeasurements {
    CircuitMeasurements {
        voltage: dto.voltage,
        current: dto.current,
        active_power: dto.active_power,
        reactive_power: dto.reactive_power,
        power_factor: dto.power_factor,
        forward_active_energy: dto.forward_active_energy,
        reverse_active_energy: dto.reverse_active_energy,
        switch_status: dto.switch_status,
        cable_temp: dto.cable_temp,
        capacitor_temp: dto.capacitor_temp,
    }
}

fn circuit_measurements_to_dto(values: CircuitMeasurements) -> CircuitMeasurementsDto {
    CircuitMeasurementsDto {
        voltage: values.voltage,
        current: values.current,
        active_power: values.active_power,
        reactive_power: values.reactive_power,
        power_factor: values.power_factor,
        forward_active_energy: values.forward_active_energy,
        reverse_active_energy: values.reverse_active_energy,
        switch_status: values.switch_status,
        cable_temp: values.cable_temp,
        capacitor_temp: values.capacitor_temp,
    }
}

pub fn circuit_to_dto(record: CircuitReadingRecord) -> CircuitReadingDto {
    CircuitReadingDto {
        circuit_data_id: record.circuit_data_id,
        substation_id: record.substation_id,
        circuit_id: record.circuit_id,
        collection_time: record.collection_time,
        measurements: circuit_measurements_to_dto(record.measurements),
    }
}

pub fn transformer_measurements_from_dto(dto: TransformerMeasurementsDto) -> TransformerMeasurements {
    TransformerMeasurements {
        load_rate: dto.load_rate,
        winding_temp: dto.winding_temp,
        core_temp: dto.core_temp,
        ambient_temp: dto.ambient_temp,
        ambient_humidity: dto.ambient_humidity,
        running_status: dto.running_status,
    }
}

fn transformer_measurements_to_dto(values: TransformerMeasurements) -> TransformerMeasurementsDto {
    TransformerMeasurementsDto {
        load_rate: values.load_rate,
        winding_temp: values.winding_temp,
        core_temp: values.core_temp,
        ambient_temp: values.ambient_temp,
        ambient_humidity: values.ambient_humidity,
        running_status: values.running_status,
    }
}

pub fn transformer_to_dto(record: TransformerReadingRecord) -> TransformerReadingDto {
    TransformerReadingDto {
        transformer_data_id: record.transformer_data_id,
        substation_id: record.substation_id,
        transformer_id: record.transformer_id,
        collection_time: record.collection_time,
        measurements: transformer_measurements_to_dto(record.measurements),
    }
}

pub fn pv_device_to_dto(record: PvDeviceRecord) -> PvDeviceDto {
    PvDeviceDto {
        device_id: record.device_id,
        device_type: record.device_type,
        location: record.location,
        capacity: record.capacity,
        operation_date: record.operation_date,
        calibration_cycle: record.calibration_cycle,
        protocol: record.protocol,
        status: record.status,
    }
}

pub fn pv_generation_to_dto(record: PvGenerationRecord) -> PvGenerationDto {
    PvGenerationDto {
        data_id: record.data_id,
        device_id: record.device_id,
        grid_point_id: record.grid_point_id,
        collect_time: record.collect_time,
        generation: record.generation,
        feed_in: record.feed_in,
        self_use: record.self_use,
        inverter_efficiency: record.inverter_efficiency,
        string_voltage: record.string_voltage,
        string_current: record.string_current,
    }
}

pub fn pv_forecast_to_dto(record: PvForecastRecord) -> PvForecastDto {
    PvForecastDto {
        forecast_id: record.forecast_id,
        device_id: record.device_id,
        grid_point_id: record.grid_point_id,
        forecast_date: record.forecast_date,
        time_slot: record.time_slot,
        forecast_generation: record.forecast_generation,
        actual_data_id: record.actual_data_id,
        actual_generation: record.actual_generation,
        deviation_rate: record.deviation_rate,
        model_version: record.model_version,
    }
}

pub fn dashboard_config_to_dto(record: DashboardConfigRecord) -> DashboardConfigDto {
    DashboardConfigDto {
        config_id: record.config_id,
        display_module: record.display_module,
        refresh_frequency: record.refresh_frequency,
        display_fields: record.display_fields,
        sorting_rule: record.sorting_rule,
        permission_level: record.permission_level,
    }
}

pub fn summary_figures_from_dto(dto: SummaryFiguresDto) -> SummaryFigures {
    SummaryFigures {
        total_electricity: dto.total_electricity,
        total_water: dto.total_water,
        total_steam: dto.total_steam,
        total_gas: dto.total_gas,
        pv_total_generation: dto.pv_total_generation,
        pv_self_use: dto.pv_self_use,
        total_alarms: dto.total_alarms,
        high_level_alarms: dto.high_level_alarms,
        medium_level_alarms: dto.medium_level_alarms,
        low_level_alarms: dto.low_level_alarms,
    }
}

pub fn summary_to_dto(record: RealtimeSummaryRecord) -> RealtimeSummaryDto {
    let figures = record.figures;
    RealtimeSummaryDto {
        summary_id: record.summary_id,
        statistics_time: record.statistics_time,
        figures: SummaryFiguresDto {
            total_electricity: figures.total_electricity,
            total_water: figures.total_water,
            total_steam: figures.total_steam,
            total_gas: figures.total_gas,
            pv_total_generation: figures.pv_total_generation,
            pv_self_use: figures.pv_self_use,
            total_alarms: figures.total_alarms,
            high_level_alarms: figures.high_level_alarms,
            medium_level_alarms: figures.medium_level_alarms,
            low_level_alarms: figures.low_level_alarms,
        },
    }
}

pub fn trend_to_dto(record: HistoricalTrendRecord) -> HistoricalTrendDto {
    HistoricalTrendDto {
        trend_id: record.trend_id,
        energy_type: record.energy_type,
        statistical_cycle: record.statistical_cycle,
        statistical_date: record.statistical_date,
        energy_value: record.energy_value,
        yoy_growth_rate: record.yoy_growth_rate,
        mom_growth_rate: record.mom_growth_rate,
        industry_average: record.industry_average,
    }
}
