//! Ancillary table record types and schemas.
//!
//! One record type per table, declared through [`ancillary_table!`] so the
//! column list, packed layout, and codec all derive from a single field
//! declaration. Timestamps are `(days_from_j2000, seconds_of_day)` pairs;
//! repeated sub-records (tracked GPS satellites, star measurements) are
//! flattened into numbered columns, except the gyro samples which are
//! nested compound columns.

use crate::attitude::Quaternion;
use crate::error::Result;
use crate::time::Epoch;
use crate::vector::Vector3;

use super::{ancillary_table, l0r_time_to_epoch, GyroSample};

ancillary_table!(
    /// Spacecraft attitude: the inertial-to-body quaternion stream.
    AttitudeRecord, "Attitude", "/Spacecraft/ACS", {
        days_from_j2000: i32,
        seconds_of_day: f64,
        quaternion_vector_1: f64,
        quaternion_vector_2: f64,
        quaternion_vector_3: f64,
        quaternion_scalar: f64,
        outlier_flag: u8,
        warning_flag: u8,
    }
);

impl AttitudeRecord {
    pub fn epoch(&self) -> Result<Epoch> {
        l0r_time_to_epoch(self.days_from_j2000, self.seconds_of_day)
    }

    pub fn quaternion(&self) -> Quaternion {
        Quaternion {
            vector: Vector3::new(
                self.quaternion_vector_1,
                self.quaternion_vector_2,
                self.quaternion_vector_3,
            ),
            scalar: self.quaternion_scalar,
        }
    }
}

ancillary_table!(
    /// Attitude filter state: gyro biases, scale factors, misalignments,
    /// and the Kalman error and covariance diagnostics.
    AttitudeFilterRecord, "Attitude_Filter", "/Spacecraft/ACS", {
        days_from_j2000: i32,
        seconds_of_day: f64,
        gyro_bias_x: f64,
        gyro_bias_y: f64,
        gyro_bias_z: f64,
        scale_factor_x: f64,
        scale_factor_y: f64,
        scale_factor_z: f64,
        misalignment_1: f64,
        misalignment_2: f64,
        misalignment_3: f64,
        misalignment_4: f64,
        misalignment_5: f64,
        misalignment_6: f64,
        kalman_error_x: f64,
        kalman_error_y: f64,
        kalman_error_z: f64,
        covariance_diagonal_1: f64,
        covariance_diagonal_2: f64,
        covariance_diagonal_3: f64,
        covariance_diagonal_4: f64,
        covariance_diagonal_5: f64,
        covariance_diagonal_6: f64,
    }
);

ancillary_table!(
    /// Spacecraft ephemeris: ECEF state and orbit-determination errors.
    EphemerisRecord, "Ephemeris", "/Spacecraft", {
        days_from_j2000: i32,
        seconds_of_day: f64,
        ecef_position_x: f64,
        ecef_position_y: f64,
        ecef_position_z: f64,
        ecef_velocity_x: f64,
        ecef_velocity_y: f64,
        ecef_velocity_z: f64,
        position_error_x: f64,
        position_error_y: f64,
        position_error_z: f64,
        velocity_error_x: f64,
        velocity_error_y: f64,
        velocity_error_z: f64,
        orbit_determined_flag: u8,
        warning_flag: u8,
    }
);

impl EphemerisRecord {
    pub fn epoch(&self) -> Result<Epoch> {
        l0r_time_to_epoch(self.days_from_j2000, self.seconds_of_day)
    }

    pub fn ecef_position(&self) -> Vector3 {
        Vector3::new(
            self.ecef_position_x,
            self.ecef_position_y,
            self.ecef_position_z,
        )
    }

    pub fn ecef_velocity(&self) -> Vector3 {
        Vector3::new(
            self.ecef_velocity_x,
            self.ecef_velocity_y,
            self.ecef_velocity_z,
        )
    }
}

ancillary_table!(
    /// GPS receiver position solution with the twelve tracked-satellite
    /// summaries.
    GpsPositionRecord, "GPS_Position", "/Spacecraft", {
        days_from_j2000: i32,
        seconds_of_day: f64,
        month: u8,
        day: u8,
        year: u16,
        hours: u8,
        minutes: u8,
        seconds: u8,
        nanoseconds: u32,
        latitude: f64,
        longitude: f64,
        height: f64,
        ecef_position_x: f64,
        ecef_position_y: f64,
        ecef_position_z: f64,
        tracked_satellite_count: u8,
        id_1: u8, track_mode_1: u8, signal_strength_1: u8, elevation_1: f32, azimuth_1: f32,
        id_2: u8, track_mode_2: u8, signal_strength_2: u8, elevation_2: f32, azimuth_2: f32,
        id_3: u8, track_mode_3: u8, signal_strength_3: u8, elevation_3: f32, azimuth_3: f32,
        id_4: u8, track_mode_4: u8, signal_strength_4: u8, elevation_4: f32, azimuth_4: f32,
        id_5: u8, track_mode_5: u8, signal_strength_5: u8, elevation_5: f32, azimuth_5: f32,
        id_6: u8, track_mode_6: u8, signal_strength_6: u8, elevation_6: f32, azimuth_6: f32,
        id_7: u8, track_mode_7: u8, signal_strength_7: u8, elevation_7: f32, azimuth_7: f32,
        id_8: u8, track_mode_8: u8, signal_strength_8: u8, elevation_8: f32, azimuth_8: f32,
        id_9: u8, track_mode_9: u8, signal_strength_9: u8, elevation_9: f32, azimuth_9: f32,
        id_10: u8, track_mode_10: u8, signal_strength_10: u8, elevation_10: f32, azimuth_10: f32,
        id_11: u8, track_mode_11: u8, signal_strength_11: u8, elevation_11: f32, azimuth_11: f32,
        id_12: u8, track_mode_12: u8, signal_strength_12: u8, elevation_12: f32, azimuth_12: f32,
        warning_flag: u8,
    }
);

ancillary_table!(
    /// GPS range measurements for the twelve tracked satellites.
    GpsRangeRecord, "GPS_Range", "/Spacecraft", {
        days_from_j2000: i32,
        seconds_of_day: f64,
        gps_week: u16,
        seconds_of_week: f64,
        receiver_status: u8,
        tracked_satellite_count: u8,
        id_1: u8, tracking_state_1: u8, signal_to_noise_1: f32, pseudorange_1: f64,
        pseudorange_rate_1: f64, carrier_phase_1: f64, cycle_slip_count_1: u16,
        parity_error_count_1: u16,
        id_2: u8, tracking_state_2: u8, signal_to_noise_2: f32, pseudorange_2: f64,
        pseudorange_rate_2: f64, carrier_phase_2: f64, cycle_slip_count_2: u16,
        parity_error_count_2: u16,
        id_3: u8, tracking_state_3: u8, signal_to_noise_3: f32, pseudorange_3: f64,
        pseudorange_rate_3: f64, carrier_phase_3: f64, cycle_slip_count_3: u16,
        parity_error_count_3: u16,
        id_4: u8, tracking_state_4: u8, signal_to_noise_4: f32, pseudorange_4: f64,
        pseudorange_rate_4: f64, carrier_phase_4: f64, cycle_slip_count_4: u16,
        parity_error_count_4: u16,
        id_5: u8, tracking_state_5: u8, signal_to_noise_5: f32, pseudorange_5: f64,
        pseudorange_rate_5: f64, carrier_phase_5: f64, cycle_slip_count_5: u16,
        parity_error_count_5: u16,
        id_6: u8, tracking_state_6: u8, signal_to_noise_6: f32, pseudorange_6: f64,
        pseudorange_rate_6: f64, carrier_phase_6: f64, cycle_slip_count_6: u16,
        parity_error_count_6: u16,
        id_7: u8, tracking_state_7: u8, signal_to_noise_7: f32, pseudorange_7: f64,
        pseudorange_rate_7: f64, carrier_phase_7: f64, cycle_slip_count_7: u16,
        parity_error_count_7: u16,
        id_8: u8, tracking_state_8: u8, signal_to_noise_8: f32, pseudorange_8: f64,
        pseudorange_rate_8: f64, carrier_phase_8: f64, cycle_slip_count_8: u16,
        parity_error_count_8: u16,
        id_9: u8, tracking_state_9: u8, signal_to_noise_9: f32, pseudorange_9: f64,
        pseudorange_rate_9: f64, carrier_phase_9: f64, cycle_slip_count_9: u16,
        parity_error_count_9: u16,
        id_10: u8, tracking_state_10: u8, signal_to_noise_10: f32, pseudorange_10: f64,
        pseudorange_rate_10: f64, carrier_phase_10: f64, cycle_slip_count_10: u16,
        parity_error_count_10: u16,
        id_11: u8, tracking_state_11: u8, signal_to_noise_11: f32, pseudorange_11: f64,
        pseudorange_rate_11: f64, carrier_phase_11: f64, cycle_slip_count_11: u16,
        parity_error_count_11: u16,
        id_12: u8, tracking_state_12: u8, signal_to_noise_12: f32, pseudorange_12: f64,
        pseudorange_rate_12: f64, carrier_phase_12: f64, cycle_slip_count_12: u16,
        parity_error_count_12: u16,
        warning_flag: u8,
    }
);

ancillary_table!(
    /// IMU gyro telemetry: fifty compound samples per record.
    GyroRecord, "Gyro", "/Spacecraft/IMU", {
        days_from_j2000: i32,
        seconds_of_day: f64,
        sample_count: u8,
        integration_time: f32,
        gyro_sample_01: GyroSample, gyro_sample_02: GyroSample, gyro_sample_03: GyroSample,
        gyro_sample_04: GyroSample, gyro_sample_05: GyroSample, gyro_sample_06: GyroSample,
        gyro_sample_07: GyroSample, gyro_sample_08: GyroSample, gyro_sample_09: GyroSample,
        gyro_sample_10: GyroSample, gyro_sample_11: GyroSample, gyro_sample_12: GyroSample,
        gyro_sample_13: GyroSample, gyro_sample_14: GyroSample, gyro_sample_15: GyroSample,
        gyro_sample_16: GyroSample, gyro_sample_17: GyroSample, gyro_sample_18: GyroSample,
        gyro_sample_19: GyroSample, gyro_sample_20: GyroSample, gyro_sample_21: GyroSample,
        gyro_sample_22: GyroSample, gyro_sample_23: GyroSample, gyro_sample_24: GyroSample,
        gyro_sample_25: GyroSample, gyro_sample_26: GyroSample, gyro_sample_27: GyroSample,
        gyro_sample_28: GyroSample, gyro_sample_29: GyroSample, gyro_sample_30: GyroSample,
        gyro_sample_31: GyroSample, gyro_sample_32: GyroSample, gyro_sample_33: GyroSample,
        gyro_sample_34: GyroSample, gyro_sample_35: GyroSample, gyro_sample_36: GyroSample,
        gyro_sample_37: GyroSample, gyro_sample_38: GyroSample, gyro_sample_39: GyroSample,
        gyro_sample_40: GyroSample, gyro_sample_41: GyroSample, gyro_sample_42: GyroSample,
        gyro_sample_43: GyroSample, gyro_sample_44: GyroSample, gyro_sample_45: GyroSample,
        gyro_sample_46: GyroSample, gyro_sample_47: GyroSample, gyro_sample_48: GyroSample,
        gyro_sample_49: GyroSample, gyro_sample_50: GyroSample,
        warning_flag: u8,
    }
);

ancillary_table!(
    /// IMU data latency measurements.
    ImuLatencyRecord, "Latency", "/Spacecraft/IMU", {
        days_from_j2000: i32,
        seconds_of_day: f64,
        fine_time_tag: u32,
        measured_latency: f64,
    }
);

ancillary_table!(
    /// Star tracker centroid measurements: six star windows per record.
    StarTrackerCentroidRecord, "Star_Tracker_Centroid", "/Spacecraft", {
        quaternion_index: u32,
        star_id_1: u16, position_horizontal_1: f64, position_vertical_1: f64,
        magnitude_1: f64, background_level_1: u16, valid_flag_1: u8,
        star_id_2: u16, position_horizontal_2: f64, position_vertical_2: f64,
        magnitude_2: f64, background_level_2: u16, valid_flag_2: u8,
        star_id_3: u16, position_horizontal_3: f64, position_vertical_3: f64,
        magnitude_3: f64, background_level_3: u16, valid_flag_3: u8,
        star_id_4: u16, position_horizontal_4: f64, position_vertical_4: f64,
        magnitude_4: f64, background_level_4: u16, valid_flag_4: u8,
        star_id_5: u16, position_horizontal_5: f64, position_vertical_5: f64,
        magnitude_5: f64, background_level_5: u16, valid_flag_5: u8,
        star_id_6: u16, position_horizontal_6: f64, position_vertical_6: f64,
        magnitude_6: f64, background_level_6: u16, valid_flag_6: u8,
        effective_focal_length: f64,
        warning_flag: u8,
    }
);

ancillary_table!(
    /// Star tracker quaternion telemetry.
    StarTrackerQuaternionRecord, "Star_Tracker_Quaternion", "/Spacecraft", {
        days_from_j2000: i32,
        seconds_of_day: f64,
        quaternion_index: u32,
        quaternion_element_1: f64,
        quaternion_element_2: f64,
        quaternion_element_3: f64,
        quaternion_element_4: f64,
        udl_time_tag: u32,
        sta_time_tag: u32,
        status_flags: u16,
        residual_1: f64,
        residual_2: f64,
        residual_3: f64,
        aberration_correction_flag: u8,
        attitude_rate_x: f64,
        attitude_rate_y: f64,
        attitude_rate_z: f64,
        bias_estimate_x: f64,
        bias_estimate_y: f64,
        bias_estimate_z: f64,
        boresight_temperature: f32,
        lens_temperature: f32,
        baffle_temperature: f32,
        processor_temperature: f32,
        ccd_temperature: f32,
        star_count: u8,
        tracked_star_count: u8,
        lost_star_count: u8,
        background_mean: f32,
        background_sigma: f32,
        pixel_threshold: u16,
        integration_time: f32,
        ccd_gain: u16,
        ccd_offset: u16,
        frame_counter: u32,
        software_version: u16,
        operating_mode: u8,
        sub_mode: u8,
        self_test_status: u8,
        command_count: u16,
        telemetry_count: u16,
        last_command_id: u16,
        virtual_tracker_count: u8,
        photocell_current: f32,
        power_supply_voltage: f32,
        heater_duty_cycle: u8,
        warning_flag: u8,
    }
);

ancillary_table!(
    /// OLI instrument telemetry group 3: calibration mechanisms and
    /// lamp/motor housekeeping.
    TelemetryGroup3Record, "Telemetry_Group_3", "/Telemetry/OLI", {
        days_from_j2000: i32,
        seconds_of_day: f64,
        sync_word: u32,
        frame_id: u16,
        stim_lamp_output_current: f32,
        stim_lamp_bulb_a_temp: f32,
        stim_lamp_bulb_b_temp: f32,
        stim_lamp_thermistor_select: u8,
        stim_lamp_questionable_flag: u8,
        lamp_photodiode_1: f32,
        lamp_photodiode_2: f32,
        lamp_controller_status: u8,
        focus_motor_lvdt_1: f32,
        focus_motor_lvdt_2: f32,
        focus_motor_lvdt_3: f32,
        focus_motor_position_1: f32,
        focus_motor_position_2: f32,
        focus_motor_position_3: f32,
        mech_motor_current: f32,
        mech_command_accept_count: u16,
        mech_command_reject_count: u16,
        safe_mode_indicator: u8,
        last_command_opcode: u16,
        diffuser_resolver_flags: u8,
        diffuser_resolver_position: f32,
        shutter_resolver_flags: u8,
        shutter_resolver_position: f32,
        focal_plane_select: u8,
        integration_time_ms: u16,
        data_rate_select: u8,
        test_pattern_select: u8,
        side_a_b_select: u8,
        baffle_temp: f32,
        bench_temp_1: f32,
        bench_temp_2: f32,
        bench_temp_3: f32,
        diffuser_temp: f32,
        shutter_temp: f32,
        spare_1: u16,
        spare_2: u16,
        warning_flag: u8,
    }
);

ancillary_table!(
    /// OLI instrument telemetry group 4: focal plane electronics.
    TelemetryGroup4Record, "Telemetry_Group_4", "/Telemetry/OLI", {
        days_from_j2000: i32,
        seconds_of_day: f64,
        sync_word: u32,
        frame_id: u16,
        video_reference_voltage_1: f32,
        video_reference_voltage_2: f32,
        video_reference_voltage_3: f32,
        video_reference_voltage_4: f32,
        video_reference_voltage_5: f32,
        video_reference_voltage_6: f32,
        video_reference_voltage_7: f32,
        video_reference_voltage_8: f32,
        video_reference_voltage_9: f32,
        video_reference_voltage_10: f32,
        video_reference_voltage_11: f32,
        video_reference_voltage_12: f32,
        video_reference_voltage_13: f32,
        video_reference_voltage_14: f32,
        fpe_supply_voltage_1: f32,
        fpe_supply_voltage_2: f32,
        fpe_supply_voltage_3: f32,
        fpe_supply_voltage_4: f32,
        fpe_temp_sensor_1: f32,
        fpe_temp_sensor_2: f32,
        fpe_temp_sensor_3: f32,
        fpe_temp_sensor_4: f32,
        fpe_temp_sensor_5: f32,
        fpe_temp_sensor_6: f32,
        fpe_temp_sensor_7: f32,
        fpe_temp_sensor_8: f32,
        fpe_temp_sensor_9: f32,
        a_d_converter_status: u8,
        pixel_clock_rate: u32,
        sca_power_status: u16,
        spare_1: u16,
        spare_2: u16,
        command_accept_count: u16,
        command_reject_count: u16,
        warning_flag: u8,
    }
);

ancillary_table!(
    /// OLI instrument telemetry group 5: power and processor health.
    TelemetryGroup5Record, "Telemetry_Group_5", "/Telemetry/OLI", {
        days_from_j2000: i32,
        seconds_of_day: f64,
        sync_word: u32,
        frame_id: u16,
        bus_voltage: f32,
        bus_current: f32,
        heater_current_1: f32,
        heater_current_2: f32,
        heater_current_3: f32,
        heater_current_4: f32,
        heater_current_5: f32,
        heater_current_6: f32,
        heater_current_7: f32,
        heater_current_8: f32,
        motor_temp_1: f32,
        motor_temp_2: f32,
        motor_temp_3: f32,
        motor_temp_4: f32,
        motor_temp_5: f32,
        motor_temp_6: f32,
        electronics_temp_1: f32,
        electronics_temp_2: f32,
        electronics_temp_3: f32,
        electronics_temp_4: f32,
        electronics_temp_5: f32,
        electronics_temp_6: f32,
        electronics_temp_7: f32,
        electronics_temp_8: f32,
        electronics_temp_9: f32,
        electronics_temp_10: f32,
        relay_status: u16,
        fuse_status: u16,
        watchdog_count: u16,
        reset_count: u16,
        uptime_seconds: u32,
        memory_check_status: u8,
        software_version: u16,
        cpu_load: u8,
        spare_1: u16,
        spare_2: u16,
        spare_3: u16,
        spare_4: u16,
        spare_5: u16,
        spare_6: u16,
        command_accept_count: u16,
        warning_flag: u8,
    }
);

ancillary_table!(
    /// TIRS instrument telemetry: command status, scene-select mirror,
    /// temperatures, and focal-plane electronics circuits.
    TirsTelemetryRecord, "TIRS_Telemetry", "/Telemetry/TIRS", {
        days_from_j2000: i32,
        seconds_of_day: f64,
        sync_word: u32,
        telemetry_counter: u16,
        command_accept_count: u16,
        command_reject_count: u16,
        last_command_opcode: u16,
        mode: u8,
        sub_mode: u8,
        ssm_encoder_position_1: u32,
        ssm_encoder_position_2: u32,
        ssm_encoder_position_3: u32,
        ssm_mechanism_mode: u8,
        ssm_commanded_position: u32,
        ssm_motor_current: f32,
        ssm_electronics_temp: f32,
        blackbody_calibrator_temp_1: f32,
        blackbody_calibrator_temp_2: f32,
        blackbody_calibrator_temp_3: f32,
        blackbody_calibrator_temp_4: f32,
        cryocooler_coldtip_temp: f32,
        cryocooler_compressor_temp: f32,
        cryocooler_electronics_temp: f32,
        telescope_aft_optics_temp_1: f32,
        telescope_aft_optics_temp_2: f32,
        telescope_aft_optics_temp_3: f32,
        telescope_aft_optics_temp_4: f32,
        telescope_structure_temp_1: f32,
        telescope_structure_temp_2: f32,
        telescope_structure_temp_3: f32,
        telescope_structure_temp_4: f32,
        telescope_structure_temp_5: f32,
        telescope_structure_temp_6: f32,
        focal_plane_temp_1: f32,
        focal_plane_temp_2: f32,
        focal_plane_temp_3: f32,
        focal_plane_heater_current: f32,
        fpe_bias_voltage_1: f32,
        fpe_bias_voltage_2: f32,
        fpe_bias_voltage_3: f32,
        fpe_bias_voltage_4: f32,
        fpe_bias_voltage_5: f32,
        fpe_bias_voltage_6: f32,
        fpe_offset_voltage_1: f32,
        fpe_offset_voltage_2: f32,
        fpe_offset_voltage_3: f32,
        fpe_offset_voltage_4: f32,
        fpe_offset_voltage_5: f32,
        fpe_offset_voltage_6: f32,
        fpe_supply_current_1: f32,
        fpe_supply_current_2: f32,
        fpe_supply_current_3: f32,
        fpe_supply_current_4: f32,
        fpe_supply_current_5: f32,
        fpe_supply_current_6: f32,
        fpe_video_reference_1: f32,
        fpe_video_reference_2: f32,
        fpe_video_reference_3: f32,
        roic_temperature_1: f32,
        roic_temperature_2: f32,
        roic_temperature_3: f32,
        a_d_reference_voltage_1: f32,
        a_d_reference_voltage_2: f32,
        a_d_reference_voltage_3: f32,
        power_bus_voltage: f32,
        power_bus_current: f32,
        heater_duty_cycle_1: u8,
        heater_duty_cycle_2: u8,
        heater_duty_cycle_3: u8,
        heater_duty_cycle_4: u8,
        heater_duty_cycle_5: u8,
        heater_duty_cycle_6: u8,
        heater_duty_cycle_7: u8,
        heater_duty_cycle_8: u8,
        relay_status: u16,
        fuse_status: u16,
        watchdog_count: u16,
        reset_count: u16,
        uptime_seconds: u32,
        software_version: u16,
        memory_check_status: u8,
        cryocooler_stroke_length: f32,
        cryocooler_piston_offset: f32,
        cryocooler_reject_temp: f32,
        scene_select_mirror_temp_1: f32,
        scene_select_mirror_temp_2: f32,
        scene_select_mirror_temp_3: f32,
        scene_select_mirror_temp_4: f32,
        earth_shield_temp_1: f32,
        earth_shield_temp_2: f32,
        spare_analog_1: f32,
        spare_analog_2: f32,
        spare_analog_3: f32,
        spare_analog_4: f32,
        spare_analog_5: f32,
        spare_analog_6: f32,
        spare_analog_7: f32,
        spare_analog_8: f32,
        digital_status_word_1: u16,
        digital_status_word_2: u16,
        digital_status_word_3: u16,
        digital_status_word_4: u16,
        digital_status_word_5: u16,
        digital_status_word_6: u16,
        digital_status_word_7: u16,
        digital_status_word_8: u16,
        science_data_rate: u32,
        pixel_clock_rate: u32,
        integration_time_ms: u16,
        frame_rate: u16,
        test_pattern_select: u8,
        side_a_b_select: u8,
        blackbody_heater_current: f32,
        blackbody_setpoint_temp: f32,
        ssm_tachometer: f32,
        ssm_motor_winding_temp: f32,
        deck_temp_1: f32,
        deck_temp_2: f32,
        deck_temp_3: f32,
        deck_temp_4: f32,
        spare_1: u16,
        warning_flag: u8,
    }
);

ancillary_table!(
    /// Filtered per-gyro temperature readings.
    GyroTemperatureRecord, "Gyro", "/Spacecraft/Temperatures", {
        days_from_j2000: i32,
        seconds_of_day: f64,
        filtered_reading_01: f32, filtered_reading_02: f32, filtered_reading_03: f32,
        filtered_reading_04: f32, filtered_reading_05: f32, filtered_reading_06: f32,
        filtered_reading_07: f32, filtered_reading_08: f32, filtered_reading_09: f32,
        filtered_reading_10: f32, filtered_reading_11: f32, filtered_reading_12: f32,
        filtered_reading_13: f32, filtered_reading_14: f32, filtered_reading_15: f32,
        filtered_reading_16: f32, filtered_reading_17: f32, filtered_reading_18: f32,
        filtered_reading_19: f32, filtered_reading_20: f32, filtered_reading_21: f32,
        filtered_reading_22: f32, filtered_reading_23: f32, filtered_reading_24: f32,
        filtered_reading_25: f32, filtered_reading_26: f32, filtered_reading_27: f32,
        filtered_reading_28: f32, filtered_reading_29: f32, filtered_reading_30: f32,
        filtered_reading_31: f32, filtered_reading_32: f32,
        average_temperature: f32,
        warning_flag: u8,
    }
);

ancillary_table!(
    /// Named OLI and TIRS temperature channels.
    OliTirsTemperatureRecord, "OLI_TIRS", "/Spacecraft/Temperatures", {
        days_from_j2000: i32,
        seconds_of_day: f64,
        oli_primary_mirror_temp_1: f32,
        oli_primary_mirror_temp_2: f32,
        oli_secondary_mirror_temp_1: f32,
        oli_secondary_mirror_temp_2: f32,
        oli_tertiary_mirror_temp_1: f32,
        oli_tertiary_mirror_temp_2: f32,
        oli_fpa_temp_1: f32,
        oli_fpa_temp_2: f32,
        oli_fpa_temp_3: f32,
        oli_fpa_temp_4: f32,
        oli_fpa_temp_5: f32,
        oli_fpa_temp_6: f32,
        oli_fpa_temp_7: f32,
        oli_fpa_temp_8: f32,
        oli_fpa_temp_9: f32,
        oli_fpa_temp_10: f32,
        oli_fpa_temp_11: f32,
        oli_fpa_temp_12: f32,
        oli_fpa_temp_13: f32,
        oli_fpa_temp_14: f32,
        oli_fpe_temp_1: f32,
        oli_fpe_temp_2: f32,
        oli_fpe_temp_3: f32,
        oli_fpe_temp_4: f32,
        oli_baffle_temp_1: f32,
        oli_baffle_temp_2: f32,
        oli_baffle_temp_3: f32,
        oli_baffle_temp_4: f32,
        oli_bench_temp_1: f32,
        oli_bench_temp_2: f32,
        oli_bench_temp_3: f32,
        oli_bench_temp_4: f32,
        oli_bench_temp_5: f32,
        oli_bench_temp_6: f32,
        oli_diffuser_temp: f32,
        oli_shutter_temp: f32,
        tirs_telescope_temp_1: f32,
        tirs_telescope_temp_2: f32,
        tirs_telescope_temp_3: f32,
        tirs_telescope_temp_4: f32,
        tirs_fpa_temp_1: f32,
        tirs_fpa_temp_2: f32,
        tirs_fpa_temp_3: f32,
        tirs_cryocooler_temp_1: f32,
        tirs_cryocooler_temp_2: f32,
        tirs_ssm_temp_1: f32,
        tirs_ssm_temp_2: f32,
        tirs_blackbody_temp_1: f32,
        tirs_blackbody_temp_2: f32,
        tirs_blackbody_temp_3: f32,
        tirs_blackbody_temp_4: f32,
        tirs_structure_temp_1: f32,
        tirs_structure_temp_2: f32,
        tirs_structure_temp_3: f32,
        tirs_structure_temp_4: f32,
        tirs_structure_temp_5: f32,
        tirs_structure_temp_6: f32,
        spacecraft_interface_temp_1: f32,
        spacecraft_interface_temp_2: f32,
        spacecraft_interface_temp_3: f32,
        spacecraft_interface_temp_4: f32,
        radiator_temp_1: f32,
        radiator_temp_2: f32,
        radiator_temp_3: f32,
        radiator_temp_4: f32,
        battery_interface_temp_1: f32,
        battery_interface_temp_2: f32,
        warning_flag: u8,
    }
);
