//! L0R schema and dataset scenarios through the public interface.

use approx::assert_abs_diff_eq;

use crate::l0r::ancillary::{
    AttitudeRecord, EphemerisRecord, GpsRangeRecord, GyroRecord, TirsTelemetryRecord,
};
use crate::l0r::band::{BandCompression, L0r};
use crate::l0r::store::AccessMode;
use crate::l0r::{AncillaryRecord, FieldType};

#[test]
fn test_gps_range_exposes_103_fields() {
    let schema = GpsRangeRecord::schema();
    assert_eq!(schema.field_count(), 103);
    // The seventh field is the first tracked satellite's id; the last is
    // the warning flag.
    assert_eq!(schema.fields[6].name, "id_1");
    assert_eq!(schema.fields[6].field_type, FieldType::U8);
    let last = schema.fields.last().unwrap();
    assert_eq!(last.name, "warning_flag");
    assert_eq!(last.field_type, FieldType::U8);
}

#[test]
fn test_record_sizes_follow_offsets() {
    for schema in [
        AttitudeRecord::schema(),
        EphemerisRecord::schema(),
        GpsRangeRecord::schema(),
        GyroRecord::schema(),
        TirsTelemetryRecord::schema(),
    ] {
        let mut expected_offset = 0;
        for field in &schema.fields {
            assert_eq!(
                field.offset, expected_offset,
                "field {} of {}",
                field.name, schema.table_name
            );
            expected_offset += field.size;
        }
        assert_eq!(schema.record_size, expected_offset);
    }
}

#[test]
fn test_gps_range_codec_round_trip() {
    let record = GpsRangeRecord {
        days_from_j2000: 5578,
        seconds_of_day: 40000.25,
        gps_week: 1840,
        seconds_of_week: 123456.5,
        receiver_status: 3,
        tracked_satellite_count: 9,
        id_1: 17,
        pseudorange_1: 2.1e7,
        id_12: 31,
        warning_flag: 1,
        ..Default::default()
    };
    let bytes = record.encode();
    assert_eq!(bytes.len(), GpsRangeRecord::schema().record_size);
    let decoded = GpsRangeRecord::decode(&bytes).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn test_image_truncation_leaves_one_line() {
    let mut l0r = L0r::new("LC81180382015100LGN00", BandCompression::Deflate);
    l0r.open_band(4, AccessMode::Write).unwrap();

    let detectors = 494;
    let scas = 14;
    let lines = 500;
    let data = vec![123u16; scas * lines * detectors];
    l0r.write_band_lines(4, 0, lines, &data).unwrap();
    assert_eq!(l0r.band_records_count(4).unwrap(), 500);

    l0r.truncate_band_lines(4).unwrap();
    assert_eq!(l0r.band_records_count(4).unwrap(), 1);

    // Line index 0 accepts a new write after the truncation marker.
    let one_line = vec![77u16; scas * detectors];
    l0r.write_band_lines(4, 0, 1, &one_line).unwrap();
    assert_eq!(l0r.band_records_count(4).unwrap(), 1);
    assert_eq!(l0r.read_band_lines(4, 0, 1).unwrap()[0], 77);

    l0r.close_band(4).unwrap();
}

#[test]
fn test_ancillary_tables_survive_reopen() {
    let mut l0r = L0r::new("LC81180382015100LGN00", BandCompression::None);
    l0r.open_ancillary(AccessMode::Write).unwrap();
    let attitude = AttitudeRecord {
        days_from_j2000: 5578,
        seconds_of_day: 100.0,
        quaternion_scalar: 1.0,
        ..Default::default()
    };
    l0r.append_ancillary(std::slice::from_ref(&attitude)).unwrap();
    l0r.close_ancillary().unwrap();

    // Flush-on-close guarantees the reopened reader sees the write.
    l0r.open_ancillary(AccessMode::Read).unwrap();
    assert_eq!(l0r.ancillary_record_count::<AttitudeRecord>().unwrap(), 1);
    let back: Vec<AttitudeRecord> = l0r.read_ancillary(0, 1).unwrap();
    assert_eq!(back[0], attitude);
    // A table that was never written reads as missing, not empty.
    assert!(l0r.ancillary_record_count::<GyroRecord>().is_err());
    l0r.close_ancillary().unwrap();
}

#[test]
fn test_attitude_records_feed_the_model() {
    use crate::attitude::AttitudeModel;

    // Identity perturbation quaternions give a zero-angle attitude model.
    let records: Vec<AttitudeRecord> = (0..10)
        .map(|i| AttitudeRecord {
            days_from_j2000: 5578,
            seconds_of_day: 100.0 + i as f64 * 0.02,
            quaternion_scalar: 1.0,
            ..Default::default()
        })
        .collect();
    let epoch = records[0].epoch().unwrap();
    let quaternions: Vec<(f64, crate::Quaternion)> = records
        .iter()
        .map(|r| (r.seconds_of_day - 100.0, r.quaternion()))
        .collect();
    let model = AttitudeModel::from_perturbation_quaternions(epoch, 0.02, &quaternions).unwrap();
    let (roll, pitch, yaw) = model.attitude_at(0.05);
    assert_abs_diff_eq!(roll, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(pitch, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(yaw, 0.0, epsilon = 1e-12);
}

#[test]
fn test_ephemeris_records_feed_the_model() {
    use crate::ephemeris::EphemerisModel;
    use crate::spacecraft::AcquisitionType;
    use crate::vector::Vector3;

    let records: Vec<EphemerisRecord> = (0..12)
        .map(|i| EphemerisRecord {
            days_from_j2000: 5578,
            seconds_of_day: 3600.0 + i as f64,
            ecef_position_x: 7.0e6,
            ecef_position_y: 1000.0 * i as f64,
            ecef_position_z: 0.0,
            ecef_velocity_x: 0.0,
            ecef_velocity_y: 1000.0,
            ecef_velocity_z: 0.0,
            ..Default::default()
        })
        .collect();

    let epoch = records[0].epoch().unwrap();
    let samples: Vec<(f64, Vector3, Vector3)> = records
        .iter()
        .map(|r| {
            let t = r.seconds_of_day - 3600.0;
            (t, r.ecef_position(), r.ecef_velocity())
        })
        .collect();
    let model = EphemerisModel::from_ecef_samples(epoch, 1.0, &samples, 0.05, 0.3, -0.2).unwrap();

    let (pos, vel) = model.position_velocity_at(AcquisitionType::Earth, 4.5);
    assert_abs_diff_eq!(pos.y, 4500.0, epsilon = 1e-6);
    assert_abs_diff_eq!(vel.y, 1000.0, epsilon = 1e-6);

    // The derived inertial samples hold the same orbit radius.
    let (eci_pos, _) = model.position_velocity_at(AcquisitionType::Stellar, 4.0);
    let ecef_radius = (7.0e6_f64.powi(2) + 4000.0_f64.powi(2)).sqrt();
    assert_abs_diff_eq!(eci_pos.length(), ecef_radius, epsilon = 1.0);
}
