//! BPF contract scenarios: strict setters, even/odd routing, and the ODL
//! serialisation round trip.

use crate::bpf::{
    get_model_parameters, odl, BandBias, BpfBuilder, PanSide,
};
use crate::error::LosError;
use crate::satellite::{spectral_type_for_band, SpectralType};

fn oli_bpf_builder() -> BpfBuilder {
    let mut builder = BpfBuilder::new();
    builder.set_file_attributes_file_name("L8BPF20150410010101_20150410235959.01");
    builder.set_file_attributes_file_source("ground system");
    builder.set_file_attributes_effective_date_begin("2015-04-10T00:00:00.00000");
    builder.set_file_attributes_effective_date_end("2015-04-10T23:59:59.99999");
    builder.set_file_attributes_baseline_date("2015-04-01T00:00:00.00000");
    builder.set_file_attributes_spacecraft_name("Landsat_8");
    builder.set_file_attributes_sensor_name("Operational Land Imager");
    builder.set_file_attributes_description("OLI detector bias model");
    builder.set_file_attributes_version(3);
    builder.set_orbit_parameters_begin_orbit_number(10542);
    for band in 1..=9 {
        builder.set_bias_model_band_number(band).unwrap();
        builder
            .set_bias_model_spectral_type(band, spectral_type_for_band(band).unwrap())
            .unwrap();
    }
    builder
}

#[test]
fn test_pan_even_routing_leaves_odd_untouched() {
    let mut builder = oli_bpf_builder();
    builder
        .set_bias_model_detector_coefficients(8, 0, 100, PanSide::Even, &[1.0, 2.0, 3.0, 4.0])
        .unwrap();
    let bpf = builder.build().unwrap();
    match &bpf.band_bias_model(8).unwrap().bias {
        Some(BandBias::Pan(pan)) => {
            assert_eq!(pan.det_params_even[[0, 100, 0]], 1.0);
            assert_eq!(pan.det_params_even[[0, 100, 1]], 2.0);
            assert_eq!(pan.det_params_even[[0, 100, 2]], 3.0);
            assert_eq!(pan.det_params_even[[0, 100, 3]], 4.0);
            for slot in 0..4 {
                assert_eq!(pan.det_params_odd[[0, 100, slot]], 0.0);
            }
        }
        other => panic!("band 8 should hold a PAN bias model, got {other:?}"),
    }
}

#[test]
fn test_a0_boundary_scas() {
    let mut builder = oli_bpf_builder();
    // 14 SCAs on the OLI focal plane: index 13 works, index 14 is out.
    assert!(builder
        .set_bias_model_a0_coefficient(4, 13, PanSide::Even, 0.5)
        .is_ok());
    assert!(matches!(
        builder.set_bias_model_a0_coefficient(4, 14, PanSide::Even, 0.5),
        Err(LosError::InvalidIndex { .. })
    ));
}

#[test]
fn test_detector_bounds_per_type() {
    let mut builder = oli_bpf_builder();
    // Multispectral bands stop at detector 493, PAN at 987.
    assert!(builder
        .set_bias_model_detector_coefficients(2, 0, 493, PanSide::Even, &[1.0])
        .is_ok());
    assert!(builder
        .set_bias_model_detector_coefficients(2, 0, 494, PanSide::Even, &[1.0])
        .is_err());
    assert!(builder
        .set_bias_model_detector_coefficients(8, 0, 987, PanSide::Odd, &[1.0])
        .is_ok());
    assert!(builder
        .set_bias_model_detector_coefficients(8, 0, 988, PanSide::Odd, &[1.0])
        .is_err());
}

#[test]
fn test_exactly_one_variant_per_band() {
    let bpf = oli_bpf_builder().build().unwrap();
    for entry in bpf.bias_model() {
        match (&entry.bias, entry.band_number) {
            (Some(bias), n @ 1..=9) => {
                assert_eq!(bias.spectral_type(), spectral_type_for_band(n).unwrap());
            }
            (None, 0) => {} // TIRS entries stay unset in an OLI BPF
            other => panic!("unexpected bias model state {other:?}"),
        }
    }
}

#[test]
fn test_get_model_parameters_pan_odd() {
    let mut builder = oli_bpf_builder();
    builder
        .set_bias_model_detector_coefficients(8, 3, 10, PanSide::Odd, &[5.0, 6.0, 7.0, 8.0])
        .unwrap();
    builder
        .set_bias_model_a0_coefficient(8, 3, PanSide::Odd, -0.25)
        .unwrap();
    let bpf = builder.build().unwrap();
    let n = 12;
    let mut pre = vec![0.0; n];
    let mut post = vec![0.0; n];
    let mut a1 = vec![0.0; n];
    let mut c1 = vec![0.0; n];
    let mut a0 = 0.0;
    get_model_parameters(
        bpf.band_bias_model(8).unwrap(),
        SpectralType::Pan,
        8,
        4,
        n,
        PanSide::Odd,
        &mut pre,
        &mut post,
        Some(&mut a1),
        Some(&mut c1),
        Some(&mut a0),
    )
    .unwrap();
    assert_eq!(pre[10], 5.0);
    assert_eq!(post[10], 6.0);
    assert_eq!(a1[10], 7.0);
    assert_eq!(c1[10], 8.0);
    assert_eq!(a0, -0.25);
}

#[test]
fn test_odl_round_trip_preserves_coefficients() {
    let mut builder = oli_bpf_builder();
    builder
        .set_bias_model_detector_coefficients(1, 7, 250, PanSide::Even, &[0.125, -3.5, 1.0e-4, 42.0])
        .unwrap();
    builder
        .set_bias_model_a0_coefficient(1, 7, PanSide::Even, 0.0625)
        .unwrap();
    let bpf = builder.build().unwrap();

    let text = odl::format(&bpf);
    let reparsed = odl::parse(&text).unwrap();

    assert_eq!(reparsed.file_attributes(), bpf.file_attributes());
    assert_eq!(
        reparsed.orbit_parameters().begin_orbit_number,
        bpf.orbit_parameters().begin_orbit_number
    );
    match &reparsed.band_bias_model(1).unwrap().bias {
        Some(BandBias::Vnir(vnir)) => {
            assert_eq!(vnir.det_params[[7, 250, 0]], 0.125);
            assert_eq!(vnir.det_params[[7, 250, 1]], -3.5);
            assert_eq!(vnir.det_params[[7, 250, 2]], 1.0e-4);
            assert_eq!(vnir.det_params[[7, 250, 3]], 42.0);
            assert_eq!(vnir.a0_coefficient[7], 0.0625);
        }
        other => panic!("band 1 should hold a VNIR bias model, got {other:?}"),
    }
    assert_eq!(reparsed.sensor_id().unwrap(), crate::SensorId::Oli);
}
