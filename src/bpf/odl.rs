//! ODL text serialisation of the BPF.
//!
//! The file is a flat parameter-group format:
//!
//! ```text
//! GROUP = FILE_ATTRIBUTES
//!   Effective_Date_Begin = 2015-01-01T00:00:00.00000
//!   Sensor_Name = "OLI"
//!   Version = 1
//!   ...
//! END_GROUP = FILE_ATTRIBUTES
//! GROUP = ORBIT_PARAMETERS
//!   Orbit_Number = 12345
//! END_GROUP = ORBIT_PARAMETERS
//! GROUP = BIAS_MODEL_B01
//!   Band_Number = 1
//!   Spectral_Type = "VNIR"
//!   A0_Coefficient_SCA01 = 0.123
//!   SCA01_Det0001 = (0.1, 0.2, 0.3, 0.4)
//!   ...
//! END_GROUP = BIAS_MODEL_B01
//! END
//! ```
//!
//! SCA and detector numbers in parameter names are 1-based; dates are
//! fixed-width ISO-8601 (`YYYY-MM-DDTHH:MM:SS.SSSSS`); the PAN band
//! carries `Even`/`Odd` qualifiers on its coefficient names.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use log::error;
use regex::Regex;

use crate::error::{LosError, Result};
use crate::satellite::SpectralType;

use super::{BandBias, Bpf, BpfBuilder, PanSide};

lazy_static! {
    static ref GROUP_RE: Regex = Regex::new(r"^GROUP\s*=\s*(\w+)$").unwrap();
    static ref END_GROUP_RE: Regex = Regex::new(r"^END_GROUP\s*=\s*(\w+)$").unwrap();
    static ref ASSIGN_RE: Regex = Regex::new(r"^(\w+)\s*=\s*(.+)$").unwrap();
    static ref BAND_GROUP_RE: Regex = Regex::new(r"^BIAS_MODEL_B(\d{2})$").unwrap();
    static ref A0_RE: Regex = Regex::new(r"^A0_Coefficient(?:_(Even|Odd))?_SCA(\d{2})$").unwrap();
    static ref DET_RE: Regex = Regex::new(r"^SCA(\d{2})(?:_(Even|Odd))?_Det(\d{4})$").unwrap();
    static ref DATE_RE: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{5}$").unwrap();
}

/// Read a BPF from an ODL file.
pub fn read_path(path: &Path) -> Result<Bpf> {
    let text = fs::read_to_string(path).map_err(|err| {
        error!("cannot read BPF file '{}': {err}", path.display());
        LosError::BackingStore {
            name: path.display().to_string(),
            reason: err.to_string(),
        }
    })?;
    parse(&text)
}

/// Parse BPF ODL text into a sealed [`Bpf`].
pub fn parse(text: &str) -> Result<Bpf> {
    let mut builder = BpfBuilder::new();
    let mut group: Option<String> = None;
    let mut band_number: Option<i32> = None;

    for (index, raw_line) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "END" {
            break;
        }

        if let Some(captures) = GROUP_RE.captures(line) {
            if group.is_some() {
                return Err(odl_error(line_number, "nested GROUP"));
            }
            let name = captures[1].to_string();
            if let Some(band_captures) = BAND_GROUP_RE.captures(&name) {
                band_number = Some(band_captures[1].parse().map_err(|_| {
                    odl_error(line_number, "band group number is not an integer")
                })?);
            }
            group = Some(name);
            continue;
        }

        if let Some(captures) = END_GROUP_RE.captures(line) {
            match group.take() {
                Some(open) if open == captures[1] => {
                    band_number = None;
                    continue;
                }
                Some(open) => {
                    return Err(odl_error(
                        line_number,
                        &format!("END_GROUP '{}' does not close '{}'", &captures[1], open),
                    ))
                }
                None => return Err(odl_error(line_number, "END_GROUP outside a group")),
            }
        }

        let captures = ASSIGN_RE
            .captures(line)
            .ok_or_else(|| odl_error(line_number, "expected 'name = value'"))?;
        let field = &captures[1];
        let value = captures[2].trim();

        match group.as_deref() {
            Some("FILE_ATTRIBUTES") => {
                parse_file_attribute(&mut builder, field, value, line_number)?
            }
            Some("ORBIT_PARAMETERS") => match field {
                "Orbit_Number" => builder
                    .set_orbit_parameters_begin_orbit_number(parse_int(value, line_number)?),
                other => {
                    return Err(odl_error(
                        line_number,
                        &format!("unknown ORBIT_PARAMETERS field '{other}'"),
                    ))
                }
            },
            Some(_) if band_number.is_some() => {
                let band = band_number.unwrap();
                parse_band_field(&mut builder, band, field, value, line_number)?
            }
            Some(other) => {
                return Err(odl_error(line_number, &format!("unknown group '{other}'")))
            }
            None => return Err(odl_error(line_number, "assignment outside any group")),
        }
    }

    if let Some(open) = group {
        error!("BPF ODL ended inside group '{open}'");
        return Err(LosError::OdlFormat {
            line: text.lines().count(),
            reason: format!("file ended inside group '{open}'"),
        });
    }

    builder.build()
}

fn parse_file_attribute(
    builder: &mut BpfBuilder,
    field: &str,
    value: &str,
    line_number: usize,
) -> Result<()> {
    match field {
        "Effective_Date_Begin" => {
            builder.set_file_attributes_effective_date_begin(parse_date(value, line_number)?)
        }
        "Effective_Date_End" => {
            builder.set_file_attributes_effective_date_end(parse_date(value, line_number)?)
        }
        "Baseline_Date" => {
            builder.set_file_attributes_baseline_date(parse_date(value, line_number)?)
        }
        "File_Name" => builder.set_file_attributes_file_name(&parse_string(value, line_number)?),
        "File_Source" => {
            builder.set_file_attributes_file_source(&parse_string(value, line_number)?)
        }
        "Spacecraft_Name" => {
            builder.set_file_attributes_spacecraft_name(&parse_string(value, line_number)?)
        }
        "Sensor_Name" => {
            builder.set_file_attributes_sensor_name(&parse_string(value, line_number)?)
        }
        "Description" => {
            builder.set_file_attributes_description(&parse_string(value, line_number)?)
        }
        "Version" => builder.set_file_attributes_version(parse_int(value, line_number)?),
        other => {
            return Err(odl_error(
                line_number,
                &format!("unknown FILE_ATTRIBUTES field '{other}'"),
            ))
        }
    }
    Ok(())
}

fn parse_band_field(
    builder: &mut BpfBuilder,
    band_number: i32,
    field: &str,
    value: &str,
    line_number: usize,
) -> Result<()> {
    if field == "Band_Number" {
        let declared: i32 = parse_int(value, line_number)?;
        if declared != band_number {
            return Err(odl_error(
                line_number,
                &format!("Band_Number {declared} inside group for band {band_number}"),
            ));
        }
        return builder.set_bias_model_band_number(declared);
    }
    if field == "Spectral_Type" {
        let name = parse_string(value, line_number)?;
        let spectral_type = SpectralType::from_name(&name)?;
        return builder.set_bias_model_spectral_type(band_number, spectral_type);
    }
    if let Some(captures) = A0_RE.captures(field) {
        let side = pan_side(captures.get(1).map(|m| m.as_str()));
        let sca_number: usize = captures[2]
            .parse()
            .map_err(|_| odl_error(line_number, "bad SCA number"))?;
        if sca_number == 0 {
            return Err(odl_error(line_number, "SCA numbers are 1-based"));
        }
        return builder.set_bias_model_a0_coefficient(
            band_number,
            sca_number - 1,
            side,
            parse_float(value, line_number)?,
        );
    }
    if let Some(captures) = DET_RE.captures(field) {
        let sca_number: usize = captures[1]
            .parse()
            .map_err(|_| odl_error(line_number, "bad SCA number"))?;
        let side = pan_side(captures.get(2).map(|m| m.as_str()));
        let det_number: usize = captures[3]
            .parse()
            .map_err(|_| odl_error(line_number, "bad detector number"))?;
        if sca_number == 0 || det_number == 0 {
            return Err(odl_error(line_number, "SCA and detector numbers are 1-based"));
        }
        let params = parse_tuple(value, line_number)?;
        return builder.set_bias_model_detector_coefficients(
            band_number,
            sca_number - 1,
            det_number - 1,
            side,
            &params,
        );
    }
    Err(odl_error(
        line_number,
        &format!("unknown bias model field '{field}'"),
    ))
}

fn pan_side(qualifier: Option<&str>) -> PanSide {
    match qualifier {
        Some("Odd") => PanSide::Odd,
        _ => PanSide::Even,
    }
}

fn odl_error(line: usize, reason: &str) -> LosError {
    error!("BPF ODL parse error at line {line}: {reason}");
    LosError::OdlFormat {
        line,
        reason: reason.to_string(),
    }
}

fn parse_string(value: &str, line_number: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        Ok(trimmed[1..trimmed.len() - 1].to_string())
    } else {
        Err(odl_error(line_number, "expected a quoted string"))
    }
}

fn parse_date<'a>(value: &'a str, line_number: usize) -> Result<&'a str> {
    if DATE_RE.is_match(value) {
        Ok(value)
    } else {
        Err(odl_error(
            line_number,
            "expected a YYYY-MM-DDTHH:MM:SS.SSSSS date",
        ))
    }
}

fn parse_int(value: &str, line_number: usize) -> Result<i32> {
    value
        .parse()
        .map_err(|_| odl_error(line_number, "expected an integer"))
}

fn parse_float(value: &str, line_number: usize) -> Result<f64> {
    value
        .parse()
        .map_err(|_| odl_error(line_number, "expected a number"))
}

fn parse_tuple(value: &str, line_number: usize) -> Result<Vec<f64>> {
    let inner = value
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
        .ok_or_else(|| odl_error(line_number, "expected a parenthesised tuple"))?;
    inner
        .split(',')
        .map(|part| parse_float(part.trim(), line_number))
        .collect()
}

/// Serialise a sealed BPF to ODL text.
pub fn format(bpf: &Bpf) -> String {
    let mut out = String::new();
    let attrs = bpf.file_attributes();
    out.push_str("GROUP = FILE_ATTRIBUTES\n");
    let _ = writeln!(
        out,
        "  Effective_Date_Begin = {}",
        attrs.effective_date_begin
    );
    let _ = writeln!(out, "  Effective_Date_End = {}", attrs.effective_date_end);
    let _ = writeln!(out, "  Baseline_Date = {}", attrs.baseline_date);
    let _ = writeln!(out, "  File_Name = \"{}\"", attrs.file_name);
    let _ = writeln!(out, "  File_Source = \"{}\"", attrs.file_source);
    let _ = writeln!(out, "  Spacecraft_Name = \"{}\"", attrs.spacecraft_name);
    let _ = writeln!(out, "  Sensor_Name = \"{}\"", attrs.sensor_name);
    let _ = writeln!(out, "  Description = \"{}\"", attrs.description);
    let _ = writeln!(out, "  Version = {}", attrs.version);
    out.push_str("END_GROUP = FILE_ATTRIBUTES\n");

    out.push_str("GROUP = ORBIT_PARAMETERS\n");
    let _ = writeln!(
        out,
        "  Orbit_Number = {}",
        bpf.orbit_parameters().begin_orbit_number
    );
    out.push_str("END_GROUP = ORBIT_PARAMETERS\n");

    for entry in bpf.bias_model() {
        let Some(bias) = entry.bias.as_ref() else {
            continue;
        };
        let _ = writeln!(out, "GROUP = BIAS_MODEL_B{:02}", entry.band_number);
        let _ = writeln!(out, "  Band_Number = {}", entry.band_number);
        let _ = writeln!(
            out,
            "  Spectral_Type = \"{}\"",
            bias.spectral_type().name()
        );
        match bias {
            BandBias::Vnir(block) => {
                format_plain_block(&mut out, &block.det_params, &block.a0_coefficient)
            }
            BandBias::Swir(block) => {
                format_plain_block(&mut out, &block.det_params, &block.a0_coefficient)
            }
            BandBias::Pan(block) => {
                format_sided_block(&mut out, &block.det_params_even, &block.a0_coefficient_even, "Even");
                format_sided_block(&mut out, &block.det_params_odd, &block.a0_coefficient_odd, "Odd");
            }
            BandBias::Thermal(block) => format_detector_lines(&mut out, &block.det_params, None),
        }
        let _ = writeln!(out, "END_GROUP = BIAS_MODEL_B{:02}", entry.band_number);
    }
    out.push_str("END\n");
    out
}

fn format_plain_block(out: &mut String, table: &ndarray::Array3<f64>, a0: &[f64]) {
    for (sca_index, value) in a0.iter().enumerate().take(table.shape()[0]) {
        let _ = writeln!(out, "  A0_Coefficient_SCA{:02} = {}", sca_index + 1, value);
    }
    format_detector_lines(out, table, None);
}

fn format_sided_block(out: &mut String, table: &ndarray::Array3<f64>, a0: &[f64], side: &str) {
    for (sca_index, value) in a0.iter().enumerate().take(table.shape()[0]) {
        let _ = writeln!(
            out,
            "  A0_Coefficient_{side}_SCA{:02} = {}",
            sca_index + 1,
            value
        );
    }
    format_detector_lines(out, table, Some(side));
}

fn format_detector_lines(out: &mut String, table: &ndarray::Array3<f64>, side: Option<&str>) {
    let (scas, detectors, params) = (table.shape()[0], table.shape()[1], table.shape()[2]);
    for sca in 0..scas {
        for det in 0..detectors {
            let values: Vec<String> = (0..params)
                .map(|p| table[[sca, det, p]].to_string())
                .collect();
            match side {
                Some(side) => {
                    let _ = writeln!(
                        out,
                        "  SCA{:02}_{side}_Det{:04} = ({})",
                        sca + 1,
                        det + 1,
                        values.join(", ")
                    );
                }
                None => {
                    let _ = writeln!(
                        out,
                        "  SCA{:02}_Det{:04} = ({})",
                        sca + 1,
                        det + 1,
                        values.join(", ")
                    );
                }
            }
        }
    }
}

/// Write a sealed BPF to an ODL file.
pub fn write_path(bpf: &Bpf, path: &Path) -> Result<()> {
    fs::write(path, format(bpf)).map_err(|err| {
        error!("cannot write BPF file '{}': {err}", path.display());
        LosError::BackingStore {
            name: path.display().to_string(),
            reason: err.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_BPF: &str = r#"
GROUP = FILE_ATTRIBUTES
  Effective_Date_Begin = 2015-01-01T00:00:00.00000
  Effective_Date_End = 2015-03-31T23:59:59.99999
  Baseline_Date = 2015-01-15T12:00:00.00000
  File_Name = "L8BPF20150101000000_20150331235959.01"
  File_Source = "calibration"
  Spacecraft_Name = "Landsat_8"
  Sensor_Name = "TIRS"
  Description = "Thermal bias parameters"
  Version = 1
END_GROUP = FILE_ATTRIBUTES
GROUP = ORBIT_PARAMETERS
  Orbit_Number = 10542
END_GROUP = ORBIT_PARAMETERS
GROUP = BIAS_MODEL_B10
  Band_Number = 10
  Spectral_Type = "THERMAL"
  SCA01_Det0001 = (0.25, 0.75)
END_GROUP = BIAS_MODEL_B10
END
"#;

    #[test]
    fn test_parse_small_bpf() {
        let bpf = parse(SMALL_BPF).unwrap();
        assert_eq!(bpf.file_attributes().version, 1);
        assert_eq!(bpf.orbit_parameters().begin_orbit_number, 10542);
        assert_eq!(
            bpf.sensor_id().unwrap(),
            crate::satellite::SensorId::Tirs
        );
        match &bpf.band_bias_model(10).unwrap().bias {
            Some(BandBias::Thermal(thermal)) => {
                assert_eq!(thermal.det_params[[0, 0, 0]], 0.25);
                assert_eq!(thermal.det_params[[0, 0, 1]], 0.75);
            }
            other => panic!("expected thermal bias, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        let text = SMALL_BPF.replace("2015-01-01T00:00:00.00000", "2015-1-1 00:00");
        assert!(matches!(
            parse(&text),
            Err(LosError::OdlFormat { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_band_number_mismatch() {
        let text = SMALL_BPF.replace("Band_Number = 10", "Band_Number = 11");
        assert!(parse(&text).is_err());
    }

    #[test]
    fn test_format_parse_round_trip() {
        let bpf = parse(SMALL_BPF).unwrap();
        let text = format(&bpf);
        let reparsed = parse(&text).unwrap();
        assert_eq!(
            reparsed.file_attributes().file_name,
            bpf.file_attributes().file_name
        );
        match (
            &bpf.band_bias_model(10).unwrap().bias,
            &reparsed.band_bias_model(10).unwrap().bias,
        ) {
            (Some(BandBias::Thermal(a)), Some(BandBias::Thermal(b))) => {
                assert_eq!(a.det_params[[0, 0, 0]], b.det_params[[0, 0, 0]]);
                assert_eq!(a.det_params[[2, 639, 1]], b.det_params[[2, 639, 1]]);
            }
            other => panic!("expected thermal bias on both sides, got {other:?}"),
        }
    }
}
