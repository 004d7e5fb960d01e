//! Level-0 Reconstructed (L0R) logical schema and storage semantics.
//!
//! The physical container (a chunked, compressed hierarchical table store)
//! is outside this crate; what lives here is the logical contract the
//! model consumes: the ancillary table schemas (field names, type codes,
//! byte sizes, packed offsets), the record append/read codec, and the
//! band image/VRP/offset dataset geometry.
//!
//! Table schemas are derived from the record type declarations — field
//! offsets fall out of the declaration order, so there are no
//! hand-maintained offset tables and no mutable globals.

pub mod ancillary;
pub mod band;
pub mod store;

use chrono::{Datelike, NaiveDate};

use crate::error::{LosError, Result};
use crate::time::Epoch;

/// Number of dimensions of a band image dataset.
pub const IMAGE_DIMENSIONS: usize = 3;
/// Dimension indices of a band image dataset.
pub const IMAGE_DIMENSION_SCA: usize = 0;
pub const IMAGE_DIMENSION_LINE: usize = 1;
pub const IMAGE_DIMENSION_DETECTOR: usize = 2;

/// Lines per chunk in the band datasets.
pub const IMAGE_CHUNK_LINES: usize = 128;

/// Deflate level used when band compression is enabled.
pub const IMAGE_DEFLATE_LEVEL: u8 = 4;

/// Fill value of unwritten image pixels.
pub const IMAGE_FILL_VALUE: u16 = 0;

/// Value of the CLASS attribute stamped on image datasets.
pub const IMAGE_CLASS_ATTRIBUTE: &str = "IMAGE";

/// Dataset names inside a band file.
pub const DATASET_NAME_IMAGE: &str = "Image";
pub const DATASET_NAME_VRP: &str = "VRP";
pub const DATASET_NAME_DETECTOR_OFFSETS: &str = "Detector_Offsets";

/// Native type of one table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    /// A nested compound column of the given packed size.
    Compound(usize),
}

impl FieldType {
    /// Packed byte size of a column of this type.
    pub fn size(&self) -> usize {
        match self {
            FieldType::I8 | FieldType::U8 => 1,
            FieldType::I16 | FieldType::U16 => 2,
            FieldType::I32 | FieldType::U32 | FieldType::F32 => 4,
            FieldType::I64 | FieldType::U64 | FieldType::F64 => 8,
            FieldType::Compound(size) => *size,
        }
    }
}

/// One column of a table schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub field_type: FieldType,
    /// Packed byte size
    pub size: usize,
    /// Packed byte offset within the record
    pub offset: usize,
}

/// Logical schema of one ancillary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table_name: &'static str,
    pub group_path: &'static str,
    pub fields: Vec<FieldDescriptor>,
    /// Packed size of one record
    pub record_size: usize,
}

impl TableSchema {
    /// Build a schema from `(name, type)` pairs, deriving sizes and packed
    /// offsets from the declaration order.
    pub fn build(
        table_name: &'static str,
        group_path: &'static str,
        fields: &[(&'static str, FieldType)],
    ) -> TableSchema {
        let mut descriptors = Vec::with_capacity(fields.len());
        let mut offset = 0;
        for &(name, field_type) in fields {
            let size = field_type.size();
            descriptors.push(FieldDescriptor {
                name,
                field_type,
                size,
                offset,
            });
            offset += size;
        }
        TableSchema {
            table_name,
            group_path,
            fields: descriptors,
            record_size: offset,
        }
    }

    /// Column count of the table.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Look up a column by name.
    pub fn field(&self, name: &str) -> Result<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| LosError::NotFound {
                kind: "table field",
                name: name.to_string(),
            })
    }
}

/// A record type belonging to one ancillary table.
pub trait AncillaryRecord: Sized {
    /// Table name within its group.
    const TABLE_NAME: &'static str;
    /// Group path within the ancillary file.
    const GROUP_PATH: &'static str;

    /// The table's schema; built once on first use.
    fn schema() -> &'static TableSchema;

    /// Serialise to the packed layout the schema describes.
    fn encode(&self) -> Vec<u8>;

    /// Deserialise from the packed layout.
    fn decode(bytes: &[u8]) -> Result<Self>;
}

/// Encoding/decoding of one field value in the packed record layout
/// (little-endian).
pub trait FieldCodec: Sized {
    const KIND: FieldType;
    fn encode_into(&self, buf: &mut Vec<u8>);
    fn decode_from(cursor: &mut &[u8]) -> Result<Self>;
}

fn take<'a>(cursor: &mut &'a [u8], len: usize) -> Result<&'a [u8]> {
    if cursor.len() < len {
        return Err(LosError::BackingStore {
            name: "record decode".to_string(),
            reason: "record shorter than its schema".to_string(),
        });
    }
    let (head, tail) = cursor.split_at(len);
    *cursor = tail;
    Ok(head)
}

macro_rules! primitive_codec {
    ($ty:ty, $kind:expr) => {
        impl FieldCodec for $ty {
            const KIND: FieldType = $kind;
            fn encode_into(&self, buf: &mut Vec<u8>) {
                buf.extend_from_slice(&self.to_le_bytes());
            }
            fn decode_from(cursor: &mut &[u8]) -> Result<Self> {
                let bytes = take(cursor, std::mem::size_of::<$ty>())?;
                Ok(<$ty>::from_le_bytes(bytes.try_into().expect("sized slice")))
            }
        }
    };
}

primitive_codec!(i8, FieldType::I8);
primitive_codec!(u8, FieldType::U8);
primitive_codec!(i16, FieldType::I16);
primitive_codec!(u16, FieldType::U16);
primitive_codec!(i32, FieldType::I32);
primitive_codec!(u32, FieldType::U32);
primitive_codec!(i64, FieldType::I64);
primitive_codec!(u64, FieldType::U64);
primitive_codec!(f32, FieldType::F32);
primitive_codec!(f64, FieldType::F64);

/// Packed size of a [`GyroSample`] compound column.
pub const GYRO_SAMPLE_SIZE: usize = 26;

/// One gyro measurement within an IMU record: a nested compound column.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GyroSample {
    pub sync_event_time: u32,
    pub time_tag: u32,
    pub saturation_flag: u8,
    pub scaling_flag: u8,
    pub integrated_angle_count: [i32; 4],
}

impl FieldCodec for GyroSample {
    const KIND: FieldType = FieldType::Compound(GYRO_SAMPLE_SIZE);

    fn encode_into(&self, buf: &mut Vec<u8>) {
        self.sync_event_time.encode_into(buf);
        self.time_tag.encode_into(buf);
        self.saturation_flag.encode_into(buf);
        self.scaling_flag.encode_into(buf);
        for count in &self.integrated_angle_count {
            count.encode_into(buf);
        }
    }

    fn decode_from(cursor: &mut &[u8]) -> Result<Self> {
        let sync_event_time = u32::decode_from(cursor)?;
        let time_tag = u32::decode_from(cursor)?;
        let saturation_flag = u8::decode_from(cursor)?;
        let scaling_flag = u8::decode_from(cursor)?;
        let mut integrated_angle_count = [0i32; 4];
        for count in &mut integrated_angle_count {
            *count = i32::decode_from(cursor)?;
        }
        Ok(GyroSample {
            sync_event_time,
            time_tag,
            saturation_flag,
            scaling_flag,
            integrated_angle_count,
        })
    }
}

/// Convert an ancillary timestamp (whole days from 2000-01-01 UTC plus
/// seconds of day) to a UTC epoch.
pub fn l0r_time_to_epoch(days_from_j2000: i32, seconds_of_day: f64) -> Result<Epoch> {
    let base = NaiveDate::from_ymd_opt(2000, 1, 1).expect("fixed base date");
    let date = base
        .checked_add_signed(chrono::Duration::days(days_from_j2000 as i64))
        .ok_or(LosError::InvalidInput {
            reason: format!("ancillary day offset {days_from_j2000} overflows the calendar"),
        })?;
    Epoch::new(date.year(), date.ordinal() as f64, seconds_of_day)
}

/// Declare an ancillary record type together with its derived schema and
/// packed codec. Fields become table columns in declaration order.
macro_rules! ancillary_table {
    (
        $(#[$meta:meta])*
        $name:ident, $table:expr, $group:expr, {
            $( $field:ident : $ftype:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name {
            $( pub $field: $ftype, )+
        }

        impl $crate::l0r::AncillaryRecord for $name {
            const TABLE_NAME: &'static str = $table;
            const GROUP_PATH: &'static str = $group;

            fn schema() -> &'static $crate::l0r::TableSchema {
                use $crate::l0r::FieldCodec;
                static SCHEMA: std::sync::OnceLock<$crate::l0r::TableSchema> =
                    std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::l0r::TableSchema::build(
                        $table,
                        $group,
                        &[ $( (stringify!($field), <$ftype>::KIND), )+ ],
                    )
                })
            }

            fn encode(&self) -> Vec<u8> {
                use $crate::l0r::FieldCodec;
                let mut buf = Vec::with_capacity(Self::schema().record_size);
                $( self.$field.encode_into(&mut buf); )+
                buf
            }

            fn decode(bytes: &[u8]) -> $crate::error::Result<Self> {
                use $crate::l0r::FieldCodec;
                let mut cursor = bytes;
                Ok($name {
                    $( $field: <$ftype>::decode_from(&mut cursor)?, )+
                })
            }
        }
    };
}

pub(crate) use ancillary_table;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_offsets_accumulate() {
        let schema = TableSchema::build(
            "Test",
            "/Test",
            &[
                ("a", FieldType::I32),
                ("b", FieldType::F64),
                ("c", FieldType::U8),
            ],
        );
        assert_eq!(schema.record_size, 13);
        assert_eq!(schema.field("a").unwrap().offset, 0);
        assert_eq!(schema.field("b").unwrap().offset, 4);
        assert_eq!(schema.field("c").unwrap().offset, 12);
        assert!(schema.field("d").is_err());
    }

    #[test]
    fn test_gyro_sample_codec_round_trip() {
        let sample = GyroSample {
            sync_event_time: 7,
            time_tag: 1234,
            saturation_flag: 1,
            scaling_flag: 0,
            integrated_angle_count: [1, -2, 3, -4],
        };
        let mut buf = Vec::new();
        sample.encode_into(&mut buf);
        assert_eq!(buf.len(), GYRO_SAMPLE_SIZE);
        let mut cursor = buf.as_slice();
        assert_eq!(GyroSample::decode_from(&mut cursor).unwrap(), sample);
    }

    #[test]
    fn test_l0r_time_to_epoch() {
        let epoch = l0r_time_to_epoch(0, 0.0).unwrap();
        assert_eq!((epoch.year, epoch.day_of_year), (2000, 1.0));
        // 2015-03-03 is 5540 days after 2000-01-01.
        let epoch = l0r_time_to_epoch(5540, 43200.0).unwrap();
        assert_eq!(epoch.year, 2015);
        assert_eq!(epoch.month_day().unwrap(), (3, 3));
    }
}
