// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Width in bytes of one string cell in a packed buffer.
const STR_CELL: usize = 16;

/// The element type of one column.
///
/// The variants form the closed set of types the service packs into reply
/// buffers. On the wire an element type travels as its short code (`i4`,
/// `f8`, ...); all numeric widths are little-endian.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ElementType {
    /// An 8-bit signed integer (`i1`).
    I8,
    /// A 16-bit signed integer (`i2`).
    I16,
    /// A 32-bit signed integer (`i4`).
    I32,
    /// A 64-bit signed integer (`i8`).
    I64,
    /// An 8-bit unsigned integer (`u1`).
    U8,
    /// A 16-bit unsigned integer (`u2`).
    U16,
    /// A 32-bit unsigned integer (`u4`).
    U32,
    /// A 64-bit unsigned integer (`u8`).
    U64,
    /// A 32-bit floating-point number (`f4`).
    F32,
    /// A 64-bit floating-point number (`f8`).
    F64,
    /// A fixed 16-byte NUL-padded UTF-8 string (`s16`).
    Str16,
    /// A timestamp as 64-bit Unix seconds (`t8`).
    Epoch,
}

impl ElementType {
    /// The short code identifying this type on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            ElementType::I8 => "i1",
            ElementType::I16 => "i2",
            ElementType::I32 => "i4",
            ElementType::I64 => "i8",
            ElementType::U8 => "u1",
            ElementType::U16 => "u2",
            ElementType::U32 => "u4",
            ElementType::U64 => "u8",
            ElementType::F32 => "f4",
            ElementType::F64 => "f8",
            ElementType::Str16 => "s16",
            ElementType::Epoch => "t8",
        }
    }

    /// Resolves a wire code to an element type.
    pub fn from_code(code: &str) -> Option<ElementType> {
        match code {
            "i1" => Some(ElementType::I8),
            "i2" => Some(ElementType::I16),
            "i4" => Some(ElementType::I32),
            "i8" => Some(ElementType::I64),
            "u1" => Some(ElementType::U8),
            "u2" => Some(ElementType::U16),
            "u4" => Some(ElementType::U32),
            "u8" => Some(ElementType::U64),
            "f4" => Some(ElementType::F32),
            "f8" => Some(ElementType::F64),
            "s16" => Some(ElementType::Str16),
            "t8" => Some(ElementType::Epoch),
            _ => None,
        }
    }

    /// The width in bytes of one packed element of this type.
    pub fn byte_width(&self) -> usize {
        match self {
            ElementType::I8 | ElementType::U8 => 1,
            ElementType::I16 | ElementType::U16 => 2,
            ElementType::I32 | ElementType::U32 | ElementType::F32 => 4,
            ElementType::I64 | ElementType::U64 | ElementType::F64 | ElementType::Epoch => 8,
            ElementType::Str16 => STR_CELL,
        }
    }

    /// Reports whether columns of this type can be coerced to a numeric
    /// canonical form.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ElementType::Str16 | ElementType::Epoch)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for ElementType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for ElementType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<ElementType, D::Error> {
        struct CodeVisitor;

        impl Visitor<'_> for CodeVisitor {
            type Value = ElementType;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an element type code")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ElementType, E> {
                ElementType::from_code(v)
                    .ok_or_else(|| E::custom(format!("unknown element type code {v:?}")))
            }
        }

        deserializer.deserialize_str(CodeVisitor)
    }
}

/// A column shape descriptor: a name paired with an element type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnShape {
    /// The column name.
    pub name: String,
    /// The element type shared by every cell of the column.
    pub element_type: ElementType,
}

/// A homogeneously-typed array of column values.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnArray {
    /// 8-bit signed integers.
    I8(Vec<i8>),
    /// 16-bit signed integers.
    I16(Vec<i16>),
    /// 32-bit signed integers.
    I32(Vec<i32>),
    /// 64-bit signed integers.
    I64(Vec<i64>),
    /// 8-bit unsigned integers.
    U8(Vec<u8>),
    /// 16-bit unsigned integers.
    U16(Vec<u16>),
    /// 32-bit unsigned integers.
    U32(Vec<u32>),
    /// 64-bit unsigned integers.
    U64(Vec<u64>),
    /// 32-bit floating-point numbers.
    F32(Vec<f32>),
    /// 64-bit floating-point numbers.
    F64(Vec<f64>),
    /// Strings decoded from fixed-width cells.
    Str(Vec<String>),
    /// Timestamps as Unix seconds.
    Epoch(Vec<i64>),
}

impl ColumnArray {
    /// The number of values in the column.
    pub fn len(&self) -> usize {
        match self {
            ColumnArray::I8(v) => v.len(),
            ColumnArray::I16(v) => v.len(),
            ColumnArray::I32(v) => v.len(),
            ColumnArray::I64(v) => v.len(),
            ColumnArray::U8(v) => v.len(),
            ColumnArray::U16(v) => v.len(),
            ColumnArray::U32(v) => v.len(),
            ColumnArray::U64(v) => v.len(),
            ColumnArray::F32(v) => v.len(),
            ColumnArray::F64(v) => v.len(),
            ColumnArray::Str(v) => v.len(),
            ColumnArray::Epoch(v) => v.len(),
        }
    }

    /// Reports whether the column holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element type of the column.
    pub fn element_type(&self) -> ElementType {
        match self {
            ColumnArray::I8(_) => ElementType::I8,
            ColumnArray::I16(_) => ElementType::I16,
            ColumnArray::I32(_) => ElementType::I32,
            ColumnArray::I64(_) => ElementType::I64,
            ColumnArray::U8(_) => ElementType::U8,
            ColumnArray::U16(_) => ElementType::U16,
            ColumnArray::U32(_) => ElementType::U32,
            ColumnArray::U64(_) => ElementType::U64,
            ColumnArray::F32(_) => ElementType::F32,
            ColumnArray::F64(_) => ElementType::F64,
            ColumnArray::Str(_) => ElementType::Str16,
            ColumnArray::Epoch(_) => ElementType::Epoch,
        }
    }

    /// Reinterprets a packed little-endian buffer as a column of
    /// `element_type` values.
    ///
    /// The buffer length must be a whole number of cells. The returned array
    /// owns its values; it never borrows from `bytes`.
    pub fn from_le_bytes(
        element_type: ElementType,
        bytes: &[u8],
    ) -> Result<ColumnArray, ColumnBytesError> {
        let width = element_type.byte_width();
        if bytes.len() % width != 0 {
            return Err(ColumnBytesError::Ragged {
                element_type,
                len: bytes.len(),
            });
        }
        let cells = bytes.len() / width;
        let array = match element_type {
            ElementType::I8 => ColumnArray::I8(bytes.iter().map(|&b| b as i8).collect()),
            ElementType::U8 => ColumnArray::U8(bytes.to_vec()),
            ElementType::I16 => {
                let mut out = vec![0; cells];
                LittleEndian::read_i16_into(bytes, &mut out);
                ColumnArray::I16(out)
            }
            ElementType::U16 => {
                let mut out = vec![0; cells];
                LittleEndian::read_u16_into(bytes, &mut out);
                ColumnArray::U16(out)
            }
            ElementType::I32 => {
                let mut out = vec![0; cells];
                LittleEndian::read_i32_into(bytes, &mut out);
                ColumnArray::I32(out)
            }
            ElementType::U32 => {
                let mut out = vec![0; cells];
                LittleEndian::read_u32_into(bytes, &mut out);
                ColumnArray::U32(out)
            }
            ElementType::I64 => {
                let mut out = vec![0; cells];
                LittleEndian::read_i64_into(bytes, &mut out);
                ColumnArray::I64(out)
            }
            ElementType::U64 => {
                let mut out = vec![0; cells];
                LittleEndian::read_u64_into(bytes, &mut out);
                ColumnArray::U64(out)
            }
            ElementType::F32 => {
                let mut out = vec![0.0; cells];
                LittleEndian::read_f32_into(bytes, &mut out);
                ColumnArray::F32(out)
            }
            ElementType::F64 => {
                let mut out = vec![0.0; cells];
                LittleEndian::read_f64_into(bytes, &mut out);
                ColumnArray::F64(out)
            }
            ElementType::Epoch => {
                let mut out = vec![0; cells];
                LittleEndian::read_i64_into(bytes, &mut out);
                ColumnArray::Epoch(out)
            }
            ElementType::Str16 => {
                let mut out = Vec::with_capacity(cells);
                for (index, cell) in bytes.chunks_exact(STR_CELL).enumerate() {
                    let end = cell.iter().position(|&b| b == 0).unwrap_or(STR_CELL);
                    let s = std::str::from_utf8(&cell[..end])
                        .map_err(|_| ColumnBytesError::InvalidUtf8 { index })?;
                    out.push(s.to_owned());
                }
                ColumnArray::Str(out)
            }
        };
        Ok(array)
    }
}

/// An error reinterpreting a packed buffer as a typed column.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ColumnBytesError {
    /// The buffer is not a whole number of cells.
    #[error("{len}-byte buffer is not a whole number of {element_type} cells")]
    Ragged {
        /// The element type being decoded.
        element_type: ElementType,
        /// The offending buffer length.
        len: usize,
    },
    /// A string cell holds invalid UTF-8.
    #[error("invalid UTF-8 in string cell {index}")]
    InvalidUtf8 {
        /// The zero-based cell index.
        index: usize,
    },
}
