// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binary "coded" representation of integer/floating point arrays and
//! matrices: a little-endian, byte-reinterpreted buffer, base64-encoded.
//!
//! Grounded on `original_source/include/rexsapi/CodedValue.hxx`. One
//! deliberate divergence from the original: matrix decoding there infers a
//! square shape via `sqrt(element_count)`. This crate instead requires the
//! caller to supply the row count taken from the wire format's explicit
//! `rows`/`columns` attributes and only requires row uniformity, not
//! squareness (see `DESIGN.md`).

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Error, Result};
use crate::value::value::{CodeType, Matrix};

/// The element type actually present in a coded payload on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodedValueType {
    None,
    Int32,
    Float32,
    Float64,
}

impl CodedValueType {
    pub fn from_wire_str(s: &str) -> Result<CodedValueType> {
        Ok(match s {
            "" | "none" => CodedValueType::None,
            "int32" => CodedValueType::Int32,
            "float32" => CodedValueType::Float32,
            "float64" => CodedValueType::Float64,
            other => return Err(Error::Decode(format!("unknown coded value type '{other}'"))),
        })
    }

    pub fn as_wire_str(self) -> &'static str {
        match self {
            CodedValueType::None => "none",
            CodedValueType::Int32 => "int32",
            CodedValueType::Float32 => "float32",
            CodedValueType::Float64 => "float64",
        }
    }

    /// The [`CodeType`] a decoded value should be tagged with: `Float32`
    /// implies the value was [`CodeType::Optimized`], everything else
    /// implies [`CodeType::Default`].
    fn as_code_type(self) -> CodeType {
        if self == CodedValueType::Float32 {
            CodeType::Optimized
        } else {
            CodeType::Default
        }
    }
}

trait LeBytes {
    const SIZE: usize;
    fn push_le(self, bytes: &mut Vec<u8>);
}

impl LeBytes for i32 {
    const SIZE: usize = 4;
    fn push_le(self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.to_le_bytes());
    }
}

impl LeBytes for f32 {
    const SIZE: usize = 4;
    fn push_le(self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.to_le_bytes());
    }
}

impl LeBytes for f64 {
    const SIZE: usize = 8;
    fn push_le(self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.to_le_bytes());
    }
}

fn encode_bytes<T: LeBytes + Copy>(values: &[T]) -> String {
    let mut bytes = Vec::with_capacity(values.len() * T::SIZE);
    for value in values {
        value.push_le(&mut bytes);
    }
    STANDARD.encode(bytes)
}

fn decode_i32(data: &str) -> Result<Vec<i32>> {
    let bytes = STANDARD.decode(data).map_err(|e| Error::Decode(e.to_string()))?;
    Ok(bytes.chunks_exact(4).map(|c| i32::from_le_bytes(c.try_into().unwrap())).collect())
}

fn decode_f32(data: &str) -> Result<Vec<f32>> {
    let bytes = STANDARD.decode(data).map_err(|e| Error::Decode(e.to_string()))?;
    Ok(bytes.chunks_exact(4).map(|c| f32::from_le_bytes(c.try_into().unwrap())).collect())
}

fn decode_f64(data: &str) -> Result<Vec<f64>> {
    let bytes = STANDARD.decode(data).map_err(|e| Error::Decode(e.to_string()))?;
    Ok(bytes.chunks_exact(8).map(|c| f64::from_le_bytes(c.try_into().unwrap())).collect())
}

/// Encodes an integer array. Integers always truncate to `int32`
/// regardless of `code_type`, matching the original's unconditional
/// behavior for integer arrays.
pub fn encode_integer_array(values: &[i64]) -> (String, CodedValueType) {
    let truncated: Vec<i32> = values.iter().map(|v| *v as i32).collect();
    (encode_bytes(&truncated), CodedValueType::Int32)
}

/// Encodes a floating point array. `Default` encodes as `float64`;
/// `Optimized` truncates to `float32` (lossy).
pub fn encode_float_array(values: &[f64], code_type: CodeType) -> Result<(String, CodedValueType)> {
    match code_type {
        CodeType::Default => Ok((encode_bytes(values), CodedValueType::Float64)),
        CodeType::Optimized => {
            let narrowed: Vec<f32> = values.iter().map(|v| *v as f32).collect();
            Ok((encode_bytes(&narrowed), CodedValueType::Float32))
        }
        CodeType::None => Err(Error::Internal("cannot binary-code a value with CodeType::None".into())),
    }
}

/// Decodes an integer array, widening the wire `int32` payload to `i64`.
pub fn decode_integer_array(data: &str, wire_type: CodedValueType) -> Result<(Vec<i64>, CodeType)> {
    if wire_type != CodedValueType::Int32 {
        return Err(Error::Decode("coded value type does not correspond to attribute value type".into()));
    }
    let values = decode_i32(data)?.into_iter().map(i64::from).collect();
    Ok((values, wire_type.as_code_type()))
}

/// Decodes a floating point array, widening `float32` payloads to `f64`.
pub fn decode_float_array(data: &str, wire_type: CodedValueType) -> Result<(Vec<f64>, CodeType)> {
    let values = match wire_type {
        CodedValueType::Float32 => decode_f32(data)?.into_iter().map(f64::from).collect(),
        CodedValueType::Float64 => decode_f64(data)?,
        _ => return Err(Error::Decode("coded value type does not correspond to attribute value type".into())),
    };
    Ok((values, wire_type.as_code_type()))
}

/// Encodes an integer matrix, flattening row-major. Always codes as `int32`.
pub fn encode_integer_matrix(matrix: &Matrix<i64>) -> (String, CodedValueType) {
    let flat: Vec<i64> = matrix.rows().iter().flat_map(|row| row.iter().copied()).collect();
    encode_integer_array(&flat)
}

/// Encodes a floating point matrix, flattening row-major.
pub fn encode_float_matrix(matrix: &Matrix<f64>, code_type: CodeType) -> Result<(String, CodedValueType)> {
    let flat: Vec<f64> = matrix.rows().iter().flat_map(|row| row.iter().copied()).collect();
    encode_float_array(&flat, code_type)
}

/// Decodes an integer matrix. `rows` must come from the wire format's
/// explicit row count; this crate does not infer squareness.
pub fn decode_integer_matrix(data: &str, wire_type: CodedValueType, rows: usize) -> Result<(Matrix<i64>, CodeType)> {
    let (flat, coded) = decode_integer_array(data, wire_type)?;
    Ok((reshape(flat, rows)?, coded))
}

/// Decodes a floating point matrix. `rows` must come from the wire format's
/// explicit row count.
pub fn decode_float_matrix(data: &str, wire_type: CodedValueType, rows: usize) -> Result<(Matrix<f64>, CodeType)> {
    let (flat, coded) = decode_float_array(data, wire_type)?;
    Ok((reshape(flat, rows)?, coded))
}

fn reshape<T>(flat: Vec<T>, rows: usize) -> Result<Matrix<T>> {
    if rows == 0 {
        return Ok(Matrix::new_unchecked(Vec::new()));
    }
    if flat.len() % rows != 0 {
        return Err(Error::Decode(format!(
            "coded matrix payload of {} elements does not divide evenly into {} rows",
            flat.len(),
            rows
        )));
    }
    let columns = flat.len() / rows;
    let mut iter = flat.into_iter();
    let mut result = Vec::with_capacity(rows);
    for _ in 0..rows {
        result.push(iter.by_ref().take(columns).collect());
    }
    Ok(Matrix::new_unchecked(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_array_round_trips_through_int32() {
        let (encoded, wire_type) = encode_integer_array(&[1, 2, 3]);
        assert_eq!(wire_type, CodedValueType::Int32);
        let (decoded, coded) = decode_integer_array(&encoded, wire_type).unwrap();
        assert_eq!(decoded, vec![1, 2, 3]);
        assert_eq!(coded, CodeType::Default);
    }

    #[test]
    fn integer_array_truncates_i64_to_i32() {
        let big = i64::from(i32::MAX) + 10;
        let (encoded, wire_type) = encode_integer_array(&[big]);
        let (decoded, _) = decode_integer_array(&encoded, wire_type).unwrap();
        assert_eq!(decoded[0], i64::from(i32::MIN) + 9);
    }

    #[test]
    fn float_array_default_uses_float64() {
        let (encoded, wire_type) = encode_float_array(&[1.5, 2.5], CodeType::Default).unwrap();
        assert_eq!(wire_type, CodedValueType::Float64);
        let (decoded, coded) = decode_float_array(&encoded, wire_type).unwrap();
        assert_eq!(decoded, vec![1.5, 2.5]);
        assert_eq!(coded, CodeType::Default);
    }

    #[test]
    fn float_array_optimized_uses_float32_and_is_lossy() {
        let (encoded, wire_type) = encode_float_array(&[0.1], CodeType::Optimized).unwrap();
        assert_eq!(wire_type, CodedValueType::Float32);
        let (decoded, coded) = decode_float_array(&encoded, wire_type).unwrap();
        assert_eq!(coded, CodeType::Optimized);
        assert!((decoded[0] - 0.1).abs() < 1e-6);
        assert_ne!(decoded[0], 0.1);
    }

    #[test]
    fn matrix_round_trips_with_explicit_row_count() {
        let matrix = Matrix::new(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        let (encoded, wire_type) = encode_float_matrix(&matrix, CodeType::Default).unwrap();
        let (decoded, _) = decode_float_matrix(&encoded, wire_type, 3).unwrap();
        assert_eq!(decoded.rows(), matrix.rows());
    }
}
