// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decodes a raw wire-format payload (text or coded) into a typed [`Value`],
//! given the [`ValueType`] the database declares for the attribute.
//!
//! Grounded on `original_source/include/rexsapi/Value.hxx`'s
//! `detail::TDecoderResult` and the parsers' use of it.

use crate::value::codec::{self, CodedValueType};
use crate::value::{DateTimeValue, Matrix, Value, ValueType};

/// The outcome of attempting to decode a raw payload into a [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum DecoderResult {
    /// Decoding succeeded.
    Success(Value),
    /// No payload was present (e.g. an attribute element with no text and
    /// no coded payload).
    NoValue,
    /// The payload's shape did not match the declared [`ValueType`].
    WrongType(String),
    /// The payload could not be parsed at all.
    Failure(String),
}

impl DecoderResult {
    pub fn into_value(self) -> Option<Value> {
        match self {
            DecoderResult::Success(v) => Some(v),
            _ => None,
        }
    }
}

/// A raw, not-yet-typed attribute payload as read off the wire.
#[derive(Debug, Clone)]
pub enum RawPayload<'a> {
    /// Plain text content, to be parsed per the declared value type.
    Text(&'a str),
    /// A base64 "coded" payload plus the wire element type and, for
    /// matrices, the declared row count.
    Coded { data: &'a str, wire_type: CodedValueType, rows: Option<usize> },
    /// No payload present at all.
    Empty,
}

fn split_list(text: &str) -> Vec<String> {
    text.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_strict_i64(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}

fn parse_strict_f64(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let value: f64 = trimmed.parse().ok()?;
    if value.is_finite() || trimmed.eq_ignore_ascii_case("nan") || trimmed.contains("inf") {
        Some(value)
    } else {
        None
    }
}

/// Decodes `payload` into a [`Value`] of shape `value_type`.
pub fn decode(value_type: ValueType, payload: RawPayload<'_>) -> DecoderResult {
    match payload {
        RawPayload::Empty => DecoderResult::NoValue,
        RawPayload::Coded { data, wire_type, rows } => decode_coded(value_type, data, wire_type, rows),
        RawPayload::Text(text) => decode_text(value_type, text),
    }
}

fn decode_coded(value_type: ValueType, data: &str, wire_type: CodedValueType, rows: Option<usize>) -> DecoderResult {
    match value_type {
        ValueType::IntegerArray => match codec::decode_integer_array(data, wire_type) {
            Ok((values, coded)) => DecoderResult::Success(Value::integer_array(values).with_coded(coded)),
            Err(e) => DecoderResult::Failure(e.to_string()),
        },
        ValueType::FloatArray => match codec::decode_float_array(data, wire_type) {
            Ok((values, coded)) => DecoderResult::Success(Value::float_array(values).with_coded(coded)),
            Err(e) => DecoderResult::Failure(e.to_string()),
        },
        ValueType::IntegerMatrix => {
            let Some(rows) = rows else {
                return DecoderResult::Failure("coded matrix payload is missing a row count".into());
            };
            match codec::decode_integer_matrix(data, wire_type, rows) {
                Ok((matrix, coded)) => DecoderResult::Success(Value::integer_matrix(matrix).with_coded(coded)),
                Err(e) => DecoderResult::Failure(e.to_string()),
            }
        }
        ValueType::FloatMatrix => {
            let Some(rows) = rows else {
                return DecoderResult::Failure("coded matrix payload is missing a row count".into());
            };
            match codec::decode_float_matrix(data, wire_type, rows) {
                Ok((matrix, coded)) => DecoderResult::Success(Value::float_matrix(matrix).with_coded(coded)),
                Err(e) => DecoderResult::Failure(e.to_string()),
            }
        }
        _ => DecoderResult::WrongType(format!("value type {value_type} cannot carry a coded payload")),
    }
}

fn decode_text(value_type: ValueType, text: &str) -> DecoderResult {
    match value_type {
        ValueType::Float => match parse_strict_f64(text) {
            Some(v) => DecoderResult::Success(Value::float(v)),
            None => DecoderResult::Failure(format!("'{text}' is not a valid floating point value")),
        },
        ValueType::Integer | ValueType::ReferenceComponent => match parse_strict_i64(text) {
            Some(v) => DecoderResult::Success(if value_type == ValueType::Integer {
                Value::integer(v)
            } else {
                Value::reference_component(v)
            }),
            None => DecoderResult::Failure(format!("'{text}' is not a valid integer value")),
        },
        ValueType::Boolean => match text.trim() {
            "true" | "1" => DecoderResult::Success(Value::boolean(true)),
            "false" | "0" => DecoderResult::Success(Value::boolean(false)),
            other => DecoderResult::Failure(format!("'{other}' is not a valid boolean value")),
        },
        ValueType::Enum => DecoderResult::Success(Value::enum_value(text.trim())),
        ValueType::String => DecoderResult::Success(Value::string(text)),
        ValueType::FileReference => DecoderResult::Success(Value::file_reference(text.trim())),
        ValueType::DateTime => match DateTimeValue::parse(text.trim()) {
            Some(dt) => DecoderResult::Success(Value::date_time(dt)),
            None => DecoderResult::Failure(format!("'{text}' is not a valid ISO-8601 date time")),
        },
        ValueType::FloatArray => {
            let mut values = Vec::new();
            for part in split_list(text) {
                match parse_strict_f64(&part) {
                    Some(v) => values.push(v),
                    None => return DecoderResult::Failure(format!("'{part}' is not a valid floating point value")),
                }
            }
            DecoderResult::Success(Value::float_array(values))
        }
        ValueType::IntegerArray => {
            let mut values = Vec::new();
            for part in split_list(text) {
                match parse_strict_i64(&part) {
                    Some(v) => values.push(v),
                    None => return DecoderResult::Failure(format!("'{part}' is not a valid integer value")),
                }
            }
            DecoderResult::Success(Value::integer_array(values))
        }
        ValueType::BooleanArray => {
            let mut values = Vec::new();
            for part in split_list(text) {
                match part.as_str() {
                    "true" | "1" => values.push(true),
                    "false" | "0" => values.push(false),
                    other => return DecoderResult::Failure(format!("'{other}' is not a valid boolean value")),
                }
            }
            DecoderResult::Success(Value::boolean_array(values))
        }
        ValueType::StringArray => DecoderResult::Success(Value::string_array(split_list(text))),
        ValueType::EnumArray => DecoderResult::Success(Value::enum_array(split_list(text))),
        ValueType::FloatMatrix | ValueType::IntegerMatrix | ValueType::BooleanMatrix | ValueType::StringMatrix => {
            decode_text_matrix(value_type, text)
        }
        ValueType::ArrayOfIntegerArrays => {
            let rows: Vec<Vec<i64>> = split_rows(text)
                .into_iter()
                .map(|row| row.into_iter().filter_map(|s| parse_strict_i64(&s)).collect())
                .collect();
            DecoderResult::Success(Value::array_of_integer_arrays(rows))
        }
    }
}

fn split_rows(text: &str) -> Vec<Vec<String>> {
    let trimmed = text.trim().trim_start_matches('[').trim_end_matches(']');
    let mut rows = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    for ch in trimmed.chars() {
        match ch {
            '[' => {
                depth += 1;
                if depth > 1 {
                    current.push(ch);
                }
            }
            ']' => {
                depth -= 1;
                if depth == 0 {
                    rows.push(split_list(&current));
                    current.clear();
                } else {
                    current.push(ch);
                }
            }
            _ => current.push(ch),
        }
    }
    rows
}

fn decode_text_matrix(value_type: ValueType, text: &str) -> DecoderResult {
    let rows = split_rows(text);
    match value_type {
        ValueType::FloatMatrix => {
            let mut parsed = Vec::with_capacity(rows.len());
            for row in rows {
                let mut parsed_row = Vec::with_capacity(row.len());
                for cell in row {
                    match parse_strict_f64(&cell) {
                        Some(v) => parsed_row.push(v),
                        None => return DecoderResult::Failure(format!("'{cell}' is not a valid floating point value")),
                    }
                }
                parsed.push(parsed_row);
            }
            match Matrix::new(parsed) {
                Some(matrix) => DecoderResult::Success(Value::float_matrix(matrix)),
                None => DecoderResult::WrongType("matrix rows are not uniform in length".into()),
            }
        }
        ValueType::IntegerMatrix => {
            let mut parsed = Vec::with_capacity(rows.len());
            for row in rows {
                let mut parsed_row = Vec::with_capacity(row.len());
                for cell in row {
                    match parse_strict_i64(&cell) {
                        Some(v) => parsed_row.push(v),
                        None => return DecoderResult::Failure(format!("'{cell}' is not a valid integer value")),
                    }
                }
                parsed.push(parsed_row);
            }
            match Matrix::new(parsed) {
                Some(matrix) => DecoderResult::Success(Value::integer_matrix(matrix)),
                None => DecoderResult::WrongType("matrix rows are not uniform in length".into()),
            }
        }
        ValueType::BooleanMatrix => {
            let mut parsed = Vec::with_capacity(rows.len());
            for row in rows {
                let mut parsed_row = Vec::with_capacity(row.len());
                for cell in row {
                    match cell.as_str() {
                        "true" | "1" => parsed_row.push(true),
                        "false" | "0" => parsed_row.push(false),
                        other => return DecoderResult::Failure(format!("'{other}' is not a valid boolean value")),
                    }
                }
                parsed.push(parsed_row);
            }
            match Matrix::new(parsed) {
                Some(matrix) => DecoderResult::Success(Value::boolean_matrix(matrix)),
                None => DecoderResult::WrongType("matrix rows are not uniform in length".into()),
            }
        }
        ValueType::StringMatrix => match Matrix::new(rows) {
            Some(matrix) => DecoderResult::Success(Value::string_matrix(matrix)),
            None => DecoderResult::WrongType("matrix rows are not uniform in length".into()),
        },
        _ => unreachable!("decode_text_matrix only called for matrix value types"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_float() {
        let result = decode(ValueType::Float, RawPayload::Text("1.5"));
        assert_eq!(result, DecoderResult::Success(Value::float(1.5)));
    }

    #[test]
    fn rejects_trailing_garbage() {
        let result = decode(ValueType::Integer, RawPayload::Text("12abc"));
        assert!(matches!(result, DecoderResult::Failure(_)));
    }

    #[test]
    fn empty_payload_is_no_value() {
        assert_eq!(decode(ValueType::String, RawPayload::Empty), DecoderResult::NoValue);
    }

    #[test]
    fn decodes_coded_integer_array() {
        let (encoded, wire_type) = codec::encode_integer_array(&[1, 2, 3]);
        let result = decode(ValueType::IntegerArray, RawPayload::Coded { data: &encoded, wire_type, rows: None });
        assert_eq!(result, DecoderResult::Success(Value::integer_array(vec![1, 2, 3])));
    }

    #[test]
    fn decodes_text_matrix() {
        let result = decode(ValueType::IntegerMatrix, RawPayload::Text("[[1,2],[3,4]]"));
        let value = result.into_value().unwrap();
        assert_eq!(value.as_integer_matrix().unwrap().rows(), vec![vec![1, 2], vec![3, 4]]);
    }
}
