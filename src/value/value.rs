// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Timelike, Utc};

/// Identifies the shape of a [`Value`] without carrying its payload.
///
/// Used by database attribute descriptors to declare what a `Value` must
/// look like, and by [`Value::matches_type`] to check it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Float,
    Boolean,
    Integer,
    Enum,
    String,
    FileReference,
    FloatArray,
    BooleanArray,
    IntegerArray,
    StringArray,
    EnumArray,
    ReferenceComponent,
    FloatMatrix,
    IntegerMatrix,
    BooleanMatrix,
    StringMatrix,
    ArrayOfIntegerArrays,
    DateTime,
}

impl ValueType {
    /// Parses the wire-format spelling of a value type, e.g. `"floating_point"`.
    pub fn from_wire_str(s: &str) -> Option<ValueType> {
        Some(match s {
            "floating_point" => ValueType::Float,
            "boolean" => ValueType::Boolean,
            "integer" => ValueType::Integer,
            "enum" => ValueType::Enum,
            "string" => ValueType::String,
            "file_reference" => ValueType::FileReference,
            "floating_point_array" => ValueType::FloatArray,
            "boolean_array" => ValueType::BooleanArray,
            "integer_array" => ValueType::IntegerArray,
            "string_array" => ValueType::StringArray,
            "enum_array" => ValueType::EnumArray,
            "reference_component" => ValueType::ReferenceComponent,
            "floating_point_matrix" => ValueType::FloatMatrix,
            "integer_matrix" => ValueType::IntegerMatrix,
            "boolean_matrix" => ValueType::BooleanMatrix,
            "string_matrix" => ValueType::StringMatrix,
            "array_of_integer_arrays" => ValueType::ArrayOfIntegerArrays,
            "date_time" => ValueType::DateTime,
            _ => return None,
        })
    }

    /// Renders the wire-format spelling of a value type.
    pub fn as_wire_str(self) -> &'static str {
        match self {
            ValueType::Float => "floating_point",
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Enum => "enum",
            ValueType::String => "string",
            ValueType::FileReference => "file_reference",
            ValueType::FloatArray => "floating_point_array",
            ValueType::BooleanArray => "boolean_array",
            ValueType::IntegerArray => "integer_array",
            ValueType::StringArray => "string_array",
            ValueType::EnumArray => "enum_array",
            ValueType::ReferenceComponent => "reference_component",
            ValueType::FloatMatrix => "floating_point_matrix",
            ValueType::IntegerMatrix => "integer_matrix",
            ValueType::BooleanMatrix => "boolean_matrix",
            ValueType::StringMatrix => "string_matrix",
            ValueType::ArrayOfIntegerArrays => "array_of_integer_arrays",
            ValueType::DateTime => "date_time",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

/// Controls how an integer or floating point array/matrix is binary-coded.
///
/// Has no effect on any other value shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeType {
    /// Not binary-coded; rendered as a textual array/matrix.
    #[default]
    None,
    /// Integers code as `int32`, floats code as `float64`.
    Default,
    /// Integers still code as `int32`; floats code as `float32` (lossy).
    Optimized,
}

/// A row-major, row-uniform 2D array.
///
/// Row uniformity (every row has the same length) is the only shape
/// invariant enforced; this crate does not require the matrix to be
/// square. Construct via [`Matrix::new`], which validates this invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: Vec<Vec<T>>,
}

impl<T> Matrix<T> {
    /// Builds a matrix from its rows, returning `None` if the rows are not
    /// uniform in length.
    pub fn new(rows: Vec<Vec<T>>) -> Option<Self> {
        let matrix = Self { rows };
        if matrix.is_valid() {
            Some(matrix)
        } else {
            None
        }
    }

    /// Builds a matrix without checking row uniformity. Intended for
    /// decoders that reconstruct a matrix from an already-validated wire
    /// `rows`/`columns` pair.
    pub fn new_unchecked(rows: Vec<Vec<T>>) -> Self {
        Self { rows }
    }

    pub fn is_valid(&self) -> bool {
        match self.rows.first() {
            None => true,
            Some(first) => self.rows.iter().all(|row| row.len() == first.len()),
        }
    }

    pub fn rows(&self) -> &[Vec<T>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn into_rows(self) -> Vec<Vec<T>> {
        self.rows
    }
}

/// A UTC instant truncated to whole seconds, plus the offset (in minutes)
/// the value was originally authored in, so serialization can reproduce the
/// author's offset rather than always normalizing to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeValue {
    instant: DateTime<Utc>,
    offset_minutes: i32,
}

impl DateTimeValue {
    pub fn new(instant: DateTime<Utc>, offset_minutes: i32) -> Self {
        let truncated = Utc
            .with_ymd_and_hms(
                instant.year(),
                instant.month(),
                instant.day(),
                instant.hour(),
                instant.minute(),
                instant.second(),
            )
            .single()
            .unwrap_or(instant);
        Self { instant: truncated, offset_minutes }
    }

    pub fn now() -> Self {
        Self::new(Utc::now(), 0)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    /// Renders in the author's original offset, e.g. `2024-03-01T10:00:00+02:00`.
    pub fn as_local_string(&self) -> String {
        let offset = FixedOffset::east_opt(self.offset_minutes * 60).unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        self.instant.with_timezone(&offset).format("%Y-%m-%dT%H:%M:%S%:z").to_string()
    }

    /// Renders normalized to UTC, always with a `+00:00` offset.
    pub fn as_utc_string(&self) -> String {
        self.instant.format("%Y-%m-%dT%H:%M:%S+00:00").to_string()
    }

    /// Parses an ISO-8601 datetime with an explicit offset.
    pub fn parse(s: &str) -> Option<Self> {
        let parsed = DateTime::parse_from_rfc3339(s).ok()?;
        let offset_minutes = parsed.offset().local_minus_utc() / 60;
        Some(Self::new(parsed.with_timezone(&Utc), offset_minutes))
    }
}

impl fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_local_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ValueKind {
    Float(f64),
    Boolean(bool),
    Integer(i64),
    Enum(String),
    String(String),
    FileReference(String),
    FloatArray(Vec<f64>),
    BooleanArray(Vec<bool>),
    IntegerArray(Vec<i64>),
    StringArray(Vec<String>),
    EnumArray(Vec<String>),
    ReferenceComponent(i64),
    FloatMatrix(Matrix<f64>),
    IntegerMatrix(Matrix<i64>),
    BooleanMatrix(Matrix<bool>),
    StringMatrix(Matrix<String>),
    ArrayOfIntegerArrays(Vec<Vec<i64>>),
    DateTime(DateTimeValue),
}

/// The value of a REXS model attribute.
///
/// A value is a tagged union over the 18 REXS value types. It additionally
/// carries a [`CodeType`] describing how the value should be binary-coded
/// on the wire; the coding flag is only meaningful for integer/floating
/// point arrays and matrices and is ignored for every other shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    kind: ValueKind,
    coded: CodeType,
}

macro_rules! value_ctor {
    ($ctor:ident, $variant:ident, $ty:ty) => {
        pub fn $ctor(val: $ty) -> Self {
            Self { kind: ValueKind::$variant(val), coded: CodeType::None }
        }
    };
}

impl Value {
    value_ctor!(float, Float, f64);
    value_ctor!(boolean, Boolean, bool);
    value_ctor!(integer, Integer, i64);
    value_ctor!(float_array, FloatArray, Vec<f64>);
    value_ctor!(boolean_array, BooleanArray, Vec<bool>);
    value_ctor!(integer_array, IntegerArray, Vec<i64>);
    value_ctor!(string_array, StringArray, Vec<String>);
    value_ctor!(enum_array, EnumArray, Vec<String>);
    value_ctor!(reference_component, ReferenceComponent, i64);
    value_ctor!(float_matrix, FloatMatrix, Matrix<f64>);
    value_ctor!(integer_matrix, IntegerMatrix, Matrix<i64>);
    value_ctor!(boolean_matrix, BooleanMatrix, Matrix<bool>);
    value_ctor!(string_matrix, StringMatrix, Matrix<String>);
    value_ctor!(array_of_integer_arrays, ArrayOfIntegerArrays, Vec<Vec<i64>>);
    value_ctor!(date_time, DateTime, DateTimeValue);

    pub fn enum_value(val: impl Into<String>) -> Self {
        Self { kind: ValueKind::Enum(val.into()), coded: CodeType::None }
    }

    pub fn string(val: impl Into<String>) -> Self {
        Self { kind: ValueKind::String(val.into()), coded: CodeType::None }
    }

    pub fn file_reference(val: impl Into<String>) -> Self {
        Self { kind: ValueKind::FileReference(val.into()), coded: CodeType::None }
    }

    pub fn coded(&self) -> CodeType {
        self.coded
    }

    pub fn set_coded(&mut self, coded: CodeType) {
        self.coded = coded;
    }

    pub fn with_coded(mut self, coded: CodeType) -> Self {
        self.coded = coded;
        self
    }

    pub fn value_type(&self) -> ValueType {
        match &self.kind {
            ValueKind::Float(_) => ValueType::Float,
            ValueKind::Boolean(_) => ValueType::Boolean,
            ValueKind::Integer(_) => ValueType::Integer,
            ValueKind::Enum(_) => ValueType::Enum,
            ValueKind::String(_) => ValueType::String,
            ValueKind::FileReference(_) => ValueType::FileReference,
            ValueKind::FloatArray(_) => ValueType::FloatArray,
            ValueKind::BooleanArray(_) => ValueType::BooleanArray,
            ValueKind::IntegerArray(_) => ValueType::IntegerArray,
            ValueKind::StringArray(_) => ValueType::StringArray,
            ValueKind::EnumArray(_) => ValueType::EnumArray,
            ValueKind::ReferenceComponent(_) => ValueType::ReferenceComponent,
            ValueKind::FloatMatrix(_) => ValueType::FloatMatrix,
            ValueKind::IntegerMatrix(_) => ValueType::IntegerMatrix,
            ValueKind::BooleanMatrix(_) => ValueType::BooleanMatrix,
            ValueKind::StringMatrix(_) => ValueType::StringMatrix,
            ValueKind::ArrayOfIntegerArrays(_) => ValueType::ArrayOfIntegerArrays,
            ValueKind::DateTime(_) => ValueType::DateTime,
        }
    }

    pub fn matches_type(&self, value_type: ValueType) -> bool {
        self.value_type() == value_type
    }

    pub fn as_float(&self) -> Option<f64> {
        match &self.kind {
            ValueKind::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match &self.kind {
            ValueKind::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match &self.kind {
            ValueKind::Integer(v) => Some(*v),
            ValueKind::ReferenceComponent(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Enum(v) | ValueKind::String(v) | ValueKind::FileReference(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float_array(&self) -> Option<&[f64]> {
        match &self.kind {
            ValueKind::FloatArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_integer_array(&self) -> Option<&[i64]> {
        match &self.kind {
            ValueKind::IntegerArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_boolean_array(&self) -> Option<&[bool]> {
        match &self.kind {
            ValueKind::BooleanArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_string_array(&self) -> Option<&[String]> {
        match &self.kind {
            ValueKind::StringArray(v) | ValueKind::EnumArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float_matrix(&self) -> Option<&Matrix<f64>> {
        match &self.kind {
            ValueKind::FloatMatrix(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_integer_matrix(&self) -> Option<&Matrix<i64>> {
        match &self.kind {
            ValueKind::IntegerMatrix(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<&DateTimeValue> {
        match &self.kind {
            ValueKind::DateTime(v) => Some(v),
            _ => None,
        }
    }

    /// Renders a string representation of the underlying value, following
    /// the same float-formatting rule used on the wire (§ rendering laws):
    /// up to 15 significant digits, shortest round-trippable form, with a
    /// trailing `.0` appended whenever the result would otherwise look like
    /// an integer.
    pub fn as_string(&self) -> String {
        match &self.kind {
            ValueKind::Float(v) => render_float(*v),
            ValueKind::Boolean(v) => v.to_string(),
            ValueKind::Integer(v) | ValueKind::ReferenceComponent(v) => v.to_string(),
            ValueKind::Enum(v) | ValueKind::String(v) | ValueKind::FileReference(v) => v.clone(),
            ValueKind::FloatArray(v) => array_to_string(v, |x| render_float(*x)),
            ValueKind::BooleanArray(v) => array_to_string(v, |x| x.to_string()),
            ValueKind::IntegerArray(v) => array_to_string(v, |x| x.to_string()),
            ValueKind::StringArray(v) | ValueKind::EnumArray(v) => array_to_string(v, |x| x.clone()),
            ValueKind::FloatMatrix(m) => matrix_to_string(m, |x| render_float(*x)),
            ValueKind::IntegerMatrix(m) => matrix_to_string(m, |x| x.to_string()),
            ValueKind::BooleanMatrix(m) => matrix_to_string(m, |x| x.to_string()),
            ValueKind::StringMatrix(m) => matrix_to_string(m, |x| x.clone()),
            ValueKind::ArrayOfIntegerArrays(v) => {
                let rows: Vec<String> = v.iter().map(|row| array_to_string(row, |x| x.to_string())).collect();
                format!("[{}]", rows.join(","))
            }
            ValueKind::DateTime(dt) => dt.as_local_string(),
        }
    }
}

fn array_to_string<T>(values: &[T], render: impl Fn(&T) -> String) -> String {
    let parts: Vec<String> = values.iter().map(render).collect();
    format!("[{}]", parts.join(","))
}

fn matrix_to_string<T>(matrix: &Matrix<T>, render: impl Fn(&T) -> String) -> String {
    let rows: Vec<String> = matrix.rows().iter().map(|row| array_to_string(row, &render)).collect();
    format!("[{}]", rows.join(","))
}

/// Formats a float the way `fmt::format("{:0.15G}", d)` does in the
/// original C++ implementation: up to 15 significant digits, choosing
/// between fixed and scientific notation the way `%G` does, with trailing
/// zeros stripped.
fn format_g15(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0".to_string() } else { "0".to_string() };
    }

    const PRECISION: i32 = 15;
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exp_str) = sci.split_once('e').expect("scientific notation always has an exponent");
    let exp: i32 = exp_str.parse().expect("exponent is always a valid integer");

    if exp < -4 || exp >= PRECISION {
        let mantissa = trim_trailing_zeros(mantissa);
        format!("{mantissa}E{}{:02}", if exp >= 0 { "+" } else { "-" }, exp.abs())
    } else {
        let decimals = (PRECISION - 1 - exp).max(0) as usize;
        let fixed = format!("{value:.decimals$}");
        trim_trailing_zeros(&fixed)
    }
}

fn trim_trailing_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn render_float(value: f64) -> String {
    let mut rendered = format_g15(value);
    if !rendered.contains('.') && !rendered.contains('E') {
        rendered.push_str(".0");
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_renders_with_trailing_dot_zero() {
        assert_eq!(Value::float(1.0).as_string(), "1.0");
        assert_eq!(Value::float(-2.0).as_string(), "-2.0");
    }

    #[test]
    fn float_renders_fractional_without_padding() {
        assert_eq!(Value::float(1.5).as_string(), "1.5");
        assert_eq!(Value::float(0.1).as_string(), "0.1");
    }

    #[test]
    fn large_float_uses_scientific_notation() {
        let rendered = Value::float(1.234e20).as_string();
        assert!(rendered.contains('E'));
    }

    #[test]
    fn integer_array_renders_as_brackets() {
        assert_eq!(Value::integer_array(vec![1, 2, 3]).as_string(), "[1,2,3]");
    }

    #[test]
    fn matrix_requires_row_uniformity() {
        assert!(Matrix::new(vec![vec![1, 2], vec![3, 4]]).is_some());
        assert!(Matrix::new(vec![vec![1, 2], vec![3]]).is_none());
    }

    #[test]
    fn value_type_matches() {
        let v = Value::integer(42);
        assert!(v.matches_type(ValueType::Integer));
        assert!(!v.matches_type(ValueType::Float));
    }

    #[test]
    fn reference_component_reads_as_integer() {
        let v = Value::reference_component(7);
        assert_eq!(v.as_integer(), Some(7));
        assert_eq!(v.value_type(), ValueType::ReferenceComponent);
    }

    #[test]
    fn date_time_round_trips_utc_string() {
        let dt = DateTimeValue::parse("2024-03-01T10:00:00+00:00").unwrap();
        assert_eq!(dt.as_utc_string(), "2024-03-01T10:00:00+00:00");
    }

    #[test]
    fn date_time_preserves_author_offset() {
        let dt = DateTimeValue::parse("2024-03-01T10:00:00+02:00").unwrap();
        assert_eq!(dt.as_local_string(), "2024-03-01T10:00:00+02:00");
        assert_eq!(dt.as_utc_string(), "2024-03-01T08:00:00+00:00");
    }
}
