// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The REXS value subsystem: the tagged-union [`Value`] type, its
//! [`Matrix`] and [`DateTimeValue`] helpers, and the binary [`codec`] used
//! for "coded" array/matrix payloads.

mod value;

pub mod codec;

pub use value::{CodeType, DateTimeValue, Matrix, Value, ValueType};
