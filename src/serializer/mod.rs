// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serializes a [`Model`] back to one of the two wire formats.

pub mod json;
pub mod tree;

use crate::model::Model;

/// The contract both wire-format serializers implement.
pub trait ModelSerializer {
    /// Renders `model` to its wire-format text representation.
    fn serialize(&self, model: &Model) -> String;
}

pub use json::JsonModelSerializer;
pub use tree::TreeModelSerializer;
