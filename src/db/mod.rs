// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The versioned database catalog (units, enums, attributes, components)
//! used to validate and interpret a model.

pub mod model;
pub mod registry;

pub use model::{DbAttribute, DbComponent, DbEnum, DbEnumValue, DbModel, DbUnit, Interval};
pub use registry::{DbRegistry, Version};
