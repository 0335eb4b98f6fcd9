//! Metadata schema - the `nx3.json` sidecar.
//!
//! This module provides:
//! - [`MetadataRecord`] - Versioned record (v1 legacy, v2 current)
//! - [`Properties`] / [`PropertyShape`] - Flat vs. per-object property blocks
//! - [`PropertyValue`] / [`PropertySet`] - Typed custom-property values
//! - [`coerce`] - Best-effort string to number coercion

mod coerce;
mod properties;
mod record;
mod value;

pub use coerce::coerce;
pub use properties::{Properties, PropertyShape};
pub use record::{
    GeometryProperties, LoraProperties, MetadataRecord, RecordBuilder, GEOMETRY_KEY,
    LEGACY_VERSION, LORA_KEY, MODEL_FORMAT, RECORD_TYPE, RECORD_VERSION,
};
pub use value::{set_to_json, PropertySet, PropertyValue};
