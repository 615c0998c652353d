//! Size-bounded metadata records for the vendor's load-metadata call.
//!
//! [`builder::NielsenMetadataBuilder`] accumulates a record from integrator
//! defaults, the player source or an ad, validates the required fields and
//! trims optional fields until the serialized form fits
//! [`wire::MAX_PAYLOAD_BYTES`].

pub mod builder;
pub mod record;
pub mod strategy;
pub mod wire;
