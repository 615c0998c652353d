#![deny(clippy::wildcard_imports)]

pub mod bootstrap;
pub mod config;
pub mod control;
pub mod error;
pub mod metadata;
pub mod player;
pub mod state_machine;
pub mod transport;
pub mod unload;

#[cfg(test)]
mod tests;

pub use bootstrap::{QueuedSdkBootstrap, SdkBootstrap, SdkLoadRequest, SdkNamespace, load_sdk};
pub use config::MeasurementsConfig;
pub use control::{
    MeasurementsHandle, SessionSnapshot, start_measurements, start_measurements_with_unload,
};
pub use error::{BootstrapError, MeasurementsError, MetadataError, TransportError};
pub use metadata::builder::NielsenMetadataBuilder;
pub use metadata::record::{ContentMetadata, NielsenMetadata};
pub use metadata::strategy::MetadataStrategy;
pub use player::{PlayerApi, PlayerEvent, PlayerEventKind};
pub use state_machine::{PlaybackState, PlaybackStateMachine};
pub use transport::Transport;
pub use unload::UnloadSignal;
