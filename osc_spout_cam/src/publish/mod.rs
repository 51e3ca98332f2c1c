//! Shared-texture publishing: the naming registry and the per-tick frame
//! publisher.

pub mod registry;
pub mod frame_publisher;

pub use registry::{
    LocalPublishRegistry, PublishRegistry, RegistryHandle, SenderInfo, shared_registry,
};
pub use frame_publisher::{
    FramePublisher, Publication, PublishIdentity, PublisherState, TickOutcome,
};
