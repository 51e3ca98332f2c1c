//! OSC wire format: packet decoding, argument streams, pose extraction and
//! packet building.

pub mod packet;
pub mod args;
pub mod builder;
pub mod pose;

pub use packet::{Packet, Message, Bundle, PacketStream, BUNDLE_TAG, IMMEDIATELY};
pub use args::{ArgStream, Argument};
pub use builder::{MessageBuilder, BundleBuilder};
pub use pose::{
    PoseMatrix, PoseTarget, PoseUpdate, decode_pose_updates, read_matrix,
    MODEL_ADDRESS, PROJECTION_ADDRESS, MATRIX_ARG_COUNT, MAX_BUNDLE_DEPTH,
};
