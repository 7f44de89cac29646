//! What observers get to see.
//!
//! ## Key Types
//!
//! - `Projector`: Masks the stack for one observer
//! - `CardView`: A card as an observer sees it
//! - `Notification`: Everything sent out of a duel
//! - `NotificationSink`: Where notifications go

pub mod notification;
pub mod projection;

pub use notification::{
    ChatChannel, DuelAction, Notification, NotificationSink, NullSink, Recorder, RevealReason,
    ViewPayload,
};
pub use projection::{
    zone_visibility, CardView, FieldView, Perspective, PlayerField, Projector, Visibility,
    ZoneCounts,
};
