//! Core record types for the helpdesk service
//!
//! These are plain database-backed records; their lifecycle is managed by the
//! repositories in [`crate::storage`] and invariants are enforced in the web
//! handlers, mirroring the CRUD shape of the module.

pub mod attachment;
pub mod builders;
pub mod category;
pub mod custom_field;
pub mod event;
pub mod mail;
pub mod reply;
pub mod settings;
pub mod status;
pub mod tag;
pub mod ticket;
pub mod user;

pub use attachment::{Attachment, AttachmentParent};
pub use builders::{EventBuilder, ReplyBuilder, TicketBuilder};
pub use category::{Category, TICKET_CATEGORY_KIND};
pub use custom_field::CustomField;
pub use event::{Event, EventAction, EventTracking, TrackingStatus};
pub use mail::{QueuedMail, QueuedMailStatus, MAIL_RESOURCE_REPLY, MAIL_RESOURCE_TICKET};
pub use reply::{Reply, ReplyKind};
pub use settings::{ReplyingInterface, Settings};
pub use status::{TicketStatus, ANSWERED_STATUS_ID, CLOSED_STATUS_ID, OPEN_STATUS_ID};
pub use tag::{Tag, TICKET_TAG_KIND};
pub use ticket::{ActiveState, Priority, Ticket, TicketSource};
pub use user::{User, UserKind};
