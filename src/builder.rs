//! Construction staging for messages.

use std::ops::{Deref, DerefMut};

use crate::error::{DecodeError, UninitializedError};
use crate::message::Message;

/// Mutable staging for a [`Message`].
///
/// The builder dereferences to the staged message, so fields are set and
/// cleared by plain assignment. [`build`](Builder::build) validates every
/// required field transitively; [`build_partial`](Builder::build_partial)
/// hands back the staged message as-is.
///
/// ```
/// use transit_realtime::{FeedHeader, Message};
///
/// let mut header = FeedHeader::builder();
/// header.gtfs_realtime_version = Some("2.0".to_string());
/// header.timestamp = Some(1_700_000_000);
/// let header = header.build()?;
/// assert_eq!(header.gtfs_realtime_version(), "2.0");
/// # Ok::<(), transit_realtime::UninitializedError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder<M: Message> {
    message: M,
}

impl<M: Message> Builder<M> {
    pub fn new() -> Self {
        Builder { message: M::default() }
    }

    /// Stages an existing message for further modification.
    pub fn from_message(message: M) -> Self {
        Builder { message }
    }

    /// Overlays `other` onto the staged message: present scalars overwrite,
    /// repeated fields append, sub-messages merge recursively.
    pub fn merge_from(&mut self, other: &M) -> &mut Self {
        self.message.merge(other);
        self
    }

    /// Overlays wire data onto the staged message.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not valid wire format.
    pub fn merge_from_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, DecodeError> {
        self.message.merge_from_bytes(bytes)?;
        Ok(self)
    }

    pub fn clear(&mut self) -> &mut Self {
        self.message.clear();
        self
    }

    /// Produces the message after validating that every required field is
    /// set, transitively.
    ///
    /// # Errors
    ///
    /// Returns the missing field paths if validation fails.
    pub fn build(self) -> Result<M, UninitializedError> {
        self.message.check_initialized()?;
        Ok(self.message)
    }

    /// Produces the message without validating required fields.
    pub fn build_partial(self) -> M {
        self.message
    }
}

impl<M: Message> From<M> for Builder<M> {
    fn from(message: M) -> Self {
        Builder::from_message(message)
    }
}

impl<M: Message> Deref for Builder<M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.message
    }
}

impl<M: Message> DerefMut for Builder<M> {
    fn deref_mut(&mut self) -> &mut M {
        &mut self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedHeader, FeedMessage};

    #[test]
    fn test_build_requires_header() {
        let builder = FeedMessage::builder();
        let err = builder.build().unwrap_err();
        assert_eq!(err.missing_fields(), ["header"]);
    }

    #[test]
    fn test_build_succeeds_once_required_fields_set() {
        let mut builder = FeedMessage::builder();
        builder.header = Some(FeedHeader {
            gtfs_realtime_version: Some("2.0".to_string()),
            ..Default::default()
        });
        let feed = builder.build().unwrap();
        assert!(feed.is_initialized());
    }

    #[test]
    fn test_build_partial_never_validates() {
        let feed = FeedMessage::builder().build_partial();
        assert!(!feed.is_initialized());
        assert_eq!(feed, FeedMessage::default());
    }

    #[test]
    fn test_clear_resets_staged_fields() {
        let mut builder = FeedHeader::builder();
        builder.timestamp = Some(9);
        builder.clear();
        assert_eq!(builder.build_partial(), FeedHeader::default());
    }

    #[test]
    fn test_from_message_stages_existing_value() {
        let header = FeedHeader {
            gtfs_realtime_version: Some("2.0".to_string()),
            ..Default::default()
        };
        let mut builder = Builder::from_message(header);
        builder.timestamp = Some(1);
        let rebuilt = builder.build().unwrap();
        assert_eq!(rebuilt.timestamp, Some(1));
    }
}
