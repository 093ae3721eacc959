//! Room identity and its persistence in the hosting location.
//!
//! A room id comes either from the persisted location (the `room` query
//! parameter of the page URL) or from the join form. [`RoomResolver`]
//! publishes it at most once per mount; later changes to the location are a
//! new mount, not an in-place change.

use std::fmt;

use antenna_proto::signal::DEFAULT_ROOM;
use thiserror::Error;
use url::Url;

/// Query parameter that persists the room id.
pub const ROOM_PARAM: &str = "room";

/// Invalid room id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// Input was empty after trimming.
    #[error("room id is empty")]
    Empty,
}

/// Non-empty, trimmed room identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// Parse user or location input.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::Empty`] if `input` is empty after trimming.
    pub fn parse(input: &str) -> Result<Self, RoomError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(RoomError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The single implicit room of the global deployment.
    pub fn global() -> Self {
        Self(DEFAULT_ROOM.to_string())
    }

    /// Room id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoomId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Persisted location of the hosting surface.
///
/// Holds the room id across restarts.
pub trait Location {
    /// Current value of the room parameter, if any.
    fn room_param(&self) -> Option<String>;

    /// Replace the room parameter, preserving everything else.
    fn set_room_param(&mut self, room: &RoomId);
}

/// [`Location`] backed by a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlLocation {
    url: Url,
}

impl UrlLocation {
    /// Wrap a parsed URL.
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// Parse a URL string.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `input` is not an absolute URL.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Url::parse(input).map(Self::new)
    }

    /// The underlying URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// `host[:port]` of the location, port omitted when it is the scheme
    /// default.
    pub fn host(&self) -> Option<String> {
        let host = self.url.host_str()?;
        Some(match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        })
    }

    /// Whether the location was loaded over a secure transport.
    pub fn is_secure(&self) -> bool {
        self.url.scheme() == "https"
    }
}

impl Location for UrlLocation {
    fn room_param(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == ROOM_PARAM)
            .map(|(_, value)| value.into_owned())
    }

    fn set_room_param(&mut self, room: &RoomId) {
        let kept: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(key, _)| key != ROOM_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let mut query = self.url.query_pairs_mut();
        query.clear();
        for (key, value) in &kept {
            query.append_pair(key, value);
        }
        query.append_pair(ROOM_PARAM, room.as_str());
    }
}

/// Resolves the room for a mount.
///
/// Publishes a room at most once; every later call returns `None`.
#[derive(Debug, Default)]
pub struct RoomResolver {
    published: Option<RoomId>,
}

impl RoomResolver {
    /// Create a resolver with no room.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve from the persisted location at mount.
    ///
    /// An absent or blank parameter publishes nothing and the join form is
    /// shown.
    pub fn resolve_startup(&mut self, persisted: Option<&str>) -> Option<RoomId> {
        let room = RoomId::parse(persisted?).ok()?;
        self.publish(room)
    }

    /// Resolve from a join-form submission.
    ///
    /// Blank input is ignored and the form stays.
    pub fn submit(&mut self, input: &str) -> Option<RoomId> {
        match RoomId::parse(input) {
            Ok(room) => self.publish(room),
            Err(err) => {
                tracing::debug!(%err, "ignoring join submission");
                None
            },
        }
    }

    /// Publish the implicit room of the global deployment.
    pub fn resolve_global(&mut self) -> Option<RoomId> {
        self.publish(RoomId::global())
    }

    /// The published room, if any.
    pub fn room(&self) -> Option<&RoomId> {
        self.published.as_ref()
    }

    fn publish(&mut self, room: RoomId) -> Option<RoomId> {
        if let Some(existing) = &self.published {
            tracing::debug!(%existing, requested = %room, "room already published for this mount");
            return None;
        }
        tracing::info!(%room, "room resolved");
        self.published = Some(room.clone());
        Some(room)
    }
}
