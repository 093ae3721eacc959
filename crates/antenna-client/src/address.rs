//! Connection address construction.

use url::Url;
use uuid::Uuid;

use crate::error::EngineError;

/// Build `{ws|wss}://{host}/ws/{visitor-id}[/{room}]`.
///
/// `wss` is used iff the hosting page was loaded over a secure transport.
/// The room segment is percent-encoded, so any room id survives the path.
///
/// # Errors
///
/// Returns [`EngineError::InvalidAddress`] if `host` is not a valid
/// authority.
pub fn connection_address(
    host: &str,
    secure: bool,
    visitor_id: Uuid,
    room: Option<&str>,
) -> Result<String, EngineError> {
    let scheme = if secure { "wss" } else { "ws" };
    let mut url = Url::parse(&format!("{scheme}://{host}/"))
        .map_err(|e| EngineError::InvalidAddress(format!("{host}: {e}")))?;

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| EngineError::InvalidAddress(format!("{host}: cannot be a base")))?;
        segments.pop_if_empty().push("ws").push(&visitor_id.to_string());
        if let Some(room) = room {
            segments.push(room);
        }
    }

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor() -> Uuid {
        Uuid::from_u128(0x6b8b_4567_327b_4c3a_9c3d_0001_0002_0003)
    }

    #[test]
    fn plain_scheme_without_room() {
        let addr = connection_address("localhost:3000", false, visitor(), None).unwrap();
        assert_eq!(addr, format!("ws://localhost:3000/ws/{}", visitor()));
    }

    #[test]
    fn secure_scheme_with_room() {
        let addr = connection_address("chat.example.org", true, visitor(), Some("general")).unwrap();
        assert_eq!(addr, format!("wss://chat.example.org/ws/{}/general", visitor()));
    }

    #[test]
    fn room_segment_is_percent_encoded() {
        let addr = connection_address("localhost", false, visitor(), Some("a/b c")).unwrap();
        assert!(addr.ends_with("/a%2Fb%20c"), "{addr}");
    }

    #[test]
    fn invalid_host_is_rejected() {
        let err = connection_address("bad host", false, visitor(), None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAddress(_)));
    }
}
