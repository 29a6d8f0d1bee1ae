//! RTM event receiver over WebSocket.

use crate::error::SlackError;
use crate::types::RtmEvent;
use futures::StreamExt;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_stream::Stream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Receiver for a single RTM session.
pub struct RtmReceiver {
    socket: Socket,
}

impl RtmReceiver {
    /// Open the WebSocket returned by `rtm.connect`.
    pub async fn connect(url: &str) -> Result<Self, SlackError> {
        let (socket, _) = connect_async(url).await?;
        info!("RTM WebSocket connected");
        Ok(Self { socket })
    }

    /// Consume the session as a stream of events.
    ///
    /// Unparseable frames are yielded as errors and the stream keeps going.
    /// The stream ends when the server closes the socket or the transport fails.
    pub fn stream(self) -> impl Stream<Item = Result<RtmEvent, SlackError>> {
        let mut socket = self.socket;

        async_stream::stream! {
            while let Some(frame) = socket.next().await {
                match frame {
                    Ok(Message::Text(text)) => match parse_frame(&text) {
                        Ok(Some(event)) => yield Ok(event),
                        Ok(None) => continue,
                        Err(e) => yield Err(e),
                    },
                    Ok(Message::Close(frame)) => {
                        info!(?frame, "RTM WebSocket closed by server");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("RTM WebSocket error: {}", e);
                        yield Err(SlackError::WebSocket(e));
                        break;
                    }
                }
            }
        }
    }
}

/// Decode a text frame.
///
/// Returns `Ok(None)` for frames without a `type`, which are acks to
/// messages sent over the socket.
pub fn parse_frame(text: &str) -> Result<Option<RtmEvent>, SlackError> {
    let raw: Value = serde_json::from_str(text)?;
    if raw.get("type").is_none() {
        debug!("Skipping untyped RTM frame");
        return Ok(None);
    }

    Ok(Some(serde_json::from_value(raw)?))
}
