//! Realtime tracking channel
//!
//! WebSocket endpoint carrying the live sample stream. Frames are JSON
//! text with an `{"event": ..., "data": ...}` envelope:
//!
//! - `register` `{sellerId}` installs the connection in the registry and
//!   acks `{status: "registered", sellerId}`.
//! - `updateLocation` `{sellerId, lat, lng, sessionId?}` runs the sample
//!   through the ingestion engine, acks `{status: "ok"|"skipped", ...}`,
//!   and on accept fans `{sellerId, lat, lng, timestamp}` out to every
//!   other registered channel.
//! - `ping` acks `{status: "pong", timestamp}`.
//!
//! Malformed payloads and ingestion failures become an `error` event on
//! the offending channel; they never terminate the connection. Socket
//! teardown removes the registry entry by connection identity.

use crate::core::ingestion::IngestOutcome;
use crate::core::registry::{ChannelMessage, SellerChannel};
use crate::server::state::AppState;
use actix_ws::{CloseCode, Message, MessageStream, Session};
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Inbound frame envelope
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
enum InboundFrame {
    /// Bind this connection to a seller identity
    Register(RegisterPayload),
    /// A raw position sample
    UpdateLocation(UpdateLocationPayload),
    /// Liveness probe
    Ping,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterPayload {
    seller_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateLocationPayload {
    seller_id: String,
    lat: f64,
    lng: f64,
    #[serde(default)]
    session_id: Option<Uuid>,
}

/// WebSocket entry point for the tracking channel
pub async fn tracking_channel(
    req: actix_web::HttpRequest,
    stream: actix_web::web::Payload,
    state: actix_web::web::Data<AppState>,
) -> actix_web::Result<actix_web::HttpResponse> {
    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;

    let connection_id = Uuid::new_v4();
    let (tx, rx) = mpsc::unbounded_channel();

    debug!(connection_id = %connection_id, "tracking channel opened");

    actix_web::rt::spawn(write_loop(session.clone(), rx));
    actix_web::rt::spawn(read_loop(
        connection_id,
        session,
        msg_stream,
        tx,
        state.into_inner(),
    ));

    Ok(response)
}

/// Drain the connection's outbound queue into the socket
///
/// A single writer task per connection keeps frame delivery ordered and
/// lets the registry tear a displaced channel down without touching the
/// socket directly.
async fn write_loop(mut session: Session, mut rx: mpsc::UnboundedReceiver<ChannelMessage>) {
    while let Some(message) = rx.recv().await {
        match message {
            ChannelMessage::Event(frame) => {
                if session.text(frame).await.is_err() {
                    break;
                }
            }
            ChannelMessage::Shutdown => {
                let _ = session.close(Some(CloseCode::Policy.into())).await;
                return;
            }
        }
    }
}

/// Process inbound frames until the socket goes away
async fn read_loop(
    connection_id: Uuid,
    mut session: Session,
    mut msg_stream: MessageStream,
    tx: mpsc::UnboundedSender<ChannelMessage>,
    state: std::sync::Arc<AppState>,
) {
    while let Some(Ok(message)) = msg_stream.next().await {
        match message {
            Message::Text(text) => {
                handle_frame(connection_id, &text, &tx, &state).await;
            }
            Message::Ping(bytes) => {
                if session.pong(&bytes).await.is_err() {
                    break;
                }
            }
            Message::Close(reason) => {
                debug!(connection_id = %connection_id, ?reason, "peer closed tracking channel");
                break;
            }
            _ => {}
        }
    }

    if let Some(seller_id) = state.registry.unregister(connection_id) {
        info!(
            connection_id = %connection_id,
            seller_id = %seller_id,
            "tracking channel unregistered"
        );
    }
}

async fn handle_frame(
    connection_id: Uuid,
    text: &str,
    tx: &mpsc::UnboundedSender<ChannelMessage>,
    state: &AppState,
) {
    let inbound: InboundFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(connection_id = %connection_id, error = %e, "malformed tracking frame");
            send(tx, error_frame(&format!("malformed frame: {}", e)));
            return;
        }
    };

    match inbound {
        InboundFrame::Register(payload) => {
            state.registry.register(
                &payload.seller_id,
                SellerChannel::new(connection_id, tx.clone()),
            );
            info!(
                connection_id = %connection_id,
                seller_id = %payload.seller_id,
                "tracking channel registered"
            );
            send(
                tx,
                ack_frame(json!({
                    "status": "registered",
                    "sellerId": payload.seller_id,
                })),
            );
        }
        InboundFrame::UpdateLocation(payload) => {
            handle_update_location(tx, state, payload).await;
        }
        InboundFrame::Ping => {
            send(
                tx,
                ack_frame(json!({
                    "status": "pong",
                    "timestamp": chrono::Utc::now().timestamp_millis(),
                })),
            );
        }
    }
}

async fn handle_update_location(
    tx: &mpsc::UnboundedSender<ChannelMessage>,
    state: &AppState,
    payload: UpdateLocationPayload,
) {
    let outcome = state
        .ingestion
        .ingest(
            &payload.seller_id,
            payload.lat,
            payload.lng,
            payload.session_id,
        )
        .await;

    match outcome {
        Ok(IngestOutcome::Recorded(record)) => {
            send(
                tx,
                ack_frame(json!({
                    "status": "ok",
                    "message": "location recorded",
                    "data": record,
                })),
            );

            if state.config.tracking().broadcast_enabled {
                let broadcast = frame(
                    "locationBroadcast",
                    json!({
                        "sellerId": record.seller_id,
                        "lat": record.latitude,
                        "lng": record.longitude,
                        "timestamp": record.recorded_at.timestamp_millis(),
                    }),
                );
                for peer in state.registry.peers_of(&record.seller_id) {
                    peer.send_event(broadcast.clone());
                }
            }
        }
        Ok(IngestOutcome::Skipped { .. }) => {
            send(
                tx,
                ack_frame(json!({
                    "status": "skipped",
                    "message": "sample within sampling thresholds",
                })),
            );
        }
        Err(e) if e.is_recoverable() => {
            send(tx, error_frame(&e.to_string()));
        }
        Err(e) => {
            error!(seller_id = %payload.seller_id, error = %e, "realtime ingestion failed");
            send(tx, error_frame("internal error"));
        }
    }
}

fn frame(event: &str, data: serde_json::Value) -> String {
    json!({"event": event, "data": data}).to_string()
}

fn ack_frame(data: serde_json::Value) -> String {
    frame("ack", data)
}

fn error_frame(message: &str) -> String {
    frame("error", json!({"message": message}))
}

fn send(tx: &mpsc::UnboundedSender<ChannelMessage>, frame: String) {
    let _ = tx.send(ChannelMessage::Event(frame));
}
