//! Live connection registry
//!
//! Maps a seller identity to its currently registered realtime channel.
//! The table is an owned component handed to the server state at startup;
//! nothing here is global.
//!
//! Registration is last-wins: a second `register` for the same seller
//! tears the first channel down before installing the new one, so a
//! seller never has two live channels. Teardown events from the transport
//! layer carry only the channel, so `unregister` matches on connection
//! identity rather than seller identity.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Message pushed to a channel's writer task
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelMessage {
    /// A serialized frame to deliver to the peer
    Event(String),
    /// Registry-initiated teardown (the channel was displaced)
    Shutdown,
}

/// Handle to one live realtime channel
///
/// Cloneable sender side of the connection's outbound queue; the ws
/// handler owns the receiving end and the actual socket.
#[derive(Debug, Clone)]
pub struct SellerChannel {
    connection_id: Uuid,
    outbound: mpsc::UnboundedSender<ChannelMessage>,
}

impl SellerChannel {
    /// Create a handle for a connection's outbound queue
    pub fn new(connection_id: Uuid, outbound: mpsc::UnboundedSender<ChannelMessage>) -> Self {
        Self {
            connection_id,
            outbound,
        }
    }

    /// Identity of the underlying connection
    pub fn connection_id(&self) -> Uuid {
        self.connection_id
    }

    /// Queue a serialized frame for delivery
    ///
    /// Returns false when the connection's writer has already gone away.
    pub fn send_event(&self, frame: String) -> bool {
        self.outbound.send(ChannelMessage::Event(frame)).is_ok()
    }

    /// Ask the connection's writer to close the socket
    pub fn shutdown(&self) -> bool {
        self.outbound.send(ChannelMessage::Shutdown).is_ok()
    }
}

/// Registry of live seller channels
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    channels: DashMap<String, SellerChannel>,
}

impl ConnectionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Install a channel for a seller, displacing any previous one
    ///
    /// The displaced channel is shut down before the new one is installed
    /// and returned for the caller's bookkeeping.
    pub fn register(&self, seller_id: &str, channel: SellerChannel) -> Option<SellerChannel> {
        let displaced = self.channels.insert(seller_id.to_string(), channel);
        if let Some(old) = &displaced {
            debug!(
                seller_id,
                connection_id = %old.connection_id(),
                "displacing stale channel"
            );
            old.shutdown();
        }
        displaced
    }

    /// Remove the entry owned by a connection
    ///
    /// Matches on connection identity: a teardown for a connection that was
    /// already displaced by a newer registration leaves the newer entry
    /// untouched. Returns the seller the connection was registered for.
    pub fn unregister(&self, connection_id: Uuid) -> Option<String> {
        let seller_id = self
            .channels
            .iter()
            .find(|entry| entry.value().connection_id() == connection_id)
            .map(|entry| entry.key().clone())?;

        self.channels
            .remove_if(&seller_id, |_, channel| {
                channel.connection_id() == connection_id
            })
            .map(|(seller_id, _)| seller_id)
    }

    /// Look up a seller's live channel
    pub fn get(&self, seller_id: &str) -> Option<SellerChannel> {
        self.channels.get(seller_id).map(|entry| entry.value().clone())
    }

    /// Sellers with a live channel
    pub fn list_active(&self) -> Vec<String> {
        self.channels.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Every live channel except the given seller's, for broadcast fan-out
    pub fn peers_of(&self, seller_id: &str) -> Vec<SellerChannel> {
        self.channels
            .iter()
            .filter(|entry| entry.key() != seller_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of live channels
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channel is registered
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
