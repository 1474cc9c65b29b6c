//! Peer wire protocol.
//!
//! Every message is a JSON object `{ "type": ..., "data": ... }`. Scene
//! mutations travel as portable records and patches; the joining side gets a
//! full snapshot once when the connection opens.

use crate::camera::PanOffset;
use crate::scene::SceneChange;
use crate::shapes::{ShapeId, ShapePatch, ShapeRecord};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// Query parameter carrying the peer to connect to in a join URL.
pub const CONNECT_PARAM: &str = "connect";

/// Sync errors.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Channel closed")]
    ChannelClosed,
    #[error("Channel error: {0}")]
    ChannelFailed(String),
    #[error("Invalid join URL: {0}")]
    InvalidJoinUrl(#[from] url::ParseError),
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Identity of a peer on the signaling layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Full scene state handed to a joining peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSnapshot {
    pub shapes: Vec<ShapeRecord>,
    pub zoom: f64,
    pub pan: PanOffset,
}

/// A shape appeared (or was replaced).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeAdd {
    #[serde(flatten)]
    pub shape: ShapeRecord,
    /// Target z-index. Absent means on top.
    #[serde(rename = "zIndex", default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeUpdate {
    pub id: ShapeId,
    pub patch: ShapePatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRemove {
    pub id: ShapeId,
}

/// A remote pointer position in world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPosition {
    pub peer_id: PeerId,
    pub x: f64,
    pub y: f64,
}

/// Messages exchanged between peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum PeerMessage {
    Sync(SyncSnapshot),
    ShapeAdd(ShapeAdd),
    ShapeUpdate(ShapeUpdate),
    ShapeRemove(ShapeRemove),
    Cursor(CursorPosition),
}

impl PeerMessage {
    pub fn to_json(&self) -> SyncResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> SyncResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Wire tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            PeerMessage::Sync(_) => "sync",
            PeerMessage::ShapeAdd(_) => "shape-add",
            PeerMessage::ShapeUpdate(_) => "shape-update",
            PeerMessage::ShapeRemove(_) => "shape-remove",
            PeerMessage::Cursor(_) => "cursor",
        }
    }
}

impl From<SceneChange> for PeerMessage {
    fn from(change: SceneChange) -> Self {
        match change {
            SceneChange::Added { record, index } => PeerMessage::ShapeAdd(ShapeAdd {
                shape: record,
                z_index: index,
            }),
            SceneChange::Updated { id, patch } => PeerMessage::ShapeUpdate(ShapeUpdate { id, patch }),
            SceneChange::Removed { id } => PeerMessage::ShapeRemove(ShapeRemove { id }),
        }
    }
}

/// Which side opened the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionRole {
    /// We accepted it; we send the snapshot.
    Inbound,
    /// We dialed out.
    Outbound,
}

/// A bidirectional message channel to one peer, provided by the host's
/// transport. Received messages are fed back through the session.
pub trait PeerChannel {
    fn send(&mut self, message: &PeerMessage) -> SyncResult<()>;

    fn is_open(&self) -> bool;

    fn close(&mut self);
}

/// In-process channel. Both ends share the queues, so a clone kept by the
/// host can read what the other end sent.
#[derive(Debug, Clone)]
pub struct MemoryChannel {
    outbound: Arc<Mutex<VecDeque<String>>>,
    inbound: Arc<Mutex<VecDeque<String>>>,
    open: Arc<AtomicBool>,
}

impl MemoryChannel {
    /// Two connected ends.
    pub fn pair() -> (MemoryChannel, MemoryChannel) {
        let a_to_b = Arc::new(Mutex::new(VecDeque::new()));
        let b_to_a = Arc::new(Mutex::new(VecDeque::new()));
        let open = Arc::new(AtomicBool::new(true));
        let a = MemoryChannel {
            outbound: a_to_b.clone(),
            inbound: b_to_a.clone(),
            open: open.clone(),
        };
        let b = MemoryChannel {
            outbound: b_to_a,
            inbound: a_to_b,
            open,
        };
        (a, b)
    }

    /// Drain messages sent by the other end.
    pub fn take_inbound(&self) -> Vec<String> {
        match self.inbound.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl PeerChannel for MemoryChannel {
    fn send(&mut self, message: &PeerMessage) -> SyncResult<()> {
        if !self.is_open() {
            return Err(SyncError::ChannelClosed);
        }
        let json = message.to_json()?;
        self.outbound
            .lock()
            .map_err(|e| SyncError::ChannelFailed(e.to_string()))?
            .push_back(json);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn close(&mut self) {
        self.open.store(false, Ordering::Release);
    }
}

/// Share link that makes the opener connect to `peer`.
pub fn join_url(base: &str, peer: &PeerId) -> SyncResult<String> {
    let mut url = Url::parse(base)?;
    url.set_fragment(None);
    url.query_pairs_mut()
        .clear()
        .append_pair(CONNECT_PARAM, peer.as_str());
    Ok(url.into())
}

/// Peer to connect to, if the URL carries one.
pub fn parse_join_url(url: &str) -> SyncResult<Option<PeerId>> {
    let url = Url::parse(url)?;
    Ok(url
        .query_pairs()
        .find(|(key, value)| key == CONNECT_PARAM && !value.is_empty())
        .map(|(_, value)| PeerId::new(value.into_owned())))
}
