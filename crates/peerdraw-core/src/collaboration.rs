//! Peer session management for live multi-user editing.
//!
//! [`PeerSession`] owns the open channels and fans local mutations out to
//! them. [`apply_remote`] is the receiving half: it writes a peer's message
//! into the local scene without touching history and without re-broadcast.
//!
//! There is no ordering across peers: each receiver keeps the last message it
//! saw, so concurrent edits of one shape can leave peers in different states.

use crate::camera::Camera;
use crate::scene::{Scene, SceneChange};
use crate::shapes::{Shape, ShapeError};
use crate::sync::{
    ConnectionRole, CursorPosition, PeerChannel, PeerId, PeerMessage, ShapeAdd, SyncSnapshot,
};
use kurbo::Point;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Shown once when the last connection is lost.
pub const SOLO_NOTICE: &str = "Connection lost, working solo";

struct Connection {
    peer: PeerId,
    role: ConnectionRole,
    channel: Box<dyn PeerChannel>,
}

/// Local identity plus the live connections.
pub struct PeerSession {
    local_id: PeerId,
    connections: Vec<Connection>,
    notices: Vec<String>,
    solo_notified: bool,
    /// Peer to dial once the deadline passes.
    auto_connect: Option<(PeerId, Instant)>,
}

impl std::fmt::Debug for PeerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerSession")
            .field("local_id", &self.local_id)
            .field("peers", &self.peers())
            .field("auto_connect", &self.auto_connect)
            .finish()
    }
}

impl Default for PeerSession {
    fn default() -> Self {
        Self::new(PeerId::generate())
    }
}

impl PeerSession {
    pub fn new(local_id: PeerId) -> Self {
        Self {
            local_id,
            connections: Vec::new(),
            notices: Vec::new(),
            solo_notified: false,
            auto_connect: None,
        }
    }

    pub fn local_id(&self) -> &PeerId {
        &self.local_id
    }

    pub fn peers(&self) -> Vec<&PeerId> {
        self.connections.iter().map(|c| &c.peer).collect()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_connected(&self) -> bool {
        !self.connections.is_empty()
    }

    pub fn role_of(&self, peer: &PeerId) -> Option<ConnectionRole> {
        self.connections.iter().find(|c| &c.peer == peer).map(|c| c.role)
    }

    /// Arrange an outbound connect to `target` after `delay`.
    pub fn schedule_auto_connect(&mut self, target: PeerId, now: Instant, delay: Duration) {
        if target == self.local_id {
            log::warn!("Ignoring join link to ourselves");
            return;
        }
        log::info!("Will connect to {} in {:?}", target, delay);
        self.auto_connect = Some((target, now + delay));
    }

    /// The peer to dial, once its scheduled time has come. Fires once.
    pub fn poll_auto_connect(&mut self, now: Instant) -> Option<PeerId> {
        match &self.auto_connect {
            Some((_, due)) if now >= *due => self.auto_connect.take().map(|(peer, _)| peer),
            _ => None,
        }
    }

    /// Register an open channel. On inbound connections the snapshot is
    /// sent right away.
    pub fn connection_opened(
        &mut self,
        peer: PeerId,
        mut channel: Box<dyn PeerChannel>,
        role: ConnectionRole,
        snapshot: &SyncSnapshot,
    ) {
        log::info!("Connection to {} open ({:?})", peer, role);
        if let Some(pos) = self.connections.iter().position(|c| c.peer == peer) {
            let mut old = self.connections.remove(pos);
            old.channel.close();
        }
        if role == ConnectionRole::Inbound {
            let message = PeerMessage::Sync(snapshot.clone());
            if let Err(err) = channel.send(&message) {
                log::warn!("Failed to send snapshot to {}: {}", peer, err);
                channel.close();
                self.enter_solo_if_alone();
                return;
            }
        }
        self.connections.push(Connection {
            peer,
            role,
            channel,
        });
        self.solo_notified = false;
    }

    /// The transport reported the channel closed. Returns whether it was known.
    pub fn connection_closed(&mut self, peer: &PeerId) -> bool {
        let Some(pos) = self.connections.iter().position(|c| &c.peer == peer) else {
            return false;
        };
        log::info!("Connection to {} closed", peer);
        self.connections.remove(pos);
        self.enter_solo_if_alone();
        true
    }

    /// The transport reported an error, for a known peer or for a connect
    /// attempt that never opened.
    pub fn connection_failed(&mut self, peer: Option<&PeerId>, reason: &str) {
        match peer {
            Some(peer) => log::warn!("Connection to {} failed: {}", peer, reason),
            None => log::warn!("Peer connection failed: {}", reason),
        }
        if let Some(pos) = peer.and_then(|p| self.connections.iter().position(|c| &c.peer == p)) {
            let mut conn = self.connections.remove(pos);
            conn.channel.close();
        }
        self.enter_solo_if_alone();
    }

    /// Send local scene changes to every peer. Connections whose send fails
    /// are dropped; their ids are returned.
    pub fn broadcast(&mut self, changes: &[SceneChange]) -> Vec<PeerId> {
        let mut dropped = Vec::new();
        for change in changes {
            dropped.extend(self.broadcast_message(&PeerMessage::from(change.clone())));
        }
        dropped
    }

    /// Send one message to every peer.
    pub fn broadcast_message(&mut self, message: &PeerMessage) -> Vec<PeerId> {
        let mut dropped = Vec::new();
        self.connections.retain_mut(|conn| match conn.channel.send(message) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Dropping {} after failed {}: {}", conn.peer, message.kind(), err);
                conn.channel.close();
                dropped.push(conn.peer.clone());
                false
            }
        });
        if !dropped.is_empty() {
            self.enter_solo_if_alone();
        }
        dropped
    }

    /// Share our pointer position (world coordinates).
    pub fn send_cursor(&mut self, position: Point) -> Vec<PeerId> {
        if self.connections.is_empty() {
            return Vec::new();
        }
        let message = PeerMessage::Cursor(CursorPosition {
            peer_id: self.local_id.clone(),
            x: position.x,
            y: position.y,
        });
        self.broadcast_message(&message)
    }

    /// Close every channel.
    pub fn disconnect_all(&mut self) {
        for conn in &mut self.connections {
            conn.channel.close();
        }
        self.connections.clear();
    }

    /// Pending user-facing notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    fn enter_solo_if_alone(&mut self) {
        if self.connections.is_empty() && !self.solo_notified {
            self.solo_notified = true;
            self.notices.push(SOLO_NOTICE.to_string());
        }
    }
}

/// What a remote message did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteEffect {
    /// Shapes changed.
    Applied,
    /// A snapshot replaced the scene and the camera.
    Adopted,
    /// Only an overlay changed.
    Cursor,
    /// Nothing changed.
    Ignored,
}

/// Apply a peer's message to the local scene. Never fails: anything that
/// cannot be applied is logged and dropped.
pub fn apply_remote(scene: &mut Scene, camera: &mut Camera, message: PeerMessage) -> RemoteEffect {
    match message {
        PeerMessage::Sync(snapshot) => adopt_snapshot(scene, camera, snapshot),
        PeerMessage::ShapeAdd(add) => apply_add(scene, add),
        PeerMessage::ShapeUpdate(update) => match scene.apply_patch(update.id, &update.patch) {
            Ok(()) => RemoteEffect::Applied,
            Err(ShapeError::NotFound(id)) => {
                log::debug!("Dropping update for unknown shape {}", id);
                RemoteEffect::Ignored
            }
            Err(err) => {
                log::warn!("Dropping invalid update for {}: {}", update.id, err);
                RemoteEffect::Ignored
            }
        },
        PeerMessage::ShapeRemove(remove) => match scene.remove(remove.id) {
            Some(_) => RemoteEffect::Applied,
            None => RemoteEffect::Ignored,
        },
        PeerMessage::Cursor(cursor) => {
            scene.set_remote_cursor(cursor.peer_id.as_str(), Some(Point::new(cursor.x, cursor.y)));
            RemoteEffect::Cursor
        }
    }
}

/// A peer that already has shapes keeps them and ignores the snapshot.
fn adopt_snapshot(scene: &mut Scene, camera: &mut Camera, snapshot: SyncSnapshot) -> RemoteEffect {
    if !scene.is_empty() {
        log::info!(
            "Ignoring snapshot of {} shapes, local scene has {}",
            snapshot.shapes.len(),
            scene.len()
        );
        return RemoteEffect::Ignored;
    }
    let shapes: Vec<Shape> = snapshot
        .shapes
        .into_iter()
        .filter_map(|record| {
            let id = record.id;
            Shape::from_record(record)
                .map_err(|err| log::warn!("Skipping snapshot shape {}: {}", id, err))
                .ok()
        })
        .collect();
    log::info!("Adopting snapshot of {} shapes", shapes.len());
    camera.set_view(snapshot.zoom, snapshot.pan.into());
    scene.replace_all(shapes);
    RemoteEffect::Adopted
}

fn apply_add(scene: &mut Scene, add: ShapeAdd) -> RemoteEffect {
    let shape = match Shape::from_record(add.shape) {
        Ok(shape) => shape,
        Err(err) => {
            log::warn!("Dropping invalid shape-add: {}", err);
            return RemoteEffect::Ignored;
        }
    };
    let id = shape.id();
    if scene.contains(id) {
        scene.update(shape);
        if let Some(index) = add.z_index {
            scene.move_to(id, index);
        }
    } else {
        match add.z_index {
            Some(index) => {
                scene.insert(index, shape);
            }
            None => {
                scene.add(shape);
            }
        }
    }
    RemoteEffect::Applied
}
