/**
 * Real-time Event Hub
 *
 * Routes server-originated events to the right set of sockets without the
 * domain services knowing which sockets are connected.
 *
 * # Rooms
 *
 * - `Room::User(id)` - every socket of one user (one per open session)
 * - `Room::Chat(id)` - sockets currently viewing one conversation
 *
 * # Delivery
 *
 * Each connected socket owns an unbounded mpsc receiver; publishing clones
 * the event into every sender registered in the room. Delivery is
 * best-effort and at-most-once: a socket that is not connected at publish
 * time never sees the event, and a closed receiver is pruned on the next
 * publish. Nothing is persisted or shared across processes.
 */

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::shared::ServerEvent;

/// Identifier of one connected socket, unique within the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SocketId(u64);

impl std::fmt::Display for SocketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "socket-{}", self.0)
    }
}

/// Publish/subscribe room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Room {
    User(Uuid),
    Chat(Uuid),
}

#[derive(Default)]
struct HubInner {
    sockets: HashMap<SocketId, mpsc::UnboundedSender<ServerEvent>>,
    rooms: HashMap<Room, HashSet<SocketId>>,
    memberships: HashMap<SocketId, HashSet<Room>>,
}

impl HubInner {
    fn remove_socket(&mut self, socket: SocketId) {
        self.sockets.remove(&socket);
        if let Some(rooms) = self.memberships.remove(&socket) {
            for room in rooms {
                self.remove_from_room(room, socket);
            }
        }
    }

    fn remove_from_room(&mut self, room: Room, socket: SocketId) {
        if let Some(members) = self.rooms.get_mut(&room) {
            members.remove(&socket);
            if members.is_empty() {
                self.rooms.remove(&room);
            }
        }
    }
}

/// Per-process registry of sockets and rooms
///
/// Cloning is cheap; all clones share the same registry.
#[derive(Clone, Default)]
pub struct EventHub {
    inner: Arc<RwLock<HubInner>>,
    next_id: Arc<AtomicU64>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new socket and return the receiving end of its event queue
    pub async fn connect(&self) -> (SocketId, mpsc::UnboundedReceiver<ServerEvent>) {
        let id = SocketId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.write().await.sockets.insert(id, tx);
        tracing::debug!("[Hub] {} connected", id);
        (id, rx)
    }

    /// Forget a socket and all of its room memberships
    pub async fn disconnect(&self, socket: SocketId) {
        self.inner.write().await.remove_socket(socket);
        tracing::debug!("[Hub] {} disconnected", socket);
    }

    /// Add a socket to a room; returns false for unknown sockets
    pub async fn join(&self, socket: SocketId, room: Room) -> bool {
        let mut inner = self.inner.write().await;
        if !inner.sockets.contains_key(&socket) {
            return false;
        }
        inner.rooms.entry(room).or_default().insert(socket);
        inner.memberships.entry(socket).or_default().insert(room);
        tracing::debug!("[Hub] {} joined {:?}", socket, room);
        true
    }

    pub async fn leave(&self, socket: SocketId, room: Room) {
        let mut inner = self.inner.write().await;
        inner.remove_from_room(room, socket);
        if let Some(rooms) = inner.memberships.get_mut(&socket) {
            rooms.remove(&room);
        }
        tracing::debug!("[Hub] {} left {:?}", socket, room);
    }

    /// Join the room of `user_id`
    pub async fn register_user(&self, socket: SocketId, user_id: Uuid) -> bool {
        self.join(socket, Room::User(user_id)).await
    }

    pub async fn join_chat(&self, socket: SocketId, chat_id: Uuid) -> bool {
        self.join(socket, Room::Chat(chat_id)).await
    }

    pub async fn leave_chat(&self, socket: SocketId, chat_id: Uuid) {
        self.leave(socket, Room::Chat(chat_id)).await
    }

    /// Deliver `event` to a single socket; returns false if it is gone
    pub async fn send_to(&self, socket: SocketId, event: ServerEvent) -> bool {
        let inner = self.inner.read().await;
        inner
            .sockets
            .get(&socket)
            .is_some_and(|tx| tx.send(event).is_ok())
    }

    /// Deliver `event` to every socket in `room`
    ///
    /// Returns the number of sockets the event was queued for.
    pub async fn publish(&self, room: Room, event: ServerEvent) -> usize {
        self.publish_except(room, event, None).await
    }

    /// Deliver `event` to every socket in `room` other than `except`
    pub async fn publish_except(
        &self,
        room: Room,
        event: ServerEvent,
        except: Option<SocketId>,
    ) -> usize {
        let mut closed = Vec::new();
        let mut delivered = 0;
        {
            let inner = self.inner.read().await;
            let Some(members) = inner.rooms.get(&room) else {
                tracing::debug!("[Hub] No subscribers in {:?} for {}", room, event.name());
                return 0;
            };
            for socket in members {
                if Some(*socket) == except {
                    continue;
                }
                match inner.sockets.get(socket) {
                    Some(tx) if tx.send(event.clone()).is_ok() => delivered += 1,
                    _ => closed.push(*socket),
                }
            }
        }

        if !closed.is_empty() {
            tracing::debug!("[Hub] Pruning {} closed sockets", closed.len());
            let mut inner = self.inner.write().await;
            for socket in closed {
                inner.remove_socket(socket);
            }
        }

        tracing::debug!("[Hub] {} delivered to {} sockets in {:?}", event.name(), delivered, room);
        delivered
    }

    pub async fn is_member(&self, socket: SocketId, room: Room) -> bool {
        self.inner
            .read()
            .await
            .rooms
            .get(&room)
            .is_some_and(|members| members.contains(&socket))
    }

    /// Number of sockets currently in `room`
    pub async fn room_size(&self, room: Room) -> usize {
        self.inner
            .read()
            .await
            .rooms
            .get(&room)
            .map(HashSet::len)
            .unwrap_or(0)
    }

    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.sockets.len()
    }
}
