//! Session registry: the single owner of watch sessions and channels
//!
//! Each subscriber has one ordered, unbounded event channel for the life of
//! its connection, and at most one watch session feeding it. Replacing the
//! watched set closes the previous session before the next one opens.
//! Synthesized events travel through the same channels, so a subscriber
//! sees native and synthesized events in a single stream.

use crate::event::{SubscriberId, WatchEvent};
use crate::session::WatchSession;
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// Receiving half of a subscriber's event channel
pub type EventStream = UnboundedReceiver<WatchEvent>;

struct Subscriber {
    sink: UnboundedSender<WatchEvent>,
    session: Option<WatchSession>,
}

impl Subscriber {
    fn close_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
        }
    }
}

/// Registry of subscribers and their watch sessions
///
/// Cheap to clone; clones share the same subscribers.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    subscribers: Arc<DashMap<SubscriberId, Subscriber>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` and return its event stream
    ///
    /// Reconnecting replaces the previous stream and closes any active
    /// session; the subscriber has to watch again.
    pub fn connect(&self, id: SubscriberId) -> EventStream {
        let (sink, stream) = unbounded_channel();
        let previous = self.subscribers.insert(
            id,
            Subscriber {
                sink,
                session: None,
            },
        );
        if let Some(mut previous) = previous {
            debug!("{}: reconnected, dropping previous stream", id);
            previous.close_session();
        }
        stream
    }

    /// Replace the watched directory set of `id`
    pub fn watch<I>(&self, id: SubscriberId, directories: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut subscriber = self.subscribers.entry(id).or_insert_with(|| {
            warn!("{} watched without connecting; events are discarded", id);
            let (sink, _) = unbounded_channel();
            Subscriber {
                sink,
                session: None,
            }
        });

        // Old watcher must be gone before the new one can deliver
        subscriber.close_session();
        let session = WatchSession::open(id, directories, subscriber.sink.clone());
        subscriber.session = Some(session);
    }

    /// Stop watching for `id`, keeping its stream open
    pub fn unwatch(&self, id: SubscriberId) {
        if let Some(mut subscriber) = self.subscribers.get_mut(&id) {
            subscriber.close_session();
        }
    }

    /// Stop watching for `id` and close its stream
    pub fn disconnect(&self, id: SubscriberId) {
        if let Some((_, mut subscriber)) = self.subscribers.remove(&id) {
            subscriber.close_session();
            debug!("{}: disconnected", id);
        }
    }

    pub fn is_connected(&self, id: SubscriberId) -> bool {
        self.subscribers.contains_key(&id)
    }

    /// Directories currently watched for `id`, sorted
    pub fn watched(&self, id: SubscriberId) -> Vec<PathBuf> {
        let mut directories: Vec<PathBuf> = self
            .subscribers
            .get(&id)
            .and_then(|subscriber| {
                subscriber
                    .session
                    .as_ref()
                    .map(|session| session.directories().map(PathBuf::from).collect())
            })
            .unwrap_or_default();
        directories.sort();
        directories
    }

    /// Deliver events describing a change this process made itself
    ///
    /// Each event goes to every subscriber watching its directory. Inside
    /// a Tokio runtime delivery is deferred by one scheduling tick, so the
    /// caller observes its operation's result before the events.
    pub fn synthesize(&self, events: Vec<WatchEvent>) {
        if events.is_empty() {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let registry = self.clone();
                handle.spawn(async move {
                    tokio::task::yield_now().await;
                    registry.deliver(&events);
                });
            }
            Err(_) => self.deliver(&events),
        }
    }

    fn deliver(&self, events: &[WatchEvent]) {
        for subscriber in self.subscribers.iter() {
            let Some(session) = subscriber.session.as_ref() else {
                continue;
            };
            for event in events {
                if session.is_watching(&event.directory_path) {
                    let _ = subscriber.sink.send(event.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::time::timeout;

    fn dirs() -> (TempDir, PathBuf, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        let a = base.join("a");
        let b = base.join("b");
        std::fs::create_dir(&a).unwrap();
        std::fs::create_dir(&b).unwrap();
        (temp_dir, a, b)
    }

    #[test]
    fn test_synthesize_outside_runtime_is_immediate() {
        let (_guard, a, b) = dirs();
        let registry = SessionRegistry::new();
        let mut stream = registry.connect(SubscriberId(1));
        registry.watch(SubscriberId(1), vec![a.clone()]);

        registry.synthesize(vec![
            WatchEvent::deleted(a.join("x.txt")),
            WatchEvent::deleted(b.join("y.txt")),
        ]);

        let event = stream.try_recv().unwrap();
        assert_eq!(event.kind, EventKind::Delete);
        assert_eq!(event.file_path, a.join("x.txt"));
        assert!(stream.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_synthesize_is_deferred_and_targeted() {
        let (_guard, a, b) = dirs();
        let registry = SessionRegistry::new();
        let mut first = registry.connect(SubscriberId(1));
        let mut second = registry.connect(SubscriberId(2));
        registry.watch(SubscriberId(1), vec![a.clone()]);
        registry.watch(SubscriberId(2), vec![b.clone()]);

        registry.synthesize(vec![WatchEvent::created(b.join("new.txt"))]);

        // Nothing delivered before the caller yields
        assert!(second.try_recv().is_err());

        let event = timeout(Duration::from_secs(1), second.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event, WatchEvent::created(b.join("new.txt")));
        assert!(first.try_recv().is_err());
    }

    #[test]
    fn test_watch_replaces_directory_set() {
        let (_guard, a, b) = dirs();
        let registry = SessionRegistry::new();
        let _stream = registry.connect(SubscriberId(1));

        registry.watch(SubscriberId(1), vec![a.clone()]);
        assert_eq!(registry.watched(SubscriberId(1)), vec![a.clone()]);

        registry.watch(SubscriberId(1), vec![b.clone(), a.clone()]);
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(registry.watched(SubscriberId(1)), expected);
    }

    #[test]
    fn test_unwatch_keeps_stream_open() {
        let (_guard, a, _b) = dirs();
        let registry = SessionRegistry::new();
        let mut stream = registry.connect(SubscriberId(1));
        registry.watch(SubscriberId(1), vec![a.clone()]);

        registry.unwatch(SubscriberId(1));
        assert!(registry.watched(SubscriberId(1)).is_empty());
        assert!(registry.is_connected(SubscriberId(1)));

        registry.synthesize(vec![WatchEvent::deleted(a.join("x.txt"))]);
        assert!(stream.try_recv().is_err());

        // Watching again resumes delivery on the same stream
        registry.watch(SubscriberId(1), vec![a.clone()]);
        registry.synthesize(vec![WatchEvent::deleted(a.join("x.txt"))]);
        assert!(stream.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_disconnect_closes_stream() {
        let (_guard, a, _b) = dirs();
        let registry = SessionRegistry::new();
        let mut stream = registry.connect(SubscriberId(1));
        registry.watch(SubscriberId(1), vec![a]);

        registry.disconnect(SubscriberId(1));
        assert!(!registry.is_connected(SubscriberId(1)));

        // The native watcher thread may hold its sender briefly after close
        let closed = timeout(Duration::from_secs(5), async {
            while stream.recv().await.is_some() {}
        })
        .await;
        assert!(closed.is_ok());
    }

    #[test]
    fn test_watch_without_connect_discards_events() {
        let (_guard, a, _b) = dirs();
        let registry = SessionRegistry::new();

        registry.watch(SubscriberId(9), vec![a.clone()]);
        assert_eq!(registry.watched(SubscriberId(9)), vec![a.clone()]);

        registry.synthesize(vec![WatchEvent::deleted(a.join("x.txt"))]);
    }

    #[tokio::test]
    async fn test_native_events_flow_through_registry() {
        let (_guard, a, _b) = dirs();
        let registry = SessionRegistry::new();
        let mut stream = registry.connect(SubscriberId(1));
        registry.watch(SubscriberId(1), vec![a.clone()]);

        let file = a.join("made.txt");
        std::fs::write(&file, b"x").unwrap();

        let seen = timeout(Duration::from_secs(5), async {
            while let Some(event) = stream.recv().await {
                if event.file_path == file {
                    return true;
                }
            }
            false
        })
        .await
        .unwrap_or(false);
        assert!(seen);
    }
}
