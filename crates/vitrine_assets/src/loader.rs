use std::path::PathBuf;

use bevy_ecs::resource::Resource;
use thiserror::Error;
use tokio::runtime::Handle as TokioHandle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::assets::Handle;
use crate::texture::{TextureData, decode_bitmap};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    /// Surface bitmap (monitor screen, poster, hot-spot icons).
    Texture,
    /// Pre-rendered text bitmap for the label quads.
    LabelBitmap,
}

/// One external resource the tableau needs. `source` is carried as an
/// opaque string-ish path; the manifest is deployment configuration,
/// not code.
#[derive(Clone, Debug)]
pub struct ResourceDescriptor {
    pub key: String,
    pub source: PathBuf,
    pub kind: ResourceKind,
}

impl ResourceDescriptor {
    pub fn new(key: &str, source: impl Into<PathBuf>, kind: ResourceKind) -> Self {
        Self {
            key: key.to_owned(),
            source: source.into(),
            kind,
        }
    }
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("worker dropped before completing")]
    WorkerLost,
}

// Internal message (heavy - used only inside the plugin)
pub enum ResourceWorkerMessage {
    TextureLoaded {
        id: uuid::Uuid,
        key: String,
        data: TextureData,
    },
    LoadFailed {
        id: uuid::Uuid,
        key: String,
        error: ResourceError,
    },
}

/// Spawns fetches on the IO runtime and keeps the join handles so the
/// whole batch can be cancelled when the scene is torn down. Results
/// come back over the channel; nothing here ever blocks the frame.
#[derive(Resource)]
pub struct ResourceLoader {
    sender: UnboundedSender<ResourceWorkerMessage>,
    io_handle: TokioHandle,
    in_flight: Vec<JoinHandle<()>>,
}

impl ResourceLoader {
    pub fn new(sender: UnboundedSender<ResourceWorkerMessage>, io_handle: TokioHandle) -> Self {
        Self {
            sender,
            io_handle,
            in_flight: Vec::new(),
        }
    }

    /// Begins fetching one bitmap resource. Returns immediately with
    /// the handle the scene builder wires into materials; the decoded
    /// data arrives via the flush system some frames later.
    pub fn fetch_bitmap(&mut self, descriptor: &ResourceDescriptor) -> Handle<TextureData> {
        let handle = Handle::<TextureData>::new();
        let id = handle.id;
        let key = descriptor.key.clone();
        let source = descriptor.source.clone();
        let sender = self.sender.clone();

        let task = self.io_handle.spawn(async move {
            log::debug!("[ResourceLoader] fetching `{key}` from {source:?}");

            let result = async {
                let bytes = tokio::fs::read(&source).await?;
                // Image decode is CPU-heavy; push it off the IO workers.
                let name = key.clone();
                tokio::task::spawn_blocking(move || decode_bitmap(&name, &bytes))
                    .await
                    .map_err(|_| ResourceError::WorkerLost)?
            }
            .await;

            // If the receiver is gone the scene was torn down; drop the
            // result on the floor rather than writing into a dead world.
            let _ = match result {
                Ok(data) => sender.send(ResourceWorkerMessage::TextureLoaded { id, key, data }),
                Err(error) => sender.send(ResourceWorkerMessage::LoadFailed { id, key, error }),
            };
        });
        self.in_flight.push(task);

        handle
    }

    /// Aborts everything still in flight. Called from the shutdown
    /// schedule; completed tasks are unaffected.
    pub fn cancel_pending(&mut self) {
        let mut aborted = 0usize;
        for task in self.in_flight.drain(..) {
            if !task.is_finished() {
                task.abort();
                aborted += 1;
            }
        }
        if aborted > 0 {
            log::info!("[ResourceLoader] cancelled {aborted} in-flight fetches");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test]
    async fn missing_file_reports_failure_not_panic() {
        let (tx, mut rx) = unbounded_channel();
        let mut loader = ResourceLoader::new(tx, TokioHandle::current());

        let descriptor = ResourceDescriptor::new(
            "ghost",
            "/definitely/not/here.png",
            ResourceKind::Texture,
        );
        let handle = loader.fetch_bitmap(&descriptor);

        match rx.recv().await {
            Some(ResourceWorkerMessage::LoadFailed { id, key, .. }) => {
                assert_eq!(id, handle.id);
                assert_eq!(key, "ghost");
            }
            other => panic!(
                "expected LoadFailed, got {:?}",
                other.map(|_| "another message")
            ),
        }
    }

    #[tokio::test]
    async fn cancel_pending_clears_the_batch() {
        let (tx, _rx) = unbounded_channel();
        let mut loader = ResourceLoader::new(tx, TokioHandle::current());
        loader.fetch_bitmap(&ResourceDescriptor::new(
            "a",
            "/nope/a.png",
            ResourceKind::Texture,
        ));
        loader.fetch_bitmap(&ResourceDescriptor::new(
            "b",
            "/nope/b.png",
            ResourceKind::LabelBitmap,
        ));
        loader.cancel_pending();
        assert!(loader.in_flight.is_empty());
    }
}
