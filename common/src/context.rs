use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{broadcast, oneshot};
use tokio::time::Instant;

/// Why a context finished.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CancelReason {
    Parent,
    Deadline,
    Cancel,
}

impl Display for CancelReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parent => write!(f, "Parent"),
            Self::Deadline => write!(f, "Deadline"),
            Self::Cancel => write!(f, "Cancel"),
        }
    }
}

struct RawContext {
    // Dropped when the last context clone goes away, which resolves the
    // handler's `recv` side.
    _sender: oneshot::Sender<()>,
    deadline: Option<Instant>,
    parent: Option<Context>,
    cancel_receiver: broadcast::Receiver<()>,
}

impl RawContext {
    #[must_use]
    fn new(parent: Option<Context>, deadline: Option<Instant>) -> (Self, Handler) {
        let (sender, recv) = oneshot::channel();
        let (cancel_sender, cancel_receiver) = broadcast::channel(1);

        (
            Self {
                _sender: sender,
                deadline,
                parent,
                cancel_receiver,
            },
            Handler { recv, cancel_sender },
        )
    }

    fn done(&self) -> Pin<Box<dyn Future<Output = CancelReason> + '_ + Send>> {
        let mut recv = self.cancel_receiver.resubscribe();

        Box::pin(async move {
            let parent = async {
                match &self.parent {
                    Some(parent) => {
                        parent.done().await;
                    }
                    None => std::future::pending().await,
                }
            };

            let deadline = async {
                match self.deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                _ = parent => CancelReason::Parent,
                _ = deadline => CancelReason::Deadline,
                _ = recv.recv() => CancelReason::Cancel,
            }
        })
    }
}

/// The controlling side of a [`Context`]. `done` resolves once every context
/// clone has been dropped; `cancel` tells all clones to stop and then waits
/// for them.
pub struct Handler {
    recv: oneshot::Receiver<()>,
    cancel_sender: broadcast::Sender<()>,
}

impl Handler {
    pub async fn done(&mut self) {
        let _ = (&mut self.recv).await;
    }

    pub async fn cancel(self) {
        drop(self.cancel_sender);

        let _ = self.recv.await;
    }
}

/// A cancellation context in the style of Go's `context.Context`: cheap to
/// clone, optionally bounded by a deadline or a parent context.
#[derive(Clone)]
pub struct Context(Arc<RawContext>);

impl Context {
    pub fn new() -> (Self, Handler) {
        let (ctx, handler) = RawContext::new(None, None);
        (Self(Arc::new(ctx)), handler)
    }

    pub fn with_deadline(deadline: Instant) -> (Self, Handler) {
        let (ctx, handler) = RawContext::new(None, Some(deadline));
        (Self(Arc::new(ctx)), handler)
    }

    pub fn with_timeout(timeout: std::time::Duration) -> (Self, Handler) {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_parent(parent: Context, deadline: Option<Instant>) -> (Self, Handler) {
        let (ctx, handler) = RawContext::new(Some(parent), deadline);
        (Self(Arc::new(ctx)), handler)
    }

    pub async fn done(&self) -> CancelReason {
        self.0.done().await
    }
}
