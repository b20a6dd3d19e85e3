//! Callback-style facade for UI code
//!
//! UI toolkits usually want "fire this call, hand me the result on my
//! thread". [`CallbackClient`] runs each operation on a tokio runtime and
//! hands the completion to a [`ResultDispatcher`], which decides where it
//! executes: inline on the runtime worker ([`InlineDispatcher`]) or on a
//! queue drained by the UI thread ([`QueueDispatcher`] / [`MainQueue`]).
//!
//! Each completion is dispatched exactly once.

use std::sync::Arc;

use dfcontacts_domain::{CallFailure, CallResult, LogicalCall};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::client::RestClient;

/// A completion ready to run on the caller's execution context
pub type Completion = Box<dyn FnOnce() + Send + 'static>;

/// Decides where completions execute
pub trait ResultDispatcher: Send + Sync {
    fn dispatch(&self, completion: Completion);
}

/// Runs completions immediately on whichever task produced them
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineDispatcher;

impl ResultDispatcher for InlineDispatcher {
    fn dispatch(&self, completion: Completion) {
        completion();
    }
}

/// Sends completions to a [`MainQueue`]
#[derive(Debug, Clone)]
pub struct QueueDispatcher {
    tx: mpsc::UnboundedSender<Completion>,
}

impl ResultDispatcher for QueueDispatcher {
    fn dispatch(&self, completion: Completion) {
        if self.tx.send(completion).is_err() {
            debug!("Main queue closed; dropping completion");
        }
    }
}

/// Receiving end owned by the UI thread
#[derive(Debug)]
pub struct MainQueue {
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl MainQueue {
    /// Create a connected dispatcher/queue pair
    pub fn new() -> (QueueDispatcher, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (QueueDispatcher { tx }, Self { rx })
    }

    /// Run every completion already queued, without waiting. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(completion) = self.rx.try_recv() {
            completion();
            ran += 1;
        }
        ran
    }

    /// Wait for the next completion and run it
    ///
    /// Returns `false` once every dispatcher has been dropped.
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(completion) => {
                completion();
                true
            }
            None => false,
        }
    }

    /// Blocking variant of [`run_next`](Self::run_next) for a thread outside the runtime
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    pub fn blocking_run_next(&mut self) -> bool {
        match self.rx.blocking_recv() {
            Some(completion) => {
                completion();
                true
            }
            None => false,
        }
    }
}

/// Callback-delivering wrapper around a shared [`RestClient`]
#[derive(Clone)]
pub struct CallbackClient {
    client: Arc<RestClient>,
    runtime: Handle,
    dispatcher: Arc<dyn ResultDispatcher>,
}

impl CallbackClient {
    pub fn new(client: Arc<RestClient>, runtime: Handle, dispatcher: Arc<dyn ResultDispatcher>) -> Self {
        Self { client, runtime, dispatcher }
    }

    pub fn client(&self) -> &Arc<RestClient> {
        &self.client
    }

    pub fn is_signed_in(&self) -> bool {
        self.client.is_signed_in()
    }

    pub fn call<F>(&self, call: LogicalCall, on_result: F) -> JoinHandle<()>
    where
        F: FnOnce(CallResult) + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        self.deliver(async move { client.call(&call).await }, on_result)
    }

    pub fn call_chain<F>(&self, calls: Vec<LogicalCall>, on_result: F) -> JoinHandle<()>
    where
        F: FnOnce(CallResult) + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        self.deliver(async move { client.call_chain(&calls).await }, on_result)
    }

    pub fn sign_in_with_email<F>(&self, email: String, password: String, on_result: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<(), CallFailure>) + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        self.deliver(async move { client.sign_in_with_email(&email, &password).await }, on_result)
    }

    pub fn register_with_email<F>(&self, email: String, password: String, on_result: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<(), CallFailure>) + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        self.deliver(async move { client.register_with_email(&email, &password).await }, on_result)
    }

    /// Clear the session now; `on_signed_out` is dispatched like any result
    pub fn sign_out<F>(&self, on_signed_out: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.client.sign_out();
        self.dispatcher.dispatch(Box::new(on_signed_out));
    }

    /// Forward activity-count changes to `listener` through the dispatcher
    ///
    /// The listener sees the latest count after each change; bursts may be
    /// coalesced. The watch ends when the client is dropped or the returned
    /// handle is aborted.
    pub fn watch_activity<F>(&self, listener: F) -> JoinHandle<()>
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        let mut rx = self.client.activity().subscribe();
        let dispatcher = Arc::clone(&self.dispatcher);
        let listener = Arc::new(listener);
        self.runtime.spawn(async move {
            while rx.changed().await.is_ok() {
                let count = *rx.borrow_and_update();
                trace!(active = count, "Activity changed");
                let listener = Arc::clone(&listener);
                dispatcher.dispatch(Box::new(move || listener(count)));
            }
        })
    }

    fn deliver<Fut, T, F>(&self, operation: Fut, on_result: F) -> JoinHandle<()>
    where
        Fut: std::future::Future<Output = T> + Send + 'static,
        T: Send + 'static,
        F: FnOnce(T) + Send + 'static,
    {
        let dispatcher = Arc::clone(&self.dispatcher);
        self.runtime.spawn(async move {
            let result = operation.await;
            dispatcher.dispatch(Box::new(move || on_result(result)));
        })
    }
}
