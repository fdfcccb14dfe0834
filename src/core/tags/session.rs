use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::core::tags::{Completion, Notifier, Request, TagManager, TagService};

/// Runs a [`TagManager`] on tokio.
///
/// Each request becomes its own task; completions are queued and applied to
/// the manager only when the owner calls [`TagSession::next_completion`] or
/// [`TagSession::settle`], so the manager keeps a single writer.
pub struct TagSession<S, N> {
    manager: TagManager,
    service: Arc<S>,
    notifier: N,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl<S, N> TagSession<S, N>
where
    S: TagService + Send + Sync + 'static,
    N: Notifier,
{
    /// Opens a session for `project_id` and starts loading its tags.
    /// Must be called from within a tokio runtime.
    pub fn open(project_id: i64, service: Arc<S>, notifier: N) -> Self {
        let (manager, initial) = TagManager::new(project_id);
        let (tx, rx) = mpsc::unbounded_channel();
        let mut session = Self {
            manager,
            service,
            notifier,
            tx,
            rx,
            in_flight: 0,
        };
        session.dispatch(initial);
        session
    }

    pub fn manager(&self) -> &TagManager {
        &self.manager
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Applies a user event and dispatches the request it produced, if any.
    pub fn update<F>(&mut self, event: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce(&mut TagManager) -> Option<Request>,
    {
        let request = event(&mut self.manager)?;
        Some(self.dispatch(request))
    }

    /// Spawns `request`. Its completion is queued for the next
    /// [`next_completion`](Self::next_completion).
    pub fn dispatch(&mut self, request: Request) -> JoinHandle<()> {
        match request.kind() {
            Some(kind) => tracing::info!(%kind, ?request, "dispatching tag mutation"),
            None => tracing::debug!(?request, "dispatching tag list"),
        }
        let pending = request.execute(&*self.service);
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let completion = pending.await;
            // The receiver lives as long as the session.
            let _ = tx.send(completion);
        })
    }

    /// Waits for one completion and applies it. Returns `false` when nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        let Some(completion) = self.rx.recv().await else {
            return false;
        };
        self.in_flight -= 1;
        self.handle(completion);
        true
    }

    /// Applies completions until no request is in flight, including follow-up re-fetches.
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    fn handle(&mut self, completion: Completion) {
        if let Some(err) = completion.mutation_error() {
            tracing::warn!("{err}");
            self.notifier.notify_error(&err.to_string());
        }
        if let Some(follow_up) = self.manager.apply(completion, &self.notifier) {
            self.dispatch(follow_up);
        }
    }
}
