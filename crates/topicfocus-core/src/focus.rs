//! Focus surface: one topic's notes, completion flag, session timer and
//! autosave, owned by a single Tokio task.
//!
//! Callers talk to the task through a [`FocusHandle`]. Commands are applied
//! strictly in the order they were sent. Store writes run on the blocking
//! pool, one at a time; edits keep applying while a write is out, and a
//! save requested meanwhile is queued until it lands.
//!
//! The task sleeps on four sources at once:
//!
//! - the command channel
//! - the save in flight, if any
//! - a one-second tick `Interval`, present only while the timer runs
//! - the autosave coordinator's next deadline (debounce or status revert)
//!
//! Events go out on a bounded broadcast channel. A handle that stops
//! reading loses the oldest events rather than growing the queue.
//!
//! Dropping the handle has the same effect as [`FocusHandle::close`]: any
//! unsaved change is written once before the task exits.

use std::collections::VecDeque;
use std::future::pending;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::{self, JoinError, JoinHandle};
use tokio::time::{interval_at, sleep_until, Instant, Interval};
use tracing::{debug, info, info_span, trace, warn, Instrument};
use uuid::Uuid;

use crate::autosave::{self, AutosaveCoordinator, SaveSnapshot, SaveStatus, SaveTrigger};
use crate::error::{CoreError, StorageError, ValidationError};
use crate::events::{Event, NotificationLevel};
use crate::notes::{Block, BlockEditor, BlockId, BlockType, Key, KeyOutcome};
use crate::storage::{AutosaveConfig, Config, ProgressStore};
use crate::timer::{SessionTimer, TimerSnapshot};

const TICK: Duration = Duration::from_secs(1);
const COMMAND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 256;

/// Settings for one surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusOptions {
    pub topic_id: String,
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub autosave: AutosaveConfig,
}

impl FocusOptions {
    pub fn new(topic_id: impl Into<String>) -> Self {
        Self::from_config(topic_id, &Config::default())
    }

    pub fn from_config(topic_id: impl Into<String>, config: &Config) -> Self {
        Self {
            topic_id: topic_id.into(),
            work_minutes: config.timer.work_minutes,
            break_minutes: config.timer.break_minutes,
            autosave: config.autosave.clone(),
        }
    }
}

/// Everything a UI needs to draw the surface.
#[derive(Debug, Clone, Serialize)]
pub struct FocusView {
    pub topic_id: String,
    pub blocks: Vec<Block>,
    pub focused: Option<BlockId>,
    pub notes: String,
    pub completed: bool,
    /// Differs from the last saved state.
    pub dirty: bool,
    pub status: SaveStatus,
    pub timer: TimerSnapshot,
}

/// Outcome of closing a surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloseSummary {
    /// A final save was written.
    pub flushed: bool,
    /// The final save was attempted and failed.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum TimerOp {
    Start,
    Pause,
    Reset,
    SetDurations { work_minutes: u32, break_minutes: u32 },
}

enum Command {
    UpdateContent {
        id: BlockId,
        text: String,
        reply: oneshot::Sender<bool>,
    },
    InsertAfter {
        id: BlockId,
        block_type: BlockType,
        reply: oneshot::Sender<Result<BlockId, ValidationError>>,
    },
    DeleteBlock {
        id: BlockId,
        reply: oneshot::Sender<Option<BlockId>>,
    },
    ChangeType {
        id: BlockId,
        block_type: BlockType,
        reply: oneshot::Sender<bool>,
    },
    FocusBlock {
        id: BlockId,
        reply: oneshot::Sender<Result<(), ValidationError>>,
    },
    PressKey {
        key: Key,
        reply: oneshot::Sender<KeyOutcome>,
    },
    SetCompleted {
        completed: bool,
        reply: oneshot::Sender<bool>,
    },
    Timer {
        op: TimerOp,
        reply: oneshot::Sender<Result<TimerSnapshot, ValidationError>>,
    },
    Save {
        reply: oneshot::Sender<Result<(), CoreError>>,
    },
    View {
        reply: oneshot::Sender<FocusView>,
    },
    Close {
        reply: oneshot::Sender<CloseSummary>,
    },
}

/// A store write running on the blocking pool.
struct InFlight {
    task: JoinHandle<Result<(), CoreError>>,
    trigger: SaveTrigger,
    /// State captured when the save began.
    snapshot: SaveSnapshot,
    reply: Option<oneshot::Sender<Result<(), CoreError>>>,
}

/// Save requests that arrived while another save was in flight.
#[derive(Default)]
struct Backlog {
    study_minutes: u32,
    manual: VecDeque<oneshot::Sender<Result<(), CoreError>>>,
    debounce: bool,
}

/// State owned by the surface task.
pub struct FocusSurface<S> {
    store: Arc<S>,
    topic_id: String,
    editor: BlockEditor,
    completed: bool,
    timer: SessionTimer,
    autosave: AutosaveCoordinator,
    ticker: Option<Interval>,
    in_flight: Option<InFlight>,
    backlog: Backlog,
    events: broadcast::Sender<Event>,
}

impl<S: ProgressStore + 'static> FocusSurface<S> {
    /// Load the topic for the signed-in user and spawn the surface task.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// Fails without spawning anything if the topic id is empty, the
    /// durations are out of range, nobody is signed in, or the stored
    /// progress cannot be read.
    pub fn open(store: S, options: FocusOptions) -> Result<FocusHandle, CoreError> {
        if options.topic_id.trim().is_empty() {
            return Err(ValidationError::MissingIdentifier("topic_id").into());
        }
        let timer = SessionTimer::new(options.work_minutes, options.break_minutes)?;
        let user = store.current_user()?;
        let progress = store
            .load_progress(&user.id, &options.topic_id)?
            .unwrap_or_default();

        let (event_tx, event_rx) = broadcast::channel(EVENT_BUFFER);
        let mut surface = FocusSurface {
            store: Arc::new(store),
            topic_id: options.topic_id.clone(),
            editor: BlockEditor::from_markdown(&progress.notes),
            completed: progress.completed,
            timer,
            autosave: AutosaveCoordinator::new(options.autosave),
            ticker: None,
            in_flight: None,
            backlog: Backlog::default(),
            events: event_tx,
        };
        // Compare against the normalized form so an untouched topic never
        // looks dirty.
        let loaded = surface.snapshot();
        surface.autosave.mark_loaded(loaded);

        surface.emit(Event::SurfaceOpened {
            topic_id: options.topic_id.clone(),
            user_id: user.id.clone(),
            blocks: surface.editor.len(),
            completed: surface.completed,
            at: Utc::now(),
        });

        let span = info_span!("focus", surface = %Uuid::new_v4(), topic = %options.topic_id);
        span.in_scope(|| {
            info!(user = %user.id, blocks = surface.editor.len(), "focus surface opened")
        });

        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        tokio::spawn(surface.run(command_rx).instrument(span));

        Ok(FocusHandle {
            topic_id: options.topic_id,
            commands: command_tx,
            events: event_rx,
        })
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        loop {
            let wake = self.autosave.next_wakeup();
            tokio::select! {
                biased;

                command = commands.recv() => {
                    let Some(command) = command else {
                        debug!("handle dropped");
                        self.shut_down().await;
                        break;
                    };
                    if self.handle(command).await.is_break() {
                        break;
                    }
                }
                joined = save_finished(&mut self.in_flight) => {
                    if self.on_save_finished(joined).await.is_break() {
                        break;
                    }
                }
                _ = next_tick(&mut self.ticker) => self.on_tick(),
                _ = sleep_opt(wake) => self.on_wakeup(),
            }
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    async fn handle(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::UpdateContent { id, text, reply } => {
                let changed = self.editor.update_content(id, text);
                self.observe_if(changed);
                let _ = reply.send(changed);
            }
            Command::InsertAfter {
                id,
                block_type,
                reply,
            } => {
                let result = self.editor.insert_after(id, block_type);
                self.observe_if(result.is_ok());
                let _ = reply.send(result);
            }
            Command::DeleteBlock { id, reply } => {
                let focus = self.editor.delete(id);
                self.observe_if(focus.is_some());
                let _ = reply.send(focus);
            }
            Command::ChangeType {
                id,
                block_type,
                reply,
            } => {
                let changed = self.editor.change_type(id, block_type);
                self.observe_if(changed);
                let _ = reply.send(changed);
            }
            Command::FocusBlock { id, reply } => {
                let _ = reply.send(self.editor.focus(id));
            }
            Command::PressKey { key, reply } => {
                let outcome = self.editor.handle_key(key);
                self.observe_if(outcome != KeyOutcome::Ignored);
                let _ = reply.send(outcome);
            }
            Command::SetCompleted { completed, reply } => {
                let changed = self.completed != completed;
                self.completed = completed;
                self.observe_if(changed);
                let _ = reply.send(changed);
            }
            Command::Timer { op, reply } => {
                let result = self.apply_timer(op);
                self.sync_ticker();
                let _ = reply.send(result);
            }
            Command::Save { reply } => {
                // Answered once the write lands, from `on_save_finished`.
                self.request_save(SaveTrigger::Manual, 0, Some(reply));
            }
            Command::View { reply } => {
                let _ = reply.send(self.view());
            }
            Command::Close { reply } => {
                let summary = self.shut_down().await;
                let _ = reply.send(summary);
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn apply_timer(&mut self, op: TimerOp) -> Result<TimerSnapshot, ValidationError> {
        let event = match op {
            TimerOp::Start => self.timer.start(),
            TimerOp::Pause => self.timer.pause(),
            TimerOp::Reset => self.timer.reset(),
            TimerOp::SetDurations {
                work_minutes,
                break_minutes,
            } => {
                self.timer.set_durations(work_minutes, break_minutes)?;
                None
            }
        };
        if let Some(event) = event {
            self.emit(event);
        }
        Ok(self.timer.snapshot())
    }

    /// Final flush.
    ///
    /// Waits for the save in flight, writes any session credit still queued
    /// behind it, then writes once more if anything changed since.
    async fn shut_down(&mut self) -> CloseSummary {
        self.ticker = None;
        self.autosave.cancel_pending();
        self.backlog.debounce = false;

        // Outcomes of earlier saves were already reported.
        let _ = self.settle_in_flight().await;
        let study_minutes = std::mem::take(&mut self.backlog.study_minutes);
        if study_minutes > 0 {
            self.request_save(SaveTrigger::SessionComplete, study_minutes, None);
            let _ = self.settle_in_flight().await;
        }

        let mut summary = CloseSummary {
            flushed: false,
            error: None,
        };
        if self.autosave.is_dirty(&self.snapshot()) {
            self.request_save(SaveTrigger::Close, 0, None);
            match self.settle_in_flight().await {
                Some(Ok(())) => summary.flushed = true,
                Some(Err(e)) => summary.error = Some(e),
                None => {}
            }
        }
        self.emit(Event::Closed {
            flushed: summary.flushed,
            at: Utc::now(),
        });
        info!(flushed = summary.flushed, "focus surface closed");
        summary
    }

    // ── Clock ────────────────────────────────────────────────────────

    fn on_tick(&mut self) {
        let Some(event) = self.timer.tick() else {
            self.emit(Event::TimerTick {
                phase: self.timer.phase(),
                remaining_secs: self.timer.remaining_secs(),
            });
            return;
        };

        let finished = match &event {
            Event::WorkSessionCompleted { minutes, .. } => Some(*minutes),
            _ => None,
        };
        self.emit(event);
        self.sync_ticker();
        if let Some(minutes) = finished {
            info!(minutes, "work session completed");
            self.request_save(SaveTrigger::SessionComplete, minutes, None);
        }
    }

    fn on_wakeup(&mut self) {
        let now = Instant::now();
        if self.autosave.take_due(now) && self.autosave.is_dirty(&self.snapshot()) {
            self.request_save(SaveTrigger::Debounce, 0, None);
        }
        if self.autosave.expire_status(now) {
            self.emit_status();
        }
    }

    fn sync_ticker(&mut self) {
        match (self.timer.is_running(), self.ticker.is_some()) {
            (true, false) => self.ticker = Some(interval_at(Instant::now() + TICK, TICK)),
            (false, true) => self.ticker = None,
            _ => {}
        }
    }

    // ── Saving ───────────────────────────────────────────────────────

    fn observe_if(&mut self, changed: bool) {
        if !changed {
            return;
        }
        let current = self.snapshot();
        let observation = self.autosave.observe(&current, Instant::now());
        trace!(?observation, "change observed");
    }

    /// Start a write on the blocking pool, or queue it behind the one
    /// already running.
    fn request_save(
        &mut self,
        trigger: SaveTrigger,
        study_minutes: u32,
        reply: Option<oneshot::Sender<Result<(), CoreError>>>,
    ) {
        if self.in_flight.is_some() {
            debug!(?trigger, "save queued behind the one in flight");
            match trigger {
                SaveTrigger::SessionComplete => self.backlog.study_minutes += study_minutes,
                SaveTrigger::Manual => self.backlog.manual.extend(reply),
                SaveTrigger::Debounce => self.backlog.debounce = true,
                SaveTrigger::Close => {}
            }
            return;
        }

        let snapshot = self.snapshot();
        self.autosave.begin_save();
        self.emit_status();

        let store = Arc::clone(&self.store);
        let topic_id = self.topic_id.clone();
        let written = snapshot.clone();
        let task = task::spawn_blocking(move || {
            write(store.as_ref(), trigger, &topic_id, &written, study_minutes)
        });
        self.in_flight = Some(InFlight {
            task,
            trigger,
            snapshot,
            reply,
        });
    }

    async fn on_save_finished(
        &mut self,
        joined: Result<Result<(), CoreError>, JoinError>,
    ) -> ControlFlow<()> {
        let Some(InFlight {
            trigger,
            snapshot,
            reply,
            ..
        }) = self.in_flight.take()
        else {
            return ControlFlow::Continue(());
        };
        let result = self.settle(trigger, snapshot, joined);

        if trigger == SaveTrigger::Manual && result.is_ok() {
            // Edits that arrived during the save still get flushed.
            self.shut_down().await;
            info!("closed after manual save");
            if let Some(reply) = reply {
                let _ = reply.send(result);
            }
            return ControlFlow::Break(());
        }
        if let Some(reply) = reply {
            let _ = reply.send(result);
        }
        self.drain_backlog();
        ControlFlow::Continue(())
    }

    /// Start the next queued save, most valuable first.
    fn drain_backlog(&mut self) {
        let study_minutes = std::mem::take(&mut self.backlog.study_minutes);
        if study_minutes > 0 {
            self.request_save(SaveTrigger::SessionComplete, study_minutes, None);
        } else if let Some(reply) = self.backlog.manual.pop_front() {
            self.request_save(SaveTrigger::Manual, 0, Some(reply));
        } else if std::mem::take(&mut self.backlog.debounce)
            && self.autosave.is_dirty(&self.snapshot())
        {
            // The write captures every edit the deadline was armed for.
            self.autosave.cancel_pending();
            self.request_save(SaveTrigger::Debounce, 0, None);
        }
    }

    /// Wait for the save in flight, if any, and apply its outcome.
    async fn settle_in_flight(&mut self) -> Option<Result<(), String>> {
        let mut flight = self.in_flight.take()?;
        let joined = (&mut flight.task).await;
        let result = self.settle(flight.trigger, flight.snapshot, joined);
        let outcome = result.as_ref().map(drop).map_err(ToString::to_string);
        if let Some(reply) = flight.reply {
            let _ = reply.send(result);
        }
        Some(outcome)
    }

    fn settle(
        &mut self,
        trigger: SaveTrigger,
        snapshot: SaveSnapshot,
        joined: Result<Result<(), CoreError>, JoinError>,
    ) -> Result<(), CoreError> {
        let result = joined.unwrap_or_else(|e| {
            Err(StorageError::Unavailable(format!("save task failed: {e}")).into())
        });
        let now = Instant::now();
        self.autosave.finish_save(snapshot, result.is_ok(), now);
        match &result {
            Ok(()) => {
                debug!(?trigger, "saved");
                self.emit(Event::Saved {
                    trigger,
                    at: Utc::now(),
                });
                self.rearm(now);
            }
            Err(e) => {
                warn!(?trigger, error = %e, "save failed");
                self.emit(Event::notify(
                    NotificationLevel::Error,
                    format!("Could not save progress: {e}"),
                ));
            }
        }
        self.emit_status();
        result
    }

    /// After a successful save, schedule another only for edits the write
    /// did not include.
    fn rearm(&mut self, now: Instant) {
        let current = self.snapshot();
        if !self.autosave.is_dirty(&current) {
            self.autosave.cancel_pending();
        } else if self.autosave.pending_deadline().is_none() {
            self.autosave.observe(&current, now);
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    fn snapshot(&self) -> SaveSnapshot {
        SaveSnapshot {
            notes: self.editor.to_markdown(),
            completed: self.completed,
        }
    }

    fn view(&self) -> FocusView {
        let snapshot = self.snapshot();
        FocusView {
            topic_id: self.topic_id.clone(),
            blocks: self.editor.blocks().to_vec(),
            focused: self.editor.focused(),
            dirty: self.autosave.is_dirty(&snapshot),
            notes: snapshot.notes,
            completed: snapshot.completed,
            status: self.autosave.status(),
            timer: self.timer.snapshot(),
        }
    }

    fn emit_status(&self) {
        self.emit(Event::SaveStatusChanged {
            status: self.autosave.status(),
            at: Utc::now(),
        });
    }

    fn emit(&self, event: Event) {
        let _ = self.events.send(event);
    }
}

/// The store calls behind one save. Runs on the blocking pool.
fn write<S: ProgressStore + ?Sized>(
    store: &S,
    trigger: SaveTrigger,
    topic_id: &str,
    snapshot: &SaveSnapshot,
    study_minutes: u32,
) -> Result<(), CoreError> {
    match trigger {
        SaveTrigger::Debounce | SaveTrigger::Close => {
            autosave::write_progress(store, topic_id, snapshot, 0).map(drop)
        }
        SaveTrigger::Manual => {
            let user = autosave::write_progress(store, topic_id, snapshot, 0)?;
            autosave::refresh_stats(store, &user).map(drop)
        }
        SaveTrigger::SessionComplete => {
            let progress = autosave::write_progress(store, topic_id, snapshot, study_minutes);
            // Stats are credited even when the progress row failed.
            let user = match &progress {
                Ok(user) => user.clone(),
                Err(_) => store.current_user()?,
            };
            let stats =
                autosave::record_session(store, &user, study_minutes, Local::now().date_naive());
            progress.and(stats).map(drop)
        }
    }
}

async fn save_finished(
    in_flight: &mut Option<InFlight>,
) -> Result<Result<(), CoreError>, JoinError> {
    match in_flight {
        Some(flight) => (&mut flight.task).await,
        None => pending().await,
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => pending().await,
    }
}

async fn sleep_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => pending().await,
    }
}

/// Client side of a running focus surface.
///
/// Every method fails with [`CoreError::SurfaceClosed`] once the surface
/// task has exited.
pub struct FocusHandle {
    topic_id: String,
    commands: mpsc::Sender<Command>,
    events: broadcast::Receiver<Event>,
}

impl FocusHandle {
    pub fn topic_id(&self) -> &str {
        &self.topic_id
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, CoreError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .await
            .map_err(|_| CoreError::SurfaceClosed)?;
        rx.await.map_err(|_| CoreError::SurfaceClosed)
    }

    /// Replace a block's text. Returns whether anything changed.
    pub async fn update_content(
        &self,
        id: BlockId,
        text: impl Into<String>,
    ) -> Result<bool, CoreError> {
        let text = text.into();
        self.request(|reply| Command::UpdateContent { id, text, reply })
            .await
    }

    pub async fn insert_after(
        &self,
        id: BlockId,
        block_type: BlockType,
    ) -> Result<BlockId, CoreError> {
        Ok(self
            .request(|reply| Command::InsertAfter {
                id,
                block_type,
                reply,
            })
            .await??)
    }

    /// Remove a block. Returns the newly focused block, or `None` if the
    /// block was unknown or the last one left.
    pub async fn delete_block(&self, id: BlockId) -> Result<Option<BlockId>, CoreError> {
        self.request(|reply| Command::DeleteBlock { id, reply }).await
    }

    pub async fn change_type(&self, id: BlockId, block_type: BlockType) -> Result<bool, CoreError> {
        self.request(|reply| Command::ChangeType {
            id,
            block_type,
            reply,
        })
        .await
    }

    pub async fn focus_block(&self, id: BlockId) -> Result<(), CoreError> {
        Ok(self
            .request(|reply| Command::FocusBlock { id, reply })
            .await??)
    }

    pub async fn press_key(&self, key: Key) -> Result<KeyOutcome, CoreError> {
        self.request(|reply| Command::PressKey { key, reply }).await
    }

    pub async fn set_completed(&self, completed: bool) -> Result<bool, CoreError> {
        self.request(|reply| Command::SetCompleted { completed, reply })
            .await
    }

    async fn timer(&self, op: TimerOp) -> Result<TimerSnapshot, CoreError> {
        Ok(self.request(|reply| Command::Timer { op, reply }).await??)
    }

    pub async fn start_timer(&self) -> Result<TimerSnapshot, CoreError> {
        self.timer(TimerOp::Start).await
    }

    pub async fn pause_timer(&self) -> Result<TimerSnapshot, CoreError> {
        self.timer(TimerOp::Pause).await
    }

    pub async fn reset_timer(&self) -> Result<TimerSnapshot, CoreError> {
        self.timer(TimerOp::Reset).await
    }

    /// Change phase lengths. Refused while the timer runs.
    pub async fn set_durations(
        &self,
        work_minutes: u32,
        break_minutes: u32,
    ) -> Result<TimerSnapshot, CoreError> {
        self.timer(TimerOp::SetDurations {
            work_minutes,
            break_minutes,
        })
        .await
    }

    /// Save now and close the surface. On failure the surface stays open.
    ///
    /// Resolves once the write has landed. Edits sent while it runs are
    /// flushed before the surface closes.
    pub async fn save(&self) -> Result<(), CoreError> {
        self.request(|reply| Command::Save { reply }).await?
    }

    pub async fn view(&self) -> Result<FocusView, CoreError> {
        self.request(|reply| Command::View { reply }).await
    }

    /// Flush unsaved changes and stop the surface.
    ///
    /// Close always goes through; a failed final save is reported in the
    /// summary rather than as an error.
    pub async fn close(&self) -> Result<CloseSummary, CoreError> {
        self.request(|reply| Command::Close { reply }).await
    }

    /// Next event, waiting for one if none is queued. `None` once the
    /// surface has exited and everything it sent was read.
    pub async fn next_event(&mut self) -> Option<Event> {
        loop {
            match self.events.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "event reader lagged"),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next event if one is already queued.
    pub fn try_next_event(&mut self) -> Option<Event> {
        loop {
            match self.events.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => debug!(skipped, "event reader lagged"),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Drain every queued event.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::iter::from_fn(|| self.try_next_event()).collect()
    }
}
