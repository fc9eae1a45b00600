//! Update scheduler - batches slot invalidations into ordered flush cycles.
//!
//! Invalidating a slot marks its component dirty and queues it. The first
//! queued component of a turn schedules one flush on the microtask queue, so
//! every synchronous change made in the same turn lands in a single flush.
//!
//! # States
//!
//! ```text
//! Idle ──enqueue──► Scheduled ──tick──► Flushing(Components → Bindings → RenderCallbacks → Teardown) ──► Idle
//! ```
//!
//! A `flush` that starts while components are being updated returns at once;
//! the running loop picks the new work up because it re-reads the queue
//! length on every iteration.
//!
//! # Queues
//!
//! - dirty components: updated in queue order (parents before children)
//! - binding callbacks: drained last-in first-out (children before parents)
//! - render callbacks: each runs at most once per flush generation
//! - flush callbacks: drained once the whole cycle settled

mod flush;

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use tracing::trace;

use crate::component::{Cleanup, Component, ComponentId, Hook};
use crate::error::Result;

/// Where in a flush cycle the scheduler is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushPhase {
    /// Updating dirty components. Nested flushes return immediately.
    Components,
    /// Draining two-way binding callbacks.
    Bindings,
    /// Running after-mount / after-update callbacks.
    RenderCallbacks,
    /// Draining teardown continuations.
    Teardown,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SchedulerState {
    /// Nothing pending.
    #[default]
    Idle,
    /// A flush is queued on the microtask queue.
    Scheduled,
    Flushing(FlushPhase),
}

enum Microtask {
    Flush,
    Task(Cleanup),
}

#[derive(Default)]
struct SchedulerInner {
    state: Cell<SchedulerState>,
    dirty_components: RefCell<Vec<Component>>,
    flush_index: Cell<usize>,
    binding_callbacks: RefCell<Vec<Cleanup>>,
    render_callbacks: RefCell<Vec<Hook>>,
    flush_callbacks: RefCell<Vec<Cleanup>>,
    /// Render callbacks already run this generation, keyed by address. The
    /// value keeps the callback alive so its address cannot be reused.
    seen_callbacks: RefCell<HashMap<usize, Hook>>,
    current_component: RefCell<Option<Component>>,
    microtasks: RefCell<VecDeque<Microtask>>,
    next_component_id: Cell<u64>,
    generation: Cell<u64>,
}

/// Scheduler for one component tree. Cheap to clone.
#[derive(Clone, Default)]
pub struct Scheduler {
    inner: Rc<SchedulerInner>,
}

pub(crate) fn callback_key(callback: &Hook) -> usize {
    Rc::as_ptr(callback) as *const () as usize
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SchedulerState {
        self.inner.state.get()
    }

    fn set_state(&self, state: SchedulerState) {
        self.inner.state.set(state);
    }

    pub fn is_idle(&self) -> bool {
        self.state() == SchedulerState::Idle
    }

    /// Components waiting for the next (or running) flush.
    pub fn dirty_count(&self) -> usize {
        self.inner.dirty_components.borrow().len()
    }

    /// Number of flush cycles completed so far.
    pub fn generation(&self) -> u64 {
        self.inner.generation.get()
    }

    // =========================================================================
    // Current component
    // =========================================================================

    /// The component whose logic is running right now.
    pub fn current_component(&self) -> Option<Component> {
        self.inner.current_component.borrow().clone()
    }

    /// Swap the current component, returning the previous one.
    pub(crate) fn set_current_component(&self, component: Option<Component>) -> Option<Component> {
        self.inner.current_component.replace(component)
    }

    pub(crate) fn next_component_id(&self) -> ComponentId {
        let id = self.inner.next_component_id.get();
        self.inner.next_component_id.set(id + 1);
        ComponentId(id)
    }

    // =========================================================================
    // Enqueue
    // =========================================================================

    /// Queue a component that just turned dirty.
    pub(crate) fn enqueue(&self, component: Component) {
        trace!(component = %component.id(), "queued dirty component");
        self.inner.dirty_components.borrow_mut().push(component);
        self.schedule_update();
    }

    /// Queue a flush on the microtask queue unless one is already pending
    /// or running.
    pub fn schedule_update(&self) {
        if self.state() == SchedulerState::Idle {
            self.set_state(SchedulerState::Scheduled);
            self.inner.microtasks.borrow_mut().push_back(Microtask::Flush);
        }
    }

    /// Run `callback` after the current round of component updates.
    pub fn add_render_callback(&self, callback: Hook) {
        self.inner.render_callbacks.borrow_mut().push(callback);
    }

    /// Run `callback` once components are updated, after later-queued
    /// binding callbacks.
    pub fn add_binding_callback(&self, callback: impl FnOnce() + 'static) {
        self.inner.binding_callbacks.borrow_mut().push(Box::new(callback));
    }

    /// Run `callback` at the very end of the flush cycle.
    pub fn add_flush_callback(&self, callback: impl FnOnce() + 'static) {
        self.inner.flush_callbacks.borrow_mut().push(Box::new(callback));
    }

    /// Run the queued render callbacks that belong to `hooks` now and drop
    /// them from the queue. Used before a component is destroyed.
    pub(crate) fn flush_render_callbacks(&self, hooks: &[Hook]) {
        if hooks.is_empty() {
            return;
        }
        let keys: Vec<usize> = hooks.iter().map(callback_key).collect();
        let targets: Vec<Hook> = {
            let mut queue = self.inner.render_callbacks.borrow_mut();
            let (targets, rest): (Vec<Hook>, Vec<Hook>) = queue
                .drain(..)
                .partition(|callback| keys.contains(&callback_key(callback)));
            *queue = rest;
            targets
        };
        for callback in targets {
            callback();
        }
    }

    // =========================================================================
    // Microtasks
    // =========================================================================

    /// Defer `task` until the next [`tick`](Self::tick).
    pub fn queue_microtask(&self, task: impl FnOnce() + 'static) {
        self.inner.microtasks.borrow_mut().push_back(Microtask::Task(Box::new(task)));
    }

    pub fn pending_microtasks(&self) -> usize {
        self.inner.microtasks.borrow().len()
    }

    /// Drain the microtask queue, running any scheduled flush.
    ///
    /// Stops at the first flush error; later microtasks stay queued.
    pub fn tick(&self) -> Result<()> {
        loop {
            let task = self.inner.microtasks.borrow_mut().pop_front();
            match task {
                None => return Ok(()),
                Some(Microtask::Flush) => self.flush()?,
                Some(Microtask::Task(task)) => task(),
            }
        }
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Drop all queued work and return to `Idle`.
    pub fn reset(&self) {
        self.clear_queues();
        self.inner.microtasks.borrow_mut().clear();
        self.inner.current_component.replace(None);
        self.set_state(SchedulerState::Idle);
    }

    /// Empty every queue. Components dropped from the dirty queue go back to
    /// clean so a later invalidation queues them again.
    fn clear_queues(&self) {
        let dropped = std::mem::take(&mut *self.inner.dirty_components.borrow_mut());
        for component in dropped.iter().skip(self.inner.flush_index.get()) {
            component.mark_clean();
        }
        self.inner.flush_index.set(0);
        self.inner.binding_callbacks.borrow_mut().clear();
        self.inner.render_callbacks.borrow_mut().clear();
        self.inner.flush_callbacks.borrow_mut().clear();
        self.inner.seen_callbacks.borrow_mut().clear();
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("state", &self.state())
            .field("dirty", &self.dirty_count())
            .field("microtasks", &self.pending_microtasks())
            .finish()
    }
}
