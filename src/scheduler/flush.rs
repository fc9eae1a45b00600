//! The flush cycle.
//!
//! Callback order within one cycle:
//! 1. `before_update` hooks, parents before children (queue order)
//! 2. binding callbacks, children before parents
//! 3. `after_update` hooks, parents before children, except the ones queued
//!    while mounting, which run children first because children finish
//!    mounting before their parent does
//!
//! Callbacks may invalidate more slots. Components invalidated during step 1
//! join the running loop; components invalidated later start another round of
//! the outer loop, and render callbacks that already ran this generation are
//! not run again.

use tracing::{debug, warn};

use crate::error::Result;

use super::{callback_key, FlushPhase, Scheduler, SchedulerState};

impl Scheduler {
    /// Update every dirty component and run the queued callbacks.
    ///
    /// If a component update fails, every queue is emptied and the scheduler
    /// goes back to `Idle` before the error is returned.
    pub fn flush(&self) -> Result<()> {
        if self.state() == SchedulerState::Flushing(FlushPhase::Components) {
            return Ok(());
        }
        let saved_component = self.current_component();
        let generation = self.inner.generation.get() + 1;
        debug!(generation, dirty = self.dirty_count(), "flush started");

        loop {
            self.set_state(SchedulerState::Flushing(FlushPhase::Components));
            if let Err(err) = self.update_dirty_components() {
                warn!(generation, error = %err, "component update failed; resetting scheduler");
                self.clear_queues();
                self.set_state(SchedulerState::Idle);
                self.set_current_component(saved_component);
                return Err(err);
            }
            self.set_current_component(None);
            self.inner.dirty_components.borrow_mut().clear();
            self.inner.flush_index.set(0);

            self.set_state(SchedulerState::Flushing(FlushPhase::Bindings));
            loop {
                let callback = self.inner.binding_callbacks.borrow_mut().pop();
                match callback {
                    Some(callback) => callback(),
                    None => break,
                }
            }

            self.set_state(SchedulerState::Flushing(FlushPhase::RenderCallbacks));
            self.run_render_callbacks();

            if self.inner.dirty_components.borrow().is_empty() {
                break;
            }
        }

        self.set_state(SchedulerState::Flushing(FlushPhase::Teardown));
        loop {
            let callback = self.inner.flush_callbacks.borrow_mut().pop();
            match callback {
                Some(callback) => callback(),
                None => break,
            }
        }

        self.set_state(SchedulerState::Idle);
        self.inner.seen_callbacks.borrow_mut().clear();
        self.inner.generation.set(generation);
        self.set_current_component(saved_component);
        debug!(generation, "flush settled");
        Ok(())
    }

    /// Walk the dirty queue from the cursor to its current end.
    fn update_dirty_components(&self) -> Result<()> {
        loop {
            let index = self.inner.flush_index.get();
            let next = self.inner.dirty_components.borrow().get(index).cloned();
            let Some(component) = next else {
                return Ok(());
            };
            self.inner.flush_index.set(index + 1);
            self.set_current_component(Some(component.clone()));
            component.update()?;
        }
    }

    fn run_render_callbacks(&self) {
        let mut i = 0;
        loop {
            let next = self.inner.render_callbacks.borrow().get(i).cloned();
            let Some(callback) = next else {
                break;
            };
            i += 1;

            let key = callback_key(&callback);
            let first_run = {
                let mut seen = self.inner.seen_callbacks.borrow_mut();
                if seen.contains_key(&key) {
                    false
                } else {
                    seen.insert(key, callback.clone());
                    true
                }
            };
            if first_run {
                callback();
            }
        }
        self.inner.render_callbacks.borrow_mut().clear();
    }
}
