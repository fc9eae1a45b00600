//! Lifecycle, context and event functions for instance logic.
//!
//! Each function resolves the component currently initializing (or
//! updating) through the scheduler and fails with
//! [`RuntimeError::OutsideInitialization`] when there is none.

use std::cell::Cell;
use std::rc::Weak;

use crate::error::{Result, RuntimeError};
use crate::scheduler::Scheduler;
use crate::value::Value;

use super::{Cleanup, Component, ComponentInner, Context};

fn current(scheduler: &Scheduler, function: &'static str) -> Result<Component> {
    scheduler
        .current_component()
        .ok_or(RuntimeError::OutsideInitialization(function))
}

// =============================================================================
// Lifecycle hooks
// =============================================================================

/// Run `hook` once the component is first mounted. A returned cleanup runs
/// when it is destroyed.
pub fn on_mount(scheduler: &Scheduler, hook: impl FnOnce() -> Option<Cleanup> + 'static) -> Result<()> {
    current(scheduler, "on_mount")?.on_mount(hook);
    Ok(())
}

pub fn on_destroy(scheduler: &Scheduler, cleanup: impl FnOnce() + 'static) -> Result<()> {
    current(scheduler, "on_destroy")?.on_destroy(cleanup);
    Ok(())
}

/// Run `hook` before every patch, and once before the first render.
pub fn before_update(scheduler: &Scheduler, hook: impl Fn() + 'static) -> Result<()> {
    current(scheduler, "before_update")?.before_update(hook);
    Ok(())
}

/// Run `hook` after the first mount and after every patch.
pub fn after_update(scheduler: &Scheduler, hook: impl Fn() + 'static) -> Result<()> {
    current(scheduler, "after_update")?.after_update(hook);
    Ok(())
}

// =============================================================================
// Context
// =============================================================================

/// Make `value` visible to this component and to children created after
/// this call.
pub fn set_context(scheduler: &Scheduler, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
    current(scheduler, "set_context")?.set_context(key, value);
    Ok(())
}

pub fn get_context(scheduler: &Scheduler, key: &str) -> Result<Option<Value>> {
    Ok(current(scheduler, "get_context")?.get_context(key))
}

pub fn has_context(scheduler: &Scheduler, key: &str) -> Result<bool> {
    Ok(current(scheduler, "has_context")?.has_context(key))
}

pub fn get_all_contexts(scheduler: &Scheduler) -> Result<Context> {
    Ok(current(scheduler, "get_all_contexts")?.context_snapshot())
}

// =============================================================================
// Events
// =============================================================================

/// A component event as seen by `on` subscribers.
#[derive(Debug)]
pub struct Event {
    name: String,
    detail: Value,
    cancelable: bool,
    default_prevented: Cell<bool>,
}

impl Event {
    pub fn new(name: impl Into<String>, detail: Value, cancelable: bool) -> Self {
        Self {
            name: name.into(),
            detail,
            cancelable,
            default_prevented: Cell::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn detail(&self) -> &Value {
        &self.detail
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// Has no effect on events that are not cancelable.
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Dispatches events to the `on` subscribers of the component that created
/// it. Does nothing once the component is dropped.
#[derive(Clone)]
pub struct EventDispatcher {
    component: Weak<ComponentInner>,
}

impl EventDispatcher {
    /// Returns `false` only if a subscriber prevented the default.
    pub fn dispatch(&self, name: &str, detail: impl Into<Value>) -> bool {
        self.dispatch_with(name, detail.into(), false)
    }

    pub fn dispatch_cancelable(&self, name: &str, detail: impl Into<Value>) -> bool {
        self.dispatch_with(name, detail.into(), true)
    }

    fn dispatch_with(&self, name: &str, detail: Value, cancelable: bool) -> bool {
        match self.component.upgrade() {
            Some(inner) => Component { inner }.dispatch(name, detail, cancelable),
            None => true,
        }
    }
}

pub fn create_event_dispatcher(scheduler: &Scheduler) -> Result<EventDispatcher> {
    let component = current(scheduler, "create_event_dispatcher")?;
    Ok(EventDispatcher {
        component: std::rc::Rc::downgrade(&component.inner),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_initialization() {
        let scheduler = Scheduler::new();
        assert_eq!(
            on_mount(&scheduler, || None),
            Err(RuntimeError::OutsideInitialization("on_mount"))
        );
        assert!(matches!(
            get_context(&scheduler, "theme"),
            Err(RuntimeError::OutsideInitialization("get_context"))
        ));
        assert!(create_event_dispatcher(&scheduler).is_err());
    }

    #[test]
    fn test_prevent_default_needs_cancelable() {
        let event = Event::new("submit", Value::Null, false);
        event.prevent_default();
        assert!(!event.default_prevented());

        let event = Event::new("submit", Value::Null, true);
        event.prevent_default();
        assert!(event.default_prevented());
    }
}
