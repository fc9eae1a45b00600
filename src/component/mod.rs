//! Components - reactive slots, dirty tracking and lifecycle.
//!
//! A component is a handle around one [`Instance`](instance::Instance)
//! record. Its state lives in `ctx`, a flat list of slots; instance logic
//! writes slots through an [`Invalidator`], which marks the slot dirty and
//! queues the component on its [`Scheduler`]. The scheduler later calls
//! [`Component::update`], which patches the fragment with the accumulated
//! [`DirtyMask`].
//!
//! # Lifecycle
//!
//! ```text
//! init ─► instance logic ─► reactive ─► before_update ─► create/claim ─► mount ─► flush
//!                                                                           │
//!               invalidate ─► make_dirty ─► (flush) update ─► patch ◄───────┘
//!                                                                           │
//!                                                          destroy ─► on_destroy, fragment.destroy
//! ```
//!
//! Every handle shares the same record, so handles can be cloned freely into
//! callbacks. Invalidators hold a weak reference and become no-ops once every
//! handle is gone.

pub mod definition;
pub mod dirty;
mod instance;
mod lifecycle;

pub use definition::{ComponentDefinition, ComponentOptions, FragmentFactory, InstanceFn, Props, ReactiveFn};
pub use dirty::DirtyMask;
pub use lifecycle::{
    after_update, before_update, create_event_dispatcher, get_all_contexts, get_context, has_context,
    on_destroy, on_mount, set_context, Event, EventDispatcher,
};

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::error::{Result, RuntimeError};
use crate::fragment::Fragment;
use crate::host::{Host, NodeId};
use crate::hydration::NodeList;
use crate::scheduler::Scheduler;
use crate::value::Value;

use instance::{FragmentSlot, Instance, InstanceFlags};

/// Callback run during a flush (`before_update`, `after_update`, render
/// callbacks).
pub type Hook = Rc<dyn Fn()>;

/// One-shot teardown or continuation.
pub type Cleanup = Box<dyn FnOnce()>;

/// `on_mount` callback; the returned cleanup runs on destroy.
pub type MountHook = Box<dyn FnOnce() -> Option<Cleanup>>;

/// Two-way binding callback, called with the slot's new value.
pub type BindingCallback = Rc<dyn Fn(&Value)>;

pub type EventCallback = Rc<dyn Fn(&Event)>;

/// Context values visible to a component and inherited by its children.
pub type Context = HashMap<String, Value>;

/// Identity of a component within its scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

struct ComponentInner {
    id: ComponentId,
    name: &'static str,
    scheduler: Scheduler,
    host: Host,
    state: RefCell<Instance>,
}

/// Handle to a live component.
#[derive(Clone)]
pub struct Component {
    inner: Rc<ComponentInner>,
}

/// Writes slots of one component from its instance logic.
#[derive(Clone)]
pub struct Invalidator {
    inner: Weak<ComponentInner>,
}

impl Invalidator {
    /// Assign `value` to `slot`. Returns whether the value changed.
    ///
    /// A change calls the slot's binding callback (unless props are being
    /// pushed from outside) and, once the component finished initializing,
    /// marks the slot dirty.
    pub fn invalidate(&self, slot: usize, value: impl Into<Value>) -> bool {
        match self.component() {
            Some(component) => component.write_slot(slot, value.into()),
            None => false,
        }
    }

    pub fn component(&self) -> Option<Component> {
        self.inner.upgrade().map(|inner| Component { inner })
    }
}

// =============================================================================
// Init
// =============================================================================

/// Create a component, and mount it when `options.target` is set.
///
/// Without a target the new component is a child of the component currently
/// initializing: it inherits that component's root and context, and its
/// parent's fragment mounts it through [`Component::mount_component`].
pub fn init(
    scheduler: &Scheduler,
    host: &Host,
    options: ComponentOptions,
    definition: ComponentDefinition,
) -> Result<Component> {
    let ComponentDefinition {
        name,
        instance,
        fragment,
        props,
        reactive,
        equality,
        slots,
    } = definition;

    let parent = scheduler.current_component();
    let root = options
        .target
        .or_else(|| parent.as_ref().and_then(Component::root))
        .ok_or(RuntimeError::NoRoot(name))?;
    let context = match options.context.clone() {
        Some(context) => context,
        None => parent.as_ref().map(Component::context_snapshot).unwrap_or_default(),
    };

    let mut record = Instance::new(Some(root), context, slots);
    record.props = Rc::new(props);
    record.equality = equality;
    record.reactive = reactive;

    let component = Component {
        inner: Rc::new(ComponentInner {
            id: scheduler.next_component_id(),
            name,
            scheduler: scheduler.clone(),
            host: host.clone(),
            state: RefCell::new(record),
        }),
    };
    debug!(component = %component.id(), name, hydrate = options.hydrate, "initializing component");

    let previous = scheduler.set_current_component(Some(component.clone()));
    let result = component.initialize(options, instance, fragment);
    scheduler.set_current_component(previous);
    result.map(|()| component)
}

impl Component {
    fn initialize(
        &self,
        options: ComponentOptions,
        instance: Option<InstanceFn>,
        factory: Option<FragmentFactory>,
    ) -> Result<()> {
        let invalidator = self.invalidator();
        let ctx = match instance {
            Some(instance) => instance(self, &options.props, &invalidator),
            None => self.ctx_from_props(&options.props),
        };
        self.state_mut().ctx = ctx;

        self.run_reactive(&DirtyMask::all());
        self.state_mut().flags.insert(InstanceFlags::READY);
        self.run_before_update();

        let fragment = match factory {
            Some(factory) => {
                let ctx = self.ctx();
                FragmentSlot::Live(factory(self, &ctx))
            }
            None => FragmentSlot::Empty,
        };
        self.state_mut().fragment = fragment;

        let Some(target) = options.target else {
            return Ok(());
        };

        let host = self.inner.host.clone();
        if options.hydrate {
            host.hydrator.start();
            let mut nodes = NodeList::children_of(&host.document, target);
            self.claim_fragment(&mut nodes);
            nodes.detach_unclaimed(&host.document);
        } else {
            self.create_fragment();
        }
        if options.intro {
            self.transition_in(false);
        }

        let mounted = self.mount_component(target, options.anchor);
        host.hydrator.end();
        mounted?;
        self.inner.scheduler.flush()
    }

    /// Initial `ctx` for components without instance logic: props land in
    /// their mapped slots, everything else is `Null`.
    fn ctx_from_props(&self, props: &Props) -> Vec<Value> {
        let map = self.state().props.clone();
        let len = map.values().map(|slot| slot + 1).max().unwrap_or(0);
        let mut ctx = vec![Value::Null; len];
        for (name, value) in props.iter() {
            if let Some(&slot) = map.get(name) {
                ctx[slot] = value.clone();
            }
        }
        ctx
    }
}

// =============================================================================
// Component handle
// =============================================================================

impl Component {
    pub fn id(&self) -> ComponentId {
        self.inner.id
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// The host node this component's tree was mounted under.
    pub fn root(&self) -> Option<NodeId> {
        self.state().root
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.inner.scheduler
    }

    pub fn host(&self) -> &Host {
        &self.inner.host
    }

    /// Snapshot of the current slot values.
    pub fn ctx(&self) -> Vec<Value> {
        self.state().ctx.clone()
    }

    pub fn slot(&self, slot: usize) -> Option<Value> {
        self.state().ctx.get(slot).cloned()
    }

    /// Pending dirty bits (the clean sentinel when not queued).
    pub fn dirty(&self) -> DirtyMask {
        self.state().dirty.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.state().flags.contains(InstanceFlags::MOUNTED)
    }

    pub fn is_destroyed(&self) -> bool {
        self.state().flags.contains(InstanceFlags::DESTROYED)
    }

    pub fn invalidator(&self) -> Invalidator {
        Invalidator {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn ptr_eq(&self, other: &Component) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn state(&self) -> Ref<'_, Instance> {
        self.inner.state.borrow()
    }

    fn state_mut(&self) -> RefMut<'_, Instance> {
        self.inner.state.borrow_mut()
    }

    // =========================================================================
    // Invalidation
    // =========================================================================

    fn write_slot(&self, slot: usize, value: Value) -> bool {
        let (binding, ready) = {
            let mut state = self.state_mut();
            let Some(current) = state.ctx.get(slot) else {
                return false;
            };
            if !state.equality.not_equal(current, &value) {
                return false;
            }
            state.ctx[slot] = value.clone();
            let binding = if state.flags.contains(InstanceFlags::SKIP_BOUND) {
                None
            } else {
                state.bound.get(&slot).cloned()
            };
            (binding, state.flags.contains(InstanceFlags::READY))
        };

        if let Some(binding) = binding {
            binding(&value);
        }
        if ready {
            self.make_dirty(slot);
        }
        true
    }

    /// Mark `slot` dirty, queueing the component if it was clean.
    pub fn make_dirty(&self, slot: usize) {
        let queue = {
            let mut state = self.state_mut();
            let queue = state.dirty.is_clean();
            if queue {
                state.dirty.clear();
            }
            state.dirty.mark(slot);
            queue
        };
        if queue {
            self.inner.scheduler.enqueue(self.clone());
        }
    }

    /// Drop pending dirty bits without patching.
    pub(crate) fn mark_clean(&self) {
        self.state_mut().dirty.take();
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Re-render with the accumulated dirty bits. Called by the scheduler.
    pub(crate) fn update(&self) -> Result<()> {
        if !self.state().is_live() {
            self.mark_clean();
            return Ok(());
        }

        let mask = self.dirty();
        self.run_reactive(&mask);
        self.run_before_update();

        let (ctx, dirty) = {
            let mut state = self.state_mut();
            (state.ctx.clone(), state.dirty.take())
        };
        let host = self.inner.host.clone();
        if let Some(Err(source)) = self.with_fragment(|fragment| fragment.patch(&host, &ctx, &dirty)) {
            return Err(RuntimeError::Update {
                component: self.id(),
                name: self.name(),
                source,
            });
        }

        let after_update = self.state().after_update.clone();
        for hook in after_update {
            self.inner.scheduler.add_render_callback(hook);
        }
        Ok(())
    }

    fn run_reactive(&self, dirty: &DirtyMask) {
        let reactive = self.state().reactive.clone();
        if let Some(reactive) = reactive {
            let ctx = self.ctx();
            reactive(&ctx, dirty, &self.invalidator());
        }
    }

    fn run_before_update(&self) {
        let hooks = self.state().before_update.clone();
        for hook in hooks {
            hook();
        }
    }

    /// Run `f` on the live fragment. Returns `None` when there is none (no
    /// fragment, destroyed, or already in use further up the stack).
    ///
    /// A destroy requested while `f` runs is carried out once it returns.
    fn with_fragment<R>(&self, f: impl FnOnce(&mut dyn Fragment) -> R) -> Option<R> {
        let mut fragment = {
            let mut state = self.state_mut();
            match std::mem::replace(&mut state.fragment, FragmentSlot::Busy { destroy: None }) {
                FragmentSlot::Live(fragment) => fragment,
                other => {
                    state.fragment = other;
                    return None;
                }
            }
        };

        let result = f(fragment.as_mut());

        let pending = {
            let mut state = self.state_mut();
            match std::mem::replace(&mut state.fragment, FragmentSlot::Destroyed) {
                FragmentSlot::Busy { destroy } => destroy,
                _ => None,
            }
        };
        match pending {
            Some(detaching) => fragment.destroy(&self.inner.host, detaching),
            None => self.state_mut().fragment = FragmentSlot::Live(fragment),
        }
        Some(result)
    }

    // =========================================================================
    // Child component helpers
    // =========================================================================

    /// Build the fragment's nodes.
    pub fn create_fragment(&self) {
        let host = self.inner.host.clone();
        self.with_fragment(|fragment| fragment.create(&host));
    }

    /// Claim the fragment's nodes from `nodes`.
    pub fn claim_fragment(&self, nodes: &mut NodeList) {
        let host = self.inner.host.clone();
        self.with_fragment(|fragment| fragment.claim(&host, nodes));
    }

    pub fn transition_in(&self, local: bool) {
        self.with_fragment(|fragment| fragment.intro(local));
    }

    pub fn transition_out(&self, local: bool) {
        self.with_fragment(|fragment| fragment.outro(local));
    }

    /// Attach the fragment under `target` and queue the mount callbacks.
    ///
    /// Mount callbacks of children run before their parent's, since a
    /// parent's fragment mounts its children before this returns.
    pub fn mount_component(&self, target: NodeId, anchor: Option<NodeId>) -> Result<()> {
        let host = self.inner.host.clone();
        if let Some(Err(source)) = self.with_fragment(|fragment| fragment.mount(&host, target, anchor)) {
            return Err(RuntimeError::Mount {
                component: self.id(),
                name: self.name(),
                source,
            });
        }

        let component = self.clone();
        self.inner
            .scheduler
            .add_render_callback(Rc::new(move || component.run_mount_hooks()));
        let after_update = self.state().after_update.clone();
        for hook in after_update {
            self.inner.scheduler.add_render_callback(hook);
        }
        self.state_mut().flags.insert(InstanceFlags::MOUNTED);
        Ok(())
    }

    fn run_mount_hooks(&self) {
        let hooks = std::mem::take(&mut self.state_mut().on_mount);
        let cleanups: Vec<Cleanup> = hooks.into_iter().filter_map(|hook| hook()).collect();

        // Destroyed while mounting: nothing will run on_destroy any more.
        let orphaned = {
            let mut state = self.state_mut();
            match state.on_destroy.as_mut() {
                Some(on_destroy) => {
                    on_destroy.extend(cleanups);
                    Vec::new()
                }
                None => cleanups,
            }
        };
        for cleanup in orphaned {
            cleanup();
        }
    }

    /// Tear the component down. Runs pending `after_update` callbacks, then
    /// `on_destroy`, then destroys the fragment. Later calls do nothing.
    pub fn destroy_component(&self, detaching: bool) {
        let (after_update, on_destroy) = {
            let mut state = self.state_mut();
            if state.flags.contains(InstanceFlags::DESTROYED) || matches!(state.fragment, FragmentSlot::Uninit) {
                return;
            }
            state.flags.insert(InstanceFlags::DESTROYED);
            (state.after_update.clone(), state.on_destroy.take().unwrap_or_default())
        };
        debug!(component = %self.id(), name = self.name(), detaching, "destroying component");

        self.inner.scheduler.flush_render_callbacks(&after_update);
        for cleanup in on_destroy {
            cleanup();
        }

        let fragment = {
            let mut state = self.state_mut();
            let fragment = match std::mem::replace(&mut state.fragment, FragmentSlot::Destroyed) {
                FragmentSlot::Live(fragment) => Some(fragment),
                FragmentSlot::Busy { .. } => {
                    state.fragment = FragmentSlot::Busy {
                        destroy: Some(detaching),
                    };
                    None
                }
                _ => None,
            };
            state.ctx.clear();
            state.bound.clear();
            fragment
        };
        if let Some(mut fragment) = fragment {
            fragment.destroy(&self.inner.host, detaching);
        }
    }

    /// Destroy the component and remove its nodes. Idempotent.
    pub fn destroy(&self) {
        self.destroy_component(true);
    }

    // =========================================================================
    // Props and bindings
    // =========================================================================

    /// Push new prop values. Unknown names are ignored; binding callbacks
    /// stay quiet for the duration.
    pub fn set_props(&self, props: Props) {
        if props.is_empty() {
            return;
        }
        let map = self.state().props.clone();
        self.state_mut().flags.insert(InstanceFlags::SKIP_BOUND);
        for (name, value) in props.iter() {
            if let Some(&slot) = map.get(name) {
                self.write_slot(slot, value.clone());
            }
        }
        self.state_mut().flags.remove(InstanceFlags::SKIP_BOUND);
    }

    /// Two-way bind prop `prop`: `callback` runs now with the current value
    /// and again whenever the component changes the prop itself.
    ///
    /// Returns `false` if the component has no such prop.
    pub fn bind(&self, prop: &str, callback: impl Fn(&Value) + 'static) -> bool {
        let Some(slot) = self.state().props.get(prop).copied() else {
            return false;
        };
        let callback: BindingCallback = Rc::new(callback);
        let current = {
            let mut state = self.state_mut();
            state.bound.insert(slot, callback.clone());
            state.ctx.get(slot).cloned()
        };
        if let Some(value) = current {
            callback(&value);
        }
        true
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Subscribe to component event `event`. Call the returned closure to
    /// unsubscribe.
    pub fn on(&self, event: &str, callback: impl Fn(&Event) + 'static) -> Cleanup {
        let id = {
            let mut state = self.state_mut();
            let id = state.next_callback_id;
            state.next_callback_id += 1;
            state
                .callbacks
                .entry(event.to_owned())
                .or_default()
                .push((id, Rc::new(callback)));
            id
        };

        let weak = Rc::downgrade(&self.inner);
        let event = event.to_owned();
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                let mut state = inner.state.borrow_mut();
                if let Some(callbacks) = state.callbacks.get_mut(&event) {
                    callbacks.retain(|(callback_id, _)| *callback_id != id);
                }
            }
        })
    }

    /// Call every subscriber of `name`. Returns `false` if one of them
    /// prevented the default of a cancelable event.
    pub fn dispatch(&self, name: &str, detail: Value, cancelable: bool) -> bool {
        let callbacks: Vec<EventCallback> = self
            .state()
            .callbacks
            .get(name)
            .map(|callbacks| callbacks.iter().map(|(_, callback)| callback.clone()).collect())
            .unwrap_or_default();
        if callbacks.is_empty() {
            return true;
        }

        let event = Event::new(name, detail, cancelable);
        for callback in &callbacks {
            callback(&event);
        }
        !event.default_prevented()
    }

    // =========================================================================
    // Lifecycle registration
    // =========================================================================

    /// Run `hook` after the first mount. A returned cleanup runs on destroy.
    pub fn on_mount(&self, hook: impl FnOnce() -> Option<Cleanup> + 'static) {
        self.state_mut().on_mount.push(Box::new(hook));
    }

    /// Run `cleanup` when the component is destroyed (right away if it
    /// already was).
    pub fn on_destroy(&self, cleanup: impl FnOnce() + 'static) {
        let rejected = {
            let mut state = self.state_mut();
            match state.on_destroy.as_mut() {
                Some(on_destroy) => {
                    on_destroy.push(Box::new(cleanup));
                    None
                }
                None => Some(cleanup),
            }
        };
        if let Some(cleanup) = rejected {
            cleanup();
        }
    }

    pub fn before_update(&self, hook: impl Fn() + 'static) {
        self.state_mut().before_update.push(Rc::new(hook));
    }

    pub fn after_update(&self, hook: impl Fn() + 'static) {
        self.state_mut().after_update.push(Rc::new(hook));
    }

    // =========================================================================
    // Context
    // =========================================================================

    pub fn set_context(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.state_mut().context.insert(key.into(), value.into());
    }

    pub fn get_context(&self, key: &str) -> Option<Value> {
        self.state().context.get(key).cloned()
    }

    pub fn has_context(&self, key: &str) -> bool {
        self.state().context.contains_key(key)
    }

    /// Copy of every context entry, as a child would inherit it.
    pub fn context_snapshot(&self) -> Context {
        self.state().context.clone()
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Component {}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("dirty", &self.dirty())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FragmentError;
    use std::cell::Cell;

    /// Fragment that records every call.
    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
        fail_patch: Rc<Cell<bool>>,
    }

    impl Fragment for Recorder {
        fn create(&mut self, _host: &Host) {
            self.log.borrow_mut().push("create".into());
        }

        fn claim(&mut self, _host: &Host, _nodes: &mut NodeList) {
            self.log.borrow_mut().push("claim".into());
        }

        fn mount(&mut self, _host: &Host, _target: NodeId, _anchor: Option<NodeId>) -> std::result::Result<(), FragmentError> {
            self.log.borrow_mut().push("mount".into());
            Ok(())
        }

        fn patch(&mut self, _host: &Host, _ctx: &[Value], dirty: &DirtyMask) -> std::result::Result<(), FragmentError> {
            if self.fail_patch.get() {
                return Err(FragmentError::msg("patch failed"));
            }
            self.log.borrow_mut().push(format!("patch {:?}", dirty.slots()));
            Ok(())
        }

        fn destroy(&mut self, _host: &Host, detaching: bool) {
            self.log.borrow_mut().push(format!("destroy {detaching}"));
        }
    }

    struct Fixture {
        scheduler: Scheduler,
        host: Host,
        root: NodeId,
        log: Rc<RefCell<Vec<String>>>,
        fail_patch: Rc<Cell<bool>>,
    }

    fn fixture() -> Fixture {
        let host = Host::new();
        let root = host.document.create_element("main");
        Fixture {
            scheduler: Scheduler::new(),
            host,
            root,
            log: Rc::default(),
            fail_patch: Rc::default(),
        }
    }

    fn counter(fx: &Fixture) -> Component {
        let log = fx.log.clone();
        let fail_patch = fx.fail_patch.clone();
        let definition = ComponentDefinition::new("Counter")
            .prop("count", 0)
            .prop("label", 1)
            .fragment(move |_, _| Box::new(Recorder { log, fail_patch }));
        init(
            &fx.scheduler,
            &fx.host,
            ComponentOptions::new()
                .target(fx.root)
                .props(Props::new().with("count", 0).with("label", "clicks")),
            definition,
        )
        .expect("init")
    }

    #[test]
    fn test_init_creates_and_mounts() {
        let fx = fixture();
        let component = counter(&fx);

        assert_eq!(*fx.log.borrow(), vec!["create", "mount"]);
        assert!(component.is_mounted());
        assert!(component.dirty().is_clean());
        assert_eq!(component.slot(0).and_then(|v| v.as_int()), Some(0));
        assert!(fx.scheduler.is_idle());
    }

    #[test]
    fn test_invalidations_coalesce_into_one_patch() {
        let fx = fixture();
        let component = counter(&fx);
        let invalidate = component.invalidator();

        assert!(invalidate.invalidate(0, 1));
        assert!(invalidate.invalidate(0, 2));
        assert!(invalidate.invalidate(1, "taps"));
        assert!(!invalidate.invalidate(1, "taps"));
        assert_eq!(fx.scheduler.dirty_count(), 1);

        fx.scheduler.tick().expect("tick");
        assert_eq!(fx.log.borrow().last().map(String::as_str), Some("patch [0, 1]"));
        assert_eq!(fx.log.borrow().iter().filter(|entry| entry.starts_with("patch")).count(), 1);
    }

    #[test]
    fn test_out_of_range_slot_is_ignored() {
        let fx = fixture();
        let component = counter(&fx);
        assert!(!component.invalidator().invalidate(9, 1));
        assert_eq!(fx.scheduler.dirty_count(), 0);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let fx = fixture();
        let component = counter(&fx);
        let destroyed = Rc::new(Cell::new(0));
        let counter = destroyed.clone();
        component.on_destroy(move || counter.set(counter.get() + 1));

        component.destroy();
        component.destroy();

        assert_eq!(destroyed.get(), 1);
        assert_eq!(fx.log.borrow().iter().filter(|entry| entry.starts_with("destroy")).count(), 1);
        assert!(component.is_destroyed());
        assert!(component.ctx().is_empty());
    }

    #[test]
    fn test_update_error_resets_scheduler() {
        let fx = fixture();
        let component = counter(&fx);
        fx.fail_patch.set(true);
        component.invalidator().invalidate(0, 5);

        let err = fx.scheduler.tick().expect_err("patch should fail");
        assert!(matches!(err, RuntimeError::Update { name: "Counter", .. }));
        assert!(fx.scheduler.is_idle());
        assert_eq!(fx.scheduler.dirty_count(), 0);

        fx.fail_patch.set(false);
        component.invalidator().invalidate(0, 6);
        fx.scheduler.tick().expect("tick");
        assert_eq!(fx.log.borrow().last().map(String::as_str), Some("patch [0]"));
    }

    #[test]
    fn test_events_unsubscribe() {
        let fx = fixture();
        let component = counter(&fx);
        let seen = Rc::new(Cell::new(0));
        let counter = seen.clone();
        let off = component.on("click", move |_| counter.set(counter.get() + 1));

        assert!(component.dispatch("click", Value::Null, false));
        off();
        assert!(component.dispatch("click", Value::Null, false));
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_child_without_root_fails() {
        let scheduler = Scheduler::new();
        let err = init(&scheduler, &Host::new(), ComponentOptions::new(), ComponentDefinition::new("Orphan"))
            .expect_err("no root");
        assert_eq!(err, RuntimeError::NoRoot("Orphan"));
    }
}
