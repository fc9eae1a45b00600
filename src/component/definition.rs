//! Component configuration.
//!
//! - [`ComponentDefinition`]: what a component is (logic, fragment, props)
//! - [`ComponentOptions`]: where and how one instance is mounted
//! - [`Props`]: named prop values pushed into an instance

use std::collections::HashMap;
use std::rc::Rc;

use crate::fragment::Fragment;
use crate::host::NodeId;
use crate::value::{Equality, Value};

use super::dirty::DirtyMask;
use super::{Component, Context, Invalidator};

/// Instance logic: receives the component, its initial props and the
/// invalidator, returns the initial `ctx`.
pub type InstanceFn = Box<dyn FnOnce(&Component, &Props, &Invalidator) -> Vec<Value>>;

/// Builds the component's fragment from the initial `ctx`.
pub type FragmentFactory = Box<dyn FnOnce(&Component, &[Value]) -> Box<dyn Fragment>>;

/// Reactive declarations, re-run at the start of every update with the
/// accumulated dirty mask.
pub type ReactiveFn = Rc<dyn Fn(&[Value], &DirtyMask, &Invalidator)>;

// =============================================================================
// Props
// =============================================================================

/// Named prop values, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Props(Vec<(String, Value)>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a prop.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}

// =============================================================================
// Definition
// =============================================================================

/// Static description of a component.
///
/// ```ignore
/// let definition = ComponentDefinition::new("Greeting")
///     .prop("name", 0)
///     .instance(|_, props, _| vec![props.get("name").cloned().unwrap_or_default()])
///     .fragment(|_, ctx| Box::new(GreetingFragment::new(ctx)));
/// ```
pub struct ComponentDefinition {
    pub(crate) name: &'static str,
    pub(crate) instance: Option<InstanceFn>,
    pub(crate) fragment: Option<FragmentFactory>,
    pub(crate) props: HashMap<String, usize>,
    pub(crate) reactive: Option<ReactiveFn>,
    pub(crate) equality: Equality,
    pub(crate) slots: usize,
}

impl ComponentDefinition {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            instance: None,
            fragment: None,
            props: HashMap::new(),
            reactive: None,
            equality: Equality::default(),
            slots: 0,
        }
    }

    pub fn instance(
        mut self,
        instance: impl FnOnce(&Component, &Props, &Invalidator) -> Vec<Value> + 'static,
    ) -> Self {
        self.instance = Some(Box::new(instance));
        self
    }

    /// Without a fragment the component renders nothing.
    pub fn fragment(
        mut self,
        factory: impl FnOnce(&Component, &[Value]) -> Box<dyn Fragment> + 'static,
    ) -> Self {
        self.fragment = Some(Box::new(factory));
        self
    }

    /// Expose slot `slot` as prop `name`.
    pub fn prop(mut self, name: impl Into<String>, slot: usize) -> Self {
        self.props.insert(name.into(), slot);
        self.slots = self.slots.max(slot + 1);
        self
    }

    pub fn reactive(mut self, reactive: impl Fn(&[Value], &DirtyMask, &Invalidator) + 'static) -> Self {
        self.reactive = Some(Rc::new(reactive));
        self
    }

    pub fn equality(mut self, equality: Equality) -> Self {
        self.equality = equality;
        self
    }

    /// Number of slots, sizing the dirty mask up front.
    pub fn slots(mut self, slots: usize) -> Self {
        self.slots = self.slots.max(slots);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

// =============================================================================
// Options
// =============================================================================

/// How one instance is created.
///
/// Without a target the component is a child: it inherits its root and
/// context from the component currently initializing, and its parent mounts
/// it.
#[derive(Clone, Debug, Default)]
pub struct ComponentOptions {
    pub target: Option<NodeId>,
    pub anchor: Option<NodeId>,
    pub props: Props,
    /// Replaces the context inherited from the parent.
    pub context: Option<Context>,
    /// Claim the target's existing children instead of creating nodes.
    pub hydrate: bool,
    /// Play the intro transition on mount.
    pub intro: bool,
}

impl ComponentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn anchor(mut self, anchor: NodeId) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    pub fn context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    pub fn hydrate(mut self, hydrate: bool) -> Self {
        self.hydrate = hydrate;
        self
    }

    pub fn intro(mut self, intro: bool) -> Self {
        self.intro = intro;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_props_insert_replaces() {
        let mut props = Props::new().with("heading", "Contact").with("count", 1);
        props.insert("heading", "Hello");

        assert_eq!(props.get("heading").and_then(Value::as_str), Some("Hello"));
        assert_eq!(props.iter().count(), 2);
    }

    #[test]
    fn test_prop_sizes_slots() {
        let definition = ComponentDefinition::new("Form").prop("a", 0).prop("b", 40);
        assert_eq!(definition.slots, 41);
    }
}
