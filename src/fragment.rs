//! Fragment - the render object compiled component logic hands to the runtime.
//!
//! A fragment owns the host nodes of one component (or one block inside it)
//! and knows how to build them, claim them from server-rendered markup, attach
//! them, patch them from `ctx`, and tear them down.
//!
//! ```text
//! create() ─┐
//!           ├─► mount(target, anchor) ─► patch(ctx, dirty)* ─► destroy(detaching)
//! claim()  ─┘
//! ```

use crate::component::DirtyMask;
use crate::error::FragmentError;
use crate::host::{Host, NodeId};
use crate::hydration::NodeList;
use crate::value::Value;

/// Host output of a component.
pub trait Fragment {
    /// Build fresh, detached nodes.
    fn create(&mut self, host: &Host);

    /// Take nodes out of `nodes` (the live children of the mount target)
    /// instead of creating them.
    fn claim(&mut self, host: &Host, nodes: &mut NodeList);

    /// Attach the nodes under `target`, before `anchor` when given.
    fn mount(&mut self, host: &Host, target: NodeId, anchor: Option<NodeId>) -> Result<(), FragmentError>;

    /// Bring the nodes in line with `ctx`. Only slots set in `dirty` changed.
    fn patch(&mut self, host: &Host, ctx: &[Value], dirty: &DirtyMask) -> Result<(), FragmentError>;

    /// Start the intro transition.
    fn intro(&mut self, _local: bool) {}

    /// Start the outro transition.
    fn outro(&mut self, _local: bool) {}

    /// Release the nodes, removing them from the tree when `detaching`.
    fn destroy(&mut self, host: &Host, detaching: bool);
}
