//! Per-component mutable record.

use std::collections::HashMap;
use std::rc::Rc;

use crate::fragment::Fragment;
use crate::host::NodeId;
use crate::value::{Equality, Value};

use super::definition::ReactiveFn;
use super::dirty::DirtyMask;
use super::{BindingCallback, Cleanup, Context, EventCallback, Hook, MountHook};

bitflags::bitflags! {
    /// Lifecycle status of an instance.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct InstanceFlags: u8 {
        /// Instance logic finished; invalidations now mark the component dirty.
        const READY = 1 << 0;
        /// Props are being pushed from outside; binding callbacks stay quiet.
        const SKIP_BOUND = 1 << 1;
        const MOUNTED = 1 << 2;
        const DESTROYED = 1 << 3;
    }
}

/// Where a component's fragment is.
pub(crate) enum FragmentSlot {
    /// Not created yet.
    Uninit,
    /// The component renders no host output.
    Empty,
    Live(Box<dyn Fragment>),
    /// Taken out while one of its methods runs. `destroy` records a destroy
    /// request that arrived in the meantime.
    Busy { destroy: Option<bool> },
    Destroyed,
}

pub(crate) struct Instance {
    pub ctx: Vec<Value>,
    pub dirty: DirtyMask,
    pub fragment: FragmentSlot,
    pub flags: InstanceFlags,
    pub root: Option<NodeId>,

    pub props: Rc<HashMap<String, usize>>,
    pub equality: Equality,
    pub reactive: Option<ReactiveFn>,
    pub bound: HashMap<usize, BindingCallback>,

    pub on_mount: Vec<MountHook>,
    /// `None` once the component is destroyed.
    pub on_destroy: Option<Vec<Cleanup>>,
    pub before_update: Vec<Hook>,
    pub after_update: Vec<Hook>,

    pub context: Context,
    pub callbacks: HashMap<String, Vec<(u64, EventCallback)>>,
    pub next_callback_id: u64,
}

impl Instance {
    pub fn new(root: Option<NodeId>, context: Context, slots: usize) -> Self {
        Self {
            ctx: Vec::new(),
            dirty: DirtyMask::clean(slots),
            fragment: FragmentSlot::Uninit,
            flags: InstanceFlags::empty(),
            root,
            props: Rc::default(),
            equality: Equality::default(),
            reactive: None,
            bound: HashMap::new(),
            on_mount: Vec::new(),
            on_destroy: Some(Vec::new()),
            before_update: Vec::new(),
            after_update: Vec::new(),
            context,
            callbacks: HashMap::new(),
            next_callback_id: 0,
        }
    }

    /// Created and not destroyed.
    pub fn is_live(&self) -> bool {
        !matches!(self.fragment, FragmentSlot::Uninit) && !self.flags.contains(InstanceFlags::DESTROYED)
    }
}
