//! # spark-hydrate
//!
//! Component runtime for compiled, reactive UI fragments.
//!
//! Components keep their state in numbered slots. Writing a slot marks it in
//! the component's dirty bitmask and queues the component on a [`Scheduler`];
//! all writes made in one turn are patched together in a single flush.
//! Components can mount by creating fresh host nodes or by hydrating: claiming
//! nodes that server-rendered markup already put in the tree, then reordering
//! them with as few moves as possible.
//!
//! ## Architecture
//!
//! ```text
//! instance logic ─► Invalidator ─► DirtyMask ─► Scheduler queue ─► tick/flush
//!                                                                     │
//!                               Fragment::patch(ctx, dirty) ◄─────────┘
//!                                      │
//!                 Host (Document + Hydrator) ◄── claim_* / append_hydration
//! ```
//!
//! The host tree is an index arena: nodes are `NodeId`s into a `Document`,
//! never pointers, and claim metadata lives in side tables owned by the
//! `Hydrator`.
//!
//! ## Modules
//!
//! - [`host`] - Document arena, DOM-style helpers
//! - [`hydration`] - Node claiming, LIS reordering, hydration-aware insertion
//! - [`scheduler`] - Batched flush cycle and microtask queue
//! - [`component`] - Component handles, lifecycle, context, events
//! - [`fragment`] - The contract compiled render code implements
//! - [`value`] - Slot values and change detection

pub mod component;
pub mod error;
pub mod fragment;
pub mod host;
pub mod hydration;
pub mod scheduler;
pub mod value;

pub use component::{
    after_update, before_update, create_event_dispatcher, get_all_contexts, get_context, has_context,
    init, on_destroy, on_mount, set_context, Cleanup, Component, ComponentDefinition, ComponentId,
    ComponentOptions, Context, DirtyMask, Event, EventDispatcher, Hook, Invalidator, Props,
};

pub use error::{FragmentError, HostError, Result, RuntimeError};

pub use fragment::Fragment;

pub use host::{dom, Document, Host, MutationStats, NodeId, NodeKind};

pub use hydration::{
    append_hydration, claim_element, claim_space, claim_text, init_hydrate, insert_hydration,
    longest_increasing_subsequence, Hydrator, NodeList,
};

pub use scheduler::{FlushPhase, Scheduler, SchedulerState};

pub use value::{Equality, Value};
