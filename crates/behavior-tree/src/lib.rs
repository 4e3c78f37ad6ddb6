//! Behavior tree runtime for real-time agents.
//!
//! Trees are ticked once per simulation step. A tick returns one of three
//! results; `Running` marks work that spans ticks, and composites and
//! decorators resume a running child on the next tick instead of
//! re-evaluating their conditions.
//!
//! - **Parameter scoping**: every parent-to-child edge may bind a parameter
//!   set that the child sees while it runs
//! - **Admission**: decorators gate entry into their child, either through a
//!   user handler or by acquiring a shared access key
//! - **Access keys**: named, thread-safe budgets (cooldowns and concurrent
//!   slot limits) that let independent trees coordinate
//!
//! # Architecture
//!
//! - [`Behavior`]: Core trait for all nodes
//! - [`BehaviorResult`]: Success, Failure or Running
//! - Composite nodes: [`Sequence`], [`Selector`], [`Concurrent`]
//! - Decorator nodes: [`Decorator`], [`AccessLimitDecorator`]
//! - Leaf nodes: [`Action`], [`Condition`]
//! - [`BehaviorTree`]: a root plus the per-agent [`BehaviorTreeState`]
//! - [`TreeLoader`]: builds trees from [`Record`]s
//! - [`SharedAccessKeys`]: the key registry trees resolve against

pub mod access_key;
pub mod access_limit;
pub mod behavior;
pub mod builder;
pub mod composite;
pub mod container;
pub mod decorator;
pub mod error;
pub mod leaf;
pub mod loader;
pub mod parameters;
pub mod record;
pub mod shared;
pub mod state;
pub mod status;
pub mod tree;

pub use access_key::{
    AccessKey, AccessKeyKind, AccessKeyProvider, Clock, CounterLimitAccessKey, ManualClock,
    SharedAccessKeys, SystemClock, TimeLimitAccessKey,
};
pub use access_limit::{AccessLimit, AccessLimitDecorator};
pub use behavior::{Behavior, BehaviorKind, NodeCore};
pub use composite::{CompositeKind, Concurrent, FailurePolicy, Selector, Sequence, SuccessPolicy};
pub use container::BehaviorContainer;
pub use decorator::{Admission, Decorator, DecoratorHandler, DecoratorKind, HandlerAdmission};
pub use error::{HandlerError, LoadIssue};
pub use leaf::{Action, Condition};
pub use loader::{HandlerRegistry, LoadedTree, NodeTag, TreeLoader};
pub use parameters::{BehaviorParameter, BehaviorParameterCollection};
pub use record::{Record, Value};
pub use shared::SharedBehavior;
pub use state::{BehaviorTreeState, Blackboard};
pub use status::BehaviorResult;
pub use tree::BehaviorTree;
