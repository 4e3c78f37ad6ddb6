//! Building trees from structured records.
//!
//! A [`TreeLoader`] turns a node [`Record`] into a [`BehaviorTree`], binding
//! user handlers by name through a [`HandlerRegistry`] and resolving access
//! keys once through an [`AccessKeyProvider`].
//!
//! # Record shape
//!
//! ```text
//! (tag: "Selector", attributes: {"Name": "root"}, children: [
//!     (tag: "Child", children: [
//!         (tag: "Parameters", children: [
//!             (tag: "Parameter", attributes: {"Name": "range", "Value": 3}),
//!         ]),
//!         (tag: "AccessLimitDecorator", attributes: {"Name": "door_gate", "AccessKey": "door"},
//!          children: [(tag: "Action", attributes: {"Name": "open_door"})]),
//!     ]),
//!     (tag: "Action", attributes: {"Name": "idle"}),
//! ])
//! ```
//!
//! A `Parameters` element binds a parameter set to the edge into the node
//! that carries it. Children of composites and decorators may instead be
//! `Child` elements wrapping one node record plus the `Parameters` for that
//! edge, which keeps the parameters next to the parent's other children.
//!
//! Malformed elements never abort a load: they are skipped and reported as
//! [`LoadIssue`]s. A root that fails to load leaves the tree without a root.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use crate::access_key::AccessKeyProvider;
use crate::access_limit::AccessLimit;
use crate::composite::{Concurrent, FailurePolicy, Selector, Sequence, SuccessPolicy};
use crate::container::BehaviorContainer;
use crate::decorator::{Decorator, DecoratorHandler, HandlerAdmission};
use crate::error::{HandlerError, LoadIssue};
use crate::leaf::{Action, ActionHandler, ActionResetHandler, Condition, ConditionHandler};
use crate::parameters::PARAMETERS_TAG;
use crate::shared::SharedBehavior;
use crate::{
    Behavior, BehaviorParameterCollection, BehaviorResult, BehaviorTree, BehaviorTreeState, Record,
};

/// Tag of an edge element wrapping a node and its parameters.
pub const CHILD_TAG: &str = "Child";

/// Node kinds understood by the loader, as they appear in record tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::AsRefStr)]
pub enum NodeTag {
    Sequence,
    Selector,
    Concurrent,
    Action,
    Condition,
    Decorator,
    AccessLimitDecorator,
    Reference,
}

type SharedActionFn<C> = Arc<dyn Fn(&mut BehaviorTreeState<C>) -> BehaviorResult + Send + Sync>;
type SharedResetFn<C> = Arc<dyn Fn(&mut BehaviorTreeState<C>) + Send + Sync>;
type SharedConditionFn<C> = Arc<dyn Fn(&BehaviorTreeState<C>) -> bool + Send + Sync>;
type SharedDecoratorFn<C> =
    Arc<dyn Fn(&BehaviorTreeState<C>) -> Result<bool, HandlerError> + Send + Sync>;

/// User handlers addressable by name from tree records.
///
/// Handlers are shared between every node (and every tree) that names them,
/// so per-activation data belongs in the blackboard or the agent context.
pub struct HandlerRegistry<C> {
    actions: HashMap<String, SharedActionFn<C>>,
    resets: HashMap<String, SharedResetFn<C>>,
    conditions: HashMap<String, SharedConditionFn<C>>,
    decorators: HashMap<String, SharedDecoratorFn<C>>,
}

impl<C> Default for HandlerRegistry<C> {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
            resets: HashMap::new(),
            conditions: HashMap::new(),
            decorators: HashMap::new(),
        }
    }
}

impl<C: 'static> HandlerRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(
        mut self,
        name: impl Into<String>,
        handler: impl Fn(&mut BehaviorTreeState<C>) -> BehaviorResult + Send + Sync + 'static,
    ) -> Self {
        self.actions.insert(name.into(), Arc::new(handler));
        self
    }

    /// Registers what to do when a `Running` action named `name` is reset.
    pub fn action_reset(
        mut self,
        name: impl Into<String>,
        handler: impl Fn(&mut BehaviorTreeState<C>) + Send + Sync + 'static,
    ) -> Self {
        self.resets.insert(name.into(), Arc::new(handler));
        self
    }

    pub fn condition(
        mut self,
        name: impl Into<String>,
        handler: impl Fn(&BehaviorTreeState<C>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.conditions.insert(name.into(), Arc::new(handler));
        self
    }

    pub fn decorator(
        mut self,
        name: impl Into<String>,
        handler: impl Fn(&BehaviorTreeState<C>) -> Result<bool, HandlerError> + Send + Sync + 'static,
    ) -> Self {
        self.decorators.insert(name.into(), Arc::new(handler));
        self
    }

    fn action_handler(&self, name: &str) -> Option<ActionHandler<C>> {
        let handler = Arc::clone(self.actions.get(name)?);
        Some(Box::new(move |state: &mut BehaviorTreeState<C>| handler(state)))
    }

    fn reset_handler(&self, name: &str) -> Option<ActionResetHandler<C>> {
        let handler = Arc::clone(self.resets.get(name)?);
        Some(Box::new(move |state: &mut BehaviorTreeState<C>| handler(state)))
    }

    fn condition_handler(&self, name: &str) -> Option<ConditionHandler<C>> {
        let handler = Arc::clone(self.conditions.get(name)?);
        Some(Box::new(move |state: &BehaviorTreeState<C>| handler(state)))
    }

    fn decorator_handler(&self, name: &str) -> Option<DecoratorHandler<C>> {
        let handler = Arc::clone(self.decorators.get(name)?);
        Some(Box::new(move |state: &BehaviorTreeState<C>| handler(state)))
    }
}

/// Result of loading one tree.
#[derive(Debug)]
pub struct LoadedTree<C> {
    pub tree: BehaviorTree<C>,
    pub issues: Vec<LoadIssue>,
}

/// Builds behavior trees from node records.
pub struct TreeLoader<'a, C> {
    handlers: &'a HandlerRegistry<C>,
    keys: &'a dyn AccessKeyProvider,
    shared: HashMap<String, SharedBehavior<C>>,
    issues: Vec<LoadIssue>,
}

impl<'a, C: Send + 'static> TreeLoader<'a, C> {
    pub fn new(handlers: &'a HandlerRegistry<C>, keys: &'a dyn AccessKeyProvider) -> Self {
        Self {
            handlers,
            keys,
            shared: HashMap::new(),
            issues: Vec::new(),
        }
    }

    /// Builds a tree named `name` whose root is described by `record`.
    pub fn load(mut self, name: impl Into<String>, record: &Record, context: C) -> LoadedTree<C> {
        let root = self.load_node(record);
        LoadedTree {
            tree: BehaviorTree::from_parts(name, root, context),
            issues: self.issues,
        }
    }

    /// Builds a single node (and its subtree) from `record`.
    pub fn load_node(&mut self, record: &Record) -> Option<Box<dyn Behavior<C>>> {
        let Ok(tag) = NodeTag::from_str(&record.tag) else {
            self.issues.push(LoadIssue::UnknownTag {
                tag: record.tag.clone(),
            });
            return None;
        };
        let name = record.attr_string_or("Name", &record.tag);

        let node: Box<dyn Behavior<C>> = match tag {
            NodeTag::Sequence => Box::new(Sequence::new(name.clone(), self.load_edges(record))),
            NodeTag::Selector => Box::new(Selector::new(name.clone(), self.load_edges(record))),
            NodeTag::Concurrent => {
                let failure = self.policy::<FailurePolicy>(record, &name, "FailurePolicy");
                let success = self.policy::<SuccessPolicy>(record, &name, "SuccessPolicy");
                Box::new(
                    Concurrent::new(name.clone(), self.load_edges(record))
                        .with_policies(failure, success),
                )
            }
            NodeTag::Action => {
                let handler_name = record.attr_string_or("Handler", &name);
                let handler = self.handlers.action_handler(&handler_name);
                if handler.is_none() {
                    self.issues.push(LoadIssue::MissingHandler {
                        node: name.clone(),
                        role: "action",
                        handler: handler_name.clone(),
                    });
                }
                let on_reset = self.handlers.reset_handler(&handler_name);
                Box::new(Action::from_boxed(name.clone(), handler, on_reset))
            }
            NodeTag::Condition => {
                let handler_name = record.attr_string_or("Handler", &name);
                let handler = self.handlers.condition_handler(&handler_name);
                if handler.is_none() {
                    self.issues.push(LoadIssue::MissingHandler {
                        node: name.clone(),
                        role: "condition",
                        handler: handler_name,
                    });
                }
                Box::new(Condition::from_boxed(name.clone(), handler))
            }
            NodeTag::Decorator => {
                let explicit = record.attr_str("Handler");
                let handler_name = explicit.unwrap_or(&name);
                let handler = self.handlers.decorator_handler(handler_name);
                // without an explicit handler the decorator may pass through
                if handler.is_none() && explicit.is_some() {
                    self.issues.push(LoadIssue::MissingHandler {
                        node: name.clone(),
                        role: "decorator",
                        handler: handler_name.to_owned(),
                    });
                }
                let admission = HandlerAdmission::new(handler);
                let decorator = Decorator::<C, _>::with_admission(name.clone(), admission)
                    .with_never_fail(record.attr_bool_or("NeverFail", true));
                match self.load_single_edge(record, &name) {
                    Some(child) => Box::new(decorator.with_container(child)),
                    None => Box::new(decorator),
                }
            }
            NodeTag::AccessLimitDecorator => {
                let key_name = record.attr_string_or("AccessKey", "");
                let admission = match self.keys.lookup(&key_name) {
                    Some(key) => AccessLimit::new(key),
                    None => {
                        self.issues.push(LoadIssue::UnresolvedAccessKey {
                            node: name.clone(),
                            key: key_name.clone(),
                        });
                        AccessLimit::unresolved(key_name)
                    }
                };
                let decorator = Decorator::<C, _>::with_admission(name.clone(), admission)
                    .with_never_fail(record.attr_bool_or("NeverFail", true));
                match self.load_single_edge(record, &name) {
                    Some(child) => Box::new(decorator.with_container(child)),
                    None => Box::new(decorator),
                }
            }
            NodeTag::Reference => {
                return match self.shared.get(&name) {
                    Some(shared) => Some(Box::new(shared.clone()) as Box<dyn Behavior<C>>),
                    None => {
                        self.issues.push(LoadIssue::UnknownReference { name });
                        None
                    }
                };
            }
        };

        if record.attr_bool_or("Shared", false) {
            let shared = SharedBehavior::new(node);
            self.shared.insert(name, shared.clone());
            return Some(Box::new(shared));
        }
        Some(node)
    }

    fn load_edges(&mut self, record: &Record) -> Vec<BehaviorContainer<C>> {
        record
            .children
            .iter()
            .filter(|child| child.tag != PARAMETERS_TAG)
            .filter_map(|child| self.load_edge(child))
            .collect()
    }

    fn load_single_edge(&mut self, record: &Record, name: &str) -> Option<BehaviorContainer<C>> {
        let mut edges = self.load_edges(record);
        if edges.len() > 1 {
            self.issues.push(LoadIssue::ExtraChildren {
                node: name.to_owned(),
                count: edges.len(),
            });
            edges.truncate(1);
        }
        edges.pop()
    }

    fn load_edge(&mut self, record: &Record) -> Option<BehaviorContainer<C>> {
        let (node_record, parameters) = if record.tag == CHILD_TAG {
            let Some(node_record) = record.children.iter().find(|c| c.tag != PARAMETERS_TAG) else {
                self.issues.push(LoadIssue::UnknownTag {
                    tag: CHILD_TAG.to_owned(),
                });
                return None;
            };
            let parameters = record
                .child(PARAMETERS_TAG)
                .or_else(|| node_record.child(PARAMETERS_TAG));
            (node_record, parameters)
        } else {
            (record, record.child(PARAMETERS_TAG))
        };

        let node = self.load_node(node_record)?;
        Some(match parameters.map(BehaviorParameterCollection::load) {
            Some(parameters) => BehaviorContainer::with_parameters(node, parameters),
            None => BehaviorContainer::new(node),
        })
    }

    fn policy<P>(&mut self, record: &Record, node: &str, attribute: &'static str) -> P
    where
        P: FromStr + Default,
    {
        let Some(raw) = record.attr_str(attribute) else {
            return P::default();
        };
        P::from_str(raw).unwrap_or_else(|_| {
            self.issues.push(LoadIssue::InvalidAttribute {
                node: node.to_owned(),
                attribute,
                value: raw.to_owned(),
            });
            P::default()
        })
    }
}
