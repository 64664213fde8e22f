//! Handle arena
//!
//! Every handle is a node in the arena, keyed by what it targets: a class
//! target (candidate names, optional enclosing class node, declaration) or a
//! member spec under an owning class node. Asking for the same target twice
//! yields the same node, so resolution happens at most once per target.
//! Member nodes refer to their owner by `HandleId` only.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use strata_runtime::{ClassId, ConstructorRef, FieldRef, MethodRef};

use super::member::MemberSpec;
use crate::constraint::{ConstraintResult, Declaration};
use crate::error::{ReflectError, ReflectResult};

/// Arena address of a handle node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub(crate) usize);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// Observable resolution state of a handle
#[derive(Debug, Clone, PartialEq)]
pub enum HandleState {
    /// Not resolved yet
    Unresolved,
    /// Resolved to a live member
    Resolved,
    /// Resolution failed; every access reports this error
    Failed(ReflectError),
}

/// Class target: candidate names, looked up inside `owner` when nested
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ClassTarget {
    pub names: Vec<String>,
    pub owner: Option<HandleId>,
    pub declaration: Declaration,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum HandleKey {
    Class(ClassTarget),
    Member { owner: HandleId, spec: MemberSpec },
}

impl HandleKey {
    fn owner(&self) -> Option<HandleId> {
        match self {
            HandleKey::Class(target) => target.owner,
            HandleKey::Member { owner, .. } => Some(*owner),
        }
    }
}

/// Concrete target a node resolved to
#[derive(Debug, Clone)]
pub(crate) enum Resolved {
    Class(ClassId),
    Field(FieldRef),
    Method(MethodRef),
    Constructor(ConstructorRef),
}

#[derive(Debug, Clone)]
pub(crate) struct Resolution {
    pub target: Resolved,
    pub constraints: Vec<ConstraintResult>,
}

pub(crate) struct HandleNode {
    id: HandleId,
    key: HandleKey,
    state: OnceCell<Result<Resolution, ReflectError>>,
}

impl HandleNode {
    fn new(id: HandleId, key: HandleKey) -> Self {
        Self {
            id,
            key,
            state: OnceCell::new(),
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn key(&self) -> &HandleKey {
        &self.key
    }

    pub fn state(&self) -> HandleState {
        match self.state.get() {
            None => HandleState::Unresolved,
            Some(Ok(_)) => HandleState::Resolved,
            Some(Err(e)) => HandleState::Failed(e.clone()),
        }
    }

    /// Resolve once; concurrent callers block and observe the same outcome
    pub fn resolve_with(
        &self,
        resolve: impl FnOnce() -> ReflectResult<Resolution>,
    ) -> ReflectResult<&Resolution> {
        match self.state.get_or_init(resolve) {
            Ok(resolution) => Ok(resolution),
            Err(e) => Err(e.clone()),
        }
    }
}

impl fmt::Debug for HandleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleNode")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("state", &self.state())
            .finish()
    }
}

/// Get-or-create storage for handle nodes
#[derive(Debug, Default)]
pub(crate) struct HandleArena {
    index: DashMap<HandleKey, Arc<HandleNode>>,
    nodes: DashMap<HandleId, Arc<HandleNode>>,
    next_id: AtomicUsize,
}

impl HandleArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&self, key: HandleKey) -> Arc<HandleNode> {
        if let Some(node) = self.index.get(&key) {
            return node.value().clone();
        }
        match self.index.entry(key) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                let id = HandleId(self.next_id.fetch_add(1, Ordering::Relaxed));
                let node = Arc::new(HandleNode::new(id, entry.key().clone()));
                self.nodes.insert(id, node.clone());
                entry.insert(node.clone());
                node
            }
        }
    }

    /// Nodes owned by `owner`, in creation order
    pub fn children(&self, owner: HandleId) -> Vec<HandleId> {
        let mut ids: Vec<HandleId> = self
            .nodes
            .iter()
            .filter(|entry| entry.value().key().owner() == Some(owner))
            .map(|entry| *entry.key())
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Forget every node. Outstanding handles keep their own nodes.
    pub fn clear(&self) {
        self.index.clear();
        self.nodes.clear();
    }
}
