//! Entity-relationship traversal and field-disposition engine
//!
//! This crate contains:
//! - `GraphTraversal`: the recursive walk with cycle detection and the
//!   cached reverse-ownership index
//! - `AccessCollector`: the Right to Access visitor (structured export)
//! - `ForgetExecutor`: the Right to be Forgotten visitor (transactional
//!   anonymization/removal)
//! - `ComplianceEngine`: the facade request handlers talk to

pub mod access;
pub mod forget;
pub mod traversal;

use std::sync::Arc;

use gdpr_core::{AccessResult, Entity, EntityRepository, ForgetOutcome, PolicyCatalog, Result};
use gdpr_sanitizers::SanitizerRegistry;

pub use access::AccessCollector;
pub use forget::ForgetExecutor;
pub use traversal::{
    GraphTraversal, NodeVisitor, OwnerRelationship, TraversalLimits, TASK_ENTITY_TYPE,
};

/// The two data-request operations exposed to request handlers. All
/// collaborators are injected; the engine owns no global state.
pub struct ComplianceEngine {
    repository: Arc<dyn EntityRepository>,
    policies: Arc<PolicyCatalog>,
    sanitizers: Arc<SanitizerRegistry>,
    limits: TraversalLimits,
}

impl ComplianceEngine {
    pub fn new(
        repository: Arc<dyn EntityRepository>,
        policies: Arc<PolicyCatalog>,
        sanitizers: Arc<SanitizerRegistry>,
    ) -> Self {
        Self {
            repository,
            policies,
            sanitizers,
            limits: TraversalLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: TraversalLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Right to Access: walk the graph and assemble the export dataset.
    /// Read-only; degraded fields are simply absent or flagged "maybe".
    pub fn collect_for_access(&self, root: &Entity) -> Result<AccessResult> {
        let traversal =
            GraphTraversal::new(self.repository.clone(), self.policies.clone(), self.limits)?;
        let mut collector = AccessCollector::new(self.repository.clone());
        traversal.traverse(root, &mut collector)?;
        Ok(collector.into_result())
    }

    /// Right to be Forgotten: walk the graph, apply dispositions, and commit
    /// every mutation in one transaction — or nothing at all.
    pub fn execute_forget(&self, root: &Entity) -> Result<ForgetOutcome> {
        let traversal =
            GraphTraversal::new(self.repository.clone(), self.policies.clone(), self.limits)?;
        let executor = ForgetExecutor::new(self.repository.clone(), self.sanitizers.clone());
        executor.run(&traversal, root)
    }
}
