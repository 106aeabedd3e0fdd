//! Deterministic partition assignment and re-balancing for cluster
//! coordinators.
//!
//! A coordinator managing a cluster of worker servers needs to decide which
//! server owns which partition, and to revise that decision whenever the
//! membership changes. This crate provides the decision itself: a pure
//! policy that maps a fixed partition id space onto a weighted, dynamic
//! server set, keeping partition movement minimal, honoring explicit
//! placement preferences, and fencing every ownership change with a
//! monotonically increasing per-partition generation number.
//!
//! Watching server liveness, electing the active coordinator and publishing
//! the resulting [`PartitionAssignment`] are the caller's job. The policy
//! only ever sees point-in-time snapshots, which makes recomputation after a
//! coordinator failover safe: identical inputs always produce an identical
//! assignment.
//!
//! # Example
//!
//! ```
//! use {
//!     partmap::{
//!         AssignmentPolicy, DynamicPartitionAssignmentPolicy, Endpoint,
//!         PartitionAssignment, ServerDescriptor,
//!     },
//!     std::collections::BTreeMap,
//! };
//!
//! let policy = DynamicPartitionAssignmentPolicy;
//!
//! // Two live servers; server 2 has twice the capacity of server 1.
//! let mut servers = BTreeMap::new();
//! servers.insert(1, ServerDescriptor::new(1, Endpoint::new("host1", 6000), vec![]));
//! servers.insert(2, ServerDescriptor::new(2, Endpoint::new("host2", 6000), vec![]));
//!
//! let assignment = policy.update(1, &PartitionAssignment::initial(6), 6, &servers);
//! assert_eq!(assignment.partitions_for(1).len(), 2);
//! assert_eq!(assignment.partitions_for(2).len(), 4);
//! ```

pub mod assignment;
pub mod error;
pub mod policy;
pub mod server;

pub use {
    assignment::{PartitionAssignment, PartitionInfo},
    error::{AssignmentError, AssignmentResult},
    policy::DynamicPartitionAssignmentPolicy,
    server::{Endpoint, PartitionId, ServerDescriptor, ServerId},
};

use {auto_impl::auto_impl, std::collections::BTreeMap};

/// Assignment policy, the seam between the coordinator and the placement
/// algorithm.
///
/// An implementation decides how the partition id space `[0, num_partitions)`
/// is distributed over the live servers, given the assignment it produced
/// last time around.
#[auto_impl(&)]
pub trait AssignmentPolicy {
    /// Computes the next assignment from the previous one and the current
    /// live server set.
    ///
    /// The `version` is attached to the returned snapshot verbatim; callers
    /// must keep it non-decreasing along one assignment lineage. Calls that
    /// share a `previous` lineage must be serialized by the caller, since
    /// generations are defined relative to one linear history.
    fn update(
        &self,
        version: u64,
        previous: &PartitionAssignment,
        num_partitions: u32,
        live_servers: &BTreeMap<ServerId, ServerDescriptor>,
    ) -> PartitionAssignment;
}
