use {
    crate::{
        error::{AssignmentError, AssignmentResult},
        server::{PartitionId, ServerId},
    },
    std::collections::{BTreeMap, BTreeSet},
};

/// A partition together with its generation counter.
///
/// The generation is a hand-off fence: it increases by exactly one every
/// time the partition changes owner and never decreases. Two servers that
/// disagree on a partition's generation during hand-off are observing an
/// unsafe double-ownership window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartitionInfo {
    pub partition_id: PartitionId,
    pub generation: u64,
}

impl PartitionInfo {
    pub fn new(partition_id: PartitionId, generation: u64) -> Self {
        Self {
            partition_id,
            generation,
        }
    }
}

/// An immutable snapshot of partition ownership across the cluster.
///
/// Snapshots form a lineage: each one is produced by the assignment policy
/// from its predecessor, and the coordinator feeds the current snapshot back
/// in on the next update. Ownership is exclusive: a partition id appears in
/// at most one server's list, and only servers owning at least one partition
/// appear in the map at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionAssignment {
    version: u64,
    num_partitions: u32,
    ownership: BTreeMap<ServerId, Vec<PartitionInfo>>,
}

impl PartitionAssignment {
    /// Creates an empty assignment, the start of a lineage.
    pub fn initial(num_partitions: u32) -> Self {
        Self {
            version: 0,
            num_partitions,
            ownership: BTreeMap::new(),
        }
    }

    /// Creates an assignment from an externally built ownership map.
    ///
    /// Snapshots produced by the policy are consistent by construction; this
    /// constructor is for snapshots that arrive from outside (e.g. read back
    /// from a coordination store) and validates that every partition id is
    /// within `[0, num_partitions)` and owned by at most one server. Servers
    /// with empty partition lists are dropped.
    pub fn new(
        version: u64,
        num_partitions: u32,
        ownership: BTreeMap<ServerId, Vec<PartitionInfo>>,
    ) -> AssignmentResult<Self> {
        let mut seen = BTreeSet::new();
        for partitions in ownership.values() {
            for info in partitions {
                if info.partition_id >= num_partitions {
                    return Err(AssignmentError::PartitionOutOfRange {
                        partition: info.partition_id,
                        num_partitions,
                    });
                }
                if !seen.insert(info.partition_id) {
                    return Err(AssignmentError::DuplicateOwner(info.partition_id));
                }
            }
        }

        let ownership = ownership
            .into_iter()
            .filter(|(_, partitions)| !partitions.is_empty())
            .collect();

        Ok(Self {
            version,
            num_partitions,
            ownership,
        })
    }

    pub(crate) fn from_parts(
        version: u64,
        num_partitions: u32,
        ownership: BTreeMap<ServerId, Vec<PartitionInfo>>,
    ) -> Self {
        Self {
            version,
            num_partitions,
            ownership,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn num_partitions(&self) -> u32 {
        self.num_partitions
    }

    /// Number of servers owning at least one partition.
    pub fn num_endpoints(&self) -> usize {
        self.ownership.len()
    }

    /// Ids of the servers owning at least one partition.
    pub fn server_ids(&self) -> BTreeSet<ServerId> {
        self.ownership.keys().copied().collect()
    }

    /// Partitions owned by the given server, sorted by partition id.
    ///
    /// Servers absent from the snapshot own nothing.
    pub fn partitions_for(&self, server_id: ServerId) -> &[PartitionInfo] {
        self.ownership
            .get(&server_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the server currently owning the given partition, if any.
    pub fn owner_of(&self, partition_id: PartitionId) -> Option<ServerId> {
        self.servers().find_map(|(server_id, partitions)| {
            partitions
                .iter()
                .any(|info| info.partition_id == partition_id)
                .then_some(server_id)
        })
    }

    /// Iterator over owning servers and their partitions, in server id order.
    pub fn servers(&self) -> impl Iterator<Item = (ServerId, &[PartitionInfo])> {
        self.ownership
            .iter()
            .map(|(server_id, partitions)| (*server_id, partitions.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ownership(
        entries: &[(ServerId, &[(PartitionId, u64)])],
    ) -> BTreeMap<ServerId, Vec<PartitionInfo>> {
        entries
            .iter()
            .map(|(server_id, partitions)| {
                let partitions = partitions
                    .iter()
                    .map(|&(id, generation)| PartitionInfo::new(id, generation))
                    .collect();
                (*server_id, partitions)
            })
            .collect()
    }

    #[test]
    fn initial_is_empty() {
        let assignment = PartitionAssignment::initial(8);
        assert_eq!(assignment.version(), 0);
        assert_eq!(assignment.num_partitions(), 8);
        assert_eq!(assignment.num_endpoints(), 0);
        assert!(assignment.server_ids().is_empty());
        assert!(assignment.partitions_for(0).is_empty());
    }

    #[test]
    fn derived_views() {
        let assignment = PartitionAssignment::new(
            3,
            4,
            ownership(&[(0, &[(0, 0)]), (2, &[(2, 1), (3, 0)]), (5, &[])]),
        )
        .unwrap();

        assert_eq!(assignment.version(), 3);
        assert_eq!(assignment.num_endpoints(), 2);
        assert_eq!(assignment.server_ids(), BTreeSet::from([0, 2]));
        assert_eq!(assignment.partitions_for(0), &[PartitionInfo::new(0, 0)]);
        assert_eq!(
            assignment.partitions_for(2),
            &[PartitionInfo::new(2, 1), PartitionInfo::new(3, 0)]
        );
        assert!(assignment.partitions_for(5).is_empty());
        assert_eq!(assignment.owner_of(2), Some(2));
        assert_eq!(assignment.owner_of(1), None);
    }

    #[test]
    fn rejects_out_of_range_partition() {
        let result = PartitionAssignment::new(0, 2, ownership(&[(0, &[(2, 0)])]));
        assert_eq!(
            result,
            Err(AssignmentError::PartitionOutOfRange {
                partition: 2,
                num_partitions: 2,
            })
        );
    }

    #[test]
    fn rejects_double_ownership() {
        let result =
            PartitionAssignment::new(0, 4, ownership(&[(0, &[(1, 0)]), (1, &[(1, 2)])]));
        assert_eq!(result, Err(AssignmentError::DuplicateOwner(1)));
    }
}
