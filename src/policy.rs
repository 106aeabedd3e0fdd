use {
    crate::{
        AssignmentPolicy,
        assignment::{PartitionAssignment, PartitionInfo},
        server::{PartitionId, ServerDescriptor, ServerId},
    },
    rapidhash::RapidBuildHasher,
    std::collections::{BTreeMap, HashMap, HashSet},
    tracing::{debug, trace},
};

/// Incremental, weight-proportional assignment policy.
///
/// Each [`update`](AssignmentPolicy::update) call transforms the previous
/// snapshot into the next one:
///
/// 1. Ownership is carried over for partitions whose owner is still live and
///    whose id is still within `[0, num_partitions)`; everything else becomes
///    an orphan.
/// 2. Preferred partitions are claimed in ascending server id order. The
///    lowest server id claiming a partition wins the round; competing claims
///    by higher ids are ignored.
/// 3. Orphans are placed greedily, each on the server with the lowest
///    owned-count to weight ratio at that moment (ties to the lowest server
///    id). Only the orphans move, so churn stays proportional to the
///    membership change that caused it.
/// 4. Every partition whose owner changed has its generation incremented by
///    one; all others keep their generation.
///
/// The policy holds no state. Identical arguments always produce an identical
/// snapshot, so any coordinator replica can recompute the assignment
/// independently, as long as publication is serialized externally.
#[derive(Debug, Default, Clone, Copy)]
pub struct DynamicPartitionAssignmentPolicy;

impl AssignmentPolicy for DynamicPartitionAssignmentPolicy {
    fn update(
        &self,
        version: u64,
        previous: &PartitionAssignment,
        num_partitions: u32,
        live_servers: &BTreeMap<ServerId, ServerDescriptor>,
    ) -> PartitionAssignment {
        debug!(
            version,
            num_partitions,
            num_servers = live_servers.len(),
            "recomputing partition assignment"
        );

        // The generation ledger is keyed by partition, not by owner: an
        // orphaned partition must keep its lineage while unowned. Partitions
        // dropped by a shrink of the id space lose their history here.
        let mut last_generation: HashMap<PartitionId, u64, RapidBuildHasher> = HashMap::default();
        let mut previous_owner: HashMap<PartitionId, ServerId, RapidBuildHasher> =
            HashMap::default();
        for (server_id, partitions) in previous.servers() {
            for info in partitions {
                if info.partition_id < num_partitions {
                    last_generation.insert(info.partition_id, info.generation);
                    previous_owner.insert(info.partition_id, server_id);
                }
            }
        }

        // Carry over ownership where the owner is still live. The map is
        // ordered by partition id, which fixes the order of the final
        // per-server lists.
        let mut owner: BTreeMap<PartitionId, ServerId> = previous_owner
            .iter()
            .filter(|(_, server_id)| live_servers.contains_key(server_id))
            .map(|(&partition_id, &server_id)| (partition_id, server_id))
            .collect();

        // Resolve preferred placements in ascending server id order. A server
        // claiming a partition it already owns still marks it claimed, so a
        // higher id listing the same partition loses the round either way.
        let mut claimed: HashSet<PartitionId, RapidBuildHasher> = HashSet::default();
        for (&server_id, descriptor) in live_servers {
            for &partition_id in descriptor.preferred_partitions() {
                if partition_id >= num_partitions || !claimed.insert(partition_id) {
                    continue;
                }
                let from = owner.insert(partition_id, server_id);
                if from != Some(server_id) {
                    trace!(
                        partition = partition_id,
                        from = ?from,
                        to = server_id,
                        "preferred placement"
                    );
                }
            }
        }

        // Place each orphan on the server with the lowest load ratio,
        // updating that server's count before the next orphan.
        let mut owned_count: BTreeMap<ServerId, u64> = BTreeMap::new();
        for &server_id in owner.values() {
            *owned_count.entry(server_id).or_insert(0) += 1;
        }
        for partition_id in 0..num_partitions {
            if owner.contains_key(&partition_id) {
                continue;
            }
            let Some(target) = least_loaded(live_servers, &owned_count) else {
                // No live server with capacity; the orphan stays unowned.
                continue;
            };
            owner.insert(partition_id, target);
            *owned_count.entry(target).or_insert(0) += 1;
            trace!(partition = partition_id, to = target, "orphan placement");
        }

        // Assemble the snapshot, bumping the generation of every partition
        // whose owner differs from the previous snapshot (including those
        // that were unowned).
        let mut ownership: BTreeMap<ServerId, Vec<PartitionInfo>> = BTreeMap::new();
        for (&partition_id, &server_id) in &owner {
            let last = last_generation.get(&partition_id).copied().unwrap_or(0);
            let generation = if previous_owner.get(&partition_id).copied() == Some(server_id) {
                last
            } else {
                last + 1
            };
            ownership
                .entry(server_id)
                .or_default()
                .push(PartitionInfo::new(partition_id, generation));
        }

        PartitionAssignment::from_parts(version, num_partitions, ownership)
    }
}

/// Returns the live server with the minimal owned-count to weight ratio,
/// ties broken by the lowest server id. Zero-weight servers are skipped;
/// `None` means no server has capacity.
fn least_loaded(
    live_servers: &BTreeMap<ServerId, ServerDescriptor>,
    owned_count: &BTreeMap<ServerId, u64>,
) -> Option<ServerId> {
    let mut best: Option<(ServerId, u64, u64)> = None;
    for (&server_id, descriptor) in live_servers {
        let weight = u64::from(descriptor.weight());
        if weight == 0 {
            continue;
        }
        let count = owned_count.get(&server_id).copied().unwrap_or(0);
        // count / weight < best_count / best_weight, kept in integers.
        let better = match best {
            None => true,
            Some((_, best_count, best_weight)) => count * best_weight < best_count * weight,
        };
        if better {
            best = Some((server_id, count, weight));
        }
    }

    best.map(|(server_id, _, _)| server_id)
}
