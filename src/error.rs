use crate::server::PartitionId;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum AssignmentError {
    /// Partition id lies outside the assignment's partition id space.
    #[error("Partition {partition} out of range, expected id in [0, {num_partitions})")]
    PartitionOutOfRange {
        partition: PartitionId,
        num_partitions: u32,
    },

    /// Partition appears in more than one server's list.
    #[error("Partition {0} is owned by more than one server")]
    DuplicateOwner(PartitionId),

    /// Endpoint string is not of the `host:port` form.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

pub type AssignmentResult<T> = Result<T, AssignmentError>;
