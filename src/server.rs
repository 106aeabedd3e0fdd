use {
    crate::error::{AssignmentError, AssignmentResult},
    std::{fmt, str::FromStr},
};

/// Identifier of a worker server, assigned by the surrounding coordinator.
pub type ServerId = u32;

/// Identifier of a partition, a logical unit of work in `[0, num_partitions)`.
pub type PartitionId = u32;

/// Network address of a worker server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Creates a new endpoint.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = AssignmentError;

    /// Parses an endpoint from its `host:port` form.
    fn from_str(s: &str) -> AssignmentResult<Self> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| AssignmentError::InvalidEndpoint(s.to_string()))?;
        if host.is_empty() {
            return Err(AssignmentError::InvalidEndpoint(s.to_string()));
        }
        let port = port
            .parse()
            .map_err(|_| AssignmentError::InvalidEndpoint(s.to_string()))?;

        Ok(Self::new(host, port))
    }
}

/// Description of a live worker server, as reported by the membership tracker.
///
/// The weight is a relative capacity unit, not an absolute partition count:
/// the balancer converges towards each server owning a share of partitions
/// proportional to its weight. A zero weight marks the server as having no
/// capacity, so it receives no partitions through balancing, though it may
/// still claim partitions through its preference list.
///
/// `preferred_partitions` expresses explicit placement intent (e.g. data
/// locality) and takes priority over weight-based balancing. Entries are
/// processed in list order; duplicates after the first are no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDescriptor {
    weight: u32,
    endpoint: Endpoint,
    preferred_partitions: Vec<PartitionId>,
}

impl ServerDescriptor {
    /// Creates a new server descriptor.
    pub fn new(
        weight: u32,
        endpoint: Endpoint,
        preferred_partitions: impl Into<Vec<PartitionId>>,
    ) -> Self {
        Self {
            weight,
            endpoint,
            preferred_partitions: preferred_partitions.into(),
        }
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Partitions this server asks to own, in priority order.
    pub fn preferred_partitions(&self) -> &[PartitionId] {
        &self.preferred_partitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_display_roundtrip() {
        let endpoint = Endpoint::new("host0", 6000);
        assert_eq!(endpoint.to_string(), "host0:6000");
        assert_eq!("host0:6000".parse(), Ok(endpoint));
    }

    #[test]
    fn endpoint_parse_errors() {
        for s in ["host0", ":6000", "host0:", "host0:notaport", ""] {
            assert_eq!(
                s.parse::<Endpoint>(),
                Err(AssignmentError::InvalidEndpoint(s.to_string())),
                "expected {s:?} to be rejected"
            );
        }
    }

    #[test]
    fn descriptor_accessors() {
        let server = ServerDescriptor::new(2, Endpoint::new("host1", 6000), vec![3, 1]);
        assert_eq!(server.weight(), 2);
        assert_eq!(server.endpoint().host(), "host1");
        assert_eq!(server.preferred_partitions(), &[3, 1]);
    }
}
