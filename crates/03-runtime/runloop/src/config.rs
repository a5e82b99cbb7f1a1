use commutator::Destination;

/// Settings for a [`crate::BusRuntime`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusConfig {
    /// Prefix of every destination thread name (`{prefix}-{destination}`).
    pub thread_name_prefix: String,
    /// Initial capacity of each FIFO tier.
    pub queue_capacity: usize,
    /// Destinations that get a queue and a thread.
    pub destinations: Vec<Destination>,
}

impl BusConfig {
    /// Name of the thread serving `destination`.
    pub fn thread_name(&self, destination: Destination) -> String {
        format!("{}-{}", self.thread_name_prefix, destination)
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            thread_name_prefix: "drape".to_string(),
            queue_capacity: 64,
            destinations: Destination::ALL.to_vec(),
        }
    }
}
