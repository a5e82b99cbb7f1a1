use serde::Serialize;

/// Urgency tier attached to a message when it is sent.
///
/// Tiers are ordered `UberHighSingleton ≻ High ≻ Normal` at dequeue time and
/// preserve submission order within a tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum MessagePriority {
    /// Default tier; FIFO among normal messages.
    #[default]
    Normal,
    /// Overtakes every pending normal message without preempting the handler
    /// currently running.
    High,
    /// Highest tier. A queue holds at most one pending message of a given kind
    /// at this tier; a newer push replaces the pending one.
    UberHighSingleton,
}

impl MessagePriority {
    /// All tiers ordered from most to least urgent.
    pub const ALL: [MessagePriority; 3] = [
        MessagePriority::UberHighSingleton,
        MessagePriority::High,
        MessagePriority::Normal,
    ];

    /// Returns `true` for the collapsing tier.
    pub fn is_singleton(self) -> bool {
        matches!(self, MessagePriority::UberHighSingleton)
    }
}

impl std::fmt::Display for MessagePriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MessagePriority::Normal => "normal",
            MessagePriority::High => "high",
            MessagePriority::UberHighSingleton => "uber-high-singleton",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_normal() {
        assert_eq!(MessagePriority::default(), MessagePriority::Normal);
        assert!(!MessagePriority::High.is_singleton());
        assert!(MessagePriority::UberHighSingleton.is_singleton());
    }
}
