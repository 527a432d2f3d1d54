//! Client-side split of the scan list into pending and scanned tickets.

use serde::Serialize;

use crate::ticket::Ticket;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanListPartition {
    /// Tickets not yet checked in.
    pub pending: Vec<Ticket>,
    /// Tickets already checked in.
    pub scanned: Vec<Ticket>,
}

/// Partition tickets by their `checked_in` flag, keeping server order.
pub fn partition(tickets: Vec<Ticket>) -> ScanListPartition {
    let (scanned, pending) = tickets.into_iter().partition(|t| t.checked_in);
    ScanListPartition { pending, scanned }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_keeps_order_within_groups() {
        let mut b = Ticket::new("B", 1, "A2", 1, 10);
        b.checked_in = true;
        let tickets = vec![
            Ticket::new("A", 1, "A1", 1, 10),
            b,
            Ticket::new("C", 1, "A3", 1, 10),
        ];

        let split = partition(tickets);
        let pending: Vec<_> = split.pending.iter().map(|t| t.code.as_str()).collect();
        let scanned: Vec<_> = split.scanned.iter().map(|t| t.code.as_str()).collect();
        assert_eq!(pending, ["A", "C"]);
        assert_eq!(scanned, ["B"]);
    }

    #[test]
    fn empty_list_partitions_to_empty_groups() {
        assert_eq!(partition(Vec::new()), ScanListPartition::default());
    }
}
