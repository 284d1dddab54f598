use crate::core::types::{CustomerId, ItemId, RecipeId, SeatId};
use std::collections::VecDeque;

/// A customer's accepted request, bound to a seat
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub customer: CustomerId,
    pub recipe: RecipeId,
    pub result_item: ItemId,
    pub seat: SeatId,
}

/// FIFO of accepted orders, owned by the worker
#[derive(Debug, Clone, Default)]
pub struct OrderQueue {
    orders: VecDeque<Order>,
}

impl OrderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    pub fn dequeue(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(seat: usize) -> Order {
        Order {
            customer: CustomerId::new(),
            recipe: RecipeId::new("coffee"),
            result_item: ItemId::new("coffee"),
            seat: SeatId(seat),
        }
    }

    #[test]
    fn test_fifo_discipline() {
        let mut queue = OrderQueue::new();
        let first = order(0);
        let second = order(1);
        queue.enqueue(first.clone());
        queue.enqueue(second.clone());

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dequeue(), Some(first));
        assert_eq!(queue.dequeue(), Some(second));
        assert!(queue.dequeue().is_none());
        assert!(queue.is_empty());
    }
}
