use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use orderflow_core::{OrderId, UserId};
use orderflow_orders::{Order, OrderSource, OrderStore, Outcome, Priority, SourceError, StoreError};

/// In-memory order repository acting as both order source and order store.
///
/// Intended for tests/dev. Order ids are unique across users: `update` only
/// carries an id, so it is resolved to its owner through an id index and a
/// second order with a stored id is refused. Updates can be made to fail for
/// chosen order ids.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<Orders>,
    rejected_updates: RwLock<HashSet<OrderId>>,
}

#[derive(Debug, Default)]
struct Orders {
    by_user: BTreeMap<UserId, Vec<Order>>,
    owners: HashMap<OrderId, UserId>,
}

impl Orders {
    fn insert(&mut self, user_id: UserId, order: Order) -> Result<(), StoreError> {
        if self.owners.contains_key(&order.id()) {
            return Err(StoreError::Duplicate(order.id()));
        }
        self.owners.insert(order.id(), user_id);
        self.by_user.entry(user_id).or_default().push(order);
        Ok(())
    }

    fn find_mut(&mut self, order_id: OrderId) -> Option<&mut Order> {
        let owner = *self.owners.get(&order_id)?;
        self.by_user
            .get_mut(&owner)?
            .iter_mut()
            .find(|o| o.id() == order_id)
    }
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `user_id` with `orders`; fails on the first id that is already stored.
    pub fn with_orders(
        mut self,
        user_id: UserId,
        orders: impl IntoIterator<Item = Order>,
    ) -> Result<Self, StoreError> {
        let stored = self
            .orders
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for order in orders {
            stored.insert(user_id, order)?;
        }
        Ok(self)
    }

    pub fn insert(&self, user_id: UserId, order: Order) -> Result<(), StoreError> {
        let mut orders = self.orders.write().map_err(|_| StoreError::Poisoned)?;
        orders.insert(user_id, order)
    }

    /// Make every later `update` for `order_id` answer `false`.
    pub fn reject_updates_for(&self, order_id: OrderId) -> Result<(), StoreError> {
        let mut rejected = self
            .rejected_updates
            .write()
            .map_err(|_| StoreError::Poisoned)?;
        rejected.insert(order_id);
        Ok(())
    }
}

impl OrderSource for InMemoryOrderRepository {
    fn get_orders(&self, user_id: UserId) -> Result<Vec<Order>, SourceError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| SourceError::Unavailable("lock poisoned".into()))?;
        Ok(orders.by_user.get(&user_id).cloned().unwrap_or_default())
    }
}

impl OrderStore for InMemoryOrderRepository {
    fn update(
        &self,
        order_id: OrderId,
        outcome: Outcome,
        priority: Priority,
    ) -> Result<bool, StoreError> {
        let rejected = self
            .rejected_updates
            .read()
            .map_err(|_| StoreError::Poisoned)?
            .contains(&order_id);
        if rejected {
            return Ok(false);
        }

        let mut orders = self.orders.write().map_err(|_| StoreError::Poisoned)?;
        match orders.find_mut(order_id) {
            Some(order) => {
                order.set_outcome(outcome);
                order.set_priority(priority);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
