//! Demo data set: one user with one order of every kind of outcome.

use orderflow_core::{DomainResult, OrderId, UserId};
use orderflow_infra::{InMemoryOrderRepository, ScriptedApiClient};
use orderflow_orders::{ApiResponse, Order, OrderCategory};

pub const DEMO_USER: UserId = UserId::new(1);

pub fn orders() -> DomainResult<Vec<Order>> {
    let seed = [
        (1, OrderCategory::Export, 100.0, false),
        (2, OrderCategory::Export, 180.0, false),
        (3, OrderCategory::Api, 80.0, true),
        (4, OrderCategory::Api, 120.0, false),
        (5, OrderCategory::Simple, 250.0, true),
        (6, OrderCategory::Simple, 150.0, false),
        (7, OrderCategory::Unknown, 50.0, false),
    ];

    seed.into_iter()
        .map(|(id, category, amount, flag)| {
            Order::new(OrderId::new(id), category, amount, flag)
        })
        .collect()
}

pub fn repository() -> anyhow::Result<InMemoryOrderRepository> {
    let repo = InMemoryOrderRepository::new()
        .with_orders(DEMO_USER, orders()?)?;
    Ok(repo)
}

/// Order 3 is rejected by the API, order 4 gets a high payload, the rest a zero payload.
pub fn api_client() -> ScriptedApiClient {
    ScriptedApiClient::new(ApiResponse::new("success", 0.0))
        .respond(OrderId::new(3), ApiResponse::new("failed", 0.0))
        .respond(OrderId::new(4), ApiResponse::new("success", 60.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderflow_orders::OrderSource;

    #[test]
    fn demo_user_owns_seven_orders() {
        let repo = repository().unwrap();
        let ids: Vec<u64> = repo
            .get_orders(DEMO_USER)
            .unwrap()
            .iter()
            .map(|o| o.id().get())
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
    }
}
