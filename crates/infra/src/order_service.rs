//! Order administration: the write path of the status lifecycle.
//!
//! ```text
//! command
//!   -> load order document (typed, schema-checked)
//!   -> Order::handle (pure decision, yields events)
//!   -> Order::apply each event
//!   -> patch status / tracking_number / updated_at
//! ```
//!
//! Each command is a single document update. Concurrent admins are
//! last-writer-wins; the store offers nothing stronger.

use chrono::{DateTime, Utc};

use storefront_core::{Aggregate, AggregateRoot, DomainError, DomainResult, OrderId};
use storefront_orders::{
    Actor, AttachTrackingNumber, ChangeStatus, Order, OrderCommand, OrderEvent, OrderStatus,
};

use crate::document_store::DocumentStore;
use crate::repository::OrderRepository;

/// Outcome of a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executed {
    pub order: Order,
    pub events: Vec<OrderEvent>,
}

#[derive(Debug, Clone)]
pub struct OrderAdminService<D> {
    orders: OrderRepository<D>,
}

impl<D> OrderAdminService<D>
where
    D: DocumentStore,
{
    pub fn new(store: D) -> Self {
        Self {
            orders: OrderRepository::new(store),
        }
    }

    pub fn orders(&self) -> &OrderRepository<D> {
        &self.orders
    }

    /// Run a lifecycle command against a stored order.
    ///
    /// Non-admin actors are rejected before the order is read, so the
    /// response does not reveal whether the order exists.
    pub async fn execute(&self, command: OrderCommand) -> DomainResult<Executed> {
        if !command.actor().admin {
            return Err(DomainError::Unauthorized);
        }

        let mut order = self.orders.get(command.order_id()).await?;
        let events = order.handle(&command).inspect_err(|e| {
            tracing::info!(order_id = %command.order_id(), error = %e, "order command rejected");
        })?;

        for event in &events {
            order.apply(event);
        }

        self.orders.save_lifecycle(&order).await?;

        for event in &events {
            tracing::info!(
                order_id = %order.id(),
                event_type = event.event_type(),
                status = %order.status(),
                actor = %command.actor().customer_id,
                "order updated"
            );
        }

        Ok(Executed { order, events })
    }

    pub async fn change_status(
        &self,
        actor: Actor,
        order_id: OrderId,
        to: OrderStatus,
        tracking_number: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Order> {
        let command = OrderCommand::ChangeStatus(ChangeStatus {
            order_id,
            actor,
            to,
            tracking_number,
            occurred_at: now,
        });
        Ok(self.execute(command).await?.order)
    }

    pub async fn attach_tracking_number(
        &self,
        actor: Actor,
        order_id: OrderId,
        tracking_number: String,
        now: DateTime<Utc>,
    ) -> DomainResult<Order> {
        let command = OrderCommand::AttachTrackingNumber(AttachTrackingNumber {
            order_id,
            actor,
            tracking_number,
            occurred_at: now,
        });
        Ok(self.execute(command).await?.order)
    }
}
