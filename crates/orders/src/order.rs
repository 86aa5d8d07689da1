use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{
    Aggregate, AggregateRoot, CustomerId, DomainError, DomainResult, Money, OrderId,
};
use storefront_customers::Address;

use crate::line_item::LineItem;
use crate::status::OrderStatus;
use crate::totals::{OrderTotals, compute_totals};

/// Stored shape of an order document.
///
/// Orders are written by the checkout collaborator; this crate only reads
/// them and patches `status`, `tracking_number` and `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub items: Vec<LineItem>,
    pub shipping_price: Money,
    /// Total as computed at checkout.
    pub total: Money,
    pub status: OrderStatus,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Who is issuing a lifecycle command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub customer_id: CustomerId,
    pub admin: bool,
}

impl Actor {
    pub fn admin(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            admin: true,
        }
    }

    pub fn customer(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            admin: false,
        }
    }
}

/// Aggregate root: Order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    items: Vec<LineItem>,
    shipping_price: Money,
    stored_total: Money,
    status: OrderStatus,
    tracking_number: Option<String>,
    shipping_address: Option<Address>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl Order {
    /// Rehydrate from a stored document.
    pub fn from_record(record: OrderRecord) -> Self {
        Self {
            id: record.id,
            customer_id: record.customer_id,
            items: record.items,
            shipping_price: record.shipping_price,
            stored_total: record.total,
            status: record.status,
            tracking_number: record.tracking_number,
            shipping_address: record.shipping_address,
            created_at: record.created_at,
            updated_at: record.updated_at,
            version: 0,
        }
    }

    /// Convert back into the stored shape, writing the recomputed total when
    /// the line items can be priced.
    pub fn to_record(&self) -> OrderRecord {
        let total = self
            .totals()
            .map(|t| t.total)
            .unwrap_or(self.stored_total);

        OrderRecord {
            id: self.id,
            customer_id: self.customer_id,
            items: self.items.clone(),
            shipping_price: self.shipping_price,
            total,
            status: self.status,
            tracking_number: self.tracking_number.clone(),
            shipping_address: self.shipping_address.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn shipping_price(&self) -> Money {
        self.shipping_price
    }

    pub fn stored_total(&self) -> Money {
        self.stored_total
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn tracking_number(&self) -> Option<&str> {
        self.tracking_number.as_deref()
    }

    pub fn shipping_address(&self) -> Option<&Address> {
        self.shipping_address.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_owned_by(&self, customer_id: CustomerId) -> bool {
        self.customer_id == customer_id
    }

    /// Price the order from its line items.
    pub fn totals(&self) -> DomainResult<OrderTotals> {
        compute_totals(&self.items, self.shipping_price)
    }

    /// `Some((stored, computed))` when the checkout total disagrees with the
    /// line items.
    pub fn total_mismatch(&self) -> Option<(Money, Money)> {
        let computed = self.totals().ok()?.total;
        (computed != self.stored_total).then_some((self.stored_total, computed))
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: ChangeStatus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeStatus {
    pub order_id: OrderId,
    pub actor: Actor,
    pub to: OrderStatus,
    /// Optional tracking number to attach together with the move.
    pub tracking_number: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AttachTrackingNumber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachTrackingNumber {
    pub order_id: OrderId,
    pub actor: Actor,
    pub tracking_number: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderCommand {
    ChangeStatus(ChangeStatus),
    AttachTrackingNumber(AttachTrackingNumber),
}

impl OrderCommand {
    pub fn order_id(&self) -> OrderId {
        match self {
            OrderCommand::ChangeStatus(c) => c.order_id,
            OrderCommand::AttachTrackingNumber(c) => c.order_id,
        }
    }

    pub fn actor(&self) -> Actor {
        match self {
            OrderCommand::ChangeStatus(c) => c.actor,
            OrderCommand::AttachTrackingNumber(c) => c.actor,
        }
    }
}

/// Event: StatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChanged {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TrackingNumberAttached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingNumberAttached {
    pub order_id: OrderId,
    pub tracking_number: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    StatusChanged(StatusChanged),
    TrackingNumberAttached(TrackingNumberAttached),
}

impl OrderEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::StatusChanged(_) => "orders.order.status_changed",
            OrderEvent::TrackingNumberAttached(_) => "orders.order.tracking_attached",
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderEvent::StatusChanged(e) => e.occurred_at,
            OrderEvent::TrackingNumberAttached(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Order {
    type Command = OrderCommand;
    type Event = OrderEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::StatusChanged(e) => {
                self.status = e.to;
                self.updated_at = e.occurred_at;
            }
            OrderEvent::TrackingNumberAttached(e) => {
                self.tracking_number = Some(e.tracking_number.clone());
                self.updated_at = e.occurred_at;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            OrderCommand::ChangeStatus(cmd) => self.handle_change_status(cmd),
            OrderCommand::AttachTrackingNumber(cmd) => self.handle_attach_tracking(cmd),
        }
    }
}

impl Order {
    fn ensure_order_id(&self, order_id: OrderId) -> Result<(), DomainError> {
        if self.id != order_id {
            return Err(DomainError::validation("order_id mismatch"));
        }
        Ok(())
    }

    fn ensure_admin(actor: &Actor) -> Result<(), DomainError> {
        if !actor.admin {
            return Err(DomainError::Unauthorized);
        }
        Ok(())
    }

    fn normalize_tracking(raw: &str) -> Result<String, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("tracking number must not be empty"));
        }
        Ok(trimmed.to_string())
    }

    fn handle_change_status(&self, cmd: &ChangeStatus) -> Result<Vec<OrderEvent>, DomainError> {
        Self::ensure_admin(&cmd.actor)?;
        self.ensure_order_id(cmd.order_id)?;

        if !self.status.can_transition_to(cmd.to) {
            return Err(DomainError::invalid_transition(self.status, cmd.to));
        }

        let mut events = vec![OrderEvent::StatusChanged(StatusChanged {
            order_id: cmd.order_id,
            from: self.status,
            to: cmd.to,
            occurred_at: cmd.occurred_at,
        })];

        if let Some(raw) = &cmd.tracking_number {
            if !cmd.to.accepts_tracking_number() {
                return Err(DomainError::validation(format!(
                    "tracking number cannot be attached to a {} order",
                    cmd.to
                )));
            }
            events.push(OrderEvent::TrackingNumberAttached(TrackingNumberAttached {
                order_id: cmd.order_id,
                tracking_number: Self::normalize_tracking(raw)?,
                occurred_at: cmd.occurred_at,
            }));
        }

        Ok(events)
    }

    fn handle_attach_tracking(
        &self,
        cmd: &AttachTrackingNumber,
    ) -> Result<Vec<OrderEvent>, DomainError> {
        Self::ensure_admin(&cmd.actor)?;
        self.ensure_order_id(cmd.order_id)?;

        if !self.status.accepts_tracking_number() {
            return Err(DomainError::validation(format!(
                "tracking number cannot be attached to a {} order",
                self.status
            )));
        }

        Ok(vec![OrderEvent::TrackingNumberAttached(TrackingNumberAttached {
            order_id: cmd.order_id,
            tracking_number: Self::normalize_tracking(&cmd.tracking_number)?,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::ProductId;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn admin() -> Actor {
        Actor::admin(CustomerId::new())
    }

    fn order_in(status: OrderStatus) -> Order {
        let now = test_time();
        Order::from_record(OrderRecord {
            id: OrderId::new(),
            customer_id: CustomerId::new(),
            items: vec![
                LineItem::new(ProductId::new(), "Mug", Money::from_minor(100), 2),
                LineItem::new(ProductId::new(), "Tee", Money::from_minor(50), 1)
                    .with_discount(Money::from_minor(40)),
            ],
            shipping_price: Money::from_minor(20),
            total: Money::from_minor(260),
            status,
            tracking_number: None,
            shipping_address: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn change(order: &Order, actor: Actor, to: OrderStatus) -> OrderCommand {
        OrderCommand::ChangeStatus(ChangeStatus {
            order_id: *order.id(),
            actor,
            to,
            tracking_number: None,
            occurred_at: test_time(),
        })
    }

    fn run(order: &mut Order, cmd: OrderCommand) -> Result<(), DomainError> {
        let events = order.handle(&cmd)?;
        for e in &events {
            order.apply(e);
        }
        Ok(())
    }

    #[test]
    fn pending_order_can_be_accepted() {
        let mut order = order_in(OrderStatus::Pending);
        let events = order.handle(&change(&order, admin(), OrderStatus::Accepted)).unwrap();
        assert_eq!(events.len(), 1);

        match &events[0] {
            OrderEvent::StatusChanged(e) => {
                assert_eq!(e.from, OrderStatus::Pending);
                assert_eq!(e.to, OrderStatus::Accepted);
            }
            _ => panic!("Expected StatusChanged event"),
        }

        order.apply(&events[0]);
        assert_eq!(order.status(), OrderStatus::Accepted);
    }

    #[test]
    fn full_lifecycle_pending_to_delivered() {
        let mut order = order_in(OrderStatus::Pending);
        for next in [OrderStatus::Accepted, OrderStatus::Shipped, OrderStatus::Delivered] {
            let cmd = change(&order, admin(), next);
            run(&mut order, cmd).unwrap();
            assert_eq!(order.status(), next);
        }
        assert_eq!(order.version(), 3);
    }

    #[test]
    fn non_admin_cannot_change_status() {
        let order = order_in(OrderStatus::Pending);
        let actor = Actor::customer(order.customer_id());
        let err = order.handle(&change(&order, actor, OrderStatus::Accepted)).unwrap_err();
        assert_eq!(err, DomainError::Unauthorized);
    }

    #[test]
    fn illegal_transition_is_rejected() {
        let order = order_in(OrderStatus::Delivered);
        let err = order.handle(&change(&order, admin(), OrderStatus::Pending)).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTransition {
                from: "delivered".to_string(),
                to: "pending".to_string(),
            }
        );
    }

    #[test]
    fn nothing_leaves_a_terminal_state() {
        for terminal in [OrderStatus::Rejected, OrderStatus::Delivered] {
            let order = order_in(terminal);
            for to in OrderStatus::ALL {
                let err = order.handle(&change(&order, admin(), to)).unwrap_err();
                assert!(matches!(err, DomainError::InvalidTransition { .. }), "{terminal} -> {to}");
            }
        }
    }

    #[test]
    fn tracking_number_survives_delivery() {
        let mut order = order_in(OrderStatus::Shipped);
        let attach = OrderCommand::AttachTrackingNumber(AttachTrackingNumber {
            order_id: *order.id(),
            actor: admin(),
            tracking_number: "AWB123".to_string(),
            occurred_at: test_time(),
        });
        run(&mut order, attach).unwrap();

        let deliver = change(&order, admin(), OrderStatus::Delivered);
        run(&mut order, deliver).unwrap();

        assert_eq!(order.status(), OrderStatus::Delivered);
        assert_eq!(order.tracking_number(), Some("AWB123"));
    }

    #[test]
    fn shipping_with_tracking_emits_both_events() {
        let order = order_in(OrderStatus::Accepted);
        let cmd = OrderCommand::ChangeStatus(ChangeStatus {
            order_id: *order.id(),
            actor: admin(),
            to: OrderStatus::Shipped,
            tracking_number: Some("  1Z999AA1  ".to_string()),
            occurred_at: test_time(),
        });

        let events = order.handle(&cmd).unwrap();
        assert_eq!(events.len(), 2);
        match &events[1] {
            OrderEvent::TrackingNumberAttached(e) => assert_eq!(e.tracking_number, "1Z999AA1"),
            _ => panic!("Expected TrackingNumberAttached event"),
        }
    }

    #[test]
    fn tracking_number_rejected_before_shipping() {
        let order = order_in(OrderStatus::Accepted);
        let cmd = OrderCommand::AttachTrackingNumber(AttachTrackingNumber {
            order_id: *order.id(),
            actor: admin(),
            tracking_number: "AWB123".to_string(),
            occurred_at: test_time(),
        });
        assert!(matches!(order.handle(&cmd).unwrap_err(), DomainError::Validation(_)));
    }

    #[test]
    fn blank_tracking_number_is_rejected() {
        let order = order_in(OrderStatus::Shipped);
        let cmd = OrderCommand::AttachTrackingNumber(AttachTrackingNumber {
            order_id: *order.id(),
            actor: admin(),
            tracking_number: "   ".to_string(),
            occurred_at: test_time(),
        });
        assert!(matches!(order.handle(&cmd).unwrap_err(), DomainError::Validation(_)));
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let order = order_in(OrderStatus::Pending);
        let before = order.clone();

        let cmd = change(&order, admin(), OrderStatus::Accepted);
        let events1 = order.handle(&cmd).unwrap();
        let events2 = order.handle(&cmd).unwrap();

        assert_eq!(order, before);
        assert_eq!(events1, events2);
    }

    #[test]
    fn totals_match_checkout_total() {
        let order = order_in(OrderStatus::Pending);
        assert_eq!(order.totals().unwrap().total, Money::from_minor(260));
        assert_eq!(order.total_mismatch(), None);
    }

    #[test]
    fn drifted_stored_total_is_detected_and_rewritten() {
        let mut record = order_in(OrderStatus::Pending).to_record();
        record.total = Money::from_minor(999);
        let order = Order::from_record(record);

        assert_eq!(
            order.total_mismatch(),
            Some((Money::from_minor(999), Money::from_minor(260)))
        );
        assert_eq!(order.to_record().total, Money::from_minor(260));
    }
}
