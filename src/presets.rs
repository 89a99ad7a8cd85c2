//! Ready-made lifecycles.
//!
//! These are the status tables the storefront and admin services use for
//! fulfillments, orders, partner applications and role enrollments.

use crate::core::MachineDefinition;
use crate::policy::{PolicyBuilder, TransitionPolicy};
use crate::state_enum;

state_enum! {
    /// Trial fulfillment progress.
    pub enum FulfillmentStatus {
        Pending => "pending",
        AddressCollected => "address_collected",
        OrderCreated => "order_created",
        Shipped => "shipped",
        Delivered => "delivered",
        Fulfilled => "fulfilled",
    }
}

state_enum! {
    /// Storefront order status.
    pub enum OrderStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        Processing => "processing",
        Shipped => "shipped",
        Delivered => "delivered",
        Completed => "completed",
        Cancelled => "cancelled",
        Refunded => "refunded",
    }
}

state_enum! {
    /// Service application review.
    pub enum ApplicationStatus {
        Submitted => "submitted",
        Approved => "approved",
        Rejected => "rejected",
    }
}

state_enum! {
    /// Role enrollment review.
    pub enum EnrollmentStatus {
        Pending => "pending",
        OnHold => "on_hold",
        Approved => "approved",
        Rejected => "rejected",
    }
}

/// `pending → address_collected → order_created → shipped → delivered → fulfilled`
pub fn fulfillment() -> MachineDefinition<FulfillmentStatus> {
    use FulfillmentStatus::*;

    MachineDefinition::builder()
        .states([
            Pending,
            AddressCollected,
            OrderCreated,
            Shipped,
            Delivered,
            Fulfilled,
        ])
        .initial(Pending)
        .allow(Pending, [AddressCollected])
        .allow(AddressCollected, [OrderCreated])
        .allow(OrderCreated, [Shipped])
        .allow(Shipped, [Delivered])
        .allow(Delivered, [Fulfilled])
        .terminal(Fulfilled)
        .build()
        .expect("fulfillment table should always build")
}

/// Orders can be cancelled until delivery and refunded afterwards.
pub fn order() -> MachineDefinition<OrderStatus> {
    use OrderStatus::*;

    MachineDefinition::builder()
        .states([
            Pending, Confirmed, Processing, Shipped, Delivered, Completed, Cancelled, Refunded,
        ])
        .initial(Pending)
        .allow(Pending, [Confirmed, Cancelled])
        .allow(Confirmed, [Processing, Cancelled])
        .allow(Processing, [Shipped, Cancelled])
        .allow(Shipped, [Delivered, Cancelled])
        .allow(Delivered, [Completed, Refunded])
        .allow(Completed, [Refunded])
        .allow(Cancelled, [Refunded])
        .terminal(Refunded)
        .build()
        .expect("order table should always build")
}

pub fn application() -> MachineDefinition<ApplicationStatus> {
    use ApplicationStatus::*;

    MachineDefinition::builder()
        .states([Submitted, Approved, Rejected])
        .initial(Submitted)
        .allow(Submitted, [Approved, Rejected])
        .build()
        .expect("application table should always build")
}

/// A rejection must say why.
pub fn application_policy() -> TransitionPolicy<ApplicationStatus> {
    PolicyBuilder::new()
        .require_reason_for(ApplicationStatus::Rejected)
        .build()
}

pub fn enrollment() -> MachineDefinition<EnrollmentStatus> {
    use EnrollmentStatus::*;

    MachineDefinition::builder()
        .states([Pending, OnHold, Approved, Rejected])
        .initial(Pending)
        .allow(Pending, [Approved, Rejected, OnHold])
        .allow(OnHold, [Approved, Rejected])
        .build()
        .expect("enrollment table should always build")
}

/// Reviews are attributed to an admin; rejections and holds need a reason.
pub fn enrollment_policy() -> TransitionPolicy<EnrollmentStatus> {
    PolicyBuilder::new()
        .require_actor()
        .require_reason_for(EnrollmentStatus::Rejected)
        .require_reason_for(EnrollmentStatus::OnHold)
        .build()
}
