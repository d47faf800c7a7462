//! Status-triggered notification templates.
//!
//! Each transition generates fixed customer-facing copy; `paid` and
//! `cancelled` also produce an operator-facing counterpart so dispatch
//! knows to assign or release a driver. Creation (`pending`) generates
//! nothing.

use crate::models::{Recipient, SystemMessage};
use crate::status::BookingStatus;

/// Messages generated when a booking enters `status`
pub fn messages_for(status: BookingStatus) -> Vec<SystemMessage> {
    let mut generated = Vec::new();

    let customer = |title: &str, body: &str| {
        SystemMessage::new(Recipient::Customer, title.to_string(), body.to_string())
    };
    let operator = |title: &str, body: &str| {
        SystemMessage::new(Recipient::Operator, title.to_string(), body.to_string())
    };

    match status {
        BookingStatus::Pending => {}
        BookingStatus::Confirmed => {
            generated.push(customer(
                "Reservation confirmed",
                "Your reservation has been confirmed. You will receive a payment request shortly.",
            ));
        }
        BookingStatus::PaymentSent => {
            generated.push(customer(
                "Payment request sent",
                "A payment request for your trip has been sent. Please complete payment to secure your booking.",
            ));
        }
        BookingStatus::Paid => {
            generated.push(customer(
                "Payment received",
                "We have received your payment. Your driver will be assigned shortly.",
            ));
            generated.push(operator(
                "Booking paid",
                "Payment cleared. Assign a driver for this trip.",
            ));
        }
        BookingStatus::OnTheWay => {
            generated.push(customer(
                "Driver on the way",
                "Your driver is on the way to the pickup address.",
            ));
        }
        BookingStatus::Arrived => {
            generated.push(customer(
                "Driver arrived",
                "Your driver has arrived at the pickup address.",
            ));
        }
        BookingStatus::InProgress => {
            generated.push(customer(
                "Trip started",
                "Your trip is underway. Enjoy the ride.",
            ));
        }
        BookingStatus::Completed => {
            generated.push(customer(
                "Trip completed",
                "Your trip is complete. Thank you for riding with us.",
            ));
        }
        BookingStatus::Cancelled => {
            generated.push(customer(
                "Reservation cancelled",
                "Your reservation has been cancelled.",
            ));
            generated.push(operator(
                "Booking cancelled",
                "The booking was cancelled. Release any assigned driver.",
            ));
        }
    }

    generated
}
