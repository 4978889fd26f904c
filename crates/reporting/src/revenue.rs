//! Line revenue.
//!
//! Amounts never panic on overflow. A figure whose magnitude leaves the
//! `Decimal` range saturates at `Decimal::MAX` (or `Decimal::MIN` when
//! negative), and sums over such figures stay pinned there.

use rust_decimal::Decimal;

use northwind_core::OrderLine;

/// Net contribution of one order line: `unit_price * quantity * (1 - discount)`.
///
/// `discount` is a fraction of the price. Values outside `[0, 1]` are applied
/// as-is; clamping them would change historical figures.
pub fn net_amount(unit_price: Decimal, quantity: i64, discount: Decimal) -> Decimal {
    if unit_price.is_zero() || quantity == 0 {
        return Decimal::ZERO;
    }
    // Discount first: for in-range discounts the intermediate never grows.
    Decimal::ONE
        .checked_sub(discount)
        .and_then(|kept| unit_price.checked_mul(kept))
        .and_then(|per_unit| per_unit.checked_mul(Decimal::from(quantity)))
        .unwrap_or_else(|| {
            let negative =
                unit_price.is_sign_negative() ^ (quantity < 0) ^ (discount > Decimal::ONE);
            saturated(negative)
        })
}

/// Saturation bound for an overflowed amount of the given sign.
pub fn saturated(negative: bool) -> Decimal {
    if negative { Decimal::MIN } else { Decimal::MAX }
}

/// Saturating sum of amounts.
pub fn sum_amounts(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// [`net_amount`] for a line row.
pub fn line_net(line: &OrderLine) -> Decimal {
    net_amount(line.unit_price, line.quantity, line.discount)
}
