//! Types shared between handlers and the session.

pub mod session_keys {
    //! Keys for values stored in the visitor session.

    /// The visitor's [`Cart`](crate::cart::Cart).
    pub const CART: &str = "cart";

    /// In-progress [`CheckoutSession`](crate::checkout::CheckoutSession).
    pub const CHECKOUT: &str = "checkout";

    /// Most recent [`OrderConfirmation`](crate::checkout::OrderConfirmation).
    pub const LAST_ORDER: &str = "last_order";
}
