//! Checkout route handlers.
//!
//! Each step is a full page. Form submissions redirect back to
//! `GET /checkout` on success (post/redirect/get) and re-render the step
//! with field messages on validation failure.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Local;
use glowglaz_core::{CheckoutStep, PaymentMethod};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{self, Cart};
use crate::checkout::{
    self, CARD_PAYMENT_ID, COD_PAYMENT_ID, CardForm, CheckoutError, CheckoutService,
    CheckoutSession, OrderConfirmation, PendingGatewayOrder, ShippingDetails, ShippingForm,
    ValidationErrors,
};
use crate::error::{AppError, Result};
use crate::filters;
use crate::payments::PaymentVerification;
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Shown when the gateway order cannot be created.
const CREATE_ORDER_FAILED: &str = "Failed to create order. Please try again.";

/// Shown when the payment backend fails its health check.
const BACKEND_UNREACHABLE: &str =
    "Cannot connect to payment server. Please try another payment method or try again later.";

/// Shown when the gateway payment cannot be verified.
const VERIFICATION_FAILED: &str = "Payment verification failed. Please contact support.";

/// One entry in the progress indicator.
#[derive(Clone)]
pub struct StepView {
    pub number: u8,
    pub label: &'static str,
    pub active: bool,
    pub done: bool,
}

fn progress(current: CheckoutStep) -> Vec<StepView> {
    [
        CheckoutStep::Shipping,
        CheckoutStep::Payment,
        CheckoutStep::Confirmation,
    ]
    .into_iter()
    .map(|step| StepView {
        number: step.number(),
        label: step.label(),
        active: step == current,
        done: step < current,
    })
    .collect()
}

/// Payment method radio choice.
#[derive(Clone)]
pub struct MethodChoice {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn method_choices(selected: PaymentMethod) -> Vec<MethodChoice> {
    [
        PaymentMethod::Gateway,
        PaymentMethod::Card,
        PaymentMethod::CashOnDelivery,
    ]
    .into_iter()
    .map(|method| MethodChoice {
        value: method.form_value(),
        label: method.label(),
        selected: method == selected,
    })
    .collect()
}

/// Shipping step template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/shipping.html")]
pub struct ShippingTemplate {
    pub form: ShippingForm,
    pub errors: ValidationErrors,
    pub order: CartView,
    pub steps: Vec<StepView>,
    pub cart_count: u32,
}

/// Payment step template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/payment.html")]
pub struct PaymentTemplate {
    pub shipping: ShippingDetails,
    pub methods: Vec<MethodChoice>,
    pub card_name: String,
    pub errors: ValidationErrors,
    pub general_error: Option<String>,
    pub order: CartView,
    pub steps: Vec<StepView>,
    pub cart_count: u32,
}

/// Gateway hand-off template: opens the hosted payment modal.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/gateway.html")]
pub struct GatewayTemplate {
    pub gateway: PendingGatewayOrder,
    pub shipping: ShippingDetails,
    pub order: CartView,
    pub steps: Vec<StepView>,
    pub cart_count: u32,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub confirmation: OrderConfirmation,
    pub method_label: &'static str,
    pub steps: Vec<StepView>,
    pub cart_count: u32,
}

/// Payment step form. Card fields are only read for card payments.
#[derive(Debug, Deserialize)]
pub struct PaymentForm {
    #[serde(default)]
    pub payment_method: String,
    #[serde(flatten)]
    pub card: CardForm,
}

fn service(state: &AppState) -> CheckoutService<'_> {
    CheckoutService::new(state.pool(), state.payments())
}

fn to_checkout() -> Response {
    Redirect::to("/checkout").into_response()
}

/// Where to send a visitor whose cart is empty.
async fn empty_cart_redirect(session: &Session) -> Response {
    if checkout::last_confirmation(session).await.is_some() {
        Redirect::to("/checkout/confirmation").into_response()
    } else {
        Redirect::to("/").into_response()
    }
}

fn payment_page(
    checkout: &CheckoutSession,
    shipping: &ShippingDetails,
    cart: &Cart,
    card_name: String,
    errors: ValidationErrors,
    general_error: Option<String>,
) -> PaymentTemplate {
    PaymentTemplate {
        shipping: shipping.clone(),
        methods: method_choices(checkout.payment_method),
        card_name,
        errors,
        general_error,
        order: CartView::from(cart),
        steps: progress(CheckoutStep::Payment),
        cart_count: cart.item_count(),
    }
}

/// Render the page for the checkout's current step.
fn render_step(checkout: &CheckoutSession, cart: &Cart) -> Response {
    match (checkout.step, checkout.shipping.as_ref()) {
        (CheckoutStep::Payment, Some(shipping)) => match checkout.gateway_order.clone() {
            Some(gateway) => GatewayTemplate {
                gateway,
                shipping: shipping.clone(),
                order: CartView::from(cart),
                steps: progress(CheckoutStep::Payment),
                cart_count: cart.item_count(),
            }
            .into_response(),
            None => payment_page(
                checkout,
                shipping,
                cart,
                String::new(),
                ValidationErrors::new(),
                None,
            )
            .into_response(),
        },
        (CheckoutStep::Confirmation, _) => {
            Redirect::to("/checkout/confirmation").into_response()
        }
        _ => ShippingTemplate {
            form: checkout
                .shipping
                .as_ref()
                .map(ShippingDetails::to_form)
                .unwrap_or_default(),
            errors: ValidationErrors::new(),
            order: CartView::from(cart),
            steps: progress(CheckoutStep::Shipping),
            cart_count: cart.item_count(),
        }
        .into_response(),
    }
}

/// Persist the completed order and show the confirmation.
async fn finish_order(
    session: &Session,
    cart: &Cart,
    confirmation: &OrderConfirmation,
) -> Result<Response> {
    cart::save(session, cart).await?;
    checkout::reset(session).await?;
    checkout::store_confirmation(session, confirmation).await?;
    Ok(Redirect::to("/checkout/confirmation").into_response())
}

/// Send the visitor back to the current step after a stale submission.
fn stale_submission(err: CheckoutError) -> Result<Response> {
    match err {
        CheckoutError::Payment(e) => Err(AppError::Payment(e)),
        CheckoutError::PaymentDeclined => Err(AppError::Checkout(err)),
        other => {
            tracing::info!(error = %other, "Stale checkout submission");
            Ok(to_checkout())
        }
    }
}

/// Display the current checkout step.
///
/// Redirects home when there is nothing to check out.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart = cart::load(&session).await;
    if cart.is_empty() {
        return Ok(empty_cart_redirect(&session).await);
    }

    let mut checkout = checkout::load(&session).await;
    if checkout.step == CheckoutStep::Confirmation {
        checkout = CheckoutSession::new();
    }
    checkout::save(&session, &checkout).await?;
    service(&state).sync_snapshot(&checkout, &cart).await;

    Ok(render_step(&checkout, &cart))
}

/// Submit the shipping step.
#[instrument(skip(state, session, form))]
pub async fn submit_shipping(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ShippingForm>,
) -> Result<Response> {
    let cart = cart::load(&session).await;
    if cart.is_empty() {
        return Ok(empty_cart_redirect(&session).await);
    }

    let mut checkout = checkout::load(&session).await;
    if checkout.step == CheckoutStep::Confirmation {
        checkout = CheckoutSession::new();
    }

    if let Err(errors) = checkout.submit_shipping(&form) {
        tracing::debug!(fields = errors.len(), "Shipping form rejected");
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            ShippingTemplate {
                form,
                errors,
                order: CartView::from(&cart),
                steps: progress(CheckoutStep::Shipping),
                cart_count: cart.item_count(),
            },
        )
            .into_response());
    }

    checkout::save(&session, &checkout).await?;
    service(&state).sync_snapshot(&checkout, &cart).await;
    Ok(to_checkout())
}

/// Go back one step.
#[instrument(skip(session))]
pub async fn back(session: Session) -> Result<Response> {
    let mut checkout = checkout::load(&session).await;
    checkout.back();
    checkout::save(&session, &checkout).await?;
    Ok(to_checkout())
}

/// Submit the payment step.
///
/// Card and cash on delivery complete immediately. The gateway option
/// creates a gateway order and renders the page that opens the payment modal.
#[instrument(skip(state, session, form))]
pub async fn submit_payment(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PaymentForm>,
) -> Result<Response> {
    let mut cart = cart::load(&session).await;
    if cart.is_empty() {
        return Ok(empty_cart_redirect(&session).await);
    }

    let method: PaymentMethod = form
        .payment_method
        .parse()
        .map_err(|e: glowglaz_core::PaymentMethodError| AppError::BadRequest(e.to_string()))?;

    let mut checkout = checkout::load(&session).await;
    if let Err(e) = checkout.select_payment(method) {
        return stale_submission(e);
    }
    let Some(shipping) = checkout.shipping.clone() else {
        return stale_submission(CheckoutError::MissingShipping);
    };
    let service = service(&state);

    let payment_id = match method {
        PaymentMethod::Card => {
            if let Err(errors) = form.card.validate() {
                checkout::save(&session, &checkout).await?;
                let page = payment_page(
                    &checkout,
                    &shipping,
                    &cart,
                    form.card.card_name.clone(),
                    errors,
                    None,
                );
                return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
            }
            CARD_PAYMENT_ID.to_owned()
        }
        PaymentMethod::CashOnDelivery => COD_PAYMENT_ID.to_owned(),
        PaymentMethod::Gateway => {
            if !state.payments().check_connection().await {
                checkout::save(&session, &checkout).await?;
                let page = payment_page(
                    &checkout,
                    &shipping,
                    &cart,
                    String::new(),
                    ValidationErrors::new(),
                    Some(BACKEND_UNREACHABLE.to_owned()),
                );
                return Ok((StatusCode::SERVICE_UNAVAILABLE, page).into_response());
            }
            return match service.start_gateway_payment(&mut checkout, &cart).await {
                Ok(_) => {
                    checkout::save(&session, &checkout).await?;
                    Ok(render_step(&checkout, &cart))
                }
                Err(CheckoutError::Payment(e)) => {
                    tracing::error!(error = %e, "Failed to create gateway order");
                    checkout::save(&session, &checkout).await?;
                    let page = payment_page(
                        &checkout,
                        &shipping,
                        &cart,
                        String::new(),
                        ValidationErrors::new(),
                        Some(CREATE_ORDER_FAILED.to_owned()),
                    );
                    Ok((StatusCode::BAD_GATEWAY, page).into_response())
                }
                Err(e) => stale_submission(e),
            };
        }
    };

    let today = Local::now().date_naive();
    match service
        .complete_order(&mut checkout, &mut cart, payment_id, today)
        .await
    {
        Ok(confirmation) => finish_order(&session, &cart, &confirmation).await,
        Err(e) => stale_submission(e),
    }
}

/// Gateway modal callback: verify the payment and place the order.
#[instrument(skip(state, session, form), fields(order_id = %form.razorpay_order_id))]
pub async fn verify_payment(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PaymentVerification>,
) -> Result<Response> {
    let mut cart = cart::load(&session).await;
    if cart.is_empty() {
        return Ok(empty_cart_redirect(&session).await);
    }

    let mut checkout = checkout::load(&session).await;
    let today = Local::now().date_naive();

    match service(&state)
        .confirm_gateway_payment(&mut checkout, &mut cart, &form, today)
        .await
    {
        Ok(confirmation) => finish_order(&session, &cart, &confirmation).await,
        Err(
            e @ (CheckoutError::PaymentDeclined
            | CheckoutError::OrderMismatch
            | CheckoutError::Payment(_)),
        ) => {
            tracing::warn!(error = %e, "Gateway payment not accepted");
            let Some(shipping) = checkout.shipping.clone() else {
                return Ok(to_checkout());
            };
            checkout.gateway_order = None;
            checkout::save(&session, &checkout).await?;
            let page = payment_page(
                &checkout,
                &shipping,
                &cart,
                String::new(),
                ValidationErrors::new(),
                Some(VERIFICATION_FAILED.to_owned()),
            );
            Ok((StatusCode::PAYMENT_REQUIRED, page).into_response())
        }
        Err(e) => stale_submission(e),
    }
}

/// Show the most recent order confirmation.
#[instrument(skip(session))]
pub async fn confirmation(session: Session) -> Result<Response> {
    let Some(confirmation) = checkout::last_confirmation(&session).await else {
        return Ok(Redirect::to("/").into_response());
    };

    let cart_count = cart::load(&session).await.item_count();
    Ok(ConfirmationTemplate {
        method_label: confirmation.method.label(),
        confirmation,
        steps: progress(CheckoutStep::Confirmation),
        cart_count,
    }
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_marks_done_and_active_steps() {
        let steps = progress(CheckoutStep::Payment);
        assert_eq!(steps.len(), 3);
        assert!(steps[0].done && !steps[0].active);
        assert!(steps[1].active && !steps[1].done);
        assert!(!steps[2].active && !steps[2].done);
    }

    #[test]
    fn method_choices_select_one() {
        let choices = method_choices(PaymentMethod::CashOnDelivery);
        let selected: Vec<&str> = choices
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.value)
            .collect();
        assert_eq!(selected, vec!["cod"]);
    }
}
