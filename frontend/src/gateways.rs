//! Payment and gift delivery over the Telegram client and the backend API.

use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use gloo_net::http::Request;
use roulette_shared::api::{InvoiceResponse, RouletteWinRequest};
use roulette_shared::catalog::{GiftId, PriceTier};
use roulette_shared::constants::{INIT_DATA_HEADER, INVOICE_ENDPOINT, ROULETTE_WIN_ENDPOINT};
use roulette_shared::gateway::{GiftDeliveryService, PaymentGateway, PaymentOutcome};
use roulette_shared::RouletteError;

use crate::config::get_api_base_url;
use crate::telegram;

pub struct TelegramPayments;

async fn fetch_invoice_link(tier: PriceTier) -> Result<String, RouletteError> {
    let url = format!("{}{}?amount={}", get_api_base_url(), INVOICE_ENDPOINT, tier.stars());
    let init_data = telegram::init_data().unwrap_or_default();

    let response = Request::get(&url)
        .header(INIT_DATA_HEADER, &init_data)
        .send()
        .await
        .map_err(|e| RouletteError::PaymentRequestFailed(e.to_string()))?;

    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        return Err(RouletteError::PaymentRequestFailed(format!(
            "invoice endpoint answered {}: {}",
            response.status(),
            body
        )));
    }

    let invoice: InvoiceResponse = response
        .json()
        .await
        .map_err(|e| RouletteError::PaymentRequestFailed(e.to_string()))?;
    Ok(invoice.invoice_link)
}

async fn pay(tier: PriceTier) -> Result<PaymentOutcome, RouletteError> {
    let link = fetch_invoice_link(tier).await?;

    let (sender, receiver) = oneshot::channel::<String>();
    if !telegram::open_invoice(&link, move |status| {
        let _ = sender.send(status);
    }) {
        return Err(RouletteError::PaymentRequestFailed("could not open the invoice".to_string()));
    }

    let status = receiver
        .await
        .map_err(|_| RouletteError::PaymentRequestFailed("invoice closed without a status".to_string()))?;
    log::info!("Invoice for {} stars closed with status {}", tier.stars(), status);
    status.parse()
}

impl PaymentGateway for TelegramPayments {
    fn is_available(&self) -> bool {
        telegram::supports_invoices()
    }

    fn request_payment(&self, tier: PriceTier) -> LocalBoxFuture<'static, Result<PaymentOutcome, RouletteError>> {
        pay(tier).boxed_local()
    }
}

pub struct TelegramGiftDelivery;

async fn post_win(gift: GiftId, tier: PriceTier) -> Result<(), RouletteError> {
    let url = format!("{}{}", get_api_base_url(), ROULETTE_WIN_ENDPOINT);
    let init_data = telegram::init_data().unwrap_or_default();
    let mut body = RouletteWinRequest::new(gift, tier);
    body.init_data = Some(init_data.clone());

    let response = Request::post(&url)
        .header(INIT_DATA_HEADER, &init_data)
        .json(&body)
        .map_err(|e| RouletteError::DeliveryConfirmationFailed(e.to_string()))?
        .send()
        .await
        .map_err(|e| RouletteError::DeliveryConfirmationFailed(e.to_string()))?;

    if response.ok() {
        Ok(())
    } else {
        Err(RouletteError::DeliveryConfirmationFailed(format!(
            "win endpoint answered {}",
            response.status()
        )))
    }
}

impl GiftDeliveryService for TelegramGiftDelivery {
    fn record_win(&self, gift: GiftId, tier: PriceTier) -> LocalBoxFuture<'static, Result<(), RouletteError>> {
        post_win(gift, tier).boxed_local()
    }
}
