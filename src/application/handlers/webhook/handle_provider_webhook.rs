//! HandleProviderWebhookHandler - Command handler for one provider's webhook endpoint.

use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use super::reconcile_order::{IgnoreReason, OrderReconciler, ReconciliationOutcome};
use crate::domain::webhook::{normalize, verify, ProviderProfile, WebhookError};

/// Command to handle a provider webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleProviderWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Value of the provider's signature header, if sent.
    pub signature: Option<String>,
}

/// Result of webhook processing. Both variants are acknowledged with 200.
#[derive(Debug, Clone, PartialEq)]
pub enum HandleProviderWebhookResult {
    /// Terminal event recorded as a new order.
    OrderCreated {
        order_id: Uuid,
        order_number: String,
        stock_decremented: bool,
    },
    /// Event accepted but nothing written.
    Ignored { reason: IgnoreReason },
}

/// Verifies, normalizes and reconciles deliveries for a single provider.
///
/// The secret is fixed at construction. A handler built without one rejects
/// every delivery with `MissingSecret`.
pub struct HandleProviderWebhookHandler {
    profile: &'static ProviderProfile,
    secret: Option<SecretString>,
    reconciler: OrderReconciler,
}

impl HandleProviderWebhookHandler {
    pub fn new(
        profile: &'static ProviderProfile,
        secret: Option<SecretString>,
        reconciler: OrderReconciler,
    ) -> Self {
        Self {
            profile,
            secret,
            reconciler,
        }
    }

    pub fn profile(&self) -> &'static ProviderProfile {
        self.profile
    }

    pub async fn handle(
        &self,
        cmd: HandleProviderWebhookCommand,
    ) -> Result<HandleProviderWebhookResult, WebhookError> {
        // 1. Authenticate the raw bytes before looking inside them
        let signature = cmd
            .signature
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(WebhookError::MissingSignature)?;
        let secret = self.secret.as_ref().ok_or(WebhookError::MissingSecret)?;

        if !verify(
            &cmd.payload,
            signature,
            secret.expose_secret(),
            self.profile.algorithm,
        ) {
            return Err(WebhookError::InvalidSignature);
        }

        // 2. Normalize into the provider-independent shape
        let event = normalize(self.profile, &cmd.payload)?;

        // 3. Reconcile on a detached task so a dropped connection cannot
        //    cancel writes halfway
        let reconciler = self.reconciler.clone();
        let outcome = tokio::spawn(async move { reconciler.reconcile(event).await })
            .await
            .map_err(|e| WebhookError::Internal(format!("Reconciliation task failed: {}", e)))?;

        match outcome {
            ReconciliationOutcome::Created {
                order_id,
                order_number,
                stock_decremented,
            } => Ok(HandleProviderWebhookResult::OrderCreated {
                order_id,
                order_number,
                stock_decremented,
            }),
            ReconciliationOutcome::Ignored(reason) => {
                Ok(HandleProviderWebhookResult::Ignored { reason })
            }
            ReconciliationOutcome::Failed(err) => Err(err),
        }
    }
}
