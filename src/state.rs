/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 *   - bearer: token lookup + verification used by guards and extractors
 *   - issuer: signs tokens for the demo session endpoint (None when only a public key is configured)
 * - Clone-cheap (everything behind Arc)
 */
use std::sync::Arc;

use crate::services::access::{TokenBearer, TokenIssuer};

#[derive(Clone, Debug)]
pub struct AppState {
    pub bearer: Arc<TokenBearer>,
    pub issuer: Option<Arc<TokenIssuer>>,
    pub token_ttl_seconds: u64,
}

impl AppState {
    pub fn new(
        bearer: Arc<TokenBearer>,
        issuer: Option<Arc<TokenIssuer>>,
        token_ttl_seconds: u64,
    ) -> Self {
        Self {
            bearer,
            issuer,
            token_ttl_seconds,
        }
    }
}
