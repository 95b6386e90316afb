// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use crate::domain::parties::services::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum PartyError {
    #[error("Invalid join info token.")]
    InvalidToken,
    #[error(transparent)]
    ParseError(#[from] serde_json::Error),
    #[error(transparent)]
    TransportError(#[from] TransportError),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
