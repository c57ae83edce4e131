// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

use std::io;

/// Dispatcher failures
///
/// Only `start` returns these to the caller. Per-connection failures are
/// logged and reported as [`crate::DispatchOutcome::Failed`].
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unable to bind {address}: {source}")]
    CannotBind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid dispatcher state: {0}")]
    InvalidState(String),

    #[error("accept failed: {0}")]
    Accept(#[source] io::Error),

    #[error("failed to configure client socket: {0}")]
    Configure(#[source] io::Error),

    #[error("failed to read request: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write response: {0}")]
    Write(#[source] io::Error),

    #[error("failed to encode status: {0}")]
    Encode(#[from] serde_json::Error),
}
