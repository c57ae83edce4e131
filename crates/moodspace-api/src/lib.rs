// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! # MoodSpace API
//!
//! A deliberately small HTTP/1.0-style responder driven by the main loop.
//!
//! Each call to [`RequestDispatcher::poll_once`] tries to accept exactly one
//! connection without blocking. If one is pending it reads a single chunk,
//! picks a route by substring, writes one response and closes the socket.
//!
//! Routes:
//! - any request containing `GET /data`: status JSON
//!   (`{"caos":..,"etiqueta":"..","x":..,"y":..}`)
//! - everything else: the monitor page

pub mod dispatcher;
pub mod dtos;
pub mod error;
pub mod http;
pub mod page;

pub use dispatcher::{DispatchOutcome, DispatcherConfig, DispatcherState, RequestDispatcher};
pub use dtos::StatusDto;
pub use error::DispatchError;
pub use http::Route;
pub use page::MONITOR_PAGE;
