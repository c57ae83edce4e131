// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

/// Self-contained monitor page; polls `/data` every 500 ms
pub const MONITOR_PAGE: &str = include_str!("../assets/monitor.html");
