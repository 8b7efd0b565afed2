// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits implemented by metrics backends and stores.

pub mod backend;
pub mod source;

pub use backend::MetricsBackend;
pub use source::MetricsSource;
