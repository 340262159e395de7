// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! Structured trace events.
//!
//! `ballot_trace!("session.connect", {"account": account.to_string()})`
//! emits `ballot_trace:session.connect:{"account":"0x..."}` at trace level.

#[doc(hidden)]
pub use serde_json as __serde_json;
#[doc(hidden)]
pub use tracing as __tracing;

#[macro_export]
macro_rules! ballot_trace {
    ($evt:expr, $params:tt) => {
        $crate::__tracing::trace!(
            "ballot_trace:{}:{}",
            $evt,
            $crate::__serde_json::json!($params)
        );
    };
}
