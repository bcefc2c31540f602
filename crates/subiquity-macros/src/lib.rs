#![deny(unsafe_code)]

//! Procedural macros for the installer backend client.
//!
//! - `#[derive(Redact)]`: build a log-safe projection of a record and a
//!   `Debug` implementation that never prints secrets

extern crate proc_macro;

mod redact;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derive macro for redacting sensitive fields.
///
/// Generates two impls:
///
/// - `subiquity_types::redact::Redact`, whose `redacted()` returns a clone
///   of the value with every `#[redact]` field replaced by a same-length
///   `*` mask, and every `#[redact(nested)]` field replaced by its own
///   redacted projection.
/// - `Debug`, printing the masked value for `#[redact]` fields.
///
/// The consuming crate must depend on `subiquity-types`.
///
/// # Example
///
/// ```ignore
/// use subiquity_macros::Redact;
///
/// #[derive(Clone, Redact)]
/// struct AdConnectionInfo {
///     pub admin_name: String,
///     pub domain_name: String,
///     #[redact]
///     pub password: String,
/// }
/// ```
#[proc_macro_derive(Redact, attributes(redact))]
pub fn derive_redact(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    redact::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
