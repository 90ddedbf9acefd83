mod document;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Document)] derive macro
// ============================================================================

/// Derive macro for the `Document` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Document)]
/// #[document(collection = "units")]
/// struct UnitDoc {
///     #[document(id)]
///     #[serde(rename = "_id")]
///     pub name: String,
///     #[serde(rename = "servicename")]
///     pub service_name: String,
/// }
/// ```
///
/// - `#[document(collection = "...")]` sets the default collection name.
///   If omitted, defaults to snake_case struct name + "s".
/// - `#[document(id)]` marks the field persisted as `_id`.
///   If omitted, defaults to a field named `id`.
#[proc_macro_derive(Document, attributes(document))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    document::derive_document(input)
}
