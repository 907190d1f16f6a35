//! OpenAPI operation metadata collected from registered procedures.

use crate::procedure::QueryParam;

/// Metadata for a single API operation, used to generate the OpenAPI document.
pub struct Meta {
    pub path: String,
    pub method: String,
    pub summary: String,
    pub tag: String,
    pub status: u16,
    pub authenticated: bool,
    pub query: Vec<QueryParam>,
    pub input_schema: Option<schemars::Schema>,
    pub output_schema: schemars::Schema,
}
