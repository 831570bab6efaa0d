// ===========================================================================
// util - Small Pure Helpers
// ===========================================================================

pub mod path;

#[cfg(test)]
pub(crate) mod http_stub;

pub use path::leaf_name;
