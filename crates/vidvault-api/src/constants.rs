/// Prefix every route is nested under.
pub const API_PREFIX: &str = "/api";

/// Headroom for multipart boundaries and part headers on top of the file cap.
/// The exact file cap is enforced while the part is buffered.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
