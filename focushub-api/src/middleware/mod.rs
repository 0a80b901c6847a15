/// Middleware modules for the API server
///
/// - `identity`: resolves the caller identity supplied by the trusted
///   request boundary and injects it into request extensions

pub mod identity;
