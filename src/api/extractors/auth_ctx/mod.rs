/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Give handlers the verified identity (AuthCtx) for the current request
 * - axum plumbing lives in core, the type itself in types
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
