/*!
 * Request extractors
 *
 * - Authorized: permission gate を通過した検証済み claims を handler に渡す
 */
mod authorized;

pub use authorized::Authorized;
