//! Definitions of constants.

/// The smallest valid share index; share ids are 1-based.
pub const MIN_SHARE_INDEX: u32 = 1;

/// The maximum length of a transaction payload, in bytes.
pub const MAX_TSS_MESSAGE_LEN: usize = 2 * 1024 * 1024;
