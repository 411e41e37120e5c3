//! Interface to the external streaming-ledger contract.
//!
//! The ledger owns all balance and receiver state, settles streams over
//! fixed-length cycles and diffs receiver lists against a squashed history.
//! The driver only ever touches it through the single combined update
//! defined here; a test double can be registered behind the same client.

use soroban_sdk::{contractclient, contracttype, Address, BytesN, Env, Vec};

/// One entry of a receiver list: a destination account in the ledger's
/// namespace and its per-second flow rate.
///
/// Order within a list is significant. The ledger requires the previous
/// list to match its record exactly, including order, and the driver
/// forwards caller-supplied lists verbatim without reordering them.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Receiver {
    pub account_id: BytesN<32>,
    pub amount_per_sec: i128,
}

/// Precomputed bounds for the ledger's balance-exhaustion search.
///
/// Zero means "no hint". Hints never change the outcome of an update,
/// only how fast the ledger's internal search terminates; structural
/// validity is checked by the ledger itself.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MaxEndHints {
    pub hint1: u32,
    pub hint2: u32,
}

/// The combined-update surface consumed from the streaming ledger.
#[contractclient(name = "LedgerClient")]
pub trait LedgerEngine {
    /// Atomically replace `account_id`'s receiver list and apply a signed
    /// balance delta, settling streamed funds up to the current ledger
    /// time first. Funds released by a negative delta are paid out to
    /// `funds_to`. Returns the delta actually applied.
    ///
    /// Fails when `prev_receivers` does not match the ledger's stored
    /// record for `account_id` or when `hints` is structurally invalid;
    /// on failure nothing is committed.
    fn set_receivers_and_delta(
        env: Env,
        account_id: BytesN<32>,
        token: Address,
        prev_receivers: Vec<Receiver>,
        balance_delta: i128,
        new_receivers: Vec<Receiver>,
        hints: MaxEndHints,
        funds_to: Address,
    ) -> i128;
}
