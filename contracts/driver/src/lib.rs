#![no_std]

pub mod account_id;
pub mod ledger;

use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, token, Address, BytesN, Env, Vec,
};

use crate::ledger::{LedgerClient, MaxEndHints, Receiver};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Global configuration for the driver.
#[contracttype]
#[derive(Clone, Debug)]
pub struct Config {
    pub admin: Address,
    pub ledger: Address,
    pub token: Address,
    pub driver_id: u32,
}

#[soroban_sdk::contracterror]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum DriverError {
    TokenMismatch = 1,
    AmountTooLarge = 2,
    OracleNotSet = 3,
}

/// Namespace for all contract storage keys.
#[contracttype]
pub enum DataKey {
    Config, // Instance storage for global settings (admin/ledger/token/driver id).
    Oracle, // Instance storage for the receiver-update authority; absent until set.
}

// ---------------------------------------------------------------------------
// Storage helpers
// ---------------------------------------------------------------------------

fn get_config(env: &Env) -> Config {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .expect("contract not initialised: missing config")
}

fn get_oracle(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Oracle)
}

// ---------------------------------------------------------------------------
// Internal Helpers
// ---------------------------------------------------------------------------

impl ImpactListDriver {
    /// 32-byte ledger account identifier for one of this driver's lists.
    fn derive_account_id(env: &Env, driver_id: u32, list_id: &BytesN<28>) -> BytesN<32> {
        BytesN::from_array(env, &account_id::pack(driver_id, &list_id.to_array()))
    }
}

// ---------------------------------------------------------------------------
// Contract Implementation
// ---------------------------------------------------------------------------

#[contract]
pub struct ImpactListDriver;

#[contractimpl]
impl ImpactListDriver {
    /// Initialise the driver with its administrator, collaborators and
    /// registered driver id.
    ///
    /// This function must be called exactly once before any other contract
    /// operations. The oracle is deliberately left unset; until an
    /// administrator configures one via `set_oracle`, every `set_receivers`
    /// call is rejected.
    ///
    /// # Parameters
    /// - `admin`: Address authorized to reassign the oracle and rotate itself
    /// - `ledger`: Address of the streaming-ledger contract all updates are
    ///   delegated to
    /// - `token`: The single token this driver instance supports
    /// - `driver_id`: The 32-bit id assigned to this driver when it was
    ///   registered with the ledger
    ///
    /// # Panics
    /// - If called more than once (contract already initialized)
    ///
    /// # Security
    /// - Re-initialization is prevented so the ledger, token and driver id
    ///   stay fixed for the lifetime of the contract
    /// - No authorization required for initial setup (deployer calls this once)
    pub fn init(env: Env, admin: Address, ledger: Address, token: Address, driver_id: u32) {
        if env.storage().instance().has(&DataKey::Config) {
            panic!("already initialised");
        }
        let config = Config {
            admin,
            ledger,
            token,
            driver_id,
        };
        env.storage().instance().set(&DataKey::Config, &config);

        // Ensure instance storage (Config/Oracle) doesn't expire quickly
        env.storage().instance().extend_ttl(17280, 120960);
    }

    /// Reassign the oracle authorized to reconfigure receiver lists.
    ///
    /// Only the administrator may call this. Passing `None` removes the
    /// oracle entirely, which disables all `set_receivers` calls until a
    /// new one is configured. The new address is not validated in any way
    /// and reassignment is idempotent; no history is retained.
    ///
    /// # Events
    /// - Publishes `oracle updated (old, new)` on success
    pub fn set_oracle(env: Env, new_oracle: Option<Address>) {
        let config = get_config(&env);
        config.admin.require_auth();

        let old_oracle = get_oracle(&env);
        match &new_oracle {
            Some(oracle) => env.storage().instance().set(&DataKey::Oracle, oracle),
            None => env.storage().instance().remove(&DataKey::Oracle),
        }

        env.events().publish(
            (symbol_short!("oracle"), symbol_short!("updated")),
            (old_oracle, new_oracle),
        );
    }

    /// Replace the receiver list of one impact list.
    ///
    /// Delegates to the ledger's combined update with a zero balance delta:
    /// the list's streamed funds are settled, its receivers swapped, and no
    /// balance moves. On success a single update notification keyed by the
    /// list id is published.
    ///
    /// # Parameters
    /// - `list_id`: The impact list whose receivers change
    /// - `curr_receivers`: The list currently on record with the ledger.
    ///   Must match exactly, including order; the driver forwards it
    ///   verbatim and the ledger enforces the match
    /// - `new_receivers`: The replacement list, forwarded verbatim
    /// - `hints`: Optional bounds for the ledger's balance-exhaustion search
    ///
    /// # Authorization
    /// - Requires authorization from the configured oracle. Fails with
    ///   `OracleNotSet` before any external call when no oracle is
    ///   configured
    ///
    /// # Failure
    /// If the ledger rejects the update (stale `curr_receivers`, malformed
    /// hints) the entire call fails atomically: no notification is emitted
    /// and no state changes anywhere.
    ///
    /// # Events
    /// - Publishes `receivers (list_id)` exactly once, only after the
    ///   ledger call succeeds
    pub fn set_receivers(
        env: Env,
        list_id: BytesN<28>,
        curr_receivers: Vec<Receiver>,
        new_receivers: Vec<Receiver>,
        hints: MaxEndHints,
    ) -> Result<(), DriverError> {
        let oracle = get_oracle(&env).ok_or(DriverError::OracleNotSet)?;
        oracle.require_auth();

        let config = get_config(&env);
        let account = Self::derive_account_id(&env, config.driver_id, &list_id);

        LedgerClient::new(&env, &config.ledger).set_receivers_and_delta(
            &account,
            &config.token,
            &curr_receivers,
            &0_i128,
            &new_receivers,
            &hints,
            &env.current_contract_address(),
        );

        env.events()
            .publish((symbol_short!("receivers"), list_id), new_receivers.len());
        Ok(())
    }

    /// Top up an impact list's stream balance without touching its
    /// receiver configuration.
    ///
    /// Open to any caller. The donor's tokens are pulled into the ledger
    /// and credited to the list's streaming balance; `receivers` is passed
    /// to the ledger as both the previous and the new list, so flow rates
    /// are unchanged.
    ///
    /// # Parameters
    /// - `donor`: Address funding the donation (must authorize the
    ///   transaction, including the token transfer)
    /// - `list_id`: The impact list being funded
    /// - `token`: Must equal the driver's configured token
    /// - `amount`: Donation size; must stay below `2^127` so it fits the
    ///   ledger's signed balance delta without sign ambiguity
    /// - `receivers`: The list currently on record with the ledger
    /// - `hints`: Optional bounds for the ledger's balance-exhaustion search
    ///
    /// # Failure
    /// - `TokenMismatch` / `AmountTooLarge` are rejected before any
    ///   external call
    /// - A failed token transfer or a ledger-side receiver mismatch aborts
    ///   the whole call atomically; the donor keeps their funds
    ///
    /// # Events
    /// - None from the driver; only the ledger's own settlement effects are
    ///   observable
    pub fn donate(
        env: Env,
        donor: Address,
        list_id: BytesN<28>,
        token: Address,
        amount: u128,
        receivers: Vec<Receiver>,
        hints: MaxEndHints,
    ) -> Result<(), DriverError> {
        donor.require_auth();

        let config = get_config(&env);
        if token != config.token {
            return Err(DriverError::TokenMismatch);
        }
        if amount > i128::MAX as u128 {
            return Err(DriverError::AmountTooLarge);
        }
        let delta = amount as i128;

        // Move the donation into the ledger before crediting it. If the
        // donor has not authorized the transfer, this aborts the call.
        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(&donor, &config.ledger, &delta);

        let account = Self::derive_account_id(&env, config.driver_id, &list_id);
        LedgerClient::new(&env, &config.ledger).set_receivers_and_delta(
            &account,
            &config.token,
            &receivers,
            &delta,
            &receivers,
            &hints,
            &env.current_contract_address(),
        );
        Ok(())
    }

    /// Account identifier the ledger uses for one of this driver's lists.
    ///
    /// Pure view: the configured driver id in the top 4 bytes, the list id
    /// in the remaining 28. Distinct list ids always map to distinct
    /// account identifiers, and drivers with different ids can never
    /// collide.
    pub fn to_account_id(env: Env, list_id: BytesN<28>) -> BytesN<32> {
        let config = get_config(&env);
        Self::derive_account_id(&env, config.driver_id, &list_id)
    }

    /// Retrieve the global driver configuration.
    pub fn get_config(env: Env) -> Config {
        get_config(&env)
    }

    /// Currently configured oracle, if any.
    pub fn get_oracle(env: Env) -> Option<Address> {
        get_oracle(&env)
    }

    /// Update the admin address for the contract.
    ///
    /// Allows the current admin to rotate the admin key by setting a new
    /// admin address. Only the current admin may call this function; the
    /// new admin immediately gains all administrative privileges.
    ///
    /// # Events
    /// - Publishes `admin updated (old_admin, new_admin)` on success
    pub fn set_admin(env: Env, new_admin: Address) {
        let mut config = get_config(&env);
        let old_admin = config.admin.clone();

        // Only current admin can update admin
        old_admin.require_auth();

        config.admin = new_admin.clone();
        env.storage().instance().set(&DataKey::Config, &config);

        env.events().publish(
            (symbol_short!("admin"), symbol_short!("updated")),
            (old_admin, new_admin),
        );
    }
}
