//! Account-identifier packing for the ledger's 256-bit namespace.
//!
//! The streaming ledger keys all of its per-account state by a 32-byte
//! identifier whose top 4 bytes are the driver id assigned at registration.
//! Partitioning the namespace this way means two independently registered
//! drivers can never produce the same account identifier, and a driver's
//! own mapping from list id to account id is a bijection.

/// Byte length of the driver-id prefix (bits [224, 256) of the account id).
pub const DRIVER_ID_LEN: usize = 4;

/// Byte length of a list identifier (bits [0, 224) of the account id).
pub const LIST_ID_LEN: usize = 28;

/// Pack a driver id and a list id into a 32-byte account identifier.
///
/// The driver id occupies the leading 4 bytes big-endian, the list id the
/// remaining 28. Total function, never fails, injective for a fixed
/// driver id.
pub fn pack(driver_id: u32, list_id: &[u8; LIST_ID_LEN]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[..DRIVER_ID_LEN].copy_from_slice(&driver_id.to_be_bytes());
    out[DRIVER_ID_LEN..].copy_from_slice(list_id);
    out
}

/// Driver id an account identifier belongs to.
pub fn driver_id(account_id: &[u8; 32]) -> u32 {
    let mut prefix = [0u8; DRIVER_ID_LEN];
    prefix.copy_from_slice(&account_id[..DRIVER_ID_LEN]);
    u32::from_be_bytes(prefix)
}

/// List id embedded in an account identifier.
pub fn list_id(account_id: &[u8; 32]) -> [u8; LIST_ID_LEN] {
    let mut out = [0u8; LIST_ID_LEN];
    out.copy_from_slice(&account_id[DRIVER_ID_LEN..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_round_trips_through_masking() {
        let list = [0xABu8; LIST_ID_LEN];
        let account = pack(7, &list);

        assert_eq!(driver_id(&account), 7);
        assert_eq!(list_id(&account), list);
    }

    #[test]
    fn driver_id_occupies_top_four_bytes() {
        let list = [0x11u8; LIST_ID_LEN];
        let account = pack(0xDEAD_BEEF, &list);

        assert_eq!(&account[..4], &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(&account[4..], &list);
    }

    #[test]
    fn distinct_list_ids_never_collide() {
        let mut a = [0u8; LIST_ID_LEN];
        let mut b = [0u8; LIST_ID_LEN];
        a[27] = 1;
        b[0] = 1;

        assert_ne!(pack(7, &a), pack(7, &b));
        assert_ne!(pack(7, &a), pack(7, &[0u8; LIST_ID_LEN]));
    }

    #[test]
    fn distinct_driver_ids_never_collide() {
        let list = [0x42u8; LIST_ID_LEN];

        let a = pack(1, &list);
        let b = pack(2, &list);

        assert_ne!(a, b);
        // Same list id, so the difference is entirely in the prefix.
        assert_eq!(list_id(&a), list_id(&b));
        assert_ne!(driver_id(&a), driver_id(&b));
    }
}
