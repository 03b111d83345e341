//! Stream packing hooks.
//!
//! [`pack`] and [`unpack`] sit between the codec and the transport as the
//! reserved slot for a stream-compression stage. In this implementation they
//! are identity pass-throughs: callers must not assume any compression
//! occurs, only that `unpack(pack(x)) == x`. A real compression scheme can
//! replace them without touching the codec or the wire layout of individual
//! messages.

/// Prepare encoded bytes for transmission. Currently the identity.
pub fn pack(data: &[u8]) -> Vec<u8> {
    data.to_vec()
}

/// Undo [`pack`] on received bytes. Currently the identity.
pub fn unpack(data: &[u8]) -> Vec<u8> {
    data.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_is_identity() {
        let data = [0u8, 1, 2, 0xFF, 0x80];
        assert_eq!(unpack(&pack(&data)), data.to_vec());
        assert_eq!(pack(&[]), Vec::<u8>::new());
    }
}
