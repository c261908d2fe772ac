use alloy_primitives::{keccak256, Address};
use k256::ecdsa::{
    signature::{hazmat::PrehashVerifier, Verifier},
    Signature, VerifyingKey,
};

/// Returns the account address of a verifying key: the last 20 bytes of the keccak hash of the
/// uncompressed point without its tag byte.
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    Address::from_raw_public_key(&point.as_bytes()[1..])
}

/// Parses a SEC1-encoded public key and returns its account address.
pub fn pub_key_address(pub_key: &[u8]) -> Result<Address, k256::ecdsa::Error> {
    VerifyingKey::from_sec1_bytes(pub_key).map(|key| address_of(&key))
}

/// Verifies a native transaction signature: a 64-byte `r‖s` ECDSA signature over the keccak
/// hash of `sign_bytes`.
///
/// Fails only on a malformed key or signature. A well-formed signature that does not match
/// yields `Ok(false)`.
pub fn verify_native_signature(
    pub_key: &[u8],
    sign_bytes: &[u8],
    signature: &[u8],
) -> Result<bool, k256::ecdsa::Error> {
    let key = VerifyingKey::from_sec1_bytes(pub_key)?;
    let signature = Signature::from_slice(signature)?;
    Ok(key.verify_prehash(keccak256(sign_bytes).as_slice(), &signature).is_ok())
}

/// Verifies a node attestation: a 64-byte `r‖s` ECDSA signature over the SHA-256 hash of
/// `message`.
///
/// Fails only on a malformed key or signature. A well-formed signature that does not match
/// yields `Ok(false)`.
pub fn verify_node_signature(
    node_key: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<bool, k256::ecdsa::Error> {
    let key = VerifyingKey::from_sec1_bytes(node_key)?;
    let signature = Signature::from_slice(signature)?;
    Ok(key.verify(message, &signature).is_ok())
}
