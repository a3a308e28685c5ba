//! Verifier nonces.
//!
//! A nonce is produced by the verifier and only carried through this crate;
//! these helpers let a prover take one off the wire.

use ursa::bn::BigNumber;
use ursa::cl;

use crate::errors::decode_kind;
use crate::errors::prelude::*;

pub use ursa::cl::Nonce;

/// Creates a random nonce, as a verifier would.
pub fn new_nonce() -> ProofResult<Nonce> {
    cl::new_nonce()
        .map_err(|err| err.to_proof_error(ProofErrorKind::Allocation, "Unable to create nonce"))
}

/// Parses a nonce given as a decimal string.
pub fn nonce_from_dec(value: &str) -> ProofResult<Nonce> {
    trace!("nonce_from_dec: >>> value: {:?}", value);

    if value.is_empty() {
        return Err(err_msg(
            ProofErrorKind::InvalidParameter,
            "Empty string has been passed",
        ));
    }

    let res = BigNumber::from_dec(value).map_err(|err| {
        err.to_proof_error(ProofErrorKind::InvalidParameter, "Invalid decimal nonce")
    });

    trace!("nonce_from_dec: <<< ok: {:?}", res.is_ok());
    res
}

pub fn nonce_to_json(nonce: &Nonce) -> ProofResult<String> {
    serde_json::to_string(nonce).map_err(|err| {
        err.to_proof_error(
            ProofErrorKind::InvalidState,
            "Unable to serialize nonce as json",
        )
    })
}

pub fn nonce_from_json(json: &str) -> ProofResult<Nonce> {
    trace!("nonce_from_json: >>> json: {:?}", json);

    let res = serde_json::from_str::<Nonce>(json).map_err(|err| {
        let kind = decode_kind(&err);
        err.to_proof_error(kind, "Unable to deserialize nonce from json")
    });

    trace!("nonce_from_json: <<< ok: {:?}", res.is_ok());
    res
}
