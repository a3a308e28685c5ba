//! Builders for anonymous credential proofs over Camenisch-Lysyanskaya
//! signatures.
//!
//! A verifier describes what it wants from each credential with a
//! [`SubProofRequest`]; the prover registers every request together with the
//! matching credential on a [`ProofBuilder`] and finalizes it against the
//! verifier's nonce into a single [`Proof`].
//!
//! ```no_run
//! use ursa_cl_proof::{new_nonce, ProofBuilder, SubProofRequestBuilder};
//!
//! let mut request_builder = SubProofRequestBuilder::new().unwrap();
//! request_builder.add_revealed_attr("name").unwrap();
//! request_builder.add_predicate("age", "GE", 18).unwrap();
//! let request = request_builder.finalize().unwrap();
//!
//! let mut proof_builder = ProofBuilder::new().unwrap();
//! proof_builder.add_common_attribute("master_secret").unwrap();
//! // proof_builder.add_sub_proof_request(&request, &schema, &non_schema,
//! //                                     &signature, &values, &pub_key, None)?;
//! let nonce = new_nonce().unwrap();
//! # drop(request);
//! # let _ = proof_builder.finalize(&nonce);
//! ```
//!
//! The cryptography itself is done by `ursa::cl`; this crate sequences the
//! builders, owns the resulting objects and classifies failures.

#[macro_use]
extern crate log;

#[macro_use]
mod macros;

pub mod errors;
pub mod handle;
#[cfg(feature = "logger")]
pub mod logger;
pub mod nonce;
pub mod proof;
pub mod sub_proof_request;

pub use errors::{ProofError, ProofErrorKind, ProofResult};
pub use handle::Handle;
pub use nonce::{new_nonce, nonce_from_dec, nonce_from_json, nonce_to_json, Nonce};
pub use proof::{NonRevocation, Proof, ProofBuilder};
pub use sub_proof_request::{Predicate, SubProofRequest, SubProofRequestBuilder};

pub use ursa::cl::{
    CredentialPublicKey, CredentialSchema, CredentialSignature, CredentialValues,
    NonCredentialSchema, RevocationRegistry, Witness,
};
