use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use ursa::cl;
use ursa::cl::prover::Prover;
use ursa::cl::{
    CredentialPublicKey, CredentialSchema, CredentialSignature, CredentialValues,
    NonCredentialSchema, Nonce, RevocationRegistry, Witness,
};
use ursa::errors::UrsaCryptoResult;

use crate::errors::prelude::*;
use crate::errors::{accumulate_kind, decode_kind};
use crate::handle::Handle;
use crate::sub_proof_request::{check_attr_name, SubProofRequest};

/// Revocation registry and witness of a revocable credential.
///
/// Both refer to the same accumulator state and are always supplied together.
#[derive(Debug, Clone, Copy)]
pub struct NonRevocation<'a> {
    pub registry: &'a RevocationRegistry,
    pub witness: &'a Witness,
}

impl<'a> NonRevocation<'a> {
    pub fn new(registry: &'a RevocationRegistry, witness: &'a Witness) -> NonRevocation<'a> {
        NonRevocation { registry, witness }
    }

    /// Pairs a registry and a witness received separately.
    ///
    /// Both absent means a non-revocable credential. Only one of them present
    /// is rejected with `InvalidParameter`.
    pub fn from_parts(
        registry: Option<&'a RevocationRegistry>,
        witness: Option<&'a Witness>,
    ) -> ProofResult<Option<NonRevocation<'a>>> {
        match (registry, witness) {
            (Some(registry), Some(witness)) => Ok(Some(NonRevocation { registry, witness })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(err_msg(
                ProofErrorKind::InvalidParameter,
                "Revocation registry has been passed without witness",
            )),
            (None, Some(_)) => Err(err_msg(
                ProofErrorKind::InvalidParameter,
                "Witness has been passed without revocation registry",
            )),
        }
    }
}

/// Builder of an aggregated proof over one or more credentials.
///
/// Sub proofs appear in the proof in the order their requests were added; the
/// verifier must walk them in that same order.
#[derive(Debug)]
pub struct ProofBuilder {
    handle: Handle<cl::prover::ProofBuilder>,
    common_attributes: BTreeSet<String>,
    sub_proof_count: usize,
}

impl ProofBuilder {
    pub fn new() -> ProofResult<ProofBuilder> {
        trace!("ProofBuilder::new: >>>");

        let builder = Prover::new_proof_builder().map_err(|err| {
            err.to_proof_error(ProofErrorKind::Allocation, "Unable to create proof builder")
        })?;

        let res = ProofBuilder {
            handle: Handle::new("ProofBuilder", builder),
            common_attributes: BTreeSet::new(),
            sub_proof_count: 0,
        };

        trace!("ProofBuilder::new: <<< res: {:?}", res);
        Ok(res)
    }

    /// Names an attribute blinded identically in every sub proof that holds
    /// it, e.g. the link secret shared by all of a prover's credentials.
    ///
    /// Fails with `InvalidState` once a sub proof request has been added:
    /// sub proofs registered earlier would not be linked through it.
    pub fn add_common_attribute(&mut self, attr_name: &str) -> ProofResult<()> {
        trace!(
            "ProofBuilder::add_common_attribute: >>> attr_name: {:?}",
            attr_name
        );

        let builder = self.handle.get_mut()?;
        if self.sub_proof_count > 0 {
            return Err(err_msg(
                ProofErrorKind::InvalidState,
                format!(
                    "Common attribute {:?} added after {} sub proof request(s)",
                    attr_name, self.sub_proof_count
                ),
            ));
        }
        check_attr_name(attr_name)?;

        builder.add_common_attribute(attr_name).map_err(|err| {
            let kind = accumulate_kind(err.kind());
            err.to_proof_error(
                kind,
                format!("Unable to add common attribute {:?}", attr_name),
            )
        })?;

        self.common_attributes.insert(attr_name.to_owned());

        trace!("ProofBuilder::add_common_attribute: <<<");
        Ok(())
    }

    /// Adds the contribution of one credential to the proof.
    ///
    /// Schema, non credential schema, signature, values and public key must
    /// all belong to the same credential. `non_revocation` is `None` for a
    /// credential without revocation support.
    ///
    /// A rejected registration leaves the builder as it was.
    #[allow(clippy::too_many_arguments)]
    pub fn add_sub_proof_request(
        &mut self,
        sub_proof_request: &SubProofRequest,
        credential_schema: &CredentialSchema,
        non_credential_schema: &NonCredentialSchema,
        credential_signature: &CredentialSignature,
        credential_values: &CredentialValues,
        credential_pub_key: &CredentialPublicKey,
        non_revocation: Option<NonRevocation<'_>>,
    ) -> ProofResult<()> {
        trace!(
            "ProofBuilder::add_sub_proof_request: >>> sub_proof_request: {:?}, \
             credential_schema: {:?}, \
             non_credential_schema: {:?}, \
             credential_signature: {:?}, \
             credential_values: {:?}, \
             credential_pub_key: {:?}, \
             non_revocation: {:?}",
            sub_proof_request,
            credential_schema,
            non_credential_schema,
            secret!(credential_signature),
            secret!(credential_values),
            credential_pub_key,
            non_revocation
        );

        self.handle.get()?;
        let request = sub_proof_request.inner().map_err(|_| {
            err_msg(
                ProofErrorKind::InvalidParameter,
                "Sub proof request has already been released",
            )
        })?;

        let registration = Registration {
            request,
            credential_schema,
            non_credential_schema,
            credential_signature,
            credential_values,
            credential_pub_key,
            non_revocation,
        };

        // ursa extends a revocable registration's commitments before its last
        // checks, so those are rehearsed on a scratch builder first.
        if non_revocation.is_some() {
            if let Err(err) = registration.rehearse(&self.common_attributes) {
                trace!("ProofBuilder::add_sub_proof_request: <<< err: {:?}", err);
                return Err(err);
            }
        }

        let builder = self.handle.get_mut()?;
        match registration.apply(builder) {
            Ok(()) => {
                self.sub_proof_count += 1;
                trace!(
                    "ProofBuilder::add_sub_proof_request: <<< sub_proof_count: {}",
                    self.sub_proof_count
                );
                Ok(())
            }
            Err(err) => {
                let kind = accumulate_kind(err.kind());
                let mut err = err.to_proof_error(kind, "Unable to add sub proof request");

                // Past a successful rehearsal only an internal failure lands
                // here, and the builder may hold part of the registration.
                if non_revocation.is_some() {
                    warn!(
                        "ProofBuilder::add_sub_proof_request: \
                         releasing builder after internal failure"
                    );
                    self.handle.free()?;
                    err = err_msg(
                        err.kind(),
                        format!("{}; proof builder has been released", err.message()),
                    );
                }

                trace!("ProofBuilder::add_sub_proof_request: <<< err: {:?}", err);
                Err(err)
            }
        }
    }

    /// Derives the challenge over all sub proofs and the verifier's `nonce`
    /// and returns the proof.
    ///
    /// On success the builder is released; every later call fails with
    /// `InvalidState`. A builder without sub proof requests is rejected with
    /// `Build` and left untouched.
    pub fn finalize(&mut self, nonce: &Nonce) -> ProofResult<Proof> {
        trace!("ProofBuilder::finalize: >>> nonce: {:?}", nonce);

        let builder = self.handle.get()?;
        if self.sub_proof_count == 0 {
            return Err(err_msg(
                ProofErrorKind::Build,
                "Proof builder has no sub proof requests",
            ));
        }

        let proof = builder.finalize(nonce).map_err(|err| {
            err.to_proof_error(ProofErrorKind::Build, "Unable to finalize proof")
        })?;
        self.handle.free()?;

        let res = Proof {
            handle: Handle::new("Proof", proof),
        };

        trace!("ProofBuilder::finalize: <<< res: {:?}", res);
        Ok(res)
    }

    pub fn common_attributes(&self) -> &BTreeSet<String> {
        &self.common_attributes
    }

    pub fn sub_proof_count(&self) -> usize {
        self.sub_proof_count
    }

    pub fn is_finalized(&self) -> bool {
        !self.handle.is_live()
    }
}

/// Arguments of one `add_sub_proof_request` call.
struct Registration<'a> {
    request: &'a cl::SubProofRequest,
    credential_schema: &'a CredentialSchema,
    non_credential_schema: &'a NonCredentialSchema,
    credential_signature: &'a CredentialSignature,
    credential_values: &'a CredentialValues,
    credential_pub_key: &'a CredentialPublicKey,
    non_revocation: Option<NonRevocation<'a>>,
}

impl<'a> Registration<'a> {
    fn apply(&self, builder: &mut cl::prover::ProofBuilder) -> UrsaCryptoResult<()> {
        builder.add_sub_proof_request(
            self.request,
            self.credential_schema,
            self.non_credential_schema,
            self.credential_signature,
            self.credential_values,
            self.credential_pub_key,
            self.non_revocation.map(|r| r.registry),
            self.non_revocation.map(|r| r.witness),
        )
    }

    /// Applies the registration to a throwaway builder holding the same
    /// common attribute names. The random blindings it draws do not change
    /// whether ursa accepts the registration.
    fn rehearse(&self, common_attributes: &BTreeSet<String>) -> ProofResult<()> {
        let mut scratch = Prover::new_proof_builder().map_err(|err| {
            err.to_proof_error(
                ProofErrorKind::Allocation,
                "Unable to create scratch proof builder",
            )
        })?;

        for attr_name in common_attributes {
            scratch.add_common_attribute(attr_name).map_err(|err| {
                err.to_proof_error(
                    ProofErrorKind::Allocation,
                    format!("Unable to add common attribute {:?}", attr_name),
                )
            })?;
        }

        self.apply(&mut scratch).map_err(|err| {
            let kind = accumulate_kind(err.kind());
            err.to_proof_error(kind, "Unable to add sub proof request")
        })
    }
}

/// Aggregated proof over one or more credentials, bound to the nonce given to
/// [`ProofBuilder::finalize`].
#[derive(Debug)]
pub struct Proof {
    handle: Handle<cl::Proof>,
}

impl Proof {
    /// Json form defined by the primitives layer. Field order is not
    /// guaranteed to be stable; compare parsed values, not strings.
    pub fn to_json(&self) -> ProofResult<String> {
        trace!("Proof::to_json: >>>");

        let proof = self.handle.get()?;
        let res = serde_json::to_string(proof).map_err(|err| {
            err.to_proof_error(ProofErrorKind::InvalidState, "Unable to serialize proof as json")
        })?;

        trace!("Proof::to_json: <<< res: {:?}", res);
        Ok(res)
    }

    /// Fails with `Parse` for malformed json and `Schema` for json that does
    /// not describe a proof.
    pub fn from_json<J: AsRef<[u8]>>(json: J) -> ProofResult<Proof> {
        let json = json.as_ref();
        trace!("Proof::from_json: >>> json: {:?}", String::from_utf8_lossy(json));

        if json.is_empty() {
            return Err(err_msg(ProofErrorKind::Parse, "Empty json has been passed"));
        }

        let proof = serde_json::from_slice::<cl::Proof>(json).map_err(|err| {
            let kind = decode_kind(&err);
            err.to_proof_error(kind, "Unable to deserialize proof from json")
        })?;

        let res = Proof {
            handle: Handle::new("Proof", proof),
        };

        trace!("Proof::from_json: <<< res: {:?}", res);
        Ok(res)
    }

    pub fn sub_proof_count(&self) -> ProofResult<usize> {
        Ok(self.sub_proofs()?.len())
    }

    /// Revealed attribute values of every sub proof, in sub proof order.
    /// Values are the encoded decimal strings the credential was signed over.
    pub fn revealed_attrs(&self) -> ProofResult<Vec<BTreeMap<String, String>>> {
        trace!("Proof::revealed_attrs: >>>");

        let mut res = Vec::new();
        for sub_proof in self.sub_proofs()? {
            let attrs = sub_proof
                .pointer("/primary_proof/eq_proof/revealed_attrs")
                .and_then(Value::as_object)
                .ok_or_else(|| {
                    err_msg(
                        ProofErrorKind::Schema,
                        "Sub proof does not contain revealed attributes",
                    )
                })?;

            let mut values = BTreeMap::new();
            for (name, value) in attrs {
                let value = value.as_str().ok_or_else(|| {
                    err_msg(
                        ProofErrorKind::Schema,
                        format!("Revealed attribute {:?} is not a decimal string", name),
                    )
                })?;
                values.insert(name.clone(), value.to_owned());
            }
            res.push(values);
        }

        trace!("Proof::revealed_attrs: <<< res: {:?}", res);
        Ok(res)
    }

    /// Primitive proof, for handing to a verifier.
    pub fn inner(&self) -> ProofResult<&cl::Proof> {
        self.handle.get()
    }

    pub fn is_released(&self) -> bool {
        !self.handle.is_live()
    }

    pub fn free(&mut self) -> ProofResult<()> {
        trace!("Proof::free: >>>");

        let res = self.handle.free();

        trace!("Proof::free: <<< res: {:?}", res);
        res
    }

    fn sub_proofs(&self) -> ProofResult<Vec<Value>> {
        let proof = self.handle.get()?;
        let value = serde_json::to_value(proof).map_err(|err| {
            err.to_proof_error(ProofErrorKind::InvalidState, "Unable to serialize proof as json")
        })?;

        match value {
            Value::Object(mut fields) => match fields.remove("proofs") {
                Some(Value::Array(proofs)) => Ok(proofs),
                _ => Err(err_msg(
                    ProofErrorKind::Schema,
                    "Proof does not contain sub proofs",
                )),
            },
            _ => Err(err_msg(ProofErrorKind::Schema, "Proof is not a json object")),
        }
    }
}
