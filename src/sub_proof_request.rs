use std::collections::BTreeSet;

use ursa::cl;
use ursa::cl::verifier::Verifier;

use crate::errors::prelude::*;
use crate::errors::accumulate_kind;
use crate::handle::Handle;

/// Predicate recorded on a sub proof request.
///
/// `p_type` is kept exactly as supplied; the primitives layer decides which
/// types exist (currently `GE`, `LE`, `GT`, `LT`).
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Predicate {
    pub attr_name: String,
    pub p_type: String,
    pub value: i32,
}

/// Builder of a sub proof request: the attributes to reveal and the
/// predicates to prove for one credential.
#[derive(Debug)]
pub struct SubProofRequestBuilder {
    handle: Handle<cl::SubProofRequestBuilder>,
    revealed_attrs: BTreeSet<String>,
    predicates: BTreeSet<Predicate>,
}

impl SubProofRequestBuilder {
    pub fn new() -> ProofResult<SubProofRequestBuilder> {
        trace!("SubProofRequestBuilder::new: >>>");

        let builder = Verifier::new_sub_proof_request_builder().map_err(|err| {
            err.to_proof_error(
                ProofErrorKind::Allocation,
                "Unable to create sub proof request builder",
            )
        })?;

        let res = SubProofRequestBuilder {
            handle: Handle::new("SubProofRequestBuilder", builder),
            revealed_attrs: BTreeSet::new(),
            predicates: BTreeSet::new(),
        };

        trace!("SubProofRequestBuilder::new: <<< res: {:?}", res);
        Ok(res)
    }

    /// Adds a predicate such as `age GE 18`.
    pub fn add_predicate(&mut self, attr_name: &str, p_type: &str, value: i32) -> ProofResult<()> {
        trace!(
            "SubProofRequestBuilder::add_predicate: >>> attr_name: {:?}, p_type: {:?}, value: {:?}",
            attr_name,
            p_type,
            value
        );

        let builder = self.handle.get_mut()?;
        check_attr_name(attr_name)?;
        if p_type.is_empty() {
            return Err(err_msg(
                ProofErrorKind::InvalidParameter,
                "Empty predicate type has been passed",
            ));
        }

        builder
            .add_predicate(attr_name, p_type, value)
            .map_err(|err| {
                let kind = accumulate_kind(err.kind());
                err.to_proof_error(kind, format!("Unable to add predicate on {:?}", attr_name))
            })?;

        self.predicates.insert(Predicate {
            attr_name: attr_name.to_owned(),
            p_type: p_type.to_owned(),
            value,
        });

        trace!("SubProofRequestBuilder::add_predicate: <<<");
        Ok(())
    }

    /// Marks an attribute to be disclosed in the clear. Adding the same name
    /// twice has no further effect.
    pub fn add_revealed_attr(&mut self, attr: &str) -> ProofResult<()> {
        trace!("SubProofRequestBuilder::add_revealed_attr: >>> attr: {:?}", attr);

        let builder = self.handle.get_mut()?;
        check_attr_name(attr)?;

        builder.add_revealed_attr(attr).map_err(|err| {
            let kind = accumulate_kind(err.kind());
            err.to_proof_error(kind, format!("Unable to reveal {:?}", attr))
        })?;

        self.revealed_attrs.insert(attr.to_owned());

        trace!("SubProofRequestBuilder::add_revealed_attr: <<<");
        Ok(())
    }

    /// Releases the builder and returns the sub proof request. Every later
    /// call on this builder fails with `InvalidState`.
    pub fn finalize(&mut self) -> ProofResult<SubProofRequest> {
        trace!("SubProofRequestBuilder::finalize: >>>");

        let builder = self.handle.take()?;
        let request = builder.finalize().map_err(|err| {
            err.to_proof_error(ProofErrorKind::Build, "Unable to finalize sub proof request")
        })?;

        let res = SubProofRequest {
            handle: Handle::new("SubProofRequest", request),
            revealed_attrs: std::mem::take(&mut self.revealed_attrs),
            predicates: std::mem::take(&mut self.predicates),
        };

        trace!("SubProofRequestBuilder::finalize: <<< res: {:?}", res);
        Ok(res)
    }

    pub fn is_finalized(&self) -> bool {
        !self.handle.is_live()
    }
}

/// Attributes to reveal and predicates to satisfy for one credential.
#[derive(Debug)]
pub struct SubProofRequest {
    handle: Handle<cl::SubProofRequest>,
    revealed_attrs: BTreeSet<String>,
    predicates: BTreeSet<Predicate>,
}

impl SubProofRequest {
    pub fn revealed_attrs(&self) -> &BTreeSet<String> {
        &self.revealed_attrs
    }

    pub fn predicates(&self) -> &BTreeSet<Predicate> {
        &self.predicates
    }

    pub fn is_released(&self) -> bool {
        !self.handle.is_live()
    }

    /// Primitive request, for handing to a verifier or a proof builder.
    pub fn inner(&self) -> ProofResult<&cl::SubProofRequest> {
        self.handle.get()
    }

    pub fn free(&mut self) -> ProofResult<()> {
        trace!("SubProofRequest::free: >>>");

        let res = self.handle.free();

        trace!("SubProofRequest::free: <<< res: {:?}", res);
        res
    }
}

pub(crate) fn check_attr_name(attr: &str) -> ProofResult<()> {
    if attr.is_empty() {
        return Err(err_msg(
            ProofErrorKind::InvalidParameter,
            "Empty attribute name has been passed",
        ));
    }
    Ok(())
}
