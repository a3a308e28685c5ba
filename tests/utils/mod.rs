#![allow(dead_code)]

use ursa::cl::issuer::Issuer;
use ursa::cl::prover::Prover;
use ursa::cl::{
    new_nonce, CredentialPublicKey, CredentialSchema, CredentialSignature, CredentialValues,
    MasterSecret, NonCredentialSchema, RevocationKeyPublic, RevocationRegistry,
    SimpleTailsAccessor, Witness,
};

use ursa_cl_proof::{SubProofRequest, SubProofRequestBuilder};

pub const PROVER_ID: &str = "CnEDk9HrMnmiHXEV1WFgbVCRteYnPqsJwrTdcZaNhFVW";
// Master secret is now called link secret.
pub const LINK_SECRET: &str = "master_secret";

/// Everything a prover holds for one issued credential.
pub struct Credential {
    pub schema: CredentialSchema,
    pub non_schema: NonCredentialSchema,
    pub pub_key: CredentialPublicKey,
    pub signature: CredentialSignature,
    pub values: CredentialValues,
}

pub struct RevocableCredential {
    pub credential: Credential,
    pub rev_key_pub: RevocationKeyPublic,
    pub rev_reg: RevocationRegistry,
    pub witness: Witness,
}

pub fn gvt_credential_schema() -> CredentialSchema {
    let mut credential_schema_builder = Issuer::new_credential_schema_builder().unwrap();
    credential_schema_builder.add_attr("name").unwrap();
    credential_schema_builder.add_attr("sex").unwrap();
    credential_schema_builder.add_attr("age").unwrap();
    credential_schema_builder.add_attr("height").unwrap();
    credential_schema_builder.finalize().unwrap()
}

pub fn xyz_credential_schema() -> CredentialSchema {
    let mut credential_schema_builder = Issuer::new_credential_schema_builder().unwrap();
    credential_schema_builder.add_attr("status").unwrap();
    credential_schema_builder.add_attr("period").unwrap();
    credential_schema_builder.finalize().unwrap()
}

pub fn non_credential_schema() -> NonCredentialSchema {
    let mut non_credential_schema_builder = Issuer::new_non_credential_schema_builder().unwrap();
    non_credential_schema_builder.add_attr(LINK_SECRET).unwrap();
    non_credential_schema_builder.finalize().unwrap()
}

pub fn gvt_credential_values(master_secret: &MasterSecret) -> CredentialValues {
    let mut credential_values_builder = Issuer::new_credential_values_builder().unwrap();
    credential_values_builder
        .add_value_hidden(LINK_SECRET, &master_secret.value().unwrap())
        .unwrap();
    credential_values_builder
        .add_dec_known("name", "1139481716457488690172217916278103335")
        .unwrap();
    credential_values_builder
        .add_dec_known(
            "sex",
            "5944657099558967239210949258394887428692050081607692519917050011144233115103",
        )
        .unwrap();
    credential_values_builder.add_dec_known("age", "28").unwrap();
    credential_values_builder.add_dec_known("height", "175").unwrap();
    credential_values_builder.finalize().unwrap()
}

pub fn xyz_credential_values(master_secret: &MasterSecret) -> CredentialValues {
    let mut credential_values_builder = Issuer::new_credential_values_builder().unwrap();
    credential_values_builder
        .add_value_hidden(LINK_SECRET, &master_secret.value().unwrap())
        .unwrap();
    credential_values_builder
        .add_dec_known("status", "51792877103171595686471452153480627530895")
        .unwrap();
    credential_values_builder.add_dec_known("period", "8").unwrap();
    credential_values_builder.finalize().unwrap()
}

/// Reveals `name` and proves `age GE 18`.
pub fn gvt_sub_proof_request() -> SubProofRequest {
    let mut builder = SubProofRequestBuilder::new().unwrap();
    builder.add_revealed_attr("name").unwrap();
    builder.add_predicate("age", "GE", 18).unwrap();
    builder.finalize().unwrap()
}

/// Reveals `status` and proves `period GE 4`.
pub fn xyz_sub_proof_request() -> SubProofRequest {
    let mut builder = SubProofRequestBuilder::new().unwrap();
    builder.add_revealed_attr("status").unwrap();
    builder.add_predicate("period", "GE", 4).unwrap();
    builder.finalize().unwrap()
}

/// Issuer signs `values` under a fresh credential definition without
/// revocation and the prover processes the signature.
pub fn issue_credential(schema: CredentialSchema, values: CredentialValues) -> Credential {
    let non_schema = non_credential_schema();

    let (pub_key, priv_key, key_correctness_proof) =
        Issuer::new_credential_def(&schema, &non_schema, false).unwrap();

    let credential_nonce = new_nonce().unwrap();
    let (
        blinded_credential_secrets,
        credential_secrets_blinding_factors,
        blinded_credential_secrets_correctness_proof,
    ) = Prover::blind_credential_secrets(
        &pub_key,
        &key_correctness_proof,
        &values,
        &credential_nonce,
    )
    .unwrap();

    let credential_issuance_nonce = new_nonce().unwrap();
    let (mut signature, signature_correctness_proof) = Issuer::sign_credential(
        PROVER_ID,
        &blinded_credential_secrets,
        &blinded_credential_secrets_correctness_proof,
        &credential_nonce,
        &credential_issuance_nonce,
        &values,
        &pub_key,
        &priv_key,
    )
    .unwrap();

    Prover::process_credential_signature(
        &mut signature,
        &values,
        &signature_correctness_proof,
        &credential_secrets_blinding_factors,
        &pub_key,
        &credential_issuance_nonce,
        None,
        None,
        None,
    )
    .unwrap();

    Credential {
        schema,
        non_schema,
        pub_key,
        signature,
        values,
    }
}

/// Same as [`issue_credential`] but under a revocation registry with
/// issuance on demand.
pub fn issue_revocable_credential(
    schema: CredentialSchema,
    values: CredentialValues,
) -> RevocableCredential {
    let non_schema = non_credential_schema();

    let (pub_key, priv_key, key_correctness_proof) =
        Issuer::new_credential_def(&schema, &non_schema, true).unwrap();

    let max_cred_num = 5;
    let issuance_by_default = false;
    let (rev_key_pub, rev_key_priv, mut rev_reg, mut rev_tails_generator) =
        Issuer::new_revocation_registry_def(&pub_key, max_cred_num, issuance_by_default)
            .unwrap();
    let simple_tail_accessor = SimpleTailsAccessor::new(&mut rev_tails_generator).unwrap();

    let credential_nonce = new_nonce().unwrap();
    let (
        blinded_credential_secrets,
        credential_secrets_blinding_factors,
        blinded_credential_secrets_correctness_proof,
    ) = Prover::blind_credential_secrets(
        &pub_key,
        &key_correctness_proof,
        &values,
        &credential_nonce,
    )
    .unwrap();

    let credential_issuance_nonce = new_nonce().unwrap();
    let rev_idx = 1;
    let (mut signature, signature_correctness_proof, rev_reg_delta) =
        Issuer::sign_credential_with_revoc(
            PROVER_ID,
            &blinded_credential_secrets,
            &blinded_credential_secrets_correctness_proof,
            &credential_nonce,
            &credential_issuance_nonce,
            &values,
            &pub_key,
            &priv_key,
            rev_idx,
            max_cred_num,
            issuance_by_default,
            &mut rev_reg,
            &rev_key_priv,
            &simple_tail_accessor,
        )
        .unwrap();

    let witness = Witness::new(
        rev_idx,
        max_cred_num,
        issuance_by_default,
        &rev_reg_delta.unwrap(),
        &simple_tail_accessor,
    )
    .unwrap();

    Prover::process_credential_signature(
        &mut signature,
        &values,
        &signature_correctness_proof,
        &credential_secrets_blinding_factors,
        &pub_key,
        &credential_issuance_nonce,
        Some(&rev_key_pub),
        Some(&rev_reg),
        Some(&witness),
    )
    .unwrap();

    RevocableCredential {
        credential: Credential {
            schema,
            non_schema,
            pub_key,
            signature,
            values,
        },
        rev_key_pub,
        rev_reg,
        witness,
    }
}
