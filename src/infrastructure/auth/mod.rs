//! Token verification infrastructure
//!
//! Verifiers are strategies over a single capability: given a bearer token,
//! produce normalized claims or fail. The chain tries each configured
//! verifier in order and stops at the first success; the managed identity
//! provider always precedes the local shared-secret verifier so externally
//! issued tokens take precedence.

pub mod cognito;
pub mod local;
pub mod verifier;

pub use cognito::CognitoTokenVerifier;
pub use local::LocalTokenVerifier;
pub use verifier::{TokenVerifier, VerifierChain, VerifierError};
