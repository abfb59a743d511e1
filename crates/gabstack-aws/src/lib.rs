//! gabstack AWS Resource Synthesis
//!
//! This crate turns a deployment stage into the AWS resource descriptors
//! for the Sample Gab backend: the App Runner instance role, the App
//! Runner service itself, and the private VPC ingress wiring. The output
//! is a CloudFormation-format template; applying it is entirely the
//! provisioning platform's job.
//!
//! # Architecture
//!
//! ```text
//! DeployContext + Stage
//!         │
//!   ┌─────▼─────┐      ┌──────────────┐
//!   │ iam        │─────▶│ template      │──▶ CloudFormation JSON
//!   │ (role)     │      │ (synth +      │
//!   ├────────────┤      │  outputs)     │
//!   │ apprunner  │─────▶│               │
//!   │ (service + │      └──────────────┘
//!   │  ingress)  │
//!   └────────────┘
//! ```
//!
//! The role resolver and the service builder each select a stage secret
//! independently, and their defaults disagree for stages other than
//! develop/prod. That asymmetry is inherited from the original wiring and
//! preserved; [`secret_sources`] exposes the pairing so callers can warn
//! about it instead of silently deploying a mismatched stack.

pub mod apprunner;
pub mod error;
pub mod iam;
pub mod template;

// Re-exports
pub use apprunner::{ServiceDescriptor, VpcIngressConnection, service, vpc_ingress_connection};
pub use error::{Result, SynthError};
pub use iam::{RoleDescriptor, instance_role};
pub use template::{Template, synth};

use gabstack_core::{SecretSource, Stage};

/// Secret selections made independently by the role resolver and the
/// service builder for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretSources {
    /// Bundle the instance role may read
    pub role: SecretSource,
    /// Bundle the runtime environment binds
    pub service: SecretSource,
}

impl SecretSources {
    /// True when the role grants access to a different bundle than the
    /// runtime actually binds — the service would fail to read its
    /// secrets at startup.
    pub fn diverges(&self) -> bool {
        self.role != self.service
    }
}

/// Pair the two independent secret selections for a stage.
pub fn secret_sources(stage: &Stage) -> SecretSources {
    SecretSources {
        role: iam::role_secret_source(stage),
        service: apprunner::service_secret_source(stage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn develop_sources_agree_on_uat() {
        let sources = secret_sources(&Stage::Develop);
        assert_eq!(sources.role, SecretSource::Uat);
        assert_eq!(sources.service, SecretSource::Uat);
        assert!(!sources.diverges());
    }

    #[test]
    fn prod_sources_agree_on_prod() {
        let sources = secret_sources(&Stage::Prod);
        assert_eq!(sources.role, SecretSource::Prod);
        assert_eq!(sources.service, SecretSource::Prod);
        assert!(!sources.diverges());
    }

    #[test]
    fn other_stages_diverge() {
        // Regression guard for the inherited mismatch: the role side
        // defaults to prod, the runtime side defaults to UAT. This is the
        // documented behavior, not a bug to fix here.
        let sources = secret_sources(&Stage::Other("staging".to_string()));
        assert_eq!(sources.role, SecretSource::Prod);
        assert_eq!(sources.service, SecretSource::Uat);
        assert!(sources.diverges());
    }
}
