//! IAM instance role resolver
//!
//! Builds the `AWS::IAM::Role` property set for the App Runner instance
//! role: one inline policy granting read access to exactly one stage
//! secret, assumable by the App Runner tasks service principal.

use gabstack_core::{DeployContext, SecretSource, Stage};
use serde::{Deserialize, Serialize};

/// Service principal that assumes the instance role
pub const APPRUNNER_TASKS_PRINCIPAL: &str = "tasks.apprunner.amazonaws.com";

/// IAM policy language version
pub const POLICY_VERSION: &str = "2012-10-17";

/// `AWS::IAM::Role` properties
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleDescriptor {
    pub role_name: String,
    pub description: String,
    pub assume_role_policy_document: PolicyDocument,
    pub policies: Vec<InlinePolicy>,
}

impl RoleDescriptor {
    /// The single secret ARN the role is allowed to read, if the role
    /// follows the one-policy/one-statement/one-resource shape.
    pub fn secret_resource(&self) -> Option<&str> {
        self.policies
            .first()
            .and_then(|p| p.policy_document.statement.first())
            .and_then(|s| s.resource.first())
            .map(String::as_str)
    }
}

/// Inline policy attached to a role
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InlinePolicy {
    pub policy_name: String,
    pub policy_document: PolicyDocument,
}

/// IAM policy document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

impl PolicyDocument {
    /// Trust policy allowing `principal` to assume the role
    pub fn assume_role(principal: &str) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement: vec![PolicyStatement {
                sid: None,
                effect: Effect::Allow,
                principal: Some(Principal {
                    service: principal.to_string(),
                }),
                action: vec!["sts:AssumeRole".to_string()],
                resource: Vec::new(),
            }],
        }
    }
}

/// Single policy statement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub effect: Effect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    pub action: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub resource: Vec<String>,
}

/// Statement effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// Statement principal (service principals only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Principal {
    pub service: String,
}

/// Secret bundle the instance role is granted access to.
///
/// Anything other than develop falls through to the production secret.
/// The original wiring had no error arm here; an unknown stage such as
/// "staging" deliberately gets the prod role. Note the service builder
/// makes the opposite default choice (`apprunner::service_secret_source`).
pub fn role_secret_source(stage: &Stage) -> SecretSource {
    match stage {
        Stage::Develop => SecretSource::Uat,
        Stage::Prod | Stage::Other(_) => SecretSource::Prod,
    }
}

/// Build the instance role for the given stage.
///
/// The role is scoped read-only: one inline policy, one statement,
/// `secretsmanager:GetSecretValue` on exactly one secret.
pub fn instance_role(ctx: &DeployContext, stage: &Stage) -> RoleDescriptor {
    let source = role_secret_source(stage);
    let env = match source {
        SecretSource::Uat => "Develop",
        SecretSource::Prod => "Prod",
    };

    RoleDescriptor {
        role_name: format!("SampleGabBE{env}AppRunnerInstanceRole"),
        description: format!("Role assumed for Sample Gab Backend {env} App Runner Services"),
        assume_role_policy_document: PolicyDocument::assume_role(APPRUNNER_TASKS_PRINCIPAL),
        policies: vec![InlinePolicy {
            policy_name: "SecretManagerPolicy".to_string(),
            policy_document: PolicyDocument {
                version: POLICY_VERSION.to_string(),
                statement: vec![PolicyStatement {
                    sid: Some("0".to_string()),
                    effect: Effect::Allow,
                    principal: None,
                    action: vec!["secretsmanager:GetSecretValue".to_string()],
                    resource: vec![source.arn(ctx)],
                }],
            },
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> DeployContext {
        DeployContext::internal()
    }

    #[test]
    fn develop_role_reads_uat_secret() {
        let role = instance_role(&ctx(), &Stage::Develop);
        assert_eq!(role.role_name, "SampleGabBEDevelopAppRunnerInstanceRole");
        assert_eq!(
            role.secret_resource().unwrap(),
            ctx().secret_arn("sample-gab-be-uat-secrets-Kx3mPa")
        );
    }

    #[test]
    fn prod_role_reads_prod_secret() {
        let role = instance_role(&ctx(), &Stage::Prod);
        assert_eq!(role.role_name, "SampleGabBEProdAppRunnerInstanceRole");
        assert_eq!(
            role.secret_resource().unwrap(),
            ctx().secret_arn("sample-gab-be-prod-secrets-R7nQwd")
        );
    }

    #[test]
    fn unknown_stage_falls_through_to_prod_role() {
        // Documented fall-through: any stage that is not develop is
        // treated as production on the role side.
        let role = instance_role(&ctx(), &Stage::Other("staging".to_string()));
        assert_eq!(role.role_name, "SampleGabBEProdAppRunnerInstanceRole");
        assert_eq!(role_secret_source(&Stage::Other("staging".into())), SecretSource::Prod);
    }

    #[test]
    fn role_is_scoped_read_only() {
        let role = instance_role(&ctx(), &Stage::Develop);
        assert_eq!(role.policies.len(), 1);
        assert_eq!(role.policies[0].policy_name, "SecretManagerPolicy");

        let doc = &role.policies[0].policy_document;
        assert_eq!(doc.statement.len(), 1);
        assert_eq!(doc.statement[0].action, vec!["secretsmanager:GetSecretValue"]);
        assert_eq!(doc.statement[0].resource.len(), 1);
        assert_eq!(doc.statement[0].effect, Effect::Allow);
    }

    #[test]
    fn trust_policy_targets_apprunner_tasks() {
        let role = instance_role(&ctx(), &Stage::Prod);
        let trust = &role.assume_role_policy_document.statement[0];
        assert_eq!(
            trust.principal.as_ref().unwrap().service,
            "tasks.apprunner.amazonaws.com"
        );
        assert_eq!(trust.action, vec!["sts:AssumeRole"]);
        assert!(trust.resource.is_empty());
    }

    #[test]
    fn serializes_with_cloudformation_field_names() {
        let role = instance_role(&ctx(), &Stage::Develop);
        let json = serde_json::to_value(&role).unwrap();
        assert!(json.get("RoleName").is_some());
        assert!(json.get("AssumeRolePolicyDocument").is_some());
        assert_eq!(json["Policies"][0]["PolicyDocument"]["Version"], "2012-10-17");
        assert_eq!(json["Policies"][0]["PolicyDocument"]["Statement"][0]["Sid"], "0");
        // The trust statement carries no Sid or Resource
        let trust = &json["AssumeRolePolicyDocument"]["Statement"][0];
        assert!(trust.get("Sid").is_none());
        assert!(trust.get("Resource").is_none());
    }
}
