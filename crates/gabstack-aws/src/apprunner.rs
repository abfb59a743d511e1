//! App Runner service descriptor builder
//!
//! Builds the `AWS::AppRunner::Service` property set (image source,
//! runtime secret bindings, instance sizing, private networking) and the
//! `AWS::AppRunner::VpcIngressConnection` tying the service to the
//! internal VPC endpoint.

use gabstack_core::{DeployContext, SECRET_FIELDS, SecretSource, Stage};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Listening port of the container
pub const SERVICE_PORT: &str = "5000";

/// Instance sizing, fixed for every stage
pub const INSTANCE_CPU: &str = "1 vCPU";
pub const INSTANCE_MEMORY: &str = "2 GB";

/// `AWS::AppRunner::Service` properties
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceDescriptor {
    pub service_name: String,
    pub source_configuration: SourceConfiguration,
    pub instance_configuration: InstanceConfiguration,
    pub network_configuration: NetworkConfiguration,
    pub auto_scaling_configuration_arn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SourceConfiguration {
    pub authentication_configuration: AuthenticationConfiguration,
    pub auto_deployments_enabled: bool,
    pub image_repository: ImageRepository,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticationConfiguration {
    pub access_role_arn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageRepository {
    pub image_identifier: String,
    pub image_repository_type: String,
    pub image_configuration: ImageConfiguration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageConfiguration {
    pub port: String,
    pub runtime_environment_secrets: Vec<KeyValuePair>,
    pub runtime_environment_variables: Vec<KeyValuePair>,
}

/// Name/value pair used by both env vars and secret bindings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyValuePair {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceConfiguration {
    pub cpu: String,
    pub memory: String,
    /// Role ARN or a deferred `Fn::GetAtt` token
    pub instance_role_arn: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkConfiguration {
    pub egress_configuration: EgressConfiguration,
    pub ingress_configuration: IngressConfiguration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EgressConfiguration {
    pub egress_type: String,
    pub vpc_connector_arn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IngressConfiguration {
    pub is_publicly_accessible: bool,
}

/// `AWS::AppRunner::VpcIngressConnection` properties
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VpcIngressConnection {
    pub ingress_vpc_configuration: IngressVpcConfiguration,
    /// Service ARN or a deferred `Fn::GetAtt` token
    pub service_arn: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IngressVpcConfiguration {
    pub vpc_endpoint_id: String,
    pub vpc_id: String,
}

/// Secret bundle the runtime environment reads from.
///
/// Everything that is not prod reads the UAT bundle. This branch is
/// evaluated independently of `iam::role_secret_source` and makes the
/// opposite default choice: a stage like "staging" gets the prod role but
/// the UAT runtime secrets. Kept as-is from the original wiring;
/// `crate::secret_sources` surfaces the pairing so operators can see the
/// divergence.
pub fn service_secret_source(stage: &Stage) -> SecretSource {
    match stage {
        Stage::Prod => SecretSource::Prod,
        Stage::Develop | Stage::Other(_) => SecretSource::Uat,
    }
}

/// ECR image identifier for the stage
pub fn image_identifier(ctx: &DeployContext, stage: &Stage) -> String {
    format!(
        "{}.dkr.ecr.{}.amazonaws.com/{}:{}",
        ctx.account, ctx.region, ctx.image_repo, stage
    )
}

/// Service name for the stage
pub fn service_name(ctx: &DeployContext, stage: &Stage) -> String {
    format!("{}-{}", ctx.image_repo, stage)
}

/// Build the App Runner service descriptor for the given stage.
///
/// `instance_role_arn` is either a literal ARN or an `Fn::GetAtt` token
/// pointing at the role synthesized alongside the service.
pub fn service(ctx: &DeployContext, stage: &Stage, instance_role_arn: Value) -> ServiceDescriptor {
    let source = service_secret_source(stage);
    let secret_name = source.name(ctx);

    let runtime_environment_secrets = SECRET_FIELDS
        .iter()
        .map(|(env_name, field)| KeyValuePair {
            name: env_name.to_string(),
            value: ctx.secret_field_arn(secret_name, field),
        })
        .collect();

    ServiceDescriptor {
        service_name: service_name(ctx, stage),
        source_configuration: SourceConfiguration {
            authentication_configuration: AuthenticationConfiguration {
                access_role_arn: ctx.ecr_access_role_arn(),
            },
            auto_deployments_enabled: true,
            image_repository: ImageRepository {
                image_identifier: image_identifier(ctx, stage),
                image_repository_type: "ECR".to_string(),
                image_configuration: ImageConfiguration {
                    port: SERVICE_PORT.to_string(),
                    runtime_environment_secrets,
                    runtime_environment_variables: vec![KeyValuePair {
                        name: "AWS_DEFAULT_REGION".to_string(),
                        value: ctx.region.clone(),
                    }],
                },
            },
        },
        instance_configuration: InstanceConfiguration {
            cpu: INSTANCE_CPU.to_string(),
            memory: INSTANCE_MEMORY.to_string(),
            instance_role_arn,
        },
        network_configuration: NetworkConfiguration {
            egress_configuration: EgressConfiguration {
                egress_type: "VPC".to_string(),
                vpc_connector_arn: ctx.vpc_connector_arn.clone(),
            },
            ingress_configuration: IngressConfiguration {
                // The service is only reachable through the VPC ingress
                // connection, never from the public internet.
                is_publicly_accessible: false,
            },
        },
        auto_scaling_configuration_arn: ctx.autoscaling_configuration_arn.clone(),
    }
}

/// Bind the internal VPC endpoint to the service
pub fn vpc_ingress_connection(ctx: &DeployContext, service_arn: Value) -> VpcIngressConnection {
    VpcIngressConnection {
        ingress_vpc_configuration: IngressVpcConfiguration {
            vpc_endpoint_id: ctx.vpc_endpoint_id.clone(),
            vpc_id: ctx.vpc_id.clone(),
        },
        service_arn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> DeployContext {
        DeployContext::internal()
    }

    #[test]
    fn image_identifier_is_literal_concatenation() {
        assert_eq!(
            image_identifier(&ctx(), &Stage::Develop),
            "123456789012.dkr.ecr.ap-northeast-1.amazonaws.com/sample-gab-be:develop"
        );
        assert_eq!(
            image_identifier(&ctx(), &Stage::Other("staging".into())),
            "123456789012.dkr.ecr.ap-northeast-1.amazonaws.com/sample-gab-be:staging"
        );
    }

    #[test]
    fn service_name_includes_stage() {
        assert_eq!(service_name(&ctx(), &Stage::Prod), "sample-gab-be-prod");
    }

    #[test]
    fn prod_service_reads_prod_bundle() {
        assert_eq!(service_secret_source(&Stage::Prod), SecretSource::Prod);
    }

    #[test]
    fn develop_service_reads_uat_bundle() {
        assert_eq!(service_secret_source(&Stage::Develop), SecretSource::Uat);
    }

    #[test]
    fn unknown_stage_falls_through_to_uat_bundle() {
        // Documented fall-through: the runtime side treats anything that
        // is not prod as UAT (the opposite of the role side).
        assert_eq!(
            service_secret_source(&Stage::Other("staging".into())),
            SecretSource::Uat
        );
    }

    #[test]
    fn exactly_four_secret_bindings_and_one_env_var() {
        let svc = service(&ctx(), &Stage::Develop, json!("arn:aws:iam::123456789012:role/x"));
        let image = &svc.source_configuration.image_repository.image_configuration;
        assert_eq!(image.runtime_environment_secrets.len(), 4);
        assert_eq!(image.runtime_environment_variables.len(), 1);
        assert_eq!(image.runtime_environment_variables[0].name, "AWS_DEFAULT_REGION");
        assert_eq!(image.runtime_environment_variables[0].value, "ap-northeast-1");
    }

    #[test]
    fn secret_bindings_point_at_bundle_fields() {
        let svc = service(&ctx(), &Stage::Develop, json!(null));
        let secrets = &svc
            .source_configuration
            .image_repository
            .image_configuration
            .runtime_environment_secrets;

        assert_eq!(secrets[0].name, "DB_URL");
        assert!(secrets[0].value.ends_with(":db_url::"));
        assert!(secrets[0].value.contains("sample-gab-be-uat-secrets-Kx3mPa"));
        assert_eq!(secrets[3].name, "AWS_ACCESS_KEY_ID");
        assert!(secrets[3].value.ends_with(":AWS_ACCESS_KEY_ID::"));
    }

    #[test]
    fn ingress_is_private_for_every_stage() {
        for stage in [Stage::Develop, Stage::Prod, Stage::Other("staging".into())] {
            let svc = service(&ctx(), &stage, json!(null));
            assert!(
                !svc.network_configuration
                    .ingress_configuration
                    .is_publicly_accessible
            );
        }
    }

    #[test]
    fn egress_goes_through_internal_connector() {
        let svc = service(&ctx(), &Stage::Prod, json!(null));
        let egress = &svc.network_configuration.egress_configuration;
        assert_eq!(egress.egress_type, "VPC");
        assert_eq!(egress.vpc_connector_arn, ctx().vpc_connector_arn);
    }

    #[test]
    fn instance_sizing_is_fixed() {
        let svc = service(&ctx(), &Stage::Prod, json!(null));
        assert_eq!(svc.instance_configuration.cpu, "1 vCPU");
        assert_eq!(svc.instance_configuration.memory, "2 GB");
    }

    #[test]
    fn ingress_connection_binds_endpoint_and_vpc() {
        let conn = vpc_ingress_connection(&ctx(), json!({"Fn::GetAtt": ["Service", "ServiceArn"]}));
        assert_eq!(conn.ingress_vpc_configuration.vpc_endpoint_id, ctx().vpc_endpoint_id);
        assert_eq!(conn.ingress_vpc_configuration.vpc_id, ctx().vpc_id);
        assert_eq!(conn.service_arn["Fn::GetAtt"][0], "Service");
    }

    #[test]
    fn serializes_with_cloudformation_field_names() {
        let svc = service(&ctx(), &Stage::Develop, json!(null));
        let json = serde_json::to_value(&svc).unwrap();
        assert!(json.get("SourceConfiguration").is_some());
        assert_eq!(json["SourceConfiguration"]["AutoDeploymentsEnabled"], true);
        assert_eq!(
            json["SourceConfiguration"]["ImageRepository"]["ImageRepositoryType"],
            "ECR"
        );
        assert_eq!(
            json["NetworkConfiguration"]["IngressConfiguration"]["IsPubliclyAccessible"],
            false
        );
        assert_eq!(json["InstanceConfiguration"]["Cpu"], "1 vCPU");
    }
}
