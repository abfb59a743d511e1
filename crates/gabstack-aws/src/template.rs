//! Template assembly
//!
//! Collects the synthesized descriptors into a CloudFormation-format
//! template: three resources wired together through `Fn::GetAtt` tokens,
//! plus the stack outputs surfaced for operators (service id, name, ARN).

use crate::error::{Result, SynthError};
use crate::{apprunner, iam};
use gabstack_core::{DeployContext, Stage};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::Path;

/// Logical ids of the synthesized resources
pub const ROLE_LOGICAL_ID: &str = "InstanceRole";
pub const SERVICE_LOGICAL_ID: &str = "Service";
pub const INGRESS_LOGICAL_ID: &str = "VpcIngressConnection";

/// Deferred attribute reference, resolved by the provisioning platform at
/// apply time.
pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

/// CloudFormation-format template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Resources")]
    pub resources: BTreeMap<String, Resource>,
    #[serde(rename = "Outputs")]
    pub outputs: BTreeMap<String, Output>,
}

/// Single resource entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    #[serde(rename = "Properties")]
    pub properties: Value,
}

impl Resource {
    pub fn new<T: Serialize>(resource_type: &str, properties: &T) -> Result<Self> {
        Ok(Self {
            resource_type: resource_type.to_string(),
            properties: serde_json::to_value(properties)?,
        })
    }
}

/// Stack output entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Value")]
    pub value: Value,
}

impl Template {
    /// Pretty-printed JSON, the form handed to the provisioning platform
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the template to a file
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| SynthError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Synthesize the full stack for a stage: instance role, App Runner
/// service, VPC ingress connection, and the three operator-facing outputs.
pub fn synth(ctx: &DeployContext, stage: &Stage) -> Result<Template> {
    tracing::debug!(stage = %stage, "synthesizing stack template");

    let role = iam::instance_role(ctx, stage);
    let service = apprunner::service(ctx, stage, get_att(ROLE_LOGICAL_ID, "Arn"));
    let ingress = apprunner::vpc_ingress_connection(ctx, get_att(SERVICE_LOGICAL_ID, "ServiceArn"));
    let service_name = service.service_name.clone();

    let mut resources = BTreeMap::new();
    resources.insert(
        ROLE_LOGICAL_ID.to_string(),
        Resource::new("AWS::IAM::Role", &role)?,
    );
    resources.insert(
        SERVICE_LOGICAL_ID.to_string(),
        Resource::new("AWS::AppRunner::Service", &service)?,
    );
    resources.insert(
        INGRESS_LOGICAL_ID.to_string(),
        Resource::new("AWS::AppRunner::VpcIngressConnection", &ingress)?,
    );

    let mut outputs = BTreeMap::new();
    outputs.insert(
        "ServiceId".to_string(),
        Output {
            description: Some("App Runner service id".to_string()),
            value: get_att(SERVICE_LOGICAL_ID, "ServiceId"),
        },
    );
    outputs.insert(
        "ServiceName".to_string(),
        Output {
            description: Some("App Runner service name".to_string()),
            value: json!(service_name),
        },
    );
    outputs.insert(
        "ServiceArn".to_string(),
        Output {
            description: Some("App Runner service ARN".to_string()),
            value: get_att(SERVICE_LOGICAL_ID, "ServiceArn"),
        },
    );

    Ok(Template {
        format_version: "2010-09-09".to_string(),
        description: format!("Sample Gab Backend App Runner stack ({stage})"),
        resources,
        outputs,
    })
}
