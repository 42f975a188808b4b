//! Handlers for the topology, status and sources commands

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::OutputFormat;
use crate::context::RenderContext;
use crate::duck::{self, StoredVersion};
use crate::models::{KnativeKind, ResourceReference, ResourceSummary};
use crate::status::{ConditionRow, StatusCode, summarize_conditions};
use crate::topology::{build_topology, render_text};

/// Reference for a kind typed on the command line
///
/// Accepts Knative short names (`ksvc`, `rev`) or a `Kind.group/version`
/// form for anything else, e.g. `PingSource.sources.knative.dev/v1`.
pub fn parse_target(kind: &str, name: &str, namespace: &str) -> Result<ResourceReference> {
    let reference = match KnativeKind::from_str_case_insensitive(kind) {
        Some(known) => ResourceReference::new(known.api_version(), known.as_str()),
        None => {
            let (kind, api_version) = kind.split_once('.').with_context(|| {
                format!(
                    "Unknown kind '{}'; use a Knative kind or Kind.group/version",
                    kind
                )
            })?;
            if !api_version.contains('/') {
                anyhow::bail!("Missing version in '{}.{}'", kind, api_version);
            }
            ResourceReference::new(api_version, kind)
        }
    };
    Ok(reference.with_name(name).with_namespace(namespace))
}

fn print_structured<T: Serialize>(value: &T, output: OutputFormat) -> Result<bool> {
    match output {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(value).context("Failed to serialize output")?
            );
            Ok(true)
        }
        OutputFormat::Yaml => {
            print!(
                "{}",
                serde_yaml::to_string(value).context("Failed to serialize output")?
            );
            Ok(true)
        }
        OutputFormat::Tree => Ok(false),
    }
}

/// `graph <kind> <name>`
pub async fn handle_graph(
    ctx: &RenderContext,
    target: &ResourceReference,
    output: OutputFormat,
) -> Result<()> {
    let graph = build_topology(ctx, target)
        .await
        .with_context(|| format!("Failed to build topology for {}", target))?;

    if !print_structured(&graph, output)? {
        print!("{}", render_text(&graph));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    reference: ResourceReference,
    condition: String,
    status: StatusCode,
    text: String,
    conditions: Vec<ConditionRow>,
}

/// `status <kind> <name>`
pub async fn handle_status(
    ctx: &RenderContext,
    target: &ResourceReference,
    condition: &str,
    output: OutputFormat,
) -> Result<()> {
    let obj = ctx
        .client
        .get(target)
        .await
        .with_context(|| format!("Failed to fetch {}", target))?;
    let summary = ResourceSummary::try_from(&obj)
        .with_context(|| format!("Unusable object {}", target))?;

    let synthesized = summary.conditions().status(condition);
    let report = StatusReport {
        reference: summary.reference().clone(),
        condition: condition.to_string(),
        status: synthesized.status_code(),
        text: synthesized.status_text(),
        conditions: summarize_conditions(summary.conditions()),
    };

    if print_structured(&report, output)? {
        return Ok(());
    }

    println!(
        "{}/{}: {} ({})",
        summary.kind(),
        summary.name(),
        report.text,
        report.status.as_str()
    );
    if report.conditions.is_empty() {
        return Ok(());
    }
    println!();
    println!("{:<24} {:<8} {}", "CONDITION", "STATUS", "SUMMARY");
    for row in &report.conditions {
        println!("{:<24} {:<8} {}", row.type_, row.status.as_str(), row.text);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceRow {
    kind: String,
    stored: String,
    served: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_observed: Option<String>,
}

fn source_rows(observed: &[ResourceReference], resolved: Vec<StoredVersion>) -> Vec<SourceRow> {
    resolved
        .into_iter()
        .map(|entry| {
            let latest_observed = duck::latest_version(
                observed
                    .iter()
                    .filter(|r| r.kind == entry.kind)
                    .map(|r| r.version()),
            )
            .map(str::to_string);
            SourceRow {
                kind: entry.kind,
                stored: entry.version.name,
                served: entry.version.served,
                latest_observed,
            }
        })
        .collect()
}

/// `sources`
pub async fn handle_sources(ctx: &RenderContext, registry: &str, output: OutputFormat) -> Result<()> {
    let client = ctx.client.as_ref();
    let observed = duck::observed_source_refs(client, registry)
        .await
        .with_context(|| format!("Failed to read duck type registry {}", registry))?;
    let mut resolved = duck::resolve_stored_versions(client, &observed).await;
    resolved.sort_by(|a, b| a.kind.cmp(&b.kind));
    let rows = source_rows(&observed, resolved);

    if print_structured(&rows, output)? {
        return Ok(());
    }

    println!("{:<28} {:<10} {:<8} {}", "KIND", "STORED", "SERVED", "LATEST");
    for row in &rows {
        println!(
            "{:<28} {:<10} {:<8} {}",
            row.kind,
            row.stored,
            row.served,
            row.latest_observed.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinitionVersion;

    #[test]
    fn test_parse_target_short_name() {
        let reference = parse_target("ksvc", "hello", "default").unwrap();
        assert_eq!(reference.kind, "Service");
        assert_eq!(reference.api_version, "serving.knative.dev/v1");
        assert_eq!(reference.name.as_deref(), Some("hello"));
        assert_eq!(reference.namespace.as_deref(), Some("default"));
    }

    #[test]
    fn test_parse_target_qualified_kind() {
        let reference =
            parse_target("PingSource.sources.knative.dev/v1", "beat", "default").unwrap();
        assert_eq!(reference.kind, "PingSource");
        assert_eq!(reference.api_version, "sources.knative.dev/v1");

        assert!(parse_target("widget", "x", "default").is_err());
        assert!(parse_target("Widget.example.com", "x", "default").is_err());
    }

    #[test]
    fn test_source_rows_pick_latest_observed() {
        let observed = vec![
            ResourceReference::new("sources.knative.dev/v1beta2", "PingSource"),
            ResourceReference::new("sources.knative.dev/v1", "PingSource"),
        ];
        let resolved = vec![StoredVersion {
            kind: "PingSource".to_string(),
            version: CustomResourceDefinitionVersion {
                name: "v1".to_string(),
                served: true,
                storage: true,
                ..Default::default()
            },
        }];
        let rows = source_rows(&observed, resolved);
        assert_eq!(rows[0].latest_observed.as_deref(), Some("v1"));
        assert_eq!(rows[0].stored, "v1");
    }
}
