//! Dry-run rendering commands

use crate::cli::display::TableRenderer;
use crate::domain::application::HelmApplication;
use crate::domain::cd::ResourceIdentifier;
use crate::domain::config::{apply_to_config, parse_dynamic_configs, OutputFormat, ProvisionerConfig};
use crate::infrastructure::cd::DryRunDriver;
use crate::provisioners::application::{ApplicationProvisioner, Generator, Parameterizer};
use crate::provisioners::{ClusterContext, ProvisionContext, Provisioner};
use crate::shared::{Outcome, ProvisionError};
use async_trait::async_trait;
use clap::Parser;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug, Clone)]
pub struct RenderCommand {
    /// Application manifest (YAML)
    #[arg(long, short = 'a', value_name = "PATH")]
    pub application: String,

    /// Application version to render
    #[arg(long = "app-version", value_name = "VERSION")]
    pub app_version: String,

    /// Install namespace, overriding the version's
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Owner resource label used to build the resource identifier (-l key=value)
    #[arg(long = "label", short = 'l', value_name = "KEY=VALUE")]
    pub labels: Vec<String>,

    /// Extra Helm parameter appended after the version's own (--set name=value)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub parameters: Vec<String>,

    /// Render as if installing onto the named remote cluster
    #[arg(long)]
    pub cluster: Option<String>,

    /// Accept a degraded application as healthy
    #[arg(long)]
    pub allow_degraded: bool,

    /// Number of passes the dry-run driver reports as not ready
    #[arg(long, default_value = "0")]
    pub pending_passes: usize,

    /// Output format: table, yaml or json
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// Path to provisioner configuration file (TOML)
    /// If not provided, reads from KUBE_PROVISIONERS_CONFIG or uses defaults
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Dynamic configuration properties to override any settings (-D key=value)
    ///
    /// Retry: retry.period-ms, retry.timeout-secs (none disables the deadline)
    /// Render: render.output, render.default-namespace
    ///
    /// Example: -Dretry.period-ms=200 -Drender.output=yaml
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct VersionsCommand {
    /// Application manifest (YAML)
    #[arg(long, short = 'a', value_name = "PATH")]
    pub application: String,

    /// Output format: table, yaml or json
    #[arg(long, short = 'o', default_value = "table")]
    pub output: String,
}

/// Parameters given on the command line.
struct ExtraParameters(BTreeMap<String, String>);

#[async_trait]
impl Parameterizer for ExtraParameters {
    async fn parameters(
        &self,
        _ctx: &ProvisionContext,
        _interface: Option<&str>,
    ) -> crate::shared::Result<BTreeMap<String, String>> {
        Ok(self.0.clone())
    }
}

impl Generator for ExtraParameters {
    fn parameterizer(&self) -> Option<&dyn Parameterizer> {
        Some(self)
    }
}

/// Application not ready yet; retried by the render loop.
#[derive(Debug, thiserror::Error)]
#[error("application {0} not ready")]
struct NotReady(String);

/// Split `key=value` pairs, rejecting anything without a key.
pub fn parse_pairs(pairs: &[String]) -> anyhow::Result<BTreeMap<String, String>> {
    let configs = parse_dynamic_configs(pairs)?;
    Ok(configs.into_iter().collect())
}

impl RenderCommand {
    fn load_config(&self) -> anyhow::Result<ProvisionerConfig> {
        let mut config = ProvisionerConfig::load(self.config.as_deref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        if !self.properties.is_empty() {
            let configs = parse_dynamic_configs(&self.properties)
                .map_err(|e| anyhow::anyhow!("Failed to parse dynamic configs: {}", e))?;
            apply_to_config(&configs, &mut config)?;
        }

        Ok(config)
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        let config = self.load_config()?;
        let output = match &self.output {
            Some(output) => output.parse::<OutputFormat>()?,
            None => config.render.output,
        };

        let application = HelmApplication::from_file(&self.application).map_err(|e| {
            anyhow::anyhow!("Failed to load application {}: {}", self.application, e)
        })?;
        application.validate()?;

        let version_namespace = application.get_version(&self.app_version)?.namespace.clone();
        let name = application.name().to_string();

        let mut provisioner = ApplicationProvisioner::fixed(application, &self.app_version);
        match (&self.namespace, version_namespace) {
            (Some(namespace), _) => provisioner = provisioner.in_namespace(namespace),
            (None, None) => provisioner = provisioner.in_namespace(&config.render.default_namespace),
            (None, Some(_)) => {}
        }
        if !self.parameters.is_empty() {
            provisioner = provisioner.with_generator(ExtraParameters(parse_pairs(&self.parameters)?));
        }
        if self.allow_degraded {
            provisioner = provisioner.allow_degraded();
        }

        let labels: HashMap<String, String> = parse_pairs(&self.labels)?.into_iter().collect();

        let driver = Arc::new(DryRunDriver::new().with_pending_passes(self.pending_passes));
        let token = CancellationToken::new();

        let mut ctx = ProvisionContext::new(driver.clone())
            .with_resource_labels(labels)
            .with_cancellation(token.clone());
        if let Some(cluster) = &self.cluster {
            ctx = ctx.with_cluster(ClusterContext {
                id: Some(ResourceIdentifier::new(cluster)),
                ..Default::default()
            });
        }

        let canceller = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                canceller.cancel();
            }
        });

        let passes = AtomicUsize::new(0);
        let (passes_ref, provisioner_ref, ctx_ref, name_ref) = (&passes, &provisioner, &ctx, &name);

        let result = config
            .retry
            .retrier()
            .run_with_cancellation(&token, move || async move {
                passes_ref.fetch_add(1, Ordering::SeqCst);
                match provisioner_ref.converge(ctx_ref).await {
                    Ok(Outcome::Success) => Ok(Ok(())),
                    Ok(Outcome::Yield) => Err(NotReady(name_ref.clone())),
                    Err(e) => Ok(Err(e)),
                }
            })
            .await;

        let outcome = match result {
            Ok(Ok(())) => Outcome::Success,
            Ok(Err(e)) => return Err(anyhow::anyhow!("Render failed: {}", e)),
            Err(e) if e.context() == crate::shared::ContextError::Cancelled => {
                return Err(ProvisionError::Cancelled.into());
            }
            Err(e) => {
                tracing::info!(error = %e, cause = %e.context(), "giving up waiting for application");
                Outcome::Yield
            }
        };

        let submission = driver
            .applications()
            .await
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No application was submitted"))?;

        match output {
            OutputFormat::Table => {
                let renderer = TableRenderer::new();
                println!(
                    "{}",
                    renderer.render_submission(&submission, outcome, passes.load(Ordering::SeqCst))
                );
            }
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&submission.application)?),
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&submission.application)?)
            }
        }

        Ok(())
    }
}

impl VersionsCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let application = HelmApplication::from_file(&self.application).map_err(|e| {
            anyhow::anyhow!("Failed to load application {}: {}", self.application, e)
        })?;

        match self.output.parse::<OutputFormat>()? {
            OutputFormat::Table => {
                let renderer = TableRenderer::new();
                println!("{}", renderer.render_versions(&application));
            }
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&application.spec.versions)?),
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&application.spec.versions)?)
            }
        }

        Ok(())
    }
}
