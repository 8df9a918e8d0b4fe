// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Installs one catalogue application through the deployment driver.
//!
//! The provisioner resolves its application on every call, so the catalogue
//! entry and version may change between reconciliations. The driver-facing
//! descriptor is rebuilt from scratch each time.

pub mod hooks;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

pub use hooks::{
    ApplicationResolver, CatalogueApplication, Customizer, FixedApplication, Generator,
    Parameterizer, PostProvisionHook, PreDeprovisionHook, ReleaseNamer, ValuesGenerator,
};

use super::{ProvisionContext, Provisioner};
use crate::domain::application::{HelmApplication, HelmApplicationVersion};
use crate::domain::cd::{self, HelmApplicationParameter, ResourceIdentifier};
use crate::infrastructure::constants::{DEFAULT_APPLICATION_NAMESPACE, PROVISIONER_APPLICATION};
use crate::shared::{Outcome, ProvisionError, Result};

/// Resolved catalogue entry for one invocation.
struct Resolved {
    name: String,
    version: HelmApplicationVersion,
}

pub struct ApplicationProvisioner {
    name: String,
    resolver: Arc<dyn ApplicationResolver>,
    namespace: Option<String>,
    generator: Option<Arc<dyn Generator>>,
    allow_degraded: bool,
}

impl ApplicationProvisioner {
    pub fn new<R>(resolver: R) -> Self
    where
        R: ApplicationResolver + 'static,
    {
        Self {
            name: PROVISIONER_APPLICATION.to_string(),
            resolver: Arc::new(resolver),
            namespace: None,
            generator: None,
            allow_degraded: false,
        }
    }

    /// Provisioner for an application known at tree-build time, named after it.
    pub fn fixed(application: HelmApplication, version: impl Into<String>) -> Self {
        let name = application.name().to_string();
        Self::new(FixedApplication::new(application, version)).named(name)
    }

    /// Name used in logs; the resource identifier always uses the
    /// application's own name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Deploys into an explicit namespace, overriding the version's.
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_generator<G>(mut self, generator: G) -> Self
    where
        G: Generator + 'static,
    {
        self.generator = Some(Arc::new(generator));
        self
    }

    /// Accepts a degraded health status as converged.
    pub fn allow_degraded(mut self) -> Self {
        self.allow_degraded = true;
        self
    }

    async fn resolve(&self, ctx: &ProvisionContext) -> Result<Resolved> {
        let (application, version) = self.resolver.resolve(ctx).await?;
        let resolved = application.get_version(&version)?.clone();

        Ok(Resolved {
            name: application.name().to_string(),
            version: resolved,
        })
    }

    fn resource_id(&self, ctx: &ProvisionContext, name: &str) -> Result<ResourceIdentifier> {
        Ok(ResourceIdentifier::with_labels(name, ctx.resource_labels()?))
    }

    async fn release_name(&self, ctx: &ProvisionContext, version: &HelmApplicationVersion) -> String {
        let mut release = version.release.clone().unwrap_or_default();

        if let Some(namer) = self.generator.as_ref().and_then(|g| g.release_namer()) {
            let name = namer.release_name(ctx).await;
            if !name.is_empty() {
                release = name;
            }
        }

        release
    }

    async fn parameters(
        &self,
        ctx: &ProvisionContext,
        version: &HelmApplicationVersion,
    ) -> Result<Option<Vec<HelmApplicationParameter>>> {
        let mut parameters: Vec<HelmApplicationParameter> = version
            .parameters
            .iter()
            .map(|p| HelmApplicationParameter {
                name: p.name.clone(),
                value: p.value.clone(),
            })
            .collect();

        if let Some(parameterizer) = self.generator.as_ref().and_then(|g| g.parameterizer()) {
            let generated = parameterizer
                .parameters(ctx, version.interface.as_deref())
                .await?;

            // Generated values win over the version's static ones.
            parameters.retain(|p| !generated.contains_key(&p.name));
            parameters.extend(
                generated
                    .into_iter()
                    .map(|(name, value)| HelmApplicationParameter { name, value }),
            );
        }

        Ok((!parameters.is_empty()).then_some(parameters))
    }

    async fn values(
        &self,
        ctx: &ProvisionContext,
        version: &HelmApplicationVersion,
    ) -> Result<Option<serde_json::Value>> {
        match self.generator.as_ref().and_then(|g| g.values_generator()) {
            Some(generator) => generator.values(ctx, version.interface.as_deref()).await,
            None => Ok(None),
        }
    }

    fn namespace(&self, version: &HelmApplicationVersion) -> String {
        self.namespace
            .clone()
            .or_else(|| version.namespace.clone())
            .unwrap_or_else(|| DEFAULT_APPLICATION_NAMESPACE.to_string())
    }

    /// Converts a catalogue version into the driver's canonical form.
    pub(crate) async fn generate(
        &self,
        ctx: &ProvisionContext,
        version: &HelmApplicationVersion,
    ) -> Result<cd::HelmApplication> {
        let mut application = cd::HelmApplication {
            repo: version.repo.clone(),
            version: version.version.clone(),
            release: self.release_name(ctx, version).await,
            parameters: self.parameters(ctx, version).await?,
            values: self.values(ctx, version).await?,
            cluster: ctx.cluster().id.clone(),
            namespace: self.namespace(version),
            allow_degraded: self.allow_degraded,
            ..Default::default()
        };

        if let Some(chart) = &version.chart {
            application.chart = chart.clone();
        }
        if let Some(branch) = &version.branch {
            application.branch = branch.clone();
        }
        if let Some(path) = &version.path {
            application.path = path.clone();
        }
        if let Some(create_namespace) = version.create_namespace {
            application.create_namespace = create_namespace;
        }
        if let Some(server_side_apply) = version.server_side_apply {
            application.server_side_apply = server_side_apply;
        }

        if let Some(customizer) = self.generator.as_ref().and_then(|g| g.customizer()) {
            application.ignore_differences = customizer.customize(version.interface.as_deref())?;
        }

        Ok(application)
    }
}

#[async_trait]
impl Provisioner for ApplicationProvisioner {
    fn name(&self) -> &str {
        &self.name
    }

    async fn converge(&self, ctx: &ProvisionContext) -> Result<Outcome> {
        if ctx.is_cancelled() {
            return Err(ProvisionError::Cancelled);
        }

        let resolved = self.resolve(ctx).await?;

        info!(application = %resolved.name, "provisioning application");

        let id = self.resource_id(ctx, &resolved.name)?;
        let application = self.generate(ctx, &resolved.version).await?;

        let outcome = ctx
            .driver()
            .create_or_update_helm_application(&id, &application)
            .await?;

        if outcome.is_yield() {
            debug!(application = %resolved.name, "application not ready");
            return Ok(Outcome::Yield);
        }

        info!(application = %resolved.name, "application provisioned");

        if let Some(hook) = self.generator.as_ref().and_then(|g| g.post_provision_hook()) {
            hook.post_provision(ctx).await?;
        }

        Ok(Outcome::Success)
    }

    async fn teardown(&self, ctx: &ProvisionContext) -> Result<Outcome> {
        if ctx.is_cancelled() {
            return Err(ProvisionError::Cancelled);
        }

        if let Some(hook) = self.generator.as_ref().and_then(|g| g.pre_deprovision_hook()) {
            hook.pre_deprovision(ctx).await?;
        }

        let resolved = self.resolve(ctx).await?;

        info!(application = %resolved.name, "deprovisioning application");

        let id = self.resource_id(ctx, &resolved.name)?;

        let outcome = ctx
            .driver()
            .delete_helm_application(&id, ctx.background_deletion())
            .await?;

        if outcome.is_success() {
            info!(application = %resolved.name, "application deprovisioned");
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::application::{HelmApplicationSpec, HelmApplicationVersion};
    use crate::domain::cd::HelmApplicationField;
    use crate::infrastructure::constants::NAME_LABEL;
    use crate::provisioners::ClusterContext;
    use crate::test_support::{mock_driver, Journal};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    const APPLICATION_ID: &str = "c785837a-7412-49a6-ac7e-6d75ab6ca577";
    const APPLICATION_NAME: &str = "test";

    fn owner() -> ObjectMeta {
        ObjectMeta {
            name: Some("bar".to_string()),
            labels: Some(BTreeMap::from([
                ("2".to_string(), "foo".to_string()),
                ("3".to_string(), "bar".to_string()),
                ("1".to_string(), "baz".to_string()),
            ])),
            ..Default::default()
        }
    }

    fn application_id() -> ResourceIdentifier {
        ResourceIdentifier::with_labels(APPLICATION_NAME, [("1", "baz"), ("2", "foo"), ("3", "bar")])
    }

    fn chart_version() -> HelmApplicationVersion {
        HelmApplicationVersion {
            repo: "foo".to_string(),
            chart: Some("bar".to_string()),
            version: "1.2.3".to_string(),
            ..Default::default()
        }
    }

    fn catalogue(version: HelmApplicationVersion) -> HelmApplication {
        HelmApplication {
            metadata: ObjectMeta {
                name: Some(APPLICATION_ID.to_string()),
                namespace: Some("scooby-doo".to_string()),
                labels: Some(BTreeMap::from([(
                    NAME_LABEL.to_string(),
                    APPLICATION_NAME.to_string(),
                )])),
                ..Default::default()
            },
            spec: HelmApplicationSpec {
                versions: vec![version],
                ..Default::default()
            },
        }
    }

    fn context(driver: crate::domain::cd::MockDriver) -> ProvisionContext {
        crate::test_support::context(driver).with_resource_labels(owner())
    }

    fn expect_create(
        driver: &mut crate::domain::cd::MockDriver,
        expected: cd::HelmApplication,
        outcome: Outcome,
    ) {
        let id = application_id();
        driver
            .expect_create_or_update_helm_application()
            .withf(move |i, a| *i == id && *a == expected)
            .times(1)
            .returning(move |_, _| Ok(outcome));
    }

    #[derive(Default)]
    struct Mutator {
        journal: Journal,
        fail_post: bool,
        fail_pre: bool,
    }

    #[async_trait]
    impl ReleaseNamer for Mutator {
        async fn release_name(&self, _ctx: &ProvisionContext) -> String {
            "sentinel".to_string()
        }
    }

    #[async_trait]
    impl Parameterizer for Mutator {
        async fn parameters(
            &self,
            _ctx: &ProvisionContext,
            interface: Option<&str>,
        ) -> Result<BTreeMap<String, String>> {
            let mut parameters = BTreeMap::from([("foo".to_string(), "bar".to_string())]);
            if let Some(interface) = interface {
                parameters.insert("interface".to_string(), interface.to_string());
            }
            Ok(parameters)
        }
    }

    #[async_trait]
    impl ValuesGenerator for Mutator {
        async fn values(
            &self,
            _ctx: &ProvisionContext,
            _interface: Option<&str>,
        ) -> Result<Option<serde_json::Value>> {
            Ok(Some(serde_json::json!({ "foo": "bar" })))
        }
    }

    impl Customizer for Mutator {
        fn customize(&self, _interface: Option<&str>) -> Result<Vec<HelmApplicationField>> {
            Ok(vec![HelmApplicationField {
                group: "hippes".to_string(),
                kind: "treeHugger".to_string(),
                json_pointers: vec!["arrow".to_string()],
            }])
        }
    }

    #[async_trait]
    impl PostProvisionHook for Mutator {
        async fn post_provision(&self, _ctx: &ProvisionContext) -> Result<()> {
            self.journal.record("post-provision".to_string());
            if self.fail_post {
                return Err(ProvisionError::hook("post-provision", "boom"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl PreDeprovisionHook for Mutator {
        async fn pre_deprovision(&self, _ctx: &ProvisionContext) -> Result<()> {
            self.journal.record("pre-deprovision".to_string());
            if self.fail_pre {
                return Err(ProvisionError::hook("pre-deprovision", "boom"));
            }
            Ok(())
        }
    }

    impl Generator for Mutator {
        fn release_namer(&self) -> Option<&dyn ReleaseNamer> {
            Some(self)
        }

        fn parameterizer(&self) -> Option<&dyn Parameterizer> {
            Some(self)
        }

        fn values_generator(&self) -> Option<&dyn ValuesGenerator> {
            Some(self)
        }

        fn customizer(&self) -> Option<&dyn Customizer> {
            Some(self)
        }

        fn post_provision_hook(&self) -> Option<&dyn PostProvisionHook> {
            Some(self)
        }

        fn pre_deprovision_hook(&self) -> Option<&dyn PreDeprovisionHook> {
            Some(self)
        }
    }

    /// Only overrides the release name and adds parameters.
    struct Epic;

    #[async_trait]
    impl ReleaseNamer for Epic {
        async fn release_name(&self, _ctx: &ProvisionContext) -> String {
            "epic".to_string()
        }
    }

    #[async_trait]
    impl Parameterizer for Epic {
        async fn parameters(
            &self,
            _ctx: &ProvisionContext,
            _interface: Option<&str>,
        ) -> Result<BTreeMap<String, String>> {
            Ok(BTreeMap::from([("foo".to_string(), "bah".to_string())]))
        }
    }

    impl Generator for Epic {
        fn release_namer(&self) -> Option<&dyn ReleaseNamer> {
            Some(self)
        }

        fn parameterizer(&self) -> Option<&dyn Parameterizer> {
            Some(self)
        }
    }

    /// A generator with every hook absent.
    struct Inert;

    impl Generator for Inert {}

    #[tokio::test]
    async fn test_create_helm() {
        let mut driver = mock_driver();
        expect_create(
            &mut driver,
            cd::HelmApplication {
                repo: "foo".to_string(),
                chart: "bar".to_string(),
                version: "1.2.3".to_string(),
                namespace: "default".to_string(),
                ..Default::default()
            },
            Outcome::Yield,
        );

        let provisioner = ApplicationProvisioner::fixed(catalogue(chart_version()), "1.2.3");
        assert_eq!(provisioner.name(), APPLICATION_NAME);

        let outcome = provisioner.converge(&context(driver)).await.unwrap();
        assert_eq!(outcome, Outcome::Yield);
    }

    #[tokio::test]
    async fn test_create_helm_extended() {
        let version = HelmApplicationVersion {
            release: Some("release".to_string()),
            create_namespace: Some(true),
            server_side_apply: Some(true),
            ..chart_version()
        };

        let remote = ResourceIdentifier::with_labels("bar", [("dog", "woof"), ("cat", "meow")]);

        let mut driver = mock_driver();
        expect_create(
            &mut driver,
            cd::HelmApplication {
                repo: "foo".to_string(),
                chart: "bar".to_string(),
                version: "1.2.3".to_string(),
                release: "epic".to_string(),
                parameters: Some(vec![HelmApplicationParameter {
                    name: "foo".to_string(),
                    value: "bah".to_string(),
                }]),
                cluster: Some(remote.clone()),
                namespace: "default".to_string(),
                create_namespace: true,
                server_side_apply: true,
                allow_degraded: true,
                ..Default::default()
            },
            Outcome::Yield,
        );

        let ctx = context(driver).with_cluster(ClusterContext {
            id: Some(remote),
            ..Default::default()
        });

        let provisioner = ApplicationProvisioner::fixed(catalogue(version), "1.2.3")
            .with_generator(Epic)
            .allow_degraded();

        assert_eq!(provisioner.converge(&ctx).await.unwrap(), Outcome::Yield);
    }

    #[tokio::test]
    async fn test_static_release_and_parameters() {
        let version = HelmApplicationVersion {
            release: Some("fixed".to_string()),
            namespace: Some("kube-system".to_string()),
            parameters: vec![crate::domain::application::HelmApplicationParameter {
                name: "static".to_string(),
                value: "1".to_string(),
            }],
            ..chart_version()
        };

        let mut driver = mock_driver();
        expect_create(
            &mut driver,
            cd::HelmApplication {
                repo: "foo".to_string(),
                chart: "bar".to_string(),
                version: "1.2.3".to_string(),
                release: "fixed".to_string(),
                parameters: Some(vec![HelmApplicationParameter {
                    name: "static".to_string(),
                    value: "1".to_string(),
                }]),
                namespace: "kube-system".to_string(),
                ..Default::default()
            },
            Outcome::Success,
        );

        let provisioner =
            ApplicationProvisioner::fixed(catalogue(version), "1.2.3").with_generator(Inert);
        assert_eq!(
            provisioner.converge(&context(driver)).await.unwrap(),
            Outcome::Success
        );
    }

    #[tokio::test]
    async fn test_generated_parameter_replaces_static() {
        let version = HelmApplicationVersion {
            parameters: vec![
                crate::domain::application::HelmApplicationParameter {
                    name: "foo".to_string(),
                    value: "1".to_string(),
                },
                crate::domain::application::HelmApplicationParameter {
                    name: "keep".to_string(),
                    value: "2".to_string(),
                },
            ],
            ..chart_version()
        };

        let mut driver = mock_driver();
        expect_create(
            &mut driver,
            cd::HelmApplication {
                repo: "foo".to_string(),
                chart: "bar".to_string(),
                version: "1.2.3".to_string(),
                release: "epic".to_string(),
                parameters: Some(vec![
                    HelmApplicationParameter {
                        name: "keep".to_string(),
                        value: "2".to_string(),
                    },
                    HelmApplicationParameter {
                        name: "foo".to_string(),
                        value: "bah".to_string(),
                    },
                ]),
                namespace: "default".to_string(),
                ..Default::default()
            },
            Outcome::Success,
        );

        let provisioner =
            ApplicationProvisioner::fixed(catalogue(version), "1.2.3").with_generator(Epic);
        assert_eq!(
            provisioner.converge(&context(driver)).await.unwrap(),
            Outcome::Success
        );
    }

    #[tokio::test]
    async fn test_create_git() {
        let version = HelmApplicationVersion {
            repo: "foo".to_string(),
            branch: Some("groot".to_string()),
            path: Some("bar".to_string()),
            version: "1.2.3".to_string(),
            ..Default::default()
        };

        let mut driver = mock_driver();
        expect_create(
            &mut driver,
            cd::HelmApplication {
                repo: "foo".to_string(),
                branch: "groot".to_string(),
                path: "bar".to_string(),
                version: "1.2.3".to_string(),
                namespace: "default".to_string(),
                ..Default::default()
            },
            Outcome::Yield,
        );

        let provisioner = ApplicationProvisioner::fixed(catalogue(version), "1.2.3");
        assert_eq!(
            provisioner.converge(&context(driver)).await.unwrap(),
            Outcome::Yield
        );
    }

    #[tokio::test]
    async fn test_create_mutate() {
        let version = HelmApplicationVersion {
            interface: Some("v2".to_string()),
            ..chart_version()
        };

        let mut driver = mock_driver();
        expect_create(
            &mut driver,
            cd::HelmApplication {
                repo: "foo".to_string(),
                chart: "bar".to_string(),
                version: "1.2.3".to_string(),
                release: "sentinel".to_string(),
                namespace: "gerbils".to_string(),
                parameters: Some(vec![
                    HelmApplicationParameter {
                        name: "foo".to_string(),
                        value: "bar".to_string(),
                    },
                    HelmApplicationParameter {
                        name: "interface".to_string(),
                        value: "v2".to_string(),
                    },
                ]),
                values: Some(serde_json::json!({ "foo": "bar" })),
                ignore_differences: vec![HelmApplicationField {
                    group: "hippes".to_string(),
                    kind: "treeHugger".to_string(),
                    json_pointers: vec!["arrow".to_string()],
                }],
                ..Default::default()
            },
            Outcome::Success,
        );

        let mutator = Mutator::default();
        let journal = mutator.journal.clone();

        let provisioner = ApplicationProvisioner::fixed(catalogue(version), "1.2.3")
            .with_generator(mutator)
            .in_namespace("gerbils");

        assert_eq!(
            provisioner.converge(&context(driver)).await.unwrap(),
            Outcome::Success
        );
        assert_eq!(journal.entries(), vec!["post-provision"]);
    }

    #[tokio::test]
    async fn test_yield_skips_post_provision() {
        let mut driver = mock_driver();
        driver
            .expect_create_or_update_helm_application()
            .times(1)
            .returning(|_, _| Ok(Outcome::Yield));

        let mutator = Mutator::default();
        let journal = mutator.journal.clone();

        let provisioner =
            ApplicationProvisioner::fixed(catalogue(chart_version()), "1.2.3").with_generator(mutator);

        assert_eq!(
            provisioner.converge(&context(driver)).await.unwrap(),
            Outcome::Yield
        );
        assert!(journal.entries().is_empty());
    }

    #[tokio::test]
    async fn test_post_provision_failure_is_fatal() {
        let mut driver = mock_driver();
        driver
            .expect_create_or_update_helm_application()
            .times(1)
            .returning(|_, _| Ok(Outcome::Success));

        let provisioner = ApplicationProvisioner::fixed(catalogue(chart_version()), "1.2.3")
            .with_generator(Mutator {
                fail_post: true,
                ..Default::default()
            });

        let err = provisioner.converge(&context(driver)).await.unwrap_err();
        assert!(matches!(err, ProvisionError::Hook { hook: "post-provision", .. }));
    }

    #[tokio::test]
    async fn test_driver_error_is_fatal() {
        let mut driver = mock_driver();
        driver
            .expect_create_or_update_helm_application()
            .times(1)
            .returning(|_, _| Err(ProvisionError::driver("argocd unavailable")));

        let provisioner = ApplicationProvisioner::fixed(catalogue(chart_version()), "1.2.3");
        let err = provisioner.converge(&context(driver)).await.unwrap_err();
        assert!(matches!(err, ProvisionError::Driver(_)));
    }

    #[tokio::test]
    async fn test_missing_version_is_fatal() {
        let driver = mock_driver();
        let provisioner = ApplicationProvisioner::fixed(catalogue(chart_version()), "2.0.0");

        let err = provisioner.converge(&context(driver)).await.unwrap_err();
        assert!(matches!(err, ProvisionError::VersionNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_owner_labels_is_fatal() {
        let driver = mock_driver();
        let provisioner = ApplicationProvisioner::fixed(catalogue(chart_version()), "1.2.3");

        let err = provisioner
            .converge(&crate::test_support::context(driver))
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisionError::InvalidContext(_)));
    }

    #[tokio::test]
    async fn test_cancelled_context() {
        let driver = mock_driver();
        let ctx = context(driver);
        ctx.cancellation().cancel();

        let provisioner = ApplicationProvisioner::fixed(catalogue(chart_version()), "1.2.3");
        assert!(provisioner.converge(&ctx).await.unwrap_err().is_cancelled());
        assert!(provisioner.teardown(&ctx).await.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let mut driver = mock_driver();
        let id = application_id();
        driver
            .expect_delete_helm_application()
            .withf(move |i, background| *i == id && !*background)
            .times(1)
            .returning(|_, _| Ok(Outcome::Yield));

        let provisioner = ApplicationProvisioner::fixed(catalogue(chart_version()), "1.2.3");
        assert_eq!(
            provisioner.teardown(&context(driver)).await.unwrap(),
            Outcome::Yield
        );
    }

    #[tokio::test]
    async fn test_delete_in_background() {
        let mut driver = mock_driver();
        driver
            .expect_delete_helm_application()
            .withf(|_, background| *background)
            .times(1)
            .returning(|_, _| Ok(Outcome::Success));

        let mutator = Mutator::default();
        let journal = mutator.journal.clone();

        let provisioner =
            ApplicationProvisioner::fixed(catalogue(chart_version()), "1.2.3").with_generator(mutator);
        let ctx = context(driver).with_background_deletion(true);

        assert_eq!(provisioner.teardown(&ctx).await.unwrap(), Outcome::Success);
        assert_eq!(journal.entries(), vec!["pre-deprovision"]);
    }

    #[tokio::test]
    async fn test_pre_deprovision_failure_aborts_teardown() {
        let driver = mock_driver();

        let provisioner = ApplicationProvisioner::fixed(catalogue(chart_version()), "1.2.3")
            .with_generator(Mutator {
                fail_pre: true,
                ..Default::default()
            });

        let err = provisioner.teardown(&context(driver)).await.unwrap_err();
        assert!(matches!(err, ProvisionError::Hook { hook: "pre-deprovision", .. }));
    }
}
