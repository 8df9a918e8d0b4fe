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

#[cfg(test)]
mod tests {
    use kube_provisioners::domain::application::HelmApplication;
    use kube_provisioners::domain::cd::HelmApplicationParameter;
    use kube_provisioners::shared::ContextError;
    use kube_provisioners::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const CATALOGUE: &str = r#"
metadata:
  name: 0b6f4a3e-cilium
  labels:
    app.kubernetes.io/name: cilium
spec:
  versions:
    - repo: https://helm.cilium.io
      chart: cilium
      version: 1.15.0
      namespace: kube-system
      parameters:
        - name: ipam.mode
          value: kubernetes
    - repo: https://github.com/example/cilium
      branch: main
      path: install/kubernetes/cilium
      version: 1.16.0-rc.1
"#;

    const CERT_MANAGER: &str = r#"
metadata:
  labels:
    app.kubernetes.io/name: cert-manager
spec:
  versions:
    - repo: https://charts.jetstack.io
      chart: cert-manager
      version: 1.14.2
      release: cert-manager
      createNamespace: true
"#;

    fn owner_labels() -> HashMap<String, String> {
        HashMap::from([
            ("unikorn-cloud.org/cluster".to_string(), "c1".to_string()),
            ("unikorn-cloud.org/project".to_string(), "p1".to_string()),
        ])
    }

    fn context(driver: Arc<DryRunDriver>) -> ProvisionContext {
        ProvisionContext::new(driver).with_resource_labels(owner_labels())
    }

    fn application(manifest: &str, version: &str) -> ApplicationProvisioner {
        let application = HelmApplication::from_yaml(manifest).unwrap();
        application.validate().unwrap();
        ApplicationProvisioner::fixed(application, version)
    }

    fn id(name: &str) -> ResourceIdentifier {
        ResourceIdentifier::with_labels(name, owner_labels())
    }

    #[tokio::test]
    async fn test_serial_tree_converges_and_tears_down() {
        let driver = Arc::new(DryRunDriver::new());
        let ctx = context(driver.clone());

        let tree = Serial::new(
            "cluster-addons",
            vec![
                Box::new(application(CATALOGUE, "1.15.0")),
                Box::new(application(CERT_MANAGER, "1.14.2")),
            ],
        );

        assert_eq!(tree.converge(&ctx).await.unwrap(), Outcome::Success);

        let cilium = driver.application(&id("cilium")).await.unwrap();
        assert_eq!(cilium.namespace, "kube-system");
        assert_eq!(
            cilium.parameters,
            Some(vec![HelmApplicationParameter {
                name: "ipam.mode".to_string(),
                value: "kubernetes".to_string(),
            }])
        );

        let cert_manager = driver.application(&id("cert-manager")).await.unwrap();
        assert_eq!(cert_manager.release, "cert-manager");
        assert_eq!(cert_manager.namespace, "default");
        assert!(cert_manager.create_namespace);
        assert_eq!(cert_manager.cluster, None);

        // Converging again is a no-op that still succeeds.
        assert_eq!(tree.converge(&ctx).await.unwrap(), Outcome::Success);
        assert_eq!(driver.applications().await.len(), 2);

        assert_eq!(tree.teardown(&ctx).await.unwrap(), Outcome::Success);
        assert!(driver.applications().await.is_empty());
    }

    #[tokio::test]
    async fn test_not_ready_stops_serial_group() {
        let driver = Arc::new(DryRunDriver::new().with_pending_passes(1));
        let ctx = context(driver.clone());

        let tree = Serial::new(
            "cluster-addons",
            vec![
                Box::new(application(CATALOGUE, "1.15.0")),
                Box::new(application(CERT_MANAGER, "1.14.2")),
            ],
        );

        assert_eq!(tree.converge(&ctx).await.unwrap(), Outcome::Yield);
        assert!(driver.application(&id("cert-manager")).await.is_none());

        assert_eq!(tree.converge(&ctx).await.unwrap(), Outcome::Yield);
        assert!(driver.application(&id("cert-manager")).await.is_some());

        assert_eq!(tree.converge(&ctx).await.unwrap(), Outcome::Success);
    }

    #[tokio::test]
    async fn test_conditional_removes_undesired_branch() {
        let driver = Arc::new(DryRunDriver::new());
        let ctx = context(driver.clone());

        let enabled = Arc::new(AtomicBool::new(true));
        let flag = enabled.clone();
        let tree = Conditional::new(
            "cert-manager",
            move || flag.load(Ordering::SeqCst),
            Box::new(application(CERT_MANAGER, "1.14.2")),
        );

        assert!(tree.converge(&ctx).await.unwrap().is_success());
        assert_eq!(driver.applications().await.len(), 1);

        enabled.store(false, Ordering::SeqCst);
        assert!(tree.converge(&ctx).await.unwrap().is_success());
        assert!(driver.applications().await.is_empty());
    }

    #[tokio::test]
    async fn test_git_version_descriptor() {
        let driver = Arc::new(DryRunDriver::new());
        let ctx = context(driver.clone());

        let provisioner = application(CATALOGUE, "1.16.0-rc.1").in_namespace("cilium");
        assert!(provisioner.converge(&ctx).await.unwrap().is_success());

        let cilium = driver.application(&id("cilium")).await.unwrap();
        assert!(cilium.is_git());
        assert_eq!(cilium.branch, "main");
        assert_eq!(cilium.path, "install/kubernetes/cilium");
        assert_eq!(cilium.chart, "");
        assert_eq!(cilium.namespace, "cilium");
        assert_eq!(cilium.parameters, None);
    }

    #[tokio::test]
    async fn test_unknown_version_is_fatal() {
        let driver = Arc::new(DryRunDriver::new());
        let ctx = context(driver.clone());

        let err = application(CATALOGUE, "9.9.9")
            .converge(&ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisionError::VersionNotFound { .. }));
        assert!(driver.applications().await.is_empty());
    }

    #[tokio::test]
    async fn test_retrier_drives_tree_to_success() {
        let driver = Arc::new(DryRunDriver::new().with_pending_passes(2));
        let ctx = context(driver.clone());
        let provisioner = application(CERT_MANAGER, "1.14.2");

        let (provisioner, ctx) = (&provisioner, &ctx);
        let result = Retrier::forever()
            .with_period(Duration::from_millis(5))
            .with_timeout(Duration::from_secs(5))
            .run(move || async move {
                match provisioner.converge(ctx).await {
                    Ok(Outcome::Success) => Ok(()),
                    Ok(Outcome::Yield) => Err("not ready".to_string()),
                    Err(e) => Err(e.to_string()),
                }
            })
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_retrier_gives_up_on_deadline() {
        let driver = Arc::new(DryRunDriver::new().with_pending_passes(usize::MAX));
        let ctx = context(driver.clone());
        let provisioner = application(CERT_MANAGER, "1.14.2");

        let (provisioner, ctx) = (&provisioner, &ctx);
        let err = Retrier::forever()
            .with_period(Duration::from_millis(5))
            .with_timeout(Duration::from_millis(30))
            .run(move || async move {
                match provisioner.converge(ctx).await {
                    Ok(Outcome::Success) => Ok(()),
                    Ok(_) => Err("not ready".to_string()),
                    Err(e) => Err(e.to_string()),
                }
            })
            .await
            .unwrap_err();

        assert_eq!(err.context(), ContextError::DeadlineExceeded);
        assert_eq!(err.callback(), "not ready");
    }

    #[tokio::test]
    #[ignore] // Requires Kubernetes cluster
    async fn test_secret_remote_cluster_on_live_cluster() {
        let client = kube::Client::try_default().await.unwrap();
        let driver = Arc::new(DryRunDriver::new());
        let ctx = context(driver.clone()).with_cluster(ClusterContext::local(client));

        let remote = RemoteCluster::new(
            SecretRemoteCluster::new(ResourceIdentifier::new("vcluster"), "default", "vc-kubeconfig"),
            true,
        );
        let provisioner = remote.provision_on(application(CERT_MANAGER, "1.14.2")).await;

        let outcome = provisioner.converge(&ctx).await.unwrap();
        println!("remote converge: {}", outcome);
    }
}
