/// Tests for driving a service launcher through an environment
use async_trait::async_trait;
use compose_plan::{
    Environment, EnvironmentLauncher, EnvironmentReader, Error, Instance, LaunchMode,
    LoaderSettings, Parser, RecipeDescriptor, Service, ServiceLauncher,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const RECIPE: &str = r#"
services:
  web:
    image: nginx
    depends_on: [api]
  api:
    image: api
    links: ["db:database", "cache"]
  db:
    image: postgres
  cache:
    image: redis
"#;

/// Launcher that records every call and can be told to fail or stall.
#[derive(Default, Clone)]
struct RecordingLauncher {
    calls: Arc<Mutex<Vec<String>>>,
    failing: HashSet<String>,
    stalling: HashSet<String>,
}

impl RecordingLauncher {
    fn failing_on(name: &str) -> Self {
        Self {
            failing: [name.to_string()].into_iter().collect(),
            ..Default::default()
        }
    }

    fn stalling_on(name: &str) -> Self {
        Self {
            stalling: [name.to_string()].into_iter().collect(),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ServiceLauncher for RecordingLauncher {
    async fn start_network(&self, network: &str) -> compose_plan::Result<()> {
        self.record(format!("start_network {}", network));
        Ok(())
    }

    async fn start_service(
        &self,
        _network: &str,
        name: &str,
        service: &Service,
    ) -> compose_plan::Result<Instance> {
        self.record(format!("start {}", name));

        if self.stalling.contains(name) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.failing.contains(name) {
            return Err(Error::ServiceStartFailed(
                name.to_string(),
                "container exited".to_string(),
            ));
        }

        let image = service.image.clone().unwrap_or_default();
        Ok(Instance::new(name, format!("{}-{}", image, name)))
    }

    async fn stop_network(&self, network: &str) -> compose_plan::Result<()> {
        self.record(format!("stop_network {}", network));
        Ok(())
    }
}

fn environment(yaml: &str) -> Environment {
    Parser::new()
        .parse_recipe(yaml, "application/x-yaml")
        .expect("Failed to parse recipe")
}

#[tokio::test]
async fn test_sequential_launch_follows_start_order() {
    let launcher = RecordingLauncher::default();
    let driver = EnvironmentLauncher::new(launcher.clone());

    let instances = driver.launch(&environment(RECIPE), "net-1").await.unwrap();

    assert_eq!(
        launcher.calls(),
        vec![
            "start_network net-1",
            "start cache",
            "start db",
            "start api",
            "start web"
        ]
    );
    let started: Vec<&str> = instances.iter().map(|i| i.service.as_str()).collect();
    assert_eq!(started, vec!["cache", "db", "api", "web"]);
    assert_eq!(instances[0].id, "redis-cache");
}

#[tokio::test]
async fn test_layered_launch_respects_dependencies() {
    let launcher = RecordingLauncher::default();
    let driver = EnvironmentLauncher::new(launcher.clone()).with_mode(LaunchMode::Layered);

    let instances = driver.launch(&environment(RECIPE), "net-1").await.unwrap();
    assert_eq!(instances.len(), 4);

    let calls = launcher.calls();
    let position = |call: &str| calls.iter().position(|c| c == call).unwrap();

    assert_eq!(calls[0], "start_network net-1");
    assert!(position("start db") < position("start api"));
    assert!(position("start cache") < position("start api"));
    assert!(position("start api") < position("start web"));
}

#[tokio::test]
async fn test_failed_service_stops_network() {
    let launcher = RecordingLauncher::failing_on("api");
    let driver = EnvironmentLauncher::new(launcher.clone());

    let err = driver
        .launch(&environment(RECIPE), "net-2")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ServiceStartFailed(ref name, _) if name == "api"));
    assert_eq!(
        launcher.calls(),
        vec![
            "start_network net-2",
            "start cache",
            "start db",
            "start api",
            "stop_network net-2"
        ]
    );
}

#[tokio::test]
async fn test_layered_failures_are_aggregated() {
    let launcher = RecordingLauncher {
        failing: ["db".to_string(), "cache".to_string()].into_iter().collect(),
        ..Default::default()
    };
    let driver = EnvironmentLauncher::new(launcher.clone()).with_mode(LaunchMode::Layered);

    let err = driver
        .launch(&environment(RECIPE), "net-3")
        .await
        .unwrap_err();

    match err {
        Error::Multiple(errors) => assert_eq!(errors.len(), 2),
        other => panic!("Expected Multiple, got {:?}", other),
    }
    let calls = launcher.calls();
    assert!(!calls.contains(&"start api".to_string()));
    assert_eq!(calls.last().map(String::as_str), Some("stop_network net-3"));
}

#[tokio::test]
async fn test_unresolvable_environment_creates_no_network() {
    let launcher = RecordingLauncher::default();
    let driver = EnvironmentLauncher::new(launcher.clone());

    let env = environment(
        r#"
services:
  a: {image: a, depends_on: [b]}
  b: {image: b, depends_on: [a]}
"#,
    );
    let err = driver.launch(&env, "net-4").await.unwrap_err();

    assert!(matches!(err, Error::UnresolvableOrder { .. }));
    assert!(launcher.calls().is_empty());
}

#[tokio::test]
async fn test_cancel_aborts_stalled_start() {
    let launcher = RecordingLauncher::stalling_on("api");
    let driver = Arc::new(EnvironmentLauncher::new(launcher.clone()));

    let env = environment(RECIPE);
    let launch = {
        let driver = Arc::clone(&driver);
        tokio::spawn(async move { driver.launch(&env, "net-5").await })
    };

    // Wait until the launcher is stuck on api
    for _ in 0..100 {
        if launcher.calls().contains(&"start api".to_string()) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    driver.cancel();

    let result = tokio::time::timeout(Duration::from_secs(5), launch)
        .await
        .expect("Launch did not stop after cancellation")
        .expect("Launch task panicked");

    assert!(matches!(result, Err(Error::Cancelled(_))));
    let calls = launcher.calls();
    assert!(!calls.contains(&"start web".to_string()));
    assert_eq!(calls.last().map(String::as_str), Some("stop_network net-5"));
}

#[tokio::test]
async fn test_cancelled_launcher_starts_nothing() {
    let launcher = RecordingLauncher::default();
    let driver = EnvironmentLauncher::new(launcher.clone());
    driver.cancel();

    let err = driver
        .launch(&environment(RECIPE), "net-6")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled(_)));
    assert!(driver.is_cancelled());
    assert!(launcher.calls().is_empty());
}

#[tokio::test]
async fn test_launch_inline_recipe() {
    let launcher = RecordingLauncher::default();
    let driver = EnvironmentLauncher::new(launcher.clone());
    let reader = EnvironmentReader::new(&LoaderSettings::default()).unwrap();

    let descriptor = RecipeDescriptor::inline(RECIPE, "text/x-yaml");
    let instances = driver
        .launch_recipe(&reader, &descriptor, "net-7")
        .await
        .unwrap();

    assert_eq!(instances.len(), 4);
    assert_eq!(instances[3].service, "web");
}
