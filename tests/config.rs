// ABOUTME: Integration tests for configuration parsing and context resolution.
// ABOUTME: Tests YAML parsing, manifest validation, override merging, and discovery.

use stager::config::{Config, Overrides, init_config};
use stager::context::Operation;
use std::path::PathBuf;
use std::time::Duration;

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let yaml = r#"
name: web-stack
image: nginx:latest
manifests:
  - web
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.name.as_str(), "web-stack");
        assert_eq!(config.image, "nginx:latest");
        assert_eq!(config.manifests.len(), 1);
        // Defaults
        assert_eq!(config.work_dir, PathBuf::from("deploy"));
        assert_eq!(config.data_dir, "data");
        assert_eq!(config.templates, PathBuf::from("templates"));
        assert_eq!(config.stop_timeout, Duration::from_secs(30));
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
name: web-stack
image: ghcr.io/org/app:v1.2.3
work_dir: /srv/web-stack
data_dir: state
templates: /etc/stager/templates
manifests:
  - web
  - db
stop_timeout: 1m
vars:
  listen_port: "8080"
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.work_dir, PathBuf::from("/srv/web-stack"));
        assert_eq!(config.data_dir, "state");
        assert_eq!(config.manifests.len(), 2);
        assert_eq!(config.stop_timeout, Duration::from_secs(60));
        assert_eq!(config.vars.get("listen_port").unwrap(), "8080");
    }

    #[test]
    fn missing_name_returns_error() {
        let yaml = r#"
image: nginx:latest
manifests:
  - web
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn empty_manifests_returns_error() {
        let yaml = r#"
name: web-stack
image: nginx:latest
manifests: []
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("at least one manifest"));
    }

    #[test]
    fn duplicate_manifests_return_error() {
        let yaml = r#"
name: web-stack
image: nginx:latest
manifests:
  - web
  - web
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate manifest"));
    }

    #[test]
    fn invalid_manifest_id_returns_error() {
        let yaml = r#"
name: web-stack
image: nginx:latest
manifests:
  - ../escape
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn invalid_deployment_name_returns_error() {
        let yaml = r#"
name: Web_Stack
image: nginx:latest
manifests:
  - web
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn manifest_order_is_preserved() {
        let yaml = r#"
name: web-stack
image: nginx:latest
manifests:
  - zeta
  - alpha
  - mid
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let order: Vec<&str> = config.manifests.iter().map(|m| m.as_str()).collect();
        assert_eq!(order, vec!["zeta", "alpha", "mid"]);
    }
}

mod context_resolution {
    use super::*;

    fn base_config() -> Config {
        Config::from_yaml(
            r#"
name: web-stack
image: nginx:latest
manifests:
  - web
"#,
        )
        .unwrap()
    }

    #[test]
    fn overrides_take_precedence() {
        let context = base_config().into_context(
            Operation::Start,
            Overrides {
                work_dir: Some(PathBuf::from("/tmp/other")),
                data_dir: Some("blobs".to_string()),
                templates: Some(PathBuf::from("/tmp/tpl")),
            },
        );
        assert_eq!(context.work_dir, PathBuf::from("/tmp/other"));
        assert_eq!(context.data_dir, "blobs");
        assert_eq!(context.template_source, PathBuf::from("/tmp/tpl"));
        assert_eq!(context.operation, Operation::Start);
    }

    #[test]
    fn defaults_survive_empty_overrides() {
        let context = base_config().into_context(Operation::Backup, Overrides::default());
        assert_eq!(context.work_dir, PathBuf::from("deploy"));
        assert_eq!(context.data_dir, "data");
        assert_eq!(context.operation, Operation::Backup);
    }

    #[test]
    fn template_vars_include_builtins() {
        let context = base_config().into_context(Operation::Start, Overrides::default());
        let manifest = context.manifests.first().clone();
        let vars = context.template_vars(&manifest);
        assert_eq!(vars.get("workDir").unwrap(), "deploy");
        assert_eq!(vars.get("dataDir").unwrap(), "data");
        assert_eq!(vars.get("operation").unwrap(), "start");
        assert_eq!(vars.get("manifest").unwrap(), "web");
    }

    #[test]
    fn user_vars_cannot_shadow_builtins() {
        let mut config = base_config();
        config
            .vars
            .insert("workDir".to_string(), "evil".to_string());
        let context = config.into_context(Operation::Start, Overrides::default());
        let manifest = context.manifests.first().clone();
        let vars = context.template_vars(&manifest);
        assert_eq!(vars.get("workDir").unwrap(), "deploy");
    }
}

mod discovery {
    use super::*;

    #[test]
    fn discover_finds_yml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("stager.yml"),
            "name: app\nimage: nginx\nmanifests: [web]\n",
        )
        .unwrap();
        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn discover_falls_back_to_yaml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("stager.yaml"),
            "name: app\nimage: nginx\nmanifests: [web]\n",
        )
        .unwrap();
        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn discover_reports_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::discover(dir.path()).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn init_writes_parseable_scaffold() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), Some("my-svc"), Some("redis:7"), false).unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.name.as_str(), "my-svc");
        assert_eq!(config.image, "redis:7");
    }

    #[test]
    fn init_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), None, None, false).unwrap();
        let err = init_config(dir.path(), None, None, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        // force replaces it
        init_config(dir.path(), Some("other"), None, true).unwrap();
        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.name.as_str(), "other");
    }
}
