use proptest::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use suite_core::{
    CommandTemplate, DescriptorBuilder, EnvDefault, EnvOverlay, LogPolicy, ResourceLimits,
    RestartPolicy, ServiceSpec,
};
use suite_version::Ecosystem;

fn pairs() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[A-Z_][A-Z0-9_]{0,6}", "[a-z0-9./:-]{1,12}"), 0..24)
}

fn spec(env: Vec<EnvDefault>) -> ServiceSpec {
    ServiceSpec {
        name: "svc".to_string(),
        directory: "svc".to_string(),
        ecosystem: Ecosystem::Python,
        command: CommandTemplate {
            script: "python".to_string(),
            args: Vec::new(),
        },
        env,
        restart: RestartPolicy::default(),
        resources: ResourceLimits::default(),
        logs: LogPolicy::default(),
    }
}

proptest! {
    #[test]
    fn overlay_last_occurrence_wins(entries in pairs()) {
        let content: String = entries
            .iter()
            .map(|(k, v)| format!("{k}={v}\n"))
            .collect();

        let overlay = EnvOverlay::parse(&content);

        let mut expected = BTreeMap::new();
        for (k, v) in &entries {
            expected.insert(k.as_str(), v.as_str());
        }
        let actual: BTreeMap<&str, &str> = overlay.iter().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn comments_and_blank_lines_never_contribute(entries in pairs()) {
        let content: String = entries
            .iter()
            .map(|(k, v)| format!("\n# {k}=IGNORED\n   \n{k}={v}\n"))
            .collect();

        let overlay = EnvOverlay::parse(&content);
        for (k, _) in &entries {
            prop_assert!(overlay.get(k).is_some_and(|v| v != "IGNORED"));
        }
    }

    #[test]
    fn overlay_beats_default_and_injected_beats_both(
        default in "[0-9]{2,5}",
        overlaid in "[0-9]{2,5}",
        mode in "[a-z]{1,10}",
    ) {
        let overlay: EnvOverlay = [
            ("SERVICE_PORT", overlaid.as_str()),
            ("NODE_ENV", mode.as_str()),
        ]
        .into_iter()
        .collect();
        let spec = spec(vec![
            EnvDefault::new("SERVICE_PORT", default.clone()),
            EnvDefault::new("NODE_ENV", "development"),
        ]);

        let builder = DescriptorBuilder::new(Path::new("/opt/suite"), &overlay).unwrap();
        let descriptor = builder.build(&spec, "1.0.0").unwrap();

        prop_assert_eq!(descriptor.env.get("SERVICE_PORT"), Some(&overlaid));
        prop_assert_eq!(
            descriptor.env.get("NODE_ENV").map(String::as_str),
            Some("production")
        );
    }
}
