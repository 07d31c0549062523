use orb_core::config::Config;
use orb_core::metrics::StatusPolicy;

#[test]
fn default_config() {
    let cfg = Config::default();
    assert_eq!(cfg.general.project_name, "budget-orb");
    assert_eq!(cfg.general.log_level, "warn");
    assert!(cfg.general.seed_path.is_none());
    assert!(cfg.budget.hourly_rate.is_none());
    assert_eq!(cfg.budget.status_policy, StatusPolicy::Derived);
    assert_eq!(cfg.budget.at_risk_ratio, 0.9);
    assert_eq!(cfg.budget.warning_ratio, 0.7);
    assert_eq!(cfg.burndown.completion_cap, 0.65);
    assert!(cfg.feed.enabled);
    assert_eq!(cfg.feed.interval_secs, 5);
    assert_eq!(cfg.feed.max_increment_hours, 4.0);
    assert_eq!(cfg.display.frame_rate, 30);
    assert_eq!(cfg.display.orb_radius, 5.0);
    cfg.validate().expect("defaults validate");
}

#[test]
fn config_roundtrip() {
    let cfg = Config::default();
    let toml_str = cfg.to_toml().expect("serialize to toml");
    assert!(toml_str.contains("budget-orb"));

    let parsed: Config = toml::from_str(&toml_str).expect("parse toml back");
    assert_eq!(parsed.general.project_name, cfg.general.project_name);
    assert_eq!(parsed.feed.interval_secs, cfg.feed.interval_secs);
    assert_eq!(parsed.budget.critical_ratio, cfg.budget.critical_ratio);
    parsed.validate().expect("config validates");
}

#[test]
fn config_partial_toml() {
    let partial = r#"
[budget]
hourly_rate = 120.0
status_policy = "declared"

[burndown]
start_date = "2025-01-01"
end_date = "2025-06-30"
rng_seed = 42
"#;
    let cfg: Config = toml::from_str(partial).expect("parse partial");
    assert_eq!(cfg.budget.hourly_rate, Some(120.0));
    assert_eq!(cfg.budget.status_policy, StatusPolicy::Declared);
    assert_eq!(cfg.burndown.rng_seed, Some(42));
    assert_eq!(
        cfg.burndown.start_date.map(|d| d.to_string()),
        Some("2025-01-01".to_string())
    );
    // defaults should fill in the rest
    assert_eq!(cfg.general.log_level, "warn");
    assert_eq!(cfg.feed.interval_secs, 5);
    cfg.validate().expect("config validates");
}

#[test]
fn rules_follow_budget_section() {
    let mut cfg = Config::default();
    cfg.budget.at_risk_ratio = 0.8;
    cfg.budget.status_policy = StatusPolicy::Declared;
    let rules = cfg.budget.rules();
    assert_eq!(rules.feature.at_risk_ratio, 0.8);
    assert_eq!(rules.policy, StatusPolicy::Declared);
}

#[test]
fn inverted_thresholds_fail_validation() {
    let mut cfg = Config::default();
    cfg.budget.warning_ratio = 1.5;
    let err = cfg.validate().expect_err("validation should fail");
    assert!(err.to_string().contains("budget.warning_ratio"));
}

#[test]
fn completion_cap_out_of_range_fails_validation() {
    let mut cfg = Config::default();
    cfg.burndown.completion_cap = 1.5;
    let err = cfg.validate().expect_err("validation should fail");
    assert!(err.to_string().contains("completion_cap"));
}

#[test]
fn zero_feed_interval_fails_validation() {
    let mut cfg = Config::default();
    cfg.feed.interval_secs = 0;
    let err = cfg.validate().expect_err("validation should fail");
    assert!(err.to_string().contains("interval_secs"));
}

#[test]
fn inverted_burndown_dates_fail_validation() {
    let cfg: Config = toml::from_str(
        r#"
[burndown]
start_date = "2025-06-01"
end_date = "2025-01-01"
"#,
    )
    .expect("parse");
    let err = cfg.validate().expect_err("validation should fail");
    assert!(err.to_string().contains("end_date"));
}

#[test]
fn load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[feed]\nenabled = false\n").unwrap();
    let cfg = Config::load_from(&path).expect("load");
    assert!(!cfg.feed.enabled);
}

#[test]
fn load_from_invalid_toml_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[feed\nenabled = ").unwrap();
    let err = Config::load_from(&path).expect_err("should fail");
    assert!(err.to_string().starts_with("parse:"));
}

#[test]
fn hourly_rate_override_changes_total_budget() {
    let cfg: Config = toml::from_str("[budget]\nhourly_rate = 100.0\n").expect("parse");
    let mut project = orb_core::seed::bundled().unwrap();
    cfg.apply_overrides(&mut project);
    assert_eq!(project.rate_per_hour, 100.0);
    assert_eq!(project.total_budget(), 120_000.0);
}

#[test]
fn burndown_params_honour_schedule_overrides() {
    let cfg: Config = toml::from_str(
        r#"
[burndown]
start_date = "2024-02-01"
completion_cap = 0.5
"#,
    )
    .expect("parse");
    let project = orb_core::seed::bundled().unwrap();
    let today = chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let params = cfg.burndown_params(&project, today);
    assert_eq!(params.start_date.to_string(), "2024-02-01");
    assert_eq!(params.end_date, project.end_date);
    assert_eq!(params.completion_cap, 0.5);
    assert_eq!(params.total_budget, 180_000.0);
}
