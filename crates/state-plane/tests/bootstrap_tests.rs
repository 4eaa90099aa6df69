use state_plane::{from_system_config, ContextMessage, SystemConfigLoader};

#[test]
fn in_memory_when_cache_unconfigured() {
    let config = SystemConfigLoader::from_str("").expect("config");
    let stores = from_system_config(&config).expect("stores");
    assert!(!stores.contexts.health().durable_configured);
}

#[test]
fn config_values_shape_the_stores() {
    let input = r#"
[context]
max_messages = 3
[limits]
requests_per_minute = 2
window_seconds = 60
"#;
    let config = SystemConfigLoader::from_str(input).expect("config");
    let stores = from_system_config(&config).expect("stores");

    for index in 1..=5 {
        stores.contexts.append(
            "s1",
            ContextMessage {
                role: "user".to_string(),
                content: format!("m{index}"),
            },
        );
    }
    let history = stores.contexts.get("s1");
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].message.content, "m3");

    assert!(stores.rate_limiter.allow_at("c1", 0));
    assert!(stores.rate_limiter.allow_at("c1", 0));
    assert!(!stores.rate_limiter.allow_at("c1", 0));
}
