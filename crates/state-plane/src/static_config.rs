#[derive(Clone, Debug)]
pub struct StaticConfigItem {
    pub key: &'static str,
    pub description: &'static str,
    pub value_type: &'static str,
    pub default_value: &'static str,
}

pub static STATIC_CONFIG_TABLE: &[StaticConfigItem] = &[
    StaticConfigItem {
        key: "cache.redis_url",
        description: "Redis connection string (empty disables the durable store)",
        value_type: "string",
        default_value: "",
    },
    StaticConfigItem {
        key: "cache.key_prefix",
        description: "Key prefix for durable store entries",
        value_type: "string",
        default_value: "studyhall",
    },
    StaticConfigItem {
        key: "cache.connect_timeout_ms",
        description: "Durable store connect timeout in milliseconds",
        value_type: "number",
        default_value: "1000",
    },
    StaticConfigItem {
        key: "cache.io_timeout_ms",
        description: "Durable store read/write timeout in milliseconds",
        value_type: "number",
        default_value: "1000",
    },
    StaticConfigItem {
        key: "context.max_messages",
        description: "Messages retained per session",
        value_type: "number",
        default_value: "10",
    },
    StaticConfigItem {
        key: "context.ttl_hours",
        description: "Session expiry in hours from last write",
        value_type: "number",
        default_value: "24",
    },
    StaticConfigItem {
        key: "limits.requests_per_minute",
        description: "Requests admitted per client within one window",
        value_type: "number",
        default_value: "30",
    },
    StaticConfigItem {
        key: "limits.window_seconds",
        description: "Rate limit window in seconds",
        value_type: "number",
        default_value: "60",
    },
    StaticConfigItem {
        key: "llm.endpoint",
        description: "Completion service endpoint",
        value_type: "string",
        default_value:
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash-exp:generateContent",
    },
    StaticConfigItem {
        key: "llm.api_key",
        description: "Completion service API key",
        value_type: "string",
        default_value: "",
    },
    StaticConfigItem {
        key: "llm.timeout_ms",
        description: "Completion request timeout in milliseconds",
        value_type: "number",
        default_value: "30000",
    },
];
