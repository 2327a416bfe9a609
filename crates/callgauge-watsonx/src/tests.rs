//! Snapshot tests for the watsonx client

#[cfg(test)]
mod snapshot_tests {
    use crate::WatsonxConfig;
    use insta::assert_yaml_snapshot;

    #[test]
    fn test_config_snapshot() {
        let config = WatsonxConfig {
            api_key: "test_api_key_redacted".to_string(),
            project_id: "test_project_id".to_string(),
            iam_url: "iam.cloud.ibm.com".to_string(),
            api_url: "https://us-south.ml.cloud.ibm.com".to_string(),
            deep_model: None,
            light_model: None,
        };

        assert_yaml_snapshot!(config, @r###"
        ---
        api_key: test_api_key_redacted
        project_id: test_project_id
        iam_url: iam.cloud.ibm.com
        api_url: "https://us-south.ml.cloud.ibm.com"
        deep_model: ~
        light_model: ~
        "###);
    }

    #[test]
    fn test_config_snapshot_with_overrides() {
        let mut config = WatsonxConfig::new("key".to_string(), "project".to_string());
        config.deep_model = Some("ibm/granite-4-h-small".to_string());

        assert_yaml_snapshot!(config, @r###"
        ---
        api_key: key
        project_id: project
        iam_url: iam.cloud.ibm.com
        api_url: "https://us-south.ml.cloud.ibm.com"
        deep_model: ibm/granite-4-h-small
        light_model: ~
        "###);
    }
}
