#![allow(dead_code)]

pub mod mock_llm;

use relay_config::ModelConfig;
use relay_llm::OpenAiModel;
use url::Url;

/// Model pointed at `base_url` with a fixed test credential
pub fn model(name: &str, base_url: &str) -> OpenAiModel {
    let config = ModelConfig::new(name)
        .with_base_url(Url::parse(base_url).expect("valid mock URL"))
        .with_api_key("sk-test");
    OpenAiModel::from_config(&config)
}
