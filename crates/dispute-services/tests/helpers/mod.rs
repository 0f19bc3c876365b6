#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use dispute_core::PipelineConfig;
use dispute_services::{Storage, SubmissionPipeline};
use std::sync::Arc;
use std::time::Duration;

/// Path the mock backend accepts submissions on.
pub const ENDPOINT_PATH: &str = "/api/formulario";

/// Pipeline pointed at a mockito server, with an optional storage sink.
pub fn pipeline_for(server: &mockito::Server, storage: Option<Arc<dyn Storage>>) -> SubmissionPipeline {
    let mut config = PipelineConfig::new(format!("{}{}", server.url(), ENDPOINT_PATH))
        .with_request_timeout(Duration::from_secs(5));
    if storage.is_some() {
        config = config.with_storage_bucket("disputes");
    }
    SubmissionPipeline::new(config, storage).expect("pipeline should build")
}
