use std::sync::Arc;

use crate::config::AppConfig;
use crate::gql::ExecutableSchema;

#[derive(Clone)]
pub struct AppState {
    schema: ExecutableSchema,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(schema: ExecutableSchema, config: AppConfig) -> Self {
        Self {
            schema,
            config: Arc::new(config),
        }
    }

    pub fn schema(&self) -> &ExecutableSchema {
        &self.schema
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
