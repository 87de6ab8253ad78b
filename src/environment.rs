use std::sync::Arc;

use log::Logger;

use crate::service::RecipeService;
use crate::urls::Urls;

/// Everything a request handler needs, cloned into each route.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub service: Arc<RecipeService>,
    pub urls: Arc<Urls>,
    pub config: Config,
}

impl Environment {
    pub fn new(
        logger: Arc<Logger>,
        service: Arc<RecipeService>,
        urls: Arc<Urls>,
        config: Config,
    ) -> Self {
        Self {
            logger,
            service,
            urls,
            config,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    /// Log full request and response bodies at debug level.
    pub(crate) log_bodies: bool,
}

impl Config {
    pub fn new(log_bodies: bool) -> Self {
        Self { log_bodies }
    }
}
