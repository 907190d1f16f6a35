//! Assembly of the pantry HTTP surface.

use crate::api::health::HealthModule;
use crate::api::ingredients::IngredientsModule;
use crate::module::Module;
use crate::openapi::Info;
use crate::router::Router;

pub const OPENAPI_PATH: &str = "/openapi.json";

pub const INFO: Info = Info {
    title: "pantry",
    version: env!("CARGO_PKG_VERSION"),
};

/// Every module served by the binary.
pub fn modules() -> Vec<Box<dyn Module>> {
    vec![Box::new(HealthModule), Box::new(IngredientsModule)]
}

/// Build the router with all modules plus the OpenAPI document.
pub fn router() -> Router {
    let mut router = Router::new();
    for module in modules() {
        tracing::debug!(module = module.name(), "Registering routes");
        module.routes(&mut router);
    }
    router.openapi(OPENAPI_PATH, INFO);
    router
}
