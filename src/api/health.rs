//! Liveness probe.

use crate::module::Module;
use crate::router::Router;

pub struct HealthModule;

impl Module for HealthModule {
    fn name(&self) -> &'static str {
        "health"
    }

    fn routes(&self, router: &mut Router) {
        router.get("/health", |_ctx| async move {
            crate::response::ok(&serde_json::json!({ "status": "ok" }))
        });
    }
}
