//! Route table: canonical request paths for an application.
//!
//! All functions are pure. A malformed `app_id` is passed through as-is.

/// Prefix shared by every client API route.
pub const BASE_ROUTE: &str = "/api/client/v2.0";

/// `/api/client/v2.0/app/{app_id}`
#[must_use]
pub fn app_path(app_id: &str) -> String {
    format!("{BASE_ROUTE}/app/{app_id}")
}

/// `/api/client/v2.0/app/{app_id}/functions/call`
#[must_use]
pub fn function_call_path(app_id: &str) -> String {
    format!("{}/functions/call", app_path(app_id))
}

/// `/api/client/v2.0/app/{app_id}/services/call`
#[must_use]
pub fn service_call_path(app_id: &str) -> String {
    format!("{}/services/call", app_path(app_id))
}

/// Paths for one application, computed once at client construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRoutes {
    app_id: String,
    app_path: String,
    function_call_path: String,
    service_call_path: String,
}

impl AppRoutes {
    #[must_use]
    pub fn new(app_id: impl Into<String>) -> Self {
        let app_id = app_id.into();
        Self {
            app_path: app_path(&app_id),
            function_call_path: function_call_path(&app_id),
            service_call_path: service_call_path(&app_id),
            app_id,
        }
    }

    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    #[must_use]
    pub fn app_path(&self) -> &str {
        &self.app_path
    }

    #[must_use]
    pub fn function_call_path(&self) -> &str {
        &self.function_call_path
    }

    #[must_use]
    pub fn service_call_path(&self) -> &str {
        &self.service_call_path
    }
}
