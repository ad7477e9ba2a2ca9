pub(crate) mod auth;
pub(crate) mod dashboard;
pub(crate) mod employees;
pub(crate) mod projects;
pub(crate) mod tasks;

use axum::Json;
use serde::Serialize;
use tasktrack_core::core_version;

#[derive(Debug, Serialize)]
pub(crate) struct ServiceInfo {
    message: &'static str,
    version: &'static str,
}

pub(crate) async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Employee Management System API",
        version: core_version(),
    })
}

/// Plain acknowledgement for mutations that return no record.
#[derive(Debug, Serialize)]
pub(crate) struct Message {
    message: &'static str,
}

impl Message {
    pub(crate) fn json(message: &'static str) -> Json<Self> {
        Json(Self { message })
    }
}
