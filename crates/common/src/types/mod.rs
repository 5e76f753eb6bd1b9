use serde::Serialize;

/// Body of `GET /health`.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
}

impl Health {
    pub const fn ok(service: &'static str) -> Self {
        Self { status: "ok", service }
    }
}
