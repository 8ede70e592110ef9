/// Which upstream the stylesheet passthrough talks to. Resolved once at
/// startup from `DEPLOYMENT_ENVIRONMENT`; anything other than
/// "production" is staging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Staging,
    Production,
}

impl Environment {
    pub fn from_deployment_env() -> Self {
        match std::env::var("DEPLOYMENT_ENVIRONMENT") {
            Ok(value) if value.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Staging,
        }
    }

    pub fn asset_host(self) -> &'static str {
        match self {
            Environment::Staging => "https://assets-staging.taskdeck.io",
            Environment::Production => "https://assets.taskdeck.io",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Environment::Staging => "STAGING",
            Environment::Production => "PRODUCTION",
        }
    }
}

/// Upstream location of a branding stylesheet. The tenant changes both
/// the directory and the file name; without one the shared "manager"
/// styles are served.
pub fn css_url(environment: Environment, version: &str, tenant: Option<&str>) -> String {
    let slug = tenant.unwrap_or("manager");
    format!(
        "{}/css/{slug}-brandingstyles/{version}/{slug}-brandingstyles.css",
        environment.asset_host()
    )
}
