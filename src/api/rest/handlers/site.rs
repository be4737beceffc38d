//! Site pages: the HTML homepage and the admin record overview.

use super::{
    ApiError, AppState, ModuleInfo, admin, customers, marketplace, merchant, payments, tokens,
    trading, wallets,
};
use crate::infrastructure::persistence::factory::TableCount;
use axum::Json;
use axum::extract::State;
use axum::response::Html;
use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Every product module, in homepage order.
pub const MODULES: [&ModuleInfo; 8] = [
    &tokens::MODULE,
    &wallets::MODULE,
    &merchant::MODULE,
    &customers::MODULE,
    &payments::MODULE,
    &trading::MODULE,
    &admin::MODULE,
    &marketplace::MODULE,
];

/// Body of `GET /admin/`.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    /// Endpoint name.
    pub message: &'static str,
    /// Records across all tables.
    pub total_records: u64,
    /// Per-table counts, in module order.
    pub tables: Vec<TableCount>,
}

/// `GET /`
pub async fn homepage() -> Html<String> {
    Html(render_homepage())
}

/// `GET /admin/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if a store fails.
#[instrument(skip(state))]
pub async fn admin_overview(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AdminOverview>, ApiError> {
    info!("Counting records");
    let tables = state.stores.counts().await.map_err(|e| {
        error!("Failed to count records: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(AdminOverview {
        message: "MTT Gateway administration",
        total_records: tables.iter().map(|t| t.count).sum(),
        tables,
    }))
}

fn render_homepage() -> String {
    let mut cards = String::new();
    for module in MODULES {
        // Writing into a String cannot fail.
        let _ = write!(
            cards,
            r#"
      <div class="module-card">
        <h3>{name}</h3>
        <p>{description}</p>
        <a href="{prefix}">Access API</a>
      </div>"#,
            name = module.name,
            description = module.description,
            prefix = module.prefix,
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>MTT Payment Gateway</title>
  <style>
    body {{ font-family: system-ui, sans-serif; margin: 0; background: #f4f6fb; color: #1d2330; }}
    .container {{ max-width: 1100px; margin: 0 auto; padding: 2rem; }}
    .header {{ text-align: center; margin-bottom: 2rem; }}
    .status {{ background: #e6f7ec; border-radius: 8px; padding: 1rem; margin-bottom: 2rem; text-align: center; }}
    .modules-grid {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(240px, 1fr)); gap: 1rem; }}
    .module-card {{ background: #fff; border-radius: 8px; padding: 1.25rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }}
    .module-card a, .admin-btn {{ color: #3451b2; font-weight: 600; text-decoration: none; }}
    .admin-section {{ margin-top: 2rem; text-align: center; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>MTT Payment Gateway</h1>
      <p>Multi-Token Trading &amp; Payment Processing Platform</p>
    </div>
    <div class="status">
      <strong>System Status: Online</strong><br>
      All modules are loaded and ready for use
    </div>
    <div class="modules-grid">{cards}
    </div>
    <div class="admin-section">
      <h3>Administration</h3>
      <p>Manage your MTT Gateway system</p>
      <a href="/admin/" class="admin-btn">Record overview</a>
    </div>
  </div>
</body>
</html>
"#
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::rest::handlers::ModuleDescriptor;
    use crate::infrastructure::persistence::{GatewayStores, StoreFactory};

    #[test]
    fn homepage_links_every_module() {
        let html = render_homepage();
        for module in MODULES {
            assert!(html.contains(module.prefix), "missing {}", module.prefix);
            assert!(html.contains(module.description));
        }
        assert!(html.contains("/admin/"));
    }

    #[test]
    fn module_endpoints_stay_under_prefix() {
        for module in MODULES {
            let descriptor = ModuleDescriptor::from(module);
            assert!(!descriptor.endpoints.is_empty());
            for path in descriptor.endpoints.values() {
                assert!(path.starts_with(module.prefix), "{path} outside {}", module.prefix);
                assert!(path.ends_with('/'));
            }
        }
    }

    #[tokio::test]
    async fn admin_overview_counts_every_table() {
        let state = Arc::new(AppState::new(StoreFactory::InMemory.build()));
        let Json(overview) = admin_overview(State(state)).await.unwrap();
        assert_eq!(overview.tables.len(), GatewayStores::TABLES.len());
        assert_eq!(overview.total_records, 0);
    }
}
