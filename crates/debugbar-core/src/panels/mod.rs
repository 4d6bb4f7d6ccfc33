//! # Built-in Panels
//!
//! The panels every overlay ships with, in catalog order:
//!
//! | Panel | Visible when |
//! |-------|--------------|
//! | [`RuntimePanel`] | a notice or warning was recorded |
//! | [`QueriesPanel`] | query recording is on, or a query failed |
//! | [`DeprecatedPanel`] | deprecated usage was recorded |
//! | [`RequestPanel`] | always |
//! | [`ObjectCachePanel`] | the object cache was consulted |
//! | [`JsErrorsPanel`] | always |

mod cache;
mod deprecated;
mod js;
mod queries;
mod request;
mod runtime;

pub use cache::ObjectCachePanel;
pub use deprecated::DeprecatedPanel;
pub use js::{JS_SCRIPT_HANDLE, JS_SCRIPT_VERSION, JsErrorsPanel};
pub use queries::QueriesPanel;
pub use request::RequestPanel;
pub use runtime::RuntimePanel;

use crate::registry::PanelCatalog;

/// Catalog holding the built-in panels in their display order.
#[must_use]
pub fn builtin_catalog() -> PanelCatalog {
    let mut catalog = PanelCatalog::empty();
    catalog
        .register_default::<RuntimePanel>()
        .register_default::<QueriesPanel>()
        .register_default::<DeprecatedPanel>()
        .register_default::<RequestPanel>()
        .register_default::<ObjectCachePanel>()
        .register_default::<JsErrorsPanel>();
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetRegistry;
    use crate::config::OverlayConfig;
    use crate::panel::InitContext;

    #[test]
    fn builtin_order() {
        let mut assets = AssetRegistry::new();
        let config = OverlayConfig::default();
        let mut ctx = InitContext {
            assets: &mut assets,
            config: &config,
        };
        let panels = builtin_catalog().instantiate(&mut ctx).expect("instantiate");
        let ids: Vec<_> = panels.iter().map(|p| p.id().to_string()).collect();
        assert_eq!(
            ids,
            vec![
                "RuntimePanel",
                "QueriesPanel",
                "DeprecatedPanel",
                "RequestPanel",
                "ObjectCachePanel",
                "JsErrorsPanel",
            ]
        );
        let titles: Vec<_> = panels.iter().map(|p| p.title().to_string()).collect();
        assert_eq!(
            titles,
            vec![
                "Notices / Warnings",
                "Queries",
                "Deprecated",
                "Request",
                "Object Cache",
                "JavaScript",
            ]
        );
    }
}
