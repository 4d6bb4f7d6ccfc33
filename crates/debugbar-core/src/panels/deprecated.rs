//! Calls into deprecated API, grouped by kind.

use crate::events::{Deprecation, DeprecationKind};
use crate::markup::Markup;
use crate::panel::{InitContext, Panel, PanelBase, PanelContext};
use crate::types::PanelError;

const KINDS: [DeprecationKind; 3] = [
    DeprecationKind::Function,
    DeprecationKind::Argument,
    DeprecationKind::File,
];

#[derive(Debug, Default)]
pub struct DeprecatedPanel {
    base: PanelBase,
    deprecations: Vec<Deprecation>,
}

impl Panel for DeprecatedPanel {
    fn init(&mut self, _ctx: &mut InitContext<'_>) -> Result<(), PanelError> {
        self.base.set_title("Deprecated");
        Ok(())
    }

    fn title(&self) -> &str {
        self.base.title()
    }

    fn prerender(&mut self, ctx: &PanelContext<'_>) -> Result<(), PanelError> {
        self.deprecations = ctx.events.deprecations();
        self.base.set_visible(!self.deprecations.is_empty());
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.base.is_visible()
    }

    fn render(&self, out: &mut Markup) -> Result<(), PanelError> {
        out.raw("<div id=\"debug-bar-deprecated\">\n");
        for kind in KINDS {
            let count = self.deprecations.iter().filter(|d| d.kind == kind).count();
            out.raw("<h2><span>")
                .text(kind.label())
                .raw(&format!(":</span>{}</h2>\n", count));
        }

        out.raw("<ol class=\"debug-bar-deprecated-list\">\n");
        for deprecation in &self.deprecations {
            out.raw("<li><strong>").text(&deprecation.name).raw("</strong> ");
            out.text(&format!("is deprecated since version {}", deprecation.version));
            match &deprecation.replacement {
                Some(replacement) => {
                    out.raw("! Use ").text(replacement).raw(" instead.");
                }
                None => {
                    out.raw(" with no alternative available.");
                }
            }
            if let Some(location) = &deprecation.location {
                out.raw(" <span class=\"debug-bar-deprecated-location\">")
                    .text(location)
                    .raw("</span>");
            }
            out.raw("</li>\n");
        }
        out.raw("</ol>\n</div>");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayConfig;
    use crate::events::EventLog;
    use crate::request::RequestInfo;

    #[test]
    fn lists_by_kind() {
        let events = EventLog::new();
        events.deprecated(Deprecation {
            kind: DeprecationKind::Function,
            name: "old_items".to_string(),
            version: "0.7.0".to_string(),
            replacement: Some("items".to_string()),
            location: Some("src/api.rs:12".to_string()),
        });
        events.deprecated(Deprecation {
            kind: DeprecationKind::File,
            name: "legacy.toml".to_string(),
            version: "0.5.0".to_string(),
            replacement: None,
            location: None,
        });

        let request = RequestInfo::new("GET", "/");
        let config = OverlayConfig::default();
        let ctx = PanelContext {
            request: &request,
            events: &events,
            config: &config,
        };
        let mut panel = DeprecatedPanel::default();
        panel.prerender(&ctx).expect("prerender");
        assert!(panel.is_visible());

        let mut out = Markup::new();
        panel.render(&mut out).expect("render");
        let html = out.as_str();
        assert!(html.contains("<h2><span>Deprecated Function Calls:</span>1</h2>"));
        assert!(html.contains("<h2><span>Deprecated Arguments:</span>0</h2>"));
        assert!(html.contains("<h2><span>Deprecated Files:</span>1</h2>"));
        assert!(html.contains("<strong>old_items</strong> is deprecated since version 0.7.0! Use items instead."));
        assert!(html.contains("with no alternative available."));
    }

    #[test]
    fn hidden_when_nothing_deprecated() {
        let events = EventLog::new();
        let request = RequestInfo::new("GET", "/");
        let config = OverlayConfig::default();
        let ctx = PanelContext {
            request: &request,
            events: &events,
            config: &config,
        };
        let mut panel = DeprecatedPanel::default();
        panel.prerender(&ctx).expect("prerender");
        assert!(!panel.is_visible());
    }
}
