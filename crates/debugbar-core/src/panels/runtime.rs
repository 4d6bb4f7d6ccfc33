//! Notices and warnings the host runtime reported during the request.

use crate::events::{Notice, NoticeLevel};
use crate::markup::Markup;
use crate::panel::{InitContext, Panel, PanelBase, PanelContext};
use crate::types::PanelError;

#[derive(Debug, Default)]
pub struct RuntimePanel {
    base: PanelBase,
    notices: Vec<Notice>,
}

impl RuntimePanel {
    fn count(&self, level: NoticeLevel) -> usize {
        self.notices.iter().filter(|n| n.level == level).count()
    }
}

impl Panel for RuntimePanel {
    fn init(&mut self, _ctx: &mut InitContext<'_>) -> Result<(), PanelError> {
        self.base.set_title("Notices / Warnings");
        Ok(())
    }

    fn title(&self) -> &str {
        self.base.title()
    }

    fn prerender(&mut self, ctx: &PanelContext<'_>) -> Result<(), PanelError> {
        self.notices = ctx.events.notices();
        self.base.set_visible(!self.notices.is_empty());
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.base.is_visible()
    }

    fn render(&self, out: &mut Markup) -> Result<(), PanelError> {
        out.raw("<div id=\"debug-bar-php\">\n");
        out.raw(&format!(
            "<h2><span>Total Warnings:</span>{}</h2>\n",
            self.count(NoticeLevel::Warning)
        ));
        out.raw(&format!(
            "<h2><span>Total Notices:</span>{}</h2>\n",
            self.count(NoticeLevel::Notice)
        ));
        out.raw("<ol class=\"debug-bar-php-list\">\n");
        for notice in &self.notices {
            let (class, label) = match notice.level {
                NoticeLevel::Warning => ("debug-bar-php-warning", "WARNING"),
                NoticeLevel::Notice => ("debug-bar-php-notice", "NOTICE"),
            };
            out.raw(&format!("<li class=\"{}\">{}: ", class, label));
            if let Some(location) = &notice.location {
                out.text(location).raw(" - ");
            }
            out.text(&notice.message).raw("</li>\n");
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

    fn prerendered(events: &EventLog) -> RuntimePanel {
        let request = RequestInfo::new("GET", "/");
        let config = OverlayConfig::default();
        let ctx = PanelContext {
            request: &request,
            events,
            config: &config,
        };
        let mut panel = RuntimePanel::default();
        panel.prerender(&ctx).expect("prerender");
        panel
    }

    #[test]
    fn hidden_without_notices() {
        let events = EventLog::new();
        assert!(!prerendered(&events).is_visible());
    }

    #[test]
    fn lists_notices_escaped() {
        let events = EventLog::new();
        events.notice(NoticeLevel::Warning, "bad <input>", Some("src/a.rs:3".to_string()));
        events.notice(NoticeLevel::Notice, "fyi", None);

        let panel = prerendered(&events);
        assert!(panel.is_visible());

        let mut out = Markup::new();
        panel.render(&mut out).expect("render");
        let html = out.as_str();
        assert!(html.contains("<h2><span>Total Warnings:</span>1</h2>"));
        assert!(html.contains("<h2><span>Total Notices:</span>1</h2>"));
        assert!(html.contains(
            "<li class=\"debug-bar-php-warning\">WARNING: src/a.rs:3 - bad &lt;input&gt;</li>"
        ));
        assert!(html.contains("<li class=\"debug-bar-php-notice\">NOTICE: fyi</li>"));
    }
}
