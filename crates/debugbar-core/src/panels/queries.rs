//! Data-store queries recorded during the request.

use crate::events::{QueryRecord, format_duration};
use crate::markup::Markup;
use crate::panel::{InitContext, Panel, PanelBase, PanelContext};
use crate::types::PanelError;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct QueriesPanel {
    base: PanelBase,
    recording: bool,
    queries: Vec<QueryRecord>,
}

impl QueriesPanel {
    fn total_time(&self) -> Duration {
        self.queries
            .iter()
            .fold(Duration::ZERO, |acc, q| acc.saturating_add(q.duration))
    }

    fn errors(&self) -> impl Iterator<Item = &QueryRecord> {
        self.queries.iter().filter(|q| q.error.is_some())
    }
}

impl Panel for QueriesPanel {
    fn init(&mut self, _ctx: &mut InitContext<'_>) -> Result<(), PanelError> {
        self.base.set_title("Queries");
        Ok(())
    }

    fn title(&self) -> &str {
        self.base.title()
    }

    fn prerender(&mut self, ctx: &PanelContext<'_>) -> Result<(), PanelError> {
        self.recording = ctx.config.record_queries;
        self.queries = ctx.events.queries();
        let visible = self.recording || self.errors().next().is_some();
        self.base.set_visible(visible);
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.base.is_visible()
    }

    fn render(&self, out: &mut Markup) -> Result<(), PanelError> {
        out.raw("<div id=\"debug-bar-queries\">\n");

        if !self.recording {
            out.raw("<p>Query recording is off. Set <code>record_queries</code> to list every query.</p>\n");
        }

        let errors: Vec<_> = self.errors().collect();
        if !errors.is_empty() {
            out.raw(&format!(
                "<h2><span>Query Errors:</span>{}</h2>\n<ol class=\"debug-bar-query-errors\">\n",
                errors.len()
            ));
            for query in errors {
                out.raw("<li><code>").text(&query.statement).raw("</code> ");
                if let Some(error) = &query.error {
                    out.raw("<span class=\"debug-bar-query-error\">")
                        .text(error)
                        .raw("</span>");
                }
                out.raw("</li>\n");
            }
            out.raw("</ol>\n");
        }

        if self.recording {
            out.raw(&format!(
                "<h2><span>Total Queries:</span>{}</h2>\n",
                self.queries.len()
            ));
            out.raw(&format!(
                "<h2><span>Total query time:</span>{}</h2>\n",
                format_duration(self.total_time())
            ));
            out.raw("<ol class=\"debug-bar-query-list\">\n");
            for query in &self.queries {
                out.raw("<li><code>").text(&query.statement).raw("</code><br/>");
                if let Some(caller) = &query.caller {
                    out.text(caller).raw(" ");
                }
                out.raw(&format!(
                    "<span class=\"debug-bar-query-time\">#{}</span></li>\n",
                    format_duration(query.duration)
                ));
            }
            out.raw("</ol>\n");
        }

        out.raw("</div>");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayConfig;
    use crate::events::EventLog;
    use crate::request::RequestInfo;

    fn prerendered(events: &EventLog, record_queries: bool) -> QueriesPanel {
        let request = RequestInfo::new("GET", "/");
        let config = OverlayConfig {
            record_queries,
            ..OverlayConfig::default()
        };
        let ctx = PanelContext {
            request: &request,
            events,
            config: &config,
        };
        let mut panel = QueriesPanel::default();
        panel.prerender(&ctx).expect("prerender");
        panel
    }

    #[test]
    fn visible_when_recording_even_without_queries() {
        let events = EventLog::new();
        assert!(prerendered(&events, true).is_visible());
        assert!(!prerendered(&events, false).is_visible());
    }

    #[test]
    fn query_error_forces_visibility() {
        let events = EventLog::new();
        events.query(
            QueryRecord::new("GET items/x", Duration::from_micros(5)).with_error("store offline"),
        );
        let panel = prerendered(&events, false);
        assert!(panel.is_visible());

        let mut out = Markup::new();
        panel.render(&mut out).expect("render");
        assert!(out.as_str().contains("<h2><span>Query Errors:</span>1</h2>"));
        assert!(out.as_str().contains("store offline"));
        assert!(!out.as_str().contains("Total Queries"));
    }

    #[test]
    fn totals_and_escaping() {
        let events = EventLog::new();
        events.query(
            QueryRecord::new("GET items/<a>", Duration::from_micros(1500)).with_caller("get_item"),
        );
        events.query(QueryRecord::new("PUT items/b", Duration::from_micros(500)));

        let panel = prerendered(&events, true);
        let mut out = Markup::new();
        panel.render(&mut out).expect("render");
        let html = out.as_str();
        assert!(html.contains("<h2><span>Total Queries:</span>2</h2>"));
        assert!(html.contains("<h2><span>Total query time:</span>2.000ms</h2>"));
        assert!(html.contains("<code>GET items/&lt;a&gt;</code><br/>get_item "));
    }
}
