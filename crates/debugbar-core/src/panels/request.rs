//! What the host was asked for.

use crate::markup::Markup;
use crate::panel::{InitContext, Panel, PanelBase, PanelContext};
use crate::request::RequestInfo;
use crate::types::PanelError;

#[derive(Debug, Default)]
pub struct RequestPanel {
    base: PanelBase,
    request: RequestInfo,
}

impl Panel for RequestPanel {
    fn init(&mut self, _ctx: &mut InitContext<'_>) -> Result<(), PanelError> {
        self.base.set_title("Request");
        Ok(())
    }

    fn title(&self) -> &str {
        self.base.title()
    }

    fn prerender(&mut self, ctx: &PanelContext<'_>) -> Result<(), PanelError> {
        self.request = ctx.request.clone();
        self.base.set_visible(true);
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.base.is_visible()
    }

    fn render(&self, out: &mut Markup) -> Result<(), PanelError> {
        let query = self.request.query_string();
        let rows = [
            ("Request Method", self.request.method.as_str()),
            ("Request Path", self.request.path.as_str()),
            ("Matched Route", self.request.route.as_deref().unwrap_or("None")),
            ("Query String", if query.is_empty() { "None" } else { query.as_str() }),
        ];

        out.raw("<div id=\"debug-bar-request\">\n");
        for (label, value) in rows {
            out.raw("<h3>")
                .text(label)
                .raw(":</h3>\n<p>")
                .text(value)
                .raw("</p>\n");
        }
        out.raw("</div>");
        Ok(())
    }
}
