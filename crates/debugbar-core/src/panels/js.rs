//! Client-side error capture.
//!
//! The panel itself only renders an empty counter and list; the script it
//! enqueues during `init` fills them in on the page.

use crate::markup::Markup;
use crate::panel::{InitContext, Panel, PanelBase, PanelContext};
use crate::primitives::{JS_ERROR_COUNT_ID, JS_ERROR_LIST_ID};
use crate::types::PanelError;

/// Asset handle of the error capture script.
pub const JS_SCRIPT_HANDLE: &str = "debug-bar-js";
pub const JS_SCRIPT_VERSION: &str = "20111216";

#[derive(Debug, Default)]
pub struct JsErrorsPanel {
    base: PanelBase,
}

impl Panel for JsErrorsPanel {
    fn init(&mut self, ctx: &mut InitContext<'_>) -> Result<(), PanelError> {
        self.base.set_title("JavaScript");
        // Head placement: the capture handler must be installed before page scripts run.
        ctx.assets.enqueue_script(
            JS_SCRIPT_HANDLE,
            ctx.config.asset_url("debug-bar-js", "js"),
            &[],
            JS_SCRIPT_VERSION,
            false,
        );
        Ok(())
    }

    fn title(&self) -> &str {
        self.base.title()
    }

    fn prerender(&mut self, _ctx: &PanelContext<'_>) -> Result<(), PanelError> {
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.base.is_visible()
    }

    fn render(&self, out: &mut Markup) -> Result<(), PanelError> {
        out.raw(&format!(
            concat!(
                "<div id=\"debug-bar-js\">",
                "<h2><span>Total Errors:</span><div id=\"{}\">0</div></h2>\n",
                "<ol class=\"debug-bar-js-list\" id=\"{}\"></ol>\n",
                "</div>"
            ),
            JS_ERROR_COUNT_ID, JS_ERROR_LIST_ID
        ));
        Ok(())
    }
}
