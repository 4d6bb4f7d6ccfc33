//! Object cache hit ratio, overall and per group.

use crate::events::CacheStats;
use crate::markup::Markup;
use crate::panel::{InitContext, Panel, PanelBase, PanelContext};
use crate::types::PanelError;

#[derive(Debug, Default)]
pub struct ObjectCachePanel {
    base: PanelBase,
    stats: CacheStats,
}

impl Panel for ObjectCachePanel {
    fn init(&mut self, _ctx: &mut InitContext<'_>) -> Result<(), PanelError> {
        self.base.set_title("Object Cache");
        Ok(())
    }

    fn title(&self) -> &str {
        self.base.title()
    }

    fn prerender(&mut self, ctx: &PanelContext<'_>) -> Result<(), PanelError> {
        self.stats = ctx.events.cache_stats();
        self.base.set_visible(self.stats.overall.total() > 0);
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.base.is_visible()
    }

    fn render(&self, out: &mut Markup) -> Result<(), PanelError> {
        let overall = self.stats.overall;
        out.raw("<div id=\"debug-bar-object-cache\">\n");
        out.raw(&format!(
            "<p><strong>Cache Hits:</strong> {}<br />\n<strong>Cache Misses:</strong> {}<br />\n<strong>Hit Ratio:</strong> {}%</p>\n",
            overall.hits,
            overall.misses,
            overall.hit_percent()
        ));

        out.raw("<ul class=\"debug-bar-cache-groups\">\n");
        for (group, counts) in &self.stats.groups {
            out.raw("<li><strong>Group:</strong> ")
                .text(group)
                .raw(&format!(
                    " - {} hits, {} misses ({}%)</li>\n",
                    counts.hits,
                    counts.misses,
                    counts.hit_percent()
                ));
        }
        out.raw("</ul>\n</div>");
        Ok(())
    }
}
