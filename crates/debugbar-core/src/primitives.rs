//! # Markup Primitives
//!
//! Fixed identifiers and defaults shared by the orchestrator, the built-in
//! panels and the host.
//!
//! External stylesheets and scripts target these ids and classes, so they are
//! part of the rendered-output contract and must stay stable across releases.

/// Query flag whose presence expands the overlay on page load.
pub const DEFAULT_QUERY_FLAG: &str = "debug-bar";

/// Default label of the toggle control.
pub const DEFAULT_TITLE: &str = "Debug";

/// Name reported in the warning status entry when verbose debugging is off.
pub const DEFAULT_DEBUG_FLAG_LABEL: &str = "DEBUGBAR_DEBUG";

/// Default URL prefix for overlay stylesheets and scripts.
pub const DEFAULT_ASSET_BASE_URL: &str = "/__debug-bar/assets/";

/// Asset handle and version of the overlay stylesheet.
pub const CORE_STYLE_HANDLE: &str = "debug-bar";
pub const CORE_STYLE_VERSION: &str = "20120317";

/// Asset handle and version of the overlay script.
pub const CORE_SCRIPT_HANDLE: &str = "debug-bar";
pub const CORE_SCRIPT_VERSION: &str = "20121228.2";

/// Library the overlay script runs on. Hosts that serve it register it under
/// this handle, through the asset hook, so it is emitted first.
pub const JQUERY_HANDLE: &str = "jquery";

// =============================================================================
// ELEMENT IDENTITIES
// =============================================================================

/// Root element of the overlay body.
pub const ROOT_ID: &str = "debug-bar";

/// Toggle control rendered into the host chrome.
pub const TOGGLE_ID: &str = "debug-bar-toggle";

/// Prefix for navigation link ids (`debug-menu-link-<panel>`).
pub const MENU_LINK_PREFIX: &str = "debug-menu-link-";

/// Prefix for content region ids (`debug-menu-target-<panel>`).
pub const MENU_TARGET_PREFIX: &str = "debug-menu-target-";

/// Prefix for status entry ids (`debug-status-<slug>`).
pub const STATUS_PREFIX: &str = "debug-status-";

/// Error counter of the JavaScript panel. Incremented by client-side scripts.
pub const JS_ERROR_COUNT_ID: &str = "debug-bar-js-error-count";

/// Ordered list the client-side scripts append captured errors to.
pub const JS_ERROR_LIST_ID: &str = "debug-bar-js-error-list";

// =============================================================================
// BODY CLASSES
// =============================================================================

/// Always present on the host `<body>` while the overlay is active.
pub const MAXIMIZED_CLASS: &str = "debug-bar-maximized";

/// Present when the overlay starts expanded.
pub const VISIBLE_CLASS: &str = "debug-bar-visible";
