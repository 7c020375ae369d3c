//! # scripture-tui
//!
//! A terminal scripture reader built on a small retained-mode widget
//! framework.
//!
//! Widgets stage their drawing on a [`render::Surface`]; the [`screen::Screen`]
//! owns them, keeps exactly one focused, routes input, and flushes once per
//! render pass. Modal input ([`widgets::Entry`]) is a capture state driven by
//! the same event stream as everything else.
//!
//! ## Core Systems
//!
//! - **[`geometry`]**: Offset, Size, Region primitives
//! - **[`render`]**: staging compositor, surfaces, crossterm driver
//! - **[`event`]**: input events, event sources, key bindings
//! - **[`widget`]**: the Widget trait and the scrollable viewport renderer
//! - **[`widgets`]**: Entry and ScrollableFrame
//! - **[`screen`]**: widget registry, focus ring, dispatch
//! - **[`api`]**: bible-api.com client
//! - **[`config`]**: persisted reading position
//! - **[`app`]**: the dashboard
//! - **[`testing`]**: headless surface and snapshot helpers

// Foundation
pub mod geometry;

// Widget system
pub mod widget;
pub mod widgets;

// Events
pub mod event;

// Rendering
pub mod render;

// Content and settings
pub mod api;
pub mod config;

// Application
pub mod app;
pub mod screen;

// Headless test support
pub mod testing;
