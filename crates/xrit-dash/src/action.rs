//! Action enum: user intents produced by panels and key handling.

/// Identifier for each panel in the dashboard registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Header,
    Clock,
    Schedule,
    Status,
}

/// Components produce Actions; the App applies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Discard today's schedule and acquire it again.
    Retry,
    Quit,
}
