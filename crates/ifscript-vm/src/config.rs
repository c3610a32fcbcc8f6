//! The two global flags of spec.md §4.4.7/§7, modeled as an explicit
//! config struct rather than process-wide statics (see SPEC_FULL.md
//! "Configuration").

/// Propagation policy for faults raised while walking a fork.
#[derive(Clone, Copy, Debug, Default)]
pub struct EngineConfig {
    /// When false, faults are swallowed and the offending construct is
    /// skipped; when true, they are raised as the corresponding error.
    pub strict_errors: bool,
    /// When true, the Interpreter catches both error kinds at the
    /// fork-load boundary, clears the screen, and displays the message
    /// instead of propagating to the host.
    pub print_errors: bool,
}
