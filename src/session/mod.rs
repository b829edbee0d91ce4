/// Poll → gate → dissolve wiring.
pub mod pipeline;
/// One capture → partition → render → animate run.
#[allow(clippy::module_inception)]
pub mod session;
