/// Environment variable the embedding host sets when it launches the widget.
pub const HOST_ENV_VAR: &str = "CHANNEL_GATE_HOST";

/// Signalling interface of the embedding host. Optional: the widget runs
/// the same without one.
pub trait HostBridge {
    fn is_present(&self) -> bool;
    /// Ask the host to give the widget its full size.
    fn expand(&mut self);
    /// Tell the host the widget finished initialising.
    fn ready(&mut self);
}

pub fn host_env_present() -> bool {
    std::env::var_os(HOST_ENV_VAR).is_some()
}

/// Detect the host and send the startup signals. Returns whether a host
/// was found.
pub fn announce(host: &mut dyn HostBridge) -> bool {
    if !host.is_present() {
        return false;
    }
    tracing::info!("embedding host detected");
    host.expand();
    host.ready();
    true
}
